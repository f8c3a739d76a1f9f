//! Boundary validation for entries and tracker settings.

use std::fmt;

use thiserror::Error;

/// Rejected input to an entry constructor or tracker setting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Entry id must not be empty")]
    EmptyId,

    #[error("Name must not be empty")]
    EmptyName,

    #[error("Calories must not be negative (got {0})")]
    NegativeCalories(i64),

    #[error("{name} must not be negative (got {value})")]
    NegativeMacro { name: &'static str, value: i64 },

    #[error("Calorie limit must not be negative (got {0})")]
    NegativeLimit(i64),

    #[error("Calorie totals would exceed the supported range")]
    TotalOverflow,
}

/// Which entry list an operation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Meal,
    Workout,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Meal => "meal",
            EntryKind::Workout => "workout",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }
    Ok(())
}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

pub(crate) fn validate_calories(calories: i64) -> Result<(), ValidationError> {
    if calories < 0 {
        return Err(ValidationError::NegativeCalories(calories));
    }
    Ok(())
}

pub(crate) fn validate_macro(name: &'static str, value: Option<i64>) -> Result<(), ValidationError> {
    match value {
        Some(value) if value < 0 => Err(ValidationError::NegativeMacro { name, value }),
        _ => Ok(()),
    }
}

pub(crate) fn validate_limit(limit: i64) -> Result<(), ValidationError> {
    if limit < 0 {
        return Err(ValidationError::NegativeLimit(limit));
    }
    Ok(())
}
