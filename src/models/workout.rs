//! Workout Entry model
//!
//! Represents one logged workout and the calories it burned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_calories, validate_id, validate_name};
use super::ValidationError;

/// A logged workout. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WorkoutRecord", into = "WorkoutRecord")]
pub struct WorkoutEntry {
    id: String,
    name: String,
    calories: i64,
    logged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutRecord {
    id: String,
    name: String,
    calories: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logged_at: Option<DateTime<Utc>>,
}

impl WorkoutEntry {
    /// Create a workout with a freshly generated id
    pub fn new(name: impl Into<String>, calories: i64) -> Result<Self, ValidationError> {
        Self::with_id(super::new_entry_id(), name, calories)
    }

    /// Create a workout under a caller-chosen id
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        calories: i64,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        let name = name.into();
        validate_id(&id)?;
        validate_name(&name)?;
        validate_calories(calories)?;

        Ok(Self {
            id,
            name,
            calories,
            logged_at: Some(Utc::now()),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calories burned
    pub fn calories(&self) -> i64 {
        self.calories
    }

    pub fn logged_at(&self) -> Option<DateTime<Utc>> {
        self.logged_at
    }
}

impl TryFrom<WorkoutRecord> for WorkoutEntry {
    type Error = ValidationError;

    fn try_from(record: WorkoutRecord) -> Result<Self, Self::Error> {
        let mut entry = Self::with_id(record.id, record.name, record.calories)?;
        entry.logged_at = record.logged_at;
        Ok(entry)
    }
}

impl From<WorkoutEntry> for WorkoutRecord {
    fn from(entry: WorkoutEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            calories: entry.calories,
            logged_at: entry.logged_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_workout() {
        let workout = WorkoutEntry::new("run", 300).unwrap();
        assert_eq!(workout.name(), "run");
        assert_eq!(workout.calories(), 300);
        assert_eq!(workout.id().len(), 32);
    }

    #[test]
    fn test_rejects_invalid_workouts() {
        assert_eq!(WorkoutEntry::new("", 300), Err(ValidationError::EmptyName));
        assert_eq!(
            WorkoutEntry::new("swim", -20),
            Err(ValidationError::NegativeCalories(-20))
        );
    }

    #[test]
    fn test_record_shape() {
        let json = r#"{"id":"9a1","name":"cycling","calories":450}"#;
        let workout: WorkoutEntry = serde_json::from_str(json).unwrap();
        assert_eq!(workout.id(), "9a1");
        assert_eq!(workout.calories(), 450);

        let value = serde_json::to_value(&workout).unwrap();
        assert_eq!(value["name"], "cycling");
        assert!(value.get("loggedAt").is_none());
    }
}
