//! Meal Entry model
//!
//! Represents one logged meal: a name, its calories and optional macros.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_calories, validate_id, validate_macro, validate_name};
use super::ValidationError;

/// Optional macro-nutrient grams for a meal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: Option<i64>,
    pub fat: Option<i64>,
    pub carbohydrate: Option<i64>,
}

impl Macros {
    pub fn new(protein: i64, fat: i64, carbohydrate: i64) -> Self {
        Self {
            protein: Some(protein),
            fat: Some(fat),
            carbohydrate: Some(carbohydrate),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_macro("protein", self.protein)?;
        validate_macro("fat", self.fat)?;
        validate_macro("carbohydrate", self.carbohydrate)
    }
}

/// A logged meal. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MealRecord", into = "MealRecord")]
pub struct MealEntry {
    id: String,
    name: String,
    calories: i64,
    macros: Macros,
    logged_at: Option<DateTime<Utc>>,
}

/// Durable shape of a meal: `{id, name, calories, protein?, fat?, carbohydrate?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MealRecord {
    id: String,
    name: String,
    calories: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    protein: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    carbohydrate: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logged_at: Option<DateTime<Utc>>,
}

impl MealEntry {
    /// Create a meal with a freshly generated id.
    ///
    /// Fails when the name is blank or any number is negative.
    pub fn new(name: impl Into<String>, calories: i64, macros: Macros) -> Result<Self, ValidationError> {
        Self::with_id(super::new_entry_id(), name, calories, macros)
    }

    /// Create a meal under a caller-chosen id
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        calories: i64,
        macros: Macros,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        let name = name.into();
        validate_id(&id)?;
        validate_name(&name)?;
        validate_calories(calories)?;
        macros.validate()?;

        Ok(Self {
            id,
            name,
            calories,
            macros,
            logged_at: Some(Utc::now()),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn calories(&self) -> i64 {
        self.calories
    }

    pub fn macros(&self) -> Macros {
        self.macros
    }

    /// Protein grams, 0 when not recorded
    pub fn protein(&self) -> i64 {
        self.macros.protein.unwrap_or(0)
    }

    /// Fat grams, 0 when not recorded
    pub fn fat(&self) -> i64 {
        self.macros.fat.unwrap_or(0)
    }

    /// Carbohydrate grams, 0 when not recorded
    pub fn carbohydrate(&self) -> i64 {
        self.macros.carbohydrate.unwrap_or(0)
    }

    pub fn logged_at(&self) -> Option<DateTime<Utc>> {
        self.logged_at
    }
}

impl TryFrom<MealRecord> for MealEntry {
    type Error = ValidationError;

    fn try_from(record: MealRecord) -> Result<Self, Self::Error> {
        let macros = Macros {
            protein: record.protein,
            fat: record.fat,
            carbohydrate: record.carbohydrate,
        };
        let mut entry = Self::with_id(record.id, record.name, record.calories, macros)?;
        entry.logged_at = record.logged_at;
        Ok(entry)
    }
}

impl From<MealEntry> for MealRecord {
    fn from(entry: MealEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            calories: entry.calories,
            protein: entry.macros.protein,
            fat: entry.macros.fat,
            carbohydrate: entry.macros.carbohydrate,
            logged_at: entry.logged_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_meal_defaults_missing_macros_to_zero() {
        let meal = MealEntry::new("breakfast", 400, Macros { protein: Some(20), ..Macros::default() }).unwrap();
        assert_eq!(meal.name(), "breakfast");
        assert_eq!(meal.calories(), 400);
        assert_eq!(meal.protein(), 20);
        assert_eq!(meal.fat(), 0);
        assert_eq!(meal.carbohydrate(), 0);
        assert!(!meal.id().is_empty());
        assert!(meal.logged_at().is_some());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = MealEntry::new("a", 1, Macros::default()).unwrap();
        let b = MealEntry::new("a", 1, Macros::default()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_rejects_invalid_meals() {
        assert_eq!(
            MealEntry::new("", 100, Macros::default()),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            MealEntry::new("lunch", -1, Macros::default()),
            Err(ValidationError::NegativeCalories(-1))
        );
        assert_eq!(
            MealEntry::new("lunch", 100, Macros::new(10, -2, 30)),
            Err(ValidationError::NegativeMacro { name: "fat", value: -2 })
        );
        assert_eq!(
            MealEntry::with_id(" ", "lunch", 100, Macros::default()),
            Err(ValidationError::EmptyId)
        );
    }

    #[test]
    fn test_record_omits_absent_macros() {
        let meal = MealEntry::with_id("abc", "toast", 150, Macros::default()).unwrap();
        let json = serde_json::to_value(&meal).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["calories"], 150);
        assert!(json.get("protein").is_none());
        assert!(json.get("loggedAt").is_some());
    }

    #[test]
    fn test_record_without_timestamp_loads() {
        let json = r#"{"id":"f00d","name":"salad","calories":250,"protein":8}"#;
        let meal: MealEntry = serde_json::from_str(json).unwrap();
        assert_eq!(meal.id(), "f00d");
        assert_eq!(meal.protein(), 8);
        assert_eq!(meal.macros().fat, None);
        assert_eq!(meal.logged_at(), None);
    }

    #[test]
    fn test_invalid_record_is_rejected_on_load() {
        let json = r#"{"id":"f00d","name":"","calories":250}"#;
        assert!(serde_json::from_str::<MealEntry>(json).is_err());

        let json = r#"{"id":"f00d","name":"salad","calories":-5}"#;
        assert!(serde_json::from_str::<MealEntry>(json).is_err());
    }
}
