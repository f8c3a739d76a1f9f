//! Data models
//!
//! Value objects for logged entries and the tracker aggregate.

mod meal;
mod state;
mod validation;
mod workout;

pub use meal::{Macros, MealEntry};
pub use state::{TrackerState, DEFAULT_CALORIE_LIMIT};
pub(crate) use state::PersistedTotals;
pub use validation::{EntryKind, ValidationError};
pub(crate) use validation::validate_limit;
pub use workout::WorkoutEntry;

/// Generate an opaque entry identifier
pub(crate) fn new_entry_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
