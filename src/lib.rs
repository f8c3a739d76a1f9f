//! Calorie Tracker Library
//!
//! Daily energy balance engine: logged meals and workouts, a configurable
//! calorie limit, macro totals, and a durable key-value mapping that lets a
//! session pick up where the last one stopped.
//!
//! ```no_run
//! use calorie_tracker::models::{Macros, MealEntry};
//! use calorie_tracker::store::SqliteStore;
//! use calorie_tracker::Tracker;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tracker = Tracker::new(SqliteStore::open("data/calorie_tracker.db")?);
//! tracker.add_meal(MealEntry::new("breakfast", 400, Macros::default())?)?;
//! println!("{} kcal remaining", tracker.current_state().calories_remaining());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod models;
pub mod store;
pub mod tracker;

pub use tracker::{Tracker, TrackerError, TrackerResult};
