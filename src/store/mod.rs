//! Durable key-value store
//!
//! The tracker persists each of its fields under a fixed key. Backends only
//! move raw strings; integer and list encoding lives in the provided methods
//! of [`PersistentStore`] so every backend shares one durable layout.

mod memory;
mod sqlite;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::db::DbError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Fixed field names of the durable layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    CalorieLimit,
    CaloriesConsumed,
    CaloriesBurned,
    Protein,
    Fat,
    Carbohydrate,
    Meals,
    Workouts,
}

impl Key {
    pub const ALL: [Key; 8] = [
        Key::CalorieLimit,
        Key::CaloriesConsumed,
        Key::CaloriesBurned,
        Key::Protein,
        Key::Fat,
        Key::Carbohydrate,
        Key::Meals,
        Key::Workouts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Key::CalorieLimit => "calorieLimit",
            Key::CaloriesConsumed => "caloriesConsumed",
            Key::CaloriesBurned => "caloriesBurned",
            Key::Protein => "protein",
            Key::Fat => "fat",
            Key::Carbohydrate => "carbohydrate",
            Key::Meals => "meals",
            Key::Workouts => "workouts",
        }
    }
}

/// One write of a mutation's batch.
///
/// Lists are encoded when the write is built, so a batch that exists can no
/// longer fail on serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    SetInt(Key, i64),
    SetList(Key, String),
    ClearAll,
}

impl StoreWrite {
    pub fn list<T: Serialize>(key: Key, items: &[T]) -> StoreResult<Self> {
        Ok(StoreWrite::SetList(key, serde_json::to_string(items)?))
    }
}

/// A durable key-value medium.
///
/// Reads never fail towards the caller: a missing, unreadable or malformed
/// value reads as the default. Writes report failures.
pub trait PersistentStore {
    /// Raw stored text for a key
    fn get_raw(&self, key: Key) -> StoreResult<Option<String>>;

    fn set_raw(&mut self, key: Key, value: String) -> StoreResult<()>;

    /// Remove every tracker key
    fn clear_all(&mut self) -> StoreResult<()>;

    /// Apply writes in order. Transactional backends override this so the
    /// batch lands all-or-nothing.
    fn write_batch(&mut self, writes: &[StoreWrite]) -> StoreResult<()> {
        for write in writes {
            match write {
                StoreWrite::SetInt(key, value) => self.set_raw(*key, value.to_string())?,
                StoreWrite::SetList(key, encoded) => self.set_raw(*key, encoded.clone())?,
                StoreWrite::ClearAll => self.clear_all()?,
            }
        }
        Ok(())
    }

    fn get_int(&self, key: Key, default: i64) -> i64 {
        let raw = match self.get_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!("Failed to read '{}': {}. Using default {}.", key.as_str(), e, default);
                return default;
            }
        };

        match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    "Malformed integer under '{}': {:?}. Using default {}.",
                    key.as_str(),
                    raw,
                    default
                );
                default
            }
        }
    }

    fn set_int(&mut self, key: Key, value: i64) -> StoreResult<()> {
        self.set_raw(key, value.to_string())
    }

    /// Stored list, or an empty one when absent or malformed
    fn get_list<T: DeserializeOwned>(&self, key: Key) -> Vec<T>
    where
        Self: Sized,
    {
        let raw = match self.get_raw(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read '{}': {}. Treating as empty.", key.as_str(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Malformed list under '{}': {}. Treating as empty.", key.as_str(), e);
                Vec::new()
            }
        }
    }

    fn set_list<T: Serialize>(&mut self, key: Key, items: &[T]) -> StoreResult<()>
    where
        Self: Sized,
    {
        let encoded = serde_json::to_string(items)?;
        self.set_raw(key, encoded)
    }
}
