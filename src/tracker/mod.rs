//! Tracker
//!
//! Owns the session's aggregate and keeps it in step with the durable
//! store. Every mutation builds the next state off to the side, persists it
//! as one batch and only then commits it in memory, so a failed write leaves
//! both sides at their previous values.

mod load;

use thiserror::Error;

use crate::models::{EntryKind, MealEntry, TrackerState, ValidationError, WorkoutEntry};
use crate::store::{PersistentStore, StoreError, StoreWrite};

/// Tracker error types
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("A {kind} with id '{id}' is already logged")]
    DuplicateEntry { kind: EntryKind, id: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Calorie tracker over an injected store
pub struct Tracker<S: PersistentStore> {
    store: S,
    state: TrackerState,
}

impl<S: PersistentStore> Tracker<S> {
    /// Create a tracker and load its state from `store`
    pub fn new(store: S) -> Self {
        let state = load::load_state(&store);
        tracing::debug!(
            "Tracker loaded: {} meals, {} workouts, limit {}",
            state.meals().len(),
            state.workouts().len(),
            state.calorie_limit()
        );
        Self { store, state }
    }

    /// Reload the aggregate from the store, discarding in-memory state
    pub fn initialize(&mut self) -> &TrackerState {
        self.state = load::load_state(&self.store);
        &self.state
    }

    /// Current aggregate snapshot
    pub fn current_state(&self) -> &TrackerState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give up the tracker, handing back its store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Log a meal
    pub fn add_meal(&mut self, meal: MealEntry) -> TrackerResult<&TrackerState> {
        if self.state.meal(meal.id()).is_some() {
            return Err(TrackerError::DuplicateEntry {
                kind: EntryKind::Meal,
                id: meal.id().to_string(),
            });
        }
        tracing::debug!("Adding meal '{}' ({} kcal)", meal.name(), meal.calories());

        let mut next = self.state.clone();
        next.push_meal(meal)?;
        let writes = load::meal_writes(&next)?;
        self.commit(next, &writes)
    }

    /// Log a workout
    pub fn add_workout(&mut self, workout: WorkoutEntry) -> TrackerResult<&TrackerState> {
        if self.state.workout(workout.id()).is_some() {
            return Err(TrackerError::DuplicateEntry {
                kind: EntryKind::Workout,
                id: workout.id().to_string(),
            });
        }
        tracing::debug!("Adding workout '{}' ({} kcal)", workout.name(), workout.calories());

        let mut next = self.state.clone();
        next.push_workout(workout)?;
        let writes = load::workout_writes(&next)?;
        self.commit(next, &writes)
    }

    /// Remove a meal by id.
    ///
    /// Returns the removed meal, or `None` without touching the store when no
    /// meal has that id.
    pub fn remove_meal(&mut self, id: &str) -> TrackerResult<Option<MealEntry>> {
        let mut next = self.state.clone();
        let Some(meal) = next.take_meal(id)? else {
            return Ok(None);
        };
        tracing::debug!("Removing meal '{}' ({} kcal)", meal.name(), meal.calories());

        let writes = load::meal_writes(&next)?;
        self.commit(next, &writes)?;
        Ok(Some(meal))
    }

    /// Remove a workout by id. Unknown ids are a no-op.
    pub fn remove_workout(&mut self, id: &str) -> TrackerResult<Option<WorkoutEntry>> {
        let mut next = self.state.clone();
        let Some(workout) = next.take_workout(id)? else {
            return Ok(None);
        };
        tracing::debug!("Removing workout '{}' ({} kcal)", workout.name(), workout.calories());

        let writes = load::workout_writes(&next)?;
        self.commit(next, &writes)?;
        Ok(Some(workout))
    }

    /// Replace the daily calorie limit.
    ///
    /// Fails with `TotalOverflow` when the remaining calories under the new
    /// limit cannot be represented.
    pub fn set_limit(&mut self, calorie_limit: i64) -> TrackerResult<&TrackerState> {
        crate::models::validate_limit(calorie_limit)?;
        tracing::debug!("Setting calorie limit to {}", calorie_limit);

        let mut next = self.state.clone();
        next.set_limit(calorie_limit)?;
        let writes = load::limit_writes(&next);
        self.commit(next, &writes)
    }

    /// Drop every entry and total. The configured limit is kept, in memory
    /// and in the store.
    pub fn reset(&mut self) -> TrackerResult<&TrackerState> {
        tracing::debug!(
            "Resetting tracker ({} meals, {} workouts)",
            self.state.meals().len(),
            self.state.workouts().len()
        );

        let next = TrackerState::with_limit(self.state.calorie_limit());
        let writes = load::reset_writes(&next);
        self.commit(next, &writes)
    }

    fn commit(&mut self, next: TrackerState, writes: &[StoreWrite]) -> TrackerResult<&TrackerState> {
        self.store.write_batch(writes)?;
        self.state = next;
        Ok(&self.state)
    }
}
