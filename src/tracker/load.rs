//! Mapping between the tracker aggregate and the durable layout.

use std::collections::HashSet;

use crate::models::{
    MealEntry, PersistedTotals, TrackerState, WorkoutEntry, DEFAULT_CALORIE_LIMIT,
};
use crate::store::{Key, PersistentStore, StoreResult, StoreWrite};

/// Rebuild the aggregate from whatever the store holds
pub(crate) fn load_state<S: PersistentStore>(store: &S) -> TrackerState {
    let mut calorie_limit = store.get_int(Key::CalorieLimit, DEFAULT_CALORIE_LIMIT);
    if calorie_limit < 0 {
        tracing::warn!(
            "Stored calorie limit {} is negative. Using default {}.",
            calorie_limit,
            DEFAULT_CALORIE_LIMIT
        );
        calorie_limit = DEFAULT_CALORIE_LIMIT;
    }

    let totals = PersistedTotals {
        consumed: store.get_int(Key::CaloriesConsumed, 0),
        burned: store.get_int(Key::CaloriesBurned, 0),
        protein: store.get_int(Key::Protein, 0),
        fat: store.get_int(Key::Fat, 0),
        carbohydrate: store.get_int(Key::Carbohydrate, 0),
    };

    let mut meals = dedup_by_id(store.get_list::<MealEntry>(Key::Meals), MealEntry::id, "meal");
    let mut workouts = dedup_by_id(
        store.get_list::<WorkoutEntry>(Key::Workouts),
        WorkoutEntry::id,
        "workout",
    );

    // A list whose totals leave the i64 range is as unusable as unparsable JSON
    if !TrackerState::totals_fit(&meals, &[]) {
        tracing::warn!("Stored meals overflow the calorie totals. Treating as empty.");
        meals.clear();
    }
    if !TrackerState::totals_fit(&[], &workouts) {
        tracing::warn!("Stored workouts overflow the calorie totals. Treating as empty.");
        workouts.clear();
    }

    let (state, repaired) = match rebuild(calorie_limit, totals, meals, workouts) {
        Ok(rebuilt) => rebuilt,
        Err(original_limit) => {
            tracing::warn!(
                "Stored data leaves no representable balance. Resetting to limit {}.",
                original_limit
            );
            (TrackerState::with_limit(original_limit), true)
        }
    };
    if repaired {
        tracing::warn!(
            "Stored totals disagree with stored entries; recomputed from {} meals and {} workouts",
            state.meals().len(),
            state.workouts().len()
        );
    }
    state
}

/// Build the state under the stored limit, falling back to the default
/// limit when the stored one cannot hold the balance. Hands the stored
/// limit back when neither fits.
fn rebuild(
    calorie_limit: i64,
    totals: PersistedTotals,
    meals: Vec<MealEntry>,
    workouts: Vec<WorkoutEntry>,
) -> Result<(TrackerState, bool), i64> {
    if let Ok(rebuilt) = TrackerState::from_persisted(calorie_limit, totals, meals.clone(), workouts.clone()) {
        return Ok(rebuilt);
    }
    tracing::warn!(
        "Stored calorie limit {} is out of range for the stored entries. Using default {}.",
        calorie_limit,
        DEFAULT_CALORIE_LIMIT
    );
    TrackerState::from_persisted(DEFAULT_CALORIE_LIMIT, totals, meals, workouts).map_err(|_| calorie_limit)
}

/// Keep the first entry of every id
fn dedup_by_id<T>(entries: Vec<T>, id: fn(&T) -> &str, kind: &str) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(entries.len());
    for entry in entries {
        if seen.insert(id(&entry).to_string()) {
            kept.push(entry);
        } else {
            tracing::warn!("Dropping stored {} with duplicate id '{}'", kind, id(&entry));
        }
    }
    kept
}

/// Writes that persist the meal list and every total derived from it
pub(crate) fn meal_writes(state: &TrackerState) -> StoreResult<Vec<StoreWrite>> {
    Ok(vec![
        StoreWrite::list(Key::Meals, state.meals())?,
        StoreWrite::SetInt(Key::CaloriesConsumed, state.calories_consumed()),
        StoreWrite::SetInt(Key::Protein, state.total_protein()),
        StoreWrite::SetInt(Key::Fat, state.total_fat()),
        StoreWrite::SetInt(Key::Carbohydrate, state.total_carbohydrate()),
    ])
}

/// Writes that persist the workout list and the burned total
pub(crate) fn workout_writes(state: &TrackerState) -> StoreResult<Vec<StoreWrite>> {
    Ok(vec![
        StoreWrite::list(Key::Workouts, state.workouts())?,
        StoreWrite::SetInt(Key::CaloriesBurned, state.calories_burned()),
    ])
}

pub(crate) fn limit_writes(state: &TrackerState) -> Vec<StoreWrite> {
    vec![StoreWrite::SetInt(Key::CalorieLimit, state.calorie_limit())]
}

/// Wipe the store, keeping only the configured limit
pub(crate) fn reset_writes(state: &TrackerState) -> Vec<StoreWrite> {
    vec![
        StoreWrite::ClearAll,
        StoreWrite::SetInt(Key::CalorieLimit, state.calorie_limit()),
    ]
}
