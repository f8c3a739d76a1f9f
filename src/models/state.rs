//! Tracker aggregate
//!
//! Running totals, derived balance values and the ordered entry lists for
//! the current session.

use serde::Serialize;

use super::{MealEntry, ValidationError, WorkoutEntry};

/// Calorie limit used until the user configures one
pub const DEFAULT_CALORIE_LIMIT: i64 = 2000;

/// Snapshot of the tracker aggregate.
///
/// Only the tracker can change it; callers get shared references or clones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerState {
    calorie_limit: i64,
    calories_consumed: i64,
    calories_burned: i64,
    calorie_balance: i64,
    calories_remaining: i64,
    total_protein: i64,
    total_fat: i64,
    total_carbohydrate: i64,
    meals: Vec<MealEntry>,
    workouts: Vec<WorkoutEntry>,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self::with_limit(DEFAULT_CALORIE_LIMIT)
    }
}

impl TrackerState {
    /// Empty state under the given limit
    pub fn with_limit(calorie_limit: i64) -> Self {
        Self {
            calorie_limit,
            calories_consumed: 0,
            calories_burned: 0,
            calorie_balance: 0,
            calories_remaining: calorie_limit,
            total_protein: 0,
            total_fat: 0,
            total_carbohydrate: 0,
            meals: Vec::new(),
            workouts: Vec::new(),
        }
    }

    pub fn calorie_limit(&self) -> i64 {
        self.calorie_limit
    }

    pub fn calories_consumed(&self) -> i64 {
        self.calories_consumed
    }

    pub fn calories_burned(&self) -> i64 {
        self.calories_burned
    }

    /// Consumed minus burned
    pub fn calorie_balance(&self) -> i64 {
        self.calorie_balance
    }

    /// Limit minus balance; negative once the limit is exceeded
    pub fn calories_remaining(&self) -> i64 {
        self.calories_remaining
    }

    pub fn total_protein(&self) -> i64 {
        self.total_protein
    }

    pub fn total_fat(&self) -> i64 {
        self.total_fat
    }

    pub fn total_carbohydrate(&self) -> i64 {
        self.total_carbohydrate
    }

    /// Meals in the order they were logged
    pub fn meals(&self) -> &[MealEntry] {
        &self.meals
    }

    /// Workouts in the order they were logged
    pub fn workouts(&self) -> &[WorkoutEntry] {
        &self.workouts
    }

    pub fn meal(&self, id: &str) -> Option<&MealEntry> {
        self.meals.iter().find(|m| m.id() == id)
    }

    pub fn workout(&self, id: &str) -> Option<&WorkoutEntry> {
        self.workouts.iter().find(|w| w.id() == id)
    }

    /// True once nothing of the limit is left
    pub fn is_over_limit(&self) -> bool {
        self.calories_remaining <= 0
    }

    /// Share of the limit used by the balance, clamped to 0..=100
    pub fn progress_percent(&self) -> f64 {
        if self.calorie_limit == 0 {
            return if self.calorie_balance > 0 { 100.0 } else { 0.0 };
        }
        let percent = self.calorie_balance as f64 / self.calorie_limit as f64 * 100.0;
        percent.clamp(0.0, 100.0)
    }

    /// Check every running total against the entry lists.
    ///
    /// Holds after every tracker operation; a `false` here means the
    /// aggregate was built from inconsistent data.
    pub fn is_consistent(&self) -> bool {
        let Some(sums) = Sums::of(&self.meals, &self.workouts) else {
            return false;
        };
        let derived = derive(self.calorie_limit, self.calories_consumed, self.calories_burned);
        let unique_meals = has_unique_ids(self.meals.iter().map(MealEntry::id));
        let unique_workouts = has_unique_ids(self.workouts.iter().map(WorkoutEntry::id));

        self.calories_consumed == sums.consumed
            && self.calories_burned == sums.burned
            && self.total_protein == sums.protein
            && self.total_fat == sums.fat
            && self.total_carbohydrate == sums.carbohydrate
            && derived == Ok((self.calorie_balance, self.calories_remaining))
            && unique_meals
            && unique_workouts
    }

    // ------------------------------------------------------------------
    // Mutations, reachable only through the tracker
    // ------------------------------------------------------------------

    /// Rebuild a state from persisted totals and lists.
    ///
    /// The lists win over the totals: any mismatch is repaired from the
    /// entries and reported through the returned flag. Fails when the lists
    /// or the limit push a total out of range.
    pub(crate) fn from_persisted(
        calorie_limit: i64,
        totals: PersistedTotals,
        meals: Vec<MealEntry>,
        workouts: Vec<WorkoutEntry>,
    ) -> Result<(Self, bool), ValidationError> {
        let sums = Sums::of(&meals, &workouts).ok_or(ValidationError::TotalOverflow)?;
        let (calorie_balance, calories_remaining) = derive(calorie_limit, sums.consumed, sums.burned)?;
        let repaired = totals != sums.as_totals();

        let state = Self {
            calorie_limit,
            calories_consumed: sums.consumed,
            calories_burned: sums.burned,
            calorie_balance,
            calories_remaining,
            total_protein: sums.protein,
            total_fat: sums.fat,
            total_carbohydrate: sums.carbohydrate,
            meals,
            workouts,
        };
        Ok((state, repaired))
    }

    /// Whether the lists' totals fit in range
    pub(crate) fn totals_fit(meals: &[MealEntry], workouts: &[WorkoutEntry]) -> bool {
        Sums::of(meals, workouts).is_some()
    }

    // Each mutation checks its arithmetic before touching any field, so an
    // overflow leaves the state as it was.

    pub(crate) fn push_meal(&mut self, meal: MealEntry) -> Result<(), ValidationError> {
        let consumed = checked(self.calories_consumed.checked_add(meal.calories()))?;
        let protein = checked(self.total_protein.checked_add(meal.protein()))?;
        let fat = checked(self.total_fat.checked_add(meal.fat()))?;
        let carbohydrate = checked(self.total_carbohydrate.checked_add(meal.carbohydrate()))?;
        let (balance, remaining) = derive(self.calorie_limit, consumed, self.calories_burned)?;

        self.calories_consumed = consumed;
        self.total_protein = protein;
        self.total_fat = fat;
        self.total_carbohydrate = carbohydrate;
        self.calorie_balance = balance;
        self.calories_remaining = remaining;
        self.meals.push(meal);
        Ok(())
    }

    pub(crate) fn take_meal(&mut self, id: &str) -> Result<Option<MealEntry>, ValidationError> {
        let Some(index) = self.meals.iter().position(|m| m.id() == id) else {
            return Ok(None);
        };
        let meal = &self.meals[index];
        let consumed = checked(self.calories_consumed.checked_sub(meal.calories()))?;
        let protein = checked(self.total_protein.checked_sub(meal.protein()))?;
        let fat = checked(self.total_fat.checked_sub(meal.fat()))?;
        let carbohydrate = checked(self.total_carbohydrate.checked_sub(meal.carbohydrate()))?;
        let (balance, remaining) = derive(self.calorie_limit, consumed, self.calories_burned)?;

        self.calories_consumed = consumed;
        self.total_protein = protein;
        self.total_fat = fat;
        self.total_carbohydrate = carbohydrate;
        self.calorie_balance = balance;
        self.calories_remaining = remaining;
        Ok(Some(self.meals.remove(index)))
    }

    pub(crate) fn push_workout(&mut self, workout: WorkoutEntry) -> Result<(), ValidationError> {
        let burned = checked(self.calories_burned.checked_add(workout.calories()))?;
        let (balance, remaining) = derive(self.calorie_limit, self.calories_consumed, burned)?;

        self.calories_burned = burned;
        self.calorie_balance = balance;
        self.calories_remaining = remaining;
        self.workouts.push(workout);
        Ok(())
    }

    /// Removing burned calories can push the balance up past what the
    /// limit leaves room for, so this is fallible too.
    pub(crate) fn take_workout(&mut self, id: &str) -> Result<Option<WorkoutEntry>, ValidationError> {
        let Some(index) = self.workouts.iter().position(|w| w.id() == id) else {
            return Ok(None);
        };
        let burned = checked(self.calories_burned.checked_sub(self.workouts[index].calories()))?;
        let (balance, remaining) = derive(self.calorie_limit, self.calories_consumed, burned)?;

        self.calories_burned = burned;
        self.calorie_balance = balance;
        self.calories_remaining = remaining;
        Ok(Some(self.workouts.remove(index)))
    }

    pub(crate) fn set_limit(&mut self, calorie_limit: i64) -> Result<(), ValidationError> {
        let (balance, remaining) = derive(calorie_limit, self.calories_consumed, self.calories_burned)?;
        self.calorie_limit = calorie_limit;
        self.calorie_balance = balance;
        self.calories_remaining = remaining;
        Ok(())
    }
}

/// Balance and remaining, always fully recomputed from consumed, burned and limit
fn derive(calorie_limit: i64, consumed: i64, burned: i64) -> Result<(i64, i64), ValidationError> {
    let balance = checked(consumed.checked_sub(burned))?;
    let remaining = checked(calorie_limit.checked_sub(balance))?;
    Ok((balance, remaining))
}

fn checked(value: Option<i64>) -> Result<i64, ValidationError> {
    value.ok_or(ValidationError::TotalOverflow)
}

/// Running totals as they were found in the store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct PersistedTotals {
    pub consumed: i64,
    pub burned: i64,
    pub protein: i64,
    pub fat: i64,
    pub carbohydrate: i64,
}

struct Sums {
    consumed: i64,
    burned: i64,
    protein: i64,
    fat: i64,
    carbohydrate: i64,
}

impl Sums {
    /// `None` when any total leaves the i64 range
    fn of(meals: &[MealEntry], workouts: &[WorkoutEntry]) -> Option<Self> {
        Some(Self {
            consumed: checked_sum(meals.iter().map(MealEntry::calories))?,
            burned: checked_sum(workouts.iter().map(WorkoutEntry::calories))?,
            protein: checked_sum(meals.iter().map(MealEntry::protein))?,
            fat: checked_sum(meals.iter().map(MealEntry::fat))?,
            carbohydrate: checked_sum(meals.iter().map(MealEntry::carbohydrate))?,
        })
    }

    fn as_totals(&self) -> PersistedTotals {
        PersistedTotals {
            consumed: self.consumed,
            burned: self.burned,
            protein: self.protein,
            fat: self.fat,
            carbohydrate: self.carbohydrate,
        }
    }
}

fn checked_sum(values: impl Iterator<Item = i64>) -> Option<i64> {
    values.into_iter().try_fold(0i64, i64::checked_add)
}

fn has_unique_ids<'a>(ids: impl Iterator<Item = &'a str>) -> bool {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().all(|id| seen.insert(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Macros;

    #[test]
    fn test_default_state() {
        let state = TrackerState::default();
        assert_eq!(state.calorie_limit(), 2000);
        assert_eq!(state.calorie_balance(), 0);
        assert_eq!(state.calories_remaining(), 2000);
        assert!(state.is_consistent());
        assert!(!state.is_over_limit());
    }

    #[test]
    fn test_push_and_take_meal() {
        let mut state = TrackerState::default();
        let meal = MealEntry::with_id("m1", "pasta", 700, Macros::new(25, 15, 90)).unwrap();
        state.push_meal(meal).unwrap();
        assert_eq!(state.calories_consumed(), 700);
        assert_eq!(state.total_carbohydrate(), 90);
        assert_eq!(state.calories_remaining(), 1300);
        assert!(state.is_consistent());

        assert!(state.take_meal("missing").unwrap().is_none());
        let taken = state.take_meal("m1").unwrap().unwrap();
        assert_eq!(taken.name(), "pasta");
        assert_eq!(state, TrackerState::default());
    }

    #[test]
    fn test_progress_percent() {
        let mut state = TrackerState::default();
        state.push_meal(MealEntry::with_id("m1", "lunch", 500, Macros::default()).unwrap()).unwrap();
        assert!((state.progress_percent() - 25.0).abs() < f64::EPSILON);

        state.push_meal(MealEntry::with_id("m2", "feast", 3000, Macros::default()).unwrap()).unwrap();
        assert_eq!(state.progress_percent(), 100.0);
        assert!(state.is_over_limit());

        state.push_workout(WorkoutEntry::with_id("w1", "marathon", 5000).unwrap()).unwrap();
        assert_eq!(state.progress_percent(), 0.0);

        let mut zero = TrackerState::with_limit(0);
        assert_eq!(zero.progress_percent(), 0.0);
        assert!(zero.is_over_limit());
        zero.push_meal(MealEntry::with_id("m1", "snack", 10, Macros::default()).unwrap()).unwrap();
        assert_eq!(zero.progress_percent(), 100.0);
    }

    #[test]
    fn test_overflowing_mutations_leave_state_untouched() {
        let mut state = TrackerState::default();
        state.push_meal(MealEntry::with_id("m1", "huge", i64::MAX, Macros::default()).unwrap()).unwrap();
        let before = state.clone();

        let one_more = MealEntry::with_id("m2", "crumb", 1, Macros::default()).unwrap();
        assert_eq!(state.push_meal(one_more), Err(ValidationError::TotalOverflow));
        assert_eq!(state, before);

        let mut state = TrackerState::default();
        state.push_workout(WorkoutEntry::with_id("w1", "run", 300).unwrap()).unwrap();
        let before = state.clone();
        assert_eq!(state.set_limit(i64::MAX), Err(ValidationError::TotalOverflow));
        assert_eq!(state, before);

        // Limit i64::MAX with a positive balance fits; dropping the meal would not
        let mut state = TrackerState::default();
        state.push_workout(WorkoutEntry::with_id("w1", "run", 300).unwrap()).unwrap();
        state.push_meal(MealEntry::with_id("m1", "pie", 500, Macros::default()).unwrap()).unwrap();
        state.set_limit(i64::MAX).unwrap();
        let before = state.clone();
        assert_eq!(state.take_meal("m1"), Err(ValidationError::TotalOverflow));
        assert_eq!(state, before);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_from_persisted_repairs_totals() {
        let meals = vec![MealEntry::with_id("m1", "oats", 300, Macros::new(10, 5, 50)).unwrap()];
        let stale = PersistedTotals {
            consumed: 900,
            ..PersistedTotals::default()
        };
        let (state, repaired) = TrackerState::from_persisted(1800, stale, meals, Vec::new()).unwrap();
        assert!(repaired);
        assert_eq!(state.calories_consumed(), 300);
        assert_eq!(state.total_protein(), 10);
        assert_eq!(state.calories_remaining(), 1500);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_from_persisted_rejects_out_of_range() {
        let workouts = vec![WorkoutEntry::with_id("w1", "walk", 1).unwrap()];
        let result = TrackerState::from_persisted(i64::MAX, PersistedTotals::default(), Vec::new(), workouts);
        assert_eq!(result.unwrap_err(), ValidationError::TotalOverflow);

        let meals = vec![
            MealEntry::with_id("m1", "a", i64::MAX, Macros::default()).unwrap(),
            MealEntry::with_id("m2", "b", 1, Macros::default()).unwrap(),
        ];
        let result = TrackerState::from_persisted(2000, PersistedTotals::default(), meals, Vec::new());
        assert_eq!(result.unwrap_err(), ValidationError::TotalOverflow);
    }

    #[test]
    fn test_duplicate_ids_are_inconsistent() {
        let meal = MealEntry::with_id("dup", "egg", 80, Macros::default()).unwrap();
        let (state, _) = TrackerState::from_persisted(
            2000,
            PersistedTotals {
                consumed: 160,
                ..PersistedTotals::default()
            },
            vec![meal.clone(), meal],
            Vec::new(),
        )
        .unwrap();
        assert!(!state.is_consistent());
    }
}
