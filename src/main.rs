//! Calorie Tracker
//!
//! Loads the durable tracker state and prints the current aggregate as JSON.

use tracing_subscriber::EnvFilter;

use calorie_tracker::config::{Config, DEFAULT_LOG_DIRECTIVE};
use calorie_tracker::store::SqliteStore;
use calorie_tracker::Tracker;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(DEFAULT_LOG_DIRECTIVE.parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    tracing::info!("Database path: {}", config.database_path.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let store = SqliteStore::open(&config.database_path)?;
    let tracker = Tracker::new(store);
    let state = tracker.current_state();

    tracing::info!(
        "{} meals, {} workouts, {} kcal remaining",
        state.meals().len(),
        state.workouts().len(),
        state.calories_remaining()
    );

    println!("{}", serde_json::to_string_pretty(state)?);

    Ok(())
}
