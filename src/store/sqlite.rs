//! SQLite store backend
//!
//! Keeps each tracker field as one row of the `kv` table.

use std::path::Path;

use rusqlite::{params, Connection};

use super::{Key, PersistentStore, StoreResult, StoreWrite};
use crate::db::{migrations, Database, DbResult};

/// Durable store over a pooled SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    database: Database,
}

impl SqliteStore {
    /// Open (or create) the store at `path` and bring its schema up to date
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::from_database(Database::new(path)?)
    }

    /// Open a store that vanishes with the process
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_database(Database::open_in_memory()?)
    }

    /// Wrap an existing pool, running migrations first when the schema is behind
    pub fn from_database(database: Database) -> StoreResult<Self> {
        database.with_conn(|conn| {
            if migrations::needs_migration(conn)? {
                tracing::info!(
                    "Migrating store schema from version {}",
                    migrations::get_schema_version(conn)?
                );
                migrations::run_migrations(conn)?;
            }
            tracing::debug!("Store schema version: {}", migrations::get_schema_version(conn)?);
            Ok(())
        })?;

        Ok(Self { database })
    }
}

fn read_value(conn: &Connection, key: Key) -> DbResult<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;

    let result = stmt.query_row([key.as_str()], |row| row.get::<_, String>(0));
    match result {
        Ok(value) => Ok(Some(value)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_value(conn: &Connection, key: Key, value: &str) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO kv (key, value) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
        params![key.as_str(), value],
    )?;
    Ok(())
}

fn delete_all(conn: &Connection) -> DbResult<()> {
    conn.execute("DELETE FROM kv", [])?;
    Ok(())
}

impl PersistentStore for SqliteStore {
    fn get_raw(&self, key: Key) -> StoreResult<Option<String>> {
        Ok(self.database.with_conn(|conn| read_value(conn, key))?)
    }

    fn set_raw(&mut self, key: Key, value: String) -> StoreResult<()> {
        Ok(self.database.with_conn(|conn| write_value(conn, key, &value))?)
    }

    fn clear_all(&mut self) -> StoreResult<()> {
        Ok(self.database.with_conn(delete_all)?)
    }

    fn write_batch(&mut self, writes: &[StoreWrite]) -> StoreResult<()> {
        self.database.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            for write in writes {
                match write {
                    StoreWrite::SetInt(key, value) => write_value(&tx, *key, &value.to_string())?,
                    StoreWrite::SetList(key, encoded) => write_value(&tx, *key, encoded)?,
                    StoreWrite::ClearAll => delete_all(&tx)?,
                }
            }
            tx.commit()?;
            Ok(())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Macros, MealEntry};
    use crate::store::StoreError;

    #[test]
    fn test_in_memory_store() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get_raw(Key::CalorieLimit).unwrap(), None);

        store.set_int(Key::CalorieLimit, 1750).unwrap();
        store.set_int(Key::CalorieLimit, 1600).unwrap();
        assert_eq!(store.get_int(Key::CalorieLimit, 2000), 1600);

        store.clear_all().unwrap();
        assert_eq!(store.get_int(Key::CalorieLimit, 2000), 2000);
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("tracker.db");

        let meals = vec![MealEntry::with_id("m1", "soup", 220, Macros::new(9, 6, 30)).unwrap()];
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store
                .write_batch(&[
                    StoreWrite::list(Key::Meals, &meals).unwrap(),
                    StoreWrite::SetInt(Key::CaloriesConsumed, 220),
                ])
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get_int(Key::CaloriesConsumed, 0), 220);
        assert_eq!(store.get_list::<MealEntry>(Key::Meals), meals);
    }

    #[test]
    fn test_open_rejects_broken_schema_table() {
        let database = Database::open_in_memory().unwrap();
        database
            .with_conn(|conn| {
                conn.execute("CREATE TABLE schema_migrations (id INTEGER)", [])?;
                Ok(())
            })
            .unwrap();

        assert!(matches!(
            SqliteStore::from_database(database),
            Err(StoreError::Database(_))
        ));
    }

    #[test]
    fn test_batch_clear_then_set() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.set_int(Key::Fat, 40).unwrap();
        store.set_int(Key::CalorieLimit, 2200).unwrap();

        store
            .write_batch(&[StoreWrite::ClearAll, StoreWrite::SetInt(Key::CalorieLimit, 2200)])
            .unwrap();

        assert_eq!(store.get_raw(Key::Fat).unwrap(), None);
        assert_eq!(store.get_int(Key::CalorieLimit, 2000), 2200);
    }
}
