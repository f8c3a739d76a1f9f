//! Database module
//!
//! Handles the SQLite connection pool and schema migrations backing the
//! durable key-value store.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};
