//! dealbot storage crate - SQLite-backed key-value persistence.
//!
//! Provides a WAL-mode SQLite database with migrations and the
//! `KeyValueStore` abstraction the conversation log is persisted through.

pub mod db;
pub mod kv;
pub mod migrations;

pub use db::Database;
pub use kv::{KeyValueStore, MemoryKvStore, SqliteKvStore};
