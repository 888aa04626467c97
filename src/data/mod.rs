//! Persistence layer for UI state snapshots
//!
//! This module provides SQLite-backed and in-memory key-value slots.

mod database;
mod schema;
mod slot;

pub use database::{Database, DatabaseError};
pub use slot::{MemorySlot, PersistedSlot, SlotError, SqliteSlot};
