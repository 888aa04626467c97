//! Shared test utilities for uichrome
//!
//! Fixtures that build a store wired to an in-process navigation bus and
//! either an in-memory or an on-disk persisted slot.

pub mod fixtures;
