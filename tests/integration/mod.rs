//! Integration tests for uichrome
//!
//! These tests drive a store through its public surface together with a
//! navigation bus, a mock capability probe and persisted slots.

#[path = "../common/mod.rs"]
pub mod common;

pub mod persistence_flow;
pub mod store_lifecycle;
