//! Core state store.
//!
//! # Responsibility
//! - Orchestrate task/theme state transitions into use-case level APIs.
//! - Keep presentation layers decoupled from storage details.
//!
//! # Invariants
//! - All mutations flow through `TaskStore` commands; persisted and
//!   in-memory state converge after every command.

pub mod task_store;
