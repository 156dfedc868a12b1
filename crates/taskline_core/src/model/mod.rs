//! Domain model for the to-do list core.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the persisted JSON shape of a task in one place.
//!
//! # Invariants
//! - Every task is identified by a unique `TaskId`.
//! - Task text is non-empty and trimmed after creation.

pub mod task;
