//! Core domain logic for Taskline.
//! This crate is the single source of truth for to-do list state:
//! tasks, filter, theme, and the transient edit session. Presentation
//! layers render from store snapshots and issue commands back in.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Filter, Task, TaskId, Theme};
pub use repo::kv_repo::{KvRepository, RepoError, RepoResult, SqliteKvRepository};
pub use store::task_store::{
    EditSession, StoreError, StoreResult, StoreSnapshot, TaskCounts, TaskStore, TASKS_KEY,
    THEME_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
