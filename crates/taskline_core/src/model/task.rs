//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its persisted JSON shape.
//! - Define the view filter and theme enumerations.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `text` is non-empty after trimming once a task has been created.

use serde::{Deserialize, Serialize};

/// Stable identifier for a task.
///
/// Assigned from the creation timestamp in Unix epoch milliseconds and
/// bumped when two creations collide, so ids stay unique and strictly
/// increasing. Kept as a type alias to make semantic intent explicit in
/// signatures.
pub type TaskId = i64;

/// A single to-do item.
///
/// Serialized exactly as `{"id": <number>, "text": <string>,
/// "completed": <bool>}` to match the persisted storage shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable id used for lookups and identity across reloads.
    pub id: TaskId,
    /// User-entered text, trimmed at creation and on every edit.
    pub text: String,
    /// Completion flag toggled by the user.
    pub completed: bool,
}

impl Task {
    /// Creates a new pending task with a caller-provided id.
    ///
    /// Trimming and non-empty validation happen in the store before
    /// this constructor runs; the text is stored as given.
    pub fn new(id: TaskId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
        }
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }

    /// Replaces the task text.
    pub fn rename(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

/// View predicate over the task list.
///
/// Session state only; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every task, regardless of completion.
    #[default]
    All,
    /// Only tasks with `completed == false`.
    Pending,
    /// Only tasks with `completed == true`.
    Completed,
}

impl Filter {
    /// Returns whether a task passes this filter.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

/// Visual theme selection, persisted independently of tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Default when no prior value exists.
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Returns the opposite theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}
