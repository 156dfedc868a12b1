//! Task-list state store.
//!
//! # Responsibility
//! - Own the authoritative task list, filter, theme, and edit session.
//! - Persist every mutation through the key-value repository before the
//!   command returns, so reload always observes the latest state.
//!
//! # Invariants
//! - Task ids are unique and strictly increasing at all times.
//! - Insertion order is preserved; commands never reorder the list.
//! - At most one edit session is open at a time.
//! - Invalid command input (empty text, unknown id) is a silent no-op,
//!   never an error.

use crate::model::task::{Filter, Task, TaskId, Theme};
use crate::repo::kv_repo::{KvRepository, RepoError, RepoResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Storage key holding the JSON-encoded task list.
pub const TASKS_KEY: &str = "tasks";
/// Storage key holding the theme literal (`light` / `dark`).
pub const THEME_KEY: &str = "theme";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for store commands that touch persistence.
#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    Codec(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "failed to encode task list: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Codec(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Transient in-progress edit for exactly one task.
///
/// Lives only between `begin_edit` and `commit_edit`/`cancel_edit`;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Target task id captured when the session opened.
    pub task_id: TaskId,
    /// Draft text, replaced wholesale by `update_edit_draft`.
    pub draft: String,
}

/// Completed/total tally over the full task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCounts {
    pub completed: usize,
    pub total: usize,
}

/// Owned render-ready view of the store for presentation layers.
///
/// Presentation re-renders from this value after each command instead
/// of reaching into shared mutable state.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    /// Tasks passing the current filter, in insertion order.
    pub tasks: Vec<Task>,
    pub counts: TaskCounts,
    /// `completed / total`, `0.0` for an empty list.
    pub progress: f64,
    pub filter: Filter,
    pub theme: Theme,
    pub editing: Option<EditSession>,
}

/// Single source of truth for tasks, filter, theme, and edit state.
///
/// Commands take `&mut self` and run to completion; the store is
/// single-threaded by construction and never observed mid-mutation.
pub struct TaskStore<R: KvRepository> {
    repo: R,
    tasks: Vec<Task>,
    filter: Filter,
    theme: Theme,
    edit: Option<EditSession>,
    last_id: TaskId,
}

impl<R: KvRepository> TaskStore<R> {
    /// Loads a store from the repository.
    ///
    /// # Contract
    /// - A malformed `tasks` value (bad JSON, wrong shape, duplicate
    ///   ids) is discarded: the corrupt entry is deleted, the store
    ///   starts empty, and a warning is logged. Never an error.
    /// - A missing or unrecognized `theme` value defaults to light.
    /// - The filter starts at `All`; no edit session is open.
    pub fn load(repo: R) -> StoreResult<Self> {
        let tasks = match repo.get(TASKS_KEY)? {
            Some(raw) => match decode_tasks(&raw) {
                Ok(tasks) => tasks,
                Err(reason) => {
                    warn!(
                        "event=store_load module=store status=recovered \
                         error_code=malformed_tasks reason={reason}"
                    );
                    repo.delete(TASKS_KEY)?;
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let theme = match repo.get(THEME_KEY)? {
            Some(raw) => parse_theme(&raw).unwrap_or_default(),
            None => Theme::default(),
        };

        info!(
            "event=store_load module=store status=ok tasks={} theme={}",
            tasks.len(),
            theme_to_db(theme)
        );

        let last_id = tasks.iter().map(|task| task.id).max().unwrap_or(0);

        Ok(Self {
            repo,
            tasks,
            filter: Filter::default(),
            theme,
            edit: None,
            last_id,
        })
    }

    // ---- commands ----

    /// Appends a new pending task with the trimmed text.
    ///
    /// # Contract
    /// - Text that is empty after trimming is ignored: no task is
    ///   created, nothing is persisted, and `Ok(None)` is returned.
    /// - On success returns the freshly assigned id.
    pub fn add_task(&mut self, text: &str) -> StoreResult<Option<TaskId>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let id = self.next_id();
        self.tasks.push(Task::new(id, trimmed));
        self.persist_tasks()?;
        Ok(Some(id))
    }

    /// Flips the completion flag of the matching task.
    ///
    /// Returns whether a task matched; unknown ids are a no-op and
    /// trigger no persistence write.
    pub fn toggle_task(&mut self, id: TaskId) -> StoreResult<bool> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(false);
        };

        task.toggle();
        self.persist_tasks()?;
        Ok(true)
    }

    /// Opens an edit session seeded with the task's current text.
    ///
    /// Any previously open session is discarded. Unknown ids leave the
    /// store untouched, including an already-open session.
    pub fn begin_edit(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.iter().find(|task| task.id == id) {
            self.edit = Some(EditSession {
                task_id: id,
                draft: task.text.clone(),
            });
        }
    }

    /// Replaces the draft text of the open edit session.
    ///
    /// No-op when no session is open.
    pub fn update_edit_draft(&mut self, text: impl Into<String>) {
        if let Some(edit) = self.edit.as_mut() {
            edit.draft = text.into();
        }
    }

    /// Commits the open edit session.
    ///
    /// # Contract
    /// - A draft that is empty after trimming cancels the edit: the
    ///   task keeps its text and nothing is persisted.
    /// - Otherwise the target task's text becomes the trimmed draft.
    /// - The session always closes, even when the target task has been
    ///   deleted since the session opened.
    ///
    /// Returns whether a task was mutated.
    pub fn commit_edit(&mut self) -> StoreResult<bool> {
        let Some(edit) = self.edit.take() else {
            return Ok(false);
        };

        let trimmed = edit.draft.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let Some(task) = self.tasks.iter_mut().find(|task| task.id == edit.task_id) else {
            return Ok(false);
        };

        task.rename(trimmed);
        self.persist_tasks()?;
        Ok(true)
    }

    /// Closes the open edit session without mutating any task.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Removes the matching task from the list.
    ///
    /// Returns whether a task matched; unknown ids are a no-op and
    /// trigger no persistence write.
    pub fn delete_task(&mut self, id: TaskId) -> StoreResult<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }

        self.persist_tasks()?;
        Ok(true)
    }

    /// Removes every completed task and returns how many were removed.
    ///
    /// Persists unconditionally; calling this on a list without
    /// completed tasks is an idempotent rewrite of the same state.
    pub fn clear_completed(&mut self) -> StoreResult<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        self.persist_tasks()?;
        Ok(before - self.tasks.len())
    }

    /// Replaces the current filter. Pure state change, nothing persisted.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Replaces the current theme and persists it under its own key.
    pub fn set_theme(&mut self, theme: Theme) -> StoreResult<()> {
        self.theme = theme;
        self.repo.put(THEME_KEY, theme_to_db(theme))?;
        Ok(())
    }

    /// Flips light/dark and persists; returns the new theme.
    pub fn toggle_theme(&mut self) -> StoreResult<Theme> {
        let next = self.theme.toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    // ---- derived views ----

    /// Tasks passing the current filter, in insertion order.
    ///
    /// Recomputed on demand; the list is small enough that caching
    /// would only add an invalidation policy with no payoff.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| self.filter.matches(task))
            .collect()
    }

    /// Completed/total tally over the full list, ignoring the filter.
    pub fn counts(&self) -> TaskCounts {
        TaskCounts {
            completed: self.tasks.iter().filter(|task| task.completed).count(),
            total: self.tasks.len(),
        }
    }

    /// Fraction of completed tasks; `0.0` for an empty list.
    pub fn progress_ratio(&self) -> f64 {
        let counts = self.counts();
        if counts.total == 0 {
            return 0.0;
        }
        counts.completed as f64 / counts.total as f64
    }

    /// Owned render-ready view of the current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            tasks: self.visible_tasks().into_iter().cloned().collect(),
            counts: self.counts(),
            progress: self.progress_ratio(),
            filter: self.filter,
            theme: self.theme,
            editing: self.edit.clone(),
        }
    }

    /// Full ordered task list, unfiltered.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// The open edit session, if any.
    pub fn editing(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    // ---- internals ----

    /// Assigns the next task id.
    ///
    /// Epoch milliseconds, bumped past the previous id when two
    /// creations land in the same millisecond. Ids stay unique and
    /// strictly increasing for the lifetime of the stored list.
    fn next_id(&mut self) -> TaskId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
            });

        let id = now.max(self.last_id + 1);
        self.last_id = id;
        id
    }

    fn persist_tasks(&self) -> StoreResult<()> {
        let encoded = serde_json::to_string(&self.tasks).map_err(StoreError::Codec)?;
        self.repo.put(TASKS_KEY, &encoded)?;
        Ok(())
    }
}

/// Decodes the persisted task blob, rejecting shapes that would break
/// store invariants.
fn decode_tasks(raw: &str) -> Result<Vec<Task>, String> {
    let tasks: Vec<Task> =
        serde_json::from_str(raw).map_err(|err| format!("invalid_json:{err}"))?;

    let mut seen = std::collections::HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(task.id) {
            return Err(format!("duplicate_id:{}", task.id));
        }
    }

    Ok(tasks)
}

fn theme_to_db(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    }
}

fn parse_theme(value: &str) -> Option<Theme> {
    match value {
        "light" => Some(Theme::Light),
        "dark" => Some(Theme::Dark),
        _ => None,
    }
}

/// In-memory repository for unit tests and throwaway stores.
#[cfg(test)]
pub(crate) mod memory {
    use super::{KvRepository, RepoResult};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct MemoryKvRepository {
        entries: RefCell<HashMap<String, String>>,
    }

    impl KvRepository for MemoryKvRepository {
        fn get(&self, key: &str) -> RepoResult<Option<String>> {
            Ok(self.entries.borrow().get(key).cloned())
        }

        fn put(&self, key: &str, value: &str) -> RepoResult<()> {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn delete(&self, key: &str) -> RepoResult<()> {
            self.entries.borrow_mut().remove(key);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryKvRepository;
    use super::{decode_tasks, parse_theme, theme_to_db, KvRepository, TaskStore, TASKS_KEY};
    use crate::model::task::Theme;

    #[test]
    fn decode_tasks_rejects_duplicate_ids() {
        let raw = r#"[{"id":1,"text":"a","completed":false},
                      {"id":1,"text":"b","completed":true}]"#;
        let err = decode_tasks(raw).unwrap_err();
        assert!(err.starts_with("duplicate_id:"));
    }

    #[test]
    fn decode_tasks_rejects_wrong_shape() {
        assert!(decode_tasks(r#"{"not":"a list"}"#).is_err());
        assert!(decode_tasks(r#"[{"id":"one","text":"a","completed":false}]"#).is_err());
    }

    #[test]
    fn theme_mapping_is_exhaustive_and_strict() {
        assert_eq!(parse_theme("light"), Some(Theme::Light));
        assert_eq!(parse_theme("dark"), Some(Theme::Dark));
        assert_eq!(parse_theme("solarized"), None);
        assert_eq!(theme_to_db(Theme::Dark), "dark");
    }

    #[test]
    fn ids_stay_unique_within_the_same_millisecond() {
        let mut store = TaskStore::load(MemoryKvRepository::default()).unwrap();
        let first = store.add_task("a").unwrap().unwrap();
        let second = store.add_task("b").unwrap().unwrap();
        assert!(second > first);
    }

    #[test]
    fn malformed_blob_is_discarded_on_load() {
        let repo = MemoryKvRepository::default();
        repo.put(TASKS_KEY, "{definitely not json").unwrap();

        let store = TaskStore::load(repo).unwrap();
        assert!(store.tasks().is_empty());
        // The corrupt entry must be gone so the next write starts clean.
        assert_eq!(store.repo.get(TASKS_KEY).unwrap(), None);
    }
}
