//! Authoritative in-memory task list mirrored to a [`BackingStore`].

use std::fmt;

use thiserror::Error;
use ticklist_core::{
    CodecError, FilterMode, SortMode, Task, TaskDraft, TaskId, ViewPreferences, decode_tasks,
    encode_tasks,
};
use ticklist_hooks::{CueContext, FeedbackCue, FeedbackSink, NoFeedback};
use tracing::{debug, info, warn};

use crate::backing::BackingStore;

/// Key holding the serialized task collection.
pub const TASKS_KEY: &str = "tasks";
/// Key holding the raw filter selection.
pub const FILTER_KEY: &str = "filter";
/// Key holding the raw sort selection.
pub const SORT_KEY: &str = "sort";
/// Key owned by the appearance layer; shares the store but is never written here.
pub const THEME_KEY: &str = "theme";

/// Errors surfaced by [`TaskStore`].
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Reading or writing the backing store failed.
    #[error("persistence failed: {0:#}")]
    Persistence(anyhow::Error),
    /// The in-memory collection could not be encoded.
    #[error(transparent)]
    Encode(#[from] CodecError),
}

/// Why a request left the store untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skipped {
    /// Task text was empty after trimming.
    EmptyText,
    /// No task has the requested id.
    MissingTask(TaskId),
}

/// Outcome of a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// A task was inserted at the front.
    Created(TaskId),
    /// Editable fields of a task were replaced.
    Updated(TaskId),
    /// Completion flag flipped to `completed`.
    Toggled {
        /// Target task.
        id: TaskId,
        /// New value of the flag.
        completed: bool,
    },
    /// A task was removed.
    Deleted(TaskId),
    /// Completed tasks were purged.
    Cleared {
        /// How many tasks were removed (possibly zero).
        removed: usize,
    },
    /// Filter selection changed.
    FilterChanged(FilterMode),
    /// Sort selection changed.
    SortChanged(SortMode),
    /// Nothing happened; the request was silently ignored.
    Skipped(Skipped),
}

impl Mutation {
    /// Whether the request changed anything.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Owns the task collection and view preferences.
///
/// Every accepted mutation is written to the backing store before the call
/// returns; the store is never read again after [`TaskStore::open`].
pub struct TaskStore<S> {
    backing: S,
    tasks: Vec<Task>,
    preferences: ViewPreferences,
    feedback: Box<dyn FeedbackSink>,
}

impl<S> fmt::Debug for TaskStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks)
            .field("preferences", &self.preferences)
            .finish_non_exhaustive()
    }
}

impl<S> TaskStore<S> {
    /// Replace the feedback sink (defaults to [`NoFeedback`]).
    #[must_use]
    pub fn with_feedback(mut self, sink: impl FeedbackSink + 'static) -> Self {
        self.feedback = Box::new(sink);
        self
    }

    /// Tasks in baseline order (newest first).
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Current view selections.
    #[must_use]
    pub const fn preferences(&self) -> &ViewPreferences {
        &self.preferences
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Borrow the backing store.
    #[must_use]
    pub const fn backing(&self) -> &S {
        &self.backing
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn emit(&self, cue: FeedbackCue, task: &Task) {
        self.feedback.emit(cue, &CueContext::new(cue, task));
    }
}

impl<S: BackingStore> TaskStore<S> {
    /// Load state from `backing`.
    ///
    /// A missing or corrupt task mirror yields an empty list; absent view
    /// selections fall back to `all` / `default`.
    ///
    /// # Errors
    /// Returns an error only if the backing store itself fails.
    pub fn open(backing: S) -> Result<Self, TaskStoreError> {
        let tasks = match read(&backing, TASKS_KEY)? {
            None => Vec::new(),
            Some(raw) => decode_mirror(&raw),
        };
        let filter = read_lossy(&backing, FILTER_KEY)?;
        let sort = read_lossy(&backing, SORT_KEY)?;
        let preferences = ViewPreferences::from_persisted(filter.as_deref(), sort.as_deref());
        info!(
            tasks = tasks.len(),
            filter = %preferences.filter,
            sort = %preferences.sort,
            "Loaded task store"
        );
        Ok(Self {
            backing,
            tasks,
            preferences,
            feedback: Box::new(NoFeedback),
        })
    }

    /// Create a task from `draft` and insert it at the front.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub fn create_task(&mut self, draft: TaskDraft) -> Result<Mutation, TaskStoreError> {
        let latest = self.tasks.iter().map(|task| task.id).max();
        let id = TaskId::next_after(latest);
        let Some(task) = Task::from_draft(id, draft) else {
            return Ok(Mutation::Skipped(Skipped::EmptyText));
        };
        self.tasks.insert(0, task);
        self.persist()?;
        info!(%id, "Created task");
        self.emit(FeedbackCue::Add, &self.tasks[0]);
        Ok(Mutation::Created(id))
    }

    /// Replace text, due date and priority of task `id`.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub fn update_task(&mut self, id: TaskId, draft: TaskDraft) -> Result<Mutation, TaskStoreError> {
        let Some(index) = self.position(id) else {
            return Ok(Mutation::Skipped(Skipped::MissingTask(id)));
        };
        if !self.tasks[index].apply_draft(draft) {
            return Ok(Mutation::Skipped(Skipped::EmptyText));
        }
        self.persist()?;
        debug!(%id, "Updated task");
        Ok(Mutation::Updated(id))
    }

    /// Flip the completion flag of task `id`.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub fn toggle_completed(&mut self, id: TaskId) -> Result<Mutation, TaskStoreError> {
        let Some(index) = self.position(id) else {
            return Ok(Mutation::Skipped(Skipped::MissingTask(id)));
        };
        let completed = !self.tasks[index].completed;
        self.tasks[index].completed = completed;
        self.persist()?;
        debug!(%id, completed, "Toggled task");
        if completed {
            self.emit(FeedbackCue::Complete, &self.tasks[index]);
        }
        Ok(Mutation::Toggled { id, completed })
    }

    /// Remove task `id`.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub fn delete_task(&mut self, id: TaskId) -> Result<Mutation, TaskStoreError> {
        let Some(index) = self.position(id) else {
            return Ok(Mutation::Skipped(Skipped::MissingTask(id)));
        };
        let removed = self.tasks.remove(index);
        self.persist()?;
        info!(%id, "Deleted task");
        self.emit(FeedbackCue::Delete, &removed);
        Ok(Mutation::Deleted(id))
    }

    /// Remove every completed task. Persists even when nothing was removed.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub fn clear_completed(&mut self) -> Result<Mutation, TaskStoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();
        self.persist()?;
        debug!(removed, "Cleared completed tasks");
        Ok(Mutation::Cleared { removed })
    }

    /// Change the filter selection. Any string is accepted.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub fn set_filter(&mut self, value: &str) -> Result<Mutation, TaskStoreError> {
        let filter: FilterMode = match value.parse() {
            Ok(filter) => filter,
            Err(never) => match never {},
        };
        self.preferences.filter = filter.clone();
        self.persist()?;
        debug!(%filter, "Changed filter");
        Ok(Mutation::FilterChanged(filter))
    }

    /// Change the sort selection. Any string is accepted.
    ///
    /// # Errors
    /// Returns an error if persisting fails.
    pub fn set_sort(&mut self, value: &str) -> Result<Mutation, TaskStoreError> {
        let sort: SortMode = match value.parse() {
            Ok(sort) => sort,
            Err(never) => match never {},
        };
        self.preferences.sort = sort.clone();
        self.persist()?;
        debug!(%sort, "Changed sort");
        Ok(Mutation::SortChanged(sort))
    }

    fn persist(&self) -> Result<(), TaskStoreError> {
        let encoded = encode_tasks(&self.tasks)?;
        write(&self.backing, TASKS_KEY, &encoded)?;
        write(&self.backing, FILTER_KEY, self.preferences.filter.as_str())?;
        write(&self.backing, SORT_KEY, self.preferences.sort.as_str())
    }
}

fn decode_mirror(raw: &[u8]) -> Vec<Task> {
    let decoded = match std::str::from_utf8(raw) {
        Ok(text) => decode_tasks(text).map_err(|err| err.to_string()),
        Err(err) => Err(format!("task mirror is not UTF-8: {err}")),
    };
    decoded.unwrap_or_else(|err| {
        warn!(error = %err, "Discarding unreadable task mirror");
        Vec::new()
    })
}

fn read<S: BackingStore>(backing: &S, key: &str) -> Result<Option<Vec<u8>>, TaskStoreError> {
    backing
        .get_bytes(key)
        .map_err(|err| TaskStoreError::Persistence(err.into()))
}

fn read_lossy<S: BackingStore>(backing: &S, key: &str) -> Result<Option<String>, TaskStoreError> {
    Ok(read(backing, key)?.map(|raw| String::from_utf8_lossy(&raw).into_owned()))
}

fn write<S: BackingStore>(backing: &S, key: &str, value: &str) -> Result<(), TaskStoreError> {
    backing
        .set(key, value)
        .map_err(|err| TaskStoreError::Persistence(err.into()))
}
