//! Routes user intents to [`TaskStore`] and re-projects after each one.

use ticklist_core::{TaskDraft, TaskId};
use tracing::debug;

use crate::backing::BackingStore;
use crate::projector::{Projection, project};
use crate::task_store::{Mutation, TaskStore, TaskStoreError};

/// A discrete user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Create a task.
    Add(TaskDraft),
    /// Replace the editable fields of a task.
    Edit(TaskId, TaskDraft),
    /// Flip a task's completion flag.
    Toggle(TaskId),
    /// Remove a task.
    Delete(TaskId),
    /// Remove every completed task.
    ClearCompleted,
    /// Change the filter selection (raw value).
    SetFilter(String),
    /// Change the sort selection (raw value).
    SetSort(String),
    /// Re-render without mutating, e.g. on startup.
    Refresh,
}

impl Intent {
    /// Intent for a task form submission: no target creates, a target edits.
    #[must_use]
    pub fn submit(target: Option<TaskId>, draft: TaskDraft) -> Self {
        match target {
            Some(id) => Self::Edit(id, draft),
            None => Self::Add(draft),
        }
    }
}

/// What a dispatch did and what to render next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// Store outcome; `None` for [`Intent::Refresh`].
    pub mutation: Option<Mutation>,
    /// Fresh projection of the store.
    pub projection: Projection,
}

/// Apply `intent` to `store` and project the result.
///
/// # Errors
/// Propagates persistence failures from the store.
pub fn dispatch<S: BackingStore>(
    store: &mut TaskStore<S>,
    intent: Intent,
) -> Result<Dispatched, TaskStoreError> {
    let mutation = match intent {
        Intent::Add(draft) => Some(store.create_task(draft)?),
        Intent::Edit(id, draft) => Some(store.update_task(id, draft)?),
        Intent::Toggle(id) => Some(store.toggle_completed(id)?),
        Intent::Delete(id) => Some(store.delete_task(id)?),
        Intent::ClearCompleted => Some(store.clear_completed()?),
        Intent::SetFilter(value) => Some(store.set_filter(&value)?),
        Intent::SetSort(value) => Some(store.set_sort(&value)?),
        Intent::Refresh => None,
    };
    if let Some(mutation) = &mutation {
        debug!(?mutation, "Dispatched intent");
    }
    let projection = project(store.tasks(), store.preferences());
    Ok(Dispatched {
        mutation,
        projection,
    })
}
