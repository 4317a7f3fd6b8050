//! Pure projection of the task list into what the user sees.

use std::fmt;

use ticklist_core::{Priority, SortMode, Task, TaskId, ViewPreferences};
use time::Date;

/// Placeholder shown when tasks exist but none survive the filter.
pub const EMPTY_VIEW_MESSAGE: &str = "No tasks here. Let's create one!";

/// Renderable view of a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    /// Task identity, for routing intents back.
    pub id: TaskId,
    /// Task text.
    pub text: String,
    /// Completion flag.
    pub completed: bool,
    /// Priority.
    pub priority: Priority,
    /// Raw due date.
    pub due_date: Option<Date>,
    /// Short due label, e.g. `Jan 5`.
    pub due_label: Option<String>,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            text: task.text.clone(),
            completed: task.completed,
            priority: task.priority,
            due_date: task.due_date,
            due_label: task.due_label(),
        }
    }
}

/// Status line computed over the whole collection, ignoring the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLine {
    /// The collection is empty.
    NoTasks,
    /// Every task is completed.
    AllCompleted,
    /// This many tasks are pending.
    Remaining(usize),
}

impl StatusLine {
    fn for_tasks(tasks: &[Task]) -> Self {
        if tasks.is_empty() {
            return Self::NoTasks;
        }
        match tasks.iter().filter(|task| !task.completed).count() {
            0 => Self::AllCompleted,
            pending => Self::Remaining(pending),
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTasks => f.write_str("Ready to build momentum?"),
            Self::AllCompleted => f.write_str("All tasks completed! Amazing work! ✨"),
            Self::Remaining(1) => f.write_str("1 task remaining"),
            Self::Remaining(n) => write!(f, "{n} tasks remaining"),
        }
    }
}

/// What kind of list the consumer should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No tasks exist at all.
    EmptyCollection,
    /// Tasks exist, but the filter hides all of them.
    EmptyView,
    /// At least one task is visible.
    Populated,
}

/// Result of projecting the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Visible tasks, sorted then filtered.
    pub items: Vec<TaskSummary>,
    /// Status line for the whole collection.
    pub status: StatusLine,
    /// Emptiness classification.
    pub state: ViewState,
}

/// Sort a copy of `tasks` according to `sort`. The input is never reordered.
///
/// Sorting is stable, so ties keep their baseline order.
#[must_use]
pub fn ordered<'a>(tasks: &'a [Task], sort: &SortMode) -> Vec<&'a Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    match sort {
        SortMode::DueDate => sorted.sort_by_key(|task| (task.due_date.is_none(), task.due_date)),
        SortMode::Priority => sorted.sort_by_key(|task| task.priority.rank()),
        SortMode::Default | SortMode::Unrecognized(_) => {}
    }
    sorted
}

/// Project `tasks` under `preferences`: sort first, then filter.
#[must_use]
pub fn project(tasks: &[Task], preferences: &ViewPreferences) -> Projection {
    let items: Vec<TaskSummary> = ordered(tasks, &preferences.sort)
        .into_iter()
        .filter(|task| preferences.filter.admits(task))
        .map(TaskSummary::from)
        .collect();

    let state = if tasks.is_empty() {
        ViewState::EmptyCollection
    } else if items.is_empty() {
        ViewState::EmptyView
    } else {
        ViewState::Populated
    };

    Projection {
        items,
        status: StatusLine::for_tasks(tasks),
        state,
    }
}
