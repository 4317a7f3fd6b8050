//! Application layer for ticklist.
//!
//! [`TaskStore`] owns the task list and mirrors it to a [`BackingStore`],
//! [`project`] turns it into what the user sees, and [`dispatch`] routes each
//! [`Intent`] through both.

pub mod backing;
pub mod config;
pub mod dispatcher;
pub mod projector;
pub mod task_store;

pub use backing::BackingStore;
pub use config::AppConfig;
pub use dispatcher::{Dispatched, Intent, dispatch};
pub use projector::{
    EMPTY_VIEW_MESSAGE, Projection, StatusLine, TaskSummary, ViewState, ordered, project,
};
pub use task_store::{
    FILTER_KEY, Mutation, SORT_KEY, Skipped, TASKS_KEY, THEME_KEY, TaskStore, TaskStoreError,
};
