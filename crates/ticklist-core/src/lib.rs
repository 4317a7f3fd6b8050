//! Domain types for ticklist: tasks, identifiers and view selections.

/// Persisted collection encoding.
pub mod codec;
/// Identifier types.
pub mod id;
/// Task records and drafts.
pub mod task;
/// Filter and sort selections.
pub mod view;

pub use codec::{CodecError, decode_tasks, encode_tasks};
pub use id::{ParseTaskIdError, TaskId};
pub use task::{
    DueDateError, ParsePriorityError, Priority, Task, TaskDraft, format_due_date, parse_due_date,
};
pub use view::{FilterMode, SortMode, ViewPreferences};
