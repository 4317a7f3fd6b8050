use std::collections::HashSet;

use thiserror::Error;

use crate::id::TaskId;
use crate::task::Task;

/// Errors raised while decoding a persisted task collection.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The mirror is not a JSON array of tasks.
    #[error("malformed task collection: {0}")]
    Json(#[from] serde_json::Error),

    /// Two records share the same id.
    #[error("duplicate task id {0} in collection")]
    DuplicateId(TaskId),
}

/// Serialize the collection as a JSON array, preserving order.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(tasks)?)
}

/// Decode a JSON array of tasks, rejecting duplicate ids.
///
/// An unknown priority or unreadable due date only resets that field; the
/// record itself is kept.
///
/// # Errors
/// Returns an error if the payload is malformed or ids collide.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>, CodecError> {
    let tasks: Vec<Task> = serde_json::from_str(raw)?;
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(task.id) {
            return Err(CodecError::DuplicateId(task.id));
        }
    }
    Ok(tasks)
}
