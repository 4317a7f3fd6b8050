use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};
use thiserror::Error;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::warn;

use crate::id::TaskId;

const DUE_DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const DUE_LABEL_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day padding:none]");

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Immutable identity.
    pub id: TaskId,
    /// Trimmed, non-empty text.
    pub text: String,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
    /// Optional due date.
    #[serde(default, with = "due_date_serde")]
    pub due_date: Option<Date>,
    /// Priority, medium unless chosen otherwise.
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Priority,
}

impl Task {
    /// Build a fresh, not yet completed task from a validated draft.
    ///
    /// Returns `None` when the draft text is blank.
    #[must_use]
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Option<Self> {
        let text = draft.normalized_text()?;
        Some(Self {
            id,
            text,
            completed: false,
            due_date: draft.due_date,
            priority: draft.priority.unwrap_or_default(),
        })
    }

    /// Replace the editable fields, keeping `id` and `completed`.
    ///
    /// Returns `false` (and leaves the task untouched) when the draft text is blank.
    pub fn apply_draft(&mut self, draft: TaskDraft) -> bool {
        let Some(text) = draft.normalized_text() else {
            return false;
        };
        self.text = text;
        self.due_date = draft.due_date;
        self.priority = draft.priority.unwrap_or_default();
        true
    }

    /// Short human label for the due date, e.g. `Jan 5`.
    #[must_use]
    pub fn due_label(&self) -> Option<String> {
        self.due_date.and_then(|date| date.format(DUE_LABEL_FORMAT).ok())
    }
}

/// User-supplied fields for creating or editing a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Raw text as typed; trimmed before use.
    pub text: String,
    /// Optional due date.
    pub due_date: Option<Date>,
    /// Optional priority (medium when absent).
    pub priority: Option<Priority>,
}

impl TaskDraft {
    /// Draft with only text set.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the due date.
    #[must_use]
    pub const fn due(mut self, date: Option<Date>) -> Self {
        self.due_date = date;
        self
    }

    /// Set the priority.
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    fn normalized_text(&self) -> Option<String> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Most urgent.
    High,
    /// Default.
    #[default]
    Medium,
    /// Least urgent.
    Low,
}

impl Priority {
    /// Sort rank: high(1) < medium(2) < low(3).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unknown priority token.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid priority '{0}' (expected high, medium or low)")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ParsePriorityError(s.to_owned())),
        }
    }
}

/// Error returned when a due date is not `YYYY-MM-DD`.
#[derive(Debug, Error)]
#[error("invalid due date '{input}' (expected YYYY-MM-DD)")]
pub struct DueDateError {
    input: String,
    #[source]
    source: time::error::Parse,
}

/// Parse an optional `YYYY-MM-DD` string; blank input means no due date.
///
/// # Errors
/// Returns an error if the non-blank input is not a valid calendar date.
pub fn parse_due_date(input: &str) -> Result<Option<Date>, DueDateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Date::parse(trimmed, DUE_DATE_FORMAT)
        .map(Some)
        .map_err(|source| DueDateError {
            input: input.to_owned(),
            source,
        })
}

/// Format a due date the way it is persisted.
#[must_use]
pub fn format_due_date(date: Date) -> String {
    date.format(DUE_DATE_FORMAT).unwrap_or_default()
}

mod due_date_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;
    use time::Date;
    use tracing::warn;

    // Absent dates are written as "" so mirrors stay compatible with older readers.
    #[allow(clippy::ref_option)]
    pub(super) fn serialize<S>(value: &Option<Date>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => s.serialize_str(&super::format_due_date(*date)),
            None => s.serialize_str(""),
        }
    }

    pub(super) fn deserialize<'de, D>(d: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(d)?;
        let parsed = match &raw {
            Value::Null => Ok(None),
            Value::String(value) => super::parse_due_date(value),
            other => super::parse_due_date(&other.to_string()),
        };
        Ok(parsed.unwrap_or_else(|err| {
            warn!(error = %err, "Ignoring unreadable due date");
            None
        }))
    }
}

// Unknown or non-string values read as medium.
fn lenient_priority<'de, D>(d: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(d)?;
    if raw.is_null() {
        return Ok(Priority::default());
    }
    match raw.as_str().map(str::parse::<Priority>) {
        Some(Ok(priority)) => Ok(priority),
        _ => {
            warn!(value = %raw, "Unknown priority, using medium");
            Ok(Priority::default())
        }
    }
}
