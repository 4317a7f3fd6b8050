use serde::{Deserialize, Serialize};
use std::{fmt, num::NonZeroU64, str::FromStr};
use thiserror::Error;
use time::OffsetDateTime;

/// Identifier of a task: milliseconds since the Unix epoch at creation time.
///
/// The value is never zero, so "no id" is always spelled `Option<TaskId>`.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(NonZeroU64);

impl TaskId {
    /// Wrap a raw value, rejecting zero.
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }

    /// Generate a fresh identifier from the wall clock.
    ///
    /// The result is strictly greater than `latest` even when the clock has not
    /// advanced (or went backwards) since `latest` was issued.
    #[must_use]
    pub fn next_after(latest: Option<Self>) -> Self {
        Self::next_at(OffsetDateTime::now_utc(), latest)
    }

    fn next_at(now: OffsetDateTime, latest: Option<Self>) -> Self {
        let millis = u64::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or(0);
        let floor = latest.map_or(1, |id| id.get().saturating_add(1));
        let raw = millis.max(floor);
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Error returned when a string is not a valid task id.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid task id: {input}")]
pub struct ParseTaskIdError {
    input: String,
}

impl FromStr for TaskId {
    type Err = ParseTaskIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ParseTaskIdError { input: s.to_owned() })
    }
}
