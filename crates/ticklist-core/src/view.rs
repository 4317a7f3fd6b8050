use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::task::Task;

/// Which tasks the list shows, by completion state.
///
/// Values outside the known set are kept verbatim so they persist unchanged;
/// they select every task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Every task.
    #[default]
    All,
    /// Tasks not yet completed.
    Pending,
    /// Completed tasks only.
    Completed,
    /// Out-of-set value, behaves like [`FilterMode::All`].
    Unrecognized(String),
}

impl FilterMode {
    /// Whether `task` survives this filter.
    #[must_use]
    pub const fn admits(&self, task: &Task) -> bool {
        match self {
            Self::Pending => !task.completed,
            Self::Completed => task.completed,
            Self::All | Self::Unrecognized(_) => true,
        }
    }

    /// Persisted value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl FromStr for FilterMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "all" => Self::All,
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            other => Self::Unrecognized(other.to_owned()),
        })
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering applied to the list before filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    /// Insertion order (newest first).
    #[default]
    Default,
    /// Ascending due date, undated tasks last.
    DueDate,
    /// High, then medium, then low.
    Priority,
    /// Out-of-set value, behaves like [`SortMode::Default`].
    Unrecognized(String),
}

impl SortMode {
    /// Persisted value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Default => "default",
            Self::DueDate => "dueDate",
            Self::Priority => "priority",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl FromStr for SortMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "default" => Self::Default,
            "dueDate" => Self::DueDate,
            "priority" => Self::Priority,
            other => Self::Unrecognized(other.to_owned()),
        })
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-wide view selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewPreferences {
    /// Current filter.
    pub filter: FilterMode,
    /// Current sort.
    pub sort: SortMode,
}

impl ViewPreferences {
    /// Build preferences from raw persisted values, defaulting absent ones.
    #[must_use]
    pub fn from_persisted(filter: Option<&str>, sort: Option<&str>) -> Self {
        Self {
            filter: filter.map(parse_infallible).unwrap_or_default(),
            sort: sort.map(parse_infallible).unwrap_or_default(),
        }
    }
}

fn parse_infallible<T: FromStr<Err = Infallible>>(raw: &str) -> T {
    match raw.parse() {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
