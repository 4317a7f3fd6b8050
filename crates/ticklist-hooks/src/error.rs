//! Errors raised while running feedback hooks.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for hook operations.
pub type Result<T> = std::result::Result<T, HookError>;

/// Why a hook script could not deliver a cue.
#[derive(Debug, Error)]
pub enum HookError {
    /// The script could not be started or fed its context.
    #[error("Failed to run hook {hook}: {source}")]
    Spawn {
        /// Script name, e.g. `on-add`.
        hook: &'static str,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// Polling the running script failed.
    #[error("Failed to wait for hook {hook}: {source}")]
    Wait {
        /// Script name, e.g. `on-add`.
        hook: &'static str,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The script outlived the configured timeout and was killed.
    #[error("Hook timed out after {0} seconds")]
    Timeout(u64),

    /// The cue context could not be encoded.
    #[error("Failed to encode hook context: {0}")]
    Json(#[from] serde_json::Error),

    /// No script is installed for the cue.
    #[error("Hook script {hook} not found in {}", dir.display())]
    NotFound {
        /// Script name, e.g. `on-add`.
        hook: &'static str,
        /// Directory that was searched.
        dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_failures_keep_their_source() {
        let err = HookError::Wait {
            hook: "on-add",
            source: io::Error::other("interrupted"),
        };
        assert_eq!(err.to_string(), "Failed to wait for hook on-add: interrupted");
        let source = err.source().unwrap_or_else(|| panic!("source is kept"));
        assert_eq!(source.to_string(), "interrupted");

        let err = HookError::Spawn {
            hook: "on-delete",
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.source().is_some());
    }
}
