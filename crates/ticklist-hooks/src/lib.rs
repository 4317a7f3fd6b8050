//! Feedback cues for ticklist
//!
//! After a task is added, completed or deleted the store emits a
//! [`FeedbackCue`]. The [`HookExecutor`] sink turns each cue into a script run
//! (`on-add`, `on-complete`, `on-delete`) so users can wire up sounds or
//! notifications, similar to Git hooks.

mod config;
mod error;
mod executor;
mod sink;
mod types;

pub use config::HooksConfig;
pub use error::{HookError, Result};
pub use executor::HookExecutor;
pub use sink::{FeedbackSink, NoFeedback};
pub use types::{CueContext, FeedbackCue, HookResult, Tone};
