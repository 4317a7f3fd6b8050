//! Feedback sinks

use tracing::{debug, warn};

use crate::{CueContext, FeedbackCue, HookError, HookExecutor};

/// Receiver of feedback cues.
///
/// Implementations must not fail the caller: anything that goes wrong is
/// theirs to log and drop.
pub trait FeedbackSink {
    /// Deliver `cue` for the task described by `context`.
    fn emit(&self, cue: FeedbackCue, context: &CueContext);
}

/// Sink that discards every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl FeedbackSink for NoFeedback {
    fn emit(&self, _cue: FeedbackCue, _context: &CueContext) {}
}

impl FeedbackSink for HookExecutor {
    fn emit(&self, cue: FeedbackCue, context: &CueContext) {
        let hook = cue.script_name();
        match self.execute(cue, context) {
            Ok(result) if result.is_success() => {
                debug!(hook, task = %context.task.id, "Feedback hook finished");
            }
            Ok(result) => {
                warn!(
                    hook,
                    exit_code = result.exit_code,
                    stderr = %result.stderr.trim(),
                    "Feedback hook exited with failure"
                );
            }
            Err(HookError::NotFound { .. }) => {
                debug!(hook, "No feedback hook installed");
            }
            Err(err) => {
                warn!(hook, error = %err, "Feedback hook failed");
            }
        }
    }
}

impl<T: FeedbackSink + ?Sized> FeedbackSink for &T {
    fn emit(&self, cue: FeedbackCue, context: &CueContext) {
        (**self).emit(cue, context);
    }
}

impl<T: FeedbackSink + ?Sized> FeedbackSink for Box<T> {
    fn emit(&self, cue: FeedbackCue, context: &CueContext) {
        (**self).emit(cue, context);
    }
}
