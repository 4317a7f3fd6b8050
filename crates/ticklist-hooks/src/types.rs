//! Cue types and hook context

use serde::{Deserialize, Serialize};
use ticklist_core::Task;

/// Feedback signals emitted after a mutation has been persisted.
///
/// Cues are fire-and-forget: nothing a consumer does with them can change
/// the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCue {
    /// A task was created.
    Add,
    /// A task went from pending to completed.
    Complete,
    /// A task was deleted.
    Delete,
}

impl FeedbackCue {
    /// Returns the script name for this cue
    #[must_use]
    pub const fn script_name(self) -> &'static str {
        match self {
            Self::Add => "on-add",
            Self::Complete => "on-complete",
            Self::Delete => "on-delete",
        }
    }

    /// Tone an audio collaborator should play for this cue.
    #[must_use]
    pub const fn tone(self) -> Tone {
        match self {
            Self::Add => Tone {
                note: "C4",
                duration: "8n",
                delay_ms: 0,
            },
            Self::Complete => Tone {
                note: "G4",
                duration: "8n",
                delay_ms: 100,
            },
            Self::Delete => Tone {
                note: "C3",
                duration: "8n",
                delay_ms: 0,
            },
        }
    }
}

/// Synth parameters for a cue, in scientific pitch and note-value notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tone {
    /// Pitch, e.g. `C4`.
    pub note: &'static str,
    /// Note value, e.g. `8n` for an eighth note.
    pub duration: &'static str,
    /// Delay before the attack, in milliseconds.
    pub delay_ms: u32,
}

/// Context passed to hook scripts on stdin as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct CueContext {
    /// Cue being emitted.
    pub cue: FeedbackCue,
    /// Tone associated with the cue.
    pub tone: Tone,
    /// Task the cue refers to (after the mutation; the removed task for deletes).
    pub task: Task,
}

impl CueContext {
    /// Build a context for `cue` about `task`.
    #[must_use]
    pub fn new(cue: FeedbackCue, task: &Task) -> Self {
        Self {
            cue,
            tone: cue.tone(),
            task: task.clone(),
        }
    }
}

/// Result from hook execution
#[derive(Debug, Clone)]
pub struct HookResult {
    /// Exit code from the hook script
    pub exit_code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl HookResult {
    /// Result reported when a hook is skipped without running.
    #[must_use]
    pub const fn skipped() -> Self {
        Self {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Returns true if the hook execution was successful
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticklist_core::{TaskDraft, TaskId};

    #[test]
    fn cue_tones_match_feedback_sounds() {
        assert_eq!(FeedbackCue::Add.tone().note, "C4");
        assert_eq!(FeedbackCue::Complete.tone().note, "G4");
        assert_eq!(FeedbackCue::Complete.tone().delay_ms, 100);
        assert_eq!(FeedbackCue::Delete.tone().note, "C3");
    }

    #[test]
    fn context_serializes_cue_tone_and_task() -> Result<(), serde_json::Error> {
        let id = TaskId::new(9).unwrap_or_else(|| panic!("non-zero id"));
        let task = Task::from_draft(id, TaskDraft::new("ship it"))
            .unwrap_or_else(|| panic!("non-blank draft"));
        let json = serde_json::to_value(CueContext::new(FeedbackCue::Delete, &task))?;
        assert_eq!(json["cue"], "delete");
        assert_eq!(json["tone"]["note"], "C3");
        assert_eq!(json["task"]["id"], 9);
        assert_eq!(json["task"]["text"], "ship it");
        Ok(())
    }
}
