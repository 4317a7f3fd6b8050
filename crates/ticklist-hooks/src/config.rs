//! Hook configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for feedback hook execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Whether hooks are enabled
    pub enabled: bool,

    /// List of disabled hook names
    pub disabled: Vec<String>,

    /// Timeout in seconds for hook execution
    pub timeout: u64,

    /// Directory containing hook scripts (relative to the data directory)
    pub hooks_dir: PathBuf,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled: Vec::new(),
            timeout: 5,
            hooks_dir: PathBuf::from("hooks"),
        }
    }
}

impl HooksConfig {
    /// Check if a specific hook is enabled
    #[must_use]
    pub fn is_hook_enabled(&self, hook_name: &str) -> bool {
        self.enabled && !self.disabled.iter().any(|name| name == hook_name)
    }
}
