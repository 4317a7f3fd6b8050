//! Hook execution logic

use crate::{CueContext, FeedbackCue, HookError, HookResult, HooksConfig, Result};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Executor for running feedback hook scripts
#[derive(Debug, Clone)]
pub struct HookExecutor {
    config: HooksConfig,
    base_dir: PathBuf,
}

impl HookExecutor {
    /// Create a new hook executor
    ///
    /// # Arguments
    ///
    /// * `config` - Hook configuration
    /// * `base_dir` - Base directory that `config.hooks_dir` is relative to
    #[must_use]
    pub const fn new(config: HooksConfig, base_dir: PathBuf) -> Self {
        Self { config, base_dir }
    }

    /// Directory scanned for hook scripts.
    #[must_use]
    pub fn hooks_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.hooks_dir)
    }

    /// Execute the hook script for `cue`
    ///
    /// Disabled hooks report success without running anything. Output is
    /// drained while the script runs, so a chatty script cannot stall itself.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The script does not exist
    /// - Spawning or talking to the script fails
    /// - The script exceeds the configured timeout
    pub fn execute(&self, cue: FeedbackCue, context: &CueContext) -> Result<HookResult> {
        let hook = cue.script_name();
        if !self.config.is_hook_enabled(hook) {
            return Ok(HookResult::skipped());
        }

        let script_path = self.find_hook_script(hook)?;
        let input = serde_json::to_vec(context)?;
        self.run_script(hook, &script_path, &input)
    }

    fn find_hook_script(&self, hook: &'static str) -> Result<PathBuf> {
        let dir = self.hooks_dir();
        let script_path = dir.join(hook);
        if script_path.is_file() {
            Ok(script_path)
        } else {
            Err(HookError::NotFound { hook, dir })
        }
    }

    fn run_script(&self, hook: &'static str, script_path: &Path, input: &[u8]) -> Result<HookResult> {
        let spawn_failed = |source| HookError::Spawn { hook, source };
        let mut child = Command::new(script_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_failed)?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        if let Some(mut stdin) = child.stdin.take() {
            // A script that never reads stdin closes the pipe early; that is not a failure.
            if let Err(err) = stdin.write_all(input)
                && err.kind() != io::ErrorKind::BrokenPipe
            {
                let _ = child.kill();
                let _ = child.wait();
                return Err(spawn_failed(err));
            }
        }

        let timeout = Duration::from_secs(self.config.timeout);
        let status = wait_with_timeout(&mut child, timeout)
            .map_err(|source| HookError::Wait { hook, source })?;
        // On timeout the reader threads are left to finish once the pipes close.
        let Some(status) = status else {
            return Err(HookError::Timeout(timeout.as_secs()));
        };

        Ok(HookResult {
            exit_code: status.code().unwrap_or(-1),
            stdout: collect(stdout),
            stderr: collect(stderr),
        })
    }
}

/// Wait for a child process, killing it once `timeout` elapses.
///
/// Returns `None` when the process was killed.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
