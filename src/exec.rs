//! Subprocess execution
//!
//! The runner talks to the external tool through the [`CommandExecutor`]
//! capability so tests can substitute a scripted stub for the real binary.

use std::path::Path;
use std::process::Command;

use colored::Colorize;
use tracing::{error, info};

/// Outcome of one subprocess invocation
///
/// A failed run is a value, not an error: the orchestrator decides per stage
/// whether a failure is fatal. `exit_code` is `None` when the process could
/// not be launched at all or was killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecStatus {
    pub succeeded: bool,
    pub exit_code: Option<i32>,
}

impl ExecStatus {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            exit_code: Some(0),
        }
    }

    pub fn failure(exit_code: Option<i32>) -> Self {
        Self {
            succeeded: false,
            exit_code,
        }
    }
}

/// Synchronous command execution capability
pub trait CommandExecutor {
    /// Run `argv` from `cwd`, blocking until it exits
    fn run(&self, argv: &[String], cwd: &Path) -> ExecStatus;
}

/// Real executor: spawns the argv with inherited stdio
///
/// Inherited stdio means the subprocess streams its output straight to the
/// user's terminal as it runs; nothing is buffered or captured here.
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn run(&self, argv: &[String], cwd: &Path) -> ExecStatus {
        let Some((program, args)) = argv.split_first() else {
            error!("refusing to run an empty command");
            return ExecStatus::failure(None);
        };

        let command_line = argv.join(" ");
        println!("{} Running: {}", "→".cyan(), command_line.bold());
        info!(command = %command_line, cwd = %cwd.display(), "spawning subprocess");

        match Command::new(program).args(args).current_dir(cwd).status() {
            Ok(status) => ExecStatus {
                succeeded: status.success(),
                exit_code: status.code(),
            },
            Err(e) => {
                error!(command = %command_line, "failed to launch: {e}");
                ExecStatus::failure(None)
            }
        }
    }
}
