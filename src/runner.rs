//! Deployment workflow runner
//!
//! Drives the fixed stage sequence: validate input → serialize vars → init →
//! workspace → plan → apply/destroy → finalize. Each stage fully completes
//! (including streaming all subprocess output) before the next begins; a
//! fatal stage failure aborts the run with no rollback — Terraform's own
//! state is the source of truth for partial application.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use tracing::info;

use crate::config::ConfigDocument;
use crate::error::DeployError;
use crate::exec::CommandExecutor;
use crate::tfvars;

/// External tool driven by the runner
pub const TOOL: &str = "terraform";

/// Var file name, fixed relative to the working root
pub const VAR_FILE_NAME: &str = "terraform.tfvars";

/// Marker recording the last successfully applied config
pub const MARKER_FILE_NAME: &str = ".last_deployed_config";

/// One discrete step of the deployment workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ValidatingInput,
    Serializing,
    Initializing,
    SelectingWorkspace,
    Planning,
    Applying,
    Destroying,
    Finalizing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ValidatingInput => "input validation",
            Stage::Serializing => "var file serialization",
            Stage::Initializing => "init",
            Stage::SelectingWorkspace => "workspace selection",
            Stage::Planning => "plan",
            Stage::Applying => "apply",
            Stage::Destroying => "destroy",
            Stage::Finalizing => "finalization",
        };
        f.write_str(name)
    }
}

/// Where a run operates: every path the runner touches derives from here
///
/// Passed in explicitly at construction; the runner reads no ambient global
/// state.
#[derive(Debug, Clone)]
pub struct DeployContext {
    working_root: PathBuf,
}

impl DeployContext {
    pub fn new(working_root: impl Into<PathBuf>) -> Self {
        Self {
            working_root: working_root.into(),
        }
    }

    pub fn working_root(&self) -> &Path {
        &self.working_root
    }

    pub fn var_file(&self) -> PathBuf {
        self.working_root.join(VAR_FILE_NAME)
    }

    pub fn marker_file(&self) -> PathBuf {
        self.working_root.join(MARKER_FILE_NAME)
    }
}

/// Caller intent for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: PathBuf,
    pub workspace: String,
    pub plan_only: bool,
    pub destroy: bool,
    pub auto_approve: bool,
}

/// What a successful run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Planned,
    Applied,
    Destroyed,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunOutcome::Planned => "plan",
            RunOutcome::Applied => "apply",
            RunOutcome::Destroyed => "destroy",
        })
    }
}

/// Summary of a successful run, returned to the caller
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub stages_completed: Vec<Stage>,
    /// Config keys dropped from the var file as unsupported
    pub skipped_keys: Vec<String>,
    pub var_file: PathBuf,
}

/// Workflow runner: owns its context and the command executor
pub struct Runner {
    ctx: DeployContext,
    executor: Box<dyn CommandExecutor>,
}

impl Runner {
    pub fn new(ctx: DeployContext, executor: Box<dyn CommandExecutor>) -> Self {
        Self { ctx, executor }
    }

    /// Execute the full workflow for the given intent
    pub fn run(&self, opts: &RunOptions) -> Result<RunReport, DeployError> {
        let mut completed = Vec::new();

        // ValidatingInput: the config must exist before anything else runs.
        // Resolve it now so the marker written after apply is absolute.
        info!(stage = %Stage::ValidatingInput, "starting stage");
        if !opts.config.exists() {
            return Err(DeployError::ConfigNotFound {
                path: opts.config.clone(),
            });
        }
        let resolved_config =
            fs::canonicalize(&opts.config).map_err(|source| DeployError::ConfigRead {
                path: opts.config.clone(),
                source,
            })?;
        completed.push(Stage::ValidatingInput);

        // Serializing
        info!(stage = %Stage::Serializing, "starting stage");
        let doc = ConfigDocument::load(&opts.config)?;
        let rendered = tfvars::render(&doc);
        let var_file = self.ctx.var_file();
        rendered.write(&var_file)?;
        println!(
            "{} Wrote {} ({} entries)",
            "→".cyan(),
            var_file.display(),
            rendered.lines().len()
        );
        completed.push(Stage::Serializing);

        // Initializing
        self.require(Stage::Initializing, &[TOOL, "init"])?;
        completed.push(Stage::Initializing);

        // SelectingWorkspace: creation failure is expected when the
        // workspace already exists and is deliberately ignored; selection
        // failure is fatal.
        let create = self
            .executor
            .run(&argv(&[TOOL, "workspace", "new", &opts.workspace]), self.ctx.working_root());
        if !create.succeeded {
            info!(workspace = %opts.workspace, "workspace creation failed (may already exist), continuing");
        }
        self.require(
            Stage::SelectingWorkspace,
            &[TOOL, "workspace", "select", &opts.workspace],
        )?;
        completed.push(Stage::SelectingWorkspace);

        // Planning
        let var_file_arg = format!("-var-file={VAR_FILE_NAME}");
        self.require(Stage::Planning, &[TOOL, "plan", &var_file_arg])?;
        completed.push(Stage::Planning);

        if opts.plan_only {
            info!("plan-only mode, skipping apply/destroy");
            return Ok(RunReport {
                outcome: RunOutcome::Planned,
                stages_completed: completed,
                skipped_keys: rendered.skipped().to_vec(),
                var_file,
            });
        }

        // Applying or Destroying, by caller intent
        let (stage, action) = if opts.destroy {
            (Stage::Destroying, "destroy")
        } else {
            (Stage::Applying, "apply")
        };
        let mut action_argv = vec![TOOL, action, &var_file_arg];
        if opts.auto_approve {
            action_argv.push("-auto-approve");
        }
        self.require(stage, &action_argv)?;
        completed.push(stage);

        // Finalizing: only an apply updates the marker. A destroyed
        // environment must not appear as "last deployed".
        if opts.destroy {
            return Ok(RunReport {
                outcome: RunOutcome::Destroyed,
                stages_completed: completed,
                skipped_keys: rendered.skipped().to_vec(),
                var_file,
            });
        }

        info!(stage = %Stage::Finalizing, "starting stage");
        let marker = self.ctx.marker_file();
        fs::write(&marker, format!("{}\n", resolved_config.display())).map_err(|source| {
            DeployError::MarkerWrite {
                path: marker.clone(),
                source,
            }
        })?;
        info!(marker = %marker.display(), config = %resolved_config.display(), "updated deployment marker");
        completed.push(Stage::Finalizing);

        Ok(RunReport {
            outcome: RunOutcome::Applied,
            stages_completed: completed,
            skipped_keys: rendered.skipped().to_vec(),
            var_file,
        })
    }

    /// Run a command whose failure is fatal for `stage`
    fn require(&self, stage: Stage, parts: &[&str]) -> Result<(), DeployError> {
        let argv = argv(parts);
        let status = self.executor.run(&argv, self.ctx.working_root());
        if status.succeeded {
            Ok(())
        } else {
            Err(DeployError::StageFailed {
                stage,
                command: argv.join(" "),
                exit_code: status.exit_code,
            })
        }
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
