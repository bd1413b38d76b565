//! tfpilot - YAML-driven Terraform deployment driver

pub mod config;
pub mod error;
pub mod exec;
pub mod runner;
pub mod tfvars;

pub use config::{ConfigDocument, ConfigValue, Scalar};
pub use error::{DeployError, FixSuggestion};
pub use exec::{CommandExecutor, ExecStatus, SystemExecutor};
pub use runner::{DeployContext, RunOptions, RunOutcome, RunReport, Runner, Stage};
pub use tfvars::{render, RenderedVars};
