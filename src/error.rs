//! Error types with fix suggestions

use std::path::PathBuf;

use thiserror::Error;

use crate::runner::Stage;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error in {path}: {source}")]
    YamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("unsupported document shape in {path}: {details}")]
    DocumentShape { path: PathBuf, details: String },

    #[error("failed to write var file {path}: {source}")]
    VarFileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write deployment marker {path}: {source}")]
    MarkerWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} failed: `{command}` {}", exit_code_string(.exit_code))]
    StageFailed {
        stage: Stage,
        command: String,
        exit_code: Option<i32>,
    },
}

fn exit_code_string(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {code}"),
        None => "could not be launched (or was killed by a signal)".to_string(),
    }
}

impl FixSuggestion for DeployError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            DeployError::ConfigNotFound { .. } => {
                Some("Check the config path (it is resolved relative to your shell, not -C)")
            }
            DeployError::ConfigRead { .. } => Some("Check file permissions on the config"),
            DeployError::YamlParse { .. } => Some("Check YAML syntax: indentation and quoting"),
            DeployError::DocumentShape { .. } => {
                Some("Top level must be a mapping of string keys to scalars, lists, or flat maps")
            }
            DeployError::VarFileWrite { .. } | DeployError::MarkerWrite { .. } => {
                Some("Check the working root exists and is writable (see -C/--chdir)")
            }
            DeployError::StageFailed { stage, .. } => match stage {
                Stage::Initializing => {
                    Some("Is terraform installed and on PATH? Run `terraform init` by hand to see why")
                }
                Stage::SelectingWorkspace => {
                    Some("List workspaces with `terraform workspace list` and check the -w value")
                }
                _ => Some("Re-run the printed terraform command by hand for the full error"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_failed_message_includes_command_and_code() {
        let err = DeployError::StageFailed {
            stage: Stage::Planning,
            command: "terraform plan -var-file=terraform.tfvars".to_string(),
            exit_code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("plan"), "got: {msg}");
        assert!(msg.contains("exited with status 1"), "got: {msg}");
    }

    #[test]
    fn launch_failure_message_has_no_status() {
        let err = DeployError::StageFailed {
            stage: Stage::Initializing,
            command: "terraform init".to_string(),
            exit_code: None,
        };
        assert!(err.to_string().contains("could not be launched"));
    }

    #[test]
    fn every_variant_offers_a_suggestion() {
        let err = DeployError::ConfigNotFound {
            path: PathBuf::from("missing.yaml"),
        };
        assert!(err.fix_suggestion().is_some());
    }
}
