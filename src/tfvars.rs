//! Var file rendering
//!
//! Turns a [`ConfigDocument`] into `terraform.tfvars` assignment lines. The
//! rendering contract is type-correct: numbers and booleans stay bare,
//! strings are quoted, null keys are dropped. Output is deterministic for a
//! given document so repeated runs produce identical plans.
//!
//! Known limitation: string values are inserted verbatim, so embedded `"`
//! characters are not escaped and can produce an invalid var file.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::config::{ConfigDocument, ConfigValue, Scalar};
use crate::error::DeployError;

/// Rendered assignment lines plus the keys that were skipped as unsupported
#[derive(Debug, Clone)]
pub struct RenderedVars {
    lines: Vec<String>,
    skipped: Vec<String>,
}

impl RenderedVars {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Keys dropped because their value shape is outside the supported subset
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Full file body, newline-terminated
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Overwrite `path` with the rendered body
    pub fn write(&self, path: &Path) -> Result<(), DeployError> {
        fs::write(path, self.text()).map_err(|source| DeployError::VarFileWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Render a document into var-file lines, in document key order
pub fn render(doc: &ConfigDocument) -> RenderedVars {
    let mut lines = Vec::new();
    let mut skipped = Vec::new();

    for (key, value) in doc.entries() {
        match value {
            ConfigValue::Scalar(Scalar::Null) => {}
            ConfigValue::Scalar(scalar) => {
                lines.push(format!("{key} = {}", bare(scalar)));
            }
            ConfigValue::List(items) => {
                let rendered: Vec<String> = items
                    .iter()
                    .filter(|item| !matches!(item, Scalar::Null))
                    .map(bare)
                    .collect();
                lines.push(format!("{key} = [{}]", rendered.join(", ")));
            }
            ConfigValue::Map(pairs) => {
                lines.push(format!("{key} = {{"));
                for (subkey, subvalue) in pairs {
                    if matches!(subvalue, Scalar::Null) {
                        continue;
                    }
                    lines.push(format!("  {subkey} = \"{}\"", unquoted(subvalue)));
                }
                lines.push("}".to_string());
            }
            ConfigValue::Unsupported { shape } => {
                warn!(key = %key, shape = %shape, "skipping key with unsupported value shape");
                skipped.push(key.clone());
            }
        }
    }

    RenderedVars { lines, skipped }
}

/// Scalar in assignment position: strings quoted, everything else bare
fn bare(scalar: &Scalar) -> String {
    match scalar {
        Scalar::String(s) => format!("\"{s}\""),
        other => unquoted(other),
    }
}

/// Scalar as its bare token: decimal numbers, lower-case booleans
fn unquoted(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Null => String::new(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::String(s) => s.clone(),
    }
}
