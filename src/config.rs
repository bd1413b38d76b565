//! Config document loading
//!
//! Parses the declarative YAML config into an ordered key → value document.
//! The supported subset is deliberately flat: scalars, lists of scalars, and
//! string-keyed maps of scalars. Values outside that subset survive loading
//! as [`ConfigValue::Unsupported`] and are skipped (with a warning) when the
//! var file is rendered.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::DeployError;

/// A leaf value: the only things that can appear inside lists and maps
///
/// Untagged so serde sorts YAML scalars into the right variant; anything
/// non-scalar fails every variant and is rejected by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// One top-level config value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
    Map(Vec<(String, Scalar)>),
    /// Anything outside the supported subset, kept so the serializer can
    /// report the skip instead of the loader rejecting the whole document
    Unsupported { shape: String },
}

/// Ordered key → value mapping parsed from the config file
///
/// Key order matches the source document; rendering depends on it.
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    entries: Vec<(String, ConfigValue)>,
}

impl ConfigDocument {
    /// Load and parse a config file
    ///
    /// Fails with `ConfigNotFound` before touching the parser, `YamlParse`
    /// for syntax errors, and `DocumentShape` when the top level is not a
    /// string-keyed mapping.
    pub fn load(path: &Path) -> Result<Self, DeployError> {
        if !path.exists() {
            return Err(DeployError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let text = fs::read_to_string(path).map_err(|source| DeployError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let root: Value =
            serde_yaml::from_str(&text).map_err(|source| DeployError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        let mapping = match root {
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(DeployError::DocumentShape {
                    path: path.to_path_buf(),
                    details: format!(
                        "expected a mapping at the top level, found {}",
                        shape_of(&other)
                    ),
                })
            }
        };

        let mut entries = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let key = match key {
                Value::String(key) => key,
                other => {
                    return Err(DeployError::DocumentShape {
                        path: path.to_path_buf(),
                        details: format!("non-string top-level key ({})", shape_of(&other)),
                    })
                }
            };
            entries.push((key, classify(value)));
        }

        Ok(Self { entries })
    }

    /// Entries in source order
    pub fn entries(&self) -> &[(String, ConfigValue)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_entries(entries: Vec<(String, ConfigValue)>) -> Self {
        Self { entries }
    }
}

/// Sort a YAML value into the supported subset or `Unsupported`
fn classify(value: Value) -> ConfigValue {
    match value {
        Value::Sequence(items) => {
            let mut scalars = Vec::with_capacity(items.len());
            for item in &items {
                match as_scalar(item) {
                    Some(scalar) => scalars.push(scalar),
                    None => {
                        return ConfigValue::Unsupported {
                            shape: format!("list containing a {}", shape_of(item)),
                        }
                    }
                }
            }
            ConfigValue::List(scalars)
        }
        Value::Mapping(mapping) => {
            let mut pairs = Vec::with_capacity(mapping.len());
            for (key, value) in &mapping {
                let key = match key {
                    Value::String(key) => key.clone(),
                    other => {
                        return ConfigValue::Unsupported {
                            shape: format!("mapping with a non-string key ({})", shape_of(other)),
                        }
                    }
                };
                match as_scalar(value) {
                    Some(scalar) => pairs.push((key, scalar)),
                    None => {
                        return ConfigValue::Unsupported {
                            shape: format!("mapping containing a nested {}", shape_of(value)),
                        }
                    }
                }
            }
            ConfigValue::Map(pairs)
        }
        other => match as_scalar(&other) {
            Some(scalar) => ConfigValue::Scalar(scalar),
            None => ConfigValue::Unsupported {
                shape: shape_of(&other).to_string(),
            },
        },
    }
}

fn as_scalar(value: &Value) -> Option<Scalar> {
    if matches!(value, Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_)) {
        return None;
    }
    serde_yaml::from_value(value.clone()).ok()
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load_str(yaml: &str) -> Result<ConfigDocument, DeployError> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        ConfigDocument::load(file.path())
    }

    #[test]
    fn preserves_source_key_order() {
        let doc = load_str("zebra: 1\nalpha: 2\nmiddle: 3\n").unwrap();
        let keys: Vec<&str> = doc.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["zebra", "alpha", "middle"]);
    }

    #[test]
    fn parses_all_scalar_kinds() {
        let doc = load_str(
            "name: prod\ncount: 3\nratio: 0.5\nenabled: true\nnothing: null\n",
        )
        .unwrap();
        let values: Vec<&ConfigValue> = doc.entries().iter().map(|(_, v)| v).collect();
        assert_eq!(
            values,
            [
                &ConfigValue::Scalar(Scalar::String("prod".into())),
                &ConfigValue::Scalar(Scalar::Int(3)),
                &ConfigValue::Scalar(Scalar::Float(0.5)),
                &ConfigValue::Scalar(Scalar::Bool(true)),
                &ConfigValue::Scalar(Scalar::Null),
            ]
        );
    }

    #[test]
    fn parses_lists_and_flat_maps() {
        let doc = load_str("zones: [a, b]\nlabels:\n  env: prod\n  tier: 1\n").unwrap();
        assert_eq!(
            doc.entries()[0].1,
            ConfigValue::List(vec![
                Scalar::String("a".into()),
                Scalar::String("b".into())
            ])
        );
        assert_eq!(
            doc.entries()[1].1,
            ConfigValue::Map(vec![
                ("env".into(), Scalar::String("prod".into())),
                ("tier".into(), Scalar::Int(1)),
            ])
        );
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let err = ConfigDocument::load(Path::new("/no/such/config.yaml")).unwrap_err();
        assert!(matches!(err, DeployError::ConfigNotFound { .. }));
    }

    #[test]
    fn bad_syntax_is_yaml_parse() {
        let err = load_str("key: [unclosed\n").unwrap_err();
        assert!(matches!(err, DeployError::YamlParse { .. }));
    }

    #[test]
    fn non_mapping_root_is_document_shape() {
        let err = load_str("- just\n- a\n- list\n").unwrap_err();
        assert!(matches!(err, DeployError::DocumentShape { .. }));
    }

    #[test]
    fn empty_document_is_document_shape() {
        let err = load_str("").unwrap_err();
        assert!(matches!(err, DeployError::DocumentShape { .. }));
    }

    #[test]
    fn nested_containers_survive_as_unsupported() {
        let doc = load_str("matrix:\n  - [1, 2]\ndeep:\n  inner:\n    k: v\n").unwrap();
        assert!(matches!(
            doc.entries()[0].1,
            ConfigValue::Unsupported { .. }
        ));
        assert!(matches!(
            doc.entries()[1].1,
            ConfigValue::Unsupported { .. }
        ));
    }
}
