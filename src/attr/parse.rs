//! Building attribute batches from YAML and JSON documents.
//!
//! A top-level mapping becomes an ordered batch. Nested mappings become
//! groups and sequences become list scalars. Key order is the document order.

use super::Attr;
use crate::value::Value;
use thiserror::Error;

/// AttrError represents a document that cannot be read as an attribute batch.
#[derive(Debug, Error)]
pub enum AttrError {
    #[error("expected a mapping of attributes, got {found}")]
    NotAMapping { found: &'static str },

    #[error("{path}: attribute keys must be strings")]
    NonStringKey { path: String },

    #[error("{path}: mappings are not allowed inside lists")]
    MappingInList { path: String },

    #[error("{path}: numeric value out of range")]
    NumberOutOfRange { path: String },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses a YAML (or JSON) document holding a mapping into an attribute batch.
pub fn attrs_from_yaml(yaml: &str) -> Result<Vec<Attr>, AttrError> {
    let doc: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    attrs_from_yaml_value(&doc)
}

/// Converts an already parsed YAML value holding a mapping into an attribute batch.
///
/// A null document is an empty batch.
pub fn attrs_from_yaml_value(doc: &serde_yaml::Value) -> Result<Vec<Attr>, AttrError> {
    match doc {
        serde_yaml::Value::Mapping(mapping) => yaml_mapping(mapping, ""),
        serde_yaml::Value::Null => Ok(Vec::new()),
        serde_yaml::Value::Tagged(tagged) => attrs_from_yaml_value(&tagged.value),
        other => Err(AttrError::NotAMapping {
            found: yaml_kind(other),
        }),
    }
}

/// Parses a JSON document holding an object into an attribute batch.
pub fn attrs_from_json(json: &str) -> Result<Vec<Attr>, AttrError> {
    let doc: serde_json::Value = serde_json::from_str(json)?;
    match &doc {
        serde_json::Value::Object(object) => json_object(object, ""),
        serde_json::Value::Null => Ok(Vec::new()),
        other => Err(AttrError::NotAMapping {
            found: json_kind(other),
        }),
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn yaml_mapping(mapping: &serde_yaml::Mapping, path: &str) -> Result<Vec<Attr>, AttrError> {
    let mut attrs = Vec::with_capacity(mapping.len());
    for (k, v) in mapping {
        let key = match k {
            serde_yaml::Value::String(s) => s.clone(),
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            _ => {
                return Err(AttrError::NonStringKey {
                    path: path.to_string(),
                })
            }
        };
        let here = child_path(path, &key);
        let attr = match v {
            serde_yaml::Value::Mapping(inner) => Attr::group(key, yaml_mapping(inner, &here)?),
            other => Attr::new(key, yaml_scalar(other, &here)?),
        };
        attrs.push(attr);
    }
    Ok(attrs)
}

fn yaml_scalar(v: &serde_yaml::Value, path: &str) -> Result<Value, AttrError> {
    Ok(match v {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(*b),
        serde_yaml::Value::Number(n) => number(n.as_i64(), n.is_u64(), n.as_f64(), path)?,
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(items) => Value::List(
            items
                .iter()
                .map(|item| yaml_scalar(item, path))
                .collect::<Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(_) => {
            return Err(AttrError::MappingInList {
                path: path.to_string(),
            })
        }
        serde_yaml::Value::Tagged(tagged) => yaml_scalar(&tagged.value, path)?,
    })
}

/// Maps a decoded number onto a scalar. Integers that only fit in a u64 are
/// rejected rather than silently widened to a float.
fn number(int: Option<i64>, is_u64: bool, float: Option<f64>, path: &str) -> Result<Value, AttrError> {
    match int {
        Some(i) => Ok(Value::Int(i)),
        None if is_u64 => Err(AttrError::NumberOutOfRange {
            path: path.to_string(),
        }),
        None => Ok(Value::Float(float.unwrap_or(f64::NAN))),
    }
}

fn json_object(
    object: &serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Result<Vec<Attr>, AttrError> {
    let mut attrs = Vec::with_capacity(object.len());
    for (key, v) in object {
        let here = child_path(path, key);
        let attr = match v {
            serde_json::Value::Object(inner) => Attr::group(key.clone(), json_object(inner, &here)?),
            other => Attr::new(key.clone(), json_scalar(other, &here)?),
        };
        attrs.push(attr);
    }
    Ok(attrs)
}

fn json_scalar(v: &serde_json::Value, path: &str) -> Result<Value, AttrError> {
    Ok(match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => number(n.as_i64(), n.is_u64(), n.as_f64(), path)?,
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => Value::List(
            items
                .iter()
                .map(|item| json_scalar(item, path))
                .collect::<Result<_, _>>()?,
        ),
        serde_json::Value::Object(_) => {
            return Err(AttrError::MappingInList {
                path: path.to_string(),
            })
        }
    })
}

fn yaml_kind(v: &serde_yaml::Value) -> &'static str {
    match v {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
