//! Sample value trees
//!
//! Every observed record is converted into a [`SampleValue`] before inference.
//! The set of shapes is closed: null, boolean, integer, float, string, ordered
//! sequence and mapping with string keys. Anything else (YAML tags, non-string
//! keys, non-finite floats) is rejected with the path of the offending value.

mod error;

pub use error::SampleError;

use serde::{Deserialize, Serialize};

/// A single observed value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SampleValue {
    Null,
    Bool(bool),
    Integer(i128),
    Float(f64),
    String(String),
    List(Vec<SampleValue>),
    /// Mapping entries in the order they appeared in the payload
    Map(Vec<(String, SampleValue)>),
}

impl SampleValue {
    /// Parse a JSON document into a sample tree
    pub fn parse_json(raw: &str) -> Result<Self, SampleError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Ok(Self::from_json(&value))
    }

    /// Parse a YAML document into a sample tree
    pub fn parse_yaml(raw: &str) -> Result<Self, SampleError> {
        let value: serde_yaml::Value = serde_yaml::from_str(raw)?;
        Self::from_yaml(&value)
    }

    /// Convert a parsed JSON value
    ///
    /// JSON cannot express anything outside the supported set, so this never fails.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => SampleValue::Null,
            Value::Bool(b) => SampleValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SampleValue::Integer(i as i128)
                } else if let Some(u) = n.as_u64() {
                    SampleValue::Integer(u as i128)
                } else {
                    SampleValue::Float(n.as_f64().unwrap_or_default())
                }
            }
            Value::String(s) => SampleValue::String(s.clone()),
            Value::Array(items) => SampleValue::List(items.iter().map(Self::from_json).collect()),
            Value::Object(obj) => SampleValue::Map(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert a parsed YAML value
    pub fn from_yaml(value: &serde_yaml::Value) -> Result<Self, SampleError> {
        yaml_to_sample(value, "$")
    }

    /// Short name of the value's shape, used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            SampleValue::Null => "null",
            SampleValue::Bool(_) => "boolean",
            SampleValue::Integer(_) => "integer",
            SampleValue::Float(_) => "float",
            SampleValue::String(_) => "string",
            SampleValue::List(_) => "list",
            SampleValue::Map(_) => "mapping",
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self, SampleValue::Map(_))
    }

    /// Nesting depth of the tree (scalars are depth 0)
    pub fn depth(&self) -> usize {
        match self {
            SampleValue::List(items) => 1 + items.iter().map(Self::depth).max().unwrap_or(0),
            SampleValue::Map(entries) => {
                1 + entries.iter().map(|(_, v)| v.depth()).max().unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Find the first container nested deeper than `max`, returning its path and depth
    pub fn find_deeper_than(&self, max: usize) -> Option<(String, usize)> {
        find_deeper(self, "$", 0, max)
    }
}

fn find_deeper(value: &SampleValue, path: &str, depth: usize, max: usize) -> Option<(String, usize)> {
    let children: Vec<(String, &SampleValue)> = match value {
        SampleValue::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (index_path(path, i), v))
            .collect(),
        SampleValue::Map(entries) => entries
            .iter()
            .map(|(k, v)| (key_path(path, k), v))
            .collect(),
        _ => return None,
    };

    if depth >= max && !children.is_empty() {
        return Some((path.to_string(), depth + 1));
    }

    children
        .iter()
        .find_map(|(p, v)| find_deeper(v, p, depth + 1, max))
}

fn yaml_to_sample(value: &serde_yaml::Value, path: &str) -> Result<SampleValue, SampleError> {
    use serde_yaml::Value;

    match value {
        Value::Null => Ok(SampleValue::Null),
        Value::Bool(b) => Ok(SampleValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(SampleValue::Integer(i as i128))
            } else if let Some(u) = n.as_u64() {
                Ok(SampleValue::Integer(u as i128))
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() => Ok(SampleValue::Float(f)),
                    _ => Err(SampleError::UnsupportedValue {
                        path: path.to_string(),
                        kind: format!("non-finite number {}", n),
                    }),
                }
            }
        }
        Value::String(s) => Ok(SampleValue::String(s.clone())),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| yaml_to_sample(v, &index_path(path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(SampleValue::List),
        Value::Mapping(mapping) => {
            let mut entries = Vec::with_capacity(mapping.len());
            for (k, v) in mapping {
                let key = match k {
                    Value::String(s) => s.clone(),
                    other => {
                        return Err(SampleError::UnsupportedValue {
                            path: path.to_string(),
                            kind: format!("non-string mapping key {:?}", other),
                        });
                    }
                };
                let child = key_path(path, &key);
                entries.push((key, yaml_to_sample(v, &child)?));
            }
            Ok(SampleValue::Map(entries))
        }
        Value::Tagged(tagged) => Err(SampleError::UnsupportedValue {
            path: path.to_string(),
            kind: format!("tagged value {}", tagged.tag),
        }),
    }
}

pub(crate) fn key_path(parent: &str, key: &str) -> String {
    format!("{}.{}", parent, key)
}

pub(crate) fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_preserves_key_order() {
        let value = SampleValue::parse_json(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        match value {
            SampleValue::Map(entries) => {
                let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
            }
            other => panic!("Expected mapping, got {:?}", other),
        }
    }

    #[test]
    fn test_json_numbers() {
        let value = SampleValue::parse_json(r#"[1, 1.5, 18446744073709551615]"#).unwrap();
        assert_eq!(
            value,
            SampleValue::List(vec![
                SampleValue::Integer(1),
                SampleValue::Float(1.5),
                SampleValue::Integer(u64::MAX as i128),
            ])
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SampleValue::parse_json("{not json"),
            Err(SampleError::Parse(_))
        ));
    }

    #[test]
    fn test_yaml_mapping() {
        let value = SampleValue::parse_yaml("name: Alice\ntags:\n  - a\n  - b\n").unwrap();
        assert_eq!(
            value,
            SampleValue::Map(vec![
                ("name".to_string(), SampleValue::String("Alice".to_string())),
                (
                    "tags".to_string(),
                    SampleValue::List(vec![
                        SampleValue::String("a".to_string()),
                        SampleValue::String("b".to_string()),
                    ])
                ),
            ])
        );
    }

    #[test]
    fn test_yaml_non_string_key_reports_path() {
        let err = SampleValue::parse_yaml("outer:\n  1: x\n").unwrap_err();
        match err {
            SampleError::UnsupportedValue { path, .. } => assert_eq!(path, "$.outer"),
            other => panic!("Unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_yaml_tagged_value_rejected() {
        let err = SampleValue::parse_yaml("items:\n  - !custom 5\n").unwrap_err();
        match err {
            SampleError::UnsupportedValue { path, kind } => {
                assert_eq!(path, "$.items[0]");
                assert!(kind.contains("custom"));
            }
            other => panic!("Unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_yaml_non_finite_rejected() {
        let err = SampleValue::parse_yaml("value: .nan\n").unwrap_err();
        assert!(matches!(err, SampleError::UnsupportedValue { ref path, .. } if path == "$.value"));
    }

    #[test]
    fn test_depth() {
        let value = SampleValue::parse_json(r#"{"a": {"b": [1, 2]}, "c": 3}"#).unwrap();
        assert_eq!(value.depth(), 3);
        assert_eq!(SampleValue::Integer(1).depth(), 0);
    }

    #[test]
    fn test_find_deeper_than() {
        let value = SampleValue::parse_json(r#"{"a": {"b": {"c": 1}}}"#).unwrap();
        assert_eq!(value.find_deeper_than(5), None);
        assert_eq!(value.find_deeper_than(2), Some(("$.a.b".to_string(), 3)));
    }
}
