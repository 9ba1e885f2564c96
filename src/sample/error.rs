//! Error types for sample value conversion

use thiserror::Error;

/// Errors raised while turning raw payloads into sample value trees
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SampleError {
    /// Raw text could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value outside the supported set (null, boolean, number, string, sequence, mapping)
    #[error("Unsupported value at {path}: {kind}")]
    UnsupportedValue { path: String, kind: String },
}

impl From<serde_json::Error> for SampleError {
    fn from(e: serde_json::Error) -> Self {
        SampleError::Parse(e.to_string())
    }
}

impl From<serde_yaml::Error> for SampleError {
    fn from(e: serde_yaml::Error) -> Self {
        SampleError::Parse(e.to_string())
    }
}
