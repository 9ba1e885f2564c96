//! Error types for model inference

use thiserror::Error;

use crate::registry::RegistryError;
use crate::sample::SampleError;

/// Errors that can occur during model inference
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// A record holds a value outside the supported shapes
    #[error("Invalid sample: {0}")]
    Sample(#[from] SampleError),

    /// Invalid record structure (not a mapping at root)
    #[error("Invalid record structure: expected mapping at root, found {0}")]
    InvalidStructure(String),

    /// Maximum depth exceeded
    #[error("Maximum nesting depth exceeded at {path}: {depth} > {max}")]
    MaxDepthExceeded {
        path: String,
        depth: usize,
        max: usize,
    },

    /// No records to infer from
    #[error("No records provided for inference")]
    NoRecords,

    /// Model extraction failed
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}
