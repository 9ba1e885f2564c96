//! Error types for code generation

use thiserror::Error;

use crate::registry::RegistryError;

/// Errors that can occur while rendering models
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodegenError {
    /// Generator selection by name failed
    #[error("Unknown code generator: {0}")]
    UnknownGenerator(String),

    /// A field references a model the graph does not hold
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}
