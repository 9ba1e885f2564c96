//! Error types for the model registry

use thiserror::Error;

use super::meta::ModelPtr;

/// Errors raised by the model registry
///
/// Apart from `NotAMapping`, these indicate a corrupt registry table and
/// are not recoverable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Only mapping-shaped nodes can become models
    #[error("Cannot extract a model for {hint}: node is not a mapping")]
    NotAMapping { hint: String },

    /// A pointer does not resolve to any entry
    #[error("Model pointer {0} does not resolve")]
    DanglingPointer(ModelPtr),

    /// An entry was still being extracted when the registry was frozen
    #[error("Model {name} was never finalized")]
    Unfinalized { name: String },
}
