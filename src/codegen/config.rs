//! Configuration for code generation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CodegenError;

/// Metadata key recording the original field key in attrs/dataclasses output
pub const DEFAULT_METADATA_KEY: &str = "original_name";

/// Target object-model style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    #[default]
    Attrs,
    Dataclasses,
    Pydantic,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 3] = [
        GeneratorKind::Attrs,
        GeneratorKind::Dataclasses,
        GeneratorKind::Pydantic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::Attrs => "attrs",
            GeneratorKind::Dataclasses => "dataclasses",
            GeneratorKind::Pydantic => "pydantic",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeneratorKind {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "attrs" | "attr" => Ok(GeneratorKind::Attrs),
            "dataclasses" | "dataclass" => Ok(GeneratorKind::Dataclasses),
            "pydantic" => Ok(GeneratorKind::Pydantic),
            _ => Err(CodegenError::UnknownGenerator(s.to_string())),
        }
    }
}

/// Configuration for code generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodegenConfig {
    /// Backend rendering the models
    pub generator: GeneratorKind,

    /// Metadata key holding the original field key
    pub metadata_key: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorKind::default(),
            metadata_key: DEFAULT_METADATA_KEY.to_string(),
        }
    }
}

impl CodegenConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> CodegenConfigBuilder {
        CodegenConfigBuilder::default()
    }
}

/// Builder for CodegenConfig
#[derive(Debug, Default)]
pub struct CodegenConfigBuilder {
    config: CodegenConfig,
}

impl CodegenConfigBuilder {
    /// Select the backend
    pub fn generator(mut self, generator: GeneratorKind) -> Self {
        self.config.generator = generator;
        self
    }

    /// Set the metadata key for original field keys
    pub fn metadata_key(mut self, key: impl Into<String>) -> Self {
        self.config.metadata_key = key.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> CodegenConfig {
        self.config
    }
}
