//! Configuration for model inference

use serde::{Deserialize, Serialize};

/// Configuration for model inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// Maximum number of records to sample (0 = all)
    pub sample_size: usize,

    /// Maximum nesting depth of a record (0 = unlimited)
    pub max_depth: usize,

    /// Detect primitives transmitted as strings ("1.5", "true")
    pub detect_string_serializable: bool,

    /// Keep fixed-arity lists as tuples while their arity does not vary
    pub infer_tuples: bool,

    /// Widen integer|float unions to float after merging
    pub widen_numbers: bool,

    /// Name hint of the top-level model
    pub root_name: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            sample_size: 0, // All records
            max_depth: 0, // Unlimited
            detect_string_serializable: true,
            infer_tuples: false,
            widen_numbers: false,
            root_name: "Model".to_string(),
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the sample size (0 = all records)
    pub fn sample_size(mut self, size: usize) -> Self {
        self.config.sample_size = size;
        self
    }

    /// Set the maximum nesting depth, 0 for no limit
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Enable or disable string-serializable detection
    pub fn detect_string_serializable(mut self, detect: bool) -> Self {
        self.config.detect_string_serializable = detect;
        self
    }

    /// Enable or disable tuple inference
    pub fn infer_tuples(mut self, infer: bool) -> Self {
        self.config.infer_tuples = infer;
        self
    }

    /// Enable or disable integer to float widening
    pub fn widen_numbers(mut self, widen: bool) -> Self {
        self.config.widen_numbers = widen;
        self
    }

    /// Set the name hint of the top-level model
    pub fn root_name(mut self, name: impl Into<String>) -> Self {
        self.config.root_name = name.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}
