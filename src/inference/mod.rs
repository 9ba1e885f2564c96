//! Model inference from sample records
//!
//! This module drives the pipeline up to a finalized model graph: records are
//! classified into type nodes, folded with `merge`, simplified, and handed to
//! the model registry.
//!
//! ## Features
//!
//! - **Type inference** - scalars, lists, tuples and nested mappings
//! - **String refinements** - numbers and booleans transmitted as strings
//! - **Optional tracking** - fields missing or null in some records
//! - **Model deduplication** - one model per distinct shape, cycles included
//! - **Generation notes** - type conflicts and widened refinements
//!
//! ## Example
//!
//! ```rust
//! use model_infer::inference::{InferenceConfig, ModelInferrer};
//!
//! let config = InferenceConfig::builder().root_name("user").build();
//! let mut inferrer = ModelInferrer::with_config(config);
//!
//! inferrer.add_json(r#"{"name": "Alice", "age": 30}"#).unwrap();
//! inferrer.add_json(r#"{"name": "Bob", "age": 25, "email": "bob@example.com"}"#).unwrap();
//!
//! let models = inferrer.finalize().unwrap();
//! let user = models.graph.get(models.root).unwrap();
//! assert_eq!(user.name, "User");
//! assert_eq!(user.fields.len(), 3);
//! ```

mod config;
mod error;
mod inferrer;

pub use config::{InferenceConfig, InferenceConfigBuilder};
pub use error::InferenceError;
pub use inferrer::{InferenceStats, InferredModels, ModelInferrer};
