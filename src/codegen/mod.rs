//! Source code generation from a model graph
//!
//! Three stages turn a [`ModelGraph`](crate::registry::ModelGraph) into text:
//!
//! - **Field planning** - identifiers, default strategies and
//!   required-before-optional ordering per model
//! - **Rendering** - a [`ModelCodeGenerator`] renders field declarations and
//!   model definitions for one object-model style
//! - **Import compilation** - imports reported by every render call are
//!   merged into one sorted block
//!
//! ## Example
//!
//! ```rust
//! use model_infer::codegen::{CodegenConfig, GeneratorKind};
//! use model_infer::inference::ModelInferrer;
//!
//! let mut inferrer = ModelInferrer::new();
//! inferrer.add_json(r#"{"id": 1, "name": "Alice"}"#).unwrap();
//!
//! let models = inferrer.finalize().unwrap();
//! let config = CodegenConfig::builder()
//!     .generator(GeneratorKind::Pydantic)
//!     .build();
//! let code = models.generate(&config).unwrap();
//! assert!(code.contains("class Model(BaseModel):"));
//! ```

mod attrs;
mod config;
mod dataclasses;
mod error;
mod fields;
mod generator;
mod imports;
mod pydantic;
mod python;

pub use attrs::AttrsGenerator;
pub use config::{CodegenConfig, CodegenConfigBuilder, DEFAULT_METADATA_KEY, GeneratorKind};
pub use dataclasses::DataclassesGenerator;
pub use error::CodegenError;
pub use fields::{DefaultStrategy, FieldPlan, FieldPlanner};
pub use generator::{
    ModelCodeGenerator, RenderContext, Rendered, generate_code, generate_with, generator_for,
};
pub use imports::{ImportPath, ImportSet, compile_imports};
pub use pydantic::{PYDANTIC_RESERVED, PydanticGenerator};
