//! Model Infer - typed data models from sample API payloads
//!
//! Provides:
//! - Sample value trees (from JSON and YAML)
//! - Type inference with a mergeable type algebra
//! - Detection of primitives transmitted as strings
//! - A model registry deduplicating nested shapes, cycles included
//! - Code generation for attrs, dataclasses and pydantic models

pub mod codegen;
pub mod inference;
pub mod naming;
pub mod notes;
pub mod registry;
pub mod sample;
pub mod typing;

// Re-export commonly used types
pub use codegen::{CodegenConfig, CodegenError, GeneratorKind, ModelCodeGenerator, generate_code};
pub use inference::{InferenceConfig, InferenceError, InferredModels, ModelInferrer};
pub use notes::GenerationNote;
pub use registry::{ModelGraph, ModelMeta, ModelPtr, ModelRegistry, RegistryError};
pub use sample::{SampleError, SampleValue};
pub use typing::{StringKind, StringSerializable, StringSerializableRegistry, TypeNode, merge};
