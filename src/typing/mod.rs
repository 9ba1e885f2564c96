//! Type node algebra
//!
//! Inferred shapes are [`TypeNode`] values. Observations of one logical field
//! are classified with a [`Classifier`] and folded with [`merge`], which is
//! commutative, associative and idempotent with `Unknown` as its identity.
//!
//! Strings that always parse as a more specific primitive are refined through
//! the [`StringSerializableRegistry`]; a refinement downgrades to a plain
//! string as soon as a non-parsing value is merged in.

mod classify;
mod merge;
mod node;
mod optimize;
mod string_serializable;

pub use classify::Classifier;
pub use merge::{is_compatible, is_compatible_with, merge, merge_all, merge_fields};
pub use node::{FieldMap, Scalar, StringKind, TypeNode};
pub use optimize::{OptimizeOptions, optimize};
pub use string_serializable::{
    DEFAULT_SERIALIZABLE_MODULE, ParseFn, StringSerializable, StringSerializableRegistry,
};
