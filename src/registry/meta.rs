//! Model entries and pointers

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::typing::FieldMap;

/// Stable reference to a model owned by the registry
///
/// An index into the registry's table. Pointers never own the model, so
/// cyclic model graphs are plain index cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelPtr(usize);

impl ModelPtr {
    pub(crate) fn new(index: usize) -> Self {
        ModelPtr(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ModelPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A finalized model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMeta {
    pub ptr: ModelPtr,
    /// Unique across the whole graph
    pub name: String,
    /// Original field keys to their types, in first-seen order
    pub fields: FieldMap,
    /// Other models referenced by this one's fields
    pub nested: BTreeSet<ModelPtr>,
    /// A field refers back to this model
    pub is_self_referential: bool,
}

impl ModelMeta {
    pub fn references(&self, other: ModelPtr) -> bool {
        self.nested.contains(&other) || (self.is_self_referential && other == self.ptr)
    }
}
