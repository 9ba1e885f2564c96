//! Type node representation

use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::registry::ModelPtr;

/// Name of a string-serializable refinement (e.g. `IntString`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StringKind(Cow<'static, str>);

impl StringKind {
    pub const BOOLEAN: StringKind = StringKind(Cow::Borrowed("BooleanString"));
    pub const INTEGER: StringKind = StringKind(Cow::Borrowed("IntString"));
    pub const FLOAT: StringKind = StringKind(Cow::Borrowed("FloatString"));
    pub const DATE: StringKind = StringKind(Cow::Borrowed("IsoDateString"));
    pub const TIME: StringKind = StringKind(Cow::Borrowed("IsoTimeString"));
    pub const DATETIME: StringKind = StringKind(Cow::Borrowed("IsoDatetimeString"));

    pub fn new(name: impl Into<String>) -> Self {
        StringKind(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scalar kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Scalar {
    Integer,
    Float,
    Boolean,
    String,
    /// A string whose every observed value parsed as a more specific primitive
    Serialized(StringKind),
}

impl Scalar {
    pub fn type_name(&self) -> &str {
        match self {
            Scalar::Integer => "integer",
            Scalar::Float => "float",
            Scalar::Boolean => "boolean",
            Scalar::String => "string",
            Scalar::Serialized(kind) => kind.name(),
        }
    }
}

/// Mapping fields in first-seen key order
///
/// Equality ignores order: two maps are equal when they hold the same keys
/// with equal types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(IndexMap<String, TypeNode>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        FieldMap(IndexMap::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&TypeNode> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TypeNode> {
        self.0.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert or replace a field, keeping the original position on replace
    pub fn insert(&mut self, key: impl Into<String>, ty: TypeNode) {
        self.0.insert(key.into(), ty);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeNode)> {
        self.0.iter().map(|(k, t)| (k.as_str(), t))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Keys sorted lexicographically, the identity of a mapping shape
    pub fn sorted_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.0.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl FromIterator<(String, TypeNode)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, TypeNode)>>(iter: I) -> Self {
        FieldMap(iter.into_iter().collect())
    }
}

impl IntoIterator for FieldMap {
    type Item = (String, TypeNode);
    type IntoIter = indexmap::map::IntoIter<String, TypeNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Inferred type shape
///
/// Nodes are immutable values: [`merge`](crate::typing::merge) builds new nodes
/// and never touches its operands. `Optional` and `Union` are only ever built
/// in normalized form, use [`TypeNode::optional`] and [`TypeNode::union`]
/// rather than the raw variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeNode {
    /// No observation yet
    Unknown,
    /// Observed null
    Null,
    Single(Scalar),
    Optional(Box<TypeNode>),
    /// Distinct non-optional, non-union members in first-seen order
    Union(Vec<TypeNode>),
    List(Box<TypeNode>),
    Tuple(Vec<TypeNode>),
    /// Mapping shape that has not been extracted into a model yet
    Mapping(FieldMap),
    /// Extracted model in the registry
    Model(ModelPtr),
}

impl TypeNode {
    pub fn integer() -> Self {
        TypeNode::Single(Scalar::Integer)
    }

    pub fn float() -> Self {
        TypeNode::Single(Scalar::Float)
    }

    pub fn boolean() -> Self {
        TypeNode::Single(Scalar::Boolean)
    }

    pub fn string() -> Self {
        TypeNode::Single(Scalar::String)
    }

    pub fn serialized(kind: StringKind) -> Self {
        TypeNode::Single(Scalar::Serialized(kind))
    }

    pub fn list(element: TypeNode) -> Self {
        TypeNode::List(Box::new(element))
    }

    pub fn tuple(elements: Vec<TypeNode>) -> Self {
        TypeNode::Tuple(elements)
    }

    pub fn mapping<K: Into<String>>(fields: impl IntoIterator<Item = (K, TypeNode)>) -> Self {
        TypeNode::Mapping(fields.into_iter().map(|(k, t)| (k.into(), t)).collect())
    }

    /// Normalized optional: never nests, absorbs `Null` and `Unknown`
    pub fn optional(inner: TypeNode) -> Self {
        super::merge(inner, TypeNode::Null)
    }

    /// Normalized union of the given members
    ///
    /// Collapses to a single node when the members merge into one.
    pub fn union(members: impl IntoIterator<Item = TypeNode>) -> Self {
        super::merge_all(members)
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeNode::Optional(_) | TypeNode::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeNode::Unknown)
    }

    /// The type without its optional wrapper
    pub fn strip_optional(&self) -> &TypeNode {
        match self {
            TypeNode::Optional(inner) => inner,
            other => other,
        }
    }

    /// Short name of the variant, used in diagnostics
    pub fn type_name(&self) -> &str {
        match self {
            TypeNode::Unknown => "unknown",
            TypeNode::Null => "null",
            TypeNode::Single(scalar) => scalar.type_name(),
            TypeNode::Optional(_) => "optional",
            TypeNode::Union(_) => "union",
            TypeNode::List(_) => "list",
            TypeNode::Tuple(_) => "tuple",
            TypeNode::Mapping(_) => "mapping",
            TypeNode::Model(_) => "model",
        }
    }

    /// Collect every model pointer referenced anywhere in this node
    pub fn model_refs(&self, out: &mut Vec<ModelPtr>) {
        match self {
            TypeNode::Model(ptr) => {
                if !out.contains(ptr) {
                    out.push(*ptr);
                }
            }
            TypeNode::Optional(inner) | TypeNode::List(inner) => inner.model_refs(out),
            TypeNode::Union(members) | TypeNode::Tuple(members) => {
                for m in members {
                    m.model_refs(out);
                }
            }
            TypeNode::Mapping(fields) => {
                for (_, t) in fields.iter() {
                    t.model_refs(out);
                }
            }
            TypeNode::Unknown | TypeNode::Null | TypeNode::Single(_) => {}
        }
    }

    /// Check the normalization invariants of `Optional` and `Union` recursively
    pub fn is_normalized(&self) -> bool {
        match self {
            TypeNode::Optional(inner) => {
                !matches!(
                    **inner,
                    TypeNode::Optional(_) | TypeNode::Null | TypeNode::Unknown
                ) && inner.is_normalized()
            }
            TypeNode::Union(members) => {
                members.len() >= 2
                    && members.iter().all(|m| {
                        !matches!(
                            m,
                            TypeNode::Optional(_)
                                | TypeNode::Union(_)
                                | TypeNode::Null
                                | TypeNode::Unknown
                        ) && m.is_normalized()
                    })
                    && members
                        .iter()
                        .enumerate()
                        .all(|(i, m)| !members[i + 1..].contains(m))
            }
            TypeNode::List(inner) => inner.is_normalized(),
            TypeNode::Tuple(elements) => elements.iter().all(TypeNode::is_normalized),
            TypeNode::Mapping(fields) => fields.iter().all(|(_, t)| t.is_normalized()),
            TypeNode::Unknown | TypeNode::Null | TypeNode::Single(_) | TypeNode::Model(_) => true,
        }
    }
}

impl PartialEq for TypeNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeNode::Unknown, TypeNode::Unknown) | (TypeNode::Null, TypeNode::Null) => true,
            (TypeNode::Single(a), TypeNode::Single(b)) => a == b,
            (TypeNode::Optional(a), TypeNode::Optional(b)) => a == b,
            // members are distinct, so same length plus containment is set equality
            (TypeNode::Union(a), TypeNode::Union(b)) => {
                a.len() == b.len() && a.iter().all(|m| b.contains(m))
            }
            (TypeNode::List(a), TypeNode::List(b)) => a == b,
            (TypeNode::Tuple(a), TypeNode::Tuple(b)) => a == b,
            (TypeNode::Mapping(a), TypeNode::Mapping(b)) => a == b,
            (TypeNode::Model(a), TypeNode::Model(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_map_equality_ignores_order() {
        let a = TypeNode::mapping([("x", TypeNode::integer()), ("y", TypeNode::string())]);
        let b = TypeNode::mapping([("y", TypeNode::string()), ("x", TypeNode::integer())]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_union_equality_ignores_order() {
        let a = TypeNode::Union(vec![TypeNode::integer(), TypeNode::string()]);
        let b = TypeNode::Union(vec![TypeNode::string(), TypeNode::integer()]);
        assert_eq!(a, b);
        assert_ne!(a, TypeNode::Union(vec![TypeNode::integer(), TypeNode::float()]));
    }

    #[test]
    fn test_field_map_insert_keeps_position() {
        let mut fields = FieldMap::new();
        fields.insert("a", TypeNode::integer());
        fields.insert("b", TypeNode::integer());
        fields.insert("a", TypeNode::string());
        let keys: Vec<&str> = fields.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(fields.get("a"), Some(&TypeNode::string()));
    }

    #[test]
    fn test_optional_constructor_normalizes() {
        let once = TypeNode::optional(TypeNode::integer());
        assert_eq!(once, TypeNode::Optional(Box::new(TypeNode::integer())));
        assert_eq!(TypeNode::optional(once.clone()), once);
        assert_eq!(TypeNode::optional(TypeNode::Null), TypeNode::Null);
        assert_eq!(TypeNode::optional(TypeNode::Unknown), TypeNode::Null);
    }

    #[test]
    fn test_is_normalized_detects_nesting() {
        let nested = TypeNode::Optional(Box::new(TypeNode::Optional(Box::new(
            TypeNode::integer(),
        ))));
        assert!(!nested.is_normalized());

        let union_in_union = TypeNode::Union(vec![
            TypeNode::integer(),
            TypeNode::Union(vec![TypeNode::string(), TypeNode::float()]),
        ]);
        assert!(!union_in_union.is_normalized());

        let duplicate = TypeNode::Union(vec![TypeNode::integer(), TypeNode::integer()]);
        assert!(!duplicate.is_normalized());
    }

    #[test]
    fn test_model_refs_deduplicated() {
        let p = ModelPtr::new(0);
        let q = ModelPtr::new(1);
        let node = TypeNode::mapping([
            ("a", TypeNode::Model(p)),
            ("b", TypeNode::list(TypeNode::Model(p))),
            ("c", TypeNode::optional(TypeNode::Model(q))),
        ]);
        let mut refs = Vec::new();
        node.model_refs(&mut refs);
        assert_eq!(refs, vec![p, q]);
    }
}
