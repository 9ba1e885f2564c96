//! Post-merge simplification
//!
//! Runs once over the fully merged tree. Merge itself keeps every distinct
//! refinement so it stays associative; this pass then collapses refinements
//! that one descriptor can represent, and optionally widens int|float.

use tracing::trace;

use super::merge::merge_all;
use super::node::{Scalar, StringKind, TypeNode};
use super::string_serializable::StringSerializableRegistry;

/// Options of the optimization pass
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimizeOptions {
    /// Replace an integer|float union by float
    pub widen_numbers: bool,
}

/// Simplify a merged type node
pub fn optimize(
    node: TypeNode,
    serializables: &StringSerializableRegistry,
    options: OptimizeOptions,
) -> TypeNode {
    match node {
        TypeNode::Optional(inner) => {
            TypeNode::optional(optimize(*inner, serializables, options))
        }
        TypeNode::List(element) => TypeNode::list(optimize(*element, serializables, options)),
        TypeNode::Tuple(elements) => TypeNode::tuple(
            elements
                .into_iter()
                .map(|e| optimize(e, serializables, options))
                .collect(),
        ),
        TypeNode::Mapping(fields) => TypeNode::Mapping(
            fields
                .into_iter()
                .map(|(k, t)| (k, optimize(t, serializables, options)))
                .collect(),
        ),
        TypeNode::Union(members) => {
            let members: Vec<TypeNode> = members
                .into_iter()
                .map(|m| optimize(m, serializables, options))
                .collect();
            let members = collapse_refinements(members, serializables);
            let members = if options.widen_numbers {
                widen_numbers(members)
            } else {
                members
            };
            merge_all(members)
        }
        other => other,
    }
}

fn refinement_kind(node: &TypeNode) -> Option<&StringKind> {
    match node {
        TypeNode::Single(Scalar::Serialized(kind)) => Some(kind),
        _ => None,
    }
}

fn collapse_refinements(
    members: Vec<TypeNode>,
    serializables: &StringSerializableRegistry,
) -> Vec<TypeNode> {
    let kinds: Vec<StringKind> = members
        .iter()
        .filter_map(refinement_kind)
        .cloned()
        .collect();
    if kinds.len() < 2 {
        return members;
    }

    let resolved = serializables.resolve(&kinds);
    if resolved.len() == kinds.len() {
        return members;
    }
    trace!(from = kinds.len(), to = resolved.len(), "collapsed string refinements");

    // each surviving kind takes the slot of the first refinement it replaces
    let mut out = Vec::with_capacity(members.len());
    let mut placed: Vec<StringKind> = Vec::new();
    for member in members {
        let Some(kind) = refinement_kind(&member) else {
            out.push(member);
            continue;
        };
        let target = resolved
            .iter()
            .find(|r| *r == kind || serializables.replaces(r, kind))
            .cloned()
            .unwrap_or_else(|| kind.clone());
        if !placed.contains(&target) {
            placed.push(target.clone());
            out.push(TypeNode::serialized(target));
        }
    }
    out
}

fn widen_numbers(members: Vec<TypeNode>) -> Vec<TypeNode> {
    let has_float = members
        .iter()
        .any(|m| matches!(m, TypeNode::Single(Scalar::Float)));
    if !has_float {
        return members;
    }
    members
        .into_iter()
        .map(|m| match m {
            TypeNode::Single(Scalar::Integer) => TypeNode::float(),
            other => other,
        })
        .collect()
}
