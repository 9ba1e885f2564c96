//! Merging of type nodes
//!
//! `merge` is total, commutative, associative and idempotent, with `Unknown`
//! as the identity. Observations of the same logical field are folded through
//! it to get one type describing all of them.

use tracing::trace;

use super::node::{FieldMap, Scalar, TypeNode};
use crate::registry::ModelPtr;

/// Merge two observations into one type
pub fn merge(a: TypeNode, b: TypeNode) -> TypeNode {
    let (inner_a, null_a) = split_nullable(a);
    let (inner_b, null_b) = split_nullable(b);

    let inner = match (inner_a, inner_b) {
        (None, None) => None,
        (Some(x), None) | (None, Some(x)) => Some(x),
        (Some(x), Some(y)) => Some(join(x, y)),
    };

    match (inner, null_a || null_b) {
        (Some(t), true) => TypeNode::Optional(Box::new(t)),
        (Some(t), false) => t,
        (None, true) => TypeNode::Null,
        (None, false) => TypeNode::Unknown,
    }
}

/// Left fold of [`merge`] starting from `Unknown`
pub fn merge_all(nodes: impl IntoIterator<Item = TypeNode>) -> TypeNode {
    nodes.into_iter().fold(TypeNode::Unknown, merge)
}

/// Merge two field maps: shared keys merge, keys missing on one side become optional
///
/// Keys keep first-seen order: those of `left`, then the ones only `right` has.
pub fn merge_fields(left: FieldMap, mut right: FieldMap) -> FieldMap {
    let mut out = FieldMap::with_capacity(left.len().max(right.len()));

    for (key, ty) in left {
        let merged = match right.get_mut(&key) {
            // taken out here, skipped below because `out` already holds the key
            Some(other) => merge(ty, std::mem::replace(other, TypeNode::Unknown)),
            None => TypeNode::optional(ty),
        };
        out.insert(key, merged);
    }
    for (key, ty) in right {
        if !out.contains_key(&key) {
            out.insert(key, TypeNode::optional(ty));
        }
    }

    out
}

/// Whether two field types can describe the same logical field without
/// introducing a new union alternative
///
/// Mappings and models are compared shallowly: any two object shapes are
/// compatible with each other. Use [`is_compatible_with`] to compare them
/// structurally.
pub fn is_compatible(a: &TypeNode, b: &TypeNode) -> bool {
    is_compatible_with(a, b, &|_, _| true)
}

/// [`is_compatible`] with `objects` deciding whether two mapping or model
/// members are compatible
pub fn is_compatible_with(
    a: &TypeNode,
    b: &TypeNode,
    objects: &dyn Fn(&TypeNode, &TypeNode) -> bool,
) -> bool {
    let a = a.strip_optional();
    let b = b.strip_optional();
    if matches!(a, TypeNode::Unknown | TypeNode::Null)
        || matches!(b, TypeNode::Unknown | TypeNode::Null)
    {
        return true;
    }

    let left = members_ref(a);
    let right = members_ref(b);
    covers(&left, &right, objects) || covers(&right, &left, objects)
}

fn covers(
    xs: &[&TypeNode],
    ys: &[&TypeNode],
    objects: &dyn Fn(&TypeNode, &TypeNode) -> bool,
) -> bool {
    xs.iter()
        .all(|x| ys.iter().any(|y| members_compatible(x, y, objects)))
}

fn members_compatible(
    x: &TypeNode,
    y: &TypeNode,
    objects: &dyn Fn(&TypeNode, &TypeNode) -> bool,
) -> bool {
    match (Family::of(x), Family::of(y)) {
        (Family::Sequence, Family::Sequence) => {
            is_compatible_with(&sequence_element(x), &sequence_element(y), objects)
        }
        (Family::Mapping | Family::Model(_), Family::Mapping | Family::Model(_)) => objects(x, y),
        (fx, fy) => fx == fy,
    }
}

fn members_ref(node: &TypeNode) -> Vec<&TypeNode> {
    match node {
        TypeNode::Union(members) => members.iter().collect(),
        other => vec![other],
    }
}

fn sequence_element(node: &TypeNode) -> TypeNode {
    match node {
        TypeNode::List(element) => (**element).clone(),
        TypeNode::Tuple(elements) => merge_all(elements.iter().cloned()),
        _ => TypeNode::Unknown,
    }
}

/// Union membership class: a union holds at most one member per family,
/// except the text family which may hold several refinements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Integer,
    Float,
    Boolean,
    Text,
    Sequence,
    Mapping,
    Model(ModelPtr),
    Other,
}

impl Family {
    fn of(node: &TypeNode) -> Family {
        match node {
            TypeNode::Single(Scalar::Integer) => Family::Integer,
            TypeNode::Single(Scalar::Float) => Family::Float,
            TypeNode::Single(Scalar::Boolean) => Family::Boolean,
            TypeNode::Single(Scalar::String | Scalar::Serialized(_)) => Family::Text,
            TypeNode::List(_) | TypeNode::Tuple(_) => Family::Sequence,
            TypeNode::Mapping(_) => Family::Mapping,
            TypeNode::Model(ptr) => Family::Model(*ptr),
            TypeNode::Unknown | TypeNode::Null | TypeNode::Optional(_) | TypeNode::Union(_) => {
                Family::Other
            }
        }
    }
}

fn split_nullable(node: TypeNode) -> (Option<TypeNode>, bool) {
    match node {
        TypeNode::Unknown => (None, false),
        TypeNode::Null => (None, true),
        TypeNode::Optional(inner) => (split_nullable(*inner).0, true),
        other => (Some(other), false),
    }
}

/// Join two non-null, non-optional nodes
fn join(a: TypeNode, b: TypeNode) -> TypeNode {
    let mut members = into_members(a);
    for item in into_members(b) {
        absorb(&mut members, item);
    }

    if members.len() == 1 {
        members.remove(0)
    } else {
        TypeNode::Union(members)
    }
}

fn into_members(node: TypeNode) -> Vec<TypeNode> {
    match node {
        TypeNode::Union(members) => members,
        other => vec![other],
    }
}

fn is_refinement(node: &TypeNode) -> bool {
    matches!(node, TypeNode::Single(Scalar::Serialized(_)))
}

fn is_plain_string(node: &TypeNode) -> bool {
    matches!(node, TypeNode::Single(Scalar::String))
}

/// Add one member to a normalized member list
fn absorb(members: &mut Vec<TypeNode>, item: TypeNode) {
    match item {
        TypeNode::Single(Scalar::String) => {
            let first_refinement = members.iter().position(is_refinement);
            let has_plain = members.iter().any(is_plain_string);
            if first_refinement.is_some() {
                trace!("string refinements downgraded to plain string");
            }
            match (has_plain, first_refinement) {
                (true, _) => members.retain(|m| !is_refinement(m)),
                (false, Some(i)) => {
                    members[i] = TypeNode::string();
                    members.retain(|m| !is_refinement(m));
                }
                (false, None) => members.push(TypeNode::string()),
            }
        }
        TypeNode::Single(Scalar::Serialized(kind)) => {
            if members.iter().any(is_plain_string) {
                trace!(kind = %kind, "string refinement downgraded to plain string");
                return;
            }
            let node = TypeNode::Single(Scalar::Serialized(kind));
            if !members.contains(&node) {
                members.push(node);
            }
        }
        item => {
            let family = Family::of(&item);
            match members.iter().position(|m| Family::of(m) == family) {
                Some(i) => {
                    let existing = std::mem::replace(&mut members[i], TypeNode::Unknown);
                    members[i] = join_same_family(existing, item);
                }
                None => members.push(item),
            }
        }
    }
}

fn join_same_family(a: TypeNode, b: TypeNode) -> TypeNode {
    match (a, b) {
        (TypeNode::List(x), TypeNode::List(y)) => TypeNode::List(Box::new(merge(*x, *y))),
        (TypeNode::Tuple(xs), TypeNode::Tuple(ys)) if xs.len() == ys.len() => TypeNode::Tuple(
            xs.into_iter()
                .zip(ys)
                .map(|(x, y)| merge(x, y))
                .collect(),
        ),
        // arity varies across samples, so it stops being meaningful
        (a @ (TypeNode::List(_) | TypeNode::Tuple(_)), b @ (TypeNode::List(_) | TypeNode::Tuple(_))) => {
            let elements = sequence_elements(a).into_iter().chain(sequence_elements(b));
            TypeNode::List(Box::new(merge_all(elements)))
        }
        (TypeNode::Mapping(x), TypeNode::Mapping(y)) => TypeNode::Mapping(merge_fields(x, y)),
        // same scalar kind or same model pointer
        (a, _) => a,
    }
}

fn sequence_elements(node: TypeNode) -> Vec<TypeNode> {
    match node {
        TypeNode::List(element) => vec![*element],
        TypeNode::Tuple(elements) => elements,
        _ => Vec::new(),
    }
}
