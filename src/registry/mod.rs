//! Model registry
//!
//! Turns mapping-shaped type nodes into named, deduplicated models. Two
//! mappings with the same key set and compatible field types always resolve
//! to the same [`ModelPtr`]; their fields are merged into the one entry.
//! Nested objects are compared by shape, so parents whose nested mappings
//! differ stay separate models.
//!
//! Extraction marks an entry as in progress before resolving its fields, so a
//! nested mapping of the same shape resolves to the entry being built instead
//! of recursing. Self-referential payloads therefore yield exactly one model
//! that points to itself.
//!
//! ## Example
//!
//! ```rust
//! use model_infer::registry::ModelRegistry;
//! use model_infer::typing::TypeNode;
//!
//! let node = TypeNode::mapping([
//!     ("id", TypeNode::integer()),
//!     (
//!         "parent",
//!         TypeNode::optional(TypeNode::mapping([
//!             ("id", TypeNode::integer()),
//!             ("parent", TypeNode::Null),
//!         ])),
//!     ),
//! ]);
//!
//! let mut registry = ModelRegistry::new();
//! let root = registry.extract(&node, "category").unwrap();
//! let graph = registry.finalize().unwrap();
//! assert_eq!(graph.get(root).unwrap().name, "Category");
//! assert_eq!(graph.len(), 1);
//! ```

mod error;
mod graph;
mod meta;

pub use error::RegistryError;
pub use graph::ModelGraph;
pub use meta::{ModelMeta, ModelPtr};

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::Graph;
use petgraph::algo::tarjan_scc;
use tracing::debug;

use crate::naming::{RESERVED_MODEL_NAMES, pascal_case, singularize, unique_name};
use crate::notes::GenerationNote;
use crate::typing::{FieldMap, TypeNode, is_compatible_with, merge_fields};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    InProgress,
    Done,
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    /// Fields as first observed, compared against while resolution is running
    raw: FieldMap,
    /// Resolved fields, set once the first resolution finished
    fields: Option<FieldMap>,
    /// Same-shape mappings found while this entry was in progress
    pending: Vec<FieldMap>,
    state: EntryState,
}

impl Entry {
    fn shape(&self) -> &FieldMap {
        self.fields.as_ref().unwrap_or(&self.raw)
    }
}

/// Owns every extracted model for one generation run
///
/// Extraction takes `&mut self`, so lookup and insert of a shape always
/// happen under exclusive access.
#[derive(Debug)]
pub struct ModelRegistry {
    entries: Vec<Entry>,
    /// Sorted key set to the entries with that key set
    by_keys: HashMap<Vec<String>, Vec<ModelPtr>>,
    names: HashSet<String>,
    notes: Vec<GenerationNote>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelRegistry {
    /// Empty registry; model names never take a Python keyword or a name
    /// the generated code imports
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_keys: HashMap::new(),
            names: RESERVED_MODEL_NAMES.iter().map(|n| n.to_string()).collect(),
            notes: Vec::new(),
        }
    }

    /// Keep `name` free, e.g. for a custom refinement class
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Number of models extracted so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn name_of(&self, ptr: ModelPtr) -> Result<&str, RegistryError> {
        self.entries
            .get(ptr.index())
            .map(|e| e.name.as_str())
            .ok_or(RegistryError::DanglingPointer(ptr))
    }

    pub fn notes(&self) -> &[GenerationNote] {
        &self.notes
    }

    /// Record a finding to carry into the finalized graph
    pub fn note(&mut self, note: GenerationNote) {
        self.notes.push(note);
    }

    /// Extract the model described by a mapping node
    ///
    /// Returns the pointer of an existing compatible model when there is one.
    /// `hint` names a newly allocated model (PascalCase, numeric suffix on
    /// collision). An already-extracted `Model` node resolves to its pointer.
    pub fn extract(&mut self, node: &TypeNode, hint: &str) -> Result<ModelPtr, RegistryError> {
        let fields = match node {
            TypeNode::Mapping(fields) => fields,
            TypeNode::Model(ptr) => {
                return match self.entries.get(ptr.index()) {
                    Some(_) => Ok(*ptr),
                    None => Err(RegistryError::DanglingPointer(*ptr)),
                };
            }
            _ => {
                return Err(RegistryError::NotAMapping {
                    hint: hint.to_string(),
                });
            }
        };

        let keys = fields.sorted_keys();
        if let Some(ptr) = self.find_compatible(&keys, fields) {
            let state = self.entries[ptr.index()].state;
            match state {
                EntryState::InProgress => self.entries[ptr.index()].pending.push(fields.clone()),
                EntryState::Done => {
                    let resolved = self.resolve_fields(fields)?;
                    let entry = &mut self.entries[ptr.index()];
                    let current = entry.fields.take().unwrap_or_default();
                    entry.fields = Some(merge_fields(current, resolved));
                }
            }
            return Ok(ptr);
        }

        let ptr = self.allocate(hint, keys, fields.clone());
        let mut resolved = self.resolve_fields(fields)?;

        // merge every same-shape mapping met during resolution, which may queue more
        loop {
            let pending = std::mem::take(&mut self.entries[ptr.index()].pending);
            if pending.is_empty() {
                break;
            }
            for raw in pending {
                let more = self.resolve_fields(&raw)?;
                resolved = merge_fields(resolved, more);
            }
        }

        let entry = &mut self.entries[ptr.index()];
        entry.fields = Some(resolved);
        entry.state = EntryState::Done;
        Ok(ptr)
    }

    fn find_compatible(&self, keys: &[String], fields: &FieldMap) -> Option<ModelPtr> {
        let candidates = self.by_keys.get(keys)?;
        candidates
            .iter()
            .copied()
            .find(|ptr| self.fields_compatible(self.entries[ptr.index()].shape(), fields))
    }

    /// Same key set and every field type compatible, nested objects included
    fn fields_compatible(&self, existing: &FieldMap, fields: &FieldMap) -> bool {
        existing.len() == fields.len()
            && fields.iter().all(|(k, t)| {
                existing.get(k).is_some_and(|e| {
                    is_compatible_with(e, t, &|x, y| self.objects_compatible(x, y))
                })
            })
    }

    /// Two object members describe the same model
    ///
    /// Distinct pointers never do: the registry already kept them apart.
    /// Recursion always descends into a mapping, so it ends on cyclic graphs.
    fn objects_compatible(&self, x: &TypeNode, y: &TypeNode) -> bool {
        match (x, y) {
            (TypeNode::Model(p), TypeNode::Model(q)) => p == q,
            (TypeNode::Model(ptr), TypeNode::Mapping(fields))
            | (TypeNode::Mapping(fields), TypeNode::Model(ptr)) => self
                .entries
                .get(ptr.index())
                .is_some_and(|entry| self.fields_compatible(entry.shape(), fields)),
            (TypeNode::Mapping(a), TypeNode::Mapping(b)) => self.fields_compatible(a, b),
            _ => false,
        }
    }

    fn allocate(&mut self, hint: &str, keys: Vec<String>, raw: FieldMap) -> ModelPtr {
        let requested = pascal_case(hint);
        let name = unique_name(&requested, &mut self.names);
        if name != requested {
            debug!(requested = %requested, assigned = %name, "model name collision");
            self.notes.push(GenerationNote::ModelNameCollision {
                requested,
                assigned: name.clone(),
            });
        }

        let ptr = ModelPtr::new(self.entries.len());
        debug!(model = %name, ptr = %ptr, fields = raw.len(), "allocated model");
        self.entries.push(Entry {
            name,
            raw,
            fields: None,
            pending: Vec::new(),
            state: EntryState::InProgress,
        });
        self.by_keys.entry(keys).or_default().push(ptr);
        ptr
    }

    fn resolve_fields(&mut self, fields: &FieldMap) -> Result<FieldMap, RegistryError> {
        let mut out = FieldMap::new();
        for (key, ty) in fields.iter() {
            let resolved = self.resolve_node(ty, key)?;
            out.insert(key, resolved);
        }
        Ok(out)
    }

    /// Replace every mapping inside `node` by a model pointer
    fn resolve_node(&mut self, node: &TypeNode, hint: &str) -> Result<TypeNode, RegistryError> {
        Ok(match node {
            TypeNode::Mapping(_) => TypeNode::Model(self.extract(node, hint)?),
            TypeNode::Optional(inner) => TypeNode::optional(self.resolve_node(inner, hint)?),
            TypeNode::Union(members) => {
                let mut resolved = Vec::with_capacity(members.len());
                for m in members {
                    resolved.push(self.resolve_node(m, hint)?);
                }
                TypeNode::union(resolved)
            }
            TypeNode::List(element) => {
                TypeNode::list(self.resolve_node(element, &singularize(hint))?)
            }
            TypeNode::Tuple(elements) => {
                let singular = singularize(hint);
                let mut resolved = Vec::with_capacity(elements.len());
                for e in elements {
                    resolved.push(self.resolve_node(e, &singular)?);
                }
                TypeNode::tuple(resolved)
            }
            other => other.clone(),
        })
    }

    /// Freeze the registry into a model graph with its emission order
    pub fn finalize(self) -> Result<ModelGraph, RegistryError> {
        let count = self.entries.len();
        let mut models = Vec::with_capacity(count);

        for (index, entry) in self.entries.into_iter().enumerate() {
            let ptr = ModelPtr::new(index);
            let fields = match (entry.state, entry.fields) {
                (EntryState::Done, Some(fields)) => fields,
                _ => return Err(RegistryError::Unfinalized { name: entry.name }),
            };

            let mut refs = Vec::new();
            for (_, ty) in fields.iter() {
                ty.model_refs(&mut refs);
            }
            if let Some(dangling) = refs.iter().find(|r| r.index() >= count) {
                return Err(RegistryError::DanglingPointer(*dangling));
            }

            let is_self_referential = refs.contains(&ptr);
            let nested: BTreeSet<ModelPtr> = refs.iter().copied().filter(|r| *r != ptr).collect();
            models.push((
                ModelMeta {
                    ptr,
                    name: entry.name,
                    fields,
                    nested,
                    is_self_referential,
                },
                refs,
            ));
        }

        let emission_order = emission_order(&models);
        let models = models.into_iter().map(|(meta, _)| meta).collect();
        Ok(ModelGraph::new(models, emission_order, self.notes))
    }
}

/// Dependencies first; members of one cycle by discovery order
fn emission_order(models: &[(ModelMeta, Vec<ModelPtr>)]) -> Vec<ModelPtr> {
    let mut graph = Graph::<ModelPtr, ()>::new();
    let nodes: Vec<_> = models.iter().map(|(m, _)| graph.add_node(m.ptr)).collect();

    // neighbors are walked in reverse insertion order
    for (index, (meta, refs)) in models.iter().enumerate() {
        for target in refs.iter().rev() {
            if *target != meta.ptr {
                graph.add_edge(nodes[index], nodes[target.index()], ());
            }
        }
    }

    // components come out in reverse topological order, referenced ones first
    let mut order = Vec::with_capacity(models.len());
    for component in tarjan_scc(&graph) {
        let mut ptrs: Vec<ModelPtr> = component.into_iter().map(|n| graph[n]).collect();
        ptrs.sort();
        order.extend(ptrs);
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> TypeNode {
        TypeNode::integer()
    }

    #[test]
    fn test_extract_rejects_non_mapping() {
        let mut registry = ModelRegistry::new();
        assert_eq!(
            registry.extract(&int(), "value"),
            Err(RegistryError::NotAMapping {
                hint: "value".to_string()
            })
        );
    }

    #[test]
    fn test_identical_shapes_share_pointer() {
        let a = TypeNode::mapping([("id", int()), ("name", TypeNode::string())]);
        let b = TypeNode::mapping([("name", TypeNode::string()), ("id", int())]);

        let mut registry = ModelRegistry::new();
        let pa = registry.extract(&a, "user").unwrap();
        let pb = registry.extract(&b, "author").unwrap();
        assert_eq!(pa, pb);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_compatible_shapes_merge_fields() {
        let a = TypeNode::mapping([("id", int())]);
        let b = TypeNode::mapping([("id", TypeNode::Null)]);

        let mut registry = ModelRegistry::new();
        let pa = registry.extract(&a, "item").unwrap();
        let pb = registry.extract(&b, "item").unwrap();
        assert_eq!(pa, pb);

        let graph = registry.finalize().unwrap();
        assert_eq!(
            graph.get(pa).unwrap().fields.get("id"),
            Some(&TypeNode::optional(int()))
        );
    }

    #[test]
    fn test_incompatible_shapes_get_suffixed_names() {
        let a = TypeNode::mapping([("id", int())]);
        let b = TypeNode::mapping([("id", TypeNode::string())]);

        let mut registry = ModelRegistry::new();
        let pa = registry.extract(&a, "user").unwrap();
        let pb = registry.extract(&b, "user").unwrap();
        assert_ne!(pa, pb);
        assert_eq!(registry.name_of(pb).unwrap(), "User2");
        assert_eq!(
            registry.notes(),
            &[GenerationNote::ModelNameCollision {
                requested: "User".to_string(),
                assigned: "User2".to_string(),
            }]
        );
    }

    #[test]
    fn test_nested_list_models_singularized() {
        let node = TypeNode::mapping([(
            "users",
            TypeNode::list(TypeNode::mapping([("id", int())])),
        )]);

        let mut registry = ModelRegistry::new();
        let root = registry.extract(&node, "response").unwrap();
        let graph = registry.finalize().unwrap();

        let user = graph.find("User").unwrap();
        assert_eq!(
            graph.get(root).unwrap().fields.get("users"),
            Some(&TypeNode::list(TypeNode::Model(user.ptr)))
        );
        assert_eq!(graph.emission_order(), &[user.ptr, root]);
    }

    #[test]
    fn test_self_reference_terminates() {
        let leaf = TypeNode::mapping([("id", int()), ("child", TypeNode::Null)]);
        let middle = TypeNode::mapping([("id", int()), ("child", leaf)]);
        let root = TypeNode::mapping([("id", int()), ("child", middle)]);

        let mut registry = ModelRegistry::new();
        let ptr = registry.extract(&root, "node").unwrap();
        let graph = registry.finalize().unwrap();

        assert_eq!(graph.len(), 1);
        let model = graph.get(ptr).unwrap();
        assert!(model.is_self_referential);
        assert!(model.nested.is_empty());
        assert_eq!(
            model.fields.get("child"),
            Some(&TypeNode::optional(TypeNode::Model(ptr)))
        );
    }

    #[test]
    fn test_mutual_reference_order() {
        // a.b -> b, b.a -> a shaped differently from a
        let inner_a = TypeNode::mapping([("name", TypeNode::string()), ("b", TypeNode::Null)]);
        let b = TypeNode::mapping([("code", int()), ("a", inner_a)]);
        let a = TypeNode::mapping([("name", TypeNode::string()), ("b", b)]);

        let mut registry = ModelRegistry::new();
        let pa = registry.extract(&a, "a").unwrap();
        let graph = registry.finalize().unwrap();

        assert_eq!(graph.len(), 2);
        let pb = graph.find("B").unwrap().ptr;
        assert!(graph.get(pa).unwrap().nested.contains(&pb));
        assert!(graph.get(pb).unwrap().nested.contains(&pa));
        assert_eq!(graph.emission_order(), &[pa, pb]);
    }

    #[test]
    fn test_unresolvable_pointer() {
        let mut registry = ModelRegistry::new();
        let ptr = ModelPtr::new(7);
        assert_eq!(
            registry.extract(&TypeNode::Model(ptr), "x"),
            Err(RegistryError::DanglingPointer(ptr))
        );
    }
}
