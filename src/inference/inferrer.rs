//! Model inference engine

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::config::InferenceConfig;
use super::error::InferenceError;
use crate::codegen::{CodegenConfig, CodegenError, generate_code};
use crate::notes::GenerationNote;
use crate::registry::{ModelGraph, ModelPtr, ModelRegistry};
use crate::sample::{SampleError, SampleValue, key_path};
use crate::typing::{
    Classifier, OptimizeOptions, Scalar, StringSerializableRegistry, TypeNode, merge, optimize,
};

/// Statistics from model inference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceStats {
    /// Total records processed
    pub records_processed: usize,
    /// Records skipped (malformed input)
    pub records_skipped: usize,
    /// Top-level fields discovered
    pub fields_discovered: usize,
    /// Maximum nesting depth encountered
    pub max_depth: usize,
    /// Distinct models extracted (known after finalize)
    pub models: usize,
}

/// Output of [`ModelInferrer::finalize`]
#[derive(Debug, Clone)]
pub struct InferredModels {
    pub graph: ModelGraph,
    /// Model describing the records themselves
    pub root: ModelPtr,
    pub stats: InferenceStats,
    /// Descriptors used during inference, needed again to render imports
    pub serializables: StringSerializableRegistry,
}

impl InferredModels {
    pub fn notes(&self) -> &[GenerationNote] {
        self.graph.notes()
    }

    /// Render the inferred models as source code
    pub fn generate(&self, config: &CodegenConfig) -> Result<String, CodegenError> {
        generate_code(&self.graph, &self.serializables, config)
    }
}

/// Model inference engine
///
/// Classifies records and folds them into one merged type, then extracts
/// models from it.
pub struct ModelInferrer {
    config: InferenceConfig,
    serializables: StringSerializableRegistry,
    /// Fold of every record seen so far
    merged: TypeNode,
    /// Paths where a string refinement was observed, with the kinds seen
    refined_paths: BTreeMap<String, BTreeSet<String>>,
    /// Total records processed
    record_count: usize,
    /// Records skipped
    skipped_count: usize,
    /// Maximum depth seen
    max_depth_seen: usize,
}

impl ModelInferrer {
    /// Create a new inferrer with default configuration
    pub fn new() -> Self {
        Self::with_config(InferenceConfig::default())
    }

    /// Create a new inferrer with custom configuration
    pub fn with_config(config: InferenceConfig) -> Self {
        Self::with_serializables(config, StringSerializableRegistry::default())
    }

    /// Create a new inferrer with custom configuration and string descriptors
    pub fn with_serializables(
        config: InferenceConfig,
        serializables: StringSerializableRegistry,
    ) -> Self {
        Self {
            config,
            serializables,
            merged: TypeNode::Unknown,
            refined_paths: BTreeMap::new(),
            record_count: 0,
            skipped_count: 0,
            max_depth_seen: 0,
        }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn serializables(&self) -> &StringSerializableRegistry {
        &self.serializables
    }

    fn limit_reached(&self) -> bool {
        self.config.sample_size > 0 && self.record_count >= self.config.sample_size
    }

    /// Add a single JSON string for analysis
    ///
    /// Malformed JSON is counted as skipped rather than failing the run.
    pub fn add_json(&mut self, json: &str) -> Result<(), InferenceError> {
        if self.limit_reached() {
            return Ok(());
        }

        let value: Value = match serde_json::from_str(json) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "skipping malformed JSON record");
                self.skipped_count += 1;
                return Ok(());
            }
        };

        self.add_value(&value)
    }

    /// Add a single YAML document for analysis
    ///
    /// Malformed YAML is skipped; YAML holding values outside the supported
    /// shapes fails with the offending path.
    pub fn add_yaml(&mut self, yaml: &str) -> Result<(), InferenceError> {
        if self.limit_reached() {
            return Ok(());
        }

        match SampleValue::parse_yaml(yaml) {
            Ok(sample) => self.add_sample(&sample),
            Err(SampleError::Parse(e)) => {
                warn!(error = %e, "skipping malformed YAML record");
                self.skipped_count += 1;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Add a parsed JSON value for analysis
    pub fn add_value(&mut self, value: &Value) -> Result<(), InferenceError> {
        self.add_sample(&SampleValue::from_json(value))
    }

    /// Add a batch of JSON strings
    pub fn add_json_batch(&mut self, records: &[String]) -> Result<(), InferenceError> {
        for json in records {
            self.add_json(json)?;
        }
        Ok(())
    }

    /// Add a sample value tree for analysis
    pub fn add_sample(&mut self, sample: &SampleValue) -> Result<(), InferenceError> {
        if self.limit_reached() {
            return Ok(());
        }

        // Root must be a mapping
        if !sample.is_map() {
            return Err(InferenceError::InvalidStructure(
                sample.kind_name().to_string(),
            ));
        }

        if self.config.max_depth > 0 {
            if let Some((path, depth)) = sample.find_deeper_than(self.config.max_depth) {
                return Err(InferenceError::MaxDepthExceeded {
                    path,
                    depth,
                    max: self.config.max_depth,
                });
            }
        }

        let node = Classifier::new(&self.serializables)
            .detect_strings(self.config.detect_string_serializable)
            .infer_tuples(self.config.infer_tuples)
            .classify(sample);

        visit(&node, "$", &mut |path, n| {
            if let TypeNode::Single(Scalar::Serialized(kind)) = n {
                self.refined_paths
                    .entry(path.to_string())
                    .or_default()
                    .insert(kind.name().to_string());
            }
        });

        let merged = std::mem::replace(&mut self.merged, TypeNode::Unknown);
        self.merged = merge(merged, node);
        self.record_count += 1;
        self.max_depth_seen = self.max_depth_seen.max(sample.depth());

        debug!(records = self.record_count, "record merged");
        Ok(())
    }

    /// The merged and simplified type of every record added so far
    pub fn merged(&self) -> TypeNode {
        optimize(
            self.merged.clone(),
            &self.serializables,
            OptimizeOptions {
                widen_numbers: self.config.widen_numbers,
            },
        )
    }

    /// Get inference statistics
    pub fn stats(&self) -> InferenceStats {
        let fields_discovered = match &self.merged {
            TypeNode::Mapping(fields) => fields.len(),
            _ => 0,
        };

        InferenceStats {
            records_processed: self.record_count,
            records_skipped: self.skipped_count,
            fields_discovered,
            max_depth: self.max_depth_seen,
            models: 0,
        }
    }

    /// Get the number of records processed
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Extract the root model into an existing registry
    ///
    /// Lets several endpoints share one registry, so shapes common to them
    /// become one model.
    pub fn finalize_into(&self, registry: &mut ModelRegistry) -> Result<ModelPtr, InferenceError> {
        if self.record_count == 0 {
            return Err(InferenceError::NoRecords);
        }

        // generated code imports refinement classes by name
        for descriptor in self.serializables.iter() {
            registry.reserve(descriptor.kind().name());
        }

        let root = self.merged();
        for note in self.findings(&root) {
            debug!(note = %note, "generation note");
            registry.note(note);
        }

        let ptr = registry.extract(&root, &self.config.root_name)?;
        debug!(root = %ptr, models = registry.len(), "extracted models");
        Ok(ptr)
    }

    /// Finalize inference and build the model graph
    pub fn finalize(self) -> Result<InferredModels, InferenceError> {
        let mut registry = ModelRegistry::new();
        let root = self.finalize_into(&mut registry)?;
        let graph = registry.finalize()?;

        let mut stats = self.stats();
        stats.models = graph.len();

        Ok(InferredModels {
            graph,
            root,
            stats,
            serializables: self.serializables,
        })
    }

    /// Type conflicts and widened string refinements in the merged tree
    fn findings(&self, root: &TypeNode) -> Vec<GenerationNote> {
        let mut notes = Vec::new();
        let mut text: BTreeMap<String, (bool, Vec<String>)> = BTreeMap::new();

        visit(root, "$", &mut |path, node| match node {
            TypeNode::Union(members) if members.iter().any(is_structural) => {
                notes.push(GenerationNote::TypeConflict {
                    path: path.to_string(),
                    members: members.iter().map(|m| m.type_name().to_string()).collect(),
                });
            }
            TypeNode::Single(Scalar::String) => {
                text.entry(path.to_string()).or_default().0 = true;
            }
            TypeNode::Single(Scalar::Serialized(kind)) => {
                text.entry(path.to_string())
                    .or_default()
                    .1
                    .push(kind.name().to_string());
            }
            _ => {}
        });

        for (path, (plain, kinds)) in text {
            let widened = plain && self.refined_paths.contains_key(&path);
            if widened || kinds.len() > 1 {
                let seen = self
                    .refined_paths
                    .get(&path)
                    .map(|k| k.iter().cloned().collect())
                    .unwrap_or(kinds);
                notes.push(GenerationNote::StringParseAmbiguity { path, kinds: seen });
            }
        }
        notes
    }
}

impl Default for ModelInferrer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_structural(node: &TypeNode) -> bool {
    matches!(
        node,
        TypeNode::Mapping(_) | TypeNode::Model(_) | TypeNode::List(_) | TypeNode::Tuple(_)
    )
}

/// Call `f` on every node with its path; sequence elements share a `[]` path
fn visit(node: &TypeNode, path: &str, f: &mut impl FnMut(&str, &TypeNode)) {
    f(path, node);
    match node {
        TypeNode::Optional(inner) => visit(inner, path, f),
        TypeNode::Union(members) => {
            for m in members {
                visit(m, path, f);
            }
        }
        TypeNode::List(element) => visit(element, &format!("{}[]", path), f),
        TypeNode::Tuple(elements) => {
            let element_path = format!("{}[]", path);
            for e in elements {
                visit(e, &element_path, f);
            }
        }
        TypeNode::Mapping(fields) => {
            for (key, ty) in fields.iter() {
                visit(ty, &key_path(path, key), f);
            }
        }
        TypeNode::Unknown | TypeNode::Null | TypeNode::Single(_) | TypeNode::Model(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typing::StringKind;

    #[test]
    fn test_infer_simple_object() {
        let mut inferrer = ModelInferrer::new();
        inferrer
            .add_json(r#"{"name": "Alice", "age": 30, "active": true}"#)
            .unwrap();
        inferrer
            .add_json(r#"{"name": "Bob", "age": 25, "active": false}"#)
            .unwrap();

        assert_eq!(
            inferrer.merged(),
            TypeNode::mapping([
                ("name", TypeNode::string()),
                ("age", TypeNode::integer()),
                ("active", TypeNode::boolean()),
            ])
        );
    }

    #[test]
    fn test_infer_optional_fields() {
        let mut inferrer = ModelInferrer::new();
        inferrer.add_json(r#"{"id": 1, "email": "a@b.c"}"#).unwrap();
        inferrer.add_json(r#"{"id": 2}"#).unwrap();

        match inferrer.merged() {
            TypeNode::Mapping(fields) => {
                assert_eq!(fields.get("id"), Some(&TypeNode::integer()));
                assert_eq!(
                    fields.get("email"),
                    Some(&TypeNode::optional(TypeNode::string()))
                );
            }
            other => panic!("Expected mapping, got {:?}", other),
        }
    }

    #[test]
    fn test_serialized_strings_widen() {
        let mut inferrer = ModelInferrer::new();
        inferrer.add_json(r#"{"price": "10"}"#).unwrap();
        inferrer.add_json(r#"{"price": "10.5"}"#).unwrap();

        assert_eq!(
            inferrer.merged(),
            TypeNode::mapping([("price", TypeNode::serialized(StringKind::FLOAT))])
        );
    }

    #[test]
    fn test_skipped_records() {
        let mut inferrer = ModelInferrer::new();
        inferrer.add_json(r#"{"a": 1}"#).unwrap();
        inferrer.add_json("not json").unwrap();
        inferrer.add_json(r#"{"a": 2, "b": [1, [2]]}"#).unwrap();

        let stats = inferrer.stats();
        assert_eq!(stats.records_processed, 2);
        assert_eq!(stats.records_skipped, 1);
        assert_eq!(stats.fields_discovered, 2);
        assert_eq!(stats.max_depth, 3);
    }

    #[test]
    fn test_root_must_be_mapping() {
        let mut inferrer = ModelInferrer::new();
        let err = inferrer.add_json("[1, 2]").unwrap_err();
        assert_eq!(err, InferenceError::InvalidStructure("list".to_string()));
    }

    #[test]
    fn test_max_depth() {
        let config = InferenceConfig::builder().max_depth(2).build();
        let mut inferrer = ModelInferrer::with_config(config);
        inferrer.add_json(r#"{"a": {"b": 1}}"#).unwrap();

        let err = inferrer.add_json(r#"{"a": {"b": {"c": 1}}}"#).unwrap_err();
        assert_eq!(
            err,
            InferenceError::MaxDepthExceeded {
                path: "$.a.b".to_string(),
                depth: 3,
                max: 2,
            }
        );
    }

    #[test]
    fn test_add_json_batch_reports_invalid_records() {
        let mut inferrer = ModelInferrer::new();
        let records = vec![r#"{"id": 1}"#.to_string(), r#"{"id": 2}"#.to_string()];
        inferrer.add_json_batch(&records).unwrap();
        assert_eq!(inferrer.stats().records_processed, 2);

        let records = vec![r#"{"id": 3}"#.to_string(), "[1, 2]".to_string()];
        let err = inferrer.add_json_batch(&records).unwrap_err();
        assert_eq!(err, InferenceError::InvalidStructure("list".to_string()));
        assert_eq!(inferrer.stats().records_processed, 3);
    }

    #[test]
    fn test_deep_records_accepted_by_default() {
        let depth = 12;
        let record = format!("{}1{}", r#"{"a": "#.repeat(depth), "}".repeat(depth));

        let mut inferrer = ModelInferrer::new();
        inferrer.add_json(&record).unwrap();
        assert_eq!(inferrer.stats().max_depth, depth);

        let models = inferrer.finalize().unwrap();
        assert_eq!(models.graph.get(models.root).unwrap().name, "Model");
    }

    #[test]
    fn test_sample_size_limit() {
        let config = InferenceConfig::builder().sample_size(2).build();
        let mut inferrer = ModelInferrer::with_config(config);
        for i in 0..5 {
            inferrer.add_json(&format!(r#"{{"n": {}}}"#, i)).unwrap();
        }
        assert_eq!(inferrer.record_count(), 2);
    }

    #[test]
    fn test_no_records() {
        let inferrer = ModelInferrer::new();
        assert!(matches!(
            inferrer.finalize(),
            Err(InferenceError::NoRecords)
        ));
    }

    #[test]
    fn test_yaml_records() {
        let mut inferrer = ModelInferrer::new();
        inferrer.add_yaml("id: 1\ntags: [a, b]\n").unwrap();
        inferrer.add_yaml("id: [unclosed").unwrap();
        assert_eq!(inferrer.stats().records_skipped, 1);

        let err = inferrer.add_yaml("id: !tagged 3\n").unwrap_err();
        assert!(matches!(err, InferenceError::Sample(SampleError::UnsupportedValue { .. })));
    }

    #[test]
    fn test_type_conflict_noted() {
        let mut inferrer = ModelInferrer::new();
        inferrer.add_json(r#"{"value": {"x": 1}}"#).unwrap();
        inferrer.add_json(r#"{"value": "text"}"#).unwrap();

        let models = inferrer.finalize().unwrap();
        assert!(models.notes().iter().any(|n| matches!(
            n,
            GenerationNote::TypeConflict { path, .. } if path == "$.value"
        )));
    }

    #[test]
    fn test_string_downgrade_noted() {
        let mut inferrer = ModelInferrer::new();
        inferrer.add_json(r#"{"code": "42"}"#).unwrap();
        inferrer.add_json(r#"{"code": "abc"}"#).unwrap();

        let models = inferrer.finalize().unwrap();
        assert_eq!(
            models.notes(),
            &[GenerationNote::StringParseAmbiguity {
                path: "$.code".to_string(),
                kinds: vec!["IntString".to_string()],
            }]
        );
    }
}
