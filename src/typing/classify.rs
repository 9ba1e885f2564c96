//! Classification of sample values into type nodes

use super::merge::merge_all;
use super::node::TypeNode;
use super::string_serializable::StringSerializableRegistry;
use crate::sample::SampleValue;

/// Maps raw sample values to type nodes
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    serializables: &'a StringSerializableRegistry,
    detect_strings: bool,
    infer_tuples: bool,
}

impl<'a> Classifier<'a> {
    pub fn new(serializables: &'a StringSerializableRegistry) -> Self {
        Self {
            serializables,
            detect_strings: true,
            infer_tuples: false,
        }
    }

    /// Try string-serializable descriptors on string values (on by default)
    pub fn detect_strings(mut self, detect: bool) -> Self {
        self.detect_strings = detect;
        self
    }

    /// Classify lists as fixed-arity tuples; merging with a different arity
    /// widens them back to lists
    pub fn infer_tuples(mut self, infer: bool) -> Self {
        self.infer_tuples = infer;
        self
    }

    pub fn classify(&self, value: &SampleValue) -> TypeNode {
        match value {
            SampleValue::Null => TypeNode::Null,
            SampleValue::Bool(_) => TypeNode::boolean(),
            SampleValue::Integer(_) => TypeNode::integer(),
            SampleValue::Float(_) => TypeNode::float(),
            SampleValue::String(s) => self.classify_string(s),
            SampleValue::List(items) if self.infer_tuples && !items.is_empty() => {
                TypeNode::tuple(items.iter().map(|v| self.classify(v)).collect())
            }
            SampleValue::List(items) => {
                TypeNode::list(merge_all(items.iter().map(|v| self.classify(v))))
            }
            SampleValue::Map(entries) => TypeNode::Mapping(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), self.classify(v)))
                    .collect(),
            ),
        }
    }

    fn classify_string(&self, value: &str) -> TypeNode {
        if !self.detect_strings {
            return TypeNode::string();
        }
        match self.serializables.detect(value) {
            Some(descriptor) => TypeNode::serialized(descriptor.kind().clone()),
            None => TypeNode::string(),
        }
    }
}
