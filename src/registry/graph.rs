//! Frozen model graph

use serde::Serialize;

use super::error::RegistryError;
use super::meta::{ModelMeta, ModelPtr};
use crate::notes::GenerationNote;

/// Read-only result of a finalized registry
///
/// Models are indexed by their pointer. The emission order lists every model
/// after all the models it references, except inside a reference cycle where
/// members follow discovery order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelGraph {
    models: Vec<ModelMeta>,
    emission_order: Vec<ModelPtr>,
    notes: Vec<GenerationNote>,
}

impl ModelGraph {
    pub(crate) fn new(
        models: Vec<ModelMeta>,
        emission_order: Vec<ModelPtr>,
        notes: Vec<GenerationNote>,
    ) -> Self {
        Self {
            models,
            emission_order,
            notes,
        }
    }

    pub fn get(&self, ptr: ModelPtr) -> Result<&ModelMeta, RegistryError> {
        self.models
            .get(ptr.index())
            .ok_or(RegistryError::DanglingPointer(ptr))
    }

    /// Models in discovery order
    pub fn models(&self) -> &[ModelMeta] {
        &self.models
    }

    pub fn emission_order(&self) -> &[ModelPtr] {
        &self.emission_order
    }

    /// Models in emission order
    pub fn iter_emission(&self) -> impl Iterator<Item = &ModelMeta> {
        self.emission_order
            .iter()
            .filter_map(|ptr| self.models.get(ptr.index()))
    }

    pub fn find(&self, name: &str) -> Option<&ModelMeta> {
        self.models.iter().find(|m| m.name == name)
    }

    pub fn notes(&self) -> &[GenerationNote] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
