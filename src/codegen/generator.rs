//! Code generator contract and the generation driver

use std::collections::HashSet;

use tracing::debug;

use super::attrs::AttrsGenerator;
use super::config::{CodegenConfig, GeneratorKind};
use super::dataclasses::DataclassesGenerator;
use super::error::CodegenError;
use super::fields::{FieldPlan, FieldPlanner};
use super::imports::ImportSet;
use super::pydantic::PydanticGenerator;
use crate::naming::PYTHON_KEYWORDS;
use crate::registry::{ModelGraph, ModelMeta, ModelPtr};
use crate::typing::{DEFAULT_SERIALIZABLE_MODULE, StringKind, StringSerializableRegistry};

/// Rendered text plus the imports it needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub imports: ImportSet,
    pub text: String,
}

impl Rendered {
    pub fn new(imports: ImportSet, text: impl Into<String>) -> Self {
        Self {
            imports,
            text: text.into(),
        }
    }
}

/// What a generator can see while rendering one model
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub graph: &'a ModelGraph,
    pub serializables: &'a StringSerializableRegistry,
    pub config: &'a CodegenConfig,
    emitted: &'a HashSet<ModelPtr>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        graph: &'a ModelGraph,
        serializables: &'a StringSerializableRegistry,
        config: &'a CodegenConfig,
        emitted: &'a HashSet<ModelPtr>,
    ) -> Self {
        Self {
            graph,
            serializables,
            config,
            emitted,
        }
    }

    /// The model's definition already precedes the one being rendered
    pub fn is_emitted(&self, ptr: ModelPtr) -> bool {
        self.emitted.contains(&ptr)
    }

    pub fn model_name(&self, ptr: ModelPtr) -> Result<&'a str, CodegenError> {
        Ok(self.graph.get(ptr)?.name.as_str())
    }

    /// Module the refinement class is imported from
    pub fn serializable_module(&self, kind: &StringKind) -> &'a str {
        self.serializables
            .get(kind)
            .map(|d| d.module())
            .unwrap_or(DEFAULT_SERIALIZABLE_MODULE)
    }
}

/// A target object-model style
///
/// The driver plans each model's fields, renders every field, then the model
/// around the field declarations, merging the imports of every call.
pub trait ModelCodeGenerator {
    fn kind(&self) -> GeneratorKind;

    /// Words that cannot be used as field identifiers
    fn reserved_words(&self) -> &'static [&'static str] {
        PYTHON_KEYWORDS
    }

    /// Field identifiers must not start with an underscore
    fn public_identifiers(&self) -> bool {
        false
    }

    /// Declaration of one field
    fn render_field(
        &self,
        field: &FieldPlan,
        ctx: &RenderContext<'_>,
    ) -> Result<Rendered, CodegenError>;

    /// Definition of one model around its ordered field declarations
    fn render_model(
        &self,
        model: &ModelMeta,
        fields: &[String],
        ctx: &RenderContext<'_>,
    ) -> Rendered;
}

/// Built-in generator for a style
pub fn generator_for(kind: GeneratorKind) -> Box<dyn ModelCodeGenerator> {
    match kind {
        GeneratorKind::Attrs => Box::new(AttrsGenerator),
        GeneratorKind::Dataclasses => Box::new(DataclassesGenerator),
        GeneratorKind::Pydantic => Box::new(PydanticGenerator),
    }
}

/// Render a model graph with the generator selected in `config`
pub fn generate_code(
    graph: &ModelGraph,
    serializables: &StringSerializableRegistry,
    config: &CodegenConfig,
) -> Result<String, CodegenError> {
    let generator = generator_for(config.generator);
    generate_with(generator.as_ref(), graph, serializables, config)
}

/// Render a model graph with a given generator
///
/// Models are emitted in the graph's emission order. The output is the
/// compiled import block followed by the model definitions, separated by two
/// blank lines.
pub fn generate_with(
    generator: &dyn ModelCodeGenerator,
    graph: &ModelGraph,
    serializables: &StringSerializableRegistry,
    config: &CodegenConfig,
) -> Result<String, CodegenError> {
    let planner = FieldPlanner::new(generator.reserved_words())
        .public_identifiers(generator.public_identifiers());
    let mut imports = ImportSet::new();
    let mut emitted = HashSet::new();
    let mut blocks = Vec::with_capacity(graph.len());

    for &ptr in graph.emission_order() {
        let model = graph.get(ptr)?;
        let ctx = RenderContext::new(graph, serializables, config, &emitted);

        let mut declarations = Vec::with_capacity(model.fields.len());
        for plan in planner.plan(model) {
            let rendered = generator.render_field(&plan, &ctx)?;
            imports.merge(rendered.imports);
            declarations.push(rendered.text);
        }

        let rendered = generator.render_model(model, &declarations, &ctx);
        imports.merge(rendered.imports);
        blocks.push(rendered.text);
        emitted.insert(ptr);
    }

    debug!(
        generator = %generator.kind(),
        models = blocks.len(),
        imports = imports.len(),
        "rendered models"
    );

    let mut out = String::new();
    if !imports.is_empty() {
        out.push_str(&imports.render());
        out.push_str("\n\n\n");
    }
    out.push_str(&blocks.join("\n\n\n"));
    out.push('\n');
    Ok(out)
}
