//! dataclasses backend

use super::config::GeneratorKind;
use super::error::CodegenError;
use super::fields::{DefaultStrategy, FieldPlan};
use super::generator::{ModelCodeGenerator, RenderContext, Rendered};
use super::imports::{ImportPath, ImportSet};
use super::python::{Refinements, class_body, py_str, render_type};
use crate::registry::ModelMeta;

const DATACLASSES: &str = "dataclasses";

/// Renders `@dataclass` classes with `field(...)` declarations
///
/// dataclasses has no converters, so refinements are declared with their
/// class as type and left to the caller to construct.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataclassesGenerator;

impl ModelCodeGenerator for DataclassesGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Dataclasses
    }

    fn render_field(
        &self,
        field: &FieldPlan,
        ctx: &RenderContext<'_>,
    ) -> Result<Rendered, CodegenError> {
        let mut imports = ImportSet::from_iter([ImportPath::symbol(DATACLASSES, "field")]);
        let ty = render_type(&field.ty, ctx, Refinements::Classes, &mut imports)?;

        let mut args = Vec::new();
        match &field.strategy {
            DefaultStrategy::Required | DefaultStrategy::Converter(_) => {}
            DefaultStrategy::NullDefault | DefaultStrategy::OptionalConverter(_) => {
                args.push("default=None".to_string())
            }
            DefaultStrategy::Factory => args.push("default_factory=list".to_string()),
        }
        args.push(format!(
            "metadata={{{}: {}}}",
            py_str(&ctx.config.metadata_key),
            py_str(&field.key)
        ));

        Ok(Rendered::new(
            imports,
            format!("{}: {} = field({})", field.name, ty, args.join(", ")),
        ))
    }

    fn render_model(
        &self,
        model: &ModelMeta,
        fields: &[String],
        _ctx: &RenderContext<'_>,
    ) -> Rendered {
        let imports = ImportSet::from_iter([ImportPath::symbol(DATACLASSES, "dataclass")]);
        Rendered::new(
            imports,
            format!("@dataclass\nclass {}:\n{}", model.name, class_body(fields)),
        )
    }
}
