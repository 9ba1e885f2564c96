//! attrs backend

use super::config::GeneratorKind;
use super::error::CodegenError;
use super::fields::{DefaultStrategy, FieldPlan};
use super::generator::{ModelCodeGenerator, RenderContext, Rendered};
use super::imports::{ImportPath, ImportSet};
use super::python::{Refinements, class_body, py_str, refinement_class, render_type};
use crate::registry::ModelMeta;

/// Renders `@attr.s` classes with `attr.ib(...)` fields
///
/// Every field carries its original key in `metadata`, refinements are parsed
/// through `converter`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttrsGenerator;

impl ModelCodeGenerator for AttrsGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Attrs
    }

    fn render_field(
        &self,
        field: &FieldPlan,
        ctx: &RenderContext<'_>,
    ) -> Result<Rendered, CodegenError> {
        let mut imports = ImportSet::new();
        let ty = render_type(&field.ty, ctx, Refinements::Classes, &mut imports)?;

        let mut args = Vec::new();
        match &field.strategy {
            DefaultStrategy::Required => {}
            DefaultStrategy::NullDefault => args.push("default=None".to_string()),
            DefaultStrategy::Factory => args.push("factory=list".to_string()),
            DefaultStrategy::Converter(kind) => {
                let class = refinement_class(kind, ctx, &mut imports);
                args.push(format!("converter={}", class));
            }
            DefaultStrategy::OptionalConverter(kind) => {
                let class = refinement_class(kind, ctx, &mut imports);
                args.push(format!("converter=attr.converters.optional({})", class));
                args.push("default=None".to_string());
            }
        }
        args.push(format!(
            "metadata={{{}: {}}}",
            py_str(&ctx.config.metadata_key),
            py_str(&field.key)
        ));

        Ok(Rendered::new(
            imports,
            format!("{}: {} = attr.ib({})", field.name, ty, args.join(", ")),
        ))
    }

    fn render_model(
        &self,
        model: &ModelMeta,
        fields: &[String],
        _ctx: &RenderContext<'_>,
    ) -> Rendered {
        let imports = ImportSet::from_iter([ImportPath::module("attr")]);
        Rendered::new(
            imports,
            format!("@attr.s\nclass {}:\n{}", model.name, class_body(fields)),
        )
    }
}
