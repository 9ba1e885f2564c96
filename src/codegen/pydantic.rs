//! pydantic backend

use super::config::GeneratorKind;
use super::error::CodegenError;
use super::fields::{DefaultStrategy, FieldPlan};
use super::generator::{ModelCodeGenerator, RenderContext, Rendered};
use super::imports::{ImportPath, ImportSet};
use super::python::{Refinements, class_body, py_str, render_type};
use crate::registry::ModelMeta;

const PYDANTIC: &str = "pydantic";

/// Python keywords plus names `BaseModel` already defines
pub const PYDANTIC_RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield", "match", "case", "type", "copy", "dict", "json", "schema",
    "construct", "validate", "fields", "model_config", "model_fields", "model_dump",
];

/// Renders `BaseModel` subclasses
///
/// pydantic coerces strings itself, so built-in refinements become their
/// native types. Original keys are kept as `alias` only when a field was
/// renamed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PydanticGenerator;

impl ModelCodeGenerator for PydanticGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Pydantic
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        PYDANTIC_RESERVED
    }

    // pydantic treats underscore-prefixed attributes as private
    fn public_identifiers(&self) -> bool {
        true
    }

    fn render_field(
        &self,
        field: &FieldPlan,
        ctx: &RenderContext<'_>,
    ) -> Result<Rendered, CodegenError> {
        let mut imports = ImportSet::new();
        let ty = render_type(&field.ty, ctx, Refinements::Native, &mut imports)?;

        let default = match &field.strategy {
            DefaultStrategy::Required | DefaultStrategy::Converter(_) => None,
            DefaultStrategy::NullDefault | DefaultStrategy::OptionalConverter(_) => Some("None"),
            DefaultStrategy::Factory => Some("default_factory=list"),
        };

        let value = match (default, field.is_renamed()) {
            (None, false) => None,
            (Some("None"), false) => Some("None".to_string()),
            (default, renamed) => {
                imports.insert(ImportPath::symbol(PYDANTIC, "Field"));
                let mut args = vec![default.unwrap_or("...").to_string()];
                if renamed {
                    args.push(format!("alias={}", py_str(&field.key)));
                }
                Some(format!("Field({})", args.join(", ")))
            }
        };

        let text = match value {
            Some(value) => format!("{}: {} = {}", field.name, ty, value),
            None => format!("{}: {}", field.name, ty),
        };
        Ok(Rendered::new(imports, text))
    }

    fn render_model(
        &self,
        model: &ModelMeta,
        fields: &[String],
        _ctx: &RenderContext<'_>,
    ) -> Rendered {
        let imports = ImportSet::from_iter([ImportPath::symbol(PYDANTIC, "BaseModel")]);
        Rendered::new(
            imports,
            format!("class {}(BaseModel):\n{}", model.name, class_body(fields)),
        )
    }
}
