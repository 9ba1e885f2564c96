//! Python type expressions shared by the Python backends

use super::error::CodegenError;
use super::generator::RenderContext;
use super::imports::{ImportPath, ImportSet};
use crate::typing::{Scalar, StringKind, TypeNode};

const TYPING: &str = "typing";

/// How string refinements are spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Refinements {
    /// The refinement class itself, imported from its descriptor module
    Classes,
    /// Native types the target library coerces strings into, where one exists
    Native,
}

/// Render a type node as a Python annotation, recording needed imports
pub(crate) fn render_type(
    ty: &TypeNode,
    ctx: &RenderContext<'_>,
    refinements: Refinements,
    imports: &mut ImportSet,
) -> Result<String, CodegenError> {
    Ok(match ty {
        TypeNode::Unknown => typing(imports, "Any"),
        TypeNode::Null => {
            let any = typing(imports, "Any");
            format!("{}[{}]", typing(imports, "Optional"), any)
        }
        TypeNode::Single(scalar) => match scalar {
            Scalar::Integer => "int".to_string(),
            Scalar::Float => "float".to_string(),
            Scalar::Boolean => "bool".to_string(),
            Scalar::String => "str".to_string(),
            Scalar::Serialized(kind) => render_refinement(kind, ctx, refinements, imports),
        },
        TypeNode::Optional(inner) => {
            let inner = render_type(inner, ctx, refinements, imports)?;
            format!("{}[{}]", typing(imports, "Optional"), inner)
        }
        TypeNode::Union(members) => {
            let members = render_all(members, ctx, refinements, imports)?;
            format!("{}[{}]", typing(imports, "Union"), members.join(", "))
        }
        TypeNode::List(element) => {
            let element = render_type(element, ctx, refinements, imports)?;
            format!("{}[{}]", typing(imports, "List"), element)
        }
        TypeNode::Tuple(elements) => {
            let elements = render_all(elements, ctx, refinements, imports)?;
            format!("{}[{}]", typing(imports, "Tuple"), elements.join(", "))
        }
        TypeNode::Mapping(_) => {
            let any = typing(imports, "Any");
            format!("{}[str, {}]", typing(imports, "Dict"), any)
        }
        TypeNode::Model(ptr) => {
            let name = ctx.model_name(*ptr)?;
            if ctx.is_emitted(*ptr) {
                name.to_string()
            } else {
                // defined further down or is the model being rendered
                py_str(name)
            }
        }
    })
}

fn render_all(
    nodes: &[TypeNode],
    ctx: &RenderContext<'_>,
    refinements: Refinements,
    imports: &mut ImportSet,
) -> Result<Vec<String>, CodegenError> {
    nodes
        .iter()
        .map(|n| render_type(n, ctx, refinements, imports))
        .collect()
}

fn typing(imports: &mut ImportSet, symbol: &str) -> String {
    imports.insert(ImportPath::symbol(TYPING, symbol));
    symbol.to_string()
}

fn render_refinement(
    kind: &StringKind,
    ctx: &RenderContext<'_>,
    refinements: Refinements,
    imports: &mut ImportSet,
) -> String {
    if refinements == Refinements::Native {
        if let Some((module, native)) = native_type(kind) {
            if let Some(module) = module {
                imports.insert(ImportPath::symbol(module, native));
            }
            return native.to_string();
        }
    }
    refinement_class(kind, ctx, imports)
}

/// Import the refinement class and return its name
pub(crate) fn refinement_class(
    kind: &StringKind,
    ctx: &RenderContext<'_>,
    imports: &mut ImportSet,
) -> String {
    imports.insert(ImportPath::symbol(ctx.serializable_module(kind), kind.name()));
    kind.name().to_string()
}

fn native_type(kind: &StringKind) -> Option<(Option<&'static str>, &'static str)> {
    if *kind == StringKind::BOOLEAN {
        Some((None, "bool"))
    } else if *kind == StringKind::INTEGER {
        Some((None, "int"))
    } else if *kind == StringKind::FLOAT {
        Some((None, "float"))
    } else if *kind == StringKind::DATE {
        Some((Some("datetime"), "date"))
    } else if *kind == StringKind::TIME {
        Some((Some("datetime"), "time"))
    } else if *kind == StringKind::DATETIME {
        Some((Some("datetime"), "datetime"))
    } else {
        None
    }
}

/// Single-quoted Python string literal
pub(crate) fn py_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Class body lines indented by four spaces, `pass` when empty
pub(crate) fn class_body(fields: &[String]) -> String {
    if fields.is_empty() {
        return "    pass".to_string();
    }
    fields
        .iter()
        .map(|f| format!("    {}", f))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::codegen::CodegenConfig;
    use crate::registry::ModelRegistry;
    use crate::typing::StringSerializableRegistry;

    #[test]
    fn test_py_str_escapes() {
        assert_eq!(py_str("foo"), "'foo'");
        assert_eq!(py_str("it's"), r"'it\'s'");
        assert_eq!(py_str(r"a\b"), r"'a\\b'");
    }

    #[test]
    fn test_render_types() {
        let mut registry = ModelRegistry::new();
        let ptr = registry
            .extract(&TypeNode::mapping([("id", TypeNode::integer())]), "item")
            .unwrap();
        let graph = registry.finalize().unwrap();
        let serializables = StringSerializableRegistry::default();
        let config = CodegenConfig::default();
        let mut emitted = HashSet::new();

        let render = |ty: &TypeNode, emitted: &HashSet<_>, refinements| {
            let ctx = RenderContext::new(&graph, &serializables, &config, emitted);
            let mut imports = ImportSet::new();
            let text = render_type(ty, &ctx, refinements, &mut imports).unwrap();
            (text, imports.render())
        };

        assert_eq!(
            render(
                &TypeNode::optional(TypeNode::list(TypeNode::list(TypeNode::string()))),
                &emitted,
                Refinements::Classes
            ),
            (
                "Optional[List[List[str]]]".to_string(),
                "from typing import List, Optional".to_string()
            )
        );
        assert_eq!(
            render(
                &TypeNode::serialized(StringKind::FLOAT),
                &emitted,
                Refinements::Classes
            ),
            (
                "FloatString".to_string(),
                "from dynamic_typing import FloatString".to_string()
            )
        );
        assert_eq!(
            render(
                &TypeNode::serialized(StringKind::DATE),
                &emitted,
                Refinements::Native
            ),
            ("date".to_string(), "from datetime import date".to_string())
        );
        assert_eq!(
            render(&TypeNode::Model(ptr), &emitted, Refinements::Classes).0,
            "'Item'"
        );

        emitted.insert(ptr);
        assert_eq!(
            render(&TypeNode::Model(ptr), &emitted, Refinements::Classes).0,
            "Item"
        );
        assert_eq!(
            render(
                &TypeNode::tuple(vec![TypeNode::integer(), TypeNode::Unknown]),
                &emitted,
                Refinements::Classes
            ),
            (
                "Tuple[int, Any]".to_string(),
                "from typing import Any, Tuple".to_string()
            )
        );
    }

    #[test]
    fn test_class_body() {
        assert_eq!(class_body(&[]), "    pass");
        assert_eq!(
            class_body(&["a: int".to_string(), "b: str".to_string()]),
            "    a: int\n    b: str"
        );
    }
}
