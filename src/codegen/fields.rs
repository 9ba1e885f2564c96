//! Field planning
//!
//! Decides per model which identifier each field gets, how its value is
//! constructed, and in which order fields are declared. Required fields always
//! precede optional ones; each group keeps first-seen key order.

use std::collections::HashSet;

use crate::naming::{field_identifier, public_field_identifier};
use crate::registry::ModelMeta;
use crate::typing::{Scalar, StringKind, TypeNode};

/// How a field's value is constructed when the model is instantiated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultStrategy {
    /// Plain declaration, the value must be given
    Required,
    /// Defaults to null
    NullDefault,
    /// Defaults to a fresh empty list
    Factory,
    /// Required, parsed through the refinement class
    Converter(StringKind),
    /// Defaults to null, parsed through the refinement class when given
    OptionalConverter(StringKind),
}

impl DefaultStrategy {
    pub fn for_type(ty: &TypeNode) -> Self {
        match ty {
            TypeNode::Optional(inner) => match inner.as_ref() {
                TypeNode::List(_) => DefaultStrategy::Factory,
                TypeNode::Single(Scalar::Serialized(kind)) => {
                    DefaultStrategy::OptionalConverter(kind.clone())
                }
                _ => DefaultStrategy::NullDefault,
            },
            TypeNode::Null | TypeNode::Unknown => DefaultStrategy::NullDefault,
            TypeNode::Single(Scalar::Serialized(kind)) => DefaultStrategy::Converter(kind.clone()),
            _ => DefaultStrategy::Required,
        }
    }

    /// The field can be omitted when constructing the model
    pub fn is_optional(&self) -> bool {
        matches!(
            self,
            DefaultStrategy::NullDefault
                | DefaultStrategy::Factory
                | DefaultStrategy::OptionalConverter(_)
        )
    }
}

/// One field ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPlan {
    /// Key as observed in the data
    pub key: String,
    /// Identifier in the generated code
    pub name: String,
    pub ty: TypeNode,
    pub strategy: DefaultStrategy,
}

impl FieldPlan {
    pub fn is_optional(&self) -> bool {
        self.strategy.is_optional()
    }

    /// The identifier differs from the original key
    pub fn is_renamed(&self) -> bool {
        self.name != self.key
    }
}

/// Plans fields against a target language's reserved words
#[derive(Debug, Clone, Copy)]
pub struct FieldPlanner<'a> {
    reserved: &'a [&'a str],
    public: bool,
}

impl<'a> FieldPlanner<'a> {
    pub fn new(reserved: &'a [&'a str]) -> Self {
        Self {
            reserved,
            public: false,
        }
    }

    /// Never hand out identifiers with a leading underscore
    pub fn public_identifiers(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Ordered field plans of one model
    pub fn plan(&self, model: &ModelMeta) -> Vec<FieldPlan> {
        let mut taken = HashSet::new();
        let plans: Vec<FieldPlan> = model
            .fields
            .iter()
            .map(|(key, ty)| FieldPlan {
                key: key.to_string(),
                name: if self.public {
                    public_field_identifier(key, self.reserved, &mut taken)
                } else {
                    field_identifier(key, self.reserved, &mut taken)
                },
                ty: ty.clone(),
                strategy: DefaultStrategy::for_type(ty),
            })
            .collect();

        let (required, optional): (Vec<_>, Vec<_>) =
            plans.into_iter().partition(|p| !p.is_optional());
        required.into_iter().chain(optional).collect()
    }
}
