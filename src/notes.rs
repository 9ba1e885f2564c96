//! Non-fatal findings recorded during generation

use std::fmt;

use serde::{Deserialize, Serialize};

/// A precision loss the generator resolved on its own
///
/// Notes never abort a run. They are collected on the model registry and
/// carried into the finalized graph so callers can report them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GenerationNote {
    /// A field was observed with structurally incompatible shapes and became a union
    #[serde(rename_all = "camelCase")]
    TypeConflict { path: String, members: Vec<String> },

    /// Two distinct models wanted the same name
    #[serde(rename_all = "camelCase")]
    ModelNameCollision { requested: String, assigned: String },

    /// String values parsed as a refinement in some samples but not in others
    #[serde(rename_all = "camelCase")]
    StringParseAmbiguity { path: String, kinds: Vec<String> },
}

impl fmt::Display for GenerationNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationNote::TypeConflict { path, members } => {
                write!(f, "{}: conflicting shapes {}", path, members.join(" | "))
            }
            GenerationNote::ModelNameCollision {
                requested,
                assigned,
            } => write!(f, "model name {} already taken, using {}", requested, assigned),
            GenerationNote::StringParseAmbiguity { path, kinds } => write!(
                f,
                "{}: string refinements {} widened",
                path,
                kinds.join(", ")
            ),
        }
    }
}
