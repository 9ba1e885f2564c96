//! Detectors for primitive values transmitted as strings

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use super::node::StringKind;

/// Default module the generated code imports refinement classes from
pub const DEFAULT_SERIALIZABLE_MODULE: &str = "dynamic_typing";

/// Parse predicate of a descriptor
pub type ParseFn = fn(&str) -> bool;

/// Describes one string-serializable refinement
#[derive(Debug, Clone)]
pub struct StringSerializable {
    kind: StringKind,
    priority: i32,
    parse: ParseFn,
    replaces: Vec<StringKind>,
    module: Cow<'static, str>,
}

impl StringSerializable {
    /// Create a descriptor; higher priority wins when several descriptors parse a value
    pub fn new(kind: StringKind, priority: i32, parse: ParseFn) -> Self {
        Self {
            kind,
            priority,
            parse,
            replaces: Vec::new(),
            module: Cow::Borrowed(DEFAULT_SERIALIZABLE_MODULE),
        }
    }

    /// Declare narrower kinds this one can represent
    pub fn replacing(mut self, kinds: impl IntoIterator<Item = StringKind>) -> Self {
        self.replaces.extend(kinds);
        self
    }

    /// Module generated code imports the refinement class from
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Cow::Owned(module.into());
        self
    }

    pub fn kind(&self) -> &StringKind {
        &self.kind
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn replaces(&self) -> &[StringKind] {
        &self.replaces
    }

    pub fn parses(&self, value: &str) -> bool {
        (self.parse)(value)
    }
}

static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").unwrap());

static FLOAT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").unwrap());

static DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static TIME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})?$").unwrap());

static DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})?$").unwrap()
});

fn parse_boolean(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

fn parse_integer(value: &str) -> bool {
    INTEGER_REGEX.is_match(value.trim())
}

fn parse_float(value: &str) -> bool {
    FLOAT_REGEX.is_match(value.trim())
}

fn parse_date(value: &str) -> bool {
    DATE_REGEX.is_match(value)
}

fn parse_time(value: &str) -> bool {
    TIME_REGEX.is_match(value)
}

fn parse_datetime(value: &str) -> bool {
    DATETIME_REGEX.is_match(value)
}

/// Registry of string-serializable descriptors
///
/// Constructed once per generation run and passed explicitly to the
/// classifier and the code generators.
#[derive(Debug, Clone)]
pub struct StringSerializableRegistry {
    descriptors: Vec<StringSerializable>,
}

impl Default for StringSerializableRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl StringSerializableRegistry {
    /// Registry without any descriptor
    pub fn empty() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }

    /// Registry with the built-in descriptors
    ///
    /// Boolean, integer and float strings come first in that priority order, so
    /// a string matching several resolves to the narrowest kind. ISO date/time
    /// strings follow with lower priority.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(StringSerializable::new(
            StringKind::BOOLEAN,
            300,
            parse_boolean,
        ));
        registry.register(StringSerializable::new(
            StringKind::INTEGER,
            200,
            parse_integer,
        ));
        registry.register(
            StringSerializable::new(StringKind::FLOAT, 100, parse_float)
                .replacing([StringKind::INTEGER]),
        );
        registry.register(
            StringSerializable::new(StringKind::DATETIME, 60, parse_datetime)
                .replacing([StringKind::DATE]),
        );
        registry.register(StringSerializable::new(StringKind::DATE, 50, parse_date));
        registry.register(StringSerializable::new(StringKind::TIME, 40, parse_time));
        registry
    }

    /// Register a descriptor, replacing any descriptor of the same kind
    pub fn register(&mut self, descriptor: StringSerializable) {
        match self
            .descriptors
            .iter_mut()
            .find(|d| d.kind == descriptor.kind)
        {
            Some(existing) => *existing = descriptor,
            None => self.descriptors.push(descriptor),
        }
    }

    /// Remove a descriptor, dropping it from other descriptors' replace lists too
    pub fn unregister(&mut self, kind: &StringKind) -> Option<StringSerializable> {
        let index = self.descriptors.iter().position(|d| d.kind == *kind)?;
        let removed = self.descriptors.remove(index);
        for d in &mut self.descriptors {
            d.replaces.retain(|k| k != kind);
        }
        Some(removed)
    }

    /// Best descriptor parsing `value`: highest priority, earliest registered on ties
    pub fn detect(&self, value: &str) -> Option<&StringSerializable> {
        let mut best: Option<&StringSerializable> = None;
        for d in &self.descriptors {
            if !d.parses(value) {
                continue;
            }
            if best.is_none_or(|b| d.priority > b.priority) {
                best = Some(d);
            }
        }
        best
    }

    pub fn get(&self, kind: &StringKind) -> Option<&StringSerializable> {
        self.descriptors.iter().find(|d| d.kind == *kind)
    }

    pub fn contains(&self, kind: &StringKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StringSerializable> {
        self.descriptors.iter()
    }

    /// Whether `wider` replaces `narrower`, directly or through a chain
    pub fn replaces(&self, wider: &StringKind, narrower: &StringKind) -> bool {
        let mut pending = vec![wider];
        let mut seen: Vec<&StringKind> = Vec::new();
        while let Some(kind) = pending.pop() {
            if seen.contains(&kind) {
                continue;
            }
            seen.push(kind);
            if let Some(d) = self.get(kind) {
                if d.replaces.contains(narrower) {
                    return true;
                }
                pending.extend(d.replaces.iter());
            }
        }
        false
    }

    /// Minimal set of kinds able to represent every kind in `kinds`
    ///
    /// Kinds replaced by another kind of the set are dropped; the rest keep
    /// their input order.
    pub fn resolve(&self, kinds: &[StringKind]) -> Vec<StringKind> {
        let mut unique: Vec<StringKind> = Vec::new();
        for k in kinds {
            if !unique.contains(k) {
                unique.push(k.clone());
            }
        }

        unique
            .iter()
            .filter(|k| !unique.iter().any(|w| w != *k && self.replaces(w, k)))
            .cloned()
            .collect()
    }
}
