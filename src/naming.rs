//! Name derivation and identifier sanitization.
//!
//! Model names are derived from the field key a mapping was found under, and
//! field keys are turned into identifiers of the target language. Both are
//! deterministic so repeated runs over the same samples produce the same text.

use std::collections::HashSet;

/// Fallback model name when a hint has no usable characters
pub const DEFAULT_MODEL_NAME: &str = "Model";

/// Fallback identifier when a key has no usable characters
pub const DEFAULT_FIELD_NAME: &str = "field";

/// Python keywords and soft keywords that cannot be used as identifiers
pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield", "match", "case", "type",
];

/// Names a model class cannot take: Python constants that look like class
/// names and the symbols generated code imports
pub const RESERVED_MODEL_NAMES: &[&str] = &[
    "False", "None", "True", "Any", "Dict", "List", "Optional", "Tuple", "Union",
    "BaseModel", "Field",
];

/// Convert a name hint to a PascalCase class name.
///
/// # Examples
///
/// ```
/// use model_infer::naming::pascal_case;
///
/// assert_eq!(pascal_case("user_profile"), "UserProfile");
/// assert_eq!(pascal_case("shippingAddress"), "ShippingAddress");
/// assert_eq!(pascal_case("2fa-settings"), "Model2faSettings");
/// assert_eq!(pascal_case("$$"), "Model");
/// ```
pub fn pascal_case(hint: &str) -> String {
    let mut name = String::with_capacity(hint.len());
    for word in hint.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.extend(chars);
        }
    }

    if name.is_empty() {
        return DEFAULT_MODEL_NAME.to_string();
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, DEFAULT_MODEL_NAME);
    }
    name
}

/// Singular form of an English plural, used for list element models.
///
/// # Examples
///
/// ```
/// use model_infer::naming::singularize;
///
/// assert_eq!(singularize("users"), "user");
/// assert_eq!(singularize("categories"), "category");
/// assert_eq!(singularize("addresses"), "address");
/// assert_eq!(singularize("status"), "status");
/// ```
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    let strip = |n: usize| word[..word.len() - n].to_string();

    if lower.ends_with("ies") && word.len() > 3 {
        return format!("{}y", strip(3));
    }
    if ["sses", "ches", "shes", "xes", "zes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return strip(2);
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_string();
    }
    if lower.ends_with('s') && word.len() > 1 {
        return strip(1);
    }
    word.to_string()
}

/// Convert a raw field key to a snake_case identifier.
///
/// Non-identifier characters become underscores and a leading digit gets an
/// underscore prefix. Keywords are not handled here, see [`field_identifier`].
///
/// # Examples
///
/// ```
/// use model_infer::naming::snake_case;
///
/// assert_eq!(snake_case("userId"), "user_id");
/// assert_eq!(snake_case("HTTPStatus"), "http_status");
/// assert_eq!(snake_case("content-type"), "content_type");
/// assert_eq!(snake_case("3d"), "_3d");
/// ```
pub fn snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = if i > 0 { chars.get(i - 1).copied() } else { None };
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            out.push('_');
        }
    }

    // collapse underscore runs
    let mut collapsed = String::with_capacity(out.len());
    for c in out.chars() {
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }
    let mut ident = collapsed.trim_matches('_').to_string();

    if ident.is_empty() {
        return DEFAULT_FIELD_NAME.to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Pick an identifier for `key` that is not reserved and not yet taken.
///
/// Reserved words get a trailing underscore; clashes with identifiers in
/// `taken` get numeric suffixes starting at 2. The chosen identifier is added
/// to `taken`.
pub fn field_identifier(key: &str, reserved: &[&str], taken: &mut HashSet<String>) -> String {
    allocate_identifier(snake_case(key), reserved, taken)
}

/// Like [`field_identifier`], but never starting with an underscore.
///
/// Keys with a leading digit get a `field` prefix instead.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use model_infer::naming::{PYTHON_KEYWORDS, public_field_identifier};
///
/// let mut taken = HashSet::new();
/// assert_eq!(public_field_identifier("3d", PYTHON_KEYWORDS, &mut taken), "field_3d");
/// ```
pub fn public_field_identifier(
    key: &str,
    reserved: &[&str],
    taken: &mut HashSet<String>,
) -> String {
    let mut base = snake_case(key);
    if base.starts_with('_') {
        base.insert_str(0, DEFAULT_FIELD_NAME);
    }
    allocate_identifier(base, reserved, taken)
}

fn allocate_identifier(mut base: String, reserved: &[&str], taken: &mut HashSet<String>) -> String {
    if reserved.contains(&base.as_str()) {
        base.push('_');
    }

    let mut candidate = base.clone();
    let mut n = 2;
    while taken.contains(&candidate) || reserved.contains(&candidate.as_str()) {
        candidate = format!("{}_{}", base, n);
        n += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

/// Allocate a name not yet in `taken`, suffixing 2, 3, ... on collision.
///
/// Returns the assigned name, which is also inserted into `taken`.
pub fn unique_name(requested: &str, taken: &mut HashSet<String>) -> String {
    let mut candidate = requested.to_string();
    let mut n = 2;
    while taken.contains(&candidate) {
        candidate = format!("{}{}", requested, n);
        n += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("user"), "User");
        assert_eq!(pascal_case("order_items"), "OrderItems");
        assert_eq!(pascal_case("Test"), "Test");
        assert_eq!(pascal_case(""), "Model");
    }

    #[test]
    fn test_singularize() {
        assert_eq!(singularize("items"), "item");
        assert_eq!(singularize("Boxes"), "Box");
        assert_eq!(singularize("matches"), "match");
        assert_eq!(singularize("data"), "data");
        assert_eq!(singularize("s"), "s");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("foo"), "foo");
        assert_eq!(snake_case("createdAt"), "created_at");
        assert_eq!(snake_case("user.name"), "user_name");
        assert_eq!(snake_case("__weird__"), "weird");
        assert_eq!(snake_case("a  b"), "a_b");
        assert_eq!(snake_case("!!!"), "field");
        assert_eq!(snake_case("version2Name"), "version2_name");
    }

    #[test]
    fn test_field_identifier_keywords_and_clashes() {
        let mut taken = HashSet::new();
        assert_eq!(field_identifier("class", PYTHON_KEYWORDS, &mut taken), "class_");
        assert_eq!(field_identifier("userId", PYTHON_KEYWORDS, &mut taken), "user_id");
        assert_eq!(field_identifier("user_id", PYTHON_KEYWORDS, &mut taken), "user_id_2");
        assert_eq!(field_identifier("user-id", PYTHON_KEYWORDS, &mut taken), "user_id_3");
    }

    #[test]
    fn test_public_field_identifier() {
        let mut taken = HashSet::new();
        assert_eq!(public_field_identifier("3d", PYTHON_KEYWORDS, &mut taken), "field_3d");
        assert_eq!(public_field_identifier("userId", PYTHON_KEYWORDS, &mut taken), "user_id");
        assert_eq!(public_field_identifier("from", PYTHON_KEYWORDS, &mut taken), "from_");
        assert_eq!(public_field_identifier("3-d", PYTHON_KEYWORDS, &mut taken), "field_3_d");
    }

    #[test]
    fn test_unique_name() {
        let mut taken = HashSet::new();
        assert_eq!(unique_name("User", &mut taken), "User");
        assert_eq!(unique_name("User", &mut taken), "User2");
        assert_eq!(unique_name("User", &mut taken), "User3");
        assert_eq!(unique_name("Order", &mut taken), "Order");
    }
}
