//! Frontmatter parsing from markdown files.

use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Frontmatter must be a YAML mapping, found {0}")]
    NotAMapping(&'static str),
}

const DELIMITER: &str = "---";

/// Parse frontmatter from markdown content
///
/// Returns a tuple of (frontmatter, markdown_body). The body is trimmed when
/// frontmatter is present. If no frontmatter is present, returns an empty
/// mapping with the full content as body.
///
/// # Example
///
/// ```
/// use scholar_core::frontmatter::parse_frontmatter;
///
/// let content = "---\ntitle: My Post\ndate: 2025-01-01\n---\n# Hello World\n";
///
/// let (fm, body) = parse_frontmatter(content).unwrap();
/// assert_eq!(fm.get("title").and_then(|v| v.as_str()), Some("My Post"));
/// assert_eq!(body, "# Hello World");
/// ```
pub fn parse_frontmatter(content: &str) -> Result<(Mapping, String), FrontmatterError> {
    if content.starts_with(DELIMITER) {
        let parts: Vec<&str> = content.splitn(3, DELIMITER).collect();
        if let [_, yaml, body] = parts.as_slice() {
            let value: Value = serde_yaml::from_str(yaml)?;
            let mapping = match value {
                Value::Mapping(map) => map,
                Value::Null => Mapping::new(),
                other => return Err(FrontmatterError::NotAMapping(value_kind(&other))),
            };
            return Ok((mapping, body.trim().to_string()));
        }
    }

    Ok((Mapping::new(), content.to_string()))
}

/// Deserialize a typed view of a frontmatter mapping
pub fn from_mapping<T>(mapping: &Mapping) -> Result<T, FrontmatterError>
where
    T: for<'de> Deserialize<'de>,
{
    Ok(serde_yaml::from_value(Value::Mapping(mapping.clone()))?)
}

/// String form of a YAML scalar; `None` for null and for collections
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// serde helper accepting any YAML scalar where a string is expected
pub fn opt_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
