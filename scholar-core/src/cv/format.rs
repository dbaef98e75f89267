//! Text cleanup and field access for CV entries.

use crate::frontmatter::scalar_to_string;
use regex::Regex;
use serde_yaml::Value;
use std::sync::OnceLock;

/// Indent used for continuation lines inside a CV paragraph
pub const LEADING_WS: &str = "&nbsp;&nbsp;&nbsp;&nbsp;";

struct Cleaners {
    newline: Regex,
    footnotesize: Regex,
    vspace: Regex,
    ind: Regex,
    superscript: Regex,
    emphasis: Regex,
}

static CLEANERS: OnceLock<Cleaners> = OnceLock::new();

fn cleaners() -> &'static Cleaners {
    CLEANERS.get_or_init(|| Cleaners {
        newline: Regex::new(r"\\newline").expect("valid regex"),
        footnotesize: Regex::new(r"\\footnotesize").expect("valid regex"),
        vspace: Regex::new(r"\\vspace\{[^}]*\}").expect("valid regex"),
        ind: Regex::new(r"\\ind\s*").expect("valid regex"),
        superscript: Regex::new(r"\^(\w+)\^").expect("valid regex"),
        emphasis: Regex::new(r"\*([^*]+)\*").expect("valid regex"),
    })
}

/// Strip LaTeX layout commands and turn `^st^` / `*name*` into HTML
///
/// ```
/// use scholar_core::cv::clean_text;
///
/// assert_eq!(clean_text("21^st^ Century\\newline"), "21<sup>st</sup> Century");
/// assert_eq!(clean_text("with *A. Student*"), "with <em>A. Student</em>");
/// ```
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let c = cleaners();
    let text = c.newline.replace_all(text, "");
    let text = c.footnotesize.replace_all(&text, "");
    let text = c.vspace.replace_all(&text, "");
    let text = c.ind.replace_all(&text, "");
    let text = c.superscript.replace_all(&text, "<sup>$1</sup>");
    let text = c.emphasis.replace_all(&text, "<em>$1</em>");
    text.trim().to_string()
}

/// `: 12-34`, or nothing without pages
pub fn format_pages(pages: &str) -> String {
    if pages.is_empty() {
        return String::new();
    }
    format!(": {}", pages)
}

/// ` 12(3)`, ` 12`, or nothing without a volume
pub fn format_volume_issue(volume: &str, issue: &str) -> String {
    if volume.is_empty() {
        return String::new();
    }
    if issue.is_empty() {
        return format!(" {}", volume);
    }
    format!(" {}({})", volume, issue)
}

/// `2019--2021` → `2019 to 2021`
pub fn year_range(text: &str) -> String {
    text.replace("--", " to ")
}

/// Python-style truthiness of a YAML value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(seq) => !seq.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

/// One CV record (a YAML mapping) with lenient field access
#[derive(Clone, Copy)]
pub struct Entry<'a>(&'a Value);

impl<'a> Entry<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// Raw string form of a field; empty when missing, null or not a scalar
    pub fn raw(&self, key: &str) -> String {
        self.0
            .get(key)
            .and_then(scalar_to_string)
            .unwrap_or_default()
    }

    /// Raw field with a default for missing or null values
    pub fn raw_or(&self, key: &str, default: &str) -> String {
        self.0
            .get(key)
            .and_then(scalar_to_string)
            .unwrap_or_else(|| default.to_string())
    }

    /// Field passed through [`clean_text`]
    pub fn text(&self, key: &str) -> String {
        clean_text(&self.raw(key))
    }

    /// Whether the field is present and truthy
    pub fn has(&self, key: &str) -> bool {
        self.0.get(key).map(is_truthy).unwrap_or(false)
    }
}

/// Entries of a list-valued CV key; empty when missing or not a list
pub fn entries<'a>(data: &'a Value, key: &str) -> Vec<Entry<'a>> {
    data.get(key)
        .and_then(Value::as_sequence)
        .map(|seq| seq.iter().map(Entry::new).collect())
        .unwrap_or_default()
}

/// Scalar members of a list-valued CV key, as strings
///
/// A bare scalar counts as a one-item list.
pub fn strings(data: &Value, key: &str) -> Vec<String> {
    match data.get(key) {
        Some(Value::Sequence(seq)) => seq.iter().filter_map(scalar_to_string).collect(),
        Some(other) => scalar_to_string(other).into_iter().collect(),
        None => Vec::new(),
    }
}
