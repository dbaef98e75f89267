//! Slug generation for filenames and in-page anchors.

use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;

static HYPHEN_RUNS: OnceLock<Regex> = OnceLock::new();

/// Convert a string to a URL-safe slug
///
/// Rules:
/// - Lowercase
/// - Replace whitespace with hyphens
/// - Remove special characters (except hyphens)
/// - Collapse multiple hyphens
/// - Trim leading/trailing hyphens
///
/// # Examples
///
/// ```
/// use scholar_core::slugify;
///
/// assert_eq!(slugify("Peer-Reviewed Articles"), "peer-reviewed-articles");
/// assert_eq!(slugify("Research Assistants (HQP)"), "research-assistants-hqp");
/// ```
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();

    let with_hyphens = lowercased
        .graphemes(true)
        .map(|g| match g {
            " " | "_" | "\t" | "\n" => "-",
            _ => g,
        })
        .collect::<String>();

    // Keep alphanumerics (including non-latin letters) and hyphens
    let cleaned = with_hyphens
        .graphemes(true)
        .filter(|g| {
            g.chars()
                .next()
                .map(|c| c.is_ascii_alphanumeric() || c == '-' || c.is_alphabetic())
                .unwrap_or(false)
        })
        .collect::<String>();

    let re = HYPHEN_RUNS.get_or_init(|| Regex::new(r"-+").expect("valid hyphen regex"));
    let collapsed = re.replace_all(&cleaned, "-");

    collapsed.trim_matches('-').to_string()
}

/// Derive the slug of a source file from its stem
pub fn slug_from_path(path: &std::path::Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
