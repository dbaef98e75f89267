//! Small text helpers shared by the page, blog and CV builders.

use regex::Regex;
use std::sync::OnceLock;

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag regex"))
}

/// Plain-text excerpt of rendered HTML, cut at a word boundary
///
/// ```
/// use scholar_core::text::get_excerpt;
///
/// assert_eq!(get_excerpt("<p>Hello <em>there</em></p>", 200), "Hello there");
/// assert_eq!(get_excerpt("<p>one two three</p>", 9), "one two...");
/// ```
pub fn get_excerpt(html: &str, max_length: usize) -> String {
    let stripped = tag_regex().replace_all(html, "");
    let text = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    if text.chars().count() <= max_length {
        return text;
    }

    let truncated: String = text.chars().take(max_length).collect();
    let cut = match truncated.rfind(' ') {
        Some(idx) => &truncated[..idx],
        None => truncated.as_str(),
    };
    format!("{}...", cut)
}

/// Human title from a slug: `network-models` → `Network Models`
pub fn title_from_slug(slug: &str) -> String {
    title_case(&slug.replace('-', " "))
}

/// Capitalize the first letter of every alphabetic run, lowercasing the rest
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_letter = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}

/// Initials used as the home link label: `John McLevey` → `JM.`
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphabetic()))
        .flat_map(|c| c.to_uppercase())
        .collect();
    format!("{}.", letters)
}

/// Escape text for inclusion in HTML
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
