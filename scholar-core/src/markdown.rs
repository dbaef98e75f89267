//! Markdown to HTML conversion.

use crate::slug::slugify;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;

/// Markdown processor shared by pages and blog posts
pub struct MarkdownProcessor {
    options: Options,
}

impl MarkdownProcessor {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self { options }
    }

    /// Convert markdown to HTML; raw HTML blocks pass through untouched
    pub fn convert(&self, markdown: &str) -> String {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();
        let events = attach_heading_ids(events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }
}

impl Default for MarkdownProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Give every heading without an explicit `{#id}` a unique slug id
fn attach_heading_ids(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let titles = collect_heading_titles(&events);
    let mut titles = titles.into_iter();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut result = Vec::with_capacity(events.len());

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level,
                mut id,
                classes,
                attrs,
            }) => {
                let title = titles.next().unwrap_or_default();
                if id.is_none() {
                    let base = slugify(&title);
                    if !base.is_empty() {
                        let count = seen.entry(base.clone()).or_insert(0);
                        let unique = if *count == 0 {
                            base
                        } else {
                            format!("{}-{}", base, count)
                        };
                        *count += 1;
                        id = Some(CowStr::Boxed(unique.into_boxed_str()));
                    }
                }
                result.push(Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }));
            }
            other => result.push(other),
        }
    }

    result
}

fn collect_heading_titles(events: &[Event]) -> Vec<String> {
    let mut titles = Vec::new();
    let mut current: Option<String> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { .. }) => current = Some(String::new()),
            Event::Text(text) | Event::Code(text) => {
                if let Some(title) = current.as_mut() {
                    title.push_str(text.as_ref());
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(title) = current.take() {
                    titles.push(title);
                }
            }
            _ => {}
        }
    }

    titles
}
