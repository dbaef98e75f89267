//! Content model structs for pages, posts, and link lists.

use crate::frontmatter::opt_scalar;
use serde::{Deserialize, Serialize};

/// Which template renders a content page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Page,
    Index,
    Book,
    Course,
}

impl TemplateKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().trim_end_matches(".html") {
            "page" => Some(TemplateKind::Page),
            "index" => Some(TemplateKind::Index),
            "book" => Some(TemplateKind::Book),
            "course" => Some(TemplateKind::Course),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKind::Page => "page",
            TemplateKind::Index => "index",
            TemplateKind::Book => "book",
            TemplateKind::Course => "course",
        }
    }
}

/// Content directory a page was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSection {
    Root,
    Books,
    Teaching,
}

impl PageSection {
    pub const ALL: [PageSection; 3] = [PageSection::Root, PageSection::Books, PageSection::Teaching];

    /// Subdirectory under both the content and output roots
    pub fn dir_name(&self) -> Option<&'static str> {
        match self {
            PageSection::Root => None,
            PageSection::Books => Some("books"),
            PageSection::Teaching => Some("teaching"),
        }
    }

    /// Relative prefix from a page in this section back to the site root
    pub fn base_path(&self) -> &'static str {
        match self {
            PageSection::Root => "",
            PageSection::Books | PageSection::Teaching => "../",
        }
    }
}

/// A labelled link from frontmatter (book purchase links, course resources)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

/// Frontmatter recognised on content pages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageFrontmatter {
    #[serde(default, deserialize_with = "opt_scalar")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub template: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub description: Option<String>,

    /// Nav key highlighted on this page
    #[serde(default, deserialize_with = "opt_scalar")]
    pub active: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub subtitle: Option<String>,

    // index
    #[serde(default, deserialize_with = "opt_scalar")]
    pub tagline: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub photo: Option<String>,

    // book
    #[serde(default, deserialize_with = "opt_scalar")]
    pub cover: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub publisher: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub year: Option<String>,

    #[serde(default)]
    pub links: Vec<Link>,

    // course
    #[serde(default, deserialize_with = "opt_scalar")]
    pub code: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub term: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub schedule: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub location: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub syllabus: Option<String>,
}

/// A content page ready for templating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Filename stem (e.g., "research")
    pub slug: String,

    /// Display title
    pub title: String,

    pub section: PageSection,

    pub template: TemplateKind,

    pub frontmatter: PageFrontmatter,

    /// Rendered HTML body
    pub content_html: String,
}

impl Page {
    /// Relative output path for this page (no leading slash)
    pub fn output_rel_path(&self) -> String {
        match self.section.dir_name() {
            Some(dir) => format!("{}/{}.html", dir, self.slug),
            None => format!("{}.html", self.slug),
        }
    }

    pub fn base_path(&self) -> &'static str {
        self.section.base_path()
    }

    /// Nav key to highlight: explicit `active`, else the section, else the slug
    pub fn active_key(&self) -> String {
        if let Some(active) = &self.frontmatter.active {
            return active.clone();
        }
        match self.section.dir_name() {
            Some(dir) => dir.to_string(),
            None => self.slug.clone(),
        }
    }
}

/// Frontmatter recognised on rendered blog posts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFrontmatter {
    #[serde(default, deserialize_with = "opt_scalar")]
    pub title: Option<String>,

    /// Any YAML scalar; normalized by the blog builder
    #[serde(default, deserialize_with = "opt_scalar")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub author: Option<String>,

    #[serde(default, deserialize_with = "opt_scalar")]
    pub excerpt: Option<String>,
}

/// A fully rendered blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub slug: String,
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub author: String,
    pub excerpt: String,
    pub content_html: String,
}

impl Post {
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            title: self.title.clone(),
            date: self.date.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
        }
    }
}

/// Listing data for the blog index and the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub title: String,
    pub date: String,
    pub slug: String,
    pub excerpt: String,
}

impl PostSummary {
    /// Site-relative URL of the post
    pub fn href(&self) -> String {
        format!("blog/{}.html", self.slug)
    }
}
