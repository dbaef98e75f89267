//! Askama template definitions.

use askama::Template;
use scholar_core::models::Link;
use scholar_core::{Config, CvSection, PostSummary};

/// A navigation entry in the site header
#[derive(Debug, Clone)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Fields every page shares through `base.html`
#[derive(Debug, Clone)]
pub struct Layout {
    /// Contents of `<title>`
    pub page_title: String,
    pub site_title: String,
    pub site_author: String,
    pub description: String,

    /// `""` at the site root, `"../"` one level down
    pub base_path: String,

    pub home_label: String,
    pub nav: Vec<NavLink>,
    pub year: i32,
}

impl Layout {
    /// Layout for a page at `base_path` highlighting the nav entry `active`
    pub fn new(config: &Config, title: &str, base_path: &str, active: &str) -> Self {
        let nav = config
            .nav
            .iter()
            .map(|item| NavLink {
                label: item.label.clone(),
                href: item.href.clone(),
                active: item.key == active,
            })
            .collect();

        let page_title = if title.is_empty() || title == config.site.title {
            config.site.title.clone()
        } else {
            format!("{} – {}", title, config.site.title)
        };

        Self {
            page_title,
            site_title: config.site.title.clone(),
            site_author: config.site.author.clone(),
            description: config.site.description.clone(),
            base_path: base_path.to_string(),
            home_label: config.home_label(),
            nav,
            year: current_year(),
        }
    }
}

fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Local::now().year()
}

/// A post in the blog listing or the home page's "latest posts"
#[derive(Debug, Clone)]
pub struct PostEntry {
    pub title: String,
    pub date: String,
    pub href: String,
    pub excerpt: String,
}

impl PostEntry {
    /// Entry linking from a page at `base_path`
    pub fn from_summary(summary: &PostSummary, base_path: &str) -> Self {
        Self {
            title: summary.title.clone(),
            date: summary.date.clone(),
            href: format!("{}{}", base_path, summary.href()),
            excerpt: summary.excerpt.clone(),
        }
    }
}

/// Generic content page
#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub layout: Layout,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
}

/// Home page with profile and latest posts
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub layout: Layout,
    pub title: String,
    pub tagline: Option<String>,
    pub photo: Option<String>,
    pub content: String,
    pub latest_posts: Vec<PostEntry>,
}

/// Book page
#[derive(Template)]
#[template(path = "book.html")]
pub struct BookTemplate {
    pub layout: Layout,
    pub title: String,
    pub subtitle: Option<String>,
    pub cover: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<String>,
    pub links: Vec<Link>,
    pub content: String,
}

/// Course page
#[derive(Template)]
#[template(path = "course.html")]
pub struct CourseTemplate {
    pub layout: Layout,
    pub title: String,
    pub code: Option<String>,
    pub term: Option<String>,
    pub schedule: Option<String>,
    pub location: Option<String>,
    pub syllabus: Option<String>,
    pub content: String,
}

/// Single blog post with syntax highlighting and image lightbox
#[derive(Template)]
#[template(path = "blog_post.html")]
pub struct BlogPostTemplate {
    pub layout: Layout,
    pub title: String,
    pub date: String,
    pub author: String,
    pub content: String,
}

/// Blog listing
#[derive(Template)]
#[template(path = "blog_index.html")]
pub struct BlogIndexTemplate {
    pub layout: Layout,
    pub intro: Option<String>,
    pub posts: Vec<PostEntry>,
}

/// CV with a table-of-contents sidebar
#[derive(Template)]
#[template(path = "cv.html")]
pub struct CvTemplate {
    pub layout: Layout,
    pub heading: String,
    pub pronouns: Option<String>,
    pub toc: Vec<CvSection>,
    pub sections: Vec<CvSection>,
}
