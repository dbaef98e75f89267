//! Static content pages: `content/*.md`, `content/books/*.md`, `content/teaching/*.md`.

use crate::{
    config::Config,
    frontmatter::{from_mapping, parse_frontmatter, FrontmatterError},
    markdown::MarkdownProcessor,
    models::{Page, PageFrontmatter, PageSection, TemplateKind},
    slug::slug_from_path,
    text::title_from_slug,
};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Frontmatter error in {path:?}: {source}")]
    Frontmatter {
        path: PathBuf,
        source: FrontmatterError,
    },

    #[error("Unknown template '{template}' in {path:?}")]
    UnknownTemplate { path: PathBuf, template: String },

    #[error("Cannot derive a slug from {0:?}")]
    BadFileName(PathBuf),
}

/// Builds every static page under the content directory
pub struct PageBuilder {
    content_dir: PathBuf,
    processor: MarkdownProcessor,
}

impl PageBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            content_dir: config.content_dir(),
            processor: MarkdownProcessor::new(),
        }
    }

    /// Parse all pages; broken ones are logged and left out
    pub fn build(&self) -> Vec<Page> {
        let mut pages = Vec::new();

        for section in PageSection::ALL {
            let dir = match section.dir_name() {
                Some(name) => self.content_dir.join(name),
                None => self.content_dir.clone(),
            };
            if !dir.is_dir() {
                tracing::debug!("Skipping missing content directory {:?}", dir);
                continue;
            }

            for path in discover_pages(&dir) {
                match self.parse_page(&path, section) {
                    Ok(page) => pages.push(page),
                    Err(e) => tracing::error!("Skipping page: {}", e),
                }
            }
        }

        tracing::info!("Found {} content pages", pages.len());
        pages
    }

    /// Parse one Markdown file into a [`Page`]
    pub fn parse_page(&self, path: &Path, section: PageSection) -> Result<Page, PageError> {
        let content = fs::read_to_string(path).map_err(|source| PageError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let slug = slug_from_path(path).ok_or_else(|| PageError::BadFileName(path.to_path_buf()))?;

        let frontmatter_error = |source| PageError::Frontmatter {
            path: path.to_path_buf(),
            source,
        };
        let (mapping, body) = parse_frontmatter(&content).map_err(frontmatter_error)?;
        let frontmatter: PageFrontmatter = from_mapping(&mapping).map_err(frontmatter_error)?;

        let template = match frontmatter.template.as_deref() {
            None => TemplateKind::Page,
            Some(name) => {
                TemplateKind::from_name(name).ok_or_else(|| PageError::UnknownTemplate {
                    path: path.to_path_buf(),
                    template: name.to_string(),
                })?
            }
        };

        let title = frontmatter
            .title
            .clone()
            .unwrap_or_else(|| title_from_slug(&slug));
        let content_html = self.processor.convert(&body);

        Ok(Page {
            slug,
            title,
            section,
            template,
            frontmatter,
            content_html,
        })
    }
}

/// `*.md` files directly inside `dir`, sorted by name
pub fn discover_pages(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();
    files
}
