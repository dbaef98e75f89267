//! CV page built from the YAML frontmatter of `records/cv.md`.

mod format;
mod sections;

pub use format::{clean_text, format_pages, format_volume_issue, year_range};
pub use sections::SectionContext;

use crate::config::Config;
use crate::frontmatter::{parse_frontmatter, FrontmatterError};
use crate::github::{validate_repo, GithubInfoProvider, RepoInfo, RepoSource};
use crate::slug::slugify;
use serde::Serialize;
use serde_yaml::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CvError {
    #[error("Failed to read CV data {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid CV frontmatter: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// One heading of the CV and its rendered HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CvSection {
    /// Anchor used by the table of contents
    pub id: String,
    pub title: String,
    /// HTML heading level
    pub level: u8,
    pub body: String,
}

impl CvSection {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            id: slugify(&title),
            title,
            level: 2,
            body: body.into(),
        }
    }

    /// Demote to a sub-heading of the previous section
    pub fn subsection(mut self) -> Self {
        self.level = 3;
        self
    }
}

/// Everything the CV template needs
#[derive(Debug, Clone, Serialize)]
pub struct CvDocument {
    pub heading: String,
    pub pronouns: Option<String>,
    pub sections: Vec<CvSection>,
}

impl CvDocument {
    /// Format every section present in `data`
    pub fn build(config: &Config, data: &Value, repos: &HashMap<String, RepoInfo>) -> Self {
        let ctx = SectionContext {
            data,
            owner: config.cv_owner(),
            repos,
            university_service: &config.cv.university_service,
        };
        let sections = sections::build_sections(&ctx);
        tracing::debug!("Formatted {} CV sections", sections.len());

        Self {
            heading: config.cv.heading.clone(),
            pronouns: config.cv.pronouns.clone(),
            sections,
        }
    }

    /// Sections shown in the table of contents
    pub fn toc(&self) -> impl Iterator<Item = &CvSection> {
        self.sections.iter().filter(|s| s.level == 2)
    }
}

/// Read the CV data mapping from a Markdown file's frontmatter
pub fn load_cv_data(path: &Path) -> Result<Value, CvError> {
    let content = fs::read_to_string(path).map_err(|source| CvError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (mapping, _body) = parse_frontmatter(&content)?;
    Ok(Value::Mapping(mapping))
}

/// `owner/repo` names referenced by software entries, in first-seen order
pub fn github_repos(data: &Value) -> Vec<String> {
    let mut repos: Vec<String> = Vec::new();
    for key in ["software", "othersoftware"] {
        let Some(entries) = data.get(key).and_then(Value::as_sequence) else {
            continue;
        };
        for entry in entries {
            if let Some(repo) = entry.get("github").and_then(Value::as_str) {
                let repo = repo.trim();
                if !repo.is_empty() && !repos.iter().any(|r| r == repo) {
                    repos.push(repo.to_string());
                }
            }
        }
    }
    repos
}

/// Look up every referenced repository through the cache
pub fn collect_repo_info<S: RepoSource>(
    provider: &mut GithubInfoProvider<S>,
    data: &Value,
) -> HashMap<String, RepoInfo> {
    let mut found = HashMap::new();
    for repo in github_repos(data) {
        if let Err(e) = validate_repo(&repo) {
            tracing::warn!("Skipping GitHub lookup: {}", e);
            continue;
        }
        if let Some(info) = provider.lookup(&repo) {
            found.insert(repo, info);
        }
    }
    found
}
