//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::text::initials;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching scholar.yml schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default = "default_nav")]
    pub nav: Vec<NavItem>,

    #[serde(default)]
    pub blog: BlogConfig,

    #[serde(default)]
    pub quarto: QuartoConfig,

    #[serde(default)]
    pub cv: CvConfig,

    #[serde(default)]
    pub github: GithubConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_author")]
    pub title: String,

    #[serde(default = "default_author")]
    pub author: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub url: String,

    /// Label of the home link in the nav bar; defaults to the author's initials
    #[serde(default)]
    pub home_label: Option<String>,
}

fn default_author() -> String {
    String::from("John McLevey")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_content")]
    pub content: PathBuf,

    #[serde(default = "default_posts")]
    pub posts: PathBuf,

    #[serde(default = "default_records")]
    pub records: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default = "default_static")]
    pub static_dir: PathBuf,
}

fn default_content() -> PathBuf {
    PathBuf::from("content")
}

fn default_posts() -> PathBuf {
    PathBuf::from("content/posts")
}

fn default_records() -> PathBuf {
    PathBuf::from("records")
}

fn default_output() -> PathBuf {
    PathBuf::from("docs")
}

fn default_static() -> PathBuf {
    PathBuf::from("static")
}

/// One entry of the site navigation bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Key compared against a page's `active` value
    pub key: String,
    pub label: String,
    /// Site-relative target (base path is prepended at render time)
    pub href: String,
}

impl NavItem {
    fn new(key: &str, label: &str, href: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            href: href.to_string(),
        }
    }
}

fn default_nav() -> Vec<NavItem> {
    vec![
        NavItem::new("cv", "CV", "cv.html"),
        NavItem::new("research", "Research", "research.html"),
        NavItem::new("teaching", "Teaching & Supervision", "teaching.html"),
        NavItem::new("software-data", "Software & Data", "software-data.html"),
        NavItem::new("blog", "Blog", "blog.html"),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    /// Author used when a post does not name one
    #[serde(default = "default_author")]
    pub default_author: String,

    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,

    /// Number of posts shown on the home page
    #[serde(default = "default_latest_posts")]
    pub latest_posts: usize,

    #[serde(default = "default_blog_intro")]
    pub intro: String,
}

fn default_excerpt_length() -> usize {
    200
}

fn default_latest_posts() -> usize {
    2
}

fn default_blog_intro() -> String {
    String::from("Notes on methods, tutorials, and updates.")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuartoConfig {
    #[serde(default = "default_quarto_command")]
    pub command: String,

    #[serde(default = "default_quarto_format")]
    pub format: String,

    /// Directories under the posts dir removed after a blog build
    #[serde(default = "default_cache_dirs")]
    pub cache_dirs: Vec<String>,
}

fn default_quarto_command() -> String {
    String::from("quarto")
}

fn default_quarto_format() -> String {
    String::from("gfm")
}

fn default_cache_dirs() -> Vec<String> {
    vec![
        ".quarto".to_string(),
        "_freeze".to_string(),
        ".jupyter_cache".to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvConfig {
    /// CV data file, relative to the records directory
    #[serde(default = "default_cv_source")]
    pub source: PathBuf,

    /// Output file, relative to the output directory
    #[serde(default = "default_cv_output")]
    pub output: PathBuf,

    #[serde(default = "default_cv_heading")]
    pub heading: String,

    #[serde(default = "default_pronouns")]
    pub pronouns: Option<String>,

    /// Name matched against `supervisor` in PhD entries; defaults to the site author
    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default = "default_university_service")]
    pub university_service: Vec<ServiceSection>,
}

fn default_cv_source() -> PathBuf {
    PathBuf::from("cv.md")
}

fn default_cv_output() -> PathBuf {
    PathBuf::from("cv.html")
}

fn default_cv_heading() -> String {
    String::from("Professor John McLevey")
}

fn default_pronouns() -> Option<String> {
    Some(String::from("he/him"))
}

/// A CV data key listing service at one institution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSection {
    pub key: String,
    pub institution: String,
}

fn default_university_service() -> Vec<ServiceSection> {
    vec![
        ServiceSection {
            key: "suwaterloo".to_string(),
            institution: "Waterloo".to_string(),
        },
        ServiceSection {
            key: "mcmaster".to_string(),
            institution: "McMaster".to_string(),
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cache file, relative to the records directory
    #[serde(default = "default_github_cache")]
    pub cache_file: PathBuf,

    #[serde(default = "default_cache_hours")]
    pub cache_hours: u64,

    /// Environment variable holding an optional API token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_true() -> bool {
    true
}

fn default_github_cache() -> PathBuf {
    PathBuf::from("github_cache.json")
}

fn default_cache_hours() -> u64 {
    24
}

fn default_token_env() -> String {
    String::from("GITHUB_TOKEN")
}

fn default_api_url() -> String {
    String::from("https://api.github.com")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_author(),
            author: default_author(),
            description: String::new(),
            url: String::new(),
            home_label: None,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: default_content(),
            posts: default_posts(),
            records: default_records(),
            output: default_output(),
            static_dir: default_static(),
        }
    }
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            default_author: default_author(),
            excerpt_length: default_excerpt_length(),
            latest_posts: default_latest_posts(),
            intro: default_blog_intro(),
        }
    }
}

impl Default for QuartoConfig {
    fn default() -> Self {
        Self {
            command: default_quarto_command(),
            format: default_quarto_format(),
            cache_dirs: default_cache_dirs(),
        }
    }
}

impl Default for CvConfig {
    fn default() -> Self {
        Self {
            source: default_cv_source(),
            output: default_cv_output(),
            heading: default_cv_heading(),
            pronouns: default_pronouns(),
            owner: None,
            university_service: default_university_service(),
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_file: default_github_cache(),
            cache_hours: default_cache_hours(),
            token_env: default_token_env(),
            api_url: default_api_url(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = if contents.trim().is_empty() {
            Config::defaults()
        } else {
            serde_yaml::from_str(&contents)?
        };

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Load configuration, falling back to the built-in layout when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        tracing::warn!("No config at {:?}; using the default site layout", path);
        let mut config = Config::defaults();
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Defaults as if loaded from an empty scholar.yml
    pub fn defaults() -> Self {
        Self {
            nav: default_nav(),
            ..Default::default()
        }
    }

    /// Directory all relative paths resolve against
    pub fn root_dir(&self) -> PathBuf {
        self.resolve_path(Path::new(""))
    }

    pub fn content_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.content)
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.posts)
    }

    pub fn records_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.records)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    pub fn static_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.static_dir)
    }

    pub fn blog_output_dir(&self) -> PathBuf {
        self.output_dir().join("blog")
    }

    pub fn cv_source_path(&self) -> PathBuf {
        self.records_dir().join(&self.cv.source)
    }

    pub fn cv_output_path(&self) -> PathBuf {
        self.output_dir().join(&self.cv.output)
    }

    pub fn github_cache_path(&self) -> PathBuf {
        self.records_dir().join(&self.github.cache_file)
    }

    /// Name that identifies the site owner as a PhD supervisor
    pub fn cv_owner(&self) -> &str {
        self.cv.owner.as_deref().unwrap_or(&self.site.author)
    }

    /// Home link label, e.g. "JM."
    pub fn home_label(&self) -> String {
        self.site
            .home_label
            .clone()
            .unwrap_or_else(|| initials(&self.site.author))
    }

    /// Show a path relative to the project root for log messages
    pub fn display_path(&self, path: &Path) -> String {
        let root = self.root_dir();
        path.strip_prefix(&root)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            match config_path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.join(path),
                _ => path.to_path_buf(),
            }
        } else {
            path.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config: Config = serde_yaml::from_str("site:\n  author: Ada Lovelace\n").unwrap();

        assert_eq!(config.paths.output, PathBuf::from("docs"));
        assert_eq!(config.paths.posts, PathBuf::from("content/posts"));
        assert_eq!(config.blog.excerpt_length, 200);
        assert_eq!(config.blog.latest_posts, 2);
        assert_eq!(config.quarto.format, "gfm");
        assert_eq!(config.github.cache_hours, 24);
        assert_eq!(config.nav.len(), 5);
        assert_eq!(config.cv.university_service.len(), 2);
    }

    #[test]
    fn test_owner_and_home_label_fall_back_to_author() {
        let config: Config = serde_yaml::from_str("site:\n  author: Ada Lovelace\n").unwrap();
        assert_eq!(config.cv_owner(), "Ada Lovelace");
        assert_eq!(config.home_label(), "AL.");

        let config: Config = serde_yaml::from_str(
            "site:\n  author: Ada Lovelace\n  home_label: Home\ncv:\n  owner: A. Lovelace\n",
        )
        .unwrap();
        assert_eq!(config.cv_owner(), "A. Lovelace");
        assert_eq!(config.home_label(), "Home");
    }

    #[test]
    fn test_paths_resolve_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scholar.yml");
        std::fs::write(&path, "paths:\n  output: public\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output_dir(), dir.path().join("public"));
        assert_eq!(config.cv_source_path(), dir.path().join("records/cv.md"));
        assert_eq!(
            config.github_cache_path(),
            dir.path().join("records/github_cache.json")
        );
        assert_eq!(
            config.display_path(&dir.path().join("public/cv.html")),
            "public/cv.html"
        );
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("scholar.yml")).unwrap();
        assert_eq!(config.content_dir(), dir.path().join("content"));
        assert_eq!(config.nav.len(), 5);
    }

    #[test]
    fn test_empty_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scholar.yml");
        std::fs::write(&path, "").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.site.author, "John McLevey");
        assert_eq!(config.nav.len(), 5);
    }

    #[test]
    fn test_example_config_parses() {
        let example = include_str!("../../scholar.yml.example");
        let config: Config = serde_yaml::from_str(example).unwrap();
        assert_eq!(config.nav[2].label, "Teaching & Supervision");
        assert_eq!(config.cv.pronouns.as_deref(), Some("he/him"));
        assert_eq!(config.quarto.cache_dirs.len(), 3);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scholar.yml");
        std::fs::write(&path, "site: [unclosed\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
