//! `.posts.json`: post summaries from the last blog build.
//!
//! `scholar pages` reads it to list the latest posts on the home page
//! without running Quarto again.

use chrono::{DateTime, Utc};
use scholar_core::{Config, PostSummary};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const MANIFEST_VERSION: &str = "1";
const MANIFEST_FILENAME: &str = ".posts.json";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed posts manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Posts manifest version {found} is not {}", MANIFEST_VERSION)]
    Version { found: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostsManifest {
    version: String,
    generated_at: DateTime<Utc>,
    /// Newest first
    pub posts: Vec<PostSummary>,
}

impl PostsManifest {
    pub fn new(posts: Vec<PostSummary>) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            generated_at: Utc::now(),
            posts,
        }
    }

    pub fn path(config: &Config) -> PathBuf {
        config.output_dir().join(MANIFEST_FILENAME)
    }

    /// Read a manifest; a missing file is `Ok(None)`
    pub fn load(path: &Path) -> Result<Option<Self>, ManifestError> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ManifestError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let manifest: PostsManifest = serde_json::from_slice(&data)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ManifestError::Version {
                found: manifest.version,
            });
        }
        Ok(Some(manifest))
    }

    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let io_err = |source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json).map_err(io_err)
    }
}

/// Posts for the home page; an unusable manifest means no posts
pub fn latest_posts(config: &Config) -> Vec<PostSummary> {
    let path = PostsManifest::path(config);
    match PostsManifest::load(&path) {
        Ok(Some(manifest)) => {
            tracing::debug!(
                "Using {} posts from manifest written {}",
                manifest.posts.len(),
                manifest.generated_at
            );
            manifest.posts
        }
        Ok(None) => {
            tracing::debug!("No posts manifest at {:?}; run `scholar blog` first", path);
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("Ignoring posts manifest: {}", e);
            Vec::new()
        }
    }
}
