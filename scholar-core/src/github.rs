//! GitHub repository info with a JSON read-through cache.
//!
//! CV software entries may name a `github: owner/repo`. Lookups are served
//! from the cache file while entries are younger than the configured TTL;
//! older or missing entries are refetched from the REST API. When the API
//! rate-limits us, the rest of the run falls back to whatever the cache
//! holds, however old.

use crate::config::GithubConfig;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CACHE_VERSION: &str = "1";
const USER_AGENT: &str = concat!("scholar/", env!("CARGO_PKG_VERSION"));
const TIMEOUT_SECONDS: u64 = 10;

#[derive(Error, Debug)]
pub enum GithubError {
    #[error("GitHub API rate limit exceeded")]
    RateLimited { reset: Option<i64> },

    #[error("GitHub API returned {status} for {repo}")]
    Status { repo: String, status: u16 },

    #[error("Invalid repository name '{0}' (expected owner/repo)")]
    InvalidRepo(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The subset of repository metadata shown on the CV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub description: Option<String>,
    pub stars: u64,
    pub forks: u64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiRepo {
    full_name: String,
    html_url: String,
    description: Option<String>,
    stargazers_count: u64,
    forks_count: u64,
    language: Option<String>,
    pushed_at: Option<String>,
}

impl From<ApiRepo> for RepoInfo {
    fn from(repo: ApiRepo) -> Self {
        Self {
            full_name: repo.full_name,
            html_url: repo.html_url,
            description: repo.description,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            language: repo.language,
            pushed_at: repo.pushed_at,
        }
    }
}

/// Where fresh repository info comes from
pub trait RepoSource {
    fn fetch(&self, repo: &str) -> Result<RepoInfo, GithubError>;
}

/// Blocking client for `GET /repos/{owner}/{repo}`
pub struct GithubClient {
    http: reqwest::blocking::Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self, GithubError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Client for the configured API, authenticated when the token variable is set
    pub fn from_config(config: &GithubConfig) -> Result<Self, GithubError> {
        let token = std::env::var(&config.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty());
        if token.is_none() {
            tracing::debug!("{} not set; using unauthenticated GitHub API", config.token_env);
        }
        Self::new(config.api_url.clone(), token)
    }
}

impl RepoSource for GithubClient {
    fn fetch(&self, repo: &str) -> Result<RepoInfo, GithubError> {
        validate_repo(repo)?;

        let url = format!("{}/repos/{}", self.api_url, repo);
        let mut request = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        if let Some(err) = classify(repo, response.status(), response.headers()) {
            return Err(err);
        }

        let api_repo: ApiRepo = response.json()?;
        Ok(api_repo.into())
    }
}

/// Error for a non-success response
///
/// 429, or 403 with `x-ratelimit-remaining: 0`, is a rate limit. Any other
/// non-2xx status is a plain status error.
fn classify(repo: &str, status: StatusCode, headers: &HeaderMap) -> Option<GithubError> {
    let remaining = header_value(headers, "x-ratelimit-remaining");
    let exhausted = status == StatusCode::FORBIDDEN && remaining.as_deref() == Some("0");
    if status == StatusCode::TOO_MANY_REQUESTS || exhausted {
        let reset = header_value(headers, "x-ratelimit-reset").and_then(|v| v.parse().ok());
        return Some(GithubError::RateLimited { reset });
    }

    if status.is_success() {
        None
    } else {
        Some(GithubError::Status {
            repo: repo.to_string(),
            status: status.as_u16(),
        })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
}

/// Accept only `owner/repo`
pub fn validate_repo(repo: &str) -> Result<(), GithubError> {
    let mut parts = repo.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(()),
        _ => Err(GithubError::InvalidRepo(repo.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub fetched_at: DateTime<Utc>,
    pub info: RepoInfo,
}

/// On-disk cache of repository info keyed by `owner/repo`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubCache {
    version: String,
    #[serde(default)]
    entries: BTreeMap<String, CacheEntry>,
}

impl Default for GithubCache {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION.to_string(),
            entries: BTreeMap::new(),
        }
    }
}

impl GithubCache {
    /// Load the cache; a missing, corrupt or outdated file yields an empty cache
    pub fn load(path: &Path) -> Self {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("Failed to read GitHub cache {:?}: {}", path, e);
                return Self::default();
            }
        };

        match serde_json::from_slice::<GithubCache>(&data) {
            Ok(cache) if cache.version == CACHE_VERSION => cache,
            Ok(cache) => {
                tracing::warn!(
                    "Ignoring GitHub cache {:?} with version {}",
                    path,
                    cache.version
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to parse GitHub cache {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), GithubError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn get(&self, repo: &str) -> Option<&CacheEntry> {
        self.entries.get(repo)
    }

    pub fn insert(&mut self, repo: &str, entry: CacheEntry) {
        self.entries.insert(repo.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read-through cache in front of a [`RepoSource`]
pub struct GithubInfoProvider<S> {
    source: Option<S>,
    cache: GithubCache,
    cache_path: PathBuf,
    ttl: TimeDelta,
    now: DateTime<Utc>,
    rate_limited: bool,
    dirty: bool,
}

impl<S: RepoSource> GithubInfoProvider<S> {
    /// Provider that fetches stale entries from `source`
    pub fn new(source: S, cache_path: PathBuf, cache_hours: u64) -> Self {
        let mut provider = Self::offline(cache_path, cache_hours);
        provider.source = Some(source);
        provider
    }

    /// Provider that only ever answers from the cache file
    pub fn offline(cache_path: PathBuf, cache_hours: u64) -> Self {
        let cache = GithubCache::load(&cache_path);
        let ttl = i64::try_from(cache_hours)
            .ok()
            .and_then(TimeDelta::try_hours)
            .unwrap_or(TimeDelta::MAX);

        Self {
            source: None,
            cache,
            cache_path,
            ttl,
            now: Utc::now(),
            rate_limited: false,
            dirty: false,
        }
    }

    /// Override the clock used for freshness checks
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn is_rate_limited(&self) -> bool {
        self.rate_limited
    }

    /// Repository info for `repo`, fresh from cache, refetched, or stale as a fallback
    pub fn lookup(&mut self, repo: &str) -> Option<RepoInfo> {
        let cached = self.cache.get(repo).cloned();

        if let Some(entry) = &cached {
            if self.now.signed_duration_since(entry.fetched_at) < self.ttl {
                tracing::debug!("GitHub cache hit for {}", repo);
                return Some(entry.info.clone());
            }
        }

        let source = match &self.source {
            Some(source) if !self.rate_limited => source,
            _ => return cached.map(|entry| entry.info),
        };

        match source.fetch(repo) {
            Ok(info) => {
                tracing::debug!("Fetched GitHub info for {}", repo);
                self.cache.insert(
                    repo,
                    CacheEntry {
                        fetched_at: self.now,
                        info: info.clone(),
                    },
                );
                self.dirty = true;
                Some(info)
            }
            Err(GithubError::RateLimited { reset }) => {
                match reset.and_then(|r| DateTime::<Utc>::from_timestamp(r, 0)) {
                    Some(at) => tracing::warn!(
                        "GitHub rate limit hit; using cached data until {}",
                        at.to_rfc3339()
                    ),
                    None => tracing::warn!("GitHub rate limit hit; using cached data"),
                }
                self.rate_limited = true;
                cached.map(|entry| entry.info)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch GitHub info for {}: {}", repo, e);
                cached.map(|entry| entry.info)
            }
        }
    }

    /// Write the cache back if any lookup refreshed it
    pub fn save(&self) -> Result<(), GithubError> {
        if !self.dirty {
            return Ok(());
        }
        self.cache.save(&self.cache_path)?;
        tracing::info!(
            "Updated GitHub cache {:?} ({} repos)",
            self.cache_path,
            self.cache.len()
        );
        Ok(())
    }
}
