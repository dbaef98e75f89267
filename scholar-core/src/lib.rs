//! # scholar-core
//!
//! Core library for the scholar static site generator.
//!
//! This crate loads the site configuration, parses content pages and their
//! frontmatter, drives Quarto for blog posts, formats CV data into HTML
//! fragments, and keeps the GitHub repository cache used by the CV.

pub mod blog;
pub mod config;
pub mod cv;
pub mod frontmatter;
pub mod github;
pub mod markdown;
pub mod models;
pub mod pages;
pub mod quarto;
pub mod slug;
pub mod text;

pub use blog::BlogBuilder;
pub use config::Config;
pub use cv::{CvDocument, CvSection};
pub use github::{GithubClient, GithubInfoProvider, RepoInfo};
pub use models::{Page, PageSection, Post, PostSummary, TemplateKind};
pub use pages::PageBuilder;
pub use quarto::{NotebookRenderer, QuartoRenderer};
pub use slug::slugify;
