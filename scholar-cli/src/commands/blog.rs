//! Blog rendering: Quarto posts and the blog index.

use super::pages::update_index;
use super::{load_config, write_output};
use crate::manifest::PostsManifest;
use anyhow::{Context, Result};
use askama::Template;
use scholar_core::{BlogBuilder, Config, Post, PostSummary, QuartoRenderer};
use scholar_render::{BlogIndexTemplate, BlogPostTemplate, Layout, PostEntry};
use std::path::Path;

const BLOG_ACTIVE: &str = "blog";

/// `scholar blog`: posts and blog index, then the home page's latest posts
pub fn blog_command(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let posts = build_blog(&config)?;
    update_index(&config, &posts)
}

/// Render all posts and `blog.html`; returns summaries newest first
pub fn build_blog(config: &Config) -> Result<Vec<PostSummary>> {
    tracing::info!("Building blog...");

    let renderer = QuartoRenderer::from_config(&config.quarto);
    let posts = BlogBuilder::new(config.clone(), renderer)
        .build()
        .context("Failed to build blog")?;

    for post in &posts {
        let html = render_post(config, post)?;
        write_output(config, &format!("blog/{}.html", post.slug), &html)?;
    }

    let summaries: Vec<PostSummary> = posts.iter().map(Post::summary).collect();

    let intro = Some(config.blog.intro.clone()).filter(|intro| !intro.is_empty());
    let index = BlogIndexTemplate {
        layout: Layout::new(config, "Blog", "", BLOG_ACTIVE),
        intro,
        posts: summaries
            .iter()
            .map(|p| PostEntry::from_summary(p, ""))
            .collect(),
    };
    let html = index.render().context("Failed to render blog index")?;
    write_output(config, "blog.html", &html)?;

    PostsManifest::new(summaries.clone())
        .save(&PostsManifest::path(config))
        .context("Failed to write posts manifest")?;
    tracing::info!("Built {} blog posts", summaries.len());
    Ok(summaries)
}

fn render_post(config: &Config, post: &Post) -> Result<String> {
    let template = BlogPostTemplate {
        layout: Layout::new(config, &post.title, "../", BLOG_ACTIVE),
        title: post.title.clone(),
        date: post.date.clone(),
        author: post.author.clone(),
        content: post.content_html.clone(),
    };
    template
        .render()
        .with_context(|| format!("Failed to render post {}", post.slug))
}
