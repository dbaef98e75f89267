//! Blog pipeline: Quarto notebooks in, rendered posts out.
//!
//! For every `<slug>.qmd` in the posts directory the builder renders the
//! notebook to Markdown, copies generated figures next to the blog output,
//! strips the title block Quarto repeats in the body, wraps printed cell
//! output in `<pre class="code-output">`, converts to HTML and removes the
//! intermediate files again.

use crate::{
    config::Config,
    frontmatter::{from_mapping, parse_frontmatter, FrontmatterError},
    markdown::MarkdownProcessor,
    models::{Post, PostFrontmatter},
    quarto::{NotebookRenderer, QuartoError},
    slug::slug_from_path,
    text::{get_excerpt, html_escape, title_from_slug},
};
use chrono::NaiveDate;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BlogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(#[from] QuartoError),

    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),

    #[error("Notebook {0:?} has no usable file name")]
    BadFileName(PathBuf),
}

static DATE_LINE: OnceLock<Regex> = OnceLock::new();
static DATE_PREFIX: OnceLock<Regex> = OnceLock::new();

fn date_line_regex() -> &'static Regex {
    DATE_LINE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"))
}

fn date_prefix_regex() -> &'static Regex {
    DATE_PREFIX.get_or_init(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})").expect("valid date regex"))
}

/// Builds blog posts from notebooks
pub struct BlogBuilder<R> {
    config: Config,
    renderer: R,
    processor: MarkdownProcessor,
    today: NaiveDate,
}

impl<R: NotebookRenderer> BlogBuilder<R> {
    pub fn new(config: Config, renderer: R) -> Self {
        Self {
            config,
            renderer,
            processor: MarkdownProcessor::new(),
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Override the date used for undated posts
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Render every notebook; failed posts are logged and skipped
    ///
    /// Returned posts are sorted newest first.
    pub fn build(&self) -> Result<Vec<Post>, BlogError> {
        let posts_dir = self.config.posts_dir();
        let notebooks = discover_notebooks(&posts_dir)?;

        if notebooks.is_empty() {
            tracing::info!("No .qmd files found in {:?}", posts_dir);
            return Ok(Vec::new());
        }

        tracing::info!("Found {} .qmd files", notebooks.len());
        fs::create_dir_all(self.config.blog_output_dir())?;

        let mut posts = Vec::new();
        for notebook in &notebooks {
            tracing::info!("Processing: {:?}", notebook.file_name().unwrap_or_default());
            match self.build_post(notebook) {
                Ok(post) => posts.push(post),
                Err(e) => tracing::error!("Skipping {:?}: {}", notebook, e),
            }
        }

        cleanup_quarto_cache(&posts_dir, &self.config.quarto.cache_dirs)?;

        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    fn build_post(&self, notebook: &Path) -> Result<Post, BlogError> {
        let posts_dir = self.config.posts_dir();
        let format = self.renderer.format().to_string();
        let slug =
            slug_from_path(notebook).ok_or_else(|| BlogError::BadFileName(notebook.to_path_buf()))?;

        let md_file = self.renderer.render(notebook, &posts_dir)?;

        // Read and clean up intermediates even when the post itself fails
        let result = self.convert_rendered(&md_file, &slug, &format, &posts_dir);
        if let Err(e) = cleanup_intermediate_files(&posts_dir, &slug, &format) {
            tracing::warn!("Could not remove intermediates for {}: {}", slug, e);
        }
        result
    }

    fn convert_rendered(
        &self,
        md_file: &Path,
        slug: &str,
        format: &str,
        posts_dir: &Path,
    ) -> Result<Post, BlogError> {
        let copied = copy_figures(posts_dir, &self.config.blog_output_dir(), slug, format)?;
        if copied > 0 {
            tracing::info!("  Copied {} figure(s)", copied);
        }

        let content = fs::read_to_string(md_file)?;
        let (mapping, body) = parse_frontmatter(&content)?;
        let frontmatter: PostFrontmatter = from_mapping(&mapping)?;

        let title = frontmatter
            .title
            .clone()
            .unwrap_or_else(|| title_from_slug(slug));
        let date = resolve_post_date(frontmatter.date.as_deref(), slug, self.today);
        let author = frontmatter
            .author
            .clone()
            .unwrap_or_else(|| self.config.blog.default_author.clone());

        let body = clean_quarto_artifacts(&body, &title, &author);
        let body = fix_image_paths(&body, slug, format);
        let body = format_code_output(&body);

        let content_html = self.processor.convert(&body);
        let excerpt = frontmatter
            .excerpt
            .clone()
            .unwrap_or_else(|| get_excerpt(&content_html, self.config.blog.excerpt_length));

        Ok(Post {
            slug: slug.to_string(),
            title,
            date,
            author,
            excerpt,
            content_html,
        })
    }
}

/// `*.qmd` files directly inside `dir`, in reverse filename order
pub fn discover_notebooks(dir: &Path) -> Result<Vec<PathBuf>, std::io::Error> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "qmd"))
        .map(|e| e.into_path())
        .collect();
    files.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
    Ok(files)
}

/// Post date as `YYYY-MM-DD`
///
/// Missing or `\today` dates fall back to a date prefix in the slug, then to
/// `today`. Timestamps are cut down to their date.
pub fn resolve_post_date(raw: Option<&str>, slug: &str, today: NaiveDate) -> String {
    match raw {
        None | Some("\\today") => match date_prefix_regex().captures(slug) {
            Some(caps) => caps[1].to_string(),
            None => today.format("%Y-%m-%d").to_string(),
        },
        Some(value) => match date_prefix_regex().captures(value) {
            Some(caps) => caps[1].to_string(),
            None => value.split('T').next().unwrap_or_default().to_string(),
        },
    }
}

/// Drop the title, author and date lines Quarto repeats at the top of the body
///
/// A blank line directly after a dropped line is dropped as well.
pub fn clean_quarto_artifacts(body: &str, title: &str, author: &str) -> String {
    let title_line = format!("# {}", title);
    let author = author.trim();
    let mut author_lines = vec!["Invalid Date".to_string()];
    if !author.is_empty() {
        author_lines.push(author.to_string());
        author_lines.push(format!("{} Invalid Date", author));
    }

    let mut cleaned = Vec::new();
    let mut skip_next_blank = false;

    for line in body.split('\n') {
        let stripped = line.trim();

        let is_artifact = stripped == title_line
            || author_lines.iter().any(|a| a == stripped)
            || date_line_regex().is_match(stripped);
        if is_artifact {
            skip_next_blank = true;
            continue;
        }

        if skip_next_blank && stripped.is_empty() {
            skip_next_blank = false;
            continue;
        }

        skip_next_blank = false;
        cleaned.push(line);
    }

    cleaned.join("\n")
}

/// Point Quarto figure references at the shared `figures/` directory
pub fn fix_image_paths(body: &str, slug: &str, format: &str) -> String {
    body.replace(&format!("{}_files/figure-{}/", slug, format), "figures/")
}

/// Wrap 4-space-indented cell output in `<pre class="code-output">` blocks
///
/// Lines inside fenced code blocks are left alone. Consecutive output lines
/// share one block; the indent is removed and the text HTML-escaped.
pub fn format_code_output(body: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    let mut output_buffer: Vec<String> = Vec::new();
    let mut in_code_block = false;

    fn flush(result: &mut Vec<String>, buffer: &mut Vec<String>) {
        if !buffer.is_empty() {
            result.push(format!(
                "<pre class=\"code-output\">{}</pre>",
                buffer.join("\n")
            ));
            buffer.clear();
        }
    }

    for line in body.split('\n') {
        if line.trim().starts_with("```") {
            flush(&mut result, &mut output_buffer);
            in_code_block = !in_code_block;
            result.push(line.to_string());
            continue;
        }

        match line.strip_prefix("    ") {
            Some(output) if !in_code_block => output_buffer.push(html_escape(output)),
            _ => {
                flush(&mut result, &mut output_buffer);
                result.push(line.to_string());
            }
        }
    }

    flush(&mut result, &mut output_buffer);
    result.join("\n")
}

/// Copy `<slug>_files/figure-<format>/*` into `<blog_output>/figures/`
pub fn copy_figures(
    posts_dir: &Path,
    blog_output: &Path,
    slug: &str,
    format: &str,
) -> Result<usize, std::io::Error> {
    let figures_src = posts_dir
        .join(format!("{}_files", slug))
        .join(format!("figure-{}", format));
    if !figures_src.is_dir() {
        return Ok(0);
    }

    let figures_dest = blog_output.join("figures");
    fs::create_dir_all(&figures_dest)?;

    let mut copied = 0;
    for entry in WalkDir::new(&figures_src)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let name = entry.file_name();
        fs::copy(entry.path(), figures_dest.join(name))?;
        tracing::debug!("Copied figure: {:?}", name);
        copied += 1;
    }
    Ok(copied)
}

/// Remove the rendered Markdown and figure directory for one post
pub fn cleanup_intermediate_files(
    posts_dir: &Path,
    slug: &str,
    format: &str,
) -> Result<(), std::io::Error> {
    for name in [format!("{}.md", slug), format!("{}-{}.md", slug, format)] {
        let path = posts_dir.join(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
    }

    let fig_dir = posts_dir.join(format!("{}_files", slug));
    if fig_dir.exists() {
        fs::remove_dir_all(fig_dir)?;
    }
    Ok(())
}

/// Remove Quarto's cache directories from the posts directory
pub fn cleanup_quarto_cache(posts_dir: &Path, cache_dirs: &[String]) -> Result<(), std::io::Error> {
    for cache_dir in cache_dirs {
        let path = posts_dir.join(cache_dir);
        if path.exists() {
            fs::remove_dir_all(&path)?;
            tracing::info!("Removed cache: {}/", cache_dir);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn test_clean_quarto_artifacts() {
        let body = "# My Post\n\nJohn McLevey\n\n2024-01-05\n\nFirst paragraph.\n\nSecond.";
        let cleaned = clean_quarto_artifacts(body, "My Post", "John McLevey");
        assert_eq!(cleaned, "First paragraph.\n\nSecond.");
    }

    #[test]
    fn test_clean_quarto_artifacts_invalid_date() {
        let body = "Jane Roe Invalid Date\n\nText\nInvalid Date\nMore";
        let cleaned = clean_quarto_artifacts(body, "Other", "Jane Roe");
        assert_eq!(cleaned, "Text\nMore");
    }

    #[test]
    fn test_clean_with_empty_author_keeps_blank_lines() {
        let body = "First paragraph.\n\nSecond paragraph.\n\n- item";
        assert_eq!(clean_quarto_artifacts(body, "Title", ""), body);
        assert_eq!(clean_quarto_artifacts(body, "Title", "  "), body);
    }

    #[test]
    fn test_clean_only_skips_one_blank_line() {
        let body = "# T\n\n\nText";
        assert_eq!(clean_quarto_artifacts(body, "T", "A"), "\nText");
    }

    #[test]
    fn test_fix_image_paths() {
        let body = "![plot](my-post_files/figure-gfm/cell-3-output-1.png)";
        assert_eq!(
            fix_image_paths(body, "my-post", "gfm"),
            "![plot](figures/cell-3-output-1.png)"
        );
    }

    #[test]
    fn test_format_code_output_wraps_indented_runs() {
        let body = "Text\n\n``` python\nx = 1\n    inside fence\n```\n\n    1\n    <class 'int'>\n\nAfter";
        let formatted = format_code_output(body);
        assert_eq!(
            formatted,
            "Text\n\n``` python\nx = 1\n    inside fence\n```\n\n<pre class=\"code-output\">1\n&lt;class &#39;int&#39;&gt;</pre>\n\nAfter"
        );
    }

    #[test]
    fn test_format_code_output_flushes_at_end() {
        assert_eq!(
            format_code_output("    tail"),
            "<pre class=\"code-output\">tail</pre>"
        );
    }

    #[test]
    fn test_resolve_post_date() {
        assert_eq!(resolve_post_date(Some("2024-02-03"), "x", today()), "2024-02-03");
        assert_eq!(
            resolve_post_date(Some("2024-02-03T10:00:00-05:00"), "x", today()),
            "2024-02-03"
        );
        assert_eq!(
            resolve_post_date(Some("2024-02-03 10:00"), "x", today()),
            "2024-02-03"
        );
        assert_eq!(
            resolve_post_date(None, "2023-11-20-networks", today()),
            "2023-11-20"
        );
        assert_eq!(
            resolve_post_date(Some("\\today"), "networks", today()),
            "2025-06-30"
        );
        assert_eq!(resolve_post_date(Some("Spring 2024"), "x", today()), "Spring 2024");
    }

    #[test]
    fn test_discover_notebooks_reverse_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["2023-01-01-a.qmd", "2024-01-01-b.qmd", "notes.md"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let found = discover_notebooks(dir.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["2024-01-01-b.qmd", "2023-01-01-a.qmd"]);

        assert!(discover_notebooks(&dir.path().join("missing")).unwrap().is_empty());
    }

    #[test]
    fn test_copy_and_cleanup_figures() {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("posts");
        let figs = posts.join("p_files/figure-gfm");
        fs::create_dir_all(&figs).unwrap();
        fs::write(figs.join("fig-1.png"), b"png").unwrap();
        fs::write(posts.join("p.md"), "x").unwrap();
        fs::create_dir_all(posts.join(".quarto")).unwrap();

        let out = dir.path().join("docs/blog");
        assert_eq!(copy_figures(&posts, &out, "p", "gfm").unwrap(), 1);
        assert!(out.join("figures/fig-1.png").exists());

        cleanup_intermediate_files(&posts, "p", "gfm").unwrap();
        assert!(!posts.join("p.md").exists());
        assert!(!posts.join("p_files").exists());

        cleanup_quarto_cache(&posts, &[".quarto".to_string()]).unwrap();
        assert!(!posts.join(".quarto").exists());
    }

    /// Copies `<stem>.qmd` to `<stem>.md`, failing for stems listed in `fail`
    struct CopyRenderer {
        fail: Vec<String>,
        calls: RefCell<Vec<String>>,
    }

    impl NotebookRenderer for CopyRenderer {
        fn render(&self, source: &Path, _workdir: &Path) -> Result<PathBuf, QuartoError> {
            let stem = source.file_stem().unwrap().to_str().unwrap().to_string();
            self.calls.borrow_mut().push(stem.clone());
            if self.fail.contains(&stem) {
                return Err(QuartoError::MissingOutput(source.with_extension("md")));
            }
            let target = source.with_extension("md");
            fs::copy(source, &target)?;
            Ok(target)
        }

        fn format(&self) -> &str {
            "gfm"
        }
    }

    #[test]
    fn test_build_renders_sorts_and_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("scholar.yml");
        fs::write(&config_path, "").unwrap();
        let config = Config::from_file(&config_path).unwrap();

        let posts = config.posts_dir();
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("2024-05-01-later.qmd"),
            "---\ntitle: Later Post\n---\n# Later Post\n\nJohn McLevey\n\nBody text here.\n",
        )
        .unwrap();
        fs::write(
            posts.join("older.qmd"),
            "---\ndate: 2025-01-02\nexcerpt: Custom excerpt\n---\nOlder body.\n",
        )
        .unwrap();
        fs::write(posts.join("broken.qmd"), "---\n---\n").unwrap();

        let renderer = CopyRenderer {
            fail: vec!["broken".to_string()],
            calls: RefCell::new(Vec::new()),
        };
        let builder = BlogBuilder::new(config, renderer).with_today(today());
        let built = builder.build().unwrap();

        assert_eq!(
            *builder.renderer.calls.borrow(),
            vec!["older", "broken", "2024-05-01-later"]
        );
        assert_eq!(built.len(), 2);

        assert_eq!(built[0].slug, "older");
        assert_eq!(built[0].title, "Older");
        assert_eq!(built[0].date, "2025-01-02");
        assert_eq!(built[0].excerpt, "Custom excerpt");

        assert_eq!(built[1].title, "Later Post");
        assert_eq!(built[1].date, "2024-05-01");
        assert_eq!(built[1].author, "John McLevey");
        assert_eq!(built[1].content_html.trim(), "<p>Body text here.</p>");
        assert_eq!(built[1].excerpt, "Body text here.");

        // intermediates removed, sources kept
        assert!(!posts.join("older.md").exists());
        assert!(posts.join("older.qmd").exists());
    }
}
