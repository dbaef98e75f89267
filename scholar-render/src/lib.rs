//! # scholar-render
//!
//! Template rendering library for scholar.
//!
//! This crate handles HTML template rendering using Askama. Every page
//! extends `base.html`, which draws the header navigation, the theme toggle
//! and the footer from a shared [`Layout`].

pub mod templates;

pub use templates::{
    BlogIndexTemplate, BlogPostTemplate, BookTemplate, CourseTemplate, CvTemplate, IndexTemplate,
    Layout, NavLink, PageTemplate, PostEntry,
};
