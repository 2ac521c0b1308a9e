//! `lido_core` is the core library for [lido](https://github.com/ifiokjr/lido), a literate-programming documentation generator. It turns annotated source files into pages that show each comment block next to the code it describes, with comments rendered as markdown and code syntax highlighted.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source file
//!   → Language registry (extension, forced name, or content guess → descriptor)
//!   → Segmenter (line-by-line state machine → ordered comment/code sections)
//!   → Reconciler (one highlighter call for the whole file, split back per section)
//!   → Cross-reference resolver (`== headings ==` and `[[file#anchor]]` links)
//!   → Prose renderer (markdown → HTML)
//!   → Page renderer (minijinja template → final page)
//! ```
//!
//! ## Modules
//!
//! - [`languages`]: The registry of supported languages and their comment markers.
//! - [`segmenter`]: Splits source text into comment/code sections.
//! - [`highlight`]: The highlighter seam, its syntect implementation, and section reconciliation.
//! - [`crossref`]: Rewrites section headings and cross-file references in comments.
//! - [`paths`]: Destination path computation for generated pages.
//! - [`render`]: Markdown prose rendering and page templating.
//! - [`config`]: Configuration loading from `lido.toml`.
//! - [`project`]: Source discovery under a project root.
//!
//! ## Key Types
//!
//! - [`Language`]: A language descriptor with its derived matchers.
//! - [`Section`]: One comment block paired with the code that follows it.
//! - [`Generator`]: Runs the whole pipeline for one or many files.
//! - [`LidoConfig`]: Configuration loaded from `lido.toml`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lido_core::GenerateOptions;
//! use lido_core::Generator;
//! use lido_core::highlight::DEFAULT_THEME;
//! use std::path::PathBuf;
//!
//! let options = GenerateOptions {
//!     outdir: PathBuf::from("docs"),
//!     ..GenerateOptions::default()
//! };
//! let generator = Generator::new(options, DEFAULT_THEME).unwrap();
//! let report = generator.process(&[PathBuf::from("src/main.py")]).unwrap();
//!
//! for page in &report.written {
//!     println!("{} -> {}", page.source.display(), page.destination.display());
//! }
//! ```

pub use config::*;
pub use document::*;
pub use error::*;
pub use languages::Language;
pub use segmenter::Section;
pub use segmenter::segment;

pub mod config;
pub mod crossref;
mod document;
#[allow(unused_assignments)]
mod error;
pub mod highlight;
pub mod languages;
pub mod paths;
pub mod project;
pub mod render;
pub mod segmenter;

#[cfg(test)]
mod __fixtures;
