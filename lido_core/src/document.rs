use std::path::Path;
use std::path::PathBuf;

use crate::LidoError;
use crate::LidoResult;
use crate::crossref::resolve_references;
use crate::highlight::Highlighter;
use crate::highlight::SyntectHighlighter;
use crate::highlight::reconcile;
use crate::languages::resolve_language;
use crate::paths::destination;
use crate::paths::relative_path;
use crate::paths::sanitize_directory;
use crate::render::MarkdownRenderer;
use crate::render::PageRenderer;
use crate::render::ProseRenderer;
use crate::render::RenderedSection;
use crate::render::STYLESHEET;
use crate::render::STYLESHEET_NAME;
use crate::segmenter::segment;

/// Options shared by every file of a run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
	/// Directory the pages are written to. Must not be empty.
	pub outdir: PathBuf,
	/// Mirror the sources' directory structure under `outdir`.
	pub preserve_paths: bool,
	/// Force this language for every source.
	pub language: Option<String>,
}

/// A page that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPage {
	pub source: PathBuf,
	pub destination: PathBuf,
}

/// Outcome of documenting a batch of sources. A failing file never stops the
/// others from being written.
#[derive(Debug, Default)]
pub struct ProcessReport {
	pub written: Vec<WrittenPage>,
	pub failures: Vec<(PathBuf, LidoError)>,
}

impl ProcessReport {
	/// Returns true if every source was documented.
	pub fn is_ok(&self) -> bool {
		self.failures.is_empty()
	}
}

/// Turns source files into documentation pages.
pub struct Generator {
	options: GenerateOptions,
	highlighter: Box<dyn Highlighter>,
	prose: Box<dyn ProseRenderer>,
	pages: PageRenderer,
}

impl Generator {
	/// A generator using syntect with the given theme and markdown prose.
	pub fn new(options: GenerateOptions, theme: &str) -> LidoResult<Self> {
		Self::with_collaborators(
			options,
			Box::new(SyntectHighlighter::new(theme)?),
			Box::new(MarkdownRenderer),
		)
	}

	/// A generator using the given highlighter and prose renderer.
	pub fn with_collaborators(
		options: GenerateOptions,
		highlighter: Box<dyn Highlighter>,
		prose: Box<dyn ProseRenderer>,
	) -> LidoResult<Self> {
		if options.outdir.as_os_str().is_empty() {
			return Err(LidoError::MissingOutputDirectory);
		}

		let options = GenerateOptions {
			outdir: sanitize_directory(&options.outdir),
			..options
		};

		Ok(Self {
			options,
			highlighter,
			prose,
			pages: PageRenderer::new()?,
		})
	}

	pub fn options(&self) -> &GenerateOptions {
		&self.options
	}

	/// Render the page for `path` from already loaded `code`. Nothing is read
	/// or written.
	pub fn render_source(&self, path: &Path, code: &str) -> LidoResult<String> {
		let GenerateOptions {
			outdir,
			preserve_paths,
			language,
		} = &self.options;

		let language = resolve_language(path, code, language.as_deref(), self.highlighter.as_ref())?;
		tracing::debug!(source = %path.display(), language = language.name, "resolved language");

		let sections = segment(code, language);
		let highlighted = reconcile(sections, language, self.highlighter.as_ref())?;

		let sections = highlighted
			.into_iter()
			.map(|section| {
				let docs = resolve_references(&section.docs_text, *preserve_paths, outdir)?;
				Ok(RenderedSection {
					num: section.num,
					docs_html: self.prose.render(&docs)?,
					code_html: section.code_html,
				})
			})
			.collect::<LidoResult<Vec<_>>>()?;

		let dest = destination(path, *preserve_paths, outdir)?;
		let dest_dir = dest.parent().unwrap_or(outdir.as_path());
		let stylesheet = relative_path(&outdir.join(STYLESHEET_NAME), dest_dir);
		let title = path
			.file_name()
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_default();

		self.pages
			.render(&title, &stylesheet.to_string_lossy(), &sections)
	}

	/// Read `path` and render its page.
	pub fn generate(&self, path: &Path) -> LidoResult<String> {
		let code = std::fs::read_to_string(path)?;
		self.render_source(path, &code)
	}

	/// Document every source, writing the stylesheet and one page per file.
	pub fn process(&self, sources: &[PathBuf]) -> LidoResult<ProcessReport> {
		let mut report = ProcessReport::default();
		if sources.is_empty() {
			return Ok(report);
		}

		let mut sources = sources.to_vec();
		sources.sort();

		let outdir = &self.options.outdir;
		std::fs::create_dir_all(outdir)?;
		std::fs::write(outdir.join(STYLESHEET_NAME), STYLESHEET)?;

		for source in sources {
			match self.write_page(&source, outdir) {
				Ok(dest) => {
					tracing::info!(source = %source.display(), destination = %dest.display(), "wrote page");
					report.written.push(WrittenPage {
						source,
						destination: dest,
					});
				}
				Err(error) => {
					tracing::debug!(source = %source.display(), %error, "failed to document source");
					report.failures.push((source, error));
				}
			}
		}

		Ok(report)
	}

	fn write_page(&self, source: &Path, outdir: &Path) -> LidoResult<PathBuf> {
		let dest = destination(source, self.options.preserve_paths, outdir)?;
		if let Some(parent) = dest.parent() {
			std::fs::create_dir_all(parent)?;
		}

		let html = self.generate(source)?;
		std::fs::write(&dest, html)?;
		Ok(dest)
	}
}
