use markdown::CompileOptions;
use markdown::Options;
use markdown::ParseOptions;
use minijinja::Environment;
use minijinja::context;
use serde::Serialize;

use crate::LidoError;
use crate::LidoResult;

/// The page template every document is rendered through.
pub const PAGE_TEMPLATE: &str = include_str!("../resources/page.html");

/// The stylesheet written next to the generated pages.
pub const STYLESHEET: &str = include_str!("../resources/lido.css");

/// File name of the stylesheet inside the output directory.
pub const STYLESHEET_NAME: &str = "lido.css";

const PAGE_TEMPLATE_NAME: &str = "page.html";

/// Renders comment prose to an HTML fragment.
pub trait ProseRenderer {
	fn render(&self, markup: &str) -> LidoResult<String>;
}

/// GitHub flavored markdown with raw HTML passed through, so the anchors
/// produced for section headings survive.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl ProseRenderer for MarkdownRenderer {
	fn render(&self, markup: &str) -> LidoResult<String> {
		let options = Options {
			parse: ParseOptions::gfm(),
			compile: CompileOptions {
				allow_dangerous_html: true,
				..CompileOptions::gfm()
			},
		};

		markdown::to_html_with_options(markup, &options)
			.map_err(|e| LidoError::Markdown(e.to_string()))
	}
}

/// A section ready to be placed on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
	pub num: usize,
	pub docs_html: String,
	pub code_html: String,
}

/// Composes full pages from rendered sections.
pub struct PageRenderer {
	env: Environment<'static>,
}

impl PageRenderer {
	pub fn new() -> LidoResult<Self> {
		let mut env = Environment::new();
		env.set_keep_trailing_newline(true);
		env.add_template(PAGE_TEMPLATE_NAME, PAGE_TEMPLATE)
			.map_err(|e| LidoError::TemplateRender(e.to_string()))?;

		Ok(Self { env })
	}

	/// Render a page. `stylesheet` is the link to the stylesheet relative to
	/// the page itself.
	pub fn render(
		&self,
		title: &str,
		stylesheet: &str,
		sections: &[RenderedSection],
	) -> LidoResult<String> {
		let template = self
			.env
			.get_template(PAGE_TEMPLATE_NAME)
			.map_err(|e| LidoError::TemplateRender(e.to_string()))?;

		template
			.render(context! { title, stylesheet, sections })
			.map_err(|e| LidoError::TemplateRender(e.to_string()))
	}
}
