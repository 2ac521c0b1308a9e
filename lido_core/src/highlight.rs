use serde::Serialize;
use syntect::easy::HighlightLines;
use syntect::highlighting::Theme;
use syntect::highlighting::ThemeSet;
use syntect::html::IncludeBackground;
use syntect::html::styled_line_to_highlighted_html;
use syntect::parsing::SyntaxReference;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::Language;
use crate::LidoError;
use crate::LidoResult;
use crate::Section;

/// Opening wrapper of every highlighted block.
pub const HIGHLIGHT_START: &str = "<div class=\"highlight\"><pre>";

/// Closing wrapper of every highlighted block.
pub const HIGHLIGHT_END: &str = "</pre></div>";

/// Default syntect theme.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Turns source text into colorized markup.
pub trait Highlighter {
	/// Highlight `source` as `language_name`. The output must be wrapped in
	/// [`HIGHLIGHT_START`] and [`HIGHLIGHT_END`], and must echo comment text
	/// (including divider tokens) in place.
	fn highlight(&self, source: &str, language_name: &str) -> LidoResult<String>;

	/// Best effort guess of the canonical language name of `source`.
	fn guess_language(&self, source: &str) -> Option<String>;
}

/// [`Highlighter`] backed by syntect's bundled grammars and themes.
///
/// Every line is rendered as a run of self-contained inline-styled spans,
/// while parse state carries across lines.
pub struct SyntectHighlighter {
	syntaxes: SyntaxSet,
	theme: Theme,
}

impl SyntectHighlighter {
	/// Load the bundled grammars and the named theme.
	pub fn new(theme: &str) -> LidoResult<Self> {
		let mut themes = ThemeSet::load_defaults();
		let theme = themes
			.themes
			.remove(theme)
			.ok_or_else(|| LidoError::UnknownTheme(theme.to_string()))?;

		Ok(Self {
			syntaxes: SyntaxSet::load_defaults_newlines(),
			theme,
		})
	}

	fn syntax_for(&self, language_name: &str) -> &SyntaxReference {
		if let Some(syntax) = self.syntaxes.find_syntax_by_token(language_name) {
			return syntax;
		}

		tracing::warn!(language = language_name, "no grammar found, highlighting as plain text");
		self.syntaxes.find_syntax_plain_text()
	}
}

impl Highlighter for SyntectHighlighter {
	fn highlight(&self, source: &str, language_name: &str) -> LidoResult<String> {
		let syntax = self.syntax_for(language_name);
		let mut lines = HighlightLines::new(syntax, &self.theme);
		let mut html = String::from(HIGHLIGHT_START);

		for line in LinesWithEndings::from(source) {
			let regions = lines
				.highlight_line(line, &self.syntaxes)
				.map_err(|e| LidoError::Highlight(e.to_string()))?;
			let rendered = styled_line_to_highlighted_html(&regions, IncludeBackground::No)
				.map_err(|e| LidoError::Highlight(e.to_string()))?;
			html.push_str(&rendered);
		}

		html.push_str(HIGHLIGHT_END);
		Ok(html)
	}

	fn guess_language(&self, source: &str) -> Option<String> {
		let first_line = source.lines().next()?;
		self.syntaxes
			.find_syntax_by_first_line(first_line)
			.map(|syntax| syntax.name.to_lowercase())
	}
}

/// A section after its code has been colorized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightedSection {
	/// Position of the section in the file.
	pub num: usize,
	pub docs_text: String,
	pub code_text: String,
	/// Colorized code, wrapped in [`HIGHLIGHT_START`] and [`HIGHLIGHT_END`].
	pub code_html: String,
}

/// Colorize the code of every section with a single highlighter call.
///
/// The sections' code is joined with the language's divider token so the
/// highlighter sees the whole file at once, then the markup is cut apart again
/// wherever the divider shows up. A highlighter that swallows dividers leaves
/// the trailing sections with empty code rather than failing.
pub fn reconcile(
	sections: Vec<Section>,
	language: &Language,
	highlighter: &dyn Highlighter,
) -> LidoResult<Vec<HighlightedSection>> {
	let joined = sections
		.iter()
		.map(|section| section.code_text.trim_end())
		.collect::<Vec<_>>()
		.join(&language.divider_text);

	let output = highlighter.highlight(&joined, language.name)?;
	let output = output.replace(HIGHLIGHT_START, "").replace(HIGHLIGHT_END, "");
	let mut fragments = language.divider_html.split(&output);

	tracing::debug!(
		language = language.name,
		sections = sections.len(),
		"reconciling highlighted output"
	);

	let highlighted = sections
		.into_iter()
		.enumerate()
		.map(|(num, section)| {
			let fragment = fragments.next().unwrap_or_default();
			HighlightedSection {
				num,
				docs_text: section.docs_text,
				code_text: section.code_text,
				code_html: format!("{HIGHLIGHT_START}{fragment}{HIGHLIGHT_END}"),
			}
		})
		.collect();

	Ok(highlighted)
}
