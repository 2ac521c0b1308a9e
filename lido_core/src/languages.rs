use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::LidoError;
use crate::LidoResult;
use crate::highlight::Highlighter;

/// Sentinel appended to a language's comment marker to build the divider
/// token handed to the highlighter between sections.
pub const DIVIDER_SENTINEL: &str = "DIVIDER";

/// Start and end markers of a block comment, e.g. `/*` and `*/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockMarkers {
	pub start: &'static str,
	pub end: &'static str,
}

/// Everything the segmenter and reconciler need to know about a language.
///
/// Descriptors are built once by [`Language::new`] when the registry is first
/// touched and are never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Language {
	/// File extension, including the leading dot.
	pub extension: &'static str,
	/// Canonical name, also used to ask the highlighter for a grammar.
	pub name: &'static str,
	/// Line comment marker.
	pub symbol: &'static str,
	/// Block comment markers, when the language has them.
	pub block: Option<BlockMarkers>,
	/// Matches a line that starts with the comment marker, plus one optional
	/// whitespace character after it.
	#[serde(skip)]
	pub comment_matcher: Regex,
	/// Text inserted between sections before highlighting.
	pub divider_text: String,
	/// Matches the divider token as echoed back inside highlighted markup.
	#[serde(skip)]
	pub divider_html: Regex,
}

impl Language {
	/// Build a descriptor and its derived matchers.
	pub fn new(
		extension: &'static str,
		name: &'static str,
		symbol: &'static str,
		block: Option<(&'static str, &'static str)>,
	) -> Self {
		let escaped = regex::escape(symbol);
		let comment_matcher = Regex::new(&format!(r"^\s*{escaped}\s?"))
			.expect("escaped comment marker is always a valid pattern");
		let divider_html = Regex::new(&divider_pattern(symbol))
			.expect("escaped divider token is always a valid pattern");

		Self {
			extension,
			name,
			symbol,
			block: block.map(|(start, end)| BlockMarkers { start, end }),
			comment_matcher,
			divider_text: format!("\n{symbol}{DIVIDER_SENTINEL}\n"),
			divider_html,
		}
	}

	/// True when `line` starts with this language's line comment marker.
	pub fn is_comment(&self, line: &str) -> bool {
		self.comment_matcher.is_match(line)
	}

	/// Remove the line comment marker (and one following space) from `line`.
	pub fn strip_comment<'a>(&self, line: &'a str) -> &'a str {
		match self.comment_matcher.find(line) {
			Some(found) => &line[found.end()..],
			None => line,
		}
	}
}

/// Build a pattern matching `symbol` + [`DIVIDER_SENTINEL`] as a highlighter
/// renders it. Highlighters are free to split the token into several styled
/// runs, so any `<span ...>` or `</span>` tag is tolerated between characters.
/// Only opening tags may precede the token, which keeps the closing tag of
/// the previous line inside the previous fragment.
fn divider_pattern(symbol: &str) -> String {
	const OPENING: &str = r"(?:<span[^>]*>)*";
	const TAGS: &str = r"(?:</?span[^>]*>)*";

	let token: Vec<String> = symbol
		.chars()
		.chain(DIVIDER_SENTINEL.chars())
		.map(|ch| regex::escape(&ch.to_string()))
		.collect();

	format!(r"\n*{OPENING}{}(?:</span>|\n)*", token.join(TAGS))
}

static LANGUAGES: LazyLock<Vec<Language>> = LazyLock::new(|| {
	vec![
		Language::new(".coffee", "coffee-script", "#", Some(("###", "###"))),
		Language::new(".pl", "perl", "#", None),
		Language::new(".sql", "sql", "--", None),
		Language::new(".c", "c", "//", Some(("/*", "*/"))),
		Language::new(".cpp", "cpp", "//", None),
		Language::new(".js", "javascript", "//", Some(("/*", "*/"))),
		Language::new(".rb", "ruby", "#", Some(("=begin", "=end"))),
		Language::new(".py", "python", "#", Some((r#"""""#, r#"""""#))),
		Language::new(".scm", "scheme", ";;", Some(("#|", "|#"))),
		Language::new(".lua", "lua", "--", Some(("--[[", "--]]"))),
		Language::new(".erl", "erlang", "%%", None),
		Language::new(".tcl", "tcl", "#", None),
		Language::new(".hs", "haskell", "--", Some(("{-", "-}"))),
	]
});

/// Every registered language, in registration order.
pub fn languages() -> &'static [Language] {
	&LANGUAGES
}

/// Look up a language by its file extension (with the leading dot).
pub fn by_extension(extension: &str) -> Option<&'static Language> {
	languages().iter().find(|lang| lang.extension == extension)
}

/// Look up a language by its canonical name.
pub fn by_name(name: &str) -> Option<&'static Language> {
	languages().iter().find(|lang| lang.name == name)
}

/// The extension of a file name: everything from its last dot, provided at
/// least one character follows the dot.
pub fn extension_of(path: &Path) -> Option<String> {
	let file_name = path.file_name()?.to_string_lossy();
	let dot = file_name.rfind('.')?;
	let extension = &file_name[dot..];

	(extension.len() > 1).then(|| extension.to_string())
}

/// Decide which language `source` is written in.
///
/// A forced name wins over everything, even over a path that has no usable
/// file name. Otherwise the extension is tried, then the highlighter's
/// content based guess.
pub fn resolve_language(
	path: &Path,
	source: &str,
	forced: Option<&str>,
	highlighter: &dyn Highlighter,
) -> LidoResult<&'static Language> {
	if let Some(name) = forced {
		return by_name(name).ok_or_else(|| {
			LidoError::UnknownLanguage {
				name: name.to_string(),
			}
		});
	}

	if let Some(language) = extension_of(path).and_then(|ext| by_extension(&ext)) {
		return Ok(language);
	}

	highlighter
		.guess_language(source)
		.and_then(|guessed| by_name(&guessed))
		.ok_or_else(|| {
			LidoError::UnknownLanguage {
				name: path.display().to_string(),
			}
		})
}
