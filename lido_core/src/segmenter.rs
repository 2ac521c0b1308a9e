use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::Language;

static CODING_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"coding[:=]\s*([-\w.]+)").expect("coding declaration pattern is valid")
});

/// Prefixes of code lines that open a new section, so declarations stay
/// anchored to the comments above them.
const DECLARATION_PREFIXES: &[&str] = &["class ", "def ", "@"];

/// One comment block paired with the code that follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Section {
	/// Comment text with markers stripped. Each line ends with `\n`.
	pub docs_text: String,
	/// Code text. Each line ends with `\n`, except for code that was closed by
	/// a block comment opening below it.
	pub code_text: String,
}

impl Section {
	pub fn new(docs_text: impl Into<String>, code_text: impl Into<String>) -> Self {
		Self {
			docs_text: docs_text.into(),
			code_text: code_text.into(),
		}
	}
}

/// Which lexical context the segmenter is in between lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
	/// Plain code or line comments.
	Code,
	/// Inside an unterminated block comment. `indent` is the whitespace that
	/// preceded the comment text on the opening line; continuation lines lose
	/// that much leading space.
	BlockComment { indent: String },
	/// Inside a multi-line string whose delimiters look like block comment
	/// markers. Its lines are code.
	StringLiteral,
}

/// How a line holding a block comment marker is treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelimiterRole {
	/// The markers delimit documentation; the line's text is comment.
	Comment,
	/// The markers delimit a string literal; the line is code.
	Code,
}

impl Mode {
	/// Transition taken on a line where a block comment marker opens or
	/// closes the line.
	///
	/// A marker that closes a line without opening it, or any marker seen
	/// while a string literal is open, is taken to delimit a string literal.
	/// Languages that reuse one token for both (`"""` in Python) cannot be
	/// told apart lexically, so this is a heuristic and can mis-segment
	/// unusual files.
	pub fn on_delimiter(&self, line: &str, start: &str, end: &str) -> (Self, DelimiterRole) {
		let trimmed = line.trim();
		let mut in_block = !matches!(self, Self::BlockComment { .. });

		if in_block && trimmed.ends_with(end) && trimmed.len() > end.len() {
			in_block = false;
		}

		if *self == Self::StringLiteral {
			return (Self::Code, DelimiterRole::Code);
		}

		if !trimmed.starts_with(start) && !in_block {
			return (Self::StringLiteral, DelimiterRole::Code);
		}

		let next = if in_block {
			Self::BlockComment {
				indent: leading_whitespace(&line.replace(start, "").replace(end, "")).to_string(),
			}
		} else {
			Self::Code
		};

		(next, DelimiterRole::Comment)
	}
}

fn leading_whitespace(line: &str) -> &str {
	let end = line.len() - line.trim_start().len();
	&line[..end]
}

/// Accumulator folded over the lines of one file.
struct SegmentState<'a> {
	language: &'a Language,
	mode: Mode,
	docs: String,
	code: String,
	sections: Vec<Section>,
}

impl<'a> SegmentState<'a> {
	fn new(language: &'a Language) -> Self {
		Self {
			language,
			mode: Mode::Code,
			docs: String::new(),
			code: String::new(),
			sections: Vec::new(),
		}
	}

	/// Close the current section. Empty pairs are dropped.
	fn save(&mut self, docs: String, code: String) {
		if !docs.is_empty() || !code.is_empty() {
			self.sections.push(Section {
				docs_text: docs,
				code_text: code,
			});
		}
	}

	fn flush(&mut self) {
		let docs = std::mem::take(&mut self.docs);
		let code = std::mem::take(&mut self.code);
		self.save(docs, code);
	}

	fn feed(mut self, line: &str) -> Self {
		if let Some(markers) = &self.language.block {
			if is_delimiter_line(line, markers.start, markers.end) {
				let (next, role) = self.mode.on_delimiter(line, markers.start, markers.end);
				self.mode = next;

				match role {
					DelimiterRole::Code => self.push_code(line),
					DelimiterRole::Comment => {
						let text = line.replace(markers.start, "").replace(markers.end, "");
						self.docs.push_str(text.trim());
						self.docs.push('\n');

						if !self.code.is_empty() && !self.docs.trim().is_empty() {
							let docs = std::mem::take(&mut self.docs);
							let mut code = std::mem::take(&mut self.code);
							// Keep whatever followed the last newline as the
							// start of the next block of code.
							if let Some(newline) = code.rfind('\n') {
								self.code = code.split_off(newline + 1);
								code.truncate(newline);
							}
							self.save(docs, code);
						}
					}
				}

				return self;
			}
		}

		if let Mode::BlockComment { indent } = &self.mode {
			let stripped = match line.strip_prefix(&" ".repeat(indent.len())) {
				Some(rest) => rest,
				None => line,
			};
			self.docs.push_str(stripped);
			self.docs.push('\n');
		} else if self.language.is_comment(line) {
			if !self.code.is_empty() {
				self.flush();
			}
			self.docs.push_str(self.language.strip_comment(line));
			self.docs.push('\n');
		} else {
			self.push_code(line);
		}

		self
	}

	fn push_code(&mut self, line: &str) {
		let opens_declaration = DECLARATION_PREFIXES
			.iter()
			.any(|prefix| line.trim_start().starts_with(prefix));

		if !self.code.is_empty() && opens_declaration && !self.code.trim_start().starts_with('@') {
			self.flush();
		}

		self.code.push_str(line);
		self.code.push('\n');
	}

	fn finish(mut self) -> Vec<Section> {
		self.flush();
		self.sections
	}
}

fn is_delimiter_line(line: &str, start: &str, end: &str) -> bool {
	let leading = line.trim_start();
	let trailing = line.trim_end();

	[start, end]
		.iter()
		.any(|marker| leading.starts_with(marker) || trailing.ends_with(marker))
}

/// Drop the lines that never belong in the output: a shebang, and for Python
/// a source encoding declaration in the first two lines.
fn preprocess<'a>(source: &'a str, language: &Language) -> Vec<&'a str> {
	let mut lines: Vec<&str> = source.split('\n').collect();

	if lines.first().is_some_and(|line| line.starts_with("#!")) {
		lines.remove(0);
	}

	if language.name == "python" {
		if let Some(index) = lines
			.iter()
			.take(2)
			.position(|line| CODING_DECLARATION.is_match(line))
		{
			lines.remove(index);
		}
	}

	lines
}

/// Split `source` into sections of comments and the code that follows them.
///
/// Unbalanced block comment markers never fail: the rest of the file simply
/// ends up in one trailing comment.
pub fn segment(source: &str, language: &Language) -> Vec<Section> {
	preprocess(source, language)
		.into_iter()
		.fold(SegmentState::new(language), SegmentState::feed)
		.finish()
}
