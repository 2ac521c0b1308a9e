use std::path::Path;
use std::path::PathBuf;

use crate::GenerateOptions;
use crate::Generator;
use crate::Language;
use crate::LidoResult;
use crate::highlight::HIGHLIGHT_END;
use crate::highlight::HIGHLIGHT_START;
use crate::highlight::Highlighter;
use crate::languages::by_extension;
use crate::render::MarkdownRenderer;

pub fn python() -> &'static Language {
	by_extension(".py").expect("python is registered")
}

pub fn c_lang() -> &'static Language {
	by_extension(".c").expect("c is registered")
}

pub fn lua() -> &'static Language {
	by_extension(".lua").expect("lua is registered")
}

/// Escapes the source and wraps it, echoing dividers verbatim.
#[derive(Debug, Default)]
pub struct PlainHighlighter {
	pub guess: Option<String>,
}

impl PlainHighlighter {
	pub fn guessing(name: &str) -> Self {
		Self {
			guess: Some(name.to_string()),
		}
	}
}

impl Highlighter for PlainHighlighter {
	fn highlight(&self, source: &str, _language_name: &str) -> LidoResult<String> {
		let escaped = source
			.replace('&', "&amp;")
			.replace('<', "&lt;")
			.replace('>', "&gt;");
		Ok(format!("{HIGHLIGHT_START}{escaped}{HIGHLIGHT_END}"))
	}

	fn guess_language(&self, _source: &str) -> Option<String> {
		self.guess.clone()
	}
}

/// Mimics a highlighter that wraps comments in classed spans, the way
/// pygments style highlighters do.
#[derive(Debug, Default)]
pub struct ClassedHighlighter;

impl Highlighter for ClassedHighlighter {
	fn highlight(&self, source: &str, _language_name: &str) -> LidoResult<String> {
		let lines: Vec<String> = source
			.split('\n')
			.map(|line| {
				if line.starts_with('#') {
					format!("<span class=\"c1\">{line}</span>")
				} else {
					format!("<span class=\"n\">{line}</span>")
				}
			})
			.collect();
		Ok(format!("{HIGHLIGHT_START}{}{HIGHLIGHT_END}", lines.join("\n")))
	}

	fn guess_language(&self, _source: &str) -> Option<String> {
		None
	}
}

/// Drops everything it is given.
#[derive(Debug, Default)]
pub struct SwallowingHighlighter;

impl Highlighter for SwallowingHighlighter {
	fn highlight(&self, _source: &str, _language_name: &str) -> LidoResult<String> {
		Ok(format!("{HIGHLIGHT_START}nothing{HIGHLIGHT_END}"))
	}

	fn guess_language(&self, _source: &str) -> Option<String> {
		None
	}
}

pub fn plain_generator(outdir: &Path, preserve_paths: bool) -> LidoResult<Generator> {
	Generator::with_collaborators(
		GenerateOptions {
			outdir: outdir.to_path_buf(),
			preserve_paths,
			language: None,
		},
		Box::new(PlainHighlighter::default()),
		Box::new(MarkdownRenderer),
	)
}

pub fn docs_dir() -> PathBuf {
	PathBuf::from("docs")
}

/// The code lines of `source`, in order, skipping blank lines and lines that
/// are comments.
pub fn code_lines<'a>(source: &'a str, language: &Language) -> Vec<&'a str> {
	source
		.split('\n')
		.filter(|line| !line.trim().is_empty() && !language.is_comment(line))
		.collect()
}
