use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum LidoError {
	#[error(transparent)]
	#[diagnostic(code(lido::io_error))]
	Io(#[from] std::io::Error),

	#[error("can't figure out the language for `{name}`")]
	#[diagnostic(
		code(lido::unknown_language),
		help("run `lido languages` to list supported languages, or pass `--force-language`")
	)]
	UnknownLanguage { name: String },

	#[error("missing the required output directory")]
	#[diagnostic(
		code(lido::missing_output_directory),
		help("pass `--directory <dir>` or set `[output] directory` in lido.toml")
	)]
	MissingOutputDirectory,

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(lido::config_parse),
		help("check that lido.toml is valid TOML with [output], [sources] and/or [highlight] sections")
	)]
	ConfigParse(String),

	#[error("invalid source pattern `{pattern}`: {reason}")]
	#[diagnostic(code(lido::invalid_source_pattern))]
	InvalidSourcePattern { pattern: String, reason: String },

	#[error("failed to render markdown: {0}")]
	#[diagnostic(code(lido::markdown))]
	Markdown(String),

	#[error("syntax highlighting failed: {0}")]
	#[diagnostic(code(lido::highlight))]
	Highlight(String),

	#[error("unknown highlight theme: `{0}`")]
	#[diagnostic(
		code(lido::unknown_theme),
		help(
			"available themes: InspiredGitHub, Solarized (dark), Solarized (light), \
			 base16-eighties.dark, base16-mocha.dark, base16-ocean.dark, base16-ocean.light"
		)
	)]
	UnknownTheme(String),

	#[error("template rendering failed: {0}")]
	#[diagnostic(code(lido::template_render))]
	TemplateRender(String),
}

pub type LidoResult<T> = Result<T, LidoError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
