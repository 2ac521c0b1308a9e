use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::LidoError;
use crate::LidoResult;
use crate::highlight::DEFAULT_THEME;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["lido.toml", ".lido.toml", ".config/lido.toml"];

/// Output directory used when neither the command line nor the config names
/// one.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "docs";

/// Configuration loaded from a `lido.toml` file.
///
/// ```toml
/// language = "python"
///
/// [output]
/// directory = "site"
/// preserve_paths = true
///
/// [sources]
/// patterns = ["src/**/*.py"]
/// exclude = ["src/generated/"]
/// disable_gitignore = false
///
/// [highlight]
/// theme = "Solarized (light)"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct LidoConfig {
	/// Force this language for every source instead of detecting it.
	#[serde(default)]
	pub language: Option<String>,
	/// Where and how pages are written.
	#[serde(default)]
	pub output: OutputConfig,
	/// Which files to document when no sources are passed explicitly.
	#[serde(default)]
	pub sources: SourcesConfig,
	/// Syntax highlighting settings.
	#[serde(default)]
	pub highlight: HighlightConfig,
}

/// Output settings.
#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
	/// Directory the pages are written to, relative to the project root.
	#[serde(default)]
	pub directory: Option<PathBuf>,
	/// Keep the source directory structure under the output directory.
	#[serde(default)]
	pub preserve_paths: bool,
}

/// Source discovery settings.
#[derive(Debug, Default, Deserialize)]
pub struct SourcesConfig {
	/// Glob patterns, relative to the project root. When empty, every file
	/// with a registered extension is documented.
	#[serde(default)]
	pub patterns: Vec<String>,
	/// Gitignore-style patterns for files and directories to skip.
	#[serde(default)]
	pub exclude: Vec<String>,
	/// When true, `.gitignore` is not consulted.
	#[serde(default)]
	pub disable_gitignore: bool,
}

/// Highlighting settings.
#[derive(Debug, Deserialize)]
pub struct HighlightConfig {
	/// Name of a bundled syntect theme.
	#[serde(default = "default_theme")]
	pub theme: String,
}

impl Default for HighlightConfig {
	fn default() -> Self {
		Self {
			theme: default_theme(),
		}
	}
}

fn default_theme() -> String {
	DEFAULT_THEME.to_string()
}

impl LidoConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is no config file.
	pub fn load(root: &Path) -> LidoResult<Option<LidoConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: LidoConfig =
			toml::from_str(&content).map_err(|e| LidoError::ConfigParse(e.to_string()))?;

		tracing::debug!(path = %config_path.display(), "loaded config");
		Ok(Some(config))
	}

	/// The configured output directory, resolved against `root`.
	pub fn output_directory(&self, root: &Path) -> PathBuf {
		let directory = self
			.output
			.directory
			.clone()
			.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIRECTORY));
		root.join(directory)
	}
}
