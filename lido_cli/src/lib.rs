use std::collections::BTreeSet;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate side-by-side documentation from annotated source files.",
	long_about = "lido is a literate-programming documentation generator. It reads source files, \
	              splits them into comment blocks and the code that follows them, renders the \
	              comments as markdown and highlights the code, producing one HTML page per \
	              source with prose and code side by side.\n\nQuick start:\n  lido init       \
	              Create a lido.toml\n  lido build      Document the configured sources\n  lido \
	              languages  List the supported languages"
)]
pub struct LidoCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Directory the pages are written to. Overrides `[output] directory`.
	#[arg(long, short, global = true)]
	pub directory: Option<PathBuf>,

	/// Mirror the sources' directory structure inside the output directory.
	#[arg(long, short = 'P', global = true, default_value_t = false)]
	pub preserve_paths: bool,

	/// Treat every source as this language instead of detecting it.
	#[arg(long, short = 'l', global = true)]
	pub force_language: Option<String>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize lido in a project by creating a sample `lido.toml`.
	///
	/// If a config file already exists, this command is a no-op and exits
	/// successfully.
	Init,
	/// Generate a documentation page for every source.
	///
	/// Sources given on the command line are documented as they are.
	/// Without any, the project is scanned using the `[sources]` settings of
	/// `lido.toml`. A file that cannot be documented is reported and skipped;
	/// the command then exits with status 1 once the rest are written.
	Build {
		/// Source files to document.
		sources: Vec<PathBuf>,

		/// Watch the sources and regenerate a page whenever its source
		/// changes.
		#[arg(long, short, default_value_t = false)]
		watch: bool,
	},
	/// List the supported languages.
	Languages {
		/// Output format. Use `text` for a table or `json` for programmatic
		/// consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

/// Sources under `build --watch`, matched against file system events by
/// their absolute path.
#[derive(Debug, Clone)]
pub struct WatchedSources {
	/// `(absolute, as given)` pairs, in the order the sources were given.
	sources: Vec<(PathBuf, PathBuf)>,
}

impl WatchedSources {
	/// Resolve `sources` against the current directory.
	pub fn new(sources: &[PathBuf]) -> std::io::Result<Self> {
		let sources = sources
			.iter()
			.map(|source| std::path::absolute(source).map(|absolute| (absolute, source.clone())))
			.collect::<std::io::Result<_>>()?;

		Ok(Self { sources })
	}

	/// The distinct parent directories of the sources.
	pub fn directories(&self) -> BTreeSet<PathBuf> {
		self.sources
			.iter()
			.filter_map(|(absolute, _)| absolute.parent().map(Path::to_path_buf))
			.collect()
	}

	/// The sources, as they were given, whose files appear in `changed`.
	pub fn stale(&self, changed: &HashSet<PathBuf>) -> Vec<PathBuf> {
		self.sources
			.iter()
			.filter(|(absolute, _)| changed.contains(absolute))
			.map(|(_, source)| source.clone())
			.collect()
	}
}
