use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use lido_cli::Commands;
use lido_cli::LidoCli;
use lido_cli::OutputFormat;
use lido_cli::WatchedSources;
use lido_core::AnyEmptyResult;
use lido_core::GenerateOptions;
use lido_core::Generator;
use lido_core::LidoConfig;
use lido_core::ProcessReport;
use lido_core::languages::BlockMarkers;
use lido_core::languages::languages;
use lido_core::project::collect_sources;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "LIDO_LOG";

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = LidoCli::parse();

	// Color only on a capable terminal, unless NO_COLOR or --no-color opt out.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Build { sources, watch }) => run_build(&args, sources, *watch),
		Some(Commands::Languages { format }) => run_languages(*format),
		None => {
			eprintln!("No subcommand specified. Run `lido --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<lido_core::LidoError>() {
			Ok(lido_err) => {
				let report: miette::Report = (*lido_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Send logs to stderr, filtered by `LIDO_LOG` when it is set.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn resolve_root(args: &LidoCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// `path` relative to `root` when it lies inside it, else unchanged.
fn within_root(path: &Path, root: &Path) -> PathBuf {
	match path.strip_prefix(root) {
		Ok(relative) if relative.as_os_str().is_empty() => PathBuf::from("."),
		Ok(relative) => relative.to_path_buf(),
		Err(_) => path.to_path_buf(),
	}
}

fn run_init(args: &LidoCli) -> AnyEmptyResult {
	let root = resolve_root(args);

	if let Some(existing) = LidoConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join("lido.toml");
	let sample_config = "# lido configuration\n\n# Force a language for every source instead of \
	                     detecting it from the file extension.\n# language = \"python\"\n\n[output]\n# \
	                     Directory the pages are written to, relative to this file.\ndirectory = \
	                     \"docs\"\n# Mirror the source directory structure inside the output \
	                     directory.\npreserve_paths = false\n\n[sources]\n# Glob patterns of the \
	                     files `lido build` documents when no sources are given.\n# patterns = \
	                     [\"src/**/*.py\"]\n# Gitignore-style patterns to skip.\n# exclude = \
	                     []\n\n[highlight]\n# Any theme bundled with syntect.\ntheme = \
	                     \"InspiredGitHub\"\n";

	std::fs::write(&config_path, sample_config)?;
	println!("Created {}", colored!("lido.toml", green));
	println!();
	println!("Next steps:");
	println!("  1. Edit lido.toml to choose your sources and output directory");
	println!("  2. Add comments to your code; they are rendered as markdown");
	println!("  3. Run `lido build` to generate the pages");

	Ok(())
}

/// Build the generator options, letting command line flags win over the
/// config file.
fn generate_options(args: &LidoCli, outdir: PathBuf, config: &LidoConfig) -> GenerateOptions {
	GenerateOptions {
		outdir,
		preserve_paths: args.preserve_paths || config.output.preserve_paths,
		language: args
			.force_language
			.clone()
			.or_else(|| config.language.clone()),
	}
}

fn run_build(args: &LidoCli, sources: &[PathBuf], watch: bool) -> AnyEmptyResult {
	let root = std::path::absolute(resolve_root(args))?;
	let config = LidoConfig::load(&root)?.unwrap_or_default();

	// Flags are relative to the invocation directory, config values to the
	// project root.
	let outdir = match &args.directory {
		Some(directory) => std::path::absolute(directory)?,
		None => config.output_directory(&root),
	};
	let mut sources = sources
		.iter()
		.map(std::path::absolute)
		.collect::<std::io::Result<Vec<_>>>()?;
	if sources.is_empty() {
		sources = collect_sources(&root, &config.sources, &[outdir.clone()])?;
	}

	if sources.is_empty() {
		println!("No sources to document.");
		return Ok(());
	}

	// Pages are named and mirrored relative to the project root.
	std::env::set_current_dir(&root)?;
	let sources: Vec<PathBuf> = sources
		.iter()
		.map(|source| within_root(source, &root))
		.collect();
	let generator = Generator::new(
		generate_options(args, within_root(&outdir, &root), &config),
		&config.highlight.theme,
	)?;

	let report = generator.process(&sources)?;
	print_report(&report);

	if !watch {
		if !report.is_ok() {
			process::exit(1);
		}
		return Ok(());
	}

	watch_sources(&generator, &sources)
}

fn print_report(report: &ProcessReport) {
	for page in &report.written {
		println!(
			"lido = {} -> {}",
			page.source.display(),
			page.destination.display()
		);
	}

	for (source, error) in &report.failures {
		eprintln!("{} {}: {error}", colored!("error:", red), source.display());
	}

	if !report.failures.is_empty() {
		eprintln!(
			"\n{}",
			colored!(
				format!(
					"{} page(s) written, {} source(s) failed",
					report.written.len(),
					report.failures.len()
				),
				bold
			)
		);
	}
}

/// Regenerate the page of each source whenever the source changes. Events
/// come from the sources' parent directories, not the files themselves.
fn watch_sources(generator: &Generator, sources: &[PathBuf]) -> AnyEmptyResult {
	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let watched = WatchedSources::new(sources)?;

	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_) | notify::EventKind::Create(_)
				) {
					let _ = tx.send(event.paths);
				}
			}
		})?;

	use notify::Watcher;
	for directory in watched.directories() {
		watcher.watch(&directory, notify::RecursiveMode::NonRecursive)?;
	}

	loop {
		let mut changed: HashSet<PathBuf> = rx.recv()?.into_iter().collect();
		// Debounce: drain additional events within 200ms.
		while let Ok(paths) = rx.recv_timeout(Duration::from_millis(200)) {
			changed.extend(paths);
		}

		let stale = watched.stale(&changed);
		if stale.is_empty() {
			continue;
		}

		tracing::debug!(count = stale.len(), "sources changed");
		match generator.process(&stale) {
			Ok(report) => print_report(&report),
			Err(e) => eprintln!("{} {e}", colored!("error:", red)),
		}
	}
}

/// One row of `lido languages`.
#[derive(Serialize)]
struct LanguageEntry<'a> {
	extension: &'a str,
	name: &'a str,
	symbol: &'a str,
	block: Option<&'a BlockMarkers>,
}

fn run_languages(format: OutputFormat) -> AnyEmptyResult {
	let entries: Vec<LanguageEntry<'_>> = languages()
		.iter()
		.map(|language| {
			LanguageEntry {
				extension: language.extension,
				name: language.name,
				symbol: language.symbol,
				block: language.block.as_ref(),
			}
		})
		.collect();

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::to_string_pretty(&entries)?);
		}
		OutputFormat::Text => {
			println!(
				"{}",
				colored!(
					format!("{:<10} {:<15} {:<8} {}", "EXTENSION", "NAME", "COMMENT", "BLOCK"),
					bold
				)
			);
			for entry in &entries {
				let block = entry
					.block
					.map(|markers| format!("{} {}", markers.start, markers.end))
					.unwrap_or_default();
				println!(
					"{:<10} {:<15} {:<8} {block}",
					entry.extension, entry.name, entry.symbol
				);
			}
		}
	}

	Ok(())
}
