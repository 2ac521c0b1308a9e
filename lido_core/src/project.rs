use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::LidoError;
use crate::LidoResult;
use crate::config::SourcesConfig;
use crate::languages::by_extension;
use crate::languages::extension_of;

/// Matchers built once per walk.
struct SourceFilter<'a> {
	root: &'a Path,
	include: Option<GlobSet>,
	gitignore: Gitignore,
	exclude: Gitignore,
	skip_dirs: Vec<PathBuf>,
}

impl SourceFilter<'_> {
	fn is_skipped(&self, path: &Path, is_dir: bool) -> bool {
		if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
			if is_dir && is_ignored_directory_name(name) {
				return true;
			}
		}

		if is_dir && self.skip_dirs.iter().any(|dir| dir == path) {
			return true;
		}

		self.gitignore.matched(path, is_dir).is_ignore()
			|| self.exclude.matched(path, is_dir).is_ignore()
	}

	fn is_source(&self, path: &Path) -> bool {
		let registered = extension_of(path).is_some_and(|ext| by_extension(&ext).is_some());
		if !registered {
			return false;
		}

		match (&self.include, path.strip_prefix(self.root)) {
			(Some(include), Ok(relative)) => include.is_match(relative),
			(Some(_), Err(_)) => false,
			(None, _) => true,
		}
	}
}

/// Collect the files to document under `root`.
///
/// Hidden directories, `target`, `node_modules` and every directory in
/// `skip_dirs` (usually the output directory) are never entered. Files
/// ignored by `.gitignore` are skipped unless disabled, and `[sources]
/// exclude` patterns always apply. Only files with a registered extension
/// that match the include patterns (when any are configured) are returned,
/// sorted.
pub fn collect_sources(
	root: &Path,
	config: &SourcesConfig,
	skip_dirs: &[PathBuf],
) -> LidoResult<Vec<PathBuf>> {
	let filter = SourceFilter {
		root,
		include: build_glob_set(&config.patterns)?,
		gitignore: if config.disable_gitignore {
			Gitignore::empty()
		} else {
			build_gitignore(root)
		},
		exclude: build_exclude_matcher(root, &config.exclude)?,
		skip_dirs: skip_dirs.to_vec(),
	};

	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();
	walk_dir(root, &filter, &mut files, &mut visited_dirs)?;

	// Sort for deterministic ordering.
	files.sort();
	tracing::debug!(root = %root.display(), count = files.len(), "collected sources");
	Ok(files)
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn build_glob_set(patterns: &[String]) -> LidoResult<Option<GlobSet>> {
	if patterns.is_empty() {
		return Ok(None);
	}

	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| {
			LidoError::InvalidSourcePattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
		builder.add(glob);
	}

	builder.build().map(Some).map_err(|e| {
		LidoError::InvalidSourcePattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

fn build_exclude_matcher(root: &Path, patterns: &[String]) -> LidoResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			LidoError::InvalidSourcePattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;
	}
	builder.build().map_err(|e| {
		LidoError::InvalidSourcePattern {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})
}

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

fn walk_dir(
	dir: &Path,
	filter: &SourceFilter<'_>,
	files: &mut Vec<PathBuf>,
	visited_dirs: &mut HashSet<PathBuf>,
) -> LidoResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	// Symlinked directories may loop back on themselves.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Ok(());
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();
		let is_dir = path.is_dir();

		if filter.is_skipped(&path, is_dir) {
			continue;
		}

		if is_dir {
			walk_dir(&path, filter, files, visited_dirs)?;
		} else if filter.is_source(&path) {
			files.push(path);
		}
	}

	Ok(())
}
