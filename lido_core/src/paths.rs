use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::LidoError;
use crate::LidoResult;

/// Compute where the page for `source` is written.
///
/// `lib/example.py` becomes `docs/example.html`, or `docs/lib/example.html`
/// when `preserve_paths` is set. Only the normal components of the source's
/// directory are kept, so absolute paths and `..` can never lead outside
/// `outdir`.
pub fn destination(source: &Path, preserve_paths: bool, outdir: &Path) -> LidoResult<PathBuf> {
	if outdir.as_os_str().is_empty() {
		return Err(LidoError::MissingOutputDirectory);
	}

	let file_name = source
		.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_default();
	let stem = match file_name.rfind('.') {
		Some(dot) => &file_name[..dot],
		None => file_name.as_str(),
	};

	let mut dest = outdir.to_path_buf();
	if preserve_paths {
		if let Some(parent) = source.parent() {
			for component in parent.components() {
				if let Component::Normal(part) = component {
					dest.push(part);
				}
			}
		}
	}

	// A file name never holds a separator, so this is a single component.
	dest.push(format!("{stem}.html"));

	Ok(dest)
}

/// Remove ASCII and C1 control characters from a directory name.
pub fn sanitize_directory(directory: &Path) -> PathBuf {
	let cleaned: String = directory
		.to_string_lossy()
		.chars()
		.filter(|ch| !matches!(u32::from(*ch), 0..=31 | 127..=159))
		.collect();

	PathBuf::from(cleaned)
}

/// Express `target` relative to the directory `from`. Both paths are taken
/// as they are; nothing is resolved against the file system.
pub fn relative_path(target: &Path, from: &Path) -> PathBuf {
	let target: Vec<Component<'_>> = target
		.components()
		.filter(|c| !matches!(c, Component::CurDir))
		.collect();
	let from: Vec<Component<'_>> = from
		.components()
		.filter(|c| !matches!(c, Component::CurDir))
		.collect();

	let shared = target
		.iter()
		.zip(from.iter())
		.take_while(|(a, b)| a == b)
		.count();

	let mut relative = PathBuf::new();
	for _ in shared..from.len() {
		relative.push("..");
	}
	for component in &target[shared..] {
		relative.push(component.as_os_str());
	}

	relative
}
