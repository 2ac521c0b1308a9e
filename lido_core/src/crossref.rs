use std::path::Path;
use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

use crate::LidoResult;
use crate::paths::destination;

/// `== Name ==` on a line of its own. The trailing run of `=` is optional.
static SECTION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?m)^(=+)([^=\n]+)=*[ \t\r]*$").expect("section heading pattern is valid")
});

/// `[[file]]` or `[[file#anchor]]`.
static CROSS_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\[\[(.+?)\]\]").expect("cross reference pattern is valid")
});

/// Turn a heading name into the identifier used for its anchor.
pub fn anchor_id(name: &str) -> String {
	name.to_lowercase()
		.split_whitespace()
		.collect::<Vec<_>>()
		.join("-")
}

/// Rewrite section headings and cross references in a comment so the prose
/// renderer sees plain markdown.
///
/// Headings become markdown headings with an anchor span, e.g. `== Setup ==`
/// becomes `## <span id="setup" href="setup">Setup</span>`. References become
/// links to the other file's page: `[[main.py#setup]]` turns into
/// `[main.py](main.html#setup)`. References directly after a backtick are left
/// alone so they can be quoted in inline code.
pub fn resolve_references(comment: &str, preserve_paths: bool, outdir: &Path) -> LidoResult<String> {
	let comment = SECTION_HEADING.replace_all(comment, |caps: &Captures<'_>| {
		let name = caps[2].trim();
		format!(
			"{level} <span id=\"{id}\" href=\"{id}\">{name}</span>",
			level = "#".repeat(caps[1].len()),
			id = anchor_id(name),
		)
	});

	let mut output = String::with_capacity(comment.len());
	let mut last = 0;
	let mut search = 0;

	while let Some(caps) = CROSS_REFERENCE.captures_at(&comment, search) {
		let Some(whole) = caps.get(0) else {
			break;
		};

		// A quoted reference is skipped one `[` at a time, so `[[[a]]` after a
		// backtick still links its inner `[[a]]`.
		if comment[..whole.start()].ends_with('`') {
			search = whole.start() + 1;
			continue;
		}

		let target = &caps[1];
		let (name, anchor) = match target.split_once('#') {
			Some((name, anchor)) => (name, Some(anchor)),
			None => (target, None),
		};

		let dest = destination(Path::new(name), preserve_paths, outdir)?;
		let page = dest
			.file_name()
			.map(|file| file.to_string_lossy().into_owned())
			.unwrap_or_default();

		output.push_str(&comment[last..whole.start()]);
		match anchor {
			Some(anchor) => output.push_str(&format!("[{name}]({page}#{anchor})")),
			None => output.push_str(&format!("[{name}]({page})")),
		}
		last = whole.end();
		search = last;
	}

	output.push_str(&comment[last..]);
	Ok(output)
}
