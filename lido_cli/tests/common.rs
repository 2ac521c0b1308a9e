use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn lido_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("lido"));
	cmd.env("NO_COLOR", "1").env_remove("LIDO_LOG");
	cmd
}

#[allow(dead_code)]
/// Write `files` (path, contents) under `root`, creating parent directories.
pub fn write_files(root: &std::path::Path, files: &[(&str, &str)]) -> std::io::Result<()> {
	for (path, contents) in files {
		let path = root.join(path);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, contents)?;
	}
	Ok(())
}
