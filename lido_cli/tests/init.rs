mod common;

use lido_core::AnyEmptyResult;
use lido_core::LidoConfig;
use predicates::prelude::*;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::lido_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created lido.toml"))
		.stdout(predicate::str::contains("lido build"));

	let content = std::fs::read_to_string(tmp.path().join("lido.toml"))?;
	assert!(content.contains("[output]"));
	assert!(content.contains("[sources]"));
	assert!(content.contains("[highlight]"));

	Ok(())
}

#[test]
fn init_creates_loadable_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::lido_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let config = LidoConfig::load(tmp.path())?.ok_or("config missing")?;
	assert_eq!(config.language, None);
	assert!(!config.output.preserve_paths);
	assert_eq!(config.output_directory(tmp.path()), tmp.path().join("docs"));
	assert_eq!(config.highlight.theme, "InspiredGitHub");

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join(".lido.toml");
	std::fs::write(&config_path, "existing config")?;

	common::lido_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "existing config");
	assert!(!tmp.path().join("lido.toml").exists());

	Ok(())
}
