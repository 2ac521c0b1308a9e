mod common;

use common::write_files;
use lido_core::AnyEmptyResult;
use predicates::prelude::*;

const MAIN_PY: &str = "# == Entry ==\n# Prints a greeting.\ndef main():\n    print(\"hi\")\n";

#[test]
fn build_documents_discovered_sources() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_files(
		tmp.path(),
		&[
			("src/main.py", MAIN_PY),
			("src/util.js", "// Helpers.\nvar x = 1;\n"),
			("notes.txt", "not a source\n"),
		],
	)?;

	common::lido_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("lido = src/main.py -> docs/main.html"))
		.stdout(predicate::str::contains("lido = src/util.js -> docs/util.html"))
		.stdout(predicate::str::contains("notes").not());

	assert!(tmp.path().join("docs/lido.css").is_file());
	let page = std::fs::read_to_string(tmp.path().join("docs/main.html"))?;
	assert!(page.contains("<title>main.py</title>"));
	assert!(page.contains("id=\"entry\""));
	assert!(page.contains("Prints a greeting."));

	Ok(())
}

#[test]
fn build_preserves_paths() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_files(tmp.path(), &[("src/pkg/main.py", MAIN_PY)])?;

	common::lido_cmd()
		.args(["build", "--preserve-paths", "--path"])
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicate::str::contains(
			"lido = src/pkg/main.py -> docs/src/pkg/main.html",
		));

	let page = std::fs::read_to_string(tmp.path().join("docs/src/pkg/main.html"))?;
	assert!(page.contains("href=\"../../lido.css\""));

	Ok(())
}

#[test]
fn build_uses_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_files(
		tmp.path(),
		&[
			(
				"lido.toml",
				"[output]\ndirectory = \"site\"\n\n[sources]\npatterns = [\"lib/**/*.py\"]\n",
			),
			("lib/a.py", MAIN_PY),
			("scripts/b.py", MAIN_PY),
		],
	)?;

	common::lido_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("lido = lib/a.py -> site/a.html"))
		.stdout(predicate::str::contains("b.py").not());

	assert!(tmp.path().join("site/a.html").is_file());
	assert!(!tmp.path().join("site/b.html").exists());

	Ok(())
}

#[test]
fn directory_flag_overrides_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_files(
		tmp.path(),
		&[
			("lido.toml", "[output]\ndirectory = \"site\"\n"),
			("a.py", MAIN_PY),
		],
	)?;
	let outdir = tmp.path().join("out");

	common::lido_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.arg("--directory")
		.arg(&outdir)
		.assert()
		.success()
		.stdout(predicate::str::contains("lido = a.py -> out/a.html"));

	assert!(outdir.join("a.html").is_file());
	assert!(!tmp.path().join("site").exists());

	Ok(())
}

#[test]
fn build_explicit_sources_with_forced_language() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_files(tmp.path(), &[("query.txt", "-- Every user.\nSELECT * FROM users;\n")])?;

	common::lido_cmd()
		.arg("build")
		.arg(tmp.path().join("query.txt"))
		.args(["--force-language", "sql", "--path"])
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("lido = query.txt -> docs/query.html"));

	let page = std::fs::read_to_string(tmp.path().join("docs/query.html"))?;
	assert!(page.contains("Every user."));

	Ok(())
}

#[test]
fn build_continues_past_failing_sources() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_files(
		tmp.path(),
		&[("good.py", MAIN_PY), ("mystery", "nothing to see\n")],
	)?;

	common::lido_cmd()
		.arg("build")
		.arg(tmp.path().join("mystery"))
		.arg(tmp.path().join("good.py"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicate::str::contains("lido = good.py -> docs/good.html"))
		.stderr(predicate::str::contains("can't figure out the language for `mystery`"))
		.stderr(predicate::str::contains("1 page(s) written, 1 source(s) failed"));

	assert!(tmp.path().join("docs/good.html").is_file());

	Ok(())
}

#[test]
fn unknown_forced_language_fails_every_source() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_files(tmp.path(), &[("a.py", MAIN_PY)])?;

	common::lido_cmd()
		.args(["build", "-l", "klingon", "--path"])
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicate::str::contains("`klingon`"));

	Ok(())
}

#[test]
fn invalid_config_is_fatal() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_files(tmp.path(), &[("lido.toml", "[output\n"), ("a.py", MAIN_PY)])?;

	common::lido_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicate::str::contains("failed to parse config file"));

	assert!(!tmp.path().join("docs").exists());

	Ok(())
}

#[test]
fn unknown_theme_is_fatal() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_files(
		tmp.path(),
		&[
			("lido.toml", "[highlight]\ntheme = \"neon\"\n"),
			("a.py", MAIN_PY),
		],
	)?;

	common::lido_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicate::str::contains("unknown highlight theme"));

	Ok(())
}

#[test]
fn build_without_sources() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::lido_cmd()
		.arg("build")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("No sources to document."));

	assert!(!tmp.path().join("docs").exists());

	Ok(())
}

#[test]
fn verbose_logs_to_stderr() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_files(tmp.path(), &[("a.py", MAIN_PY)])?;

	common::lido_cmd()
		.args(["build", "--verbose", "--path"])
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("lido = a.py -> docs/a.html"))
		.stdout(predicate::str::contains("resolved language").not())
		.stderr(predicate::str::contains("resolved language"));

	Ok(())
}

#[test]
fn missing_subcommand_fails() {
	common::lido_cmd()
		.assert()
		.code(1)
		.stderr(predicate::str::contains("No subcommand specified"));
}
