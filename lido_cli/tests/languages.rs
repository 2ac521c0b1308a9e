mod common;

use lido_core::AnyEmptyResult;
use predicates::prelude::*;
use rstest::rstest;

#[test]
fn lists_languages_as_text() {
	common::lido_cmd()
		.arg("languages")
		.assert()
		.success()
		.stdout(predicate::str::contains("EXTENSION"))
		.stdout(predicate::str::is_match(r"(?m)^\.py\s+python\s+#\s+\x22\x22\x22 \x22\x22\x22$").unwrap())
		.stdout(predicate::str::is_match(r"(?m)^\.pl\s+perl\s+#\s*$").unwrap());
}

#[rstest]
#[case(".coffee")]
#[case(".pl")]
#[case(".sql")]
#[case(".c")]
#[case(".cpp")]
#[case(".js")]
#[case(".rb")]
#[case(".py")]
#[case(".scm")]
#[case(".lua")]
#[case(".erl")]
#[case(".tcl")]
#[case(".hs")]
fn json_lists_every_extension(#[case] extension: &str) -> AnyEmptyResult {
	let output = common::lido_cmd()
		.args(["languages", "--format", "json"])
		.output()?;
	assert!(output.status.success());

	let entries: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	let entries = entries.as_array().ok_or("expected a json array")?;
	assert_eq!(entries.len(), 13);

	let entry = entries
		.iter()
		.find(|entry| entry["extension"] == extension)
		.ok_or("extension missing")?;
	assert!(entry["name"].is_string());
	assert!(entry["symbol"].is_string());

	Ok(())
}

#[test]
fn json_includes_block_markers() -> AnyEmptyResult {
	let output = common::lido_cmd()
		.args(["languages", "--format", "json"])
		.output()?;
	let entries: serde_json::Value = serde_json::from_slice(&output.stdout)?;

	let c = entries
		.as_array()
		.and_then(|entries| entries.iter().find(|entry| entry["name"] == "c"))
		.ok_or("c missing")?;
	similar_asserts::assert_eq!(
		c,
		&serde_json::json!({
			"extension": ".c",
			"name": "c",
			"symbol": "//",
			"block": { "start": "/*", "end": "*/" }
		})
	);

	Ok(())
}
