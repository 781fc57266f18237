use roster_core::AnyEmptyResult;
use similar_asserts::assert_eq;

mod common;

use common::CUSTOMERS;
use common::roster_cmd;

const CANONICAL: &str = "# this is a regular comment
[a] Jeff
#ERROR cannot parse Customer: this is an invalid line
#ERROR cannot parse Customer: also an # invalid line
#[c] Henry
# the follwing is a blank line

[b] Jane
";

#[test]
fn fmt_rewrites_registry_in_canonical_form() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("customers.txt");
	std::fs::write(&file, CUSTOMERS)?;

	roster_cmd()
		.arg("fmt")
		.arg("customers.txt")
		.arg("--type-name")
		.arg("Customer")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Formatted customers.txt."));

	assert_eq!(std::fs::read_to_string(&file)?, CANONICAL);

	Ok(())
}

#[test]
fn fmt_is_stable_on_canonical_input() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("customers.txt");
	std::fs::write(&file, CANONICAL)?;

	roster_cmd()
		.arg("fmt")
		.arg("customers.txt")
		.arg("--type-name")
		.arg("Customer")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already formatted"));

	assert_eq!(std::fs::read_to_string(&file)?, CANONICAL);

	Ok(())
}

#[test]
fn fmt_check_fails_without_writing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("customers.txt");
	std::fs::write(&file, CUSTOMERS)?;

	roster_cmd()
		.arg("fmt")
		.arg("--check")
		.arg("customers.txt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("is not formatted"));

	assert_eq!(std::fs::read_to_string(&file)?, CUSTOMERS);

	Ok(())
}

#[test]
fn fmt_dry_run_prints_diff() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("customers.txt");
	std::fs::write(&file, CUSTOMERS)?;

	roster_cmd()
		.arg("fmt")
		.arg("--dry-run")
		.arg("customers.txt")
		.arg("--type-name")
		.arg("Customer")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run: would reformat customers.txt"))
		.stdout(predicates::str::contains("-# ## [c] Henry"))
		.stdout(predicates::str::contains("+#[c] Henry"));

	assert_eq!(std::fs::read_to_string(&file)?, CUSTOMERS);

	Ok(())
}

#[test]
fn fmt_key_value_registry() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("settings.env");
	std::fs::write(&file, "PORT=8080\n  # ## DEBUG   =   true\n# plain note\n")?;

	roster_cmd()
		.arg("fmt")
		.arg("settings.env")
		.arg("--codec")
		.arg("key-value")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(&file)?,
		"PORT = 8080\n#DEBUG = true\n# plain note\n"
	);

	Ok(())
}
