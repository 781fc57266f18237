use roster_core::AnyEmptyResult;
use similar_asserts::assert_eq;

mod common;

use common::CUSTOMERS;
use common::roster_cmd;

#[test]
fn enable_switches_entry_on() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("customers.txt");
	std::fs::write(&file, "[a] Jeff\n# ## [c] Henry\n")?;

	roster_cmd()
		.arg("enable")
		.arg("customers.txt")
		.arg("c")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Entry `c` is now enabled"));

	assert_eq!(std::fs::read_to_string(&file)?, "[a] Jeff\n[c] Henry\n");

	Ok(())
}

#[test]
fn disable_switches_entry_off() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("customers.txt");
	std::fs::write(&file, "# people\n[a] Jeff\n[b] Jane\n")?;

	roster_cmd()
		.arg("disable")
		.arg("customers.txt")
		.arg("b")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(std::fs::read_to_string(&file)?, "# people\n[a] Jeff\n#[b] Jane\n");

	Ok(())
}

#[test]
fn toggle_is_noop_when_already_in_state() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = tmp.path().join("customers.txt");
	std::fs::write(&file, "[a]    Jeff\n")?;

	roster_cmd()
		.arg("enable")
		.arg("customers.txt")
		.arg("a")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already enabled"));

	assert_eq!(std::fs::read_to_string(&file)?, "[a]    Jeff\n");

	Ok(())
}

#[test]
fn toggle_unknown_id_errors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("customers.txt"), CUSTOMERS)?;

	roster_cmd()
		.arg("disable")
		.arg("customers.txt")
		.arg("zz")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no entry with id `zz`"));

	Ok(())
}
