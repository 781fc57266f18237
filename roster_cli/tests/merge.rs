use roster_core::AnyEmptyResult;
use similar_asserts::assert_eq;

mod common;

use common::CUSTOMERS;
use common::roster_cmd;

const UPDATES: &str = "# this is a listing of updates we want to apply
[a] Jeff
[c] Henry
[d] Martha
";

const MERGED: &str = "# this is a regular comment
[a] Jeff
#ERROR cannot parse Customer: this is an invalid line
#ERROR cannot parse Customer: also an # invalid line
#[c] Henry
# the follwing is a blank line

#REMOVED [b] Jane


#MERGED
#[d] Martha
";

fn write_registries(root: &std::path::Path) -> std::io::Result<()> {
	std::fs::write(root.join("customers.txt"), CUSTOMERS)?;
	std::fs::write(root.join("updates.txt"), UPDATES)
}

#[test]
fn merge_writes_result_to_base() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_registries(tmp.path())?;

	roster_cmd()
		.arg("merge")
		.arg("customers.txt")
		.arg("updates.txt")
		.arg("--type-name")
		.arg("Customer")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Merged updates.txt into customers.txt: 2 kept, 1 removed, 1 added \
			 (add-new-as-disabled)",
		));

	assert_eq!(std::fs::read_to_string(tmp.path().join("customers.txt"))?, MERGED);
	assert_eq!(std::fs::read_to_string(tmp.path().join("updates.txt"))?, UPDATES);

	Ok(())
}

#[test]
fn merge_policy_flag_adds_new_entries_enabled() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_registries(tmp.path())?;

	roster_cmd()
		.arg("merge")
		.arg("customers.txt")
		.arg("updates.txt")
		.arg("--policy")
		.arg("add-new-as-enabled")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let content = std::fs::read_to_string(tmp.path().join("customers.txt"))?;
	assert!(content.ends_with("#MERGED\n[d] Martha\n"));

	Ok(())
}

#[test]
fn merge_policy_from_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_registries(tmp.path())?;
	std::fs::write(
		tmp.path().join(".roster.toml"),
		"[merge]\npolicy = \"add-new-as-enabled\"\n",
	)?;

	roster_cmd()
		.arg("merge")
		.arg("customers.txt")
		.arg("updates.txt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("(add-new-as-enabled)"));

	let content = std::fs::read_to_string(tmp.path().join("customers.txt"))?;
	assert!(content.ends_with("#MERGED\n[d] Martha\n"));

	Ok(())
}

#[test]
fn merge_noop_leaves_base_untouched() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("customers.txt"), CUSTOMERS)?;
	std::fs::write(tmp.path().join("updates.txt"), "[b] Jane\n[c] Henry\n[a] Jeff\n")?;

	roster_cmd()
		.arg("merge")
		.arg("customers.txt")
		.arg("updates.txt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("customers.txt already matches updates.txt."));

	assert_eq!(std::fs::read_to_string(tmp.path().join("customers.txt"))?, CUSTOMERS);

	Ok(())
}

#[test]
fn merge_dry_run_does_not_write() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_registries(tmp.path())?;

	roster_cmd()
		.arg("merge")
		.arg("--dry-run")
		.arg("customers.txt")
		.arg("updates.txt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run: would merge"))
		.stdout(predicates::str::contains("+#REMOVED [b] Jane"))
		.stdout(predicates::str::contains("+#[d] Martha"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("customers.txt"))?, CUSTOMERS);

	Ok(())
}

#[test]
fn merge_verbose_lists_changed_ids() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_registries(tmp.path())?;

	roster_cmd()
		.arg("merge")
		.arg("--verbose")
		.arg("customers.txt")
		.arg("updates.txt")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("removed b"))
		.stdout(predicates::str::contains("added d"));

	Ok(())
}

#[test]
fn merge_twice_settles() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_registries(tmp.path())?;

	roster_cmd()
		.arg("merge")
		.arg("customers.txt")
		.arg("updates.txt")
		.arg("--type-name")
		.arg("Customer")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	roster_cmd()
		.arg("merge")
		.arg("customers.txt")
		.arg("updates.txt")
		.arg("--type-name")
		.arg("Customer")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("customers.txt already matches updates.txt."));

	assert_eq!(std::fs::read_to_string(tmp.path().join("customers.txt"))?, MERGED);

	Ok(())
}
