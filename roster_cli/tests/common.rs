use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

#[allow(dead_code)]
pub const CUSTOMERS: &str = "# this is a regular comment
[a] Jeff
this is an invalid line
   also an # invalid line
# ## [c] Henry
# the follwing is a blank line

[b] Jane
";

pub fn roster_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("roster"));
	cmd.env("NO_COLOR", "1");
	cmd
}
