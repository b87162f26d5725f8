use assert_cmd::Command;

#[allow(deprecated)]
fn planguard_cmd() -> Command {
    Command::cargo_bin("planguard").unwrap()
}

#[test]
fn help_works() {
    planguard_cmd().arg("--help").assert().success();
}

#[test]
fn check_requires_plan() {
    planguard_cmd().arg("check").assert().failure();
}
