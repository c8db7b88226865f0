#[test]
fn check_lsync_help() {
    let mut cmd = assert_cmd::Command::cargo_bin("lsync").unwrap();
    cmd.arg("--help").assert();
}
