use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

const PORTAL_EXAMPLE: &str = "add 1 2024-01-01 2024-01-05\n\
add 2 2024-01-06 2024-01-10 1\n\
add 3 2024-01-06 2024-01-07 1\n\
add 4 2024-01-11 2024-01-12 2,3\n";

#[test]
fn cli_prints_critical_tasks_in_path_order() {
    run_cli(&format!("{PORTAL_EXAMPLE}critical\nquit\n"))
        .success()
        .stdout(str_contains("Critical tasks: 1, 2, 4"));
}

#[test]
fn cli_summary_reports_duration() {
    run_cli(&format!("{PORTAL_EXAMPLE}summary\nquit\n"))
        .success()
        .stdout(str_contains(
            "tasks=4, critical=3, duration=12d, crit_path=1->2->4",
        ));
}

#[test]
fn cli_timings_table_lists_slack() {
    run_cli(&format!("{PORTAL_EXAMPLE}timings\nquit\n"))
        .success()
        .stdout(str_contains("slack_days"))
        .stdout(str_contains("2024-01-09"));
}

#[test]
fn cli_delete_command_removes_task() {
    run_cli("add 1 2024-01-01 2024-01-02\nadd 2 2024-01-03 2024-01-04 1\ndelete 2\ndelete 2\nquit\n")
        .success()
        .stdout(str_contains("Deleted task 2."))
        .stdout(str_contains("Task 2 not found."));
}

#[test]
fn cli_reports_cycles_and_keeps_running() {
    run_cli("add a 2024-01-01 2024-01-02 b\nadd b 2024-01-03 2024-01-04 a\ncritical\nhelp\nquit\n")
        .success()
        .stdout(str_contains("Error: circular dependency"))
        .stdout(str_contains("Commands:"));
}

#[test]
fn cli_policy_controls_inverted_ranges() {
    let script = "add 1 2024-01-05 2024-01-01\ncritical\npolicy allow\ncritical\nquit\n";
    let assert = run_cli(script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Error: "), "expected rejection:\n{output}");
    assert!(output.contains("Date range policy: allow"));
    let after_policy = output.split("Date range policy: allow").last().unwrap_or_default();
    assert!(
        after_policy.contains("Critical tasks:"),
        "expected analysis after policy change:\n{after_policy}"
    );
}

#[test]
fn cli_rejects_bad_dates() {
    run_cli("add 1 2024-13-01 2024-01-02\nquit\n")
        .success()
        .stdout(str_contains("Invalid date (YYYY-MM-DD)"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "add 1 2024-01-01 2024-01-03\nsave json {}\nadd 2 2024-01-04 2024-01-09 1\nload json {}\nshow\nquit\n",
        path, path
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(
        output.contains("Tasks loaded from"),
        "expected output to mention load completion"
    );
    let after_reload = output.split("Tasks loaded from").last().unwrap_or_default();
    assert!(after_reload.contains("2024-01-01"));
    assert!(
        !after_reload.contains("2024-01-09"),
        "task added after save should not appear after reload:\n{}",
        after_reload
    );
}

#[test]
fn cli_save_and_load_csv_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!(
        "{PORTAL_EXAMPLE}save csv {path}\ndelete 4\nload csv {path}\ncritical\nquit\n"
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Tasks saved to"))
        .stdout(str_contains("Critical tasks: 1, 2, 4"));
}

#[test]
fn cli_reads_options_file_from_env() {
    let mut options = NamedTempFile::new().expect("create temp file");
    std::io::Write::write_all(&mut options, br#"{"date_range_policy":"allow"}"#).unwrap();

    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env("CRITICAL_PATH_OPTIONS", options.path())
        .write_stdin("add 1 2024-01-05 2024-01-01\npolicy\ncritical\nquit\n")
        .assert()
        .success()
        .stdout(str_contains("current: allow"))
        .stdout(str_contains("Critical tasks:"));
}

#[test]
fn cli_rejects_unknown_policy() {
    run_cli("policy sometimes\nquit\n")
        .success()
        .stdout(str_contains("invalid date range policy: sometimes"));
}
