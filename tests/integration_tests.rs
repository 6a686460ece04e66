//! End-to-end tests for the `ssig` CLI surface.

mod common;

use std::ffi::OsStr;
use std::fmt::Write as _;

use state_signals::State;

fn full_dataset_toml(skip: Option<&str>) -> String {
    let mut out = String::new();
    for state in State::ALL {
        if Some(state.code()) == skip {
            continue;
        }
        let _ = writeln!(
            out,
            "[[state]]\ncode = \"{}\"\navg_temp_f = 55.0\nannual_precip_in = 35.0\n",
            state.code()
        );
    }
    out
}

#[test]
fn help_command_prints_usage() {
    let result = common::run_cli_case("help_command_prints_usage", &["--help"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("Usage: ssig [OPTIONS] <COMMAND>"),
        "missing help banner; log: {}",
        result.log_path.display()
    );
}

#[test]
fn version_command_prints_version() {
    let result = common::run_cli_case("version_command_prints_version", &["--version"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("ssig"),
        "missing version output; log: {}",
        result.log_path.display()
    );
}

#[test]
fn scores_json_is_an_object_covering_every_state() {
    let result = common::run_cli_case(
        "scores_json_is_an_object_covering_every_state",
        &["scores", "--json"],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    let value: serde_json::Value = serde_json::from_str(&result.stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({e}); log: {}", result.log_path.display()));
    let object = value.as_object().expect("scores must be a JSON object");

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    let mut codes: Vec<&str> = State::ALL.iter().map(|s| s.code()).collect();
    codes.sort_unstable();
    assert_eq!(keys, codes, "log: {}", result.log_path.display());
    assert!(object.values().all(serde_json::Value::is_number));
}

#[test]
fn scores_table_lists_every_state() {
    let result = common::run_cli_case(
        "scores_table_lists_every_state",
        &["scores", "--no-color", "--sort", "state"],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    for state in State::ALL {
        assert!(
            result.stdout.contains(state.name()),
            "missing {} in table; log: {}",
            state.name(),
            result.log_path.display()
        );
    }
    assert!(result.stdout.contains("50 states"));
}

#[test]
fn states_json_lists_codes_and_names() {
    let result = common::run_cli_case("states_json_lists_codes_and_names", &["states", "--json"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    let entries: Vec<serde_json::Value> = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(entries.len(), 50);
    assert_eq!(entries[0]["code"], "AL");
    assert_eq!(entries[0]["name"], "Alabama");
}

#[test]
fn config_show_prints_defaults_as_toml() {
    let result = common::run_cli_case("config_show_prints_defaults_as_toml", &["config", "show"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(result.stdout.contains("[physical]"));
    assert!(result.stdout.contains("ideal_temp_f = 60.0"));
}

#[test]
fn missing_explicit_config_fails_with_code() {
    let result = common::run_cli_case(
        "missing_explicit_config_fails_with_code",
        &["--config", "/nonexistent/ssig/config.toml", "scores"],
    );
    assert!(
        !result.status.success(),
        "expected failure; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stderr.contains("[SIG-1002]"),
        "missing error code; log: {}",
        result.log_path.display()
    );
}

#[test]
fn ssig_config_env_selects_config_file() {
    let case = "ssig_config_env_selects_config_file";
    let config = common::case_dir(case).join("from_env.toml");
    std::fs::write(&config, "[physical]\nideal_temp_f = 66.0\n").unwrap();

    let result = common::run_cli_case_with_env(
        case,
        &["config", "show"],
        &[("SSIG_CONFIG", config.as_os_str())],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("ideal_temp_f = 66.0"),
        "env config not applied; log: {}",
        result.log_path.display()
    );
}

#[test]
fn xdg_config_home_is_used_when_env_unset() {
    let case = "xdg_config_home_is_used_when_env_unset";
    let config_dir = common::case_home(case).join(".config").join("ssig");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[physical]\nideal_temp_f = 58.0\n",
    )
    .unwrap();

    let result = common::run_cli_case(case, &["config", "show"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("ideal_temp_f = 58.0"),
        "XDG config not applied; log: {}",
        result.log_path.display()
    );
}

#[test]
fn ssig_config_env_takes_precedence_over_xdg() {
    let case = "ssig_config_env_takes_precedence_over_xdg";
    let config_dir = common::case_home(case).join(".config").join("ssig");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[physical]\nideal_temp_f = 58.0\n",
    )
    .unwrap();
    let env_config = common::case_dir(case).join("from_env.toml");
    std::fs::write(&env_config, "[physical]\nideal_temp_f = 66.0\n").unwrap();

    let result = common::run_cli_case_with_env(
        case,
        &["config", "show"],
        &[("SSIG_CONFIG", env_config.as_os_str())],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("ideal_temp_f = 66.0") && !result.stdout.contains("58.0"),
        "env config should win over XDG; log: {}",
        result.log_path.display()
    );
}

#[test]
fn ssig_config_env_pointing_nowhere_fails_with_code() {
    let result = common::run_cli_case_with_env(
        "ssig_config_env_pointing_nowhere_fails_with_code",
        &["config", "show"],
        &[("SSIG_CONFIG", OsStr::new("/nonexistent/ssig/env.toml"))],
    );
    assert!(
        !result.status.success(),
        "expected failure; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stderr.contains("[SIG-1002]"),
        "missing error code; log: {}",
        result.log_path.display()
    );
}

#[test]
fn dataset_override_is_scored() {
    let dir = common::case_dir("dataset_override_is_scored");
    let data = dir.join("profiles.toml");
    std::fs::write(&data, full_dataset_toml(None)).unwrap();

    let result = common::run_cli_case(
        "dataset_override_is_scored",
        &[
            OsStr::new("scores"),
            OsStr::new("--json"),
            OsStr::new("--data"),
            data.as_os_str(),
        ],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    let value: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 50);
    // 55°F at the ideal precipitation: temp fit 1 - 5/30, weighted 0.6.
    let expected = 0.6f64.mul_add(1.0 - 5.0 / 30.0, 0.4);
    assert!(object
        .values()
        .all(|v| (v.as_f64().unwrap() - expected).abs() < 1e-9));
}

#[test]
fn partial_dataset_fails_without_printing_scores() {
    let dir = common::case_dir("partial_dataset_fails_without_printing_scores");
    let data = dir.join("profiles.toml");
    std::fs::write(&data, full_dataset_toml(Some("VT"))).unwrap();

    let result = common::run_cli_case(
        "partial_dataset_fails_without_printing_scores",
        &[
            OsStr::new("scores"),
            OsStr::new("--json"),
            OsStr::new("--data"),
            data.as_os_str(),
        ],
    );
    assert!(
        !result.status.success(),
        "expected failure; log: {}",
        result.log_path.display()
    );
    assert!(result.stdout.trim().is_empty());
    assert!(
        result.stderr.contains("[SIG-2003]") && result.stderr.contains("VT"),
        "expected missing-state error; log: {}",
        result.log_path.display()
    );
}

#[test]
fn run_log_records_each_scoring_run() {
    let dir = common::case_dir("run_log_records_each_scoring_run");
    let log = dir.join("runs.jsonl");
    let _ = std::fs::remove_file(&log);
    let config = dir.join("config.toml");
    std::fs::write(
        &config,
        format!("[logging]\njsonl_path = {:?}\n", log.display().to_string()),
    )
    .unwrap();

    for _ in 0..2 {
        let result = common::run_cli_case(
            "run_log_records_each_scoring_run",
            &[
                OsStr::new("--config"),
                config.as_os_str(),
                OsStr::new("scores"),
                OsStr::new("--json"),
            ],
        );
        assert!(
            result.status.success(),
            "expected success; log: {}",
            result.log_path.display()
        );
    }

    let raw = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<serde_json::Value> = raw
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["signal"], "physical");
    assert_eq!(lines[0]["source"], "builtin");
    assert_eq!(lines[0]["states"], 50);
}

#[test]
fn completions_command_generates_shell_script() {
    let result = common::run_cli_case(
        "completions_command_generates_shell_script",
        &["completions", "bash"],
    );
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("ssig"),
        "expected completion script contents; log: {}",
        result.log_path.display()
    );
}
