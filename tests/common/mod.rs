//! Shared harness: run the `ssig` binary in an isolated home and keep a
//! per-case log of the invocation.

#![allow(dead_code)]

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

pub struct CaseResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

/// Scratch directory for one case, under cargo's integration-test tmpdir.
pub fn case_dir(case_name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_TARGET_TMPDIR"))
        .join("ssig-cases")
        .join(case_name);
    std::fs::create_dir_all(&dir).expect("create case dir");
    dir
}

/// Isolated home for one case; `XDG_CONFIG_HOME` is `<home>/.config`.
pub fn case_home(case_name: &str) -> PathBuf {
    let home = case_dir(case_name).join("home");
    std::fs::create_dir_all(&home).expect("create isolated home");
    home
}

pub fn run_cli_case<S: AsRef<OsStr>>(case_name: &str, args: &[S]) -> CaseResult {
    run_cli_case_with_env(case_name, args, &[])
}

/// Like [`run_cli_case`], with extra environment variables applied last.
pub fn run_cli_case_with_env<S: AsRef<OsStr>>(
    case_name: &str,
    args: &[S],
    envs: &[(&str, &OsStr)],
) -> CaseResult {
    let dir = case_dir(case_name);
    let home = case_home(case_name);

    let mut command = Command::new(env!("CARGO_BIN_EXE_ssig"));
    command
        .args(args)
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("SSIG_CONFIG")
        .env("RUST_LOG", "warn");
    for (key, value) in envs {
        command.env(key, value);
    }
    let output = command.output().expect("spawn ssig");

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let rendered_args: Vec<String> = args
        .iter()
        .map(|arg| arg.as_ref().to_string_lossy().into_owned())
        .collect();
    let log_path = dir.join("case.log");
    std::fs::write(
        &log_path,
        format!(
            "args: {rendered_args:?}\nstatus: {}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}\n",
            output.status
        ),
    )
    .expect("write case log");

    CaseResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}
