use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskledger-{nanos}-{name}"))
}

#[test]
fn cli_smoke_help() {
    let exe = env!("CARGO_BIN_EXE_taskledger");
    let output = Command::new(exe)
        .arg("--help")
        .output()
        .expect("failed to run taskledger --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("history"));
}

#[test]
fn unknown_subcommand_is_invalid_input() {
    let exe = env!("CARGO_BIN_EXE_taskledger");
    let output = Command::new(exe)
        .arg("frobnicate")
        .output()
        .expect("failed to run taskledger");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn interactive_session_shares_one_book() {
    let dir = temp_dir("cli-interactive");
    let mut child = Command::new(env!("CARGO_BIN_EXE_taskledger"))
        .env("TASKLEDGER_STORE_DIR", &dir)
        .env("TASKLEDGER_CONFIG_PATH", dir.join("config.json"))
        .env_remove("TASKLEDGER_LOG")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn interactive session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(b"add \"Buy milk\" -p high\nadd \"  \"\nstats\nexit\n")
            .unwrap();
    }

    let output = child.wait_with_output().expect("interactive session failed");
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Added task: Buy milk"));
    assert!(stdout.contains("Total: 1 | Completed: 0 | Active: 1"));
    assert!(stderr.contains("ERROR: invalid_input - text is required"));
}
