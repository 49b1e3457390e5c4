use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "skillswap-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_skillswap<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_skillswap");
    Command::new(bin)
        .args(args)
        .env_remove("SKILLSWAP_LOG")
        .output()
        .expect("skillswap command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn write_lines(path: &Path, lines: &[&str]) {
    fs::write(path, format!("{}\n", lines.join("\n"))).expect("jsonl should be written");
}

fn write_sample_users(path: &Path) {
    write_lines(
        path,
        &[
            r#"{"id":"u-you","display_name":"You","skills_offered":["React","JavaScript"]}"#,
            r#"{"id":"u-alice","display_name":"Alice Johnson","skills_offered":["UI Design"]}"#,
            r#"{"id":"u-bob","display_name":"Bob Smith","skills_offered":["Node.js"]}"#,
        ],
    );
}

fn write_sample_events(path: &Path) {
    write_lines(
        path,
        &[
            r#"{"event_id":"e1","request_id":"swap-1","actor":"u-alice","occurred_at":"2026-02-15T06:00:00Z","action":"create","to_user_id":"u-you","offered_skill":"UI Design","requested_skill":"React","message":"I'd love to learn React from you."}"#,
            r#"{"event_id":"e2","request_id":"swap-2","actor":"u-you","occurred_at":"2026-02-15T07:00:00Z","action":"create","to_user_id":"u-bob","offered_skill":"JavaScript","requested_skill":"Node.js","message":"Backend for frontend?"}"#,
            r#"{"event_id":"e3","request_id":"swap-2","actor":"u-bob","occurred_at":"2026-02-15T08:00:00Z","action":"accept"}"#,
        ],
    );
}

/// Sample events plus one the ledger refuses: the requester accepting.
fn write_events_with_refusal(path: &Path) {
    write_sample_events(path);
    let mut raw = fs::read_to_string(path).expect("events should be readable");
    raw.push_str(
        r#"{"event_id":"e4","request_id":"swap-1","actor":"u-alice","occurred_at":"2026-02-15T09:00:00Z","action":"accept"}"#,
    );
    raw.push('\n');
    fs::write(path, raw).expect("events should be written");
}

struct Inputs {
    _tmp: TempDirGuard,
    users: PathBuf,
    events: PathBuf,
}

fn sample_inputs(prefix: &str) -> Inputs {
    let tmp = TempDirGuard::new(prefix);
    let users = tmp.path().join("users.jsonl");
    let events = tmp.path().join("events.jsonl");
    write_sample_users(&users);
    write_sample_events(&events);
    Inputs {
        _tmp: tmp,
        users,
        events,
    }
}

#[test]
fn replay_json_reports_ledger() {
    let inputs = sample_inputs("replay-json");
    let output = run_skillswap([
        OsStr::new("replay"),
        OsStr::new("--users"),
        inputs.users.as_os_str(),
        OsStr::new("--events"),
        inputs.events.as_os_str(),
        OsStr::new("--json"),
    ]);
    assert_success(&output);

    let payload = parse_json_stdout(&output);
    assert_eq!(payload["applied"], 3);
    assert_eq!(payload["completion"], "unilateral");
    assert_eq!(payload["counts"]["pending"], 1);
    assert_eq!(payload["counts"]["accepted"], 1);
    assert_eq!(payload["rejected"].as_array().map(Vec::len), Some(0));

    let requests = payload["requests"]
        .as_array()
        .expect("requests should be an array");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0]["id"], "swap-1");
    assert_eq!(requests[0]["status"], "pending");
    assert_eq!(requests[1]["id"], "swap-2");
    assert_eq!(requests[1]["status"], "accepted");
    assert_eq!(requests[1]["version"], 1);
}

#[test]
fn replay_human_output_lists_requests() {
    let inputs = sample_inputs("replay-text");
    let output = run_skillswap([
        OsStr::new("replay"),
        OsStr::new("--users"),
        inputs.users.as_os_str(),
        OsStr::new("--events"),
        inputs.events.as_os_str(),
    ]);
    assert_success(&output);

    let text = stdout_text(&output);
    assert!(text.contains("Applied: 3"));
    assert!(text.contains("Requests: 2"));
    assert!(text.contains("swap-2 [accepted] u-you -> u-bob: JavaScript for Node.js"));
}

#[test]
fn replay_strict_stops_at_refused_event() {
    let inputs = sample_inputs("replay-strict");
    write_events_with_refusal(&inputs.events);
    let output = run_skillswap([
        OsStr::new("replay"),
        OsStr::new("--users"),
        inputs.users.as_os_str(),
        OsStr::new("--events"),
        inputs.events.as_os_str(),
    ]);
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));

    let stderr = stderr_text(&output);
    assert!(stderr.contains("error: event e4 refused"), "stderr: {stderr}");
    assert!(stdout_text(&output).is_empty());
}

#[test]
fn replay_lenient_reports_refusals() {
    let inputs = sample_inputs("replay-lenient");
    write_events_with_refusal(&inputs.events);
    let output = run_skillswap([
        OsStr::new("replay"),
        OsStr::new("--users"),
        inputs.users.as_os_str(),
        OsStr::new("--events"),
        inputs.events.as_os_str(),
        OsStr::new("--lenient"),
        OsStr::new("--json"),
    ]);
    assert_success(&output);

    let payload = parse_json_stdout(&output);
    assert_eq!(payload["applied"], 3);
    let rejected = payload["rejected"]
        .as_array()
        .expect("rejected should be an array");
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0]["event_id"], "e4");
    assert_eq!(rejected[0]["action"], "accept");
    assert_eq!(rejected[0]["kind"], "unauthorized");
    assert_eq!(payload["requests"][0]["status"], "pending");
}

#[test]
fn view_json_partitions_for_viewer() {
    let inputs = sample_inputs("view-json");
    let output = run_skillswap([
        OsStr::new("view"),
        OsStr::new("u-you"),
        OsStr::new("--users"),
        inputs.users.as_os_str(),
        OsStr::new("--events"),
        inputs.events.as_os_str(),
        OsStr::new("--json"),
    ]);
    assert_success(&output);

    let payload = parse_json_stdout(&output);
    assert_eq!(payload["summary"]["viewerId"], "u-you");
    assert_eq!(payload["summary"]["receivedTotal"], 1);
    assert_eq!(payload["summary"]["sentTotal"], 1);
    assert_eq!(payload["summary"]["pendingReceived"], 1);
    assert_eq!(payload["summary"]["active"], 1);
    assert_eq!(payload["received"][0]["id"], "swap-1");
    assert_eq!(payload["sent"][0]["id"], "swap-2");
    assert!(payload.get("statusFilter").is_none());
}

#[test]
fn view_status_filter_narrows_lists_only() {
    let inputs = sample_inputs("view-filter");
    let output = run_skillswap([
        OsStr::new("view"),
        OsStr::new("u-you"),
        OsStr::new("--users"),
        inputs.users.as_os_str(),
        OsStr::new("--events"),
        inputs.events.as_os_str(),
        OsStr::new("--status"),
        OsStr::new("accepted"),
        OsStr::new("--json"),
    ]);
    assert_success(&output);

    let payload = parse_json_stdout(&output);
    assert_eq!(payload["statusFilter"], "accepted");
    assert_eq!(payload["received"].as_array().map(Vec::len), Some(0));
    assert_eq!(payload["sent"].as_array().map(Vec::len), Some(1));
    assert_eq!(payload["summary"]["receivedTotal"], 1);
}

#[test]
fn view_for_outsider_is_empty() {
    let inputs = sample_inputs("view-outsider");
    let output = run_skillswap([
        OsStr::new("view"),
        OsStr::new("u-nobody"),
        OsStr::new("--users"),
        inputs.users.as_os_str(),
        OsStr::new("--events"),
        inputs.events.as_os_str(),
    ]);
    assert_success(&output);

    let text = stdout_text(&output);
    assert!(text.contains("Received: 0"));
    assert!(text.contains("Received requests: none"));
    assert!(text.contains("Sent requests: none"));
}

#[test]
fn bilateral_config_holds_completion_until_both_confirm() {
    let inputs = sample_inputs("bilateral");
    let config = inputs.users.with_file_name("skillswap.toml");
    fs::write(&config, "completion = \"bilateral\"\n").expect("config should be written");
    let mut raw = fs::read_to_string(&inputs.events).expect("events should be readable");
    raw.push_str(
        r#"{"event_id":"e4","request_id":"swap-2","actor":"u-you","occurred_at":"2026-02-16T08:00:00Z","action":"complete"}"#,
    );
    raw.push('\n');
    fs::write(&inputs.events, raw).expect("events should be written");

    let output = run_skillswap([
        OsStr::new("replay"),
        OsStr::new("--users"),
        inputs.users.as_os_str(),
        OsStr::new("--events"),
        inputs.events.as_os_str(),
        OsStr::new("--config"),
        config.as_os_str(),
        OsStr::new("--json"),
    ]);
    assert_success(&output);

    let payload = parse_json_stdout(&output);
    assert_eq!(payload["completion"], "bilateral");
    assert_eq!(payload["requests"][1]["status"], "accepted");
    assert_eq!(
        payload["requests"][1]["completion_confirmed_by"],
        serde_json::json!(["u-you"])
    );
}

#[test]
fn unknown_config_key_fails() {
    let inputs = sample_inputs("bad-config");
    let config = inputs.users.with_file_name("skillswap.toml");
    fs::write(&config, "completion_mode = \"bilateral\"\n").expect("config should be written");

    let output = run_skillswap([
        OsStr::new("replay"),
        OsStr::new("--users"),
        inputs.users.as_os_str(),
        OsStr::new("--events"),
        inputs.events.as_os_str(),
        OsStr::new("--config"),
        config.as_os_str(),
    ]);
    assert_failure(&output);
    assert!(stderr_text(&output).starts_with("error: "));
}

#[test]
fn missing_users_file_fails() {
    let inputs = sample_inputs("missing-users");
    let missing = inputs.users.with_file_name("nope.jsonl");
    let output = run_skillswap([
        OsStr::new("view"),
        OsStr::new("u-you"),
        OsStr::new("--users"),
        missing.as_os_str(),
        OsStr::new("--events"),
        inputs.events.as_os_str(),
    ]);
    assert_failure(&output);
    let stderr = stderr_text(&output);
    assert!(stderr.contains("error: failed to load"), "stderr: {stderr}");
}
