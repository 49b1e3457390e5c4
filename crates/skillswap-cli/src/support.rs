use crate::cli::StatusArg;
use serde::Serialize;
use skillswap_core::{
    EngineConfig, ReplayMode, ReplayReport, RequestStatus, SwapEvent, SwapRequest,
    UserDirectory, read_events_from_path, replay_events,
};
use tracing_subscriber::EnvFilter;

/// Env var holding the tracing filter directive.
pub const LOG_ENV: &str = "SKILLSWAP_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Diagnostics go to stderr so `--json` stdout stays parseable.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("warning: tracing subscriber not installed: {e}");
    }
}

pub fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

pub fn load_directory_or_exit(users: &str) -> UserDirectory {
    UserDirectory::load_jsonl(users)
        .unwrap_or_else(|e| exit_with(format!("failed to load {users}: {e}")))
}

pub fn load_events_or_exit(events: &str) -> Vec<SwapEvent> {
    read_events_from_path(events)
        .unwrap_or_else(|e| exit_with(format!("failed to load {events}: {e}")))
}

pub fn load_config_or_exit(config: Option<&str>) -> EngineConfig {
    match config {
        Some(path) => EngineConfig::load(path).unwrap_or_else(|e| exit_with(e)),
        None => EngineConfig::default(),
    }
}

/// Load all inputs and replay them, exiting on any failure.
pub fn replay_or_exit(
    users: &str,
    events: &str,
    config: Option<&str>,
    mode: ReplayMode,
) -> ReplayReport {
    let directory = load_directory_or_exit(users);
    let events = load_events_or_exit(events);
    let config = load_config_or_exit(config);
    tracing::debug!(
        users = directory.len(),
        events = events.len(),
        completion = %config.completion,
        "replay inputs loaded"
    );
    replay_events(&directory, &events, config, mode).unwrap_or_else(|e| exit_with(e))
}

pub fn map_status(status: StatusArg) -> RequestStatus {
    match status {
        StatusArg::Pending => RequestStatus::Pending,
        StatusArg::Accepted => RequestStatus::Accepted,
        StatusArg::Rejected => RequestStatus::Rejected,
        StatusArg::Completed => RequestStatus::Completed,
    }
}

pub fn print_json_or_exit(payload: &impl Serialize) {
    match serde_json::to_string_pretty(payload) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => exit_with(format!("json serialization failed: {e}")),
    }
}

pub fn print_request_line(request: &SwapRequest) {
    let rating = request
        .rating()
        .map(|value| format!(" rating={value}"))
        .unwrap_or_default();
    println!(
        "    {} [{}] {} -> {}: {} for {}{rating}",
        request.id(),
        request.status(),
        request.from_user_id(),
        request.to_user_id(),
        request.offered_skill(),
        request.requested_skill(),
    );
}
