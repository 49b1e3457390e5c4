use crate::cli::StatusArg;
use crate::support::{map_status, print_json_or_exit, print_request_line, replay_or_exit};
use skillswap_core::{ReplayMode, SwapRequest};

pub fn run(
    viewer_id: String,
    users: String,
    events: String,
    config: Option<String>,
    status: Option<StatusArg>,
    json_output: bool,
) {
    let report = replay_or_exit(&users, &events, config.as_deref(), ReplayMode::Strict);
    let dashboard = report
        .ledger
        .view(&viewer_id)
        .dashboard(status.map(map_status));

    if json_output {
        print_json_or_exit(&dashboard);
        return;
    }

    let summary = &dashboard.summary;
    println!("skillswap view {viewer_id}");
    println!("  Received: {}", summary.received_total);
    println!("  Sent: {}", summary.sent_total);
    println!("  Pending for you: {}", summary.pending_received);
    println!("  Active swaps: {}", summary.active);
    if let Some(filter) = dashboard.status_filter {
        println!("  Filter: {filter}");
    }
    print_request_block("Received requests", &dashboard.received);
    print_request_block("Sent requests", &dashboard.sent);
}

fn print_request_block(label: &str, requests: &[SwapRequest]) {
    if requests.is_empty() {
        println!("  {label}: none");
        return;
    }
    println!("  {label}:");
    for request in requests {
        print_request_line(request);
    }
}
