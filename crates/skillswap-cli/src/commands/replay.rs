use crate::support::{print_json_or_exit, print_request_line, replay_or_exit};
use serde_json::json;
use skillswap_core::{ReplayMode, RequestStatus, StatusCounts};

pub fn run(
    users: String,
    events: String,
    config: Option<String>,
    lenient: bool,
    json_output: bool,
) {
    let mode = if lenient {
        ReplayMode::Lenient
    } else {
        ReplayMode::Strict
    };
    let report = replay_or_exit(&users, &events, config.as_deref(), mode);
    let ledger = &report.ledger;
    let counts = StatusCounts::tally(ledger.requests());

    if json_output {
        let requests: Vec<_> = ledger.requests().collect();
        let payload = json!({
            "users_path": users,
            "events_path": events,
            "completion": ledger.config().completion,
            "applied": report.applied,
            "rejected": report.rejected,
            "counts": counts,
            "requests": requests,
        });
        print_json_or_exit(&payload);
    } else {
        println!("skillswap replay --events {events}");
        println!("  Users: {users}");
        println!("  Completion: {}", ledger.config().completion);
        println!("  Applied: {}", report.applied);
        println!("  Requests: {}", ledger.len());
        for status in RequestStatus::ALL {
            println!("    {status}: {}", counts.get(status));
        }
        if !ledger.is_empty() {
            println!("  Ledger:");
            for request in ledger.requests() {
                print_request_line(request);
            }
        }
        if !report.rejected.is_empty() {
            println!("  Rejected: {}", report.rejected.len());
            for rejected in &report.rejected {
                println!(
                    "    {} ({} {}): {}",
                    rejected.event_id, rejected.action, rejected.request_id, rejected.message
                );
            }
        }
    }
}
