//! Event-log surface for driving a ledger from recorded operations.
//!
//! `skillswap.event.v1` is one JSON object per line:
//! - `create` events carry the draft; the actor is the requester
//! - lifecycle events (`accept`, `reject`, `delete`, `complete`, `rate`)
//!   name the request and the acting user
//!
//! A `rate` value must be a JSON integer. Any integer parses and is
//! range-checked by the ledger; a non-integer is a parse error for its line.
//!
//! Replay is deterministic: request ids and timestamps come from the events,
//! never from the clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::config::EngineConfig;
use crate::create::SwapDraft;
use crate::directory::UserDirectory;
use crate::error::SwapError;
use crate::ledger::SwapLedger;
use crate::lifecycle::{SwapAction, SwapCommand};

pub const SWAP_EVENT_SCHEMA: &str = "skillswap.event.v1";

fn default_swap_event_schema() -> String {
    SWAP_EVENT_SCHEMA.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SwapEventAction {
    Create {
        to_user_id: String,
        offered_skill: String,
        requested_skill: String,
        message: String,
    },
    Accept,
    Reject,
    Delete,
    Complete,
    /// Integer stars; the ledger checks the range per event.
    Rate {
        value: i64,
    },
}

impl SwapEventAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapEventAction::Create { .. } => "create",
            SwapEventAction::Accept => "accept",
            SwapEventAction::Reject => "reject",
            SwapEventAction::Delete => "delete",
            SwapEventAction::Complete => "complete",
            SwapEventAction::Rate { .. } => "rate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapEvent {
    #[serde(default = "default_swap_event_schema")]
    pub schema: String,
    pub event_id: String,
    pub request_id: String,
    pub actor: String,
    pub occurred_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
    #[serde(flatten)]
    pub action: SwapEventAction,
}

impl SwapEvent {
    /// `event_id` must be unique within a log; it is how refusals are reported.
    pub fn new(
        event_id: impl Into<String>,
        request_id: impl Into<String>,
        actor: impl Into<String>,
        occurred_at: DateTime<Utc>,
        action: SwapEventAction,
    ) -> Self {
        Self {
            schema: SWAP_EVENT_SCHEMA.to_string(),
            event_id: event_id.into(),
            request_id: request_id.into(),
            actor: actor.into(),
            occurred_at,
            expected_version: None,
            action,
        }
    }
}

pub fn read_events(reader: impl BufRead) -> Result<Vec<SwapEvent>, EventError> {
    let mut events = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| EventError::LineIo(line_no + 1, e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let event: SwapEvent = serde_json::from_str(trimmed)
            .map_err(|e| EventError::Parse(line_no + 1, e.to_string()))?;
        events.push(event);
    }
    Ok(events)
}

pub fn write_events(writer: &mut impl Write, events: &[SwapEvent]) -> Result<(), EventError> {
    for event in events {
        let line =
            serde_json::to_string(event).map_err(|e| EventError::Serialize(e.to_string()))?;
        writeln!(writer, "{line}").map_err(|e| EventError::Io(e.to_string()))?;
    }
    Ok(())
}

pub fn read_events_from_path(path: impl AsRef<Path>) -> Result<Vec<SwapEvent>, EventError> {
    let file = File::open(path.as_ref())
        .map_err(|e| EventError::Io(format!("{}: {e}", path.as_ref().display())))?;
    read_events(BufReader::new(file))
}

/// How replay treats an event the ledger refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplayMode {
    /// Stop at the first refused event.
    #[default]
    Strict,
    /// Record the refusal, skip the event, keep going.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedEvent {
    pub event_id: String,
    pub request_id: String,
    pub action: &'static str,
    pub kind: crate::error::ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub ledger: SwapLedger,
    pub applied: usize,
    pub rejected: Vec<RejectedEvent>,
}

/// Apply `events` in order to a fresh ledger.
pub fn replay_events(
    directory: &UserDirectory,
    events: &[SwapEvent],
    config: EngineConfig,
    mode: ReplayMode,
) -> Result<ReplayReport, EventError> {
    let mut ledger = SwapLedger::new(config);
    let mut applied = 0;
    let mut rejected = Vec::new();

    for event in events {
        if event.schema != SWAP_EVENT_SCHEMA {
            return Err(EventError::UnsupportedSchema(event.schema.clone()));
        }

        match apply_event(&mut ledger, directory, event)? {
            Ok(()) => applied += 1,
            Err(source) if mode == ReplayMode::Lenient => {
                tracing::warn!(
                    event_id = %event.event_id,
                    request_id = %event.request_id,
                    error = %source,
                    "replay skipped refused event"
                );
                rejected.push(RejectedEvent {
                    event_id: event.event_id.clone(),
                    request_id: event.request_id.clone(),
                    action: event.action.as_str(),
                    kind: source.kind(),
                    message: source.to_string(),
                });
            }
            Err(source) => {
                return Err(EventError::Refused {
                    event_id: event.event_id.clone(),
                    source,
                });
            }
        }
    }

    tracing::info!(
        events = events.len(),
        applied,
        rejected = rejected.len(),
        requests = ledger.len(),
        "replay finished"
    );
    Ok(ReplayReport {
        ledger,
        applied,
        rejected,
    })
}

/// Outer error: the event cannot be interpreted at all.
/// Inner error: the ledger refused a well-formed event.
fn apply_event(
    ledger: &mut SwapLedger,
    directory: &UserDirectory,
    event: &SwapEvent,
) -> Result<Result<(), SwapError>, EventError> {
    let unknown_user = |user_id: &str| EventError::UnknownUser {
        event_id: event.event_id.clone(),
        user_id: user_id.to_string(),
    };

    let action = match &event.action {
        SwapEventAction::Create {
            to_user_id,
            offered_skill,
            requested_skill,
            message,
        } => {
            let from_user = directory
                .user(&event.actor)
                .ok_or_else(|| unknown_user(&event.actor))?;
            let to_user = directory
                .user(to_user_id)
                .ok_or_else(|| unknown_user(to_user_id))?;
            let draft = SwapDraft::new(offered_skill, requested_skill, message)
                .with_id(&event.request_id)
                .at(event.occurred_at);
            return Ok(ledger.create_request(from_user, to_user, draft).map(|_| ()));
        }
        SwapEventAction::Accept => SwapAction::Accept,
        SwapEventAction::Reject => SwapAction::Reject,
        SwapEventAction::Delete => SwapAction::Delete,
        SwapEventAction::Complete => SwapAction::Complete,
        SwapEventAction::Rate { value } => SwapAction::Rate { value: *value },
    };

    let mut command =
        SwapCommand::new(&event.request_id, &event.actor, action).at(event.occurred_at);
    command.expected_version = event.expected_version;
    Ok(ledger.apply(command).map(|_| ()))
}

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("line {0}: I/O error: {1}")]
    LineIo(usize, String),

    #[error("line {0}: parse error: {1}")]
    Parse(usize, String),

    #[error("serialization error: {0}")]
    Serialize(String),

    #[error("unsupported event schema: {0}")]
    UnsupportedSchema(String),

    #[error("event {event_id} references unknown user {user_id}")]
    UnknownUser { event_id: String, user_id: String },

    #[error("event {event_id} refused: {source}")]
    Refused {
        event_id: String,
        #[source]
        source: SwapError,
    },
}
