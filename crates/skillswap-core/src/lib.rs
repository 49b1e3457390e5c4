//! # skillswap-core
//!
//! Lifecycle engine for swap requests between marketplace users.
//!
//! This crate provides:
//! - `SwapRequest` and `RequestStatus` (the entity model)
//! - `SwapLedger` (single-owner in-memory request collection)
//! - lifecycle planning for accept/reject/delete/complete/rate
//! - viewer partitioning and per-status tallies
//! - creation validation against both participants' skill sets
//! - `skillswap.event.v1` JSONL event log and deterministic replay
//!
//! It intentionally does not persist state or talk to the network.
//! Those concerns belong to whatever wraps the ledger.
//!
//! ## Data flow
//!
//! ```text
//! User directory + SwapDraft
//!     │  create::create_request
//! SwapLedger (insertion-ordered requests)
//!     │  lifecycle::plan → Effect
//! SwapLedger (mutated in place)
//!     │  partition::partition
//! ViewerPartition / ViewerSummary
//! ```

pub mod config;
pub mod create;
pub mod directory;
pub mod error;
pub mod events;
pub mod ledger;
pub mod lifecycle;
pub mod partition;
pub mod request;
pub mod user;

pub use config::{CompletionPolicy, ConfigError, EngineConfig};
pub use create::{SwapDraft, create_request};
pub use directory::{DirectoryError, UserDirectory, read_users, read_users_from_path};
pub use error::{ErrorKind, SwapError};
pub use events::{
    EventError, RejectedEvent, ReplayMode, ReplayReport, SWAP_EVENT_SCHEMA, SwapEvent,
    SwapEventAction, read_events, read_events_from_path, replay_events, write_events,
};
pub use ledger::SwapLedger;
pub use lifecycle::{Effect, Role, SwapAction, SwapCommand, plan};
pub use partition::{
    StatusCounts, ViewerDashboard, ViewerPartition, ViewerSummary, count_by_status, partition,
};
pub use request::{RATING_MAX, RATING_MIN, RequestStatus, SwapRequest};
pub use user::User;
