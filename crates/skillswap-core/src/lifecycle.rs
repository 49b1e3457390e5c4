//! Lifecycle transitions for swap requests.
//!
//! ```text
//! pending  ──accept──▶ accepted ──complete──▶ completed ──rate──▶ completed (rated)
//!    │
//!    ├──reject──▶ rejected
//!    └──delete──▶ (removed)
//! ```
//!
//! `rejected` and `completed` are terminal. Only `rate` acts on a completed
//! request, and only once.
//!
//! Planning is pure: [`plan`] inspects one request and a [`SwapCommand`] and
//! either returns the [`Effect`] to apply or the first rule the command
//! breaks. Checks run in a fixed order:
//!
//! 1. expected version (when the caller supplies one)
//! 2. actor role
//! 3. edge exists from the current status
//! 4. `rate` only: rating unset, then value in range

use chrono::{DateTime, Utc};

use crate::config::CompletionPolicy;
use crate::error::SwapError;
use crate::request::{RATING_MAX, RATING_MIN, RequestStatus, SwapRequest};

/// An operation a participant can perform on an existing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapAction {
    Accept,
    Reject,
    Delete,
    Complete,
    /// Raw requested stars; range-checked during planning.
    Rate { value: i64 },
}

/// Which participant an action requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Requester,
    Recipient,
    Participant,
}

impl SwapAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapAction::Accept => "accept",
            SwapAction::Reject => "reject",
            SwapAction::Delete => "delete",
            SwapAction::Complete => "complete",
            SwapAction::Rate { .. } => "rate",
        }
    }

    pub fn required_role(&self) -> Role {
        match self {
            SwapAction::Accept | SwapAction::Reject => Role::Recipient,
            SwapAction::Delete => Role::Requester,
            SwapAction::Complete | SwapAction::Rate { .. } => Role::Participant,
        }
    }

    /// The only status this action may act on.
    pub fn source_status(&self) -> RequestStatus {
        match self {
            SwapAction::Accept | SwapAction::Reject | SwapAction::Delete => RequestStatus::Pending,
            SwapAction::Complete => RequestStatus::Accepted,
            SwapAction::Rate { .. } => RequestStatus::Completed,
        }
    }
}

impl Role {
    pub fn admits(&self, request: &SwapRequest, actor: &str) -> bool {
        match self {
            Role::Requester => request.from_user_id() == actor,
            Role::Recipient => request.to_user_id() == actor,
            Role::Participant => request.is_participant(actor),
        }
    }
}

/// One lifecycle operation against one request.
#[derive(Debug, Clone)]
pub struct SwapCommand {
    pub request_id: String,
    pub actor: String,
    pub action: SwapAction,
    /// Optimistic concurrency guard: the version the caller last read.
    pub expected_version: Option<u64>,
    pub now: DateTime<Utc>,
}

impl SwapCommand {
    pub fn new(
        request_id: impl Into<String>,
        actor: impl Into<String>,
        action: SwapAction,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            actor: actor.into(),
            action,
            expected_version: None,
            now: Utc::now(),
        }
    }

    pub fn expecting_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

/// What the ledger must do to apply a planned command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SetStatus(RequestStatus),
    Remove,
    /// Bilateral completion: record the actor's confirmation, status unchanged.
    ConfirmCompletion,
    SetRating(u8),
}

/// Decide the effect of `command` on `request` without mutating anything.
pub fn plan(
    request: &SwapRequest,
    command: &SwapCommand,
    completion: CompletionPolicy,
) -> Result<Effect, SwapError> {
    if let Some(expected) = command.expected_version
        && expected != request.version()
    {
        return Err(SwapError::ConcurrentModification {
            request_id: request.id().to_string(),
            expected,
            actual: request.version(),
        });
    }

    let action = command.action;
    if !action.required_role().admits(request, &command.actor) {
        return Err(SwapError::Unauthorized {
            request_id: request.id().to_string(),
            actor: command.actor.clone(),
            action: action.as_str(),
        });
    }

    if request.status() != action.source_status() {
        return Err(SwapError::InvalidTransition {
            request_id: request.id().to_string(),
            status: request.status(),
            action: action.as_str(),
        });
    }

    match action {
        SwapAction::Accept => Ok(Effect::SetStatus(RequestStatus::Accepted)),
        SwapAction::Reject => Ok(Effect::SetStatus(RequestStatus::Rejected)),
        SwapAction::Delete => Ok(Effect::Remove),
        SwapAction::Complete => plan_completion(request, &command.actor, completion),
        SwapAction::Rate { value } => {
            if request.rating().is_some() {
                return Err(SwapError::AlreadyRated {
                    request_id: request.id().to_string(),
                });
            }
            match u8::try_from(value) {
                Ok(stars) if (RATING_MIN..=RATING_MAX).contains(&stars) => {
                    Ok(Effect::SetRating(stars))
                }
                _ => Err(SwapError::InvalidRange { value }),
            }
        }
    }
}

fn plan_completion(
    request: &SwapRequest,
    actor: &str,
    completion: CompletionPolicy,
) -> Result<Effect, SwapError> {
    match completion {
        CompletionPolicy::Unilateral => Ok(Effect::SetStatus(RequestStatus::Completed)),
        CompletionPolicy::Bilateral => {
            if request.has_confirmed_completion(actor) {
                return Err(SwapError::CompletionAlreadyConfirmed {
                    request_id: request.id().to_string(),
                    actor: actor.to_string(),
                });
            }
            let counterpart = if request.from_user_id() == actor {
                request.to_user_id()
            } else {
                request.from_user_id()
            };
            if request.has_confirmed_completion(counterpart) {
                Ok(Effect::SetStatus(RequestStatus::Completed))
            } else {
                Ok(Effect::ConfirmCompletion)
            }
        }
    }
}
