//! Creation validator: admits a new swap request into a collection.
//!
//! Validation short-circuits in this order:
//! 1. requester and recipient differ
//! 2. requester offers `offered_skill`
//! 3. recipient offers `requested_skill`
//! 4. message is non-empty after trimming
//! 5. no pending/accepted request for the same exchange tuple

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::SwapError;
use crate::request::SwapRequest;
use crate::user::User;

/// Prefix for generated request ids.
pub const REQUEST_ID_PREFIX: &str = "swap-";

/// What the requester filled in when proposing a swap.
#[derive(Debug, Clone)]
pub struct SwapDraft {
    pub offered_skill: String,
    pub requested_skill: String,
    pub message: String,
    /// Caller-chosen id; generated when `None`.
    pub request_id: Option<String>,
    pub now: DateTime<Utc>,
}

impl SwapDraft {
    pub fn new(
        offered_skill: impl Into<String>,
        requested_skill: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            offered_skill: offered_skill.into(),
            requested_skill: requested_skill.into(),
            message: message.into(),
            request_id: None,
            now: Utc::now(),
        }
    }

    pub fn with_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

/// Validate `draft` against both participants and the existing collection.
///
/// Returns the new pending request; the caller appends it. `existing` is only
/// read.
pub fn create_request<'a>(
    existing: impl IntoIterator<Item = &'a SwapRequest>,
    from_user: &User,
    to_user: &User,
    draft: SwapDraft,
) -> Result<SwapRequest, SwapError> {
    if from_user.id == to_user.id {
        return Err(SwapError::SelfSwap {
            user_id: from_user.id.clone(),
        });
    }
    if !from_user.offers(&draft.offered_skill) {
        return Err(SwapError::SkillNotOffered {
            user_id: from_user.id.clone(),
            skill: draft.offered_skill,
        });
    }
    if !to_user.offers(&draft.requested_skill) {
        return Err(SwapError::SkillNotAvailable {
            user_id: to_user.id.clone(),
            skill: draft.requested_skill,
        });
    }
    if draft.message.trim().is_empty() {
        return Err(SwapError::EmptyMessage);
    }

    let mut request_id_taken = false;
    for request in existing {
        if request.status().is_active()
            && request.matches_exchange(
                &from_user.id,
                &to_user.id,
                &draft.offered_skill,
                &draft.requested_skill,
            )
        {
            return Err(SwapError::DuplicateRequest {
                existing_id: request.id().to_string(),
            });
        }
        if draft.request_id.as_deref() == Some(request.id()) {
            request_id_taken = true;
        }
    }

    let id = match draft.request_id {
        Some(id) if request_id_taken => return Err(SwapError::RequestIdConflict(id)),
        Some(id) => id,
        None => format!("{REQUEST_ID_PREFIX}{}", Uuid::new_v4()),
    };

    SwapRequest::new(
        id,
        from_user.id.clone(),
        to_user.id.clone(),
        draft.offered_skill,
        draft.requested_skill,
        &draft.message,
        draft.now,
    )
}
