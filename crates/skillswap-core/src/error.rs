//! Error types for swap-request operations.
//!
//! Every variant is an expected business-rule violation. None of them leave
//! the ledger partially mutated.

use crate::request::RequestStatus;

/// Errors arising from creating or transitioning swap requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapError {
    /// Requester and recipient are the same user.
    #[error("cannot request a swap with yourself: {user_id}")]
    SelfSwap { user_id: String },

    /// The requester does not offer the skill they put up for exchange.
    #[error("user {user_id} does not offer skill {skill:?}")]
    SkillNotOffered { user_id: String, skill: String },

    /// The recipient does not offer the requested skill.
    #[error("user {user_id} does not offer requested skill {skill:?}")]
    SkillNotAvailable { user_id: String, skill: String },

    #[error("swap message must not be empty")]
    EmptyMessage,

    #[error("skill name must not be empty")]
    EmptySkill,

    /// An active request for the same exchange already exists.
    #[error("an active request for this exchange already exists: {existing_id}")]
    DuplicateRequest { existing_id: String },

    /// The action is not an edge out of the current status.
    #[error("cannot {action} request {request_id} while it is {status}")]
    InvalidTransition {
        request_id: String,
        status: RequestStatus,
        action: &'static str,
    },

    /// The acting user does not hold the role this action requires.
    #[error("user {actor} may not {action} request {request_id}")]
    Unauthorized {
        request_id: String,
        actor: String,
        action: &'static str,
    },

    #[error("request {request_id} has already been rated")]
    AlreadyRated { request_id: String },

    #[error(
        "rating must be in range [{min}, {max}] (got {value})",
        min = crate::request::RATING_MIN,
        max = crate::request::RATING_MAX
    )]
    InvalidRange { value: i64 },

    /// The request changed since the caller last read it.
    #[error("request {request_id} changed concurrently: expected version {expected}, found {actual}")]
    ConcurrentModification {
        request_id: String,
        expected: u64,
        actual: u64,
    },

    #[error("request not found: {0}")]
    RequestNotFound(String),

    #[error("request id already in use: {0}")]
    RequestIdConflict(String),

    #[error("user {actor} already confirmed completion of request {request_id}")]
    CompletionAlreadyConfirmed { request_id: String, actor: String },

    /// A hydrated record violates a ledger invariant.
    #[error("corrupt request {request_id}: {reason}")]
    CorruptRecord { request_id: String, reason: String },
}

/// Flat classification of [`SwapError`] for presentation mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SelfSwap,
    SkillNotOffered,
    SkillNotAvailable,
    EmptyMessage,
    EmptySkill,
    DuplicateRequest,
    InvalidTransition,
    Unauthorized,
    AlreadyRated,
    InvalidRange,
    ConcurrentModification,
    RequestNotFound,
    RequestIdConflict,
    CompletionAlreadyConfirmed,
    CorruptRecord,
}

impl SwapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SwapError::SelfSwap { .. } => ErrorKind::SelfSwap,
            SwapError::SkillNotOffered { .. } => ErrorKind::SkillNotOffered,
            SwapError::SkillNotAvailable { .. } => ErrorKind::SkillNotAvailable,
            SwapError::EmptyMessage => ErrorKind::EmptyMessage,
            SwapError::EmptySkill => ErrorKind::EmptySkill,
            SwapError::DuplicateRequest { .. } => ErrorKind::DuplicateRequest,
            SwapError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            SwapError::Unauthorized { .. } => ErrorKind::Unauthorized,
            SwapError::AlreadyRated { .. } => ErrorKind::AlreadyRated,
            SwapError::InvalidRange { .. } => ErrorKind::InvalidRange,
            SwapError::ConcurrentModification { .. } => ErrorKind::ConcurrentModification,
            SwapError::RequestNotFound(_) => ErrorKind::RequestNotFound,
            SwapError::RequestIdConflict(_) => ErrorKind::RequestIdConflict,
            SwapError::CompletionAlreadyConfirmed { .. } => ErrorKind::CompletionAlreadyConfirmed,
            SwapError::CorruptRecord { .. } => ErrorKind::CorruptRecord,
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SelfSwap => "self_swap",
            ErrorKind::SkillNotOffered => "skill_not_offered",
            ErrorKind::SkillNotAvailable => "skill_not_available",
            ErrorKind::EmptyMessage => "empty_message",
            ErrorKind::EmptySkill => "empty_skill",
            ErrorKind::DuplicateRequest => "duplicate_request",
            ErrorKind::InvalidTransition => "invalid_transition",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::AlreadyRated => "already_rated",
            ErrorKind::InvalidRange => "invalid_range",
            ErrorKind::ConcurrentModification => "concurrent_modification",
            ErrorKind::RequestNotFound => "request_not_found",
            ErrorKind::RequestIdConflict => "request_id_conflict",
            ErrorKind::CompletionAlreadyConfirmed => "completion_already_confirmed",
            ErrorKind::CorruptRecord => "corrupt_record",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_as_snake_case_tag() {
        let err = SwapError::ConcurrentModification {
            request_id: "swap-1".to_string(),
            expected: 1,
            actual: 2,
        };
        let kind = err.kind();
        assert_eq!(kind, ErrorKind::ConcurrentModification);
        assert_eq!(
            serde_json::to_value(kind).expect("kind should serialize"),
            serde_json::json!(kind.as_str())
        );
    }

    #[test]
    fn invalid_transition_message_names_status_and_action() {
        let err = SwapError::InvalidTransition {
            request_id: "swap-1".to_string(),
            status: RequestStatus::Accepted,
            action: "delete",
        };
        assert_eq!(
            err.to_string(),
            "cannot delete request swap-1 while it is accepted"
        );
    }

    #[test]
    fn invalid_range_message_includes_bounds() {
        let err = SwapError::InvalidRange { value: 9 };
        assert_eq!(err.to_string(), "rating must be in range [1, 5] (got 9)");
    }
}
