//! Swap request: the entity the lifecycle engine moves between statuses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::error::SwapError;

/// Lowest star rating accepted for a completed swap.
pub const RATING_MIN: u8 = 1;
/// Highest star rating accepted for a completed swap.
pub const RATING_MAX: u8 = 5;

/// Lifecycle status of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::Accepted,
        RequestStatus::Rejected,
        RequestStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Completed => "completed",
        }
    }

    /// Terminal statuses admit no further status change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Completed)
    }

    /// Pending and accepted requests hold their exchange tuple.
    pub fn is_active(&self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::Accepted)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(RequestStatus::Pending),
            "accepted" => Ok(RequestStatus::Accepted),
            "rejected" => Ok(RequestStatus::Rejected),
            "completed" => Ok(RequestStatus::Completed),
            other => Err(format!(
                "unknown request status {other:?} (expected pending, accepted, rejected, or completed)"
            )),
        }
    }
}

/// A proposal from one user to exchange an offered skill for a requested one.
///
/// Identity is the `id` alone: two requests with identical content but
/// different ids are different requests. Fields are read through accessors;
/// only the lifecycle engine mutates status, rating and version.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    id: String,
    from_user_id: String,
    to_user_id: String,
    offered_skill: String,
    requested_skill: String,
    message: String,
    status: RequestStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rating: Option<u8>,
    #[serde(default)]
    version: u64,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    completion_confirmed_by: BTreeSet<String>,
}

impl SwapRequest {
    /// Build a fresh pending request after structural checks.
    ///
    /// Skill membership and duplicate detection are the creation validator's
    /// job; this only guards shape.
    pub fn new(
        id: impl Into<String>,
        from_user_id: impl Into<String>,
        to_user_id: impl Into<String>,
        offered_skill: impl Into<String>,
        requested_skill: impl Into<String>,
        message: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, SwapError> {
        let from_user_id = from_user_id.into();
        let to_user_id = to_user_id.into();
        if from_user_id == to_user_id {
            return Err(SwapError::SelfSwap {
                user_id: from_user_id,
            });
        }

        let offered_skill = offered_skill.into();
        let requested_skill = requested_skill.into();
        if offered_skill.trim().is_empty() || requested_skill.trim().is_empty() {
            return Err(SwapError::EmptySkill);
        }

        let message = message.trim();
        if message.is_empty() {
            return Err(SwapError::EmptyMessage);
        }

        Ok(Self {
            id: id.into(),
            from_user_id,
            to_user_id,
            offered_skill,
            requested_skill,
            message: message.to_string(),
            status: RequestStatus::Pending,
            created_at,
            updated_at: created_at,
            rating: None,
            version: 0,
            completion_confirmed_by: BTreeSet::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn from_user_id(&self) -> &str {
        &self.from_user_id
    }

    pub fn to_user_id(&self) -> &str {
        &self.to_user_id
    }

    pub fn offered_skill(&self) -> &str {
        &self.offered_skill
    }

    pub fn requested_skill(&self) -> &str {
        &self.requested_skill
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Participants that confirmed completion under the bilateral policy.
    pub fn completion_confirmed_by(&self) -> impl Iterator<Item = &str> {
        self.completion_confirmed_by.iter().map(String::as_str)
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.from_user_id == user_id || self.to_user_id == user_id
    }

    /// Whether `other` proposes the same exchange (requester, recipient, skills).
    pub fn same_exchange(&self, other: &SwapRequest) -> bool {
        self.matches_exchange(
            &other.from_user_id,
            &other.to_user_id,
            &other.offered_skill,
            &other.requested_skill,
        )
    }

    pub fn matches_exchange(
        &self,
        from_user_id: &str,
        to_user_id: &str,
        offered_skill: &str,
        requested_skill: &str,
    ) -> bool {
        self.from_user_id == from_user_id
            && self.to_user_id == to_user_id
            && self.offered_skill == offered_skill
            && self.requested_skill == requested_skill
    }

    /// Re-check the invariants a deserialized record must satisfy.
    pub fn check_invariants(&self) -> Result<(), SwapError> {
        let corrupt = |reason: &str| SwapError::CorruptRecord {
            request_id: self.id.clone(),
            reason: reason.to_string(),
        };

        if self.id.trim().is_empty() {
            return Err(corrupt("empty id"));
        }
        if self.from_user_id == self.to_user_id {
            return Err(corrupt("requester and recipient are the same user"));
        }
        if self.offered_skill.trim().is_empty() || self.requested_skill.trim().is_empty() {
            return Err(corrupt("empty skill"));
        }
        if self.message.trim().is_empty() {
            return Err(corrupt("empty message"));
        }
        match self.rating {
            Some(_) if self.status != RequestStatus::Completed => {
                return Err(corrupt("rating present on a request that is not completed"));
            }
            Some(value) if !(RATING_MIN..=RATING_MAX).contains(&value) => {
                return Err(corrupt("rating out of range"));
            }
            _ => {}
        }
        if !self.completion_confirmed_by.is_empty()
            && !matches!(self.status, RequestStatus::Accepted | RequestStatus::Completed)
        {
            return Err(corrupt("completion confirmations on a request that was never accepted"));
        }
        if self
            .completion_confirmed_by
            .iter()
            .any(|user_id| !self.is_participant(user_id))
        {
            return Err(corrupt("completion confirmed by a non-participant"));
        }
        Ok(())
    }

    pub(crate) fn set_status(&mut self, status: RequestStatus, now: DateTime<Utc>) {
        self.status = status;
        self.touch(now);
    }

    pub(crate) fn set_rating(&mut self, value: u8, now: DateTime<Utc>) {
        self.rating = Some(value);
        self.touch(now);
    }

    pub(crate) fn confirm_completion(&mut self, actor: &str, now: DateTime<Utc>) {
        self.completion_confirmed_by.insert(actor.to_string());
        self.touch(now);
    }

    pub(crate) fn has_confirmed_completion(&self, actor: &str) -> bool {
        self.completion_confirmed_by.contains(actor)
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.version += 1;
    }
}

impl PartialEq for SwapRequest {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SwapRequest {}

impl Hash for SwapRequest {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
