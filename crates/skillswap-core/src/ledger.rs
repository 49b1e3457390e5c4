//! Single-owner in-memory collection of swap requests.
//!
//! Every mutation goes through this type:
//! - `create_request` (creation validator + append)
//! - `apply` and the named lifecycle operations
//!
//! Requests keep insertion order. A failed operation leaves the ledger
//! untouched.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::create::{SwapDraft, create_request};
use crate::error::SwapError;
use crate::lifecycle::{Effect, SwapAction, SwapCommand, plan};
use crate::partition::{ViewerPartition, partition};
use crate::request::{RequestStatus, SwapRequest};
use crate::user::User;

#[derive(Debug, Clone, Default)]
pub struct SwapLedger {
    requests: Vec<SwapRequest>,
    config: EngineConfig,
}

impl SwapLedger {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            requests: Vec::new(),
            config,
        }
    }

    /// Hydrate a ledger from existing records, re-checking every invariant.
    ///
    /// Duplicate ids and duplicate active exchanges are rejected.
    pub fn from_requests(
        requests: Vec<SwapRequest>,
        config: EngineConfig,
    ) -> Result<Self, SwapError> {
        let mut seen_ids = HashSet::new();
        for (index, request) in requests.iter().enumerate() {
            request.check_invariants()?;
            if !seen_ids.insert(request.id()) {
                return Err(SwapError::RequestIdConflict(request.id().to_string()));
            }
            if request.status().is_active()
                && let Some(earlier) = requests[..index]
                    .iter()
                    .find(|other| other.status().is_active() && other.same_exchange(request))
            {
                return Err(SwapError::CorruptRecord {
                    request_id: request.id().to_string(),
                    reason: format!("duplicates active exchange {}", earlier.id()),
                });
            }
        }
        Ok(Self { requests, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn request(&self, id: &str) -> Option<&SwapRequest> {
        self.requests.iter().find(|request| request.id() == id)
    }

    /// Iterate requests in insertion order.
    pub fn requests(&self) -> impl Iterator<Item = &SwapRequest> {
        self.requests.iter()
    }

    pub fn into_requests(self) -> Vec<SwapRequest> {
        self.requests
    }

    /// Validate a draft and append the resulting pending request.
    pub fn create_request(
        &mut self,
        from_user: &User,
        to_user: &User,
        draft: SwapDraft,
    ) -> Result<&SwapRequest, SwapError> {
        let request =
            create_request(&self.requests, from_user, to_user, draft).inspect_err(|err| {
                tracing::debug!(
                    from = %from_user.id,
                    to = %to_user.id,
                    error = %err,
                    "swap request refused"
                )
            })?;
        tracing::debug!(
            request_id = request.id(),
            from = request.from_user_id(),
            to = request.to_user_id(),
            "swap request created"
        );
        let index = self.requests.len();
        self.requests.push(request);
        Ok(&self.requests[index])
    }

    /// Plan and apply one lifecycle command.
    ///
    /// Returns the updated request, or `None` when the command removed it.
    pub fn apply(&mut self, command: SwapCommand) -> Result<Option<&SwapRequest>, SwapError> {
        let Some(index) = self
            .requests
            .iter()
            .position(|request| request.id() == command.request_id)
        else {
            return Err(SwapError::RequestNotFound(command.request_id));
        };

        let effect = plan(&self.requests[index], &command, self.config.completion).inspect_err(
            |err| {
                tracing::debug!(
                    request_id = %command.request_id,
                    actor = %command.actor,
                    action = command.action.as_str(),
                    error = %err,
                    "swap command rejected"
                )
            },
        )?;
        tracing::debug!(
            request_id = %command.request_id,
            actor = %command.actor,
            action = command.action.as_str(),
            effect = ?effect,
            "swap command applied"
        );

        match effect {
            Effect::Remove => {
                self.requests.remove(index);
                return Ok(None);
            }
            Effect::SetStatus(status) => self.requests[index].set_status(status, command.now),
            Effect::ConfirmCompletion => {
                self.requests[index].confirm_completion(&command.actor, command.now)
            }
            Effect::SetRating(value) => self.requests[index].set_rating(value, command.now),
        }
        Ok(Some(&self.requests[index]))
    }

    /// Recipient accepts a pending request.
    pub fn accept(&mut self, request_id: &str, actor: &str) -> Result<&SwapRequest, SwapError> {
        self.apply_expecting_update(SwapCommand::new(request_id, actor, SwapAction::Accept))
    }

    /// Recipient declines a pending request.
    pub fn reject(&mut self, request_id: &str, actor: &str) -> Result<&SwapRequest, SwapError> {
        self.apply_expecting_update(SwapCommand::new(request_id, actor, SwapAction::Reject))
    }

    /// Requester withdraws their own pending request; the entry is removed.
    pub fn delete_request(&mut self, request_id: &str, actor: &str) -> Result<(), SwapError> {
        self.apply(SwapCommand::new(request_id, actor, SwapAction::Delete))
            .map(|_| ())
    }

    /// Either participant marks an accepted swap as done.
    pub fn complete(&mut self, request_id: &str, actor: &str) -> Result<&SwapRequest, SwapError> {
        self.apply_expecting_update(SwapCommand::new(request_id, actor, SwapAction::Complete))
    }

    pub fn rate(
        &mut self,
        request_id: &str,
        actor: &str,
        value: i64,
    ) -> Result<&SwapRequest, SwapError> {
        self.apply_expecting_update(SwapCommand::new(
            request_id,
            actor,
            SwapAction::Rate { value },
        ))
    }

    fn apply_expecting_update(&mut self, command: SwapCommand) -> Result<&SwapRequest, SwapError> {
        let request_id = command.request_id.clone();
        self.apply(command)?
            .ok_or(SwapError::RequestNotFound(request_id))
    }

    /// Received/sent split for `viewer_id`, recomputed on every call.
    pub fn view<'a>(&'a self, viewer_id: &'a str) -> ViewerPartition<'a> {
        partition(&self.requests, viewer_id)
    }

    /// Requests currently in `status`, in insertion order.
    pub fn with_status(&self, status: RequestStatus) -> impl Iterator<Item = &SwapRequest> {
        self.requests
            .iter()
            .filter(move |request| request.status() == status)
    }
}
