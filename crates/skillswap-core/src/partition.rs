//! Viewer partitioning: received/sent views and per-status tallies.
//!
//! Views are derived on every read and never cached.

use serde::Serialize;

use crate::request::{RequestStatus, SwapRequest};

/// Requests involving one viewer, split by direction.
///
/// Both sequences keep collection order. A request can never sit in both,
/// since requester and recipient always differ.
#[derive(Debug, Clone)]
pub struct ViewerPartition<'a> {
    pub viewer_id: &'a str,
    pub received: Vec<&'a SwapRequest>,
    pub sent: Vec<&'a SwapRequest>,
}

pub fn partition<'a>(
    requests: impl IntoIterator<Item = &'a SwapRequest>,
    viewer_id: &'a str,
) -> ViewerPartition<'a> {
    let mut received = Vec::new();
    let mut sent = Vec::new();
    for request in requests {
        if request.to_user_id() == viewer_id {
            received.push(request);
        } else if request.from_user_id() == viewer_id {
            sent.push(request);
        }
    }
    ViewerPartition {
        viewer_id,
        received,
        sent,
    }
}

pub fn count_by_status<'a>(
    requests: impl IntoIterator<Item = &'a SwapRequest>,
    status: RequestStatus,
) -> usize {
    requests
        .into_iter()
        .filter(|request| request.status() == status)
        .count()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn tally<'a>(requests: impl IntoIterator<Item = &'a SwapRequest>) -> Self {
        let mut counts = Self::default();
        for request in requests {
            *counts.slot(request.status()) += 1;
        }
        counts
    }

    pub fn get(&self, status: RequestStatus) -> usize {
        match status {
            RequestStatus::Pending => self.pending,
            RequestStatus::Accepted => self.accepted,
            RequestStatus::Rejected => self.rejected,
            RequestStatus::Completed => self.completed,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.accepted + self.rejected + self.completed
    }

    fn slot(&mut self, status: RequestStatus) -> &mut usize {
        match status {
            RequestStatus::Pending => &mut self.pending,
            RequestStatus::Accepted => &mut self.accepted,
            RequestStatus::Rejected => &mut self.rejected,
            RequestStatus::Completed => &mut self.completed,
        }
    }
}

/// Quick-stat summary shown above a viewer's request tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerSummary {
    pub viewer_id: String,
    pub received_total: usize,
    pub sent_total: usize,
    pub received: StatusCounts,
    pub sent: StatusCounts,
    /// Pending requests awaiting the viewer's answer.
    pub pending_received: usize,
    /// Accepted swaps in either direction.
    pub active: usize,
}

/// Owned summary plus request lists, ready for serialization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerDashboard {
    pub summary: ViewerSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<RequestStatus>,
    pub received: Vec<SwapRequest>,
    pub sent: Vec<SwapRequest>,
}

impl ViewerPartition<'_> {
    pub fn received_count(&self, status: RequestStatus) -> usize {
        count_by_status(self.received.iter().copied(), status)
    }

    pub fn sent_count(&self, status: RequestStatus) -> usize {
        count_by_status(self.sent.iter().copied(), status)
    }

    pub fn active_count(&self) -> usize {
        self.received_count(RequestStatus::Accepted) + self.sent_count(RequestStatus::Accepted)
    }

    pub fn summary(&self) -> ViewerSummary {
        let received = StatusCounts::tally(self.received.iter().copied());
        let sent = StatusCounts::tally(self.sent.iter().copied());
        ViewerSummary {
            viewer_id: self.viewer_id.to_string(),
            received_total: self.received.len(),
            sent_total: self.sent.len(),
            pending_received: received.pending,
            active: received.accepted + sent.accepted,
            received,
            sent,
        }
    }

    /// Owned dashboard; `status_filter` narrows the lists, not the summary.
    pub fn dashboard(&self, status_filter: Option<RequestStatus>) -> ViewerDashboard {
        let keep = |request: &&SwapRequest| status_filter.is_none_or(|s| request.status() == s);
        ViewerDashboard {
            summary: self.summary(),
            status_filter,
            received: self.received.iter().copied().filter(keep).cloned().collect(),
            sent: self.sent.iter().copied().filter(keep).cloned().collect(),
        }
    }
}
