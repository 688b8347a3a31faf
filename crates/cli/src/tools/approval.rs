// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Human-in-the-loop approval for tool calls.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::oneshot;

/// The user's answer to an approval request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approve,
    Deny,
}

/// A pending question for the user, answered exactly once.
///
/// Dropping the request without answering counts as a denial.
#[derive(Debug)]
pub struct ApprovalRequest {
    pub call_id: String,
    pub tool: String,
    pub details: String,
    responder: oneshot::Sender<ApprovalDecision>,
}

impl ApprovalRequest {
    /// Create a request and the receiver its answer arrives on
    pub fn new(
        call_id: impl Into<String>,
        tool: impl Into<String>,
        details: impl Into<String>,
    ) -> (Self, oneshot::Receiver<ApprovalDecision>) {
        let (responder, rx) = oneshot::channel();
        (
            Self {
                call_id: call_id.into(),
                tool: tool.into(),
                details: details.into(),
                responder,
            },
            rx,
        )
    }

    pub fn respond(self, decision: ApprovalDecision) {
        // The waiting run may already be gone.
        let _ = self.responder.send(decision);
    }
}

/// Receives approval requests from the controller.
pub trait ApprovalHandler: Send + Sync {
    fn request(&self, request: ApprovalRequest);

    /// The run that asked is gone; deny whatever is still unanswered.
    fn deny_pending(&self) {}
}

/// Approves everything without asking
#[derive(Clone, Debug, Default)]
pub struct AutoApprove;

impl ApprovalHandler for AutoApprove {
    fn request(&self, request: ApprovalRequest) {
        request.respond(ApprovalDecision::Approve);
    }
}

/// Summary of the request at the head of an [`ApprovalQueue`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingApproval {
    pub call_id: String,
    pub tool: String,
    pub details: String,
}

/// FIFO of requests answered later by the UI
#[derive(Clone, Debug, Default)]
pub struct ApprovalQueue {
    inner: Arc<Mutex<VecDeque<ApprovalRequest>>>,
}

impl ApprovalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn front(&self) -> Option<PendingApproval> {
        self.inner.lock().front().map(|r| PendingApproval {
            call_id: r.call_id.clone(),
            tool: r.tool.clone(),
            details: r.details.clone(),
        })
    }

    /// Answer the oldest request. Returns false if none was waiting.
    pub fn respond_front(&self, decision: ApprovalDecision) -> bool {
        let Some(request) = self.inner.lock().pop_front() else {
            return false;
        };
        request.respond(decision);
        true
    }

    /// Deny everything still waiting
    pub fn deny_all(&self) {
        let drained: Vec<_> = self.inner.lock().drain(..).collect();
        for request in drained {
            request.respond(ApprovalDecision::Deny);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl ApprovalHandler for ApprovalQueue {
    fn request(&self, request: ApprovalRequest) {
        tracing::debug!(call_id = %request.call_id, tool = %request.tool, "approval queued");
        self.inner.lock().push_back(request);
    }

    fn deny_pending(&self) {
        self.deny_all();
    }
}

#[cfg(test)]
#[path = "approval_tests.rs"]
mod tests;
