// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! LLM backend contract.
//!
//! A backend turns a [`TurnRequest`] into a stream of [`BackendEvent`]s.
//! The controller consumes that stream; nothing else about the provider
//! (transport, auth, wire format) leaks past this module.

mod scripted;
mod streaming;

pub use scripted::{ProviderSpec, RulePattern, Script, ScriptRule, ScriptedBackend};
pub use streaming::{ChunkedText, StreamingConfig};

use std::path::PathBuf;

use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::{validate_session_config, SessionConfig};
use crate::tools::{ApprovalDecision, ToolResponse};

/// One event from the backend's response stream.
///
/// Unrecognised `type` tags deserialize to [`BackendEvent::Unknown`] and
/// are ignored by consumers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendEvent {
    TextDelta {
        text: String,
    },
    ThinkingDelta {
        text: String,
    },
    ToolPending {
        call_id: String,
        name: String,
        #[serde(default)]
        params: Value,
    },
    ToolResult {
        call_id: String,
        #[serde(default)]
        output: Option<String>,
        #[serde(default)]
        error: Option<String>,
    },
    ToolConfirmation {
        call_id: String,
        details: String,
    },
    ToolCancelled {
        call_id: String,
    },
    Error {
        message: String,
    },
    Complete,
    #[serde(other)]
    Unknown,
}

/// What a turn asks the backend for
#[derive(Clone, Debug, PartialEq)]
pub enum TurnRequest {
    /// A user prompt
    Prompt(String),
    /// Results of the tools requested in the previous turn
    ToolResponses(Vec<ToolResponse>),
}

/// A model offered by a provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: Some(description.into()),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Errors raised by backends
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Failed to read script '{path}': {source}")]
    ScriptIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse script '{path}': {message}")]
    ScriptParse { path: PathBuf, message: String },

    #[error("{0}")]
    Transport(String),
}

/// Boxed event stream returned by [`Backend::stream`]
pub type EventStream = BoxStream<'static, Result<BackendEvent, BackendError>>;

/// An LLM provider as seen by the session controller.
pub trait Backend: Send + Sync {
    /// Start a turn. The stream should end promptly once `cancel` fires.
    fn stream(
        &self,
        config: &SessionConfig,
        request: TurnRequest,
        cancel: CancellationToken,
    ) -> EventStream;

    fn list_providers(&self) -> Vec<String>;

    fn list_models(&self, provider: &str) -> Vec<ModelInfo>;

    /// Missing-field messages; empty when the config is usable.
    fn validate(&self, config: &SessionConfig) -> Vec<String> {
        validate_session_config(config)
    }

    /// Deliver the user's answer to a backend-originated confirmation.
    fn resolve_confirmation(&self, _call_id: &str, _decision: ApprovalDecision) {}
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
