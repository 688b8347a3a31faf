// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Tool execution for model-requested tool calls.

mod approval;
mod builtin;

pub use approval::{
    ApprovalDecision, ApprovalHandler, ApprovalQueue, ApprovalRequest, AutoApprove, PendingApproval,
};
pub use builtin::BuiltinTools;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A tool call waiting to be executed
#[derive(Clone, Debug, PartialEq)]
pub struct ToolRequest {
    pub call_id: String,
    pub name: String,
    pub params: Value,
}

impl ToolRequest {
    /// String parameter `key`, if present
    pub fn str_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }

    pub fn require_str(&self, key: &'static str) -> Result<&str, ToolError> {
        self.str_param(key).ok_or_else(|| ToolError::MissingParam {
            tool: self.name.clone(),
            param: key,
        })
    }
}

/// Outcome of one tool call, sent back to the backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToolResponse {
    pub call_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The user declined to run the tool
    pub denied: bool,
}

impl ToolResponse {
    pub fn ok(call_id: impl Into<String>, name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            output: Some(output.into()),
            error: None,
            denied: false,
        }
    }

    pub fn failed(
        call_id: impl Into<String>,
        name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            output: None,
            error: Some(error.into()),
            denied: false,
        }
    }

    pub fn denied(call_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            name: name.into(),
            output: None,
            error: Some("The user denied this tool call".to_string()),
            denied: true,
        }
    }
}

/// Errors from a single tool execution
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool '{0}'")]
    Unknown(String),

    #[error("Tool execution is disabled")]
    Disabled,

    #[error("Missing parameter '{param}' for {tool}")]
    MissingParam { tool: String, param: &'static str },

    #[error("Invalid search pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid glob '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Tool task failed: {0}")]
    Task(String),
}

/// Runs tool calls for the session controller.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, request: &ToolRequest) -> Result<String, ToolError>;

    /// Text to show the user before running `request`, or `None` when the
    /// call needs no approval.
    fn confirmation(&self, _request: &ToolRequest) -> Option<String> {
        None
    }

    /// Executor name for logging
    fn name(&self) -> &'static str;
}

/// Executor used with `--no-tools`: every call fails.
#[derive(Clone, Debug, Default)]
pub struct DisabledTools;

#[async_trait]
impl ToolExecutor for DisabledTools {
    async fn execute(&self, _request: &ToolRequest) -> Result<String, ToolError> {
        Err(ToolError::Disabled)
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
