// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Built-in backend that replays scripted responses.
//!
//! Script files are TOML (or JSON when the extension is `.json`). Rule
//! patterns are case-insensitive regular expressions:
//!
//! ```toml
//! [[rules]]
//! pattern = "readme"
//! events = [
//!   { type = "text_delta", text = "Let me look." },
//!   { type = "tool_pending", call_id = "t1", name = "read_file", params = { path = "README.md" } },
//! ]
//! continuation = [{ type = "text_delta", text = "That file describes the project." }]
//! ```

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use parking_lot::Mutex;
use regex::Regex;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::{Backend, BackendError, BackendEvent, EventStream, ModelInfo, StreamingConfig, TurnRequest};
use crate::config::SessionConfig;
use crate::time::{Clock, ClockHandle};
use crate::tools::ApprovalDecision;

/// Provider name used when a script declares none
pub const DEFAULT_PROVIDER: &str = "scripted";

/// A provider and its models
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProviderSpec {
    pub name: String,
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

/// Case-insensitive regex tested against the prompt.
///
/// Compiled when the script is parsed, so a bad pattern fails the load.
/// The empty pattern matches every prompt.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(try_from = "String")]
pub struct RulePattern {
    source: String,
    regex: Option<Regex>,
}

impl RulePattern {
    pub fn new(source: impl Into<String>) -> Result<Self, regex::Error> {
        let source = source.into();
        let regex = if source.is_empty() {
            None
        } else {
            Some(Regex::new(&format!("(?i){source}"))?)
        };
        Ok(Self { source, regex })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, prompt: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(prompt),
            None => true,
        }
    }
}

impl TryFrom<String> for RulePattern {
    type Error = regex::Error;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Self::new(source)
    }
}

impl PartialEq for RulePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A canned reply selected by matching the prompt
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScriptRule {
    #[serde(default)]
    pub pattern: RulePattern,

    #[serde(default)]
    pub events: Vec<BackendEvent>,

    /// Answers the tool-response turn that follows this reply
    #[serde(default)]
    pub continuation: Vec<BackendEvent>,

    /// End the stream with a transport error carrying this message
    #[serde(default)]
    pub fail: Option<String>,
}

impl ScriptRule {
    pub fn matches(&self, prompt: &str) -> bool {
        self.pattern.is_match(prompt)
    }
}

/// Parsed script file
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub providers: Vec<ProviderSpec>,

    /// Checked in order; the first match answers
    #[serde(default)]
    pub rules: Vec<ScriptRule>,

    /// Reply for prompts no rule matches
    #[serde(default)]
    pub default: Option<ScriptRule>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, BackendError> {
        let content = std::fs::read_to_string(path).map_err(|source| BackendError::ScriptIo {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str(&content).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| BackendError::ScriptParse {
            path: path.to_path_buf(),
            message,
        })
    }

    fn reply_for(&self, prompt: &str) -> ScriptRule {
        self.rules
            .iter()
            .find(|r| r.matches(prompt))
            .or(self.default.as_ref())
            .cloned()
            .unwrap_or_else(|| ScriptRule {
                events: vec![BackendEvent::TextDelta {
                    text: format!("You said: {}", prompt.trim()),
                }],
                ..ScriptRule::default()
            })
    }
}

fn builtin_providers() -> Vec<ProviderSpec> {
    vec![ProviderSpec {
        name: DEFAULT_PROVIDER.to_string(),
        models: vec![
            ModelInfo::new("echo-small", "Short scripted replies"),
            ModelInfo::new("echo-large", "Long scripted replies"),
        ],
    }]
}

enum Step {
    Emit {
        event: BackendEvent,
        delay: Option<Duration>,
    },
    Fail(String),
}

struct Playback {
    steps: VecDeque<Step>,
    clock: ClockHandle,
    cancel: CancellationToken,
}

/// Backend answering from a [`Script`]
pub struct ScriptedBackend {
    script: Script,
    streaming: StreamingConfig,
    clock: ClockHandle,
    continuation: Mutex<Option<Vec<BackendEvent>>>,
    resolved: Mutex<Vec<(String, ApprovalDecision)>>,
}

impl ScriptedBackend {
    pub fn new(script: Script, streaming: StreamingConfig, clock: ClockHandle) -> Self {
        Self {
            script,
            streaming,
            clock,
            continuation: Mutex::new(None),
            resolved: Mutex::new(Vec::new()),
        }
    }

    /// Confirmations delivered through [`Backend::resolve_confirmation`]
    pub fn resolved_confirmations(&self) -> Vec<(String, ApprovalDecision)> {
        self.resolved.lock().clone()
    }

    fn plan(&self, request: &TurnRequest) -> (Vec<BackendEvent>, Option<String>) {
        match request {
            TurnRequest::Prompt(prompt) => {
                let rule = self.script.reply_for(prompt);
                *self.continuation.lock() =
                    Some(rule.continuation).filter(|events| !events.is_empty());
                (rule.events, rule.fail)
            }
            TurnRequest::ToolResponses(_) => {
                (self.continuation.lock().take().unwrap_or_default(), None)
            }
        }
    }

    fn steps(&self, events: Vec<BackendEvent>, fail: Option<String>) -> VecDeque<Step> {
        let delay = self.streaming.delay();
        let mut steps = VecDeque::new();
        for event in events {
            match event {
                BackendEvent::TextDelta { text } => {
                    steps.extend(self.streaming.chunks(&text).map(|text| Step::Emit {
                        event: BackendEvent::TextDelta { text },
                        delay,
                    }));
                }
                BackendEvent::ThinkingDelta { text } => {
                    steps.extend(self.streaming.chunks(&text).map(|text| Step::Emit {
                        event: BackendEvent::ThinkingDelta { text },
                        delay,
                    }));
                }
                event => steps.push_back(Step::Emit { event, delay: None }),
            }
        }
        match fail {
            Some(message) => steps.push_back(Step::Fail(message)),
            None => steps.push_back(Step::Emit {
                event: BackendEvent::Complete,
                delay: None,
            }),
        }
        steps
    }
}

impl Backend for ScriptedBackend {
    fn stream(
        &self,
        config: &SessionConfig,
        request: TurnRequest,
        cancel: CancellationToken,
    ) -> EventStream {
        tracing::debug!(
            provider = config.provider.as_deref().unwrap_or(""),
            model = config.model.as_deref().unwrap_or(""),
            "scripted turn"
        );
        let (events, fail) = self.plan(&request);
        let playback = Playback {
            steps: self.steps(events, fail),
            clock: self.clock.clone(),
            cancel,
        };

        futures::stream::unfold(playback, |mut pb| async move {
            let step = pb.steps.pop_front()?;
            if pb.cancel.is_cancelled() {
                return None;
            }
            match step {
                Step::Emit { event, delay } => {
                    if let Some(delay) = delay {
                        tokio::select! {
                            _ = pb.cancel.cancelled() => return None,
                            _ = pb.clock.sleep(delay) => {}
                        }
                    }
                    Some((Ok(event), pb))
                }
                Step::Fail(message) => {
                    pb.steps.clear();
                    Some((Err(BackendError::Transport(message)), pb))
                }
            }
        })
        .boxed()
    }

    fn list_providers(&self) -> Vec<String> {
        if self.script.providers.is_empty() {
            return builtin_providers().into_iter().map(|p| p.name).collect();
        }
        self.script.providers.iter().map(|p| p.name.clone()).collect()
    }

    fn list_models(&self, provider: &str) -> Vec<ModelInfo> {
        let find = |providers: &[ProviderSpec]| {
            providers
                .iter()
                .find(|p| p.name == provider)
                .map(|p| p.models.clone())
                .unwrap_or_default()
        };
        if self.script.providers.is_empty() {
            find(&builtin_providers())
        } else {
            find(&self.script.providers)
        }
    }

    fn resolve_confirmation(&self, call_id: &str, decision: ApprovalDecision) {
        tracing::info!(call_id, ?decision, "confirmation resolved");
        self.resolved.lock().push((call_id.to_string(), decision));
    }
}

#[cfg(test)]
#[path = "scripted_tests.rs"]
mod tests;
