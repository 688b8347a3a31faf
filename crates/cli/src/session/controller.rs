// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Single-flight streaming controller.
//!
//! Each submission starts a run. Starting a run, or cancelling, advances the
//! [`Generation`] and cancels the previous run's token, so at most one run
//! can write to the transcript. Every write re-checks that its run is still
//! current and that the UI is still mounted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::generation::{Generation, RunId};
use super::stats::SessionStats;
use crate::backend::{Backend, BackendEvent, EventStream, TurnRequest};
use crate::config::{EmojiFilter, SessionConfig, SharedSessionConfig};
use crate::emoji::{contains_emoji, strip_emoji, WordCounter};
use crate::tools::{
    ApprovalDecision, ApprovalHandler, ApprovalRequest, ToolExecutor, ToolRequest, ToolResponse,
};
use crate::transcript::{
    EntryId, Role, SharedTranscript, ToolCallUpdate, ToolStatus, Transcript,
};

/// Whether a run is in flight
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StreamState {
    #[default]
    Idle,
    Streaming,
}

struct ActiveRun {
    run: RunId,
    cancel: CancellationToken,
}

struct Inner {
    backend: Arc<dyn Backend>,
    tools: Arc<dyn ToolExecutor>,
    approvals: Arc<dyn ApprovalHandler>,
    transcript: SharedTranscript,
    config: SharedSessionConfig,
    stats: Mutex<SessionStats>,
    generation: Generation,
    mounted: AtomicBool,
    active: Mutex<Option<ActiveRun>>,
    state: Mutex<StreamState>,
}

/// Per-run bookkeeping
struct Turn {
    run: RunId,
    cancel: CancellationToken,
    config: SessionConfig,
    open_model: Option<EntryId>,
    open_thinking: Option<EntryId>,
    last_role: Option<Role>,
    queue: Vec<ToolRequest>,
    words: WordCounter,
    emoji_warned: bool,
}

impl Turn {
    fn close_messages(&mut self) {
        self.open_model = None;
        self.open_thinking = None;
        self.last_role = None;
        self.words.break_word();
    }
}

/// How consumption of one event stream ended
enum Flow {
    /// The stream drained or sent `complete`
    Drained,
    /// Superseded, cancelled or failed: stop the run
    Stop,
}

/// Drives runs against a [`Backend`]. Clones share the same controller.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

impl SessionController {
    pub fn new(
        backend: Arc<dyn Backend>,
        tools: Arc<dyn ToolExecutor>,
        approvals: Arc<dyn ApprovalHandler>,
        transcript: SharedTranscript,
        config: SharedSessionConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                tools,
                approvals,
                transcript,
                config,
                stats: Mutex::new(SessionStats::default()),
                generation: Generation::new(),
                mounted: AtomicBool::new(true),
                active: Mutex::new(None),
                state: Mutex::new(StreamState::Idle),
            }),
        }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.inner.backend
    }

    pub fn transcript(&self) -> &SharedTranscript {
        &self.inner.transcript
    }

    pub fn config(&self) -> &SharedSessionConfig {
        &self.inner.config
    }

    pub fn state(&self) -> StreamState {
        *self.inner.state.lock()
    }

    pub fn is_streaming(&self) -> bool {
        self.state() == StreamState::Streaming
    }

    pub fn stats(&self) -> SessionStats {
        *self.inner.stats.lock()
    }

    pub fn current_run(&self) -> RunId {
        self.inner.generation.current()
    }

    /// Cancellation token of the run in flight
    pub fn active_token(&self) -> Option<CancellationToken> {
        self.inner.active.lock().as_ref().map(|a| a.cancel.clone())
    }

    /// Start a run for `prompt` on the current tokio runtime.
    pub fn submit(&self, prompt: impl Into<String>) -> RunId {
        let (run, cancel) = self.begin();
        let this = self.clone();
        let prompt = prompt.into();
        tokio::spawn(async move { this.drive(run, cancel, prompt).await });
        run
    }

    /// Record `prompt` as a user message and start a run for it.
    ///
    /// The generation advances before the message is appended, so a run
    /// this one supersedes cannot write between the two.
    pub fn send(&self, prompt: impl Into<String>) -> RunId {
        let prompt = prompt.into();
        let (run, cancel) = self.begin();
        self.write(run, |t| t.append_message(Role::User, prompt.as_str()));
        let this = self.clone();
        tokio::spawn(async move { this.drive(run, cancel, prompt).await });
        run
    }

    /// Start a run and wait for it to end.
    pub async fn run(&self, prompt: impl Into<String>) -> RunId {
        let (run, cancel) = self.begin();
        self.drive(run, cancel, prompt.into()).await;
        run
    }

    /// Stop the run in flight. Idempotent.
    pub fn cancel(&self) {
        let run = self.inner.generation.advance();
        if let Some(active) = self.inner.active.lock().take() {
            tracing::info!(run_id = active.run.0, "run cancelled");
            active.cancel.cancel();
            self.inner.approvals.deny_pending();
        }
        *self.inner.state.lock() = StreamState::Idle;
        tracing::debug!(run_id = run.0, "generation advanced by cancel");
    }

    /// The UI is going away: drop all further writes and stop the backend.
    pub fn unmount(&self) {
        self.inner.mounted.store(false, Ordering::SeqCst);
        if let Some(active) = self.inner.active.lock().take() {
            active.cancel.cancel();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.load(Ordering::SeqCst)
    }

    fn begin(&self) -> (RunId, CancellationToken) {
        let run = self.inner.generation.advance();
        let cancel = CancellationToken::new();
        let previous = self.inner.active.lock().replace(ActiveRun {
            run,
            cancel: cancel.clone(),
        });
        if let Some(previous) = previous {
            tracing::debug!(run_id = run.0, superseded = previous.run.0, "run superseded");
            previous.cancel.cancel();
            self.inner.approvals.deny_pending();
        }
        *self.inner.state.lock() = StreamState::Streaming;
        tracing::debug!(run_id = run.0, "run started");
        (run, cancel)
    }

    fn is_live(&self, run: RunId) -> bool {
        self.is_mounted() && self.inner.generation.is_current(run)
    }

    /// Apply `f` to the transcript if `run` may still write.
    fn write<R>(&self, run: RunId, f: impl FnOnce(&mut Transcript) -> R) -> Option<R> {
        let mut transcript = self.inner.transcript.lock();
        if !self.is_live(run) {
            return None;
        }
        Some(f(&mut transcript))
    }

    fn finish(&self, run: RunId) {
        if !self.is_live(run) {
            return;
        }
        *self.inner.state.lock() = StreamState::Idle;
        let mut active = self.inner.active.lock();
        if active.as_ref().is_some_and(|a| a.run == run) {
            *active = None;
        }
        tracing::debug!(run_id = run.0, "run finished");
    }

    async fn drive(&self, run: RunId, cancel: CancellationToken, prompt: String) {
        let config = self.inner.config.lock().clone();

        let missing = self.inner.backend.validate(&config);
        if !missing.is_empty() {
            tracing::warn!(run_id = run.0, missing = missing.len(), "session config incomplete");
            let mut text = String::from("Cannot send message:");
            for item in &missing {
                text.push_str("\n- ");
                text.push_str(item);
            }
            self.write(run, |t| t.append_message(Role::System, text));
            self.finish(run);
            return;
        }

        self.inner.stats.lock().turns += 1;
        let mut turn = Turn {
            run,
            cancel,
            config,
            open_model: None,
            open_thinking: None,
            last_role: None,
            queue: Vec::new(),
            words: WordCounter::new(),
            emoji_warned: false,
        };

        let mut request = TurnRequest::Prompt(prompt);
        loop {
            let stream = self
                .inner
                .backend
                .stream(&turn.config, request, turn.cancel.clone());
            if let Flow::Stop = self.consume(&mut turn, stream).await {
                break;
            }
            if turn.queue.is_empty() {
                break;
            }
            let Some(responses) = self.execute_tools(&mut turn).await else {
                break;
            };
            if responses.is_empty() || !self.is_live(run) {
                break;
            }
            turn.close_messages();
            self.inner.stats.lock().continuations += 1;
            tracing::debug!(run_id = run.0, responses = responses.len(), "continuing with tool responses");
            request = TurnRequest::ToolResponses(responses);
        }

        self.finish(run);
    }

    async fn consume(&self, turn: &mut Turn, mut stream: EventStream) -> Flow {
        loop {
            let next = tokio::select! {
                biased;
                _ = turn.cancel.cancelled() => return Flow::Stop,
                next = stream.next() => next,
            };
            let Some(item) = next else {
                return Flow::Drained;
            };
            if !self.is_live(turn.run) {
                return Flow::Stop;
            }
            match item {
                Ok(BackendEvent::Complete) => return Flow::Drained,
                Ok(event) => self.apply(turn, event),
                Err(err) => {
                    if turn.cancel.is_cancelled() {
                        return Flow::Stop;
                    }
                    tracing::warn!(run_id = turn.run.0, error = %err, "backend stream failed");
                    let text = format!("Error: {err}");
                    self.write(turn.run, |t| t.append_message(Role::System, text));
                    return Flow::Stop;
                }
            }
        }
    }

    fn apply(&self, turn: &mut Turn, event: BackendEvent) {
        let run = turn.run;
        match event {
            BackendEvent::TextDelta { text } => self.delta(turn, Role::Model, text),
            BackendEvent::ThinkingDelta { text } => self.delta(turn, Role::Thinking, text),
            BackendEvent::ToolPending {
                call_id,
                name,
                params,
            } => {
                tracing::debug!(run_id = run.0, call_id = %call_id, tool = %name, "tool pending");
                let appended = self.write(run, |t| {
                    t.append_tool_call(call_id.clone(), name.clone(), params.clone())
                });
                turn.close_messages();
                if appended.is_some() {
                    turn.queue.push(ToolRequest {
                        call_id,
                        name,
                        params,
                    });
                }
            }
            BackendEvent::ToolResult {
                call_id,
                output,
                error,
            } => {
                let status = if error.is_some() {
                    ToolStatus::Error
                } else {
                    ToolStatus::Complete
                };
                let update = ToolCallUpdate {
                    status: Some(status),
                    output,
                    error_message: error,
                    confirmation: None,
                };
                self.write(run, |t| t.update_tool_call(&call_id, update));
            }
            BackendEvent::ToolConfirmation { call_id, details } => {
                let name = self.write(run, |t| {
                    t.update_tool_call(
                        &call_id,
                        ToolCallUpdate::status(ToolStatus::Confirming)
                            .with_confirmation(details.clone()),
                    );
                    t.find_tool_call(&call_id).map(|c| c.name.clone())
                });
                let Some(name) = name else {
                    return;
                };
                let (request, answer) =
                    ApprovalRequest::new(call_id.clone(), name.unwrap_or_default(), details);
                self.inner.approvals.request(request);
                let backend = self.inner.backend.clone();
                tokio::spawn(async move {
                    let decision = answer.await.unwrap_or(ApprovalDecision::Deny);
                    backend.resolve_confirmation(&call_id, decision);
                });
            }
            BackendEvent::ToolCancelled { call_id } => {
                self.write(run, |t| {
                    t.update_tool_call(&call_id, ToolCallUpdate::status(ToolStatus::Cancelled))
                });
            }
            BackendEvent::Error { message } => {
                tracing::warn!(run_id = run.0, message = %message, "backend reported error");
                let text = format!("Error: {message}");
                self.write(run, |t| t.append_message(Role::System, text));
            }
            BackendEvent::Complete => {}
            BackendEvent::Unknown => {
                tracing::debug!(run_id = run.0, "ignoring unknown backend event");
            }
        }
    }

    fn delta(&self, turn: &mut Turn, role: Role, text: String) {
        let mut warn = false;
        let text = match turn.config.emoji_filter {
            EmojiFilter::Auto => strip_emoji(&text),
            EmojiFilter::Allowed => text,
            EmojiFilter::Warn => {
                if !turn.emoji_warned && contains_emoji(&text) {
                    turn.emoji_warned = true;
                    warn = true;
                }
                text
            }
        };

        if turn.last_role != Some(role) {
            turn.words.break_word();
            turn.last_role = Some(role);
        }
        let words = turn.words.feed(&text);
        self.inner.stats.lock().words += words;

        let open = match role {
            Role::Thinking => &mut turn.open_thinking,
            _ => &mut turn.open_model,
        };
        match *open {
            Some(id) => {
                self.write(turn.run, |t| t.append_to_message(id, &text));
            }
            None if text.trim().is_empty() => {}
            None => *open = self.write(turn.run, |t| t.append_message(role, text)),
        }

        if warn {
            self.write(turn.run, |t| {
                t.append_message(Role::System, "Warning: the model used emoji (emoji filter: warn)")
            });
        }
    }

    /// Run queued tool calls one at a time.
    ///
    /// Returns `None` when the run stopped while tools were running.
    async fn execute_tools(&self, turn: &mut Turn) -> Option<Vec<ToolResponse>> {
        let run = turn.run;
        let queue = std::mem::take(&mut turn.queue);
        let mut responses = Vec::with_capacity(queue.len());

        for request in queue {
            if !self.is_live(run) {
                return None;
            }
            let status = self
                .inner
                .transcript
                .lock()
                .find_tool_call(&request.call_id)
                .map(|c| c.status);
            if status != Some(ToolStatus::Pending) {
                // Already resolved by backend events
                continue;
            }

            if let Some(details) = self.inner.tools.confirmation(&request) {
                self.write(run, |t| {
                    t.update_tool_call(
                        &request.call_id,
                        ToolCallUpdate::status(ToolStatus::Confirming)
                            .with_confirmation(details.clone()),
                    )
                });
                let (approval, answer) =
                    ApprovalRequest::new(request.call_id.clone(), request.name.clone(), details);
                self.inner.approvals.request(approval);
                let decision = tokio::select! {
                    _ = turn.cancel.cancelled() => return None,
                    decision = answer => decision.unwrap_or(ApprovalDecision::Deny),
                };
                if !self.is_live(run) {
                    return None;
                }
                if decision == ApprovalDecision::Deny {
                    tracing::info!(run_id = run.0, call_id = %request.call_id, tool = %request.name, "tool denied");
                    self.write(run, |t| {
                        t.update_tool_call(
                            &request.call_id,
                            ToolCallUpdate::status(ToolStatus::Cancelled),
                        )
                    });
                    responses.push(ToolResponse::denied(&request.call_id, &request.name));
                    continue;
                }
            }

            self.write(run, |t| {
                t.update_tool_call(&request.call_id, ToolCallUpdate::status(ToolStatus::Executing))
            });
            tracing::info!(
                run_id = run.0,
                call_id = %request.call_id,
                tool = %request.name,
                executor = self.inner.tools.name(),
                "executing tool"
            );
            let result = tokio::select! {
                _ = turn.cancel.cancelled() => return None,
                result = self.inner.tools.execute(&request) => result,
            };
            match result {
                Ok(output) => {
                    self.write(run, |t| {
                        t.update_tool_call(
                            &request.call_id,
                            ToolCallUpdate::status(ToolStatus::Complete).with_output(output.clone()),
                        )
                    });
                    responses.push(ToolResponse::ok(&request.call_id, &request.name, output));
                }
                Err(err) => {
                    tracing::warn!(run_id = run.0, call_id = %request.call_id, error = %err, "tool failed");
                    let message = err.to_string();
                    self.write(run, |t| {
                        t.update_tool_call(
                            &request.call_id,
                            ToolCallUpdate::status(ToolStatus::Error).with_error(message.clone()),
                        )
                    });
                    responses.push(ToolResponse::failed(&request.call_id, &request.name, message));
                }
            }
        }
        Some(responses)
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state())
            .field("run", &self.current_run())
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
