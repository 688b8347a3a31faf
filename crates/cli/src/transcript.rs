// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Append-only chat transcript.
//!
//! Entries are never removed or reordered. Only the text of messages, the
//! lines of tool blocks and the status fields of tool calls change after an
//! entry is appended.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

/// Process-unique, monotonically increasing entry id
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out entry ids. Clones share the counter.
#[derive(Clone, Debug, Default)]
pub struct IdGenerator {
    next: Arc<AtomicU64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start numbering at `first`
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(first)),
        }
    }

    pub fn next_id(&self) -> EntryId {
        EntryId(self.next.fetch_add(1, Ordering::SeqCst))
    }
}

/// Author of a message entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Model,
    Thinking,
    System,
}

/// Lifecycle of a structured tool call
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolStatus {
    Pending,
    Executing,
    Confirming,
    Complete,
    Error,
    Cancelled,
}

impl ToolStatus {
    pub const ALL: [ToolStatus; 6] = [
        ToolStatus::Pending,
        ToolStatus::Executing,
        ToolStatus::Confirming,
        ToolStatus::Complete,
        ToolStatus::Error,
        ToolStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolStatus::Pending => "pending",
            ToolStatus::Executing => "executing",
            ToolStatus::Confirming => "confirming",
            ToolStatus::Complete => "complete",
            ToolStatus::Error => "error",
            ToolStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the call has reached a final state
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ToolStatus::Complete | ToolStatus::Error | ToolStatus::Cancelled
        )
    }
}

/// A structured tool call requested by the model
#[derive(Clone, Debug, PartialEq)]
pub struct ToolCallEntry {
    pub id: EntryId,
    /// Backend correlation key
    pub call_id: String,
    pub name: String,
    pub params: Value,
    pub status: ToolStatus,
    pub output: Option<String>,
    pub error_message: Option<String>,
    pub confirmation: Option<String>,
}

/// Output of a user shell command, streamed line by line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolBlockEntry {
    pub id: EntryId,
    pub lines: Vec<String>,
    pub is_batch: bool,
    pub streaming: bool,
    pub scrollable: bool,
    pub max_height: Option<u16>,
}

/// One transcript entry
#[derive(Clone, Debug, PartialEq)]
pub enum ChatEntry {
    Message { id: EntryId, role: Role, text: String },
    ToolBlock(ToolBlockEntry),
    ToolCall(ToolCallEntry),
}

impl ChatEntry {
    pub fn id(&self) -> EntryId {
        match self {
            ChatEntry::Message { id, .. } => *id,
            ChatEntry::ToolBlock(block) => block.id,
            ChatEntry::ToolCall(call) => call.id,
        }
    }
}

/// Options for a new tool block
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolBlockOptions {
    pub is_batch: bool,
    pub scrollable: bool,
    pub max_height: Option<u16>,
}

/// Partial update applied to a tool call. `None` fields are left as they are.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToolCallUpdate {
    pub status: Option<ToolStatus>,
    pub output: Option<String>,
    pub error_message: Option<String>,
    pub confirmation: Option<String>,
}

impl ToolCallUpdate {
    pub fn status(status: ToolStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_confirmation(mut self, details: impl Into<String>) -> Self {
        self.confirmation = Some(details.into());
        self
    }
}

/// Ordered list of chat entries
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<ChatEntry>,
    ids: IdGenerator,
    revision: u64,
}

/// Transcript shared between the controller, commands and the UI
pub type SharedTranscript = Arc<Mutex<Transcript>>;

impl Transcript {
    pub fn new(ids: IdGenerator) -> Self {
        Self {
            entries: Vec::new(),
            ids,
            revision: 0,
        }
    }

    pub fn shared(ids: IdGenerator) -> SharedTranscript {
        Arc::new(Mutex::new(Self::new(ids)))
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bumped on every mutation; lets renderers skip unchanged frames
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn push(&mut self, entry: ChatEntry) -> EntryId {
        let id = entry.id();
        self.entries.push(entry);
        self.revision += 1;
        id
    }

    pub fn append_message(&mut self, role: Role, text: impl Into<String>) -> EntryId {
        let id = self.ids.next_id();
        self.push(ChatEntry::Message {
            id,
            role,
            text: text.into(),
        })
    }

    /// Append text to an existing message. Returns false if `id` is not a message.
    pub fn append_to_message(&mut self, id: EntryId, delta: &str) -> bool {
        let Some(ChatEntry::Message { text, .. }) = self.entry_mut(id) else {
            return false;
        };
        text.push_str(delta);
        self.revision += 1;
        true
    }

    pub fn append_tool_block(&mut self, options: ToolBlockOptions) -> EntryId {
        let id = self.ids.next_id();
        self.push(ChatEntry::ToolBlock(ToolBlockEntry {
            id,
            lines: Vec::new(),
            is_batch: options.is_batch,
            streaming: true,
            scrollable: options.scrollable,
            max_height: options.max_height,
        }))
    }

    pub fn append_tool_block_line(&mut self, id: EntryId, line: impl Into<String>) -> bool {
        let Some(ChatEntry::ToolBlock(block)) = self.entry_mut(id) else {
            return false;
        };
        block.lines.push(line.into());
        self.revision += 1;
        true
    }

    /// Clear the streaming flag of a tool block
    pub fn finish_tool_block(&mut self, id: EntryId) -> bool {
        let Some(ChatEntry::ToolBlock(block)) = self.entry_mut(id) else {
            return false;
        };
        block.streaming = false;
        self.revision += 1;
        true
    }

    pub fn append_tool_call(
        &mut self,
        call_id: impl Into<String>,
        name: impl Into<String>,
        params: Value,
    ) -> EntryId {
        let id = self.ids.next_id();
        self.push(ChatEntry::ToolCall(ToolCallEntry {
            id,
            call_id: call_id.into(),
            name: name.into(),
            params,
            status: ToolStatus::Pending,
            output: None,
            error_message: None,
            confirmation: None,
        }))
    }

    /// Apply `update` to the most recent tool call with `call_id`.
    ///
    /// Returns false when no such call exists.
    pub fn update_tool_call(&mut self, call_id: &str, update: ToolCallUpdate) -> bool {
        let Some(call) = self.tool_call_mut(call_id) else {
            return false;
        };
        if let Some(status) = update.status {
            call.status = status;
        }
        if update.output.is_some() {
            call.output = update.output;
        }
        if update.error_message.is_some() {
            call.error_message = update.error_message;
        }
        if update.confirmation.is_some() {
            call.confirmation = update.confirmation;
        }
        self.revision += 1;
        true
    }

    pub fn find_tool_call(&self, call_id: &str) -> Option<&ToolCallEntry> {
        self.entries.iter().rev().find_map(|e| match e {
            ChatEntry::ToolCall(call) if call.call_id == call_id => Some(call),
            _ => None,
        })
    }

    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCallEntry> {
        self.entries.iter().filter_map(|e| match e {
            ChatEntry::ToolCall(call) => Some(call),
            _ => None,
        })
    }

    fn tool_call_mut(&mut self, call_id: &str) -> Option<&mut ToolCallEntry> {
        self.entries.iter_mut().rev().find_map(|e| match e {
            ChatEntry::ToolCall(call) if call.call_id == call_id => Some(call),
            _ => None,
        })
    }

    // Ids are monotonic, so entries are sorted by id.
    fn entry_mut(&mut self, id: EntryId) -> Option<&mut ChatEntry> {
        let idx = self.entries.binary_search_by_key(&id, ChatEntry::id).ok()?;
        self.entries.get_mut(idx)
    }
}

#[cfg(test)]
#[path = "transcript_tests.rs"]
mod tests;
