// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Line formatting for every region of the screen.
//!
//! Everything here is a pure function from state to styled lines, so the
//! iocraft component only stacks the results.

use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::colors::{bold, dim, highlight, paint, Palette};
use super::modal::Picker;
use crate::completion::CompletionManager;
use crate::config::SessionConfig;
use crate::session::SessionStats;
use crate::transcript::{ChatEntry, Role, ToolBlockEntry, ToolCallEntry, ToolStatus};

/// Rows of tool output shown under a completed call
const TOOL_OUTPUT_PREVIEW: usize = 4;

/// Rows the completion menu may take
pub const MENU_ROWS: usize = 8;

pub fn header_line(config: &SessionConfig, palette: &Palette) -> String {
    let provider = config.provider.as_deref().unwrap_or("no provider");
    let model = config.model.as_deref().unwrap_or("no model");
    format!(
        "{} {}",
        bold("palaver", palette),
        paint(
            &format!("{provider} · {model} · {}", config.theme),
            palette.muted
        )
    )
}

pub fn separator(width: usize, palette: &Palette) -> String {
    dim(&"─".repeat(width), palette)
}

pub fn status_glyph(status: ToolStatus) -> &'static str {
    match status {
        ToolStatus::Pending => "○",
        ToolStatus::Executing => "◐",
        ToolStatus::Confirming => "?",
        ToolStatus::Complete => "✓",
        ToolStatus::Error => "✗",
        ToolStatus::Cancelled => "⊘",
    }
}

fn role_prefix(role: Role) -> &'static str {
    match role {
        Role::User => "> ",
        Role::Model => "  ",
        Role::Thinking => "∴ ",
        Role::System => "! ",
    }
}

/// Every transcript entry as wrapped, styled lines with a blank row between entries.
pub fn transcript_lines(
    entries: &[ChatEntry],
    show_thinking: bool,
    palette: &Palette,
    width: usize,
) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in entries {
        let rendered = match entry {
            ChatEntry::Message { role: Role::Thinking, .. } if !show_thinking => continue,
            ChatEntry::Message { role, text, .. } => message_lines(*role, text, palette, width),
            ChatEntry::ToolBlock(block) => tool_block_lines(block, palette, width),
            ChatEntry::ToolCall(call) => tool_call_lines(call, palette, width),
        };
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(rendered);
    }
    lines
}

fn message_lines(role: Role, text: &str, palette: &Palette, width: usize) -> Vec<String> {
    let prefix = role_prefix(role);
    let indent = " ".repeat(prefix.width());
    let wrap_width = width.saturating_sub(prefix.width()).max(1);
    let color = palette.role(role);

    let mut lines = Vec::new();
    for (i, line) in wrap(text, wrap_width).into_iter().enumerate() {
        let lead = if i == 0 { prefix } else { indent.as_str() };
        let body = format!("{lead}{line}");
        lines.push(if role == Role::Thinking {
            dim(&body, palette)
        } else {
            paint(&body, color)
        });
    }
    lines
}

fn tool_block_lines(block: &ToolBlockEntry, palette: &Palette, width: usize) -> Vec<String> {
    let limit = block.max_height.map_or(usize::MAX, usize::from);
    let hidden = block.lines.len().saturating_sub(limit);
    let mut lines = Vec::new();
    if hidden > 0 {
        lines.push(dim(&format!("  … {hidden} earlier lines"), palette));
    }
    for line in &block.lines[hidden..] {
        lines.push(paint(&truncate(&format!("  {line}"), width), palette.tool));
    }
    if block.streaming {
        lines.push(dim("  running…", palette));
    }
    lines
}

fn tool_call_lines(call: &ToolCallEntry, palette: &Palette, width: usize) -> Vec<String> {
    let head = format!(
        "{} {}({})",
        status_glyph(call.status),
        call.name,
        params_summary(&call.params)
    );
    let mut lines = vec![paint(&truncate(&head, width), palette.status(call.status))];

    let detail = |text: &str| truncate(&format!("  ⎿ {text}"), width);
    match call.status {
        ToolStatus::Confirming => {
            if let Some(confirmation) = &call.confirmation {
                lines.push(paint(&detail(confirmation), palette.accent));
            }
        }
        ToolStatus::Error => {
            let message = call.error_message.as_deref().unwrap_or("failed");
            lines.push(paint(&detail(message), palette.error));
        }
        ToolStatus::Cancelled => lines.push(dim(&detail("cancelled"), palette)),
        ToolStatus::Complete => {
            let output = call.output.as_deref().unwrap_or_default();
            let total = output.lines().count();
            for line in output.lines().take(TOOL_OUTPUT_PREVIEW) {
                lines.push(dim(&detail(line), palette));
            }
            if total > TOOL_OUTPUT_PREVIEW {
                lines.push(dim(
                    &detail(&format!("… {} more lines", total - TOOL_OUTPUT_PREVIEW)),
                    palette,
                ));
            }
        }
        ToolStatus::Pending | ToolStatus::Executing => {}
    }
    lines
}

/// `key: value` pairs of an object, or the compact JSON of anything else
pub fn params_summary(params: &Value) -> String {
    match params {
        Value::Null => String::new(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{k}: {s}"),
                other => format!("{k}: {other}"),
            })
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// The visible slice of the completion menu, highlighted row inverted.
pub fn menu_lines(completion: &CompletionManager, palette: &Palette, width: usize) -> Vec<String> {
    let (start, shown) = completion.visible(MENU_ROWS);
    let selected = completion.state().selected;
    let label_width = shown
        .iter()
        .map(|s| s.label().width())
        .max()
        .unwrap_or(0);

    shown
        .iter()
        .enumerate()
        .map(|(i, suggestion)| {
            let label = suggestion.label();
            let pad = " ".repeat(label_width - label.width());
            let row = match suggestion.description() {
                Some(description) => format!("  {label}{pad}  {description}"),
                None => format!("  {label}"),
            };
            let row = truncate(&row, width);
            if start + i == selected {
                highlight(&row, palette)
            } else {
                paint(&row, palette.muted)
            }
        })
        .collect()
}

/// The input row with a block cursor at byte offset `cursor`.
pub fn input_line(text: &str, cursor: usize, palette: &Palette) -> String {
    let cursor = cursor.min(text.len());
    let (before, rest) = text.split_at(cursor);
    let mut chars = rest.chars();
    let under = chars.next().map_or(" ".to_string(), String::from);
    let after: String = chars.collect();
    let prompt = paint("› ", palette.accent);
    if palette.is_plain() {
        format!("{prompt}{before}{under}{after}")
    } else {
        format!("{prompt}{before}{}{after}", highlight(&under, palette))
    }
}

pub fn status_line(
    streaming: bool,
    spinner: &str,
    verb: &str,
    stats: SessionStats,
    palette: &Palette,
) -> String {
    let text = if streaming {
        format!("{spinner} {verb}… · {} words · esc to cancel", stats.words)
    } else {
        format!(
            "{} turns · {} words · / for commands · @ to mention · ! for shell",
            stats.turns, stats.words
        )
    };
    dim(&text, palette)
}

pub fn picker_lines(picker: &Picker, palette: &Palette, width: usize) -> Vec<String> {
    let mut lines = vec![bold(&truncate(picker.title(), width), palette), String::new()];
    if picker.items().is_empty() {
        lines.push(dim("  Nothing to choose from", palette));
    }
    for (i, item) in picker.items().iter().enumerate() {
        let cursor = if i == picker.highlighted() { "❯" } else { " " };
        let check = if picker.is_current(i) { " ✔" } else { "" };
        let row = match &item.description {
            Some(d) => format!(" {cursor} {}. {}{check}  {d}", i + 1, item.label),
            None => format!(" {cursor} {}. {}{check}", i + 1, item.label),
        };
        let row = truncate(&row, width);
        lines.push(if i == picker.highlighted() {
            paint(&row, palette.accent)
        } else {
            row
        });
    }
    lines.push(String::new());
    lines.push(dim(" Enter to confirm · esc to close", palette));
    lines
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    textwrap::wrap(text, width)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Cut `text` to at most `width` display columns.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
