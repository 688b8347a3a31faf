// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Decide which completion mode applies at the cursor.

/// Byte range in the input text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Completion mode under the cursor, with the text it would replace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompletionContext {
    /// `/cmd sub ...` at the start of a line.
    ///
    /// `parts` are the tokens after the slash up to the cursor. A trailing
    /// empty part means the cursor sits after whitespace and the next
    /// level should be listed.
    Slash { span: Span, parts: Vec<String> },
    /// `@path` token under the cursor. `query` is the text between the `@`
    /// and the cursor.
    Mention { span: Span, query: String },
}

impl CompletionContext {
    pub fn span(&self) -> Span {
        match self {
            CompletionContext::Slash { span, .. } | CompletionContext::Mention { span, .. } => {
                *span
            }
        }
    }
}

/// Classify the cursor position in `text`.
///
/// `cursor` is a byte offset. Offsets past the end or inside a multi-byte
/// character are moved back to the nearest boundary.
pub fn extract(text: &str, cursor: usize) -> Option<CompletionContext> {
    let cursor = floor_char_boundary(text, cursor);
    let before = &text[..cursor];

    let token_start = before
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8());
    if before[token_start..].starts_with('@') {
        let end = text[cursor..]
            .find(char::is_whitespace)
            .map_or(text.len(), |i| cursor + i);
        return Some(CompletionContext::Mention {
            span: Span {
                start: token_start,
                end,
            },
            query: before[token_start + 1..].to_string(),
        });
    }

    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let args = before[line_start..].strip_prefix('/')?;
    let mut parts: Vec<String> = args.split_whitespace().map(str::to_string).collect();
    if args.ends_with(char::is_whitespace) {
        parts.push(String::new());
    }
    Some(CompletionContext::Slash {
        span: Span {
            start: line_start,
            end: cursor,
        },
        parts,
    })
}

fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
