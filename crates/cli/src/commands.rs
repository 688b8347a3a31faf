// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Slash-command catalog and dispatch.
//!
//! The catalog order is also the tie-break order for completion.

use std::str::FromStr;

use crate::completion::{CommandNode, SlashTree};
use crate::config::{AuthMethod, Choice, ConfigError, EmojiFilter, SessionConfig, ThemeName};
use crate::session::{SessionController, ToolCallCounts};
use crate::transcript::Role;

const STATS: &[CommandNode] = &[
    CommandNode::leaf("model", "Current provider, model and settings"),
    CommandNode::leaf("tools", "Tool calls by status"),
    CommandNode::leaf("session", "Turns and streamed words"),
];

const EMOJI_FILTERS: &[CommandNode] = &[
    CommandNode::leaf("auto", "Strip emoji from model output"),
    CommandNode::leaf("allowed", "Show emoji as sent"),
    CommandNode::leaf("warn", "Show emoji and warn once per reply"),
];

const TOGGLE: &[CommandNode] = &[
    CommandNode::leaf("on", "Enable"),
    CommandNode::leaf("off", "Disable"),
];

const SET: &[CommandNode] = &[
    CommandNode::branch("emojifilter", "How emoji in replies are handled", EMOJI_FILTERS),
    CommandNode::branch("thinking", "Show model thinking", TOGGLE),
];

/// Every slash command, in menu order
pub const CATALOG: &[CommandNode] = &[
    CommandNode::leaf("help", "List commands"),
    CommandNode::leaf("model", "Choose the model"),
    CommandNode::leaf("provider", "Choose the provider"),
    CommandNode::leaf("theme", "Choose the color theme"),
    CommandNode::leaf("auth", "Choose the authentication method"),
    CommandNode::branch("stats", "Show session statistics", STATS),
    CommandNode::branch("set", "Change a session setting", SET),
    CommandNode::leaf("exit", "Quit palaver"),
];

pub const COMMAND_TREE: SlashTree = SlashTree::new(CATALOG);

/// Which picker dialog a command asks for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerKind {
    Model,
    Provider,
    Theme,
    Auth,
}

impl PickerKind {
    pub fn title(self) -> &'static str {
        match self {
            PickerKind::Model => "Select model",
            PickerKind::Provider => "Select provider",
            PickerKind::Theme => "Select theme",
            PickerKind::Auth => "Select authentication",
        }
    }
}

/// Result of dispatching one submission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Not a registered command; send it as a chat message
    NotCommand,
    Handled,
    OpenPicker(PickerKind),
    Exit,
}

/// Executes slash commands against the session.
#[derive(Clone, Debug)]
pub struct CommandDispatcher {
    session: SessionController,
}

impl CommandDispatcher {
    pub fn new(session: SessionController) -> Self {
        Self { session }
    }

    /// True when `raw` was consumed as a command.
    pub fn handle_command(&self, raw: &str) -> bool {
        self.dispatch(raw) != CommandOutcome::NotCommand
    }

    pub fn dispatch(&self, raw: &str) -> CommandOutcome {
        let Some(body) = raw.trim().strip_prefix('/') else {
            return CommandOutcome::NotCommand;
        };
        let parts: Vec<&str> = body.split_whitespace().collect();
        let Some((root, args)) = parts.split_first() else {
            return CommandOutcome::NotCommand;
        };
        let Some(node) = COMMAND_TREE.resolve(&[*root]) else {
            return CommandOutcome::NotCommand;
        };
        tracing::debug!(command = node.name, args = args.len(), "dispatching command");

        match node.name {
            "help" => self.system(help_text()),
            "model" => return self.pick_or_set(PickerKind::Model, args),
            "provider" => return self.pick_or_set(PickerKind::Provider, args),
            "theme" => return self.pick_or_set(PickerKind::Theme, args),
            "auth" => return self.pick_or_set(PickerKind::Auth, args),
            "stats" => self.stats(args),
            "set" => self.set(args),
            "exit" => return CommandOutcome::Exit,
            _ => return CommandOutcome::NotCommand,
        }
        CommandOutcome::Handled
    }

    /// Store a picked value and confirm it in the transcript.
    pub fn apply_choice(&self, kind: PickerKind, value: &str) {
        let message = match kind {
            PickerKind::Model => self.set_model(value),
            PickerKind::Provider => self.set_provider(value),
            PickerKind::Theme => self.set_choice(value, |config, theme: ThemeName| {
                config.theme = theme;
                format!("Theme set to {theme}")
            }),
            PickerKind::Auth => self.set_choice(value, |config, auth: AuthMethod| {
                config.auth = Some(auth);
                format!("Authentication set to {auth}")
            }),
        };
        self.system(message);
    }

    fn pick_or_set(&self, kind: PickerKind, args: &[&str]) -> CommandOutcome {
        if args.is_empty() {
            return CommandOutcome::OpenPicker(kind);
        }
        self.apply_choice(kind, &args.join(" "));
        CommandOutcome::Handled
    }

    fn set_model(&self, value: &str) -> String {
        let provider = self.session.config().lock().provider.clone();
        if let Some(provider) = &provider {
            let models = self.session.backend().list_models(provider);
            if !models.is_empty() && !models.iter().any(|m| m.id == value) {
                let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
                return format!("Unknown model '{value}'. Available: {}", ids.join(", "));
            }
        }
        self.session.config().lock().model = Some(value.to_string());
        format!("Model set to {value}")
    }

    fn set_provider(&self, value: &str) -> String {
        let providers = self.session.backend().list_providers();
        if !providers.iter().any(|p| p == value) {
            return format!(
                "Unknown provider '{value}'. Available: {}",
                providers.join(", ")
            );
        }

        let models = self.session.backend().list_models(value);
        let mut config = self.session.config().lock();
        config.provider = Some(value.to_string());
        let keeps_model = config
            .model
            .as_deref()
            .is_some_and(|m| models.iter().any(|info| info.id == m));
        if keeps_model || config.model.is_none() {
            format!("Provider set to {value}")
        } else {
            config.model = None;
            format!("Provider set to {value}. Choose a model with /model")
        }
    }

    fn set_choice<T: Choice + FromStr<Err = ConfigError>>(
        &self,
        value: &str,
        apply: impl FnOnce(&mut SessionConfig, T) -> String,
    ) -> String {
        match T::from_str(value) {
            Ok(choice) => apply(&mut self.session.config().lock(), choice),
            Err(err) => err.to_string(),
        }
    }

    fn stats(&self, args: &[&str]) {
        let sections: &[&str] = match args.first() {
            None => &["model", "tools", "session"],
            Some(sub) => match STATS.iter().find(|n| n.name.eq_ignore_ascii_case(sub)) {
                Some(node) => std::slice::from_ref(&node.name),
                None => {
                    self.system(usage("stats", STATS));
                    return;
                }
            },
        };
        let text: Vec<String> = sections.iter().map(|s| self.stats_section(s)).collect();
        self.system(text.join("\n\n"));
    }

    fn stats_section(&self, section: &str) -> String {
        match section {
            "model" => {
                let config = self.session.config().lock().clone();
                format!(
                    "Provider: {}\nModel: {}\nAuth: {}\nTheme: {}\nEmoji filter: {}\nThinking: {}",
                    config.provider.as_deref().unwrap_or("none"),
                    config.model.as_deref().unwrap_or("none"),
                    config.auth.as_ref().map_or("none", Choice::as_str),
                    config.theme,
                    config.emoji_filter,
                    if config.show_thinking { "shown" } else { "hidden" },
                )
            }
            "tools" => {
                let counts = ToolCallCounts::from_transcript(&self.session.transcript().lock());
                let mut text = format!("Tool calls: {}", counts.total());
                for (status, n) in counts.iter() {
                    text.push_str(&format!("\n  {}: {n}", status.as_str()));
                }
                text
            }
            _ => {
                let stats = self.session.stats();
                let entries = self.session.transcript().lock().len();
                format!(
                    "Turns: {}\nWords streamed: {}\nTool continuations: {}\nTranscript entries: {entries}",
                    stats.turns, stats.words, stats.continuations
                )
            }
        }
    }

    fn set(&self, args: &[&str]) {
        let message = match args {
            [key, value] if key.eq_ignore_ascii_case("emojifilter") => {
                match EmojiFilter::from_str(value) {
                    Ok(filter) => {
                        self.session.config().lock().emoji_filter = filter;
                        format!("Emoji filter set to {filter}")
                    }
                    Err(err) => err.to_string(),
                }
            }
            [key, value] if key.eq_ignore_ascii_case("thinking") => {
                match value.to_ascii_lowercase().as_str() {
                    "on" => {
                        self.session.config().lock().show_thinking = true;
                        "Thinking is now shown".to_string()
                    }
                    "off" => {
                        self.session.config().lock().show_thinking = false;
                        "Thinking is now hidden".to_string()
                    }
                    _ => usage("set", SET),
                }
            }
            _ => usage("set", SET),
        };
        self.system(message);
    }

    fn system(&self, text: impl Into<String>) {
        self.session
            .transcript()
            .lock()
            .append_message(Role::System, text);
    }
}

/// `/help` text built from the catalog
pub fn help_text() -> String {
    let mut text = String::from("Commands:");
    for node in CATALOG {
        text.push_str(&format!("\n  /{:<10} {}", node.name, node.description));
        if node.has_children() {
            let names: Vec<&str> = node.children.iter().map(|c| c.name).collect();
            text.push_str(&format!(" ({})", names.join(", ")));
        }
    }
    text.push_str("\n\nStart a line with ! to run a shell command, or use @path to mention a file.");
    text
}

fn usage(command: &str, children: &[CommandNode]) -> String {
    let forms: Vec<String> = children
        .iter()
        .map(|child| {
            if child.has_children() {
                let values: Vec<&str> = child.children.iter().map(|c| c.name).collect();
                format!("/{command} {} <{}>", child.name, values.join("|"))
            } else {
                format!("/{command} {}", child.name)
            }
        })
        .collect();
    format!("Usage: {}", forms.join(" | "))
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
