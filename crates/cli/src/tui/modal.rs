// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Picker dialogs.
//!
//! One [`Picker`] backs the model, provider, theme and auth dialogs as well
//! as tool approval. Navigation wraps at both ends.

use crate::commands::PickerKind;
use crate::config::{AuthMethod, Choice, ThemeName};
use crate::session::SessionController;
use crate::tools::{ApprovalDecision, PendingApproval};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerItem {
    pub label: String,
    pub description: Option<String>,
    pub value: String,
}

impl PickerItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            value: value.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A titled list with one highlighted row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Picker {
    title: String,
    items: Vec<PickerItem>,
    highlighted: usize,
    current: Option<String>,
}

impl Picker {
    /// Starts highlighted on `current` when it is one of the items.
    pub fn new(title: impl Into<String>, items: Vec<PickerItem>, current: Option<String>) -> Self {
        let highlighted = current
            .as_deref()
            .and_then(|c| items.iter().position(|item| item.value == c))
            .unwrap_or(0);
        Self {
            title: title.into(),
            items,
            highlighted,
            current,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[PickerItem] {
        &self.items
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn is_current(&self, index: usize) -> bool {
        self.items
            .get(index)
            .is_some_and(|item| self.current.as_deref() == Some(item.value.as_str()))
    }

    pub fn move_up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.highlighted = match self.highlighted {
            0 => self.items.len() - 1,
            i => i - 1,
        };
    }

    pub fn move_down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.highlighted = (self.highlighted + 1) % self.items.len();
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.items.get(self.highlighted).map(|item| item.value.as_str())
    }
}

/// Build the picker `kind` from the session's current state.
pub fn settings_picker(kind: PickerKind, session: &SessionController) -> Picker {
    let config = session.config().lock().clone();
    let (items, current) = match kind {
        PickerKind::Model => {
            let models = config
                .provider
                .as_deref()
                .map(|p| session.backend().list_models(p))
                .unwrap_or_default();
            let items = models
                .iter()
                .map(|m| {
                    let item = PickerItem::new(m.display_name(), m.id.as_str());
                    match &m.description {
                        Some(d) => item.with_description(d.as_str()),
                        None => item,
                    }
                })
                .collect();
            (items, config.model)
        }
        PickerKind::Provider => {
            let items = session
                .backend()
                .list_providers()
                .into_iter()
                .map(|p| PickerItem::new(p.as_str(), p.as_str()))
                .collect();
            (items, config.provider)
        }
        PickerKind::Theme => (
            choice_items::<ThemeName>(),
            Some(config.theme.as_str().to_string()),
        ),
        PickerKind::Auth => (
            choice_items::<AuthMethod>(),
            config.auth.map(|a| a.as_str().to_string()),
        ),
    };
    Picker::new(kind.title(), items, current)
}

fn choice_items<T: Choice>() -> Vec<PickerItem> {
    T::ALL
        .iter()
        .map(|c| PickerItem::new(c.as_str(), c.as_str()).with_description(c.description()))
        .collect()
}

const APPROVE: &str = "approve";
const DENY: &str = "deny";

/// Yes/no picker for a tool call waiting on the user
pub fn approval_picker(pending: &PendingApproval) -> Picker {
    Picker::new(
        format!("Allow {}? {}", pending.tool, pending.details),
        vec![
            PickerItem::new("Yes, run it", APPROVE),
            PickerItem::new("No, skip it", DENY),
        ],
        None,
    )
}

/// Decision for the highlighted approval row
pub fn approval_decision(picker: &Picker) -> ApprovalDecision {
    match picker.selected_value() {
        Some(APPROVE) => ApprovalDecision::Approve,
        _ => ApprovalDecision::Deny,
    }
}

/// The dialog currently covering the input, if any
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Modal {
    Settings { kind: PickerKind, picker: Picker },
    Approval { call_id: String, picker: Picker },
}

impl Modal {
    pub fn picker(&self) -> &Picker {
        match self {
            Modal::Settings { picker, .. } | Modal::Approval { picker, .. } => picker,
        }
    }

    pub fn picker_mut(&mut self) -> &mut Picker {
        match self {
            Modal::Settings { picker, .. } | Modal::Approval { picker, .. } => picker,
        }
    }
}

#[cfg(test)]
#[path = "modal_tests.rs"]
mod tests;
