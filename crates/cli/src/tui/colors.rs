// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Theme palettes and ANSI styling helpers.
//!
//! Styled strings carry no trailing reset: iocraft inserts an erase-to-EOL
//! after each line and would split a trailing `\x1b[0m`.

use crate::config::ThemeName;
use crate::transcript::{Role, ToolStatus};

type Rgb = (u8, u8, u8);

/// ANSI escape sequence helpers
pub mod escape {
    /// 24-bit foreground color
    pub fn fg(r: u8, g: u8, b: u8) -> String {
        format!("\x1b[38;2;{};{};{}m", r, g, b)
    }

    pub const RESET: &str = "\x1b[0m";

    pub const BOLD: &str = "\x1b[1m";

    pub const DIM: &str = "\x1b[2m";

    pub const INVERSE: &str = "\x1b[7m";
}

/// Colors for one theme. `None` everywhere means plain text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    pub user: Option<Rgb>,
    pub model: Option<Rgb>,
    pub thinking: Option<Rgb>,
    pub system: Option<Rgb>,
    pub tool: Option<Rgb>,
    pub error: Option<Rgb>,
    pub accent: Option<Rgb>,
    pub muted: Option<Rgb>,
}

const DARK: Palette = Palette {
    user: Some((130, 170, 255)),
    model: Some((230, 230, 230)),
    thinking: Some((153, 153, 153)),
    system: Some((215, 175, 95)),
    tool: Some((72, 150, 140)),
    error: Some((255, 107, 128)),
    accent: Some((175, 135, 255)),
    muted: Some((136, 136, 136)),
};

const LIGHT: Palette = Palette {
    user: Some((0, 85, 170)),
    model: Some((30, 30, 30)),
    thinking: Some((110, 110, 110)),
    system: Some((150, 95, 0)),
    tool: Some((0, 120, 110)),
    error: Some((190, 30, 45)),
    accent: Some((120, 60, 200)),
    muted: Some((120, 120, 120)),
};

const MONO: Palette = Palette {
    user: None,
    model: None,
    thinking: None,
    system: None,
    tool: None,
    error: None,
    accent: None,
    muted: None,
};

impl Palette {
    pub fn for_theme(theme: ThemeName) -> Self {
        match theme {
            ThemeName::Dark => DARK,
            ThemeName::Light => LIGHT,
            ThemeName::Mono => MONO,
        }
    }

    pub fn role(&self, role: Role) -> Option<Rgb> {
        match role {
            Role::User => self.user,
            Role::Model => self.model,
            Role::Thinking => self.thinking,
            Role::System => self.system,
        }
    }

    pub fn status(&self, status: ToolStatus) -> Option<Rgb> {
        match status {
            ToolStatus::Complete => self.tool,
            ToolStatus::Error => self.error,
            ToolStatus::Confirming => self.accent,
            ToolStatus::Pending | ToolStatus::Executing | ToolStatus::Cancelled => self.muted,
        }
    }

    /// Whether this palette emits any escapes at all
    pub fn is_plain(&self) -> bool {
        *self == MONO
    }
}

/// Prefix `text` with a foreground color, if any.
pub fn paint(text: &str, color: Option<Rgb>) -> String {
    match color {
        Some((r, g, b)) => format!("{}{}{}", escape::RESET, escape::fg(r, g, b), text),
        None => text.to_string(),
    }
}

/// Dim `text` unless the palette is plain.
pub fn dim(text: &str, palette: &Palette) -> String {
    if palette.is_plain() {
        text.to_string()
    } else {
        format!("{}{}{}", escape::RESET, escape::DIM, text)
    }
}

/// Reverse-video `text` unless the palette is plain.
pub fn highlight(text: &str, palette: &Palette) -> String {
    if palette.is_plain() {
        format!("> {text}")
    } else {
        format!("{}{}{}", escape::RESET, escape::INVERSE, text)
    }
}

pub fn bold(text: &str, palette: &Palette) -> String {
    if palette.is_plain() {
        text.to_string()
    } else {
        format!("{}{}{}", escape::RESET, escape::BOLD, text)
    }
}

#[cfg(test)]
#[path = "colors_tests.rs"]
mod tests;
