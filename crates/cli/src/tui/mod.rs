// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Terminal user interface.
//!
//! [`TuiAppState`] owns input handling and frame layout without touching the
//! terminal; the iocraft component in `app.rs` only forwards events and
//! stacks the lines it is given.

mod app;
mod colors;
pub mod modal;
mod render;
pub mod spinner;
mod state;

pub use app::TuiApp;
pub use state::{ExitReason, RenderState, TuiAppState, DEFAULT_TERMINAL_SIZE};
