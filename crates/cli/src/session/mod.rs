// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Streaming session control.

mod controller;
mod generation;
mod stats;

pub use controller::{SessionController, StreamState};
pub use generation::{Generation, RunId};
pub use stats::{SessionStats, ToolCallCounts};
