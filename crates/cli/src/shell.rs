// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! `!command` shell mode.
//!
//! The command runs to completion, then its output is replayed into a
//! tool block one line at a time with a paced delay so long output reads
//! as a stream.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::config::StreamingSettings;
use crate::env;
use crate::time::{Clock, ClockHandle};
use crate::transcript::{EntryId, SharedTranscript, ToolBlockOptions};

/// Rows a shell block may take before it scrolls
pub const SHELL_BLOCK_MAX_HEIGHT: u16 = 12;

/// Delay between replayed output lines
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShellPacing {
    pub line_delay_ms: u64,
    /// Upper bound of the random extra delay per line
    pub line_jitter_ms: u64,
}

impl ShellPacing {
    /// Pacing from settings; `PALAVER_SHELL_LINE_DELAY_MS` overrides the base delay.
    pub fn from_settings(settings: &StreamingSettings) -> Self {
        Self {
            line_delay_ms: env::shell_line_delay_ms().unwrap_or(settings.line_delay_ms),
            line_jitter_ms: settings.line_jitter_ms,
        }
    }

    pub fn instant() -> Self {
        Self::default()
    }

    fn next_delay(&self) -> Duration {
        let jitter = match self.line_jitter_ms {
            0 => 0,
            max => fastrand::u64(0..=max),
        };
        Duration::from_millis(self.line_delay_ms + jitter)
    }
}

/// Runs shell commands into transcript tool blocks
#[derive(Clone, Debug)]
pub struct ShellRunner {
    transcript: SharedTranscript,
    clock: ClockHandle,
    pacing: ShellPacing,
    cwd: PathBuf,
}

impl ShellRunner {
    pub fn new(
        transcript: SharedTranscript,
        clock: ClockHandle,
        pacing: ShellPacing,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        Self {
            transcript,
            clock,
            pacing,
            cwd: cwd.into(),
        }
    }

    /// Open the block and stream into it on a background task.
    pub fn start(&self, command: &str) -> EntryId {
        let id = self.open(command);
        let this = self.clone();
        let command = command.to_string();
        tokio::spawn(async move { this.stream(id, &command).await });
        id
    }

    /// Open the block and stream into it, returning once it is finished.
    pub async fn run(&self, command: &str) -> EntryId {
        let id = self.open(command);
        self.stream(id, command).await;
        id
    }

    fn open(&self, command: &str) -> EntryId {
        let is_batch = command.contains('\n') || command.contains(';') || command.contains("&&");
        let mut transcript = self.transcript.lock();
        let id = transcript.append_tool_block(ToolBlockOptions {
            is_batch,
            scrollable: true,
            max_height: Some(SHELL_BLOCK_MAX_HEIGHT),
        });
        transcript.append_tool_block_line(id, format!("$ {command}"));
        id
    }

    async fn stream(&self, id: EntryId, command: &str) {
        tracing::debug!(command, "running shell command");
        let lines = match self.capture(command).await {
            Ok(lines) => lines,
            Err(err) => {
                tracing::warn!(command, error = %err, "shell command failed to start");
                vec![format!("Failed to run command: {err}")]
            }
        };

        for line in lines {
            self.clock.sleep(self.pacing.next_delay()).await;
            self.transcript.lock().append_tool_block_line(id, line);
        }
        self.transcript.lock().finish_tool_block(id);
    }

    async fn capture(&self, command: &str) -> std::io::Result<Vec<String>> {
        let output = shell_command(command)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        let mut lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect();
        lines.extend(
            String::from_utf8_lossy(&output.stderr)
                .lines()
                .map(str::to_string),
        );
        if !output.status.success() {
            lines.push(match output.status.code() {
                Some(code) => format!("[exit status {code}]"),
                None => "[terminated by signal]".to_string(),
            });
        }
        Ok(lines)
    }
}

#[cfg(unix)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(not(unix))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
