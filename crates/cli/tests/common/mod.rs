// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

//! Shared helpers for the integration tests.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use palaver::backend::{Script, ScriptedBackend, StreamingConfig};
use palaver::config::{AuthMethod, SessionConfig};
use palaver::session::SessionController;
use palaver::time::ClockHandle;
use palaver::tools::{ApprovalHandler, AutoApprove, BuiltinTools};
use palaver::transcript::{ChatEntry, IdGenerator, Role, Transcript};

/// Write `content` to a temporary file with the given extension
pub fn write_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Parse a TOML script through the same loader the binary uses
pub fn script(content: &str) -> Script {
    let file = write_temp(content, ".toml");
    Script::load(file.path()).unwrap()
}

pub fn ready_config() -> SessionConfig {
    SessionConfig {
        provider: Some("scripted".into()),
        model: Some("echo-small".into()),
        auth: Some(AuthMethod::Local),
        ..SessionConfig::default()
    }
}

/// Controller over the scripted backend with built-in tools rooted at `root`
pub fn controller(script: Script, root: &Path) -> SessionController {
    controller_with(script, root, Arc::new(AutoApprove))
}

pub fn controller_with(
    script: Script,
    root: &Path,
    approvals: Arc<dyn ApprovalHandler>,
) -> SessionController {
    SessionController::new(
        Arc::new(ScriptedBackend::new(
            script,
            StreamingConfig::instant(),
            ClockHandle::fake_at(0),
        )),
        Arc::new(BuiltinTools::new(root)),
        approvals,
        Transcript::shared(IdGenerator::new()),
        Arc::new(Mutex::new(ready_config())),
    )
}

/// `(role, text)` of every message entry, in order
pub fn messages(controller: &SessionController) -> Vec<(Role, String)> {
    controller
        .transcript()
        .lock()
        .entries()
        .iter()
        .filter_map(|entry| match entry {
            ChatEntry::Message { role, text, .. } => Some((*role, text.clone())),
            _ => None,
        })
        .collect()
}

pub async fn wait_idle(controller: &SessionController) {
    let idle = async {
        while controller.is_streaming() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    };
    tokio::time::timeout(Duration::from_secs(5), idle)
        .await
        .expect("controller never went idle");
}
