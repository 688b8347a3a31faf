// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Palaver binary entry point.

use std::sync::Arc;

use clap::Parser;
use parking_lot::Mutex;

use palaver::backend::{Script, ScriptedBackend, StreamingConfig};
use palaver::cli::Cli;
use palaver::completion::SuggestionIndex;
use palaver::config::{PalaverConfig, Settings};
use palaver::history::PromptHistory;
use palaver::input::{InputBuffer, InputHandle, InputManager};
use palaver::logging;
use palaver::output::{print_error, print_warning};
use palaver::session::SessionController;
use palaver::shell::{ShellPacing, ShellRunner};
use palaver::time::ClockHandle;
use palaver::tools::{ApprovalQueue, BuiltinTools, DisabledTools, ToolExecutor};
use palaver::transcript::{IdGenerator, Transcript};
use palaver::tui::{ExitReason, TuiApp, TuiAppState, DEFAULT_TERMINAL_SIZE};
use palaver_history::HistoryStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let file = match PalaverConfig::discover(&cli) {
        Ok(file) => file,
        Err(e) => {
            print_error(e);
            std::process::exit(1);
        }
    };
    let settings = Settings::resolve(&cli, file);

    if let Some(path) = &settings.log_file {
        if let Err(e) = logging::init(path) {
            print_warning(format_args!("Cannot open log file {}: {}", path.display(), e));
        }
    }

    let script = match &settings.script {
        Some(path) => match Script::load(path) {
            Ok(script) => script,
            Err(e) => {
                print_error(e);
                std::process::exit(1);
            }
        },
        None => Script::default(),
    };

    let clock = ClockHandle::system();
    let backend = ScriptedBackend::new(
        script,
        StreamingConfig::from(&settings.streaming),
        clock.clone(),
    );
    let tools: Arc<dyn ToolExecutor> = if settings.tools_enabled {
        Arc::new(BuiltinTools::new(settings.working_directory.clone()))
    } else {
        Arc::new(DisabledTools)
    };

    let approvals = ApprovalQueue::new();
    let transcript = Transcript::shared(IdGenerator::new());
    let session = SessionController::new(
        Arc::new(backend),
        tools,
        Arc::new(approvals.clone()),
        transcript.clone(),
        Arc::new(Mutex::new(settings.session.clone())),
    );

    let buffer = Arc::new(Mutex::new(InputBuffer::new()));
    let manager = InputManager::new(
        InputHandle::attached(buffer.clone()),
        session,
        open_history(&settings),
        SuggestionIndex::scan(&settings.working_directory),
        ShellRunner::new(
            transcript,
            clock.clone(),
            ShellPacing::from_settings(&settings.streaming),
            settings.working_directory.clone(),
        ),
        clock,
    );

    let size = crossterm::terminal::size().unwrap_or(DEFAULT_TERMINAL_SIZE);
    let state = TuiAppState::new(buffer, manager, approvals, size);

    // Ctrl+C must arrive as a key event rather than kill the process.
    #[cfg(unix)]
    {
        use std::sync::atomic::AtomicBool;
        let flag = Arc::new(AtomicBool::new(false));
        if let Err(e) = signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&flag))
        {
            print_warning(format_args!("Failed to ignore SIGINT: {}", e));
        }
    }

    tracing::info!(
        provider = ?settings.session.provider,
        model = ?settings.session.model,
        cwd = %settings.working_directory.display(),
        "starting session"
    );
    let mut app = TuiApp::new(state);
    match app.run()? {
        ExitReason::Interrupted => std::process::exit(130),
        ExitReason::Command | ExitReason::EndOfInput => Ok(()),
    }
}

/// Load persisted prompts and record new ones back, falling back to an
/// in-memory history when the file cannot be opened.
fn open_history(settings: &Settings) -> PromptHistory {
    let store = match &settings.history_file {
        Some(path) => HistoryStore::open(path).unwrap_or_else(|e| {
            print_warning(format_args!("History disabled: {}", e));
            HistoryStore::in_memory()
        }),
        None => HistoryStore::in_memory(),
    };
    PromptHistory::new(store.newest_first()).with_recorder(Box::new(move |prompt| {
        if let Err(e) = store.record(prompt) {
            tracing::warn!(error = %e, "failed to record prompt");
        }
    }))
}
