// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! The iocraft component and the fullscreen run loop.

use iocraft::prelude::*;

use super::state::{ExitReason, RenderState, TuiAppState};

/// Props for the main App component
#[derive(Default, Props)]
pub struct AppProps {
    pub state: Option<TuiAppState>,
}

#[component]
pub fn App(mut hooks: Hooks, props: &AppProps) -> impl Into<AnyElement<'static>> {
    let Some(state) = props.state.clone() else {
        return element! {
            View(flex_direction: FlexDirection::Column) {
                Text(content: "Error: TuiAppState must be provided via props")
            }
        };
    };

    // Bumped to force a re-render after input or a timer tick
    let mut render_counter = hooks.use_state(|| 0u64);
    let mut timer_counter = hooks.use_state(|| 0u64);

    hooks.use_terminal_events({
        let state = state.clone();
        move |event| match event {
            TerminalEvent::Key(key) if key.kind != KeyEventKind::Release => {
                state.handle_key_event(key);
                let current = *render_counter.read();
                render_counter.set(current.wrapping_add(1));
            }
            TerminalEvent::Resize(width, height) => {
                state.set_size(width, height);
                let current = *render_counter.read();
                render_counter.set(current.wrapping_add(1));
            }
            _ => {}
        }
    });

    // Drives the spinner and picks up transcript changes from background runs
    hooks.use_future({
        let state = state.clone();
        async move {
            loop {
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                state.tick();
                let current = *timer_counter.read();
                timer_counter.set(current.wrapping_add(1));
            }
        }
    });

    let frame = state.render_state();
    if state.should_exit() {
        hooks.use_context_mut::<SystemContext>().exit();
    }

    element! {
        View(
            flex_direction: FlexDirection::Column,
            width: 100pct,
            height: 100pct,
        ) {
            #(frame_rows(&frame))
        }
    }
}

fn frame_rows(frame: &RenderState) -> Vec<AnyElement<'static>> {
    let mut rows = vec![
        line(&frame.header),
        line(&frame.separator),
        element! {
            View(flex_direction: FlexDirection::Column, flex_grow: 1.0) {
                #(frame.body.iter().map(|l| line(l)))
            }
        }
        .into(),
        line(&frame.separator),
    ];
    match &frame.modal {
        Some(modal) => rows.extend(modal.iter().map(|l| line(l))),
        None => {
            rows.push(line(&frame.input));
            rows.extend(frame.menu.iter().map(|l| line(l)));
        }
    }
    rows.push(line(&frame.status));
    rows
}

fn line(content: &str) -> AnyElement<'static> {
    element! { Text(content: content.to_string()) }.into()
}

/// Owns the terminal while a session is open
pub struct TuiApp {
    state: TuiAppState,
}

impl TuiApp {
    pub fn new(state: TuiAppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &TuiAppState {
        &self.state
    }

    /// Run fullscreen until the user leaves, then stop background work.
    pub fn run(&mut self) -> std::io::Result<ExitReason> {
        let state = self.state.clone();

        if tokio::runtime::Handle::try_current().is_ok() {
            tokio::task::block_in_place(|| {
                tokio::runtime::Handle::current().block_on(async {
                    // Ctrl+C is handled by the key handler
                    element!(App(state: Some(state.clone())))
                        .fullscreen()
                        .ignore_ctrl_c()
                        .await
                })
            })?;
        } else {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(async {
                element!(App(state: Some(state.clone())))
                    .fullscreen()
                    .ignore_ctrl_c()
                    .await
            })?;
        }

        self.state.shutdown();
        let reason = self.state.exit_reason().unwrap_or(ExitReason::Interrupted);
        tracing::info!(?reason, "session closed");
        Ok(reason)
    }
}
