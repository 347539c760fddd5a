use std::rc::Rc;
use std::time::{Duration, Instant};

use kanal::{AsyncReceiver, AsyncSender};
use slint::ComponentHandle;
use studydesk_types::{AppEvent, Direction, HotkeyBinding, UiEvent};

mod color;
mod events;
mod state;

pub use color::parse_color;
pub use events::handle_events;
pub use state::{ScrollThrottle, UiState};

slint::include_modules!();

/// How long a close waits for the backend to confirm the save
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Callbacks the UI thread runs on behalf of the backend
pub struct UiHooks {
    /// Re-register global hotkeys; the hotkey manager lives on the UI thread
    pub on_rebind: Box<dyn FnMut(&[HotkeyBinding])>,
}

impl UiHooks {
    pub fn noop() -> Self {
        Self {
            on_rebind: Box::new(|_: &[HotkeyBinding]| {}),
        }
    }
}

/// Run the overlay on the current thread until it is closed.
pub fn run_overlay(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    ui_to_app_tx: AsyncSender<AppEvent>,
    hooks: UiHooks,
) -> anyhow::Result<()> {
    let window = OverlayWindow::new()?;
    let window_weak = window.as_weak();
    let state = Rc::new(UiState::new());

    {
        let tx = ui_to_app_tx.clone();
        window.on_word_clicked(move || {
            send(&tx, AppEvent::Pronounce);
        });
    }

    {
        let tx = ui_to_app_tx.clone();
        let state = Rc::clone(&state);
        window.on_scrolled(move |delta| {
            if delta == 0.0 || !state.scroll.borrow_mut().accept(Instant::now()) {
                return;
            }
            let direction = if delta > 0.0 {
                Direction::Backward
            } else {
                Direction::Forward
            };
            send(&tx, AppEvent::Navigate(direction));
        });
    }

    {
        let tx = ui_to_app_tx.clone();
        window.window().on_close_requested(move || {
            if request_close(&tx) {
                slint::Timer::single_shot(CLOSE_GRACE, || {
                    tracing::warn!("[SLINT] Backend did not confirm close, quitting");
                    slint::quit_event_loop().ok();
                });
            } else {
                tracing::warn!("[SLINT] Backend unreachable, quitting");
                slint::quit_event_loop().ok();
            }
            slint::CloseRequestResponse::HideWindow
        });
    }

    {
        let window_weak = window_weak.clone();
        let state = Rc::clone(&state);
        let mut hooks = hooks;
        slint::spawn_local(async move {
            while let Ok(event) = app_to_ui_rx.recv().await {
                if !handle_events(event, &window_weak, &state, &mut hooks) {
                    break;
                }
            }
            tracing::info!("[SLINT] Leaving event loop");
            slint::quit_event_loop().ok();
        })?;
    }

    window.show()?;
    tracing::info!("[SLINT] Overlay shown");

    slint::run_event_loop_until_quit()?;

    Ok(())
}

/// Forward a close request; false when nothing is left to receive it
fn request_close(tx: &AsyncSender<AppEvent>) -> bool {
    match tx.try_send(AppEvent::UiEvent(UiEvent::Close)) {
        Ok(true) => true,
        Ok(false) => {
            // Channel full
            send(tx, AppEvent::UiEvent(UiEvent::Close));
            true
        }
        Err(e) => {
            tracing::warn!("[SLINT] Backend channel closed: {e}");
            false
        }
    }
}

fn send(tx: &AsyncSender<AppEvent>, event: AppEvent) {
    let tx = tx.clone();
    let spawned = slint::spawn_local(async move {
        if let Err(e) = tx.send(event).await {
            tracing::warn!("[SLINT] Backend channel closed: {e}");
        }
    });
    if let Err(e) = spawned {
        tracing::error!("[SLINT] Failed to queue UI event: {e}");
    }
}
