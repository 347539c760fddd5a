use kanal::{AsyncReceiver, AsyncSender};
use studydesk_config::Config;
use studydesk_core::MarkOutcome;
use studydesk_types::{AppEvent, UiEvent};
use studydesk_voice::{AudioPlayer, PronunciationQueue, VoiceFetcher};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

/// App's main loop. Owns the state until the UI closes or `cancel` fires.
pub async fn event_loop<F, P>(
    mut state: AppState,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    voice: PronunciationQueue<F, P>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    F: VoiceFetcher + 'static,
    P: AudioPlayer,
{
    let config = state.config.snapshot();
    app_to_ui_tx
        .send(AppEvent::ApplyVisuals {
            visuals: config.visual_settings,
            topmost: config.topmost_enabled,
        })
        .await?;
    publish(&state, &app_to_ui_tx, &voice, true).await?;
    app_to_ui_tx.send(AppEvent::BackendReady).await?;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("[EVENT_LOOP] Cancelled");
                state.save_all();
                break;
            }
            received = ui_to_app_rx.recv() => match received {
                Ok(event) => event,
                Err(_) => {
                    tracing::info!("[EVENT_LOOP] UI channel closed");
                    state.save_all();
                    break;
                }
            },
        };

        tracing::debug!("[EVENT_LOOP] Event: {event:?}");
        if !handle_events(&mut state, &app_to_ui_tx, &voice, event).await? {
            break;
        }
    }

    Ok(())
}

/// Returns false once the app should stop
async fn handle_events<F, P>(
    state: &mut AppState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    voice: &PronunciationQueue<F, P>,
    event: AppEvent,
) -> anyhow::Result<bool>
where
    F: VoiceFetcher + 'static,
    P: AudioPlayer,
{
    match event {
        AppEvent::Navigate(direction) => {
            state.navigate(direction);
            publish(state, app_to_ui_tx, voice, true).await?;
        }
        AppEvent::Mark(outcome) => match state.mark(outcome) {
            MarkOutcome::Ignored => tracing::debug!("Nothing to mark"),
            MarkOutcome::Recorded { entry, save_error } => {
                tracing::info!(
                    "Marked {outcome:?}: known {} / forgot {}{}",
                    entry.known,
                    entry.forgot,
                    if save_error.is_some() { " (unsaved)" } else { "" }
                );
                publish(state, app_to_ui_tx, voice, false).await?;
            }
        },
        AppEvent::Pronounce => pronounce(state, voice),
        AppEvent::ToggleShuffle => {
            state.toggle_shuffle();
            publish(state, app_to_ui_tx, voice, false).await?;
        }
        AppEvent::ToggleAccent => {
            state.toggle_accent();
            publish(state, app_to_ui_tx, voice, true).await?;
        }
        AppEvent::ToggleTopmost => {
            // Applied to the window by the config watcher
            state.toggle_topmost();
        }
        AppEvent::CycleDictionary => {
            if state.cycle_dictionary() {
                publish(state, app_to_ui_tx, voice, true).await?;
            }
        }
        AppEvent::SelectDictionary(url) => {
            state.open_dictionary(&url);
            publish(state, app_to_ui_tx, voice, true).await?;
        }
        AppEvent::ReloadSettings => {
            state.reload_settings();
            let bindings = state.config.snapshot().hotkeys.bindings();
            app_to_ui_tx.send(AppEvent::RebindHotkeys(bindings)).await?;
            publish(state, app_to_ui_tx, voice, false).await?;
        }
        AppEvent::ConfigChanged => {
            publish(state, app_to_ui_tx, voice, false).await?;
        }
        AppEvent::UiEvent(UiEvent::Close) => {
            tracing::info!("[EVENT_LOOP] Close requested, saving");
            state.save_all();
            app_to_ui_tx.send(AppEvent::UiEvent(UiEvent::Close)).await?;
            return Ok(false);
        }
        AppEvent::UiEvent(ui_event) => {
            app_to_ui_tx.send(AppEvent::UiEvent(ui_event)).await?;
        }
        AppEvent::ShowWord(_)
        | AppEvent::ApplyVisuals { .. }
        | AppEvent::RebindHotkeys(_)
        | AppEvent::BackendReady => {
            // UI-only events
        }
    }

    Ok(true)
}

async fn publish<F, P>(
    state: &AppState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    voice: &PronunciationQueue<F, P>,
    speak: bool,
) -> anyhow::Result<()>
where
    F: VoiceFetcher + 'static,
    P: AudioPlayer,
{
    app_to_ui_tx.send(AppEvent::ShowWord(state.view())).await?;
    if speak {
        pronounce(state, voice);
    }
    Ok(())
}

fn pronounce<F, P>(state: &AppState, voice: &PronunciationQueue<F, P>)
where
    F: VoiceFetcher + 'static,
    P: AudioPlayer,
{
    if let Some(word) = state.cursor.current_name() {
        voice.enqueue(word, state.accent());
    }
}

/// Push visual changes to the UI whenever the config snapshot changes
pub async fn watch_visuals(
    mut config_rx: watch::Receiver<Config>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut shown = {
        let config = config_rx.borrow_and_update();
        (config.visual_settings.clone(), config.topmost_enabled)
    };

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = config_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        let current = {
            let config = config_rx.borrow_and_update();
            (config.visual_settings.clone(), config.topmost_enabled)
        };
        if current == shown {
            continue;
        }

        tracing::debug!("Visual settings changed");
        shown = current.clone();
        let (visuals, topmost) = current;
        app_to_ui_tx
            .send(AppEvent::ApplyVisuals { visuals, topmost })
            .await?;
    }

    tracing::debug!("Config watcher stopping");
    Ok(())
}
