use slint::{ComponentHandle, Weak};
use studydesk_types::{AppEvent, UiEvent, VisualSettings, WordView};

use crate::color::parse_color;
use crate::state::UiState;
use crate::{OverlayWindow, UiHooks};

/// Apply one backend event on the UI thread. Returns false once the UI should close.
pub fn handle_events(
    event: AppEvent,
    window_weak: &Weak<OverlayWindow>,
    state: &UiState,
    hooks: &mut UiHooks,
) -> bool {
    let Some(w) = window_weak.upgrade() else {
        return false;
    };

    match event {
        AppEvent::ShowWord(view) => {
            show_word(&w, &view);
        }
        AppEvent::ApplyVisuals { visuals, topmost } => {
            apply_visuals(&w, &visuals);
            w.set_topmost(topmost);
            tracing::debug!("[SLINT] Visuals applied (topmost: {topmost})");
        }
        AppEvent::UiEvent(UiEvent::Show) => show(&w, state),
        AppEvent::UiEvent(UiEvent::Hide) => hide(&w, state),
        AppEvent::UiEvent(UiEvent::ToggleVisible) => {
            if state.visible.get() {
                hide(&w, state);
            } else {
                show(&w, state);
            }
        }
        AppEvent::UiEvent(UiEvent::Close) => {
            w.hide().ok();
            return false;
        }
        AppEvent::RebindHotkeys(bindings) => {
            tracing::debug!("[SLINT] Rebinding {} hotkeys", bindings.len());
            (hooks.on_rebind)(&bindings);
        }
        AppEvent::BackendReady => {
            tracing::debug!("[SLINT] Backend ready");
        }
        _ => {}
    }

    true
}

fn show_word(w: &OverlayWindow, view: &WordView) {
    w.set_word(view.headline().into());
    match view.word() {
        Some(word) => {
            w.set_empty(false);
            w.set_phonetics(word.phonetics.as_str().into());
            w.set_translation(word.translation.as_str().into());
            w.set_status(word.review.label().into());
            w.set_marked(word.review.is_marked());
        }
        None => {
            w.set_empty(true);
            w.set_phonetics("".into());
            w.set_translation("".into());
            w.set_status("".into());
            w.set_marked(false);
        }
    }
}

fn apply_visuals(w: &OverlayWindow, visuals: &VisualSettings) {
    let defaults = VisualSettings::default();

    let color = |value: &str, fallback: &str| {
        parse_color(value).or_else(|| {
            tracing::warn!("Unknown color '{value}', using {fallback}");
            parse_color(fallback)
        })
    };

    if let Some(c) = color(&visuals.word_color, &defaults.word_color) {
        w.set_word_color(c);
    }
    if let Some(c) = color(&visuals.meaning_color, &defaults.meaning_color) {
        w.set_meaning_color(c);
    }
    w.set_word_size(visuals.word_size.clamp(8, 96) as f32);
    w.set_meaning_size(visuals.meaning_size.clamp(8, 96) as f32);
}

fn show(w: &OverlayWindow, state: &UiState) {
    match w.show() {
        Ok(()) => state.visible.set(true),
        Err(e) => tracing::error!("[SLINT] Failed to show overlay: {e}"),
    }
}

fn hide(w: &OverlayWindow, state: &UiState) {
    match w.hide() {
        Ok(()) => state.visible.set(false),
        Err(e) => tracing::error!("[SLINT] Failed to hide overlay: {e}"),
    }
}
