use kanal::{AsyncReceiver, AsyncSender};
use studydesk_types::AppEvent;
use studydesk_voice::{AudioPlayer, PronunciationQueue, VoiceFetcher};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::{event_loop, watch_visuals};
use crate::state::AppState;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(128), // display updates
            ui_to_app: kanal::bounded_async(64),  // clicks, wheel and hotkeys
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new() -> Self {
        Self {
            channels: ChannelSet::new(),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    /// Must be called inside a tokio runtime
    pub fn spawn_tasks<F, P>(
        &self,
        state: AppState,
        voice: PronunciationQueue<F, P>,
    ) -> JoinSet<anyhow::Result<()>>
    where
        F: VoiceFetcher + 'static,
        P: AudioPlayer,
    {
        let mut tasks = JoinSet::new();

        // Config watcher
        tasks.spawn(watch_visuals(
            state.config.subscribe(),
            self.channels.app_to_ui.0.clone(),
            self.cancel_token.child_token(),
        ));

        // Event loop
        tasks.spawn(event_loop(
            state,
            self.channels.ui_to_app.1.clone(),
            self.channels.app_to_ui.0.clone(),
            voice,
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Default for AppController {
    fn default() -> Self {
        Self::new()
    }
}
