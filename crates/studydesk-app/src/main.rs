use anyhow::Context;
use clap::Parser;
use studydesk_config::Paths;
use studydesk_config::hotkeys::humanize_hotkey;
use studydesk_hotkey::HotkeyListener;
use studydesk_types::{AppEvent, HotkeyBinding};
use studydesk_ui::UiHooks;
use studydesk_voice::{PronunciationCache, PronunciationQueue, RodioPlayer, YoudaoFetcher};

mod cli;
mod controller;
mod events;
mod logging;
mod state;

#[cfg(test)]
mod tests;

use self::cli::Cli;
use self::controller::AppController;
use self::state::AppState;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.log_json);

    let paths = Paths::resolve(cli.home.clone(), cli.assets.clone());
    paths
        .ensure_dirs()
        .context("failed to create data directories")?;
    tracing::info!("Config: {}", paths.config_file.display());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("studydesk-worker")
        .build()
        .context("failed to start tokio runtime")?;
    let _guard = runtime.enter();

    let state = AppState::bootstrap(paths, &cli.overrides());
    let config = state.config.snapshot();

    let fetcher = YoudaoFetcher::new(
        config.network.voice_host.clone(),
        config.network.voice_timeout(),
    )?;
    let cache = PronunciationCache::new(state.paths.cache_dir.clone(), fetcher)?;
    let voice = PronunciationQueue::new(cache, RodioPlayer, config.network.max_concurrent_fetches);

    let controller = AppController::new();
    let mut tasks = controller.spawn_tasks(state, voice);

    let channels = controller.channels();
    let hooks = hotkey_hooks(
        &config.hotkeys.bindings(),
        channels.ui_to_app.0.clone_sync(),
    );

    // Slint needs the main thread
    let ui_result = studydesk_ui::run_overlay(
        channels.app_to_ui.1.clone(),
        channels.ui_to_app.0.clone(),
        hooks,
    );
    if let Err(e) = &ui_result {
        tracing::error!("UI exited with error: {e:#}");
    }

    controller.shutdown();
    runtime.block_on(async {
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("Task failed: {e:#}"),
                Err(e) => tracing::error!("Task panicked: {e}"),
            }
        }
    });

    tracing::info!("Bye");
    ui_result
}

/// Register hotkeys on the UI thread; the app keeps running without them on failure
fn hotkey_hooks(bindings: &[HotkeyBinding], tx: kanal::Sender<AppEvent>) -> UiHooks {
    let mut listener = match HotkeyListener::new() {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Global hotkeys unavailable: {e}");
            return UiHooks::noop();
        }
    };

    for binding in bindings {
        tracing::debug!("Hotkey {:?}: {}", binding.action, humanize_hotkey(&binding.keys));
    }
    if let Err(e) = listener.start(bindings, tx.clone()) {
        tracing::error!("Failed to start hotkey listener: {e}");
    }

    UiHooks {
        on_rebind: Box::new(move |bindings: &[HotkeyBinding]| {
            if let Err(e) = listener.start(bindings, tx.clone()) {
                tracing::error!("Failed to restart hotkey listener: {e}");
            }
        }),
    }
}
