use std::collections::HashMap;
use std::thread::JoinHandle;
use std::time::Duration;

use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use kanal::Sender;
use studydesk_types::{AppEvent, HotkeyAction, HotkeyBinding};
use tokio_util::sync::CancellationToken;

use crate::{HotkeyError, parse_hotkey};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Global hotkey registration with an explicit start/stop lifecycle.
///
/// Create it on the thread that runs the GUI event loop; the OS delivers
/// hotkey messages there. A background thread polls the events and turns
/// matches into [`AppEvent`]s.
pub struct HotkeyListener {
    manager: GlobalHotKeyManager,
    registered: Vec<HotKey>,
    worker: Option<PollWorker>,
}

impl HotkeyListener {
    pub fn new() -> Result<Self, HotkeyError> {
        let manager = GlobalHotKeyManager::new().map_err(HotkeyError::Manager)?;
        Ok(Self {
            manager,
            registered: Vec::new(),
            worker: None,
        })
    }

    /// Register `bindings` and start forwarding presses to `tx`.
    ///
    /// Stops a running listener first. Bindings that fail to parse or
    /// register are logged and skipped. Returns how many were registered.
    pub fn start(
        &mut self,
        bindings: &[HotkeyBinding],
        tx: Sender<AppEvent>,
    ) -> Result<usize, HotkeyError> {
        self.stop();

        let mut routes = HashMap::new();
        for binding in bindings {
            match self.register(binding) {
                Ok(hotkey) => {
                    routes.insert(hotkey.id(), binding.action);
                }
                Err(e) => tracing::warn!("Skipping hotkey for {:?}: {e}", binding.action),
            }
        }

        let count = routes.len();
        let receiver = GlobalHotKeyEvent::receiver();
        self.worker = Some(PollWorker::spawn(routes, tx, move || {
            receiver
                .try_recv()
                .ok()
                .filter(|event| event.state == HotKeyState::Pressed)
                .map(|event| event.id)
        })?);

        tracing::info!("Registered {count} hotkeys");
        Ok(count)
    }

    /// Stop polling and unregister everything. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            worker.stop();
        }
        if !self.registered.is_empty() {
            if let Err(e) = self.manager.unregister_all(&self.registered) {
                tracing::warn!("Failed to unregister hotkeys: {e}");
            }
            self.registered.clear();
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    fn register(&mut self, binding: &HotkeyBinding) -> Result<HotKey, HotkeyError> {
        let hotkey = parse_hotkey(&binding.keys)?;
        self.manager
            .register(hotkey)
            .map_err(|source| HotkeyError::Register {
                keys: binding.keys.clone(),
                source,
            })?;
        self.registered.push(hotkey);
        Ok(hotkey)
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Thread that maps polled hotkey ids to events until cancelled
struct PollWorker {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PollWorker {
    fn spawn<P>(
        routes: HashMap<u32, HotkeyAction>,
        tx: Sender<AppEvent>,
        mut poll: P,
    ) -> Result<Self, HotkeyError>
    where
        P: FnMut() -> Option<u32> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = std::thread::Builder::new()
            .name("studydesk-hotkeys".to_string())
            .spawn(move || {
                tracing::debug!("Hotkey listener polling {} bindings", routes.len());

                while !token.is_cancelled() {
                    let Some(id) = poll() else {
                        std::thread::sleep(POLL_INTERVAL);
                        continue;
                    };

                    let Some(action) = routes.get(&id) else {
                        tracing::debug!("Ignoring unknown hotkey id {id}");
                        continue;
                    };

                    tracing::debug!("Hotkey pressed: {action:?}");
                    if tx.send(action.event()).is_err() {
                        tracing::warn!("Hotkey receiver closed");
                        break;
                    }
                }

                tracing::info!("Hotkey listener stopping");
            })?;

        Ok(Self {
            cancel,
            handle: Some(handle),
        })
    }

    /// Cancel and join; idempotent
    fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            tracing::error!("Hotkey listener thread panicked");
        }
    }
}

impl Drop for PollWorker {
    fn drop(&mut self) {
        self.stop();
    }
}
