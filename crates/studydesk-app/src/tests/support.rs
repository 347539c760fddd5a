use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kanal::AsyncReceiver;
use studydesk_config::{ConfigStore, Paths};
use studydesk_core::{DictionaryCatalog, ReviewTracker};
use studydesk_types::{Accent, AppEvent};
use studydesk_voice::{AudioPlayer, PronounceError, PronunciationCache, PronunciationQueue, VoiceFetcher};

use crate::state::{AppState, SessionOverrides};

const INDEX: &str = r#"[
    {"category": "考试", "dicts": [{"name": "CET-4", "url": "dicts/cet4.json"}]},
    {"category": "编程", "dicts": [{"name": "Python", "url": "dicts/python.json"}]}
]"#;

const CET4: &str = r#"[
    {"name": "abandon", "usphone": "əˈbændən", "ukphone": "əˈbændən", "trans": ["v. 放弃", "n. 放任"]},
    {"name": "ability", "usphone": "əˈbɪləti", "ukphone": "əˈbɪlɪti", "trans": ["n. 能力"]},
    {"name": "abroad", "trans": ["adv. 在国外"]}
]"#;

const PYTHON: &str = r#"[
    {"name": "print(x)", "trans": ["输出"]},
    {"name": "len(s)", "trans": ["长度"]}
]"#;

/// Temporary home with a small dictionary bundle
pub struct Fixture {
    pub root: PathBuf,
    pub paths: Paths,
}

impl Fixture {
    pub fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "studydesk-app-{}-{name}",
            std::process::id()
        ));
        std::fs::remove_dir_all(&root).ok();

        let assets = root.join("assets");
        std::fs::create_dir_all(assets.join("dicts")).unwrap();
        std::fs::write(assets.join("dicts/index.json"), INDEX).unwrap();
        std::fs::write(assets.join("dicts/cet4.json"), CET4).unwrap();
        std::fs::write(assets.join("dicts/python.json"), PYTHON).unwrap();

        let paths = Paths::under(&root.join("home"), assets);
        paths.ensure_dirs().unwrap();
        Self { root, paths }
    }

    pub fn write_config(&self, json: &str) {
        std::fs::write(&self.paths.config_file, json).unwrap();
    }

    pub fn state(&self, overrides: &SessionOverrides) -> AppState {
        AppState::with_parts(
            self.paths.clone(),
            ConfigStore::load(&self.paths.config_file),
            DictionaryCatalog::load(&self.paths.assets_dir),
            ReviewTracker::load(&self.paths.review_file),
            overrides,
        )
    }

    pub fn voice(&self) -> PronunciationQueue<CountingFetcher, SilentPlayer> {
        let cache = PronunciationCache::new(&self.paths.cache_dir, CountingFetcher::default()).unwrap();
        PronunciationQueue::new(cache, SilentPlayer, 2)
    }

    pub fn saved_config(&self) -> serde_json::Value {
        read_json(&self.paths.config_file)
    }

    pub fn saved_review(&self) -> serde_json::Value {
        read_json(&self.paths.review_file)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.root).ok();
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[derive(Default)]
pub struct CountingFetcher {
    pub calls: AtomicUsize,
}

impl CountingFetcher {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceFetcher for CountingFetcher {
    async fn fetch(&self, word: &str, _accent: Accent) -> Result<Vec<u8>, PronounceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(word.as_bytes().to_vec())
    }
}

pub struct SilentPlayer;

impl AudioPlayer for SilentPlayer {
    fn play(&self, _path: &Path) -> Result<(), PronounceError> {
        Ok(())
    }
}

pub async fn next_event(rx: &AsyncReceiver<AppEvent>) -> AppEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("channel closed")
}

/// Skip events until a `ShowWord` arrives and return its headline
pub async fn next_word(rx: &AsyncReceiver<AppEvent>) -> studydesk_types::WordView {
    loop {
        if let AppEvent::ShowWord(view) = next_event(rx).await {
            return view;
        }
    }
}
