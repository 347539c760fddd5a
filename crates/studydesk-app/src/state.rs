use studydesk_config::{Config, ConfigStore, Paths};
use studydesk_core::{DictionaryCatalog, MarkOutcome, ReviewTracker, WordCursor, load_words, word_view};
use studydesk_types::{Accent, Direction, ReviewOutcome, WordView};

/// Command-line values that override the saved config for this run
#[derive(Debug, Clone, Default)]
pub struct SessionOverrides {
    pub dict: Option<String>,
    pub shuffle: bool,
    pub accent: Option<Accent>,
}

/// Everything the event loop owns
pub struct AppState {
    pub config: ConfigStore,
    pub paths: Paths,
    pub catalog: DictionaryCatalog,
    pub cursor: WordCursor,
    pub review: ReviewTracker,
}

impl AppState {
    pub fn bootstrap(paths: Paths, overrides: &SessionOverrides) -> Self {
        let config = ConfigStore::load(&paths.config_file);
        let catalog = DictionaryCatalog::load(&paths.assets_dir);
        let review = ReviewTracker::load(&paths.review_file);
        Self::with_parts(paths, config, catalog, review, overrides)
    }

    pub fn with_parts(
        paths: Paths,
        config: ConfigStore,
        catalog: DictionaryCatalog,
        review: ReviewTracker,
        overrides: &SessionOverrides,
    ) -> Self {
        let saved = config.snapshot();
        let dict = resolve_dictionary(&paths, &catalog, overrides.dict.as_deref(), &saved);

        let words = match &dict {
            Some(url) => load_words(&paths.dictionary(url)),
            None => {
                tracing::warn!("No dictionary available");
                Vec::new()
            }
        };
        let shuffle = overrides.shuffle || saved.shuffle_mode;
        let mut cursor = WordCursor::new(words, shuffle);

        let dict = dict.unwrap_or_default();
        if dict == saved.current_dict {
            cursor.restore_index(saved.current_index);
        }
        tracing::info!(
            "Opened '{dict}' with {} words at position {}",
            cursor.len(),
            cursor.index()
        );

        let index = cursor.index();
        let result = config.update(|c| {
            c.current_dict = dict;
            c.current_index = index;
            c.shuffle_mode = shuffle;
            if let Some(accent) = overrides.accent {
                c.pronunciation_type = accent;
            }
        });
        if let Err(e) = result {
            tracing::error!("Failed to save config: {e}");
        }

        Self {
            config,
            paths,
            catalog,
            cursor,
            review,
        }
    }

    pub fn accent(&self) -> Accent {
        self.config.snapshot().pronunciation_type
    }

    pub fn view(&self) -> WordView {
        word_view(&self.cursor, &self.review, self.accent())
    }

    /// Step the cursor and remember the new position
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let moved = self.cursor.advance(direction);
        if moved {
            self.persist(|c, index| c.current_index = index);
        }
        moved
    }

    pub fn mark(&mut self, outcome: ReviewOutcome) -> MarkOutcome {
        self.review.mark(self.cursor.current_name(), outcome)
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        let shuffle = !self.cursor.is_shuffle();
        self.cursor.set_shuffle(shuffle);
        self.persist(|c, _| c.shuffle_mode = shuffle);
        tracing::info!("Shuffle mode: {shuffle}");
        shuffle
    }

    pub fn toggle_accent(&mut self) -> Accent {
        let accent = self.accent().toggled();
        self.persist(|c, _| c.pronunciation_type = accent);
        tracing::info!("Pronunciation: {}", accent.label());
        accent
    }

    pub fn toggle_topmost(&mut self) -> bool {
        let topmost = !self.config.snapshot().topmost_enabled;
        self.persist(|c, _| c.topmost_enabled = topmost);
        topmost
    }

    /// Load the dictionary at `url` and start from its first word
    pub fn open_dictionary(&mut self, url: &str) {
        let words = load_words(&self.paths.dictionary(url));
        tracing::info!("Switched to '{url}' ({} words)", words.len());
        self.cursor.set_words(words);

        let url = url.to_string();
        self.persist(|c, index| {
            c.current_dict = url;
            c.current_index = index;
        });
    }

    /// Open the catalog entry after the current one
    pub fn cycle_dictionary(&mut self) -> bool {
        let current = self.config.snapshot().current_dict;
        let Some(next) = self.catalog.next_after(&current).map(|e| e.url.clone()) else {
            tracing::warn!("Dictionary catalog is empty");
            return false;
        };
        self.open_dictionary(&next);
        true
    }

    /// Re-read the config file and bring the cursor in line with it
    pub fn reload_settings(&mut self) {
        let before = self.config.snapshot();
        match self.config.reload() {
            Ok(true) => tracing::info!("Settings reloaded"),
            Ok(false) => tracing::debug!("Settings unchanged"),
            Err(e) => {
                tracing::warn!("Failed to reload settings: {e}");
                return;
            }
        }

        let after = self.config.snapshot();
        self.cursor.set_shuffle(after.shuffle_mode);
        if after.current_dict != before.current_dict {
            self.cursor
                .set_words(load_words(&self.paths.dictionary(&after.current_dict)));
            self.cursor.restore_index(after.current_index);
        } else if after.current_index != before.current_index {
            self.cursor.restore_index(after.current_index);
        }
    }

    /// Write config and review data; failures are logged
    pub fn save_all(&self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {e}");
        }
        if let Err(e) = self.review.save() {
            tracing::error!("Failed to save review data: {e}");
        }
    }

    fn persist<F>(&self, f: F)
    where
        F: FnOnce(&mut Config, usize),
    {
        let index = self.cursor.index();
        if let Err(e) = self.config.update(|c| f(c, index)) {
            tracing::error!("Failed to save config: {e}");
        }
    }
}

/// `--dict` wins, then the saved dictionary if it still exists, then the first catalog entry
fn resolve_dictionary(
    paths: &Paths,
    catalog: &DictionaryCatalog,
    requested: Option<&str>,
    saved: &Config,
) -> Option<String> {
    if let Some(dict) = requested {
        return Some(dict.to_string());
    }

    if !saved.current_dict.is_empty() {
        if paths.dictionary(&saved.current_dict).exists() {
            return Some(saved.current_dict.clone());
        }
        tracing::warn!("Saved dictionary '{}' is missing", saved.current_dict);
    }

    catalog.first().map(|entry| entry.url.clone())
}
