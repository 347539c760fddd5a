use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use studydesk_types::{ReviewBadge, ReviewOutcome};

/// Per-word review counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewEntry {
    pub known: u64,
    pub forgot: u64,
    /// ISO-8601 UTC timestamp of the latest mark
    pub last: Option<String>,
}

impl ReviewEntry {
    /// Parses `last`, accepting RFC 3339 and naive ISO-8601 (assumed UTC)
    pub fn last_reviewed(&self) -> Option<DateTime<Utc>> {
        let raw = self.last.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.and_utc())
            })
            .ok()
    }

    pub fn badge(&self) -> ReviewBadge {
        ReviewBadge::Counts {
            known: self.known,
            forgot: self.forgot,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result of a mark; a failed save still keeps the in-memory change
#[derive(Debug)]
pub enum MarkOutcome {
    /// No word to mark
    Ignored,
    Recorded {
        entry: ReviewEntry,
        save_error: Option<ReviewError>,
    },
}

/// Known/forgot counters keyed by word name, written through to disk on every mark
#[derive(Debug, Default)]
pub struct ReviewTracker {
    path: Option<PathBuf>,
    entries: BTreeMap<String, ReviewEntry>,
}

impl ReviewTracker {
    /// Tracker that never touches disk
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Missing file starts empty; an unreadable file is logged and discarded
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => {
                tracing::info!("Loaded review data for {} words", entries.len());
                entries
            }
            Err(ReviewError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No review data at {}", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                tracing::error!("Failed to load review data {}: {e}", path.display());
                BTreeMap::new()
            }
        };

        Self {
            path: Some(path),
            entries,
        }
    }

    pub fn mark(&mut self, name: Option<&str>, outcome: ReviewOutcome) -> MarkOutcome {
        self.mark_at(name, outcome, Utc::now())
    }

    pub fn mark_at(
        &mut self,
        name: Option<&str>,
        outcome: ReviewOutcome,
        now: DateTime<Utc>,
    ) -> MarkOutcome {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            return MarkOutcome::Ignored;
        };

        let entry = self.entries.entry(name.to_string()).or_default();
        match outcome {
            ReviewOutcome::Known => entry.known = entry.known.saturating_add(1),
            ReviewOutcome::Forgot => entry.forgot = entry.forgot.saturating_add(1),
        }
        entry.last = Some(now.to_rfc3339_opts(SecondsFormat::Micros, true));
        let entry = entry.clone();

        let save_error = self.save().err();
        if let Some(e) = &save_error {
            tracing::error!("Failed to save review data: {e}");
        }

        MarkOutcome::Recorded { entry, save_error }
    }

    pub fn get(&self, name: &str) -> Option<&ReviewEntry> {
        self.entries.get(name)
    }

    pub fn badge(&self, name: &str) -> ReviewBadge {
        self.get(name)
            .map(ReviewEntry::badge)
            .unwrap_or(ReviewBadge::Unmarked)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the whole file; no-op for in-memory trackers
    pub fn save(&self) -> Result<(), ReviewError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, ReviewEntry>, ReviewError> {
    let data = fs::read_to_string(path)?;
    // A file containing `null` counts as empty
    let entries: Option<BTreeMap<String, ReviewEntry>> = serde_json::from_str(&data)?;
    Ok(entries.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("studydesk-review-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn recorded(outcome: MarkOutcome) -> ReviewEntry {
        match outcome {
            MarkOutcome::Recorded { entry, save_error } => {
                assert!(save_error.is_none(), "unexpected save error: {save_error:?}");
                entry
            }
            MarkOutcome::Ignored => panic!("mark was ignored"),
        }
    }

    #[test]
    fn test_known_then_forgot() {
        let mut tracker = ReviewTracker::in_memory();
        let t1 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();

        let first = recorded(tracker.mark_at(Some("apple"), ReviewOutcome::Known, t1));
        assert_eq!((first.known, first.forgot), (1, 0));
        assert_eq!(first.last_reviewed(), Some(t1));

        let second = recorded(tracker.mark_at(Some("apple"), ReviewOutcome::Forgot, t2));
        assert_eq!((second.known, second.forgot), (1, 1));
        assert!(second.last_reviewed().unwrap() > first.last_reviewed().unwrap());
        assert_eq!(tracker.get("apple"), Some(&second));
    }

    #[test]
    fn test_empty_or_missing_name_is_ignored() {
        let mut tracker = ReviewTracker::in_memory();

        assert!(matches!(
            tracker.mark(Some(""), ReviewOutcome::Known),
            MarkOutcome::Ignored
        ));
        assert!(matches!(
            tracker.mark(None, ReviewOutcome::Forgot),
            MarkOutcome::Ignored
        ));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_unmarked_differs_from_zero_counts() {
        let mut tracker = ReviewTracker::in_memory();
        assert_eq!(tracker.badge("pear"), ReviewBadge::Unmarked);

        tracker.mark(Some("pear"), ReviewOutcome::Forgot);
        assert_eq!(
            tracker.badge("pear"),
            ReviewBadge::Counts {
                known: 0,
                forgot: 1
            }
        );
    }

    #[test]
    fn test_marks_survive_reload() {
        let dir = temp_dir("reload");
        let path = dir.join("review.json");
        fs::remove_file(&path).ok();

        let mut tracker = ReviewTracker::load(&path);
        assert!(tracker.is_empty());
        recorded(tracker.mark(Some("苹果"), ReviewOutcome::Known));
        recorded(tracker.mark(Some("苹果"), ReviewOutcome::Known));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("苹果"));

        let reloaded = ReviewTracker::load(&path);
        assert_eq!(reloaded.get("苹果").unwrap().known, 2);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_file_resets_to_empty() {
        let dir = temp_dir("corrupt");
        let path = dir.join("review.json");
        fs::write(&path, "[1, 2").unwrap();

        assert!(ReviewTracker::load(&path).is_empty());

        fs::write(&path, "null").unwrap();
        assert!(ReviewTracker::load(&path).is_empty());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_failure_keeps_memory_state() {
        let dir = temp_dir("unwritable");
        // A directory where the file should be makes the write fail
        let path = dir.join("review.json");
        fs::create_dir_all(&path).unwrap();

        let mut tracker = ReviewTracker::load(&path);
        match tracker.mark(Some("kiwi"), ReviewOutcome::Known) {
            MarkOutcome::Recorded { entry, save_error } => {
                assert_eq!(entry.known, 1);
                assert!(matches!(save_error, Some(ReviewError::Io(_))));
            }
            MarkOutcome::Ignored => panic!("mark was ignored"),
        }
        assert_eq!(tracker.get("kiwi").unwrap().known, 1);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_counters_saturate_at_max() {
        let dir = temp_dir("saturate");
        let path = dir.join("review.json");
        fs::write(
            &path,
            format!(r#"{{"apple": {{"known": {}, "forgot": 2, "last": null}}}}"#, u64::MAX),
        )
        .unwrap();

        let mut tracker = ReviewTracker::load(&path);
        let entry = recorded(tracker.mark(Some("apple"), ReviewOutcome::Known));
        assert_eq!((entry.known, entry.forgot), (u64::MAX, 2));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_large_counts_keep_other_history() {
        let dir = temp_dir("large");
        let path = dir.join("review.json");
        fs::write(
            &path,
            r#"{"apple": {"known": 3, "forgot": 0, "last": null},
                "pear": {"known": 5000000000, "forgot": 1, "last": null}}"#,
        )
        .unwrap();

        let mut tracker = ReviewTracker::load(&path);
        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.get("pear").unwrap().known, 5_000_000_000);

        recorded(tracker.mark(Some("kiwi"), ReviewOutcome::Known));
        let reloaded = ReviewTracker::load(&path);
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.get("apple").unwrap().known, 3);
        assert_eq!(reloaded.get("pear").unwrap().known, 5_000_000_000);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_reads_naive_timestamps() {
        let entry = ReviewEntry {
            known: 1,
            forgot: 0,
            last: Some("2024-03-02T10:15:30.123456".to_string()),
        };
        let expected = Utc.with_ymd_and_hms(2024, 3, 2, 10, 15, 30).unwrap()
            + chrono::Duration::microseconds(123456);
        assert_eq!(entry.last_reviewed(), Some(expected));
    }
}
