use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use studydesk_types::Direction;

use crate::dictionary::WordRecord;

/// What the cursor points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorItem<'a> {
    Empty,
    Word { record: &'a WordRecord, index: usize },
}

/// Active word list, current position and advance policy.
///
/// Invariant: `index < words.len()` whenever the list is non-empty.
pub struct WordCursor<R = StdRng> {
    words: Vec<WordRecord>,
    index: usize,
    shuffle: bool,
    rng: R,
}

impl WordCursor {
    pub fn new(words: Vec<WordRecord>, shuffle: bool) -> Self {
        Self::with_rng(words, shuffle, StdRng::from_entropy())
    }
}

impl<R: Rng> WordCursor<R> {
    pub fn with_rng(words: Vec<WordRecord>, shuffle: bool, rng: R) -> Self {
        Self {
            words,
            index: 0,
            shuffle,
            rng,
        }
    }

    /// Move to the next word.
    ///
    /// Sequential mode steps by one and wraps at both ends. Shuffle mode picks
    /// a different index uniformly at random, and does nothing for lists of
    /// one word. Returns false when nothing moved.
    pub fn advance(&mut self, direction: Direction) -> bool {
        let len = self.words.len();
        if len == 0 {
            return false;
        }

        if self.shuffle {
            if len == 1 {
                return false;
            }
            // Draw from the other n-1 slots so a single draw always lands elsewhere
            let pick = self.rng.gen_range(0..len - 1);
            self.index = if pick >= self.index { pick + 1 } else { pick };
            return true;
        }

        self.index = match direction {
            Direction::Forward => (self.index + 1) % len,
            Direction::Backward => (self.index + len - 1) % len,
        };
        true
    }

    /// Replace the word list and go back to the first word
    pub fn set_words(&mut self, words: Vec<WordRecord>) {
        self.words = words;
        self.index = 0;
    }

    /// Jump to a saved position; out of range positions reset to 0
    pub fn restore_index(&mut self, index: usize) {
        self.index = if index < self.words.len() { index } else { 0 };
    }

    pub fn current(&self) -> CursorItem<'_> {
        match self.words.get(self.index) {
            Some(record) => CursorItem::Word {
                record,
                index: self.index,
            },
            None => CursorItem::Empty,
        }
    }

    pub fn current_name(&self) -> Option<&str> {
        self.words.get(self.index).map(|w| w.name.as_str())
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[WordRecord] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> Vec<WordRecord> {
        (0..n).map(|i| WordRecord::new(format!("word{i}"))).collect()
    }

    fn seeded(n: usize, shuffle: bool) -> WordCursor<StdRng> {
        WordCursor::with_rng(words(n), shuffle, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_forward_wraps_after_full_cycle() {
        for len in 1..6 {
            let mut cursor = seeded(len, false);
            cursor.restore_index(len / 2);
            let start = cursor.index();

            for _ in 0..len {
                assert!(cursor.advance(Direction::Forward));
            }
            assert_eq!(cursor.index(), start);
        }
    }

    #[test]
    fn test_backward_wraps_from_first() {
        let mut cursor = seeded(4, false);
        cursor.advance(Direction::Backward);
        assert_eq!(cursor.index(), 3);
        cursor.advance(Direction::Forward);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_shuffle_single_word_is_noop() {
        let mut cursor = seeded(1, true);
        assert!(!cursor.advance(Direction::Forward));
        assert!(!cursor.advance(Direction::Backward));
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_shuffle_never_repeats_current() {
        for len in [2, 3, 10] {
            let mut cursor = seeded(len, true);
            for _ in 0..500 {
                let before = cursor.index();
                assert!(cursor.advance(Direction::Forward));
                assert_ne!(cursor.index(), before);
                assert!(cursor.index() < len);
            }
        }
    }

    #[test]
    fn test_shuffle_reaches_every_other_index() {
        let mut cursor = seeded(5, true);
        let mut seen = [false; 5];
        for _ in 0..500 {
            cursor.advance(Direction::Forward);
            seen[cursor.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_empty_cursor() {
        let mut cursor = seeded(0, false);
        assert!(!cursor.advance(Direction::Forward));
        assert_eq!(cursor.current(), CursorItem::Empty);
        assert_eq!(cursor.current_name(), None);

        cursor.set_shuffle(true);
        assert!(!cursor.advance(Direction::Backward));
    }

    #[test]
    fn test_set_words_resets_index() {
        let mut cursor = seeded(5, false);
        cursor.advance(Direction::Forward);
        cursor.advance(Direction::Forward);

        cursor.set_words(words(3));
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.current_name(), Some("word0"));
    }

    #[test]
    fn test_restore_index_clamps() {
        let mut cursor = seeded(3, false);
        cursor.restore_index(2);
        assert_eq!(cursor.index(), 2);
        cursor.restore_index(3);
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn test_current_returns_record() {
        let mut cursor = seeded(2, false);
        cursor.advance(Direction::Forward);
        match cursor.current() {
            CursorItem::Word { record, index } => {
                assert_eq!(index, 1);
                assert_eq!(record.name, "word1");
            }
            CursorItem::Empty => panic!("expected a word"),
        }
    }
}
