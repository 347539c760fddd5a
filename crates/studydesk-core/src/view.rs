use studydesk_types::{Accent, WordDisplay, WordView};

use crate::cursor::{CursorItem, WordCursor};
use crate::review::ReviewTracker;

/// Snapshot of the current word for rendering
pub fn word_view<R>(cursor: &WordCursor<R>, review: &ReviewTracker, accent: Accent) -> WordView
where
    R: rand::Rng,
{
    match cursor.current() {
        CursorItem::Empty => WordView::EmptyDictionary,
        CursorItem::Word { record, index } => WordView::Word(WordDisplay {
            name: record.name.clone(),
            phonetics: record.phonetics(),
            translation: record.translation(),
            review: review.badge(&record.name),
            position: index,
            total: cursor.len(),
            shuffle: cursor.is_shuffle(),
            accent,
        }),
    }
}
