pub mod catalog;
pub mod cursor;
pub mod dictionary;
pub mod review;
pub mod view;

pub use catalog::{CatalogEntry, DictionaryCatalog};
pub use cursor::{CursorItem, WordCursor};
pub use dictionary::{DictionaryError, WordRecord, load_words};
pub use review::{MarkOutcome, ReviewEntry, ReviewError, ReviewTracker};
pub use view::word_view;
