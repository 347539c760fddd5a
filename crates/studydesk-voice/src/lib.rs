mod cache;
mod error;
mod fetcher;
mod normalize;
mod player;
mod queue;

pub use cache::{AUDIO_EXTENSION, PronunciationCache};
pub use error::PronounceError;
pub use fetcher::{VoiceFetcher, YoudaoFetcher};
pub use normalize::{cache_key, normalize_word};
pub use player::{AudioPlayer, RodioPlayer};
pub use queue::PronunciationQueue;
