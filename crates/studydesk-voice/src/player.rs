use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};

use crate::PronounceError;

/// Blocking audio playback; called from a blocking worker, never the UI thread
pub trait AudioPlayer: Send + Sync + 'static {
    fn play(&self, path: &Path) -> Result<(), PronounceError>;
}

/// Plays through the default output device
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioPlayer;

impl AudioPlayer for RodioPlayer {
    fn play(&self, path: &Path) -> Result<(), PronounceError> {
        let (_stream, handle) =
            OutputStream::try_default().map_err(|e| PronounceError::Playback(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| PronounceError::Playback(e.to_string()))?;

        let file = BufReader::new(File::open(path)?);
        let source = Decoder::new(file).map_err(|e| PronounceError::Playback(e.to_string()))?;

        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}
