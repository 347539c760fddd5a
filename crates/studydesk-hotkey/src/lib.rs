mod error;
mod listener;
mod parse;

pub use error::HotkeyError;
pub use listener::HotkeyListener;
pub use parse::parse_hotkey;
