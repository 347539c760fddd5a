use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    ConfigChanged,
    UiEvent(UiEvent),
    Navigate(Direction),
    Mark(ReviewOutcome),
    /// Play the current word again
    Pronounce,
    ToggleShuffle,
    ToggleAccent,
    ToggleTopmost,
    CycleDictionary,
    SelectDictionary(String),
    /// Re-read the config file and rebind hotkeys
    ReloadSettings,
    ShowWord(WordView),
    ApplyVisuals {
        visuals: VisualSettings,
        topmost: bool,
    },
    RebindHotkeys(Vec<HotkeyBinding>),
    BackendReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    Show,
    Hide,
    ToggleVisible,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Known,
    Forgot,
}

/// Pronunciation variant, persisted as `1` (UK) or `2` (US)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Accent {
    #[default]
    Uk,
    Us,
}

impl Accent {
    /// Numeric `type` parameter used by the voice endpoint and the cache key
    pub fn type_id(self) -> u8 {
        match self {
            Accent::Uk => 1,
            Accent::Us => 2,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Accent::Uk => Accent::Us,
            Accent::Us => Accent::Uk,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Accent::Uk => "UK",
            Accent::Us => "US",
        }
    }
}

impl TryFrom<u8> for Accent {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Accent::Uk),
            2 => Ok(Accent::Us),
            other => Err(format!("unknown pronunciation type: {other}")),
        }
    }
}

impl From<Accent> for u8 {
    fn from(accent: Accent) -> Self {
        accent.type_id()
    }
}

impl fmt::Display for Accent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_id())
    }
}

impl FromStr for Accent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "uk" | "gb" | "british" => Ok(Accent::Uk),
            "2" | "us" | "american" => Ok(Accent::Us),
            other => Err(format!("unknown accent '{other}', expected uk or us")),
        }
    }
}

/// Colors and font sizes of the overlay text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    pub word_color: String,
    pub meaning_color: String,
    pub word_size: u32,
    pub meaning_size: u32,
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            word_color: "blue".to_string(),
            meaning_color: "black".to_string(),
            word_size: 24,
            meaning_size: 12,
        }
    }
}

/// Actions that can be bound to a global hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    Toggle,
    Settings,
    Next,
    Prev,
    Known,
    Forgot,
    Shuffle,
    Accent,
    Dictionary,
    Topmost,
}

impl HotkeyAction {
    pub fn event(self) -> AppEvent {
        match self {
            HotkeyAction::Toggle => AppEvent::UiEvent(UiEvent::ToggleVisible),
            HotkeyAction::Settings => AppEvent::ReloadSettings,
            HotkeyAction::Next => AppEvent::Navigate(Direction::Forward),
            HotkeyAction::Prev => AppEvent::Navigate(Direction::Backward),
            HotkeyAction::Known => AppEvent::Mark(ReviewOutcome::Known),
            HotkeyAction::Forgot => AppEvent::Mark(ReviewOutcome::Forgot),
            HotkeyAction::Shuffle => AppEvent::ToggleShuffle,
            HotkeyAction::Accent => AppEvent::ToggleAccent,
            HotkeyAction::Dictionary => AppEvent::CycleDictionary,
            HotkeyAction::Topmost => AppEvent::ToggleTopmost,
        }
    }
}

/// An action paired with its bracketed key combination, e.g. `<ctrl>+<alt>+s`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    pub action: HotkeyAction,
    pub keys: String,
}

/// Review state of the displayed word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewBadge {
    Unmarked,
    Counts { known: u64, forgot: u64 },
}

impl ReviewBadge {
    pub fn label(&self) -> String {
        match self {
            ReviewBadge::Unmarked => "未标记".to_string(),
            ReviewBadge::Counts { known, forgot } => format!("熟记:{known} 忘记:{forgot}"),
        }
    }

    pub fn is_marked(&self) -> bool {
        matches!(self, ReviewBadge::Counts { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDisplay {
    pub name: String,
    pub phonetics: String,
    pub translation: String,
    pub review: ReviewBadge,
    pub position: usize,
    pub total: usize,
    pub shuffle: bool,
    pub accent: Accent,
}

/// What the overlay should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordView {
    EmptyDictionary,
    Word(WordDisplay),
}

impl WordView {
    pub const EMPTY_LABEL: &'static str = "（词典为空）";

    pub fn headline(&self) -> &str {
        match self {
            WordView::EmptyDictionary => Self::EMPTY_LABEL,
            WordView::Word(word) => &word.name,
        }
    }

    pub fn word(&self) -> Option<&WordDisplay> {
        match self {
            WordView::EmptyDictionary => None,
            WordView::Word(word) => Some(word),
        }
    }
}
