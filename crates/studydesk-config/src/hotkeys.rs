use serde::{Deserialize, Serialize};
use studydesk_types::{HotkeyAction, HotkeyBinding};

const MODIFIERS: [&str; 3] = ["ctrl", "alt", "shift"];

const SPECIAL_KEYS: [&str; 13] = [
    "right", "left", "up", "down", "enter", "space", "tab", "esc", "delete", "home", "end",
    "pageup", "pagedown",
];

/// Key combinations per action, stored in bracketed form (`<ctrl>+<alt>+s`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    pub toggle: String,
    pub settings: String,
    pub next: String,
    pub prev: String,
    pub known: String,
    pub forgot: String,
    pub shuffle: String,
    pub accent: String,
    #[serde(rename = "dict")]
    pub dictionary: String,
    pub topmost: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            toggle: "<ctrl>+<alt>+s".to_string(),
            settings: "<ctrl>+<alt>+o".to_string(),
            next: "<ctrl>+<alt>+<right>".to_string(),
            prev: "<ctrl>+<alt>+<left>".to_string(),
            known: "<ctrl>+<alt>+k".to_string(),
            forgot: "<ctrl>+<alt>+f".to_string(),
            shuffle: "<ctrl>+<alt>+m".to_string(),
            accent: "<ctrl>+<alt>+p".to_string(),
            dictionary: "<ctrl>+<alt>+d".to_string(),
            topmost: "<ctrl>+<alt>+t".to_string(),
        }
    }
}

impl HotkeyConfig {
    pub const ACTIONS: [HotkeyAction; 10] = [
        HotkeyAction::Toggle,
        HotkeyAction::Settings,
        HotkeyAction::Next,
        HotkeyAction::Prev,
        HotkeyAction::Known,
        HotkeyAction::Forgot,
        HotkeyAction::Shuffle,
        HotkeyAction::Accent,
        HotkeyAction::Dictionary,
        HotkeyAction::Topmost,
    ];

    pub fn get(&self, action: HotkeyAction) -> &str {
        match action {
            HotkeyAction::Toggle => &self.toggle,
            HotkeyAction::Settings => &self.settings,
            HotkeyAction::Next => &self.next,
            HotkeyAction::Prev => &self.prev,
            HotkeyAction::Known => &self.known,
            HotkeyAction::Forgot => &self.forgot,
            HotkeyAction::Shuffle => &self.shuffle,
            HotkeyAction::Accent => &self.accent,
            HotkeyAction::Dictionary => &self.dictionary,
            HotkeyAction::Topmost => &self.topmost,
        }
    }

    /// Store a user-typed combination (`ctrl+alt+s`) in bracketed form
    pub fn set(&mut self, action: HotkeyAction, human: &str) {
        let normalized = normalize_hotkey(human);
        let slot = match action {
            HotkeyAction::Toggle => &mut self.toggle,
            HotkeyAction::Settings => &mut self.settings,
            HotkeyAction::Next => &mut self.next,
            HotkeyAction::Prev => &mut self.prev,
            HotkeyAction::Known => &mut self.known,
            HotkeyAction::Forgot => &mut self.forgot,
            HotkeyAction::Shuffle => &mut self.shuffle,
            HotkeyAction::Accent => &mut self.accent,
            HotkeyAction::Dictionary => &mut self.dictionary,
            HotkeyAction::Topmost => &mut self.topmost,
        };
        *slot = normalized;
    }

    /// Bindings ready for registration; blank entries are left unbound
    pub fn bindings(&self) -> Vec<HotkeyBinding> {
        Self::ACTIONS
            .iter()
            .filter_map(|&action| {
                let keys = normalize_hotkey(self.get(action));
                (!keys.is_empty()).then_some(HotkeyBinding { action, keys })
            })
            .collect()
    }
}

/// `ctrl+alt+right` -> `<ctrl>+<alt>+<right>`
///
/// Modifiers and named keys are bracketed, anything else passes through
/// lowercased. Already bracketed input is accepted.
pub fn normalize_hotkey(input: &str) -> String {
    input
        .split('+')
        .map(|part| {
            part.chars()
                .filter(|c| !c.is_whitespace() && *c != '<' && *c != '>')
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|part| !part.is_empty())
        .map(|part| {
            if MODIFIERS.contains(&part.as_str()) || SPECIAL_KEYS.contains(&part.as_str()) {
                format!("<{part}>")
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join("+")
}

/// `<ctrl>+<alt>+s` -> `ctrl+alt+s`, the editable form
pub fn humanize_hotkey(bracketed: &str) -> String {
    bracketed
        .split('+')
        .map(|part| part.trim().trim_matches(|c| c == '<' || c == '>').to_lowercase())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("+")
}
