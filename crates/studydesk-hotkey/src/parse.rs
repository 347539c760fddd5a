use global_hotkey::hotkey::{Code, HotKey, Modifiers};

use crate::HotkeyError;

const LETTERS: [Code; 26] = [
    Code::KeyA, Code::KeyB, Code::KeyC, Code::KeyD, Code::KeyE, Code::KeyF, Code::KeyG,
    Code::KeyH, Code::KeyI, Code::KeyJ, Code::KeyK, Code::KeyL, Code::KeyM, Code::KeyN,
    Code::KeyO, Code::KeyP, Code::KeyQ, Code::KeyR, Code::KeyS, Code::KeyT, Code::KeyU,
    Code::KeyV, Code::KeyW, Code::KeyX, Code::KeyY, Code::KeyZ,
];

const DIGITS: [Code; 10] = [
    Code::Digit0, Code::Digit1, Code::Digit2, Code::Digit3, Code::Digit4,
    Code::Digit5, Code::Digit6, Code::Digit7, Code::Digit8, Code::Digit9,
];

const FUNCTION_KEYS: [Code; 12] = [
    Code::F1, Code::F2, Code::F3, Code::F4, Code::F5, Code::F6,
    Code::F7, Code::F8, Code::F9, Code::F10, Code::F11, Code::F12,
];

/// Parse a bracketed combination such as `<ctrl>+<alt>+<right>`.
///
/// Brackets are optional, so the human form `ctrl+alt+right` parses too.
pub fn parse_hotkey(binding: &str) -> Result<HotKey, HotkeyError> {
    let mut modifiers = Modifiers::empty();
    let mut key = None;

    for part in binding.split('+') {
        let name = part
            .trim()
            .trim_matches(|c| c == '<' || c == '>')
            .to_lowercase();
        if name.is_empty() {
            continue;
        }

        if let Some(modifier) = modifier(&name) {
            modifiers |= modifier;
            continue;
        }

        let code = key_code(&name).ok_or_else(|| HotkeyError::UnknownKey(name.clone()))?;
        if key.replace(code).is_some() {
            return Err(HotkeyError::MultipleKeys(binding.to_string()));
        }
    }

    let key = key.ok_or_else(|| HotkeyError::MissingKey(binding.to_string()))?;
    let modifiers = (!modifiers.is_empty()).then_some(modifiers);
    Ok(HotKey::new(modifiers, key))
}

fn modifier(name: &str) -> Option<Modifiers> {
    match name {
        "ctrl" | "control" => Some(Modifiers::CONTROL),
        "alt" | "option" => Some(Modifiers::ALT),
        "shift" => Some(Modifiers::SHIFT),
        "cmd" | "super" | "win" | "meta" => Some(Modifiers::SUPER),
        _ => None,
    }
}

fn key_code(name: &str) -> Option<Code> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return match c {
            'a'..='z' => Some(LETTERS[(c as u8 - b'a') as usize]),
            '0'..='9' => Some(DIGITS[(c as u8 - b'0') as usize]),
            _ => None,
        };
    }

    if let Some(n) = name.strip_prefix('f').and_then(|n| n.parse::<usize>().ok()) {
        return (1..=FUNCTION_KEYS.len())
            .contains(&n)
            .then(|| FUNCTION_KEYS[n - 1]);
    }

    let code = match name {
        "right" => Code::ArrowRight,
        "left" => Code::ArrowLeft,
        "up" => Code::ArrowUp,
        "down" => Code::ArrowDown,
        "enter" => Code::Enter,
        "space" => Code::Space,
        "tab" => Code::Tab,
        "esc" => Code::Escape,
        "delete" => Code::Delete,
        "home" => Code::Home,
        "end" => Code::End,
        "pageup" => Code::PageUp,
        "pagedown" => Code::PageDown,
        _ => return None,
    };
    Some(code)
}
