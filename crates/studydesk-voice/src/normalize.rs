use studydesk_types::Accent;
use unicode_normalization::UnicodeNormalization;

/// Reduce a dictionary headword to what the voice endpoint should speak.
///
/// `run(x)` style entries become the bare identifier. Anything else keeps
/// word characters, whitespace and CJK ideographs, with whitespace runs
/// collapsed.
pub fn normalize_word(input: &str) -> String {
    let text: String = input.nfc().collect();

    if let Some(name) = call_name(&text) {
        return name.to_string();
    }

    text.chars()
        .map(|c| if is_kept(c) { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cache file stem: `<normalized>_<type>`
pub fn cache_key(normalized: &str, accent: Accent) -> String {
    format!("{normalized}_{}", accent.type_id())
}

/// Identifier of a leading `name(` call, if the text starts with one
fn call_name(text: &str) -> Option<&str> {
    let text = text.trim_start();
    let first = text.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }

    let end = text
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(text.len());

    let (name, rest) = text.split_at(end);
    rest.trim_start().starts_with('(').then_some(name)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

fn is_kept(c: char) -> bool {
    is_word_char(c) || c.is_whitespace() || is_cjk_ideograph(c)
}
