use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One dictionary entry. Missing or null fields load as empty, scalar
/// fields accept numbers, and `trans` accepts a single string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub usphone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub ukphone: String,
    #[serde(deserialize_with = "string_or_list")]
    pub trans: Vec<String>,
}

impl WordRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn phonetics(&self) -> String {
        format!("US: /{}/   UK: /{}/", self.usphone, self.ukphone)
    }

    pub fn translation(&self) -> String {
        self.trans.join("；")
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .map(scalar_text)
        .unwrap_or_default())
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(scalar_text)
            .collect(),
        Some(Value::String(text)) if text.is_empty() => Vec::new(),
        Some(other) => vec![scalar_text(other)],
    };
    Ok(items)
}

fn scalar_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Parse a JSON array of word records.
///
/// Elements are converted one by one; an element that is not a record is
/// logged and skipped instead of failing the whole file.
pub fn parse_words(json: &str) -> Result<Vec<WordRecord>, DictionaryError> {
    let values: Vec<Value> = serde_json::from_str(json)?;

    let words = values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| {
            if !value.is_object() {
                tracing::warn!("Skipping dictionary entry {i}: not an object");
                return None;
            }
            match serde_json::from_value::<WordRecord>(value) {
                Ok(word) => Some(word),
                Err(e) => {
                    tracing::warn!("Skipping dictionary entry {i}: {e}");
                    None
                }
            }
        })
        .collect();

    Ok(words)
}

pub fn read_words(path: &Path) -> Result<Vec<WordRecord>, DictionaryError> {
    if !path.exists() {
        return Err(DictionaryError::FileNotFound(path.display().to_string()));
    }
    let json = std::fs::read_to_string(path)?;
    parse_words(&json)
}

/// Load a dictionary file; failures are logged and yield an empty list
pub fn load_words(path: &Path) -> Vec<WordRecord> {
    match read_words(path) {
        Ok(words) => {
            tracing::info!("Loaded {} words from {}", words.len(), path.display());
            words
        }
        Err(e) => {
            tracing::error!("Failed to load dictionary {}: {e}", path.display());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let json = r#"[{"name":"apple","usphone":"ˈæpəl","ukphone":"ˈæpl","trans":["n. 苹果","n. 苹果树"]}]"#;
        let words = parse_words(json).unwrap();

        assert_eq!(words.len(), 1);
        assert_eq!(words[0].name, "apple");
        assert_eq!(words[0].translation(), "n. 苹果；n. 苹果树");
        assert_eq!(words[0].phonetics(), "US: /ˈæpəl/   UK: /ˈæpl/");
    }

    #[test]
    fn test_missing_and_null_keys_default() {
        let json = r#"[{"name":"run(x)"},{"usphone":null,"trans":null}]"#;
        let words = parse_words(json).unwrap();

        assert_eq!(words[0], WordRecord::new("run(x)"));
        assert_eq!(words[1], WordRecord::default());
    }

    #[test]
    fn test_odd_record_does_not_drop_the_rest() {
        let json = r#"[
            {"name": "apple", "trans": ["n. 苹果"]},
            {"name": "pear", "trans": "n. 梨"},
            {"name": 123, "usphone": 7, "trans": ["num.", null, 4]},
            "stray string",
            42
        ]"#;
        let words = parse_words(json).unwrap();

        let names: Vec<_> = words.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["apple", "pear", "123"]);
        assert_eq!(words[1].trans, ["n. 梨"]);
        assert_eq!(words[2].usphone, "7");
        assert_eq!(words[2].translation(), "num.；4");
    }

    #[test]
    fn test_empty_trans_string_is_no_translation() {
        let words = parse_words(r#"[{"name": "kiwi", "trans": ""}]"#).unwrap();
        assert!(words[0].trans.is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let json = r#"[{"name":"set"},{"name":"set"}]"#;
        assert_eq!(parse_words(json).unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let dir = std::env::temp_dir().join(format!("studydesk-dict-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.json");
        std::fs::write(&path, r#"{"name": "not a list"}"#).unwrap();

        assert!(matches!(read_words(&path), Err(DictionaryError::ParseError(_))));
        assert!(load_words(&path).is_empty());
        assert!(load_words(&dir.join("absent.json")).is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }
}
