use std::path::Path;

use serde::Deserialize;

use crate::dictionary::DictionaryError;

/// A selectable dictionary; `url` is relative to the assets directory
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogCategory {
    pub category: String,
    #[serde(default)]
    pub dicts: Vec<CatalogEntry>,
}

/// Bundled dictionaries grouped by category, read from `dicts/index.json`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionaryCatalog {
    categories: Vec<CatalogCategory>,
}

impl DictionaryCatalog {
    pub const INDEX: &'static str = "dicts/index.json";

    pub fn new(categories: Vec<CatalogCategory>) -> Self {
        Self { categories }
    }

    pub fn from_json(json: &str) -> Result<Self, DictionaryError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Missing or malformed index yields an empty catalog
    pub fn load(assets_dir: &Path) -> Self {
        let index = assets_dir.join(Self::INDEX);
        let result = std::fs::read_to_string(&index)
            .map_err(DictionaryError::from)
            .and_then(|json| Self::from_json(&json));

        match result {
            Ok(catalog) => {
                tracing::info!("Dictionary catalog: {} entries", catalog.len());
                catalog
            }
            Err(e) => {
                tracing::warn!("No dictionary catalog at {}: {e}", index.display());
                Self::default()
            }
        }
    }

    pub fn categories(&self) -> &[CatalogCategory] {
        &self.categories
    }

    /// All entries in file order
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.categories.iter().flat_map(|c| c.dicts.iter())
    }

    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    pub fn first(&self) -> Option<&CatalogEntry> {
        self.entries().next()
    }

    pub fn find(&self, url: &str) -> Option<&CatalogEntry> {
        self.entries().find(|e| e.url == url)
    }

    /// Entry following `url`, wrapping around; the first entry when `url` is unknown
    pub fn next_after(&self, url: &str) -> Option<&CatalogEntry> {
        let entries: Vec<&CatalogEntry> = self.entries().collect();
        match entries.iter().position(|e| e.url == url) {
            Some(i) => entries.get((i + 1) % entries.len()).copied(),
            None => entries.first().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"[
        {"category": "考试", "dicts": [
            {"name": "CET-4", "url": "dicts/cet4.json"},
            {"name": "CET-6", "url": "dicts/cet6.json"}
        ]},
        {"category": "编程", "dicts": [
            {"name": "Python", "url": "dicts/python.json"}
        ]}
    ]"#;

    #[test]
    fn test_entries_keep_file_order() {
        let catalog = DictionaryCatalog::from_json(INDEX).unwrap();
        let names: Vec<_> = catalog.entries().map(|e| e.name.as_str()).collect();

        assert_eq!(names, ["CET-4", "CET-6", "Python"]);
        assert_eq!(catalog.first().unwrap().url, "dicts/cet4.json");
        assert_eq!(catalog.categories()[1].category, "编程");
    }

    #[test]
    fn test_next_after_wraps() {
        let catalog = DictionaryCatalog::from_json(INDEX).unwrap();

        assert_eq!(catalog.next_after("dicts/cet4.json").unwrap().name, "CET-6");
        assert_eq!(catalog.next_after("dicts/python.json").unwrap().name, "CET-4");
        assert_eq!(catalog.next_after("elsewhere.json").unwrap().name, "CET-4");
    }

    #[test]
    fn test_missing_index_is_empty() {
        let catalog = DictionaryCatalog::load(Path::new("/definitely/not/here"));
        assert!(catalog.is_empty());
        assert!(catalog.next_after("x").is_none());
    }
}
