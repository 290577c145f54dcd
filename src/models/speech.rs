use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MetadataField;
use crate::error::PipelineError;

/// Descriptive metadata for one speech file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechMetadata {
    pub title: String,
    /// ISO date (`YYYY-MM-DD`)
    pub date: String,
    pub place: String,
}

impl SpeechMetadata {
    /// Fields in output order: title, date, place
    pub fn fields(&self) -> Vec<MetadataField> {
        vec![
            MetadataField::new("title", self.title.as_str()),
            MetadataField::new("date", self.date.as_str()),
            MetadataField::new("place", self.place.as_str()),
        ]
    }
}

/// Mapping from speech file name (e.g. `05.txt`) to its metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeechCatalog {
    entries: BTreeMap<String, SpeechMetadata>,
}

impl SpeechCatalog {
    /// Load a catalog from a JSON object keyed by file name.
    ///
    /// Every date must parse as `YYYY-MM-DD`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read speech metadata: {:?}", path))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to load speech metadata: {:?}", path))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: SpeechCatalog =
            serde_json::from_str(json).context("Failed to parse speech metadata JSON")?;
        for (file, meta) in &catalog.entries {
            NaiveDate::parse_from_str(&meta.date, "%Y-%m-%d").map_err(|_| {
                PipelineError::InvalidSpeechDate {
                    file: file.clone(),
                    date: meta.date.clone(),
                }
            })?;
        }
        Ok(catalog)
    }

    pub fn get(&self, file_name: &str) -> Option<&SpeechMetadata> {
        self.entries.get(file_name)
    }

    pub fn insert(&mut self, file_name: impl Into<String>, metadata: SpeechMetadata) {
        self.entries.insert(file_name.into(), metadata);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_catalog() {
        let json = r#"{
            "05.txt": {"title": "I Have a Dream", "date": "1963-08-28", "place": "Lincoln Memorial, Washington, D.C."}
        }"#;
        let catalog = SpeechCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        let meta = catalog.get("05.txt").unwrap();
        assert_eq!(meta.title, "I Have a Dream");
        assert_eq!(meta.fields()[1], MetadataField::new("date", "1963-08-28"));
        assert!(catalog.get("99.txt").is_none());
    }

    #[test]
    fn test_invalid_date_rejected() {
        let json = r#"{"01.txt": {"title": "Give Us the Ballot", "date": "May 17, 1957", "place": "Washington, D.C."}}"#;
        let err = SpeechCatalog::from_json(json).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::InvalidSpeechDate { .. })
        ));
    }
}
