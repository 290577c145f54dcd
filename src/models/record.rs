use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::MetadataField;

/// Placeholder text for a row whose transcript file does not exist
pub const NO_TRANSCRIPT: &str = "No transcript available";

/// Placeholder text for a row whose transcript exists but could not be read
pub const TRANSCRIPT_ERROR: &str = "Error loading transcription";

/// Metadata columns copied into every document, in output order
pub const METADATA_FIELDS: [&str; 8] = [
    "eventID",
    "Convention_Type",
    "docTitle",
    "City",
    "State",
    "Country",
    "Item_Number",
    "URL",
];

/// Columns the metadata index must provide
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "docID",
    "eventID",
    "Convention_Type",
    "docTitle",
    "City",
    "State",
    "Country",
    "Item_Number",
    "URL",
];

/// One row of the metadata index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(rename = "docID")]
    pub doc_id: String,
    #[serde(rename = "eventID")]
    pub event_id: String,
    #[serde(rename = "Convention_Type")]
    pub convention_type: String,
    #[serde(rename = "docTitle")]
    pub doc_title: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Item_Number")]
    pub item_number: String,
    #[serde(rename = "URL")]
    pub url: String,
}

impl DocumentRecord {
    /// Metadata fields in the fixed output order
    pub fn metadata_fields(&self) -> Vec<MetadataField> {
        let values = [
            &self.event_id,
            &self.convention_type,
            &self.doc_title,
            &self.city,
            &self.state,
            &self.country,
            &self.item_number,
            &self.url,
        ];
        METADATA_FIELDS
            .iter()
            .zip(values)
            .map(|(name, value)| MetadataField::new(*name, value.as_str()))
            .collect()
    }

    /// File name of the transcript belonging to this row
    pub fn transcript_file_name(&self) -> String {
        format!("{}.txt", self.doc_id)
    }
}

/// Outcome of looking up a row's transcript on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptText {
    Available(String),
    Missing,
    Unreadable,
}

impl TranscriptText {
    /// Load `<doc_id>.txt` from `text_dir`.
    ///
    /// Read failures are logged and recorded, never propagated.
    pub fn load(text_dir: &Path, record: &DocumentRecord) -> Self {
        let path = text_dir.join(record.transcript_file_name());
        if !path.exists() {
            return TranscriptText::Missing;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => TranscriptText::Available(text),
            Err(e) => {
                warn!("Error loading {:?}: {}", path, e);
                TranscriptText::Unreadable
            }
        }
    }

    /// Text written into the corpus, with sentinels substituted
    pub fn as_text(&self) -> &str {
        match self {
            TranscriptText::Available(text) => text,
            TranscriptText::Missing => NO_TRANSCRIPT,
            TranscriptText::Unreadable => TRANSCRIPT_ERROR,
        }
    }

    /// Text worth running through the language model, if any.
    ///
    /// A file whose whole content is the "no transcript" sentinel counts as missing.
    pub fn annotatable(&self) -> Option<&str> {
        match self {
            TranscriptText::Available(text) if text.trim() != NO_TRANSCRIPT => Some(text),
            _ => None,
        }
    }
}
