use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::io::write_corpus;
use crate::models::{AnnotatedDocument, Corpus, DocumentRecord, TranscriptText};

/// Where the transcript collection lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSource {
    /// Metadata index (CSV)
    pub index: PathBuf,
    /// Directory holding `<docID>.txt`
    pub text_dir: PathBuf,
}

impl Default for TranscriptSource {
    fn default() -> Self {
        Self {
            index: PathBuf::from("data/CCP/2021-09-ccp-corpus-toc.csv"),
            text_dir: PathBuf::from("data/CCP"),
        }
    }
}

/// Configuration for the plain corpus builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub output: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("data/CCP_annotated/AnnotatedCorpus1.xml"),
        }
    }
}

/// Result of building the plain corpus
#[derive(Debug)]
pub struct CorpusResult {
    pub output: PathBuf,
    pub documents: usize,
    /// Rows without a transcript file
    pub missing: usize,
    /// Rows whose transcript could not be read
    pub unreadable: usize,
}

/// Join the metadata rows with their transcripts, in row order
pub fn build_corpus(records: &[DocumentRecord], text_dir: &Path) -> (Corpus, usize, usize) {
    let mut missing = 0;
    let mut unreadable = 0;
    let documents = records
        .iter()
        .map(|record| {
            let transcript = TranscriptText::load(text_dir, record);
            match transcript {
                TranscriptText::Missing => missing += 1,
                TranscriptText::Unreadable => unreadable += 1,
                TranscriptText::Available(_) => {}
            }
            AnnotatedDocument::with_text(
                record.doc_id.clone(),
                record.metadata_fields(),
                transcript.as_text(),
            )
        })
        .collect();
    (Corpus::new(documents), missing, unreadable)
}

/// Execute the corpus builder: one `document` per metadata row, written to
/// a single XML file that replaces any previous one
pub fn execute_build_corpus(
    records: &[DocumentRecord],
    source: &TranscriptSource,
    config: &CorpusConfig,
) -> Result<CorpusResult> {
    let (corpus, missing, unreadable) = build_corpus(records, &source.text_dir);
    write_corpus(&corpus, &config.output)
        .with_context(|| format!("Failed to write corpus to {:?}", config.output))?;

    info!(
        "Wrote {} documents to {:?} ({} without transcript, {} unreadable)",
        corpus.documents.len(),
        config.output,
        missing,
        unreadable
    );

    Ok(CorpusResult {
        output: config.output.clone(),
        documents: corpus.documents.len(),
        missing,
        unreadable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_corpus;
    use crate::models::{NO_TRANSCRIPT, TRANSCRIPT_ERROR};

    fn record(doc_id: &str) -> DocumentRecord {
        DocumentRecord {
            doc_id: doc_id.to_string(),
            event_id: "E1".to_string(),
            convention_type: "T".to_string(),
            doc_title: "Speech".to_string(),
            city: "C".to_string(),
            state: "S".to_string(),
            country: "US".to_string(),
            item_number: "1".to_string(),
            url: "http://x".to_string(),
        }
    }

    #[test]
    fn test_one_document_per_row_in_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("X1.txt"), "Hello world.").unwrap();
        std::fs::write(dir.path().join("X3.txt"), [0xc3, 0x28]).unwrap();

        let records = vec![record("X1"), record("X2"), record("X3")];
        let (corpus, missing, unreadable) = build_corpus(&records, dir.path());

        let ids: Vec<&str> = corpus.documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["X1", "X2", "X3"]);
        assert_eq!(corpus.documents[0].text(), Some("Hello world."));
        assert_eq!(corpus.documents[1].text(), Some(NO_TRANSCRIPT));
        assert_eq!(corpus.documents[2].text(), Some(TRANSCRIPT_ERROR));
        assert_eq!((missing, unreadable), (1, 1));
        assert_eq!(corpus.documents[0].metadata_value("URL"), Some("http://x"));
    }

    #[test]
    fn test_output_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out").join("corpus.xml");
        std::fs::create_dir_all(output.parent().unwrap()).unwrap();
        std::fs::write(&output, "stale content that is much longer than the new corpus".repeat(100))
            .unwrap();

        let source = TranscriptSource {
            index: dir.path().join("toc.csv"),
            text_dir: dir.path().to_path_buf(),
        };
        let config = CorpusConfig {
            output: output.clone(),
        };
        let result = execute_build_corpus(&[record("X9")], &source, &config).unwrap();
        assert_eq!(result.documents, 1);
        assert_eq!(result.missing, 1);

        let corpus = read_corpus(&output).unwrap();
        assert_eq!(corpus.documents.len(), 1);
        assert_eq!(corpus.documents[0].text(), Some(NO_TRANSCRIPT));
    }
}
