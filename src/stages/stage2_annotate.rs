use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::TranscriptSource;
use crate::io::write_corpus;
use crate::models::{AnnotatedDocument, Corpus, DocumentBody, DocumentRecord, TranscriptText};
use crate::nlp::LanguageModel;

/// Configuration for the annotated transcript corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateConfig {
    pub output: PathBuf,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("data/CCP_annotated/CCP_annotatedSpacy.xml"),
        }
    }
}

/// Result of annotating the transcript collection
#[derive(Debug)]
pub struct AnnotateResult {
    pub output: PathBuf,
    pub documents: usize,
    /// Documents that went through the language model
    pub annotated: usize,
    /// Documents left empty because no transcript was available
    pub skipped: usize,
    /// Ids of documents whose annotation failed
    pub failed: Vec<String>,
}

/// Annotate one row: tokens with POS tags and the entity spans.
///
/// Sentinel transcripts and analysis failures give empty blocks; the second
/// value tells whether the language model produced the annotation.
pub fn annotate_record(
    model: &dyn LanguageModel,
    record: &DocumentRecord,
    text_dir: &Path,
) -> (AnnotatedDocument, Result<bool>) {
    let transcript = TranscriptText::load(text_dir, record);
    let mut document = AnnotatedDocument {
        id: record.doc_id.clone(),
        metadata: record.metadata_fields(),
        body: DocumentBody::Tokens(Vec::new()),
        entities: Some(Vec::new()),
    };

    let Some(text) = transcript.annotatable() else {
        debug!("No transcript for {}, leaving annotation empty", record.doc_id);
        return (document, Ok(false));
    };

    match model.analyze(text) {
        Ok(analysis) => {
            document.body = DocumentBody::Tokens(analysis.to_tokens());
            document.entities = Some(analysis.to_entities());
            (document, Ok(true))
        }
        Err(e) => (document, Err(e)),
    }
}

/// Execute the transcript annotation: same rows and metadata as the plain
/// corpus, with `annotated_text` and `named_entities` blocks
pub fn execute_annotate(
    model: &dyn LanguageModel,
    records: &[DocumentRecord],
    source: &TranscriptSource,
    config: &AnnotateConfig,
) -> Result<AnnotateResult> {
    let mut documents = Vec::with_capacity(records.len());
    let mut annotated = 0;
    let mut skipped = 0;
    let mut failed = Vec::new();

    for record in records {
        let (document, outcome) = annotate_record(model, record, &source.text_dir);
        match outcome {
            Ok(true) => annotated += 1,
            Ok(false) => skipped += 1,
            Err(e) => {
                error!("Error processing document {}: {:#}", record.doc_id, e);
                failed.push(record.doc_id.clone());
            }
        }
        documents.push(document);
    }

    let corpus = Corpus::new(documents);
    write_corpus(&corpus, &config.output)
        .with_context(|| format!("Failed to write annotated corpus to {:?}", config.output))?;
    info!(
        "Annotated {} of {} documents, saved to {:?}",
        annotated,
        records.len(),
        config.output
    );

    Ok(AnnotateResult {
        output: config.output.clone(),
        documents: records.len(),
        annotated,
        skipped,
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_corpus;
    use crate::models::NO_TRANSCRIPT;
    use crate::nlp::{Lexicon, RuleBasedModel};

    fn record(doc_id: &str) -> DocumentRecord {
        DocumentRecord {
            doc_id: doc_id.to_string(),
            event_id: "E1".to_string(),
            convention_type: "State".to_string(),
            doc_title: "Proceedings".to_string(),
            city: "Columbus".to_string(),
            state: "OH".to_string(),
            country: "US".to_string(),
            item_number: "1".to_string(),
            url: "http://x".to_string(),
        }
    }

    fn model() -> RuleBasedModel {
        RuleBasedModel::new(&Lexicon::default())
    }

    #[test]
    fn test_tokens_and_entities() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("X1.txt"), "Frederick Douglass spoke in Ohio.").unwrap();

        let (document, outcome) = annotate_record(&model(), &record("X1"), dir.path());
        assert!(outcome.unwrap());
        let tokens: Vec<(&str, &str)> = document
            .body
            .tokens()
            .map(|t| (t.text.as_str(), t.pos.as_str()))
            .collect();
        assert_eq!(tokens.first(), Some(&("Frederick", "PROPN")));
        assert_eq!(tokens.last(), Some(&(".", "PUNCT")));

        let entities = document.entities.unwrap();
        assert!(entities.iter().any(|e| e.label == "PERSON" && e.text == "Frederick Douglass"));
        assert!(entities.iter().any(|e| e.label == "GPE" && e.text == "Ohio"));
    }

    #[test]
    fn test_sentinel_transcripts_stay_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("X2.txt"), format!("  {}\n", NO_TRANSCRIPT)).unwrap();

        for id in ["X1", "X2"] {
            let (document, outcome) = annotate_record(&model(), &record(id), dir.path());
            assert!(!outcome.unwrap());
            assert_eq!(document.body, DocumentBody::Tokens(Vec::new()));
            assert_eq!(document.entities, Some(Vec::new()));
        }
    }

    #[test]
    fn test_failed_document_degrades_to_empty_blocks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("X1.txt"), "A rather long transcript").unwrap();
        std::fs::write(dir.path().join("X2.txt"), "Short").unwrap();
        let output = dir.path().join("annotated.xml");

        let model = model().with_max_length(10);
        let source = TranscriptSource {
            index: dir.path().join("toc.csv"),
            text_dir: dir.path().to_path_buf(),
        };
        let config = AnnotateConfig {
            output: output.clone(),
        };
        let result =
            execute_annotate(&model, &[record("X1"), record("X2")], &source, &config).unwrap();

        assert_eq!(result.failed, vec!["X1".to_string()]);
        assert_eq!(result.annotated, 1);

        let corpus = read_corpus(&output).unwrap();
        assert_eq!(corpus.documents.len(), 2);
        assert_eq!(corpus.documents[0].body.tokens().count(), 0);
        assert_eq!(corpus.documents[1].body.tokens().count(), 1);
        assert_eq!(corpus.documents[1].metadata_value("City"), Some("Columbus"));
    }
}
