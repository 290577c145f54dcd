use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::io::{find_text_files, write_corpus};
use crate::models::{AnnotatedDocument, Corpus, DocumentBody, SpeechCatalog};
use crate::nlp::LanguageModel;

/// Configuration for the speech corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Directory of speech `*.txt` files
    pub input_dir: PathBuf,
    /// JSON mapping of file name to title, date and place
    pub metadata_file: PathBuf,
    pub output: PathBuf,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/MLK"),
            metadata_file: PathBuf::from("data/MLK/metadata.json"),
            output: PathBuf::from("data/MLK_annotated/MLK_annotatedSpacy.xml"),
        }
    }
}

#[derive(Debug)]
pub struct SpeechResult {
    pub output: PathBuf,
    /// File names annotated, in output order
    pub annotated: Vec<String>,
    /// Files without a catalog entry
    pub skipped: Vec<String>,
    /// Files that could not be read or analyzed
    pub failed: Vec<String>,
}

/// Execute the speech annotation.
///
/// Every text file in the input directory with a catalog entry becomes one
/// document with sentence paragraphs and an entity block.
pub fn execute_annotate_speeches(
    model: &dyn LanguageModel,
    catalog: &SpeechCatalog,
    config: &SpeechConfig,
) -> Result<SpeechResult> {
    let mut documents = Vec::new();
    let mut result = SpeechResult {
        output: config.output.clone(),
        annotated: Vec::new(),
        skipped: Vec::new(),
        failed: Vec::new(),
    };

    for path in find_text_files(&config.input_dir, false)? {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some(metadata) = catalog.get(&file_name) else {
            warn!("No metadata for: {}", file_name);
            result.skipped.push(file_name);
            continue;
        };

        let analysis = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))
            .and_then(|text| model.analyze(&text));
        let analysis = match analysis {
            Ok(analysis) => analysis,
            Err(e) => {
                error!("Error annotating {}: {:#}", file_name, e);
                result.failed.push(file_name);
                continue;
            }
        };

        documents.push(AnnotatedDocument {
            id: file_name.clone(),
            metadata: metadata.fields(),
            body: DocumentBody::Paragraphs(analysis.to_paragraphs()),
            entities: Some(analysis.to_entities()),
        });
        info!("Annotated: {}", file_name);
        result.annotated.push(file_name);
    }

    write_corpus(&Corpus::new(documents), &config.output)
        .with_context(|| format!("Failed to write speech corpus to {:?}", config.output))?;
    info!(
        "Annotated {} speeches, saved to {:?}",
        result.annotated.len(),
        config.output
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_corpus;
    use crate::models::SpeechMetadata;
    use crate::nlp::{Lexicon, RuleBasedModel};

    fn catalog() -> SpeechCatalog {
        let mut catalog = SpeechCatalog::default();
        catalog.insert(
            "01.txt",
            SpeechMetadata {
                title: "Give Us the Ballot".to_string(),
                date: "1957-05-17".to_string(),
                place: "Washington, D.C.".to_string(),
            },
        );
        catalog.insert(
            "02.txt",
            SpeechMetadata {
                title: "Loving Your Enemies".to_string(),
                date: "1957-11-17".to_string(),
                place: "Montgomery, Alabama".to_string(),
            },
        );
        catalog
    }

    #[test]
    fn test_speeches_annotated_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("MLK");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("02.txt"), "Love your enemies. Bless them.").unwrap();
        std::fs::write(input.join("01.txt"), "Give us the ballot.").unwrap();
        std::fs::write(input.join("99.txt"), "Unknown speech.").unwrap();

        let config = SpeechConfig {
            input_dir: input.clone(),
            metadata_file: input.join("metadata.json"),
            output: dir.path().join("out").join("MLK.xml"),
        };
        let model = RuleBasedModel::new(&Lexicon::default());
        let result = execute_annotate_speeches(&model, &catalog(), &config).unwrap();

        assert_eq!(result.annotated, vec!["01.txt", "02.txt"]);
        assert_eq!(result.skipped, vec!["99.txt"]);

        let corpus = read_corpus(&config.output).unwrap();
        assert_eq!(corpus.documents.len(), 2);
        let speech = &corpus.documents[1];
        assert_eq!(speech.id, "02.txt");
        assert_eq!(speech.metadata_element(), "metadata");
        assert_eq!(speech.metadata_value("title"), Some("Loving Your Enemies"));
        assert_eq!(speech.metadata_value("date"), Some("1957-11-17"));

        let DocumentBody::Paragraphs(paragraphs) = &speech.body else {
            panic!("expected paragraphs");
        };
        let ids: Vec<&str> = paragraphs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(paragraphs[1].tokens[0].text, "Bless");
    }

    #[test]
    fn test_empty_directory_writes_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let config = SpeechConfig {
            input_dir: dir.path().to_path_buf(),
            metadata_file: dir.path().join("metadata.json"),
            output: dir.path().join("speeches.xml"),
        };
        let model = RuleBasedModel::new(&Lexicon::default());
        let result = execute_annotate_speeches(&model, &catalog(), &config).unwrap();
        assert!(result.annotated.is_empty());
        assert!(read_corpus(&config.output).unwrap().documents.is_empty());
    }
}
