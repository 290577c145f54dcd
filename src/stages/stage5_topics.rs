use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::io::{read_corpus, TopicArtifacts};
use crate::models::Corpus;
use crate::topics::{pseudo_documents, tagged_words, topic_words, TopicModel, TopicModelConfig};

/// One annotated corpus to cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCorpus {
    pub xml: PathBuf,
    /// Prefix of every artifact written for this corpus
    pub prefix: String,
    pub n_topics: usize,
}

/// Configuration for topic modeling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicsConfig {
    pub corpora: Vec<TopicCorpus>,
    pub model_dir: PathBuf,
    pub words_dir: PathBuf,
    /// Parent of the per-corpus topic document folders
    pub docs_dir: PathBuf,
    /// Words per pseudo-document
    pub pseudo_document_size: usize,
    /// Shorter pseudo-documents are dropped
    pub min_document_chars: usize,
    pub model: TopicModelConfig,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            corpora: vec![
                TopicCorpus {
                    xml: PathBuf::from("data/MLK_annotated/MLK_annotatedSpacy.xml"),
                    prefix: "MLK".to_string(),
                    n_topics: 4,
                },
                TopicCorpus {
                    xml: PathBuf::from("data/CCP_annotated/CCP_annotatedSpacy.xml"),
                    prefix: "CCp".to_string(),
                    n_topics: 4,
                },
            ],
            model_dir: PathBuf::from("output/TopicsModel"),
            words_dir: PathBuf::from("output/TopicWords"),
            docs_dir: PathBuf::from("output/TopicDocs"),
            pseudo_document_size: 100,
            min_document_chars: 11,
            model: TopicModelConfig::default(),
        }
    }
}

/// Result of modeling one corpus
#[derive(Debug)]
pub struct TopicsResult {
    pub prefix: String,
    pub documents: usize,
    /// Non-outlier topics after reduction
    pub topics: usize,
    pub outliers: usize,
    pub keyword_summary: String,
    pub files: Vec<PathBuf>,
}

/// Filtered topic words of a corpus grouped into pseudo-documents
pub fn build_pseudo_documents(corpus: &Corpus, config: &TopicsConfig) -> Vec<String> {
    let words = topic_words(&tagged_words(corpus));
    pseudo_documents(&words, config.pseudo_document_size, config.min_document_chars)
}

/// Fit, reduce and persist the topics of one corpus
pub fn model_corpus(corpus: &Corpus, target: &TopicCorpus, config: &TopicsConfig) -> Result<TopicsResult> {
    let documents = build_pseudo_documents(corpus, config);
    info!(
        "{}: {} pseudo-documents of up to {} words",
        target.prefix,
        documents.len(),
        config.pseudo_document_size
    );

    let mut model = TopicModel::new(config.model.clone());
    model
        .fit_transform(&documents)
        .with_context(|| format!("Failed to fit topic model for {}", target.prefix))?;
    let scores = model.reduce_topics(&documents, target.n_topics)?;
    let topics = model.topics.clone();

    let artifacts = TopicArtifacts {
        model: &model,
        documents: &documents,
        topics: &topics,
        scores: &scores,
    };
    let mut files = artifacts.write_model_files(&config.model_dir, &target.prefix)?;
    let words_path = config
        .words_dir
        .join(format!("topic_words_{}.txt", target.prefix));
    artifacts.write_keyword_summary(&words_path)?;
    files.push(words_path);
    files.extend(artifacts.write_topic_documents(&config.docs_dir.join(&target.prefix), &target.prefix)?);

    let topic_count = model.topic_ids().len();
    let outliers = topics.iter().filter(|&&t| t == crate::topics::OUTLIER).count();
    info!(
        "Finished {} with {} topics (plus {} outlier documents)",
        target.prefix, topic_count, outliers
    );

    Ok(TopicsResult {
        prefix: target.prefix.clone(),
        documents: documents.len(),
        topics: topic_count,
        outliers,
        keyword_summary: artifacts.keyword_summary(),
        files,
    })
}

/// Execute topic modeling for every configured corpus; corpora share nothing
pub fn execute_topics(config: &TopicsConfig) -> Result<Vec<TopicsResult>> {
    let mut results = Vec::new();
    for target in &config.corpora {
        info!("Processing {}...", target.prefix);
        let corpus = read_corpus(&target.xml)
            .with_context(|| format!("Failed to load corpus for {}", target.prefix))?;
        results.push(model_corpus(&corpus, target, config)?);
    }
    Ok(results)
}
