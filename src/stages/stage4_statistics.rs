use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::Corpus;
use crate::stats::{Bigram, BigramCounter, EntityCounter};

/// Configuration for the bigram and entity rankings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Annotated corpus the rankings are computed from
    pub input: PathBuf,
    pub top_k: usize,
    /// Characters per bigram chunk
    pub chunk_size: usize,
    /// Entity labels left out of the entity ranking
    pub excluded_labels: Vec<String>,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/CCP_annotated/CCP_annotatedSpacy.xml"),
            top_k: 20,
            chunk_size: 100_000,
            excluded_labels: EntityCounter::default().excluded_labels,
        }
    }
}

/// Most frequent adjacent word pairs of the corpus token stream
pub fn execute_bigrams(corpus: &Corpus, config: &StatisticsConfig) -> Vec<(Bigram, usize)> {
    let counter = BigramCounter {
        chunk_size: config.chunk_size,
    };
    let table = counter.count_corpus(corpus);
    info!(
        "Counted {} bigrams ({} distinct)",
        table.total(),
        table.len()
    );
    table.most_common(config.top_k)
}

/// Most frequently mentioned entities, by text
pub fn execute_entities(corpus: &Corpus, config: &StatisticsConfig) -> Vec<(String, usize)> {
    let counter = EntityCounter {
        excluded_labels: config.excluded_labels.clone(),
    };
    let table = counter.count(corpus.entities());
    info!(
        "Counted {} entity mentions ({} distinct)",
        table.total(),
        table.len()
    );
    table.most_common(config.top_k)
}
