pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod nlp;
pub mod render;
pub mod stages;
pub mod stats;
pub mod topics;

pub use config::{LanguageConfig, PipelineConfig};
pub use error::PipelineError;
pub use io::{format_ranking, read_corpus, read_metadata_index, write_corpus, TopicArtifacts};
pub use models::{AnnotatedDocument, Corpus, DocumentRecord, SpeechCatalog};
pub use nlp::{Analysis, LanguageModel, Lexicon, RuleBasedModel};
pub use stages::{
    execute_annotate, execute_annotate_speeches, execute_bigrams, execute_build_corpus,
    execute_clean, execute_entities, execute_topics, execute_wordclouds,
};
pub use topics::{TopicModel, TopicModelConfig};
