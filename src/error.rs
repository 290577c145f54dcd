use std::path::PathBuf;

use thiserror::Error;

/// Domain failures that callers may want to distinguish.
///
/// Everything else (plain I/O, CSV and XML syntax errors) travels as
/// `anyhow::Error` with context attached at the stage boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("metadata index not found: {0:?}")]
    MetadataIndexMissing(PathBuf),

    #[error("metadata index {path:?} is missing required column `{column}`")]
    MissingColumn { path: PathBuf, column: String },

    #[error("duplicate document id `{0}` in metadata index")]
    DuplicateDocumentId(String),

    #[error("text of {len} characters exceeds the language model limit of {max}")]
    TextTooLong { len: usize, max: usize },

    #[error("malformed corpus XML: {0}")]
    MalformedCorpus(String),

    #[error("invalid date `{date}` for speech {file}")]
    InvalidSpeechDate { file: String, date: String },

    #[error("no pseudo-documents to fit a topic model")]
    EmptyTopicInput,

    #[error("topic reduction needs a target of at least one topic")]
    NoTopicsRequested,

    #[error("unknown part-of-speech tag `{0}`")]
    UnknownPosTag(String),
}
