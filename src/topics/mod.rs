//! Unsupervised topic clustering of pseudo-documents.
//!
//! Documents are vectorized with TF-IDF, projected into a small space with a
//! seeded random projection, clustered by density, and described by
//! class-based TF-IDF keywords.

pub mod cluster;
pub mod documents;
pub mod model;
pub mod projection;
pub mod vectorizer;

pub use cluster::OUTLIER;
pub use documents::{pseudo_documents, tagged_words, topic_words, TaggedWord};
pub use model::{TopicModel, TopicModelConfig};
