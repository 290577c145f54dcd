use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::cluster::{DensityClustering, OUTLIER};
use super::projection::RandomProjection;
use super::vectorizer::{class_tfidf, cosine, sparse_cosine, tfidf, Vocabulary};
use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicModelConfig {
    /// Neighborhood size used to estimate local density
    pub n_neighbors: usize,
    /// Dimensions of the reduced document space
    pub n_components: usize,
    /// Seed of the projection
    pub random_state: u64,
    pub min_cluster_size: usize,
    /// Keywords kept per topic
    pub top_n_words: usize,
}

impl Default for TopicModelConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 10,
            n_components: 5,
            random_state: 42,
            min_cluster_size: 10,
            top_n_words: 10,
        }
    }
}

/// A fitted topic model over a set of pseudo-documents.
///
/// Topic `-1` collects the outliers and is never merged away. Other topics
/// are numbered from 0 by decreasing size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicModel {
    pub config: TopicModelConfig,
    pub vocabulary: Vec<String>,
    /// Topic of every pseudo-document, in input order
    pub topics: Vec<i32>,
    pub topic_sizes: BTreeMap<i32, usize>,
    pub topic_words: BTreeMap<i32, Vec<(String, f64)>>,
}

impl TopicModel {
    pub fn new(config: TopicModelConfig) -> Self {
        Self {
            config,
            vocabulary: Vec::new(),
            topics: Vec::new(),
            topic_sizes: BTreeMap::new(),
            topic_words: BTreeMap::new(),
        }
    }

    /// Cluster the documents into topics.
    ///
    /// Returns the topic of every document and its membership score: the
    /// cosine similarity between the document and its topic's keyword
    /// weights, 0.0 for outliers.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<(Vec<i32>, Vec<f64>)> {
        if documents.is_empty() {
            return Err(PipelineError::EmptyTopicInput.into());
        }
        let vocabulary = Vocabulary::fit(documents);
        if vocabulary.is_empty() {
            return Err(PipelineError::EmptyTopicInput.into());
        }

        let vectors = tfidf(&vocabulary, documents);
        let projection = RandomProjection::new(
            vocabulary.len(),
            self.config.n_components,
            self.config.random_state,
        );
        let embedded: Vec<Vec<f64>> = vectors.iter().map(|v| projection.transform(v)).collect();

        let clustering = DensityClustering {
            n_neighbors: self.config.n_neighbors,
            min_cluster_size: self.config.min_cluster_size,
        };
        self.topics = clustering.fit(&embedded);
        self.vocabulary = vocabulary.terms().to_vec();

        let scores = self.update_topics(&vocabulary, documents);
        info!(
            "Fitted {} documents into {} topics",
            documents.len(),
            self.topic_ids().len()
        );
        Ok((self.topics.clone(), scores))
    }

    /// Merge topics until at most `nr_topics` remain besides the outliers.
    ///
    /// The smallest topic is repeatedly folded into the topic whose keyword
    /// weights are most similar; afterwards topics are renumbered by size.
    /// Returns refreshed membership scores. Asking for zero topics is an error.
    pub fn reduce_topics(&mut self, documents: &[String], nr_topics: usize) -> Result<Vec<f64>> {
        if nr_topics == 0 {
            return Err(PipelineError::NoTopicsRequested.into());
        }
        if documents.len() != self.topics.len() {
            return Err(anyhow::anyhow!(
                "Model was fitted on {} documents, got {}",
                self.topics.len(),
                documents.len()
            ));
        }
        let vocabulary = Vocabulary::from_terms(self.vocabulary.clone());
        loop {
            let sizes = self.sizes();
            let ids: Vec<i32> = sizes.keys().copied().filter(|&t| t != OUTLIER).collect();
            if ids.len() <= nr_topics {
                break;
            }

            let weights = class_tfidf(&vocabulary, documents, &self.topics);
            let smallest = ids
                .iter()
                .copied()
                .min_by(|a, b| sizes[a].cmp(&sizes[b]).then(b.cmp(a)))
                .unwrap_or(OUTLIER);
            let closest = ids
                .iter()
                .copied()
                .filter(|&t| t != smallest)
                .map(|t| (t, cosine(&weights[&smallest], &weights[&t])))
                .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
                .map(|(t, _)| t)
                .unwrap_or(smallest);

            debug!("Merging topic {} into topic {}", smallest, closest);
            for topic in self.topics.iter_mut() {
                if *topic == smallest {
                    *topic = closest;
                }
            }
        }

        self.renumber();
        let scores = self.update_topics(&vocabulary, documents);
        info!("Reduced to {} topics", self.topic_ids().len());
        Ok(scores)
    }

    /// Non-outlier topic ids, ascending
    pub fn topic_ids(&self) -> Vec<i32> {
        self.topic_sizes
            .keys()
            .copied()
            .filter(|&t| t != OUTLIER)
            .collect()
    }

    pub fn has_outliers(&self) -> bool {
        self.topics.contains(&OUTLIER)
    }

    /// Ranked keywords of a topic with their weights
    pub fn get_topic(&self, topic: i32) -> Option<&[(String, f64)]> {
        self.topic_words.get(&topic).map(Vec::as_slice)
    }

    fn sizes(&self) -> BTreeMap<i32, usize> {
        let mut sizes = BTreeMap::new();
        for &topic in &self.topics {
            *sizes.entry(topic).or_insert(0) += 1;
        }
        sizes
    }

    fn renumber(&mut self) {
        let mut ranked: Vec<(i32, usize)> = self
            .sizes()
            .into_iter()
            .filter(|&(t, _)| t != OUTLIER)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let mapping: BTreeMap<i32, i32> = ranked
            .iter()
            .enumerate()
            .map(|(new, &(old, _))| (old, new as i32))
            .collect();
        for topic in self.topics.iter_mut() {
            if let Some(&new) = mapping.get(topic) {
                *topic = new;
            }
        }
    }

    /// Recompute sizes and keywords, returning membership scores
    fn update_topics(&mut self, vocabulary: &Vocabulary, documents: &[String]) -> Vec<f64> {
        self.topic_sizes = self.sizes();
        let weights = class_tfidf(vocabulary, documents, &self.topics);

        self.topic_words = weights
            .iter()
            .map(|(&topic, row)| {
                let mut ranked: Vec<(usize, f64)> = row
                    .iter()
                    .copied()
                    .enumerate()
                    .filter(|&(_, w)| w > 0.0)
                    .collect();
                ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
                let words = ranked
                    .into_iter()
                    .take(self.config.top_n_words)
                    .map(|(i, w)| (vocabulary.term(i).to_string(), w))
                    .collect();
                (topic, words)
            })
            .collect();

        let vectors = tfidf(vocabulary, documents);
        vectors
            .iter()
            .zip(&self.topics)
            .map(|(vector, topic)| match (topic, weights.get(topic)) {
                (&OUTLIER, _) | (_, None) => 0.0,
                (_, Some(row)) => sparse_cosine(vector, row),
            })
            .collect()
    }
}
