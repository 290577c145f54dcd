use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::topics::{TopicModel, OUTLIER};

/// Keywords listed per topic in the summary file
pub const SUMMARY_WORDS: usize = 7;

/// Write any serializable value as pretty JSON, creating parent directories
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    create_parent(path)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value).context("Failed to write JSON")?;
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    Ok(())
}

/// Everything a topic run produces for one corpus
pub struct TopicArtifacts<'a> {
    pub model: &'a TopicModel,
    /// Pseudo-documents the model was fitted on
    pub documents: &'a [String],
    pub topics: &'a [i32],
    pub scores: &'a [f64],
}

impl<'a> TopicArtifacts<'a> {
    /// `<prefix>_model.json`, `<prefix>_topics.json` and `<prefix>_probs.json`
    pub fn write_model_files(&self, model_dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        let paths = vec![
            model_dir.join(format!("{}_model.json", prefix)),
            model_dir.join(format!("{}_topics.json", prefix)),
            model_dir.join(format!("{}_probs.json", prefix)),
        ];
        write_json(self.model, &paths[0])?;
        write_json(self.topics, &paths[1])?;
        write_json(self.scores, &paths[2])?;
        Ok(paths)
    }

    /// `-1: outlier`, then `<id>: <keywords>` per topic, ascending.
    ///
    /// The outlier line is always present, even when no document is an outlier.
    pub fn keyword_summary(&self) -> String {
        let mut lines = vec![format!("{}: outlier", OUTLIER)];
        for id in self.topic_ids() {
            let words: Vec<&str> = self
                .model
                .get_topic(id)
                .unwrap_or_default()
                .iter()
                .take(SUMMARY_WORDS)
                .map(|(word, _)| word.as_str())
                .collect();
            lines.push(format!("{}: {}", id, words.join(" ")));
        }
        lines.join("\n")
    }

    pub fn write_keyword_summary(&self, path: &Path) -> Result<()> {
        create_parent(path)?;
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.keyword_summary())?;
        Ok(())
    }

    /// Pseudo-documents grouped by topic id, outliers included
    pub fn documents_by_topic(&self) -> BTreeMap<i32, Vec<&'a str>> {
        let mut groups: BTreeMap<i32, Vec<&'a str>> = BTreeMap::new();
        for (document, &topic) in self.documents.iter().zip(self.topics) {
            groups.entry(topic).or_default().push(document);
        }
        groups
    }

    /// One `topic_<id>_docs_<prefix>.txt` per topic present, one
    /// pseudo-document per line
    pub fn write_topic_documents(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {:?}", dir))?;
        let mut written = Vec::new();
        for (topic, documents) in self.documents_by_topic() {
            let path = dir.join(format!("topic_{}_docs_{}.txt", topic, prefix));
            let mut file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create file: {:?}", path))?;
            for document in documents {
                writeln!(file, "{}", document)?;
            }
            written.push(path);
        }
        Ok(written)
    }

    fn topic_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.topics.iter().copied().filter(|&t| t != OUTLIER).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Human-readable top-K report, one `<key>: <count> times` line per entry
pub fn format_ranking<K: Display>(title: &str, entries: &[(K, usize)]) -> String {
    let mut output = format!("{}\n", title);
    for (key, count) in entries {
        output.push_str(&format!("{}: {} times\n", key, count));
    }
    output
}
