use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::nlp::DEFAULT_MAX_LENGTH;
use crate::stages::{
    AnnotateConfig, CleanConfig, CorpusConfig, SpeechConfig, StatisticsConfig, TopicsConfig,
    TranscriptSource, WordCloudsConfig,
};

/// Settings of the rule-based language model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Optional lexicon JSON; the built-in lexicon is used when absent
    pub lexicon: Option<PathBuf>,
    /// Longest text, in characters, a single call may analyze
    pub max_length: usize,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            lexicon: None,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

/// Configuration of the whole pipeline, one section per stage.
///
/// Every section is optional in the JSON file; missing keys take the
/// defaults, which mirror the `data/` and `output/` layout of the project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub language: LanguageConfig,
    pub clean: CleanConfig,
    pub transcripts: TranscriptSource,
    pub corpus: CorpusConfig,
    pub annotate: AnnotateConfig,
    pub speeches: SpeechConfig,
    pub statistics: StatisticsConfig,
    pub topics: TopicsConfig,
    pub wordclouds: WordCloudsConfig,
}

impl PipelineConfig {
    /// Load from a JSON file, or the defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        info!("Loading configuration from {:?}", path);
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Failed to parse config: {:?}", path))
    }

    /// Make every relative path absolute against `base`
    pub fn resolve(mut self, base: &Path) -> Self {
        let fix = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        if let Some(lexicon) = self.language.lexicon.as_mut() {
            fix(lexicon);
        }
        fix(&mut self.clean.root);
        fix(&mut self.transcripts.index);
        fix(&mut self.transcripts.text_dir);
        fix(&mut self.corpus.output);
        fix(&mut self.annotate.output);
        fix(&mut self.speeches.input_dir);
        fix(&mut self.speeches.metadata_file);
        fix(&mut self.speeches.output);
        fix(&mut self.statistics.input);
        for corpus in &mut self.topics.corpora {
            fix(&mut corpus.xml);
        }
        fix(&mut self.topics.model_dir);
        fix(&mut self.topics.words_dir);
        fix(&mut self.topics.docs_dir);
        for folder in &mut self.wordclouds.folders {
            fix(&mut folder.path);
        }
        fix(&mut self.wordclouds.output_dir);
        self
    }
}
