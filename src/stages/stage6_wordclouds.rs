use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::io::find_text_files;
use crate::render::{save_png, WordCloud, WordCloudConfig};

/// A named folder of topic document files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCloudFolder {
    /// Used for the output subfolder and the image names
    pub name: String,
    pub path: PathBuf,
}

/// Configuration for word-cloud rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordCloudsConfig {
    pub folders: Vec<WordCloudFolder>,
    pub output_dir: PathBuf,
    pub cloud: WordCloudConfig,
}

impl Default for WordCloudsConfig {
    fn default() -> Self {
        Self {
            folders: vec![
                WordCloudFolder {
                    name: "MLK".to_string(),
                    path: PathBuf::from("output/TopicDocs/MLK"),
                },
                WordCloudFolder {
                    name: "CCP".to_string(),
                    path: PathBuf::from("output/TopicDocs/CCp"),
                },
            ],
            output_dir: PathBuf::from("output/TopicDocs/Wordclouds"),
            cloud: WordCloudConfig::default(),
        }
    }
}

#[derive(Debug, Default)]
pub struct WordCloudsResult {
    pub images: Vec<PathBuf>,
}

/// Render `<name>_document_<i>.png` for the i-th text file (sorted) of every
/// folder into `<output_dir>/<name>/`
pub fn execute_wordclouds(config: &WordCloudsConfig) -> Result<WordCloudsResult> {
    let cloud = WordCloud::new(config.cloud.clone());
    let mut result = WordCloudsResult::default();

    for folder in &config.folders {
        let output_folder = config.output_dir.join(&folder.name);
        std::fs::create_dir_all(&output_folder)
            .with_context(|| format!("Failed to create directory: {:?}", output_folder))?;
        if !folder.path.is_dir() {
            warn!("Topic document folder not found: {:?}", folder.path);
            continue;
        }

        for (i, path) in find_text_files(&folder.path, false)?.iter().enumerate() {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            let image = cloud
                .generate(&text)
                .with_context(|| format!("Failed to draw word cloud for {:?}", path))?;
            let output = output_folder.join(format!("{}_document_{}.png", folder.name, i));
            save_png(&image, &output)?;
            result.images.push(output);
        }
        info!("Rendered word clouds for {}", folder.name);
    }

    info!("Saved {} word clouds", result.images.len());
    Ok(result)
}
