use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::io::find_text_files;
use crate::nlp::LanguageModel;

/// Configuration for the in-place text cleaner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    /// Directory searched recursively for `*.txt` files
    pub root: PathBuf,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
        }
    }
}

/// Result of a cleaning pass
#[derive(Debug, Default)]
pub struct CleanResult {
    /// Files rewritten, relative to the data root
    pub processed: Vec<PathBuf>,
    /// Files that could not be cleaned, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

/// Remove stop words and punctuation from every text file under the root.
///
/// Files are overwritten in place with the remaining tokens joined by single
/// spaces. A failing file is logged and skipped; a missing root is logged
/// and yields an empty result.
pub fn execute_clean(model: &dyn LanguageModel, config: &CleanConfig) -> Result<CleanResult> {
    let mut result = CleanResult::default();
    if !config.root.is_dir() {
        error!("Data directory not found: {:?}", config.root);
        return Ok(result);
    }

    let base = config.root.parent().unwrap_or(&config.root);
    for path in find_text_files(&config.root, true)? {
        let shown = path.strip_prefix(base).unwrap_or(&path).to_path_buf();
        match clean_file(model, &path) {
            Ok(()) => {
                info!("Processed: {}", shown.display());
                result.processed.push(shown);
            }
            Err(e) => {
                let name = file_name(&path);
                error!("Error processing {}: {:#}", name, e);
                result.failed.push((path, format!("{:#}", e)));
            }
        }
    }

    info!("Processed {} files", result.processed.len());
    Ok(result)
}

/// Cleaned form of `text`: content tokens joined by single spaces
pub fn clean_text(model: &dyn LanguageModel, text: &str) -> Result<String> {
    Ok(model.analyze(text)?.content_words().join(" "))
}

fn clean_file(model: &dyn LanguageModel, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    let cleaned = clean_text(model, &text)?;
    std::fs::write(path, cleaned).with_context(|| format!("Failed to write {:?}", path))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
