use super::FrequencyTable;
use crate::models::Entity;

/// Counts entity mentions by their trimmed text, ignoring some labels
#[derive(Debug, Clone)]
pub struct EntityCounter {
    pub excluded_labels: Vec<String>,
}

impl Default for EntityCounter {
    fn default() -> Self {
        Self {
            excluded_labels: vec!["CARDINAL".to_string(), "GPE".to_string()],
        }
    }
}

impl EntityCounter {
    pub fn count<'a>(&self, entities: impl IntoIterator<Item = &'a Entity>) -> FrequencyTable<String> {
        entities
            .into_iter()
            .map(|e| (e.label.as_str(), e.text.trim()))
            .filter(|(label, text)| !label.is_empty() && !text.is_empty())
            .filter(|(label, _)| !self.excluded_labels.iter().any(|x| x == *label))
            .map(|(_, text)| text.to_string())
            .collect()
    }
}
