use tracing::debug;

use super::FrequencyTable;
use crate::models::Corpus;

pub type Bigram = (String, String);

/// Counts adjacent word pairs over the token stream of a corpus.
///
/// The stream is joined into one string and cut into chunks of
/// `chunk_size` characters; pairs are counted inside each chunk only, so a
/// pair spanning two chunks is lost and a word cut in half counts as two.
#[derive(Debug, Clone, Copy)]
pub struct BigramCounter {
    pub chunk_size: usize,
}

impl Default for BigramCounter {
    fn default() -> Self {
        Self { chunk_size: 100_000 }
    }
}

impl BigramCounter {
    pub fn count_corpus(&self, corpus: &Corpus) -> FrequencyTable<Bigram> {
        let text = corpus
            .tokens()
            .map(|t| t.text.trim())
            .collect::<Vec<_>>()
            .join(" ");
        self.count_text(&text)
    }

    pub fn count_text(&self, text: &str) -> FrequencyTable<Bigram> {
        let mut table = FrequencyTable::new();
        let chunks = split_chars(text, self.chunk_size.max(1));
        let total = chunks.len();
        for (idx, chunk) in chunks.into_iter().enumerate() {
            debug!("Processing chunk {}/{}", idx + 1, total);
            let words: Vec<&str> = chunk.split_whitespace().collect();
            for pair in words.windows(2) {
                table.increment((pair[0].to_string(), pair[1].to_string()));
            }
        }
        table
    }
}

/// Split into pieces of `size` characters (the last may be shorter)
fn split_chars(text: &str, size: usize) -> Vec<&str> {
    let mut bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).step_by(size).collect();
    bounds.push(text.len());
    bounds.windows(2).map(|w| &text[w[0]..w[1]]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &str, b: &str) -> Bigram {
        (a.to_string(), b.to_string())
    }

    #[test]
    fn test_counts_within_chunk() {
        let counter = BigramCounter::default();
        let table = counter.count_text("we shall overcome we shall overcome someday");
        assert_eq!(table.count(&pair("we", "shall")), 2);
        assert_eq!(table.count(&pair("shall", "overcome")), 2);
        assert_eq!(table.count(&pair("overcome", "we")), 1);
        assert_eq!(table.most_common(1), vec![(pair("we", "shall"), 2)]);
    }

    #[test]
    fn test_pair_across_chunk_boundary_not_counted() {
        // Chunks of 6 chars: "aa bb " | "cc dd"
        let counter = BigramCounter { chunk_size: 6 };
        let table = counter.count_text("aa bb cc dd");
        assert_eq!(table.count(&pair("aa", "bb")), 1);
        assert_eq!(table.count(&pair("cc", "dd")), 1);
        assert_eq!(table.count(&pair("bb", "cc")), 0);
    }

    #[test]
    fn test_chunks_split_on_characters() {
        assert_eq!(split_chars("ééé", 2), vec!["éé", "é"]);
        assert!(split_chars("", 4).is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert!(BigramCounter::default().count_text("").is_empty());
        assert!(BigramCounter::default().count_text("alone").is_empty());
    }
}
