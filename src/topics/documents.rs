use crate::models::Corpus;

const TOPIC_POS: [&str; 3] = ["NOUN", "PROPN", "ADJ"];
const TOPIC_LABELS: [&str; 3] = ["PERSON", "ORG", "LOC"];

/// A word taken from an annotated corpus with its tag or entity label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedWord<'a> {
    pub word: &'a str,
    pub pos: Option<&'a str>,
    pub label: Option<&'a str>,
}

/// Every token of the corpus, followed by every entity mention.
///
/// Entity mentions come after all tokens rather than at their position in
/// the text, so pseudo-documents built from them mix entities of the whole
/// corpus. Empty words are skipped.
pub fn tagged_words(corpus: &Corpus) -> Vec<TaggedWord<'_>> {
    let tokens = corpus.tokens().map(|t| TaggedWord {
        word: t.text.as_str(),
        pos: Some(t.pos.as_str()),
        label: None,
    });
    let entities = corpus.entities().map(|e| TaggedWord {
        word: e.text.as_str(),
        pos: None,
        label: Some(e.label.as_str()),
    });
    tokens.chain(entities).filter(|w| !w.word.is_empty()).collect()
}

/// Lowercased words that are nouns, proper nouns or adjectives, or that
/// name a person, organization or location
pub fn topic_words(words: &[TaggedWord<'_>]) -> Vec<String> {
    words
        .iter()
        .filter(|w| {
            w.pos.is_some_and(|p| TOPIC_POS.contains(&p))
                || w.label.is_some_and(|l| TOPIC_LABELS.contains(&l))
        })
        .map(|w| w.word.to_lowercase())
        .collect()
}

/// Group words into consecutive pseudo-documents of `size` words, dropping
/// any whose trimmed text has fewer than `min_chars` characters
pub fn pseudo_documents(words: &[String], size: usize, min_chars: usize) -> Vec<String> {
    words
        .chunks(size.max(1))
        .map(|chunk| chunk.join(" "))
        .filter(|doc| doc.trim().chars().count() >= min_chars)
        .collect()
}
