use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;
use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

use super::{Analysis, AnalyzedToken, EntityRecognizer, LanguageModel, Lexicon, UPos};
use crate::error::PipelineError;

/// Default limit on analyzed text length, in characters
pub const DEFAULT_MAX_LENGTH: usize = 1_000_000;

/// Clitics split off the end of a word (`don't` -> `do` + `n't`)
const CLITICS: [&str; 14] = [
    "n't", "n’t", "'s", "’s", "'re", "’re", "'ve", "’ve", "'ll", "’ll", "'d", "’d", "'m", "’m",
];

/// Abbreviations whose trailing period does not end a sentence
const ABBREVIATIONS: [&str; 8] = ["st", "jr", "sr", "vs", "etc", "no", "mt", "ft"];

const SYMBOL_CHARS: &str = "$%#@+=<>©°§¢£€^~|\\";

/// Lexicon-driven English model: UAX #29 segmentation, lookup and suffix
/// tagging, gazetteer entity recognition.
pub struct RuleBasedModel {
    stop_words: HashSet<String>,
    determiners: HashSet<String>,
    pronouns: HashSet<String>,
    adpositions: HashSet<String>,
    coordinating: HashSet<String>,
    subordinating: HashSet<String>,
    auxiliaries: HashSet<String>,
    particles: HashSet<String>,
    interjections: HashSet<String>,
    adverbs: HashSet<String>,
    verbs: HashSet<String>,
    adjectives: HashSet<String>,
    number_words: HashSet<String>,
    titles: HashSet<String>,
    proper_names: HashSet<String>,
    recognizer: EntityRecognizer,
    max_length: usize,
}

fn set(list: &[String]) -> HashSet<String> {
    list.iter().cloned().collect()
}

impl RuleBasedModel {
    pub fn new(lexicon: &Lexicon) -> Self {
        let mut stop_words: HashSet<String> = get(LANGUAGE::English).into_iter().collect();
        stop_words.extend(lexicon.extra_stop_words.iter().cloned());

        let mut proper_names = set(&lexicon.person_names);
        proper_names.extend(lexicon.geopolitical.iter().cloned());
        proper_names.extend(lexicon.nationalities.iter().cloned());
        proper_names.extend(lexicon.months.iter().cloned());
        proper_names.extend(lexicon.weekdays.iter().cloned());

        Self {
            stop_words,
            determiners: set(&lexicon.determiners),
            pronouns: set(&lexicon.pronouns),
            adpositions: set(&lexicon.adpositions),
            coordinating: set(&lexicon.coordinating_conjunctions),
            subordinating: set(&lexicon.subordinating_conjunctions),
            auxiliaries: set(&lexicon.auxiliaries),
            particles: set(&lexicon.particles),
            interjections: set(&lexicon.interjections),
            adverbs: set(&lexicon.adverbs),
            verbs: set(&lexicon.verbs),
            adjectives: set(&lexicon.adjectives),
            number_words: set(&lexicon.number_words),
            titles: set(&lexicon.person_titles),
            proper_names,
            recognizer: EntityRecognizer::new(lexicon),
            max_length: DEFAULT_MAX_LENGTH,
        }
    }

    /// Load the lexicon from `path` (or the built-in one) and build the model
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Ok(Self::new(&Lexicon::load_or_default(path)?))
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }

    /// Split `text` into sentences of (byte offset, word) pairs
    fn segment<'a>(&self, text: &'a str) -> Vec<Vec<(usize, &'a str)>> {
        let mut sentences: Vec<Vec<(usize, &'a str)>> = Vec::new();
        let mut continues_previous = false;

        for (sentence_start, sentence) in text.split_sentence_bound_indices() {
            let mut words = Vec::new();
            for (offset, word) in sentence.split_word_bound_indices() {
                if word.chars().all(char::is_whitespace) {
                    continue;
                }
                split_clitic(sentence_start + offset, word, &mut words);
            }
            if words.is_empty() {
                continue;
            }

            let ends_with_abbreviation = self.ends_with_abbreviation(&words);
            match sentences.last_mut() {
                Some(last) if continues_previous => last.extend(words),
                _ => sentences.push(words),
            }
            continues_previous = ends_with_abbreviation;
        }

        sentences
    }

    /// `Mr.`, `Dr.`, `St.` and initials such as `J.` do not close a sentence
    fn ends_with_abbreviation(&self, words: &[(usize, &str)]) -> bool {
        let n = words.len();
        if n < 2 || words[n - 1].1 != "." {
            return false;
        }
        let word = words[n - 2].1;
        let lower = word.to_lowercase();
        let is_initial = word.chars().count() == 1 && word.chars().all(char::is_uppercase);
        is_initial || self.titles.contains(&lower) || ABBREVIATIONS.contains(&lower.as_str())
    }

    /// Assign a Universal POS tag to one word
    fn tag(&self, word: &str, previous: Option<&str>, sentence_initial: bool) -> UPos {
        if !word.chars().any(char::is_alphanumeric) {
            if word.chars().any(|c| SYMBOL_CHARS.contains(c)) {
                return UPos::Sym;
            }
            return UPos::Punct;
        }
        if is_numeric(word) {
            return UPos::Num;
        }

        let lower = word.to_lowercase();
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);

        if capitalized && lower != "i" {
            let function_word = self.determiners.contains(&lower)
                || self.adpositions.contains(&lower)
                || self.coordinating.contains(&lower)
                || self.pronouns.contains(&lower)
                || self.particles.contains(&lower);
            if !sentence_initial && !function_word {
                return UPos::Propn;
            }
            if sentence_initial && self.proper_names.contains(word) {
                return UPos::Propn;
            }
        }

        if lower == "'s" || lower == "’s" {
            // "is" after a pronoun, possessive otherwise
            return match previous {
                Some(p) if self.pronouns.contains(&p.to_lowercase()) => UPos::Aux,
                _ => UPos::Part,
            };
        }
        if self.particles.contains(&lower) || lower == "n’t" {
            return UPos::Part;
        }
        if self.determiners.contains(&lower) {
            return UPos::Det;
        }
        if self.pronouns.contains(&lower) {
            return UPos::Pron;
        }
        if self.auxiliaries.contains(&lower) || lower.starts_with('’') {
            return UPos::Aux;
        }
        if self.coordinating.contains(&lower) {
            return UPos::Cconj;
        }
        if self.subordinating.contains(&lower) {
            return UPos::Sconj;
        }
        if self.adpositions.contains(&lower) {
            return UPos::Adp;
        }
        if self.number_words.contains(&lower) {
            return UPos::Num;
        }
        if self.interjections.contains(&lower) {
            return UPos::Intj;
        }
        if self.adjectives.contains(&lower) {
            return UPos::Adj;
        }
        if self.adverbs.contains(&lower) {
            return UPos::Adv;
        }
        if self.verbs.contains(&lower) {
            return UPos::Verb;
        }

        tag_by_suffix(&lower)
    }
}

impl LanguageModel for RuleBasedModel {
    fn analyze(&self, text: &str) -> Result<Analysis> {
        let len = text.chars().count();
        if len > self.max_length {
            return Err(PipelineError::TextTooLong {
                len,
                max: self.max_length,
            }
            .into());
        }

        let mut analysis = Analysis::default();
        for words in self.segment(text) {
            let first = analysis.tokens.len();
            let mut previous: Option<&str> = None;
            for (i, (offset, word)) in words.iter().enumerate() {
                // quotes and brackets before the first word do not make it mid-sentence
                let sentence_initial = words[..i]
                    .iter()
                    .all(|(_, w)| !w.chars().any(char::is_alphanumeric));
                let pos = self.tag(word, previous, sentence_initial);
                analysis.tokens.push(AnalyzedToken {
                    text: word.to_string(),
                    start: *offset,
                    end: offset + word.len(),
                    pos,
                    is_stop: self.is_stop_word(word),
                    is_punct: pos == UPos::Punct,
                });
                previous = Some(*word);
            }
            analysis.sentences.push(first..analysis.tokens.len());
        }

        analysis.entities = self
            .recognizer
            .recognize(text, &analysis.tokens, &analysis.sentences);
        Ok(analysis)
    }
}

/// Push `word`, splitting a trailing clitic into its own token
fn split_clitic<'a>(offset: usize, word: &'a str, out: &mut Vec<(usize, &'a str)>) {
    for clitic in CLITICS {
        if word.len() > clitic.len() {
            let split = word.len() - clitic.len();
            if word.is_char_boundary(split) && word[split..].eq_ignore_ascii_case(clitic) {
                out.push((offset, &word[..split]));
                out.push((offset + split, &word[split..]));
                return;
            }
        }
    }
    out.push((offset, word));
}

fn is_numeric(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
        && word
            .chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c == '.')
}

fn tag_by_suffix(lower: &str) -> UPos {
    let long = lower.chars().count() > 4;
    if long && lower.ends_with("ly") {
        return UPos::Adv;
    }
    if long && (lower.ends_with("ing") || lower.ends_with("ed")) {
        return UPos::Verb;
    }
    const ADJ_SUFFIXES: [&str; 7] = ["ous", "ful", "ive", "able", "ible", "less", "ish"];
    if long && ADJ_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return UPos::Adj;
    }
    if lower.chars().count() > 5 && (lower.ends_with("ical") || lower.ends_with("ic")) {
        return UPos::Adj;
    }
    UPos::Noun
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> RuleBasedModel {
        RuleBasedModel::new(&Lexicon::default())
    }

    fn texts(analysis: &Analysis) -> Vec<&str> {
        analysis.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokenize_and_tag() {
        let analysis = model().analyze("Hello world.").unwrap();
        assert_eq!(texts(&analysis), vec!["Hello", "world", "."]);
        assert_eq!(analysis.tokens[2].pos, UPos::Punct);
        assert!(analysis.tokens[2].is_punct);
        assert_eq!(analysis.sentences.len(), 1);
    }

    #[test]
    fn test_offsets_point_into_source() {
        let text = "We shall  overcome.";
        let analysis = model().analyze(text).unwrap();
        for token in &analysis.tokens {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_clitics_are_split() {
        let analysis = model().analyze("We don't stop.").unwrap();
        assert_eq!(texts(&analysis), vec!["We", "do", "n't", "stop", "."]);
        assert_eq!(analysis.tokens[2].pos, UPos::Part);
    }

    #[test]
    fn test_sentences_and_abbreviations() {
        let analysis = model()
            .analyze("I met Dr. King in Memphis. He spoke of freedom.")
            .unwrap();
        assert_eq!(analysis.sentences.len(), 2);
        let first: Vec<&str> = analysis
            .sentence_tokens()
            .next()
            .unwrap()
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(first, vec!["I", "met", "Dr", ".", "King", "in", "Memphis", "."]);
    }

    #[test]
    fn test_proper_nouns_and_closed_classes() {
        let analysis = model().analyze("The people of Alabama marched").unwrap();
        let tags: Vec<UPos> = analysis.tokens.iter().map(|t| t.pos).collect();
        assert_eq!(
            tags,
            vec![UPos::Det, UPos::Noun, UPos::Adp, UPos::Propn, UPos::Verb]
        );
    }

    #[test]
    fn test_stop_words_flagged() {
        let analysis = model().analyze("the dream").unwrap();
        assert!(analysis.tokens[0].is_stop);
        assert!(!analysis.tokens[1].is_stop);
        assert_eq!(analysis.content_words(), vec!["dream"]);
    }

    #[test]
    fn test_non_ascii_tokens() {
        let analysis = model().analyze("Señor Núñez habló.").unwrap();
        assert_eq!(texts(&analysis), vec!["Señor", "Núñez", "habló", "."]);
    }

    #[test]
    fn test_text_too_long() {
        let err = model().with_max_length(5).analyze("far too long").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::TextTooLong { len: 12, max: 5 })
        ));
    }
}
