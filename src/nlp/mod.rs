pub mod entities;
pub mod lexicon;
pub mod pos;
pub mod rule_based;

pub use entities::*;
pub use lexicon::*;
pub use pos::*;
pub use rule_based::*;

use std::ops::Range;

use anyhow::Result;

use crate::models::{Entity, Paragraph, Token};

/// Tokenizer, tagger and entity recognizer behind one call.
///
/// Loaded once per run and passed by reference to every stage that needs it.
pub trait LanguageModel {
    /// Analyze a text into sentences, tagged tokens and entity spans
    fn analyze(&self, text: &str) -> Result<Analysis>;
}

/// A token produced by the language model
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedToken {
    pub text: String,
    /// Byte offset of the token in the analyzed text
    pub start: usize,
    /// Byte offset one past the end of the token
    pub end: usize,
    pub pos: UPos,
    pub is_stop: bool,
    pub is_punct: bool,
}

/// A detected named-entity span over `tokens[start_token..end_token]`
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpan {
    pub label: EntityLabel,
    pub text: String,
    pub start_token: usize,
    pub end_token: usize,
}

/// Result of analyzing one text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    pub tokens: Vec<AnalyzedToken>,
    /// Token index ranges, one per sentence, in order
    pub sentences: Vec<Range<usize>>,
    pub entities: Vec<EntitySpan>,
}

impl Analysis {
    /// Tokens of each sentence
    pub fn sentence_tokens(&self) -> impl Iterator<Item = &[AnalyzedToken]> {
        self.sentences.iter().map(|r| &self.tokens[r.clone()])
    }

    /// Flat token sequence for the `annotated_text` block
    pub fn to_tokens(&self) -> Vec<Token> {
        self.tokens.iter().map(to_token).collect()
    }

    /// One paragraph per sentence, numbered `p1`, `p2`, ...
    pub fn to_paragraphs(&self) -> Vec<Paragraph> {
        self.sentence_tokens()
            .enumerate()
            .map(|(i, tokens)| Paragraph {
                id: format!("p{}", i + 1),
                tokens: tokens.iter().map(to_token).collect(),
            })
            .collect()
    }

    pub fn to_entities(&self) -> Vec<Entity> {
        self.entities
            .iter()
            .map(|e| Entity {
                label: e.label.as_str().to_string(),
                text: e.text.clone(),
            })
            .collect()
    }

    /// Token texts that are neither stop words nor punctuation
    pub fn content_words(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|t| !t.is_stop && !t.is_punct)
            .map(|t| t.text.as_str())
            .collect()
    }
}

fn to_token(token: &AnalyzedToken) -> Token {
    Token {
        text: token.text.clone(),
        pos: token.pos.as_str().to_string(),
    }
}
