use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

use super::{AnalyzedToken, EntitySpan, Lexicon, UPos};

/// Named-entity labels emitted by the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    Person,
    Org,
    Gpe,
    Loc,
    Norp,
    Date,
    Cardinal,
    Ordinal,
    Money,
    Percent,
}

impl EntityLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityLabel::Person => "PERSON",
            EntityLabel::Org => "ORG",
            EntityLabel::Gpe => "GPE",
            EntityLabel::Loc => "LOC",
            EntityLabel::Norp => "NORP",
            EntityLabel::Date => "DATE",
            EntityLabel::Cardinal => "CARDINAL",
            EntityLabel::Ordinal => "ORDINAL",
            EntityLabel::Money => "MONEY",
            EntityLabel::Percent => "PERCENT",
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase connectors allowed inside a proper-name span
const CONNECTORS: [&str; 3] = ["of", "the", "de"];

/// Gazetteer and capitalization based entity recognizer
pub struct EntityRecognizer {
    titles: HashSet<String>,
    person_names: HashSet<String>,
    organization_keywords: HashSet<String>,
    location_keywords: HashSet<String>,
    geopolitical: HashSet<String>,
    nationalities: HashSet<String>,
    months: HashSet<String>,
    weekdays: HashSet<String>,
    ordinals: HashSet<String>,
}

fn set(list: &[String]) -> HashSet<String> {
    list.iter().cloned().collect()
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

impl EntityRecognizer {
    pub fn new(lexicon: &Lexicon) -> Self {
        Self {
            titles: set(&lexicon.person_titles),
            person_names: set(&lexicon.person_names),
            organization_keywords: set(&lexicon.organization_keywords),
            location_keywords: set(&lexicon.location_keywords),
            geopolitical: set(&lexicon.geopolitical),
            nationalities: set(&lexicon.nationalities),
            months: set(&lexicon.months),
            weekdays: set(&lexicon.weekdays),
            ordinals: set(&lexicon.ordinal_words),
        }
    }

    /// Find entity spans sentence by sentence; spans never cross a sentence.
    pub fn recognize(
        &self,
        text: &str,
        tokens: &[AnalyzedToken],
        sentences: &[Range<usize>],
    ) -> Vec<EntitySpan> {
        let mut spans = Vec::new();
        for sentence in sentences {
            let mut i = sentence.start;
            while i < sentence.end {
                match self.match_at(tokens, i, sentence) {
                    Some((range, label)) => {
                        let end = range.end;
                        spans.push(EntitySpan {
                            label,
                            text: text[tokens[range.start].start..tokens[range.end - 1].end]
                                .to_string(),
                            start_token: range.start,
                            end_token: range.end,
                        });
                        i = end;
                    }
                    None => i += 1,
                }
            }
        }
        spans
    }

    /// Try to start an entity at token `i`
    fn match_at(
        &self,
        tokens: &[AnalyzedToken],
        i: usize,
        sentence: &Range<usize>,
    ) -> Option<(Range<usize>, EntityLabel)> {
        let token = &tokens[i];
        let lower = token.text.to_lowercase();

        if self.months.contains(&token.text)
            && i + 1 < sentence.end
            && tokens[i + 1].pos == UPos::Num
        {
            return Some(self.date_span(tokens, i, sentence));
        }
        if self.weekdays.contains(&token.text) {
            return Some((i..i + 1, EntityLabel::Date));
        }
        if self.ordinals.contains(&lower) || is_numeric_ordinal(&lower) {
            return Some((i..i + 1, EntityLabel::Ordinal));
        }
        if token.pos == UPos::Num {
            return Some(self.number_span(tokens, i, sentence));
        }
        if self.is_name_start(tokens, i, sentence) {
            return self.name_span(tokens, i, sentence);
        }
        None
    }

    /// `August 28, 1963`
    fn date_span(
        &self,
        tokens: &[AnalyzedToken],
        i: usize,
        sentence: &Range<usize>,
    ) -> (Range<usize>, EntityLabel) {
        let mut end = i + 2;
        if end + 1 < sentence.end
            && tokens[end].text == ","
            && is_year(&tokens[end + 1].text)
        {
            end += 2;
        }
        (i..end, EntityLabel::Date)
    }

    /// Runs of numbers, with `$` / `%` turning them into money / percent
    fn number_span(
        &self,
        tokens: &[AnalyzedToken],
        i: usize,
        sentence: &Range<usize>,
    ) -> (Range<usize>, EntityLabel) {
        let mut end = i + 1;
        while end < sentence.end && tokens[end].pos == UPos::Num {
            end += 1;
        }
        if i > sentence.start && tokens[i - 1].text == "$" {
            return (i - 1..end, EntityLabel::Money);
        }
        if end < sentence.end
            && (tokens[end].text == "%" || tokens[end].text.eq_ignore_ascii_case("percent"))
        {
            return (i..end + 1, EntityLabel::Percent);
        }
        if end == i + 1 && is_year(&tokens[i].text) {
            return (i..end, EntityLabel::Date);
        }
        (i..end, EntityLabel::Cardinal)
    }

    fn is_name_start(&self, tokens: &[AnalyzedToken], i: usize, sentence: &Range<usize>) -> bool {
        let token = &tokens[i];
        if token.pos == UPos::Propn {
            return true;
        }
        // sentence-initial words are only names when the gazetteers know them
        i == sentence.start
            && is_capitalized(&token.text)
            && (self.person_names.contains(&token.text)
                || self.geopolitical.contains(&token.text)
                || self.nationalities.contains(&token.text))
    }

    fn name_span(
        &self,
        tokens: &[AnalyzedToken],
        i: usize,
        sentence: &Range<usize>,
    ) -> Option<(Range<usize>, EntityLabel)> {
        let mut end = i + 1;
        while end < sentence.end {
            let t = &tokens[end];
            if t.pos == UPos::Propn && is_capitalized(&t.text) {
                end += 1;
            } else if CONNECTORS.contains(&t.text.as_str())
                && end + 1 < sentence.end
                && tokens[end + 1].pos == UPos::Propn
            {
                end += 1;
            } else if t.text == "." && tokens[end - 1].text.contains('.') {
                // abbreviations such as D.C.
                end += 1;
            } else {
                break;
            }
        }

        let mut start = i;
        let mut titled = self.preceded_by_title(tokens, i, sentence);
        while start < end - 1 && self.titles.contains(&tokens[start].text.to_lowercase()) {
            start += 1;
            titled = true;
        }
        if start < end - 1 && tokens[start].pos == UPos::Det {
            start += 1;
        }
        if start == end - 1 && tokens[start].text == "." {
            return None;
        }

        let label = self.label_name(&tokens[start..end], titled)?;
        Some((start..end, label))
    }

    /// `Mr King`, `Dr. King`, `President Lincoln`
    fn preceded_by_title(
        &self,
        tokens: &[AnalyzedToken],
        i: usize,
        sentence: &Range<usize>,
    ) -> bool {
        let is_title = |idx: usize| self.titles.contains(&tokens[idx].text.to_lowercase());
        if i > sentence.start && is_title(i - 1) {
            return true;
        }
        i >= sentence.start + 2 && tokens[i - 1].text == "." && is_title(i - 2)
    }

    fn label_name(&self, span: &[AnalyzedToken], titled: bool) -> Option<EntityLabel> {
        let words: Vec<&str> = span.iter().map(|t| t.text.as_str()).collect();
        let phrase = words.join(" ");
        let first = words[0];
        let last = words[words.len() - 1];

        if titled {
            return Some(EntityLabel::Person);
        }
        if words.len() > 1 && words.iter().any(|w| self.organization_keywords.contains(*w)) {
            return Some(EntityLabel::Org);
        }
        if self.location_keywords.contains(last) && words.len() > 1 {
            return Some(EntityLabel::Loc);
        }
        if self.geopolitical.contains(&phrase)
            || self.geopolitical.contains(&phrase.replace(" .", "."))
        {
            return Some(EntityLabel::Gpe);
        }
        if words.len() == 1 && self.nationalities.contains(first) {
            return Some(EntityLabel::Norp);
        }
        if self.months.contains(first) && words.len() == 1 {
            return None;
        }
        if words.iter().any(|w| self.person_names.contains(*w)) {
            return Some(EntityLabel::Person);
        }
        if words.len() == 1 && is_acronym(first) {
            return Some(EntityLabel::Org);
        }
        if words.len() > 1 && words.iter().all(|w| w.chars().all(char::is_alphabetic)) {
            return Some(EntityLabel::Person);
        }
        if words.len() > 1 {
            return Some(EntityLabel::Org);
        }
        None
    }
}

fn is_year(word: &str) -> bool {
    word.len() == 4
        && word.chars().all(|c| c.is_ascii_digit())
        && word.parse::<u32>().is_ok_and(|y| (1500..=2099).contains(&y))
}

fn is_numeric_ordinal(lower: &str) -> bool {
    let digits = lower.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    let suffix = &lower[digits.len()..];
    !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && matches!(suffix, "st" | "nd" | "rd" | "th")
}

fn is_acronym(word: &str) -> bool {
    word.chars().count() >= 2 && word.chars().all(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use crate::nlp::{LanguageModel, Lexicon, RuleBasedModel};

    fn entities(text: &str) -> Vec<(String, String)> {
        let model = RuleBasedModel::new(&Lexicon::default());
        model
            .analyze(text)
            .unwrap()
            .entities
            .iter()
            .map(|e| (e.label.as_str().to_string(), e.text.clone()))
            .collect()
    }

    fn pair(label: &str, text: &str) -> (String, String) {
        (label.to_string(), text.to_string())
    }

    #[test]
    fn test_place_and_person() {
        let found = entities("We marched with Martin Luther King through Selma.");
        assert!(found.contains(&pair("PERSON", "Martin Luther King")));
        assert!(found.contains(&pair("GPE", "Selma")));
    }

    #[test]
    fn test_titled_person() {
        let found = entities("Yesterday Dr. Abernathy spoke.");
        assert!(found.contains(&pair("PERSON", "Abernathy")));
    }

    #[test]
    fn test_organization_and_connector() {
        let found = entities(
            "He addressed the Colored Convention of Ohio and the United States of America.",
        );
        assert!(found.contains(&pair("ORG", "Colored Convention of Ohio")));
        assert!(found.contains(&pair("GPE", "United States of America")));
    }

    #[test]
    fn test_numbers_dates_and_nationalities() {
        let found = entities("On August 28, 1963 about 250,000 Americans came.");
        assert!(found.contains(&pair("DATE", "August 28, 1963")));
        assert!(found.contains(&pair("CARDINAL", "250,000")));
        assert!(found.contains(&pair("NORP", "Americans")));
    }

    #[test]
    fn test_spans_do_not_cross_sentences() {
        let found = entities("They came from Alabama. Georgia followed.");
        assert!(found.contains(&pair("GPE", "Alabama")));
        assert!(found.contains(&pair("GPE", "Georgia")));
    }
}
