use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Word lists driving the rule-based tagger and entity recognizer.
///
/// Every list is lowercase except the gazetteers, which are matched against
/// the surface form. Missing keys in a loaded file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    /// Extra stop words on top of the stock English list
    pub extra_stop_words: Vec<String>,
    pub determiners: Vec<String>,
    pub pronouns: Vec<String>,
    pub adpositions: Vec<String>,
    pub coordinating_conjunctions: Vec<String>,
    pub subordinating_conjunctions: Vec<String>,
    pub auxiliaries: Vec<String>,
    pub particles: Vec<String>,
    pub interjections: Vec<String>,
    pub adverbs: Vec<String>,
    pub verbs: Vec<String>,
    pub adjectives: Vec<String>,
    pub number_words: Vec<String>,
    pub ordinal_words: Vec<String>,
    /// Titles that introduce a person's name (`Mr`, `Reverend`, ...)
    pub person_titles: Vec<String>,
    pub person_names: Vec<String>,
    /// Trailing words that mark an organization (`Party`, `Convention`, ...)
    pub organization_keywords: Vec<String>,
    /// Trailing words that mark a non-political location (`River`, ...)
    pub location_keywords: Vec<String>,
    pub geopolitical: Vec<String>,
    pub nationalities: Vec<String>,
    pub months: Vec<String>,
    pub weekdays: Vec<String>,
}

impl Lexicon {
    /// Load a lexicon from JSON, or the built-in one.
    ///
    /// A configured path that does not exist is not an error: the built-in
    /// lexicon is used and a warning is logged.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => {
                info!("Loading lexicon from {:?}", path);
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read lexicon: {:?}", path))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse lexicon: {:?}", path))
            }
            Some(path) => {
                warn!("Lexicon {:?} not found, using built-in lexicon", path);
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            extra_stop_words: words(&["'s", "n't", "'m", "'re", "'ve", "'ll", "'d"]),
            determiners: words(&[
                "a", "an", "the", "this", "that", "these", "those", "every", "each", "some",
                "any", "no", "all", "both", "either", "neither", "another", "such", "what",
                "which", "whatever", "whichever",
            ]),
            pronouns: words(&[
                "i", "me", "my", "mine", "myself", "we", "us", "our", "ours", "ourselves",
                "you", "your", "yours", "yourself", "yourselves", "he", "him", "his",
                "himself", "she", "her", "hers", "herself", "it", "its", "itself", "they",
                "them", "their", "theirs", "themselves", "who", "whom", "whose", "whoever",
                "someone", "somebody", "something", "anyone", "anybody", "anything",
                "everyone", "everybody", "everything", "nobody", "nothing", "one", "thee",
                "thou", "thy",
            ]),
            adpositions: words(&[
                "of", "in", "on", "at", "by", "for", "with", "from", "into", "onto", "upon",
                "about", "above", "across", "after", "against", "along", "among", "around",
                "before", "behind", "below", "beneath", "beside", "besides", "between",
                "beyond", "despite", "down", "during", "except", "inside", "like", "near",
                "off", "outside", "over", "past", "since", "through", "throughout", "till",
                "toward", "towards", "under", "underneath", "until", "unto", "up", "via",
                "within", "without",
            ]),
            coordinating_conjunctions: words(&["and", "but", "or", "nor", "yet", "so", "&"]),
            subordinating_conjunctions: words(&[
                "if", "because", "although", "though", "while", "whereas", "unless",
                "whether", "as", "than", "once", "lest", "when", "whenever", "where",
                "wherever",
            ]),
            auxiliaries: words(&[
                "be", "am", "is", "are", "was", "were", "been", "being", "have", "has", "had",
                "having", "do", "does", "did", "will", "would", "shall", "should", "can",
                "could", "may", "might", "must", "ought", "'m", "'re", "'s", "'ve", "'ll",
                "'d", "ca", "wo",
            ]),
            particles: words(&["not", "n't", "to"]),
            interjections: words(&[
                "oh", "ah", "alas", "amen", "hallelujah", "hello", "yes", "well", "o", "lo",
            ]),
            adverbs: words(&[
                "very", "too", "also", "now", "then", "here", "there", "never", "always",
                "often", "again", "still", "just", "even", "ever", "only", "soon", "today",
                "tonight", "tomorrow", "yesterday", "already", "almost", "perhaps", "indeed",
                "however", "therefore", "thus", "why", "how", "more", "most", "less", "least",
                "once", "away", "back", "forth", "together", "forward", "long", "much",
            ]),
            verbs: words(&[
                "go", "come", "know", "think", "say", "said", "see", "make", "take", "give",
                "get", "stand", "believe", "live", "let", "seek", "speak", "tell", "bring",
                "hold", "keep", "walk", "fight", "vote", "work", "pray", "sing", "rise",
                "win", "lose", "want", "need", "love", "hope", "dream", "march", "build",
                "free", "came", "went", "knew", "saw", "made", "took", "gave", "stood",
            ]),
            adjectives: words(&[
                "good", "great", "new", "old", "free", "equal", "true", "just", "right",
                "wrong", "black", "white", "colored", "young", "little", "big", "small",
                "high", "low", "long", "whole", "full", "own", "other", "same", "many",
                "few", "last", "next", "first", "able", "poor", "rich", "proud", "strong",
                "weak", "human", "civil", "moral", "political", "social", "national",
            ]),
            number_words: words(&[
                "zero", "two", "three", "four", "five", "six", "seven", "eight", "nine",
                "ten", "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen",
                "seventeen", "eighteen", "nineteen", "twenty", "thirty", "forty", "fifty",
                "sixty", "seventy", "eighty", "ninety", "hundred", "thousand", "million",
                "billion", "score", "dozen",
            ]),
            ordinal_words: words(&[
                "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth",
                "ninth", "tenth", "eleventh", "twelfth", "twentieth", "hundredth",
            ]),
            person_titles: words(&[
                "mr", "mrs", "ms", "miss", "dr", "rev", "reverend", "president", "senator",
                "governor", "gov", "judge", "bishop", "brother", "sister", "elder", "hon",
                "honorable", "general", "captain", "colonel", "mayor", "professor", "prof",
            ]),
            person_names: words(&[
                "Abraham", "Martin", "Luther", "King", "Frederick", "Douglass", "Lincoln",
                "Booker", "Rosa", "Parks", "Malcolm", "Medgar", "Evers", "Ralph", "Abernathy",
                "Coretta", "Jesus", "Moses", "Paul", "John", "James", "William", "Henry",
                "Thomas", "Jefferson", "Kennedy", "Johnson", "Sojourner", "Truth", "Harriet",
                "Tubman", "Garnet", "Allen", "Richard",
            ]),
            organization_keywords: words(&[
                "Party", "Convention", "Association", "Society", "Church", "Committee",
                "Union", "Company", "College", "University", "Conference", "League",
                "Council", "Congress", "Board", "Bureau", "Institute", "Department",
                "Court", "Club", "Assembly", "Legislature", "Senate", "Army", "Navy",
                "Movement", "Commission", "Foundation", "School", "Academy", "Temple",
            ]),
            location_keywords: words(&[
                "River", "Mountain", "Mountains", "Ocean", "Sea", "Lake", "Valley", "Hill",
                "Hills", "Island", "Islands", "Coast", "Gulf", "Bay", "Delta", "Mountaintop",
            ]),
            geopolitical: words(&[
                "America", "United States", "United States of America", "U.S", "U.S.", "USA",
                "D.C", "D.C.",
                "Alabama", "Arkansas", "California", "Connecticut", "Delaware", "Florida",
                "Georgia", "Illinois", "Indiana", "Iowa", "Kansas", "Kentucky", "Louisiana",
                "Maine", "Maryland", "Massachusetts", "Michigan", "Minnesota", "Mississippi",
                "Missouri", "New Hampshire", "New Jersey", "New York", "North Carolina",
                "Ohio", "Pennsylvania", "Rhode Island", "South Carolina", "Tennessee",
                "Texas", "Vermont", "Virginia", "Wisconsin", "Washington", "Birmingham",
                "Montgomery", "Selma", "Memphis", "Atlanta", "Chicago", "Philadelphia",
                "Boston", "Baltimore", "Cleveland", "Detroit", "Cincinnati", "Pittsburgh",
                "Buffalo", "Albany", "Rochester", "Oslo", "Norway", "Vietnam", "Africa",
                "Canada", "England", "Britain", "Great Britain", "Haiti", "Liberia",
                "Mexico", "Cuba", "China", "India", "Russia", "Europe", "Egypt",
            ]),
            nationalities: words(&[
                "American", "Americans", "African", "Africans", "Negro", "Negroes",
                "Christian", "Christians", "Jewish", "Jew", "Jews", "Catholic", "Catholics",
                "Protestant", "Protestants", "Republican", "Republicans", "Democrat",
                "Democrats", "Democratic", "Vietnamese", "English", "British", "French",
                "Anglo-Saxon", "Southern", "Northern", "Baptist", "Baptists", "Methodist",
                "Methodists", "Colored",
            ]),
            months: words(&[
                "January", "February", "March", "April", "May", "June", "July", "August",
                "September", "October", "November", "December",
            ]),
            weekdays: words(&[
                "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let lexicon = Lexicon::load_or_default(Some(&dir.path().join("nope.json"))).unwrap();
        assert_eq!(lexicon, Lexicon::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.json");
        std::fs::write(&path, r#"{"geopolitical": ["Gondor"]}"#).unwrap();

        let lexicon = Lexicon::load_or_default(Some(&path)).unwrap();
        assert_eq!(lexicon.geopolitical, vec!["Gondor".to_string()]);
        assert_eq!(lexicon.months, Lexicon::default().months);
    }
}
