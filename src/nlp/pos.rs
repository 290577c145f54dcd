use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Universal part-of-speech tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UPos {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl UPos {
    pub fn as_str(&self) -> &'static str {
        match self {
            UPos::Adj => "ADJ",
            UPos::Adp => "ADP",
            UPos::Adv => "ADV",
            UPos::Aux => "AUX",
            UPos::Cconj => "CCONJ",
            UPos::Det => "DET",
            UPos::Intj => "INTJ",
            UPos::Noun => "NOUN",
            UPos::Num => "NUM",
            UPos::Part => "PART",
            UPos::Pron => "PRON",
            UPos::Propn => "PROPN",
            UPos::Punct => "PUNCT",
            UPos::Sconj => "SCONJ",
            UPos::Sym => "SYM",
            UPos::Verb => "VERB",
            UPos::X => "X",
        }
    }
}

impl fmt::Display for UPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UPos {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pos = match s {
            "ADJ" => UPos::Adj,
            "ADP" => UPos::Adp,
            "ADV" => UPos::Adv,
            "AUX" => UPos::Aux,
            "CCONJ" => UPos::Cconj,
            "DET" => UPos::Det,
            "INTJ" => UPos::Intj,
            "NOUN" => UPos::Noun,
            "NUM" => UPos::Num,
            "PART" => UPos::Part,
            "PRON" => UPos::Pron,
            "PROPN" => UPos::Propn,
            "PUNCT" => UPos::Punct,
            "SCONJ" => UPos::Sconj,
            "SYM" => UPos::Sym,
            "VERB" => UPos::Verb,
            "X" => UPos::X,
            other => return Err(PipelineError::UnknownPosTag(other.to_string())),
        };
        Ok(pos)
    }
}
