use serde::{Deserialize, Serialize};

/// A single named metadata value, written as `<name>value</name>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    pub name: String,
    pub value: String,
}

impl MetadataField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A linguistic token with its part-of-speech tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text
    pub text: String,
    /// Universal POS tag (e.g. `NOUN`, `PROPN`)
    pub pos: String,
}

/// A named-entity mention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Entity label (e.g. `PERSON`, `GPE`)
    pub label: String,
    /// Surface text of the span
    pub text: String,
}

/// A sentence-level unit of the speech corpus body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Sequential identifier: `p1`, `p2`, ...
    pub id: String,
    pub tokens: Vec<Token>,
}

/// The content block of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentBody {
    /// Raw transcript text (`<text>`)
    Text(String),
    /// Flat token sequence (`<annotated_text>`)
    Tokens(Vec<Token>),
    /// Sentence units (`<body><paragraph>`)
    Paragraphs(Vec<Paragraph>),
}

impl DocumentBody {
    /// Iterate over every token in document order
    pub fn tokens(&self) -> Box<dyn Iterator<Item = &Token> + '_> {
        match self {
            DocumentBody::Text(_) => Box::new(std::iter::empty()),
            DocumentBody::Tokens(tokens) => Box::new(tokens.iter()),
            DocumentBody::Paragraphs(paragraphs) => {
                Box::new(paragraphs.iter().flat_map(|p| p.tokens.iter()))
            }
        }
    }
}

/// One `document` element of a corpus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    pub id: String,
    pub metadata: Vec<MetadataField>,
    pub body: DocumentBody,
    /// `None` for plain transcript documents, which carry no entity block
    pub entities: Option<Vec<Entity>>,
}

impl AnnotatedDocument {
    /// Plain transcript document (corpus builder output)
    pub fn with_text(id: impl Into<String>, metadata: Vec<MetadataField>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata,
            body: DocumentBody::Text(text.into()),
            entities: None,
        }
    }

    /// Look up a metadata value by field name
    pub fn metadata_value(&self, name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Raw text, if this document carries one
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            DocumentBody::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Element name of the metadata block
    pub fn metadata_element(&self) -> &'static str {
        match self.body {
            DocumentBody::Paragraphs(_) => "metadata",
            _ => "meta",
        }
    }

    /// Element name of the entity block
    pub fn entities_element(&self) -> &'static str {
        match self.body {
            DocumentBody::Paragraphs(_) => "entities",
            _ => "named_entities",
        }
    }
}

/// A whole XML corpus: the `corpus` root and its documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    pub documents: Vec<AnnotatedDocument>,
}

impl Corpus {
    pub fn new(documents: Vec<AnnotatedDocument>) -> Self {
        Self { documents }
    }

    /// Every token across all documents, in document order
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.documents.iter().flat_map(|d| d.body.tokens())
    }

    /// Every entity across all documents, in document order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.documents
            .iter()
            .flat_map(|d| d.entities.iter().flatten())
    }

    /// Get a document by its id
    pub fn get_document(&self, id: &str) -> Option<&AnnotatedDocument> {
        self.documents.iter().find(|d| d.id == id)
    }
}
