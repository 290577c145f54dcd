use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::PipelineError;
use crate::models::{
    AnnotatedDocument, Corpus, DocumentBody, Entity, MetadataField, Paragraph, Token,
};
use crate::nlp::UPos;

/// Serialize a corpus as pretty-printed XML (two-space indent).
pub fn corpus_to_xml(corpus: &Corpus) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    if corpus.documents.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("corpus")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("corpus")))?;
        for document in &corpus.documents {
            write_document(&mut writer, document)?;
        }
        writer.write_event(Event::End(BytesEnd::new("corpus")))?;
    }

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).context("Corpus XML is not valid UTF-8")
}

/// Write a corpus to `path`, replacing any existing file
pub fn write_corpus(corpus: &Corpus, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    let xml = corpus_to_xml(corpus)?;
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    file.write_all(xml.as_bytes())
        .with_context(|| format!("Failed to write corpus: {:?}", path))?;
    Ok(())
}

fn write_document<W: Write>(writer: &mut Writer<W>, document: &AnnotatedDocument) -> Result<()> {
    let start = BytesStart::new("document").with_attributes([("id", document.id.as_str())]);
    writer.write_event(Event::Start(start))?;

    let meta = document.metadata_element();
    if document.metadata.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(meta)))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new(meta)))?;
        for field in &document.metadata {
            write_leaf(writer, &field.name, None, &field.value)?;
        }
        writer.write_event(Event::End(BytesEnd::new(meta)))?;
    }

    match &document.body {
        DocumentBody::Text(text) => write_leaf(writer, "text", None, text)?,
        DocumentBody::Tokens(tokens) => write_tokens(writer, "annotated_text", tokens)?,
        DocumentBody::Paragraphs(paragraphs) => {
            if paragraphs.is_empty() {
                writer.write_event(Event::Empty(BytesStart::new("body")))?;
            } else {
                writer.write_event(Event::Start(BytesStart::new("body")))?;
                for paragraph in paragraphs {
                    let start = BytesStart::new("paragraph")
                        .with_attributes([("id", paragraph.id.as_str())]);
                    writer.write_event(Event::Start(start))?;
                    write_tokens(writer, "tokens", &paragraph.tokens)?;
                    writer.write_event(Event::End(BytesEnd::new("paragraph")))?;
                }
                writer.write_event(Event::End(BytesEnd::new("body")))?;
            }
        }
    }

    if let Some(entities) = &document.entities {
        let block = document.entities_element();
        if entities.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new(block)))?;
        } else {
            writer.write_event(Event::Start(BytesStart::new(block)))?;
            for entity in entities {
                write_leaf(writer, "entity", Some(("label", &entity.label)), &entity.text)?;
            }
            writer.write_event(Event::End(BytesEnd::new(block)))?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("document")))?;
    Ok(())
}

fn write_tokens<W: Write>(writer: &mut Writer<W>, block: &str, tokens: &[Token]) -> Result<()> {
    if tokens.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(block)))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(block)))?;
    for token in tokens {
        write_leaf(writer, "token", Some(("pos", &token.pos)), &token.text)?;
    }
    writer.write_event(Event::End(BytesEnd::new(block)))?;
    Ok(())
}

/// `<name attr="..">text</name>`, or a self-closing element for empty text
fn write_leaf<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attribute: Option<(&str, &str)>,
    text: &str,
) -> Result<()> {
    let mut start = BytesStart::new(name);
    if let Some(attribute) = attribute {
        start.push_attribute(attribute);
    }
    if text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    let text = xml_safe(text);
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(&text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Drop characters XML 1.0 cannot represent (control characters other than
/// tab, newline and carriage return; U+FFFE and U+FFFF)
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
        })
        .collect()
}

/// Read and parse a corpus file
pub fn read_corpus(path: &Path) -> Result<Corpus> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus: {:?}", path))?;
    parse_corpus(&content).with_context(|| format!("Failed to parse corpus: {:?}", path))
}

/// Parse corpus XML in any of the three document layouts
/// (`text`, `annotated_text` + `named_entities`, `body` + `entities`).
pub fn parse_corpus(xml: &str) -> Result<Corpus> {
    let mut reader = Reader::from_str(xml);
    let mut parser = CorpusParser::default();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let name = local_name(e);
                parser.open(&name, e)?;
                parser.stack.push(name);
            }
            Event::Empty(ref e) => {
                let name = local_name(e);
                parser.open(&name, e)?;
                parser.close(&name)?;
            }
            Event::End(_) => {
                let name = parser
                    .stack
                    .pop()
                    .ok_or_else(|| PipelineError::MalformedCorpus("unbalanced end tag".into()))?;
                parser.close(&name)?;
            }
            Event::Text(ref e) => parser.text.push_str(&e.unescape()?),
            Event::CData(ref e) => parser.text.push_str(&String::from_utf8_lossy(e)),
            Event::Eof => break,
            _ => {}
        }
    }

    if !parser.seen_root {
        return Err(PipelineError::MalformedCorpus("missing <corpus> root".into()).into());
    }
    Ok(Corpus::new(parser.documents))
}

fn local_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attribute(e: &BytesStart, key: &str) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == key.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

struct DocumentBuilder {
    id: String,
    metadata: Vec<MetadataField>,
    body: Option<DocumentBody>,
    entities: Option<Vec<Entity>>,
}

impl DocumentBuilder {
    fn build(self) -> AnnotatedDocument {
        AnnotatedDocument {
            id: self.id,
            metadata: self.metadata,
            body: self.body.unwrap_or_else(|| DocumentBody::Text(String::new())),
            entities: self.entities,
        }
    }

    fn push_token(&mut self, token: Token) -> Result<()> {
        match &mut self.body {
            Some(DocumentBody::Tokens(tokens)) => tokens.push(token),
            Some(DocumentBody::Paragraphs(paragraphs)) => match paragraphs.last_mut() {
                Some(paragraph) => paragraph.tokens.push(token),
                None => return Err(malformed("token outside of a paragraph")),
            },
            _ => return Err(malformed("token outside of a token block")),
        }
        Ok(())
    }
}

fn malformed(message: &str) -> anyhow::Error {
    PipelineError::MalformedCorpus(message.to_string()).into()
}

/// Event-driven builder for [`Corpus`]
#[derive(Default)]
struct CorpusParser {
    documents: Vec<AnnotatedDocument>,
    current: Option<DocumentBuilder>,
    /// Names of the currently open elements
    stack: Vec<String>,
    /// Character data of the innermost leaf
    text: String,
    /// `pos` of the open token or `label` of the open entity
    pending: String,
    seen_root: bool,
}

impl CorpusParser {
    fn parent(&self) -> Option<&str> {
        self.stack.last().map(String::as_str)
    }

    fn open(&mut self, name: &str, e: &BytesStart) -> Result<()> {
        self.text.clear();

        if name == "corpus" && self.stack.is_empty() {
            self.seen_root = true;
            return Ok(());
        }
        if name == "document" {
            let id = attribute(e, "id")?.ok_or_else(|| malformed("document without id"))?;
            self.current = Some(DocumentBuilder {
                id,
                metadata: Vec::new(),
                body: None,
                entities: None,
            });
            return Ok(());
        }

        let in_metadata = matches!(self.parent(), Some("meta") | Some("metadata"));
        let Some(document) = self.current.as_mut() else {
            return Ok(());
        };
        if in_metadata {
            return Ok(());
        }
        match name {
            "annotated_text" => document.body = Some(DocumentBody::Tokens(Vec::new())),
            "body" => document.body = Some(DocumentBody::Paragraphs(Vec::new())),
            "paragraph" => {
                if let Some(DocumentBody::Paragraphs(paragraphs)) = &mut document.body {
                    let id = attribute(e, "id")?
                        .unwrap_or_else(|| format!("p{}", paragraphs.len() + 1));
                    paragraphs.push(Paragraph {
                        id,
                        tokens: Vec::new(),
                    });
                }
            }
            "named_entities" | "entities" => document.entities = Some(Vec::new()),
            "token" => {
                let pos = attribute(e, "pos")?.unwrap_or_default();
                pos.parse::<UPos>()?;
                self.pending = pos;
            }
            "entity" => self.pending = attribute(e, "label")?.unwrap_or_default(),
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        if name == "document" {
            if let Some(document) = self.current.take() {
                self.documents.push(document.build());
            }
            return Ok(());
        }

        let parent = self.parent().map(str::to_string);
        let Some(document) = self.current.as_mut() else {
            return Ok(());
        };
        let text = std::mem::take(&mut self.text);

        match parent.as_deref() {
            Some("meta") | Some("metadata") => {
                document.metadata.push(MetadataField::new(name, text));
                return Ok(());
            }
            Some("document") if name == "text" => {
                document.body = Some(DocumentBody::Text(text));
                return Ok(());
            }
            _ => {}
        }

        match name {
            "token" => document.push_token(Token {
                text,
                pos: std::mem::take(&mut self.pending),
            })?,
            "entity" => {
                let entity = Entity {
                    label: std::mem::take(&mut self.pending),
                    text,
                };
                document
                    .entities
                    .get_or_insert_with(Vec::new)
                    .push(entity);
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, pos: &str) -> Token {
        Token {
            text: text.to_string(),
            pos: pos.to_string(),
        }
    }

    fn entity(label: &str, text: &str) -> Entity {
        Entity {
            label: label.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_plain_document_layout() {
        let corpus = Corpus::new(vec![AnnotatedDocument::with_text(
            "X1",
            vec![MetadataField::new("eventID", "E1"), MetadataField::new("URL", "http://x")],
            "Hello world.",
        )]);
        let xml = corpus_to_xml(&corpus).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<corpus>"));
        assert!(xml.contains("  <document id=\"X1\">\n    <meta>\n      <eventID>E1</eventID>"));
        assert!(xml.contains("<text>Hello world.</text>"));
        assert!(xml.ends_with("</corpus>\n"));
    }

    #[test]
    fn test_tokens_round_trip_with_non_ascii_and_escapes() {
        let corpus = Corpus::new(vec![AnnotatedDocument {
            id: "d&1".to_string(),
            metadata: vec![MetadataField::new("docTitle", "Réunion <\"Équité\">")],
            body: DocumentBody::Tokens(vec![
                token("Señor", "PROPN"),
                token("&", "CCONJ"),
                token("naïve", "ADJ"),
                token("“", "PUNCT"),
            ]),
            entities: Some(vec![entity("PERSON", "José Martí"), entity("ORG", "A & B")]),
        }]);

        let parsed = parse_corpus(&corpus_to_xml(&corpus).unwrap()).unwrap();
        assert_eq!(parsed, corpus);
    }

    #[test]
    fn test_paragraph_round_trip() {
        let corpus = Corpus::new(vec![AnnotatedDocument {
            id: "05.txt".to_string(),
            metadata: vec![
                MetadataField::new("title", "I Have a Dream"),
                MetadataField::new("date", "1963-08-28"),
                MetadataField::new("place", "Lincoln Memorial, Washington, D.C."),
            ],
            body: DocumentBody::Paragraphs(vec![
                Paragraph {
                    id: "p1".to_string(),
                    tokens: vec![token("I", "PRON"), token("dream", "VERB")],
                },
                Paragraph {
                    id: "p2".to_string(),
                    tokens: vec![token("Free", "ADJ")],
                },
            ]),
            entities: Some(vec![entity("GPE", "Washington")]),
        }]);

        let xml = corpus_to_xml(&corpus).unwrap();
        assert!(xml.contains("<metadata>"));
        assert!(xml.contains("<paragraph id=\"p2\">"));
        assert!(xml.contains("<entities>"));
        assert_eq!(parse_corpus(&xml).unwrap(), corpus);
    }

    #[test]
    fn test_empty_annotation_blocks() {
        let corpus = Corpus::new(vec![AnnotatedDocument {
            id: "X9".to_string(),
            metadata: vec![MetadataField::new("eventID", "")],
            body: DocumentBody::Tokens(vec![]),
            entities: Some(vec![]),
        }]);
        let xml = corpus_to_xml(&corpus).unwrap();
        assert!(xml.contains("<annotated_text/>"));
        assert!(xml.contains("<named_entities/>"));
        assert!(xml.contains("<eventID/>"));
        assert_eq!(parse_corpus(&xml).unwrap(), corpus);
    }

    #[test]
    fn test_text_whitespace_preserved() {
        let text = "  First line.\n\nSecond line.  ";
        let corpus = Corpus::new(vec![AnnotatedDocument::with_text("X1", vec![], text)]);
        let parsed = parse_corpus(&corpus_to_xml(&corpus).unwrap()).unwrap();
        assert_eq!(parsed.documents[0].text(), Some(text));
    }

    #[test]
    fn test_control_characters_dropped() {
        let corpus = Corpus::new(vec![AnnotatedDocument::with_text("X1", vec![], "page\u{c}break")]);
        let parsed = parse_corpus(&corpus_to_xml(&corpus).unwrap()).unwrap();
        assert_eq!(parsed.documents[0].text(), Some("pagebreak"));
    }

    #[test]
    fn test_parse_foreign_formatting() {
        let xml = r#"<?xml version='1.0' encoding='utf-8'?>
<corpus><document id="a"><meta><City>Troy</City></meta><annotated_text><token pos="NOUN">  bread </token><token pos="PUNCT">.</token></annotated_text><named_entities><entity label="GPE">Troy</entity></named_entities></document></corpus>"#;
        let corpus = parse_corpus(xml).unwrap();
        let document = corpus.get_document("a").unwrap();
        assert_eq!(document.metadata_value("City"), Some("Troy"));
        let tokens: Vec<&Token> = corpus.tokens().collect();
        assert_eq!(tokens[0].text, "  bread ");
        assert_eq!(tokens[1].pos, "PUNCT");
        assert_eq!(corpus.entities().next().unwrap().label, "GPE");
    }

    #[test]
    fn test_unknown_pos_tag_rejected() {
        let xml = r#"<corpus><document id="a"><annotated_text><token pos="NN">bread</token></annotated_text></document></corpus>"#;
        let err = parse_corpus(xml).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::UnknownPosTag(tag)) if tag == "NN"
        ));

        let untagged = r#"<corpus><document id="a"><annotated_text><token>bread</token></annotated_text></document></corpus>"#;
        assert!(parse_corpus(untagged).is_err());
    }

    #[test]
    fn test_missing_root_is_malformed() {
        let err = parse_corpus("<?xml version=\"1.0\"?>").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MalformedCorpus(_))
        ));
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("corpus.xml");
        let corpus = Corpus::new(vec![AnnotatedDocument::with_text("X1", vec![], "Hi")]);
        write_corpus(&corpus, &path).unwrap();
        assert_eq!(read_corpus(&path).unwrap(), corpus);
    }
}
