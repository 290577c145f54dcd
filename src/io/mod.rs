pub mod corpus_xml;
pub mod input;
pub mod output;

pub use corpus_xml::{corpus_to_xml, parse_corpus, read_corpus, write_corpus};
pub use input::{find_text_files, parse_metadata_index, read_metadata_index};
pub use output::{format_ranking, write_json, TopicArtifacts};
