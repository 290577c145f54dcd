use std::path::Path;

use speechcorpus::models::{DocumentBody, NO_TRANSCRIPT};
use speechcorpus::stages::{execute_clean, CleanConfig};
use speechcorpus::{
    execute_annotate, execute_annotate_speeches, execute_bigrams, execute_build_corpus,
    execute_entities, execute_topics, execute_wordclouds, read_corpus, read_metadata_index,
    Lexicon, PipelineConfig, RuleBasedModel, SpeechCatalog,
};

const INDEX: &str = "docID,eventID,Convention_Type,docTitle,City,State,Country,Item_Number,URL
X1,E1,T,Speech,C,S,US,1,http://x
X2,E2,State,Proceedings of the Colored Convention,Columbus,OH,US,2,http://y
X3,E3,State,Minutes,Albany,NY,US,3,http://z
";

const THEMES: [&str; 3] = [
    "ballot franchise registrar suffrage county precinct",
    "church gospel hymn sermon pulpit congregation",
    "school teacher lesson pupil schoolhouse academy",
];

fn themed_text(rounds: usize) -> String {
    let mut sentences = Vec::new();
    for round in 0..rounds {
        let theme = THEMES[round % THEMES.len()];
        sentences.push(format!("Frederick Douglass spoke of the {}.", theme.replace(' ', " and ")));
    }
    sentences.join(" ")
}

fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn setup(base: &Path) -> PipelineConfig {
    write(&base.join("data/CCP/2021-09-ccp-corpus-toc.csv"), INDEX);
    write(&base.join("data/CCP/X1.txt"), "Hello world.");
    write(&base.join("data/CCP/X2.txt"), &themed_text(120));

    write(&base.join("data/MLK/01.txt"), &themed_text(90));
    write(&base.join("data/MLK/02.txt"), "A speech nobody catalogued.");
    write(
        &base.join("data/MLK/metadata.json"),
        r#"{"01.txt": {"title": "Give Us the Ballot", "date": "1957-05-17", "place": "Washington, D.C."}}"#,
    );

    let mut config = PipelineConfig::default().resolve(base);
    config.topics.pseudo_document_size = 10;
    config.topics.model.n_neighbors = 5;
    config.topics.model.min_cluster_size = 3;
    config
}

#[test]
fn test_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup(dir.path());
    let model = RuleBasedModel::new(&Lexicon::default());

    // Plain corpus
    let records = read_metadata_index(&config.transcripts.index).unwrap();
    let built = execute_build_corpus(&records, &config.transcripts, &config.corpus).unwrap();
    assert_eq!(built.documents, 3);
    assert_eq!(built.missing, 1);

    let xml = std::fs::read_to_string(&config.corpus.output).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(xml.contains(
        "<document id=\"X1\">\n    <meta>\n      <eventID>E1</eventID>\n      <Convention_Type>T</Convention_Type>\n      <docTitle>Speech</docTitle>\n      <City>C</City>\n      <State>S</State>\n      <Country>US</Country>\n      <Item_Number>1</Item_Number>\n      <URL>http://x</URL>\n    </meta>\n    <text>Hello world.</text>"
    ));
    let plain = read_corpus(&config.corpus.output).unwrap();
    assert_eq!(plain.get_document("X1").unwrap().text(), Some("Hello world."));
    assert_eq!(plain.get_document("X3").unwrap().text(), Some(NO_TRANSCRIPT));

    // Annotated transcripts
    let annotated = execute_annotate(&model, &records, &config.transcripts, &config.annotate).unwrap();
    assert_eq!(annotated.annotated, 2);
    assert_eq!(annotated.skipped, 1);
    let corpus = read_corpus(&config.annotate.output).unwrap();
    let hello: Vec<&str> = corpus
        .get_document("X1")
        .unwrap()
        .body
        .tokens()
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(hello, vec!["Hello", "world", "."]);
    assert_eq!(corpus.get_document("X3").unwrap().body, DocumentBody::Tokens(Vec::new()));

    // Speeches
    let catalog = SpeechCatalog::load(&config.speeches.metadata_file).unwrap();
    let speeches = execute_annotate_speeches(&model, &catalog, &config.speeches).unwrap();
    assert_eq!(speeches.annotated, vec!["01.txt"]);
    assert_eq!(speeches.skipped, vec!["02.txt"]);

    // Statistics
    let bigrams = execute_bigrams(&corpus, &config.statistics);
    assert!(bigrams.len() <= 20);
    assert!(bigrams.windows(2).all(|w| w[0].1 >= w[1].1));
    let entities = execute_entities(&corpus, &config.statistics);
    assert_eq!(entities[0].0, "Frederick Douglass");

    // Topics
    let results = execute_topics(&config.topics).unwrap();
    assert_eq!(results.len(), 2);
    for result in &results {
        assert!(result.topics <= 4);
        assert!(result.documents > 0);
    }
    assert!(dir.path().join("output/TopicsModel/MLK_model.json").exists());
    assert!(dir.path().join("output/TopicWords/topic_words_CCp.txt").exists());

    // Word clouds, one per topic document file
    let clouds = execute_wordclouds(&config.wordclouds).unwrap();
    let docs = std::fs::read_dir(dir.path().join("output/TopicDocs/MLK")).unwrap().count()
        + std::fs::read_dir(dir.path().join("output/TopicDocs/CCp")).unwrap().count();
    assert_eq!(clouds.images.len(), docs);
    assert!(dir
        .path()
        .join("output/TopicDocs/Wordclouds/CCP/CCP_document_0.png")
        .exists());
}

#[test]
fn test_missing_metadata_index_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::default().resolve(dir.path());
    assert!(read_metadata_index(&config.transcripts.index).is_err());
}

#[test]
fn test_cleaner_rewrites_data_tree() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("data/MLK/01.txt"), "We hold these truths to be self-evident.");
    let model = RuleBasedModel::new(&Lexicon::default());

    let config = CleanConfig {
        root: dir.path().join("data"),
    };
    let result = execute_clean(&model, &config).unwrap();
    assert_eq!(result.processed.len(), 1);

    let cleaned = std::fs::read_to_string(dir.path().join("data/MLK/01.txt")).unwrap();
    assert!(cleaned.contains("truths"));
    assert!(!cleaned.contains('.'));
}
