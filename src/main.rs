use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use speechcorpus::{
    execute_annotate, execute_annotate_speeches, execute_bigrams, execute_build_corpus,
    execute_clean, execute_entities, execute_topics, execute_wordclouds, format_ranking,
    read_corpus, read_metadata_index, Corpus, DocumentRecord, PipelineConfig, RuleBasedModel,
    SpeechCatalog,
};

#[derive(Parser)]
#[command(name = "speechcorpus")]
#[command(author, version, about = "Annotated corpora, statistics and topics from speech transcripts", long_about = None)]
struct Cli {
    /// Project directory that relative paths are resolved against
    #[arg(long, global = true, default_value = ".")]
    base_dir: PathBuf,

    /// JSON configuration file (defaults are used for missing keys)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip stop words and punctuation from every text file, in place
    Clean,

    /// Build the plain XML corpus from the metadata index and transcripts
    BuildCorpus,

    /// Build the POS- and entity-annotated transcript corpus
    Annotate,

    /// Annotate the speech collection into sentence paragraphs
    AnnotateSpeeches,

    /// Print the most frequent bigrams of an annotated corpus
    Bigrams {
        /// Annotated corpus XML
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Number of entries to print
        #[arg(long)]
        top: Option<usize>,
    },

    /// Print the most frequently mentioned entities of an annotated corpus
    Entities {
        /// Annotated corpus XML
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Number of entries to print
        #[arg(long)]
        top: Option<usize>,
    },

    /// Fit, reduce and save topic models for the configured corpora
    Topics,

    /// Render a word cloud for every topic document file
    Wordclouds,

    /// Run every stage in order
    Run {
        /// Also run the in-place cleaner first (rewrites the data files)
        #[arg(long)]
        clean: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = PipelineConfig::load(cli.config.as_deref())?.resolve(&cli.base_dir);

    match cli.command {
        Commands::Clean => run_clean(&load_model(&config)?, &config),
        Commands::BuildCorpus => run_build_corpus(&load_records(&config)?, &config),
        Commands::Annotate => run_annotate(&load_model(&config)?, &load_records(&config)?, &config),
        Commands::AnnotateSpeeches => run_annotate_speeches(&load_model(&config)?, &config),
        Commands::Bigrams { input, top } => {
            apply_overrides(&mut config, &cli.base_dir, input, top);
            let corpus = load_statistics_corpus(&config)?;
            print_bigrams(&corpus, &config);
            Ok(())
        }
        Commands::Entities { input, top } => {
            apply_overrides(&mut config, &cli.base_dir, input, top);
            let corpus = load_statistics_corpus(&config)?;
            print_entities(&corpus, &config);
            Ok(())
        }
        Commands::Topics => run_topics(&config),
        Commands::Wordclouds => run_wordclouds(&config),
        Commands::Run { clean } => run_all(&config, clean),
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_model(config: &PipelineConfig) -> Result<RuleBasedModel> {
    info!("Loading language model...");
    Ok(RuleBasedModel::load(config.language.lexicon.as_deref())?
        .with_max_length(config.language.max_length))
}

fn load_records(config: &PipelineConfig) -> Result<Vec<DocumentRecord>> {
    let records = read_metadata_index(&config.transcripts.index)?;
    info!("Loaded {} rows from {:?}", records.len(), config.transcripts.index);
    Ok(records)
}

fn apply_overrides(
    config: &mut PipelineConfig,
    base_dir: &Path,
    input: Option<PathBuf>,
    top: Option<usize>,
) {
    if let Some(input) = input {
        config.statistics.input = base_dir.join(input);
    }
    if let Some(top) = top {
        config.statistics.top_k = top;
    }
}

fn run_all(config: &PipelineConfig, clean: bool) -> Result<()> {
    let model = load_model(config)?;

    if clean {
        info!("Stage 0: Cleaning text files...");
        run_clean(&model, config)?;
    }

    let records = load_records(config)?;
    info!("Stage 1: Building corpus...");
    run_build_corpus(&records, config)?;

    info!("Stage 2: Annotating transcripts...");
    run_annotate(&model, &records, config)?;

    info!("Stage 3: Annotating speeches...");
    run_annotate_speeches(&model, config)?;

    info!("Stage 4: Corpus statistics...");
    let corpus = load_statistics_corpus(config)?;
    print_bigrams(&corpus, config);
    print_entities(&corpus, config);

    info!("Stage 5: Topic modeling...");
    run_topics(config)?;

    info!("Stage 6: Word clouds...");
    run_wordclouds(config)?;

    info!("Done!");
    Ok(())
}

fn run_clean(model: &RuleBasedModel, config: &PipelineConfig) -> Result<()> {
    let result = execute_clean(model, &config.clean)?;
    println!("\nProcessing complete!");
    println!("Processed {} files.", result.processed.len());
    if !result.failed.is_empty() {
        println!("Failed: {} files", result.failed.len());
    }
    Ok(())
}

fn run_build_corpus(records: &[DocumentRecord], config: &PipelineConfig) -> Result<()> {
    let result = execute_build_corpus(records, &config.transcripts, &config.corpus)?;
    println!("XML file successfully generated: {}", result.output.display());
    println!(
        "  Documents: {} ({} without transcript, {} unreadable)",
        result.documents, result.missing, result.unreadable
    );
    Ok(())
}

fn run_annotate(
    model: &RuleBasedModel,
    records: &[DocumentRecord],
    config: &PipelineConfig,
) -> Result<()> {
    let result = execute_annotate(model, records, &config.transcripts, &config.annotate)?;
    println!("XML successfully saved to: {}", result.output.display());
    println!(
        "  Documents: {} annotated, {} without transcript, {} failed",
        result.annotated,
        result.skipped,
        result.failed.len()
    );
    Ok(())
}

fn run_annotate_speeches(model: &RuleBasedModel, config: &PipelineConfig) -> Result<()> {
    let catalog = SpeechCatalog::load(&config.speeches.metadata_file)?;
    info!("Loaded metadata for {} speeches", catalog.len());
    let result = execute_annotate_speeches(model, &catalog, &config.speeches)?;
    println!(
        "All speeches annotated: {} written to {}",
        result.annotated.len(),
        result.output.display()
    );
    for name in &result.skipped {
        println!("  No metadata for: {}", name);
    }
    Ok(())
}

fn load_statistics_corpus(config: &PipelineConfig) -> Result<Corpus> {
    read_corpus(&config.statistics.input)
        .with_context(|| format!("Failed to load corpus {:?}", config.statistics.input))
}

fn print_bigrams(corpus: &Corpus, config: &PipelineConfig) {
    let ranking: Vec<(String, usize)> = execute_bigrams(corpus, &config.statistics)
        .into_iter()
        .map(|((first, second), count)| (format!("{} {}", first, second), count))
        .collect();
    let title = format!("{} most frequent bigrams:", config.statistics.top_k);
    print!("{}", format_ranking(&title, &ranking));
}

fn print_entities(corpus: &Corpus, config: &PipelineConfig) {
    let ranking = execute_entities(corpus, &config.statistics);
    let title = format!(
        "The {} most frequently mentioned entities (excluding {}):",
        config.statistics.top_k,
        config.statistics.excluded_labels.join(", ")
    );
    print!("{}", format_ranking(&title, &ranking));
}

fn run_topics(config: &PipelineConfig) -> Result<()> {
    for result in execute_topics(&config.topics)? {
        println!(
            "Finished {} with {} topics (plus outliers if any).",
            result.prefix, result.topics
        );
        println!("{}\n", result.keyword_summary);
    }
    println!("All models, topic words, and documents saved successfully.");
    Ok(())
}

fn run_wordclouds(config: &PipelineConfig) -> Result<()> {
    let result = execute_wordclouds(&config.wordclouds)?;
    println!("All {} word clouds have been saved.", result.images.len());
    Ok(())
}
