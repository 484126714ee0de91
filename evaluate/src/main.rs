use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use flextag::{
    evaluate, extract_corpus, ContentPolicy, Corpus, EvaluationConfig, ProjectDumpProvider,
    UnigramSource,
};
use log::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    /// Any token other than punctuation makes a sentence worth keeping
    Any,
    /// Only analyzed or glossed tokens make a sentence worth keeping
    Analyzed,
}

impl From<Policy> for ContentPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Any => Self::AnyNonPunctuation,
            Policy::Analyzed => Self::AnalyzedOnly,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Split {
    Train,
    Test,
}

impl From<Split> for UnigramSource {
    fn from(split: Split) -> Self {
        match split {
            Split::Train => Self::Train,
            Split::Test => Self::Evaluation,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "A program to extract POS-tagged sentences and evaluate backoff taggers.")]
struct Args {
    /// The name of the project
    #[arg(long)]
    project: String,

    /// The directory containing project exports named <PROJECT>.json
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// The corpus file [default: <PROJECT>_training_data.json]
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Extract the corpus from the project instead of evaluating it
    #[arg(long)]
    extract: bool,

    /// Evaluate only the first N sentences of the corpus
    #[arg(long)]
    max_sentences: Option<usize>,

    /// The rule deciding which sentences are kept during extraction
    #[arg(long, value_enum, default_value = "any")]
    content_policy: Policy,

    /// The split the unigram stage is trained on
    #[arg(long, value_enum, default_value = "test")]
    unigram_source: Split,

    /// The percentage of sentences used for training
    #[arg(long, default_value = "90")]
    train_percent: u8,

    /// The number of frequent words kept by the lookup stage
    #[arg(long, default_value = "100000")]
    lookup_size: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let corpus_path = args
        .corpus
        .unwrap_or_else(|| PathBuf::from(format!("{}_training_data.json", args.project)));

    if args.extract {
        let provider = ProjectDumpProvider::new(&args.project_dir);
        let corpus = extract_corpus(&provider, &args.project, args.content_policy.into())?;
        println!("{} sentences", corpus.len());
        corpus.save(&corpus_path)?;

        let corpus = Corpus::load(&corpus_path)?;
        println!("{} sentences", corpus.len());
        return Ok(());
    }

    let mut corpus = Corpus::load(&corpus_path)?;
    if let Some(max_sentences) = args.max_sentences {
        info!("Keeping the first {max_sentences} sentences");
        corpus.truncate(max_sentences);
    }
    println!("{} sentences", corpus.len());

    let config = EvaluationConfig {
        train_percent: args.train_percent,
        lookup_size: args.lookup_size,
        unigram_source: args.unigram_source.into(),
    };
    let report = evaluate(&corpus, &config)?;
    println!("{} train, {} test", report.n_train, report.n_test);
    for result in &report.results {
        println!("{result}");
    }

    Ok(())
}
