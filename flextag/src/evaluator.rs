use std::fmt;

use log::info;

use crate::corpus::{Corpus, TaggedSentence};
use crate::errors::{FlextagError, Result};
use crate::tagger::{HmmTagger, Tagger, TaggerChain};

/// Label of the HMM tagger in reports.
pub const HMM_LABEL: &str = "HMM";

/// Computes the fraction of positions where the predicted tag equals the gold tag.
///
/// # Arguments
///
/// * `tagger` - A tagger to evaluate.
/// * `gold` - Reference sentences.
///
/// # Returns
///
/// A value in `[0, 1]`, or 0 if `gold` contains no tokens.
pub fn accuracy<T>(tagger: &T, gold: &[TaggedSentence]) -> f64
where
    T: Tagger + ?Sized,
{
    let mut n_correct = 0;
    let mut n_total = 0;
    for sent in gold {
        let predicted = tagger.tag(&sent.words());
        n_correct += sent
            .tokens()
            .iter()
            .zip(predicted)
            .filter(|(token, tag)| token.tag() == *tag)
            .count();
        n_total += sent.len();
    }
    if n_total == 0 {
        return 0.0;
    }
    n_correct as f64 / n_total as f64
}

/// Sentences the unigram stage is trained on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnigramSource {
    /// The training split, like every other stage.
    Train,

    /// The evaluation split.
    #[default]
    Evaluation,
}

/// Settings of [`evaluate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluationConfig {
    /// Percentage of sentences in the training prefix.
    pub train_percent: u8,

    /// Number of frequent words kept by the lookup stage.
    pub lookup_size: usize,

    pub unigram_source: UnigramSource,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            train_percent: 90,
            lookup_size: 100000,
            unigram_source: UnigramSource::default(),
        }
    }
}

/// Accuracy of one tagger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageAccuracy {
    pub label: &'static str,
    pub accuracy: f64,
}

impl fmt::Display for StageAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.accuracy, self.label)
    }
}

/// Report of [`evaluate()`].
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Number of training sentences.
    pub n_train: usize,

    /// Number of evaluation sentences.
    pub n_test: usize,

    /// Accuracies of the chain stages in construction order, followed by the HMM tagger.
    pub results: Vec<StageAccuracy>,
}

/// Trains every tagger on a prefix of the corpus and measures it on the rest.
///
/// # Arguments
///
/// * `corpus` - Tagged sentences.
/// * `config` - Evaluation settings.
///
/// # Errors
///
/// - [`FlextagError::InvalidArgument`] if `config.train_percent` is not in `1..=99`.
/// - [`FlextagError::EmptyTrainingSplit`] if the training prefix contains no tokens.
/// - [`FlextagError::EmptyEvaluationSplit`] if the evaluation suffix contains no tokens.
pub fn evaluate(corpus: &Corpus, config: &EvaluationConfig) -> Result<Evaluation> {
    let (train, test) = corpus.split(config.train_percent)?;
    info!("{} training and {} test sentences", train.len(), test.len());

    let unigram_sents = match config.unigram_source {
        UnigramSource::Train => train,
        UnigramSource::Evaluation => test,
    };
    info!("Training the tagger chain...");
    let chain = TaggerChain::train(train, unigram_sents, config.lookup_size)?;
    info!("Training the HMM tagger...");
    let hmm = HmmTagger::train(train)?;

    if test.iter().all(TaggedSentence::is_empty) {
        return Err(FlextagError::EmptyEvaluationSplit);
    }

    let mut results = Vec::with_capacity(chain.len() + 1);
    for stage in chain.stages() {
        results.push(StageAccuracy {
            label: stage.kind().label(),
            accuracy: accuracy(&stage, test),
        });
    }
    results.push(StageAccuracy {
        label: HMM_LABEL,
        accuracy: accuracy(&hmm, test),
    });

    Ok(Evaluation {
        n_train: train.len(),
        n_test: test.len(),
        results,
    })
}
