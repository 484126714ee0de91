//! # Flextag
//!
//! Flextag extracts part-of-speech tagged sentences from the interlinear texts of a linguistic
//! project and evaluates a chain of backoff taggers on them.
//!
//! ## Examples
//!
//! ```no_run
//! use flextag::{evaluate, extract_corpus, ContentPolicy, EvaluationConfig, ProjectDumpProvider};
//!
//! let provider = ProjectDumpProvider::new("projects");
//! let corpus = extract_corpus(&provider, "blx-flex", ContentPolicy::default()).unwrap();
//! corpus.save("blx-flex_training_data.json").unwrap();
//!
//! let report = evaluate(&corpus, &EvaluationConfig::default()).unwrap();
//! for result in &report.results {
//!     println!("{result}");
//! }
//! ```

mod analysis;
mod assembler;
mod corpus;
mod evaluator;
mod freq_dist;
mod project;
mod project_dump;
mod tagger;

pub mod errors;

pub use analysis::{
    classify, AnalysisKind, AnalysisOccurrence, ApprovalCount, Classification, MorphBundle,
    PosTag, SegmentId, WordAnalysis, PUNCTUATION_TAG, UNKNOWN_TAG, WORD_TAG,
};
pub use assembler::{ContentPolicy, SentenceAssembler};
pub use corpus::{Corpus, TaggedSentence, TaggedToken};
pub use errors::{FlextagError, Result};
pub use evaluator::{
    accuracy, evaluate, Evaluation, EvaluationConfig, StageAccuracy, UnigramSource, HMM_LABEL,
};
pub use freq_dist::{ConditionalFreqDist, FreqDist};
pub use project::{extract_corpus, Occurrences, Project, ProjectProvider, ProjectSession};
pub use project_dump::{ProjectDump, ProjectDumpProvider};
pub use tagger::{HmmTagger, StageKind, StageTagger, Tagger, TaggerChain};
