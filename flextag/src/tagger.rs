mod chain;
mod hmm;

pub use chain::{StageKind, StageTagger, TaggerChain};
pub use hmm::HmmTagger;

/// Assigns one tag to each word of a sentence.
pub trait Tagger {
    /// Tags a sentence.
    ///
    /// # Arguments
    ///
    /// * `words` - Surface forms of the sentence.
    ///
    /// # Returns
    ///
    /// One tag per word.
    fn tag<'a>(&'a self, words: &[&str]) -> Vec<&'a str>;
}
