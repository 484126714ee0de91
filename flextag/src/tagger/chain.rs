use hashbrown::HashMap;
use log::debug;

use crate::analysis::UNKNOWN_TAG;
use crate::corpus::TaggedSentence;
use crate::errors::{FlextagError, Result};
use crate::freq_dist::{ConditionalFreqDist, FreqDist};
use crate::tagger::Tagger;

/// Kind of a stage in a [`TaggerChain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageKind {
    /// Always answers the most frequent training tag.
    Default,

    /// Most likely tag of each of the most frequent training words.
    Lookup,

    /// Most likely tag of each word.
    Unigram,

    /// Most likely tag of each word given the previous tag.
    Bigram,
}

impl StageKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "Default",
            Self::Lookup => "Lookup",
            Self::Unigram => "Unigram",
            Self::Bigram => "Bigram",
        }
    }
}

#[derive(Default)]
struct BigramTable {
    // word -> tag at the start of a sentence
    initial: HashMap<String, String>,
    // word -> previous tag -> tag
    following: HashMap<String, HashMap<String, String>>,
}

enum StageModel {
    Default(String),
    Word(HashMap<String, String>),
    Bigram(BigramTable),
}

impl StageModel {
    fn predict(&self, words: &[&str], index: usize, history: &[&str]) -> Option<&str> {
        let word = words[index];
        match self {
            Self::Default(tag) => Some(tag.as_str()),
            Self::Word(table) => table.get(word).map(String::as_str),
            Self::Bigram(table) => {
                let tag = if index == 0 {
                    table.initial.get(word)
                } else {
                    table
                        .following
                        .get(word)
                        .and_then(|prev_tags| prev_tags.get(history[index - 1]))
                };
                tag.map(String::as_str)
            }
        }
    }

    fn n_contexts(&self) -> usize {
        match self {
            Self::Default(_) => 1,
            Self::Word(table) => table.len(),
            Self::Bigram(table) => {
                table.initial.len() + table.following.values().map(HashMap::len).sum::<usize>()
            }
        }
    }
}

struct Stage {
    kind: StageKind,
    model: StageModel,
    // Index of the previous stage in the chain.
    fallback: Option<usize>,
}

/// Ordered chain of taggers, each deferring to the previous one on unseen contexts.
///
/// The first stage is always a default tagger. Stages keep owned copies of their statistics.
///
/// # Examples
///
/// ```
/// use flextag::{Tagger, TaggedSentence, TaggerChain};
///
/// let train: Vec<TaggedSentence> = vec![
///     [("the", "Det"), ("dog", "Noun"), ("barks", "Verb")].into_iter().collect(),
/// ];
/// let mut chain = TaggerChain::new(&train).unwrap();
/// chain.push_lookup(&train, 100000);
///
/// let lookup = chain.stage(1).unwrap();
/// assert_eq!(vec!["Det", "Noun", "Det"], lookup.tag(&["the", "dog", "meows"]));
/// ```
pub struct TaggerChain {
    stages: Vec<Stage>,
}

impl TaggerChain {
    /// Creates a chain holding only the default stage.
    ///
    /// # Errors
    ///
    /// [`FlextagError::EmptyTrainingSplit`] is returned if `train` contains no tokens.
    pub fn new(train: &[TaggedSentence]) -> Result<Self> {
        let mut tags = FreqDist::<String>::new();
        for token in train.iter().flat_map(TaggedSentence::tokens) {
            tags.add(token.tag());
        }
        let default_tag = tags.max().ok_or(FlextagError::EmptyTrainingSplit)?.clone();
        debug!(
            "default tag {default_tag:?} ({} of {} tokens)",
            tags.get(&default_tag),
            tags.total()
        );
        Ok(Self {
            stages: vec![Stage {
                kind: StageKind::Default,
                model: StageModel::Default(default_tag),
                fallback: None,
            }],
        })
    }

    fn push_stage(&mut self, kind: StageKind, model: StageModel) -> usize {
        let index = self.stages.len();
        debug!("{} stage: {} contexts", kind.label(), model.n_contexts());
        self.stages.push(Stage {
            kind,
            model,
            fallback: Some(index - 1),
        });
        index
    }

    /// Appends a lookup stage built from the `lookup_size` most frequent words of `train`.
    ///
    /// # Returns
    ///
    /// Index of the new stage.
    pub fn push_lookup(&mut self, train: &[TaggedSentence], lookup_size: usize) -> usize {
        let mut words = FreqDist::<String>::new();
        let mut word_tags = ConditionalFreqDist::<String, String>::new();
        for token in train.iter().flat_map(TaggedSentence::tokens) {
            words.add(token.surface());
            word_tags.add(token.surface().to_string(), token.tag());
        }
        let mut table = HashMap::new();
        for (word, _) in words.most_common(lookup_size) {
            if let Some(tag) = word_tags.get(word.as_str()).and_then(FreqDist::max) {
                table.insert(word.clone(), tag.clone());
            }
        }
        self.push_stage(StageKind::Lookup, StageModel::Word(table))
    }

    /// Appends a unigram stage trained on `sents`.
    ///
    /// # Returns
    ///
    /// Index of the new stage.
    pub fn push_unigram(&mut self, sents: &[TaggedSentence]) -> usize {
        let mut word_tags = ConditionalFreqDist::<String, String>::new();
        for token in sents.iter().flat_map(TaggedSentence::tokens) {
            word_tags.add(token.surface().to_string(), token.tag());
        }
        let table = word_tags
            .into_conditions()
            .filter_map(|(word, tags)| tags.max().cloned().map(|tag| (word, tag)))
            .collect();
        self.push_stage(StageKind::Unigram, StageModel::Word(table))
    }

    /// Appends a bigram stage trained on `sents`.
    ///
    /// The context of a word is the tag of the previous word, or the sentence start.
    ///
    /// # Returns
    ///
    /// Index of the new stage.
    pub fn push_bigram(&mut self, sents: &[TaggedSentence]) -> usize {
        let mut contexts = ConditionalFreqDist::<(Option<String>, String), String>::new();
        for sent in sents {
            let mut prev_tag: Option<&str> = None;
            for token in sent.tokens() {
                contexts.add(
                    (prev_tag.map(str::to_string), token.surface().to_string()),
                    token.tag(),
                );
                prev_tag = Some(token.tag());
            }
        }
        let mut table = BigramTable::default();
        for ((prev_tag, word), tags) in contexts.into_conditions() {
            let Some(tag) = tags.max().cloned() else {
                continue;
            };
            match prev_tag {
                Some(prev_tag) => {
                    table
                        .following
                        .entry(word)
                        .or_default()
                        .insert(prev_tag, tag);
                }
                None => {
                    table.initial.insert(word, tag);
                }
            }
        }
        self.push_stage(StageKind::Bigram, StageModel::Bigram(table))
    }

    /// Builds the whole chain: default, lookup, unigram and bigram stages.
    ///
    /// # Arguments
    ///
    /// * `train` - Training sentences.
    /// * `unigram_sents` - Sentences used to train the unigram stage.
    /// * `lookup_size` - Number of words kept by the lookup stage.
    ///
    /// # Errors
    ///
    /// [`FlextagError::EmptyTrainingSplit`] is returned if `train` contains no tokens.
    pub fn train(
        train: &[TaggedSentence],
        unigram_sents: &[TaggedSentence],
        lookup_size: usize,
    ) -> Result<Self> {
        let mut chain = Self::new(train)?;
        chain.push_lookup(train, lookup_size);
        chain.push_unigram(unigram_sents);
        chain.push_bigram(train);
        Ok(chain)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Gets the tagger ending at stage `index`.
    pub fn stage(&self, index: usize) -> Option<StageTagger<'_>> {
        (index < self.stages.len()).then_some(StageTagger { chain: self, index })
    }

    /// Iterates the taggers of all stages in construction order.
    pub fn stages(&self) -> impl Iterator<Item = StageTagger<'_>> {
        (0..self.stages.len()).map(move |index| StageTagger { chain: self, index })
    }

    fn tag_one<'a>(
        &'a self,
        start: usize,
        words: &[&str],
        index: usize,
        history: &[&'a str],
    ) -> &'a str {
        let mut current = Some(start);
        while let Some(i) = current {
            let stage = &self.stages[i];
            if let Some(tag) = stage.model.predict(words, index, history) {
                return tag;
            }
            current = stage.fallback;
        }
        UNKNOWN_TAG
    }
}

/// Tagger made of one stage of a [`TaggerChain`] and all stages before it.
#[derive(Clone, Copy)]
pub struct StageTagger<'a> {
    chain: &'a TaggerChain,
    index: usize,
}

impl<'a> StageTagger<'a> {
    pub fn kind(&self) -> StageKind {
        self.chain.stages[self.index].kind
    }

    /// The stage this one defers to.
    pub fn fallback(&self) -> Option<StageTagger<'a>> {
        self.chain.stages[self.index]
            .fallback
            .map(|index| StageTagger {
                chain: self.chain,
                index,
            })
    }

    /// Tag given by this stage alone, without falling back.
    pub fn predict_own(&self, words: &[&str], index: usize, history: &[&str]) -> Option<&'a str> {
        self.chain.stages[self.index]
            .model
            .predict(words, index, history)
    }
}

impl Tagger for StageTagger<'_> {
    fn tag<'b>(&'b self, words: &[&str]) -> Vec<&'b str> {
        let mut tags = Vec::with_capacity(words.len());
        for i in 0..words.len() {
            let tag = self.chain.tag_one(self.index, words, i, &tags);
            tags.push(tag);
        }
        tags
    }
}
