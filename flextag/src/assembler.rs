use log::debug;

use crate::analysis::{classify, AnalysisOccurrence, SegmentId, PUNCTUATION_TAG, WORD_TAG};
use crate::corpus::{Corpus, TaggedSentence, TaggedToken};
use crate::errors::Result;

/// Decides which tokens make a sentence worth keeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContentPolicy {
    /// Any token other than punctuation counts as content.
    #[default]
    AnyNonPunctuation,

    /// Only analyzed or glossed tokens count as content, so sentences made of punctuation and
    /// unanalyzed wordforms are dropped.
    AnalyzedOnly,
}

impl ContentPolicy {
    // Decided on the stored tag, so a stem category spelled like a reserved tag is treated as
    // that tag.
    fn counts_as_content(self, tag: &str) -> bool {
        match self {
            Self::AnyNonPunctuation => tag != PUNCTUATION_TAG,
            Self::AnalyzedOnly => tag != PUNCTUATION_TAG && tag != WORD_TAG,
        }
    }
}

struct Accumulation {
    segment: SegmentId,
    tokens: Vec<TaggedToken>,
    has_content: bool,
    has_unconfirmed: bool,
}

impl Accumulation {
    const fn new(segment: SegmentId) -> Self {
        Self {
            segment,
            tokens: vec![],
            has_content: false,
            has_unconfirmed: false,
        }
    }

    fn is_accepted(&self) -> bool {
        !self.tokens.is_empty() && self.has_content && !self.has_unconfirmed
    }
}

/// Groups a stream of analysis records into tagged sentences.
///
/// Records are consumed one at a time in stream order. A sentence ends whenever the segment
/// id changes, so a segment id recurring after a different one starts a fresh sentence.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
///
/// use flextag::{AnalysisKind, AnalysisOccurrence, ContentPolicy, SegmentId, SentenceAssembler};
///
/// let paragraph: Rc<str> = Rc::from("Hello.");
/// let mut assembler = SentenceAssembler::new(ContentPolicy::AnyNonPunctuation);
/// for (begin, end, analysis) in [(0, 5, AnalysisKind::Wordform), (5, 6, AnalysisKind::PunctuationForm)] {
///     assembler.push(&AnalysisOccurrence {
///         segment: SegmentId(1),
///         begin,
///         end,
///         paragraph: paragraph.clone(),
///         analysis,
///     }).unwrap();
/// }
/// let corpus = assembler.finish();
/// assert_eq!(1, corpus.len());
/// ```
pub struct SentenceAssembler {
    policy: ContentPolicy,
    // `None` until the first record arrives.
    current: Option<Accumulation>,
    corpus: Corpus,
    n_discarded: usize,
}

impl SentenceAssembler {
    pub fn new(policy: ContentPolicy) -> Self {
        Self {
            policy,
            current: None,
            corpus: Corpus::new(),
            n_discarded: 0,
        }
    }

    /// Consumes one record.
    ///
    /// # Errors
    ///
    /// Classification errors are returned as is.
    pub fn push(&mut self, record: &AnalysisOccurrence) -> Result<()> {
        if self
            .current
            .as_ref()
            .map_or(true, |acc| acc.segment != record.segment)
        {
            if let Some(done) = self.current.take() {
                self.flush(done);
            }
        }

        let classification = classify(record)?;
        let counts_as_content = self.policy.counts_as_content(classification.tag.as_str());

        let acc = self
            .current
            .get_or_insert_with(|| Accumulation::new(record.segment));
        acc.has_unconfirmed |= !classification.confirmed;
        acc.has_content |= counts_as_content;
        acc.tokens.push(TaggedToken::new(
            record.surface_text(),
            classification.tag.as_str(),
        ));
        Ok(())
    }

    fn flush(&mut self, acc: Accumulation) {
        if acc.is_accepted() {
            self.corpus.push(TaggedSentence::new(acc.tokens));
        } else {
            debug!("discarding segment {}", acc.segment.0);
            self.n_discarded += 1;
        }
    }

    /// Number of sentences accepted so far.
    pub fn n_accepted(&self) -> usize {
        self.corpus.len()
    }

    /// Number of sentences discarded so far.
    pub fn n_discarded(&self) -> usize {
        self.n_discarded
    }

    /// Flushes the last sentence and returns the corpus.
    pub fn finish(mut self) -> Corpus {
        if let Some(done) = self.current.take() {
            self.flush(done);
        }
        debug!(
            "{} sentences accepted, {} discarded",
            self.corpus.len(),
            self.n_discarded
        );
        self.corpus
    }
}
