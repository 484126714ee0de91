use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::{FlextagError, Result};

/// Pair of a surface form and its tag.
///
/// Persisted as a two-element sequence `[surface, tag]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct TaggedToken {
    surface: String,
    tag: String,
}

impl TaggedToken {
    pub fn new<S, T>(surface: S, tag: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            surface: surface.into(),
            tag: tag.into(),
        }
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl From<(String, String)> for TaggedToken {
    fn from((surface, tag): (String, String)) -> Self {
        Self { surface, tag }
    }
}

impl From<TaggedToken> for (String, String) {
    fn from(token: TaggedToken) -> Self {
        (token.surface, token.tag)
    }
}

/// Ordered sequence of tagged tokens drawn from one segment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaggedSentence {
    tokens: Vec<TaggedToken>,
}

impl TaggedSentence {
    pub fn new(tokens: Vec<TaggedToken>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[TaggedToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Surface forms without tags.
    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(TaggedToken::surface).collect()
    }
}

impl<S, T> FromIterator<(S, T)> for TaggedSentence
where
    S: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(surface, tag)| TaggedToken::new(surface, tag))
                .collect(),
        )
    }
}

/// Ordered collection of accepted tagged sentences.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus {
    sentences: Vec<TaggedSentence>,
}

impl Corpus {
    pub const fn new() -> Self {
        Self { sentences: vec![] }
    }

    /// Appends a sentence at the end.
    pub fn push(&mut self, sentence: TaggedSentence) {
        self.sentences.push(sentence);
    }

    /// Gets all sentences in insertion order.
    pub fn sentences(&self) -> &[TaggedSentence] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Keeps only the first `max_sentences` sentences.
    pub fn truncate(&mut self, max_sentences: usize) {
        self.sentences.truncate(max_sentences);
    }

    /// Splits the corpus into a training prefix and an evaluation suffix.
    ///
    /// # Arguments
    ///
    /// * `train_percent` - Percentage of sentences used for training, rounded down.
    ///
    /// # Errors
    ///
    /// If `train_percent` is not in `1..=99`, an error variant will be returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use flextag::{Corpus, TaggedSentence};
    ///
    /// let mut corpus = Corpus::new();
    /// for _ in 0..100 {
    ///     corpus.push([("a", "Det")].into_iter().collect::<TaggedSentence>());
    /// }
    /// let (train, test) = corpus.split(90).unwrap();
    /// assert_eq!(90, train.len());
    /// assert_eq!(10, test.len());
    /// ```
    pub fn split(&self, train_percent: u8) -> Result<(&[TaggedSentence], &[TaggedSentence])> {
        if !(1..=99).contains(&train_percent) {
            return Err(FlextagError::invalid_argument(
                "train_percent",
                format!("must be in 1..=99, but got {train_percent}"),
            ));
        }
        let n_train = self.sentences.len() * usize::from(train_percent) / 100;
        Ok(self.sentences.split_at(n_train))
    }

    /// Exports the corpus as JSON.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: W) -> Result<()>
    where
        W: Write,
    {
        serde_json::to_writer(wtr, self).map_err(io::Error::from)?;
        Ok(())
    }

    /// Creates a corpus from a JSON reader.
    ///
    /// # Errors
    ///
    /// [`FlextagError::CorpusFormat`] is returned if the data is not a sequence of non-empty
    /// sentences made of `[surface, tag]` pairs. I/O errors are returned as is.
    pub fn read<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let corpus: Self = serde_json::from_reader(rdr).map_err(|e| {
            if e.is_io() {
                FlextagError::IOError(e.into())
            } else {
                FlextagError::corpus_format(e.to_string())
            }
        })?;
        if let Some(i) = corpus.sentences.iter().position(TaggedSentence::is_empty) {
            return Err(FlextagError::corpus_format(format!("sentence {i} is empty")));
        }
        Ok(corpus)
    }

    /// Saves the corpus to a file.
    pub fn save<P>(&self, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        info!("Saving {} sentences to {path:?}", self.len());
        let mut wtr = BufWriter::new(File::create(path)?);
        self.write(&mut wtr)?;
        wtr.flush()?;
        Ok(())
    }

    /// Loads a corpus from a file.
    pub fn load<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        info!("Loading corpus from {path:?}");
        Self::read(BufReader::new(File::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_corpus() -> Corpus {
        let mut corpus = Corpus::new();
        corpus.push(
            [("the", "Det"), ("dog", "Noun"), (".", "Punc")]
                .into_iter()
                .collect(),
        );
        corpus.push([("\u{25b}\u{300}", "Unknown"), ("\"", "Punc")].into_iter().collect());
        corpus
    }

    #[test]
    fn test_corpus_write_format() {
        let mut buf = vec![];
        sample_corpus().write(&mut buf).unwrap();
        assert_eq!(
            "[[[\"the\",\"Det\"],[\"dog\",\"Noun\"],[\".\",\"Punc\"]],\
             [[\"\u{25b}\u{300}\",\"Unknown\"],[\"\\\"\",\"Punc\"]]]",
            String::from_utf8(buf).unwrap()
        );
    }

    #[test]
    fn test_corpus_save_load() {
        let corpus = sample_corpus();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        corpus.save(&path).unwrap();
        let loaded = Corpus::load(&path).unwrap();
        assert_eq!(corpus, loaded);
    }

    #[test]
    fn test_corpus_read_tuples() {
        let corpus = Corpus::read(&b"[[[\"a\", \"Det\"]], [[\"b\", \"Word\"], [\"!\", \"Punc\"]]]"[..])
            .unwrap();
        assert_eq!(2, corpus.len());
        assert_eq!("b", corpus.sentences()[1].tokens()[0].surface());
        assert_eq!("Punc", corpus.sentences()[1].tokens()[1].tag());
    }

    #[test]
    fn test_corpus_read_invalid() {
        for data in [
            &b"{\"a\": 1}"[..],
            &b"[[[\"a\"]]]"[..],
            &b"[[[\"a\", \"b\", \"c\"]]]"[..],
            &b"[[[\"a\", 1]]]"[..],
            &b"[[]]"[..],
            &b"[[[\"a\", \"b\"]]"[..],
        ] {
            let e = Corpus::read(data).unwrap_err();
            assert!(matches!(e, FlextagError::CorpusFormat(_)), "{e}");
        }
    }

    #[test]
    fn test_corpus_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let e = Corpus::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(e, FlextagError::IOError(_)));
    }

    #[test]
    fn test_corpus_split_deterministic() {
        let mut corpus = Corpus::new();
        for i in 0..100 {
            corpus.push([(i.to_string(), "Num")].into_iter().collect());
        }
        for _ in 0..3 {
            let (train, test) = corpus.split(90).unwrap();
            assert_eq!(90, train.len());
            assert_eq!(10, test.len());
            assert_eq!("0", train[0].tokens()[0].surface());
            assert_eq!("89", train[89].tokens()[0].surface());
            assert_eq!("90", test[0].tokens()[0].surface());
        }
    }

    #[test]
    fn test_corpus_split_rounds_down() {
        let mut corpus = sample_corpus();
        corpus.push([("x", "Word")].into_iter().collect());
        let (train, test) = corpus.split(90).unwrap();
        assert_eq!(2, train.len());
        assert_eq!(1, test.len());
    }

    #[test]
    fn test_corpus_split_invalid_percent() {
        let corpus = sample_corpus();
        assert!(corpus.split(0).is_err());
        assert!(corpus.split(100).is_err());
    }

    #[test]
    fn test_corpus_truncate() {
        let mut corpus = sample_corpus();
        corpus.truncate(1);
        assert_eq!(1, corpus.len());
        corpus.truncate(5);
        assert_eq!(1, corpus.len());
    }
}
