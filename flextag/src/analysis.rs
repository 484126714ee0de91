use std::rc::Rc;

use log::warn;

use crate::errors::{FlextagError, Result};

/// Tag of punctuation forms.
pub const PUNCTUATION_TAG: &str = "Punc";

/// Tag of unanalyzed wordforms.
pub const WORD_TAG: &str = "Word";

/// Tag of analyses without any stem category.
pub const UNKNOWN_TAG: &str = "Unknown";

/// Opaque identifier of a segment in an interlinear text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SegmentId(pub u64);

/// Human approval indicator of a word analysis.
///
/// The project exposes it as a decimal string, and only the exact value `"0"` means that the
/// analysis has not been approved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApprovalCount(String);

impl ApprovalCount {
    pub fn new<S>(count: S) -> Self
    where
        S: Into<String>,
    {
        Self(count.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if no human has confirmed the analysis.
    pub fn is_unapproved(&self) -> bool {
        self.0 == "0"
    }
}

/// Sub-unit of an analyzed wordform.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MorphBundle {
    /// Grammatical category of the stem, if the bundle carries a stem analysis.
    pub stem_category: Option<String>,
}

impl MorphBundle {
    pub fn new(stem_category: Option<String>) -> Self {
        Self { stem_category }
    }
}

/// Word-level analysis with its morph bundles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordAnalysis {
    pub human_approved: ApprovalCount,
    pub morph_bundles: Vec<MorphBundle>,
}

impl WordAnalysis {
    /// Returns the first non-empty stem category in bundle order.
    pub fn first_stem_category(&self) -> Option<&str> {
        self.morph_bundles
            .iter()
            .filter_map(|bundle| bundle.stem_category.as_deref())
            .find(|category| !category.is_empty())
    }
}

/// Discriminated kind of an analysis record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalysisKind {
    /// Punctuation form.
    PunctuationForm,

    /// Wordform without any analysis.
    Wordform,

    /// Word gloss. Holds the word analysis the gloss belongs to.
    WordGloss(WordAnalysis),

    /// Word analysis.
    WordAnalysis(WordAnalysis),

    /// Any other class reported by the project.
    Unrecognized(String),
}

/// One analysis record together with its position in the paragraph.
#[derive(Clone, Debug)]
pub struct AnalysisOccurrence {
    pub segment: SegmentId,

    /// Begin offset in characters.
    pub begin: usize,

    /// End offset in characters.
    pub end: usize,

    pub paragraph: Rc<str>,
    pub analysis: AnalysisKind,
}

impl AnalysisOccurrence {
    /// Gets the surface text covered by the record.
    ///
    /// Offsets beyond the paragraph are clamped to its end, and an inverted range yields an
    /// empty string.
    pub fn surface_text(&self) -> &str {
        let text = &*self.paragraph;
        let mut start = None;
        let mut end = None;
        let mut n_chars = 0;
        for (pos, (i, _)) in text.char_indices().enumerate() {
            if pos == self.begin {
                start = Some(i);
            }
            if pos == self.end {
                end = Some(i);
            }
            if start.is_some() && end.is_some() {
                break;
            }
            n_chars = pos + 1;
        }
        // n_chars is the full length whenever an offset was not found.
        if (start.is_none() && self.begin > n_chars) || (end.is_none() && self.end > n_chars) {
            warn!(
                "offsets {}..{} exceed paragraph length {} in segment {}",
                self.begin, self.end, n_chars, self.segment.0,
            );
        }
        let start = start.unwrap_or(text.len());
        let end = end.unwrap_or(text.len()).max(start);
        &text[start..end]
    }
}

/// Part-of-speech tag assigned to a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PosTag {
    Punctuation,
    Word,
    Category(String),
    Unknown,
}

impl PosTag {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Punctuation => PUNCTUATION_TAG,
            Self::Word => WORD_TAG,
            Self::Category(category) => category,
            Self::Unknown => UNKNOWN_TAG,
        }
    }
}

/// Result of [`classify()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub tag: PosTag,
    pub confirmed: bool,
}

/// Determines the part-of-speech tag of a record.
///
/// # Arguments
///
/// * `record` - An analysis record.
///
/// # Returns
///
/// The tag and whether the underlying analysis has been approved by a human. Punctuation forms
/// and unanalyzed wordforms are always confirmed.
///
/// # Errors
///
/// [`FlextagError::UnrecognizedAnalysisKind`] is returned if the record kind is outside the
/// known set.
pub fn classify(record: &AnalysisOccurrence) -> Result<Classification> {
    let analysis = match &record.analysis {
        AnalysisKind::PunctuationForm => {
            return Ok(Classification {
                tag: PosTag::Punctuation,
                confirmed: true,
            })
        }
        AnalysisKind::Wordform => {
            return Ok(Classification {
                tag: PosTag::Word,
                confirmed: true,
            })
        }
        AnalysisKind::WordGloss(analysis) | AnalysisKind::WordAnalysis(analysis) => analysis,
        AnalysisKind::Unrecognized(class_name) => {
            return Err(FlextagError::unrecognized_analysis_kind(
                class_name.as_str(),
                record.segment.0,
            ))
        }
    };
    let tag = analysis
        .first_stem_category()
        .map_or(PosTag::Unknown, |category| {
            PosTag::Category(category.to_string())
        });
    Ok(Classification {
        tag,
        confirmed: !analysis.human_approved.is_unapproved(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrence(analysis: AnalysisKind) -> AnalysisOccurrence {
        AnalysisOccurrence {
            segment: SegmentId(7),
            begin: 0,
            end: 3,
            paragraph: Rc::from("dog barks."),
            analysis,
        }
    }

    fn word_analysis(approved: &str, categories: &[Option<&str>]) -> WordAnalysis {
        WordAnalysis {
            human_approved: ApprovalCount::new(approved),
            morph_bundles: categories
                .iter()
                .map(|c| MorphBundle::new(c.map(String::from)))
                .collect(),
        }
    }

    #[test]
    fn test_classify_punctuation() {
        let c = classify(&occurrence(AnalysisKind::PunctuationForm)).unwrap();
        assert_eq!(PosTag::Punctuation, c.tag);
        assert!(c.confirmed);
    }

    #[test]
    fn test_classify_wordform() {
        let c = classify(&occurrence(AnalysisKind::Wordform)).unwrap();
        assert_eq!("Word", c.tag.as_str());
        assert!(c.confirmed);
    }

    #[test]
    fn test_classify_analysis_first_category() {
        let a = word_analysis("1", &[None, Some("n"), Some("v")]);
        let c = classify(&occurrence(AnalysisKind::WordAnalysis(a))).unwrap();
        assert_eq!(PosTag::Category("n".into()), c.tag);
        assert!(c.confirmed);
    }

    #[test]
    fn test_classify_gloss() {
        let a = word_analysis("2", &[Some("adj")]);
        let c = classify(&occurrence(AnalysisKind::WordGloss(a))).unwrap();
        assert_eq!("adj", c.tag.as_str());
        assert!(c.confirmed);
    }

    #[test]
    fn test_classify_unapproved_gloss() {
        let a = word_analysis("0", &[Some("adj")]);
        let c = classify(&occurrence(AnalysisKind::WordGloss(a))).unwrap();
        assert_eq!("adj", c.tag.as_str());
        assert!(!c.confirmed);
    }

    #[test]
    fn test_classify_empty_category_is_skipped() {
        let a = word_analysis("1", &[Some(""), Some("pro")]);
        let c = classify(&occurrence(AnalysisKind::WordAnalysis(a))).unwrap();
        assert_eq!("pro", c.tag.as_str());
    }

    #[test]
    fn test_classify_unknown() {
        let a = word_analysis("1", &[None, None]);
        let c = classify(&occurrence(AnalysisKind::WordAnalysis(a))).unwrap();
        assert_eq!(PosTag::Unknown, c.tag);

        let a = word_analysis("1", &[]);
        let c = classify(&occurrence(AnalysisKind::WordAnalysis(a))).unwrap();
        assert_eq!("Unknown", c.tag.as_str());
    }

    #[test]
    fn test_classify_unapproved() {
        let a = word_analysis("0", &[Some("n")]);
        let c = classify(&occurrence(AnalysisKind::WordAnalysis(a))).unwrap();
        assert_eq!("n", c.tag.as_str());
        assert!(!c.confirmed);
    }

    #[test]
    fn test_classify_approval_compared_as_string() {
        let a = word_analysis("00", &[Some("n")]);
        let c = classify(&occurrence(AnalysisKind::WordAnalysis(a))).unwrap();
        assert!(c.confirmed);
    }

    #[test]
    fn test_classify_unrecognized() {
        let record = occurrence(AnalysisKind::Unrecognized("WfiMorphBundle".into()));
        let e = classify(&record).unwrap_err();
        assert!(matches!(e, FlextagError::UnrecognizedAnalysisKind(_)));
        // Repeated calls fail the same way.
        assert!(classify(&record).is_err());
    }

    #[test]
    fn test_surface_text() {
        let mut record = occurrence(AnalysisKind::Wordform);
        assert_eq!("dog", record.surface_text());
        record.begin = 4;
        record.end = 9;
        assert_eq!("barks", record.surface_text());
    }

    #[test]
    fn test_surface_text_multibyte() {
        let mut record = occurrence(AnalysisKind::Wordform);
        record.paragraph = Rc::from("\u{14b}g\u{e1} b\u{25b}\u{300}.");
        record.begin = 4;
        record.end = 7;
        assert_eq!("b\u{25b}\u{300}", record.surface_text());
    }

    #[test]
    fn test_surface_text_paragraph_end() {
        let mut record = occurrence(AnalysisKind::Wordform);
        record.begin = 9;
        record.end = 10;
        assert_eq!(".", record.surface_text());
        record.begin = 10;
        assert_eq!("", record.surface_text());
        record.begin = 0;
        assert_eq!("dog barks.", record.surface_text());
    }

    #[test]
    fn test_surface_text_clamped() {
        let mut record = occurrence(AnalysisKind::Wordform);
        record.begin = 8;
        record.end = 100;
        assert_eq!("s.", record.surface_text());
        record.begin = 5;
        record.end = 2;
        assert_eq!("", record.surface_text());
    }
}
