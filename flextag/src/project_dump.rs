//! Projects exported as JSON documents.
//!
//! An export mirrors the interlinear structure of a project:
//!
//! ```json
//! {
//!   "name": "blx-flex",
//!   "texts": [{
//!     "title": "Story",
//!     "paragraphs": [{
//!       "contents": "Dog barks.",
//!       "occurrences": [
//!         {"segment": 17, "begin": 0, "end": 3, "analysis": {
//!           "class": "WfiGloss",
//!           "analysis": {"class": "WfiAnalysis", "human_approved": "1",
//!                        "morph_bundles": [{"stem_category": "n"}]}}},
//!         {"segment": 17, "begin": 4, "end": 9, "analysis": {"class": "WfiWordform"}},
//!         {"segment": 17, "begin": 9, "end": 10, "analysis": {"class": "PunctuationForm"}}
//!       ]
//!     }]
//!   }]
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::rc::Rc;

use log::{debug, info};
use serde::Deserialize;

use crate::analysis::{
    AnalysisKind, AnalysisOccurrence, ApprovalCount, MorphBundle, SegmentId, WordAnalysis,
};
use crate::errors::{FlextagError, Result};
use crate::project::{Occurrences, Project, ProjectProvider};

const CLASS_PUNCTUATION_FORM: &str = "PunctuationForm";
const CLASS_WORDFORM: &str = "WfiWordform";
const CLASS_GLOSS: &str = "WfiGloss";
const CLASS_ANALYSIS: &str = "WfiAnalysis";

#[derive(Clone, Deserialize)]
#[serde(untagged)]
enum RawApprovalCount {
    Text(String),
    Number(u64),
}

impl From<RawApprovalCount> for ApprovalCount {
    fn from(raw: RawApprovalCount) -> Self {
        match raw {
            RawApprovalCount::Text(s) => Self::new(s),
            RawApprovalCount::Number(n) => Self::new(n.to_string()),
        }
    }
}

#[derive(Clone, Deserialize)]
struct RawMorphBundle {
    #[serde(default)]
    stem_category: Option<String>,
}

#[derive(Clone, Deserialize)]
struct RawAnalysis {
    class: String,
    #[serde(default)]
    human_approved: Option<RawApprovalCount>,
    #[serde(default)]
    morph_bundles: Vec<RawMorphBundle>,
    #[serde(default)]
    analysis: Option<Box<RawAnalysis>>,
}

impl RawAnalysis {
    fn into_word_analysis(self) -> Result<WordAnalysis> {
        if self.class != CLASS_ANALYSIS {
            return Err(FlextagError::invalid_project(format!(
                "expected {CLASS_ANALYSIS}, but got {}",
                self.class
            )));
        }
        let human_approved = self.human_approved.ok_or_else(|| {
            FlextagError::invalid_project(format!("{CLASS_ANALYSIS} without human_approved"))
        })?;
        Ok(WordAnalysis {
            human_approved: human_approved.into(),
            morph_bundles: self
                .morph_bundles
                .into_iter()
                .map(|b| MorphBundle::new(b.stem_category))
                .collect(),
        })
    }
}

impl TryFrom<RawAnalysis> for AnalysisKind {
    type Error = FlextagError;

    fn try_from(raw: RawAnalysis) -> Result<Self> {
        match raw.class.as_str() {
            CLASS_PUNCTUATION_FORM => Ok(Self::PunctuationForm),
            CLASS_WORDFORM => Ok(Self::Wordform),
            CLASS_GLOSS => {
                let owner = raw.analysis.ok_or_else(|| {
                    FlextagError::invalid_project(format!("{CLASS_GLOSS} without analysis"))
                })?;
                Ok(Self::WordGloss(owner.into_word_analysis()?))
            }
            CLASS_ANALYSIS => Ok(Self::WordAnalysis(raw.into_word_analysis()?)),
            _ => Ok(Self::Unrecognized(raw.class)),
        }
    }
}

#[derive(Deserialize)]
struct RawOccurrence {
    segment: u64,
    begin: usize,
    end: usize,
    analysis: RawAnalysis,
}

#[derive(Deserialize)]
struct RawParagraph {
    contents: String,
    #[serde(default)]
    occurrences: Vec<RawOccurrence>,
}

#[derive(Deserialize)]
struct RawText {
    #[serde(default)]
    title: String,
    #[serde(default)]
    paragraphs: Vec<RawParagraph>,
}

#[derive(Deserialize)]
struct RawProject {
    #[serde(default)]
    name: String,
    texts: Vec<RawText>,
}

struct Paragraph {
    contents: Rc<str>,
    occurrences: Vec<RawOccurrence>,
}

/// Project read from a JSON export.
pub struct ProjectDump {
    name: String,
    paragraphs: Vec<Paragraph>,
    closed: bool,
}

impl ProjectDump {
    /// Reads an export.
    ///
    /// # Errors
    ///
    /// [`FlextagError::InvalidProject`] is returned if the document does not follow the export
    /// structure.
    pub fn read<R>(rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let raw: RawProject = serde_json::from_reader(rdr).map_err(|e| {
            if e.is_io() {
                FlextagError::IOError(e.into())
            } else {
                FlextagError::invalid_project(e.to_string())
            }
        })?;
        let mut paragraphs = vec![];
        for text in raw.texts {
            debug!(
                "text {:?}: {} paragraphs",
                text.title,
                text.paragraphs.len()
            );
            for paragraph in text.paragraphs {
                paragraphs.push(Paragraph {
                    contents: Rc::from(paragraph.contents),
                    occurrences: paragraph.occurrences,
                });
            }
        }
        Ok(Self {
            name: raw.name,
            paragraphs,
            closed: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Project for ProjectDump {
    fn occurrences(&self) -> Occurrences<'_> {
        Box::new(self.paragraphs.iter().flat_map(|paragraph| {
            paragraph.occurrences.iter().map(move |occ| -> Result<_> {
                Ok(AnalysisOccurrence {
                    segment: SegmentId(occ.segment),
                    begin: occ.begin,
                    end: occ.end,
                    paragraph: paragraph.contents.clone(),
                    analysis: AnalysisKind::try_from(occ.analysis.clone())?,
                })
            })
        }))
    }

    fn close(&mut self) {
        self.paragraphs.clear();
        self.closed = true;
    }
}

/// Opens `<dir>/<name>.json` exports.
pub struct ProjectDumpProvider {
    dir: PathBuf,
}

impl ProjectDumpProvider {
    pub fn new<P>(dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { dir: dir.into() }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

impl ProjectProvider for ProjectDumpProvider {
    type Project = ProjectDump;

    fn open(&self, name: &str) -> Result<ProjectDump> {
        let path = self.path(name);
        info!("Reading project export {path:?}");
        ProjectDump::read(BufReader::new(File::open(path)?))
    }
}
