use std::ops::Deref;

use log::info;

use crate::analysis::AnalysisOccurrence;
use crate::assembler::{ContentPolicy, SentenceAssembler};
use crate::corpus::Corpus;
use crate::errors::Result;

/// Iterator over the analysis records of a project.
pub type Occurrences<'a> = Box<dyn Iterator<Item = Result<AnalysisOccurrence>> + 'a>;

/// An opened linguistic project.
pub trait Project {
    /// Traverses the analysis records of all interlinear texts in order.
    fn occurrences(&self) -> Occurrences<'_>;

    /// Releases the project.
    fn close(&mut self);
}

/// Source of linguistic projects.
pub trait ProjectProvider {
    type Project: Project;

    /// Opens a project for reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be opened.
    fn open(&self, name: &str) -> Result<Self::Project>;
}

/// Scoped handle of an opened project.
///
/// The project is closed when the session is dropped.
pub struct ProjectSession<P>
where
    P: Project,
{
    name: String,
    project: P,
}

impl<P> ProjectSession<P>
where
    P: Project,
{
    /// Opens a session on the project `name`.
    pub fn open<V>(provider: &V, name: &str) -> Result<Self>
    where
        V: ProjectProvider<Project = P>,
    {
        info!("Opening project {name}");
        let project = provider.open(name)?;
        Ok(Self {
            name: name.to_string(),
            project,
        })
    }
}

impl<P> Deref for ProjectSession<P>
where
    P: Project,
{
    type Target = P;

    fn deref(&self) -> &Self::Target {
        &self.project
    }
}

impl<P> Drop for ProjectSession<P>
where
    P: Project,
{
    fn drop(&mut self) {
        info!("Closing project {}", self.name);
        self.project.close();
    }
}

/// Extracts tagged sentences from a project.
///
/// # Arguments
///
/// * `provider` - A project source.
/// * `name` - Name of the project.
/// * `policy` - Content policy used to accept sentences.
///
/// # Returns
///
/// The accepted sentences in stream order.
///
/// # Errors
///
/// Errors of the provider and the classifier are returned as is. The project is closed before
/// returning in every case, and the partially extracted corpus is dropped.
pub fn extract_corpus<V>(provider: &V, name: &str, policy: ContentPolicy) -> Result<Corpus>
where
    V: ProjectProvider,
{
    let session = ProjectSession::open(provider, name)?;
    let mut assembler = SentenceAssembler::new(policy);
    for record in session.occurrences() {
        assembler.push(&record?)?;
    }
    let corpus = assembler.finish();
    info!("Extracted {} sentences from {name}", corpus.len());
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    use crate::analysis::{AnalysisKind, SegmentId};
    use crate::errors::FlextagError;

    struct MockProject {
        records: Vec<(u64, AnalysisKind)>,
        n_closed: Rc<Cell<usize>>,
    }

    impl Project for MockProject {
        fn occurrences(&self) -> Occurrences<'_> {
            let paragraph: Rc<str> = Rc::from("w");
            Box::new(self.records.iter().map(move |(segment, analysis)| -> Result<_> {
                Ok(AnalysisOccurrence {
                    segment: SegmentId(*segment),
                    begin: 0,
                    end: 1,
                    paragraph: paragraph.clone(),
                    analysis: analysis.clone(),
                })
            }))
        }

        fn close(&mut self) {
            self.n_closed.set(self.n_closed.get() + 1);
        }
    }

    struct MockProvider {
        records: Vec<(u64, AnalysisKind)>,
        n_closed: Rc<Cell<usize>>,
    }

    impl ProjectProvider for MockProvider {
        type Project = MockProject;

        fn open(&self, name: &str) -> Result<MockProject> {
            if name != "mock" {
                return Err(FlextagError::invalid_project(format!("no project {name}")));
            }
            Ok(MockProject {
                records: self.records.clone(),
                n_closed: self.n_closed.clone(),
            })
        }
    }

    fn provider(records: Vec<(u64, AnalysisKind)>) -> MockProvider {
        MockProvider {
            records,
            n_closed: Rc::new(Cell::new(0)),
        }
    }

    #[test]
    fn test_extract_corpus_closes_project() {
        let provider = provider(vec![
            (1, AnalysisKind::Wordform),
            (1, AnalysisKind::PunctuationForm),
            (2, AnalysisKind::Wordform),
        ]);
        let corpus = extract_corpus(&provider, "mock", ContentPolicy::default()).unwrap();
        assert_eq!(2, corpus.len());
        assert_eq!(1, provider.n_closed.get());
    }

    #[test]
    fn test_extract_corpus_closes_project_on_error() {
        let provider = provider(vec![
            (1, AnalysisKind::Wordform),
            (2, AnalysisKind::Unrecognized("LexEntry".into())),
            (3, AnalysisKind::Wordform),
        ]);
        let e = extract_corpus(&provider, "mock", ContentPolicy::default()).unwrap_err();
        assert!(matches!(e, FlextagError::UnrecognizedAnalysisKind(_)));
        assert_eq!(1, provider.n_closed.get());
    }

    #[test]
    fn test_extract_corpus_open_failure() {
        let provider = provider(vec![]);
        assert!(extract_corpus(&provider, "other", ContentPolicy::default()).is_err());
        assert_eq!(0, provider.n_closed.get());
    }
}
