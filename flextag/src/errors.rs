//! Definition of errors.

use std::error::Error;
use std::fmt;

pub type Result<T, E = FlextagError> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum FlextagError {
    UnrecognizedAnalysisKind(UnrecognizedAnalysisKindError),
    CorpusFormat(CorpusFormatError),
    EmptyTrainingSplit,
    EmptyEvaluationSplit,
    InvalidProject(InvalidProjectError),
    InvalidArgument(InvalidArgumentError),
    IOError(std::io::Error),
}

impl FlextagError {
    pub(crate) fn unrecognized_analysis_kind<S>(class_name: S, segment: u64) -> Self
    where
        S: Into<String>,
    {
        Self::UnrecognizedAnalysisKind(UnrecognizedAnalysisKindError {
            class_name: class_name.into(),
            segment,
        })
    }

    pub(crate) fn corpus_format<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::CorpusFormat(CorpusFormatError { msg: msg.into() })
    }

    pub(crate) fn invalid_project<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidProject(InvalidProjectError { msg: msg.into() })
    }

    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }
}

impl fmt::Display for FlextagError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnrecognizedAnalysisKind(e) => e.fmt(f),
            Self::CorpusFormat(e) => e.fmt(f),
            Self::EmptyTrainingSplit => write!(
                f,
                "EmptyTrainingSplitError: the training split contains no tokens"
            ),
            Self::EmptyEvaluationSplit => write!(
                f,
                "EmptyEvaluationSplitError: the evaluation split contains no tokens"
            ),
            Self::InvalidProject(e) => e.fmt(f),
            Self::InvalidArgument(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for FlextagError {}

/// Error used when an analysis record has a kind outside the known set.
#[derive(Debug)]
pub struct UnrecognizedAnalysisKindError {
    /// Class name reported by the project.
    pub(crate) class_name: String,

    /// Segment containing the record.
    pub(crate) segment: u64,
}

impl fmt::Display for UnrecognizedAnalysisKindError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "UnrecognizedAnalysisKindError: {} (segment {})",
            self.class_name, self.segment
        )
    }
}

impl Error for UnrecognizedAnalysisKindError {}

/// Error used when a persisted corpus is malformed.
#[derive(Debug)]
pub struct CorpusFormatError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for CorpusFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CorpusFormatError: {}", self.msg)
    }
}

impl Error for CorpusFormatError {}

/// Error used when a project export cannot be read.
#[derive(Debug)]
pub struct InvalidProjectError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidProjectError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidProjectError: {}", self.msg)
    }
}

impl Error for InvalidProjectError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

impl From<std::io::Error> for FlextagError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_analysis_kind_display() {
        let e = FlextagError::unrecognized_analysis_kind("WfiMorphBundle", 42);
        assert_eq!(
            "UnrecognizedAnalysisKindError: WfiMorphBundle (segment 42)",
            e.to_string()
        );
    }

    #[test]
    fn test_invalid_argument_display() {
        let e = FlextagError::invalid_argument("train_percent", "must be in 1..=99");
        assert_eq!(
            "InvalidArgumentError: train_percent: must be in 1..=99",
            e.to_string()
        );
    }
}
