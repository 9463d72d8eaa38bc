use std::path::PathBuf;

use thiserror::Error;

/// Failures of the lesson and lookup layers.
///
/// `Io` and `Parse` are fatal to the operation that raised them; the command
/// handlers report them and keep the loop alive.
#[derive(Debug, Error)]
pub enum StudyError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "question {index} in {} marks choice {correct} correct but has only {choices} choices",
        path.display()
    )]
    ChoiceOutOfRange {
        path: PathBuf,
        index: usize,
        correct: usize,
        choices: usize,
    },
    #[error("no lesson found for key {0:?}")]
    NotFound(String),
}

impl StudyError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StudyError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StudyError::Parse {
            path: path.into(),
            source,
        }
    }
}
