use crate::document::DocId;
use thiserror::Error;

/// Everything the search core can refuse to do.
///
/// Failures are deterministic functions of the input; nothing here is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid document text: {0}")]
    InvalidText(String),

    #[error("invalid document id {0}")]
    InvalidId(DocId),

    #[error("document id {0} already exists")]
    DuplicateId(DocId),

    #[error("document id {0} does not exist")]
    NotFound(DocId),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("invalid stop word {0:?}")]
    InvalidStopWord(String),

    #[error("unknown document status {0:?}")]
    InvalidStatus(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

impl SearchError {
    /// Malformed caller data: bad text, bad query word, bad id, bad stop word or status.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            SearchError::InvalidText(_)
                | SearchError::InvalidId(_)
                | SearchError::InvalidQuery(_)
                | SearchError::InvalidStopWord(_)
                | SearchError::InvalidStatus(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
