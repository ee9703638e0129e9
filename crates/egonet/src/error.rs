/// Failure reported by a [`crate::source::DataSource`]. The message is shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("{0}")]
    Unavailable(String),
}

impl SourceError {
    pub fn message(&self) -> &str {
        match self {
            SourceError::Unavailable(message) => message,
        }
    }
}

impl From<egonet_core::Error> for SourceError {
    fn from(value: egonet_core::Error) -> Self {
        Self::Unavailable(value.to_string())
    }
}

impl From<std::io::Error> for SourceError {
    fn from(value: std::io::Error) -> Self {
        Self::Unavailable(value.to_string())
    }
}

/// A navigator request that cannot be issued in the current session state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("no record file is loaded")]
    NoRecords,
    #[error("there is no failed selection to retry")]
    NothingToRetry,
}
