use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File too large: {size} bytes (max {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("Not found")]
    NotFound,

    #[error("AI provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("AI provider rejected the request: {0}")]
    ProviderRejected(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error")]
    InternalServerError,
}

impl CoreError {
    /// Only transient upstream failures are worth a second attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::ProviderUnavailable(_))
    }

    /// True for errors the uploader can fix by sending a different file.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_)
                | CoreError::FileTooLarge { .. }
                | CoreError::UnsupportedContentType(_)
        )
    }
}

impl From<std::io::Error> for CoreError {
    fn from(error: std::io::Error) -> Self {
        CoreError::Storage(error.to_string())
    }
}
