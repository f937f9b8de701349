use thiserror::Error;

/// Failures that abort the server before it can serve a single call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl StartupError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<std::io::Error> for StartupError {
    fn from(err: std::io::Error) -> Self {
        StartupError::Internal(err.to_string())
    }
}
