use thiserror::Error;

/// Errors raised by knowledge base backends and the plumbing around them.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid language code: {0:?}")]
    InvalidLanguage(String),

    #[error("\"{title}\" may refer to: {}", .options.join(", "))]
    Ambiguous { title: String, options: Vec<String> },

    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::InvalidUrl(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Outcome taxonomy of the gateway operations, one variant per HTTP status class.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Ambiguous title. Possible options: {}", .options.join(", "))]
    AmbiguousTitle { title: String, options: Vec<String> },

    #[error("Page not found")]
    NotFound { title: String },

    #[error("Invalid language code: {0:?}")]
    InvalidLanguage(String),

    #[error("{message}")]
    UpstreamFailure { message: String },
}

impl GatewayError {
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::AmbiguousTitle { .. } | GatewayError::InvalidLanguage(_) => 400,
            GatewayError::NotFound { .. } => 404,
            GatewayError::UpstreamFailure { .. } => 500,
        }
    }

    pub(crate) fn upstream(context: &str, err: &Error) -> Self {
        GatewayError::UpstreamFailure {
            message: format!("{}: {}", context, err),
        }
    }
}
