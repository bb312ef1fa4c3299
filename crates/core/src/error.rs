use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("product file is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid product: {0}")]
    InvalidProduct(String),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid value for {parameter}: '{value}'")]
    InvalidParameter { parameter: &'static str, value: String },

    #[error("search index unavailable: {0}")]
    Unavailable(String),

    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },

    #[error("malformed hit {id}: {details}")]
    MalformedHit { id: String, details: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("search request failed: {0}")]
    Request(String),
}

/// Terminal outcome of a failed search, as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ClientInput,
    IndexUnavailable,
    Unexpected,
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter { .. } => ErrorKind::ClientInput,
            Self::Unavailable(_) => ErrorKind::IndexUnavailable,
            Self::Http(error) if error.is_connect() || error.is_timeout() => {
                ErrorKind::IndexUnavailable
            }
            _ => ErrorKind::Unexpected,
        }
    }

    /// Message safe to hand back to an HTTP client. Only validation errors
    /// echo their own text; everything else maps to a fixed phrase.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::ClientInput => self.to_string(),
            ErrorKind::IndexUnavailable => {
                "Connection error: search index is unavailable".to_string()
            }
            ErrorKind::Unexpected => format!("Internal server error: {}", self.summary()),
        }
    }

    fn summary(&self) -> &'static str {
        match self {
            Self::BackendResponse { .. } => "search backend rejected the request",
            Self::MalformedHit { .. } | Self::Serialization(_) => "malformed search response",
            Self::Url(_) => "invalid search index endpoint",
            Self::Http(_) | Self::Request(_) => "search request failed",
            Self::InvalidParameter { .. } | Self::Unavailable(_) => "unexpected failure",
        }
    }
}
