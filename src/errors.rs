use std::fmt;

/// Errors raised by the YouTube data access layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// No API key is configured
    MissingCredential,

    /// The request URL could not be built
    InvalidRequest(String),

    /// The request never produced a response (connection, TLS, body read)
    Transport(String),

    /// The upstream API answered with a non-success status
    Status { status: u16, message: String },

    /// The payload does not match the documented upstream schema
    ContractViolation(String),

    /// Every trending page was empty
    NoTrendingVideos { category: Option<String> },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => write!(
                f,
                "YouTube API key is not configured. Set YOUTUBE_API_KEY or add youtube_api_key to config.json"
            ),
            Self::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            Self::Transport(msg) => write!(f, "Transport error: {}", msg),
            Self::Status { status, message } => {
                write!(f, "YouTube API error: {}. {}", status, message)
            }
            Self::ContractViolation(msg) => write!(f, "Upstream contract violation: {}", msg),
            Self::NoTrendingVideos { category: Some(category) } => {
                write!(f, "No trending videos available for category {}", category)
            }
            Self::NoTrendingVideos { category: None } => write!(f, "No trending videos available"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None if err.is_decode() => Self::ContractViolation(err.to_string()),
            None => Self::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::ContractViolation(err.to_string())
    }
}
