use thiserror::Error;

/// Why a submitted URL was rejected before any network access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    Required,
    InvalidUrl,
}

impl ValidationReason {
    pub fn message_key(self) -> &'static str {
        match self {
            ValidationReason::Required => "validation.required",
            ValidationReason::InvalidUrl => "validation.url",
        }
    }
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationReason::Required => write!(f, "required"),
            ValidationReason::InvalidUrl => write!(f, "invalid-url"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FeedloomError {
    #[error("Feed parsing error: {0}")]
    Parse(String),

    #[error("Feed already exists for host: {0}")]
    DuplicateFeed(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationReason),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Post not found: {0}")]
    UnknownPost(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FeedloomError {
    /// Localization key of the inline message shown for this error.
    pub fn message_key(&self) -> &'static str {
        match self {
            FeedloomError::Parse(_) => "parseError",
            FeedloomError::DuplicateFeed(_) => "urlAlreadyExists",
            FeedloomError::Validation(reason) => reason.message_key(),
            FeedloomError::Network(_) => "networkError",
            FeedloomError::UnknownPost(_) => "unknownPost",
            FeedloomError::Config(_) | FeedloomError::Io(_) => "unexpectedError",
        }
    }
}

impl From<reqwest::Error> for FeedloomError {
    fn from(e: reqwest::Error) -> Self {
        FeedloomError::Network(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FeedloomError>;
