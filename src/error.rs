use thiserror::Error;

/// Unified error type for tag-release operations
#[derive(Error, Debug)]
pub enum TagReleaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in tag-release
pub type Result<T> = std::result::Result<T, TagReleaseError>;

impl TagReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TagReleaseError::Config(msg.into())
    }

    /// Create a semantic-version validation error with context
    pub fn validation(msg: impl Into<String>) -> Self {
        TagReleaseError::Validation(msg.into())
    }

    /// Create an environment error with context
    pub fn environment(msg: impl Into<String>) -> Self {
        TagReleaseError::Environment(msg.into())
    }

    /// Create a version comparison error with context
    pub fn version(msg: impl Into<String>) -> Self {
        TagReleaseError::Version(msg.into())
    }

    /// Underlying message without the category prefix
    pub fn diagnostic(&self) -> String {
        match self {
            TagReleaseError::Config(msg)
            | TagReleaseError::Validation(msg)
            | TagReleaseError::Environment(msg)
            | TagReleaseError::Version(msg) => msg.clone(),
            TagReleaseError::Git(e) => e.message().to_string(),
            TagReleaseError::Io(e) => e.to_string(),
        }
    }

    /// Process exit code reported for this error category
    pub fn exit_code(&self) -> i32 {
        match self {
            TagReleaseError::Config(_) => 2,
            TagReleaseError::Validation(_) => 3,
            TagReleaseError::Environment(_) => 4,
            TagReleaseError::Version(_) => 5,
            TagReleaseError::Git(_) | TagReleaseError::Io(_) => 1,
        }
    }
}
