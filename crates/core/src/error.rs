/// Result alias that carries the custom [`DirectorError`] type.
pub type Result<T> = std::result::Result<T, DirectorError>;

/// Common error type for the core crate.
///
/// Every variant is raised synchronously by the call that detects it and is
/// never retried internally.
#[derive(Debug, thiserror::Error)]
pub enum DirectorError {
    /// The host could not resolve the identifier to any element.
    #[error("no element found with id `{0}`")]
    SourceNotFound(String),
    /// The identifier resolved to something other than playable media.
    #[error("element `{id}` is a <{tag}> element, not playable media")]
    SourceTypeMismatch { id: String, tag: String },
    /// An operation that needs a bound media source ran before binding.
    #[error("media source hasn't been initialised")]
    NotInitialized,
    /// The label is neither a lifecycle event nor a time expression.
    #[error("action `{0}` is invalid (expected an event name or a time such as 10s, 1m30s or 0:10:00)")]
    InvalidAction(String),
    /// Free-form error, mostly used for configuration problems.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON configuration.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl DirectorError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for DirectorError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for DirectorError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
