use thiserror::Error;

/// Main error type for sessionmux
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Address has no usable scheme or authority
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Address or callback was supplied a second time
    #[error("Session already bound: {0}")]
    AlreadyBound(String),

    /// Neither a stored address nor a default address is available
    #[error("Missing identity: {0}")]
    MissingIdentity(String),

    /// Operation invoked before the session finished binding
    #[error("Session is not bound")]
    NotBound,

    /// The connection factory could not produce a connection
    #[error("Connection unavailable for '{origin}': {reason}")]
    ConnectionUnavailable { origin: String, reason: String },

    /// Another live session on the same connection uses this namespace
    #[error("Namespace '{namespace}' on '{origin}' is already in use")]
    NamespaceInUse { origin: String, namespace: String },

    /// The connection's outbound queue refused the hand-off
    #[error("Channel send error: {0}")]
    ChannelSend(String),
}

impl SessionError {
    /// Whether retrying the same call later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SessionError::ConnectionUnavailable { .. } | SessionError::ChannelSend(_)
        )
    }
}

/// Result type for sessionmux operations
pub type Result<T> = std::result::Result<T, SessionError>;
