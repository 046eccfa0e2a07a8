use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors raised while talking to the SSO server.
///
/// Inside the notification channel these are logged and absorbed; they only
/// reach callers from construction and from [`LogoutClient`](crate::LogoutClient).
#[derive(Error, Debug)]
pub enum NotificationError {
    /// WebSocket protocol error (handshake failed, invalid frame, etc.)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// General connection error with descriptive message
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request error (logout API)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error (malformed origin)
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Origin scheme that has no WebSocket equivalent
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// The server refused or failed the logout request
    #[error("Logout failed: {0}")]
    Logout(String),

    /// Attempted to send while the transport is not open
    #[error("Not connected")]
    NotConnected,
}

/// Convenience type alias for `Result<T, NotificationError>`.
pub type Result<T> = std::result::Result<T, NotificationError>;
