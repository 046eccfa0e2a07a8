use crate::types::constants::notification_types;
use serde::{Deserialize, Serialize};

/// Type-safe notification kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    /// Server acknowledged the socket
    ConnectionEstablished,

    /// This session was invalidated elsewhere
    ForceLogout,

    /// System-wide informational notice
    BroadcastLogout,

    /// Server liveness reply
    Heartbeat,

    /// Anything the client does not understand
    Unknown(String),
}

impl NotificationKind {
    /// Parse a `type` string into a NotificationKind
    pub fn from_str(s: &str) -> Self {
        match s {
            notification_types::CONNECTION_ESTABLISHED => Self::ConnectionEstablished,
            notification_types::FORCE_LOGOUT => Self::ForceLogout,
            notification_types::BROADCAST_LOGOUT => Self::BroadcastLogout,
            notification_types::HEARTBEAT => Self::Heartbeat,
            _ => Self::Unknown(s.to_string()),
        }
    }

    /// Convert kind to its wire representation
    pub fn as_str(&self) -> &str {
        match self {
            Self::ConnectionEstablished => notification_types::CONNECTION_ESTABLISHED,
            Self::ForceLogout => notification_types::FORCE_LOGOUT,
            Self::BroadcastLogout => notification_types::BROADCAST_LOGOUT,
            Self::Heartbeat => notification_types::HEARTBEAT,
            Self::Unknown(s) => s,
        }
    }
}

impl From<&str> for NotificationKind {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for NotificationKind {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
