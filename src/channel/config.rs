use crate::types::{
    FORCE_LOGOUT_GRACE, HEARTBEAT_INTERVAL, MAX_RECONNECT_ATTEMPTS, RECONNECT_STEP,
};
use std::time::Duration;

/// Options for a [`NotificationChannel`](super::NotificationChannel).
///
/// Timings are in milliseconds; `None` keeps the default.
#[derive(Debug, Clone, Default)]
pub struct ChannelOptions {
    /// Session credentials of the logged-in user. `None` means the user is not
    /// authenticated and `start()` does nothing. Sent as the `Cookie` header
    /// of the upgrade request.
    pub session_cookie: Option<String>,
    pub heartbeat_interval: Option<u64>,
    pub max_reconnect_attempts: Option<u32>,
    pub reconnect_step: Option<u64>,
    pub force_logout_grace: Option<u64>,
}

impl ChannelOptions {
    pub fn with_session(session_cookie: impl Into<String>) -> Self {
        Self {
            session_cookie: Some(session_cookie.into()),
            ..Default::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_cookie.is_some()
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval.unwrap_or(HEARTBEAT_INTERVAL))
    }

    pub fn max_reconnect_attempts(&self) -> u32 {
        self.max_reconnect_attempts.unwrap_or(MAX_RECONNECT_ATTEMPTS)
    }

    pub fn reconnect_step(&self) -> Duration {
        Duration::from_millis(self.reconnect_step.unwrap_or(RECONNECT_STEP))
    }

    pub fn force_logout_grace(&self) -> Duration {
        Duration::from_millis(self.force_logout_grace.unwrap_or(FORCE_LOGOUT_GRACE))
    }
}
