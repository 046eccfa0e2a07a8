use crate::types::constants::paths;
use crate::types::Result;
use url::Url;

/// Where the host page should navigate after a logout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// The session was invalidated elsewhere
    ForcedLogout,
    /// The user logged out through the logout API
    LogoutSuccess,
}

impl Redirect {
    /// Path and query of the login view
    pub fn path(&self) -> &'static str {
        match self {
            Self::ForcedLogout => paths::LOGIN_FORCED,
            Self::LogoutSuccess => paths::LOGIN_SUCCESS,
        }
    }

    /// Absolute URL on the given origin
    pub fn url(&self, origin: &Url) -> Result<Url> {
        Ok(origin.join(self.path())?)
    }
}

/// Callbacks supplied by the host application.
///
/// All methods run on the channel's event loop and must not block.
pub trait NotificationHandler: Send + Sync + 'static {
    /// The transport opened
    fn connected(&self) {}

    /// Show a blocking, non-dismissable prompt; the user confirms through
    /// [`NotificationChannel::confirm_force_logout`](crate::NotificationChannel::confirm_force_logout)
    /// or the grace period confirms it automatically.
    fn force_logout_prompt(&self, message: &str);

    /// Show a non-blocking informational notice
    fn broadcast_notice(&self, message: &str);

    /// Reconnect attempts are exhausted; a manual reload is required
    fn reconnect_exhausted(&self);

    /// Navigate away from the current page
    fn redirect(&self, target: Redirect);
}

/// Handler that only logs. Used when the host supplies none.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHandler;

impl NotificationHandler for TracingHandler {
    fn connected(&self) {
        tracing::info!("Real-time logout notifications enabled");
    }

    fn force_logout_prompt(&self, message: &str) {
        tracing::warn!("Logged out from another location: {}", message);
    }

    fn broadcast_notice(&self, message: &str) {
        tracing::warn!("System notice: {}", message);
    }

    fn reconnect_exhausted(&self) {
        tracing::warn!("Real-time notifications unavailable, reload the page to retry");
    }

    fn redirect(&self, target: Redirect) {
        tracing::info!("Redirect requested to {}", target.path());
    }
}
