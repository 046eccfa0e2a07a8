//! # SSO Logout Notifications
//!
//! Client for the logout-notification WebSocket of an OAuth2 single-sign-on
//! server. A logged-in page keeps one socket open to `/ws/logout`; when the
//! session is invalidated elsewhere the server pushes `FORCE_LOGOUT` and the
//! host is told to prompt and redirect to the login view.
//!
//! ## Example
//!
//! ```no_run
//! use sso_logout_rs::{ChannelOptions, NotificationChannel};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let channel = NotificationChannel::new(
//!         "https://sso.example.com",
//!         ChannelOptions::with_session("JSESSIONID=8F3A..."),
//!     )?;
//!
//!     channel.start();
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod infrastructure;
pub mod messaging;
pub mod types;
pub mod websocket;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::{
    ChannelOptions, ChannelSnapshot, ChannelState, ForceLogoutStage, NotificationChannel,
    NotificationChannelBuilder,
};
pub use infrastructure::{LogoutClient, LogoutResponse, LogoutType, ReconnectPolicy};
pub use messaging::{NotificationHandler, NotificationKind, Redirect, TracingHandler};
pub use types::{Notification, NotificationError, Result};
pub use websocket::{ConnectionState, Connector, EventSink, Transport, TransportEvent, WebSocketConnector};
