use super::config::ChannelOptions;
use super::driver::{ChannelDriver, Command};
use super::state::{ChannelSnapshot, ChannelState};
use crate::infrastructure::notification_endpoint;
use crate::messaging::{NotificationHandler, TracingHandler};
use crate::types::{Notification, Result};
use crate::websocket::{Connector, WebSocketConnector};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use url::Url;

/// Builder for NotificationChannel that handles initialization
pub struct NotificationChannelBuilder {
    origin: String,
    options: ChannelOptions,
    connector: Option<Arc<dyn Connector>>,
    handler: Option<Arc<dyn NotificationHandler>>,
}

impl NotificationChannelBuilder {
    /// Create a new builder for the page served from `origin`
    pub fn new(origin: impl Into<String>, options: ChannelOptions) -> Self {
        Self {
            origin: origin.into(),
            options,
            connector: None,
            handler: None,
        }
    }

    /// Replace the WebSocket connector (tests, custom transports)
    pub fn connector(mut self, connector: impl Connector) -> Self {
        self.connector = Some(Arc::new(connector));
        self
    }

    /// Host callbacks; defaults to [`TracingHandler`]
    pub fn handler(mut self, handler: impl NotificationHandler) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Derive the endpoint and spawn the channel task.
    ///
    /// Must be called inside a tokio runtime.
    pub fn build(self) -> Result<NotificationChannel> {
        let endpoint = notification_endpoint(&self.origin)?;

        let connector: Arc<dyn Connector> = match self.connector {
            Some(connector) => connector,
            None => Arc::new(WebSocketConnector::new(self.options.session_cookie.clone())),
        };
        let handler: Arc<dyn NotificationHandler> = match self.handler {
            Some(handler) => handler,
            None => Arc::new(TracingHandler),
        };

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ChannelState::Disconnected);

        let driver = ChannelDriver::new(
            endpoint.clone(),
            self.options,
            connector,
            handler,
            state_tx,
            event_tx,
        );
        tokio::spawn(driver.run(command_rx, event_rx));

        Ok(NotificationChannel {
            endpoint,
            commands: command_tx,
            state: state_rx,
        })
    }
}

/// Client side of the SSO logout-notification socket.
///
/// Keeps at most one transport to `{ws|wss}://<host>/ws/logout`, pings it every
/// 30 seconds, reconnects with linear backoff and turns server notifications
/// into [`NotificationHandler`] calls. All failures are logged and absorbed;
/// nothing here returns an error once the channel is built.
///
/// Handles are cheap to clone. The channel shuts down and releases its
/// transport when the last handle is dropped.
///
/// # Example
///
/// ```no_run
/// use sso_logout_rs::{ChannelOptions, NotificationChannel};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let channel = NotificationChannel::new(
///     "https://sso.example.com",
///     ChannelOptions::with_session("JSESSIONID=8F3A..."),
/// )?;
/// channel.start();
/// // ... on page teardown
/// channel.cleanup();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct NotificationChannel {
    endpoint: Url,
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ChannelState>,
}

impl NotificationChannel {
    /// Creates a channel with the WebSocket connector and the logging handler.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::UrlParse`](crate::NotificationError::UrlParse) or
    /// [`NotificationError::UnsupportedScheme`](crate::NotificationError::UnsupportedScheme)
    /// if no socket endpoint can be derived from `origin`.
    pub fn new(origin: impl Into<String>, options: ChannelOptions) -> Result<Self> {
        NotificationChannelBuilder::new(origin, options).build()
    }

    pub fn builder(origin: impl Into<String>, options: ChannelOptions) -> NotificationChannelBuilder {
        NotificationChannelBuilder::new(origin, options)
    }

    /// Opens the transport. No-op without session credentials or while
    /// already connecting/connected; supersedes a pending reconnect.
    pub fn start(&self) {
        self.send(Command::Start);
    }

    /// Stops all timers and closes the transport. Idempotent.
    pub fn cleanup(&self) {
        self.send(Command::Cleanup);
    }

    /// The user confirmed the forced-logout prompt
    pub fn confirm_force_logout(&self) {
        self.send(Command::ConfirmForceLogout);
    }

    /// Dispatches a notification as if it had arrived on the transport
    pub fn handle_notification(&self, notification: Notification) {
        self.send(Command::Notify(notification));
    }

    /// Last published state. Commands are processed asynchronously, so this
    /// may not yet reflect a call made just before.
    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ChannelState> {
        self.state.clone()
    }

    /// State after every earlier command has been processed.
    /// `None` if the channel task is gone.
    pub async fn snapshot(&self) -> Option<ChannelSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Snapshot(reply_tx));
        reply_rx.await.ok()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn send(&self, command: Command) {
        if let Err(e) = self.commands.send(command) {
            tracing::debug!("Notification channel task gone, dropping {:?}", e.0);
        }
    }
}
