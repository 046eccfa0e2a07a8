use super::config::ChannelOptions;
use super::state::{ChannelSnapshot, ChannelState, ForceLogoutStage};
use crate::infrastructure::{HeartbeatManager, ReconnectPolicy, TimerKind, TimerSet};
use crate::messaging::{NotificationHandler, NotificationKind, Redirect};
use crate::types::{Notification, PING_PAYLOAD};
use crate::websocket::{Connector, EventSink, Transport, TransportEvent};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use url::Url;

/// Requests from [`NotificationChannel`](super::NotificationChannel) handles
#[derive(Debug)]
pub(crate) enum Command {
    Start,
    Cleanup,
    ConfirmForceLogout,
    Notify(Notification),
    Snapshot(oneshot::Sender<ChannelSnapshot>),
}

/// Everything else the loop reacts to
#[derive(Debug)]
pub(crate) enum LoopEvent {
    Transport {
        generation: u64,
        event: TransportEvent,
    },
    Timer {
        kind: TimerKind,
        token: u64,
    },
}

/// Owns all channel state; runs as a single task.
pub(crate) struct ChannelDriver {
    endpoint: Url,
    options: ChannelOptions,
    connector: Arc<dyn Connector>,
    handler: Arc<dyn NotificationHandler>,
    transport: Option<Box<dyn Transport>>,
    /// Bumped for every transport opened; tags that transport's events
    generation: u64,
    policy: ReconnectPolicy,
    timers: TimerSet,
    force_logout: ForceLogoutStage,
    state_tx: watch::Sender<ChannelState>,
    events_tx: mpsc::UnboundedSender<LoopEvent>,
}

impl ChannelDriver {
    pub(crate) fn new(
        endpoint: Url,
        options: ChannelOptions,
        connector: Arc<dyn Connector>,
        handler: Arc<dyn NotificationHandler>,
        state_tx: watch::Sender<ChannelState>,
        events_tx: mpsc::UnboundedSender<LoopEvent>,
    ) -> Self {
        let policy = ReconnectPolicy::new(options.max_reconnect_attempts(), options.reconnect_step());
        Self {
            endpoint,
            options,
            connector,
            handler,
            transport: None,
            generation: 0,
            policy,
            timers: TimerSet::new(),
            force_logout: ForceLogoutStage::Idle,
            state_tx,
            events_tx,
        }
    }

    /// Processes events until every handle is dropped, then tears down
    pub(crate) async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut events: mpsc::UnboundedReceiver<LoopEvent>,
    ) {
        loop {
            tokio::select! {
                biased;
                Some(event) = events.recv() => self.handle_event(event),
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
            }
        }

        self.cleanup();
        tracing::debug!("Notification channel task finished");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Start => self.start(),
            Command::Cleanup => self.cleanup(),
            Command::ConfirmForceLogout => self.confirm_force_logout(),
            Command::Notify(notification) => self.handle_notification(notification),
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    fn handle_event(&mut self, event: LoopEvent) {
        match event {
            LoopEvent::Transport { generation, event } => {
                if generation != self.generation || self.transport.is_none() {
                    tracing::debug!(
                        "Ignoring {:?} from stale transport (generation {})",
                        event,
                        generation
                    );
                    return;
                }
                self.handle_transport_event(event);
            }
            LoopEvent::Timer { kind, token } => self.handle_timer(kind, token),
        }
    }

    fn handle_timer(&mut self, kind: TimerKind, token: u64) {
        match kind {
            TimerKind::Heartbeat => {
                if self.timers.is_current(kind, token) {
                    self.send_heartbeat();
                }
            }
            TimerKind::Reconnect => {
                if self.timers.complete(kind, token) {
                    tracing::info!(
                        "Attempting to reconnect ({}/{})",
                        self.policy.attempts(),
                        self.policy.max_attempts()
                    );
                    self.start();
                }
            }
            TimerKind::ForceLogoutGrace => {
                if self.timers.complete(kind, token) {
                    tracing::debug!("Force logout grace period elapsed");
                    self.confirm_force_logout();
                }
            }
        }
    }

    fn start(&mut self) {
        if !self.options.is_authenticated() {
            tracing::debug!("No session credentials, notification channel not started");
            return;
        }

        let state = *self.state_tx.borrow();
        if state.is_active() {
            tracing::warn!("Channel already {:?}, ignoring start", state);
            return;
        }

        if self.timers.cancel(TimerKind::Reconnect) {
            tracing::info!("Pending reconnect superseded by explicit start");
        }

        // retry timers start from Reconnecting; Disconnected means a fresh start
        if state == ChannelState::Disconnected {
            self.policy.reset();
        }

        self.open_transport();
    }

    fn open_transport(&mut self) {
        if let Some(mut previous) = self.transport.take() {
            previous.close();
        }

        if self.force_logout == ForceLogoutStage::Completed {
            self.force_logout = ForceLogoutStage::Idle;
        }

        self.generation += 1;
        let sink = EventSink::new(self.generation, self.events_tx.clone());

        self.set_state(ChannelState::Connecting);
        tracing::info!("Connecting to {}", self.endpoint);
        self.transport = Some(self.connector.open(&self.endpoint, sink));
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => {
                tracing::info!("Logout notification channel connected");
                self.policy.reset();
                self.set_state(ChannelState::Connected);
                HeartbeatManager::new(self.events_tx.clone())
                    .with_interval(self.options.heartbeat_interval())
                    .spawn_on(&mut self.timers);
                self.handler.connected();
            }
            TransportEvent::Message(text) => match Notification::parse(&text) {
                Ok(notification) => self.handle_notification(notification),
                Err(e) => {
                    tracing::warn!("Failed to parse notification: {} - Raw: {}", e, text);
                }
            },
            TransportEvent::Error(e) => {
                // the close event that follows drives the state change
                tracing::error!("Notification transport error: {}", e);
            }
            TransportEvent::Closed { code, reason } => {
                tracing::info!("Connection closed: code={:?}, reason='{}'", code, reason);
                self.timers.cancel(TimerKind::Heartbeat);
                self.transport = None;
                self.reconnect();
            }
        }
    }

    fn reconnect(&mut self) {
        match self.policy.next_delay() {
            Some(delay) => {
                self.set_state(ChannelState::Reconnecting);
                tracing::info!(
                    "Reconnecting in {:?} (attempt {}/{})",
                    delay,
                    self.policy.attempts(),
                    self.policy.max_attempts()
                );
                self.timers
                    .schedule(TimerKind::Reconnect, delay, self.events_tx.clone());
            }
            None => {
                self.set_state(ChannelState::Disconnected);
                tracing::warn!(
                    "Giving up after {} reconnect attempts",
                    self.policy.max_attempts()
                );
                self.handler.reconnect_exhausted();
            }
        }
    }

    fn send_heartbeat(&self) {
        match &self.transport {
            Some(transport) if transport.is_open() => match transport.send_text(PING_PAYLOAD) {
                Ok(()) => tracing::debug!("Sent heartbeat"),
                Err(e) => tracing::error!("[Heartbeat] Failed to send: {}", e),
            },
            _ => tracing::debug!("Transport not open, skipping heartbeat"),
        }
    }

    fn handle_notification(&mut self, notification: Notification) {
        tracing::debug!(
            "Received notification: type={}, message={:?}",
            notification.kind,
            notification.message
        );

        match &notification.kind {
            NotificationKind::ConnectionEstablished => {
                tracing::info!("Server confirmed logout notification channel");
            }
            NotificationKind::ForceLogout => self.begin_force_logout(notification.message()),
            NotificationKind::BroadcastLogout => {
                self.handler.broadcast_notice(notification.message());
            }
            NotificationKind::Heartbeat => {}
            NotificationKind::Unknown(kind) => {
                tracing::warn!("Unknown notification type: {}", kind);
            }
        }
    }

    fn begin_force_logout(&mut self, message: &str) {
        if self.force_logout != ForceLogoutStage::Idle {
            tracing::debug!("Forced logout already {:?}, ignoring", self.force_logout);
            return;
        }

        tracing::warn!("Session invalidated elsewhere: {}", message);
        self.force_logout = ForceLogoutStage::Prompted;
        self.handler.force_logout_prompt(message);
        self.timers.schedule(
            TimerKind::ForceLogoutGrace,
            self.options.force_logout_grace(),
            self.events_tx.clone(),
        );
    }

    fn confirm_force_logout(&mut self) {
        if self.force_logout != ForceLogoutStage::Prompted {
            tracing::debug!("No forced logout pending ({:?})", self.force_logout);
            return;
        }

        self.force_logout = ForceLogoutStage::Completed;
        self.timers.cancel(TimerKind::ForceLogoutGrace);
        self.cleanup();
        self.handler.redirect(Redirect::ForcedLogout);
    }

    fn cleanup(&mut self) {
        self.timers.abort_all();
        if let Some(mut transport) = self.transport.take() {
            transport.close();
            tracing::info!("Closed logout notification transport");
        }
        if self.force_logout == ForceLogoutStage::Prompted {
            tracing::debug!("Pending forced logout dropped by cleanup");
            self.force_logout = ForceLogoutStage::Idle;
        }
        self.set_state(ChannelState::Disconnected);
    }

    fn set_state(&self, new_state: ChannelState) {
        let changed = self.state_tx.send_if_modified(|state| {
            if *state == new_state {
                return false;
            }
            *state = new_state;
            true
        });
        if changed {
            tracing::debug!("Channel state -> {:?}", new_state);
        }
    }

    fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            state: *self.state_tx.borrow(),
            reconnect_attempts: self.policy.attempts(),
            active_timers: self.timers.active(),
            has_transport: self.transport.is_some(),
            transport_open: self.transport.as_ref().is_some_and(|t| t.is_open()),
            force_logout: self.force_logout,
        }
    }
}
