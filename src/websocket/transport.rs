use crate::channel::driver::LoopEvent;
use crate::types::Result;
use tokio::sync::mpsc;
use url::Url;

/// Ready state of a single transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closing,
    Closed,
}

/// Lifecycle and data events a transport reports back to its channel
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Error(String),
    Closed { code: Option<u16>, reason: String },
}

/// Delivers transport events to the channel that opened the transport.
///
/// Each sink is tagged with the connection generation it was created for, so
/// events from a transport the channel has since replaced are discarded.
#[derive(Debug, Clone)]
pub struct EventSink {
    generation: u64,
    tx: mpsc::UnboundedSender<LoopEvent>,
}

impl EventSink {
    pub(crate) fn new(generation: u64, tx: mpsc::UnboundedSender<LoopEvent>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn opened(&self) {
        self.emit(TransportEvent::Opened);
    }

    pub fn message(&self, text: impl Into<String>) {
        self.emit(TransportEvent::Message(text.into()));
    }

    pub fn error(&self, error: impl std::fmt::Display) {
        self.emit(TransportEvent::Error(error.to_string()));
    }

    pub fn closed(&self, code: Option<u16>, reason: impl Into<String>) {
        self.emit(TransportEvent::Closed {
            code,
            reason: reason.into(),
        });
    }

    fn emit(&self, event: TransportEvent) {
        let envelope = LoopEvent::Transport {
            generation: self.generation,
            event,
        };
        if self.tx.send(envelope).is_err() {
            tracing::debug!(
                "Channel dropped, discarding transport event for generation {}",
                self.generation
            );
        }
    }
}

/// A duplex message socket owned by the channel.
pub trait Transport: Send {
    fn state(&self) -> ConnectionState;

    fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Sends a text frame. Fails with `NotConnected` unless open; nothing is queued.
    fn send_text(&self, text: &str) -> Result<()>;

    /// Starts a graceful close. The eventual close event is reported through the sink.
    fn close(&mut self);
}

/// Opens transports. Injected so tests can substitute a fake.
pub trait Connector: Send + Sync + 'static {
    /// Begins a connection attempt and returns immediately; the outcome is
    /// reported through `sink` (`Opened`, or `Error` followed by `Closed`).
    fn open(&self, endpoint: &Url, sink: EventSink) -> Box<dyn Transport>;
}
