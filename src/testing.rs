//! In-memory connector and recording handler for channel tests.

use crate::messaging::{NotificationHandler, Redirect};
use crate::types::{NotificationError, Result, WS_CLOSE_ABNORMAL, WS_CLOSE_NORMAL};
use crate::websocket::{ConnectionState, Connector, EventSink, Transport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

/// Test-side view of one transport the channel opened
#[derive(Clone)]
pub(crate) struct FakeHandle {
    sink: EventSink,
    state: Arc<Mutex<ConnectionState>>,
    sent: Arc<Mutex<Vec<String>>>,
    close_calls: Arc<AtomicUsize>,
}

impl FakeHandle {
    pub(crate) fn open(&self) {
        self.set_state(ConnectionState::Open);
        self.sink.opened();
    }

    /// Connection attempt failed: error followed by close
    pub(crate) fn fail(&self) {
        self.set_state(ConnectionState::Closed);
        self.sink.error("connection refused");
        self.sink.closed(Some(WS_CLOSE_ABNORMAL), "connection failed");
    }

    /// Established connection dropped by the network
    pub(crate) fn drop_connection(&self) {
        self.set_state(ConnectionState::Closed);
        self.sink.closed(Some(WS_CLOSE_ABNORMAL), "");
    }

    pub(crate) fn error(&self, message: &str) {
        self.sink.error(message);
    }

    pub(crate) fn receive(&self, text: &str) {
        self.sink.message(text);
    }

    pub(crate) fn set_state(&self, state: ConnectionState) {
        *self.state.lock().unwrap() = state;
    }

    pub(crate) fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

struct FakeTransport {
    handle: FakeHandle,
}

impl Transport for FakeTransport {
    fn state(&self) -> ConnectionState {
        *self.handle.state.lock().unwrap()
    }

    fn send_text(&self, text: &str) -> Result<()> {
        if !self.is_open() {
            return Err(NotificationError::NotConnected);
        }
        self.handle.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn close(&mut self) {
        self.handle.close_calls.fetch_add(1, Ordering::SeqCst);
        self.handle.set_state(ConnectionState::Closed);
        self.handle
            .sink
            .closed(Some(WS_CLOSE_NORMAL), "client closed");
    }
}

/// Connector that never touches the network
#[derive(Clone, Default)]
pub(crate) struct FakeConnector {
    opened: Arc<Mutex<Vec<(Url, FakeHandle)>>>,
}

impl FakeConnector {
    pub(crate) fn opened(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub(crate) fn endpoints(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.to_string())
            .collect()
    }

    /// Most recently opened transport
    pub(crate) fn last(&self) -> FakeHandle {
        let opened = self.opened.lock().unwrap();
        opened.last().expect("no transport opened").1.clone()
    }
}

impl Connector for FakeConnector {
    fn open(&self, endpoint: &Url, sink: EventSink) -> Box<dyn Transport> {
        let handle = FakeHandle {
            sink,
            state: Arc::new(Mutex::new(ConnectionState::Connecting)),
            sent: Arc::new(Mutex::new(Vec::new())),
            close_calls: Arc::new(AtomicUsize::new(0)),
        };
        self.opened
            .lock()
            .unwrap()
            .push((endpoint.clone(), handle.clone()));
        Box::new(FakeTransport { handle })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HandlerCall {
    Connected,
    Prompt(String),
    Notice(String),
    ReconnectExhausted,
    Redirect(Redirect),
}

/// Records every host callback in order
#[derive(Clone, Default)]
pub(crate) struct RecordingHandler {
    calls: Arc<Mutex<Vec<HandlerCall>>>,
}

impl RecordingHandler {
    pub(crate) fn calls(&self) -> Vec<HandlerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, call: &HandlerCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub(crate) fn redirects(&self) -> Vec<Redirect> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                HandlerCall::Redirect(target) => Some(*target),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: HandlerCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl NotificationHandler for RecordingHandler {
    fn connected(&self) {
        self.record(HandlerCall::Connected);
    }

    fn force_logout_prompt(&self, message: &str) {
        self.record(HandlerCall::Prompt(message.to_string()));
    }

    fn broadcast_notice(&self, message: &str) {
        self.record(HandlerCall::Notice(message.to_string()));
    }

    fn reconnect_exhausted(&self) {
        self.record(HandlerCall::ReconnectExhausted);
    }

    fn redirect(&self, target: Redirect) {
        self.record(HandlerCall::Redirect(target));
    }
}
