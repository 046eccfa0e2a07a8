use super::transport::{ConnectionState, Connector, EventSink, Transport};
use crate::types::{NotificationError, Result, WS_CLOSE_ABNORMAL};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use url::Url;

/// Opens real WebSocket connections with `tokio-tungstenite`.
#[derive(Debug, Clone, Default)]
pub struct WebSocketConnector {
    session_cookie: Option<String>,
}

impl WebSocketConnector {
    pub fn new(session_cookie: Option<String>) -> Self {
        Self { session_cookie }
    }
}

impl Connector for WebSocketConnector {
    fn open(&self, endpoint: &Url, sink: EventSink) -> Box<dyn Transport> {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let state = Arc::new(watch::Sender::new(ConnectionState::Connecting));

        tracing::debug!("Creating WebSocket connection to: {}", endpoint);
        let task = tokio::spawn(run_socket(
            endpoint.clone(),
            self.session_cookie.clone(),
            Arc::clone(&state),
            outbound_rx,
            sink,
        ));

        Box::new(WebSocketTransport {
            outbound: outbound_tx,
            state,
            task,
        })
    }
}

/// Handle to a socket driven by a background task
pub struct WebSocketTransport {
    outbound: mpsc::UnboundedSender<Message>,
    state: Arc<watch::Sender<ConnectionState>>,
    task: JoinHandle<()>,
}

impl Transport for WebSocketTransport {
    fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    fn send_text(&self, text: &str) -> Result<()> {
        if !self.is_open() {
            return Err(NotificationError::NotConnected);
        }
        self.outbound
            .send(Message::Text(text.to_string().into()))
            .map_err(|_| NotificationError::NotConnected)
    }

    fn close(&mut self) {
        match self.state() {
            ConnectionState::Open => {
                self.state.send_replace(ConnectionState::Closing);
                if self.outbound.send(Message::Close(None)).is_err() {
                    tracing::debug!("Socket task already finished");
                }
            }
            ConnectionState::Connecting => {
                // handshake still in flight
                self.task.abort();
                self.state.send_replace(ConnectionState::Closed);
            }
            ConnectionState::Closing | ConnectionState::Closed => {}
        }
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        if self.state() == ConnectionState::Connecting {
            self.task.abort();
        }
    }
}

fn build_request(
    endpoint: &Url,
    session_cookie: Option<&str>,
) -> Result<tokio_tungstenite::tungstenite::handshake::client::Request> {
    let mut request = endpoint.as_str().into_client_request()?;
    if let Some(cookie) = session_cookie {
        let value = HeaderValue::from_str(cookie)
            .map_err(|e| NotificationError::Connection(format!("Invalid session cookie: {}", e)))?;
        request.headers_mut().insert("Cookie", value);
    }
    Ok(request)
}

async fn run_socket(
    endpoint: Url,
    session_cookie: Option<String>,
    state: Arc<watch::Sender<ConnectionState>>,
    mut outbound: mpsc::UnboundedReceiver<Message>,
    sink: EventSink,
) {
    let connected = match build_request(&endpoint, session_cookie.as_deref()) {
        Ok(request) => tokio_tungstenite::connect_async(request)
            .await
            .map_err(NotificationError::from),
        Err(e) => Err(e),
    };

    let ws_stream = match connected {
        Ok((ws_stream, _response)) => ws_stream,
        Err(e) => {
            state.send_replace(ConnectionState::Closed);
            sink.error(&e);
            sink.closed(Some(WS_CLOSE_ABNORMAL), "connection failed");
            return;
        }
    };

    state.send_replace(ConnectionState::Open);
    sink.opened();

    let (mut write_half, mut read_half) = ws_stream.split();
    let mut close_code = None;
    let mut close_reason = String::new();

    loop {
        tokio::select! {
            frame = outbound.recv() => match frame {
                Some(Message::Close(frame)) => {
                    if let Err(e) = write_half.send(Message::Close(frame)).await {
                        tracing::debug!("Close handshake failed: {}", e);
                        break;
                    }
                }
                Some(frame) => {
                    if let Err(e) = write_half.send(frame).await {
                        tracing::error!("WebSocket send failed: {}", e);
                        sink.error(&e);
                    }
                }
                None => {
                    // transport handle dropped
                    let _ = write_half.close().await;
                    break;
                }
            },
            msg = read_half.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    tracing::debug!("Received text message: {}", text);
                    sink.message(text.as_str());
                }
                Some(Ok(Message::Close(frame))) => {
                    if let Some(close_frame) = frame {
                        tracing::info!(
                            "Server closed connection: code={:?}, reason='{}'",
                            close_frame.code,
                            close_frame.reason
                        );
                        close_code = Some(u16::from(close_frame.code));
                        close_reason = close_frame.reason.to_string();
                    } else {
                        tracing::warn!("Server closed connection without close frame");
                    }
                    break;
                }
                Some(Ok(Message::Binary(data))) => {
                    tracing::warn!("Received unexpected binary message ({} bytes)", data.len());
                }
                Some(Ok(Message::Ping(data))) => {
                    tracing::debug!("Received ping ({} bytes)", data.len());
                }
                Some(Ok(Message::Pong(data))) => {
                    tracing::debug!("Received pong ({} bytes)", data.len());
                }
                Some(Ok(Message::Frame(_))) => {
                    tracing::debug!("Received raw frame (internal)");
                }
                Some(Err(e)) => {
                    tracing::error!("WebSocket read error: {}", e);
                    sink.error(&e);
                    close_code = Some(WS_CLOSE_ABNORMAL);
                    break;
                }
                None => break,
            },
        }
    }

    state.send_replace(ConnectionState::Closed);
    sink.closed(close_code, close_reason);
}
