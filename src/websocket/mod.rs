// WebSocket module - Transport seam and the tokio-tungstenite implementation
pub mod factory;
pub mod transport;

pub use factory::{WebSocketConnector, WebSocketTransport};
pub use transport::{ConnectionState, Connector, EventSink, Transport, TransportEvent};
