/// Notification `type` strings sent by the server (magic strings layer)
pub mod notification_types {
    pub const CONNECTION_ESTABLISHED: &str = "CONNECTION_ESTABLISHED";
    pub const FORCE_LOGOUT: &str = "FORCE_LOGOUT";
    pub const BROADCAST_LOGOUT: &str = "BROADCAST_LOGOUT";
    pub const HEARTBEAT: &str = "HEARTBEAT";
}

/// Server paths
pub mod paths {
    pub const LOGOUT_SOCKET: &str = "/ws/logout";
    pub const LOGOUT_API: &str = "/sso/api/logout";
    pub const LOGIN_FORCED: &str = "/login?logout=forced";
    pub const LOGIN_SUCCESS: &str = "/login?logout=success";
}

/// Outbound heartbeat payload (plain text, no envelope)
pub const PING_PAYLOAD: &str = "ping";

/// Default heartbeat interval (milliseconds)
pub const HEARTBEAT_INTERVAL: u64 = 30_000;

/// Reconnect attempts before giving up
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Linear backoff step (milliseconds): attempt `n` waits `n * step`
pub const RECONNECT_STEP: u64 = 5_000;

/// Grace period before a forced logout confirms itself (milliseconds)
pub const FORCE_LOGOUT_GRACE: u64 = 3_000;

/// WebSocket close codes
pub const WS_CLOSE_NORMAL: u16 = 1000;
pub const WS_CLOSE_ABNORMAL: u16 = 1006;
