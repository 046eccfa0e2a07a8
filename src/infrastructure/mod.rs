// Infrastructure module - Timers, heartbeat and the logout HTTP API
pub mod heartbeat;
pub mod http;
pub mod task_manager;
pub mod timer;

pub use heartbeat::HeartbeatManager;
pub use http::{LogoutClient, LogoutResponse, LogoutType, notification_endpoint};
pub use task_manager::{TimerKind, TimerSet};
pub use timer::ReconnectPolicy;
