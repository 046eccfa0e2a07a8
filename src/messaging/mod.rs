// Messaging module - Notification kinds and host callbacks
pub mod handler;
pub mod kind;

pub use handler::{NotificationHandler, Redirect, TracingHandler};
pub use kind::NotificationKind;
