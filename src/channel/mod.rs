// Module declarations
mod config;
pub(crate) mod driver;
mod handle;
mod state;

// Public API exports
pub use config::ChannelOptions;
pub use handle::{NotificationChannel, NotificationChannelBuilder};
pub use state::{ChannelSnapshot, ChannelState, ForceLogoutStage};
