pub mod constants;
pub mod error;
pub mod notification;

pub use constants::*;
pub use error::{NotificationError, Result};
pub use notification::Notification;
