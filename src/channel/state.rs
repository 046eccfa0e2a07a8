/// Lifecycle of a notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Connected,
    /// Waiting for the next reconnect attempt
    Reconnecting,
}

impl ChannelState {
    /// Connecting or connected; a new `start()` is rejected in these states
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Connecting | Self::Connected)
    }
}

/// Progress of a forced logout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForceLogoutStage {
    #[default]
    Idle,
    /// Prompt shown, waiting for the user or the grace period
    Prompted,
    /// Cleanup and redirect done
    Completed,
}

/// Point-in-time view of a channel, for diagnostics and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSnapshot {
    pub state: ChannelState,
    pub reconnect_attempts: u32,
    pub active_timers: usize,
    pub has_transport: bool,
    pub transport_open: bool,
    pub force_logout: ForceLogoutStage,
}
