use super::task_manager::{TimerKind, TimerSet};
use crate::channel::driver::LoopEvent;
use crate::types::HEARTBEAT_INTERVAL;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(HEARTBEAT_INTERVAL);

/// Periodic liveness ticks for an open channel.
///
/// The task only emits ticks; the channel decides on each tick whether the
/// transport is open and a ping should go out. No reply is awaited.
pub struct HeartbeatManager {
    interval: Duration,
    events: mpsc::UnboundedSender<LoopEvent>,
}

impl HeartbeatManager {
    pub(crate) fn new(events: mpsc::UnboundedSender<LoopEvent>) -> Self {
        Self {
            interval: DEFAULT_HEARTBEAT_INTERVAL,
            events,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawns the heartbeat task on `timers`, replacing any previous one
    pub fn spawn_on(self, timers: &mut TimerSet) -> u64 {
        timers.spawn(TimerKind::Heartbeat, move |token| self.run(token))
    }

    async fn run(self, token: u64) {
        // first tick one full interval after connect
        let start = time::Instant::now() + self.interval;
        let mut interval_timer = time::interval_at(start, self.interval);
        interval_timer.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            interval_timer.tick().await;

            let tick = LoopEvent::Timer {
                kind: TimerKind::Heartbeat,
                token,
            };
            if self.events.send(tick).is_err() {
                // Channel dropped, exit heartbeat task
                break;
            }
        }
    }
}
