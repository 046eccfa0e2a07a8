use crate::channel::driver::LoopEvent;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Timers a channel may have running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Heartbeat,
    Reconnect,
    ForceLogoutGrace,
}

/// Tracks timer tasks so every one of them can be cancelled on teardown.
///
/// At most one task per [`TimerKind`]. Each task is stamped with a token; a
/// fire event whose token is no longer current came from a cancelled or
/// replaced timer and must be ignored.
pub struct TimerSet {
    next_token: u64,
    handles: HashMap<TimerKind, (u64, JoinHandle<()>)>,
}

impl TimerSet {
    /// Create a new empty timer set
    pub fn new() -> Self {
        Self {
            next_token: 0,
            handles: HashMap::new(),
        }
    }

    /// Spawn a timer task and track it, replacing any timer of the same kind
    pub fn spawn<F, Fut>(&mut self, kind: TimerKind, make: F) -> u64
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel(kind);
        self.next_token += 1;
        let token = self.next_token;
        let handle = tokio::spawn(make(token));
        self.handles.insert(kind, (token, handle));
        token
    }

    /// Fire `LoopEvent::Timer` once after `delay`
    pub(crate) fn schedule(
        &mut self,
        kind: TimerKind,
        delay: Duration,
        tx: mpsc::UnboundedSender<LoopEvent>,
    ) -> u64 {
        self.spawn(kind, move |token| async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(LoopEvent::Timer { kind, token });
        })
    }

    /// Whether `token` still identifies the live timer of this kind
    pub fn is_current(&self, kind: TimerKind, token: u64) -> bool {
        matches!(self.handles.get(&kind), Some((current, _)) if *current == token)
    }

    /// Retire a one-shot timer that fired. Returns false for stale tokens.
    pub fn complete(&mut self, kind: TimerKind, token: u64) -> bool {
        if !self.is_current(kind, token) {
            return false;
        }
        self.handles.remove(&kind);
        true
    }

    /// Abort the timer of this kind, if any
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        match self.handles.remove(&kind) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Number of tracked timers that have not finished
    pub fn active(&self) -> usize {
        self.handles
            .values()
            .filter(|(_, handle)| !handle.is_finished())
            .count()
    }

    /// Abort all timers without waiting
    pub fn abort_all(&mut self) {
        for (_, (_, handle)) in self.handles.drain() {
            handle.abort();
        }
    }
}

impl Default for TimerSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.abort_all();
    }
}
