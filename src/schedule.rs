//! Cooperative scheduling primitives
//!
//! Everything is spawned on the current `LocalSet`, so callers must be running
//! inside one. Nothing here preempts: cancellation is either an aborted timer
//! or a flag checked at the top of each tick.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Millisecond clock anchored at creation (pauses with tokio's test clock)
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a frame loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// A fixed-interval timer that fires `task` on every tick until cancelled.
///
/// Each firing is spawned as its own task, so a slow firing never delays the
/// timer; overlapping firings must guard themselves.
pub struct RepeatingTask {
    handle: JoinHandle<()>,
}

impl RepeatingTask {
    pub fn start<F, Fut>(period: Duration, mut task: F) -> Self
    where
        F: FnMut() -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let handle = tokio::task::spawn_local(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tokio::task::spawn_local(task());
            }
        });
        Self { handle }
    }

    /// Stop issuing firings; ones already spawned run to completion
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Run `frame` once per `period` until it returns [`Flow::Stop`].
///
/// The returned handle may be dropped; the loop ends on its own.
pub fn spawn_frame_loop<F>(period: Duration, mut frame: F) -> JoinHandle<()>
where
    F: FnMut() -> Flow + 'static,
{
    tokio::task::spawn_local(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if frame() == Flow::Stop {
                break;
            }
        }
    })
}
