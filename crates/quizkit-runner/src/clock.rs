//! Wall-clock ticker for a running session.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// A background task that emits one tick per period until stopped.
///
/// The task is aborted when the clock is stopped or dropped, so no tick can
/// outlive the session that owns the clock.
#[derive(Debug)]
pub struct SessionClock {
    ticks: mpsc::Receiver<()>,
    task: JoinHandle<()>,
}

impl SessionClock {
    /// Start ticking. The first tick arrives one `period` from now.
    pub fn start(period: Duration) -> Self {
        let (tx, ticks) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        Self { ticks, task }
    }

    /// Wait for the next tick. Pends forever once the clock is stopped.
    pub async fn tick(&mut self) {
        if self.ticks.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }

    pub fn stop(&mut self) {
        self.task.abort();
        self.ticks.close();
        while self.ticks.try_recv().is_ok() {}
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let start = time::Instant::now();
        let mut clock = SessionClock::start(Duration::from_secs(1));
        for _ in 0..3 {
            clock.tick().await;
        }
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_clock_never_ticks_again() {
        let mut clock = SessionClock::start(Duration::from_secs(1));
        clock.tick().await;
        clock.stop();

        let waited = time::timeout(Duration::from_secs(10), clock.tick()).await;
        assert!(waited.is_err());
    }
}
