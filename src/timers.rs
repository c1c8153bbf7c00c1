use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Wait before the first load, so the indicator isn't placed while the
/// rest of the bar is still starting up.
pub const STARTUP_DELAY: Duration = Duration::from_secs(5);
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Startup,
    Poll,
}

/// The one-shot start-up timer and the repeating poll timer.
///
/// At most one of each runs at a time. Both are cancelled by [`Timers::stop`]
/// or on drop.
pub struct Timers {
    startup_delay: Duration,
    poll_interval: Duration,
    delay: Option<JoinHandle<()>>,
    poll: Option<JoinHandle<()>>,
}

impl Default for Timers {
    fn default() -> Self {
        Self::with_periods(STARTUP_DELAY, POLL_INTERVAL)
    }
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_periods(startup_delay: Duration, poll_interval: Duration) -> Self {
        Self {
            startup_delay,
            poll_interval,
            delay: None,
            poll: None,
        }
    }

    pub fn start_delay(&mut self, tx: UnboundedSender<Tick>) {
        let delay = self.startup_delay;
        replace(
            &mut self.delay,
            tokio::spawn(async move {
                time::sleep(delay).await;
                let _ = tx.send(Tick::Startup);
            }),
        );
    }

    pub fn start_loop(&mut self, tx: UnboundedSender<Tick>) {
        let period = self.poll_interval;
        replace(
            &mut self.poll,
            tokio::spawn(async move {
                let mut interval = time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    interval.tick().await;
                    if tx.send(Tick::Poll).is_err() {
                        break;
                    }
                }
            }),
        );
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.delay.take() {
            handle.abort();
        }
        if let Some(handle) = self.poll.take() {
            handle.abort();
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.stop();
    }
}

fn replace(slot: &mut Option<JoinHandle<()>>, handle: JoinHandle<()>) {
    if let Some(old) = slot.replace(handle) {
        log::debug!("replacing a running timer");
        old.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn startup_fires_once_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new();
        timers.start_delay(tx);

        time::sleep(STARTUP_DELAY - Duration::from_millis(1)).await;
        assert!(rx.try_recv().is_err());

        assert_eq!(rx.recv().await, Some(Tick::Startup));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_repeats_every_interval() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new();
        timers.start_loop(tx);

        let started = Instant::now();
        for n in 1..=3u32 {
            assert_eq!(rx.recv().await, Some(Tick::Poll));
            assert!(Instant::now() - started >= POLL_INTERVAL * n);
        }
        timers.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_both_timers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new();
        timers.start_delay(tx.clone());
        timers.start_loop(tx);
        assert!(timers.is_polling());

        timers.stop();
        timers.stop();
        assert!(!timers.is_polling());

        // aborted tasks drop their senders
        assert_eq!(rx.recv().await, None);
    }
}
