//! Task countdown.
//!
//! The countdown is cosmetic: reaching zero neither submits nor locks input.
//! `Countdown` is the value held in the task state; `CountdownTicker` is the
//! 1 Hz background task that decrements it and is aborted when the task ends.

use std::time::Duration;

use serde::{ser::SerializeStruct, Serialize, Serializer};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Time budget for one task, 25:00.
pub const TASK_TIME_BUDGET_SECS: u32 = 1500;

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining_secs: u32,
}

impl Countdown {
    pub fn new(budget_secs: u32) -> Self {
        Self {
            remaining_secs: budget_secs,
        }
    }

    /// Decrements by one second, floored at zero.
    pub fn tick(&mut self) {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// `MM:SS`
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_secs / 60,
            self.remaining_secs % 60
        )
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(TASK_TIME_BUDGET_SECS)
    }
}

impl Serialize for Countdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Countdown", 3)?;
        s.serialize_field("remaining_secs", &self.remaining_secs)?;
        s.serialize_field("display", &self.display())?;
        s.serialize_field("expired", &self.is_expired())?;
        s.end()
    }
}

/// Background ticker. Calls `on_tick` once per period until it returns
/// `false`, `stop` is called, or the ticker is dropped.
#[derive(Debug)]
pub struct CountdownTicker {
    handle: JoinHandle<()>,
}

impl CountdownTicker {
    /// Must be called from within a tokio runtime. The first tick fires one
    /// full period after start.
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn stop(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use super::*;

    #[test]
    fn test_full_budget_reaches_zero_and_stays() {
        let mut countdown = Countdown::default();
        assert_eq!(countdown.remaining_secs(), 1500);
        for _ in 0..1500 {
            countdown.tick();
        }
        assert_eq!(countdown.remaining_secs(), 0);
        assert!(countdown.is_expired());

        countdown.tick();
        countdown.tick();
        assert_eq!(countdown.remaining_secs(), 0);
    }

    #[test]
    fn test_display_format() {
        assert_eq!(Countdown::new(1500).display(), "25:00");
        assert_eq!(Countdown::new(61).display(), "01:01");
        assert_eq!(Countdown::new(0).display(), "00:00");
    }

    #[test]
    fn test_serializes_with_display() {
        let value = serde_json::to_value(Countdown::new(90)).unwrap();
        assert_eq!(value["remaining_secs"], 90);
        assert_eq!(value["display"], "01:30");
        assert_eq!(value["expired"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_fires_once_per_period() {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = ticks.clone();
        let ticker = CountdownTicker::start(TICK_PERIOD, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        ticker.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_ends_when_callback_declines() {
        let ticker = CountdownTicker::start(TICK_PERIOD, || false);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        tokio::task::yield_now().await;
        assert!(ticker.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_ticker() {
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = ticks.clone();
        let ticker = CountdownTicker::start(TICK_PERIOD, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            true
        });
        drop(ticker);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }
}
