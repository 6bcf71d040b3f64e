//! Per-driver work timers
//!
//! Each driver has at most one running timer. Starting a running timer or
//! stopping an idle one changes nothing; both operations report the state
//! they found so callers can tell.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{ElapsedSpan, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    Running { started_at: DateTime<Utc> },
}

impl TimerState {
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running { .. })
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        match self {
            TimerState::Running { started_at } => Some(*started_at),
            TimerState::Idle => None,
        }
    }
}

/// Outcome of stopping a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerStop {
    pub previous: TimerState,
    /// The measured span, when a timer was running
    pub span: Option<ElapsedSpan>,
}

/// Owns the running timers of every driver
#[derive(Debug, Default)]
pub struct TimerService {
    running: RwLock<HashMap<UserId, DateTime<Utc>>>,
}

impl TimerService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn status(&self, driver: UserId) -> TimerState {
        match self.running.read().await.get(&driver) {
            Some(started_at) => TimerState::Running {
                started_at: *started_at,
            },
            None => TimerState::Idle,
        }
    }

    /// Starts the driver's timer at `at` unless one is already running
    pub async fn start(&self, driver: UserId, at: DateTime<Utc>) -> TimerState {
        let mut running = self.running.write().await;
        if let Some(started_at) = running.get(&driver) {
            return TimerState::Running {
                started_at: *started_at,
            };
        }
        running.insert(driver, at);
        debug!(driver = %driver, started_at = %at, "Timer started");
        TimerState::Idle
    }

    /// Stops the driver's timer at `at`
    pub async fn stop(&self, driver: UserId, at: DateTime<Utc>) -> TimerStop {
        match self.running.write().await.remove(&driver) {
            Some(started_at) => {
                debug!(driver = %driver, started_at = %started_at, stopped_at = %at, "Timer stopped");
                TimerStop {
                    previous: TimerState::Running { started_at },
                    span: Some(ElapsedSpan::new(started_at, at)),
                }
            }
            None => TimerStop {
                previous: TimerState::Idle,
                span: None,
            },
        }
    }

    /// Stops the driver's timer only if it is still the one started at
    /// `started_at`; returns whether it was stopped
    pub async fn finish(&self, driver: UserId, started_at: DateTime<Utc>, at: DateTime<Utc>) -> bool {
        let mut running = self.running.write().await;
        if running.get(&driver) != Some(&started_at) {
            return false;
        }
        running.remove(&driver);
        debug!(driver = %driver, started_at = %started_at, stopped_at = %at, "Timer finished by log entry");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 6, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn test_start_then_stop() {
        let timers = TimerService::new();
        let driver = UserId::new();

        assert_eq!(timers.start(driver, t0()).await, TimerState::Idle);
        assert!(timers.status(driver).await.is_running());

        let stop = timers.stop(driver, t0() + Duration::minutes(45)).await;
        assert_eq!(stop.previous.started_at(), Some(t0()));
        assert_eq!(stop.span.unwrap().hours(), dec!(0.75));
        assert_eq!(timers.status(driver).await, TimerState::Idle);
    }

    #[tokio::test]
    async fn test_second_start_keeps_original_time() {
        let timers = TimerService::new();
        let driver = UserId::new();
        timers.start(driver, t0()).await;

        let previous = timers.start(driver, t0() + Duration::hours(1)).await;
        assert_eq!(previous, TimerState::Running { started_at: t0() });
        assert_eq!(timers.status(driver).await.started_at(), Some(t0()));
    }

    #[tokio::test]
    async fn test_stop_when_idle() {
        let timers = TimerService::new();
        let stop = timers.stop(UserId::new(), t0()).await;
        assert_eq!(stop.previous, TimerState::Idle);
        assert!(stop.span.is_none());
    }

    #[tokio::test]
    async fn test_timers_are_per_driver() {
        let timers = TimerService::new();
        let (a, b) = (UserId::new(), UserId::new());
        timers.start(a, t0()).await;
        assert!(!timers.status(b).await.is_running());
    }

    #[tokio::test]
    async fn test_finish_ignores_a_restarted_timer() {
        let timers = TimerService::new();
        let driver = UserId::new();
        timers.start(driver, t0()).await;
        timers.stop(driver, t0() + Duration::minutes(5)).await;
        timers.start(driver, t0() + Duration::minutes(10)).await;

        assert!(!timers.finish(driver, t0(), t0() + Duration::minutes(20)).await);
        assert!(timers.status(driver).await.is_running());
        assert!(timers.finish(driver, t0() + Duration::minutes(10), t0() + Duration::minutes(20)).await);
        assert_eq!(timers.status(driver).await, TimerState::Idle);
    }
}
