//! Wall clock shown on the camera preview overlays

use super::scope::PageScope;
use crate::core::error::{DashboardError, Result};
use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

pub const TICK: Duration = Duration::from_secs(1);

/// Receives the current time once per tick while its scope is open
#[derive(Debug, Clone)]
pub struct PreviewClock {
    rx: watch::Receiver<DateTime<Local>>,
}

impl PreviewClock {
    pub fn start(scope: &mut PageScope) -> Result<Self> {
        Self::with_period(scope, TICK)
    }

    pub fn with_period(scope: &mut PageScope, period: Duration) -> Result<Self> {
        let (tx, rx) = watch::channel(Local::now());

        scope.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(Local::now()).is_err() {
                    break;
                }
            }
        })?;

        Ok(Self { rx })
    }

    pub fn now(&self) -> DateTime<Local> {
        *self.rx.borrow()
    }

    /// Overlay text, e.g. "14:05:09"
    pub fn label(&self) -> String {
        self.now().format("%H:%M:%S").to_string()
    }

    /// Wait for the next tick; fails once the owning scope is closed
    pub async fn changed(&mut self) -> Result<DateTime<Local>> {
        self.rx.changed().await.map_err(|_| DashboardError::Cancelled)?;
        Ok(*self.rx.borrow_and_update())
    }
}
