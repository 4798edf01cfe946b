//! Backend reachability: probe reports and the periodic health monitor.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::client::DirectorApi;

/// Reachability of the backend as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Checking,
    Online,
    Offline,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Checking => "확인 중",
            Self::Online => "온라인",
            Self::Offline => "오프라인",
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, Self::Offline)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one connection test.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub status: ConnectionStatus,
    pub message: String,
    pub url: String,
    pub status_code: Option<u16>,
    pub data: Option<serde_json::Value>,
    pub checked_at: DateTime<Utc>,
}

impl ProbeReport {
    /// Placeholder published before the first probe completes.
    pub fn pending() -> Self {
        Self {
            status: ConnectionStatus::Checking,
            message: String::new(),
            url: String::new(),
            status_code: None,
            data: None,
            checked_at: Utc::now(),
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == ConnectionStatus::Online
    }
}

/// Re-probes the backend on a fixed interval for as long as it is alive.
///
/// Dropping the monitor stops polling.
pub struct HealthMonitor {
    rx: watch::Receiver<ProbeReport>,
    handle: JoinHandle<()>,
}

impl HealthMonitor {
    /// Start polling: one probe immediately, then one per `interval`.
    pub fn spawn(api: Arc<dyn DirectorApi>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(ProbeReport::pending());

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut last = ConnectionStatus::Checking;

            loop {
                ticker.tick().await;
                let report = api.probe().await;

                if report.status != last {
                    info!(from = %last, to = %report.status, "Backend status changed");
                    last = report.status;
                } else {
                    debug!(status = %report.status, "Health probe");
                }

                if tx.send(report).is_err() {
                    break;
                }
            }
        });

        Self { rx, handle }
    }

    /// Most recent report.
    pub fn latest(&self) -> ProbeReport {
        self.rx.borrow().clone()
    }

    /// Wait for the next report. Returns `None` once polling has stopped.
    pub async fn changed(&mut self) -> Option<ProbeReport> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// A receiver for observers that outlive a borrow of the monitor.
    pub fn subscribe(&self) -> watch::Receiver<ProbeReport> {
        self.rx.clone()
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(ConnectionStatus::Online.label(), "온라인");
        assert_eq!(ConnectionStatus::Offline.to_string(), "오프라인");
        assert!(ConnectionStatus::Offline.is_offline());
        assert!(!ConnectionStatus::Checking.is_offline());
    }

    #[test]
    fn test_pending_report() {
        let report = ProbeReport::pending();
        assert_eq!(report.status, ConnectionStatus::Checking);
        assert!(!report.is_online());
    }
}
