// =============================================================================
// Shared Application State
// =============================================================================
//
// Held as `Arc<AppState>` by the scheduler loop and the status API.
//
// Thread safety:
//   - One parking_lot::RwLock over the latest cycle (reports, completion
//     time and run count change together).
//   - mpsc sender to ask the scheduler for an out-of-band cycle.
// =============================================================================

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::runner::GroupReport;
use crate::runtime_config::RuntimeConfig;

/// Why a manual run request was not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerError {
    /// A request is already waiting for the scheduler.
    AlreadyQueued,
    /// The scheduler loop has exited.
    SchedulerStopped,
}

#[derive(Debug, Clone, Serialize)]
pub struct LatestReports {
    pub completed_at: Option<DateTime<Utc>>,
    pub runs_completed: u64,
    pub groups: Vec<GroupReport>,
}

pub struct AppState {
    pub runtime_config: RuntimeConfig,

    latest: RwLock<LatestReports>,
    run_trigger: mpsc::Sender<Uuid>,

    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig, run_trigger: mpsc::Sender<Uuid>) -> Self {
        Self {
            runtime_config: config,
            latest: RwLock::new(LatestReports {
                completed_at: None,
                runs_completed: 0,
                groups: Vec::new(),
            }),
            run_trigger,
            start_time: std::time::Instant::now(),
        }
    }

    /// Replace the latest reports after a finished cycle.
    pub fn record_cycle(&self, reports: Vec<GroupReport>) -> u64 {
        let mut latest = self.latest.write();
        latest.groups = reports;
        latest.completed_at = Some(Utc::now());
        latest.runs_completed += 1;
        latest.runs_completed
    }

    pub fn runs_completed(&self) -> u64 {
        self.latest.read().runs_completed
    }

    /// Consistent copy of the last finished cycle.
    pub fn latest_reports(&self) -> LatestReports {
        self.latest.read().clone()
    }

    /// Queue a manual report cycle and return its run id.
    pub fn request_run(&self) -> Result<Uuid, TriggerError> {
        let id = Uuid::new_v4();
        match self.run_trigger.try_send(id) {
            Ok(()) => Ok(id),
            Err(mpsc::error::TrySendError::Full(_)) => Err(TriggerError::AlreadyQueued),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(TriggerError::SchedulerStopped),
        }
    }

    pub fn admin_token(&self) -> &str {
        &self.runtime_config.admin_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_cycle_counts_and_replaces() {
        let (tx, _rx) = mpsc::channel(1);
        let state = AppState::new(RuntimeConfig::default(), tx);
        assert_eq!(state.runs_completed(), 0);
        assert!(state.latest_reports().completed_at.is_none());

        assert_eq!(state.record_cycle(Vec::new()), 1);
        assert_eq!(state.record_cycle(Vec::new()), 2);
        let latest = state.latest_reports();
        assert_eq!(latest.runs_completed, 2);
        assert!(latest.completed_at.is_some());
    }

    fn group(title: &str) -> GroupReport {
        GroupReport {
            title: title.to_string(),
            risk_managed: false,
            generated_at: Utc::now(),
            instruments: Vec::new(),
            text: String::new(),
        }
    }

    #[test]
    fn snapshot_moves_as_one() {
        let (tx, _rx) = mpsc::channel(1);
        let state = AppState::new(RuntimeConfig::default(), tx);

        state.record_cycle(vec![group("Crypto")]);
        let first = state.latest_reports();

        state.record_cycle(vec![group("Stocks"), group("Crypto")]);
        let second = state.latest_reports();

        assert_eq!(first.runs_completed, 1);
        assert_eq!(first.groups.len(), 1);
        assert_eq!(second.runs_completed, 2);
        assert_eq!(second.groups[0].title, "Stocks");
        assert!(second.completed_at.unwrap() >= first.completed_at.unwrap());
    }

    #[test]
    fn only_one_manual_run_is_queued() {
        let (tx, mut rx) = mpsc::channel(1);
        let state = AppState::new(RuntimeConfig::default(), tx);

        let id = state.request_run().unwrap();
        assert_eq!(state.request_run(), Err(TriggerError::AlreadyQueued));
        assert_eq!(rx.try_recv().unwrap(), id);

        drop(rx);
        assert_eq!(state.request_run(), Err(TriggerError::SchedulerStopped));
    }
}
