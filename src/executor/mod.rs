//! Test run execution
//!
//! - `NetworkTestCase` tests one network
//! - `TestOrchestrator` runs the case over the whole inventory
//! - `RunLock` keeps runs from overlapping

pub mod case;

pub use case::NetworkTestCase;

use crate::error::Result;
use crate::inventory::InventoryLoader;
use crate::logging::DiagnosticLogger;
use crate::models::TestRunReport;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// What each network is measured against, and the pacing of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunPolicy {
    pub probe_target: String,
    pub probe_count: u32,
    pub loss_threshold_percent: f64,
    /// Wait after association before probing
    pub link_stabilize: Duration,
    /// Wait between two networks, not after the last
    pub between_networks: Duration,
}

impl Default for RunPolicy {
    fn default() -> Self {
        use crate::defaults::*;
        Self {
            probe_target: DEFAULT_PROBE_TARGET.to_string(),
            probe_count: DEFAULT_PROBE_COUNT,
            loss_threshold_percent: DEFAULT_LOSS_THRESHOLD_PERCENT,
            link_stabilize: LINK_STABILIZE,
            between_networks: BETWEEN_NETWORKS,
        }
    }
}

/// Process-wide guard that serialises test runs.
///
/// Clones share the same lock. Waiters are served in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RunLock {
    inner: Arc<Mutex<()>>,
}

/// Held for the duration of one run
#[derive(Debug)]
pub struct RunPermit {
    _guard: OwnedMutexGuard<()>,
}

impl RunLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other run holds the lock
    pub async fn acquire(&self) -> RunPermit {
        RunPermit {
            _guard: self.inner.clone().lock_owned().await,
        }
    }

    /// True while a run is in progress
    pub fn is_busy(&self) -> bool {
        self.inner.try_lock().is_err()
    }
}

/// Runs the test case over every saved network, in order
pub struct TestOrchestrator {
    loader: InventoryLoader,
    case: NetworkTestCase,
    lock: RunLock,
    logger: DiagnosticLogger,
}

impl TestOrchestrator {
    pub fn new(loader: InventoryLoader, case: NetworkTestCase, lock: RunLock, logger: DiagnosticLogger) -> Self {
        Self { loader, case, lock, logger }
    }

    pub fn run_lock(&self) -> &RunLock {
        &self.lock
    }

    /// Test the current inventory.
    ///
    /// Fails only when the inventory cannot be loaded. Waits for any run
    /// already in progress.
    pub async fn run(&self) -> Result<TestRunReport> {
        let _permit = self.lock.acquire().await;

        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();

        let inventory = match self.loader.load() {
            Ok(inventory) => inventory,
            Err(e) => {
                self.logger.log_error(&e, Some("Loading saved networks")).await;
                return Err(e);
            }
        };

        let total = inventory.len();
        self.logger.log_run_start(&run_id, total, &inventory.source.to_string()).await;

        let between = self.case.policy().between_networks;
        let mut results = Vec::with_capacity(total);
        for (index, network) in inventory.networks.iter().enumerate() {
            self.logger.log_network_start(&run_id, index + 1, total, &network.name).await;
            results.push(self.case.run(network).await);

            if index + 1 < total {
                tokio::time::sleep(between).await;
            }
        }

        let report = TestRunReport::new(run_id, results, started_at);
        self.logger.log_run_complete(&report).await;
        Ok(report)
    }
}
