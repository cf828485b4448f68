//! Probe statistics and per-network test result data models

use crate::models::network::AdapterTelemetry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics parsed from a single reachability probe
///
/// All RTT values are in milliseconds. An all-zero RTT block means the probe
/// produced no timing data (e.g. 100% loss), not zero latency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbeStatistics {
    pub packets_sent: u32,
    pub packets_received: u32,
    pub packet_loss_percent: f64,
    pub rtt_min_ms: f64,
    pub rtt_avg_ms: f64,
    pub rtt_max_ms: f64,
    pub rtt_std_dev_ms: f64,
}

impl ProbeStatistics {
    /// Whether the probe reported any round-trip timing
    pub fn has_timing(&self) -> bool {
        self.rtt_min_ms != 0.0
            || self.rtt_avg_ms != 0.0
            || self.rtt_max_ms != 0.0
            || self.rtt_std_dev_ms != 0.0
    }

    /// Whether loss is within the given threshold (inclusive)
    pub fn within_loss_threshold(&self, threshold_percent: f64) -> bool {
        self.packet_loss_percent <= threshold_percent
    }
}

/// Outcome of testing one inventory entry during one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkTestResult {
    /// SSID of the tested network
    pub network_name: String,

    /// Associated, probed and within the loss threshold
    pub succeeded: bool,

    /// IPv4 address on the adapter after the test; empty when none
    pub local_address: String,

    /// Probe statistics, absent when the probe never ran or failed to run
    pub stats: Option<ProbeStatistics>,

    /// Association or probe failure detail
    pub error_detail: Option<String>,

    /// Address the probe was sent to
    pub probe_target: String,

    /// Number of probe packets requested
    pub probe_count: u32,

    /// Signal level and bit rate read after association
    pub telemetry: Option<AdapterTelemetry>,

    /// When the result was produced
    pub tested_at: DateTime<Utc>,
}

impl NetworkTestResult {
    /// Result for a network whose association or probe never completed
    pub fn failed<S: Into<String>>(
        network_name: &str,
        probe_target: &str,
        probe_count: u32,
        error_detail: S,
        local_address: String,
        telemetry: Option<AdapterTelemetry>,
    ) -> Self {
        Self {
            network_name: network_name.to_string(),
            succeeded: false,
            local_address,
            stats: None,
            error_detail: Some(error_detail.into()),
            probe_target: probe_target.to_string(),
            probe_count,
            telemetry,
            tested_at: Utc::now(),
        }
    }

    /// Result for a network whose probe completed; the verdict follows the loss threshold
    pub fn measured(
        network_name: &str,
        probe_target: &str,
        probe_count: u32,
        stats: ProbeStatistics,
        loss_threshold_percent: f64,
        local_address: String,
        telemetry: Option<AdapterTelemetry>,
    ) -> Self {
        Self {
            network_name: network_name.to_string(),
            succeeded: stats.within_loss_threshold(loss_threshold_percent),
            local_address,
            stats: Some(stats),
            error_detail: None,
            probe_target: probe_target.to_string(),
            probe_count,
            telemetry,
            tested_at: Utc::now(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.succeeded
    }

    /// Local address for display, "no IP" when empty
    pub fn display_address(&self) -> &str {
        if self.local_address.is_empty() {
            "no IP"
        } else {
            &self.local_address
        }
    }

    /// Loss percentage, zero when there are no statistics
    pub fn loss_percent(&self) -> f64 {
        self.stats.map(|s| s.packet_loss_percent).unwrap_or(0.0)
    }

    /// Statistics or an all-zero block when the probe never ran
    pub fn stats_or_default(&self) -> ProbeStatistics {
        self.stats.unwrap_or_default()
    }
}

/// Ordered results of one orchestrator run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRunReport {
    /// Correlation id of the run
    pub run_id: String,
    /// One result per inventory entry, in inventory order
    pub results: Vec<NetworkTestResult>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl TestRunReport {
    pub fn new(run_id: String, results: Vec<NetworkTestResult>, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id,
            results,
            started_at,
            completed_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn healthy(&self) -> Vec<&NetworkTestResult> {
        self.results.iter().filter(|r| r.succeeded).collect()
    }

    pub fn degraded(&self) -> Vec<&NetworkTestResult> {
        self.results.iter().filter(|r| r.is_degraded()).collect()
    }

    pub fn has_degraded(&self) -> bool {
        self.results.iter().any(NetworkTestResult::is_degraded)
    }

    pub fn duration(&self) -> chrono::Duration {
        self.completed_at - self.started_at
    }
}
