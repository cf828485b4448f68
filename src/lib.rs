//! WiFi Network Tester
//!
//! Walks every WiFi network saved on the host, associates the wireless
//! adapter with each one in turn, runs a fixed-count ping against a known
//! endpoint and reports which networks are healthy and which are degraded.
//! Runs are serialized by a process-wide run-lock so an on-demand request and
//! the periodic background sweep never fight over the adapter.

pub mod app;
pub mod association;
pub mod cli;
pub mod config;
pub mod control;
pub mod error;
pub mod executor;
pub mod inventory;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod scheduler;
pub mod signals;
pub mod sink;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, NetworkTestResult, ProbeStatistics, TestRunReport, WiFiNetworkEntry};
pub use executor::{RunLock, TestOrchestrator};
pub use output::{ColoredFormatter, JsonFormatter, OutputFormatterFactory, PlainFormatter, ReportFormatter};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_INTERFACE: &str = "wlan0";
    pub const DEFAULT_PROBE_TARGET: &str = "8.8.8.8";
    pub const DEFAULT_PROBE_COUNT: u32 = 20;
    /// Per-reply wait passed to `ping -W`
    pub const DEFAULT_PROBE_WAIT: Duration = Duration::from_secs(2);
    /// Loss above this is degraded; exactly at it is still healthy
    pub const DEFAULT_LOSS_THRESHOLD_PERCENT: f64 = 5.0;
    pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);
    /// One sweep a day at most
    pub const MAX_SWEEP_INTERVAL_MINUTES: u64 = 24 * 60;

    pub const DEFAULT_NETWORK_DB_PATHS: &[&str] = &[
        "/var/lib/dietpi/dietpi-config/.wifi_network_db",
        "/boot/dietpi/.network",
    ];
    pub const DEFAULT_SUPPLICANT_PATH: &str = "/etc/wpa_supplicant/wpa_supplicant.conf";
    pub const DEFAULT_SETTINGS_PATH: &str = "wifi-tester.json";

    pub const DISCONNECT_SETTLE: Duration = Duration::from_secs(2);
    pub const LINK_WAIT: Duration = Duration::from_secs(8);
    pub const LEASE_WAIT: Duration = Duration::from_secs(2);
    pub const LINK_STABILIZE: Duration = Duration::from_secs(3);
    pub const BETWEEN_NETWORKS: Duration = Duration::from_secs(5);

    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
