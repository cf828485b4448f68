//! Configuration data model and validation

use crate::association::AssociationTimings;
use crate::executor::RunPolicy;
use crate::inventory::InventorySources;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Wireless interface driven by wpa_cli, dhclient, iwconfig and ip
    #[serde(default = "default_interface")]
    pub interface: String,

    /// Address the reachability probe is sent to
    #[serde(default = "default_probe_target")]
    pub probe_target: String,

    /// Number of probe packets per network
    #[serde(default = "default_probe_count")]
    pub probe_count: u32,

    /// Per-reply wait passed to ping, in seconds
    #[serde(default = "default_probe_wait_secs")]
    pub probe_wait_seconds: u64,

    /// Packet loss above this percentage marks a network degraded
    #[serde(default = "default_loss_threshold")]
    pub loss_threshold_percent: f64,

    /// Period of the background sweep, in minutes
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,

    /// Pipe-delimited network databases, tried in order
    #[serde(default = "default_network_db_paths")]
    pub network_db_paths: Vec<PathBuf>,

    /// wpa_supplicant configuration used when no database yields networks
    #[serde(default = "default_supplicant_path")]
    pub supplicant_path: PathBuf,

    /// JSON file holding the alert destination and subscriber
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,

    /// Fixed waits of a run, in milliseconds
    #[serde(default)]
    pub delays: DelayConfig,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Emit reports as JSON
    #[serde(default)]
    pub json_output: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

/// Bounded sleeps between the steps of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayConfig {
    pub disconnect_settle_ms: u64,
    pub link_wait_ms: u64,
    pub lease_wait_ms: u64,
    pub link_stabilize_ms: u64,
    pub between_networks_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        use crate::defaults::*;
        Self {
            disconnect_settle_ms: DISCONNECT_SETTLE.as_millis() as u64,
            link_wait_ms: LINK_WAIT.as_millis() as u64,
            lease_wait_ms: LEASE_WAIT.as_millis() as u64,
            link_stabilize_ms: LINK_STABILIZE.as_millis() as u64,
            between_networks_ms: BETWEEN_NETWORKS.as_millis() as u64,
        }
    }
}

impl DelayConfig {
    /// All waits disabled
    pub fn none() -> Self {
        Self {
            disconnect_settle_ms: 0,
            link_wait_ms: 0,
            lease_wait_ms: 0,
            link_stabilize_ms: 0,
            between_networks_ms: 0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            probe_target: default_probe_target(),
            probe_count: default_probe_count(),
            probe_wait_seconds: default_probe_wait_secs(),
            loss_threshold_percent: default_loss_threshold(),
            interval_minutes: default_interval_minutes(),
            network_db_paths: default_network_db_paths(),
            supplicant_path: default_supplicant_path(),
            settings_path: default_settings_path(),
            delays: DelayConfig::default(),
            enable_color: default_enable_color(),
            json_output: false,
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sweep period as Duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    pub fn probe_wait(&self) -> Duration {
        Duration::from_secs(self.probe_wait_seconds)
    }

    pub fn inventory_sources(&self) -> InventorySources {
        InventorySources {
            database_paths: self.network_db_paths.clone(),
            supplicant_path: self.supplicant_path.clone(),
        }
    }

    pub fn association_timings(&self) -> AssociationTimings {
        AssociationTimings {
            disconnect_settle: Duration::from_millis(self.delays.disconnect_settle_ms),
            link_wait: Duration::from_millis(self.delays.link_wait_ms),
            lease_wait: Duration::from_millis(self.delays.lease_wait_ms),
        }
    }

    pub fn run_policy(&self) -> RunPolicy {
        RunPolicy {
            probe_target: self.probe_target.clone(),
            probe_count: self.probe_count,
            loss_threshold_percent: self.loss_threshold_percent,
            link_stabilize: Duration::from_millis(self.delays.link_stabilize_ms),
            between_networks: Duration::from_millis(self.delays.between_networks_ms),
        }
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.interface.trim().is_empty() {
            return Err(AppError::config("Interface name cannot be empty"));
        }

        if self.interface.chars().any(char::is_whitespace) {
            return Err(AppError::config(format!("Invalid interface name: '{}'", self.interface)));
        }

        if self.probe_target.trim().is_empty() {
            return Err(AppError::config("Probe target cannot be empty"));
        }

        if self.probe_count == 0 {
            return Err(AppError::config("Probe count must be greater than 0"));
        }

        if self.probe_count > 100 {
            return Err(AppError::config("Probe count cannot exceed 100"));
        }

        if self.probe_wait_seconds == 0 {
            return Err(AppError::config("Probe wait must be greater than 0"));
        }

        if !(0.0..=100.0).contains(&self.loss_threshold_percent) {
            return Err(AppError::config(format!(
                "Loss threshold must be between 0 and 100, got: {}",
                self.loss_threshold_percent
            )));
        }

        if self.interval_minutes == 0 {
            return Err(AppError::config("Sweep interval must be greater than 0"));
        }

        if self.interval_minutes > crate::defaults::MAX_SWEEP_INTERVAL_MINUTES {
            return Err(AppError::config(format!(
                "Sweep interval cannot exceed {} minutes, got: {}",
                crate::defaults::MAX_SWEEP_INTERVAL_MINUTES,
                self.interval_minutes
            )));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(interface) = std::env::var("WIFI_INTERFACE") {
            self.interface = interface.trim().to_string();
        }

        if let Ok(target) = std::env::var("WIFI_PROBE_TARGET") {
            self.probe_target = target.trim().to_string();
        }

        if let Ok(count) = std::env::var("WIFI_PROBE_COUNT") {
            self.probe_count = count.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid WIFI_PROBE_COUNT value '{}': {}", count, e)))?;
        }

        if let Ok(threshold) = std::env::var("WIFI_LOSS_THRESHOLD") {
            self.loss_threshold_percent = threshold.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid WIFI_LOSS_THRESHOLD value '{}': {}", threshold, e)))?;
        }

        if let Ok(interval) = std::env::var("WIFI_INTERVAL_MINUTES") {
            self.interval_minutes = interval.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid WIFI_INTERVAL_MINUTES value '{}': {}", interval, e)))?;
        }

        if let Ok(paths) = std::env::var("WIFI_NETWORK_DB") {
            self.network_db_paths = paths
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect();
        }

        if let Ok(path) = std::env::var("WIFI_SUPPLICANT_CONF") {
            self.supplicant_path = PathBuf::from(path.trim());
        }

        if let Ok(path) = std::env::var("WIFI_SETTINGS_PATH") {
            self.settings_path = PathBuf::from(path.trim());
        }

        if let Ok(enable_color) = std::env::var("WIFI_ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid WIFI_ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_interface() -> String {
    crate::defaults::DEFAULT_INTERFACE.to_string()
}

fn default_probe_target() -> String {
    crate::defaults::DEFAULT_PROBE_TARGET.to_string()
}

fn default_probe_count() -> u32 {
    crate::defaults::DEFAULT_PROBE_COUNT
}

fn default_probe_wait_secs() -> u64 {
    crate::defaults::DEFAULT_PROBE_WAIT.as_secs()
}

fn default_loss_threshold() -> f64 {
    crate::defaults::DEFAULT_LOSS_THRESHOLD_PERCENT
}

fn default_interval_minutes() -> u64 {
    crate::defaults::DEFAULT_SWEEP_INTERVAL.as_secs() / 60
}

fn default_network_db_paths() -> Vec<PathBuf> {
    crate::defaults::DEFAULT_NETWORK_DB_PATHS
        .iter()
        .map(PathBuf::from)
        .collect()
}

fn default_supplicant_path() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_SUPPLICANT_PATH)
}

fn default_settings_path() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_SETTINGS_PATH)
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
