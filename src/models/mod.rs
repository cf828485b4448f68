//! Data models and structures for the WiFi network tester

pub mod config;
pub mod metrics;
pub mod network;

// Re-export main model types
pub use config::{Config, DelayConfig};
pub use metrics::{NetworkTestResult, ProbeStatistics, TestRunReport};
pub use network::{AdapterTelemetry, WiFiNetworkEntry};
