//! Wireless adapter control
//!
//! `NetworkControl` is the narrow capability the association state machine
//! and the per-network test case drive. One method per operation, each
//! returning an already-parsed value. `SystemNetworkControl` implements it
//! on top of the usual Linux tools.

pub mod parse;
pub mod system;

pub use system::SystemNetworkControl;

use crate::models::AdapterTelemetry;
use async_trait::async_trait;
use thiserror::Error;

/// A network profile known to the supplicant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredProfile {
    pub id: u32,
    pub ssid: String,
}

/// Failure of a single adapter control step
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// The tool could not be started at all
    #[error("failed to run {tool}: {reason}")]
    Spawn { tool: String, reason: String },

    /// The tool ran and reported failure
    #[error("{tool} failed: {output}")]
    Failed { tool: String, output: String },
}

/// Operations on the single wireless adapter under test
#[async_trait]
pub trait NetworkControl: Send + Sync {
    /// SSID the adapter is associated with, `None` when not associated
    async fn current_association(&self) -> Result<Option<String>, ControlError>;

    /// Profiles the supplicant knows about
    async fn list_profiles(&self) -> Result<Vec<ConfiguredProfile>, ControlError>;

    /// Drop the current association
    async fn disconnect(&self) -> Result<(), ControlError>;

    /// Ask the supplicant to switch to a profile
    async fn activate_profile(&self, id: u32) -> Result<(), ControlError>;

    /// Request a DHCP lease on the interface
    async fn acquire_lease(&self) -> Result<(), ControlError>;

    /// Signal level and bit rate of the current link
    async fn telemetry(&self) -> Result<AdapterTelemetry, ControlError>;

    /// IPv4 address on the interface, `None` when unassigned
    async fn local_address(&self) -> Result<Option<String>, ControlError>;
}
