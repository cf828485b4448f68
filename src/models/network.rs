//! Network inventory entries and adapter telemetry

use crate::types::SignalQuality;
use serde::{Deserialize, Serialize};

/// A saved WiFi network as discovered by the inventory loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WiFiNetworkEntry {
    /// Network identifier (SSID)
    pub name: String,
    /// Position in the source the inventory was loaded from
    pub ordinal: usize,
}

impl WiFiNetworkEntry {
    pub fn new<S: Into<String>>(name: S, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            ordinal,
        }
    }
}

/// Link telemetry read from the adapter after association
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdapterTelemetry {
    /// Signal level in dBm
    pub signal_dbm: Option<i32>,
    /// Bit rate as reported by the driver, e.g. "72.2 Mb/s"
    pub bit_rate: Option<String>,
}

impl AdapterTelemetry {
    pub fn signal_quality(&self) -> Option<SignalQuality> {
        self.signal_dbm.map(SignalQuality::from_dbm)
    }

    /// True when the adapter reported nothing we could parse
    pub fn is_empty(&self) -> bool {
        self.signal_dbm.is_none() && self.bit_rate.is_none()
    }
}
