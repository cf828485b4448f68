//! Type definitions and classification helpers

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Signal strength classification for the associated adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalQuality {
    /// Above -50 dBm
    Excellent,
    /// Above -60 dBm
    VeryGood,
    /// Above -70 dBm
    Good,
    /// -70 dBm or lower
    Weak,
}

impl SignalQuality {
    /// Classify a signal level reported in dBm
    pub fn from_dbm(dbm: i32) -> Self {
        if dbm > -50 {
            Self::Excellent
        } else if dbm > -60 {
            Self::VeryGood
        } else if dbm > -70 {
            Self::Good
        } else {
            Self::Weak
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very good",
            Self::Good => "Good",
            Self::Weak => "Weak",
        }
    }
}

/// Packet loss classification used for console indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossLevel {
    /// No packets lost
    None,
    /// Some loss, below 5%
    Minor,
    /// 5% or more
    Severe,
}

impl LossLevel {
    pub fn from_percent(loss: f64) -> Self {
        if loss == 0.0 {
            Self::None
        } else if loss < 5.0 {
            Self::Minor
        } else {
            Self::Severe
        }
    }
}

/// Latency jitter classification based on RTT standard deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JitterLevel {
    /// Below 10 ms
    Stable,
    /// Below 30 ms
    Variable,
    /// 30 ms or more
    Unstable,
}

impl JitterLevel {
    pub fn from_std_dev_ms(std_dev: f64) -> Self {
        if std_dev < 10.0 {
            Self::Stable
        } else if std_dev < 30.0 {
            Self::Variable
        } else {
            Self::Unstable
        }
    }
}
