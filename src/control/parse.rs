//! Parsers for adapter tool output
//!
//! Each function takes the raw text of one tool and returns a typed value.
//! Fixtures in the tests are literal outputs of the tools.

use super::ConfiguredProfile;
use crate::models::AdapterTelemetry;
use regex::Regex;
use std::sync::OnceLock;

fn signal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Signal level=(-?\d+) dBm").expect("signal pattern is valid"))
}

fn bit_rate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Bit Rate[=:]([\d.]+\s*\w+/s)").expect("bit rate pattern is valid"))
}

fn ipv4_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"inet (\d+\.\d+\.\d+\.\d+)").expect("inet pattern is valid"))
}

/// `iwgetid -r` prints the SSID alone; empty output means not associated
pub fn parse_current_association(output: &str) -> Option<String> {
    let ssid = output.trim();
    if ssid.is_empty() {
        None
    } else {
        Some(ssid.to_string())
    }
}

/// Parse `wpa_cli list_networks`.
///
/// Rows are tab separated: id, ssid, bssid, flags. The header and any line
/// whose first column is not a number are skipped.
pub fn parse_profile_list(output: &str) -> Vec<ConfiguredProfile> {
    output
        .lines()
        .filter_map(|line| {
            let mut columns = line.split('\t');
            let id = columns.next()?.trim().parse::<u32>().ok()?;
            let ssid = columns.next()?.to_string();
            Some(ConfiguredProfile { id, ssid })
        })
        .collect()
}

/// Find the profile for an SSID, exact match first, then substring match
pub fn resolve_profile<'a>(profiles: &'a [ConfiguredProfile], ssid: &str) -> Option<&'a ConfiguredProfile> {
    profiles
        .iter()
        .find(|p| p.ssid == ssid)
        .or_else(|| profiles.iter().find(|p| p.ssid.contains(ssid)))
}

/// Parse signal level and bit rate from `iwconfig <iface>`
pub fn parse_telemetry(output: &str) -> AdapterTelemetry {
    let signal_dbm = signal_pattern()
        .captures(output)
        .and_then(|c| c[1].parse::<i32>().ok());
    let bit_rate = bit_rate_pattern()
        .captures(output)
        .map(|c| c[1].to_string());

    AdapterTelemetry { signal_dbm, bit_rate }
}

/// First IPv4 address in `ip -4 addr show <iface>`
pub fn parse_ipv4_address(output: &str) -> Option<String> {
    ipv4_pattern().captures(output).map(|c| c[1].to_string())
}
