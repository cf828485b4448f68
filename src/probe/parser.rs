//! ping summary parser
//!
//! The probe only ever looks at two summary lines of iputils/busybox ping:
//!
//! ```text
//! 20 packets transmitted, 19 received, 5% packet loss, time 19029ms
//! rtt min/avg/max/mdev = 11.201/14.873/31.655/4.102 ms
//! ```
//!
//! Either line may be missing. A missing line yields zeros for its fields.

use super::ProbeError;
use crate::models::ProbeStatistics;
use regex::Regex;
use std::sync::OnceLock;

/// Bumped whenever the accepted output format changes
pub const PARSER_VERSION: u32 = 1;

fn summary_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+) packets transmitted, (\d+) (?:packets )?received, ([\d.]+)% packet loss")
            .expect("summary pattern is valid")
    })
}

fn rtt_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:rtt|round-trip) min/avg/max/(?:mdev|stddev) = ([\d.]+)/([\d.]+)/([\d.]+)/([\d.]+)")
            .expect("rtt pattern is valid")
    })
}

/// True when the output carries the packet summary line
pub fn has_summary(output: &str) -> bool {
    summary_pattern().is_match(output)
}

/// Extract probe statistics from ping output.
///
/// Pure: the same input always gives the same result. Never panics.
pub fn parse_probe_output(output: &str) -> Result<ProbeStatistics, ProbeError> {
    let mut stats = ProbeStatistics::default();

    if let Some(caps) = summary_pattern().captures(output) {
        stats.packets_sent = number(&caps[1])?;
        stats.packets_received = number(&caps[2])?;
        stats.packet_loss_percent = number(&caps[3])?;
    }

    if let Some(caps) = rtt_pattern().captures(output) {
        stats.rtt_min_ms = number(&caps[1])?;
        stats.rtt_avg_ms = number(&caps[2])?;
        stats.rtt_max_ms = number(&caps[3])?;
        stats.rtt_std_dev_ms = number(&caps[4])?;
    }

    Ok(stats)
}

fn number<T: std::str::FromStr>(text: &str) -> Result<T, ProbeError> {
    text.parse().map_err(|_| ProbeError::Unparsable(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HEALTHY: &str = "PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.
64 bytes from 8.8.8.8: icmp_seq=1 ttl=117 time=12.4 ms
64 bytes from 8.8.8.8: icmp_seq=2 ttl=117 time=11.9 ms

--- 8.8.8.8 ping statistics ---
20 packets transmitted, 19 received, 5% packet loss, time 19029ms
rtt min/avg/max/mdev = 11.201/14.873/31.655/4.102 ms
";

    const TOTAL_LOSS: &str = "PING 8.8.8.8 (8.8.8.8) 56(84) bytes of data.

--- 8.8.8.8 ping statistics ---
20 packets transmitted, 0 received, 100% packet loss, time 19456ms

";

    const BUSYBOX: &str = "PING 8.8.8.8 (8.8.8.8): 56 data bytes

--- 8.8.8.8 ping statistics ---
4 packets transmitted, 4 packets received, 0% packet loss
round-trip min/avg/max/stddev = 10.512/11.030/11.800/0.456 ms
";

    #[test]
    fn test_parse_healthy_output() {
        let stats = parse_probe_output(HEALTHY).unwrap();
        assert_eq!(stats.packets_sent, 20);
        assert_eq!(stats.packets_received, 19);
        assert_eq!(stats.packet_loss_percent, 5.0);
        assert_eq!(stats.rtt_min_ms, 11.201);
        assert_eq!(stats.rtt_avg_ms, 14.873);
        assert_eq!(stats.rtt_max_ms, 31.655);
        assert_eq!(stats.rtt_std_dev_ms, 4.102);
        assert!(stats.has_timing());
    }

    #[test]
    fn test_parse_total_loss_has_no_timing() {
        let stats = parse_probe_output(TOTAL_LOSS).unwrap();
        assert_eq!(stats.packets_sent, 20);
        assert_eq!(stats.packets_received, 0);
        assert_eq!(stats.packet_loss_percent, 100.0);
        assert!(!stats.has_timing());
        assert!(has_summary(TOTAL_LOSS));
    }

    #[test]
    fn test_parse_busybox_output() {
        let stats = parse_probe_output(BUSYBOX).unwrap();
        assert_eq!(stats.packets_received, 4);
        assert_eq!(stats.packet_loss_percent, 0.0);
        assert_eq!(stats.rtt_std_dev_ms, 0.456);
    }

    #[test]
    fn test_parse_rtt_prefix_with_stddev() {
        let output = "20 packets transmitted, 20 received, 0% packet loss\nrtt min/avg/max/stddev = 1.0/2.5/4.0/0.5";
        let stats = parse_probe_output(output).unwrap();
        assert_eq!(stats.packets_sent, 20);
        assert_eq!(stats.packets_received, 20);
        assert_eq!(stats.packet_loss_percent, 0.0);
        assert_eq!(stats.rtt_min_ms, 1.0);
        assert_eq!(stats.rtt_avg_ms, 2.5);
        assert_eq!(stats.rtt_max_ms, 4.0);
        assert_eq!(stats.rtt_std_dev_ms, 0.5);
        assert!(stats.within_loss_threshold(5.0));
    }

    #[test]
    fn test_parse_fractional_loss() {
        let stats = parse_probe_output("3 packets transmitted, 2 received, 33.3333% packet loss").unwrap();
        assert!((stats.packet_loss_percent - 33.3333).abs() < 1e-9);
    }

    #[test]
    fn test_parse_garbage_is_all_zero() {
        let stats = parse_probe_output("ping: unknown host nowhere.invalid").unwrap();
        assert_eq!(stats, ProbeStatistics::default());
        assert!(!has_summary("ping: unknown host nowhere.invalid"));
    }

    #[test]
    fn test_parse_malformed_number_is_unparsable() {
        let error = parse_probe_output("rtt min/avg/max/mdev = 1.2.3/4/5/6 ms").unwrap_err();
        assert_eq!(error, ProbeError::Unparsable("1.2.3".to_string()));
    }

    #[test]
    fn test_parser_version() {
        assert_eq!(PARSER_VERSION, 1);
    }

    proptest! {
        #[test]
        fn parse_never_panics_and_is_pure(input in ".*") {
            let first = parse_probe_output(&input);
            let second = parse_probe_output(&input);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn parse_reads_any_summary(sent in 0u32..10_000, received in 0u32..10_000, loss in 0u32..=100) {
            let line = format!("{} packets transmitted, {} received, {}% packet loss, time 1ms", sent, received, loss);
            let stats = parse_probe_output(&line).unwrap();
            prop_assert_eq!(stats.packets_sent, sent);
            prop_assert_eq!(stats.packets_received, received);
            prop_assert_eq!(stats.packet_loss_percent, loss as f64);
        }
    }
}
