//! Report formatting trait and the plain text implementation

use crate::error::{AppError, Result};
use crate::models::{NetworkTestResult, TestRunReport};
use std::fmt::Write as _;

/// Turns a finished run into messages
pub trait ReportFormatter: Send + Sync {
    /// Title block
    fn format_header(&self, title: &str) -> Result<String>;

    /// Every network, split into healthy and degraded
    fn format_summary(&self, report: &TestRunReport) -> Result<String>;

    /// Degraded networks only, or `None` when every network is healthy
    fn format_failure_alert(&self, report: &TestRunReport, subscriber: Option<&str>) -> Result<Option<String>>;

    /// A run that could not start
    fn format_run_error(&self, reason: &str) -> Result<String>;
}

/// Shared formatting options
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    pub enable_color: bool,
    /// Add signal level and bit rate to each line
    pub show_telemetry: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: false,
            show_telemetry: false,
        }
    }
}

pub const SUMMARY_TITLE: &str = "WiFi Test Summary";
pub const NO_NETWORKS: &str = "No networks to test";

fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format report: {}", e))
}

/// `x.xms`, or `n/a` when the probe produced no timing data
fn rtt(value: f64, has_timing: bool) -> String {
    if has_timing {
        format!("{:.1}ms", value)
    } else {
        "n/a".to_string()
    }
}

/// `name (IP: addr) loss=x.x% avg=x.xms`
pub(crate) fn healthy_line(result: &NetworkTestResult) -> String {
    let stats = result.stats_or_default();
    format!(
        "{} (IP: {}) loss={:.1}% avg={}",
        result.network_name,
        result.display_address(),
        stats.packet_loss_percent,
        rtt(stats.rtt_avg_ms, stats.has_timing())
    )
}

/// Healthy line plus min and max
pub(crate) fn degraded_line(result: &NetworkTestResult) -> String {
    let stats = result.stats_or_default();
    let timed = stats.has_timing();
    format!(
        "{} min={} max={}",
        healthy_line(result),
        rtt(stats.rtt_min_ms, timed),
        rtt(stats.rtt_max_ms, timed)
    )
}

/// Full probe detail for the alert
pub(crate) fn alert_line(result: &NetworkTestResult) -> String {
    let stats = result.stats_or_default();
    let timed = stats.has_timing();
    format!(
        "{} (IP: {}) target={} count={} loss={:.1}% rtt avg={} min={} max={} stddev={}",
        result.network_name,
        result.display_address(),
        result.probe_target,
        result.probe_count,
        stats.packet_loss_percent,
        rtt(stats.rtt_avg_ms, timed),
        rtt(stats.rtt_min_ms, timed),
        rtt(stats.rtt_max_ms, timed),
        rtt(stats.rtt_std_dev_ms, timed)
    )
}

pub(crate) fn telemetry_suffix(result: &NetworkTestResult) -> Option<String> {
    let telemetry = result.telemetry.as_ref().filter(|t| !t.is_empty())?;
    let signal = telemetry.signal_dbm.map_or("n/a".to_string(), |s| format!("{} dBm", s));
    let rate = telemetry.bit_rate.as_deref().unwrap_or("n/a");
    Some(format!("signal={} rate={}", signal, rate))
}

pub(crate) fn mention(subscriber: Option<&str>) -> String {
    match subscriber.map(str::trim).filter(|s| !s.is_empty()) {
        Some(id) => format!("<@{}> ", id),
        None => String::new(),
    }
}

/// Plain text, safe for any sink
#[derive(Debug, Clone, Default)]
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    fn push_result(&self, output: &mut String, line: String, result: &NetworkTestResult) -> Result<()> {
        writeln!(output, "  - {}", line).map_err(fmt_err)?;
        if self.options.show_telemetry {
            if let Some(telemetry) = telemetry_suffix(result) {
                writeln!(output, "      {}", telemetry).map_err(fmt_err)?;
            }
        }
        if let Some(detail) = &result.error_detail {
            writeln!(output, "      error: {}", detail).map_err(fmt_err)?;
        }
        Ok(())
    }
}

impl ReportFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);
        writeln!(output, "{}", border).map_err(fmt_err)?;
        writeln!(output, "  {}  ", title).map_err(fmt_err)?;
        write!(output, "{}", border).map_err(fmt_err)?;
        Ok(output)
    }

    fn format_summary(&self, report: &TestRunReport) -> Result<String> {
        if report.is_empty() {
            return Ok(NO_NETWORKS.to_string());
        }

        let mut output = self.format_header(SUMMARY_TITLE)?;
        output.push_str("\n\n");

        let healthy = report.healthy();
        let has_healthy = !healthy.is_empty();
        if has_healthy {
            writeln!(output, "Healthy networks ({}):", healthy.len()).map_err(fmt_err)?;
            for result in healthy {
                self.push_result(&mut output, healthy_line(result), result)?;
            }
        }

        let degraded = report.degraded();
        if !degraded.is_empty() {
            if has_healthy {
                output.push('\n');
            }
            writeln!(output, "Degraded networks ({}):", degraded.len()).map_err(fmt_err)?;
            for result in degraded {
                self.push_result(&mut output, degraded_line(result), result)?;
            }
        }

        Ok(output)
    }

    fn format_failure_alert(&self, report: &TestRunReport, subscriber: Option<&str>) -> Result<Option<String>> {
        let degraded = report.degraded();
        if degraded.is_empty() {
            return Ok(None);
        }

        let mut output = mention(subscriber);
        writeln!(output, "WiFi tests failed ({} of {}):", degraded.len(), report.len()).map_err(fmt_err)?;
        for result in degraded {
            self.push_result(&mut output, alert_line(result), result)?;
        }
        Ok(Some(output))
    }

    fn format_run_error(&self, reason: &str) -> Result<String> {
        Ok(format!("test run failed: {}", reason))
    }
}
