//! Colored formatter for the terminal
//!
//! Same layout as the plain formatter, with loss and latency colored by
//! severity. Only used for the console; webhooks always get plain text.

use super::formatter::{
    alert_line, degraded_line, healthy_line, mention, telemetry_suffix, FormattingOptions, PlainFormatter,
    ReportFormatter, NO_NETWORKS, SUMMARY_TITLE,
};
use crate::error::Result;
use crate::models::{NetworkTestResult, TestRunReport};
use crate::types::{JitterLevel, LossLevel};
use colored::*;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::BrightBlack,
        }
    }
}

impl ColorScheme {
    fn for_loss(&self, level: LossLevel) -> Color {
        match level {
            LossLevel::None => self.success,
            LossLevel::Minor => self.warning,
            LossLevel::Severe => self.error,
        }
    }

    fn for_jitter(&self, level: JitterLevel) -> Color {
        match level {
            JitterLevel::Stable => self.success,
            JitterLevel::Variable => self.warning,
            JitterLevel::Unstable => self.error,
        }
    }
}

pub struct ColoredFormatter {
    plain: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self {
            plain: PlainFormatter::new(options.clone()),
            options,
            color_scheme,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn marker(&self, healthy: bool) -> ColoredString {
        if healthy {
            self.colorize("✓", self.color_scheme.success)
        } else {
            self.colorize("✗", self.color_scheme.error)
        }
    }

    fn push_result(&self, output: &mut String, line: String, result: &NetworkTestResult) {
        let stats = result.stats_or_default();
        let color = if result.stats.is_some() {
            self.color_scheme.for_loss(LossLevel::from_percent(stats.packet_loss_percent))
        } else {
            self.color_scheme.error
        };

        output.push_str(&format!("  {} {}\n", self.marker(result.succeeded), self.colorize(&line, color)));

        if stats.has_timing() {
            let jitter = JitterLevel::from_std_dev_ms(stats.rtt_std_dev_ms);
            let text = format!("jitter {:.1}ms", stats.rtt_std_dev_ms);
            output.push_str(&format!("      {}\n", self.colorize(&text, self.color_scheme.for_jitter(jitter))));
        }
        if self.options.show_telemetry {
            if let Some(telemetry) = telemetry_suffix(result) {
                output.push_str(&format!("      {}\n", self.colorize(&telemetry, self.color_scheme.muted)));
            }
        }
        if let Some(detail) = &result.error_detail {
            let text = format!("error: {}", detail);
            output.push_str(&format!("      {}\n", self.colorize(&text, self.color_scheme.error)));
        }
    }
}

impl ReportFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "=".repeat(title.len() + 4);
        Ok(format!(
            "{}\n  {}  \n{}",
            self.colorize(&border, self.color_scheme.header),
            self.bold(title),
            self.colorize(&border, self.color_scheme.header)
        ))
    }

    fn format_summary(&self, report: &TestRunReport) -> Result<String> {
        if report.is_empty() {
            return Ok(self.colorize(NO_NETWORKS, self.color_scheme.warning).to_string());
        }

        let mut output = self.format_header(SUMMARY_TITLE)?;
        output.push_str("\n\n");

        let healthy = report.healthy();
        let has_healthy = !healthy.is_empty();
        if has_healthy {
            let title = format!("Healthy networks ({}):", healthy.len());
            output.push_str(&format!("{}\n", self.colorize(&title, self.color_scheme.success)));
            for result in healthy {
                self.push_result(&mut output, healthy_line(result), result);
            }
        }

        let degraded = report.degraded();
        if !degraded.is_empty() {
            if has_healthy {
                output.push('\n');
            }
            let title = format!("Degraded networks ({}):", degraded.len());
            output.push_str(&format!("{}\n", self.colorize(&title, self.color_scheme.error)));
            for result in degraded {
                self.push_result(&mut output, degraded_line(result), result);
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
        let title = format!("WiFi tests failed ({} of {}):", degraded.len(), report.len());
        output.push_str(&format!("{}\n", self.colorize(&title, self.color_scheme.error)));
        for result in degraded {
            self.push_result(&mut output, alert_line(result), result);
        }
        Ok(Some(output))
    }

    fn format_run_error(&self, reason: &str) -> Result<String> {
        let message = self.plain.format_run_error(reason)?;
        Ok(self.colorize(&message, self.color_scheme.error).to_string())
    }
}
