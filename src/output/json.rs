//! JSON report output for scripts

use super::formatter::ReportFormatter;
use crate::error::Result;
use crate::models::{NetworkTestResult, TestRunReport};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(text)
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        self.render(&json!({ "title": title }))
    }

    fn format_summary(&self, report: &TestRunReport) -> Result<String> {
        let healthy: Vec<&NetworkTestResult> = report.healthy();
        let degraded: Vec<&NetworkTestResult> = report.degraded();
        self.render(&json!({
            "run_id": report.run_id,
            "started_at": report.started_at,
            "completed_at": report.completed_at,
            "healthy": healthy,
            "degraded": degraded,
        }))
    }

    fn format_failure_alert(&self, report: &TestRunReport, subscriber: Option<&str>) -> Result<Option<String>> {
        let degraded = report.degraded();
        if degraded.is_empty() {
            return Ok(None);
        }
        self.render(&json!({
            "run_id": report.run_id,
            "subscriber": subscriber,
            "degraded": degraded,
        }))
        .map(Some)
    }

    fn format_run_error(&self, reason: &str) -> Result<String> {
        self.render(&json!({ "error": format!("test run failed: {}", reason) }))
    }
}
