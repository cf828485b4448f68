//! Report formatting
//!
//! Formatters turn a `TestRunReport` into either a full summary or a
//! failure-only alert. Plain text goes to sinks that cannot render color,
//! the colored formatter to the terminal, JSON to scripts.

mod colored;
mod formatter;
mod json;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{FormattingOptions, PlainFormatter, ReportFormatter, NO_NETWORKS, SUMMARY_TITLE};
pub use json::JsonFormatter;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Pick a formatter from the output preferences
    pub fn create_formatter(enable_color: bool, json: bool, verbose: bool) -> Box<dyn ReportFormatter> {
        if json {
            return Box::new(JsonFormatter::new(true));
        }

        let options = FormattingOptions {
            enable_color,
            show_telemetry: verbose,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Plain text for webhooks and logs
    pub fn create_plain_formatter() -> Box<dyn ReportFormatter> {
        Self::create_formatter(false, false, false)
    }
}
