//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

/// WiFi Network Tester - associates with every saved WiFi network in turn and
/// checks that each one can reach the internet
#[derive(Parser, Debug, Clone)]
#[command(name = "wnt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Keep running and sweep all networks periodically, alerting on failures
    #[arg(short, long)]
    pub watch: bool,

    /// Minutes between sweeps in watch mode
    #[arg(long, value_name = "MINUTES", value_parser = parse_interval)]
    pub interval: Option<u64>,

    /// Probe packets sent per network
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub count: Option<u32>,

    /// Address the probe is sent to
    #[arg(short, long)]
    pub target: Option<String>,

    /// Wireless interface to drive
    #[arg(short, long)]
    pub interface: Option<String>,

    /// Where reports go for this invocation (webhook URL or channel name)
    #[arg(short, long, env = "WIFI_DESTINATION")]
    pub destination: Option<String>,

    /// Settings file holding the alert destination and subscriber
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Save the alert destination used by watch mode
    #[arg(long, value_name = "DESTINATION")]
    pub set_destination: Option<String>,

    /// Save the subscriber mentioned in failure alerts
    #[arg(long, value_name = "ID")]
    pub set_subscriber: Option<String>,

    /// Remove the saved alert destination
    #[arg(long)]
    pub clear_destination: bool,

    /// Remove the saved alert subscriber
    #[arg(long)]
    pub clear_subscriber: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Print an example .env file and exit
    #[arg(long)]
    pub print_env_example: bool,
}

/// A change to the saved alert settings requested on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsChange {
    SetDestination(String),
    SetSubscriber(String),
    ClearDestination,
    ClearSubscriber,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.set_destination.is_some() && self.clear_destination {
            return Err("Cannot specify both --set-destination and --clear-destination".to_string());
        }

        if self.set_subscriber.is_some() && self.clear_subscriber {
            return Err("Cannot specify both --set-subscriber and --clear-subscriber".to_string());
        }

        if self.watch && !self.settings_changes().is_empty() {
            return Err("Settings flags cannot be combined with --watch".to_string());
        }

        if self.interval.is_some() && !self.watch {
            return Err("--interval requires --watch".to_string());
        }

        if let Some(target) = &self.target {
            if target.trim().is_empty() {
                return Err("--target cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Settings edits in the order they are applied
    pub fn settings_changes(&self) -> Vec<SettingsChange> {
        let mut changes = Vec::new();
        if let Some(destination) = &self.set_destination {
            changes.push(SettingsChange::SetDestination(destination.clone()));
        }
        if self.clear_destination {
            changes.push(SettingsChange::ClearDestination);
        }
        if let Some(subscriber) = &self.set_subscriber {
            changes.push(SettingsChange::SetSubscriber(subscriber.clone()));
        }
        if self.clear_subscriber {
            changes.push(SettingsChange::ClearSubscriber);
        }
        changes
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color || self.json {
            false
        } else {
            supports_color()
        }
    }
}

fn parse_interval(s: &str) -> Result<u64, String> {
    let minutes = s
        .parse::<u64>()
        .map_err(|_| format!("Invalid interval: {}", s))?;
    match minutes {
        0 => Err("Interval must be at least 1 minute".to_string()),
        m if m > crate::defaults::MAX_SWEEP_INTERVAL_MINUTES => Err(format!(
            "Interval cannot exceed {} minutes",
            crate::defaults::MAX_SWEEP_INTERVAL_MINUTES
        )),
        m => Ok(m),
    }
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    true
}
