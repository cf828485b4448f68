//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Builds the configuration: defaults, then .env, then WIFI_* variables,
/// then command-line flags
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file(self.cli.debug)?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(count) = self.cli.count {
            config.probe_count = count;
        }

        if let Some(target) = &self.cli.target {
            config.probe_target = target.trim().to_string();
        }

        if let Some(interface) = &self.cli.interface {
            config.interface = interface.trim().to_string();
        }

        if let Some(minutes) = self.cli.interval {
            config.interval_minutes = minutes;
        }

        if let Some(path) = &self.cli.settings {
            config.settings_path = path.clone();
        }

        if self.cli.color {
            config.enable_color = true;
        } else if self.cli.no_color || self.cli.json {
            config.enable_color = false;
        }

        config.json_output = self.cli.json;
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let databases: Vec<String> = config
        .network_db_paths
        .iter()
        .map(|p| p.display().to_string())
        .collect();

    [
        format!("Interface: {}", config.interface),
        format!("Probe: {} x {} (loss threshold {:.1}%)", config.probe_target, config.probe_count, config.loss_threshold_percent),
        format!("Sweep interval: {} min", config.interval_minutes),
        format!("Network databases: {}", databases.join(", ")),
        format!("Supplicant config: {}", config.supplicant_path.display()),
        format!("Settings file: {}", config.settings_path.display()),
        format!("Color Output: {}", config.enable_color),
        format!("Verbose: {}", config.verbose),
        format!("Debug: {}", config.debug),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "wnt", "--count", "10", "--target", "1.1.1.1", "--interface", "wlan1", "--no-color", "--verbose",
        ]);
        let mut config = Config::default();
        ConfigParser::new(cli).apply_cli_overrides(&mut config);

        assert_eq!(config.probe_count, 10);
        assert_eq!(config.probe_target, "1.1.1.1");
        assert_eq!(config.interface, "wlan1");
        assert!(!config.enable_color);
        assert!(config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_disables_color() {
        let cli = Cli::parse_from(["wnt", "--json"]);
        let mut config = Config::default();
        ConfigParser::new(cli).apply_cli_overrides(&mut config);
        assert!(config.json_output);
        assert!(!config.enable_color);
    }

    #[test]
    fn test_watch_interval_and_settings_path() {
        let cli = Cli::parse_from(["wnt", "--watch", "--interval", "5", "--settings", "/tmp/alerts.json"]);
        let mut config = Config::default();
        ConfigParser::new(cli).apply_cli_overrides(&mut config);
        assert_eq!(config.interval_minutes, 5);
        assert_eq!(config.settings_path, std::path::PathBuf::from("/tmp/alerts.json"));
    }

    #[test]
    fn test_no_flags_keeps_defaults() {
        let cli = Cli::parse_from(["wnt"]);
        let mut config = Config::default();
        ConfigParser::new(cli).apply_cli_overrides(&mut config);
        assert_eq!(config.probe_count, crate::defaults::DEFAULT_PROBE_COUNT);
        assert_eq!(config.probe_target, crate::defaults::DEFAULT_PROBE_TARGET);
    }

    #[test]
    fn test_config_summary() {
        let summary = display_config_summary(&Config::default());
        assert!(summary.contains("Interface: wlan0"));
        assert!(summary.contains("Probe: 8.8.8.8 x 20"));
        assert!(summary.contains("Sweep interval: 15 min"));
    }
}
