//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                eprintln!("Loaded configuration from .env file");
            }
        } else if debug {
            eprintln!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        let mut content = String::from(
            "# WiFi Network Tester Configuration\n\
             #\n\
             # Values here are used as defaults and can be overridden by\n\
             # environment variables and command-line arguments.\n\n",
        );

        for (var, description, example) in Self::get_supported_env_vars() {
            content.push_str(&format!("# {}\n# {}={}\n\n", description, var, example));
        }

        content
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        std::fs::write(path, Self::create_example_env_content())
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "WIFI_INTERFACE" => {
                if value.trim().is_empty() || value.trim().chars().any(char::is_whitespace) {
                    return Err(AppError::config(format!("Invalid WIFI_INTERFACE value '{}'", value)));
                }
            }
            "WIFI_PROBE_TARGET" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("WIFI_PROBE_TARGET cannot be empty"));
                }
            }
            "WIFI_PROBE_COUNT" => {
                let count: u32 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid WIFI_PROBE_COUNT value '{}': {}", value, e)))?;
                if count == 0 || count > 100 {
                    return Err(AppError::config(format!("WIFI_PROBE_COUNT must be between 1 and 100, got: {}", count)));
                }
            }
            "WIFI_LOSS_THRESHOLD" => {
                let threshold: f64 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid WIFI_LOSS_THRESHOLD value '{}': {}", value, e)))?;
                if !(0.0..=100.0).contains(&threshold) {
                    return Err(AppError::config(format!("WIFI_LOSS_THRESHOLD must be between 0 and 100, got: {}", threshold)));
                }
            }
            "WIFI_INTERVAL_MINUTES" => {
                let minutes: u64 = value.trim().parse()
                    .map_err(|e| AppError::config(format!("Invalid WIFI_INTERVAL_MINUTES value '{}': {}", value, e)))?;
                if minutes == 0 || minutes > crate::defaults::MAX_SWEEP_INTERVAL_MINUTES {
                    return Err(AppError::config(format!(
                        "WIFI_INTERVAL_MINUTES must be between 1 and {}, got: {}",
                        crate::defaults::MAX_SWEEP_INTERVAL_MINUTES,
                        minutes
                    )));
                }
            }
            "WIFI_DESTINATION" => {
                let value = value.trim();
                if value.contains("://") {
                    let parsed = url::Url::parse(value)
                        .map_err(|e| AppError::config(format!("Invalid WIFI_DESTINATION URL '{}': {}", value, e)))?;
                    if !matches!(parsed.scheme(), "http" | "https") {
                        return Err(AppError::config(format!("WIFI_DESTINATION must be an http(s) URL: {}", value)));
                    }
                }
            }
            "WIFI_ENABLE_COLOR" => {
                value.trim().parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid WIFI_ENABLE_COLOR value '{}': {}", value, e)))?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("WIFI_INTERFACE", "Wireless interface to drive", "wlan0"),
            ("WIFI_PROBE_TARGET", "Address the reachability probe is sent to", "8.8.8.8"),
            ("WIFI_PROBE_COUNT", "Probe packets per network (1-100)", "20"),
            ("WIFI_LOSS_THRESHOLD", "Packet loss percentage above which a network is degraded", "5.0"),
            ("WIFI_INTERVAL_MINUTES", "Minutes between sweeps in watch mode", "15"),
            ("WIFI_NETWORK_DB", "Comma-separated network database files, tried in order", "/var/lib/dietpi/dietpi-config/.wifi_network_db,/boot/dietpi/.network"),
            ("WIFI_SUPPLICANT_CONF", "wpa_supplicant configuration used as fallback", "/etc/wpa_supplicant/wpa_supplicant.conf"),
            ("WIFI_SETTINGS_PATH", "JSON file holding the alert destination and subscriber", "wifi-tester.json"),
            ("WIFI_DESTINATION", "Report destination override (webhook URL or channel name)", "https://chat.example.com/api/webhooks/ID/TOKEN"),
            ("WIFI_ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Vec<String> {
        Self::get_supported_env_vars()
            .into_iter()
            .filter_map(|(name, _, _)| {
                let value = std::env::var(name).ok()?;
                Self::validate_env_var(name, &value).err().map(|e| format!("Warning: {}", e))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_example_content_lists_every_variable() {
        let content = EnvManager::create_example_env_content();
        assert!(content.contains("WiFi Network Tester Configuration"));
        for (var, _, _) in EnvManager::get_supported_env_vars() {
            assert!(content.contains(&format!("# {}=", var)), "missing {}", var);
        }
    }

    #[test]
    fn test_save_example_file() {
        let temp_file = NamedTempFile::new().unwrap();
        EnvManager::save_example_env_file(temp_file.path()).unwrap();
        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("WIFI_PROBE_COUNT"));
    }

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("WIFI_INTERFACE", "wlan0").is_ok());
        assert!(EnvManager::validate_env_var("WIFI_PROBE_COUNT", "20").is_ok());
        assert!(EnvManager::validate_env_var("WIFI_LOSS_THRESHOLD", "5.0").is_ok());
        assert!(EnvManager::validate_env_var("WIFI_INTERVAL_MINUTES", "15").is_ok());
        assert!(EnvManager::validate_env_var("WIFI_DESTINATION", "https://hooks.example.com/x").is_ok());
        assert!(EnvManager::validate_env_var("WIFI_DESTINATION", "alerts-channel").is_ok());
        assert!(EnvManager::validate_env_var("WIFI_ENABLE_COLOR", "false").is_ok());

        assert!(EnvManager::validate_env_var("WIFI_INTERFACE", "wlan 0").is_err());
        assert!(EnvManager::validate_env_var("WIFI_PROBE_TARGET", " ").is_err());
        assert!(EnvManager::validate_env_var("WIFI_PROBE_COUNT", "0").is_err());
        assert!(EnvManager::validate_env_var("WIFI_PROBE_COUNT", "101").is_err());
        assert!(EnvManager::validate_env_var("WIFI_LOSS_THRESHOLD", "150").is_err());
        assert!(EnvManager::validate_env_var("WIFI_INTERVAL_MINUTES", "0").is_err());
        assert!(EnvManager::validate_env_var("WIFI_INTERVAL_MINUTES", "1440").is_ok());
        assert!(EnvManager::validate_env_var("WIFI_INTERVAL_MINUTES", "1441").is_err());
        assert!(EnvManager::validate_env_var("WIFI_DESTINATION", "ftp://example.com").is_err());
        assert!(EnvManager::validate_env_var("WIFI_ENABLE_COLOR", "maybe").is_err());
    }

    #[test]
    fn test_unknown_variable_ignored() {
        assert!(EnvManager::validate_env_var("SOMETHING_ELSE", "whatever").is_ok());
    }
}
