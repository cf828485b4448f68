//! Saved WiFi network discovery
//!
//! Networks come from the first source that yields anything:
//! 1. pipe-delimited network databases, tried in order
//! 2. the wpa_supplicant configuration file
//!
//! The inventory is read fresh on every run so edits take effect immediately.

use crate::error::{AppError, Result};
use crate::models::WiFiNetworkEntry;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Where saved networks are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventorySources {
    pub database_paths: Vec<PathBuf>,
    pub supplicant_path: PathBuf,
}

/// Which source produced an inventory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventorySource {
    Database(PathBuf),
    Supplicant(PathBuf),
}

impl fmt::Display for InventorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database(path) => write!(f, "network database {}", path.display()),
            Self::Supplicant(path) => write!(f, "supplicant config {}", path.display()),
        }
    }
}

/// Ordered networks from one source
#[derive(Debug, Clone)]
pub struct Inventory {
    pub networks: Vec<WiFiNetworkEntry>,
    pub source: InventorySource,
}

impl Inventory {
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }
}

/// Loads the inventory from the configured sources
#[derive(Debug, Clone)]
pub struct InventoryLoader {
    sources: InventorySources,
}

impl InventoryLoader {
    pub fn new(sources: InventorySources) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &InventorySources {
        &self.sources
    }

    /// Load the current inventory.
    ///
    /// The first database that can be read wins; when it holds no networks
    /// the supplicant file is consulted instead. Fails only when the
    /// supplicant file has to be read and cannot be.
    pub fn load(&self) -> Result<Inventory> {
        if let Some((path, content)) = self.first_readable_database() {
            let networks = parse_network_database(&content);
            if !networks.is_empty() {
                return Ok(Inventory {
                    networks,
                    source: InventorySource::Database(path),
                });
            }
        }

        let path = self.sources.supplicant_path.clone();
        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::inventory(format!("cannot read saved WiFi networks from {}: {}", path.display(), e))
        })?;

        Ok(Inventory {
            networks: parse_supplicant_config(&content),
            source: InventorySource::Supplicant(path),
        })
    }

    fn first_readable_database(&self) -> Option<(PathBuf, String)> {
        self.sources
            .database_paths
            .iter()
            .find_map(|path| read_optional(path).map(|content| (path.clone(), content)))
    }
}

fn read_optional(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

/// Parse a pipe-delimited network database.
///
/// One network per line; blank lines and `#` comments are skipped; the first
/// field is the network name. Lines with an empty name are ignored.
pub fn parse_network_database(content: &str) -> Vec<WiFiNetworkEntry> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split('|').next())
        .filter(|name| !name.is_empty())
        .enumerate()
        .map(|(ordinal, name)| WiFiNetworkEntry::new(name, ordinal))
        .collect()
}

fn ssid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"ssid="([^"]+)""#).expect("ssid pattern is valid"))
}

/// Parse `network={ ... }` blocks out of a wpa_supplicant configuration.
///
/// A network is emitted when a line starting with `}` closes a block in
/// which a quoted `ssid` was seen.
pub fn parse_supplicant_config(content: &str) -> Vec<WiFiNetworkEntry> {
    let mut networks = Vec::new();
    let mut current: Option<String> = None;

    for line in content.lines().map(str::trim) {
        if let Some(captures) = ssid_pattern().captures(line) {
            current = Some(captures[1].to_string());
        }

        if line.starts_with('}') {
            if let Some(name) = current.take() {
                let ordinal = networks.len();
                networks.push(WiFiNetworkEntry::new(name, ordinal));
            }
        }
    }

    networks
}
