//! Configuration management module

pub mod env;
pub mod parser;
pub mod store;

pub use env::EnvManager;
pub use parser::{display_config_summary, load_config, ConfigParser};
pub use store::{AlertSettings, SettingsStore};

pub use crate::models::Config;
