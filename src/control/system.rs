//! `NetworkControl` backed by iwgetid, wpa_cli, dhclient, iwconfig and ip

use super::parse::{parse_current_association, parse_ipv4_address, parse_profile_list, parse_telemetry};
use super::{ConfiguredProfile, ControlError, NetworkControl};
use crate::models::AdapterTelemetry;
use async_trait::async_trait;
use tokio::process::Command;

/// Drives one wireless interface through the system tools
#[derive(Debug, Clone)]
pub struct SystemNetworkControl {
    interface: String,
}

impl SystemNetworkControl {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
        }
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    /// Run a tool and return its stdout, failing on a non-zero exit
    async fn run(&self, tool: &str, args: &[&str]) -> Result<String, ControlError> {
        let output = Command::new(tool)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ControlError::Spawn {
                tool: tool.to_string(),
                reason: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            Ok(stdout)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = if stderr.trim().is_empty() { stdout.trim().to_string() } else { stderr.trim().to_string() };
            Err(ControlError::Failed {
                tool: tool.to_string(),
                output: detail,
            })
        }
    }

    /// wpa_cli exits 0 even when a command is refused; it prints FAIL instead
    async fn wpa_cli(&self, args: &[&str]) -> Result<String, ControlError> {
        let mut full = vec!["-i", self.interface.as_str()];
        full.extend_from_slice(args);
        let output = self.run("wpa_cli", &full).await?;

        if output.trim() == "FAIL" {
            return Err(ControlError::Failed {
                tool: "wpa_cli".to_string(),
                output: format!("{} refused", args.join(" ")),
            });
        }
        Ok(output)
    }
}

#[async_trait]
impl NetworkControl for SystemNetworkControl {
    async fn current_association(&self) -> Result<Option<String>, ControlError> {
        // iwgetid exits 255 when the adapter is not associated
        match self.run("iwgetid", &["-r"]).await {
            Ok(output) => Ok(parse_current_association(&output)),
            Err(ControlError::Failed { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_profiles(&self) -> Result<Vec<ConfiguredProfile>, ControlError> {
        let output = self.wpa_cli(&["list_networks"]).await?;
        Ok(parse_profile_list(&output))
    }

    async fn disconnect(&self) -> Result<(), ControlError> {
        self.wpa_cli(&["disconnect"]).await.map(|_| ())
    }

    async fn activate_profile(&self, id: u32) -> Result<(), ControlError> {
        let id = id.to_string();
        self.wpa_cli(&["select_network", &id]).await.map(|_| ())
    }

    async fn acquire_lease(&self) -> Result<(), ControlError> {
        self.run("dhclient", &[self.interface.as_str()]).await.map(|_| ())
    }

    async fn telemetry(&self) -> Result<AdapterTelemetry, ControlError> {
        let output = self.run("iwconfig", &[self.interface.as_str()]).await?;
        Ok(parse_telemetry(&output))
    }

    async fn local_address(&self) -> Result<Option<String>, ControlError> {
        let output = self.run("ip", &["-4", "addr", "show", self.interface.as_str()]).await?;
        Ok(parse_ipv4_address(&output))
    }
}
