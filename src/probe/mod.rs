//! Reachability probe
//!
//! `ProbeTool` runs ping and hands back its raw output; `ProbeRunner` turns
//! that into `ProbeStatistics`.

pub mod parser;

pub use parser::{parse_probe_output, PARSER_VERSION};

use crate::models::ProbeStatistics;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Probe failures distinct from packet loss
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("failed to start ping: {0}")]
    Spawn(String),

    #[error("ping exited with {status}: {output}")]
    ToolFailed { status: String, output: String },

    #[error("unparsable value in ping output: {0}")]
    Unparsable(String),
}

/// Executes the probe command
#[async_trait]
pub trait ProbeTool: Send + Sync {
    /// Send `count` echo requests to `target`.
    ///
    /// Returns the output of a completed probe, including one where no reply
    /// arrived. Anything else is an error.
    async fn ping(&self, target: &str, count: u32) -> Result<String, ProbeError>;
}

/// `ping -c <count> -W <wait> <target>`
#[derive(Debug, Clone)]
pub struct SystemProbeTool {
    wait: Duration,
}

impl SystemProbeTool {
    pub fn new(wait: Duration) -> Self {
        Self { wait }
    }
}

impl Default for SystemProbeTool {
    fn default() -> Self {
        Self::new(crate::defaults::DEFAULT_PROBE_WAIT)
    }
}

#[async_trait]
impl ProbeTool for SystemProbeTool {
    async fn ping(&self, target: &str, count: u32) -> Result<String, ProbeError> {
        let output = Command::new("ping")
            .arg("-c")
            .arg(count.to_string())
            .arg("-W")
            .arg(self.wait.as_secs().max(1).to_string())
            .arg(target)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ProbeError::Spawn(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        classify_exit(output.status.code(), stdout, &String::from_utf8_lossy(&output.stderr))
    }
}

/// Decide whether a finished ping counts as a completed probe.
///
/// Exit 0 always does. Exit 1 means no reply was received; it still counts
/// when the summary line was printed. Every other status is a failure.
fn classify_exit(code: Option<i32>, stdout: String, stderr: &str) -> Result<String, ProbeError> {
    match code {
        Some(0) => Ok(stdout),
        Some(1) if parser::has_summary(&stdout) => Ok(stdout),
        other => {
            let status = other.map_or_else(|| "signal".to_string(), |c| format!("status {}", c));
            let output = if stderr.trim().is_empty() { stdout.trim() } else { stderr.trim() };
            Err(ProbeError::ToolFailed {
                status,
                output: output.to_string(),
            })
        }
    }
}

/// Runs a probe and parses its statistics
#[derive(Clone)]
pub struct ProbeRunner {
    tool: Arc<dyn ProbeTool>,
}

impl ProbeRunner {
    pub fn new(tool: Arc<dyn ProbeTool>) -> Self {
        Self { tool }
    }

    pub async fn run(&self, target: &str, count: u32) -> Result<ProbeStatistics, ProbeError> {
        let output = self.tool.ping(target, count).await?;
        parse_probe_output(&output)
    }
}
