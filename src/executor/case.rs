//! Single-network test case

use super::RunPolicy;
use crate::association::AssociationController;
use crate::control::NetworkControl;
use crate::logging::DiagnosticLogger;
use crate::models::{NetworkTestResult, WiFiNetworkEntry};
use crate::probe::ProbeRunner;
use std::sync::Arc;

/// Associates with one network, reads the link, and probes through it
pub struct NetworkTestCase {
    control: Arc<dyn NetworkControl>,
    association: AssociationController,
    probe: ProbeRunner,
    policy: RunPolicy,
    logger: DiagnosticLogger,
}

impl NetworkTestCase {
    pub fn new(
        control: Arc<dyn NetworkControl>,
        association: AssociationController,
        probe: ProbeRunner,
        policy: RunPolicy,
        logger: DiagnosticLogger,
    ) -> Self {
        Self { control, association, probe, policy, logger }
    }

    pub fn policy(&self) -> &RunPolicy {
        &self.policy
    }

    /// Test one network. Never fails; problems end up in the result.
    pub async fn run(&self, network: &WiFiNetworkEntry) -> NetworkTestResult {
        let name = network.name.as_str();
        let target = self.policy.probe_target.as_str();
        let count = self.policy.probe_count;

        if let Ok(Some(current)) = self.control.current_association().await {
            self.logger.logger().debug(&format!("Adapter currently on {}", current))
                .field("network", name)
                .field("current", &current)
                .log()
                .await;
        }

        if let Err(e) = self.association.associate(name).await {
            let address = self.local_address().await;
            return NetworkTestResult::failed(name, target, count, e.to_string(), address, None);
        }

        let telemetry = match self.control.telemetry().await {
            Ok(telemetry) => {
                self.logger.log_telemetry(name, &telemetry).await;
                Some(telemetry)
            }
            Err(e) => {
                self.logger.logger().debug(&format!("No link telemetry for {}: {}", name, e))
                    .field("network", name)
                    .log()
                    .await;
                None
            }
        };

        tokio::time::sleep(self.policy.link_stabilize).await;

        let probed = self.probe.run(target, count).await;
        let address = self.local_address().await;

        match probed {
            Ok(stats) => {
                let result = NetworkTestResult::measured(
                    name,
                    target,
                    count,
                    stats,
                    self.policy.loss_threshold_percent,
                    address,
                    telemetry,
                );
                self.logger.log_probe_result(name, target, &stats, result.succeeded).await;
                result
            }
            Err(e) => {
                let detail = e.to_string();
                self.logger.log_probe_failure(name, target, &detail).await;
                NetworkTestResult::failed(name, target, count, detail, address, telemetry)
            }
        }
    }

    async fn local_address(&self) -> String {
        self.control.local_address().await.ok().flatten().unwrap_or_default()
    }
}
