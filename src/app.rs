//! Application wiring and the two reporting paths
//!
//! On demand: run, then deliver the full summary.
//! Sweep: run, then deliver a failure-only alert, and only when a
//! destination is configured.

use crate::{
    association::AssociationController,
    config::{display_config_summary, AlertSettings},
    control::{NetworkControl, SystemNetworkControl},
    error::{AppError, Result},
    executor::{NetworkTestCase, RunLock, TestOrchestrator},
    inventory::InventoryLoader,
    logging::DiagnosticLogger,
    models::{Config, TestRunReport},
    output::{OutputFormatterFactory, PlainFormatter, ReportFormatter},
    probe::{ProbeRunner, ProbeTool, SystemProbeTool},
    sink::{is_webhook_destination, MessageSink, RoutingSink},
};
use std::sync::Arc;

/// Destination used when reports go straight to the terminal
pub const CONSOLE_DESTINATION: &str = "console";

/// Result of an on-demand run
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(TestRunReport),
    /// Nothing could be tested; the reason was reported to the destination
    InventoryUnavailable(String),
}

/// Result of one scheduled sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    /// No destination configured
    Skipped,
    /// Every network healthy, nothing sent
    Healthy,
    /// Alert sent for this many degraded networks
    Alerted(usize),
    /// The run could not start; the reason was reported
    RunFailed(String),
}

/// Runs tests and hands the reports to a sink
pub struct DiagnosticService {
    orchestrator: TestOrchestrator,
    sink: Arc<dyn MessageSink>,
    console_formatter: Box<dyn ReportFormatter>,
    plain_formatter: PlainFormatter,
    logger: DiagnosticLogger,
}

impl DiagnosticService {
    pub fn new(
        orchestrator: TestOrchestrator,
        sink: Arc<dyn MessageSink>,
        console_formatter: Box<dyn ReportFormatter>,
        logger: DiagnosticLogger,
    ) -> Self {
        Self {
            orchestrator,
            sink,
            console_formatter,
            plain_formatter: PlainFormatter::default(),
            logger,
        }
    }

    /// Wire the service to the real adapter, ping and sinks
    pub fn from_config(config: &Config, lock: RunLock, logger: DiagnosticLogger) -> Result<Self> {
        let control: Arc<dyn NetworkControl> = Arc::new(SystemNetworkControl::new(config.interface.clone()));
        let probe: Arc<dyn ProbeTool> = Arc::new(SystemProbeTool::new(config.probe_wait()));
        let sink: Arc<dyn MessageSink> = Arc::new(RoutingSink::new()?);
        let formatter = OutputFormatterFactory::create_formatter(config.enable_color, config.json_output, config.verbose);

        let orchestrator = build_orchestrator(config, control, probe, lock, logger.clone());
        Ok(Self::new(orchestrator, sink, formatter, logger))
    }

    pub fn run_lock(&self) -> &RunLock {
        self.orchestrator.run_lock()
    }

    /// Webhooks get plain text; the console gets the configured formatter
    fn formatter_for(&self, destination: &str) -> &dyn ReportFormatter {
        if is_webhook_destination(destination) {
            &self.plain_formatter
        } else {
            self.console_formatter.as_ref()
        }
    }

    /// Run now and deliver the full summary
    pub async fn run_on_demand(&self, destination: &str) -> Result<RunOutcome> {
        let formatter = self.formatter_for(destination);

        match self.orchestrator.run().await {
            Ok(report) => {
                let summary = formatter.format_summary(&report)?;
                self.sink.send(destination, &summary).await?;
                Ok(RunOutcome::Completed(report))
            }
            Err(AppError::Inventory(reason)) => {
                let message = formatter.format_run_error(&reason)?;
                self.sink.send(destination, &message).await?;
                Ok(RunOutcome::InventoryUnavailable(reason))
            }
            Err(e) => Err(e),
        }
    }

    /// Run and alert only on failures; does nothing without a destination
    pub async fn run_sweep(&self, settings: &AlertSettings) -> Result<SweepOutcome> {
        let Some(destination) = settings.destination.as_deref() else {
            return Ok(SweepOutcome::Skipped);
        };
        let formatter = self.formatter_for(destination);

        match self.orchestrator.run().await {
            Ok(report) => match formatter.format_failure_alert(&report, settings.subscriber.as_deref())? {
                Some(alert) => {
                    self.sink.send(destination, &alert).await?;
                    Ok(SweepOutcome::Alerted(report.degraded().len()))
                }
                None => Ok(SweepOutcome::Healthy),
            },
            Err(AppError::Inventory(reason)) => {
                let message = formatter.format_run_error(&reason)?;
                self.sink.send(destination, &message).await?;
                Ok(SweepOutcome::RunFailed(reason))
            }
            Err(e) => Err(e),
        }
    }

    pub fn logger(&self) -> &DiagnosticLogger {
        &self.logger
    }
}

/// Assemble the orchestrator from its parts
pub fn build_orchestrator(
    config: &Config,
    control: Arc<dyn NetworkControl>,
    probe: Arc<dyn ProbeTool>,
    lock: RunLock,
    logger: DiagnosticLogger,
) -> TestOrchestrator {
    let association = AssociationController::new(control.clone(), config.association_timings(), logger.clone());
    let case = NetworkTestCase::new(control, association, ProbeRunner::new(probe), config.run_policy(), logger.clone());
    TestOrchestrator::new(InventoryLoader::new(config.inventory_sources()), case, lock, logger)
}

/// Describe the configuration for --debug output
pub fn describe(config: &Config) -> String {
    format!("{} v{}\n{}", crate::PKG_NAME, crate::VERSION, display_config_summary(config))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::association::tests::FakeControl;
    use crate::executor::tests::{ping_output, write_inventory, ScriptedProbe};
    use crate::models::DelayConfig;
    use crate::sink::tests::RecordingSink;
    use tempfile::TempDir;

    pub(crate) struct Harness {
        pub dir: TempDir,
        pub service: DiagnosticService,
        pub sink: Arc<RecordingSink>,
        pub probe: Arc<ScriptedProbe>,
    }

    pub(crate) fn harness(inventory: Option<&[&str]>, profiles: &[&str], probe_answers: &[(&str, String)]) -> Harness {
        slow_harness(inventory, profiles, probe_answers, std::time::Duration::ZERO)
    }

    /// Every ping takes `ping_delay`
    pub(crate) fn slow_harness(
        inventory: Option<&[&str]>,
        profiles: &[&str],
        probe_answers: &[(&str, String)],
        ping_delay: std::time::Duration,
    ) -> Harness {
        let dir = TempDir::new().unwrap();
        let mut config = Config {
            delays: DelayConfig::none(),
            ..Config::default()
        };
        match inventory {
            Some(names) => {
                let sources = write_inventory(&dir, names);
                config.network_db_paths = sources.database_paths;
                config.supplicant_path = sources.supplicant_path;
            }
            None => {
                config.network_db_paths = vec![dir.path().join("missing-db")];
                config.supplicant_path = dir.path().join("missing.conf");
            }
        }

        let control = Arc::new(FakeControl::new(profiles));
        let mut probe = ScriptedProbe::new(control.clone()).with_delay(ping_delay);
        for (network, output) in probe_answers {
            probe = probe.answer(network, Ok(output.clone()));
        }
        let probe = Arc::new(probe);

        let logger = DiagnosticLogger::quiet();
        let orchestrator = build_orchestrator(&config, control, probe.clone(), RunLock::new(), logger.clone());
        let sink = Arc::new(RecordingSink::default());
        let service = DiagnosticService::new(
            orchestrator,
            sink.clone(),
            OutputFormatterFactory::create_plain_formatter(),
            logger,
        );
        Harness { dir, service, sink, probe }
    }

    fn alert_settings(destination: Option<&str>, subscriber: Option<&str>) -> AlertSettings {
        AlertSettings {
            destination: destination.map(String::from),
            subscriber: subscriber.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_on_demand_sends_full_summary() {
        let h = harness(Some(&["HomeNet", "Office"]), &["HomeNet", "Office"], &[("Office", ping_output(20, 10))]);

        let outcome = h.service.run_on_demand("ops").await.unwrap();
        assert!(matches!(outcome, RunOutcome::Completed(ref r) if r.len() == 2));

        let messages = h.sink.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "ops");
        assert!(messages[0].1.contains("Healthy networks (1):"));
        assert!(messages[0].1.contains("Degraded networks (1):"));
    }

    #[tokio::test]
    async fn test_on_demand_empty_inventory() {
        let h = harness(Some(&[]), &[], &[]);
        h.service.run_on_demand(CONSOLE_DESTINATION).await.unwrap();
        assert_eq!(h.sink.messages()[0].1, "No networks to test");
    }

    #[tokio::test]
    async fn test_inventory_failure_reported_once() {
        let h = harness(None, &[], &[]);

        let outcome = h.service.run_on_demand("ops").await.unwrap();
        assert!(matches!(outcome, RunOutcome::InventoryUnavailable(_)));

        let messages = h.sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].1.starts_with("test run failed: cannot read saved WiFi networks"));
    }

    #[tokio::test]
    async fn test_sweep_without_destination_does_nothing() {
        let h = harness(Some(&["HomeNet"]), &["HomeNet"], &[]);
        let outcome = h.service.run_sweep(&alert_settings(None, Some("7"))).await.unwrap();
        assert_eq!(outcome, SweepOutcome::Skipped);
        assert!(h.sink.messages().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_all_healthy_is_silent() {
        let h = harness(Some(&["HomeNet"]), &["HomeNet"], &[]);
        let outcome = h.service.run_sweep(&alert_settings(Some("ops"), None)).await.unwrap();
        assert_eq!(outcome, SweepOutcome::Healthy);
        assert!(h.sink.messages().is_empty());
    }

    #[tokio::test]
    async fn test_sweep_alerts_on_degraded() {
        let h = harness(Some(&["HomeNet", "Ghost"]), &["HomeNet"], &[]);
        let outcome = h.service.run_sweep(&alert_settings(Some("ops"), Some("99"))).await.unwrap();
        assert_eq!(outcome, SweepOutcome::Alerted(1));

        let messages = h.sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].1.starts_with("<@99> "));
        assert!(messages[0].1.contains("Ghost"));
        assert!(!messages[0].1.contains("HomeNet"));
    }

    #[tokio::test]
    async fn test_sweep_inventory_failure() {
        let h = harness(None, &[], &[]);
        let outcome = h.service.run_sweep(&alert_settings(Some("ops"), None)).await.unwrap();
        assert!(matches!(outcome, SweepOutcome::RunFailed(_)));
        assert_eq!(h.sink.messages().len(), 1);
    }

    #[test]
    fn test_describe_mentions_version() {
        assert!(describe(&Config::default()).contains(crate::VERSION));
    }
}
