//! Periodic background sweep
//!
//! The first sweep fires one full interval after start. Settings are
//! re-read from disk on every tick so destination changes apply without a
//! restart. On-demand requests arriving on the request channel run in the
//! same loop and behind the same run-lock, so they never interleave with a
//! sweep. A run in progress is never interrupted by shutdown.

use crate::{
    app::{DiagnosticService, RunOutcome, SweepOutcome, CONSOLE_DESTINATION},
    config::{AlertSettings, SettingsStore},
    error::Result,
    log_error, log_info, log_warn,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

pub struct Scheduler {
    service: Arc<DiagnosticService>,
    store: SettingsStore,
    destination_override: Option<String>,
    period: Duration,
}

impl Scheduler {
    pub fn new(service: Arc<DiagnosticService>, store: SettingsStore, period: Duration) -> Self {
        Self {
            service,
            store,
            destination_override: None,
            period,
        }
    }

    /// Destination that wins over the stored one, e.g. from WIFI_DESTINATION
    pub fn with_destination_override(mut self, destination: Option<String>) -> Self {
        self.destination_override = destination.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    fn effective_settings(&self, mut settings: AlertSettings) -> AlertSettings {
        if let Some(destination) = &self.destination_override {
            settings.destination = Some(destination.clone());
        }
        settings
    }

    /// One sweep with the settings as they are on disk right now
    pub async fn tick(&self) -> Result<SweepOutcome> {
        let logger = self.service.logger().logger();

        let stored = match self.store.load() {
            Ok(settings) => settings,
            Err(e) => {
                log_warn!(logger, "Skipping sweep, settings unreadable: {}", e);
                return Ok(SweepOutcome::Skipped);
            }
        };

        let settings = self.effective_settings(stored);
        if settings.destination.is_none() {
            log_info!(logger, "No alert destination configured, sweep skipped");
            return Ok(SweepOutcome::Skipped);
        }

        self.service.run_sweep(&settings).await
    }

    /// Where an on-demand summary goes: override, stored destination, console
    pub fn on_demand_destination(&self) -> String {
        if let Some(destination) = &self.destination_override {
            return destination.clone();
        }
        self.store
            .load()
            .ok()
            .and_then(|settings| settings.destination)
            .unwrap_or_else(|| CONSOLE_DESTINATION.to_string())
    }

    /// Full run with the summary delivered, as a plain `wnt` would
    pub async fn on_demand(&self) -> Result<RunOutcome> {
        let destination = self.on_demand_destination();
        self.service.run_on_demand(&destination).await
    }

    async fn sweep_and_log(&self) {
        let logger = self.service.logger().logger();
        match self.tick().await {
            Ok(SweepOutcome::Alerted(degraded)) => {
                log_info!(logger, "Sweep alerted on {} degraded network(s)", degraded);
            }
            Ok(SweepOutcome::RunFailed(reason)) => {
                log_warn!(logger, "Sweep could not run: {}", reason);
            }
            Ok(_) => {}
            Err(e) => {
                log_error!(logger, "Sweep failed: {}", e);
            }
        }
    }

    async fn on_demand_and_log(&self) {
        let logger = self.service.logger().logger();
        match self.on_demand().await {
            Ok(RunOutcome::Completed(report)) => {
                log_info!(
                    logger,
                    "On-demand run finished, {} of {} network(s) degraded",
                    report.degraded().len(),
                    report.len()
                );
            }
            Ok(RunOutcome::InventoryUnavailable(reason)) => {
                log_warn!(logger, "On-demand run could not start: {}", reason);
            }
            Err(e) => {
                log_error!(logger, "On-demand run failed: {}", e);
            }
        }
    }

    /// Sweep every period and serve on-demand requests until `shutdown`
    /// resolves. A closed request channel only stops the on-demand side.
    pub async fn run_until<F>(&self, shutdown: F, mut requests: mpsc::Receiver<()>) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let logger = self.service.logger().logger();
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);
        let mut accepting = true;

        log_info!(logger, "Watch mode started, sweeping every {}s", self.period.as_secs());

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    log_info!(logger, "Watch mode stopped");
                    return Ok(());
                }
                request = requests.recv(), if accepting => match request {
                    Some(()) => self.on_demand_and_log().await,
                    None => accepting = false,
                },
                _ = ticker.tick() => self.sweep_and_log().await,
            }
        }
    }
}
