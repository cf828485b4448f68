//! WiFi Network Tester - command-line entry point
//!
//! Without flags: test every saved network once and print the summary.
//! With --watch: sweep periodically and alert the configured destination.
//! SIGUSR1 asks a watching process for an immediate full summary.

use anyhow::Context;
use clap::Parser;
use std::process;
use std::sync::Arc;
use wifi_network_tester::{
    app::{describe, DiagnosticService, RunOutcome, CONSOLE_DESTINATION},
    cli::Cli,
    config::{load_config, EnvManager, SettingsStore},
    error::{AppError, ErrorReporter},
    logging::LoggerFactory,
    scheduler::Scheduler,
    signals, RunLock,
};

/// Some networks are degraded
const EXIT_DEGRADED: i32 = 3;
/// No network could be tested
const EXIT_INVENTORY_UNAVAILABLE: i32 = 2;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    if cli.print_env_example {
        print!("{}", EnvManager::create_example_env_content());
        return;
    }

    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose);

    match run_application(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            match e.downcast_ref::<AppError>() {
                Some(app_error) => {
                    reporter.report_error(app_error);
                    process::exit(app_error.exit_code());
                }
                None => {
                    eprintln!("Error: {:#}", e);
                    process::exit(1);
                }
            }
        }
    }
}

async fn run_application(cli: Cli) -> anyhow::Result<i32> {
    let changes = cli.settings_changes();
    let watch = cli.watch;
    let destination = cli.destination.clone();

    let config = load_config(cli)?;

    if config.debug {
        eprintln!("{}", describe(&config));
        for warning in EnvManager::validate_current_env() {
            eprintln!("{}", warning);
        }
        eprintln!();
    }

    let store = SettingsStore::new(config.settings_path.clone());

    if !changes.is_empty() {
        let settings = store.update(&changes)?;
        println!("Settings saved to {}", store.path().display());
        println!("  destination: {}", settings.destination.as_deref().unwrap_or("(none)"));
        println!("  subscriber: {}", settings.subscriber.as_deref().unwrap_or("(none)"));
        return Ok(0);
    }

    let logger = LoggerFactory::new(config.clone()).create_diagnostic_logger().await;
    let service = DiagnosticService::from_config(&config, RunLock::new(), logger)?;

    if watch {
        let shutdown = signals::shutdown_signal()?;
        let requests = signals::on_demand_requests()?;
        let scheduler = Scheduler::new(Arc::new(service), store, config.interval())
            .with_destination_override(destination);
        scheduler
            .run_until(shutdown, requests)
            .await
            .context("watch mode stopped unexpectedly")?;
        return Ok(0);
    }

    let destination = destination.unwrap_or_else(|| CONSOLE_DESTINATION.to_string());
    let code = match service.run_on_demand(&destination).await? {
        RunOutcome::Completed(report) if report.degraded().is_empty() => 0,
        RunOutcome::Completed(_) => EXIT_DEGRADED,
        RunOutcome::InventoryUnavailable(_) => EXIT_INVENTORY_UNAVAILABLE,
    };
    Ok(code)
}
