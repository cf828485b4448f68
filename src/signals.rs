//! Process signals for watch mode
//!
//! SIGINT or SIGTERM stops the loop. SIGUSR1 asks for an on-demand run
//! inside the watching process, so it shares the run-lock with the sweeps:
//!
//! ```text
//! kill -USR1 $(pidof wnt)
//! ```
//!
//! Handlers are installed before the loop starts; failure to install one is
//! an error rather than a loop that exits on its own.

use crate::error::{AppError, Result};
use std::future::Future;
use tokio::sync::mpsc;

/// Queued on-demand requests; extra signals while one is queued are merged
pub const ON_DEMAND_QUEUE: usize = 1;

#[cfg(unix)]
fn install(kind: tokio::signal::unix::SignalKind, name: &str) -> Result<tokio::signal::unix::Signal> {
    tokio::signal::unix::signal(kind)
        .map_err(|e| AppError::internal(format!("cannot install {} handler: {}", name, e)))
}

/// Resolves on SIGINT or SIGTERM
#[cfg(unix)]
pub fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    use tokio::signal::unix::SignalKind;

    let mut interrupt = install(SignalKind::interrupt(), "SIGINT")?;
    let mut terminate = install(SignalKind::terminate(), "SIGTERM")?;
    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => {}
            _ = terminate.recv() => {}
        }
    })
}

/// Resolves on Ctrl-C
#[cfg(not(unix))]
pub fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Ctrl-C handler failed, stop the process externally: {}", e);
            std::future::pending::<()>().await;
        }
    })
}

/// One message per SIGUSR1
#[cfg(unix)]
pub fn on_demand_requests() -> Result<mpsc::Receiver<()>> {
    use tokio::signal::unix::SignalKind;

    let mut user1 = install(SignalKind::user_defined1(), "SIGUSR1")?;
    let (tx, rx) = mpsc::channel(ON_DEMAND_QUEUE);
    tokio::spawn(async move {
        while user1.recv().await.is_some() {
            match tx.try_send(()) {
                Ok(()) | Err(mpsc::error::TrySendError::Full(())) => {}
                Err(mpsc::error::TrySendError::Closed(())) => break,
            }
        }
    });
    Ok(rx)
}

/// No trigger signal on this platform; the channel is closed at once
#[cfg(not(unix))]
pub fn on_demand_requests() -> Result<mpsc::Receiver<()>> {
    let (_tx, rx) = mpsc::channel(ON_DEMAND_QUEUE);
    Ok(rx)
}
