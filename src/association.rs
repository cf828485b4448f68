//! Association state machine
//!
//! Moves the adapter onto a named network:
//!
//! ```text
//! Idle -> CheckCurrent -> AlreadyAssociated
//!                      -> Disconnecting -> Selecting -> WaitingForLink -> LinkUp -> LeaseAcquired
//!                                                                    \-> Failed
//! ```
//!
//! Every transition is logged at debug level.

use crate::control::parse::resolve_profile;
use crate::control::{ControlError, NetworkControl};
use crate::logging::DiagnosticLogger;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationState {
    Idle,
    CheckCurrent,
    AlreadyAssociated,
    Disconnecting,
    Selecting,
    WaitingForLink,
    LinkUp,
    LeaseAcquired,
    Failed,
}

impl AssociationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CheckCurrent => "check-current",
            Self::AlreadyAssociated => "already-associated",
            Self::Disconnecting => "disconnecting",
            Self::Selecting => "selecting",
            Self::WaitingForLink => "waiting-for-link",
            Self::LinkUp => "link-up",
            Self::LeaseAcquired => "lease-acquired",
            Self::Failed => "failed",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssociationError {
    #[error("network not found in profile store")]
    ProfileNotFound(String),

    #[error("could not list configured networks: {0}")]
    ProfileListing(String),

    #[error("could not select network: {0}")]
    ActivationRejected(String),

    #[error("association not verified: expected {expected}, adapter reports {}", .actual.as_deref().unwrap_or("no network"))]
    VerificationFailed { expected: String, actual: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationOutcome {
    AlreadyAssociated,
    /// Switched networks; `lease_acquired` is false when DHCP failed
    Associated { lease_acquired: bool },
}

/// Waits between association steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssociationTimings {
    pub disconnect_settle: Duration,
    pub link_wait: Duration,
    pub lease_wait: Duration,
}

impl Default for AssociationTimings {
    fn default() -> Self {
        Self {
            disconnect_settle: crate::defaults::DISCONNECT_SETTLE,
            link_wait: crate::defaults::LINK_WAIT,
            lease_wait: crate::defaults::LEASE_WAIT,
        }
    }
}

impl AssociationTimings {
    pub fn immediate() -> Self {
        Self {
            disconnect_settle: Duration::ZERO,
            link_wait: Duration::ZERO,
            lease_wait: Duration::ZERO,
        }
    }
}

pub struct AssociationController {
    control: Arc<dyn NetworkControl>,
    timings: AssociationTimings,
    logger: DiagnosticLogger,
}

impl AssociationController {
    pub fn new(control: Arc<dyn NetworkControl>, timings: AssociationTimings, logger: DiagnosticLogger) -> Self {
        Self { control, timings, logger }
    }

    /// Associate the adapter with `target`.
    ///
    /// A missing profile is reported immediately and never retried. A failed
    /// DHCP lease does not fail the association.
    pub async fn associate(&self, target: &str) -> Result<AssociationOutcome, AssociationError> {
        self.enter(target, AssociationState::Idle).await;
        self.enter(target, AssociationState::CheckCurrent).await;

        // An unreadable association is treated as "not associated"
        let current = self.control.current_association().await.unwrap_or(None);
        if current.as_deref() == Some(target) {
            self.enter(target, AssociationState::AlreadyAssociated).await;
            return Ok(AssociationOutcome::AlreadyAssociated);
        }

        if current.is_some() {
            self.enter(target, AssociationState::Disconnecting).await;
            if let Err(e) = self.control.disconnect().await {
                self.logger.log_association_failure(target, &e.to_string()).await;
            }
            tokio::time::sleep(self.timings.disconnect_settle).await;
        }

        self.enter(target, AssociationState::Selecting).await;
        let result = self.select_and_verify(target).await;
        if let Err(e) = &result {
            self.enter(target, AssociationState::Failed).await;
            self.logger.log_association_failure(target, &e.to_string()).await;
        }
        result
    }

    async fn select_and_verify(&self, target: &str) -> Result<AssociationOutcome, AssociationError> {
        let profiles = self
            .control
            .list_profiles()
            .await
            .map_err(|e| AssociationError::ProfileListing(tool_detail(e)))?;

        let profile = resolve_profile(&profiles, target)
            .ok_or_else(|| AssociationError::ProfileNotFound(target.to_string()))?;

        self.control
            .activate_profile(profile.id)
            .await
            .map_err(|e| AssociationError::ActivationRejected(tool_detail(e)))?;

        self.enter(target, AssociationState::WaitingForLink).await;
        tokio::time::sleep(self.timings.link_wait).await;

        let actual = self.control.current_association().await.unwrap_or(None);
        if actual.as_deref() != Some(target) {
            return Err(AssociationError::VerificationFailed {
                expected: target.to_string(),
                actual,
            });
        }
        self.enter(target, AssociationState::LinkUp).await;

        let lease = self.control.acquire_lease().await;
        tokio::time::sleep(self.timings.lease_wait).await;

        let lease_acquired = match lease {
            Ok(()) => {
                self.enter(target, AssociationState::LeaseAcquired).await;
                true
            }
            Err(e) => {
                self.logger.log_lease_failure(target, &e.to_string()).await;
                false
            }
        };

        Ok(AssociationOutcome::Associated { lease_acquired })
    }

    async fn enter(&self, network: &str, state: AssociationState) {
        self.logger.log_association_state(network, state).await;
    }
}

fn tool_detail(error: ControlError) -> String {
    match error {
        ControlError::Failed { output, .. } => output,
        ControlError::Spawn { .. } => error.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::control::ConfiguredProfile;
    use crate::models::AdapterTelemetry;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scriptable adapter that records every call
    pub(crate) struct FakeControl {
        pub associated: Mutex<Option<String>>,
        pub profiles: Vec<ConfiguredProfile>,
        pub fail_listing: bool,
        pub reject_activation: bool,
        /// Network the adapter actually lands on after activation
        pub lands_on: Option<Option<String>>,
        pub fail_lease: bool,
        pub address: Option<String>,
        pub telemetry: AdapterTelemetry,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeControl {
        pub fn new(names: &[&str]) -> Self {
            Self {
                associated: Mutex::new(None),
                profiles: names
                    .iter()
                    .enumerate()
                    .map(|(i, n)| ConfiguredProfile { id: i as u32, ssid: n.to_string() })
                    .collect(),
                fail_listing: false,
                reject_activation: false,
                lands_on: None,
                fail_lease: false,
                address: Some("192.168.1.23".to_string()),
                telemetry: AdapterTelemetry { signal_dbm: Some(-55), bit_rate: Some("72.2 Mb/s".to_string()) },
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn associated_with(self, name: &str) -> Self {
            *self.associated.lock().unwrap() = Some(name.to_string());
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }
    }

    #[async_trait]
    impl NetworkControl for FakeControl {
        async fn current_association(&self) -> Result<Option<String>, ControlError> {
            Ok(self.associated.lock().unwrap().clone())
        }

        async fn list_profiles(&self) -> Result<Vec<ConfiguredProfile>, ControlError> {
            self.record("list");
            if self.fail_listing {
                return Err(ControlError::Failed { tool: "wpa_cli".into(), output: "no control interface".into() });
            }
            Ok(self.profiles.clone())
        }

        async fn disconnect(&self) -> Result<(), ControlError> {
            self.record("disconnect");
            *self.associated.lock().unwrap() = None;
            Ok(())
        }

        async fn activate_profile(&self, id: u32) -> Result<(), ControlError> {
            self.record(format!("select {}", id));
            if self.reject_activation {
                return Err(ControlError::Failed { tool: "wpa_cli".into(), output: "select_network refused".into() });
            }
            let landed = match &self.lands_on {
                Some(landed) => landed.clone(),
                None => self.profiles.iter().find(|p| p.id == id).map(|p| p.ssid.clone()),
            };
            *self.associated.lock().unwrap() = landed;
            Ok(())
        }

        async fn acquire_lease(&self) -> Result<(), ControlError> {
            self.record("lease");
            if self.fail_lease {
                return Err(ControlError::Failed { tool: "dhclient".into(), output: "no DHCPOFFERS received".into() });
            }
            Ok(())
        }

        async fn telemetry(&self) -> Result<AdapterTelemetry, ControlError> {
            Ok(self.telemetry.clone())
        }

        async fn local_address(&self) -> Result<Option<String>, ControlError> {
            Ok(self.address.clone())
        }
    }

    fn controller(control: Arc<FakeControl>) -> AssociationController {
        AssociationController::new(control, AssociationTimings::immediate(), DiagnosticLogger::quiet())
    }

    #[tokio::test]
    async fn test_already_associated_skips_everything() {
        let control = Arc::new(FakeControl::new(&["HomeNet"]).associated_with("HomeNet"));
        let outcome = controller(control.clone()).associate("HomeNet").await.unwrap();

        assert_eq!(outcome, AssociationOutcome::AlreadyAssociated);
        assert!(control.calls().is_empty());
    }

    #[tokio::test]
    async fn test_switch_from_other_network() {
        let control = Arc::new(FakeControl::new(&["HomeNet", "Office"]).associated_with("HomeNet"));
        let outcome = controller(control.clone()).associate("Office").await.unwrap();

        assert_eq!(outcome, AssociationOutcome::Associated { lease_acquired: true });
        assert_eq!(control.calls(), vec!["disconnect", "list", "select 1", "lease"]);
    }

    #[tokio::test]
    async fn test_not_associated_skips_disconnect() {
        let control = Arc::new(FakeControl::new(&["HomeNet"]));
        controller(control.clone()).associate("HomeNet").await.unwrap();
        assert_eq!(control.calls(), vec!["list", "select 0", "lease"]);
    }

    #[tokio::test]
    async fn test_unknown_profile_is_not_retried() {
        let control = Arc::new(FakeControl::new(&["HomeNet"]));
        let error = controller(control.clone()).associate("Cafe").await.unwrap_err();

        assert_eq!(error, AssociationError::ProfileNotFound("Cafe".to_string()));
        assert_eq!(error.to_string(), "network not found in profile store");
        assert_eq!(control.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn test_listing_failure_carries_tool_error() {
        let mut fake = FakeControl::new(&["HomeNet"]);
        fake.fail_listing = true;
        let error = controller(Arc::new(fake)).associate("HomeNet").await.unwrap_err();
        assert_eq!(error, AssociationError::ProfileListing("no control interface".to_string()));
    }

    #[tokio::test]
    async fn test_activation_rejected() {
        let mut fake = FakeControl::new(&["HomeNet"]);
        fake.reject_activation = true;
        let error = controller(Arc::new(fake)).associate("HomeNet").await.unwrap_err();
        assert!(matches!(error, AssociationError::ActivationRejected(_)));
    }

    #[tokio::test]
    async fn test_verification_failure() {
        let mut fake = FakeControl::new(&["HomeNet", "Office"]);
        fake.lands_on = Some(Some("HomeNet".to_string()));
        let control = Arc::new(fake);
        let error = controller(control.clone()).associate("Office").await.unwrap_err();

        assert_eq!(error, AssociationError::VerificationFailed {
            expected: "Office".to_string(),
            actual: Some("HomeNet".to_string()),
        });
        assert!(!control.calls().contains(&"lease".to_string()));
    }

    #[tokio::test]
    async fn test_lease_failure_is_tolerated() {
        let mut fake = FakeControl::new(&["HomeNet"]);
        fake.fail_lease = true;
        let outcome = controller(Arc::new(fake)).associate("HomeNet").await.unwrap();
        assert_eq!(outcome, AssociationOutcome::Associated { lease_acquired: false });
    }

    #[tokio::test]
    async fn test_lease_wait_applies_after_failed_lease() {
        let mut fake = FakeControl::new(&["HomeNet"]);
        fake.fail_lease = true;
        let timings = AssociationTimings {
            lease_wait: Duration::from_millis(40),
            ..AssociationTimings::immediate()
        };
        let controller = AssociationController::new(Arc::new(fake), timings, DiagnosticLogger::quiet());

        let started = std::time::Instant::now();
        controller.associate("HomeNet").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_state_names() {
        assert_eq!(AssociationState::WaitingForLink.as_str(), "waiting-for-link");
        assert_eq!(AssociationState::LeaseAcquired.as_str(), "lease-acquired");
    }
}
