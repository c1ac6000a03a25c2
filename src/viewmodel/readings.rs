//! View-model behind the blood pressure screen.
//!
//! Checks permissions, reads a trailing week of readings from the provider
//! and publishes three observable values (`permissions_granted`, `readings`,
//! `ui_state`) through `watch` channels the screen subscribes to.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use super::{mapping, window, Clock, SystemClock, UiState};
use crate::config;
use crate::models::{AppInfo, BloodPressureReading, HealthPermission, PermissionSet, RecordType};
use crate::provider::{HealthDataProvider, ProviderError};

/// Failures that are not turned into a screen error.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Permission check failed: {0}")]
    PermissionCheck(#[source] ProviderError),

    #[error("Unclassified provider failure: {0}")]
    Unclassified(#[source] ProviderError),

    #[error("Load task failed: {0}")]
    TaskFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadOutcome {
    /// Permissions granted and readings replaced.
    Loaded,
    /// Permissions missing; the read was skipped.
    PermissionsMissing,
    /// A classified failure was published as `UiState::Error`.
    Failed,
    /// Another load was running; nothing was done.
    AlreadyInFlight,
}

/// Point-in-time copy of every observable value.
#[derive(Debug, Clone)]
pub struct ViewModelSnapshot {
    pub permissions_granted: bool,
    pub readings: Arc<Vec<BloodPressureReading>>,
    pub ui_state: UiState,
}

pub struct BloodPressureViewModel {
    provider: Arc<dyn HealthDataProvider>,
    clock: Arc<dyn Clock>,
    /// Captured once at construction.
    compatible_apps: HashMap<String, AppInfo>,
    permissions: PermissionSet,
    window_days: u32,
    permissions_granted: watch::Sender<bool>,
    readings: watch::Sender<Arc<Vec<BloodPressureReading>>>,
    ui_state: watch::Sender<UiState>,
    /// Held for the whole of a load; overlapping loads are skipped.
    load_lock: Arc<Mutex<()>>,
}

impl BloodPressureViewModel {
    pub fn new(provider: Arc<dyn HealthDataProvider>) -> Self {
        Self::with_clock(provider, Arc::new(SystemClock))
    }

    pub fn with_clock(provider: Arc<dyn HealthDataProvider>, clock: Arc<dyn Clock>) -> Self {
        let compatible_apps = provider.compatible_apps();
        let permissions = [HealthPermission::read(RecordType::BloodPressure)]
            .into_iter()
            .collect();

        Self {
            provider,
            clock,
            compatible_apps,
            permissions,
            window_days: config::READINGS_WINDOW_DAYS,
            permissions_granted: watch::Sender::new(false),
            readings: watch::Sender::new(Arc::new(Vec::new())),
            ui_state: watch::Sender::new(UiState::Uninitialized),
            load_lock: Arc::new(Mutex::new(())),
        }
    }

    // ── Observable state ─────────────────────────────────────

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    pub fn permissions_granted(&self) -> bool {
        *self.permissions_granted.borrow()
    }

    pub fn readings(&self) -> Arc<Vec<BloodPressureReading>> {
        Arc::clone(&*self.readings.borrow())
    }

    pub fn ui_state(&self) -> UiState {
        (*self.ui_state.borrow()).clone()
    }

    pub fn snapshot(&self) -> ViewModelSnapshot {
        ViewModelSnapshot {
            permissions_granted: self.permissions_granted(),
            readings: self.readings(),
            ui_state: self.ui_state(),
        }
    }

    pub fn subscribe_permissions_granted(&self) -> watch::Receiver<bool> {
        self.permissions_granted.subscribe()
    }

    pub fn subscribe_readings(&self) -> watch::Receiver<Arc<Vec<BloodPressureReading>>> {
        self.readings.subscribe()
    }

    pub fn subscribe_ui_state(&self) -> watch::Receiver<UiState> {
        self.ui_state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.load_lock.try_lock().is_err()
    }

    // ── Loading ──────────────────────────────────────────────

    /// Start a load on its own task.
    ///
    /// Returns `None` without spawning when a load is already running.
    pub fn initial_load(self: &Arc<Self>) -> Option<JoinHandle<Result<LoadOutcome, LoadError>>> {
        let Ok(guard) = Arc::clone(&self.load_lock).try_lock_owned() else {
            tracing::debug!("Blood pressure load already in flight, ignoring");
            return None;
        };

        let this = Arc::clone(self);
        Some(tokio::spawn(async move {
            let _guard = guard;
            this.run_load().await
        }))
    }

    /// Run a load on the caller's task.
    pub async fn load(&self) -> Result<LoadOutcome, LoadError> {
        let Ok(_guard) = self.load_lock.try_lock() else {
            tracing::debug!("Blood pressure load already in flight, ignoring");
            return Ok(LoadOutcome::AlreadyInFlight);
        };
        self.run_load().await
    }

    /// Ask the provider for this screen's permissions, then reload so the
    /// observable state reflects the new grants.
    pub async fn request_permissions(&self) -> Result<LoadOutcome, LoadError> {
        let Ok(_guard) = self.load_lock.try_lock() else {
            tracing::debug!("Blood pressure load already in flight, ignoring permission request");
            return Ok(LoadOutcome::AlreadyInFlight);
        };

        match self.provider.request_permissions(&self.permissions).await {
            Ok(granted) => {
                tracing::info!(
                    all_granted = granted.contains_all(&self.permissions),
                    "Health permission request completed"
                );
            }
            Err(e) => return self.publish_failure(e),
        }

        self.run_load().await
    }

    async fn run_load(&self) -> Result<LoadOutcome, LoadError> {
        self.try_with_permissions_check(|| self.read_blood_pressure_readings())
            .await
    }

    /// Runs `block` only when every permission is granted.
    ///
    /// Missing permissions are not an error: `permissions_granted` goes false
    /// and the screen offers a permission button. Classified provider
    /// failures from `block` become `UiState::Error`; anything else is
    /// returned untouched.
    async fn try_with_permissions_check<F, Fut>(&self, block: F) -> Result<LoadOutcome, LoadError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ProviderError>>,
    {
        let granted = self
            .provider
            .has_all_permissions(&self.permissions)
            .await
            .map_err(LoadError::PermissionCheck)?;
        self.permissions_granted.send_replace(granted);

        let result = if granted { block().await } else { Ok(()) };

        match result {
            Ok(()) => {
                self.ui_state.send_replace(UiState::Done);
                if granted {
                    Ok(LoadOutcome::Loaded)
                } else {
                    tracing::info!("Blood pressure permissions not granted, skipping read");
                    Ok(LoadOutcome::PermissionsMissing)
                }
            }
            Err(e) => self.publish_failure(e),
        }
    }

    fn publish_failure(&self, error: ProviderError) -> Result<LoadOutcome, LoadError> {
        if error.is_classified() {
            tracing::warn!(error = %error, "Health data provider call failed");
            self.ui_state.send_replace(UiState::error(error));
            Ok(LoadOutcome::Failed)
        } else {
            tracing::error!(error = %error, "Unclassified health data provider failure");
            Err(LoadError::Unclassified(error))
        }
    }

    async fn read_blood_pressure_readings(&self) -> Result<(), ProviderError> {
        let range = window::trailing_days(self.clock.as_ref(), self.window_days)?;
        let records = self.provider.read_blood_pressure_records(range).await?;
        let readings = mapping::to_readings(records, &self.compatible_apps, self.clock.as_ref());

        tracing::debug!(
            count = readings.len(),
            start = %range.start,
            end = %range.end,
            "Blood pressure readings loaded"
        );
        self.readings.send_replace(Arc::new(readings));
        Ok(())
    }
}

/// Await a handle returned by [`BloodPressureViewModel::initial_load`].
pub async fn join_load(
    handle: JoinHandle<Result<LoadOutcome, LoadError>>,
) -> Result<LoadOutcome, LoadError> {
    handle
        .await
        .map_err(|e| LoadError::TaskFailed(e.to_string()))?
}
