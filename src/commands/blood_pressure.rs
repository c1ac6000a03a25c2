//! IPC commands and event forwarding for the blood pressure screen.

use std::sync::Arc;

use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager, State};

use crate::core_state::{CoreState, ScreenSnapshot};
use crate::models::PermissionSet;
use crate::provider::{FailureKind, ProviderError};
use crate::screen::{self, ReadingsScreen, ScreenCallbacks};
use crate::viewmodel::{join_load, BloodPressureViewModel, LoadOutcome};

pub const STATE_CHANGED_EVENT: &str = "blood-pressure-state-changed";
pub const ERROR_EVENT: &str = "blood-pressure-error";

/// Payload of [`ERROR_EVENT`].
#[derive(Debug, Clone, Serialize)]
pub struct ErrorNotice {
    pub kind: Option<FailureKind>,
    pub message: String,
}

/// Result of a load triggered from the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct LoadResponse {
    pub outcome: LoadOutcome,
    pub screen: ScreenSnapshot,
}

/// Current screen contents, without triggering a load.
#[tauri::command]
pub fn get_blood_pressure_screen(state: State<'_, Arc<CoreState>>) -> ScreenSnapshot {
    state.screen_snapshot()
}

/// Run the permission-gated fetch and return the refreshed screen.
#[tauri::command]
pub async fn load_blood_pressure(state: State<'_, Arc<CoreState>>) -> Result<LoadResponse, String> {
    let outcome = state.view_model().load().await.map_err(|e| e.to_string())?;
    Ok(LoadResponse {
        outcome,
        screen: state.screen_snapshot(),
    })
}

/// Button action. The request and reload run in the background; the result
/// arrives as a state-changed event.
#[tauri::command]
pub fn request_blood_pressure_permissions(app: AppHandle, state: State<'_, Arc<CoreState>>) {
    let mut callbacks = WebviewCallbacks::new(app, state.view_model());
    state.press_permissions_button(&mut callbacks);
}

// ═══════════════════════════════════════════════════════════
// Event forwarding
// ═══════════════════════════════════════════════════════════

/// Screen callbacks backed by the webview.
struct WebviewCallbacks {
    app: AppHandle,
    view_model: Arc<BloodPressureViewModel>,
}

impl WebviewCallbacks {
    fn new(app: AppHandle, view_model: &Arc<BloodPressureViewModel>) -> Self {
        Self {
            app,
            view_model: Arc::clone(view_model),
        }
    }
}

impl ScreenCallbacks for WebviewCallbacks {
    fn on_error(&mut self, cause: &ProviderError) {
        let notice = ErrorNotice {
            kind: cause.kind(),
            message: cause.to_string(),
        };
        if let Err(e) = self.app.emit(ERROR_EVENT, &notice) {
            tracing::warn!(error = %e, "Failed to emit blood pressure error");
        }
    }

    fn on_permissions_needed(&mut self) {
        let Some(handle) = self.view_model.initial_load() else {
            return;
        };
        tauri::async_runtime::spawn(async move {
            if let Err(e) = join_load(handle).await {
                tracing::error!(error = %e, "Initial blood pressure load failed");
            }
        });
    }

    fn on_request_permissions(&mut self, permissions: &PermissionSet) {
        tracing::info!(requested = permissions.len(), "Requesting health permissions");
        let view_model = Arc::clone(&self.view_model);
        tauri::async_runtime::spawn(async move {
            if let Err(e) = view_model.request_permissions().await {
                tracing::error!(error = %e, "Blood pressure permission request failed");
            }
        });
    }
}

/// Bind the screen to the view-model and mirror every state change to the
/// frontend. Call from the Tauri `.setup()` callback.
pub fn start_screen_events(app: &AppHandle) {
    let core = Arc::clone(app.state::<Arc<CoreState>>().inner());

    // Both receivers exist before the driver can start the first load.
    let driven = core.view_model().subscribe_ui_state();
    let forwarded = core.view_model().subscribe_ui_state();

    let mut callbacks = WebviewCallbacks::new(app.clone(), core.view_model());
    tauri::async_runtime::spawn(async move {
        let mut screen = ReadingsScreen::new();
        screen::drive(driven, &mut screen, &mut callbacks).await;
    });

    let forward_app = app.clone();
    tauri::async_runtime::spawn(async move {
        core.forward_snapshots(forwarded, |snapshot| {
            if let Err(e) = forward_app.emit(STATE_CHANGED_EVENT, &snapshot) {
                tracing::warn!(error = %e, "Failed to emit blood pressure state");
            }
        })
        .await;
    });

    tracing::info!("Blood pressure screen events started");
}
