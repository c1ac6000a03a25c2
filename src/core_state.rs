//! Transport-agnostic application state.
//!
//! `CoreState` owns the blood pressure view-model and is the single shared
//! state handed to the Tauri IPC layer. It is wrapped in `Arc` at startup.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::provider::{load_fixture, FixtureError, HealthDataProvider};
use crate::screen::{ReadingsScreen, ScreenCallbacks, ScreenProps, ScreenView};
use crate::viewmodel::{BloodPressureViewModel, UiState, UiStatePayload, ViewModelSnapshot};

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    view_model: Arc<BloodPressureViewModel>,
    /// Renders frames and handles the permission button. Error
    /// notifications are de-duplicated by the screen the driver owns.
    screen: ReadingsScreen,
}

impl CoreState {
    pub fn new(provider: Arc<dyn HealthDataProvider>) -> Self {
        Self::with_view_model(Arc::new(BloodPressureViewModel::new(provider)))
    }

    pub fn with_view_model(view_model: Arc<BloodPressureViewModel>) -> Self {
        Self::with_screen(view_model, ReadingsScreen::new())
    }

    pub fn with_screen(view_model: Arc<BloodPressureViewModel>, screen: ReadingsScreen) -> Self {
        Self { view_model, screen }
    }

    /// Build state around the demo provider seeded from `path`.
    pub fn from_fixture(path: &Path) -> Result<Self, CoreError> {
        let provider = load_fixture(path)?;
        Ok(Self::new(Arc::new(provider)))
    }

    pub fn view_model(&self) -> &Arc<BloodPressureViewModel> {
        &self.view_model
    }

    /// Current values rendered into a frontend payload.
    pub fn screen_snapshot(&self) -> ScreenSnapshot {
        let snapshot = self.view_model.snapshot();
        let view = self.screen.render(&self.props(&snapshot));

        ScreenSnapshot {
            permissions_granted: snapshot.permissions_granted,
            ui_state: snapshot.ui_state.to_payload(),
            view,
        }
    }

    /// Hand `emit` a fresh snapshot after every change seen by `states`.
    ///
    /// Subscribe before anything can load, otherwise the first transition
    /// may be missed. Returns once the view-model is dropped.
    pub async fn forward_snapshots<F>(&self, mut states: watch::Receiver<UiState>, mut emit: F)
    where
        F: FnMut(ScreenSnapshot),
    {
        while states.changed().await.is_ok() {
            emit(self.screen_snapshot());
        }
    }

    /// The permission button was pressed.
    pub fn press_permissions_button<C>(&self, callbacks: &mut C)
    where
        C: ScreenCallbacks + ?Sized,
    {
        let snapshot = self.view_model.snapshot();
        self.screen.request_permissions(&self.props(&snapshot), callbacks);
    }

    fn props<'a>(&'a self, snapshot: &'a ViewModelSnapshot) -> ScreenProps<'a> {
        ScreenProps {
            permissions: self.view_model.permissions(),
            permissions_granted: snapshot.permissions_granted,
            readings: &snapshot.readings,
            ui_state: &snapshot.ui_state,
        }
    }
}

/// Everything the frontend needs to draw the blood pressure screen.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenSnapshot {
    pub permissions_granted: bool,
    pub ui_state: UiStatePayload,
    pub view: ScreenView,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Health fixture error: {0}")]
    Fixture(#[from] FixtureError),
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HealthPermission, PermissionSet, RecordType};
    use crate::provider::{InMemoryProvider, ProviderError};
    use crate::viewmodel::join_load;
    use tokio::sync::mpsc;

    #[derive(Default)]
    struct ButtonRecorder {
        requested: Vec<PermissionSet>,
    }

    impl ScreenCallbacks for ButtonRecorder {
        fn on_error(&mut self, _cause: &ProviderError) {}

        fn on_permissions_needed(&mut self) {}

        fn on_request_permissions(&mut self, permissions: &PermissionSet) {
            self.requested.push(permissions.clone());
        }
    }

    fn granted() -> PermissionSet {
        [HealthPermission::read(RecordType::BloodPressure)]
            .into_iter()
            .collect()
    }

    #[test]
    fn fresh_state_renders_blank() {
        let core = CoreState::new(Arc::new(InMemoryProvider::new()));
        let snapshot = core.screen_snapshot();

        assert!(!snapshot.permissions_granted);
        assert_eq!(snapshot.ui_state, UiStatePayload::Uninitialized);
        assert_eq!(snapshot.view, ScreenView::Blank);
    }

    #[tokio::test]
    async fn snapshot_after_denied_load_shows_button() {
        let core = CoreState::new(Arc::new(InMemoryProvider::new()));
        core.view_model().load().await.unwrap();

        let snapshot = core.screen_snapshot();
        assert_eq!(snapshot.ui_state, UiStatePayload::Done);
        assert!(matches!(snapshot.view, ScreenView::PermissionsButton { .. }));
    }

    #[tokio::test]
    async fn snapshot_after_granted_load_lists_readings() {
        let core = CoreState::new(Arc::new(InMemoryProvider::new().with_granted(granted())));
        core.view_model().load().await.unwrap();

        let json = serde_json::to_value(core.screen_snapshot()).unwrap();
        assert_eq!(json["permissions_granted"], true);
        assert_eq!(json["ui_state"]["status"], "done");
        assert_eq!(json["view"]["kind"], "reading_list");
    }

    #[tokio::test]
    async fn permissions_button_goes_through_screen_callbacks() {
        let core = CoreState::new(Arc::new(InMemoryProvider::new()));
        core.view_model().load().await.unwrap();
        let mut recorder = ButtonRecorder::default();

        core.press_permissions_button(&mut recorder);

        assert_eq!(recorder.requested, vec![granted()]);
    }

    #[tokio::test]
    async fn forwarder_sees_load_finished_before_it_started() {
        let core = Arc::new(CoreState::new(Arc::new(
            InMemoryProvider::new().with_granted(granted()),
        )));
        let states = core.view_model().subscribe_ui_state();

        let load = core.view_model().initial_load().expect("no load in flight");
        join_load(load).await.unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let forwarder = {
            let core = Arc::clone(&core);
            tokio::spawn(async move {
                core.forward_snapshots(states, |snapshot| {
                    let _ = tx.send(snapshot);
                })
                .await;
            })
        };

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.ui_state, UiStatePayload::Done);
        assert!(matches!(snapshot.view, ScreenView::ReadingList { .. }));
        forwarder.abort();
    }

    #[test]
    fn missing_fixture_builds_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let core = CoreState::from_fixture(&dir.path().join("none.json")).unwrap();
        assert!(core.view_model().readings().is_empty());
    }

    #[test]
    fn bad_fixture_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        let err = CoreState::from_fixture(&path).err().unwrap();
        assert!(matches!(err, CoreError::Fixture(FixtureError::Json(_))));
    }
}
