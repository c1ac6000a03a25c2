use tokio::sync::watch;

use super::{ReadingsScreen, ScreenCallbacks};
use crate::viewmodel::UiState;

/// Feed `screen` the current state and every later change.
///
/// Returns once the view-model publishing `states` is dropped.
pub async fn drive<C>(
    mut states: watch::Receiver<UiState>,
    screen: &mut ReadingsScreen,
    callbacks: &mut C,
)
where
    C: ScreenCallbacks + ?Sized,
{
    loop {
        let state = (*states.borrow_and_update()).clone();
        screen.on_state_changed(&state, callbacks);

        if states.changed().await.is_err() {
            tracing::debug!("Screen state publisher dropped, stopping driver");
            break;
        }
    }
}
