//! Passive renderer for the blood pressure screen.
//!
//! The screen owns no data. It is handed the view-model's current values,
//! turns them into a [`ScreenView`], and reports user intent and state
//! transitions back through [`ScreenCallbacks`].

mod driver;
mod render;

use chrono::Locale;
use uuid::Uuid;

use crate::config;
use crate::models::PermissionSet;
use crate::provider::ProviderError;
use crate::viewmodel::UiState;

pub use driver::drive;
pub use render::*;

pub trait ScreenCallbacks {
    /// Called once per error occurrence.
    fn on_error(&mut self, cause: &ProviderError);

    /// Called while the state is still `Uninitialized`; expected to start
    /// the initial load.
    fn on_permissions_needed(&mut self);

    /// The user asked to grant `permissions`.
    fn on_request_permissions(&mut self, permissions: &PermissionSet);
}

pub struct ReadingsScreen {
    /// Occurrence id of the last error shown. Starts random so the first
    /// real error never matches.
    last_error_id: Uuid,
    locale: Locale,
}

impl ReadingsScreen {
    /// Screen formatting times in [`config::display_locale`].
    pub fn new() -> Self {
        Self::with_locale(config::display_locale())
    }

    pub fn with_locale(locale: Locale) -> Self {
        Self {
            last_error_id: Uuid::new_v4(),
            locale,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// React to a (possibly repeated) state value.
    pub fn on_state_changed<C>(&mut self, state: &UiState, callbacks: &mut C)
    where
        C: ScreenCallbacks + ?Sized,
    {
        match state {
            UiState::Uninitialized => callbacks.on_permissions_needed(),
            UiState::Error {
                cause,
                occurrence_id,
            } if *occurrence_id != self.last_error_id => {
                callbacks.on_error(cause);
                self.last_error_id = *occurrence_id;
            }
            _ => {}
        }
    }

    pub fn render(&self, props: &ScreenProps<'_>) -> ScreenView {
        render::render(props, self.locale)
    }

    /// Permission button pressed.
    pub fn request_permissions<C>(&self, props: &ScreenProps<'_>, callbacks: &mut C)
    where
        C: ScreenCallbacks + ?Sized,
    {
        callbacks.on_request_permissions(props.permissions);
    }
}

impl Default for ReadingsScreen {
    fn default() -> Self {
        Self::new()
    }
}
