pub mod config;
pub mod core_state; // Transport-agnostic state
pub mod models;
pub mod provider; // Platform health-data boundary
pub mod screen;
pub mod viewmodel;

#[cfg(feature = "desktop")]
pub mod commands;

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise [`config::default_log_filter`] applies.
/// Calling twice is harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Arc;

    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let fixture = config::fixture_path();
    let core = match core_state::CoreState::from_fixture(&fixture) {
        Ok(core) => core,
        Err(e) => {
            tracing::error!(
                error = %e,
                path = %fixture.display(),
                "Ignoring unreadable health fixture"
            );
            core_state::CoreState::new(Arc::new(provider::InMemoryProvider::new()))
        }
    };

    tauri::Builder::default()
        .manage(Arc::new(core))
        .setup(|app| {
            commands::blood_pressure::start_screen_events(app.handle());
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::health_check,
            commands::blood_pressure::get_blood_pressure_screen,
            commands::blood_pressure::load_blood_pressure,
            commands::blood_pressure::request_blood_pressure_permissions,
        ])
        .run(tauri::generate_context!())
        .expect("error while running VitalView");
}
