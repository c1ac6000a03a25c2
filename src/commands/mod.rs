pub mod blood_pressure;

/// Health check IPC command: verifies the backend is running.
#[tauri::command]
pub fn health_check() -> String {
    tracing::debug!("Health check called");
    "ok".to_string()
}
