use std::path::PathBuf;

use chrono::Locale;

/// Application-level constants
pub const APP_NAME: &str = "VitalView";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of whole days before today covered by the readings window.
pub const READINGS_WINDOW_DAYS: u32 = 7;

/// Environment variable that points the desktop shell at a fixture file.
pub const FIXTURE_ENV_VAR: &str = "VITALVIEW_FIXTURE";

/// Overrides the locale used to format reading times, e.g. `de_DE`.
pub const LOCALE_ENV_VAR: &str = "VITALVIEW_LOCALE";

/// Filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "vitalview_lib=info,vitalview=info,warn"
}

/// Get the application data directory
/// ~/VitalView/ on all platforms. Falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Location of the health fixture consumed by the desktop demo provider.
pub fn fixture_path() -> PathBuf {
    match std::env::var_os(FIXTURE_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => app_data_dir().join("health_fixture.json"),
    }
}

/// Locale for displayed dates: `VITALVIEW_LOCALE`, then `LC_ALL`,
/// `LC_TIME` and `LANG`, falling back to `en_US`.
pub fn display_locale() -> Locale {
    [LOCALE_ENV_VAR, "LC_ALL", "LC_TIME", "LANG"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|tag| parse_locale(&tag))
        .unwrap_or(Locale::en_US)
}

/// Parse a POSIX or BCP 47 locale tag such as `de_DE.UTF-8` or `fr-FR`.
pub fn parse_locale(tag: &str) -> Option<Locale> {
    let name = tag.split(['.', '@']).next()?.replace('-', "_");
    Locale::try_from(name.as_str()).ok()
}
