use chrono::{DateTime, FixedOffset, Locale};
use serde::Serialize;

use crate::models::{AppIcon, BloodPressureReading, PermissionSet, Pressure};
use crate::viewmodel::UiState;

pub const PERMISSIONS_BUTTON_LABEL: &str = "Request permissions";

/// Medium-length US English date-time, e.g. `Jun 8, 2025, 6:00:00 AM`.
const MEDIUM_DATE_TIME: &str = "%b %-d, %Y, %-I:%M:%S %p";

/// The locale's own date and time representations.
const LOCALE_DATE_TIME: &str = "%x, %X";

/// Everything the screen needs to render one frame.
#[derive(Debug, Clone, Copy)]
pub struct ScreenProps<'a> {
    pub permissions: &'a PermissionSet,
    pub permissions_granted: bool,
    pub readings: &'a [BloodPressureReading],
    pub ui_state: &'a UiState,
}

/// What the frontend should draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScreenView {
    /// Nothing until the first load has finished.
    Blank,
    PermissionsButton {
        label: String,
        permissions: PermissionSet,
    },
    ReadingList {
        rows: Vec<ReadingRow>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingRow {
    pub id: String,
    pub app_label: Option<String>,
    pub app_icon: Option<AppIcon>,
    pub pressure: String,
    pub time: String,
}

/// `"120 / 80"`, each side rounded to whole mmHg.
pub fn format_pressure(systolic: Pressure, diastolic: Pressure) -> String {
    format!("{:.0} / {:.0}", systolic.rounded(), diastolic.rounded())
}

pub fn format_time(time: &DateTime<FixedOffset>, locale: Locale) -> String {
    let pattern = if locale == Locale::en_US {
        MEDIUM_DATE_TIME
    } else {
        LOCALE_DATE_TIME
    };
    time.format_localized(pattern, locale).to_string()
}

impl ReadingRow {
    pub fn new(reading: &BloodPressureReading, locale: Locale) -> Self {
        let app = reading.source_app_info.as_ref();
        ReadingRow {
            id: reading.id.clone(),
            app_label: app.map(|a| a.app_label.clone()),
            app_icon: app.and_then(|a| a.icon.clone()),
            pressure: format_pressure(reading.systolic, reading.diastolic),
            time: format_time(&reading.time, locale),
        }
    }
}

pub fn render(props: &ScreenProps<'_>, locale: Locale) -> ScreenView {
    if props.ui_state.is_uninitialized() {
        return ScreenView::Blank;
    }

    if !props.permissions_granted {
        return ScreenView::PermissionsButton {
            label: PERMISSIONS_BUTTON_LABEL.to_string(),
            permissions: props.permissions.clone(),
        };
    }

    ScreenView::ReadingList {
        rows: props
            .readings
            .iter()
            .map(|reading| ReadingRow::new(reading, locale))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppInfo, HealthPermission, RecordType};
    use crate::provider::ProviderError;
    use chrono::TimeZone;

    fn permissions() -> PermissionSet {
        [HealthPermission::read(RecordType::BloodPressure)]
            .into_iter()
            .collect()
    }

    fn reading(
        id: &str,
        systolic: f64,
        diastolic: f64,
        app: Option<AppInfo>,
    ) -> BloodPressureReading {
        BloodPressureReading {
            id: id.into(),
            systolic: Pressure::millimeters_of_mercury(systolic),
            diastolic: Pressure::millimeters_of_mercury(diastolic),
            time: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(2025, 6, 8, 18, 5, 9)
                .unwrap(),
            source_app_info: app,
        }
    }

    #[test]
    fn pressure_rounds_each_side() {
        let text = format_pressure(
            Pressure::millimeters_of_mercury(119.5),
            Pressure::millimeters_of_mercury(80.4),
        );
        assert_eq!(text, "120 / 80");
    }

    #[test]
    fn time_uses_medium_style() {
        let morning = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 5, 9, 4, 5)
            .unwrap();
        let evening = reading("r", 1.0, 1.0, None).time;
        assert_eq!(format_time(&morning, Locale::en_US), "Jan 5, 2025, 9:04:05 AM");
        assert_eq!(format_time(&evening, Locale::en_US), "Jun 8, 2025, 6:05:09 PM");
    }

    #[test]
    fn time_follows_locale_conventions() {
        let morning = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 5, 9, 4, 5)
            .unwrap();
        assert_eq!(format_time(&morning, Locale::de_DE), "05.01.2025, 09:04:05");
    }

    #[test]
    fn uninitialized_renders_blank() {
        let readings = vec![reading("r1", 120.0, 80.0, None)];
        let props = ScreenProps {
            permissions: &permissions(),
            permissions_granted: true,
            readings: &readings,
            ui_state: &UiState::Uninitialized,
        };
        assert_eq!(render(&props, Locale::en_US), ScreenView::Blank);
    }

    #[test]
    fn missing_permissions_render_single_button() {
        let perms = permissions();
        let props = ScreenProps {
            permissions: &perms,
            permissions_granted: false,
            readings: &[],
            ui_state: &UiState::Done,
        };
        assert_eq!(
            render(&props, Locale::en_US),
            ScreenView::PermissionsButton {
                label: PERMISSIONS_BUTTON_LABEL.into(),
                permissions: perms.clone(),
            }
        );
    }

    #[test]
    fn granted_renders_rows_in_order() {
        let app = AppInfo {
            package_name: "com.app.x".into(),
            app_label: "X".into(),
            icon: Some(AppIcon::new(vec![7])),
        };
        let readings = vec![
            reading("r1", 120.0, 80.0, Some(app)),
            reading("r2", 133.7, 88.2, None),
        ];
        let error = UiState::error(ProviderError::Remote("down".into()));
        let props = ScreenProps {
            permissions: &permissions(),
            permissions_granted: true,
            readings: &readings,
            ui_state: &error,
        };

        let ScreenView::ReadingList { rows } = render(&props, Locale::en_US) else {
            panic!("expected a reading list");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pressure, "120 / 80");
        assert_eq!(rows[0].time, "Jun 8, 2025, 6:05:09 PM");
        assert_eq!(rows[0].app_label.as_deref(), Some("X"));
        assert_eq!(rows[0].app_icon, Some(AppIcon::new(vec![7])));
        assert_eq!(rows[1].id, "r2");
        assert_eq!(rows[1].pressure, "134 / 88");
        assert!(rows[1].app_icon.is_none());
    }

    #[test]
    fn view_serializes_with_kind_tag() {
        let json = serde_json::to_value(ScreenView::Blank).unwrap();
        assert_eq!(json["kind"], "blank");
    }
}
