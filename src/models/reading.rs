use base64::Engine as _;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Pressure;

/// Opaque image bytes for an app icon. Crosses IPC as base64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIcon(Vec<u8>);

impl AppIcon {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.0)
    }

    pub fn from_base64(encoded: &str) -> Result<Self, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map(Self)
    }
}

impl Serialize for AppIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for AppIcon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        AppIcon::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

/// Display metadata for an app that writes health data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppInfo {
    pub package_name: String,
    pub app_label: String,
    pub icon: Option<AppIcon>,
}

/// A blood pressure reading ready for display.
///
/// `systolic >= diastolic` is expected but not checked; values are passed
/// through exactly as the provider returned them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPressureReading {
    pub id: String,
    pub systolic: Pressure,
    pub diastolic: Pressure,
    pub time: DateTime<FixedOffset>,
    pub source_app_info: Option<AppInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_round_trips_through_json() {
        let icon = AppIcon::new(vec![0x89, b'P', b'N', b'G']);
        let json = serde_json::to_string(&icon).unwrap();
        assert_eq!(json, "\"iVBORw==\"");
        let back: AppIcon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, icon);
    }

    #[test]
    fn invalid_base64_icon_rejected() {
        let result: Result<AppIcon, _> = serde_json::from_str("\"not base64!\"");
        assert!(result.is_err());
    }

    #[test]
    fn app_info_without_icon() {
        let info: AppInfo =
            serde_json::from_str(r#"{"package_name":"com.app.x","app_label":"X","icon":null}"#)
                .unwrap();
        assert_eq!(info.app_label, "X");
        assert!(info.icon.is_none());
    }
}
