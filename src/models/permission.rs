use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Kind of health data a permission or record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    BloodPressure,
}

impl RecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::BloodPressure => "BLOOD_PRESSURE",
        }
    }
}

impl std::str::FromStr for RecordType {
    type Err = PermissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BLOOD_PRESSURE" => Ok(RecordType::BloodPressure),
            _ => Err(PermissionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    Read,
    Write,
}

impl AccessType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessType::Read => "READ",
            AccessType::Write => "WRITE",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown health permission: {0}")]
pub struct PermissionParseError(pub String);

/// A single grantable capability, e.g. `READ_BLOOD_PRESSURE`.
///
/// Crosses IPC and fixture files in its string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HealthPermission {
    pub access: AccessType,
    pub record_type: RecordType,
}

impl HealthPermission {
    pub fn read(record_type: RecordType) -> Self {
        Self {
            access: AccessType::Read,
            record_type,
        }
    }

    pub fn write(record_type: RecordType) -> Self {
        Self {
            access: AccessType::Write,
            record_type,
        }
    }
}

impl std::fmt::Display for HealthPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.access.as_str(), self.record_type.as_str())
    }
}

impl std::str::FromStr for HealthPermission {
    type Err = PermissionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |access: AccessType, rest: &str| {
            rest.parse::<RecordType>().ok().map(|record_type| Self {
                access,
                record_type,
            })
        };
        let parsed = if let Some(rest) = s.strip_prefix("READ_") {
            parse(AccessType::Read, rest)
        } else if let Some(rest) = s.strip_prefix("WRITE_") {
            parse(AccessType::Write, rest)
        } else {
            None
        };
        parsed.ok_or_else(|| PermissionParseError(s.to_string()))
    }
}

impl TryFrom<String> for HealthPermission {
    type Error = PermissionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HealthPermission> for String {
    fn from(permission: HealthPermission) -> Self {
        permission.to_string()
    }
}

/// Immutable set of permissions requested or granted together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<HealthPermission>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, permission: &HealthPermission) -> bool {
        self.0.contains(permission)
    }

    /// True when every permission in `required` is present in `self`.
    pub fn contains_all(&self, required: &PermissionSet) -> bool {
        required.0.is_subset(&self.0)
    }

    pub fn union(&self, other: &PermissionSet) -> PermissionSet {
        PermissionSet(self.0.union(&other.0).copied().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<HealthPermission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = HealthPermission>>(iter: I) -> Self {
        PermissionSet(iter.into_iter().collect())
    }
}
