//! Boundary to the platform health-data service.
//!
//! The service owns storage, querying, permission enforcement and cross-app
//! aggregation. This crate only talks to it through [`HealthDataProvider`].

mod error;
pub mod fixture;
pub mod memory;
mod time_range;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::models::{AppInfo, BloodPressureRecord, PermissionSet};

pub use error::*;
pub use fixture::{load_fixture, FixtureError, FixtureFile};
pub use memory::InMemoryProvider;
pub use time_range::TimeRange;

#[async_trait]
pub trait HealthDataProvider: Send + Sync {
    /// True when every permission in `permissions` is currently granted.
    async fn has_all_permissions(&self, permissions: &PermissionSet)
        -> Result<bool, ProviderError>;

    /// Ask for `permissions` and return the set granted afterwards.
    async fn request_permissions(
        &self,
        permissions: &PermissionSet,
    ) -> Result<PermissionSet, ProviderError>;

    /// Blood pressure records inside `range`, in provider order.
    async fn read_blood_pressure_records(
        &self,
        range: TimeRange,
    ) -> Result<Vec<BloodPressureRecord>, ProviderError>;

    /// Apps known to write health data, keyed by package name.
    fn compatible_apps(&self) -> HashMap<String, AppInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_is_object_safe() {
        fn _assert_provider(_: &dyn HealthDataProvider) {}
    }
}
