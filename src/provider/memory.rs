//! In-process provider backed by plain collections.
//!
//! Used by the desktop shell (seeded from a fixture file) and by tests,
//! which need to script failures and inspect what was asked of the provider.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::{HealthDataProvider, ProviderError, TimeRange};
use crate::models::{AppInfo, BloodPressureRecord, PermissionSet};

pub struct InMemoryProvider {
    records: Mutex<Vec<BloodPressureRecord>>,
    granted: Mutex<PermissionSet>,
    /// Whether `request_permissions` grants what was asked.
    grant_on_request: bool,
    apps: HashMap<String, AppInfo>,
    /// Failures handed out, in order, by the next read calls.
    read_failures: Mutex<VecDeque<ProviderError>>,
    read_calls: AtomicUsize,
    last_read_range: Mutex<Option<TimeRange>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            granted: Mutex::new(PermissionSet::new()),
            grant_on_request: true,
            apps: HashMap::new(),
            read_failures: Mutex::new(VecDeque::new()),
            read_calls: AtomicUsize::new(0),
            last_read_range: Mutex::new(None),
        }
    }

    pub fn with_records(mut self, records: Vec<BloodPressureRecord>) -> Self {
        self.records = Mutex::new(records);
        self
    }

    pub fn with_granted(mut self, granted: PermissionSet) -> Self {
        self.granted = Mutex::new(granted);
        self
    }

    pub fn with_app(mut self, info: AppInfo) -> Self {
        self.apps.insert(info.package_name.clone(), info);
        self
    }

    pub fn grant_on_request(mut self, grant: bool) -> Self {
        self.grant_on_request = grant;
        self
    }

    /// Make the next read fail with `error`. Queued failures are consumed
    /// one per read call.
    pub fn fail_next_read(&self, error: ProviderError) -> Result<(), ProviderError> {
        lock(&self.read_failures)?.push_back(error);
        Ok(())
    }

    /// Number of read calls made so far, failed ones included.
    pub fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    pub fn last_read_range(&self) -> Option<TimeRange> {
        self.last_read_range.lock().ok().and_then(|guard| *guard)
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, ProviderError> {
    mutex
        .lock()
        .map_err(|_| ProviderError::IllegalState("provider lock poisoned".into()))
}

#[async_trait]
impl HealthDataProvider for InMemoryProvider {
    async fn has_all_permissions(
        &self,
        permissions: &PermissionSet,
    ) -> Result<bool, ProviderError> {
        Ok(lock(&self.granted)?.contains_all(permissions))
    }

    async fn request_permissions(
        &self,
        permissions: &PermissionSet,
    ) -> Result<PermissionSet, ProviderError> {
        let mut granted = lock(&self.granted)?;
        if self.grant_on_request {
            *granted = granted.union(permissions);
        }
        tracing::debug!(
            requested = permissions.len(),
            granted = granted.len(),
            "Permission request handled"
        );
        Ok(granted.clone())
    }

    async fn read_blood_pressure_records(
        &self,
        range: TimeRange,
    ) -> Result<Vec<BloodPressureRecord>, ProviderError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_read_range)? = Some(range);

        if let Some(error) = lock(&self.read_failures)?.pop_front() {
            return Err(error);
        }

        let records = lock(&self.records)?;
        Ok(records
            .iter()
            .filter(|record| range.contains(record.time))
            .cloned()
            .collect())
    }

    fn compatible_apps(&self) -> HashMap<String, AppInfo> {
        self.apps.clone()
    }
}
