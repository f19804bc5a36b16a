//! In-process object store
//!
//! Keeps objects in a map and counts reads and writes, which makes it the
//! store of choice for pipeline tests. Individual locations can be marked
//! as denied to exercise access failures.

use super::traits::ArtifactStore;
use crate::domain::ids::{LocationId, ObjectKey};
use crate::domain::{ReportflowError, Result, StoredObjectRef};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Map-backed object store
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    denied: Mutex<HashSet<String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    delay_ms: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that sleeps before every operation, for concurrency tests
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::default()
        }
    }

    /// Seeds an object without counting it as a write
    pub fn insert(&self, location: &str, key: &str, bytes: impl Into<Vec<u8>>) {
        if let Ok(mut objects) = self.objects.lock() {
            objects.insert((location.to_string(), key.to_string()), bytes.into());
        }
    }

    /// Current contents of an object, if present
    pub fn get(&self, location: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .ok()?
            .get(&(location.to_string(), key.to_string()))
            .cloned()
    }

    /// Keys stored in a location, sorted
    pub fn keys(&self, location: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .map(|objects| {
                objects
                    .keys()
                    .filter(|(loc, _)| loc == location)
                    .map(|(_, key)| key.clone())
                    .collect()
            })
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Rejects every subsequent read and write against `location`
    pub fn deny(&self, location: &str) {
        if let Ok(mut denied) = self.denied.lock() {
            denied.insert(location.to_string());
        }
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check_access(&self, location: &LocationId, key: &ObjectKey) -> Result<()> {
        let denied = self
            .denied
            .lock()
            .map_err(|_| ReportflowError::Storage("memory store lock poisoned".to_string()))?;
        if denied.contains(location.as_str()) {
            return Err(ReportflowError::Access(format!("{location}/{key}")));
        }
        Ok(())
    }

    async fn simulate_latency(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn read(&self, location: &LocationId, key: &ObjectKey) -> Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        self.check_access(location, key)?;

        self.get(location.as_str(), key.as_str())
            .ok_or_else(|| ReportflowError::NotFound(format!("{location}/{key}")))
    }

    async fn write(
        &self,
        location: &LocationId,
        key: &ObjectKey,
        bytes: Vec<u8>,
    ) -> Result<StoredObjectRef> {
        self.simulate_latency().await;
        self.check_access(location, key)?;

        let mut objects = self
            .objects
            .lock()
            .map_err(|_| ReportflowError::Storage("memory store lock poisoned".to_string()))?;
        objects.insert((location.to_string(), key.to_string()), bytes);
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(StoredObjectRef::new(location.clone(), key.clone()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
