//! Per-dataset single-flight locks

use crate::domain::ids::DatasetId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of one async mutex per dataset id
///
/// Holding the guard makes a provisioning sequence a critical section for
/// its dataset id within this process.
#[derive(Debug, Default)]
pub struct ProvisionLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ProvisionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other run holds the lock for `dataset_id`
    pub async fn acquire(&self, dataset_id: &DatasetId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            locks
                .entry(dataset_id.as_str().to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_id_is_serialized() {
        let locks = Arc::new(ProvisionLocks::new());
        let id = DatasetId::new("report-dataset").unwrap();

        let guard = locks.acquire(&id).await;
        let waiter = {
            let locks = locks.clone();
            let id = id.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&id).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());
        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_distinct_ids_do_not_block() {
        let locks = ProvisionLocks::new();
        let _a = locks.acquire(&DatasetId::new("a").unwrap()).await;
        let _b = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(&DatasetId::new("b").unwrap()),
        )
        .await
        .unwrap();
    }
}
