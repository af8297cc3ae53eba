use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes settlement runs per payroll id inside this process.
///
/// The row lock taken by the settlement transaction covers other processes,
/// this one only orders requests reaching the same instance.
#[derive(Default)]
pub struct PayrollLocks {
    locks: DashMap<i32, Arc<Mutex<()>>>,
}

/// Held for the duration of one settlement
pub struct PayrollGuard<'a> {
    locks: &'a DashMap<i32, Arc<Mutex<()>>>,
    id: i32,
    guard: Option<OwnedMutexGuard<()>>,
}

impl PayrollLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, id: i32) -> PayrollGuard<'_> {
        let lock = self.locks.entry(id).or_default().clone();

        PayrollGuard {
            locks: &self.locks,
            id,
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}

impl Drop for PayrollGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        // Only the map itself still references an idle lock
        self.locks.remove_if(&self.id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
