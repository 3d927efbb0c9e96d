use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
    time::SystemTime,
};

use tokio::sync::{Mutex, MutexGuard};
use vigil_model::{ExecutorEndpoint, JobContext, JobIdentity};

use crate::launcher::ExecutorHandle;

/// Executor currently owned by the supervisor.
///
/// Entries are immutable; a change (e.g. new job parameters) replaces the entry
/// and keeps the same handle.
pub struct RegisteredExecutor {
    pub endpoint: ExecutorEndpoint,
    pub job: JobContext,
    pub launcher: &'static str,
    pub handle: Arc<dyn ExecutorHandle>,
    pub started_at: SystemTime,
}

impl RegisteredExecutor {
    /// Copy of this entry carrying `job` instead.
    pub fn with_job(&self, job: JobContext) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            job,
            launcher: self.launcher,
            handle: Arc::clone(&self.handle),
            started_at: self.started_at,
        }
    }
}

/// Per-identity slot.
///
/// `gate` serialises launches and teardowns of one job; reads of `entry` never
/// wait on it, so liveness checks stay cheap while a launch is in flight.
#[derive(Default)]
pub struct ExecutorSlot {
    gate: Mutex<()>,
    entry: RwLock<Option<Arc<RegisteredExecutor>>>,
}

impl ExecutorSlot {
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.gate.lock().await
    }

    pub fn current(&self) -> Option<Arc<RegisteredExecutor>> {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, executor: RegisteredExecutor) -> Arc<RegisteredExecutor> {
        let executor = Arc::new(executor);
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&executor));
        executor
    }

    pub fn clear(&self) -> Option<Arc<RegisteredExecutor>> {
        self.entry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Job identity -> live executor map of one supervisor.
///
/// The outer map is locked only to find or create a slot, so operations on
/// distinct identities do not contend.
#[derive(Clone, Default)]
pub struct ExecutorRegistry {
    slots: Arc<RwLock<HashMap<JobIdentity, Arc<ExecutorSlot>>>>,
}

impl ExecutorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot for `job`, created on first use.
    pub fn slot(&self, job: JobIdentity) -> Arc<ExecutorSlot> {
        if let Some(slot) = self.existing_slot(job) {
            return slot;
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(job).or_default())
    }

    /// Slot for `job` without creating one.
    pub fn existing_slot(&self, job: JobIdentity) -> Option<Arc<ExecutorSlot>> {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&job)
            .cloned()
    }

    /// Executor registered for `job`, if any.
    pub fn get(&self, job: JobIdentity) -> Option<Arc<RegisteredExecutor>> {
        self.existing_slot(job).and_then(|slot| slot.current())
    }

    /// Executor registered for `job` whose endpoint carries `identifier`.
    pub fn get_matching(&self, job: JobIdentity, identifier: &str) -> Option<Arc<RegisteredExecutor>> {
        self.get(job)
            .filter(|entry| entry.endpoint.identifier == identifier)
    }

    /// Scan for an executor by identifier alone.
    pub fn find_by_identifier(&self, identifier: &str) -> Option<Arc<RegisteredExecutor>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .values()
            .filter_map(|slot| slot.current())
            .find(|entry| entry.endpoint.identifier == identifier)
    }

    /// Drop the slot of `job` if it is empty and nobody else holds it.
    ///
    /// Holding the map's write lock means no new reference can be handed out
    /// while the count is checked.
    pub fn prune(&self, job: JobIdentity) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let removable = slots
            .get(&job)
            .is_some_and(|slot| Arc::strong_count(slot) == 1 && slot.current().is_none());
        if removable {
            slots.remove(&job);
        }
        removable
    }

    /// All registered executors.
    pub fn list(&self) -> Vec<Arc<RegisteredExecutor>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter_map(|slot| slot.current()).collect()
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
