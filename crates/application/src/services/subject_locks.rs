//! Per-subject mutual exclusion
//!
//! Samples of one subject are processed one at a time; different subjects
//! never wait on each other.

use std::{collections::HashMap, sync::Arc};

use domain::SubjectId;
use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of async locks keyed by subject
///
/// Slots are created on first use and removed when the last holder or
/// waiter lets go.
#[derive(Debug, Default)]
pub struct SubjectLocks {
    slots: Mutex<HashMap<SubjectId, Arc<AsyncMutex<()>>>>,
}

impl SubjectLocks {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a subject
    pub async fn lock(&self, subject_id: &SubjectId) -> SubjectGuard<'_> {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(subject_id.clone()).or_default())
        };
        let guard = slot.lock_owned().await;
        SubjectGuard {
            registry: self,
            subject_id: subject_id.clone(),
            guard: Some(guard),
        }
    }

    /// Number of subjects currently holding or waiting for a lock
    #[must_use]
    pub fn active_subjects(&self) -> usize {
        self.slots.lock().len()
    }

    fn release(&self, subject_id: &SubjectId) {
        let mut slots = self.slots.lock();
        if slots
            .get(subject_id)
            .is_some_and(|slot| Arc::strong_count(slot) == 1)
        {
            slots.remove(subject_id);
        }
    }
}

/// Exclusive access to one subject, released on drop
#[derive(Debug)]
pub struct SubjectGuard<'a> {
    registry: &'a SubjectLocks,
    subject_id: SubjectId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl SubjectGuard<'_> {
    /// The locked subject
    #[must_use]
    pub const fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }
}

impl Drop for SubjectGuard<'_> {
    fn drop(&mut self) {
        // The owned guard holds a reference to the slot; drop it first.
        drop(self.guard.take());
        self.registry.release(&self.subject_id);
    }
}
