use crate::persistence::KeyValueStore;
use crate::store::SprintStore;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// A store handle that can be cloned across threads.
///
/// Readers share the lock; every mutator runs under the write lock, so the
/// write-through to storage happens one mutation at a time.
pub struct SharedStore<S> {
    store: Arc<RwLock<SprintStore<S>>>,
}

impl<S> Clone for SharedStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> SharedStore<S> {
    pub fn new(store: SprintStore<S>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub fn with_shared(store: Arc<RwLock<SprintStore<S>>>) -> Self {
        Self { store }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, SprintStore<S>> {
        self.store.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, SprintStore<S>> {
        self.store.write()
    }

    pub fn with_read<R>(&self, f: impl FnOnce(&SprintStore<S>) -> R) -> R {
        let guard = self.store.read();
        f(&guard)
    }

    pub fn with_write<R>(&self, f: impl FnOnce(&mut SprintStore<S>) -> R) -> R {
        let mut guard = self.store.write();
        f(&mut guard)
    }
}
