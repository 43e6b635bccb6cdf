//! Shared handle to the coordinator
//!
//! Mutations are serialized by one mutex. After each mutation the new
//! snapshot is published through an `ArcSwap`, so readers never touch the
//! lock. Callers must not perform I/O inside `update`.

use crate::{
    coordinator::PlaybackCoordinator, error::Result, events::PlaybackEvent, types::Transition,
};
use arc_swap::ArcSwap;
use mooseek_core::PlaybackSnapshot;
use std::sync::{Arc, Mutex, PoisonError};

struct Inner {
    coordinator: Mutex<PlaybackCoordinator>,
    snapshot: ArcSwap<PlaybackSnapshot>,
}

/// Cloneable handle passed to HTTP handlers and the sync hub
#[derive(Clone)]
pub struct SharedCoordinator {
    inner: Arc<Inner>,
}

impl SharedCoordinator {
    pub fn new(coordinator: PlaybackCoordinator) -> Self {
        let snapshot = ArcSwap::from_pointee(coordinator.snapshot());
        Self {
            inner: Arc::new(Inner {
                coordinator: Mutex::new(coordinator),
                snapshot,
            }),
        }
    }

    /// Latest published snapshot (lock-free)
    pub fn snapshot(&self) -> Arc<PlaybackSnapshot> {
        self.inner.snapshot.load_full()
    }

    /// Run `f` under the lock and publish the resulting snapshot
    pub fn update<R>(
        &self,
        f: impl FnOnce(&mut PlaybackCoordinator) -> R,
    ) -> (R, Arc<PlaybackSnapshot>) {
        let mut coordinator = self
            .inner
            .coordinator
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let result = f(&mut coordinator);

        let snapshot = Arc::new(coordinator.snapshot());
        self.inner.snapshot.store(Arc::clone(&snapshot));
        (result, snapshot)
    }

    /// Dispatch one event and publish
    pub fn dispatch(&self, event: PlaybackEvent) -> (Result<Transition>, Arc<PlaybackSnapshot>) {
        self.update(|coordinator| coordinator.dispatch(event))
    }

    /// Read coordinator state that is not part of the snapshot (queue contents, library)
    pub fn read<R>(&self, f: impl FnOnce(&PlaybackCoordinator) -> R) -> R {
        let coordinator = self
            .inner
            .coordinator
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&coordinator)
    }
}
