//! Per-user keyed mutex registry (spec.md §5): serializes mutating
//! operations for a given user without taking a single global lock. The
//! teacher workspace has no concurrency layer to draw on (its CLI is
//! single-user, single-threaded), so this borrows the `Arc<DashMap<K,
//! Arc<Mutex<_>>>>` keyed-entry pattern from the `knhk-workflow-engine`
//! case/spec stores, narrowed here to `parking_lot::Mutex` since this
//! service is synchronous rather than async.

use dashmap::DashMap;
use parking_lot::Mutex;
use sched_core::UserId;
use std::sync::Arc;

/// Lazily-created, per-user `Mutex<()>` registry. Holding the guard for the
/// duration of a mutating operation (generate/reset/insert_break/tracker
/// patches) is what spec.md §5 calls "serialized, not transactional":
/// concurrent operations for the *same* user queue behind each other;
/// different users never contend.
#[derive(Default)]
pub struct UserLockRegistry {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `user_id`.
    pub fn with_lock<T>(&self, user_id: UserId, f: impl FnOnce() -> T) -> T {
        let lock = self.locks.entry(user_id).or_insert_with(|| Arc::new(Mutex::new(()))).clone();
        let _guard = lock.lock();
        f()
    }
}
