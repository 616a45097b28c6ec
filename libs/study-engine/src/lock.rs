//! Per-user operation serialization.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Map of per-user async locks.
///
/// Every engine operation holds the user's lock for its full duration, so
/// bucket and session read-modify-write cycles never interleave for one
/// profile. Operations on different users run in parallel.
#[derive(Default)]
pub struct ProfileLocks {
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

impl ProfileLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock_user(&self, user_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().expect("profile lock map poisoned");
            Arc::clone(locks.entry(user_id).or_default())
        };
        lock.lock_owned().await
    }
}
