// src/entries/services/user_locks.rs

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

/// One async mutex per user id. Holding the guard serializes a user's
/// entry writes and streak updates inside this process.
///
/// Idle mutexes are dropped whenever a new user id is inserted, so the map
/// tracks users with writes in flight rather than every user ever seen.
#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<RwLock<HashMap<String, Arc<Mutex<()>>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let existing = self.locks.read().await.get(user_id).cloned();

        let lock = match existing {
            Some(lock) => lock,
            None => {
                let mut locks = self.locks.write().await;
                // Only the map holds an idle lock; waiters and guards keep a clone
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
                locks
                    .entry(user_id.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .clone()
            }
        };

        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.locks.read().await.len()
    }
}
