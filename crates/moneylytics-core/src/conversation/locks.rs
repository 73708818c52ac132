//! Per-user serialization
//!
//! Handling an utterance reads the conversation state, acts, then writes the
//! state back. Two utterances from the same user must not interleave those
//! steps, so each user id gets its own mutex. Different users never wait on
//! each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding `user_id`'s lock
    pub fn with_user<T>(&self, user_id: i64, f: impl FnOnce() -> T) -> T {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(user_id).or_default())
        };

        let result = {
            // A panic while handling an earlier utterance must not wedge the user
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };

        // Clones are only taken under the map lock, so a count of 2 (map + ours)
        // means nobody else holds or waits on this entry
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&user_id);
        }

        result
    }

    /// Number of users with a live lock entry
    pub fn active(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
