//! Per-token serialisation of the relay's read-merge-write cycle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Keyed async mutex; two requests for the same token never interleave.
///
/// Only covers requests handled by this process.
#[derive(Clone, Default)]
pub struct TokenLocks {
    slots: Arc<Mutex<HashMap<String, Weak<AsyncMutex<()>>>>>,
}

impl TokenLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `token`'s stored snapshot
    pub async fn acquire(&self, token: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.retain(|_, slot| slot.strong_count() > 0);
            if let Some(slot) = slots.get(token).and_then(Weak::upgrade) {
                slot
            } else {
                let slot = Arc::new(AsyncMutex::new(()));
                slots.insert(token.to_string(), Arc::downgrade(&slot));
                slot
            }
        };
        slot.lock_owned().await
    }

    /// Tokens with a live lock
    pub fn active(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.strong_count() > 0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_token_is_exclusive() {
        let locks = TokenLocks::new();
        let guard = locks.acquire("a").await;

        let contender = locks.clone();
        let blocked = tokio::time::timeout(Duration::from_millis(50), contender.acquire("a")).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(50), locks.acquire("a")).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn different_tokens_do_not_block() {
        let locks = TokenLocks::new();
        let _a = locks.acquire("a").await;
        let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire("b")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn released_locks_are_forgotten() {
        let locks = TokenLocks::new();
        drop(locks.acquire("a").await);
        assert_eq!(locks.active(), 0);
    }
}
