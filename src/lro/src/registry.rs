// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Keep at most one poll sequence active per logical action.
//!
//! Applications often tie a poll sequence to a user action, e.g. "delete the
//! selected instance". If the user triggers the action again before the first
//! sequence completes, the first sequence should stop. [ActionRegistry] keeps
//! one [CancellationToken] per action key and cancels the previous token when
//! a new sequence begins.
//!
//! # Example
//! ```
//! # use compute_ops_lro::registry::ActionRegistry;
//! let registry = ActionRegistry::new();
//! let first = registry.begin("delete-instance");
//! let second = registry.begin("delete-instance");
//! assert!(first.token().is_cancelled());
//! assert!(!second.token().is_cancelled());
//! drop(first);
//! assert!(registry.is_active(&"delete-instance"));
//! drop(second);
//! assert!(!registry.is_active(&"delete-instance"));
//! ```

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

type Slots<K> = Arc<Mutex<HashMap<K, Slot>>>;

#[derive(Debug)]
struct Slot {
    generation: u64,
    token: CancellationToken,
}

/// A single-slot map from action keys to in-flight poll sequences.
///
/// Cloning the registry is cheap, clones share the same slots.
#[derive(Debug)]
pub struct ActionRegistry<K> {
    slots: Slots<K>,
    generation: Arc<std::sync::atomic::AtomicU64>,
}

impl<K> Clone for ActionRegistry<K> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<K> Default for ActionRegistry<K> {
    fn default() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            generation: Arc::new(std::sync::atomic::AtomicU64::new(0)),
        }
    }
}

impl<K> ActionRegistry<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new sequence for `key`.
    ///
    /// Cancels the sequence previously registered for `key`, if any. The
    /// returned guard holds the token for the new sequence, and releases the
    /// slot when dropped.
    pub fn begin(&self, key: K) -> ActionGuard<K> {
        let generation = self
            .generation
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let token = CancellationToken::new();
        let previous = lock(&self.slots).insert(
            key.clone(),
            Slot {
                generation,
                token: token.clone(),
            },
        );
        if let Some(previous) = previous {
            tracing::debug!(
                generation = previous.generation,
                "cancelling superseded poll sequence"
            );
            previous.token.cancel();
        }
        ActionGuard {
            slots: self.slots.clone(),
            key,
            generation,
            token,
        }
    }

    /// Cancels the sequence registered for `key`.
    ///
    /// Returns `false` if there was no such sequence.
    pub fn cancel(&self, key: &K) -> bool {
        match lock(&self.slots).remove(key) {
            Some(slot) => {
                slot.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Returns true if a sequence is registered for `key`.
    pub fn is_active(&self, key: &K) -> bool {
        lock(&self.slots).contains_key(key)
    }
}

/// The registration of an in-flight sequence.
///
/// Dropping the guard releases the slot, unless a newer sequence replaced it.
#[derive(Debug)]
pub struct ActionGuard<K>
where
    K: Eq + Hash,
{
    slots: Slots<K>,
    key: K,
    generation: u64,
    token: CancellationToken,
}

impl<K> ActionGuard<K>
where
    K: Eq + Hash,
{
    /// The token to give to the poller.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Returns true if this sequence was cancelled or superseded.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Releases the slot. Equivalent to dropping the guard.
    pub fn finish(self) {}
}

impl<K> Drop for ActionGuard<K>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        let mut slots = lock(&self.slots);
        if slots
            .get(&self.key)
            .is_some_and(|s| s.generation == self.generation)
        {
            slots.remove(&self.key);
        }
    }
}

// The slots hold no invariants a panic could break.
fn lock<K>(slots: &Slots<K>) -> MutexGuard<'_, HashMap<K, Slot>> {
    slots.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_and_finish() {
        let registry = ActionRegistry::new();
        assert!(!registry.is_active(&"a"));
        let guard = registry.begin("a");
        assert!(registry.is_active(&"a"));
        assert!(!guard.is_cancelled());
        guard.finish();
        assert!(!registry.is_active(&"a"));
    }

    #[test]
    fn begin_cancels_previous() {
        let registry = ActionRegistry::new();
        let first = registry.begin("a");
        let other = registry.begin("b");
        let second = registry.begin("a");
        assert!(first.is_cancelled());
        assert!(!other.is_cancelled());
        assert!(!second.is_cancelled());

        // The superseded guard does not release the newer registration.
        drop(first);
        assert!(registry.is_active(&"a"));
        drop(second);
        assert!(!registry.is_active(&"a"));
        assert!(registry.is_active(&"b"));
    }

    #[test]
    fn cancel() {
        let registry = ActionRegistry::new();
        assert!(!registry.cancel(&"a"));
        let guard = registry.begin("a");
        assert!(registry.cancel(&"a"));
        assert!(guard.is_cancelled());
        assert!(!registry.is_active(&"a"));
        assert!(!registry.cancel(&"a"));
    }

    #[test]
    fn clones_share_slots() {
        let registry = ActionRegistry::new();
        let clone = registry.clone();
        let guard = registry.begin(String::from("delete-disk"));
        assert!(clone.is_active(&"delete-disk".to_string()));
        assert!(clone.cancel(&"delete-disk".to_string()));
        assert!(guard.is_cancelled());
    }

    #[tokio::test]
    async fn token_wakes_waiters() {
        let registry = ActionRegistry::new();
        let first = registry.begin(1);
        let token = first.token();
        let waiter = tokio::spawn(async move { token.cancelled().await });
        let _second = registry.begin(1);
        waiter.await.expect("waiter task should complete");
    }
}
