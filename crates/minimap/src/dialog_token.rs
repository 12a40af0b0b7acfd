// Chunk: docs/chunks/minimap_settings - Single-owner settings dialog
//!
//! Single ownership of the settings dialog.
//!
//! Several list instances can share a page, but only one settings dialog
//! may be open. An instance claims the dialog before opening it and releases
//! it when closing or tearing down. A release by a non-owner is a no-op, so
//! a stale instance can never close another instance's dialog.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::trace;

/// Identifies one list instance for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

impl InstanceId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// A claim/release token with at most one owner.
#[derive(Debug, Default)]
pub struct DialogOwnership {
    owner: Mutex<Option<InstanceId>>,
}

/// The process-wide settings dialog token.
pub static SETTINGS_DIALOG: DialogOwnership = DialogOwnership::new();

impl DialogOwnership {
    pub const fn new() -> Self {
        Self {
            owner: Mutex::new(None),
        }
    }

    /// Claims the token for `id`.
    ///
    /// Succeeds if the token is free or already held by `id`.
    pub fn claim(&self, id: InstanceId) -> bool {
        let mut owner = self.owner.lock().unwrap_or_else(PoisonError::into_inner);
        match *owner {
            Some(current) if current != id => false,
            _ => {
                *owner = Some(id);
                trace!(instance = id.get(), "claimed settings dialog");
                true
            }
        }
    }

    /// Releases the token if `id` holds it. Returns true if it did.
    pub fn release(&self, id: InstanceId) -> bool {
        let mut owner = self.owner.lock().unwrap_or_else(PoisonError::into_inner);
        if *owner == Some(id) {
            *owner = None;
            trace!(instance = id.get(), "released settings dialog");
            true
        } else {
            false
        }
    }

    pub fn owner(&self) -> Option<InstanceId> {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_held_by(&self, id: InstanceId) -> bool {
        self.owner() == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_ids_unique() {
        let a = InstanceId::next();
        let b = InstanceId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_single_owner() {
        let token = DialogOwnership::new();
        let a = InstanceId::next();
        let b = InstanceId::next();

        assert!(token.claim(a));
        assert!(token.claim(a));
        assert!(!token.claim(b));
        assert_eq!(token.owner(), Some(a));
    }

    #[test]
    fn test_non_owner_release_is_noop() {
        let token = DialogOwnership::new();
        let a = InstanceId::next();
        let b = InstanceId::next();

        token.claim(a);
        assert!(!token.release(b));
        assert!(token.is_held_by(a));

        assert!(token.release(a));
        assert!(token.claim(b));
    }
}
