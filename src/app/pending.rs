//! Cross-screen filter hand-off.
//!
//! Another screen (a canteen page, say) can ask the dish list to open
//! pre-filtered. It offers the canteen here before switching tabs; the list
//! takes it on mount and on every activation. Taking clears the slot, so a
//! value is applied at most once.

use crate::domain::Canteen;
use std::sync::{Arc, Mutex, PoisonError};

/// Shared single-value slot for a pending canteen filter.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct PendingFilter {
    slot: Arc<Mutex<Option<Canteen>>>,
}

impl PendingFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `canteen`, replacing any value not yet taken.
    pub fn offer(&self, canteen: Canteen) {
        let previous = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(canteen);
        if let Some(previous) = previous {
            tracing::debug!(%previous, %canteen, "pending canteen replaced before it was taken");
        }
    }

    /// Reads and clears the slot.
    #[must_use]
    pub fn take(&self) -> Option<Canteen> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
