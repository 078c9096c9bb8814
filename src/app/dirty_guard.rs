//! Unsaved-changes guard
//!
//! Destructive actions (new script, load example, open the load picker)
//! would replace the buffer. When the buffer differs from the baseline the
//! action is parked here until the user confirms the discard.
//!
//! There is a single pending slot. A second guarded attempt before the
//! first is confirmed replaces it; the replaced action is dropped and the
//! replacement is logged.

use crate::model::Baseline;

pub type PendingAction<C> = Box<dyn FnOnce(&mut C)>;

pub struct DirtyGuard<C> {
    baseline: Baseline,
    pending: Option<PendingAction<C>>,
}

impl<C> DirtyGuard<C> {
    /// Guard for a new, empty, unnamed script
    pub fn new() -> Self {
        Self {
            baseline: Baseline::empty(),
            pending: None,
        }
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Replace the baseline after a load, save or new script
    pub fn set_baseline(&mut self, baseline: Baseline) {
        tracing::debug!("Baseline replaced (name='{}')", baseline.name());
        self.baseline = baseline;
    }

    /// True if `content` has unsaved edits relative to the baseline
    pub fn is_dirty(&self, content: &str) -> bool {
        self.baseline.differs_from(content)
    }

    /// Park `action` until confirmation. Returns true if it replaced an
    /// earlier pending action.
    pub fn defer(&mut self, action: PendingAction<C>) -> bool {
        let replaced = self.pending.replace(action).is_some();
        if replaced {
            tracing::info!("Pending discard action replaced by a newer one");
        } else {
            tracing::debug!("Action deferred until discard is confirmed");
        }
        replaced
    }

    /// Take the pending action, leaving the slot empty
    pub fn take_pending(&mut self) -> Option<PendingAction<C>> {
        self.pending.take()
    }

    /// Forget the pending action (the user declined)
    pub fn clear_pending(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("Pending discard action dropped");
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<C> Default for DirtyGuard<C> {
    fn default() -> Self {
        Self::new()
    }
}
