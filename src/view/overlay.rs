//! Modal overlay exclusivity
//!
//! At most one overlay (confirmation, picker, error notice) is visible at a
//! time. The manager is a small state machine:
//!
//! - `Hidden`: nothing visible, possibly one activation pending
//! - `Visible(handle)`: one overlay visible, with an optional one-shot
//!   on-hide callback
//!
//! Showing is split in two steps. [`OverlayManager::show`] hides whatever
//! is visible and records a pending activation; the owner schedules
//! [`OverlayManager::activate`] for the next turn, after the event that
//! triggered the show has finished dispatching. Otherwise the global
//! outside-click check would see the same click and dismiss the overlay
//! that click just opened.
//!
//! Callbacks are never run by the manager itself. Operations that end a
//! visible overlay hand its callback back to the caller, which runs it
//! with full access to its own state (the callback usually needs the same
//! context that owns the manager).

use super::element::{ElementId, ElementTree};

/// One-shot callback run when an overlay is hidden
pub type OnHide<C> = Box<dyn FnOnce(&mut C)>;

/// Identifies one `show` request; only the latest one can activate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowToken(u64);

struct ActiveOverlay<C> {
    id: String,
    element: ElementId,
    on_hide: Option<OnHide<C>>,
}

struct PendingShow<C> {
    token: ShowToken,
    id: String,
    on_hide: Option<OnHide<C>>,
}

/// Result of a click seen by the outside-click listener
pub enum ClickOutcome<C> {
    /// No overlay visible; the click proceeds normally
    NoOverlay,
    /// The click landed on the visible overlay or inside it
    Inside,
    /// The click landed outside: the overlay was hidden and the click's
    /// default behavior must be suppressed. Carries the overlay's callback.
    Dismissed(Option<OnHide<C>>),
}

/// Single-owner overlay visibility
pub struct OverlayManager<C> {
    visible: Option<ActiveOverlay<C>>,
    pending: Option<PendingShow<C>>,
    next_token: u64,
}

impl<C> OverlayManager<C> {
    pub fn new() -> Self {
        Self {
            visible: None,
            pending: None,
            next_token: 0,
        }
    }

    /// Id of the visible overlay
    pub fn visible_id(&self) -> Option<&str> {
        self.visible.as_ref().map(|o| o.id.as_str())
    }

    pub fn is_visible(&self) -> bool {
        self.visible.is_some()
    }

    /// Id of the overlay waiting for activation
    pub fn pending_id(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.id.as_str())
    }

    /// Request that overlay `id` becomes visible on the next turn.
    ///
    /// Hides the visible overlay first and returns its callback, which the
    /// caller must run before anything else. A pending activation from an
    /// earlier `show` is superseded; its callback is dropped unrun because
    /// that overlay was never visible.
    pub fn show(&mut self, id: &str, on_hide: Option<OnHide<C>>) -> (ShowToken, Option<OnHide<C>>) {
        let previous = self.hide();

        let token = ShowToken(self.next_token);
        self.next_token += 1;
        if let Some(superseded) = self.pending.replace(PendingShow {
            token,
            id: id.to_string(),
            on_hide,
        }) {
            tracing::debug!(
                "Overlay '{}' superseded by '{}' before activation",
                superseded.id,
                id
            );
        }
        tracing::debug!("Overlay '{}' scheduled for activation", id);

        (token, previous)
    }

    /// Second half of [`show`](Self::show), run on the turn after it.
    ///
    /// Does nothing if the request was superseded or cancelled, or if the
    /// page has no element for the overlay id. Returns true if the overlay
    /// is now visible.
    pub fn activate(&mut self, token: ShowToken, elements: &ElementTree) -> bool {
        let Some(pending) = self.pending.take_if(|p| p.token == token) else {
            return false;
        };

        match elements.find(&pending.id) {
            Some(element) => {
                tracing::debug!("Overlay '{}' visible", pending.id);
                self.visible = Some(ActiveOverlay {
                    id: pending.id,
                    element,
                    on_hide: pending.on_hide,
                });
                true
            }
            None => {
                tracing::warn!("No element for overlay '{}', staying hidden", pending.id);
                false
            }
        }
    }

    /// Hide the visible overlay and return its callback for the caller to
    /// run exactly once. Also cancels a pending activation. No-op when
    /// nothing is visible or pending.
    #[must_use = "the returned on-hide callback must be run"]
    pub fn hide(&mut self) -> Option<OnHide<C>> {
        if let Some(pending) = self.pending.take() {
            tracing::debug!("Pending overlay '{}' cancelled", pending.id);
        }
        let overlay = self.visible.take()?;
        tracing::debug!("Overlay '{}' hidden", overlay.id);
        overlay.on_hide
    }

    /// Outside-click listener: called for every click on the page
    pub fn handle_click(&mut self, elements: &ElementTree, target: ElementId) -> ClickOutcome<C> {
        let Some(overlay) = self.visible.as_ref() else {
            return ClickOutcome::NoOverlay;
        };

        if elements.is_within(target, overlay.element) {
            return ClickOutcome::Inside;
        }

        tracing::debug!("Click outside overlay '{}', dismissing", overlay.id);
        ClickOutcome::Dismissed(self.hide())
    }
}

impl<C> Default for OverlayManager<C> {
    fn default() -> Self {
        Self::new()
    }
}
