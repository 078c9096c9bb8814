//! View layer
//!
//! The page model the session drives: element tree and overlay visibility.

pub mod element;
pub mod overlay;

pub use element::{ids, ElementId, ElementTree};
pub use overlay::{ClickOutcome, OnHide, OverlayManager, ShowToken};
