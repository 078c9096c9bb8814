//! Session synchronization core of a remote-evaluated code playground
//!
//! The [`app::Session`] keeps the editor buffer, overlays and display
//! surfaces consistent while requests to the evaluator and the script
//! store complete in arbitrary order.

pub mod app;
pub mod config;
pub mod model;
pub mod services;
pub mod view;

pub use app::{Session, Surface, UiAction};
pub use config::Config;
