//! I/O services: transport, request dispatch and the async-to-sync bridge

pub mod async_bridge;
pub mod dispatch;
pub mod file_commands;
pub mod transport;
#[cfg(feature = "runtime")]
pub mod tracing_setup;
