//! Async Bridge: Communication between the Tokio runtime and the session loop
//!
//! - Tokio runtime performs the network requests
//! - The session stays synchronous and is the only writer of its state
//! - std::sync::mpsc channels carry completions back to the session loop
//!
//! Completions may arrive in any order. The bridge does not reorder them;
//! the session's race resolver decides what gets applied.

use crate::app::types::{RequestTicket, Surface};
use crate::services::file_commands::FileCommand;
use crate::services::transport::TransportError;
use std::sync::mpsc;

/// Messages sent from async tasks to the synchronous session loop
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncMessage {
    /// An evaluation request finished
    EvaluationFinished {
        surface: Surface,
        ticket: RequestTicket,
        result: Result<String, TransportError>,
    },

    /// A script-store command finished
    FileCommandFinished {
        command: FileCommand,
        result: Result<String, TransportError>,
    },

    /// An example's source was fetched
    ExampleFetched {
        name: String,
        result: Result<String, TransportError>,
    },
}

/// Bridge between the async runtime and the sync session loop
///
/// Design:
/// - Lightweight, cloneable sender that can be passed to async tasks
/// - Non-blocking receiver drained by the session loop
#[derive(Clone)]
pub struct AsyncBridge {
    sender: mpsc::Sender<AsyncMessage>,
    // Receiver wrapped in Arc<Mutex<>> to allow cloning
    receiver: std::sync::Arc<std::sync::Mutex<mpsc::Receiver<AsyncMessage>>>,
}

impl AsyncBridge {
    /// Create a new async bridge with an unbounded channel
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver: std::sync::Arc::new(std::sync::Mutex::new(receiver)),
        }
    }

    /// Get a cloneable sender for async tasks
    pub fn sender(&self) -> mpsc::Sender<AsyncMessage> {
        self.sender.clone()
    }

    /// Try to receive pending messages (non-blocking)
    pub fn try_recv_all(&self) -> Vec<AsyncMessage> {
        let mut messages = Vec::new();

        if let Ok(receiver) = self.receiver.lock() {
            while let Ok(msg) = receiver.try_recv() {
                messages.push(msg);
            }
        }

        messages
    }

    /// Wait up to `timeout` for the next message
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<AsyncMessage> {
        let receiver = self.receiver.lock().ok()?;
        receiver.recv_timeout(timeout).ok()
    }
}

impl Default for AsyncBridge {
    fn default() -> Self {
        Self::new()
    }
}
