//! Request dispatch: the seam between the session and the async runtime
//!
//! The session describes what it wants sent as an [`OutboundRequest`] and
//! hands it to a [`Dispatch`] implementation. The production dispatcher
//! spawns the request on a Tokio runtime and posts the completion back
//! through the [`AsyncBridge`].

use crate::app::types::{RequestTicket, Surface};
use crate::services::async_bridge::{AsyncBridge, AsyncMessage};
use crate::services::file_commands::FileCommand;
use crate::services::transport::{Transport, TransportError, TransportRequest};
use std::sync::{mpsc, Arc};

/// A request on its way out, plus what is needed to route its completion
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundRequest {
    /// Race-sensitive evaluation whose result goes to `surface`
    Evaluate {
        surface: Surface,
        ticket: RequestTicket,
        request: TransportRequest,
    },
    /// Script-store command
    File {
        command: FileCommand,
        request: TransportRequest,
    },
    /// Example source fetch
    Example {
        name: String,
        request: TransportRequest,
    },
}

impl OutboundRequest {
    pub fn transport_request(&self) -> &TransportRequest {
        match self {
            OutboundRequest::Evaluate { request, .. }
            | OutboundRequest::File { request, .. }
            | OutboundRequest::Example { request, .. } => request,
        }
    }

    /// The completion message for this request
    pub fn complete(self, result: Result<String, TransportError>) -> AsyncMessage {
        match self {
            OutboundRequest::Evaluate {
                surface, ticket, ..
            } => AsyncMessage::EvaluationFinished {
                surface,
                ticket,
                result,
            },
            OutboundRequest::File { command, .. } => {
                AsyncMessage::FileCommandFinished { command, result }
            }
            OutboundRequest::Example { name, .. } => AsyncMessage::ExampleFetched { name, result },
        }
    }
}

/// Sends requests without blocking the caller
pub trait Dispatch {
    fn dispatch(&self, request: OutboundRequest);
}

/// Dispatcher that runs requests on a Tokio runtime
pub struct RuntimeDispatcher {
    runtime: tokio::runtime::Handle,
    transport: Arc<dyn Transport>,
    sender: mpsc::Sender<AsyncMessage>,
}

impl RuntimeDispatcher {
    pub fn new(
        runtime: tokio::runtime::Handle,
        transport: Arc<dyn Transport>,
        async_bridge: &AsyncBridge,
    ) -> Self {
        Self {
            runtime,
            transport,
            sender: async_bridge.sender(),
        }
    }
}

impl Dispatch for RuntimeDispatcher {
    fn dispatch(&self, request: OutboundRequest) {
        let transport = self.transport.clone();
        let sender = self.sender.clone();

        self.runtime.spawn(async move {
            let result = transport.send(request.transport_request().clone()).await;
            if let Err(e) = &result {
                tracing::debug!("Request to {} failed: {}", request.transport_request().url, e);
            }
            if sender.send(request.complete(result)).is_err() {
                tracing::debug!("Session loop gone, dropping completion");
            }
        });
    }
}
