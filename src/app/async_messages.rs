//! Async message handlers for the Session
//!
//! Completions arrive in whatever order the network delivers them. Each one
//! is handled as its own event:
//! - Evaluation results pass through the race resolver before display
//! - File-command answers are decoded by the command that produced them
//! - Failures go to the configured recovery policy

use crate::config::FailurePolicy;
use crate::services::async_bridge::AsyncMessage;
use crate::services::file_commands::FileCommand;
use crate::services::transport::TransportError;
use crate::view::ids;

use super::Session;

impl Session {
    /// Apply one completion to the session
    pub fn handle_async_message(&mut self, message: AsyncMessage) {
        match message {
            AsyncMessage::EvaluationFinished {
                surface,
                ticket,
                result,
            } => match result {
                Ok(body) => {
                    if self.resolver.admit(surface, ticket) {
                        self.write_surface(surface, body);
                    }
                }
                Err(e) => self.handle_request_failure(&e),
            },
            AsyncMessage::FileCommandFinished { command, result } => match result {
                Ok(body) => {
                    let response = command.decode(body);
                    self.apply_file_response(command, response);
                }
                Err(e) => {
                    if let FileCommand::Exists { name } = &command {
                        self.abandon_pending_save(name);
                    }
                    self.handle_request_failure(&e);
                }
            },
            AsyncMessage::ExampleFetched { name, result } => match result {
                Ok(code) => self.set_source(&name, &code),
                Err(e) => self.handle_request_failure(&e),
            },
        }
    }

    /// Recover from a failed request. The request's own handler never runs.
    fn handle_request_failure(&mut self, error: &TransportError) {
        let reload = match self.config.failure_policy {
            FailurePolicy::Reload => true,
            FailurePolicy::ErrorOverlay => false,
            FailurePolicy::Split => error.is_status(),
        };

        if reload {
            tracing::warn!("Request failed ({}), reloading", error);
            self.request_reload();
        } else {
            tracing::warn!("Request failed ({}), showing network error", error);
            self.show_overlay(ids::NETWORK_ERROR, None);
        }
    }
}
