//! Evaluation requests and buffer replacement
//!
//! Everything that sends source to the remote evaluator, plus the actions
//! that replace the buffer (new script, load example) and therefore go
//! through the unsaved-changes guard.

use super::{GuiValue, Session, Surface};
use crate::model::Baseline;
use crate::services::dispatch::OutboundRequest;
use crate::services::transport::TransportRequest;

impl Session {
    /// Evaluate the buffer into the result surface
    pub fn run_source(&mut self) {
        let source = self.buffer.content().to_string();
        self.evaluate(Surface::Result, source, None);
    }

    /// Evaluate the buffer into the detached window
    pub fn run_source_in_window(&mut self) {
        let source = self.buffer.content().to_string();
        self.evaluate(Surface::Window, source, None);
    }

    /// Re-evaluate a GUI panel's source with the current control values
    pub fn update_by_gui(&mut self, source: &str, values: &[GuiValue]) {
        let gui = GuiValue::serialize_all(values);
        self.evaluate(Surface::Gui, source.to_string(), Some(gui));
    }

    /// Issue a race-sensitive evaluation request for `surface`
    fn evaluate(&mut self, surface: Surface, source: String, gui: Option<String>) {
        let ticket = self.resolver.issue();
        let url = self.config.server.url(&self.config.server.execute_path);

        let mut request = TransportRequest::new(url, self.config.timeouts.evaluation())
            .field("data", source)
            .field("ts", ticket.to_string());
        if let Some(gui) = gui {
            request = request.field("gui", gui);
        }

        tracing::debug!("Evaluating into {} (ticket={})", surface, ticket);
        self.dispatch(OutboundRequest::Evaluate {
            surface,
            ticket,
            request,
        });
    }

    /// Replace buffer and baseline with freshly loaded content and re-evaluate
    pub fn set_source(&mut self, name: &str, code: &str) {
        tracing::info!("Source replaced (name='{}', {} bytes)", name, code.len());
        self.buffer.replace(code);
        self.guard.set_baseline(Baseline::new(name, code));
        self.filename_label = name.to_string();
        self.run_source();
    }

    /// Start an empty, unnamed script
    pub fn new_script(&mut self) {
        self.guarded(|session: &mut Session| session.set_source("", ""));
    }

    /// Replace the buffer with a bundled example
    pub fn load_example(&mut self, name: String) {
        self.hide_overlay();
        self.guarded(move |session: &mut Session| session.fetch_example(name));
    }

    fn fetch_example(&mut self, name: String) {
        let url = self.config.server.url(&self.config.server.examples_path);
        let request =
            TransportRequest::new(url, self.config.timeouts.file()).field("data", name.clone());
        tracing::debug!("Fetching example '{}'", name);
        self.dispatch(OutboundRequest::Example { name, request });
    }
}
