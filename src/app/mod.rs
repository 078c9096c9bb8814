//! The interactive session
//!
//! [`Session`] owns every piece of per-page state: the buffer, the dirty
//! guard and its baseline, overlay visibility, the race resolver and the
//! display surfaces. It is driven by two kinds of events, user actions
//! and request completions, and handles one at a time. After each event
//! the deferred-turn queue is drained.

pub mod async_messages;
pub mod dirty_guard;
pub mod evaluation;
pub mod file_operations;
pub mod race_resolver;
pub mod scheduler;
pub mod types;

use crate::config::Config;
use crate::model::{Baseline, EditableBuffer};
use crate::services::async_bridge::AsyncBridge;
use crate::services::dispatch::{Dispatch, OutboundRequest};
use crate::view::{ids, ClickOutcome, ElementTree, OnHide, OverlayManager};
use dirty_guard::DirtyGuard;
use race_resolver::RaceResolver;
use scheduler::TurnQueue;
use std::collections::HashMap;

pub use types::{GuiValue, RequestTicket, Surface, UiAction};

/// A save waiting for the exists check or the overwrite confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PendingSave {
    pub name: String,
    pub content: String,
}

pub struct Session {
    config: Config,
    buffer: EditableBuffer,
    guard: DirtyGuard<Session>,
    overlays: OverlayManager<Session>,
    elements: ElementTree,
    resolver: RaceResolver,
    turns: TurnQueue<Session>,
    dispatcher: Box<dyn Dispatch>,

    /// Rendered content per surface
    surfaces: HashMap<Surface, String>,
    /// Surfaces changed since the last `take_surface_updates`
    updated_surfaces: Vec<Surface>,
    /// Name shown next to the editor
    filename_label: String,
    /// Filename field of the save dialog
    save_name: String,
    pending_save: Option<PendingSave>,
    reload_requested: bool,
}

impl Session {
    /// Session on the full playground page
    pub fn new(config: Config, dispatcher: Box<dyn Dispatch>) -> Self {
        Self::with_elements(config, dispatcher, ElementTree::playground_page())
    }

    /// Session on a custom page; overlays without an element never show
    pub fn with_elements(
        config: Config,
        dispatcher: Box<dyn Dispatch>,
        elements: ElementTree,
    ) -> Self {
        tracing::info!(
            "Session started (server={}, failure policy={:?})",
            config.server.base_url,
            config.failure_policy
        );
        Self {
            config,
            buffer: EditableBuffer::default(),
            guard: DirtyGuard::new(),
            overlays: OverlayManager::new(),
            elements,
            resolver: RaceResolver::new(),
            turns: TurnQueue::new(),
            dispatcher,
            surfaces: HashMap::new(),
            updated_surfaces: Vec::new(),
            filename_label: String::new(),
            save_name: String::new(),
            pending_save: None,
            reload_requested: false,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn buffer(&self) -> &EditableBuffer {
        &self.buffer
    }

    pub fn baseline(&self) -> &Baseline {
        self.guard.baseline()
    }

    pub fn is_dirty(&self) -> bool {
        self.guard.is_dirty(self.buffer.content())
    }

    pub fn has_pending_action(&self) -> bool {
        self.guard.has_pending()
    }

    pub fn visible_overlay(&self) -> Option<&str> {
        self.overlays.visible_id()
    }

    pub fn elements(&self) -> &ElementTree {
        &self.elements
    }

    pub fn surface(&self, surface: Surface) -> Option<&str> {
        self.surfaces.get(&surface).map(String::as_str)
    }

    /// Surfaces written since the last call, in write order, without repeats
    pub fn take_surface_updates(&mut self) -> Vec<Surface> {
        std::mem::take(&mut self.updated_surfaces)
    }

    pub fn filename_label(&self) -> &str {
        &self.filename_label
    }

    pub fn save_name(&self) -> &str {
        &self.save_name
    }

    /// 1-based line of the editor cursor
    pub fn cursor_line(&self) -> usize {
        self.buffer.line_number()
    }

    /// True once a failure asked for a full reload. The front end should
    /// drop this session and start a new one.
    pub fn reload_requested(&self) -> bool {
        self.reload_requested
    }

    // ------------------------------------------------------------------
    // Buffer edits (never guarded)
    // ------------------------------------------------------------------

    pub fn insert_text(&mut self, text: &str) {
        self.buffer.insert(text);
    }

    /// Overwrite the whole buffer, as a select-all paste would
    pub fn replace_text(&mut self, text: &str) {
        self.buffer.replace(text);
    }

    pub fn append_line(&mut self, line: &str) {
        self.buffer.append_line(line);
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.buffer.set_cursor(offset);
    }

    // ------------------------------------------------------------------
    // Event entry points
    // ------------------------------------------------------------------

    /// Handle a user action that did not come from a click
    pub fn perform(&mut self, action: UiAction) {
        self.apply_action(action);
        self.run_deferred();
    }

    /// Handle a click on element `target`, with the action bound to that element.
    ///
    /// The element's own handler runs first, then the global outside-click
    /// listener, then the deferred turn. Returns true if the click's default
    /// behavior was suppressed because it dismissed an overlay.
    pub fn click(&mut self, target: &str, action: Option<UiAction>) -> bool {
        let Some(element) = self.elements.find(target) else {
            tracing::warn!("Click on unknown element '{}'", target);
            return false;
        };

        if let Some(action) = action {
            self.apply_action(action);
        }

        let prevented = match self.overlays.handle_click(&self.elements, element) {
            ClickOutcome::Dismissed(on_hide) => {
                self.run_on_hide(on_hide);
                true
            }
            ClickOutcome::Inside | ClickOutcome::NoOverlay => false,
        };

        self.run_deferred();
        prevented
    }

    /// Drain completions from the bridge, one event each
    pub fn process_async_messages(&mut self, bridge: &AsyncBridge) -> usize {
        let messages = bridge.try_recv_all();
        let count = messages.len();
        for message in messages {
            self.handle_async_message(message);
            self.run_deferred();
        }
        count
    }

    fn apply_action(&mut self, action: UiAction) {
        tracing::debug!("Action: {:?}", action);
        match action {
            UiAction::RunSource => self.run_source(),
            UiAction::RunInWindow => self.run_source_in_window(),
            UiAction::UpdateGui { source, values } => self.update_by_gui(&source, &values),
            UiAction::NewScript => self.new_script(),
            UiAction::LoadExample(name) => self.load_example(name),
            UiAction::OpenLoadDialog => self.open_load_dialog(),
            UiAction::OpenSaveDialog => self.open_save_dialog(),
            UiAction::SetSaveName(name) => self.set_save_name(name),
            UiAction::SaveFromDialog => {
                let name = self.save_name.clone();
                self.save(name);
            }
            UiAction::Save(name) => self.save(name),
            UiAction::LoadFile(name) => self.load_file(name),
            UiAction::DeleteFile(name) => self.delete_file(name),
            UiAction::ConfirmDiscard => self.confirm_discard(),
            UiAction::ConfirmOverwriteFile => self.confirm_overwrite_file(),
            UiAction::Dismiss => self.hide_overlay(),
        }
    }

    /// Run deferred tasks until none are left. Tasks queued by a task run
    /// on the following turn.
    pub fn run_deferred(&mut self) {
        loop {
            let tasks = self.turns.take_turn();
            if tasks.is_empty() {
                return;
            }
            for task in tasks {
                task(self);
            }
        }
    }

    // ------------------------------------------------------------------
    // Overlays
    // ------------------------------------------------------------------

    /// Show overlay `id` on the next turn, hiding the current one now
    pub fn show_overlay(&mut self, id: &str, on_hide: Option<OnHide<Session>>) {
        let (token, previous) = self.overlays.show(id, on_hide);
        self.run_on_hide(previous);
        self.turns
            .defer(move |session: &mut Session| {
                session.overlays.activate(token, &session.elements);
            });
    }

    /// Hide the visible overlay, running its on-hide callback once
    pub fn hide_overlay(&mut self) {
        let on_hide = self.overlays.hide();
        self.run_on_hide(on_hide);
    }

    fn run_on_hide(&mut self, on_hide: Option<OnHide<Session>>) {
        if let Some(callback) = on_hide {
            callback(self);
        }
    }

    // ------------------------------------------------------------------
    // Unsaved-changes guard
    // ------------------------------------------------------------------

    /// Run `action` now if the buffer is clean, otherwise park it behind
    /// the discard confirmation.
    pub fn guarded(&mut self, action: impl FnOnce(&mut Session) + 'static) {
        if !self.is_dirty() {
            action(self);
            return;
        }

        tracing::info!("Unsaved changes, asking for confirmation");
        // Hiding an open confirmation clears the slot, so take the old action first
        let replaced = self.guard.take_pending().is_some();
        self.show_overlay(
            ids::DISCARD_CONFIRM,
            Some(Box::new(|session: &mut Session| {
                session.guard.clear_pending()
            })),
        );
        self.guard.defer(Box::new(action));
        if replaced {
            tracing::info!("Pending discard action replaced by a newer one");
        }
    }

    /// The user confirmed discarding unsaved changes
    pub fn confirm_discard(&mut self) {
        let action = self.guard.take_pending();
        self.hide_overlay();
        match action {
            Some(action) => action(self),
            None => tracing::debug!("Discard confirmed with nothing pending"),
        }
    }

    // ------------------------------------------------------------------
    // Shared plumbing
    // ------------------------------------------------------------------

    fn dispatch(&mut self, request: OutboundRequest) {
        self.dispatcher.dispatch(request);
    }

    fn write_surface(&mut self, surface: Surface, content: String) {
        self.surfaces.insert(surface, content);
        if !self.updated_surfaces.contains(&surface) {
            self.updated_surfaces.push(surface);
        }
    }

    fn request_reload(&mut self) {
        if !self.reload_requested {
            tracing::warn!("Reloading session after request failure");
        }
        self.reload_requested = true;
    }
}
