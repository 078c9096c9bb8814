//! Script-store flows: pickers, save with overwrite check, load, delete

use super::{PendingSave, Session, Surface};
use crate::model::Baseline;
use crate::services::dispatch::OutboundRequest;
use crate::services::file_commands::{FileCommand, FileResponse};
use crate::view::ids;

impl Session {
    /// Open the load picker. Replaces the buffer eventually, so it is guarded.
    pub fn open_load_dialog(&mut self) {
        self.guarded(|session: &mut Session| session.send_file_command(FileCommand::ListForLoad));
    }

    /// Open the save picker, pre-filling the filename with the loaded name
    pub fn open_save_dialog(&mut self) {
        self.save_name = self.guard.baseline().name().to_string();
        self.send_file_command(FileCommand::ListForSave);
    }

    /// Fill the save dialog's filename field (clicking a listed name)
    pub fn set_save_name(&mut self, name: String) {
        self.save_name = name;
    }

    /// Save the buffer under `name`, asking first if that would overwrite a
    /// stored script
    pub fn save(&mut self, name: String) {
        let name = name.trim().to_string();
        if name.is_empty() {
            tracing::warn!("Save requested without a name, ignoring");
            return;
        }

        self.save_name = name.clone();
        self.pending_save = Some(PendingSave {
            name: name.clone(),
            content: self.buffer.content().to_string(),
        });
        self.send_file_command(FileCommand::Exists { name });
    }

    /// The user agreed to overwrite the stored script
    pub fn confirm_overwrite_file(&mut self) {
        let pending = self.pending_save.take();
        self.hide_overlay();
        match pending {
            Some(PendingSave { name, content }) => {
                self.send_file_command(FileCommand::Save { name, content })
            }
            None => tracing::debug!("Overwrite confirmed with no save pending"),
        }
    }

    /// Load a stored script into the buffer
    pub fn load_file(&mut self, name: String) {
        self.send_file_command(FileCommand::Load { name });
    }

    /// Remove a stored script
    pub fn delete_file(&mut self, name: String) {
        self.send_file_command(FileCommand::Delete { name });
    }

    pub(crate) fn send_file_command(&mut self, command: FileCommand) {
        let url = self.config.server.url(&self.config.server.files_path);
        let request = command.to_request(&url, self.config.timeouts.file());
        tracing::debug!("File command '{}' {:?}", command.wire_name(), command.name());
        self.dispatch(OutboundRequest::File { command, request });
    }

    /// Apply a decoded file-command answer
    pub(crate) fn apply_file_response(&mut self, command: FileCommand, response: FileResponse) {
        match (command, response) {
            (FileCommand::ListForLoad, FileResponse::Listing(listing)) => {
                self.write_surface(Surface::LoadList, listing);
                self.show_overlay(ids::LOAD_DIALOG, None);
            }
            (FileCommand::ListForSave, FileResponse::Listing(listing)) => {
                self.write_surface(Surface::SaveList, listing);
                self.show_overlay(ids::SAVE_DIALOG, None);
            }
            (FileCommand::Exists { name }, FileResponse::Exists(exists)) => {
                self.on_exists_checked(name, exists)
            }
            (FileCommand::Save { name, content }, FileResponse::Saved(ok)) => {
                if ok {
                    tracing::info!("Saved '{}'", name);
                    self.filename_label = name.clone();
                    self.guard.set_baseline(Baseline::new(name, &content));
                    self.hide_overlay();
                } else {
                    tracing::warn!("Store refused to save '{}'", name);
                    self.show_overlay(ids::SAVE_ERROR, None);
                }
            }
            (FileCommand::Load { name }, FileResponse::Loaded(content)) => {
                self.hide_overlay();
                self.set_source(&name, &content);
            }
            (FileCommand::Delete { name }, FileResponse::Deleted(ok)) => {
                if ok {
                    tracing::info!("Deleted '{}'", name);
                    self.hide_overlay();
                } else {
                    tracing::warn!("Could not delete '{}'", name);
                    self.show_overlay(ids::DELETE_ERROR, None);
                }
            }
            (command, response) => {
                tracing::error!(
                    "Response {:?} does not match command '{}'",
                    response,
                    command.wire_name()
                );
            }
        }
    }

    fn on_exists_checked(&mut self, name: String, exists: bool) {
        let matches_pending = self
            .pending_save
            .as_ref()
            .is_some_and(|pending| pending.name == name);
        if !matches_pending {
            tracing::debug!("Ignoring exists answer for '{}', no matching save", name);
            return;
        }

        if exists {
            tracing::info!("'{}' exists, asking before overwriting", name);
            self.show_overlay(
                ids::OVERWRITE_FILE_CONFIRM,
                Some(Box::new(|session: &mut Session| {
                    session.pending_save = None;
                })),
            );
        } else if let Some(PendingSave { name, content }) = self.pending_save.take() {
            self.send_file_command(FileCommand::Save { name, content });
        }
    }

    /// The exists check for `name` failed; the save it guarded is abandoned
    pub(crate) fn abandon_pending_save(&mut self, name: &str) {
        if self
            .pending_save
            .as_ref()
            .is_some_and(|pending| pending.name == name)
        {
            tracing::debug!("Save of '{}' abandoned after failed exists check", name);
            self.pending_save = None;
        }
    }
}
