//! Commands of the multiplexed file-management endpoint
//!
//! All script-store operations go through one endpoint. On the wire the
//! `cmd` field selects the operation; here every operation is its own
//! variant and every answer is decoded into the matching [`FileResponse`].

use super::transport::TransportRequest;
use std::time::Duration;

/// One request to the script store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileCommand {
    /// Listing markup for the load picker
    ListForLoad,
    /// Listing markup for the save picker
    ListForSave,
    /// Does a script with this name exist?
    Exists { name: String },
    /// Store `content` under `name`, replacing any existing script
    Save { name: String, content: String },
    /// Fetch the content of a script
    Load { name: String },
    /// Remove a script
    Delete { name: String },
}

/// Decoded answer, one variant per command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileResponse {
    /// Rendered listing for `ListForLoad` / `ListForSave`
    Listing(String),
    Exists(bool),
    Saved(bool),
    Loaded(String),
    Deleted(bool),
}

impl FileCommand {
    /// Wire value of the `cmd` field
    pub fn wire_name(&self) -> &'static str {
        match self {
            FileCommand::ListForLoad => "loadList",
            FileCommand::ListForSave => "saveList",
            FileCommand::Exists { .. } => "exists",
            FileCommand::Save { .. } => "save",
            FileCommand::Load { .. } => "load",
            FileCommand::Delete { .. } => "delete",
        }
    }

    /// Script name the command refers to, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            FileCommand::ListForLoad | FileCommand::ListForSave => None,
            FileCommand::Exists { name }
            | FileCommand::Save { name, .. }
            | FileCommand::Load { name }
            | FileCommand::Delete { name } => Some(name),
        }
    }

    /// Build the transport request for this command
    pub fn to_request(&self, url: &str, timeout: Duration) -> TransportRequest {
        let request = TransportRequest::new(url, timeout).field("cmd", self.wire_name());
        match self {
            FileCommand::ListForLoad | FileCommand::ListForSave => request,
            FileCommand::Exists { name }
            | FileCommand::Load { name }
            | FileCommand::Delete { name } => request.field("name", name.clone()),
            FileCommand::Save { name, content } => request
                .field("name", name.clone())
                .field("src", content.clone()),
        }
    }

    /// Interpret a response body according to this command
    pub fn decode(&self, body: String) -> FileResponse {
        match self {
            FileCommand::ListForLoad | FileCommand::ListForSave => FileResponse::Listing(body),
            FileCommand::Exists { .. } => FileResponse::Exists(parse_flag(&body)),
            FileCommand::Save { .. } => FileResponse::Saved(parse_flag(&body)),
            FileCommand::Load { .. } => FileResponse::Loaded(body),
            FileCommand::Delete { .. } => FileResponse::Deleted(parse_flag(&body)),
        }
    }
}

/// Boolean-as-text: only `true` counts as true
fn parse_flag(body: &str) -> bool {
    body.trim() == "true"
}
