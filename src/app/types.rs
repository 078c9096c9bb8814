//! Shared types of the session layer

use std::fmt;

/// A region of the page that request results are written into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Surface {
    /// Main output next to the editor
    Result,
    /// Inner region of a GUI/slider panel
    Gui,
    /// Detached output window
    Window,
    /// Listing inside the load picker
    LoadList,
    /// Listing inside the save picker
    SaveList,
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Result => "result",
            Surface::Gui => "gui",
            Surface::Window => "window",
            Surface::LoadList => "load-list",
            Surface::SaveList => "save-list",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issuance marker of a race-sensitive request.
///
/// Microseconds on the session's monotonic clock; strictly increasing in
/// issuance order within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket {
    issued_at: u64,
}

impl RequestTicket {
    pub fn at(issued_at: u64) -> Self {
        Self { issued_at }
    }

    pub fn issued_at(&self) -> u64 {
        self.issued_at
    }
}

impl fmt::Display for RequestTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.issued_at)
    }
}

/// Current value of one GUI control
#[derive(Debug, Clone, PartialEq)]
pub enum GuiValue {
    /// Slider or input field, sent verbatim
    Number(String),
    Checkbox(bool),
}

impl GuiValue {
    /// Wire form of a full set of control values: comma separated
    pub fn serialize_all(values: &[GuiValue]) -> String {
        values
            .iter()
            .map(|v| match v {
                GuiValue::Number(n) => n.clone(),
                GuiValue::Checkbox(true) => "true".to_string(),
                GuiValue::Checkbox(false) => "false".to_string(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse a user-typed value: `true`/`false` are checkboxes, anything else a number
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "true" => GuiValue::Checkbox(true),
            "false" => GuiValue::Checkbox(false),
            other => GuiValue::Number(other.to_string()),
        }
    }
}

/// User actions the session reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    RunSource,
    RunInWindow,
    UpdateGui { source: String, values: Vec<GuiValue> },
    NewScript,
    LoadExample(String),
    OpenLoadDialog,
    OpenSaveDialog,
    /// Pick a name in the save picker (fills the filename field)
    SetSaveName(String),
    /// Save under the name in the save dialog's filename field
    SaveFromDialog,
    Save(String),
    LoadFile(String),
    DeleteFile(String),
    /// "Yes, discard my changes"
    ConfirmDiscard,
    /// "Yes, overwrite the stored script"
    ConfirmOverwriteFile,
    /// Close whatever overlay is open (cancel buttons)
    Dismiss,
}
