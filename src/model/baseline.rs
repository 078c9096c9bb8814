//! Snapshot of the last loaded or saved script
//!
//! The baseline is what the buffer is compared against to decide whether
//! there are unsaved edits. It is always replaced wholesale.

/// Unify line endings and trim surrounding whitespace.
///
/// The store may re-serialize content (e.g. strip a trailing newline or
/// turn `\n` into `\r\n`), so the comparison has to ignore those changes.
pub fn normalize(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n").trim().to_string()
}

/// Name and normalized content of the last loaded or saved script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Baseline {
    name: String,
    content: String,
}

impl Baseline {
    /// Build a baseline, normalizing `content`
    pub fn new(name: impl Into<String>, content: &str) -> Self {
        Self {
            name: name.into(),
            content: normalize(content),
        }
    }

    /// Baseline of a new, unnamed, empty script
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// True if `content` differs from the baseline after normalization
    pub fn differs_from(&self, content: &str) -> bool {
        normalize(content) != self.content
    }
}
