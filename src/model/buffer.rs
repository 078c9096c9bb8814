//! The editable source buffer
//!
//! Holds the text the user is working on and a cursor position. The cursor
//! is a byte offset into the content and is only used to derive the line
//! number shown next to the editor.

/// Text content plus cursor position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditableBuffer {
    content: String,
    /// Byte offset of the cursor, always on a char boundary
    cursor: usize,
}

impl EditableBuffer {
    /// Create a buffer with the cursor at the end of `content`
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        let cursor = content.len();
        Self { content, cursor }
    }

    /// Current text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor byte offset
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the whole content (load operations). The cursor moves to the start.
    pub fn replace(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = 0;
    }

    /// Insert text at the cursor and move the cursor past it
    pub fn insert(&mut self, text: &str) {
        self.content.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Append a line at the end of the buffer, separated by a newline
    pub fn append_line(&mut self, line: &str) {
        if !self.content.is_empty() && !self.content.ends_with('\n') {
            self.content.push('\n');
        }
        self.content.push_str(line);
        self.cursor = self.content.len();
    }

    /// Move the cursor, clamping to the content and snapping back to a char boundary
    pub fn set_cursor(&mut self, offset: usize) {
        let mut offset = offset.min(self.content.len());
        while !self.content.is_char_boundary(offset) {
            offset -= 1;
        }
        self.cursor = offset;
    }

    /// 1-based line number of the cursor
    pub fn line_number(&self) -> usize {
        1 + self.content[..self.cursor].matches('\n').count()
    }
}
