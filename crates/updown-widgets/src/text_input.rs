//! `TextInput`: the editable text box inside a numeric input.

use serde::{Deserialize, Serialize};
use std::any::Any;
use updown_core::{widget::AccessibleRole, Event, Key, Rect, TypeId, Widget};

/// Message emitted when the user edits the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChanged {
    /// The edited text
    pub text: String,
}

/// Message emitted when Enter is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSubmitted {
    /// The text at the time of submission
    pub text: String,
}

/// Single-line text box.
///
/// The cursor is a character index, so multi-byte adornments such as `°`
/// edit correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextInput {
    /// Current text
    text: String,
    /// Hint shown while empty
    watermark: Option<String>,
    /// Whether typing is blocked
    read_only: bool,
    /// Test ID
    test_id_value: Option<String>,
    /// Accessible name
    accessible_name_value: Option<String>,
    /// Hit-test area
    #[serde(skip)]
    bounds: Rect,
    /// Whether focused
    #[serde(skip)]
    focused: bool,
    /// Cursor position (character index)
    #[serde(skip)]
    cursor: usize,
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TextInput {
    /// Create an empty text box.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            text: String::new(),
            watermark: None,
            read_only: false,
            test_id_value: None,
            accessible_name_value: None,
            bounds: Rect::new(0.0, 0.0, 0.0, 0.0),
            focused: false,
            cursor: 0,
        }
    }

    /// Set the hint shown while empty.
    #[must_use]
    pub fn watermark(mut self, text: impl Into<String>) -> Self {
        self.watermark = Some(text.into());
        self
    }

    /// Block typing.
    #[must_use]
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Set the hit-test area.
    #[must_use]
    pub const fn bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Set accessible name.
    #[must_use]
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    /// Current text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Hint shown while empty.
    #[must_use]
    pub fn get_watermark(&self) -> Option<&str> {
        self.watermark.as_deref()
    }

    /// Cursor position as a character index.
    #[must_use]
    pub const fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Whether the text box has keyboard focus.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether typing is blocked.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Replace the text programmatically. Returns `true` if it changed.
    ///
    /// Identical text is left untouched so the cursor stays where the user
    /// put it.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.text = text.to_string();
        self.cursor = self.char_len();
        true
    }

    /// Set read-only mode at runtime.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Set the hint shown while empty.
    pub fn set_watermark(&mut self, watermark: Option<String>) {
        self.watermark = watermark;
    }

    /// Set the hit-test area.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn insert_text(&mut self, text: &str) -> bool {
        if self.read_only {
            return false;
        }
        let mut changed = false;
        for c in text.chars() {
            let at = self.byte_offset(self.cursor);
            self.text.insert(at, c);
            self.cursor += 1;
            changed = true;
        }
        changed
    }

    fn backspace(&mut self) -> bool {
        if self.read_only || self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
        true
    }

    fn delete(&mut self) -> bool {
        if self.read_only || self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
        true
    }

    fn changed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(TextChanged {
            text: self.text.clone(),
        }))
    }
}

impl Widget for TextInput {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match event {
            Event::MouseDown { position, .. } => {
                let was_focused = self.focused;
                self.focused = self.bounds.contains_point(position);
                if self.focused && !was_focused {
                    self.cursor = self.char_len();
                }
            }
            Event::FocusIn => self.focused = true,
            Event::FocusOut => self.focused = false,
            Event::TextInput { text } if self.focused => {
                if self.insert_text(text) {
                    return self.changed();
                }
            }
            Event::KeyDown { key } if self.focused => match key {
                Key::Backspace if self.backspace() => return self.changed(),
                Key::Delete if self.delete() => return self.changed(),
                Key::Left => self.cursor = self.cursor.saturating_sub(1),
                Key::Right => self.cursor = (self.cursor + 1).min(self.char_len()),
                Key::Home => self.cursor = 0,
                Key::End => self.cursor = self.char_len(),
                Key::Enter => {
                    return Some(Box::new(TextSubmitted {
                        text: self.text.clone(),
                    }));
                }
                _ => {}
            },
            _ => {}
        }
        None
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value.as_deref()
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::TextInput
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }
}
