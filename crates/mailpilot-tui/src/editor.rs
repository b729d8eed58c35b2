//! Line-numbered text surface for editing an action payload.

use mailpilot_core::JsonObject;
use mailpilot_tui_adapter::input::{Key, KeyEvent};
use mailpilot_tui_adapter::render::{Rect, RenderFrame, TextRole};
use serde_json::Value;

const TAB: &str = "  ";
const MIN_WIDTH: usize = 20;
const MIN_HEIGHT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadEditor {
    lines: Vec<String>,
    row: usize,
    /// Cursor column in characters.
    col: usize,
    width: usize,
    height: usize,
    scroll: usize,
    error: Option<String>,
}

impl PayloadEditor {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            width: width.max(MIN_WIDTH),
            height: height.max(MIN_HEIGHT),
            scroll: 0,
            error: None,
        }
    }

    /// Load `text`, put the cursor at its end and clear any validation error.
    pub fn seed(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_owned).collect();
        self.row = self.lines.len() - 1;
        self.col = self.current_len();
        self.error = None;
        self.follow_cursor();
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width.max(MIN_WIDTH);
        self.height = height.max(MIN_HEIGHT);
        self.follow_cursor();
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    #[must_use]
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Parse the buffer as a JSON object.
    pub fn validate(&self) -> Result<JsonObject, String> {
        let raw = self.text();
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("Payload cannot be empty.".to_owned());
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err("Invalid JSON: payload must be a JSON object".to_owned()),
            Err(err) => Err(format!("Invalid JSON: {err}")),
        }
    }

    /// Apply an editing key. Returns false for keys the editor does not handle.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        if event.modifiers.ctrl || event.modifiers.alt {
            return false;
        }
        match event.key {
            Key::Char(glyph) => self.insert(&glyph.to_string()),
            Key::Tab => self.insert(TAB),
            Key::Enter => self.newline(),
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete(),
            Key::Left => self.move_left(),
            Key::Right => self.move_right(),
            Key::Up => self.move_vertical(-1),
            Key::Down => self.move_vertical(1),
            Key::PageUp => self.move_vertical(-(self.height as isize)),
            Key::PageDown => self.move_vertical(self.height as isize),
            Key::Home => self.col = 0,
            Key::End => self.col = self.current_len(),
            Key::Escape => return false,
        }
        self.follow_cursor();
        true
    }

    /// Draw line numbers, text and cursor into `rect`.
    pub fn draw(&self, frame: &mut RenderFrame, rect: Rect) {
        let gutter = self.lines.len().to_string().len().max(2) + 1;
        let text_width = rect.width.saturating_sub(gutter);
        let h_offset = (self.col + 1).saturating_sub(text_width);

        for (row, line) in self
            .lines
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(rect.height)
        {
            let y = rect.y + row - self.scroll;
            let number = format!("{:>width$} ", row + 1, width = gutter - 1);
            let role = if row == self.row {
                TextRole::Focus
            } else {
                TextRole::Muted
            };
            frame.draw_text_clipped(rect.x, y, gutter, &number, role);
            let visible: String = line.chars().skip(h_offset).collect();
            frame.draw_text_clipped(rect.x + gutter, y, text_width, &visible, TextRole::Primary);
        }

        if self.row >= self.scroll && self.row < self.scroll + rect.height && text_width > 0 {
            let x = rect.x + gutter + self.col - h_offset;
            frame.invert_cell(x, rect.y + self.row - self.scroll);
        }
    }

    fn current_len(&self) -> usize {
        self.lines[self.row].chars().count()
    }

    fn byte_index(&self, col: usize) -> usize {
        let line = &self.lines[self.row];
        line.char_indices()
            .nth(col)
            .map_or(line.len(), |(idx, _)| idx)
    }

    fn insert(&mut self, text: &str) {
        let at = self.byte_index(self.col);
        self.lines[self.row].insert_str(at, text);
        self.col += text.chars().count();
    }

    fn newline(&mut self) {
        let at = self.byte_index(self.col);
        let rest = self.lines[self.row].split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    fn backspace(&mut self) {
        if self.col > 0 {
            let at = self.byte_index(self.col - 1);
            self.lines[self.row].remove(at);
            self.col -= 1;
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.current_len();
            self.lines[self.row].push_str(&line);
        }
    }

    fn delete(&mut self) {
        if self.col < self.current_len() {
            let at = self.byte_index(self.col);
            self.lines[self.row].remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.current_len();
        }
    }

    fn move_right(&mut self) {
        if self.col < self.current_len() {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let last = self.lines.len() - 1;
        self.row = self.row.saturating_add_signed(delta).min(last);
        self.col = self.col.min(self.current_len());
    }

    fn follow_cursor(&mut self) {
        if self.row < self.scroll {
            self.scroll = self.row;
        } else if self.row >= self.scroll + self.height {
            self.scroll = self.row + 1 - self.height;
        }
    }
}
