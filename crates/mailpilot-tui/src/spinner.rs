const FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Busy indicator advanced on every tick while a call is outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spinner {
    tick: usize,
}

impl Spinner {
    pub fn advance(&mut self) {
        self.tick = (self.tick + 1) % FRAMES.len();
    }

    pub fn reset(&mut self) {
        self.tick = 0;
    }

    #[must_use]
    pub fn glyph(&self) -> char {
        FRAMES[self.tick % FRAMES.len()]
    }
}
