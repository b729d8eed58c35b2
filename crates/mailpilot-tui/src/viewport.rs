//! Scrollable window over soft-wrapped content lines.

use mailpilot_tui_adapter::input::ScrollAction;
use mailpilot_tui_adapter::render::{Rect, RenderFrame};
use mailpilot_tui_adapter::text::Line;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    width: usize,
    height: usize,
    offset: usize,
    source: Vec<Line>,
    rows: Vec<Line>,
}

impl Viewport {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
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
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of wrapped rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Replace the content and jump back to the top.
    pub fn set_content(&mut self, lines: Vec<Line>) {
        self.source = lines;
        self.rewrap();
        self.offset = 0;
    }

    /// Change geometry, re-wrapping the current content. Scroll is clamped, not reset.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.rewrap();
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn scroll(&mut self, action: ScrollAction) {
        let page = self.height.max(1);
        self.offset = match action {
            ScrollAction::LineUp => self.offset.saturating_sub(1),
            ScrollAction::LineDown => self.offset + 1,
            ScrollAction::PageUp => self.offset.saturating_sub(page),
            ScrollAction::PageDown => self.offset + page,
            ScrollAction::Top => 0,
            ScrollAction::Bottom => self.max_offset(),
        }
        .min(self.max_offset());
    }

    #[must_use]
    pub fn at_bottom(&self) -> bool {
        self.offset >= self.max_offset()
    }

    /// Rows currently inside the window.
    #[must_use]
    pub fn visible(&self) -> &[Line] {
        let end = (self.offset + self.height).min(self.rows.len());
        &self.rows[self.offset.min(end)..end]
    }

    /// Percentage of the content scrolled past, for the footer indicator.
    #[must_use]
    pub fn scroll_percent(&self) -> usize {
        let max = self.max_offset();
        if max == 0 {
            return 100;
        }
        self.offset * 100 / max
    }

    pub fn draw(&self, frame: &mut RenderFrame, rect: Rect) {
        for (row, line) in self.visible().iter().enumerate() {
            frame.draw_line(rect, row, line);
        }
    }

    fn max_offset(&self) -> usize {
        self.rows.len().saturating_sub(self.height)
    }

    fn rewrap(&mut self) {
        self.rows = self
            .source
            .iter()
            .flat_map(|line| line.wrap(self.width))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailpilot_tui_adapter::render::FrameSize;
    use mailpilot_tui_adapter::snapshot::assert_render_frame_snapshot;
    use mailpilot_tui_adapter::style::ThemeSpec;

    fn numbered(count: usize) -> Vec<Line> {
        (1..=count).map(|n| Line::plain(format!("line {n}"))).collect()
    }

    #[test]
    fn scrolling_is_clamped_to_content() {
        let mut viewport = Viewport::new(20, 4);
        viewport.set_content(numbered(10));
        viewport.scroll(ScrollAction::LineUp);
        assert_eq!(viewport.offset(), 0);
        viewport.scroll(ScrollAction::PageDown);
        assert_eq!(viewport.offset(), 4);
        viewport.scroll(ScrollAction::PageDown);
        assert_eq!(viewport.offset(), 6);
        assert!(viewport.at_bottom());
        viewport.scroll(ScrollAction::LineDown);
        assert_eq!(viewport.offset(), 6);
        viewport.scroll(ScrollAction::Top);
        assert_eq!(viewport.offset(), 0);
        viewport.scroll(ScrollAction::Bottom);
        assert_eq!(viewport.visible()[0].text(), "line 7");
    }

    #[test]
    fn set_content_resets_to_top() {
        let mut viewport = Viewport::new(20, 2);
        viewport.set_content(numbered(5));
        viewport.scroll(ScrollAction::Bottom);
        viewport.set_content(numbered(5));
        assert_eq!(viewport.offset(), 0);
    }

    #[test]
    fn short_content_never_scrolls() {
        let mut viewport = Viewport::new(20, 8);
        viewport.set_content(numbered(3));
        viewport.scroll(ScrollAction::PageDown);
        assert_eq!(viewport.offset(), 0);
        assert_eq!(viewport.visible().len(), 3);
        assert_eq!(viewport.scroll_percent(), 100);
    }

    #[test]
    fn long_lines_soft_wrap_and_resize_rewraps() {
        let mut viewport = Viewport::new(4, 10);
        viewport.set_content(vec![Line::plain("abcdefghij"), Line::blank()]);
        assert_eq!(viewport.row_count(), 4);
        viewport.resize(5, 10);
        assert_eq!(viewport.row_count(), 3);
        let rows: Vec<String> = viewport.visible().iter().map(Line::text).collect();
        assert_eq!(rows, vec!["abcde", "fghij", ""]);
    }

    #[test]
    fn resize_clamps_offset() {
        let mut viewport = Viewport::new(20, 2);
        viewport.set_content(numbered(6));
        viewport.scroll(ScrollAction::Bottom);
        assert_eq!(viewport.offset(), 4);
        viewport.resize(20, 5);
        assert_eq!(viewport.offset(), 1);
    }

    #[test]
    fn draw_renders_visible_window() {
        let mut viewport = Viewport::new(8, 2);
        viewport.set_content(numbered(4));
        viewport.scroll(ScrollAction::LineDown);
        let mut frame = RenderFrame::new(
            FrameSize {
                width: 8,
                height: 3,
            },
            ThemeSpec::default(),
        );
        viewport.draw(
            &mut frame,
            Rect {
                x: 0,
                y: 0,
                width: 8,
                height: 2,
            },
        );
        assert_render_frame_snapshot("viewport", &frame, "line 2\nline 3\n");
    }
}
