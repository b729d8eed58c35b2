//! mailpilot-tui-adapter: boundary layer between the review client and the terminal.
//!
//! The app crate only speaks in these types. The concrete backend (crossterm)
//! lives in the binary and translates to and from them.

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "mailpilot-tui-adapter"
}

/// Theme tokens consumed by the review client.
pub mod style {
    /// Logical theme choices supported by the adapter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ThemeKind {
        Dark,
        Light,
        HighContrast,
    }

    impl ThemeKind {
        /// Parses the CLI spelling (`dark`, `light`, `high-contrast`).
        #[must_use]
        pub fn parse(value: &str) -> Option<Self> {
            match value.trim().to_ascii_lowercase().as_str() {
                "dark" => Some(Self::Dark),
                "light" => Some(Self::Light),
                "high-contrast" | "high_contrast" | "hc" => Some(Self::HighContrast),
                _ => None,
            }
        }

        #[must_use]
        pub fn label(self) -> &'static str {
            match self {
                Self::Dark => "dark",
                Self::Light => "light",
                Self::HighContrast => "high-contrast",
            }
        }
    }

    /// Stable style tokens exposed to the app crate.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum StyleToken {
        Background,
        Foreground,
        Muted,
        Accent,
        Success,
        Danger,
        Warning,
        Focus,
    }

    /// Palette of terminal 256-color indexes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Palette {
        pub background: u8,
        pub foreground: u8,
        pub muted: u8,
        pub accent: u8,
        pub success: u8,
        pub danger: u8,
        pub warning: u8,
        pub focus: u8,
    }

    /// Emphasis policy per theme.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypographySpec {
        pub title_bold: bool,
        pub danger_bold: bool,
        pub muted_dim: bool,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ThemeSpec {
        pub kind: ThemeKind,
        pub palette: Palette,
        pub typography: TypographySpec,
    }

    impl ThemeSpec {
        #[must_use]
        pub fn color(self, token: StyleToken) -> u8 {
            let p = self.palette;
            match token {
                StyleToken::Background => p.background,
                StyleToken::Foreground => p.foreground,
                StyleToken::Muted => p.muted,
                StyleToken::Accent => p.accent,
                StyleToken::Success => p.success,
                StyleToken::Danger => p.danger,
                StyleToken::Warning => p.warning,
                StyleToken::Focus => p.focus,
            }
        }

        #[must_use]
        pub fn for_kind(kind: ThemeKind) -> Self {
            let (palette, typography) = match kind {
                ThemeKind::Dark => (
                    Palette {
                        background: 16,
                        foreground: 252,
                        muted: 244,
                        accent: 45,
                        success: 41,
                        danger: 197,
                        warning: 220,
                        focus: 81,
                    },
                    TypographySpec {
                        title_bold: true,
                        danger_bold: true,
                        muted_dim: true,
                    },
                ),
                ThemeKind::Light => (
                    Palette {
                        background: 255,
                        foreground: 234,
                        muted: 244,
                        accent: 25,
                        success: 28,
                        danger: 160,
                        warning: 172,
                        focus: 21,
                    },
                    TypographySpec {
                        title_bold: true,
                        danger_bold: true,
                        muted_dim: false,
                    },
                ),
                ThemeKind::HighContrast => (
                    Palette {
                        background: 16,
                        foreground: 231,
                        muted: 250,
                        accent: 51,
                        success: 118,
                        danger: 203,
                        warning: 226,
                        focus: 229,
                    },
                    TypographySpec {
                        title_bold: true,
                        danger_bold: true,
                        muted_dim: false,
                    },
                ),
            };
            Self {
                kind,
                palette,
                typography,
            }
        }
    }

    impl Default for ThemeSpec {
        fn default() -> Self {
            Self::for_kind(ThemeKind::Dark)
        }
    }
}

/// Styled text lines produced by content renderers.
pub mod text {
    use super::render::TextRole;

    /// A run of text drawn with one role.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Span {
        pub text: String,
        pub role: TextRole,
    }

    impl Span {
        #[must_use]
        pub fn new(text: impl Into<String>, role: TextRole) -> Self {
            Self {
                text: text.into(),
                role,
            }
        }

        #[must_use]
        pub fn width(&self) -> usize {
            self.text.chars().count()
        }
    }

    /// One logical line of content. Never contains `'\n'`.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct Line {
        pub spans: Vec<Span>,
    }

    impl Line {
        #[must_use]
        pub fn blank() -> Self {
            Self::default()
        }

        #[must_use]
        pub fn plain(text: impl Into<String>) -> Self {
            Self::styled(text, TextRole::Primary)
        }

        #[must_use]
        pub fn styled(text: impl Into<String>, role: TextRole) -> Self {
            Self {
                spans: vec![Span::new(text, role)],
            }
        }

        /// Builder-style append.
        #[must_use]
        pub fn with(mut self, text: impl Into<String>, role: TextRole) -> Self {
            self.push(text, role);
            self
        }

        pub fn push(&mut self, text: impl Into<String>, role: TextRole) {
            let text = text.into();
            if text.is_empty() {
                return;
            }
            self.spans.push(Span::new(text, role));
        }

        #[must_use]
        pub fn width(&self) -> usize {
            self.spans.iter().map(Span::width).sum()
        }

        #[must_use]
        pub fn text(&self) -> String {
            self.spans.iter().map(|span| span.text.as_str()).collect()
        }

        /// Split into rows of at most `width` cells, preserving span roles.
        ///
        /// A blank line yields one blank row; `width == 0` yields the line unchanged.
        #[must_use]
        pub fn wrap(&self, width: usize) -> Vec<Line> {
            if width == 0 || self.width() <= width {
                return vec![self.clone()];
            }
            let mut rows = Vec::new();
            let mut current = Line::blank();
            let mut used = 0usize;
            for span in &self.spans {
                let mut chunk = String::new();
                for glyph in span.text.chars() {
                    if used == width {
                        current.push(std::mem::take(&mut chunk), span.role);
                        rows.push(std::mem::take(&mut current));
                        used = 0;
                    }
                    chunk.push(glyph);
                    used += 1;
                }
                current.push(chunk, span.role);
            }
            if !current.spans.is_empty() {
                rows.push(current);
            }
            rows
        }
    }
}

/// Cell buffer drawn once per loop iteration.
pub mod render {
    use super::style::{StyleToken, ThemeSpec};
    use super::text::Line;
    use super::widgets::BorderStyle;

    /// Terminal color as an ANSI256 index.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TermColor {
        Ansi256(u8),
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameSize {
        pub width: usize,
        pub height: usize,
    }

    /// A rectangular region within a frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Rect {
        pub x: usize,
        pub y: usize,
        pub width: usize,
        pub height: usize,
    }

    impl Rect {
        /// Inner region after removing a one-cell border.
        #[must_use]
        pub fn inner(self) -> Self {
            if self.width < 2 || self.height < 2 {
                return Self {
                    width: 0,
                    height: 0,
                    ..self
                };
            }
            Self {
                x: self.x + 1,
                y: self.y + 1,
                width: self.width - 2,
                height: self.height - 2,
            }
        }

        /// Split into top (height=`top_height`) and bottom.
        #[must_use]
        pub fn split_vertical(self, top_height: usize) -> (Self, Self) {
            let top_h = top_height.min(self.height);
            (
                Self {
                    height: top_h,
                    ..self
                },
                Self {
                    y: self.y + top_h,
                    height: self.height - top_h,
                    ..self
                },
            )
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellStyle {
        pub fg: TermColor,
        pub bg: TermColor,
        pub bold: bool,
        pub dim: bool,
        pub reverse: bool,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameCell {
        pub glyph: char,
        pub style: CellStyle,
    }

    /// Semantic role for rendered text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TextRole {
        Primary,
        Title,
        Muted,
        Accent,
        Success,
        Danger,
        Warning,
        Focus,
    }

    /// Cell buffer with theme-aware drawing helpers.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RenderFrame {
        size: FrameSize,
        cells: Vec<FrameCell>,
        theme: ThemeSpec,
    }

    impl RenderFrame {
        #[must_use]
        pub fn new(size: FrameSize, theme: ThemeSpec) -> Self {
            let blank = FrameCell {
                glyph: ' ',
                style: CellStyle {
                    fg: TermColor::Ansi256(theme.color(StyleToken::Foreground)),
                    bg: TermColor::Ansi256(theme.color(StyleToken::Background)),
                    bold: false,
                    dim: false,
                    reverse: false,
                },
            };
            Self {
                size,
                cells: vec![blank; size.width.saturating_mul(size.height)],
                theme,
            }
        }

        #[must_use]
        pub fn theme(&self) -> ThemeSpec {
            self.theme
        }

        #[must_use]
        pub fn size(&self) -> FrameSize {
            self.size
        }

        #[must_use]
        pub fn cell(&self, x: usize, y: usize) -> Option<FrameCell> {
            if x >= self.size.width || y >= self.size.height {
                return None;
            }
            Some(self.cells[y * self.size.width + x])
        }

        /// Write a single cell, clipped to frame bounds.
        pub fn set_cell(&mut self, x: usize, y: usize, cell: FrameCell) {
            if x >= self.size.width || y >= self.size.height {
                return;
            }
            self.cells[y * self.size.width + x] = cell;
        }

        /// Draw text on a single row starting at `x`, clipped to `max_width` cells.
        ///
        /// Returns the number of cells written.
        pub fn draw_text_clipped(
            &mut self,
            x: usize,
            y: usize,
            max_width: usize,
            text: &str,
            role: TextRole,
        ) -> usize {
            let style = self.style_for_role(role);
            let mut written = 0;
            for glyph in text.chars().take(max_width) {
                let col = x + written;
                if col >= self.size.width || y >= self.size.height {
                    break;
                }
                self.cells[y * self.size.width + col] = FrameCell { glyph, style };
                written += 1;
            }
            written
        }

        /// Draw text on a single row, clipped to frame width.
        pub fn draw_text(&mut self, x: usize, y: usize, text: &str, role: TextRole) {
            let room = self.size.width.saturating_sub(x);
            self.draw_text_clipped(x, y, room, text, role);
        }

        /// Draw a styled line into `rect` row `row`, clipped to the rect width.
        pub fn draw_line(&mut self, rect: Rect, row: usize, line: &Line) {
            if row >= rect.height {
                return;
            }
            let y = rect.y + row;
            let mut used = 0;
            for span in &line.spans {
                if used >= rect.width {
                    break;
                }
                used += self.draw_text_clipped(
                    rect.x + used,
                    y,
                    rect.width - used,
                    &span.text,
                    span.role,
                );
            }
        }

        /// Flip foreground/background on one cell (used for the text cursor).
        pub fn invert_cell(&mut self, x: usize, y: usize) {
            if let Some(mut cell) = self.cell(x, y) {
                cell.style.reverse = !cell.style.reverse;
                self.set_cell(x, y, cell);
            }
        }

        /// Draw a bordered panel with a title. Returns the content area inside the border.
        pub fn draw_panel(&mut self, rect: Rect, title: &str, border: BorderStyle, role: TextRole) -> Rect {
            if rect.width < 2 || rect.height < 2 {
                return rect.inner();
            }
            let glyphs = border.glyphs();
            let style = self.style_for_role(role);
            let right = rect.x + rect.width - 1;
            let bottom = rect.y + rect.height - 1;

            for col in rect.x..=right {
                let (top, low) = if col == rect.x {
                    (glyphs.top_left, glyphs.bottom_left)
                } else if col == right {
                    (glyphs.top_right, glyphs.bottom_right)
                } else {
                    (glyphs.horizontal, glyphs.horizontal)
                };
                self.set_cell(col, rect.y, FrameCell { glyph: top, style });
                self.set_cell(col, bottom, FrameCell { glyph: low, style });
            }
            for row in (rect.y + 1)..bottom {
                self.set_cell(rect.x, row, FrameCell { glyph: glyphs.vertical, style });
                self.set_cell(right, row, FrameCell { glyph: glyphs.vertical, style });
            }

            if !title.is_empty() && rect.width > 4 {
                let label = format!(" {title} ");
                self.draw_text_clipped(rect.x + 2, rect.y, rect.width - 4, &label, TextRole::Title);
            }
            rect.inner()
        }

        #[must_use]
        pub fn row_text(&self, y: usize) -> String {
            if y >= self.size.height {
                return String::new();
            }
            let start = y * self.size.width;
            self.cells[start..start + self.size.width]
                .iter()
                .map(|cell| cell.glyph)
                .collect()
        }

        /// Text-only snapshot helper for lightweight regression tests.
        #[must_use]
        pub fn snapshot(&self) -> String {
            (0..self.size.height)
                .map(|row| self.row_text(row))
                .collect::<Vec<_>>()
                .join("\n")
        }

        #[must_use]
        pub fn color_for_role(&self, role: TextRole) -> TermColor {
            let token = match role {
                TextRole::Primary => StyleToken::Foreground,
                TextRole::Title | TextRole::Accent => StyleToken::Accent,
                TextRole::Muted => StyleToken::Muted,
                TextRole::Success => StyleToken::Success,
                TextRole::Danger => StyleToken::Danger,
                TextRole::Warning => StyleToken::Warning,
                TextRole::Focus => StyleToken::Focus,
            };
            TermColor::Ansi256(self.theme.color(token))
        }

        fn style_for_role(&self, role: TextRole) -> CellStyle {
            let typography = self.theme.typography;
            let (bold, dim) = match role {
                TextRole::Title => (typography.title_bold, false),
                TextRole::Danger => (typography.danger_bold, false),
                TextRole::Muted => (false, typography.muted_dim),
                TextRole::Focus => (true, false),
                _ => (false, false),
            };
            CellStyle {
                fg: self.color_for_role(role),
                bg: TermColor::Ansi256(self.theme.color(StyleToken::Background)),
                bold,
                dim,
                reverse: false,
            }
        }
    }
}

pub mod widgets {
    /// Border treatment exposed by the adapter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum BorderStyle {
        Plain,
        Rounded,
    }

    pub(crate) struct BorderGlyphs {
        pub(crate) top_left: char,
        pub(crate) top_right: char,
        pub(crate) bottom_left: char,
        pub(crate) bottom_right: char,
        pub(crate) horizontal: char,
        pub(crate) vertical: char,
    }

    impl BorderStyle {
        pub(crate) fn glyphs(self) -> BorderGlyphs {
            let (top_left, top_right, bottom_left, bottom_right) = match self {
                Self::Rounded => ('╭', '╮', '╰', '╯'),
                Self::Plain => ('┌', '┐', '└', '┘'),
            };
            BorderGlyphs {
                top_left,
                top_right,
                bottom_left,
                bottom_right,
                horizontal: '─',
                vertical: '│',
            }
        }
    }
}

/// Snapshot helpers for adapter-based render abstractions.
pub mod snapshot;

/// Canonical input events, independent of the terminal backend.
pub mod input {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Key {
        Char(char),
        Enter,
        Escape,
        Tab,
        Backspace,
        Delete,
        Up,
        Down,
        Left,
        Right,
        PageUp,
        PageDown,
        Home,
        End,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Modifiers {
        pub shift: bool,
        pub ctrl: bool,
        pub alt: bool,
    }

    impl Modifiers {
        #[must_use]
        pub const fn none() -> Self {
            Self {
                shift: false,
                ctrl: false,
                alt: false,
            }
        }

        #[must_use]
        pub const fn ctrl() -> Self {
            Self {
                shift: false,
                ctrl: true,
                alt: false,
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct KeyEvent {
        pub key: Key,
        pub modifiers: Modifiers,
    }

    impl KeyEvent {
        #[must_use]
        pub const fn plain(key: Key) -> Self {
            Self {
                key,
                modifiers: Modifiers::none(),
            }
        }

        #[must_use]
        pub const fn ctrl(glyph: char) -> Self {
            Self {
                key: Key::Char(glyph),
                modifiers: Modifiers::ctrl(),
            }
        }

        /// Lowercased character for unmodified letter keys.
        #[must_use]
        pub fn letter(&self) -> Option<char> {
            match self.key {
                Key::Char(glyph) if !self.modifiers.ctrl && !self.modifiers.alt => {
                    Some(glyph.to_ascii_lowercase())
                }
                _ => None,
            }
        }

        #[must_use]
        pub fn is_ctrl(&self, glyph: char) -> bool {
            self.modifiers.ctrl
                && matches!(self.key, Key::Char(c) if c.eq_ignore_ascii_case(&glyph))
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MouseWheelDirection {
        Up,
        Down,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MouseEvent {
        pub wheel: Option<MouseWheelDirection>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ResizeEvent {
        pub width: usize,
        pub height: usize,
    }

    /// Input stream event consumed by the screen engine.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum InputEvent {
        Key(KeyEvent),
        Mouse(MouseEvent),
        Resize(ResizeEvent),
        Tick,
    }

    /// Scroll gesture recognised by scrollable surfaces.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ScrollAction {
        LineUp,
        LineDown,
        PageUp,
        PageDown,
        Top,
        Bottom,
    }

    /// Map an event to a scroll gesture, if it is one.
    #[must_use]
    pub fn scroll_action(event: &InputEvent) -> Option<ScrollAction> {
        match event {
            InputEvent::Key(KeyEvent { key, modifiers }) if !modifiers.ctrl && !modifiers.alt => {
                match key {
                    Key::Up => Some(ScrollAction::LineUp),
                    Key::Down => Some(ScrollAction::LineDown),
                    Key::PageUp => Some(ScrollAction::PageUp),
                    Key::PageDown => Some(ScrollAction::PageDown),
                    Key::Home => Some(ScrollAction::Top),
                    Key::End => Some(ScrollAction::Bottom),
                    _ => None,
                }
            }
            InputEvent::Mouse(MouseEvent {
                wheel: Some(MouseWheelDirection::Up),
            }) => Some(ScrollAction::LineUp),
            InputEvent::Mouse(MouseEvent {
                wheel: Some(MouseWheelDirection::Down),
            }) => Some(ScrollAction::LineDown),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::crate_label;
    use super::input::{
        scroll_action, InputEvent, Key, KeyEvent, Modifiers, MouseEvent, MouseWheelDirection,
        ResizeEvent, ScrollAction,
    };
    use super::render::{FrameSize, Rect, RenderFrame, TermColor, TextRole};
    use super::snapshot::assert_render_frame_snapshot;
    use super::style::{StyleToken, ThemeKind, ThemeSpec};
    use super::text::Line;
    use super::widgets::BorderStyle;

    fn frame(width: usize, height: usize) -> RenderFrame {
        RenderFrame::new(FrameSize { width, height }, ThemeSpec::default())
    }

    #[test]
    fn crate_label_is_stable() {
        assert_eq!(crate_label(), "mailpilot-tui-adapter");
    }

    #[test]
    fn theme_kind_parses_cli_spellings() {
        assert_eq!(ThemeKind::parse("Dark"), Some(ThemeKind::Dark));
        assert_eq!(ThemeKind::parse(" light "), Some(ThemeKind::Light));
        assert_eq!(ThemeKind::parse("high-contrast"), Some(ThemeKind::HighContrast));
        assert_eq!(ThemeKind::parse("neon"), None);
        assert_eq!(ThemeKind::HighContrast.label(), "high-contrast");
    }

    #[test]
    fn high_contrast_palette_snapshot() {
        let theme = ThemeSpec::for_kind(ThemeKind::HighContrast);
        let snapshot = format!(
            "bg={} fg={} muted={} accent={} danger={}",
            theme.color(StyleToken::Background),
            theme.color(StyleToken::Foreground),
            theme.color(StyleToken::Muted),
            theme.color(StyleToken::Accent),
            theme.color(StyleToken::Danger),
        );
        assert_eq!(snapshot, "bg=16 fg=231 muted=250 accent=51 danger=203");
    }

    #[test]
    fn draw_text_clips_to_frame_width() {
        let mut frame = frame(6, 2);
        frame.draw_text(0, 0, "review", TextRole::Title);
        frame.draw_text(3, 1, "queue", TextRole::Muted);
        assert_render_frame_snapshot("clip", &frame, "review\n   que\n");
    }

    #[test]
    fn role_styles_follow_typography() {
        let theme = ThemeSpec::for_kind(ThemeKind::Dark);
        let mut frame = RenderFrame::new(FrameSize { width: 4, height: 1 }, theme);
        frame.draw_text(0, 0, "!", TextRole::Danger);
        frame.draw_text(1, 0, "m", TextRole::Muted);
        let danger = frame.cell(0, 0).map(|cell| (cell.style.fg, cell.style.bold));
        assert_eq!(
            danger,
            Some((TermColor::Ansi256(theme.color(StyleToken::Danger)), true))
        );
        assert_eq!(frame.cell(1, 0).map(|cell| cell.style.dim), Some(true));
    }

    #[test]
    fn draw_line_keeps_span_roles_and_clips_to_rect() {
        let mut frame = frame(10, 1);
        let line = Line::styled("Type: ", TextRole::Muted).with("draft_reply", TextRole::Accent);
        let rect = Rect {
            x: 1,
            y: 0,
            width: 8,
            height: 1,
        };
        frame.draw_line(rect, 0, &line);
        assert_eq!(frame.row_text(0), " Type: dr ");
        assert_eq!(
            frame.cell(7, 0).map(|cell| cell.style.fg),
            Some(frame.color_for_role(TextRole::Accent))
        );
    }

    #[test]
    fn wrap_splits_across_spans() {
        let line = Line::styled("ab", TextRole::Muted).with("cdefg", TextRole::Primary);
        let rows: Vec<String> = line.wrap(3).iter().map(Line::text).collect();
        assert_eq!(rows, vec!["abc", "def", "g"]);
        assert_eq!(line.wrap(3)[0].spans.len(), 2);
        assert_eq!(Line::blank().wrap(4), vec![Line::blank()]);
    }

    #[test]
    fn panel_draws_border_title_and_returns_inner() {
        let mut frame = frame(12, 4);
        let inner = frame.draw_panel(
            Rect {
                x: 0,
                y: 0,
                width: 12,
                height: 4,
            },
            "Edit",
            BorderStyle::Rounded,
            TextRole::Focus,
        );
        assert_eq!(
            inner,
            Rect {
                x: 1,
                y: 1,
                width: 10,
                height: 2
            }
        );
        assert_render_frame_snapshot(
            "panel",
            &frame,
            "╭─ Edit ───╮\n│          │\n│          │\n╰──────────╯",
        );
    }

    #[test]
    fn invert_cell_toggles_reverse() {
        let mut frame = frame(2, 1);
        frame.invert_cell(1, 0);
        assert_eq!(frame.cell(1, 0).map(|cell| cell.style.reverse), Some(true));
        frame.invert_cell(5, 5);
    }

    #[test]
    fn split_vertical_clamps_to_height() {
        let rect = Rect {
            x: 0,
            y: 2,
            width: 5,
            height: 3,
        };
        let (top, bottom) = rect.split_vertical(5);
        assert_eq!(top.height, 3);
        assert_eq!(bottom.height, 0);
        assert_eq!(bottom.y, 5);
    }

    #[test]
    fn key_event_helpers() {
        assert_eq!(KeyEvent::plain(Key::Char('A')).letter(), Some('a'));
        assert_eq!(KeyEvent::ctrl('s').letter(), None);
        assert!(KeyEvent::ctrl('S').is_ctrl('s'));
        assert!(!KeyEvent::plain(Key::Char('s')).is_ctrl('s'));
    }

    #[test]
    fn scroll_keymap_snapshot() {
        let keys = [Key::Up, Key::Down, Key::PageUp, Key::PageDown, Key::Home, Key::End];
        let mapped: Vec<Option<ScrollAction>> = keys
            .iter()
            .map(|key| scroll_action(&InputEvent::Key(KeyEvent::plain(*key))))
            .collect();
        assert_eq!(
            format!("{mapped:?}"),
            "[Some(LineUp), Some(LineDown), Some(PageUp), Some(PageDown), Some(Top), Some(Bottom)]"
        );
        assert_eq!(
            scroll_action(&InputEvent::Key(KeyEvent {
                key: Key::Up,
                modifiers: Modifiers::ctrl(),
            })),
            None
        );
        assert_eq!(scroll_action(&InputEvent::Key(KeyEvent::plain(Key::Enter))), None);
    }

    #[test]
    fn mouse_wheel_and_resize() {
        assert_eq!(
            scroll_action(&InputEvent::Mouse(MouseEvent {
                wheel: Some(MouseWheelDirection::Down),
            })),
            Some(ScrollAction::LineDown)
        );
        assert_eq!(
            scroll_action(&InputEvent::Resize(ResizeEvent {
                width: 80,
                height: 24,
            })),
            None
        );
    }
}
