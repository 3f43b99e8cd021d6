// ABOUTME: vt100-backed screen for exec sessions, with scrollback and conversion to ratatui text
// Output bytes are fed in unmodified; geometry changes go through resize()

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};
use tracing::trace;

use super::protocol::TerminalSize;

pub struct TerminalEmulator {
    parser: vt100::Parser,
    size: TerminalSize,
    /// Rows scrolled back from the live screen (0 = following output).
    scroll_offset: usize,
    max_scrollback: usize,
}

impl TerminalEmulator {
    pub fn new(size: TerminalSize, scrollback: usize) -> Self {
        Self {
            parser: vt100::Parser::new(size.rows, size.cols, scrollback),
            size,
            scroll_offset: 0,
            max_scrollback: scrollback,
        }
    }

    pub fn process(&mut self, data: &[u8]) {
        trace!("Emulator processing {} bytes", data.len());
        self.parser.process(data);
        if self.scroll_offset > 0 {
            self.scroll_offset = 0;
            self.parser.set_scrollback(0);
        }
    }

    /// Writes a line of local text (banners, status lines) on its own row.
    pub fn write_line(&mut self, text: &str) {
        self.process(format!("\r\n{text}\r\n").as_bytes());
    }

    pub fn resize(&mut self, size: TerminalSize) {
        self.size = size;
        self.parser.set_size(size.rows, size.cols);
    }

    pub fn size(&self) -> TerminalSize {
        self.size
    }

    pub fn clear(&mut self) {
        self.parser = vt100::Parser::new(self.size.rows, self.size.cols, self.max_scrollback);
        self.scroll_offset = 0;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.parser
            .set_scrollback(self.scroll_offset.saturating_add(lines));
        // vt100 caps the offset at the scrollback it actually holds
        self.scroll_offset = self.parser.screen().scrollback();
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
        self.parser.set_scrollback(self.scroll_offset);
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Plain text of each visible row, trailing blanks trimmed.
    pub fn visible_rows(&self) -> Vec<String> {
        self.parser
            .screen()
            .rows(0, self.size.cols)
            .map(|row| row.trim_end().to_string())
            .collect()
    }

    pub fn contents(&self) -> String {
        self.parser.screen().contents()
    }

    pub fn cursor_position(&self) -> (u16, u16) {
        let (row, col) = self.parser.screen().cursor_position();
        (col, row)
    }

    pub fn to_text(&self) -> Text<'static> {
        let screen = self.parser.screen();
        let (rows, cols) = screen.size();
        let mut lines = Vec::with_capacity(rows as usize);

        for row in 0..rows {
            let mut spans = Vec::new();
            let mut current_style = Style::default();
            let mut current_text = String::new();

            for col in 0..cols {
                let Some(cell) = screen.cell(row, col) else {
                    current_text.push(' ');
                    continue;
                };
                if cell.is_wide_continuation() {
                    continue;
                }
                let cell_style = cell_style(cell);
                if cell_style != current_style && !current_text.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut current_text), current_style));
                }
                current_style = cell_style;
                if cell.has_contents() {
                    current_text.push_str(&cell.contents());
                } else {
                    current_text.push(' ');
                }
            }
            if !current_text.is_empty() {
                spans.push(Span::styled(current_text, current_style));
            }
            lines.push(Line::from(spans));
        }
        Text::from(lines)
    }
}

fn cell_style(cell: &vt100::Cell) -> Style {
    let mut style = Style::default();
    style = match cell.fgcolor() {
        vt100::Color::Default => style,
        vt100::Color::Idx(n) => style.fg(ansi_color(n)),
        vt100::Color::Rgb(r, g, b) => style.fg(Color::Rgb(r, g, b)),
    };
    style = match cell.bgcolor() {
        vt100::Color::Default => style,
        vt100::Color::Idx(n) => style.bg(ansi_color(n)),
        vt100::Color::Rgb(r, g, b) => style.bg(Color::Rgb(r, g, b)),
    };
    if cell.bold() {
        style = style.add_modifier(Modifier::BOLD);
    }
    if cell.italic() {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if cell.underline() {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if cell.inverse() {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn ansi_color(idx: u8) -> Color {
    match idx {
        0 => Color::Black,
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Magenta,
        6 => Color::Cyan,
        7 => Color::Gray,
        8 => Color::DarkGray,
        9 => Color::LightRed,
        10 => Color::LightGreen,
        11 => Color::LightYellow,
        12 => Color::LightBlue,
        13 => Color::LightMagenta,
        14 => Color::LightCyan,
        15 => Color::White,
        n => Color::Indexed(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_lands_on_screen() {
        let mut emulator = TerminalEmulator::new(TerminalSize::new(20, 4), 100);
        emulator.process(b"hello\r\nworld");
        let rows = emulator.visible_rows();
        assert_eq!(rows[0], "hello");
        assert_eq!(rows[1], "world");
    }

    #[test]
    fn test_resize_updates_geometry() {
        let mut emulator = TerminalEmulator::new(TerminalSize::new(80, 24), 100);
        emulator.resize(TerminalSize::new(100, 30));
        assert_eq!(emulator.size(), TerminalSize::new(100, 30));
        assert_eq!(emulator.visible_rows().len(), 30);
    }

    #[test]
    fn test_scrollback_is_capped_by_history() {
        let mut emulator = TerminalEmulator::new(TerminalSize::new(10, 2), 100);
        emulator.process(b"1\r\n2\r\n3\r\n4");
        emulator.scroll_up(50);
        assert_eq!(emulator.scroll_offset(), 2);
        emulator.scroll_down(5);
        assert_eq!(emulator.scroll_offset(), 0);
    }
}
