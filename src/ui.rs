//! `UiFrame` clips every draw call to the visible area.
//!
//! Floating panels are positioned from anchor geometry and may extend past
//! the terminal edge (a dropdown wider than the screen, a tooltip pinned to
//! its margin). Drawing through `UiFrame` keeps those writes inside the
//! buffer instead of guarding each one by hand.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{StatefulWidget, Widget};

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        Self {
            area,
            buffer: frame.buffer_mut(),
        }
    }

    /// Draw straight into a buffer, e.g. in tests or offscreen passes.
    pub fn from_buffer(buffer: &'a mut Buffer) -> Self {
        Self {
            area: buffer.area,
            buffer,
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    fn clip(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        (clipped.width > 0 && clipped.height > 0).then_some(clipped)
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        if let Some(clipped) = self.clip(area) {
            widget.render(clipped, self.buffer);
        }
    }

    pub fn render_stateful_widget<W: StatefulWidget>(
        &mut self,
        widget: W,
        area: Rect,
        state: &mut W::State,
    ) {
        if let Some(clipped) = self.clip(area) {
            widget.render(clipped, self.buffer, state);
        }
    }

    /// Write `text` at (`x`, `y`), truncated to the visible width.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let Some(row) = self.clip(Rect {
            x,
            y,
            width: self.area.right().saturating_sub(x),
            height: 1,
        }) else {
            return;
        };
        if row.x != x {
            return;
        }
        let text = truncate_to_width(text, row.width as usize);
        self.buffer.set_string(x, y, text, style);
    }
}

pub fn truncate_to_width(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    #[test]
    fn render_widget_clips_to_buffer() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 4, 2));
        let mut frame = UiFrame::from_buffer(&mut buffer);
        frame.render_widget(Paragraph::new("abcdef"), Rect::new(2, 1, 10, 5));
        assert_eq!(buffer[(2, 1)].symbol(), "a");
        assert_eq!(buffer[(3, 1)].symbol(), "b");
    }

    #[test]
    fn set_string_truncates_and_skips_offscreen() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 5, 1));
        let mut frame = UiFrame::from_buffer(&mut buffer);
        frame.set_string(2, 0, "hello", Style::default());
        frame.set_string(0, 3, "nope", Style::default());
        assert_eq!(buffer[(2, 0)].symbol(), "h");
        assert_eq!(buffer[(4, 0)].symbol(), "l");
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate_to_width("héllo", 2), "hé");
        assert_eq!(truncate_to_width("ab", 5), "ab");
    }
}
