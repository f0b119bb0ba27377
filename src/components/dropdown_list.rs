//! Option list painted inside a dropdown panel, shared by `SelectComponent`
//! and `AutocompleteComponent`.

use crossterm::event::{Event, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem};

use crate::layout::rect_contains;
use crate::option::OptionItem;
use crate::ui::UiFrame;

/// Move a highlight by `delta` within `[-1, len - 1]` (`None` is -1).
///
/// There is no wraparound: stepping past either end stays on the end.
pub fn step_highlight(current: Option<usize>, delta: isize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let pos = current.map_or(-1, |i| i as isize).saturating_add(delta);
    let clamped = pos.clamp(-1, len as isize - 1);
    (clamped >= 0).then_some(clamped as usize)
}

#[derive(Debug, Clone, Default)]
pub struct DropdownList {
    offset: usize,
    rows: Option<Rect>,
    len: usize,
}

impl DropdownList {
    /// Panel height for `count` options, borders included. An empty list
    /// keeps one row for the "No options" hint.
    pub fn panel_height(count: usize, max_visible: usize) -> u16 {
        (count.min(max_visible.max(1)).max(1) + 2) as u16
    }

    pub fn reset(&mut self) {
        self.offset = 0;
        self.rows = None;
        self.len = 0;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn keep_in_view(&mut self, highlighted: Option<usize>, view: usize) {
        if view == 0 || self.len == 0 {
            self.offset = 0;
            return;
        }
        self.offset = self.offset.min(self.len.saturating_sub(view));
        let Some(index) = highlighted else {
            return;
        };
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + view {
            self.offset = index + 1 - view;
        }
    }

    pub fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        rect: Rect,
        items: &[&OptionItem],
        highlighted: Option<usize>,
        selected: Option<&str>,
    ) {
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .style(crate::theme::panel());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        self.rows = Some(inner);
        self.len = items.len();
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        if items.is_empty() {
            frame.set_string(inner.x, inner.y, "No options", crate::theme::placeholder());
            return;
        }
        let view = inner.height as usize;
        self.keep_in_view(highlighted, view);
        let rows = items
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(view)
            .map(|(index, item)| {
                let is_selected = selected == Some(item.value.as_str());
                let marker = if is_selected { "✓ " } else { "  " };
                let mut style = if item.disabled {
                    crate::theme::disabled()
                } else if is_selected {
                    crate::theme::selected()
                } else {
                    ratatui::style::Style::default()
                };
                if highlighted == Some(index) {
                    style = style.patch(crate::theme::highlighted());
                }
                ListItem::new(Line::from(vec![
                    Span::raw(marker),
                    Span::styled(item.label.clone(), style),
                ]))
            })
            .collect::<Vec<_>>();
        frame.render_widget(List::new(rows), inner);
    }

    /// Index of the option row under (`column`, `row`) in the last render.
    pub fn index_at(&self, column: u16, row: u16) -> Option<usize> {
        let rows = self.rows?;
        if !rect_contains(rows, column, row) {
            return None;
        }
        let index = self.offset + (row - rows.y) as usize;
        (index < self.len).then_some(index)
    }

    /// Scroll the list with the wheel when the pointer is over it.
    pub fn handle_scroll(&mut self, event: &Event) -> bool {
        let (Event::Mouse(mouse), Some(rows)) = (event, self.rows) else {
            return false;
        };
        if !rect_contains(rows, mouse.column, mouse.row) {
            return false;
        }
        let max_offset = self.len.saturating_sub(rows.height as usize);
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                self.offset = (self.offset + 1).min(max_offset);
                true
            }
            MouseEventKind::ScrollUp => {
                self.offset = self.offset.saturating_sub(1);
                true
            }
            _ => false,
        }
    }
}
