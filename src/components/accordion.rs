use std::collections::BTreeSet;

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Paragraph, Wrap};

use super::{Component, ComponentContext, Response};
use crate::error::{Result, VelvetError};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccordionMode {
    /// At most one section open.
    #[default]
    Single,
    Multiple,
}

/// Open/closed bookkeeping for a set of accordion sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionState {
    ids: Vec<String>,
    open: BTreeSet<String>,
    mode: AccordionMode,
    collapsible: bool,
}

impl AccordionState {
    pub fn new<I, S>(ids: I, mode: AccordionMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            open: BTreeSet::new(),
            mode,
            // Single mode keeps one section open unless told otherwise.
            collapsible: mode == AccordionMode::Multiple,
        }
    }

    pub fn with_collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    pub fn mode(&self) -> AccordionMode {
        self.mode
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.open.contains(id)
    }

    /// Open sections in declaration order.
    pub fn open_ids(&self) -> Vec<&str> {
        self.ids
            .iter()
            .filter(|id| self.open.contains(id.as_str()))
            .map(String::as_str)
            .collect()
    }

    fn known(&self, id: &str) -> Result<()> {
        if self.ids.iter().any(|known| known == id) {
            Ok(())
        } else {
            Err(VelvetError::UnknownItem(id.to_string()))
        }
    }

    /// Flip a section. Returns whether the state changed.
    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        self.known(id)?;
        if self.open.contains(id) {
            let last_open = self.open.len() == 1;
            if self.mode == AccordionMode::Single && last_open && !self.collapsible {
                return Ok(false);
            }
            self.open.remove(id);
        } else {
            if self.mode == AccordionMode::Single {
                self.open.clear();
            }
            self.open.insert(id.to_string());
        }
        tracing::debug!(section = id, open = self.open.contains(id), "accordion toggled");
        Ok(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionItem {
    pub id: String,
    pub title: String,
    pub body: String,
}

impl AccordionItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug)]
pub struct AccordionComponent {
    items: Vec<AccordionItem>,
    state: AccordionState,
    cursor: usize,
    headers: Vec<Rect>,
}

impl AccordionComponent {
    pub fn new(items: Vec<AccordionItem>, mode: AccordionMode) -> Self {
        let state = AccordionState::new(items.iter().map(|item| item.id.clone()), mode);
        Self {
            items,
            state,
            cursor: 0,
            headers: Vec::new(),
        }
    }

    pub fn with_collapsible(mut self, collapsible: bool) -> Self {
        self.state = self.state.with_collapsible(collapsible);
        self
    }

    pub fn state(&self) -> &AccordionState {
        &self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn toggle(&mut self, id: &str) -> Result<bool> {
        self.state.toggle(id)
    }

    fn toggle_index(&mut self, index: usize) -> bool {
        let Some(id) = self.items.get(index).map(|item| item.id.clone()) else {
            return false;
        };
        self.cursor = index;
        self.state.toggle(&id).unwrap_or(false)
    }

    pub fn handle_accordion_event(
        &mut self,
        event: &Event,
        ctx: &ComponentContext,
    ) -> Response<()> {
        match event {
            Event::Key(key) if ctx.focused() => {
                let kb = KeyBindings::shared();
                if kb.matches(Action::HighlightPrev, key) {
                    self.cursor = self.cursor.saturating_sub(1);
                    Response::handled()
                } else if kb.matches(Action::HighlightNext, key) {
                    self.cursor = (self.cursor + 1).min(self.items.len().saturating_sub(1));
                    Response::handled()
                } else if kb.matches(Action::Toggle, key) {
                    let changed = self.toggle_index(self.cursor);
                    Response::emit(changed.then_some(()))
                } else {
                    Response::ignored()
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let hit = self
                    .headers
                    .iter()
                    .position(|rect| rect_contains(*rect, mouse.column, mouse.row));
                match hit {
                    Some(index) => {
                        let changed = self.toggle_index(index);
                        Response::emit(changed.then_some(()))
                    }
                    None => Response::ignored(),
                }
            }
            _ => Response::ignored(),
        }
    }
}

impl Component for AccordionComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.headers.clear();
        let mut y = area.y;
        for (index, item) in self.items.iter().enumerate() {
            if y >= area.bottom() {
                break;
            }
            let open = self.state.is_open(&item.id);
            let marker = if open { "▾" } else { "▸" };
            let mut style = crate::theme::selected();
            if ctx.focused() && index == self.cursor {
                style = style.patch(crate::theme::highlighted());
            }
            frame.set_string(area.x, y, &format!("{marker} {}", item.title), style);
            self.headers.push(Rect {
                x: area.x,
                y,
                width: area.width,
                height: 1,
            });
            y += 1;
            if open && y < area.bottom() {
                let body_height = (item.body.lines().count().max(1) as u16).min(area.bottom() - y);
                let body = Rect {
                    x: area.x.saturating_add(2),
                    y,
                    width: area.width.saturating_sub(2),
                    height: body_height,
                };
                frame.render_widget(
                    Paragraph::new(item.body.as_str())
                        .style(Style::default())
                        .wrap(Wrap { trim: true }),
                    body,
                );
                y += body_height;
            }
        }
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        self.handle_accordion_event(event, ctx).handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    #[test]
    fn single_mode_keeps_one_open() {
        let mut state = AccordionState::new(["a", "b", "c"], AccordionMode::Single);
        assert!(state.toggle("a").unwrap());
        assert!(state.toggle("b").unwrap());
        assert_eq!(state.open_ids(), vec!["b"]);
        // Not collapsible: the last open section stays open.
        assert!(!state.toggle("b").unwrap());
        assert!(state.is_open("b"));
    }

    #[test]
    fn collapsible_single_can_close_all() {
        let mut state =
            AccordionState::new(["a", "b"], AccordionMode::Single).with_collapsible(true);
        state.toggle("a").unwrap();
        assert!(state.toggle("a").unwrap());
        assert!(state.open_ids().is_empty());
    }

    #[test]
    fn multiple_mode_opens_independently() {
        let mut state = AccordionState::new(["a", "b", "c"], AccordionMode::Multiple);
        state.toggle("c").unwrap();
        state.toggle("a").unwrap();
        assert_eq!(state.open_ids(), vec!["a", "c"]);
        state.toggle("c").unwrap();
        assert_eq!(state.open_ids(), vec!["a"]);
    }

    #[test]
    fn unknown_section_is_an_error() {
        let mut state = AccordionState::new(["a"], AccordionMode::Single);
        assert_eq!(
            state.toggle("zzz"),
            Err(VelvetError::UnknownItem("zzz".into()))
        );
    }

    #[test]
    fn keyboard_and_mouse_toggle() {
        let mut accordion = AccordionComponent::new(
            vec![
                AccordionItem::new("shipping", "Shipping", "Ships in 2 days."),
                AccordionItem::new("returns", "Returns", "30 day returns."),
            ],
            AccordionMode::Multiple,
        );
        let ctx = ComponentContext::default().with_focus(true);
        let enter = Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(accordion.handle_accordion_event(&enter, &ctx).event, Some(()));
        assert!(accordion.state().is_open("shipping"));

        let area = Rect::new(0, 0, 30, 6);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_buffer(&mut buffer);
        accordion.render(&mut frame, area, &ctx);
        assert_eq!(buffer[(0, 0)].symbol(), "▾");
        assert_eq!(buffer[(2, 1)].symbol(), "S");
        assert_eq!(buffer[(0, 2)].symbol(), "▸");

        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 2,
            modifiers: KeyModifiers::NONE,
        });
        assert!(accordion.handle_event(&click, &ctx));
        assert!(accordion.state().is_open("returns"));
        assert_eq!(accordion.cursor(), 1);
    }
}
