use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;

use super::{Component, ComponentContext, Response};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::ui::UiFrame;
use crate::value::ValueSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabItem {
    pub value: String,
    pub label: String,
    pub disabled: bool,
}

impl TabItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabsEvent {
    Changed(String),
}

/// A row of tab labels with one active tab.
#[derive(Debug)]
pub struct TabsComponent {
    tabs: Vec<TabItem>,
    value: ValueSource<String>,
    hits: Vec<Rect>,
}

impl TabsComponent {
    /// Starts on the first enabled tab.
    pub fn new(tabs: Vec<TabItem>) -> Self {
        let first = tabs
            .iter()
            .find(|tab| !tab.disabled)
            .map(|tab| tab.value.clone())
            .unwrap_or_default();
        Self {
            tabs,
            value: ValueSource::uncontrolled(first),
            hits: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = ValueSource::controlled(value.into());
        self
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.value = ValueSource::uncontrolled(value.into());
        self
    }

    pub fn value(&self) -> &str {
        self.value.current()
    }

    pub fn sync_value(&mut self, value: impl Into<String>) {
        self.value.sync(value.into());
    }

    pub fn tabs(&self) -> &[TabItem] {
        &self.tabs
    }

    fn active_index(&self) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.value == self.value())
    }

    /// Next enabled tab in `direction`, wrapping at either end.
    fn neighbour(&self, direction: isize) -> Option<usize> {
        let len = self.tabs.len() as isize;
        if len == 0 {
            return None;
        }
        let start = match self.active_index() {
            Some(index) => index as isize,
            None if direction > 0 => -1,
            None => len,
        };
        (1..=len)
            .map(|step| (start + direction * step).rem_euclid(len) as usize)
            .find(|&index| !self.tabs[index].disabled)
    }

    pub fn select(&mut self, index: usize) -> Option<TabsEvent> {
        let tab = self.tabs.get(index).filter(|tab| !tab.disabled)?;
        let next = tab.value.clone();
        tracing::debug!(tab = %next, "tab selected");
        self.value.commit(next).map(TabsEvent::Changed)
    }

    pub fn select_next(&mut self) -> Option<TabsEvent> {
        self.neighbour(1).and_then(|index| self.select(index))
    }

    pub fn select_prev(&mut self) -> Option<TabsEvent> {
        self.neighbour(-1).and_then(|index| self.select(index))
    }

    pub fn handle_tabs_event(
        &mut self,
        event: &Event,
        ctx: &ComponentContext,
    ) -> Response<TabsEvent> {
        match event {
            Event::Key(key) if ctx.focused() => {
                let kb = KeyBindings::shared();
                if kb.matches(Action::TabNext, key) {
                    Response::emit(self.select_next())
                } else if kb.matches(Action::TabPrev, key) {
                    Response::emit(self.select_prev())
                } else {
                    Response::ignored()
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let hit = self
                    .hits
                    .iter()
                    .position(|rect| rect_contains(*rect, mouse.column, mouse.row));
                match hit {
                    Some(index) => Response::emit(self.select(index)),
                    None => Response::ignored(),
                }
            }
            _ => Response::ignored(),
        }
    }
}

impl Component for TabsComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.hits.clear();
        if area.height == 0 {
            return;
        }
        let active = self.active_index();
        let mut x = area.x;
        for (index, tab) in self.tabs.iter().enumerate() {
            let label = format!(" {} ", tab.label);
            let width = label.chars().count() as u16;
            let mut style = Style::default();
            if tab.disabled {
                style = style.patch(crate::theme::disabled());
            }
            if Some(index) == active {
                style = style.patch(crate::theme::selected());
                if ctx.focused() {
                    style = style.patch(crate::theme::highlighted());
                }
            }
            frame.set_string(x, area.y, &label, style);
            self.hits.push(Rect {
                x,
                y: area.y,
                width: width.min(area.right().saturating_sub(x)),
                height: 1,
            });
            x = x.saturating_add(width + 1);
        }
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        self.handle_tabs_event(event, ctx).handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    fn tabs() -> TabsComponent {
        TabsComponent::new(vec![
            TabItem::new("account", "Account"),
            TabItem::new("billing", "Billing").disabled(true),
            TabItem::new("team", "Team"),
        ])
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn arrows_skip_disabled_and_wrap() {
        let mut tabs = tabs();
        let ctx = ComponentContext::default().with_focus(true);
        assert_eq!(tabs.value(), "account");
        let response = tabs.handle_tabs_event(&key(KeyCode::Right), &ctx);
        assert_eq!(response.event, Some(TabsEvent::Changed("team".into())));
        let response = tabs.handle_tabs_event(&key(KeyCode::Right), &ctx);
        assert_eq!(response.event, Some(TabsEvent::Changed("account".into())));
        let response = tabs.handle_tabs_event(&key(KeyCode::Left), &ctx);
        assert_eq!(response.event, Some(TabsEvent::Changed("team".into())));
    }

    #[test]
    fn unfocused_ignores_keys() {
        let mut tabs = tabs();
        assert!(!tabs.handle_event(&key(KeyCode::Right), &ComponentContext::default()));
    }

    #[test]
    fn disabled_tab_cannot_be_selected() {
        let mut tabs = tabs();
        assert_eq!(tabs.select(1), None);
        assert_eq!(tabs.value(), "account");
    }

    #[test]
    fn controlled_tabs_wait_for_sync() {
        let mut tabs = tabs().with_value("account");
        assert_eq!(tabs.select_next(), Some(TabsEvent::Changed("team".into())));
        assert_eq!(tabs.value(), "account");
        tabs.sync_value("team");
        assert_eq!(tabs.value(), "team");
    }

    #[test]
    fn click_selects_tab() {
        let mut tabs = tabs();
        let area = Rect::new(0, 0, 40, 1);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_buffer(&mut buffer);
        tabs.render(&mut frame, area, &ComponentContext::default());
        // " Account " spans 0..9, " Billing " 10..19, " Team " 20..26.
        assert_eq!(buffer[(21, 0)].symbol(), "T");
        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 22,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        let response = tabs.handle_tabs_event(&click, &ComponentContext::default());
        assert_eq!(response.event, Some(TabsEvent::Changed("team".into())));
    }
}
