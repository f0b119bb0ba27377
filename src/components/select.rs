use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::{Rect, Size};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::dropdown_list::{DropdownList, step_highlight};
use super::{Component, ComponentContext, Floating, Response};
use crate::constants::DEFAULT_MAX_VISIBLE_OPTIONS;
use crate::floating::{CloseReason, FloatingPanel, OpenReason, PanelConfig, PanelEvent};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::option::{OptionItem, OptionList};
use crate::ui::UiFrame;
use crate::value::ValueSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectEvent {
    Changed(Option<String>),
}

/// Single-choice dropdown.
///
/// Controlled when built with `with_value` (the host applies every
/// `SelectEvent::Changed` through `sync_value`), uncontrolled otherwise.
#[derive(Debug)]
pub struct SelectComponent {
    options: OptionList,
    value: ValueSource<Option<String>>,
    placeholder: String,
    disabled: bool,
    clearable: bool,
    max_visible: usize,
    panel: FloatingPanel,
    list: DropdownList,
    highlighted: Option<usize>,
    clear_glyph: Option<Rect>,
}

impl SelectComponent {
    pub fn new(options: OptionList) -> Self {
        Self {
            options,
            value: ValueSource::uncontrolled(None),
            placeholder: "Select...".to_string(),
            disabled: false,
            clearable: false,
            max_visible: DEFAULT_MAX_VISIBLE_OPTIONS,
            panel: FloatingPanel::new(PanelConfig::dropdown()),
            list: DropdownList::default(),
            highlighted: None,
            clear_glyph: None,
        }
    }

    pub fn with_value(mut self, value: Option<String>) -> Self {
        self.value = ValueSource::controlled(value);
        self
    }

    pub fn with_default_value(mut self, value: Option<String>) -> Self {
        self.value = ValueSource::uncontrolled(value);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible.max(1);
        self
    }

    pub fn with_panel_config(mut self, config: PanelConfig) -> Self {
        self.panel.set_config(config);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.set_disabled(disabled);
        self
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.close(CloseReason::Programmatic);
        }
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn value(&self) -> Option<&str> {
        self.value.current().as_deref()
    }

    /// Push the host-owned value of a controlled select.
    pub fn sync_value(&mut self, value: Option<String>) {
        self.value.sync(value);
    }

    pub fn options(&self) -> &OptionList {
        &self.options
    }

    pub fn set_options(&mut self, options: OptionList) {
        self.options = options;
        self.highlighted = self
            .highlighted
            .filter(|&index| index < self.options.len());
        self.update_panel_size();
    }

    pub fn selected_option(&self) -> Option<&OptionItem> {
        self.value().and_then(|value| self.options.find(value))
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn is_open(&self) -> bool {
        self.panel.is_open()
    }

    pub fn panel(&self) -> &FloatingPanel {
        &self.panel
    }

    fn update_panel_size(&mut self) {
        self.panel.set_panel_size(Size {
            width: 0,
            height: DropdownList::panel_height(self.options.len(), self.max_visible),
        });
    }

    pub fn open(&mut self, reason: OpenReason) -> bool {
        if self.disabled {
            return false;
        }
        self.update_panel_size();
        if !self.panel.open(reason) {
            return false;
        }
        self.highlighted = self.value().and_then(|value| self.options.position(value));
        true
    }

    pub fn close(&mut self, reason: CloseReason) -> bool {
        let closed = self.panel.close(reason);
        if closed {
            self.clear_transient();
        }
        closed
    }

    fn clear_transient(&mut self) {
        self.highlighted = None;
        self.list.reset();
    }

    fn clear_value(&mut self) -> Option<SelectEvent> {
        if !self.clearable {
            return None;
        }
        self.close(CloseReason::Programmatic);
        let change = self.value.commit(None);
        if change.is_some() {
            tracing::debug!("select cleared");
        }
        change.map(SelectEvent::Changed)
    }

    fn commit_index(&mut self, index: usize) -> Option<SelectEvent> {
        let item = self.options.get(index)?;
        if item.disabled {
            return None;
        }
        let next = Some(item.value.clone());
        let change = self.value.commit(next);
        self.close(CloseReason::Selection);
        change.map(SelectEvent::Changed)
    }

    fn handle_key(&mut self, event: &Event) -> Response<SelectEvent> {
        let Event::Key(key) = event else {
            return Response::ignored();
        };
        let kb = KeyBindings::shared();
        if !self.is_open() {
            if kb.matches(Action::Open, key) {
                self.open(OpenReason::Keyboard);
                return Response::handled();
            }
            if self.clearable && kb.matches(Action::Clear, key) && self.value().is_some() {
                return Response::emit(self.clear_value());
            }
            return Response::ignored();
        }
        let len = self.options.len();
        if kb.matches(Action::Close, key) {
            self.close(CloseReason::Escape);
        } else if kb.matches(Action::Commit, key) {
            if let Some(index) = self.highlighted {
                return Response::emit(self.commit_index(index));
            }
        } else if kb.matches(Action::HighlightNext, key) {
            self.highlighted = step_highlight(self.highlighted, 1, len);
        } else if kb.matches(Action::HighlightPrev, key) {
            self.highlighted = step_highlight(self.highlighted, -1, len);
        } else if kb.matches(Action::HighlightFirst, key) {
            self.highlighted = (len > 0).then_some(0);
        } else if kb.matches(Action::HighlightLast, key) {
            self.highlighted = len.checked_sub(1);
        } else if kb.matches(Action::FocusNext, key) || kb.matches(Action::FocusPrev, key) {
            self.close(CloseReason::Blur);
            return Response::ignored();
        }
        Response::handled()
    }

    pub fn handle_select_event(
        &mut self,
        event: &Event,
        ctx: &ComponentContext,
    ) -> Response<SelectEvent> {
        if self.disabled {
            return Response::ignored();
        }
        self.panel.set_viewport(ctx.viewport());
        if let Some(PanelEvent::Closed(_)) = self.panel.handle_event(event) {
            self.clear_transient();
            return Response::ignored();
        }
        match event {
            Event::Key(_) if ctx.focused() => self.handle_key(event),
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if self
                    .clear_glyph
                    .is_some_and(|rect| rect_contains(rect, mouse.column, mouse.row))
                {
                    return Response::emit(self.clear_value());
                }
                if rect_contains(self.panel.anchor_rect(), mouse.column, mouse.row) {
                    if self.is_open() {
                        self.close(CloseReason::Programmatic);
                    } else {
                        self.open(OpenReason::Click);
                    }
                    return Response::handled();
                }
                if self.is_open()
                    && let Some(index) = self.list.index_at(mouse.column, mouse.row)
                {
                    return Response::emit(self.commit_index(index));
                }
                Response::ignored()
            }
            Event::Mouse(_) if self.is_open() => Response {
                handled: self.list.handle_scroll(event),
                event: None,
            },
            _ => Response::ignored(),
        }
    }
}

/// Paint a one-line trigger box; bordered when the area is tall enough.
/// Returns where the suffix landed, if it fit.
pub(crate) fn render_trigger(
    frame: &mut UiFrame<'_>,
    area: Rect,
    text: &str,
    text_style: Style,
    suffix: &str,
    focused: bool,
) -> Option<Rect> {
    let inner = if area.height >= 3 {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(crate::theme::trigger_border(focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        inner
    } else {
        area
    };
    if inner.width == 0 || inner.height == 0 {
        return None;
    }
    let suffix_width = suffix.chars().count() as u16;
    let text_area = Rect {
        width: inner.width.saturating_sub(suffix_width + 1),
        height: 1,
        ..inner
    };
    frame.render_widget(Paragraph::new(text).style(text_style), text_area);
    if inner.width <= suffix_width {
        return None;
    }
    let suffix_rect = Rect {
        x: inner.right() - suffix_width,
        y: inner.y,
        width: suffix_width,
        height: 1,
    };
    frame.set_string(suffix_rect.x, suffix_rect.y, suffix, Style::default());
    Some(suffix_rect)
}

impl Component for SelectComponent {
    fn resize(&mut self, area: Rect, ctx: &ComponentContext) {
        self.panel.set_viewport(ctx.viewport());
        self.panel.set_anchor(area);
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.resize(area, ctx);
        let (text, style) = match self.selected_option() {
            Some(item) => (item.label.clone(), Style::default()),
            None => (self.placeholder.clone(), crate::theme::placeholder()),
        };
        let style = if self.disabled {
            crate::theme::disabled()
        } else {
            style
        };
        let show_clear = self.clearable && self.value().is_some() && !self.disabled;
        let suffix = match (show_clear, self.is_open()) {
            (true, _) => "× ▾",
            (false, true) => "▴",
            (false, false) => "▾",
        };
        let suffix_rect = render_trigger(frame, area, &text, style, suffix, ctx.focused());
        // The clear glyph is the first cell of the suffix.
        self.clear_glyph = suffix_rect
            .filter(|_| show_clear)
            .map(|rect| Rect { width: 1, ..rect });
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        self.handle_select_event(event, ctx).handled
    }
}

impl Floating for SelectComponent {
    fn render_floating(&mut self, frame: &mut UiFrame<'_>, _ctx: &ComponentContext) {
        let Some(rect) = self.panel.panel_rect() else {
            return;
        };
        let items: Vec<&OptionItem> = self.options.iter().collect();
        let selected = self.value.current().clone();
        self.list
            .render(frame, rect, &items, self.highlighted, selected.as_deref());
    }

    fn floating_open(&self) -> bool {
        self.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
    use ratatui::buffer::Buffer;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn ctx() -> ComponentContext {
        ComponentContext::new(
            true,
            Size {
                width: 80,
                height: 24,
            },
        )
    }

    fn fruit() -> OptionList {
        OptionList::new(vec![
            OptionItem::new("a", "Apple"),
            OptionItem::new("b", "Banana").disabled(true),
            OptionItem::new("c", "Cherry"),
        ])
        .unwrap()
    }

    fn rendered(select: &mut SelectComponent) -> Buffer {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 80, 24));
        let mut frame = UiFrame::from_buffer(&mut buffer);
        select.render(&mut frame, Rect::new(2, 1, 20, 3), &ctx());
        select.render_floating(&mut frame, &ctx());
        buffer
    }

    #[test]
    fn open_then_close_leaves_value_unchanged() {
        let mut select = SelectComponent::new(fruit());
        rendered(&mut select);
        assert!(select.handle_event(&key(KeyCode::Down), &ctx()));
        assert!(select.is_open());
        assert!(select.handle_event(&key(KeyCode::Esc), &ctx()));
        assert!(!select.is_open());
        assert_eq!(select.value(), None);
        assert_eq!(select.highlighted(), None);
    }

    #[test]
    fn keyboard_commit_emits_change_and_closes() {
        let mut select = SelectComponent::new(fruit());
        rendered(&mut select);
        select.handle_event(&key(KeyCode::Enter), &ctx());
        select.handle_event(&key(KeyCode::Down), &ctx());
        let response = select.handle_select_event(&key(KeyCode::Enter), &ctx());
        assert_eq!(response.event, Some(SelectEvent::Changed(Some("a".into()))));
        assert_eq!(select.value(), Some("a"));
        assert!(!select.is_open());
    }

    #[test]
    fn disabled_option_cannot_be_committed() {
        let mut select = SelectComponent::new(fruit());
        rendered(&mut select);
        select.open(OpenReason::Programmatic);
        select.handle_event(&key(KeyCode::Down), &ctx());
        select.handle_event(&key(KeyCode::Down), &ctx());
        assert_eq!(select.highlighted(), Some(1));
        let response = select.handle_select_event(&key(KeyCode::Enter), &ctx());
        assert_eq!(response.event, None);
        assert!(select.is_open());
        assert_eq!(select.value(), None);
    }

    #[test]
    fn highlight_is_clamped() {
        let mut select = SelectComponent::new(fruit());
        select.open(OpenReason::Programmatic);
        for _ in 0..10 {
            select.handle_event(&key(KeyCode::Down), &ctx());
        }
        assert_eq!(select.highlighted(), Some(2));
        select.handle_event(&key(KeyCode::Home), &ctx());
        assert_eq!(select.highlighted(), Some(0));
        select.handle_event(&key(KeyCode::Up), &ctx());
        assert_eq!(select.highlighted(), None);
    }

    #[test]
    fn mouse_toggle_and_option_click() {
        let mut select = SelectComponent::new(fruit());
        rendered(&mut select);
        assert!(select.handle_event(&click(5, 2), &ctx()));
        assert!(select.is_open());
        // Panel sits right under the trigger: border on row 4, Apple on 5.
        rendered(&mut select);
        let response = select.handle_select_event(&click(6, 7), &ctx());
        assert_eq!(response.event, Some(SelectEvent::Changed(Some("c".into()))));
        assert!(!select.is_open());
    }

    #[test]
    fn outside_click_closes_without_change() {
        let mut select = SelectComponent::new(fruit()).with_default_value(Some("c".into()));
        rendered(&mut select);
        select.open(OpenReason::Click);
        assert_eq!(select.highlighted(), Some(2));
        let response = select.handle_select_event(&click(70, 20), &ctx());
        assert!(!response.handled);
        assert!(!select.is_open());
        assert_eq!(select.highlighted(), None);
        assert_eq!(select.value(), Some("c"));
    }

    #[test]
    fn controlled_value_waits_for_host() {
        let mut select = SelectComponent::new(fruit()).with_value(None);
        select.open(OpenReason::Programmatic);
        select.handle_event(&key(KeyCode::Down), &ctx());
        let response = select.handle_select_event(&key(KeyCode::Enter), &ctx());
        assert_eq!(response.event, Some(SelectEvent::Changed(Some("a".into()))));
        assert_eq!(select.value(), None);
        select.sync_value(Some("a".into()));
        assert_eq!(select.selected_option().map(|o| o.label.as_str()), Some("Apple"));
    }

    #[test]
    fn clearable_select_clears_when_closed() {
        let mut select = SelectComponent::new(fruit())
            .with_default_value(Some("a".into()))
            .with_clearable(true);
        let response = select.handle_select_event(&key(KeyCode::Backspace), &ctx());
        assert_eq!(response.event, Some(SelectEvent::Changed(None)));
        assert_eq!(select.value(), None);
    }

    #[test]
    fn clicking_clear_glyph_clears_without_opening() {
        let mut select = SelectComponent::new(fruit())
            .with_default_value(Some("a".into()))
            .with_clearable(true);
        let buffer = rendered(&mut select);
        // Inner row 2 spans x 3..21; the "× ▾" suffix starts at x 18.
        assert_eq!(buffer[(18, 2)].symbol(), "×");
        let response = select.handle_select_event(&click(18, 2), &ctx());
        assert_eq!(response.event, Some(SelectEvent::Changed(None)));
        assert_eq!(select.value(), None);
        assert!(!select.is_open());

        // Once cleared the glyph is gone and the same cell toggles the panel.
        let buffer = rendered(&mut select);
        assert_ne!(buffer[(18, 2)].symbol(), "×");
        let response = select.handle_select_event(&click(18, 2), &ctx());
        assert_eq!(response.event, None);
        assert!(select.is_open());
    }

    #[test]
    fn clear_glyph_closes_an_open_panel() {
        let mut select = SelectComponent::new(fruit())
            .with_default_value(Some("c".into()))
            .with_clearable(true);
        rendered(&mut select);
        select.open(OpenReason::Click);
        let response = select.handle_select_event(&click(18, 2), &ctx());
        assert_eq!(response.event, Some(SelectEvent::Changed(None)));
        assert!(!select.is_open());
    }

    #[test]
    fn disabled_select_ignores_everything() {
        let mut select = SelectComponent::new(fruit()).with_disabled(true);
        assert!(!select.handle_event(&key(KeyCode::Enter), &ctx()));
        assert!(!select.open(OpenReason::Click));
    }

    #[test]
    fn renders_placeholder_and_panel() {
        let mut select = SelectComponent::new(fruit()).with_placeholder("Pick");
        let buffer = rendered(&mut select);
        assert_eq!(buffer[(3, 2)].symbol(), "P");
        select.open(OpenReason::Programmatic);
        let buffer = rendered(&mut select);
        // "  Apple" inside the panel border
        assert_eq!(buffer[(5, 5)].symbol(), "A");
    }
}
