use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, List, ListItem};

use super::{Component, ComponentContext, Response};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::option::OptionList;
use crate::ui::UiFrame;
use crate::value::ValueSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckboxGroupEvent {
    Changed(Vec<String>),
}

/// Multi-choice list of checkboxes.
///
/// The value is the list of checked option values, always in option order.
#[derive(Debug)]
pub struct CheckboxGroupComponent {
    title: String,
    options: OptionList,
    value: ValueSource<Vec<String>>,
    cursor: usize,
    disabled: bool,
    rows: Option<Rect>,
    offset: usize,
}

impl CheckboxGroupComponent {
    pub fn new(title: impl Into<String>, options: OptionList) -> Self {
        Self {
            title: title.into(),
            options,
            value: ValueSource::uncontrolled(Vec::new()),
            cursor: 0,
            disabled: false,
            rows: None,
            offset: 0,
        }
    }

    pub fn with_value(mut self, value: Vec<String>) -> Self {
        self.value = ValueSource::controlled(self.ordered(value));
        self
    }

    pub fn with_default_value(mut self, value: Vec<String>) -> Self {
        self.value = ValueSource::uncontrolled(self.ordered(value));
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn value(&self) -> &[String] {
        self.value.current()
    }

    pub fn sync_value(&mut self, value: Vec<String>) {
        let value = self.ordered(value);
        self.value.sync(value);
    }

    pub fn is_checked(&self, value: &str) -> bool {
        self.value.current().iter().any(|v| v == value)
    }

    pub fn options(&self) -> &OptionList {
        &self.options
    }

    pub fn set_options(&mut self, options: OptionList) {
        self.options = options;
        self.cursor = self.cursor.min(self.options.len().saturating_sub(1));
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize) {
        self.bump_cursor(delta);
    }

    fn bump_cursor(&mut self, delta: isize) {
        if self.options.is_empty() {
            self.cursor = 0;
            return;
        }
        if delta.is_negative() {
            self.cursor = self.cursor.saturating_sub(delta.unsigned_abs());
        } else {
            self.cursor = (self.cursor + delta as usize).min(self.options.len() - 1);
        }
    }

    /// Keep known values only, in option order.
    fn ordered(&self, value: Vec<String>) -> Vec<String> {
        self.options
            .iter()
            .filter(|option| value.contains(&option.value))
            .map(|option| option.value.clone())
            .collect()
    }

    /// Flip the option at `index`. Disabled options and a disabled group are
    /// left untouched.
    pub fn toggle(&mut self, index: usize) -> Option<CheckboxGroupEvent> {
        if self.disabled {
            return None;
        }
        let option = self.options.get(index).filter(|option| !option.disabled)?;
        let target = option.value.clone();
        let checked = self.is_checked(&target);
        let next: Vec<String> = self
            .options
            .iter()
            .filter(|option| {
                if option.value == target {
                    !checked
                } else {
                    self.is_checked(&option.value)
                }
            })
            .map(|option| option.value.clone())
            .collect();
        tracing::debug!(value = %target, checked = !checked, "checkbox toggled");
        self.value.commit(next).map(CheckboxGroupEvent::Changed)
    }

    pub fn handle_checkbox_event(
        &mut self,
        event: &Event,
        ctx: &ComponentContext,
    ) -> Response<CheckboxGroupEvent> {
        match event {
            Event::Key(key) if ctx.focused() => {
                let kb = KeyBindings::shared();
                if kb.matches(Action::HighlightPrev, key) {
                    self.bump_cursor(-1);
                } else if kb.matches(Action::HighlightNext, key) {
                    self.bump_cursor(1);
                } else if kb.matches(Action::HighlightFirst, key) {
                    self.cursor = 0;
                } else if kb.matches(Action::HighlightLast, key) {
                    self.cursor = self.options.len().saturating_sub(1);
                } else if kb.matches(Action::Toggle, key) {
                    return Response::emit(self.toggle(self.cursor));
                } else {
                    return Response::ignored();
                }
                Response::handled()
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let Some(rows) = self.rows else {
                    return Response::ignored();
                };
                if !rect_contains(rows, mouse.column, mouse.row) {
                    return Response::ignored();
                }
                let index = self.offset + (mouse.row - rows.y) as usize;
                if index >= self.options.len() {
                    return Response::ignored();
                }
                self.cursor = index;
                Response::emit(self.toggle(index))
            }
            _ => Response::ignored(),
        }
    }
}

impl Component for CheckboxGroupComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(crate::theme::trigger_border(ctx.focused()))
            .title(self.title.as_str());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.rows = None;
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let height = inner.height as usize;
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }

        let items: Vec<ListItem> = self
            .options
            .iter()
            .enumerate()
            .skip(self.offset)
            .take(height)
            .map(|(i, option)| {
                let marker = if self.is_checked(&option.value) {
                    "[x]"
                } else {
                    "[ ]"
                };
                let mut style = Style::default();
                if option.disabled || self.disabled {
                    style = style.patch(crate::theme::disabled());
                }
                if ctx.focused() && i == self.cursor {
                    style = style.patch(crate::theme::highlighted());
                }
                ListItem::new(format!("{marker} {}", option.label)).style(style)
            })
            .collect();
        frame.render_widget(List::new(items), inner);
        self.rows = Some(inner);
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        self.handle_checkbox_event(event, ctx).handled
    }
}
