use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::layout::{Rect, Size};
use ratatui::style::Style;

use super::dropdown_list::{DropdownList, step_highlight};
use super::select::render_trigger;
use super::{Component, ComponentContext, Floating, Response};
use crate::constants::{AUTOCOMPLETE_BLUR_DELAY, DEFAULT_MAX_VISIBLE_OPTIONS};
use crate::floating::{CloseReason, FloatingPanel, OpenReason, PanelConfig, PanelEvent};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::option::{OptionItem, OptionList};
use crate::ui::UiFrame;
use crate::value::ValueSource;

/// Decides whether an option matches the current query.
pub type FilterFn = Box<dyn Fn(&OptionItem, &str) -> bool>;

/// Case-insensitive substring match on the label. An empty query matches all.
pub fn default_filter(item: &OptionItem, query: &str) -> bool {
    item.label.to_lowercase().contains(&query.to_lowercase())
}

pub fn filter_options<'a, I>(
    options: I,
    query: &str,
    filter: Option<&FilterFn>,
) -> Vec<&'a OptionItem>
where
    I: IntoIterator<Item = &'a OptionItem>,
{
    options
        .into_iter()
        .filter(|item| match filter {
            Some(filter) => filter(*item, query),
            None => default_filter(item, query),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteEvent {
    Changed(Option<String>),
    QueryChanged(String),
}

/// Free-text input with a filtered suggestion panel.
///
/// Disabled options are listed but never committed. Losing focus does not
/// close the panel right away: the close is deferred by `blur_delay` so a
/// click on an option can still land, and fires from `tick`.
pub struct AutocompleteComponent {
    options: OptionList,
    filter: Option<FilterFn>,
    query: String,
    filtered: Vec<usize>,
    highlighted: Option<usize>,
    value: ValueSource<Option<String>>,
    placeholder: String,
    disabled: bool,
    max_visible: usize,
    panel: FloatingPanel,
    list: DropdownList,
    blur_delay: Duration,
    blur_deadline: Option<Instant>,
}

impl AutocompleteComponent {
    pub fn new(options: OptionList) -> Self {
        let mut component = Self {
            options,
            filter: None,
            query: String::new(),
            filtered: Vec::new(),
            highlighted: None,
            value: ValueSource::uncontrolled(None),
            placeholder: "Search...".to_string(),
            disabled: false,
            max_visible: DEFAULT_MAX_VISIBLE_OPTIONS,
            panel: FloatingPanel::new(PanelConfig::dropdown()),
            list: DropdownList::default(),
            blur_delay: AUTOCOMPLETE_BLUR_DELAY,
            blur_deadline: None,
        };
        component.refilter();
        component
    }

    pub fn with_value(mut self, value: Option<String>) -> Self {
        self.value = ValueSource::controlled(value);
        self
    }

    pub fn with_default_value(mut self, value: Option<String>) -> Self {
        self.value = ValueSource::uncontrolled(value);
        self
    }

    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&OptionItem, &str) -> bool + 'static,
    {
        self.filter = Some(Box::new(filter));
        self.refilter();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_blur_delay(mut self, delay: Duration) -> Self {
        self.blur_delay = delay;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn set_blur_delay(&mut self, delay: Duration) {
        self.blur_delay = delay;
    }

    pub fn blur_delay(&self) -> Duration {
        self.blur_delay
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.close(CloseReason::Programmatic);
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.current().as_deref()
    }

    pub fn sync_value(&mut self, value: Option<String>) {
        self.value.sync(value);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn is_open(&self) -> bool {
        self.panel.is_open()
    }

    pub fn blur_pending(&self) -> bool {
        self.blur_deadline.is_some()
    }

    pub fn panel(&self) -> &FloatingPanel {
        &self.panel
    }

    /// Options that pass the filter for the current query, in order.
    pub fn filtered(&self) -> Vec<&OptionItem> {
        self.filtered
            .iter()
            .filter_map(|&index| self.options.get(index))
            .collect()
    }

    pub fn set_options(&mut self, options: OptionList) {
        self.options = options;
        self.filtered.clear();
        self.refilter();
    }

    /// Replace the query. Returns whether the filtered set changed, in
    /// which case the highlight is reset.
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        self.query = query.into();
        self.refilter()
    }

    fn refilter(&mut self) -> bool {
        let query = self.query.as_str();
        let filter = self.filter.as_ref();
        let next: Vec<usize> = self
            .options
            .iter()
            .enumerate()
            .filter(|(_, item)| match filter {
                Some(filter) => filter(*item, query),
                None => default_filter(item, query),
            })
            .map(|(index, _)| index)
            .collect();
        let changed = next != self.filtered;
        if changed {
            self.filtered = next;
            self.highlighted = None;
        }
        self.panel.set_panel_size(Size {
            width: 0,
            height: DropdownList::panel_height(self.filtered.len(), self.max_visible),
        });
        changed
    }

    pub fn open(&mut self, reason: OpenReason) -> bool {
        if self.disabled {
            return false;
        }
        self.panel.open(reason)
    }

    pub fn close(&mut self, reason: CloseReason) -> bool {
        self.blur_deadline = None;
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

    /// The input gained focus: cancel a pending blur close and open.
    pub fn focus(&mut self) {
        self.blur_deadline = None;
        self.open(OpenReason::Focus);
    }

    /// The input lost focus at `now`; the panel closes `blur_delay` later.
    pub fn blur(&mut self, now: Instant) {
        if self.is_open() {
            self.blur_deadline = Some(now + self.blur_delay);
        }
    }

    /// Fire a due blur close. Returns whether the panel closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.blur_deadline {
            Some(deadline) if now >= deadline => self.close(CloseReason::Blur),
            _ => false,
        }
    }

    fn commit_filtered(&mut self, position: usize) -> Option<AutocompleteEvent> {
        let index = *self.filtered.get(position)?;
        let item = self.options.get(index)?;
        if item.disabled {
            return None;
        }
        let value = item.value.clone();
        self.query = item.label.clone();
        let change = self.value.commit(Some(value));
        self.close(CloseReason::Selection);
        self.refilter();
        change.map(AutocompleteEvent::Changed)
    }

    fn edit_query(&mut self, edit: impl FnOnce(&mut String)) -> Response<AutocompleteEvent> {
        edit(&mut self.query);
        self.refilter();
        self.open(OpenReason::Keyboard);
        Response::emit(Some(AutocompleteEvent::QueryChanged(self.query.clone())))
    }

    fn handle_key(&mut self, event: &Event) -> Response<AutocompleteEvent> {
        let Event::Key(key) = event else {
            return Response::ignored();
        };
        if key.kind == KeyEventKind::Release {
            return Response::ignored();
        }
        let kb = KeyBindings::shared();
        let len = self.filtered.len();
        if kb.matches(Action::Close, key) {
            return if self.close(CloseReason::Escape) {
                Response::handled()
            } else {
                Response::ignored()
            };
        }
        if kb.matches(Action::Commit, key) {
            if !self.is_open() {
                return Response::ignored();
            }
            return match self.highlighted {
                Some(position) => Response::emit(self.commit_filtered(position)),
                None => Response::handled(),
            };
        }
        if kb.matches(Action::HighlightNext, key) || kb.matches(Action::HighlightPrev, key) {
            if self.open(OpenReason::Keyboard) {
                return Response::handled();
            }
            let delta = if kb.matches(Action::HighlightNext, key) {
                1
            } else {
                -1
            };
            self.highlighted = step_highlight(self.highlighted, delta, len);
            return Response::handled();
        }
        match key.code {
            KeyCode::Backspace if !self.query.is_empty() => self.edit_query(|q| {
                q.pop();
            }),
            KeyCode::Char(c)
                if key.modifiers == KeyModifiers::NONE || key.modifiers == KeyModifiers::SHIFT =>
            {
                self.edit_query(|q| q.push(c))
            }
            _ => Response::ignored(),
        }
    }

    pub fn handle_autocomplete_event(
        &mut self,
        event: &Event,
        ctx: &ComponentContext,
    ) -> Response<AutocompleteEvent> {
        if self.disabled {
            return Response::ignored();
        }
        self.panel.set_viewport(ctx.viewport());
        if let Some(PanelEvent::Closed(_)) = self.panel.handle_event(event) {
            self.blur_deadline = None;
            self.clear_transient();
            return Response::ignored();
        }
        match event {
            Event::Key(_) if ctx.focused() => self.handle_key(event),
            Event::Paste(text) if ctx.focused() => {
                let text = text.replace(['\n', '\r'], " ");
                self.edit_query(|q| q.push_str(&text))
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if rect_contains(self.panel.anchor_rect(), mouse.column, mouse.row) {
                    self.blur_deadline = None;
                    self.open(OpenReason::Click);
                    return Response::handled();
                }
                if self.is_open()
                    && let Some(position) = self.list.index_at(mouse.column, mouse.row)
                {
                    return Response::emit(self.commit_filtered(position));
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

impl Component for AutocompleteComponent {
    fn resize(&mut self, area: Rect, ctx: &ComponentContext) {
        self.panel.set_viewport(ctx.viewport());
        self.panel.set_anchor(area);
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.resize(area, ctx);
        let (text, style) = if self.query.is_empty() && !ctx.focused() {
            (self.placeholder.clone(), crate::theme::placeholder())
        } else if ctx.focused() {
            (format!("{}▏", self.query), Style::default())
        } else {
            (self.query.clone(), Style::default())
        };
        let style = if self.disabled {
            crate::theme::disabled()
        } else {
            style
        };
        render_trigger(frame, area, &text, style, "⌕", ctx.focused());
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        self.handle_autocomplete_event(event, ctx).handled
    }
}

impl Floating for AutocompleteComponent {
    fn render_floating(&mut self, frame: &mut UiFrame<'_>, _ctx: &ComponentContext) {
        let Some(rect) = self.panel.panel_rect() else {
            return;
        };
        let items: Vec<&OptionItem> = self
            .filtered
            .iter()
            .filter_map(|&index| self.options.get(index))
            .collect();
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
    use crossterm::event::KeyEvent;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(ac: &mut AutocompleteComponent, text: &str) {
        for c in text.chars() {
            ac.handle_event(&key(KeyCode::Char(c)), &ctx());
        }
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
            OptionItem::new("c", "Blueberry"),
            OptionItem::new("d", "Cranberry"),
        ])
        .unwrap()
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(crossterm::event::MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    /// Trigger spans rows 0..3; the panel border sits on row 3 and the
    /// first option on row 4.
    fn render(ac: &mut AutocompleteComponent) {
        let mut buffer = ratatui::buffer::Buffer::empty(Rect::new(0, 0, 80, 24));
        let mut frame = UiFrame::from_buffer(&mut buffer);
        ac.render(&mut frame, Rect::new(0, 0, 30, 3), &ctx());
        ac.render_floating(&mut frame, &ctx());
    }

    fn labels(ac: &AutocompleteComponent) -> Vec<&str> {
        ac.filtered().iter().map(|o| o.label.as_str()).collect()
    }

    #[test]
    fn default_filter_is_case_insensitive_substring() {
        let mut ac = AutocompleteComponent::new(fruit());
        assert_eq!(labels(&ac).len(), 4);
        ac.set_query("BERRY");
        assert_eq!(labels(&ac), vec!["Blueberry", "Cranberry"]);
    }

    #[test]
    fn filtering_twice_is_idempotent() {
        let options = fruit();
        let once = filter_options(&options, "an", None);
        let twice = filter_options(once.iter().copied(), "an", None);
        assert_eq!(once, twice);
    }

    #[test]
    fn custom_filter_overrides_default() {
        let mut ac = AutocompleteComponent::new(fruit())
            .with_filter(|item, query| item.value.starts_with(query));
        ac.set_query("d");
        assert_eq!(labels(&ac), vec!["Cranberry"]);
    }

    #[test]
    fn disabled_match_cannot_be_committed() {
        let mut ac = AutocompleteComponent::new(fruit());
        type_text(&mut ac, "ban");
        assert!(ac.is_open());
        assert_eq!(labels(&ac), vec!["Banana"]);
        let r = ac.handle_autocomplete_event(&key(KeyCode::Enter), &ctx());
        assert_eq!(r.event, None);
        ac.handle_event(&key(KeyCode::Down), &ctx());
        assert_eq!(ac.highlighted(), Some(0));
        let r = ac.handle_autocomplete_event(&key(KeyCode::Enter), &ctx());
        assert_eq!(r.event, None);
        assert_eq!(ac.value(), None);
    }

    #[test]
    fn highlight_resets_when_filter_changes_and_clamps() {
        let mut ac = AutocompleteComponent::new(fruit());
        ac.focus();
        for _ in 0..10 {
            ac.handle_event(&key(KeyCode::Down), &ctx());
        }
        assert_eq!(ac.highlighted(), Some(3));
        type_text(&mut ac, "b");
        assert_eq!(ac.highlighted(), None);
        ac.handle_event(&key(KeyCode::Up), &ctx());
        assert_eq!(ac.highlighted(), None);
    }

    #[test]
    fn enter_commits_and_fills_query() {
        let mut ac = AutocompleteComponent::new(fruit());
        type_text(&mut ac, "blue");
        ac.handle_event(&key(KeyCode::Down), &ctx());
        let r = ac.handle_autocomplete_event(&key(KeyCode::Enter), &ctx());
        assert_eq!(r.event, Some(AutocompleteEvent::Changed(Some("c".into()))));
        assert_eq!(ac.query(), "Blueberry");
        assert!(!ac.is_open());
    }

    #[test]
    fn escape_closes_without_commit() {
        let mut ac = AutocompleteComponent::new(fruit());
        type_text(&mut ac, "app");
        ac.handle_event(&key(KeyCode::Down), &ctx());
        assert!(ac.handle_event(&key(KeyCode::Esc), &ctx()));
        assert!(!ac.is_open());
        assert_eq!(ac.value(), None);
        assert!(!ac.handle_event(&key(KeyCode::Esc), &ctx()));
    }

    #[test]
    fn blur_closes_after_grace_delay() {
        let mut ac =
            AutocompleteComponent::new(fruit()).with_blur_delay(Duration::from_millis(200));
        let t0 = Instant::now();
        ac.focus();
        ac.blur(t0);
        assert!(ac.blur_pending());
        assert!(!ac.tick(t0 + Duration::from_millis(150)));
        assert!(ac.is_open());
        assert!(ac.tick(t0 + Duration::from_millis(200)));
        assert!(!ac.is_open());
    }

    #[test]
    fn refocus_cancels_pending_blur() {
        let mut ac = AutocompleteComponent::new(fruit());
        let t0 = Instant::now();
        ac.focus();
        ac.blur(t0);
        ac.focus();
        assert!(!ac.tick(t0 + Duration::from_secs(1)));
        assert!(ac.is_open());
    }

    #[test]
    fn backspace_edits_query() {
        let mut ac = AutocompleteComponent::new(fruit());
        type_text(&mut ac, "ap");
        let r = ac.handle_autocomplete_event(&key(KeyCode::Backspace), &ctx());
        assert_eq!(r.event, Some(AutocompleteEvent::QueryChanged("a".into())));
    }

    #[test]
    fn option_click_inside_blur_window_commits() {
        let mut ac = AutocompleteComponent::new(fruit());
        render(&mut ac);
        ac.focus();
        type_text(&mut ac, "b");
        assert_eq!(labels(&ac), vec!["Banana", "Blueberry", "Cranberry"]);
        render(&mut ac);

        let t0 = Instant::now();
        ac.blur(t0);
        assert!(ac.blur_pending());
        let response = ac.handle_autocomplete_event(&click(5, 5), &ctx());
        assert_eq!(
            response.event,
            Some(AutocompleteEvent::Changed(Some("c".into())))
        );
        assert_eq!(ac.value(), Some("c"));
        assert_eq!(ac.query(), "Blueberry");
        assert!(!ac.blur_pending());
        assert!(!ac.is_open());
        assert!(!ac.tick(t0 + Duration::from_millis(300)));
    }

    #[test]
    fn clicking_disabled_option_is_a_no_op() {
        let mut ac = AutocompleteComponent::new(fruit());
        render(&mut ac);
        ac.focus();
        type_text(&mut ac, "b");
        render(&mut ac);

        let response = ac.handle_autocomplete_event(&click(5, 4), &ctx());
        assert_eq!(response.event, None);
        assert_eq!(ac.value(), None);
        assert!(ac.is_open());
        assert_eq!(ac.query(), "b");
    }
}
