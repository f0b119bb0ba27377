//! Toast notifications.
//!
//! A `ToastProvider` owns the list of active toasts for one UI tree and
//! hands out `ToastContext` handles to code that wants to raise or dismiss
//! them. Handles hold a weak reference, so a toast raised after the provider
//! is gone fails with `VelvetError::ProviderDropped` instead of being lost
//! silently. `ToastViewport` paints the list and turns pointer input into
//! dismissals.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear};

use super::{Component, ComponentContext, Response};
use crate::constants::{
    DEFAULT_MAX_TOASTS, DEFAULT_TOAST_DURATION, TOAST_DRAG_DISMISS_THRESHOLD, TOAST_TICK,
    TOAST_WIDTH,
};
use crate::error::{Result, VelvetError};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::rect_contains;
use crate::ui::UiFrame;

pub type ToastId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
    #[default]
    Default,
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastAction {
    pub id: String,
    pub label: String,
}

impl ToastAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastOptions {
    pub variant: ToastVariant,
    pub title: String,
    pub description: Option<String>,
    /// `None` keeps the toast until it is dismissed.
    pub duration: Option<Duration>,
    pub action: Option<ToastAction>,
}

impl ToastOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            variant: ToastVariant::Default,
            title: title.into(),
            description: None,
            duration: Some(DEFAULT_TOAST_DURATION),
            action: None,
        }
    }

    pub fn variant(mut self, variant: ToastVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn persistent(mut self) -> Self {
        self.duration = None;
        self
    }

    pub fn action(mut self, action: ToastAction) -> Self {
        self.action = Some(action);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragState {
    start_column: u16,
    offset: i32,
}

#[derive(Debug, Clone)]
pub struct Toast {
    id: ToastId,
    options: ToastOptions,
    created_at: Instant,
    ticks: u32,
    drag: Option<DragState>,
}

impl Toast {
    pub fn id(&self) -> ToastId {
        self.id
    }

    pub fn options(&self) -> &ToastOptions {
        &self.options
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Countdown in percent: 100 when raised, 0 when due for removal.
    pub fn remaining(&self) -> f32 {
        let Some(duration) = self.options.duration else {
            return 100.0;
        };
        if duration.is_zero() {
            return 0.0;
        }
        let elapsed = TOAST_TICK.as_secs_f32() * self.ticks as f32;
        (100.0 * (1.0 - elapsed / duration.as_secs_f32())).clamp(0.0, 100.0)
    }

    fn expired(&self) -> bool {
        self.options
            .duration
            .is_some_and(|duration| TOAST_TICK * self.ticks >= duration)
    }

    pub fn drag_offset(&self) -> i32 {
        self.drag.map_or(0, |drag| drag.offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastConfig {
    pub max_toasts: usize,
    pub drag_dismiss_threshold: u16,
}

impl ToastConfig {
    pub fn with_max_toasts(mut self, max: usize) -> Self {
        self.max_toasts = max.max(1);
        self
    }

    pub fn with_drag_dismiss_threshold(mut self, threshold: u16) -> Self {
        self.drag_dismiss_threshold = threshold;
        self
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            max_toasts: DEFAULT_MAX_TOASTS,
            drag_dismiss_threshold: TOAST_DRAG_DISMISS_THRESHOLD,
        }
    }
}

#[derive(Debug)]
struct ToastList {
    toasts: VecDeque<Toast>,
    config: ToastConfig,
    next_id: ToastId,
}

impl ToastList {
    fn add(&mut self, options: ToastOptions, now: Instant) -> ToastId {
        self.next_id += 1;
        let id = self.next_id;
        tracing::debug!(toast_id = id, title = %options.title, "toast added");
        self.toasts.push_back(Toast {
            id,
            options,
            created_at: now,
            ticks: 0,
            drag: None,
        });
        while self.toasts.len() > self.config.max_toasts {
            if let Some(evicted) = self.toasts.pop_front() {
                tracing::debug!(toast_id = evicted.id, "toast evicted");
            }
        }
        id
    }

    fn remove(&mut self, id: ToastId) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        let removed = self.toasts.len() != before;
        if removed {
            tracing::debug!(toast_id = id, "toast dismissed");
        }
        removed
    }

    fn tick(&mut self, now: Instant) -> Vec<ToastId> {
        for toast in &mut self.toasts {
            let elapsed = now.saturating_duration_since(toast.created_at);
            let due = (elapsed.as_millis() / TOAST_TICK.as_millis()).min(u32::MAX as u128) as u32;
            toast.ticks = toast.ticks.max(due);
        }
        let expired: Vec<ToastId> = self
            .toasts
            .iter()
            .filter(|toast| toast.expired())
            .map(|toast| toast.id)
            .collect();
        self.toasts.retain(|toast| !toast.expired());
        for id in &expired {
            tracing::debug!(toast_id = id, "toast expired");
        }
        expired
    }

    fn get_mut(&mut self, id: ToastId) -> Option<&mut Toast> {
        self.toasts.iter_mut().find(|toast| toast.id == id)
    }

    fn begin_drag(&mut self, id: ToastId, column: u16) -> bool {
        let Some(toast) = self.get_mut(id) else {
            return false;
        };
        toast.drag = Some(DragState {
            start_column: column,
            offset: 0,
        });
        true
    }

    fn drag_to(&mut self, id: ToastId, column: u16) -> bool {
        let Some(drag) = self.get_mut(id).and_then(|toast| toast.drag.as_mut()) else {
            return false;
        };
        drag.offset = column as i32 - drag.start_column as i32;
        true
    }

    /// Finish a drag; dismisses the toast past the threshold.
    fn end_drag(&mut self, id: ToastId) -> bool {
        let threshold = self.config.drag_dismiss_threshold as u32;
        let Some(drag) = self.get_mut(id).and_then(|toast| toast.drag.take()) else {
            return false;
        };
        drag.offset.unsigned_abs() > threshold && self.remove(id)
    }
}

/// Owner of the active toast list for one UI tree.
#[derive(Debug)]
pub struct ToastProvider {
    list: Rc<RefCell<ToastList>>,
}

impl ToastProvider {
    pub fn new(config: ToastConfig) -> Self {
        Self {
            list: Rc::new(RefCell::new(ToastList {
                toasts: VecDeque::new(),
                config,
                next_id: 0,
            })),
        }
    }

    pub fn context(&self) -> ToastContext {
        ToastContext {
            list: Rc::downgrade(&self.list),
        }
    }

    pub fn config(&self) -> ToastConfig {
        self.list.borrow().config
    }

    pub fn add_toast(&self, options: ToastOptions, now: Instant) -> ToastId {
        self.list.borrow_mut().add(options, now)
    }

    pub fn remove_toast(&self, id: ToastId) -> bool {
        self.list.borrow_mut().remove(id)
    }

    /// Advance every countdown to `now`; returns the ids that expired.
    pub fn tick(&self, now: Instant) -> Vec<ToastId> {
        self.list.borrow_mut().tick(now)
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.list.borrow().toasts.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.list.borrow().toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ToastProvider {
    fn default() -> Self {
        Self::new(ToastConfig::default())
    }
}

impl Drop for ToastProvider {
    fn drop(&mut self) {
        if let Ok(mut list) = self.list.try_borrow_mut() {
            let cleared = list.toasts.len();
            list.toasts.clear();
            tracing::debug!(cleared, "toast provider dropped");
        }
    }
}

/// Handle to a `ToastProvider`'s list.
#[derive(Debug, Clone)]
pub struct ToastContext {
    list: Weak<RefCell<ToastList>>,
}

impl ToastContext {
    fn with_list<R>(&self, f: impl FnOnce(&mut ToastList) -> R) -> Result<R> {
        let list = self.list.upgrade().ok_or(VelvetError::ProviderDropped)?;
        let mut list = list.borrow_mut();
        Ok(f(&mut list))
    }

    pub fn add_toast(&self, options: ToastOptions, now: Instant) -> Result<ToastId> {
        self.with_list(|list| list.add(options, now))
    }

    pub fn remove_toast(&self, id: ToastId) -> Result<bool> {
        self.with_list(|list| list.remove(id))
    }

    pub fn toasts(&self) -> Result<Vec<Toast>> {
        self.with_list(|list| list.toasts.iter().cloned().collect())
    }

    pub fn begin_drag(&self, id: ToastId, column: u16) -> Result<bool> {
        self.with_list(|list| list.begin_drag(id, column))
    }

    pub fn drag_to(&self, id: ToastId, column: u16) -> Result<bool> {
        self.with_list(|list| list.drag_to(id, column))
    }

    /// Release a drag. Returns whether the toast was dismissed.
    pub fn end_drag(&self, id: ToastId) -> Result<bool> {
        self.with_list(|list| list.end_drag(id))
    }

    pub fn is_alive(&self) -> bool {
        self.list.strong_count() > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastEvent {
    Dismissed(ToastId),
    Action { toast: ToastId, action: String },
}

#[derive(Debug, Clone, Copy)]
struct CardHit {
    id: ToastId,
    card: Rect,
    close: Rect,
    action: Option<Rect>,
}

/// Paints toasts stacked in the bottom-right corner, newest at the bottom.
#[derive(Debug)]
pub struct ToastViewport {
    context: ToastContext,
    hits: Vec<CardHit>,
    dragging: Option<ToastId>,
}

impl ToastViewport {
    pub fn new(context: ToastContext) -> Self {
        Self {
            context,
            hits: Vec::new(),
            dragging: None,
        }
    }

    fn card_height(toast: &Toast) -> u16 {
        3 + u16::from(toast.options.description.is_some())
    }

    fn render_card(&mut self, frame: &mut UiFrame<'_>, toast: &Toast, card: Rect) {
        let accent = crate::theme::toast_accent(toast.options.variant);
        frame.render_widget(Clear, card);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .title(Line::from(toast.options.title.as_str()));
        let inner = block.inner(card);
        frame.render_widget(block, card);
        let close = Rect {
            x: card.right().saturating_sub(3),
            y: card.y,
            width: 1,
            height: 1,
        };
        frame.set_string(close.x, close.y, "×", Style::default().fg(accent));
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        if let Some(description) = &toast.options.description {
            frame.set_string(inner.x, inner.y, description, Style::default());
        }
        let bottom = inner.bottom().saturating_sub(1);
        let mut bar_width = inner.width;
        let mut action_rect = None;
        if let Some(action) = &toast.options.action {
            let label = format!("[{}]", action.label);
            let width = (label.chars().count() as u16).min(inner.width);
            let rect = Rect {
                x: inner.right() - width,
                y: bottom,
                width,
                height: 1,
            };
            frame.set_string(rect.x, rect.y, &label, Style::default().fg(accent));
            bar_width = bar_width.saturating_sub(width + 1);
            action_rect = Some(rect);
        }
        let filled = (bar_width as f32 * toast.remaining() / 100.0).round() as usize;
        frame.set_string(
            inner.x,
            bottom,
            &"━".repeat(filled),
            Style::default().fg(accent),
        );
        self.hits.push(CardHit {
            id: toast.id,
            card,
            close,
            action: action_rect,
        });
    }

    fn hit(&self, column: u16, row: u16) -> Option<CardHit> {
        self.hits
            .iter()
            .rev()
            .find(|hit| rect_contains(hit.card, column, row))
            .copied()
    }

    pub fn handle_toast_event(&mut self, event: &Event) -> Response<ToastEvent> {
        if !self.context.is_alive() {
            return Response::ignored();
        }
        match event {
            Event::Key(key) if KeyBindings::shared().matches(Action::DismissToast, key) => {
                let newest = self
                    .context
                    .toasts()
                    .ok()
                    .and_then(|toasts| toasts.last().map(Toast::id));
                match newest {
                    Some(id) if self.context.remove_toast(id).unwrap_or(false) => {
                        Response::emit(Some(ToastEvent::Dismissed(id)))
                    }
                    _ => Response::ignored(),
                }
            }
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    let Some(hit) = self.hit(mouse.column, mouse.row) else {
                        return Response::ignored();
                    };
                    if rect_contains(hit.close, mouse.column, mouse.row) {
                        self.context.remove_toast(hit.id).ok();
                        return Response::emit(Some(ToastEvent::Dismissed(hit.id)));
                    }
                    if hit
                        .action
                        .is_some_and(|rect| rect_contains(rect, mouse.column, mouse.row))
                    {
                        let action = self
                            .context
                            .toasts()
                            .ok()
                            .and_then(|toasts| toasts.into_iter().find(|t| t.id == hit.id))
                            .and_then(|toast| toast.options.action.map(|a| a.id));
                        self.context.remove_toast(hit.id).ok();
                        return Response::emit(action.map(|action| ToastEvent::Action {
                            toast: hit.id,
                            action,
                        }));
                    }
                    if self.context.begin_drag(hit.id, mouse.column).unwrap_or(false) {
                        self.dragging = Some(hit.id);
                    }
                    Response::handled()
                }
                MouseEventKind::Drag(MouseButton::Left) => match self.dragging {
                    Some(id) => {
                        self.context.drag_to(id, mouse.column).ok();
                        Response::handled()
                    }
                    None => Response::ignored(),
                },
                MouseEventKind::Up(MouseButton::Left) => match self.dragging.take() {
                    Some(id) if self.context.end_drag(id).unwrap_or(false) => {
                        Response::emit(Some(ToastEvent::Dismissed(id)))
                    }
                    Some(_) => Response::handled(),
                    None => Response::ignored(),
                },
                _ => Response::ignored(),
            },
            _ => Response::ignored(),
        }
    }
}

impl Component for ToastViewport {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        self.hits.clear();
        let Ok(toasts) = self.context.toasts() else {
            return;
        };
        let width = TOAST_WIDTH.min(area.width);
        if width < 5 {
            return;
        }
        let mut bottom = area.bottom();
        for toast in toasts.iter().rev() {
            let height = Self::card_height(toast);
            if bottom < area.y + height {
                break;
            }
            bottom -= height;
            let x = (area.right() - width) as i32 + toast.drag_offset();
            // Cards may slide past the right edge; `UiFrame` clips them.
            let x = x.clamp(area.x as i32, area.right().saturating_sub(1) as i32) as u16;
            let card = Rect {
                x,
                y: bottom,
                width,
                height,
            };
            self.render_card(frame, toast, card);
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        self.handle_toast_event(event).handled
    }
}
