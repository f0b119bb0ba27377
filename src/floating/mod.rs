//! Floating panel controller shared by dropdowns and tooltips.
//!
//! A `FloatingPanel` owns the open/closed state of one overlay, the latest
//! geometry of its anchor, and its own listener registration. It never
//! paints; callers read `panel_rect()` and draw there.

pub mod outside;

pub use outside::{Outside, classify};

use crossterm::event::Event;
use ratatui::layout::{Rect, Size};

use crate::constants::{DROPDOWN_GAP, TOOLTIP_GAP, TOOLTIP_VIEWPORT_MARGIN};
use crate::layout::{AnchorRect, PanelPosition, Placement, Side, solve, solve_tooltip};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenReason {
    Click,
    Focus,
    Keyboard,
    Hover,
    Programmatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Escape,
    Selection,
    OutsideClick,
    OutsideScroll,
    Blur,
    Programmatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Trigger-width panel that flips vertically.
    Dropdown { side: Side, gap: u16 },
    /// Content-sized bubble clamped to a viewport margin.
    Tooltip {
        placement: Placement,
        gap: u16,
        margin: u16,
    },
}

/// What a scroll outside the anchor and panel does to an open panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPolicy {
    Reposition,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    pub strategy: Strategy,
    pub scroll_policy: ScrollPolicy,
    pub close_on_outside_click: bool,
}

impl PanelConfig {
    pub fn dropdown() -> Self {
        Self {
            strategy: Strategy::Dropdown {
                side: Side::Bottom,
                gap: DROPDOWN_GAP,
            },
            scroll_policy: ScrollPolicy::Reposition,
            close_on_outside_click: true,
        }
    }

    pub fn tooltip(placement: Placement) -> Self {
        Self {
            strategy: Strategy::Tooltip {
                placement,
                gap: TOOLTIP_GAP,
                margin: TOOLTIP_VIEWPORT_MARGIN,
            },
            scroll_policy: ScrollPolicy::Close,
            close_on_outside_click: true,
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_scroll_policy(mut self, policy: ScrollPolicy) -> Self {
        self.scroll_policy = policy;
        self
    }

    pub fn with_close_on_outside_click(mut self, close: bool) -> Self {
        self.close_on_outside_click = close;
        self
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::dropdown()
    }
}

/// Latest screen rectangle of the trigger, as reported by the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorTracker {
    rect: Rect,
}

impl AnchorTracker {
    /// Record a new rectangle; returns whether it differs from the last one.
    pub fn update(&mut self, rect: Rect) -> bool {
        let changed = self.rect != rect;
        self.rect = rect;
        changed
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn snapshot(&self) -> AnchorRect {
        AnchorRect::from(self.rect)
    }
}

/// Event interests a panel has registered while open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Listeners {
    pub pointer: bool,
    pub scroll: bool,
    pub resize: bool,
}

impl Listeners {
    fn attach(&mut self, config: &PanelConfig) {
        self.pointer = config.close_on_outside_click;
        self.scroll = true;
        self.resize = true;
    }

    fn detach(&mut self) {
        *self = Self::default();
    }

    pub fn any(&self) -> bool {
        self.pointer || self.scroll || self.resize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    Closed(CloseReason),
    Repositioned,
}

#[derive(Debug, Clone, Default)]
pub struct FloatingPanel {
    config: PanelConfig,
    visibility: Visibility,
    anchor: AnchorTracker,
    viewport: Size,
    panel_size: Size,
    snapshot: Option<AnchorRect>,
    position: Option<PanelPosition>,
    listeners: Listeners,
}

impl FloatingPanel {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PanelConfig) {
        self.config = config;
        if self.is_open() {
            self.listeners.attach(&self.config);
            self.reposition();
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_open(&self) -> bool {
        self.visibility == Visibility::Open
    }

    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    /// Transition to `Open`. Returns `false` when already open.
    pub fn open(&mut self, reason: OpenReason) -> bool {
        if self.is_open() {
            return false;
        }
        self.visibility = Visibility::Open;
        self.listeners.attach(&self.config);
        let position = self.reposition();
        tracing::debug!(?reason, ?position, "floating panel opened");
        true
    }

    /// Transition to `Closed`, dropping the anchor snapshot and position.
    /// Returns `false` when already closed.
    pub fn close(&mut self, reason: CloseReason) -> bool {
        if !self.is_open() {
            return false;
        }
        self.visibility = Visibility::Closed;
        self.listeners.detach();
        self.snapshot = None;
        self.position = None;
        tracing::debug!(?reason, "floating panel closed");
        true
    }

    /// Flip visibility; returns whether the panel is open afterwards.
    pub fn toggle(&mut self, reason: OpenReason) -> bool {
        if self.is_open() {
            self.close(CloseReason::Programmatic);
        } else {
            self.open(reason);
        }
        self.is_open()
    }

    pub fn set_anchor(&mut self, rect: Rect) {
        if self.anchor.update(rect) && self.is_open() {
            self.reposition();
        }
    }

    pub fn anchor_rect(&self) -> Rect {
        self.anchor.rect()
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        if self.viewport == viewport {
            return;
        }
        self.viewport = viewport;
        if self.is_open() {
            self.reposition();
        }
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Set the panel size estimate. Dropdowns only use the height.
    pub fn set_panel_size(&mut self, size: Size) {
        if self.panel_size == size {
            return;
        }
        self.panel_size = size;
        if self.is_open() {
            self.reposition();
        }
    }

    pub fn panel_size(&self) -> Size {
        self.panel_size
    }

    /// Recapture the anchor and solve the placement again. No-op when closed.
    pub fn reposition(&mut self) -> Option<PanelPosition> {
        if !self.is_open() {
            return None;
        }
        let anchor = self.anchor.snapshot();
        let position = match self.config.strategy {
            Strategy::Dropdown { side, gap } => {
                solve(anchor, side, self.panel_size.height, self.viewport, gap)
            }
            Strategy::Tooltip {
                placement,
                gap,
                margin,
            } => solve_tooltip(
                anchor,
                placement,
                self.panel_size,
                self.viewport,
                gap,
                margin,
            ),
        };
        self.snapshot = Some(anchor);
        self.position = Some(position);
        self.position
    }

    pub fn anchor_snapshot(&self) -> Option<AnchorRect> {
        self.snapshot
    }

    pub fn position(&self) -> Option<PanelPosition> {
        self.position
    }

    pub fn panel_rect(&self) -> Option<Rect> {
        self.position
            .map(|position| position.to_rect(self.panel_size.height))
    }

    /// React to resize, outside clicks and outside scrolls while open.
    ///
    /// Keyboard handling is left to the owning component.
    pub fn handle_event(&mut self, event: &Event) -> Option<PanelEvent> {
        if !self.is_open() {
            return None;
        }
        if let Event::Resize(width, height) = *event {
            if !self.listeners.resize {
                return None;
            }
            self.viewport = Size { width, height };
            self.reposition();
            return Some(PanelEvent::Repositioned);
        }
        match classify(event, self.anchor.rect(), self.panel_rect())? {
            Outside::Click if self.listeners.pointer => {
                self.close(CloseReason::OutsideClick);
                Some(PanelEvent::Closed(CloseReason::OutsideClick))
            }
            Outside::Scroll if self.listeners.scroll => match self.config.scroll_policy {
                ScrollPolicy::Reposition => {
                    self.reposition();
                    Some(PanelEvent::Repositioned)
                }
                ScrollPolicy::Close => {
                    self.close(CloseReason::OutsideScroll);
                    Some(PanelEvent::Closed(CloseReason::OutsideScroll))
                }
            },
            _ => None,
        }
    }
}
