//! Shared component rendering context
//!
//! `ComponentContext` carries the UI state a component needs while rendering
//! and handling events: whether it owns keyboard focus and how large the
//! viewport is, which floating panels need for placement.

use ratatui::layout::Size;

#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentContext {
    focused: bool,
    viewport: Size,
}

impl ComponentContext {
    pub const fn new(focused: bool, viewport: Size) -> Self {
        Self { focused, viewport }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Return a new `ComponentContext` with a modified `focused` flag.
    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub const fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }
}
