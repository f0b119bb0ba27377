pub mod placement;

pub use placement::*;

use ratatui::layout::Rect;

/// Snapshot of a trigger element's bounding box.
///
/// Edges are signed so an anchor that scrolled partially above or left of
/// the viewport keeps its true geometry; `bottom` and `right` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnchorRect {
    pub top: i32,
    pub left: i32,
    pub width: u16,
    pub height: u16,
    pub bottom: i32,
    pub right: i32,
}

impl AnchorRect {
    pub fn new(left: i32, top: i32, width: u16, height: u16) -> Self {
        Self {
            top,
            left,
            width,
            height,
            bottom: top + height as i32,
            right: left + width as i32,
        }
    }
}

impl From<Rect> for AnchorRect {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x as i32, rect.y as i32, rect.width, rect.height)
    }
}

/// Computed placement of a floating panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelPosition {
    pub top: u16,
    pub left: u16,
    pub width: u16,
}

impl PanelPosition {
    pub fn to_rect(self, height: u16) -> Rect {
        Rect {
            x: self.left,
            y: self.top,
            width: self.width,
            height,
        }
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}
