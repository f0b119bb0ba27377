use crossterm::event::{Event, MouseEventKind};
use ratatui::layout::Rect;

use crate::layout::rect_contains;

/// Pointer interaction that landed on neither the anchor nor the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outside {
    Click,
    Scroll,
}

/// Classify `event` against the anchor and (optional) panel rectangles.
///
/// Only presses and wheel events count. Moves, drags and releases outside
/// are ignored so a drag that started inside the panel cannot close it.
pub fn classify(event: &Event, anchor: Rect, panel: Option<Rect>) -> Option<Outside> {
    let Event::Mouse(mouse) = event else {
        return None;
    };
    let kind = match mouse.kind {
        MouseEventKind::Down(_) => Outside::Click,
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => Outside::Scroll,
        _ => return None,
    };
    let inside = rect_contains(anchor, mouse.column, mouse.row)
        || panel.is_some_and(|rect| rect_contains(rect, mouse.column, mouse.row));
    (!inside).then_some(kind)
}
