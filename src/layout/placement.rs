//! Viewport-aware placement of floating panels.
//!
//! Two solvers share the same clamping rules: `solve` for dropdowns that
//! match their trigger's width and flip vertically, and `solve_tooltip` for
//! content-sized bubbles positioned by one of twelve `Placement`s.

use std::fmt;
use std::str::FromStr;

use ratatui::layout::Size;

use super::{AnchorRect, PanelPosition};
use crate::error::VelvetError;

/// Vertical side a dropdown prefers to open on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    Top,
    #[default]
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementSide {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    Top,
    TopStart,
    TopEnd,
    Bottom,
    BottomStart,
    BottomEnd,
    Left,
    LeftStart,
    LeftEnd,
    Right,
    RightStart,
    RightEnd,
}

impl Placement {
    pub const ALL: [Placement; 12] = [
        Placement::Top,
        Placement::TopStart,
        Placement::TopEnd,
        Placement::Bottom,
        Placement::BottomStart,
        Placement::BottomEnd,
        Placement::Left,
        Placement::LeftStart,
        Placement::LeftEnd,
        Placement::Right,
        Placement::RightStart,
        Placement::RightEnd,
    ];

    pub fn side(self) -> PlacementSide {
        match self {
            Placement::Top | Placement::TopStart | Placement::TopEnd => PlacementSide::Top,
            Placement::Bottom | Placement::BottomStart | Placement::BottomEnd => {
                PlacementSide::Bottom
            }
            Placement::Left | Placement::LeftStart | Placement::LeftEnd => PlacementSide::Left,
            Placement::Right | Placement::RightStart | Placement::RightEnd => PlacementSide::Right,
        }
    }

    pub fn align(self) -> Align {
        match self {
            Placement::TopStart
            | Placement::BottomStart
            | Placement::LeftStart
            | Placement::RightStart => Align::Start,
            Placement::TopEnd | Placement::BottomEnd | Placement::LeftEnd | Placement::RightEnd => {
                Align::End
            }
            _ => Align::Center,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Placement::Top => "top",
            Placement::TopStart => "top-start",
            Placement::TopEnd => "top-end",
            Placement::Bottom => "bottom",
            Placement::BottomStart => "bottom-start",
            Placement::BottomEnd => "bottom-end",
            Placement::Left => "left",
            Placement::LeftStart => "left-start",
            Placement::LeftEnd => "left-end",
            Placement::Right => "right",
            Placement::RightStart => "right-start",
            Placement::RightEnd => "right-end",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Placement {
    type Err = VelvetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Placement::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| VelvetError::InvalidPlacement(s.to_string()))
    }
}

/// Place a trigger-width dropdown below (or above) `anchor`.
///
/// The preferred side is used when the panel fits; otherwise the panel flips
/// to the opposite side. The result is floored at 0 on both axes and `left`
/// is pulled back so the panel ends inside the viewport whenever it can.
pub fn solve(
    anchor: AnchorRect,
    preferred: Side,
    panel_height: u16,
    viewport: Size,
    gap: u16,
) -> PanelPosition {
    let height = panel_height as i32;
    let gap = gap as i32;
    let below = anchor.bottom + gap;
    let above = anchor.top - height - gap;
    let top = match preferred {
        Side::Bottom if below + height > viewport.height as i32 => above,
        Side::Bottom => below,
        Side::Top if above < 0 => below,
        Side::Top => above,
    };
    PanelPosition {
        top: to_cell(top),
        left: clamp_axis(anchor.left, anchor.width as i32, viewport.width, 0),
        width: anchor.width,
    }
}

/// Place a content-sized bubble around `anchor` and keep it `margin` cells
/// away from every viewport edge.
pub fn solve_tooltip(
    anchor: AnchorRect,
    placement: Placement,
    panel: Size,
    viewport: Size,
    gap: u16,
    margin: u16,
) -> PanelPosition {
    let width = panel.width as i32;
    let height = panel.height as i32;
    let gap = gap as i32;
    let align = placement.align();
    let (top, left) = match placement.side() {
        PlacementSide::Top => (
            anchor.top - height - gap,
            aligned(anchor.left, anchor.width, width, align),
        ),
        PlacementSide::Bottom => (
            anchor.bottom + gap,
            aligned(anchor.left, anchor.width, width, align),
        ),
        PlacementSide::Left => (
            aligned(anchor.top, anchor.height, height, align),
            anchor.left - width - gap,
        ),
        PlacementSide::Right => (
            aligned(anchor.top, anchor.height, height, align),
            anchor.right + gap,
        ),
    };
    PanelPosition {
        top: clamp_axis(top, height, viewport.height, margin),
        left: clamp_axis(left, width, viewport.width, margin),
        width: panel.width,
    }
}

fn aligned(start: i32, extent: u16, size: i32, align: Align) -> i32 {
    match align {
        Align::Start => start,
        Align::Center => start + (extent as i32 - size) / 2,
        Align::End => start + extent as i32 - size,
    }
}

/// Clamp `value` so `size` cells fit inside `extent` with `margin` on both
/// sides. The margin shrinks to whatever room is left, so a viewport that is
/// too small still keeps the panel on screen, pinned at 0 if it cannot fit.
fn clamp_axis(value: i32, size: i32, extent: u16, margin: u16) -> u16 {
    let room = (extent as i32 - size).max(0);
    let margin = (margin as i32).min(room / 2);
    let max = extent as i32 - size - margin;
    to_cell(value.min(max).max(margin))
}

fn to_cell(value: i32) -> u16 {
    value.clamp(0, u16::MAX as i32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(width: u16, height: u16) -> Size {
        Size { width, height }
    }

    #[test]
    fn dropdown_opens_below_when_it_fits() {
        let anchor = AnchorRect::new(10, 2, 20, 1);
        let pos = solve(anchor, Side::Bottom, 5, viewport(80, 24), 0);
        assert_eq!(
            pos,
            PanelPosition {
                top: 3,
                left: 10,
                width: 20
            }
        );
    }

    #[test]
    fn dropdown_flips_above_when_bottom_overflows() {
        let anchor = AnchorRect::new(0, 18, 20, 1);
        let pos = solve(anchor, Side::Bottom, 8, viewport(80, 24), 1);
        assert_eq!(pos.top, 18 - 8 - 1);
    }

    #[test]
    fn flipped_dropdown_is_floored_at_zero() {
        let anchor = AnchorRect::new(0, 3, 20, 1);
        let pos = solve(anchor, Side::Bottom, 30, viewport(80, 24), 0);
        assert_eq!(pos.top, 0);
    }

    #[test]
    fn preferred_top_falls_back_below() {
        let anchor = AnchorRect::new(0, 2, 10, 1);
        let pos = solve(anchor, Side::Top, 5, viewport(80, 24), 0);
        assert_eq!(pos.top, 3);
        let anchor = AnchorRect::new(0, 12, 10, 1);
        let pos = solve(anchor, Side::Top, 5, viewport(80, 24), 0);
        assert_eq!(pos.top, 7);
    }

    #[test]
    fn dropdown_left_is_clamped_into_viewport() {
        let anchor = AnchorRect::new(70, 2, 20, 1);
        let pos = solve(anchor, Side::Bottom, 3, viewport(80, 24), 0);
        assert_eq!(pos.left, 60);
        let anchor = AnchorRect::new(-5, 2, 20, 1);
        let pos = solve(anchor, Side::Bottom, 3, viewport(80, 24), 0);
        assert_eq!(pos.left, 0);
    }

    #[test]
    fn wider_than_viewport_pins_left_edge() {
        let anchor = AnchorRect::new(4, 0, 50, 1);
        let pos = solve(anchor, Side::Bottom, 3, viewport(30, 24), 0);
        assert_eq!(pos.left, 0);
        assert_eq!(pos.width, 50);
    }

    #[test]
    fn dropdown_stays_inside_viewport_across_grid() {
        let vp = viewport(40, 20);
        for left in (-10..50).step_by(3) {
            for top in (-5..25).step_by(2) {
                for width in [1u16, 10, 39, 40] {
                    for panel_height in [1u16, 5, 19, 30] {
                        for side in [Side::Top, Side::Bottom] {
                            let anchor = AnchorRect::new(left, top, width, 1);
                            let pos = solve(anchor, side, panel_height, vp, 1);
                            assert!(
                                pos.left + pos.width <= vp.width,
                                "overflow for left={left} width={width}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn tooltip_sides_and_alignment() {
        let anchor = AnchorRect::new(30, 10, 10, 1);
        let vp = viewport(100, 40);
        let panel = Size {
            width: 6,
            height: 3,
        };
        let top = solve_tooltip(anchor, Placement::Top, panel, vp, 1, 0);
        assert_eq!((top.top, top.left), (6, 32));
        let bottom_start = solve_tooltip(anchor, Placement::BottomStart, panel, vp, 1, 0);
        assert_eq!((bottom_start.top, bottom_start.left), (12, 30));
        let bottom_end = solve_tooltip(anchor, Placement::BottomEnd, panel, vp, 1, 0);
        assert_eq!(bottom_end.left, 34);
        let left = solve_tooltip(anchor, Placement::Left, panel, vp, 1, 0);
        assert_eq!((left.top, left.left), (9, 23));
        let right_start = solve_tooltip(anchor, Placement::RightStart, panel, vp, 1, 0);
        assert_eq!((right_start.top, right_start.left), (10, 41));
        assert_eq!(right_start.width, 6);
    }

    #[test]
    fn tooltip_is_kept_inside_margin() {
        let anchor = AnchorRect::new(0, 0, 4, 1);
        let vp = viewport(80, 24);
        let panel = Size {
            width: 10,
            height: 3,
        };
        let pos = solve_tooltip(anchor, Placement::TopStart, panel, vp, 1, 8);
        assert_eq!((pos.top, pos.left), (8, 8));

        let anchor = AnchorRect::new(76, 23, 4, 1);
        let pos = solve_tooltip(anchor, Placement::RightEnd, panel, vp, 1, 8);
        assert_eq!(pos.left, 80 - 10 - 8);
        assert_eq!(pos.top, 24 - 3 - 8);
    }

    #[test]
    fn tooltip_in_tiny_viewport_stays_inside() {
        let anchor = AnchorRect::new(2, 2, 2, 1);
        let pos = solve_tooltip(
            anchor,
            Placement::Bottom,
            Size {
                width: 30,
                height: 5,
            },
            viewport(10, 6),
            1,
            8,
        );
        // 1 row of slack vertically, none horizontally: margins collapse.
        assert_eq!((pos.top, pos.left), (1, 0));
    }

    #[test]
    fn short_viewport_shrinks_margin_to_fit() {
        let anchor = AnchorRect::new(2, 4, 3, 1);
        let pos = solve_tooltip(
            anchor,
            Placement::Top,
            Size {
                width: 6,
                height: 1,
            },
            viewport(30, 8),
            1,
            8,
        );
        // Vertical margin drops to 3 (7 spare rows / 2), horizontal stays 8.
        assert_eq!((pos.top, pos.left), (3, 8));
        assert!(pos.top < 8);
    }

    #[test]
    fn placement_parses_kebab_case() {
        for placement in Placement::ALL {
            assert_eq!(placement.as_str().parse::<Placement>(), Ok(placement));
        }
        assert_eq!(" Bottom-End ".parse::<Placement>(), Ok(Placement::BottomEnd));
        assert_eq!(
            "middle".parse::<Placement>(),
            Err(VelvetError::InvalidPlacement("middle".into()))
        );
    }
}
