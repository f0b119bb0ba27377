//! Shared crate-wide constants.

use std::time::Duration;

/// Cells between a dropdown panel and its trigger.
pub const DROPDOWN_GAP: u16 = 0;

/// Cells between a tooltip bubble and its anchor.
pub const TOOLTIP_GAP: u16 = 1;

/// Minimum distance, in cells, a tooltip keeps from every viewport edge.
///
/// When the viewport is too small to honor the margin the tooltip is pinned
/// to the margin on the leading edge and allowed to overflow the trailing one.
pub const TOOLTIP_VIEWPORT_MARGIN: u16 = 8;

/// Default number of option rows a dropdown shows before scrolling.
pub const DEFAULT_MAX_VISIBLE_OPTIONS: usize = 8;

/// Grace period between an autocomplete losing focus and its panel closing.
///
/// Gives a pointer click on an option time to land before the panel goes
/// away. Tunable per component through `set_blur_delay`.
pub const AUTOCOMPLETE_BLUR_DELAY: Duration = Duration::from_millis(200);

/// Interval of one toast countdown step.
pub const TOAST_TICK: Duration = Duration::from_millis(100);

/// Lifetime of a toast when the caller does not pick one.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);

/// Toasts kept on screen at once; the oldest is evicted beyond this.
pub const DEFAULT_MAX_TOASTS: usize = 5;

/// Horizontal drag distance, in cells, that dismisses a toast on release.
/// A cell is roughly 8 to 10 pixels wide, so this is about 100 px.
pub const TOAST_DRAG_DISMISS_THRESHOLD: u16 = 12;

/// Width of a rendered toast card, borders included.
pub const TOAST_WIDTH: u16 = 40;
