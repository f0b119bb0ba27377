use crossterm::event::{Event, MouseEventKind};
use ratatui::layout::{Rect, Size};
use ratatui::style::Style;
use ratatui::widgets::{Clear, Paragraph, Wrap};

use super::{Component, ComponentContext, Floating};
use crate::floating::{CloseReason, FloatingPanel, OpenReason, PanelConfig, PanelEvent, Strategy};
use crate::keybindings::{Action, KeyBindings};
use crate::layout::{Placement, rect_contains};
use crate::ui::UiFrame;

/// A text label that shows a content bubble on hover or focus.
#[derive(Debug)]
pub struct TooltipComponent {
    label: String,
    content: String,
    panel: FloatingPanel,
    hover_opened: bool,
}

impl TooltipComponent {
    pub fn new(label: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            content: content.into(),
            panel: FloatingPanel::new(PanelConfig::tooltip(Placement::Top)),
            hover_opened: false,
        }
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.set_placement(placement);
        self
    }

    pub fn with_panel_config(mut self, config: PanelConfig) -> Self {
        self.panel.set_config(config);
        self
    }

    pub fn set_placement(&mut self, placement: Placement) {
        let mut config = *self.panel.config();
        config.strategy = match config.strategy {
            Strategy::Tooltip { gap, margin, .. } => Strategy::Tooltip {
                placement,
                gap,
                margin,
            },
            Strategy::Dropdown { .. } => PanelConfig::tooltip(placement).strategy,
        };
        self.panel.set_config(config);
    }

    pub fn placement(&self) -> Option<Placement> {
        match self.panel.config().strategy {
            Strategy::Tooltip { placement, .. } => Some(placement),
            Strategy::Dropdown { .. } => None,
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.update_panel_size();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_open(&self) -> bool {
        self.panel.is_open()
    }

    pub fn panel(&self) -> &FloatingPanel {
        &self.panel
    }

    fn margin(&self) -> u16 {
        match self.panel.config().strategy {
            Strategy::Tooltip { margin, .. } => margin,
            Strategy::Dropdown { .. } => 0,
        }
    }

    /// Bubble size: longest line plus one cell of padding per side, capped
    /// to the viewport minus its margins, with wrapped lines counted.
    pub fn content_size(&self, viewport: Size) -> Size {
        let available = viewport
            .width
            .saturating_sub(self.margin().saturating_mul(2))
            .max(3);
        let longest = self
            .content
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let width = (longest as u16).saturating_add(2).min(available);
        let inner = width.saturating_sub(2).max(1) as usize;
        let height = self
            .content
            .lines()
            .map(|line| line.chars().count().max(1).div_ceil(inner))
            .sum::<usize>()
            .max(1);
        Size {
            width,
            height: height.min(u16::MAX as usize) as u16,
        }
    }

    fn update_panel_size(&mut self) {
        let size = self.content_size(self.panel.viewport());
        self.panel.set_panel_size(size);
    }

    pub fn show(&mut self, reason: OpenReason) -> bool {
        self.update_panel_size();
        self.panel.open(reason)
    }

    pub fn hide(&mut self, reason: CloseReason) -> bool {
        self.hover_opened = false;
        self.panel.close(reason)
    }

    pub fn focus(&mut self) {
        self.show(OpenReason::Focus);
    }

    pub fn blur(&mut self) {
        self.hide(CloseReason::Blur);
    }

    pub fn handle_tooltip_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        self.panel.set_viewport(ctx.viewport());
        if let Some(PanelEvent::Closed(_)) = self.panel.handle_event(event) {
            self.hover_opened = false;
            return false;
        }
        match event {
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => {
                let over = rect_contains(self.panel.anchor_rect(), mouse.column, mouse.row);
                if over && !self.is_open() {
                    self.show(OpenReason::Hover);
                    self.hover_opened = true;
                } else if !over && self.hover_opened {
                    self.hide(CloseReason::Programmatic);
                }
                false
            }
            Event::Key(key) if ctx.focused() && self.is_open() => {
                if KeyBindings::shared().matches(Action::Close, key) {
                    self.hide(CloseReason::Escape);
                    return true;
                }
                false
            }
            _ => false,
        }
    }
}

impl Component for TooltipComponent {
    fn resize(&mut self, area: Rect, ctx: &ComponentContext) {
        self.panel.set_viewport(ctx.viewport());
        self.panel.set_anchor(area);
        self.update_panel_size();
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.resize(area, ctx);
        let style = if ctx.focused() {
            crate::theme::highlighted()
        } else {
            Style::default()
        };
        frame.set_string(area.x, area.y, &self.label, style);
    }

    fn handle_event(&mut self, event: &Event, ctx: &ComponentContext) -> bool {
        self.handle_tooltip_event(event, ctx)
    }
}

impl Floating for TooltipComponent {
    fn render_floating(&mut self, frame: &mut UiFrame<'_>, _ctx: &ComponentContext) {
        let Some(rect) = self.panel.panel_rect() else {
            return;
        };
        frame.render_widget(Clear, rect);
        let body = Rect {
            x: rect.x.saturating_add(1),
            width: rect.width.saturating_sub(2),
            ..rect
        };
        frame.render_widget(Paragraph::new("").style(crate::theme::tooltip()), rect);
        frame.render_widget(
            Paragraph::new(self.content.as_str())
                .style(crate::theme::tooltip())
                .wrap(Wrap { trim: false }),
            body,
        );
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

    fn moved(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
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

    fn rendered(tip: &mut TooltipComponent) -> Buffer {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 80, 24));
        let mut frame = UiFrame::from_buffer(&mut buffer);
        tip.render(&mut frame, Rect::new(30, 12, 3, 1), &ctx());
        tip.render_floating(&mut frame, &ctx());
        buffer
    }

    #[test]
    fn hover_shows_and_leaving_hides() {
        let mut tip = TooltipComponent::new("[?]", "Saved drafts");
        rendered(&mut tip);
        tip.handle_event(&moved(31, 12), &ctx());
        assert!(tip.is_open());
        let buffer = rendered(&mut tip);
        // 12 chars + padding = 14 wide, centered over a 3-wide anchor.
        assert_eq!(
            tip.panel().panel_rect(),
            Some(Rect {
                x: 25,
                y: 10,
                width: 14,
                height: 1
            })
        );
        assert_eq!(buffer[(26, 10)].symbol(), "S");
        tip.handle_event(&moved(60, 20), &ctx());
        assert!(!tip.is_open());
    }

    #[test]
    fn focus_opened_tooltip_survives_pointer_leaving() {
        let mut tip = TooltipComponent::new("[?]", "help");
        rendered(&mut tip);
        tip.focus();
        tip.handle_event(&moved(60, 20), &ctx());
        assert!(tip.is_open());
        let esc = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(tip.handle_event(&esc, &ctx()));
        assert!(!tip.is_open());
    }

    #[test]
    fn outside_scroll_closes() {
        let mut tip = TooltipComponent::new("[?]", "help");
        rendered(&mut tip);
        tip.show(OpenReason::Programmatic);
        let wheel = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        tip.handle_event(&wheel, &ctx());
        assert!(!tip.is_open());
    }

    #[test]
    fn content_size_wraps_inside_margins() {
        let tip = TooltipComponent::new("?", "x".repeat(100));
        let size = tip.content_size(Size {
            width: 40,
            height: 24,
        });
        assert_eq!(size.width, 24);
        assert_eq!(size.height, 5);
    }

    #[test]
    fn focused_tooltip_is_visible_on_short_terminal() {
        let small = ComponentContext::new(
            true,
            Size {
                width: 30,
                height: 8,
            },
        );
        let mut tip = TooltipComponent::new("[?]", "help");
        let mut buffer = Buffer::empty(Rect::new(0, 0, 30, 8));
        let mut frame = UiFrame::from_buffer(&mut buffer);
        tip.render(&mut frame, Rect::new(2, 4, 3, 1), &small);
        tip.focus();
        let rect = tip.panel().panel_rect().unwrap();
        assert_eq!(rect, Rect::new(8, 3, 6, 1));
        assert!(rect.bottom() <= 8 && rect.right() <= 30);
        tip.render_floating(&mut frame, &small);
        assert_eq!(buffer[(9, 3)].symbol(), "h");
    }

    #[test]
    fn placement_can_change() {
        let mut tip = TooltipComponent::new("?", "tip").with_placement(Placement::RightStart);
        assert_eq!(tip.placement(), Some(Placement::RightStart));
        tip.set_placement(Placement::LeftEnd);
        assert_eq!(tip.placement(), Some(Placement::LeftEnd));
    }
}
