use std::time::{Duration, Instant};

use crossterm::event::{Event, MouseButton, MouseEventKind};
use indoc::{formatdoc, indoc};
use ratatui::layout::{Constraint, Layout, Rect, Size};
use ratatui::widgets::{Block, Borders, Paragraph};
use velvet_ui::components::{
    AccordionComponent, AccordionItem, AccordionMode, AutocompleteComponent, AutocompleteEvent,
    CheckboxGroupComponent, CheckboxGroupEvent, Component, ComponentContext, Floating,
    SelectComponent, SelectEvent, TabItem, TabsComponent, TabsEvent, ToastAction, ToastEvent,
    ToastOptions, ToastProvider, ToastVariant, ToastViewport, TooltipComponent,
};
use velvet_ui::event_loop::ControlFlow;
use velvet_ui::floating::CloseReason;
use velvet_ui::keybindings::{Action, KeyBindings};
use velvet_ui::layout::rect_contains;
use velvet_ui::log_buffer::LogBuffer;
use velvet_ui::option::{OptionItem, OptionList};
use velvet_ui::ui::UiFrame;

const HELP: &str = indoc! {"
    Tab/Shift-Tab focus  Enter/Space open  Esc close
    Ctrl-X dismiss toast  Ctrl-Q quit
"};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Select,
    Autocomplete,
    Tooltip,
    Checkboxes,
    Tabs,
    Accordion,
}

const SLOTS: [Slot; 6] = [
    Slot::Select,
    Slot::Autocomplete,
    Slot::Tooltip,
    Slot::Checkboxes,
    Slot::Tabs,
    Slot::Accordion,
];

fn fruit() -> Vec<OptionItem> {
    vec![
        OptionItem::simple("Apple"),
        OptionItem::simple("Apricot"),
        OptionItem::simple("Banana").disabled(true),
        OptionItem::simple("Blueberry"),
        OptionItem::simple("Cherry"),
        OptionItem::simple("Grape"),
        OptionItem::simple("Mango"),
        OptionItem::simple("Peach"),
        OptionItem::simple("Pear"),
        OptionItem::simple("Plum"),
    ]
}

pub struct Gallery {
    select: SelectComponent,
    autocomplete: AutocompleteComponent,
    tooltip: TooltipComponent,
    checkboxes: CheckboxGroupComponent,
    tabs: TabsComponent,
    accordion: AccordionComponent,
    toasts: ToastProvider,
    toast_viewport: ToastViewport,
    toast_duration: Option<Duration>,
    logs: LogBuffer,
    focus: usize,
    slots: [Rect; 6],
    viewport: Size,
    now: Instant,
    changes: usize,
}

impl Gallery {
    pub fn new(config: &crate::PlaygroundConfig, logs: LogBuffer) -> Self {
        let options = |items| OptionList::new(items).unwrap_or_default();
        let toasts = ToastProvider::new(config.toast);
        let toast_viewport = ToastViewport::new(toasts.context());
        let mut gallery = Self {
            select: SelectComponent::new(options(fruit()))
                .with_placeholder("Pick a fruit")
                .with_clearable(true),
            autocomplete: AutocompleteComponent::new(options(fruit()))
                .with_placeholder("Type to search")
                .with_blur_delay(config.blur_delay),
            tooltip: TooltipComponent::new(
                "[ hover or focus me ]",
                format!("Placed {} with an 8 cell margin", config.placement),
            )
            .with_placement(config.placement),
            checkboxes: CheckboxGroupComponent::new(
                "Toppings",
                options(vec![
                    OptionItem::simple("Cheese"),
                    OptionItem::simple("Olives"),
                    OptionItem::simple("Anchovies").disabled(true),
                    OptionItem::simple("Basil"),
                ]),
            ),
            tabs: TabsComponent::new(vec![
                TabItem::new("account", "Account"),
                TabItem::new("billing", "Billing").disabled(true),
                TabItem::new("team", "Team"),
            ])
            .with_value("account"),
            accordion: AccordionComponent::new(
                vec![
                    AccordionItem::new("shipping", "Shipping", "Orders ship within two days."),
                    AccordionItem::new("returns", "Returns", "Return anything within 30 days."),
                    AccordionItem::new("support", "Support", "Reach us any time from the app."),
                ],
                AccordionMode::Single,
            )
            .with_collapsible(true),
            toasts,
            toast_viewport,
            toast_duration: config.toast_duration,
            logs,
            focus: 0,
            slots: [Rect::default(); 6],
            viewport: Size::default(),
            now: Instant::now(),
            changes: 0,
        };
        gallery.notify(ToastVariant::Info, "Welcome", Some("Tab through the gallery"));
        gallery
    }

    fn ctx(&self, slot: Slot) -> ComponentContext {
        ComponentContext::new(SLOTS[self.focus] == slot, self.viewport)
    }

    fn notify(&mut self, variant: ToastVariant, title: &str, description: Option<&str>) {
        let mut options = ToastOptions::new(title).variant(variant);
        options.duration = self.toast_duration;
        if let Some(description) = description {
            options = options.description(description);
        }
        self.toasts.add_toast(options, self.now);
    }

    fn set_focus(&mut self, index: usize) {
        let index = index % SLOTS.len();
        if index == self.focus {
            return;
        }
        match SLOTS[self.focus] {
            Slot::Select => {
                self.select.close(CloseReason::Blur);
            }
            Slot::Autocomplete => self.autocomplete.blur(self.now),
            Slot::Tooltip => self.tooltip.blur(),
            _ => {}
        }
        self.focus = index;
        match SLOTS[self.focus] {
            Slot::Autocomplete => self.autocomplete.focus(),
            Slot::Tooltip => self.tooltip.focus(),
            _ => {}
        }
    }

    pub fn tick(&mut self, now: Instant) -> ControlFlow {
        self.now = now;
        self.autocomplete.tick(now);
        self.toasts.tick(now);
        ControlFlow::Continue
    }

    pub fn handle_input(&mut self, event: &Event) -> ControlFlow {
        let kb = KeyBindings::shared();
        if let Event::Key(key) = event
            && kb.matches(Action::Quit, key)
        {
            return ControlFlow::Quit;
        }
        if let Event::Resize(width, height) = event {
            self.viewport = Size::new(*width, *height);
            return ControlFlow::Continue;
        }

        let toast = self.toast_viewport.handle_toast_event(event);
        if let Some(toast_event) = toast.event {
            self.on_toast(toast_event);
        }
        if toast.handled {
            return ControlFlow::Continue;
        }

        if let Event::Mouse(mouse) = event
            && mouse.kind == MouseEventKind::Down(MouseButton::Left)
            && let Some(index) = self
                .slots
                .iter()
                .position(|slot| rect_contains(*slot, mouse.column, mouse.row))
        {
            self.set_focus(index);
        }

        if self.route(event) {
            return ControlFlow::Continue;
        }

        if let Event::Key(key) = event {
            if kb.matches(Action::FocusNext, key) {
                self.set_focus(self.focus + 1);
            } else if kb.matches(Action::FocusPrev, key) {
                self.set_focus(self.focus + SLOTS.len() - 1);
            }
        }
        ControlFlow::Continue
    }

    /// Offer `event` to the components, floating ones first. Stops at the
    /// first component that handles it.
    fn route(&mut self, event: &Event) -> bool {
        let ctx = self.ctx(Slot::Select);
        let select = self.select.handle_select_event(event, &ctx);
        if let Some(SelectEvent::Changed(value)) = select.event {
            let label = value.unwrap_or_else(|| "nothing".to_string());
            self.changed(&format!("Selected {label}"));
        }
        if select.handled {
            return true;
        }

        let ctx = self.ctx(Slot::Autocomplete);
        let autocomplete = self.autocomplete.handle_autocomplete_event(event, &ctx);
        if let Some(AutocompleteEvent::Changed(Some(value))) = autocomplete.event {
            self.changed(&format!("Picked {value}"));
        }
        if autocomplete.handled {
            return true;
        }

        let ctx = self.ctx(Slot::Tooltip);
        if self.tooltip.handle_tooltip_event(event, &ctx) {
            return true;
        }

        let ctx = self.ctx(Slot::Checkboxes);
        let checkboxes = self.checkboxes.handle_checkbox_event(event, &ctx);
        if let Some(CheckboxGroupEvent::Changed(value)) = checkboxes.event {
            self.changed(&format!("Toppings: {}", value.join(", ")));
        }
        if checkboxes.handled {
            return true;
        }

        let ctx = self.ctx(Slot::Tabs);
        let tabs = self.tabs.handle_tabs_event(event, &ctx);
        if let Some(TabsEvent::Changed(value)) = tabs.event {
            // Controlled: adopt the change explicitly.
            self.tabs.sync_value(value.clone());
            self.changed(&format!("Tab {value}"));
        }
        if tabs.handled {
            return true;
        }

        let ctx = self.ctx(Slot::Accordion);
        self.accordion.handle_event(event, &ctx)
    }

    fn changed(&mut self, title: &str) {
        self.changes += 1;
        let mut options = ToastOptions::new(title)
            .variant(ToastVariant::Success)
            .action(ToastAction::new("undo", "Undo"));
        options.duration = self.toast_duration;
        self.toasts.add_toast(options, self.now);
    }

    fn on_toast(&mut self, event: ToastEvent) {
        match event {
            ToastEvent::Dismissed(id) => tracing::info!(toast_id = id, "toast closed by user"),
            ToastEvent::Action { toast, action } => {
                tracing::info!(toast_id = toast, %action, "toast action");
                self.notify(ToastVariant::Warning, "Undo is not wired up", None);
            }
        }
    }

    pub fn draw(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        self.viewport = Size::new(area.width, area.height);

        let [body, footer] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(2)]).areas(area);
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .areas(body);
        let [select, autocomplete, tooltip, checkboxes, tabs, accordion] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(6),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .areas(left);
        self.slots = [select, autocomplete, tooltip, checkboxes, tabs, accordion];

        let ctx = self.ctx(Slot::Select);
        self.select.render(frame, select, &ctx);
        let ctx = self.ctx(Slot::Autocomplete);
        self.autocomplete.render(frame, autocomplete, &ctx);
        let ctx = self.ctx(Slot::Tooltip);
        self.tooltip.render(frame, tooltip, &ctx);
        let ctx = self.ctx(Slot::Checkboxes);
        self.checkboxes.render(frame, checkboxes, &ctx);
        let ctx = self.ctx(Slot::Tabs);
        self.tabs.render(frame, tabs, &ctx);
        let ctx = self.ctx(Slot::Accordion);
        self.accordion.render(frame, accordion, &ctx);

        let log_block = Block::default().borders(Borders::ALL).title("Log");
        let inner = log_block.inner(right);
        frame.render_widget(log_block, right);
        let lines = self.logs.tail(inner.height as usize).join("\n");
        frame.render_widget(Paragraph::new(lines), inner);
        frame.render_widget(Paragraph::new(HELP), footer);

        // Overlays paint last, toasts above everything.
        let ctx = self.ctx(Slot::Select);
        self.select.render_floating(frame, &ctx);
        let ctx = self.ctx(Slot::Autocomplete);
        self.autocomplete.render_floating(frame, &ctx);
        let ctx = self.ctx(Slot::Tooltip);
        self.tooltip.render_floating(frame, &ctx);
        let ctx = ComponentContext::new(false, self.viewport);
        self.toast_viewport.render(frame, area, &ctx);
    }

    pub fn summary(&self) -> String {
        formatdoc! {"
            velvet-playground
              value changes: {changes}
              toasts still open: {open}
              select: {select}
              toppings: {toppings}",
            changes = self.changes,
            open = self.toasts.len(),
            select = self.select.value().unwrap_or("-"),
            toppings = self.checkboxes.value().join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn gallery() -> Gallery {
        let cli = crate::PlaygroundCli::parse_from(["velvet-playground"]);
        let config = crate::PlaygroundConfig::try_from(&cli).unwrap();
        Gallery::new(&config, LogBuffer::new(50))
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    fn draw(gallery: &mut Gallery) -> Terminal<TestBackend> {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| gallery.draw(&mut UiFrame::new(frame)))
            .unwrap();
        terminal
    }

    #[test]
    fn tab_cycles_focus_and_ctrl_q_quits() {
        let mut gallery = gallery();
        draw(&mut gallery);
        assert_eq!(SLOTS[gallery.focus], Slot::Select);
        gallery.handle_input(&key(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(SLOTS[gallery.focus], Slot::Autocomplete);
        assert!(gallery.autocomplete.is_open());
        gallery.handle_input(&key(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(SLOTS[gallery.focus], Slot::Select);
        assert!(gallery.autocomplete.blur_pending());
        assert_eq!(
            gallery.handle_input(&key(KeyCode::Char('q'), KeyModifiers::CONTROL)),
            ControlFlow::Quit
        );
    }

    #[test]
    fn value_change_raises_a_toast() {
        let mut gallery = gallery();
        draw(&mut gallery);
        let before = gallery.toasts.len();
        gallery.handle_input(&key(KeyCode::Enter, KeyModifiers::NONE));
        gallery.handle_input(&key(KeyCode::Down, KeyModifiers::NONE));
        gallery.handle_input(&key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(gallery.select.value(), Some("Apple"));
        assert_eq!(gallery.toasts.len(), before + 1);
        assert!(gallery.summary().contains("select: Apple"));
    }

    #[test]
    fn draws_log_pane_and_welcome_toast() {
        let mut gallery = gallery();
        let terminal = draw(&mut gallery);
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Log"));
        assert!(screen.contains("Welcome"));
    }
}
