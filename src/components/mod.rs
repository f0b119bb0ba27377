use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod accordion;
pub mod autocomplete;
pub mod checkbox_group;
pub mod dropdown_list;
pub mod select;
pub mod tabs;
pub mod toast;
pub mod tooltip;

pub use accordion::{AccordionComponent, AccordionItem, AccordionMode, AccordionState};
pub use autocomplete::{AutocompleteComponent, AutocompleteEvent, FilterFn, filter_options};
pub use checkbox_group::{CheckboxGroupComponent, CheckboxGroupEvent};
pub use select::{SelectComponent, SelectEvent};
pub use tabs::{TabItem, TabsComponent, TabsEvent};
pub use toast::{
    Toast, ToastAction, ToastConfig, ToastContext, ToastEvent, ToastId, ToastOptions,
    ToastProvider, ToastVariant, ToastViewport,
};
pub use tooltip::TooltipComponent;

pub use crate::component_context::ComponentContext;

/// Outcome of routing one event into a component.
///
/// `handled` tells the host to stop routing the event; `event` carries the
/// component's own notification (a value change, a toast action, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<E> {
    pub handled: bool,
    pub event: Option<E>,
}

impl<E> Response<E> {
    pub fn ignored() -> Self {
        Self {
            handled: false,
            event: None,
        }
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            event: None,
        }
    }

    pub fn emit(event: Option<E>) -> Self {
        Self {
            handled: true,
            event,
        }
    }
}

pub trait Component {
    fn resize(&mut self, _area: Rect, _ctx: &ComponentContext) {}

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}

/// Components that paint an overlay outside their own layout slot.
///
/// Hosts call `render_floating` after every regular component has rendered
/// so panels land on top of the surrounding layout.
pub trait Floating {
    fn render_floating(&mut self, frame: &mut UiFrame<'_>, ctx: &ComponentContext);

    fn floating_open(&self) -> bool;
}
