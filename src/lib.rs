//! Floating panels and form primitives for ratatui applications.
//!
//! The geometry and state machines (`layout`, `floating`, `value`, `option`)
//! are renderer agnostic; the `components` module paints them through
//! ratatui and consumes crossterm events.

pub mod component_context;
pub mod components;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod floating;
pub mod keybindings;
pub mod layout;
pub mod log_buffer;
pub mod option;
pub mod theme;
pub mod tracing_sub;
pub mod ui;
pub mod value;

pub use error::{Result, VelvetError};
