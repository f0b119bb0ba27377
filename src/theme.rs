use ratatui::style::{Color, Modifier, Style};

use crate::components::toast::ToastVariant;

// Centralized styles for floating panels and form controls.

pub fn trigger_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn placeholder() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn disabled() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::CROSSED_OUT)
}

pub fn panel() -> Style {
    Style::default().fg(Color::White).bg(Color::Black)
}

pub fn highlighted() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub fn selected() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub fn tooltip() -> Style {
    Style::default().fg(Color::Black).bg(Color::Gray)
}

pub fn toast_accent(variant: ToastVariant) -> Color {
    match variant {
        ToastVariant::Default => Color::White,
        ToastVariant::Success => Color::Green,
        ToastVariant::Error => Color::Red,
        ToastVariant::Warning => Color::Yellow,
        ToastVariant::Info => Color::Blue,
    }
}
