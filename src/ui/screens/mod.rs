//! Per-screen content rendering.
//!
//! One module per screen. The form-field helpers here are shared by the
//! sign-in and register screens and by the create overlays.

pub mod dashboard;
pub mod issues;
pub mod login;
pub mod projects;
pub mod register;

use ratatui::text::{Line, Span};

use crate::ui::styles;

/// Visible width of a text input field
pub(crate) const FIELD_WIDTH: usize = 24;

/// Application wordmark shown on the sign-in screens and the help overlay
pub(crate) const LOGO: [&str; 3] = [
    "╔╦╗╦╔╗╔╦ ╦╦╦═╗╔═╗",
    "║║║║║║║║ ║║╠╦╝╠═╣",
    "╩ ╩╩╝╚╝╩╚╝╩╩╚═╩ ╩",
];

/// Render one form field as `Label: [value▌]`.
/// Long values show their tail so the typing position stays visible.
pub(crate) fn field_line(label: &str, value: &str, focused: bool, mask: bool) -> Line<'static> {
    let shown: String = if mask {
        "*".repeat(value.chars().count().min(FIELD_WIDTH))
    } else {
        let chars: Vec<char> = value.chars().collect();
        let start = chars.len().saturating_sub(FIELD_WIDTH);
        chars[start..].iter().collect()
    };
    let display = format!("{:<width$}", shown, width = FIELD_WIDTH);
    let cursor = if focused { "▌" } else { "" };
    let value_style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };

    Line::from(vec![
        Span::raw("   "),
        Span::styled(format!("{:>11}: [", label), styles::muted_style()),
        Span::styled(format!("{}{}", display, cursor), value_style),
        Span::styled("]", styles::muted_style()),
    ])
}

/// Render a submit button, with arrows marking focus
pub(crate) fn button_line(label: &str, focused: bool) -> Line<'static> {
    let inner = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };

    Line::from(vec![
        Span::raw("             ["),
        Span::styled(inner, style),
        Span::raw("]"),
    ])
}
