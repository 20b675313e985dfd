use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, RegisterFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

use super::{button_line, field_line, LOGO};

/// Render the account registration screen
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let box_area = centered_rect_fixed(46, 13, area);

    let mut lines = Vec::new();
    for row in LOGO {
        lines.push(Line::from(Span::styled(
            format!("             {}", row),
            styles::title_style(),
        )));
    }
    lines.push(Line::from(""));
    lines.push(field_line(
        "Email",
        &app.register_email,
        app.register_focus == RegisterFocus::Email,
        false,
    ));
    lines.push(field_line(
        "Password",
        &app.register_password,
        app.register_focus == RegisterFocus::Password,
        true,
    ));
    lines.push(field_line(
        "Confirm",
        &app.register_confirm,
        app.register_focus == RegisterFocus::Confirm,
        true,
    ));
    lines.push(Line::from(""));
    lines.push(button_line(
        "Register",
        app.register_focus == RegisterFocus::Button,
    ));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("   Esc", styles::help_key_style()),
        Span::styled(" back to sign in", styles::muted_style()),
    ]));

    let block = Block::default()
        .title(" Register ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), box_area);
}
