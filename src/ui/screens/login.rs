use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

use super::{button_line, field_line, LOGO};

/// Render the sign-in screen
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let box_area = centered_rect_fixed(46, 12, area);

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
        &app.login_email,
        app.login_focus == LoginFocus::Email,
        false,
    ));
    lines.push(field_line(
        "Password",
        &app.login_password,
        app.login_focus == LoginFocus::Password,
        true,
    ));
    lines.push(Line::from(""));
    lines.push(button_line("Sign In", app.login_focus == LoginFocus::Button));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("   Ctrl+R", styles::help_key_style()),
        Span::styled(" create account   ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" quit", styles::muted_style()),
    ]));

    let block = Block::default()
        .title(" Sign In ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), box_area);
}
