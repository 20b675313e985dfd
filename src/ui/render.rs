use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, IssueFocus, ProjectFocus};
use crate::guard::Route;
use crate::utils::truncate_string;

use super::screens::{self, field_line, LOGO};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Navigation
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_nav_bar(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::CreatingProject => render_project_form_overlay(frame, app),
        AppState::CreatingIssue => render_issue_form_overlay(frame, app),
        AppState::ConfirmingDelete => render_delete_overlay(frame, app),
        AppState::Normal => {}
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  MiniJira";
    // While a form screen owns the keyboard, '?' is just a character
    let help_hint = match app.route {
        Route::Login | Route::Register => "",
        _ => "[?] Help",
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_nav_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];

    match app.route {
        Route::Login | Route::Register => {
            spans.push(Span::styled(app.route.title(), styles::muted_style()));
        }
        _ => {
            let tabs = [
                ("[1] Dashboard", app.route == Route::Dashboard),
                (
                    "[2] Projects",
                    matches!(app.route, Route::Projects | Route::Issues(_)),
                ),
            ];
            for (i, (label, selected)) in tabs.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::styled(" | ", styles::muted_style()));
                }
                if *selected {
                    spans.push(Span::styled(*label, styles::tab_style(true)));
                } else {
                    spans.push(Span::styled(*label, styles::muted_style()));
                }
            }
            if let Some(name) = app.current_project_name() {
                spans.push(Span::styled(" › ", styles::muted_style()));
                spans.push(Span::styled(
                    truncate_string(name, 32),
                    styles::highlight_style(),
                ));
            }
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.route {
        Route::Login => screens::login::render(frame, app, area),
        Route::Register => screens::register::render(frame, app, area),
        Route::Dashboard => screens::dashboard::render(frame, app, area),
        Route::Projects => screens::projects::render(frame, app, area),
        Route::Issues(_) => screens::issues::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if app.loading {
        " Working... ".to_string()
    } else {
        " Ready ".to_string()
    };

    let right_text = match app.route {
        Route::Login | Route::Register => " Tab next field | Enter submit ".to_string(),
        _ => match app.session_identity() {
            Some(identity) => format!(" {} | [l]ogout | [q]uit ", identity),
            None => " [q]uit ".to_string(),
        },
    };

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 24, frame.area());

    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let mut help_text = Vec::new();
    for row in LOGO {
        help_text.push(Line::from(Span::styled(
            format!("                {}", row),
            styles::title_style(),
        )));
    }
    help_text.push(Line::from(Span::styled(
        format!("                  version {}", version),
        styles::muted_style(),
    )));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Navigation",
        styles::highlight_style(),
    )));
    help_text.push(Line::from(vec![
        Span::styled("  1/2       ", styles::help_key_style()),
        Span::styled("Dashboard / Projects", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  ↑/↓ j/k   ", styles::help_key_style()),
        Span::styled("Move selection", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  Enter     ", styles::help_key_style()),
        Span::styled("Open selected project", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  Esc       ", styles::help_key_style()),
        Span::styled("Go back", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Actions",
        styles::highlight_style(),
    )));
    help_text.push(Line::from(vec![
        Span::styled("  n         ", styles::help_key_style()),
        Span::styled("New project / new issue", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  t/Space   ", styles::help_key_style()),
        Span::styled("Advance issue status", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  d         ", styles::help_key_style()),
        Span::styled("Delete selected issue", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  r         ", styles::help_key_style()),
        Span::styled("Refresh current screen", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Session",
        styles::highlight_style(),
    )));
    help_text.push(Line::from(vec![
        Span::styled("  l         ", styles::help_key_style()),
        Span::styled("Sign out", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(vec![
        Span::styled("  q         ", styles::help_key_style()),
        Span::styled("Quit", styles::help_desc_style()),
    ]));
    help_text.push(Line::from(""));
    help_text.push(Line::from(vec![
        Span::styled("       Press ", styles::muted_style()),
        Span::styled("?", styles::help_key_style()),
        Span::styled(" or ", styles::muted_style()),
        Span::styled("Esc", styles::help_key_style()),
        Span::styled(" to close", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

fn render_project_form_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(50, 8, frame.area());

    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        field_line(
            "Name",
            &app.project_name,
            app.project_focus == ProjectFocus::Name,
            false,
        ),
        field_line(
            "Description",
            &app.project_description,
            app.project_focus == ProjectFocus::Description,
            false,
        ),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Enter", styles::help_key_style()),
            Span::styled(" create   ", styles::muted_style()),
            Span::styled("Tab", styles::help_key_style()),
            Span::styled(" next   ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" New Project ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_issue_form_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(50, 9, frame.area());

    frame.render_widget(Clear, area);

    let priority_focused = app.issue_focus == IssueFocus::Priority;
    let priority_style = if priority_focused {
        styles::selected_style()
    } else {
        styles::priority_style(app.issue_priority)
    };

    let lines = vec![
        Line::from(""),
        field_line(
            "Title",
            &app.issue_title,
            app.issue_focus == IssueFocus::Title,
            false,
        ),
        field_line(
            "Description",
            &app.issue_description,
            app.issue_focus == IssueFocus::Description,
            false,
        ),
        Line::from(vec![
            Span::raw("   "),
            Span::styled(format!("{:>11}: ", "Priority"), styles::muted_style()),
            Span::styled(
                format!("◀ {:^10} ▶", app.issue_priority.label()),
                priority_style,
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Enter", styles::help_key_style()),
            Span::styled(" create   ", styles::muted_style()),
            Span::styled("Tab", styles::help_key_style()),
            Span::styled(" next   ", styles::muted_style()),
            Span::styled("◀/▶", styles::help_key_style()),
            Span::styled(" priority   ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" New Issue ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(50, 8, frame.area());

    frame.render_widget(Clear, area);

    let title = app
        .current_issues()
        .get(app.issue_selection)
        .map(|issue| truncate_string(&issue.title, 40))
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Delete this issue?",
            styles::error_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(format!("   {}", title), styles::list_item_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to delete, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Confirm ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub(crate) fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
