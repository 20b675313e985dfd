use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Render the dashboard: counters on top, project list below
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(5)])
        .split(area);

    render_counters(frame, app, chunks[0]);
    super::projects::render_project_table(frame, app, chunks[1], false);
}

fn render_counters(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    let stats = app.stats.as_ref();
    render_counter(
        frame,
        "Projects",
        stats.map(|s| s.total_projects),
        chunks[0],
    );
    render_counter(frame, "Issues", stats.map(|s| s.total_issues), chunks[1]);
    render_counter(frame, "My Issues", stats.map(|s| s.my_issues), chunks[2]);
}

/// One counter box; "-" until stats arrive
fn render_counter(frame: &mut Frame, label: &str, value: Option<i64>, area: Rect) {
    let value_text = value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", value_text),
            styles::title_style(),
        )),
    ];

    let block = Block::default()
        .title(format!(" {} ", label))
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
