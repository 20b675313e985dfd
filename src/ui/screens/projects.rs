use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::truncate_string;

/// Render the projects screen
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    render_project_table(frame, app, area, true);
}

/// Project table, shared with the dashboard screen
pub fn render_project_table(frame: &mut Frame, app: &App, area: Rect, focused: bool) {
    let header = Row::new([
        Cell::from("Name"),
        Cell::from("Description"),
        Cell::from("Issues"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = app
        .projects
        .iter()
        .enumerate()
        .map(|(i, project)| {
            let style = if i == app.project_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            // Issue counts come from the prefetched lists; "-" until loaded
            let issue_count = app
                .issues
                .get(&project.id)
                .map(|list| list.len().to_string())
                .unwrap_or_else(|| "-".to_string());
            Row::new([
                Cell::from(truncate_string(&project.name, 32)),
                Cell::from(project.description_display().to_string()),
                Cell::from(format!("{:>6}", issue_count)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(35),
        Constraint::Fill(1),
        Constraint::Length(8),
    ];

    let title = format!(" Projects ({}) - [n]ew [r]efresh ", app.projects.len());

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(focused)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.project_selection));

    frame.render_stateful_widget(table, area, &mut state);
}
