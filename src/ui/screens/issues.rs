use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::app::App;
use crate::models::Issue;
use crate::ui::styles;
use crate::utils::truncate_string;

/// Render the issues screen: table on the left, detail panel on the right
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_issue_table(frame, app, chunks[0]);
    render_issue_detail(frame, app, chunks[1]);
}

fn render_issue_table(frame: &mut Frame, app: &App, area: Rect) {
    let issues = app.current_issues();

    let header = Row::new([
        Cell::from("Title"),
        Cell::from("Status"),
        Cell::from("Priority"),
    ])
    .style(styles::title_style())
    .height(1);

    let rows: Vec<Row> = issues
        .iter()
        .enumerate()
        .map(|(i, issue)| {
            let style = if i == app.issue_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            Row::new([
                Cell::from(truncate_string(&issue.title, 40)),
                Cell::from(Span::styled(
                    issue.status.label(),
                    styles::status_style(issue.status),
                )),
                Cell::from(Span::styled(
                    issue.priority.label(),
                    styles::priority_style(issue.priority),
                )),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Length(10),
    ];

    let project = app.current_project_name().unwrap_or("Issues");
    let title = format!(
        " {} ({}) - [n]ew [t] advance [d]elete ",
        truncate_string(project, 24),
        issues.len()
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .row_highlight_style(styles::selected_style());

    let mut state = TableState::default();
    state.select(Some(app.issue_selection));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_issue_detail(frame: &mut Frame, app: &App, area: Rect) {
    let selected: Option<&Issue> = app.current_issues().get(app.issue_selection);

    let lines = match selected {
        Some(issue) => {
            let mut lines = vec![
                Line::from(Span::styled(issue.title.clone(), styles::title_style())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Status:   ", styles::muted_style()),
                    Span::styled(issue.status.label(), styles::status_style(issue.status)),
                ]),
                Line::from(vec![
                    Span::styled("Priority: ", styles::muted_style()),
                    Span::styled(
                        issue.priority.label(),
                        styles::priority_style(issue.priority),
                    ),
                ]),
                Line::from(""),
            ];
            match issue.description.as_deref() {
                Some(description) if !description.is_empty() => {
                    lines.push(Line::from(Span::styled(
                        "Description",
                        styles::highlight_style(),
                    )));
                    lines.push(Line::from(description.to_string()));
                }
                _ => {
                    lines.push(Line::from(Span::styled(
                        "No description",
                        styles::muted_style(),
                    )));
                }
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "No issues yet - press [n] to create one",
            styles::muted_style(),
        ))],
    };

    let block = Block::default()
        .title(" Detail ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
