use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Row, Table},
    Frame,
};
use tickdo_core::{Status, StatusFilter, TaskGroup};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::{App, InputMode};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Grouped list
            Constraint::Length(3), // Input / message
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    draw_header(f, app, main_chunks[0]);
    draw_task_groups(f, app, main_chunks[1]);
    draw_input(f, app, main_chunks[2]);

    let footer = Paragraph::new(
        "j/k: Navigate | Space: Toggle | a: Add | e: Edit | c: Category | f: Filter | d: Delete | q: Quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[3]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let filter_str = match app.filter {
        None => "all",
        Some(StatusFilter::Open) => "open",
        Some(StatusFilter::Completed) => "completed",
    };
    let title = Line::from(vec![
        Span::styled(
            "TICKDO",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!(
                "{} open, {} done | view: {}",
                app.counts.open, app.counts.completed, filter_str
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let header = Paragraph::new(title).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(header, area);
}

fn draw_task_groups(f: &mut Frame, app: &mut App, area: Rect) {
    if app.visible_len() == 0 {
        let empty = Paragraph::new("No tasks. Press 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .title(" Tasks ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            );
        f.render_widget(empty, area);
        return;
    }

    let mut rows: Vec<Row> = Vec::new();
    for group in &app.groups {
        rows.push(group_header_row(group));
        for task in &group.tasks {
            let status_icon = match task.status {
                Status::Completed => "✔",
                Status::Open => "☐",
            };

            let (marker, description_style) = if task.is_urgent {
                (
                    Span::styled("!", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )
            } else if task.status == Status::Completed {
                (
                    Span::raw(" "),
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                (Span::raw(" "), Style::default())
            };

            rows.push(Row::new(vec![
                Span::raw(format!("  {}", status_icon)),
                marker,
                Span::styled(task.description.clone(), description_style),
            ]));
        }
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(4), // Status
            Constraint::Length(2), // Urgency marker
            Constraint::Min(10),   // Description
        ],
    )
    .block(
        Block::default()
            .title(" Tasks ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn group_header_row(group: &TaskGroup) -> Row<'static> {
    let open = group
        .tasks
        .iter()
        .filter(|t| t.status == Status::Open)
        .count();
    let completed = group.tasks.len() - open;
    Row::new(vec![
        Span::raw(""),
        Span::raw(""),
        Span::styled(
            format!("{} ({} open, {} done)", group.label(), open, completed),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let (title, text, style) = match app.input_mode {
        InputMode::Normal => match &app.message {
            Some(msg) => (" Message ", msg.clone(), Style::default().fg(Color::Red)),
            None => (
                " Input ",
                "Press 'a' to add a task (metadata: cat:<work|personal|shopping|other>)"
                    .to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        },
        InputMode::Adding | InputMode::Editing => match &app.message {
            Some(msg) => (" Input ", msg.clone(), Style::default().fg(Color::Red)),
            None => (" Input ", app.input.clone(), Style::default()),
        },
    };

    let input = Paragraph::new(text).style(style).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(input, area);

    // Place the terminal cursor behind the character the app cursor
    // points at, width-aware for wide glyphs.
    if matches!(app.input_mode, InputMode::Adding | InputMode::Editing) && app.message.is_none() {
        let before_cursor: String = app.input.chars().take(app.cursor_position).collect();
        let x = area.x + 1 + before_cursor.width() as u16;
        let y = area.y + 1;
        f.set_cursor_position((x.min(area.x + area.width.saturating_sub(2)), y));
    }
}
