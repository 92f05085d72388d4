use crossterm::event::{self, Event};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

use crate::app::{App, Focus};
use crate::controller::{Clock, DraftField};
use crate::store::Store;
use crate::task::TaskStatus;

pub const TITLE: &str = "Task Form";

pub fn run_app<B: Backend, S: Store, C: Clock>(
    terminal: &mut Terminal<B>,
    app: &mut App<S, C>,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| render(f, app))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key);
        }
    }
    Ok(())
}

pub fn render<S: Store, C: Clock>(f: &mut Frame, app: &App<S, C>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(Span::styled(
        TITLE,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )))
    .centered();
    f.render_widget(header, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    render_form(f, app, columns[0]);
    render_table(f, app, columns[1]);

    let hint = match app.focus {
        Focus::Form(_) => "Tab: next field  Enter: submit  Ctrl-J: newline  Esc: tasks",
        Focus::Table => "↑/↓: select  e: edit  d: delete  t: toggle  Esc: form  q: quit",
    };
    f.render_widget(
        Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        rows[2],
    );
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn render_form<S: Store, C: Clock>(f: &mut Frame, app: &App<S, C>, area: Rect) {
    let outer = Block::default().title("Form").borders(Borders::ALL);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(inner);

    let draft = app.controller.draft();
    let focused = |field| app.focus == Focus::Form(field);

    let name = Paragraph::new(draft.name.as_str()).block(
        Block::default()
            .title("Name")
            .borders(Borders::ALL)
            .border_style(focus_style(focused(DraftField::Name))),
    );
    f.render_widget(name, chunks[0]);

    let description = Paragraph::new(Text::from(draft.description.as_str()))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Description")
                .borders(Borders::ALL)
                .border_style(focus_style(focused(DraftField::Description))),
        );
    f.render_widget(description, chunks[1]);

    let status_line = Line::from(
        [TaskStatus::Pending, TaskStatus::Done]
            .into_iter()
            .map(|s| {
                let marker = if s == draft.status { "(•) " } else { "( ) " };
                Span::raw(format!("{}{}  ", marker, s))
            })
            .collect::<Vec<_>>(),
    );
    let status = Paragraph::new(status_line).block(
        Block::default()
            .title("Status")
            .borders(Borders::ALL)
            .border_style(focus_style(focused(DraftField::Status))),
    );
    f.render_widget(status, chunks[2]);

    let button = Paragraph::new(Line::from(Span::styled(
        format!("[ {} ]", app.submit_label()),
        Style::default().fg(Color::Black).bg(Color::Cyan),
    )))
    .centered();
    f.render_widget(button, chunks[3]);
}

fn render_table<S: Store, C: Clock>(f: &mut Frame, app: &App<S, C>, area: Rect) {
    let rows: Vec<Row> = app
        .controller
        .tasks()
        .iter()
        .map(|t| {
            let style = match t.status {
                TaskStatus::Done => Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::CROSSED_OUT),
                TaskStatus::Pending => Style::default().fg(Color::Gray),
            };
            Row::new(vec![
                Cell::from(t.name.as_str()),
                Cell::from(t.description.replace('\n', " ")),
                Cell::from(t.status.as_str()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(50),
            Constraint::Percentage(20),
        ],
    )
    .header(
        Row::new(vec!["Task", "Description", "Status"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .title("Tasks")
            .borders(Borders::ALL)
            .border_style(focus_style(app.focus == Focus::Table)),
    )
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    if app.focus == Focus::Table && !app.controller.tasks().is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(table, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::TaskListController;
    use crate::store::{MemoryStore, TASKS_KEY};
    use ratatui::backend::TestBackend;

    fn screen(app: &App<MemoryStore, impl Clock>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn app_with(json: &str) -> App<MemoryStore, impl Clock> {
        let store = MemoryStore::with_entry(TASKS_KEY, json);
        App::new(TaskListController::with_clock(store, || 0_i64))
    }

    #[test]
    fn test_renders_tasks_and_add_label() {
        let app = app_with(r#"[{"id":1,"name":"Buy milk","description":"2 liters","status":"pending"}]"#);
        let out = screen(&app);
        assert!(out.contains(TITLE));
        assert!(out.contains("Buy milk"));
        assert!(out.contains("2 liters"));
        assert!(out.contains("[ Add ]"));
    }

    #[test]
    fn test_update_label_while_editing() {
        let mut app = app_with(r#"[{"id":1,"name":"A","description":"d","status":"done"}]"#);
        app.controller.begin_edit(1);
        let out = screen(&app);
        assert!(out.contains("[ Update ]"));
    }
}
