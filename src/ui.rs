use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};

use crate::app::{App, Notice, NoticeKind, Screen, ViewMode};
use crate::form::{Form, FormEvent, FormKind};
use crate::kanban_board::Destination;
use crate::store::Store;
use crate::task::{Priority, Status, Task};

const TOAST_TTL: Duration = Duration::from_secs(3);
const TICK: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug)]
struct Toast {
    notice: Notice,
    shown_at: Instant,
}

/// Selection, open form, card being dragged and the current toast.
#[derive(Debug, Default)]
pub struct UiState {
    pub selected_project: usize,
    pub selected_status: usize,
    pub selected_task: usize,
    pub selected_row: usize,
    /// Id of the card picked up for a drag.
    pub carrying: Option<String>,
    pub form: Option<Form>,
    toast: Option<Toast>,
}

impl UiState {
    pub fn notice(&self) -> Option<&Notice> {
        self.toast.as_ref().map(|t| &t.notice)
    }

    fn notify(&mut self, notice: Notice) {
        self.toast = Some(Toast {
            notice,
            shown_at: Instant::now(),
        });
    }

    fn expire_toast(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|t| t.shown_at.elapsed() >= TOAST_TTL)
        {
            self.toast = None;
        }
    }

    fn status(&self) -> Status {
        Status::ALL[self.selected_status.min(Status::ALL.len() - 1)]
    }

    fn selected_card<S: Store>(&self, app: &App<S>) -> Option<Task> {
        match app.view() {
            ViewMode::Board => app
                .visible_tasks(self.status())
                .get(self.selected_task)
                .map(|t| (*t).clone()),
            ViewMode::List => app
                .project_tasks()
                .get(self.selected_row)
                .map(|t| (*t).clone()),
        }
    }

    fn clamp<S: Store>(&mut self, app: &App<S>) {
        let projects = app.projects().len();
        self.selected_project = self.selected_project.min(projects.saturating_sub(1));
        let cards = app.visible_tasks(self.status()).len();
        self.selected_task = self.selected_task.min(cards.saturating_sub(1));
        let rows = app.project_tasks().len();
        self.selected_row = self.selected_row.min(rows.saturating_sub(1));
    }

    pub fn handle_key<S: Store>(&mut self, key: KeyEvent, app: &mut App<S>) -> Flow {
        if let Some(form) = self.form.as_mut() {
            match form.handle_key(key.code) {
                FormEvent::Editing => {}
                FormEvent::Cancel => self.form = None,
                FormEvent::Submit => self.submit_form(app),
            }
            return Flow::Continue;
        }

        let on_board = matches!(app.screen(), Screen::Board { .. });
        let flow = if on_board {
            self.handle_board_key(key.code, app)
        } else {
            self.handle_projects_key(key.code, app)
        };
        self.clamp(app);
        flow
    }

    fn submit_form<S: Store>(&mut self, app: &mut App<S>) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let result = match form.kind {
            FormKind::Project => app.add_project(&form.project_draft()),
            FormKind::Task => app.add_task(&form.task_draft()),
        };
        // A rejected submission keeps the form open with what was typed.
        if result.is_ok() {
            self.form = None;
        }
        self.notify(Notice::from_result(result));
        self.clamp(app);
    }

    fn handle_projects_key<S: Store>(&mut self, code: KeyCode, app: &mut App<S>) -> Flow {
        match code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('a') => self.form = Some(Form::project()),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_project = self.selected_project.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => self.selected_project += 1,
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_project_id(app) {
                    let result = app.delete_project(&id);
                    self.notify(Notice::from_result(result));
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.selected_project_id(app) {
                    match app.open_project(&id) {
                        Ok(()) => {
                            self.selected_status = 0;
                            self.selected_task = 0;
                            self.selected_row = 0;
                        }
                        Err(err) => self.notify(Notice::error(err.to_string())),
                    }
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    fn selected_project_id<S: Store>(&self, app: &App<S>) -> Option<String> {
        app.projects()
            .projects()
            .get(self.selected_project)
            .map(|p| p.id.clone())
    }

    fn handle_board_key<S: Store>(&mut self, code: KeyCode, app: &mut App<S>) -> Flow {
        match code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Esc if self.carrying.is_some() => self.carrying = None,
            KeyCode::Esc | KeyCode::Char('b') => {
                self.carrying = None;
                app.close_project();
            }
            KeyCode::Char('v') => {
                self.carrying = None;
                app.toggle_view();
            }
            KeyCode::Char('a') => self.form = Some(Form::task(self.status())),
            KeyCode::Char('d') => {
                self.carrying = None;
                if let Some(card) = self.selected_card(app) {
                    let result = app.delete_task(&card.id);
                    self.notify(Notice::from_result(result));
                }
            }
            KeyCode::Left | KeyCode::Char('h') if app.view() == ViewMode::Board => {
                self.selected_status = self.selected_status.saturating_sub(1);
                self.selected_task = 0;
            }
            KeyCode::Right | KeyCode::Char('l') if app.view() == ViewMode::Board => {
                self.selected_status = (self.selected_status + 1).min(Status::ALL.len() - 1);
                self.selected_task = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => match app.view() {
                ViewMode::Board => self.selected_task = self.selected_task.saturating_sub(1),
                ViewMode::List => self.selected_row = self.selected_row.saturating_sub(1),
            },
            KeyCode::Down | KeyCode::Char('j') => match app.view() {
                ViewMode::Board => self.selected_task += 1,
                ViewMode::List => self.selected_row += 1,
            },
            KeyCode::Char(' ') | KeyCode::Enter if app.view() == ViewMode::Board => {
                if self.carrying.is_some() {
                    self.drop_card(app);
                } else if let Some(card) = self.selected_card(app) {
                    self.carrying = Some(card.id);
                }
            }
            _ => {}
        }
        Flow::Continue
    }

    fn drop_card<S: Store>(&mut self, app: &mut App<S>) {
        let Some(task_id) = self.carrying.take() else {
            return;
        };
        let Some(card) = app.columns().find(&task_id).cloned() else {
            return;
        };
        let target = self.status();
        let result = app.move_card(&card, &Destination::from(target));
        if result.is_ok() {
            if let Some(index) = app
                .visible_tasks(target)
                .iter()
                .position(|t| t.id == task_id)
            {
                self.selected_task = index;
            }
        }
        self.notify(Notice::from_result(result));
    }
}

pub fn run_app<B: Backend, S: Store>(terminal: &mut Terminal<B>, app: &mut App<S>) -> io::Result<()> {
    let mut ui = UiState::default();
    loop {
        ui.expire_toast();
        terminal.draw(|f| draw(f, &*app, &ui))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if ui.handle_key(key, app) == Flow::Quit {
                return Ok(());
            }
        }
    }
}

pub fn draw<S: Store>(f: &mut Frame, app: &App<S>, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    match app.screen() {
        Screen::Projects => draw_projects(f, app, ui, chunks[1]),
        Screen::Board { .. } => match app.view() {
            ViewMode::Board => draw_board(f, app, ui, chunks[1]),
            ViewMode::List => draw_list(f, app, ui, chunks[1]),
        },
    }
    draw_help(f, app, ui, chunks[2]);

    if let Some(form) = &ui.form {
        draw_form(f, form);
    }
    if let Some(notice) = ui.notice() {
        draw_toast(f, notice);
    }
}

fn column_color(status: Status) -> Color {
    match status {
        Status::Backlog => Color::Indexed(61),
        Status::ToDo => Color::Blue,
        Status::InProgress => Color::Yellow,
        Status::Done => Color::Green,
        Status::Cancelled => Color::Red,
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Green,
        Priority::Medium => Color::Yellow,
        Priority::High => Color::LightRed,
    }
}

fn project_color(hex: &str) -> Color {
    hex.parse::<Color>().unwrap_or(Color::Blue)
}

fn draw_header<S: Store>(f: &mut Frame, app: &App<S>, area: Rect) {
    let title = match app.screen() {
        Screen::Projects => Line::from(Span::styled(
            "Projects",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Screen::Board { .. } => {
            let name = app
                .current_project()
                .map(|p| p.name.as_str())
                .unwrap_or("Unknown project");
            let tab = |label: &'static str, active: bool| {
                if active {
                    Span::styled(
                        format!(" {label} "),
                        Style::default().fg(Color::White).bg(Color::Blue),
                    )
                } else {
                    Span::raw(format!(" {label} "))
                }
            };
            Line::from(vec![
                Span::styled(
                    format!("Project Board: {name}  "),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                tab("Board", app.view() == ViewMode::Board),
                tab("List", app.view() == ViewMode::List),
            ])
        }
    };
    f.render_widget(
        Paragraph::new(title).block(Block::default().borders(Borders::ALL).title("kanboard")),
        area,
    );
}

fn draw_projects<S: Store>(f: &mut Frame, app: &App<S>, ui: &UiState, area: Rect) {
    let items: Vec<ListItem> = app
        .projects()
        .projects()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let name_style = if i == ui.selected_project {
                Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled("■ ", Style::default().fg(project_color(&p.color))),
                    Span::styled(p.name.clone(), name_style),
                    Span::raw(format!("  {}", p.created_at.format("%Y-%m-%d"))),
                ]),
                Line::from(Span::styled(
                    format!("  {}", project_description(&p.description)),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Projects"));
    f.render_widget(list, area);
}

fn project_description(description: &str) -> &str {
    if description.trim().is_empty() {
        "No description"
    } else {
        description
    }
}

fn draw_board<S: Store>(f: &mut Frame, app: &App<S>, ui: &UiState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, 5); 5])
        .split(area);

    for (i, status) in Status::ALL.into_iter().enumerate() {
        let tasks = app.visible_tasks(status);
        let focused = ui.selected_status == i;
        let items: Vec<ListItem> = tasks
            .iter()
            .enumerate()
            .map(|(j, t)| card_item(t, focused && ui.selected_task == j, ui.carrying.as_deref()))
            .collect();

        let mut border = Style::default().fg(column_color(status));
        let mut title = format!("{} ({})", status, tasks.len());
        if focused {
            border = border.add_modifier(Modifier::BOLD);
            if ui.carrying.is_some() {
                border = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
                title = format!("{title} drop here");
            }
        }

        let list = List::new(items).block(
            Block::default()
                .title(Span::styled(title, Style::default().fg(column_color(status))))
                .borders(Borders::ALL)
                .border_style(border),
        );
        f.render_widget(list, chunks[i]);
    }
}

fn card_item<'a>(task: &'a Task, selected: bool, carrying: Option<&str>) -> ListItem<'a> {
    let marker = if carrying == Some(task.id.as_str()) {
        "» "
    } else {
        ""
    };
    let title_style = if selected {
        Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::White)
    };
    let mut lines = vec![Line::from(vec![
        Span::raw(marker),
        Span::styled(task.title.as_str(), title_style),
        Span::styled(
            format!(" [{}]", task.priority),
            Style::default().fg(priority_color(task.priority)),
        ),
    ])];
    if !task.description.is_empty() {
        lines.push(Line::from(Span::styled(
            task.description.as_str(),
            Style::default().fg(Color::Gray),
        )));
    }
    let mut meta = Vec::new();
    if !task.assigned_user.is_empty() {
        meta.push(format!("@{}", task.assigned_user));
    }
    if let Some(created) = task.created_at {
        meta.push(created.format("%Y-%m-%d").to_string());
    }
    if !meta.is_empty() {
        lines.push(Line::from(Span::styled(
            meta.join("  "),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::default());
    ListItem::new(lines)
}

fn draw_list<S: Store>(f: &mut Frame, app: &App<S>, ui: &UiState, area: Rect) {
    let header = Row::new(vec!["Title", "Description", "Status", "Created"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = app
        .project_tasks()
        .into_iter()
        .enumerate()
        .map(|(i, t)| {
            let style = if i == ui.selected_row {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(t.title.clone()),
                Cell::from(t.description.clone()),
                Cell::from(Span::styled(
                    t.status.name(),
                    Style::default().fg(column_color(t.status)),
                )),
                Cell::from(
                    t.created_at
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                ),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Tasks"));
    f.render_widget(table, area);
}

fn draw_help<S: Store>(f: &mut Frame, app: &App<S>, ui: &UiState, area: Rect) {
    let help = if ui.form.is_some() {
        "Tab next field  ←/→ change option  Enter submit  Esc cancel"
    } else {
        match (app.screen(), app.view()) {
            (Screen::Projects, _) => "a add  d delete  Enter open  ↑/↓ select  q quit",
            (Screen::Board { .. }, ViewMode::List) => "a add  d delete  v board view  Esc back  q quit",
            (Screen::Board { .. }, ViewMode::Board) if ui.carrying.is_some() => {
                "←/→ choose column  Space/Enter drop  Esc cancel"
            }
            (Screen::Board { .. }, ViewMode::Board) => {
                "a add  d delete  Space pick up  v list view  Esc back  q quit"
            }
        }
    };
    f.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(Color::DarkGray))),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_form(f: &mut Frame, form: &Form) {
    let area = centered(f.area(), 60, form.fields.len() as u16 * 2 + 2);
    let lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .flat_map(|(i, field)| {
            let style = if i == form.focus {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let cursor = if i == form.focus { "_" } else { "" };
            [
                Line::from(Span::styled(field.label, style)),
                Line::from(format!("  {}{cursor}", field.value.display())),
            ]
        })
        .collect();

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(form.title()))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_toast(f: &mut Frame, notice: &Notice) {
    let full = f.area();
    let width = (notice.message.chars().count() as u16 + 4).min(full.width);
    let area = Rect {
        x: full.x + full.width - width,
        y: full.y,
        width,
        height: 3.min(full.height),
    };
    let color = match notice.kind {
        NoticeKind::Success => Color::Green,
        NoticeKind::Error => Color::Red,
    };
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(notice.message.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        ),
        area,
    );
}
