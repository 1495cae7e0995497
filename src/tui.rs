use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::api::{ApiClient, Outcome};
use crate::card;
use crate::models::{Job, Page, Status, TrackingStatus};
use crate::store::Store;

const NOTIFICATION_TTL: Duration = Duration::from_secs(5);
const TICK: Duration = Duration::from_millis(250);
const HISTORY_MAX: usize = 32;
const MAX_VISIBLE_NOTICES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoticeKind {
    Success,
    Info,
    Error,
}

impl NoticeKind {
    fn color(self) -> Color {
        match self {
            NoticeKind::Success => Color::Green,
            NoticeKind::Info => Color::Cyan,
            NoticeKind::Error => Color::Red,
        }
    }
}

/// One toast. They stack, expire individually, and can be dismissed
/// one at a time.
#[derive(Debug)]
struct Notice {
    title: &'static str,
    message: String,
    kind: NoticeKind,
    raised_at: Instant,
}

/// The dialogs are mutually exclusive; opening one replaces nothing
/// because they are only reachable from the base state.
enum Dialog {
    None,
    ConfirmApply,
    DenyReason { input: String },
    TrackingSelect { cursor: usize },
}

struct App {
    store: Store,
    dialog: Dialog,
    notices: Vec<Notice>,
    searching: bool,
    selected: usize,
    detail_scroll: u16,
    list_state: ListState,
    history: Vec<Page>,
    future: Vec<Page>,
    should_quit: bool,
}

pub fn run(client: &ApiClient, store: Store) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(store);
    let result = run_loop(&mut terminal, &mut app, client);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    client: &ApiClient,
) -> Result<()> {
    let start = app.store.page;
    app.activate_page(client, start);

    loop {
        app.expire_notices();
        terminal.draw(|frame| draw(frame, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        app.handle_key(client, key.code);
        if app.should_quit {
            break;
        }
    }
    Ok(())
}

impl App {
    fn new(store: Store) -> Self {
        Self {
            store,
            dialog: Dialog::None,
            notices: Vec::new(),
            searching: false,
            selected: 0,
            detail_scroll: 0,
            list_state: ListState::default(),
            history: Vec::new(),
            future: Vec::new(),
            should_quit: false,
        }
    }

    fn notify(&mut self, kind: NoticeKind, title: &'static str, message: impl Into<String>) {
        self.notices.push(Notice {
            title,
            message: message.into(),
            kind,
            raised_at: Instant::now(),
        });
    }

    fn expire_notices(&mut self) {
        self.notices.retain(|n| n.raised_at.elapsed() < NOTIFICATION_TTL);
    }

    fn dismiss_notice(&mut self) {
        if !self.notices.is_empty() {
            self.notices.remove(0);
        }
    }

    fn visible(&self) -> Vec<Job> {
        self.store.visible()
    }

    fn selected_job_id(&self) -> Option<String> {
        self.visible().get(self.selected).map(|j| j.job_id.clone())
    }

    fn move_down(&mut self) {
        let len = self.visible().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
            self.detail_scroll = 0;
        }
    }

    fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.detail_scroll = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(3);
    }

    /// One fetch per activation. A failed fetch keeps the previous
    /// list and raises one toast.
    fn activate_page(&mut self, client: &ApiClient, page: Page) {
        self.store.page = page;
        self.selected = 0;
        self.detail_scroll = 0;
        let outcome = client.list_jobs(page.status());
        if outcome.success {
            self.store.set_page_jobs(outcome.data.unwrap_or_default());
        } else {
            self.notify(NoticeKind::Error, "Error", "Failed to load jobs");
        }
    }

    fn navigate(&mut self, client: &ApiClient, page: Page) {
        if page == self.store.page {
            return;
        }
        self.history.push(self.store.page);
        if self.history.len() > HISTORY_MAX {
            self.history.remove(0);
        }
        self.future.clear();
        self.activate_page(client, page);
    }

    fn go_back(&mut self, client: &ApiClient) {
        if let Some(page) = self.history.pop() {
            self.future.push(self.store.page);
            self.activate_page(client, page);
        }
    }

    fn go_forward(&mut self, client: &ApiClient) {
        if let Some(page) = self.future.pop() {
            self.history.push(self.store.page);
            self.activate_page(client, page);
        }
    }

    /// Re-fetch the active page after a mutation, keeping the cursor
    /// near where it was.
    fn refresh(&mut self, client: &ApiClient) {
        let page = self.store.page;
        let keep = self.selected;
        self.activate_page(client, page);
        self.selected = keep;
    }

    fn open_apply_dialog(&mut self) {
        if let Some(id) = self.selected_job_id() {
            self.store.select(&id);
            self.dialog = Dialog::ConfirmApply;
        }
    }

    fn open_deny_dialog(&mut self) {
        if let Some(id) = self.selected_job_id() {
            self.store.select(&id);
            self.dialog = Dialog::DenyReason { input: String::new() };
        }
    }

    fn open_tracking_dialog(&mut self) {
        if self.store.page != Page::Applied {
            return;
        }
        if let Some(id) = self.selected_job_id() {
            let cursor = self
                .store
                .get(&id)
                .and_then(|j| j.tracking_status)
                .and_then(|t| TrackingStatus::ALL.iter().position(|x| *x == t))
                .unwrap_or(0);
            self.store.select(&id);
            self.dialog = Dialog::TrackingSelect { cursor };
        }
    }

    fn close_dialog(&mut self) {
        self.dialog = Dialog::None;
        self.store.clear_selection();
    }

    /// Shared post-mutation path. Success patches the cache from the
    /// returned record, toasts, closes any dialog, and re-fetches the
    /// page; failure leaves everything as it was and toasts once.
    fn commit(
        &mut self,
        client: &ApiClient,
        outcome: Outcome<Job>,
        kind: NoticeKind,
        title: &'static str,
        ok_message: &str,
        fail_message: &str,
    ) {
        if outcome.success {
            if let Some(job) = outcome.data {
                self.store.patch(job);
            }
            self.notify(kind, title, ok_message);
            self.close_dialog();
            self.refresh(client);
        } else {
            self.notify(NoticeKind::Error, "Error", fail_message);
        }
    }

    fn confirm_apply(&mut self, client: &ApiClient) {
        let Some(id) = self.store.current_job_id.clone() else {
            return;
        };
        let outcome = client.apply(&id);
        self.commit(
            client,
            outcome,
            NoticeKind::Success,
            "Success",
            "Application submitted successfully!",
            "Failed to apply to job",
        );
    }

    fn confirm_deny(&mut self, client: &ApiClient, reason: String) {
        let Some(id) = self.store.current_job_id.clone() else {
            return;
        };
        let outcome = client.deny(&id, &reason);
        self.commit(
            client,
            outcome,
            NoticeKind::Info,
            "Success",
            "Job moved to history",
            "Failed to deny job",
        );
    }

    fn confirm_tracking(&mut self, client: &ApiClient, tracking: TrackingStatus) {
        let Some(id) = self.store.current_job_id.clone() else {
            return;
        };
        let outcome = client.update_tracking(&id, tracking);
        self.commit(
            client,
            outcome,
            NoticeKind::Success,
            "Updated",
            "Tracking status updated",
            "Failed to update status",
        );
    }

    fn save_selected(&mut self, client: &ApiClient) {
        if self.store.page != Page::Dashboard {
            return;
        }
        let Some(id) = self.selected_job_id() else {
            return;
        };
        let outcome = client.save(&id);
        self.commit(
            client,
            outcome,
            NoticeKind::Info,
            "Saved",
            "Job saved to waiting list",
            "Failed to save job",
        );
    }

    fn move_selected_to_waiting(&mut self, client: &ApiClient) {
        if self.store.page != Page::Applied {
            return;
        }
        let Some(id) = self.selected_job_id() else {
            return;
        };
        let outcome = client.move_status(&id, Status::Waiting);
        self.commit(
            client,
            outcome,
            NoticeKind::Info,
            "Moved",
            "Job moved to waiting list",
            "Failed to move job",
        );
    }

    fn restore_selected(&mut self, client: &ApiClient) {
        if self.store.page != Page::History {
            return;
        }
        let Some(id) = self.selected_job_id() else {
            return;
        };
        let outcome = client.move_status(&id, Status::New);
        self.commit(
            client,
            outcome,
            NoticeKind::Success,
            "Restored",
            "Job restored to dashboard",
            "Failed to restore job",
        );
    }

    fn handle_key(&mut self, client: &ApiClient, code: KeyCode) {
        if !matches!(self.dialog, Dialog::None) {
            self.handle_dialog_key(client, code);
            return;
        }

        // Search input mode edits the query live; every keystroke
        // narrows the visible list on the next draw.
        if self.searching {
            match code {
                KeyCode::Esc | KeyCode::Enter => self.searching = false,
                KeyCode::Backspace => {
                    self.store.search_query.pop();
                }
                KeyCode::Char(c) => {
                    self.store.search_query.push(c);
                    self.selected = 0;
                }
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Char('J') | KeyCode::PageDown => self.scroll_down(),
            KeyCode::Char('K') | KeyCode::PageUp => self.scroll_up(),
            KeyCode::Char('1') => self.navigate(client, Page::Dashboard),
            KeyCode::Char('2') => self.navigate(client, Page::Applied),
            KeyCode::Char('3') => self.navigate(client, Page::Waiting),
            KeyCode::Char('4') => self.navigate(client, Page::History),
            KeyCode::Tab => {
                let next = self.store.page.next();
                self.navigate(client, next);
            }
            KeyCode::BackTab => {
                let prev = self.store.page.prev();
                self.navigate(client, prev);
            }
            KeyCode::Char('[') => self.go_back(client),
            KeyCode::Char(']') => self.go_forward(client),
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('s') => {
                self.store.sort_by = self.store.sort_by.cycle();
                self.selected = 0;
            }
            KeyCode::Esc => {
                self.store.search_query.clear();
                self.selected = 0;
            }
            KeyCode::Char('a') => {
                if matches!(self.store.page, Page::Dashboard | Page::Waiting) {
                    self.open_apply_dialog();
                }
            }
            KeyCode::Char('x') => {
                if matches!(self.store.page, Page::Dashboard | Page::Waiting) {
                    self.open_deny_dialog();
                }
            }
            KeyCode::Char('v') => self.save_selected(client),
            KeyCode::Char('t') => self.open_tracking_dialog(),
            KeyCode::Char('w') => self.move_selected_to_waiting(client),
            KeyCode::Char('r') => self.restore_selected(client),
            KeyCode::Delete => self.dismiss_notice(),
            _ => {}
        }
    }

    fn handle_dialog_key(&mut self, client: &ApiClient, code: KeyCode) {
        match &mut self.dialog {
            Dialog::None => {}
            Dialog::ConfirmApply => match code {
                KeyCode::Enter => self.confirm_apply(client),
                KeyCode::Esc => self.close_dialog(),
                _ => {}
            },
            Dialog::DenyReason { input } => match code {
                KeyCode::Enter => {
                    let reason = input.clone();
                    self.confirm_deny(client, reason);
                }
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                KeyCode::Esc => self.close_dialog(),
                _ => {}
            },
            Dialog::TrackingSelect { cursor } => match code {
                KeyCode::Up | KeyCode::Char('k') => {
                    if *cursor > 0 {
                        *cursor -= 1;
                    }
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if *cursor + 1 < TrackingStatus::ALL.len() {
                        *cursor += 1;
                    }
                }
                KeyCode::Enter => {
                    let tracking = TrackingStatus::ALL[*cursor];
                    self.confirm_tracking(client, tracking);
                }
                KeyCode::Esc => self.close_dialog(),
                _ => {}
            },
        }
    }
}

fn draw(frame: &mut Frame, app: &mut App) {
    let visible = app.visible();
    if visible.is_empty() {
        app.selected = 0;
    } else if app.selected >= visible.len() {
        app.selected = visible.len() - 1;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_tabs(frame, rows[0], app);
    draw_filter_bar(frame, rows[1], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[2]);

    draw_list(frame, body[0], app, &visible);
    draw_detail(frame, body[1], app, &visible);
    draw_help(frame, rows[3], app);
    draw_notices(frame, app);
    draw_dialog(frame, app);
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let counts = app.store.counts();
    let mut spans: Vec<Span> = Vec::new();
    for (i, page) in Page::ALL.iter().enumerate() {
        let style = if *page == app.store.page {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!(" {}:{} ({}) ", i + 1, page.title(), counts.get(page.status())),
            style,
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_filter_bar(frame: &mut Frame, area: Rect, app: &App) {
    let search = if app.searching {
        format!(" /{}_", app.store.search_query)
    } else if app.store.search_query.is_empty() {
        " /:search".to_string()
    } else {
        format!(" /{}  (Esc clears)", app.store.search_query)
    };
    let line = Line::from(vec![
        Span::styled(search, Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("   sort: {}", app.store.sort_by.label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_list(frame: &mut Frame, area: Rect, app: &mut App, visible: &[Job]) {
    let items: Vec<ListItem> = visible
        .iter()
        .map(|job| {
            let icon = match job.status {
                Status::New => " ",
                Status::Applied => "+",
                Status::Waiting => "*",
                Status::Denied => "x",
            };
            let title = truncate_chars(&job.job_title, 32);
            ListItem::new(format!("{} {} | {}", icon, title, job.company))
        })
        .collect();

    let title = format!(" {} ({}) ", app.store.page.title(), visible.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    app.list_state.select(if visible.is_empty() {
        None
    } else {
        Some(app.selected)
    });
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_detail(frame: &mut Frame, area: Rect, app: &App, visible: &[Job]) {
    let text = match visible.get(app.selected) {
        Some(job) => {
            let today = chrono::Local::now().date_naive();
            let width = area.width.saturating_sub(4) as usize;
            card::detail_text(job, app.store.page, today, width)
        }
        None => Text::styled("No jobs here.", Style::default().fg(Color::DarkGray)),
    };

    let widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    frame.render_widget(widget, area);
}

fn draw_help(frame: &mut Frame, area: Rect, app: &App) {
    let mut parts: Vec<String> = vec![
        "j/k:navigate".to_string(),
        "J/K:scroll".to_string(),
        "1-4:pages".to_string(),
        "[/]:back/fwd".to_string(),
        "/:search".to_string(),
        "s:sort".to_string(),
    ];
    for (key, label) in card::actions(app.store.page) {
        parts.push(format!("{key}:{label}"));
    }
    if !app.notices.is_empty() {
        parts.push("Del:dismiss".to_string());
    }
    parts.push("q:quit".to_string());

    let help = Paragraph::new(format!(" {}", parts.join("  ")))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

/// Toasts stack down the right edge, newest on top.
fn draw_notices(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if area.width < 30 {
        return;
    }
    for (i, notice) in app.notices.iter().rev().take(MAX_VISIBLE_NOTICES).enumerate() {
        let width = (notice.message.chars().count().max(notice.title.len()) as u16 + 4)
            .clamp(20, 40)
            .min(area.width);
        let y = 1 + (i as u16) * 3;
        if y + 3 > area.height {
            break;
        }
        let rect = Rect {
            x: area.width.saturating_sub(width + 1),
            y,
            width,
            height: 3,
        };
        let color = notice.kind.color();
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", notice.title))
            .border_style(Style::default().fg(color));
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(notice.message.clone()).block(block),
            rect,
        );
    }
}

fn draw_dialog(frame: &mut Frame, app: &App) {
    match &app.dialog {
        Dialog::None => {}
        Dialog::ConfirmApply => {
            let mut lines: Vec<Line> = Vec::new();
            match app.store.selected() {
                Some(job) => {
                    lines.push(Line::from(Span::styled(
                        job.job_title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )));
                    lines.push(Line::from(format!("{} - {}", job.company, job.location)));
                }
                None => lines.push(Line::from("Job no longer available")),
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Enter:apply  Esc:cancel",
                Style::default().fg(Color::DarkGray),
            )));
            render_dialog(frame, " Confirm Application ", lines, 50, 6);
        }
        Dialog::DenyReason { input } => {
            let lines = vec![
                Line::from("Reason (optional):"),
                Line::from(format!("> {}_", input)),
                Line::from(""),
                Line::from(Span::styled(
                    "Enter:submit  Esc:cancel",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            render_dialog(frame, " Not Interested ", lines, 50, 6);
        }
        Dialog::TrackingSelect { cursor } => {
            let mut lines: Vec<Line> = Vec::new();
            for (i, tracking) in TrackingStatus::ALL.iter().enumerate() {
                let marker = if i == *cursor { "> " } else { "  " };
                let style = if i == *cursor {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(
                    format!("{}{}", marker, tracking.badge_label()),
                    style,
                )));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "j/k:move  Enter:select  Esc:cancel",
                Style::default().fg(Color::DarkGray),
            )));
            render_dialog(frame, " Tracking Status ", lines, 40, 9);
        }
    }
}

fn render_dialog(frame: &mut Frame, title: &str, lines: Vec<Line>, width: u16, height: u16) {
    let rect = centered_rect(width, height, frame.area());
    frame.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: false }),
        rect,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
