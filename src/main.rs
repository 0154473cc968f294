use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};

use transfer_terminal::export;
use transfer_terminal::filters::{Facet, FilterCriteria, SortField, SortOrder, SortSpec};
use transfer_terminal::model::Transfer;
use transfer_terminal::persist;
use transfer_terminal::session::{TransferSession, ViewPhase};
use transfer_terminal::transfer_fetch::{self, DEFAULT_LEAGUE_ID};

const MAX_LOGS: usize = 200;
const FEE_CEILINGS: [f64; 4] = [10.0, 25.0, 50.0, 100.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Table,
    Charts,
}

struct App {
    session: TransferSession,
    screen: Screen,
    league_id: String,
    season: String,
    selected: usize,
    search_active: bool,
    logs: VecDeque<String>,
    should_quit: bool,
}

impl App {
    fn new() -> Self {
        let league_id = std::env::var("TRANSFER_LEAGUE_ID")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LEAGUE_ID.to_string());
        let season = std::env::var("TRANSFER_SEASON")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| "2025".to_string());
        Self {
            session: TransferSession::new(),
            screen: Screen::Table,
            league_id,
            season,
            selected: 0,
            search_active: false,
            logs: VecDeque::with_capacity(MAX_LOGS),
            should_quit: false,
        }
    }

    fn push_log(&mut self, line: String) {
        if self.logs.len() == MAX_LOGS {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    fn load_window(&mut self) {
        let (transfers, warning) =
            transfer_fetch::load_or_sample(&self.league_id, &self.season);
        let count = transfers.len();
        self.session.load(transfers);
        self.selected = 0;
        match warning {
            Some(line) => self.push_log(line),
            None => self.push_log(format!(
                "[INFO] Loaded {count} transfers for {} {}",
                self.league_id, self.season
            )),
        }
    }

    fn refresh_window(&mut self) {
        transfer_fetch::invalidate_transfers(&self.league_id, &self.season);
        self.push_log("[INFO] Cache invalidated, refetching".to_string());
        self.load_window();
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.search_active {
            self.on_search_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.screen = Screen::Table,
            KeyCode::Char('2') => self.screen = Screen::Charts,
            KeyCode::Tab => {
                self.screen = match self.screen {
                    Screen::Table => Screen::Charts,
                    Screen::Charts => Screen::Table,
                };
            }
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('/') => self.search_active = true,
            KeyCode::Char('l') => self.cycle_facet(Facet::League),
            KeyCode::Char('p') => self.cycle_facet(Facet::Position),
            KeyCode::Char('n') => self.cycle_facet(Facet::Season),
            KeyCode::Char('f') => self.cycle_fee_ceiling(),
            KeyCode::Char('s') => self.cycle_sort_field(),
            KeyCode::Char('o') => self.toggle_sort_order(),
            KeyCode::Char('c') => {
                self.session.clear();
                self.selected = 0;
                self.push_log("[INFO] Filters cleared".to_string());
            }
            KeyCode::Char('e') => self.export_csv(),
            KeyCode::Char('x') => self.export_workbook(),
            KeyCode::Char('w') => self.write_snapshot(),
            KeyCode::Char('r') => self.refresh_window(),
            _ => {}
        }
        self.clamp_selection();
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.search_active = false;
                self.session.set_search("");
            }
            KeyCode::Enter => self.search_active = false,
            KeyCode::Backspace => {
                let mut term = self.session.search_term().to_string();
                term.pop();
                self.session.set_search(&term);
            }
            KeyCode::Char(c) => {
                let mut term = self.session.search_term().to_string();
                term.push(c);
                self.session.set_search(&term);
            }
            _ => {}
        }
        self.clamp_selection();
    }

    fn select_next(&mut self) {
        let total = self.session.view().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    fn select_prev(&mut self) {
        let total = self.session.view().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    fn clamp_selection(&mut self) {
        let total = self.session.view().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    fn cycle_facet(&mut self, facet: Facet) {
        let values = self.session.facet_values(facet);
        if values.is_empty() {
            return;
        }
        let mut criteria = self.session.criteria().clone();
        let slot = match facet {
            Facet::League => &mut criteria.league,
            Facet::Position => &mut criteria.position,
            Facet::Season => &mut criteria.season,
            _ => return,
        };
        *slot = next_choice(slot.as_deref(), &values);
        self.session.set_filter(criteria);
        self.selected = 0;
    }

    fn cycle_fee_ceiling(&mut self) {
        let mut criteria = self.session.criteria().clone();
        criteria.max_fee = match criteria.max_fee {
            None => Some(FEE_CEILINGS[0]),
            Some(current) => FEE_CEILINGS
                .iter()
                .find(|step| **step > current)
                .copied(),
        };
        self.session.set_filter(criteria);
        self.selected = 0;
    }

    fn cycle_sort_field(&mut self) {
        let current = self.session.sort();
        let pos = SortField::ALL
            .iter()
            .position(|f| *f == current.field)
            .unwrap_or(0);
        let field = SortField::ALL[(pos + 1) % SortField::ALL.len()];
        self.session.set_sort(SortSpec { field, ..current });
    }

    fn toggle_sort_order(&mut self) {
        let current = self.session.sort();
        let order = match current.order {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        };
        self.session.set_sort(SortSpec { order, ..current });
    }

    fn export_csv(&mut self) {
        let path = export_path("csv");
        match export::write_csv(&path, self.session.view()) {
            Ok(()) => self.push_log(format!("[INFO] CSV written to {}", path.display())),
            Err(err) => self.push_log(format!("[WARN] CSV export failed: {err}")),
        }
    }

    fn export_workbook(&mut self) {
        let path = export_path("xlsx");
        match export::write_workbook(&path, self.session.view(), self.session.summary()) {
            Ok(()) => self.push_log(format!("[INFO] Workbook written to {}", path.display())),
            Err(err) => self.push_log(format!("[WARN] Workbook export failed: {err}")),
        }
    }

    fn write_snapshot(&mut self) {
        let path = export_path("json");
        match persist::write_snapshot(&path, &self.league_id, &self.season, self.session.view()) {
            Ok(()) => self.push_log(format!("[INFO] Snapshot written to {}", path.display())),
            Err(err) => self.push_log(format!("[WARN] Snapshot failed: {err}")),
        }
    }
}

fn next_choice(current: Option<&str>, values: &[String]) -> Option<String> {
    match current {
        None => values.first().cloned(),
        Some(current) => {
            let pos = values.iter().position(|v| v == current);
            match pos {
                Some(idx) if idx + 1 < values.len() => Some(values[idx + 1].clone()),
                _ => None,
            }
        }
    }
}

fn export_path(ext: &str) -> PathBuf {
    let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("transfers_{stamp}.{ext}"))
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut app = App::new();
    app.load_window();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(app)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.screen {
        Screen::Table => render_table(frame, chunks[1], app),
        Screen::Charts => render_charts(frame, chunks[1], app),
    }

    let footer =
        Paragraph::new(footer_text(app)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);
}

fn header_text(app: &App) -> String {
    let criteria = app.session.criteria();
    let sort = app.session.sort();
    let phase = match app.session.phase() {
        ViewPhase::Empty => "empty",
        ViewPhase::Loaded => "loaded",
        ViewPhase::Filtered => "filtered",
    };
    let search = if app.session.search_term().is_empty() {
        String::new()
    } else {
        format!(" | Search: {}", app.session.search_term())
    };
    let fee = criteria
        .max_fee
        .map(|cap| format!(" | Fee<={cap:.0}m"))
        .unwrap_or_default();
    format!(
        "TRANSFER WINDOW | {} {} | {} of {} shown ({phase}) | League: {} | Pos: {} | Sort: {} {}{fee}{search}",
        app.league_id,
        app.season,
        app.session.view().len(),
        app.session.canonical().len(),
        criteria.league.as_deref().unwrap_or("all"),
        criteria.position.as_deref().unwrap_or("all"),
        sort.field.label(),
        match sort.order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        },
    )
}

fn footer_text(app: &App) -> String {
    let hints = if app.search_active {
        "type to search | Enter keep | Esc clear".to_string()
    } else {
        "1 Table | 2 Charts | / Search | l League | p Pos | n Season | f Fee | s Sort | o Order | c Clear | e CSV | x XLSX | w Snapshot | r Refresh | q Quit"
            .to_string()
    };
    match app.logs.back() {
        Some(line) => format!("{hints}\n{line}"),
        None => hints,
    }
}

fn table_columns() -> [Constraint; 9] {
    [
        Constraint::Min(18),
        Constraint::Length(4),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Min(14),
        Constraint::Min(14),
        Constraint::Length(8),
        Constraint::Length(11),
        Constraint::Length(7),
    ]
}

fn render_table(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = table_columns();
    render_table_header(frame, sections[0], &widths);

    let list_area = sections[1];
    let view = app.session.view();
    if view.is_empty() {
        let message = match app.session.phase() {
            ViewPhase::Empty => "No transfers loaded",
            _ => "No transfers match the current view",
        };
        let empty = Paragraph::new(message).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(app.selected, view.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let selected = idx == app.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let t = &view[idx];
        render_cell_text(frame, cols[0], &t.player_name, row_style);
        render_cell_text(frame, cols[1], &t.player_age.to_string(), row_style);
        render_cell_text(frame, cols[2], &t.player_position, row_style);
        render_cell_text(frame, cols[3], &t.player_nationality, row_style);
        render_cell_text(frame, cols[4], &t.from_club_name, row_style);
        render_cell_text(frame, cols[5], &t.to_club_name, row_style);
        render_cell_text(frame, cols[6], &fee_text(t), row_style);
        render_cell_text(frame, cols[7], &t.transfer_date, row_style);
        render_cell_text(frame, cols[8], &t.season, row_style);
    }
}

fn fee_text(t: &Transfer) -> String {
    if t.transfer_fee == 0.0 {
        if t.transfer_type.eq_ignore_ascii_case("loan") {
            "loan".to_string()
        } else {
            "free".to_string()
        }
    } else {
        format!("{:.1}m", t.transfer_fee)
    }
}

fn render_table_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Player", style);
    render_cell_text(frame, cols[1], "Age", style);
    render_cell_text(frame, cols[2], "Position", style);
    render_cell_text(frame, cols[3], "Nation", style);
    render_cell_text(frame, cols[4], "From", style);
    render_cell_text(frame, cols[5], "To", style);
    render_cell_text(frame, cols[6], "Fee", style);
    render_cell_text(frame, cols[7], "Date", style);
    render_cell_text(frame, cols[8], "Season", style);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn render_charts(frame: &mut Frame, area: Rect, app: &App) {
    let summary = app.session.summary();
    if summary.total_transfers == 0 {
        let empty = Paragraph::new("No transfers match the current view")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(30)])
        .split(area);

    let totals = Paragraph::new(summary_text(app))
        .block(Block::default().title("Summary").borders(Borders::ALL));
    frame.render_widget(totals, columns[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    frame.render_widget(monthly_chart(app), right_chunks[0]);
    frame.render_widget(clubs_chart(app), right_chunks[1]);
}

fn summary_text(app: &App) -> String {
    let summary = app.session.summary();
    let mut lines = vec![
        format!("Transfers: {}", summary.total_transfers),
        format!("Spending: {:.1}m", summary.total_spending),
        format!("Average fee: {:.1}m", summary.average_fee),
        format!("Median fee: {:.1}m", summary.median_fee),
    ];
    if let Some(top) = summary.most_expensive_transfer.as_ref() {
        lines.push(format!(
            "Record: {} {:.1}m",
            top.player, top.fee
        ));
        lines.push(format!("  {} -> {}", top.from_club, top.to_club));
    }
    lines.push(String::new());
    lines.push("By position:".to_string());
    for (position, count) in &summary.transfers_by_position {
        lines.push(format!("  {position}: {count}"));
    }
    lines.join("\n")
}

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn monthly_chart(app: &App) -> BarChart<'static> {
    let summary = app.session.summary();
    let bars: Vec<Bar> = summary
        .transfers_by_month
        .iter()
        .map(|(month, spend)| {
            let label = MONTH_LABELS
                .get((*month as usize).saturating_sub(1))
                .copied()
                .unwrap_or("?");
            Bar::default()
                .label(label.to_string().into())
                .value(spend.round() as u64)
                .style(Style::default().fg(Color::Green))
        })
        .collect();

    BarChart::default()
        .block(
            Block::default()
                .title("Spending by month (m)")
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(5)
        .bar_gap(1)
}

fn clubs_chart(app: &App) -> BarChart<'static> {
    let summary = app.session.summary();
    let bars: Vec<Bar> = summary
        .top_spending_clubs
        .iter()
        .take(6)
        .map(|entry| {
            let label: String = entry.club.chars().take(8).collect();
            Bar::default()
                .label(label.into())
                .value(entry.total.round() as u64)
                .style(Style::default().fg(Color::Yellow))
        })
        .collect();

    BarChart::default()
        .block(
            Block::default()
                .title("Top buying clubs (m)")
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(1)
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}
