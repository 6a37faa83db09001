use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use warehouse_inventory::report::{truncate, Summary};
use warehouse_inventory::Record;

const PAGE_STEP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    InsertionOrder,
    ByExpiration,
    ExpiredOnly,
}

impl ViewMode {
    pub fn next(&self) -> Self {
        match self {
            ViewMode::InsertionOrder => ViewMode::ByExpiration,
            ViewMode::ByExpiration => ViewMode::ExpiredOnly,
            ViewMode::ExpiredOnly => ViewMode::InsertionOrder,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            ViewMode::InsertionOrder => ViewMode::ExpiredOnly,
            ViewMode::ByExpiration => ViewMode::InsertionOrder,
            ViewMode::ExpiredOnly => ViewMode::ByExpiration,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ViewMode::InsertionOrder => "All Items",
            ViewMode::ByExpiration => "By Expiration",
            ViewMode::ExpiredOnly => "Expired",
        }
    }
}

pub struct App {
    pub records: Vec<Record>,
    pub visible: Vec<Record>,
    pub state: TableState,
    pub mode: ViewMode,
    pub today: NaiveDate,
    pub show_detail: bool,
}

impl App {
    pub fn new(records: Vec<Record>, today: NaiveDate) -> Self {
        let mut app = Self {
            visible: records.clone(),
            records,
            state: TableState::default(),
            mode: ViewMode::InsertionOrder,
            today,
            show_detail: false,
        };
        app.set_mode(ViewMode::InsertionOrder);
        app
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;

        self.visible = match mode {
            ViewMode::InsertionOrder => self.records.clone(),
            ViewMode::ByExpiration => {
                let mut sorted = self.records.clone();
                sorted.sort_by_key(|r| r.expiration_date);
                sorted
            }
            ViewMode::ExpiredOnly => {
                let mut expired: Vec<Record> = self
                    .records
                    .iter()
                    .filter(|r| r.is_expired(self.today))
                    .cloned()
                    .collect();
                expired.sort_by_key(|r| r.expiration_date);
                expired
            }
        };

        // Reset selection to first item
        if !self.visible.is_empty() {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }

    pub fn next_mode(&mut self) {
        self.set_mode(self.mode.next());
    }

    pub fn previous_mode(&mut self) {
        self.set_mode(self.mode.previous());
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.state.selected().and_then(|i| self.visible.get(i))
    }

    pub fn summary(&self) -> Summary {
        Summary::of(&self.records, self.today)
    }

    pub fn next(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.visible.len();
        if len == 0 {
            return;
        }
        let i = self
            .state
            .selected()
            .map(|i| (i + PAGE_STEP).min(len - 1))
            .unwrap_or(0);
        self.state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = self
            .state
            .selected()
            .map(|i| i.saturating_sub(PAGE_STEP))
            .unwrap_or(0);
        self.state.select(Some(i));
    }

    pub fn first(&mut self) {
        if !self.visible.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        if !self.visible.is_empty() {
            self.state.select(Some(self.visible.len() - 1));
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_mode();
                    } else {
                        app.next_mode();
                    }
                }
                KeyCode::BackTab => app.previous_mode(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.first(),
                KeyCode::End => app.last(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with view tabs
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let summary = app.summary();
    let modes = [ViewMode::InsertionOrder, ViewMode::ByExpiration, ViewMode::ExpiredOnly];

    let mut tab_spans = vec![];
    for (i, mode) in modes.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *mode == app.mode {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(mode.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Items: {}", summary.items),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("Units: {}", summary.units),
        Style::default().fg(Color::Cyan),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("Value: {:.2}", summary.total_value),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("Expired: {}", summary.expired),
        Style::default().fg(Color::Red),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Item", "Quantity", "Expiration Date", "Price"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let today = app.today;
    let rows = app.visible.iter().map(|r| {
        let date_color = if r.is_expired(today) {
            Color::Red
        } else {
            Color::Green
        };

        let cells = vec![
            Cell::from(truncate(&r.name, 30)),
            Cell::from(r.quantity.to_string()),
            Cell::from(r.date_text()).style(Style::default().fg(date_color)),
            Cell::from(r.price_text()),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(32),
            Constraint::Length(10),
            Constraint::Length(17),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ", app.mode.title())),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.visible.len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    for (key, label) in [
        ("Enter", " Details | "),
        ("Tab", " View | "),
        ("↑/↓", " Nav | "),
        ("PgUp/PgDn", " Fast | "),
    ] {
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(label));
    }
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Item Details ");

    let record = match app.selected_record() {
        Some(r) => r,
        None => {
            f.render_widget(Paragraph::new("No item selected").block(block), area);
            return;
        }
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let status = if record.is_expired(app.today) {
        Span::styled("EXPIRED", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("OK", Style::default().fg(Color::Green))
    };

    let content = vec![
        Line::from(""),
        Line::from(vec![Span::styled("  Item: ", label), Span::raw(record.name.as_str())]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Quantity: ", label),
            Span::raw(record.quantity.to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Expiration: ", label),
            Span::raw(record.date_text()),
            Span::raw("  "),
            status,
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("  Price: ", label), Span::raw(record.price_text())]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Stock value: ", label),
            Span::raw(format!("{:.2}", record.stock_value())),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press Enter to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}
