//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing the analysis mode, countries,
//! indicator and date, then renders the selected view: a time series chart,
//! a two-country comparison, a country overview, or a global table.

use std::io;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::analysis::fmt_pct;
use crate::app::Dashboard;
use crate::app::views::{ComparisonView, GlobalCell, GlobalView, OverviewView, TimeSeriesView};
use crate::config::Settings;
use crate::domain::CountryInfo;
use crate::error::AppError;
use crate::report::fmt_number;

mod plotters_chart;

use plotters_chart::SeriesChart;

/// Start the TUI.
pub fn run(settings: Settings) -> Result<(), AppError> {
    if let Some(path) = &settings.log_file {
        crate::logging::init_file(path)?;
    }

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(Dashboard::from_settings(&settings));
    app.refresh_catalog();
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    TimeSeries,
    Comparison,
    Overview,
    Global,
}

impl Mode {
    const ALL: [Mode; 4] = [Mode::TimeSeries, Mode::Comparison, Mode::Overview, Mode::Global];

    fn title(self) -> &'static str {
        match self {
            Mode::TimeSeries => "Time Series Analysis",
            Mode::Comparison => "Comparison Analysis",
            Mode::Overview => "Country Overview",
            Mode::Global => "Global Analysis",
        }
    }

    fn shift(self, delta: i32) -> Mode {
        let idx = Mode::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Mode::ALL[wrap_index(idx, Mode::ALL.len(), delta)]
    }

    /// Settings rows shown for this mode, in display order.
    fn fields(self) -> &'static [Field] {
        match self {
            Mode::TimeSeries => &[Field::Mode, Field::CountryA, Field::Item],
            Mode::Comparison => &[Field::Mode, Field::CountryA, Field::CountryB, Field::Item, Field::Date],
            Mode::Overview => &[Field::Mode, Field::CountryA, Field::Date],
            Mode::Global => &[Field::Mode, Field::Item, Field::Date],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Mode,
    CountryA,
    CountryB,
    Item,
    Date,
}

enum ViewData {
    Series(TimeSeriesView),
    Comparison(ComparisonView),
    Overview(OverviewView),
    Global(GlobalView),
}

struct App {
    dashboard: Dashboard,
    mode: Mode,
    selected_field: usize,
    country_a: usize,
    country_b: usize,
    items: Vec<String>,
    dates: Vec<NaiveDate>,
    item_idx: usize,
    date_idx: usize,
    overview_global: bool,
    scroll: u16,
    status: String,
    view: Option<ViewData>,
}

impl App {
    fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            mode: Mode::TimeSeries,
            selected_field: 0,
            country_a: 0,
            country_b: 1,
            items: Vec::new(),
            dates: Vec::new(),
            item_idx: 0,
            date_idx: 0,
            overview_global: false,
            scroll: 0,
            status: "Fetching data...".to_string(),
            view: None,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected_field = self.selected_field.saturating_sub(1),
            KeyCode::Down => {
                let last = self.mode.fields().len() - 1;
                self.selected_field = (self.selected_field + 1).min(last);
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Tab => self.set_mode(self.mode.shift(1)),
            KeyCode::BackTab => self.set_mode(self.mode.shift(-1)),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(5),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(5),
            KeyCode::Char('g') if self.mode == Mode::Overview => {
                self.overview_global = !self.overview_global;
                self.refresh_view();
            }
            _ => {}
        }
        false
    }

    fn adjust_field(&mut self, delta: i32) {
        let n_countries = self.dashboard.countries().len();
        match self.mode.fields().get(self.selected_field) {
            Some(Field::Mode) => self.set_mode(self.mode.shift(delta)),
            Some(Field::CountryA) => {
                self.country_a = wrap_index(self.country_a, n_countries, delta);
                self.refresh_catalog();
            }
            Some(Field::CountryB) => {
                self.country_b = wrap_index(self.country_b, n_countries, delta);
                self.refresh_view();
            }
            Some(Field::Item) => {
                self.item_idx = wrap_index(self.item_idx, self.items.len(), delta);
                self.refresh_view();
            }
            Some(Field::Date) => {
                self.date_idx = wrap_index(self.date_idx, self.dates.len(), delta);
                self.refresh_view();
            }
            None => {}
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        let was_global = self.mode == Mode::Global;
        self.mode = mode;
        self.selected_field = 0;
        if was_global != (mode == Mode::Global) {
            self.refresh_catalog();
        } else {
            self.refresh_view();
        }
    }

    fn country(&self, idx: usize) -> Option<&'static CountryInfo> {
        self.dashboard.countries().get(idx).copied()
    }

    fn selected_item(&self) -> Option<&str> {
        self.items.get(self.item_idx).map(String::as_str)
    }

    fn selected_date(&self) -> Option<NaiveDate> {
        self.dates.get(self.date_idx).copied()
    }

    /// Reload selector contents: one country's catalog, or the union over all
    /// countries in Global mode. Keeps the current item/date when still offered.
    fn refresh_catalog(&mut self) {
        let scope = if self.mode == Mode::Global { None } else { self.country(self.country_a) };
        if self.mode == Mode::Global {
            self.status = "Loading all countries...".to_string();
        }

        match self.dashboard.catalog(scope) {
            Ok(catalog) => {
                let prev_item = self.selected_item().map(str::to_string);
                let prev_date = self.selected_date();

                self.item_idx = prev_item
                    .and_then(|i| catalog.items.iter().position(|c| *c == i))
                    .unwrap_or(0);
                self.date_idx = prev_date
                    .and_then(|d| catalog.dates.iter().position(|c| *c == d))
                    .unwrap_or(catalog.dates.len().saturating_sub(1));
                self.items = catalog.items;
                self.dates = catalog.dates;

                if !catalog.failures.is_empty() {
                    tracing::warn!(skipped = catalog.failures.len(), "catalog built without some countries");
                }
                self.refresh_view();
            }
            Err(e) => {
                self.items.clear();
                self.dates.clear();
                self.view = None;
                self.status = e.to_string();
            }
        }
    }

    fn refresh_view(&mut self) {
        self.scroll = 0;
        match self.compute_view() {
            Ok(view) => {
                self.status = match &view {
                    ViewData::Global(g) => format!("{} of {} countries reporting", g.reporting_countries(), g.rows.len()),
                    _ => "Ready.".to_string(),
                };
                self.view = Some(view);
            }
            Err(msg) => {
                self.view = None;
                self.status = msg;
            }
        }
    }

    fn compute_view(&self) -> Result<ViewData, String> {
        let country_a = self.country(self.country_a).ok_or("No country selected.")?;
        let item = self.selected_item();
        let date = self.selected_date();

        match self.mode {
            Mode::TimeSeries => {
                let item = item.ok_or("No items available for this country.")?;
                self.dashboard
                    .time_series(country_a, item)
                    .map(ViewData::Series)
                    .map_err(|e| e.to_string())
            }
            Mode::Comparison => {
                let country_b = self.country(self.country_b).ok_or("No second country selected.")?;
                let item = item.ok_or("No items available for this country.")?;
                let date = date.ok_or("No dates available within the analysis window.")?;
                self.dashboard
                    .comparison(country_a, country_b, item, date)
                    .map(ViewData::Comparison)
                    .map_err(|e| e.to_string())
            }
            Mode::Overview => {
                let date = date.ok_or("Please select a valid date.")?;
                self.dashboard
                    .overview(country_a, date, self.overview_global)
                    .map(ViewData::Overview)
                    .map_err(|e| e.to_string())
            }
            Mode::Global => {
                let item = item.ok_or("No items available.")?;
                let date = date.ok_or("No dates available within the analysis window.")?;
                Ok(ViewData::Global(self.dashboard.global_view(item, date)))
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let window = self.dashboard.window();
        let scope = match self.dashboard.allow_list() {
            Some(list) => format!("{} indicators", list.len()),
            None => "all indicators".to_string(),
        };
        let lines = vec![
            Line::from(vec![
                Span::styled("Food Security Dashboard", Style::default().fg(Color::Cyan)),
                Span::raw(format!(" | {}", self.mode.title())),
            ]),
            Line::from(Span::styled(
                format!("years {}-{} | {scope} | Tab switches mode", window.first, window.last),
                Style::default().fg(Color::Gray),
            )),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(42), Constraint::Min(0)])
            .split(area);

        self.draw_settings(frame, chunks[0]);
        self.draw_view(frame, chunks[1]);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let label = |idx: usize| self.country(idx).map_or_else(|| "-".to_string(), CountryInfo::label);
        let items: Vec<ListItem> = self
            .mode
            .fields()
            .iter()
            .map(|field| {
                let text = match field {
                    Field::Mode => format!("Mode: {}", self.mode.title()),
                    Field::CountryA => format!("Country: {}", label(self.country_a)),
                    Field::CountryB => format!("Versus: {}", label(self.country_b)),
                    Field::Item => format!("Item: {}", self.selected_item().unwrap_or("-")),
                    Field::Date => format!(
                        "Date: {}",
                        self.selected_date().map_or_else(|| "-".to_string(), |d| d.to_string())
                    ),
                };
                ListItem::new(text)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_view(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title(self.mode.title()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(view) = &self.view else {
            let msg = Paragraph::new("No data to display.")
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true });
            frame.render_widget(msg, inner);
            return;
        };

        match view {
            ViewData::Series(series) => draw_series(frame, inner, series),
            ViewData::Comparison(cmp) => self.draw_lines(frame, inner, comparison_lines(cmp)),
            ViewData::Overview(ov) => self.draw_lines(frame, inner, overview_lines(ov)),
            ViewData::Global(g) => self.draw_lines(frame, inner, global_lines(g)),
        }
    }

    fn draw_lines(&self, frame: &mut ratatui::Frame<'_>, area: Rect, lines: Vec<Line<'static>>) {
        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut help = "↑/↓ select  ←/→ adjust  Tab mode  PgUp/PgDn scroll  q quit".to_string();
        if self.mode == Mode::Overview {
            help.push_str("  g global avg");
        }
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(self.status.as_str(), Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_series(frame: &mut ratatui::Frame<'_>, area: Rect, view: &TimeSeriesView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let missing = view.points.iter().filter(|p| p.value.is_missing()).count();
    let summary = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} | {}", view.country.label(), view.item),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{} points ({missing} non-numeric) | change first→last: {}",
            view.points.len(),
            fmt_pct(view.change_pct)
        )),
    ]);
    frame.render_widget(summary, chunks[0]);

    let line = chart_points(view);
    let Some((x_bounds, y_bounds)) = chart_bounds(&line) else {
        let msg = Paragraph::new("No numeric values to plot.").style(Style::default().fg(Color::Yellow));
        frame.render_widget(msg, chunks[1]);
        return;
    };

    let widget = SeriesChart {
        line: &line,
        x_bounds,
        y_bounds,
        x_label: "year",
        y_label: "value",
        fmt_x: fmt_axis_year,
        fmt_y: fmt_axis_value,
    };
    frame.render_widget(widget, chunks[1]);
}

fn comparison_lines(view: &ComparisonView) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} on {}", view.item, view.date),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    for reading in [&view.left, &view.right] {
        let value_style = if reading.observation.is_some() {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<24}", reading.country.label()), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(reading.display_value(), value_style),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(format!(
        "{} vs {}: {}",
        view.right.country.display_name,
        view.left.country.display_name,
        fmt_pct(view.difference_pct)
    )));
    lines
}

fn overview_lines(view: &OverviewView) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} on {}", view.country.label(), view.date),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    if view.rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "No data available for the selected date.",
            Style::default().fg(Color::Red),
        )));
        return lines;
    }
    for row in &view.rows {
        lines.push(Line::from(Span::styled(
            row.observation.item.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let mut spans = vec![Span::styled(
            format!("  {}", row.observation.display_value()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];
        if let (Some(avg), Some(delta)) = (row.global_average, row.vs_global_pct) {
            spans.push(Span::styled(
                format!("   global avg {} ({})", fmt_number(avg), fmt_pct(delta)),
                Style::default().fg(Color::Gray),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn global_lines(view: &GlobalView) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} on {}", view.item, view.date),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Global average: {}",
            view.average.map_or_else(|| "N/A".to_string(), fmt_number)
        )),
        Line::raw(""),
    ];
    for row in &view.rows {
        let name = Span::styled(format!("{:<26}", row.country.label()), Style::default().add_modifier(Modifier::BOLD));
        let rest = match &row.cell {
            GlobalCell::Reported {
                observation,
                vs_average_pct,
            } => vec![
                Span::styled(format!("{:>16}", observation.display_value()), Style::default().fg(Color::Cyan)),
                Span::styled(format!("  {}", fmt_pct(*vs_average_pct)), Style::default().fg(Color::Gray)),
            ],
            GlobalCell::NoData => vec![Span::styled("No data available", Style::default().fg(Color::Red))],
            GlobalCell::Failed(e) => vec![Span::styled(format!("unavailable: {e}"), Style::default().fg(Color::Red))],
        };
        let mut spans = vec![name];
        spans.extend(rest);
        lines.push(Line::from(spans));
    }
    lines
}

/// `(decimal year, value)` for the present points of a series.
fn chart_points(view: &TimeSeriesView) -> Vec<(f64, f64)> {
    view.numeric_points()
        .into_iter()
        .map(|(date, v)| (decimal_year(date), v))
        .collect()
}

fn decimal_year(date: NaiveDate) -> f64 {
    let days_in_year = if date.leap_year() { 366.0 } else { 365.0 };
    date.year() as f64 + date.ordinal0() as f64 / days_in_year
}

/// Padded bounds for a chart, or `None` when there is nothing to draw.
fn chart_bounds(points: &[(f64, f64)]) -> Option<([f64; 2], [f64; 2])> {
    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !(x_min.is_finite() && x_max.is_finite() && y_min.is_finite() && y_max.is_finite()) {
        return None;
    }

    // A single point (or a flat line) still needs a non-empty range.
    if x_max - x_min < 1e-9 {
        x_min -= 0.5;
        x_max += 0.5;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(y_max.abs() * 0.05).max(1e-6);
    Some(([x_min, x_max], [y_min - pad, y_max + pad]))
}

fn wrap_index(idx: usize, len: usize, delta: i32) -> usize {
    if len == 0 {
        return 0;
    }
    (idx as i64 + delta as i64).rem_euclid(len as i64) as usize
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_value(v: f64) -> String {
    format!("{v:.1}")
}
