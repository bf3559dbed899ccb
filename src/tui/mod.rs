//! Ratatui-based terminal dashboard.
//!
//! The TUI lists the ten configured stocks, re-runs the analysis pipeline
//! whenever the selection changes, and renders the stationarity panels, the
//! history+forecast chart, and the forecast table.
//!
//! The dataset is fetched once before entering the alternate screen (so the
//! per-instrument progress lines stay visible) and then only re-analyzed; a
//! selection whose analysis fails reports in the status line and leaves the
//! previously rendered results on screen.

use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::RunOutput;
use crate::cli::ForecastArgs;
use crate::domain::{AnalysisConfig, CombinedDataset, StationarityResult, DEFAULT_ORDER};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::ForecastChart;

/// Start the TUI.
pub fn run(args: ForecastArgs) -> Result<(), AppError> {
    let dataset = crate::app::download_dataset()?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::data(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(dataset, &args);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::data(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::data(format!("Failed to enter alternate screen: {e}")));
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

struct App {
    dataset: CombinedDataset,
    names: Vec<String>,
    steps: usize,
    selected: usize,
    run: Option<RunOutput>,
    status: String,
}

impl App {
    fn new(dataset: CombinedDataset, args: &ForecastArgs) -> Self {
        let names = dataset.stock_names();
        let selected = args
            .stock
            .as_ref()
            .and_then(|s| names.iter().position(|n| n == s))
            .unwrap_or(0);

        let mut app = Self {
            dataset,
            names,
            steps: args.steps,
            selected,
            run: None,
            status: String::new(),
        };
        app.rerun();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::data(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::data(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::data(format!("Event read error: {e}")))? {
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

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                    self.rerun();
                }
            }
            KeyCode::Down => {
                if self.selected + 1 < self.names.len() {
                    self.selected += 1;
                    self.rerun();
                }
            }
            KeyCode::Enter => self.rerun(),
            _ => {}
        }
        false
    }

    /// Re-run the analysis for the highlighted stock.
    ///
    /// On failure the previous results stay on screen; only the status line
    /// reports what went wrong for this selection.
    fn rerun(&mut self) {
        let Some(stock) = self.names.get(self.selected).cloned() else {
            self.status = "No stocks available.".to_string();
            return;
        };

        let config = AnalysisConfig {
            stock: stock.clone(),
            steps: self.steps,
            order: DEFAULT_ORDER,
        };

        match crate::app::pipeline::run_analysis(&self.dataset, &config) {
            Ok(run) => {
                self.status = format!(
                    "{stock}: ARIMA{} fit on n={} observations.",
                    run.forecast.order,
                    run.series.len()
                );
                self.run = Some(run);
            }
            Err(err) => {
                self.status = format!("{stock}: {err}");
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
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("kabu", Style::default().fg(Color::Cyan)),
            Span::raw(" — Japan stock forecasting (ARIMA model)"),
        ]));

        let selected = self
            .names
            .get(self.selected)
            .map(String::as_str)
            .unwrap_or("-");

        let window = self
            .run
            .as_ref()
            .and_then(|r| {
                let first = r.series.dates.first()?;
                let last = r.series.dates.last()?;
                Some(format!("{first} → {last}"))
            })
            .unwrap_or_else(|| "-".to_string());

        let n = self.run.as_ref().map(|r| r.series.len()).unwrap_or(0);

        lines.push(Line::from(Span::styled(
            format!(
                "stock: {selected} | window: {window} | n={n} | order: {DEFAULT_ORDER} | steps: {}",
                self.steps
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(42), Constraint::Min(0)])
            .split(area);

        self.draw_stock_list(frame, columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7),
                Constraint::Min(0),
                Constraint::Length(14),
            ])
            .split(columns[1]);

        self.draw_stationarity(frame, right[0]);
        self.draw_chart(frame, right[1]);
        self.draw_forecast_table(frame, right[2]);
    }

    fn draw_stock_list(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .names
            .iter()
            .map(|name| ListItem::new(name.as_str()))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Select a Stock").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_stationarity(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let (close_check, diff_check) = match &self.run {
            Some(run) => (Some(&run.close_check), Some(&run.diff_check)),
            None => (None, None),
        };

        self.draw_adf_panel(frame, halves[0], "ADF: Close Price", close_check);
        self.draw_adf_panel(frame, halves[1], "ADF: Differenced Close", diff_check);
    }

    fn draw_adf_panel(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        title: &str,
        result: Option<&StationarityResult>,
    ) {
        let block = Block::default().title(title).borders(Borders::ALL);

        let Some(result) = result else {
            let p = Paragraph::new("Waiting for results...")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(p, area);
            return;
        };

        let verdict = if result.is_stationary() {
            Span::styled(
                "✔ stationary",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                "✖ NOT stationary",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )
        };

        let lines = vec![
            Line::from(format!("statistic: {:>10.4}", result.statistic)),
            Line::from(format!("p-value:   {:>10.4}", result.p_value)),
            Line::from(format!(
                "lag: {} | n={}",
                result.used_lag, result.n_obs
            )),
            Line::from(verdict),
        ];

        let p = Paragraph::new(Text::from(lines)).block(block);
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Forecast").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let (history, forecast, axis_dates, x_bounds, y_bounds) = chart_series(run);

        let (chart_rect, insets) = chart_layout(inner);
        let widget = ForecastChart {
            history: &history,
            forecast: &forecast,
            x_bounds,
            y_bounds,
        };
        frame.render_widget(widget, chart_rect);

        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, &axis_dates, y_bounds);
        }
        draw_legend(frame, chart_rect);
    }

    fn draw_forecast_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Forecasted Values").borders(Borders::ALL);

        let Some(run) = &self.run else {
            let p = Paragraph::new("Waiting for results...")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(p, area);
            return;
        };

        let mut lines = vec![Line::from(Span::styled(
            format!("{:<12} {:>12}", "date", "forecast"),
            Style::default().fg(Color::Gray),
        ))];
        for (date, value) in run.forecast.rows() {
            lines.push(Line::from(format!("{:<12} {:>12.2}", date.to_string(), value)));
        }

        let p = Paragraph::new(Text::from(lines)).block(block);
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select stock  Enter rerun  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Build chart series for Plotters.
///
/// X is the trading-day index across history plus the forecast horizon; the
/// forecast line is anchored at the last historical point so the dashed
/// segment starts at the last observed date.
fn chart_series(
    run: &RunOutput,
) -> (
    Vec<(f64, f64)>,
    Vec<(f64, f64)>,
    Vec<NaiveDate>,
    [f64; 2],
    [f64; 2],
) {
    let n_hist = run.series.len();

    let history: Vec<(f64, f64)> = run
        .series
        .close
        .iter()
        .enumerate()
        .map(|(i, &c)| (i as f64, c))
        .collect();

    let mut forecast = Vec::with_capacity(run.forecast.values.len() + 1);
    if let Some(&last) = run.series.close.last() {
        forecast.push(((n_hist - 1) as f64, last));
    }
    for (i, &v) in run.forecast.values.iter().enumerate() {
        forecast.push(((n_hist + i) as f64, v));
    }

    let mut axis_dates = run.series.dates.clone();
    axis_dates.extend(&run.forecast.dates);

    let x_max = (n_hist + run.forecast.values.len()).saturating_sub(1).max(1);
    let x_bounds = [0.0, x_max as f64];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in history.iter().chain(&forecast) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    (history, forecast, axis_dates, x_bounds, y_bounds)
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 5
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    axis_dates: &[NaiveDate],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let idx = ((axis_dates.len().saturating_sub(1)) as f64 * u).round() as usize;
        let Some(date) = axis_dates.get(idx) else {
            continue;
        };
        let label = date.format("%m-%d").to_string();
        let label_len = label.len() as u16;
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let start = x.saturating_sub((label.len() / 2) as u16);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = format!("{y_val:.0}");
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new("Date")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new("Stock Price")
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1).max(11),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

/// Two-entry legend in the top-right corner of the chart area.
fn draw_legend(frame: &mut ratatui::Frame<'_>, chart: Rect) {
    let entries = [
        ("── Actual Prices", Color::Cyan),
        ("╌╌ Predicted Prices", Color::Yellow),
    ];

    let width = entries
        .iter()
        .map(|(text, _)| text.chars().count() as u16)
        .max()
        .unwrap_or(0);
    if chart.width <= width + 2 || chart.height < entries.len() as u16 + 1 {
        return;
    }

    for (i, (text, color)) in entries.iter().enumerate() {
        let rect = Rect {
            x: chart.x + chart.width - width - 1,
            y: chart.y + i as u16,
            width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(*text).style(Style::default().fg(*color)),
            rect,
        );
    }
}
