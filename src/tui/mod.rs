//! Ratatui-based terminal UI.
//!
//! One input line for the CUPS, a details panel for the normalized result,
//! and two charts (per-period breakdown and consumption trend). Lookups run
//! on a worker thread; replies are drained into the coordinator on every tick.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table},
};

use crate::app::coordinator::{Completion, Coordinator, QueryReply, spawn_query};
use crate::cli::TuiArgs;
use crate::config::Config;
use crate::data::{LookupTransport, SipsClient};
use crate::domain::{ContractStatus, DisplayModel};
use crate::error::AppError;
use crate::report::{format_kwh, format_share};

mod plotters_chart;

use plotters_chart::TrendPlottersChart;

const MAX_INPUT: usize = 32;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Start the TUI.
pub fn run(config: &Config, args: TuiArgs) -> Result<(), AppError> {
    let client = SipsClient::new(config)?;
    tracing::info!(url = client.search_url(), "starting TUI");

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(client);
    if let Some(cups) = args.cups {
        app.input = cups;
        app.submit();
    }
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

struct App<T> {
    coordinator: Coordinator,
    transport: T,
    input: String,
    replies_tx: Sender<QueryReply>,
    replies_rx: Receiver<QueryReply>,
    tick: usize,
}

impl<T> App<T>
where
    T: LookupTransport + Clone + Send + 'static,
{
    fn new(transport: T) -> Self {
        let (replies_tx, replies_rx) = mpsc::channel();
        Self {
            coordinator: Coordinator::new(),
            transport,
            input: String::new(),
            replies_tx,
            replies_rx,
            tick: 0,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.drain_replies() {
                needs_redraw = true;
            }
            if self.coordinator.is_loading() {
                self.tick = self.tick.wrapping_add(1);
                needs_redraw = true;
            }

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
                    if self.handle_key(key) {
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
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !c.is_control() && self.input.chars().count() < MAX_INPUT => {
                self.input.push(c);
            }
            _ => {}
        }
        false
    }

    fn submit(&mut self) {
        // Validation failures are already reflected in the coordinator state.
        if let Ok(ticket) = self.coordinator.submit(&self.input) {
            spawn_query(self.transport.clone(), ticket, self.replies_tx.clone());
        }
    }

    /// Apply every reply that has arrived. Returns `true` if anything changed.
    fn drain_replies(&mut self) -> bool {
        let mut changed = false;
        while let Ok(reply) = self.replies_rx.try_recv() {
            if self.coordinator.complete(reply.seq, reply.result) == Completion::Applied {
                changed = true;
            }
        }
        changed
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.draw_input(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_input(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut spans = vec![Span::styled(
            self.input.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if self.coordinator.is_loading() {
            spans.push(Span::styled(
                format!("  {} Consultando...", SPINNER[self.tick % SPINNER.len()]),
                Style::default().fg(Color::Yellow),
            ));
        }

        let p = Paragraph::new(Line::from(spans))
            .block(Block::default().title("CUPS").borders(Borders::ALL));
        frame.render_widget(p, area);

        let cursor_x = area.x + 1 + self.input.chars().count() as u16;
        if cursor_x < area.x + area.width.saturating_sub(1) {
            frame.set_cursor_position((cursor_x, area.y + 1));
        }
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(model) = self.coordinator.model() else {
            let msg = Paragraph::new("Introduce un CUPS y pulsa Enter.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(msg, area);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[0]);

        self.draw_details(frame, top[0], model);
        self.draw_breakdown(frame, top[1]);
        self.draw_trend(frame, rows[1]);
    }

    fn draw_details(&self, frame: &mut ratatui::Frame<'_>, area: Rect, model: &DisplayModel) {
        let block = Block::default()
            .title(format!("Suministro {}", model.cups))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Length(3), Constraint::Min(0)])
            .split(inner);

        let label = Style::default().fg(Color::Gray);
        let field = |name: &'static str, value: &str| {
            Line::from(vec![
                Span::styled(format!("{name:<15}"), label),
                Span::raw(value.to_string()),
            ])
        };
        let mut lines = vec![
            field("Dirección", &model.address),
            field("Municipio", &model.location),
            field("Código postal", &model.postal_code),
            field("Tarifa", &model.tariff),
            field("Distribuidora", &model.distributor),
        ];
        lines.push(Line::from(vec![
            Span::styled(format!("{:<15}", "Estado"), label),
            Span::styled(model.status.display_name(), status_style(model.status)),
        ]));
        frame.render_widget(Paragraph::new(Text::from(lines)), chunks[0]);

        let header = Row::new(model.power_table.iter().map(|c| Cell::from(c.period)))
            .style(label.add_modifier(Modifier::BOLD));
        let cells = Row::new(model.power_table.iter().map(|c| Cell::from(c.display.clone())));
        let widths = [Constraint::Ratio(1, 6); 6];
        let table = Table::new([cells], widths).header(header);
        frame.render_widget(table, chunks[1]);

        let tech: Vec<Line> = if model.technical_attributes.is_empty() {
            vec![Line::from(Span::styled("Sin datos técnicos.", label))]
        } else {
            model
                .technical_attributes
                .iter()
                .map(|a| {
                    Line::from(vec![
                        Span::styled(format!("{:<22}", a.label), label),
                        Span::raw(a.value.clone()),
                    ])
                })
                .collect()
        };
        frame.render_widget(Paragraph::new(Text::from(tech)), chunks[2]);
    }

    fn draw_breakdown(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(charts) = self.coordinator.charts() else {
            return;
        };
        let chart = &charts.breakdown;
        let block = Block::default()
            .title(format!("Consumo anual · {}", format_kwh(chart.total_kwh)))
            .borders(Borders::ALL);

        if chart.is_empty() {
            let msg = Paragraph::new("Sin consumo por periodo.")
                .style(Style::default().fg(Color::Gray))
                .block(block);
            frame.render_widget(msg, area);
            return;
        }

        let bars: Vec<Bar> = chart
            .slices
            .iter()
            .map(|(label, kwh, share)| {
                Bar::default()
                    .value(kwh.max(0.0).round() as u64)
                    .label(Line::from(label.clone()))
                    .text_value(format_share(*share))
            })
            .collect();

        let widget = BarChart::default()
            .block(block)
            .data(BarGroup::default().bars(&bars))
            .bar_width(7)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
        frame.render_widget(widget, area);
    }

    fn draw_trend(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Histórico de consumo").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(charts) = self.coordinator.charts() else {
            return;
        };
        if charts.trend.is_empty() {
            let msg = Paragraph::new("Sin histórico de consumo.")
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(msg, inner);
            return;
        }

        let widget = TrendPlottersChart {
            chart: &charts.trend,
            y_label: "kWh",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Enter buscar  Backspace borrar  Esc salir";
        let mut spans = vec![Span::styled(help, Style::default().fg(Color::Gray))];
        if let Some(message) = self.coordinator.error_message() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(message, Style::default().fg(Color::Red)));
        }
        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn status_style(status: ContractStatus) -> Style {
    match status {
        ContractStatus::Contratable => Style::default().fg(Color::Green),
        ContractStatus::Baja | ContractStatus::NoContratable => Style::default().fg(Color::Red),
        ContractStatus::Unknown => Style::default().fg(Color::Gray),
    }
}
