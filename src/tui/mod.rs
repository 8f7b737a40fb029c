//! Ratatui-based terminal UI.
//!
//! Shows the fitted price curve through its boundary conditions, the solved
//! parameters, and the cost table. The window stays open until dismissed.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::RunOutput;
use crate::domain::CurveConfig;
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::CurveChart;

/// Start the TUI for the given configuration.
pub fn run(config: CurveConfig) -> Result<(), AppError> {
    // Solve before touching the terminal so input errors print normally.
    let mut app = App::new(config)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
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
    config: CurveConfig,
    status: String,
    run: Option<RunOutput>,
}

impl App {
    fn new(config: CurveConfig) -> Result<Self, AppError> {
        let run = crate::app::pipeline::run_pipeline(&config)?;
        Ok(Self {
            status: format!("family: {}", config.family.display_name()),
            config,
            run: Some(run),
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
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

    /// Returns `true` when the window should close.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('f') | KeyCode::Right => {
                self.config.family = self.config.family.next();
                self.refit();
            }
            _ => {}
        }
        false
    }

    /// Re-run the pipeline; failures stay on screen instead of closing the UI.
    fn refit(&mut self) {
        match crate::app::pipeline::run_pipeline(&self.config) {
            Ok(run) => {
                self.run = Some(run);
                self.status = format!("family: {}", self.config.family.display_name());
            }
            Err(err) => {
                self.run = None;
                self.status = format!("{} failed: {err}", self.config.family.display_name());
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("bc", Style::default().fg(Color::Cyan)),
            Span::raw(format!(
                " - {} bonding curve ({})",
                self.config.family.display_name(),
                self.config.family.formula()
            )),
        ]));

        lines.push(Line::from(Span::styled(
            format!(
                "boundaries: ({:.3e}, {:.3e}) -> ({:.3e}, {:.3e})",
                self.config.lower.x, self.config.lower.y, self.config.upper.x, self.config.upper.y,
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(run) = &self.run {
            let params = run
                .fit
                .params
                .named_values()
                .iter()
                .map(|(name, v)| format!("{name}={v:.6e}"))
                .collect::<Vec<_>>()
                .join(" | ");
            lines.push(Line::from(Span::styled(
                format!("{params} | root {}/{}", run.fit.selected, run.fit.candidates.len()),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(30)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_costs(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Price curve").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No curve (press f to try another family).")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let (marks, x_bounds, y_bounds) = chart_series(run, &self.config);

        let (chart_rect, insets) = chart_layout(inner);
        let widget = CurveChart {
            curve: &run.grid,
            marks: &marks,
            x_bounds,
            y_bounds,
            x_label: "supply",
            y_label: "price",
            legend: crate::models::formula(&run.fit.params),
            fmt_x: fmt_axis_sci,
            fmt_y: fmt_axis_sci,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, x_bounds, y_bounds);
        }
    }

    fn draw_costs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items = match &self.run {
            Some(run) => run
                .costs
                .iter()
                .map(|c| {
                    let flag = if c.converged { "" } else { " !" };
                    ListItem::new(format!(
                        "{:>5}  {:.6e}{flag}",
                        crate::pricing::token_label(c.tokens),
                        c.cost
                    ))
                })
                .collect::<Vec<_>>(),
            None => vec![ListItem::new("-")],
        };

        let list = List::new(items).block(Block::default().title("Cost from zero").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "f/→ next family  q/Esc close";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Boundary marks and padded chart bounds for a run.
fn chart_series(run: &RunOutput, config: &CurveConfig) -> (Vec<(f64, f64)>, [f64; 2], [f64; 2]) {
    let marks = [run.fit.lower, run.fit.upper]
        .iter()
        .filter(|b| b.x >= 0.0 && b.x <= config.domain_max)
        .map(|b| (b.x, b.y))
        .collect::<Vec<_>>();

    let x_bounds = [0.0, config.domain_max];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in run.grid.iter().chain(marks.iter()) {
        if y.is_finite() {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }

    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    (marks, x_bounds, [y_min - pad, y_max + pad])
}

fn fmt_axis_sci(v: f64) -> String {
    format!("{v:.1e}")
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

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
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
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = fmt_axis_sci(x_val);
        let label_len = label.len() as u16;
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
        let label = fmt_axis_sci(y_val);
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

    let x_label = Paragraph::new("supply (base units)")
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

    let y_label = Paragraph::new("price").style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: insets.left.saturating_sub(1),
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CurveFamily;

    #[test]
    fn chart_bounds_cover_boundary_prices() {
        let config = CurveConfig::default();
        let run = crate::app::pipeline::run_pipeline(&config).unwrap();
        let (marks, x_bounds, y_bounds) = chart_series(&run, &config);

        assert_eq!(marks.len(), 2);
        assert_eq!(x_bounds, [0.0, config.domain_max]);
        assert!(y_bounds[0] < config.lower.y);
        assert!(y_bounds[1] > config.upper.y);
    }

    #[test]
    fn family_key_cycles_and_quit_keys_close() {
        let mut app = App::new(CurveConfig::default()).unwrap();
        assert!(!app.handle_key(KeyCode::Char('f')));
        assert_eq!(app.config.family, CurveFamily::Exponential);
        assert!(app.run.is_some());
        assert!(app.handle_key(KeyCode::Esc));
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn tiny_area_skips_axis_insets() {
        let (rect, insets) = chart_layout(Rect::new(0, 0, 15, 6));
        assert!(insets.is_none());
        assert_eq!(rect, Rect::new(0, 0, 15, 6));
    }
}
