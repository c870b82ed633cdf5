use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Paragraph,
        canvas::{Canvas, Circle, Line as CanvasLine},
    },
};
use sitegraph_core::GraphDocument;
use std::io;
use std::time::Duration;

pub mod viewer;

pub use viewer::{GraphView, NodeInfo};

const TICK_SECONDS: f32 = 1.0 / 60.0;

pub fn run(document: &GraphDocument) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create viewer state
    let mut view = GraphView::new(document, 960.0, 600.0)?;

    // Main loop
    let result = run_app(&mut terminal, &mut view);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    view: &mut GraphView,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, view))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process KeyPress events, ignore KeyRelease
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char(' ') => view.toggle_pause(),
                        KeyCode::Char('r') => view.reheat(),
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    let (x, y) = world_coords(mouse.column, mouse.row, size.width, size.height, view);

                    match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => view.pointer_down(x, y),
                        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                            view.pointer_moved(x, y)
                        }
                        MouseEventKind::Up(MouseButton::Left) => view.pointer_up(),
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        view.tick(TICK_SECONDS);
    }

    Ok(())
}

// Terminal cell -> world position inside the graph canvas. The bottom row
// belongs to the status bar.
fn world_coords(column: u16, row: u16, cols: u16, rows: u16, view: &GraphView) -> (f32, f32) {
    let canvas_rows = rows.saturating_sub(1).max(1);
    let cols = cols.max(1);
    let x = (column as f32 + 0.5) / cols as f32 * view.width();
    let y = (row as f32 + 0.5) / canvas_rows as f32 * view.height();
    (x, y)
}

fn ui(f: &mut Frame, view: &GraphView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Graph canvas
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_graph(f, view, chunks[0]);
    draw_status(f, view, chunks[1]);
}

fn draw_graph(f: &mut Frame, view: &GraphView, area: Rect) {
    let width = view.width() as f64;
    let height = view.height() as f64;
    let positions = view.positions();

    // The canvas y axis points up, the document y axis points down
    let canvas = Canvas::default()
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .marker(symbols::Marker::Braille)
        .paint(|ctx| {
            for &(source, target) in view.edges() {
                let (x1, y1) = positions[source];
                let (x2, y2) = positions[target];
                ctx.draw(&CanvasLine {
                    x1: x1 as f64,
                    y1: height - y1 as f64,
                    x2: x2 as f64,
                    y2: height - y2 as f64,
                    color: Color::Gray,
                });
            }

            ctx.layer();

            for (index, &(x, y)) in positions.iter().enumerate() {
                let info = &view.infos()[index];
                ctx.draw(&Circle {
                    x: x as f64,
                    y: height - y as f64,
                    radius: view.display_radius(index) as f64,
                    color: parse_hex_color(&info.color).unwrap_or(Color::Cyan),
                });
            }

            for (index, &(x, y)) in positions.iter().enumerate() {
                let info = &view.infos()[index];
                ctx.print(
                    x as f64 + 8.0,
                    height - y as f64,
                    Line::styled(info.name.clone(), Style::default().fg(Color::Gray)),
                );
            }

            if let Some(index) = view.tooltip() {
                let (x, y) = positions[index];
                let text = view.infos()[index].path.clone();
                ctx.print(
                    (x as f64 - 6.0).max(0.0),
                    (height - y as f64 + view.display_radius(index) as f64 + 6.0).min(height),
                    Line::styled(
                        text,
                        Style::default().fg(Color::White).bg(Color::DarkGray),
                    ),
                );
            }
        });

    f.render_widget(canvas, area);
}

fn draw_status(f: &mut Frame, view: &GraphView, area: Rect) {
    let pause_label = if view.is_paused() { "resume" } else { "pause" };

    let mut spans = vec![
        Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" quit | "),
        Span::styled("space", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {} | ", pause_label)),
        Span::styled("r", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" reheat | "),
        Span::raw(format!(
            "{} nodes, {} links",
            view.node_count(),
            view.edges().len()
        )),
    ];

    if let Some(index) = view.hovered() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            view.infos()[index].name.clone(),
            Style::default().fg(Color::Cyan),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    f.render_widget(status, area);
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}
