use crate::app::App;
use crate::braille;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 26;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),  // Status
            Constraint::Length(11), // Statistics
            Constraint::Min(4),     // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_stats_box(frame, sections[1], app);
    render_controls_box(frame, sections[2]);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" DLA Cluster ");

    let fill_width = (area.width.saturating_sub(4)) as usize;
    let filled = ((app.fill_ratio() * fill_width as f64).ceil() as usize).min(fill_width);
    let empty = fill_width.saturating_sub(filled);

    let content = vec![
        Line::from(Span::styled(app.run_name.clone(), Style::default().fg(TEXT_COLOR))),
        Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(Color::Green)),
            Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled("COMPLETE", Style::default().fg(Color::Green))),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_stats_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Statistics ");
    let summary = &app.summary;

    let make_line = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(DIM_TEXT_COLOR)),
            Span::styled(value, Style::default().fg(TEXT_COLOR)),
        ])
    };

    let content = vec![
        make_line("Length", format!("{}", summary.length)),
        make_line("Size", format!("{}", summary.stats.size)),
        make_line("Radius", format!("{:.2}", summary.stats.max_radius)),
        make_line("Spawn ring", format!("{:.1}", summary.radii.inner)),
        make_line("Kill ring", format!("{:.1}", summary.radii.outer)),
        make_line("Walkers", format!("{}", summary.stats.walkers_spawned)),
        make_line("Steps", format!("{}", summary.stats.total_steps)),
        make_line("Escaped", format!("{:.1}%", app.escape_ratio() * 100.0)),
        make_line("Time", format!("{:.3}s", summary.elapsed.as_secs_f64())),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let control = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:>5} ", key), key_style),
            Span::styled(desc, desc_style),
        ])
    };

    let content = vec![control("v", "Fullscreen"), control("q/Esc", "Quit")];

    let paragraph = Paragraph::new(content).block(styled_block(" Controls "));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cells = braille::render_to_braille(&app.lattice, inner.width, inner.height, &app.color_lut);

    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            let cell_rect = Rect {
                x,
                y,
                width: 1,
                height: 1,
            };
            let span = Span::styled(cell.char.to_string(), Style::default().fg(cell.color));
            let paragraph = Paragraph::new(Line::from(span));
            frame.render_widget(paragraph, cell_rect);
        }
    }
}
