mod legend;
mod map;
mod panel;

pub use legend::{format_tick, ticks, Legend, LegendWidget, TICK_COUNT};
pub use map::MapWidget;
pub use panel::{render_detail, render_tooltip};

use std::time::Instant;

use crate::app::{App, LoadState};
use crate::climate::Variable;
use crate::view::ViewModel;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Width of the legend/detail column
const SIDEBAR_WIDTH: u16 = 38;
/// Rows taken by the legend block (border + label, bar, marks, ticks)
const LEGEND_HEIGHT: u16 = 6;

/// Screen regions, shared by rendering and pointer hit-testing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppLayout {
    /// Bordered map block
    pub map: Rect,
    /// Drawable map area inside the border
    pub map_inner: Rect,
    pub legend: Rect,
    pub detail: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect) -> Self {
        // Split into main area and status bar
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Map + sidebar
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(SIDEBAR_WIDTH)])
            .split(rows[0]);

        let sidebar = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(LEGEND_HEIGHT), Constraint::Min(3)])
            .split(columns[1]);

        Self {
            map: columns[0],
            map_inner: columns[0].inner(Margin::new(1, 1)),
            legend: sidebar[0],
            detail: sidebar[1],
            status: rows[1],
        }
    }
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::compute(frame.area());

    match &app.load {
        LoadState::Loading => render_notice(
            frame,
            layout.map,
            " Loading ",
            "Reading district boundaries, climate records and stories...",
            Color::Cyan,
        ),
        LoadState::Failed(message) => render_notice(
            frame,
            layout.map,
            " Failed to load data ",
            &format!("{message}\n\nPress q to quit."),
            Color::Red,
        ),
        LoadState::Ready(_) => match app.view_model() {
            Some(Ok(view)) => render_ready(frame, app, &view, &layout),
            Some(Err(e)) => render_notice(
                frame,
                layout.map,
                " No data ",
                &format!("{e}\n\nPress t to switch scenario or 1-3 to pick another variable."),
                Color::Yellow,
            ),
            None => {}
        },
    }

    render_status_bar(frame, app, layout.status);
}

fn render_notice(frame: &mut Frame, area: Rect, title: &str, message: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    let paragraph = Paragraph::new(message.to_string())
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_ready(frame: &mut Frame, app: &App, view: &ViewModel, layout: &AppLayout) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" Bangladesh: {} ", view.label()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(layout.map);
    frame.render_widget(block, layout.map);

    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        &app.viewport,
        view,
    );

    let cursor_pos = app.mouse_pos.and_then(|(x, y)| {
        let inside = x >= inner.x && y >= inner.y && x < inner.right() && y < inner.bottom();
        inside.then(|| (x - inner.x, y - inner.y))
    });
    frame.render_widget(MapWidget { layers, cursor_pos }, inner);

    let legend_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Legend ");
    let legend_inner = legend_block.inner(layout.legend);
    frame.render_widget(legend_block, layout.legend);
    let legend = Legend::build(view.selected, view.domain(), &view.scale);
    frame.render_widget(LegendWidget { legend: &legend }, legend_inner);

    render_detail(frame, layout.detail, app.detail_panel_at(Instant::now()).as_ref());

    if let Some(tooltip) = app.tooltip() {
        render_tooltip(frame, layout.map, &tooltip);
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let active = app.queued_selection.unwrap_or(app.selected);
    let mut spans = vec![Span::styled(" ", Style::default())];

    for (i, variable) in Variable::ALL.iter().enumerate() {
        let style = if *variable == active {
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("[{}] {}", i + 1, variable.label()), style));
        spans.push(Span::raw(" "));
    }

    spans.extend([
        Span::styled("| [t] ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.scenario.label(), Style::default().fg(Color::Magenta)),
        Span::styled(" | Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(
            " | hjkl:pan +/-:zoom r:reset Esc:close q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
