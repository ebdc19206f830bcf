use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::view::{format_value, DetailPanel, Tooltip};

/// Draw the hover box beside the pointer, kept inside `bounds`
pub fn render_tooltip(frame: &mut Frame, bounds: Rect, tooltip: &Tooltip) {
    let body = format!("{}: {}", tooltip.label, format_value(tooltip.value));
    let content_width = tooltip.title.chars().count().max(body.chars().count()) as u16;
    let width = (content_width + 4).min(bounds.width);
    let height = 4.min(bounds.height);
    if width < 3 || height < 3 {
        return;
    }

    // Prefer below-right of the pointer, flip when it would overflow
    let mut x = tooltip.col.saturating_add(2);
    if x + width > bounds.right() {
        x = tooltip.col.saturating_sub(width + 1).max(bounds.x);
    }
    let mut y = tooltip.row.saturating_add(1);
    if y + height > bounds.bottom() {
        y = tooltip.row.saturating_sub(height).max(bounds.y);
    }
    let area = Rect::new(x, y, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let text = vec![
        Line::from(Span::styled(
            tooltip.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(body, Style::default().fg(Color::Yellow))),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(text).block(block), area);
}

/// Draw the detail panel for the clicked district.
///
/// With no selection a hint is shown. While the reveal delay runs the block
/// is drawn empty, which keeps the sidebar from jumping.
pub fn render_detail(frame: &mut Frame, area: Rect, panel: Option<&DetailPanel>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Details ");

    let Some(panel) = panel else {
        let hint = Paragraph::new(Span::styled(
            "Click a district for details",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(hint, area);
        return;
    };

    if !panel.visible {
        frame.render_widget(block, area);
        return;
    }

    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled(
            panel.title.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(format!("{}: ", panel.label), Style::default().fg(Color::Gray)),
            Span::styled(
                format_value(panel.value),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    if let Some(range) = &panel.time_range {
        lines.push(Line::from(Span::styled(format!("Period: {range}"), dim)));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Climate stories",
        Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED),
    )));
    for story in &panel.stories {
        let headline = if story.headline.is_empty() {
            "(untitled)"
        } else {
            story.headline.as_str()
        };
        lines.push(Line::from(format!("• {headline}")));
        if let Some(url) = &story.url {
            lines.push(Line::from(Span::styled(format!("  {url}"), Style::default().fg(Color::Blue))));
        }
        if let Some(image) = &story.image {
            lines.push(Line::from(Span::styled(format!("  image: {image}"), dim)));
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
