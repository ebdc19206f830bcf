use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
};

use crate::climate::Rgb;
use crate::map::MapLayers;

/// Outline colour over empty background
const OUTLINE_BARE: Color = Color::DarkGray;

/// Choropleth widget: cell backgrounds carry the district fill, Braille
/// outlines and labels are drawn on top.
pub struct MapWidget {
    pub layers: MapLayers,
    pub cursor_pos: Option<(u16, u16)>,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (area.width as usize).min(self.layers.cells.width);
        let height = (area.height as usize).min(self.layers.cells.height);

        for row in 0..height {
            let y = area.y + row as u16;
            for col in 0..width {
                let x = area.x + col as u16;
                let fill = self.layers.fill_at(col, row);
                let cell = &mut buf[(x, y)];

                if let Some(rgb) = fill {
                    cell.set_bg(rgb.into());
                }
                if let Some(ch) = self.layers.outlines.glyph(col, row) {
                    let fg = fill.map_or(OUTLINE_BARE, outline_on);
                    cell.set_char(ch).set_fg(fg);
                }
            }
        }

        for (lx, ly, text) in &self.layers.labels {
            if *ly as usize >= height || *lx as usize >= width {
                continue;
            }
            let y = area.y + *ly;
            let max_len = width - *lx as usize;
            for (i, ch) in text.chars().take(max_len).enumerate() {
                let col = *lx as usize + i;
                let fg = self
                    .layers
                    .fill_at(col, *ly as usize)
                    .map_or(Color::White, |rgb| rgb.contrasting().into());
                buf[(area.x + col as u16, y)].set_char(ch).set_fg(fg);
            }
        }

        // Render cursor marker
        if let Some((cx, cy)) = self.cursor_pos {
            if (cx as usize) < width && (cy as usize) < height {
                buf[(area.x + cx, area.y + cy)].set_char('╋').set_fg(Color::Red);
            }
        }
    }
}

/// Outline colour that stays visible over a district fill
fn outline_on(fill: Rgb) -> Color {
    if fill.luma() > 96.0 {
        Color::Rgb(40, 40, 40)
    } else {
        Color::Rgb(220, 220, 220)
    }
}
