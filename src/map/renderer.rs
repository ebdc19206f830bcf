use log::debug;

use crate::braille::BrailleCanvas;
use crate::climate::Rgb;
use crate::map::geometry::{draw_ring, to_pixel};
use crate::map::projection::Viewport;
use crate::map::raster::{project_districts, CellGrid};
use crate::view::ViewModel;

/// District names are shown once the map is zoomed in this far
const LABEL_MIN_ZOOM: f64 = 2.0;

/// Layers produced by one render pass
pub struct MapLayers {
    /// District index per cell
    pub cells: CellGrid,
    /// Fill colour per district index
    pub fills: Vec<Option<Rgb>>,
    /// District outlines
    pub outlines: BrailleCanvas,
    /// (column, row, text) in cell coordinates
    pub labels: Vec<(u16, u16, String)>,
}

impl MapLayers {
    /// Fill colour of a cell, `None` outside every district
    pub fn fill_at(&self, col: usize, row: usize) -> Option<Rgb> {
        self.cells.get(col, row).and_then(|i| self.fills[i])
    }
}

/// Display settings for map layers
#[derive(Clone)]
pub struct DisplaySettings {
    pub show_outlines: bool,
    pub show_labels: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_outlines: true,
            show_labels: true,
        }
    }
}

/// Choropleth renderer: every call redraws all districts from the view model
#[derive(Default)]
pub struct MapRenderer {
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render all districts into a `width` x `height` cell area
    pub fn render(&self, width: usize, height: usize, viewport: &Viewport, view: &ViewModel) -> MapLayers {
        let districts = view.store.districts();
        let projected = project_districts(districts, viewport);

        let cells = CellGrid::rasterize(&projected, width, height);
        let fills: Vec<Option<Rgb>> = districts.iter().map(|d| view.fill_for(&d.name)).collect();

        let mut outlines = BrailleCanvas::new(width, height);
        if self.settings.show_outlines {
            for ring in projected.iter().flat_map(|d| &d.rings) {
                draw_ring(&mut outlines, ring);
            }
        }

        let mut labels = Vec::new();
        if self.settings.show_labels && viewport.zoom() >= LABEL_MIN_ZOOM {
            // Per-row occupancy so labels never overwrite each other
            let mut taken = vec![Vec::<(u16, u16)>::new(); height];
            for district in districts {
                let (lon, lat) = district.label_point();
                let (px, py) = to_pixel(viewport.project(lon, lat));
                if px < 0 || py < 0 {
                    continue;
                }
                let (col, row) = ((px / 2) as usize, (py / 4) as usize);
                if row >= height || col >= width {
                    continue;
                }

                let len = district.name.chars().count() as u16;
                let start = (col as u16).saturating_sub(len / 2);
                let end = start + len;
                if taken[row].iter().any(|&(s, e)| start < e && s < end) {
                    continue;
                }
                taken[row].push((start, end));
                labels.push((start, row as u16, district.name.clone()));
            }
        }

        debug!(
            "rendered {} districts ({}) into {}x{} cells",
            districts.len(),
            view.selected,
            width,
            height
        );

        MapLayers {
            cells,
            fills,
            outlines,
            labels,
        }
    }
}
