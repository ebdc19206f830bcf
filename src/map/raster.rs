use glam::DVec2;
use rayon::prelude::*;

use crate::data::District;
use crate::map::geometry::point_in_ring;
use crate::map::projection::Viewport;

/// A district's rings in pixel space, with their pixel bounding box
pub struct ProjectedDistrict {
    pub rings: Vec<Vec<DVec2>>,
    pub min: DVec2,
    pub max: DVec2,
}

impl ProjectedDistrict {
    /// Even-odd containment over all rings (holes cancel out)
    pub fn contains(&self, p: DVec2) -> bool {
        if p.x < self.min.x || p.x > self.max.x || p.y < self.min.y || p.y > self.max.y {
            return false;
        }
        self.rings
            .iter()
            .filter(|ring| point_in_ring(p.x, p.y, ring.iter().map(|v| (v.x, v.y))))
            .count()
            % 2
            == 1
    }
}

/// Project every district into pixel space
pub fn project_districts(districts: &[District], viewport: &Viewport) -> Vec<ProjectedDistrict> {
    districts
        .par_iter()
        .map(|district| {
            let rings: Vec<Vec<DVec2>> = district
                .rings()
                .map(|ring| ring.iter().map(|&(lon, lat)| viewport.project(lon, lat)).collect())
                .collect();
            let (min, max) = rings.iter().flatten().fold(
                (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
                |(min, max), &p| (min.min(p), max.max(p)),
            );
            ProjectedDistrict { rings, min, max }
        })
        .collect()
}

/// District index per terminal cell, sampled at each cell's centre
pub struct CellGrid {
    pub width: usize,
    pub height: usize,
    cells: Vec<Option<usize>>,
}

impl CellGrid {
    /// Rasterise projected districts into a `width` x `height` cell grid.
    /// Rows are filled in parallel; the first district containing a cell wins.
    pub fn rasterize(projected: &[ProjectedDistrict], width: usize, height: usize) -> Self {
        let mut cells = vec![None; width * height];
        if width > 0 {
            cells.par_chunks_mut(width).enumerate().for_each(|(row, line)| {
                let y = cell_centre_y(row);
                // Only districts whose bbox crosses this row can hit it
                let candidates: Vec<usize> = projected
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| d.min.y <= y && d.max.y >= y)
                    .map(|(i, _)| i)
                    .collect();

                for (col, cell) in line.iter_mut().enumerate() {
                    let p = DVec2::new(cell_centre_x(col), y);
                    *cell = candidates.iter().copied().find(|&i| projected[i].contains(p));
                }
            });
        }
        Self { width, height, cells }
    }

    pub fn get(&self, col: usize, row: usize) -> Option<usize> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells[row * self.width + col]
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.cells.iter().copied()
    }
}

/// Pixel x of a cell centre (cells are 2 Braille pixels wide)
#[inline(always)]
pub fn cell_centre_x(col: usize) -> f64 {
    col as f64 * 2.0 + 1.0
}

/// Pixel y of a cell centre (cells are 4 Braille pixels tall)
#[inline(always)]
pub fn cell_centre_y(row: usize) -> f64 {
    row as f64 * 4.0 + 2.0
}
