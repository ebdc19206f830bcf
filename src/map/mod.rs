mod geometry;
mod projection;
mod raster;
mod renderer;

pub use geometry::point_in_ring;
pub use projection::{Viewport, ZoomTransform, ZOOM_STEP};
pub use raster::{cell_centre_x, cell_centre_y, project_districts, CellGrid, ProjectedDistrict};
pub use renderer::{DisplaySettings, MapLayers, MapRenderer};
