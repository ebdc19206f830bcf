use glam::DVec2;
use std::f64::consts::PI;

use crate::data::district::Bounds;

/// Zoom factor applied per scroll step or `+`/`-` key press
pub const ZOOM_STEP: f64 = 1.5;

/// Blank border, in pixels, kept around the fitted extent
const FIT_PADDING: f64 = 4.0;

/// Web Mercator in normalised [0, 1] coordinates (y grows southwards)
#[inline(always)]
pub fn mercator(lon: f64, lat: f64) -> DVec2 {
    let lat_rad = lat.to_radians();
    DVec2::new(
        (lon + 180.0) / 360.0,
        (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0,
    )
}

/// Inverse of [`mercator`], returning (lon, lat)
#[inline(always)]
pub fn inverse_mercator(p: DVec2) -> (f64, f64) {
    let lon = p.x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * p.y)).sinh().atan().to_degrees();
    (lon, lat)
}

/// Pan/zoom state: screen = k * p + t
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    pub k: f64,
    pub t: DVec2,
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform { k: 1.0, t: DVec2::ZERO };

    #[inline(always)]
    pub fn apply(&self, p: DVec2) -> DVec2 {
        p * self.k + self.t
    }

    #[inline(always)]
    pub fn invert(&self, p: DVec2) -> DVec2 {
        (p - self.t) / self.k
    }

    /// Scale by `factor`, keeping the screen point `anchor` fixed
    pub fn scale_about(&mut self, anchor: DVec2, factor: f64) {
        self.t = anchor - (anchor - self.t) * factor;
        self.k *= factor;
    }
}

/// Mercator projection fitted to the district extent, plus the user's
/// pan/zoom transform. Sizes are in Braille pixels (2x4 per cell).
#[derive(Clone, Debug)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    pub transform: ZoomTransform,
    bounds: Option<Bounds>,
    fit_scale: f64,
    fit_offset: DVec2,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        let mut viewport = Self {
            width,
            height,
            transform: ZoomTransform::IDENTITY,
            bounds: None,
            fit_scale: width.max(1) as f64,
            fit_offset: DVec2::ZERO,
        };
        viewport.refit();
        viewport
    }

    /// Viewport whose identity transform shows the whole extent
    pub fn fitted(bounds: Bounds, width: usize, height: usize) -> Self {
        let mut viewport = Self::new(width, height);
        viewport.fit(bounds);
        viewport
    }

    pub fn fit(&mut self, bounds: Bounds) {
        self.bounds = Some(bounds);
        self.refit();
    }

    /// Update size after a terminal resize; the user transform is kept
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.refit();
    }

    /// Recompute the base projection so the extent fills the canvas
    fn refit(&mut self) {
        let size = DVec2::new(self.width as f64, self.height as f64);
        let Some((min_lon, min_lat, max_lon, max_lat)) = self.bounds else {
            // Whole world, centred
            self.fit_scale = size.x.max(1.0);
            self.fit_offset = size / 2.0 - DVec2::splat(0.5) * self.fit_scale;
            return;
        };

        let top_left = mercator(min_lon, max_lat);
        let bottom_right = mercator(max_lon, min_lat);
        let extent = bottom_right - top_left;
        let room = (size - DVec2::splat(2.0 * FIT_PADDING)).max(DVec2::ONE);

        let sx = if extent.x > 0.0 { room.x / extent.x } else { f64::INFINITY };
        let sy = if extent.y > 0.0 { room.y / extent.y } else { f64::INFINITY };
        let scale = sx.min(sy);
        self.fit_scale = if scale.is_finite() { scale } else { size.x.max(1.0) };

        let centre = (top_left + bottom_right) / 2.0;
        self.fit_offset = size / 2.0 - centre * self.fit_scale;
    }

    /// Project (lon, lat) to pixel coordinates
    #[inline(always)]
    pub fn project(&self, lon: f64, lat: f64) -> DVec2 {
        self.transform.apply(mercator(lon, lat) * self.fit_scale + self.fit_offset)
    }

    /// Pixel coordinates back to (lon, lat)
    pub fn unproject(&self, px: f64, py: f64) -> (f64, f64) {
        let base = self.transform.invert(DVec2::new(px, py));
        inverse_mercator((base - self.fit_offset) / self.fit_scale)
    }

    /// Move the camera by a pixel delta (the map moves the opposite way)
    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.transform.t -= DVec2::new(dx as f64, dy as f64);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_at(self.centre(), ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_at(self.centre(), 1.0 / ZOOM_STEP);
    }

    /// Zoom in towards a pixel location
    pub fn zoom_in_at(&mut self, px: f64, py: f64) {
        self.zoom_at(DVec2::new(px, py), ZOOM_STEP);
    }

    /// Zoom out from a pixel location
    pub fn zoom_out_at(&mut self, px: f64, py: f64) {
        self.zoom_at(DVec2::new(px, py), 1.0 / ZOOM_STEP);
    }

    fn zoom_at(&mut self, anchor: DVec2, factor: f64) {
        self.transform.scale_about(anchor, factor);
    }

    pub fn reset(&mut self) {
        self.transform = ZoomTransform::IDENTITY;
    }

    pub fn zoom(&self) -> f64 {
        self.transform.k
    }

    fn centre(&self) -> DVec2 {
        DVec2::new(self.width as f64, self.height as f64) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANGLADESH: Bounds = (88.0, 20.6, 92.7, 26.6);

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < 1e-6
    }

    #[test]
    fn test_mercator_round_trip() {
        for (lon, lat) in [(0.0, 0.0), (90.4, 23.8), (-74.0, 40.7)] {
            let (lon2, lat2) = inverse_mercator(mercator(lon, lat));
            assert!((lon - lon2).abs() < 1e-9 && (lat - lat2).abs() < 1e-9);
        }
        assert!(close(mercator(0.0, 0.0), DVec2::new(0.5, 0.5)));
    }

    #[test]
    fn test_fit_centres_extent() {
        let vp = Viewport::fitted(BANGLADESH, 200, 160);
        let top_left = vp.project(BANGLADESH.0, BANGLADESH.3);
        let bottom_right = vp.project(BANGLADESH.2, BANGLADESH.1);

        // Everything lands inside the padded canvas
        for p in [top_left, bottom_right] {
            assert!(p.x >= FIT_PADDING - 1e-6 && p.x <= 200.0 - FIT_PADDING + 1e-6);
            assert!(p.y >= FIT_PADDING - 1e-6 && p.y <= 160.0 - FIT_PADDING + 1e-6);
        }
        let mid = (top_left + bottom_right) / 2.0;
        assert!(close(mid, DVec2::new(100.0, 80.0)));
    }

    #[test]
    fn test_unproject_inverts_project() {
        let mut vp = Viewport::fitted(BANGLADESH, 200, 160);
        vp.zoom_in_at(30.0, 40.0);
        vp.pan(7, -3);
        let p = vp.project(90.4, 23.8);
        let (lon, lat) = vp.unproject(p.x, p.y);
        assert!((lon - 90.4).abs() < 1e-9);
        assert!((lat - 23.8).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut vp = Viewport::fitted(BANGLADESH, 200, 160);
        let before = vp.unproject(50.0, 60.0);
        vp.zoom_in_at(50.0, 60.0);
        vp.zoom_in_at(50.0, 60.0);
        let after = vp.unproject(50.0, 60.0);
        assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
        assert!((vp.zoom() - ZOOM_STEP * ZOOM_STEP).abs() < 1e-12);

        vp.zoom_out_at(50.0, 60.0);
        assert!((vp.zoom() - ZOOM_STEP).abs() < 1e-12);
    }

    #[test]
    fn test_pan_and_reset() {
        let mut vp = Viewport::fitted(BANGLADESH, 200, 160);
        let origin = vp.project(90.0, 23.0);
        vp.pan(10, 0);
        let moved = vp.project(90.0, 23.0);
        assert!(close(moved, origin - DVec2::new(10.0, 0.0)));

        // Unrestricted: far off-screen is allowed
        vp.pan(100_000, 100_000);
        assert!(vp.project(90.0, 23.0).x < -90_000.0);

        vp.reset();
        assert!(close(vp.project(90.0, 23.0), origin));
    }

    #[test]
    fn test_resize_refits() {
        let mut vp = Viewport::fitted(BANGLADESH, 100, 80);
        vp.resize(200, 160);
        let top_left = vp.project(BANGLADESH.0, BANGLADESH.3);
        let bottom_right = vp.project(BANGLADESH.2, BANGLADESH.1);
        assert!(close((top_left + bottom_right) / 2.0, DVec2::new(100.0, 80.0)));
    }
}
