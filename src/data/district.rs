/// A ring of (lon, lat) coordinates; the first ring of a polygon is the
/// exterior, any further rings are holes
pub type Ring = Vec<(f64, f64)>;

/// A polygon as a list of rings
pub type Polygon = Vec<Ring>;

/// Geographic bounding box (min_lon, min_lat, max_lon, max_lat)
pub type Bounds = (f64, f64, f64, f64);

/// An administrative district loaded from the boundary file
#[derive(Clone, Debug)]
pub struct District {
    /// District name (`NAME_3`), the join key into the climate records
    pub name: String,
    /// Parent division (`NAME_1`)
    pub division: String,
    pub polygons: Vec<Polygon>,
    pub bounds: Bounds,
}

impl District {
    pub fn new(name: impl Into<String>, division: impl Into<String>, polygons: Vec<Polygon>) -> Self {
        let bounds = polygon_bounds(&polygons);
        Self {
            name: name.into(),
            division: division.into(),
            polygons,
            bounds,
        }
    }

    /// Iterate over every ring of every polygon
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().flatten()
    }

    /// Centre of the bounding box, used to place labels
    pub fn label_point(&self) -> (f64, f64) {
        let (min_lon, min_lat, max_lon, max_lat) = self.bounds;
        ((min_lon + max_lon) / 2.0, (min_lat + max_lat) / 2.0)
    }

    /// Even-odd containment test in geographic coordinates
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let (min_lon, min_lat, max_lon, max_lat) = self.bounds;
        if lon < min_lon || lon > max_lon || lat < min_lat || lat > max_lat {
            return false;
        }
        let mut inside = false;
        for ring in self.rings() {
            if crate::map::point_in_ring(lon, lat, ring.iter().copied()) {
                inside = !inside;
            }
        }
        inside
    }
}

/// Bounding box of a set of polygons; empty input yields an inverted box
fn polygon_bounds(polygons: &[Polygon]) -> Bounds {
    let mut bounds = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
    for &(lon, lat) in polygons.iter().flatten().flatten() {
        bounds.0 = bounds.0.min(lon);
        bounds.1 = bounds.1.min(lat);
        bounds.2 = bounds.2.max(lon);
        bounds.3 = bounds.3.max(lat);
    }
    bounds
}

/// Union of district bounding boxes, `None` when no district has geometry
pub fn union_bounds<'a>(districts: impl IntoIterator<Item = &'a District>) -> Option<Bounds> {
    districts
        .into_iter()
        .map(|d| d.bounds)
        .filter(|b| b.0 <= b.2 && b.1 <= b.3)
        .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
}
