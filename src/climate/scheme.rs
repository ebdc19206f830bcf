use crate::climate::color::Rgb;

/// Continuous sequential colour ramps (ColorBrewer, 9 classes)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Yellow -> orange -> red
    YlOrRd,
    /// Light -> dark blue
    Blues,
    /// Orange -> red
    OrRd,
}

const YL_OR_RD: [Rgb; 9] = [
    Rgb(0xff, 0xff, 0xcc),
    Rgb(0xff, 0xed, 0xa0),
    Rgb(0xfe, 0xd9, 0x76),
    Rgb(0xfe, 0xb2, 0x4c),
    Rgb(0xfd, 0x8d, 0x3c),
    Rgb(0xfc, 0x4e, 0x2a),
    Rgb(0xe3, 0x1a, 0x1c),
    Rgb(0xbd, 0x00, 0x26),
    Rgb(0x80, 0x00, 0x26),
];

const BLUES: [Rgb; 9] = [
    Rgb(0xf7, 0xfb, 0xff),
    Rgb(0xde, 0xeb, 0xf7),
    Rgb(0xc6, 0xdb, 0xef),
    Rgb(0x9e, 0xca, 0xe1),
    Rgb(0x6b, 0xae, 0xd6),
    Rgb(0x42, 0x92, 0xc6),
    Rgb(0x21, 0x71, 0xb5),
    Rgb(0x08, 0x51, 0x9c),
    Rgb(0x08, 0x30, 0x6b),
];

const OR_RD: [Rgb; 9] = [
    Rgb(0xff, 0xf7, 0xec),
    Rgb(0xfe, 0xe8, 0xc8),
    Rgb(0xfd, 0xd4, 0x9e),
    Rgb(0xfd, 0xbb, 0x84),
    Rgb(0xfc, 0x8d, 0x59),
    Rgb(0xef, 0x65, 0x48),
    Rgb(0xd7, 0x30, 0x1f),
    Rgb(0xb3, 0x00, 0x00),
    Rgb(0x7f, 0x00, 0x00),
];

impl ColorScheme {
    pub fn stops(self) -> &'static [Rgb] {
        match self {
            ColorScheme::YlOrRd => &YL_OR_RD,
            ColorScheme::Blues => &BLUES,
            ColorScheme::OrRd => &OR_RD,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::YlOrRd => "YlOrRd",
            ColorScheme::Blues => "Blues",
            ColorScheme::OrRd => "OrRd",
        }
    }

    /// Map t in [0, 1] onto the ramp with a uniform cubic B-spline through
    /// the stops, per RGB channel. t is clamped, NaN maps to the low end.
    pub fn interpolate(self, t: f64) -> Rgb {
        let stops = self.stops();
        let n = stops.len() - 1;
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let i = ((t * n as f64).floor() as usize).min(n - 1);
        let local = (t - i as f64 / n as f64) * n as f64;

        let channel = |get: fn(Rgb) -> u8| {
            let v1 = get(stops[i]) as f64;
            let v2 = get(stops[i + 1]) as f64;
            // Phantom knots past either end keep the endpoints exact
            let v0 = if i > 0 { get(stops[i - 1]) as f64 } else { 2.0 * v1 - v2 };
            let v3 = if i < n - 1 { get(stops[i + 2]) as f64 } else { 2.0 * v2 - v1 };
            basis(local, v0, v1, v2, v3).round().clamp(0.0, 255.0) as u8
        };
        Rgb(channel(|c| c.0), channel(|c| c.1), channel(|c| c.2))
    }
}

/// Uniform cubic B-spline segment between v1 and v2
fn basis(t: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    ((1.0 - 3.0 * t + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [ColorScheme; 3] = [ColorScheme::YlOrRd, ColorScheme::Blues, ColorScheme::OrRd];

    #[test]
    fn test_endpoints() {
        for scheme in ALL {
            let stops = scheme.stops();
            assert_eq!(scheme.interpolate(0.0), stops[0], "{}", scheme.name());
            assert_eq!(scheme.interpolate(1.0), stops[8], "{}", scheme.name());
        }
    }

    #[test]
    fn test_interior_follows_basis_spline() {
        // Knot 4 blends its neighbours 1:4:1
        assert_eq!(ColorScheme::YlOrRd.interpolate(0.5), Rgb(253, 137, 60));
        assert_eq!(basis(0.0, 76.0, 60.0, 42.0, 38.0), (76.0 + 240.0 + 42.0) / 6.0);
        assert_ne!(ColorScheme::Blues.interpolate(0.5), ColorScheme::Blues.stops()[4]);
    }

    #[test]
    fn test_out_of_range_clamps() {
        let scheme = ColorScheme::YlOrRd;
        assert_eq!(scheme.interpolate(-3.0), scheme.interpolate(0.0));
        assert_eq!(scheme.interpolate(7.0), scheme.interpolate(1.0));
        assert_eq!(scheme.interpolate(f64::NAN), scheme.interpolate(0.0));
    }

    #[test]
    fn test_ramps_darken_monotonically() {
        for scheme in ALL {
            let mut prev = f64::INFINITY;
            for i in 0..=100 {
                let luma = scheme.interpolate(i as f64 / 100.0).luma();
                assert!(luma <= prev + 1.0, "{} at {}", scheme.name(), i);
                prev = luma;
            }
        }
    }
}
