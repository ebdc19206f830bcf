use ratatui::style::Color;

use crate::climate::scheme::ColorScheme;
use crate::climate::variable::Variable;
use crate::data::{Domain, DomainTable};
use crate::error::Result;

/// 8-bit sRGB colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear interpolation per channel, t in [0, 1]
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    /// Perceived brightness (Rec. 601 weights), 0-255
    pub fn luma(self) -> f64 {
        0.299 * self.0 as f64 + 0.587 * self.1 as f64 + 0.114 * self.2 as f64
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Black or white, whichever reads better on top of this colour
    pub fn contrasting(self) -> Rgb {
        if self.luma() > 140.0 {
            Rgb(0, 0, 0)
        } else {
            Rgb(255, 255, 255)
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    }
}

/// Continuous scale from a numeric domain onto a colour ramp
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SequentialScale {
    pub domain: Domain,
    pub scheme: ColorScheme,
}

impl SequentialScale {
    pub fn new(domain: Domain, scheme: ColorScheme) -> Self {
        Self { domain, scheme }
    }

    /// Normalised position of a value; a zero-width domain maps to the midpoint
    /// and non-finite values to the low end
    pub fn position(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        let span = self.domain.span();
        if span == 0.0 {
            return 0.5;
        }
        (value - self.domain.min) / span
    }

    /// Colour for a raw value; out-of-domain values take the nearest end
    pub fn color(&self, value: f64) -> Rgb {
        self.scheme.interpolate(self.position(value))
    }
}

/// Builds colour scales from an immutable domain table
#[derive(Clone, Copy)]
pub struct ColorMapper<'a> {
    domains: &'a DomainTable,
}

impl<'a> ColorMapper<'a> {
    pub fn new(domains: &'a DomainTable) -> Self {
        Self { domains }
    }

    /// Scale for a variable: its field's domain and its registered scheme
    pub fn scale_for(&self, variable: Variable) -> Result<SequentialScale> {
        let domain = self.domains.get(variable.field())?;
        Ok(SequentialScale::new(domain, variable.scheme()))
    }

    /// Colour for a raw value of the variable named by `key`
    pub fn color_for(&self, key: &str, value: f64) -> Result<Rgb> {
        let variable = Variable::resolve(key)?;
        Ok(self.scale_for(variable)?.color(value))
    }
}
