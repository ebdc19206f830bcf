use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::climate::{Rgb, SequentialScale, Variable};
use crate::data::Domain;

/// Number of ticks requested from the axis
pub const TICK_COUNT: usize = 5;

/// Colour legend for the selected variable: a three-stop gradient bar, an
/// axis and a label. Rebuilt from scratch on every render.
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
    pub label: &'static str,
    pub domain: Domain,
    /// Colours at min, midpoint and max
    pub stops: [Rgb; 3],
    pub ticks: Vec<f64>,
    pub tick_step: f64,
}

impl Legend {
    pub fn build(variable: Variable, domain: Domain, scale: &SequentialScale) -> Self {
        let stops = [
            scale.color(domain.min),
            scale.color(domain.midpoint()),
            scale.color(domain.max),
        ];
        let (ticks, tick_step) = ticks(domain.min, domain.max, TICK_COUNT);
        Self {
            label: variable.label(),
            domain,
            stops,
            ticks,
            tick_step,
        }
    }

    /// Gradient colour at t in [0, 1], linear between the three stops
    pub fn sample(&self, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.5 {
            self.stops[0].lerp(self.stops[1], t * 2.0)
        } else {
            self.stops[1].lerp(self.stops[2], (t - 0.5) * 2.0)
        }
    }

    /// Position of a value along the bar, in [0, 1]
    pub fn position(&self, value: f64) -> f64 {
        let span = self.domain.span();
        if span == 0.0 {
            0.5
        } else {
            ((value - self.domain.min) / span).clamp(0.0, 1.0)
        }
    }
}

/// Nicely rounded tick values covering [start, stop], about `count` of them.
/// Returns the ticks and the step between them.
pub fn ticks(start: f64, stop: f64, count: usize) -> (Vec<f64>, f64) {
    if !(start.is_finite() && stop.is_finite()) || count == 0 {
        return (Vec::new(), 0.0);
    }
    if start == stop {
        return (vec![start], 0.0);
    }
    let (lo, hi) = (start.min(stop), start.max(stop));

    let raw = (hi - lo) / count as f64;
    let power = raw.log10().floor();
    let error = raw / 10f64.powi(power as i32);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };

    // Work in integer multiples so decimal steps don't accumulate error
    let (values, step): (Vec<f64>, f64) = if power < 0.0 {
        let inv = 10f64.powi(-power as i32) / factor;
        let mut i1 = (lo * inv).round();
        let mut i2 = (hi * inv).round();
        if i1 / inv < lo {
            i1 += 1.0;
        }
        if i2 / inv > hi {
            i2 -= 1.0;
        }
        let n = (i2 - i1).max(-1.0) as i64;
        ((0..=n).map(|i| (i1 + i as f64) / inv).collect(), 1.0 / inv)
    } else {
        let inc = 10f64.powi(power as i32) * factor;
        let mut i1 = (lo / inc).round();
        let mut i2 = (hi / inc).round();
        if i1 * inc < lo {
            i1 += 1.0;
        }
        if i2 * inc > hi {
            i2 -= 1.0;
        }
        let n = (i2 - i1).max(-1.0) as i64;
        ((0..=n).map(|i| (i1 + i as f64) * inc).collect(), inc)
    };
    (values, step)
}

/// Format a tick with as many decimals as the step needs
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = if step > 0.0 {
        (-step.log10().floor()).max(0.0) as usize
    } else {
        2
    };
    format!("{value:.decimals$}")
}

/// Widget drawing a [`Legend`]: label, gradient bar, tick marks, tick labels
pub struct LegendWidget<'a> {
    pub legend: &'a Legend,
}

impl Widget for LegendWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let legend = self.legend;
        if area.width < 4 || area.height == 0 {
            return;
        }
        let width = area.width as usize;

        buf.set_stringn(
            area.x,
            area.y,
            legend.label,
            width,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        );
        if area.height < 2 {
            return;
        }

        let bar_y = area.y + 1;
        for i in 0..width {
            let t = if width > 1 { i as f64 / (width - 1) as f64 } else { 0.5 };
            buf[(area.x + i as u16, bar_y)]
                .set_char(' ')
                .set_bg(legend.sample(t).into());
        }
        if area.height < 4 {
            return;
        }

        let marks_y = area.y + 2;
        let labels_y = area.y + 3;
        let axis_style = Style::default().fg(Color::Gray);
        let mut next_free = 0usize;

        for &tick in &legend.ticks {
            let col = (legend.position(tick) * (width - 1) as f64).round() as usize;
            buf[(area.x + col as u16, marks_y)].set_char('╵').set_style(axis_style);

            let text = format_tick(tick, legend.tick_step);
            let len = text.chars().count();
            let start = col.saturating_sub(len / 2).min(width.saturating_sub(len));
            if start < next_free {
                continue;
            }
            buf.set_stringn(area.x + start as u16, labels_y, &text, width - start, axis_style);
            next_free = start + len + 1;
        }
    }
}
