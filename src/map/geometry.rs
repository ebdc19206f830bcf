use glam::DVec2;

use crate::braille::BrailleCanvas;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, (x0, y0): (i32, i32), (x1, y1): (i32, i32)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        canvas.set_pixel_signed(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Draw a projected ring as a closed outline, skipping segments that lie
/// entirely off-canvas
pub fn draw_ring(canvas: &mut BrailleCanvas, ring: &[DVec2]) {
    let (w, h) = ((canvas.width() * 2) as f64, (canvas.height() * 4) as f64);

    for segment in ring.windows(2) {
        let (a, b) = (segment[0], segment[1]);
        let (min, max) = (a.min(b), a.max(b));
        if max.x < 0.0 || max.y < 0.0 || min.x >= w || min.y >= h {
            continue;
        }
        draw_line(canvas, to_pixel(a), to_pixel(b));
    }
}

#[inline(always)]
pub fn to_pixel(p: DVec2) -> (i32, i32) {
    (p.x.floor() as i32, p.y.floor() as i32)
}

/// Crossing-number test: does the ring enclose (x, y)?
pub fn point_in_ring(x: f64, y: f64, ring: impl IntoIterator<Item = (f64, f64)>) -> bool {
    let mut points = ring.into_iter();
    let Some(first) = points.next() else {
        return false;
    };

    let mut inside = false;
    let mut prev = first;
    for point in points.chain(std::iter::once(first)) {
        let ((xi, yi), (xj, yj)) = (point, prev);
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        prev = point;
    }
    inside
}
