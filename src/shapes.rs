//! Filled shape rasterizers
//!
//! Every shape touches each covered pixel exactly once, so drawing through a
//! blend proxy with a stateful pipeline (additive, subtract) never blends a
//! pixel twice. Shapes only use `Canvas` primitives and work the same on a
//! raw surface and on a proxy.
//!
//! Geometry is computed in i64 (i128 for ellipse products) and every run is
//! clipped to the canvas before it is drawn, so any i32 position or radius is
//! valid input.

use std::ops::{Range, RangeInclusive};

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::display::Canvas;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientDirection {
    /// `from` on the left, `to` on the right
    #[default]
    Horizontal,
    /// `from` on top, `to` at the bottom
    Vertical,
}

/// Gradient position of step `i` out of `n`, 0 when there is a single step
#[inline]
fn fraction(i: i64, n: i64) -> f32 {
    if n > 1 {
        (i as f32 / (n - 1) as f32).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// ============================================================================
// Clipping
// ============================================================================

/// Offsets `d` in `0..n` for which `base + d` lies in `0..extent`
#[inline]
fn visible(base: i64, n: i64, extent: u32) -> Range<i64> {
    (-base).max(0)..(extent as i64 - base).min(n)
}

/// Offsets `d` in `-r..=r` for which `center + d` lies in `0..extent`
#[inline]
fn visible_around(center: i64, r: i64, extent: u32) -> RangeInclusive<i64> {
    (-r).max(-center)..=r.min(extent as i64 - 1 - center)
}

/// Pixels `x0..=x1` of row `y`, clipped to the canvas
fn span<C: Canvas + ?Sized>(canvas: &mut C, x0: i64, x1: i64, y: i64, color: Color) {
    let x0 = x0.max(0);
    let x1 = x1.min(canvas.width() as i64 - 1);
    if x0 <= x1 && (0..canvas.height() as i64).contains(&y) {
        canvas.horizontal_line(x0 as i32, y as i32, (x1 - x0 + 1) as i32, color);
    }
}

/// `w` x `h` rectangle at (x, y), clipped to the canvas
fn rect<C: Canvas + ?Sized>(canvas: &mut C, x: i64, y: i64, w: i64, h: i64, color: Color) {
    let cols = visible(x, w, canvas.width());
    let rows = visible(y, h, canvas.height());
    if !cols.is_empty() && !rows.is_empty() {
        canvas.filled_rectangle(
            (x + cols.start) as i32,
            (y + rows.start) as i32,
            (cols.end - cols.start) as i32,
            (rows.end - rows.start) as i32,
            color,
        );
    }
}

/// Largest `n` in `0..=max` for which `fits(n)` holds, given that `fits`
/// holds from 0 up to some point and fails after it
fn last_fitting(max: i64, fits: impl Fn(i64) -> bool) -> Option<i64> {
    if max < 0 || !fits(0) {
        return None;
    }
    let (mut lo, mut hi) = (0, max);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Some(lo)
}

// ============================================================================
// Rounded rectangles
// ============================================================================

/// Corner radius limited to half the shorter side
#[inline]
fn clamp_radius(w: i32, h: i32, r: i32) -> i32 {
    r.min(w.min(h) >> 1)
}

/// First covered column of corner row `row` (0 is the outermost row)
fn corner_inset(r: i64, row: i64) -> i64 {
    let dy = r - row - 1;
    // d counts columns in from the straight edge
    last_fitting(r - 1, |d| d * d + dy * dy <= r * r).map_or(0, |d| r - 1 - d)
}

/// Columns skipped on each side of row `dy` of a w x h rounded rectangle
#[inline]
fn row_inset(h: i64, r: i64, dy: i64) -> i64 {
    if dy < r {
        corner_inset(r, dy)
    } else if dy >= h - r {
        corner_inset(r, h - 1 - dy)
    } else {
        0
    }
}

/// Rounded rectangle: three bands as plain rectangles, corners as scanlines.
/// The bands and corner runs never overlap.
pub fn filled_round_rectangle<C: Canvas + ?Sized>(
    canvas: &mut C,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    r: i32,
    color: Color,
) {
    if w <= 0 || h <= 0 {
        return;
    }
    let r = clamp_radius(w, h, r) as i64;
    let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
    if r <= 0 {
        rect(canvas, x, y, w, h, color);
        return;
    }

    let d = r << 1;
    rect(canvas, x, y + r, w, h - d, color); // body
    rect(canvas, x + r, y, w - d, r, color); // top bar
    rect(canvas, x + r, y + h - r, w - d, r, color); // bottom bar

    // Corner rows that land on the canvas, top then bottom
    let height = canvas.height();
    for dy in visible(y, r, height) {
        let inset = corner_inset(r, dy);
        span(canvas, x + inset, x + r - 1, y + dy, color);
        span(canvas, x + w - r, x + w - 1 - inset, y + dy, color);
    }
    for k in visible(y + h - r, r, height) {
        let inset = corner_inset(r, r - 1 - k);
        let row = y + h - r + k;
        span(canvas, x + inset, x + r - 1, row, color);
        span(canvas, x + w - r, x + w - 1 - inset, row, color);
    }
}

/// Linear gradient rectangle, one line per column (horizontal) or row (vertical)
pub fn filled_rectangle_gradient<C: Canvas + ?Sized>(
    canvas: &mut C,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    from: Color,
    to: Color,
    direction: GradientDirection,
) {
    if w <= 0 || h <= 0 {
        return;
    }
    let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
    let cols = visible(x, w, canvas.width());
    let rows = visible(y, h, canvas.height());
    if cols.is_empty() || rows.is_empty() {
        return;
    }
    match direction {
        GradientDirection::Horizontal => {
            let (top, len) = ((y + rows.start) as i32, (rows.end - rows.start) as i32);
            for dx in cols {
                canvas.vertical_line((x + dx) as i32, top, len, from.lerp(to, fraction(dx, w)));
            }
        },
        GradientDirection::Vertical => {
            let (left, len) = ((x + cols.start) as i32, (cols.end - cols.start) as i32);
            for dy in rows {
                canvas.horizontal_line(left, (y + dy) as i32, len, from.lerp(to, fraction(dy, h)));
            }
        },
    }
}

/// Rounded gradient rectangle, scanned pixel by pixel.
/// Covers exactly the same pixels as [`filled_round_rectangle`].
pub fn filled_round_rectangle_gradient<C: Canvas + ?Sized>(
    canvas: &mut C,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    r: i32,
    from: Color,
    to: Color,
    direction: GradientDirection,
) {
    if w <= 0 || h <= 0 {
        return;
    }
    let r = clamp_radius(w, h, r).max(0) as i64;
    let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
    let width = canvas.width();

    for dy in visible(y, h, canvas.height()) {
        let inset = row_inset(h, r, dy);
        let cols = visible(x, w - inset, width);
        for dx in cols.start.max(inset)..cols.end {
            let t = match direction {
                GradientDirection::Horizontal => fraction(dx, w),
                GradientDirection::Vertical => fraction(dy, h),
            };
            canvas.draw_pixel((x + dx) as i32, (y + dy) as i32, from.lerp(to, t));
        }
    }
}

// ============================================================================
// Ellipses
// ============================================================================

/// Half width of ellipse row `dy`, or None when the row is outside.
/// Integer form of dx²/rx² + dy²/ry² <= 1.
fn ellipse_half_width(dy: i64, rx: i64, ry: i64) -> Option<i64> {
    let (rx2, ry2) = (rx as i128 * rx as i128, ry as i128 * ry as i128);
    let limit = rx2 * ry2;
    let row = dy as i128 * dy as i128 * rx2;
    last_fitting(rx, |dx| dx as i128 * dx as i128 * ry2 + row <= limit)
}

/// Filled axis-aligned ellipse centered on (cx, cy).
/// A zero radius collapses to a line; negative radii draw nothing.
pub fn filled_ellipse<C: Canvas + ?Sized>(
    canvas: &mut C,
    cx: i32,
    cy: i32,
    rx: i32,
    ry: i32,
    color: Color,
) {
    if rx < 0 || ry < 0 {
        return;
    }
    let (cx, cy, rx, ry) = (cx as i64, cy as i64, rx as i64, ry as i64);
    for dy in visible_around(cy, ry, canvas.height()) {
        if let Some(half) = ellipse_half_width(dy, rx, ry) {
            span(canvas, cx - half, cx + half, cy + dy, color);
        }
    }
}

/// Filled ellipse with a gradient across its bounding box
pub fn filled_ellipse_gradient<C: Canvas + ?Sized>(
    canvas: &mut C,
    cx: i32,
    cy: i32,
    rx: i32,
    ry: i32,
    from: Color,
    to: Color,
    direction: GradientDirection,
) {
    if rx < 0 || ry < 0 {
        return;
    }
    let (cx, cy, rx, ry) = (cx as i64, cy as i64, rx as i64, ry as i64);
    let width = canvas.width();
    for dy in visible_around(cy, ry, canvas.height()) {
        let Some(half) = ellipse_half_width(dy, rx, ry) else {
            continue;
        };
        for dx in visible_around(cx, half, width) {
            let t = match direction {
                GradientDirection::Horizontal => fraction(dx + rx, 2 * rx + 1),
                GradientDirection::Vertical => fraction(dy + ry, 2 * ry + 1),
            };
            canvas.draw_pixel((cx + dx) as i32, (cy + dy) as i32, from.lerp(to, t));
        }
    }
}

pub fn filled_circle<C: Canvas + ?Sized>(canvas: &mut C, cx: i32, cy: i32, r: i32, color: Color) {
    filled_ellipse(canvas, cx, cy, r, r, color);
}

pub fn filled_circle_gradient<C: Canvas + ?Sized>(
    canvas: &mut C,
    cx: i32,
    cy: i32,
    r: i32,
    from: Color,
    to: Color,
    direction: GradientDirection,
) {
    filled_ellipse_gradient(canvas, cx, cy, r, r, from, to, direction);
}

/// Annulus between `inner` (exclusive) and `outer` (inclusive) radius
pub fn filled_ring<C: Canvas + ?Sized>(
    canvas: &mut C,
    cx: i32,
    cy: i32,
    inner: i32,
    outer: i32,
    color: Color,
) {
    if outer < 0 {
        return;
    }
    let (cx, cy) = (cx as i64, cy as i64);
    let (inner, outer) = (inner.max(0) as i64, outer as i64);
    for dy in visible_around(cy, outer, canvas.height()) {
        let Some(o) = ellipse_half_width(dy, outer, outer) else {
            continue;
        };
        // largest dx strictly inside the inner circle
        let hole = last_fitting(inner - 1, |dx| dx * dx + dy * dy < inner * inner);
        let y = cy + dy;
        match hole {
            Some(i) if i < o => {
                span(canvas, cx - o, cx - i - 1, y, color);
                span(canvas, cx + i + 1, cx + o, y, color);
            },
            Some(_) => {},
            None => span(canvas, cx - o, cx + o, y, color),
        }
    }
}

// ============================================================================
// Polygons
// ============================================================================

/// Scanline polygon fill (even-odd). A pixel is covered when its center is.
pub fn filled_polygon<C: Canvas + ?Sized>(canvas: &mut C, vertices: &[(f32, f32)], color: Color) {
    if vertices.len() < 3 {
        return;
    }

    // Find bounding box
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;
    for (_, y) in vertices {
        min_y = min_y.min(*y);
        max_y = max_y.max(*y);
    }

    let min_y = (min_y.floor() as i32).max(0);
    let max_y = (max_y.ceil() as i32).min(canvas.height() as i32 - 1);

    // Reused per scanline
    let mut intersections: Vec<f32> = Vec::with_capacity(vertices.len());
    let n = vertices.len();

    for y in min_y..=max_y {
        intersections.clear();
        let yf = y as f32 + 0.5;

        for i in 0..n {
            let (x1, y1) = vertices[i];
            let (x2, y2) = vertices[(i + 1) % n];

            if (y1 <= yf && y2 > yf) || (y2 <= yf && y1 > yf) {
                intersections.push(x1 + (yf - y1) / (y2 - y1) * (x2 - x1));
            }
        }

        intersections.sort_unstable_by(f32::total_cmp);
        for pair in intersections.chunks_exact(2) {
            // half-open [start, end) on pixel centers keeps adjacent spans disjoint
            let start = (pair[0] - 0.5).ceil() as i64;
            let end = (pair[1] - 0.5).ceil() as i64;
            if end > start {
                span(canvas, start, end - 1, y as i64, color);
            }
        }
    }
}

pub fn filled_triangle<C: Canvas + ?Sized>(
    canvas: &mut C,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    color: Color,
) {
    let vertices = [
        (x0 as f32, y0 as f32),
        (x1 as f32, y1 as f32),
        (x2 as f32, y2 as f32),
    ];
    filled_polygon(canvas, &vertices, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{BlendProxy, Framebuffer};
    use crate::effects::Additive;
    use crate::pipeline::Pipeline;

    /// Canvas that counts writes per pixel and keeps the last color
    struct Counting {
        w: i32,
        h: i32,
        hits: Vec<u32>,
        last: Vec<Option<Color>>,
    }

    impl Counting {
        fn new(w: i32, h: i32) -> Self {
            Self {
                w,
                h,
                hits: vec![0; (w * h) as usize],
                last: vec![None; (w * h) as usize],
            }
        }

        fn hits(&self, x: i32, y: i32) -> u32 {
            self.hits[(y * self.w + x) as usize]
        }

        fn color(&self, x: i32, y: i32) -> Option<Color> {
            self.last[(y * self.w + x) as usize]
        }

        fn covered(&self) -> usize {
            self.hits.iter().filter(|&&n| n > 0).count()
        }

        fn max_hits(&self) -> u32 {
            self.hits.iter().copied().max().unwrap_or(0)
        }
    }

    impl Canvas for Counting {
        fn width(&self) -> u32 {
            self.w as u32
        }

        fn height(&self) -> u32 {
            self.h as u32
        }

        fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
            assert!(x >= 0 && y >= 0 && x < self.w && y < self.h, "offscreen ({x}, {y})");
            let i = (y * self.w + x) as usize;
            self.hits[i] += 1;
            self.last[i] = Some(color);
        }

        fn fill(&mut self, _color: Color) {}
    }

    #[test]
    fn test_round_rect_single_visit() {
        for (w, h, r) in [(20, 12, 4), (9, 9, 4), (10, 7, 10), (3, 3, 1), (16, 8, 0), (1, 1, 5)] {
            let mut canvas = Counting::new(24, 16);
            filled_round_rectangle(&mut canvas, 1, 2, w, h, r, Color::WHITE);
            assert!(canvas.max_hits() <= 1, "overdraw for {w}x{h} r={r}");
        }
    }

    #[test]
    fn test_round_rect_rounds_corners() {
        let mut canvas = Counting::new(12, 12);
        filled_round_rectangle(&mut canvas, 0, 0, 12, 12, 4, Color::WHITE);
        assert_eq!(canvas.hits(0, 0), 0);
        assert_eq!(canvas.hits(11, 0), 0);
        assert_eq!(canvas.hits(0, 11), 0);
        assert_eq!(canvas.hits(11, 11), 0);
        assert_eq!(canvas.hits(6, 0), 1);
        assert_eq!(canvas.hits(0, 6), 1);
        assert_eq!(canvas.hits(6, 6), 1);
    }

    #[test]
    fn test_round_rect_zero_radius_is_rect() {
        let mut canvas = Counting::new(8, 8);
        filled_round_rectangle(&mut canvas, 1, 1, 5, 4, 0, Color::WHITE);
        assert_eq!(canvas.covered(), 20);
    }

    #[test]
    fn test_round_rect_gradient_matches_solid_coverage() {
        for (w, h, r) in [(20, 12, 4), (9, 9, 4), (7, 10, 2)] {
            let mut solid = Counting::new(24, 16);
            let mut grad = Counting::new(24, 16);
            filled_round_rectangle(&mut solid, 2, 1, w, h, r, Color::WHITE);
            filled_round_rectangle_gradient(
                &mut grad,
                2,
                1,
                w,
                h,
                r,
                Color::BLACK,
                Color::WHITE,
                GradientDirection::Vertical,
            );
            assert_eq!(solid.hits, grad.hits, "{w}x{h} r={r}");
        }
    }

    #[test]
    fn test_rect_gradient_endpoints() {
        let mut canvas = Counting::new(10, 4);
        filled_rectangle_gradient(
            &mut canvas,
            0,
            0,
            10,
            4,
            Color::RED,
            Color::BLUE,
            GradientDirection::Horizontal,
        );
        assert_eq!(canvas.color(0, 2), Some(Color::RED));
        assert_eq!(canvas.color(9, 2), Some(Color::BLUE));
        assert_eq!(canvas.covered(), 40);
        assert_eq!(canvas.max_hits(), 1);
    }

    #[test]
    fn test_single_column_gradient_uses_start_color() {
        let mut canvas = Counting::new(4, 4);
        filled_rectangle_gradient(
            &mut canvas,
            1,
            0,
            1,
            4,
            Color::RED,
            Color::BLUE,
            GradientDirection::Horizontal,
        );
        assert_eq!(canvas.color(1, 3), Some(Color::RED));
    }

    #[test]
    fn test_vertical_gradient_rows() {
        let mut canvas = Counting::new(3, 5);
        filled_rectangle_gradient(
            &mut canvas,
            0,
            0,
            3,
            5,
            Color::BLACK,
            Color::WHITE,
            GradientDirection::Vertical,
        );
        assert_eq!(canvas.color(2, 0), Some(Color::BLACK));
        assert_eq!(canvas.color(0, 4), Some(Color::WHITE));
        assert_eq!(canvas.color(1, 2), Some(Color::new(127, 127, 127)));
    }

    #[test]
    fn test_ellipse_shape() {
        let mut canvas = Counting::new(21, 11);
        filled_ellipse(&mut canvas, 10, 5, 10, 5, Color::WHITE);
        assert_eq!(canvas.hits(10, 5), 1);
        assert_eq!(canvas.hits(0, 5), 1);
        assert_eq!(canvas.hits(20, 5), 1);
        assert_eq!(canvas.hits(10, 0), 1);
        assert_eq!(canvas.hits(0, 0), 0);
        assert_eq!(canvas.hits(20, 10), 0);
        assert_eq!(canvas.max_hits(), 1);
    }

    #[test]
    fn test_zero_radius_circle_is_point() {
        let mut canvas = Counting::new(3, 3);
        filled_circle(&mut canvas, 1, 1, 0, Color::WHITE);
        assert_eq!(canvas.covered(), 1);
        filled_circle(&mut canvas, 1, 1, -1, Color::WHITE);
        assert_eq!(canvas.covered(), 1);
    }

    #[test]
    fn test_ellipse_gradient_matches_ellipse() {
        let mut solid = Counting::new(15, 9);
        let mut grad = Counting::new(15, 9);
        filled_ellipse(&mut solid, 7, 4, 7, 4, Color::WHITE);
        filled_ellipse_gradient(
            &mut grad,
            7,
            4,
            7,
            4,
            Color::RED,
            Color::GREEN,
            GradientDirection::Horizontal,
        );
        assert_eq!(solid.hits, grad.hits);
        assert_eq!(grad.color(0, 4), Some(Color::RED));
        assert_eq!(grad.color(14, 4), Some(Color::GREEN));
    }

    #[test]
    fn test_ring_has_hole_and_no_overdraw() {
        let mut canvas = Counting::new(21, 21);
        filled_ring(&mut canvas, 10, 10, 5, 10, Color::WHITE);
        assert_eq!(canvas.hits(10, 10), 0);
        assert_eq!(canvas.hits(13, 10), 0);
        assert_eq!(canvas.hits(15, 10), 1);
        assert_eq!(canvas.hits(20, 10), 1);
        assert_eq!(canvas.max_hits(), 1);
    }

    #[test]
    fn test_ring_without_hole_is_disc() {
        let mut ring = Counting::new(11, 11);
        let mut disc = Counting::new(11, 11);
        filled_ring(&mut ring, 5, 5, 0, 5, Color::WHITE);
        filled_circle(&mut disc, 5, 5, 5, Color::WHITE);
        assert_eq!(ring.hits, disc.hits);
    }

    #[test]
    fn test_polygon_square_exact() {
        let mut canvas = Counting::new(8, 8);
        filled_polygon(
            &mut canvas,
            &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)],
            Color::WHITE,
        );
        assert_eq!(canvas.covered(), 16);
        assert_eq!(canvas.hits(3, 3), 1);
        assert_eq!(canvas.hits(4, 0), 0);
    }

    #[test]
    fn test_triangle_single_visit() {
        let mut canvas = Counting::new(16, 16);
        filled_triangle(&mut canvas, 0, 0, 15, 3, 4, 15, Color::WHITE);
        assert!(canvas.covered() > 50);
        assert_eq!(canvas.max_hits(), 1);
    }

    #[test]
    fn test_degenerate_polygon_draws_nothing() {
        let mut canvas = Counting::new(4, 4);
        filled_polygon(&mut canvas, &[(0.0, 0.0), (3.0, 3.0)], Color::WHITE);
        assert_eq!(canvas.covered(), 0);
    }

    #[test]
    fn test_additive_round_rect_blends_once() {
        // one unit per channel: a second write would double it
        let unit = Color::from_rgb565(0x0821);
        let mut fb = Framebuffer::with_size(24, 16);
        let mut pipeline = Pipeline::new();
        pipeline.add_step(Additive);

        let mut proxy = BlendProxy::new(&mut fb, &pipeline);
        filled_round_rectangle(&mut proxy, 2, 2, 19, 11, 5, unit);

        let mut drawn = 0;
        for y in 0..16 {
            for x in 0..24 {
                match fb.get_pixel(x, y) {
                    Some(0) => {},
                    Some(0x0821) => drawn += 1,
                    other => panic!("({x}, {y}) blended more than once: {other:?}"),
                }
            }
        }
        assert!(drawn > 150);
    }

    #[test]
    fn test_huge_round_rect_is_clipped() {
        // corner arcs of a 100k rounded rect stay far from the canvas corner
        let mut fb = Framebuffer::with_size(8, 8);
        filled_round_rectangle(&mut fb, 0, 0, 100_000, 100_000, 50_000, Color::WHITE);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));

        // canvas sits just inside the bottom-right quarter of the same shape
        let mut canvas = Counting::new(8, 8);
        filled_round_rectangle(&mut canvas, -50_000, -50_000, 100_000, 100_000, 50_000, Color::WHITE);
        assert_eq!(canvas.covered(), 64);
        assert_eq!(canvas.max_hits(), 1);

        let mut grad = Counting::new(8, 8);
        filled_round_rectangle_gradient(
            &mut grad,
            -50_000,
            -50_000,
            100_000,
            100_000,
            50_000,
            Color::BLACK,
            Color::WHITE,
            GradientDirection::Horizontal,
        );
        assert_eq!(grad.hits, canvas.hits);
    }

    #[test]
    fn test_huge_ellipse_covers_canvas() {
        let mut fb = Framebuffer::with_size(8, 8);
        filled_ellipse(&mut fb, 4, 4, 50_000, 30_000, Color::WHITE);
        filled_circle(&mut fb, 4, 4, i32::MAX, Color::WHITE);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(fb.get_pixel(x, y), Some(0xFFFF), "({x}, {y})");
            }
        }

        let mut canvas = Counting::new(8, 8);
        filled_ellipse_gradient(
            &mut canvas,
            4,
            4,
            50_000,
            50_000,
            Color::RED,
            Color::BLUE,
            GradientDirection::Vertical,
        );
        assert_eq!(canvas.covered(), 64);
        assert_eq!(canvas.max_hits(), 1);
    }

    #[test]
    fn test_huge_ring() {
        // whole canvas inside the hole
        let mut fb = Framebuffer::with_size(8, 8);
        filled_ring(&mut fb, 4, 4, 50_000, 50_001, Color::WHITE);
        assert!(fb.as_bytes().iter().all(|&b| b == 0));

        let mut canvas = Counting::new(8, 8);
        filled_ring(&mut canvas, 4, 4, 3, 50_000, Color::WHITE);
        assert_eq!(canvas.hits(4, 4), 0);
        assert_eq!(canvas.hits(0, 0), 1);
        assert_eq!(canvas.hits(7, 7), 1);
        assert_eq!(canvas.max_hits(), 1);
    }

    #[test]
    fn test_far_offscreen_shapes_draw_nothing() {
        let mut canvas = Counting::new(8, 8);
        filled_circle(&mut canvas, i32::MIN, i32::MAX, 1_000, Color::WHITE);
        filled_rectangle_gradient(
            &mut canvas,
            i32::MAX - 2,
            0,
            i32::MAX,
            8,
            Color::RED,
            Color::BLUE,
            GradientDirection::Horizontal,
        );
        filled_round_rectangle(&mut canvas, i32::MIN, i32::MIN, i32::MAX, i32::MAX, 40, Color::WHITE);
        assert_eq!(canvas.covered(), 0);
    }
}
