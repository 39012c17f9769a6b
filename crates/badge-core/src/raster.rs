//! Clipped rasterization for shapes far larger than the panel
//!
//! embedded-graphics walks the whole bounding box of sectors, arcs and thick
//! lines, and squares distances in 32 bits. A circle of radius 200000 would
//! take minutes or overflow. Shapes whose extent passes [`MAX_EXTENT`] are
//! drawn here instead: only visible pixels are visited and the geometry is
//! evaluated in 64-bit integers and `f64`.

use embedded_graphics::{
    geometry::Angle,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{ContainsPoint, Sector},
};

use crate::framebuffer::Framebuffer;
use crate::{PANEL_HEIGHT, PANEL_WIDTH};

/// Largest width or height handed to embedded-graphics primitives.
pub const MAX_EXTENT: i64 = 1024;

/// Half-open box in 64-bit coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    min_x: i64,
    min_y: i64,
    max_x: i64,
    max_y: i64,
}

impl Bounds {
    /// Box of a shape reaching `rx` and `ry` pixels either side of `center`.
    pub fn around(center: Point, rx: i64, ry: i64) -> Self {
        let (x, y) = (i64::from(center.x), i64::from(center.y));
        Self {
            min_x: x - rx,
            min_y: y - ry,
            max_x: x + rx + 1,
            max_y: y + ry + 1,
        }
    }

    pub fn from_corner(origin: Point, width: i64, height: i64) -> Self {
        let (x, y) = (i64::from(origin.x), i64::from(origin.y));
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width.max(0),
            max_y: y + height.max(0),
        }
    }

    /// Box covering every point in `points`, grown by `pad` on each side.
    pub fn spanning(points: &[Point], pad: i64) -> Self {
        let mut bounds = Self {
            min_x: i64::MAX,
            min_y: i64::MAX,
            max_x: i64::MIN,
            max_y: i64::MIN,
        };
        for p in points {
            bounds.min_x = bounds.min_x.min(i64::from(p.x) - pad);
            bounds.min_y = bounds.min_y.min(i64::from(p.y) - pad);
            bounds.max_x = bounds.max_x.max(i64::from(p.x) + pad + 1);
            bounds.max_y = bounds.max_y.max(i64::from(p.y) + pad + 1);
        }
        bounds
    }

    /// Too large, or too far off the surface, to hand to embedded-graphics.
    pub fn oversized(&self) -> bool {
        let (w, h) = (i64::from(PANEL_WIDTH), i64::from(PANEL_HEIGHT));
        self.max_x - self.min_x > MAX_EXTENT
            || self.max_y - self.min_y > MAX_EXTENT
            || self.min_x < -MAX_EXTENT
            || self.min_y < -MAX_EXTENT
            || self.max_x > w + MAX_EXTENT
            || self.max_y > h + MAX_EXTENT
    }
}

/// Paint the visible pixels of `bounds` for which `inside` holds.
fn fill_where<F>(fb: &mut Framebuffer, bounds: Bounds, color: BinaryColor, inside: F)
where
    F: Fn(i64, i64) -> bool,
{
    let (x0, x1) = (bounds.min_x.max(0), bounds.max_x.min(i64::from(PANEL_WIDTH)));
    let (y0, y1) = (bounds.min_y.max(0), bounds.max_y.min(i64::from(PANEL_HEIGHT)));
    for y in y0..y1 {
        for x in x0..x1 {
            if inside(x, y) {
                fb.set_pixel(x as i32, y as i32, color);
            }
        }
    }
}

/// Pixel centre offset `(dx, dy)` lies inside the ellipse with radii `a`, `b`.
fn in_ellipse(dx: i64, dy: i64, a: i64, b: i64) -> bool {
    if a < 0 || b < 0 {
        return false;
    }
    let (ra, rb) = (a as f64 + 0.5, b as f64 + 0.5);
    let (nx, ny) = (dx as f64 / ra, dy as f64 / rb);
    nx * nx + ny * ny < 1.0
}

fn in_band(dx: i64, dy: i64, a: i64, b: i64, fill: bool) -> bool {
    in_ellipse(dx, dy, a, b) && (fill || !in_ellipse(dx, dy, a - 1, b - 1))
}

pub fn ellipse(fb: &mut Framebuffer, center: Point, a: i64, b: i64, color: BinaryColor, fill: bool) {
    let (cx, cy) = (i64::from(center.x), i64::from(center.y));
    fill_where(fb, Bounds::around(center, a, b), color, |x, y| {
        in_band(x - cx, y - cy, a, b, fill)
    });
}

/// Direction filter for sectors, matching embedded-graphics angle conventions.
pub struct Heading(Sector);

impl Heading {
    const SCALE: i64 = 4096;

    pub fn new(start: Angle, sweep: Angle) -> Self {
        let diameter = 4 * Self::SCALE as u32 + 1;
        Self(Sector::with_center(Point::zero(), diameter, start, sweep))
    }

    /// Offset `(dx, dy)` from the centre points into the swept range.
    pub fn contains(&self, dx: i64, dy: i64) -> bool {
        let reach = dx.abs().max(dy.abs());
        if reach == 0 {
            return true;
        }
        let x = dx * Self::SCALE / reach;
        let y = dy * Self::SCALE / reach;
        self.0.contains(Point::new(x as i32, y as i32))
    }
}

/// Filled sector or one pixel wide arc of radius `radius`.
pub fn sector(
    fb: &mut Framebuffer,
    center: Point,
    radius: i64,
    heading: &Heading,
    color: BinaryColor,
    fill: bool,
) {
    let (cx, cy) = (i64::from(center.x), i64::from(center.y));
    fill_where(fb, Bounds::around(center, radius, radius), color, |x, y| {
        let (dx, dy) = (x - cx, y - cy);
        in_band(dx, dy, radius, radius, fill) && heading.contains(dx, dy)
    });
}

fn in_rounded(x: i64, y: i64, left: i64, top: i64, width: i64, height: i64, radius: i64) -> bool {
    if width <= 0 || height <= 0 || x < left || y < top || x >= left + width || y >= top + height {
        return false;
    }
    let r = radius.min((width - 1) / 2).min((height - 1) / 2).max(0);
    let corner = |p: i64, lo: i64, len: i64| {
        if p < lo + r {
            p - (lo + r)
        } else if p > lo + len - 1 - r {
            p - (lo + len - 1 - r)
        } else {
            0
        }
    };
    let (dx, dy) = (corner(x, left, width), corner(y, top, height));
    dx == 0 || dy == 0 || in_ellipse(dx, dy, r, r)
}

/// Rectangle with optional rounded corners; `radius` 0 gives square corners.
pub fn rounded_rect(
    fb: &mut Framebuffer,
    origin: Point,
    width: i64,
    height: i64,
    radius: i64,
    color: BinaryColor,
    fill: bool,
) {
    let (left, top) = (i64::from(origin.x), i64::from(origin.y));
    fill_where(fb, Bounds::from_corner(origin, width, height), color, |x, y| {
        in_rounded(x, y, left, top, width, height, radius)
            && (fill || !in_rounded(x, y, left + 1, top + 1, width - 2, height - 2, radius - 1))
    });
}

/// Segment `from`-`to` drawn `width` pixels wide, with round or square ends.
pub fn segment(fb: &mut Framebuffer, from: Point, to: Point, width: i64, round: bool, color: BinaryColor) {
    let half = width.max(1) as f64 / 2.0;
    let (ax, ay) = (from.x as f64, from.y as f64);
    let (vx, vy) = (to.x as f64 - ax, to.y as f64 - ay);
    let len2 = vx * vx + vy * vy;
    let pad = width.max(1) / 2 + 1;
    fill_where(fb, Bounds::spanning(&[from, to], pad), color, |x, y| {
        let (px, py) = (x as f64 - ax, y as f64 - ay);
        let t = if len2 == 0.0 { 0.0 } else { (px * vx + py * vy) / len2 };
        if !round && !(0.0..=1.0).contains(&t) {
            return false;
        }
        let t = t.clamp(0.0, 1.0);
        let (ex, ey) = (px - t * vx, py - t * vy);
        ex * ex + ey * ey <= half * half
    });
}

/// Filled triangle, edges included.
pub fn triangle(fb: &mut Framebuffer, corners: [Point; 3], color: BinaryColor) {
    let f = |p: Point| (p.x as f64, p.y as f64);
    let [a, b, c] = corners.map(f);
    let cross = |o: (f64, f64), u: (f64, f64), x: f64, y: f64| {
        (u.0 - o.0) * (y - o.1) - (u.1 - o.1) * (x - o.0)
    };
    fill_where(fb, Bounds::spanning(&corners, 0), color, |x, y| {
        let (x, y) = (x as f64, y as f64);
        let d = [cross(a, b, x, y), cross(b, c, x, y), cross(c, a, x, y)];
        d.iter().all(|v| *v >= 0.0) || d.iter().all(|v| *v <= 0.0)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_at(fb: &Framebuffer, x: i32, y: i32) -> bool {
        fb.pixel(x, y) == Some(BinaryColor::On)
    }

    #[test]
    fn bounds_flag_shapes_wider_than_the_limit() {
        assert!(!Bounds::around(Point::new(10, 10), 100, 100).oversized());
        assert!(Bounds::around(Point::new(10, 10), 200_000, 1).oversized());
        assert!(Bounds::spanning(&[Point::new(i32::MIN, 0), Point::new(i32::MAX, 0)], 1).oversized());
        assert!(Bounds::around(Point::new(i32::MAX, 0), 2, 2).oversized());
        assert!(!Bounds::from_corner(Point::new(-20, -20), 40, 40).oversized());
    }

    #[test]
    fn huge_disc_covers_surface() {
        let mut fb = Framebuffer::new();
        ellipse(&mut fb, Point::new(10, 10), 200_000, 200_000, BinaryColor::On, true);
        assert_eq!(fb.black_pixels(), 296 * 128);
    }

    #[test]
    fn huge_ring_misses_the_inside() {
        let mut fb = Framebuffer::new();
        ellipse(&mut fb, Point::new(10, 10), 200_000, 200_000, BinaryColor::On, false);
        assert_eq!(fb.black_pixels(), 0);
    }

    #[test]
    fn ring_is_one_pixel_wide() {
        let mut fb = Framebuffer::new();
        ellipse(&mut fb, Point::new(100, 60), 30, 30, BinaryColor::On, false);
        assert!(black_at(&fb, 130, 60));
        assert!(!black_at(&fb, 129, 60));
        assert!(!black_at(&fb, 131, 60));
        assert!(!black_at(&fb, 100, 60));
    }

    #[test]
    fn heading_selects_upper_right_quadrant() {
        let heading = Heading::new(Angle::from_degrees(-90.0), Angle::from_degrees(90.0));
        assert!(heading.contains(1_000_000, -1_000_000));
        assert!(!heading.contains(-1_000_000, -1_000_000));
        assert!(!heading.contains(1_000_000, 1_000_000));
        assert!(heading.contains(0, 0));
    }

    #[test]
    fn huge_sector_fills_only_its_quadrant() {
        let mut fb = Framebuffer::new();
        let heading = Heading::new(Angle::from_degrees(-90.0), Angle::from_degrees(90.0));
        sector(&mut fb, Point::new(148, 64), 500_000, &heading, BinaryColor::On, true);
        assert!(black_at(&fb, 200, 10));
        assert!(!black_at(&fb, 100, 10));
        assert!(!black_at(&fb, 200, 100));
    }

    #[test]
    fn rounded_corner_is_cut() {
        let mut fb = Framebuffer::new();
        rounded_rect(&mut fb, Point::new(-10, -10), 5000, 5000, 20, BinaryColor::On, true);
        assert_eq!(fb.black_pixels(), 296 * 128);

        let mut fb = Framebuffer::new();
        rounded_rect(&mut fb, Point::new(0, 0), 5000, 5000, 20, BinaryColor::On, true);
        assert!(!black_at(&fb, 0, 0));
        assert!(black_at(&fb, 20, 0));
        assert!(black_at(&fb, 0, 20));
    }

    #[test]
    fn outline_rect_leaves_interior_white() {
        let mut fb = Framebuffer::new();
        rounded_rect(&mut fb, Point::new(5, 5), 4000, 4000, 0, BinaryColor::On, false);
        assert!(black_at(&fb, 5, 5));
        assert!(black_at(&fb, 200, 5));
        assert!(!black_at(&fb, 6, 6));
        assert_eq!(fb.black_pixels(), (296 - 5) + (128 - 5) - 1);
    }

    #[test]
    fn long_segment_is_clipped_and_square_ended() {
        let mut fb = Framebuffer::new();
        segment(&mut fb, Point::new(-1_000_000, 40), Point::new(1_000_000, 40), 5, false, BinaryColor::On);
        assert_eq!(fb.black_pixels(), 296 * 5);
        assert!(black_at(&fb, 0, 38));
        assert!(!black_at(&fb, 0, 37));

        let mut fb = Framebuffer::new();
        segment(&mut fb, Point::new(10, 40), Point::new(100, 40), 5, false, BinaryColor::On);
        assert!(!black_at(&fb, 9, 40));
        segment(&mut fb, Point::new(10, 40), Point::new(100, 40), 5, true, BinaryColor::On);
        assert!(black_at(&fb, 8, 40));
    }

    #[test]
    fn huge_triangle_covers_its_half() {
        let mut fb = Framebuffer::new();
        let corners = [
            Point::new(-1_000_000, -1_000_000),
            Point::new(1_000_000, 1_000_000),
            Point::new(-1_000_000, 1_000_000),
        ];
        triangle(&mut fb, corners, BinaryColor::On);
        assert!(black_at(&fb, 0, 100));
        assert!(black_at(&fb, 50, 50));
        assert!(!black_at(&fb, 100, 0));
    }
}
