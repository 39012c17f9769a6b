//! uGFX-style drawing surface over the landscape frame buffer
//!
//! Coordinates, angles and colours follow the conventions scripts were written
//! against: colour `0` is black ink, rectangles grow from their top-left
//! corner, circles and ellipses are given by centre, arcs run counter-clockwise
//! from 3 o'clock.

use embedded_graphics::{
    geometry::Angle,
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{
        Arc, Circle, Ellipse, Line, PrimitiveStyle, Rectangle, RoundedRectangle, Sector, Triangle,
    },
    text::{renderer::TextRenderer, Baseline, Text},
};
use embedded_text::{
    alignment::{HorizontalAlignment, VerticalAlignment},
    style::TextBoxStyleBuilder,
    TextBox,
};

use crate::fonts;
use crate::framebuffer::Framebuffer;
use crate::raster::{self, Bounds, Heading};

/// Script colour value for black ink.
pub const BLACK: i64 = 0;
/// Script colour value for white ink.
pub const WHITE: i64 = 1;

/// Map a script colour to a pixel colour.
pub fn ink(color: i64) -> BinaryColor {
    if color == BLACK {
        BinaryColor::On
    } else {
        BinaryColor::Off
    }
}

/// Horizontal text alignment inside a string box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left = 0,
    Center = 1,
    Right = 2,
}

impl Justify {
    pub fn from_value(value: i64) -> Self {
        match value {
            1 => Justify::Center,
            2 => Justify::Right,
            _ => Justify::Left,
        }
    }

    fn alignment(self) -> HorizontalAlignment {
        match self {
            Justify::Left => HorizontalAlignment::Left,
            Justify::Center => HorizontalAlignment::Center,
            Justify::Right => HorizontalAlignment::Right,
        }
    }
}

fn extent(len: i32) -> u32 {
    len.max(0) as u32
}

fn shift(origin: Point, offset: Point) -> Point {
    Point::new(origin.x.saturating_add(offset.x), origin.y.saturating_add(offset.y))
}

pub struct Ugfx {
    framebuffer: Framebuffer,
    initialized: bool,
}

impl Ugfx {
    pub fn new() -> Self {
        Self {
            framebuffer: Framebuffer::new(),
            initialized: false,
        }
    }

    /// Bring up the drawing layer with a white surface.
    pub fn init(&mut self) {
        self.framebuffer.fill(BinaryColor::Off);
        self.initialized = true;
        log::info!("graphics initialized");
    }

    /// Take the surface down; drawing is ignored until the next [`Ugfx::init`].
    pub fn deinit(&mut self) {
        self.initialized = false;
        log::info!("graphics released");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    fn surface(&mut self) -> Option<&mut Framebuffer> {
        self.initialized.then_some(&mut self.framebuffer)
    }

    fn paint<T>(&mut self, item: &T)
    where
        T: Drawable<Color = BinaryColor>,
    {
        if let Some(fb) = self.surface() {
            let _ = item.draw(fb);
        }
    }

    fn rasterize(&mut self, draw: impl FnOnce(&mut Framebuffer)) {
        if let Some(fb) = self.surface() {
            draw(fb);
        }
    }

    pub fn clear(&mut self, color: BinaryColor) {
        self.rasterize(|fb| fb.fill(color));
    }

    pub fn pixel(&mut self, at: Point, color: BinaryColor) {
        self.rasterize(|fb| fb.set_pixel(at.x, at.y, color));
    }

    pub fn line(&mut self, from: Point, to: Point, color: BinaryColor) {
        if Bounds::spanning(&[from, to], 0).oversized() {
            self.rasterize(|fb| raster::segment(fb, from, to, 1, false, color));
            return;
        }
        self.paint(&Line::new(from, to).into_styled(PrimitiveStyle::with_stroke(color, 1)));
    }

    pub fn thickline(&mut self, from: Point, to: Point, color: BinaryColor, width: i32, round: bool) {
        let width = extent(width).max(1);
        if Bounds::spanning(&[from, to], i64::from(width)).oversized() {
            self.rasterize(|fb| raster::segment(fb, from, to, i64::from(width), round, color));
            return;
        }
        self.paint(&Line::new(from, to).into_styled(PrimitiveStyle::with_stroke(color, width)));
        if round && width > 1 {
            let cap = PrimitiveStyle::with_fill(color);
            self.paint(&Circle::with_center(from, width).into_styled(cap));
            self.paint(&Circle::with_center(to, width).into_styled(cap));
        }
    }

    pub fn rect(&mut self, origin: Point, width: i32, height: i32, color: BinaryColor, fill: bool) {
        let (w, h) = (i64::from(width), i64::from(height));
        if Bounds::from_corner(origin, w, h).oversized() {
            self.rasterize(|fb| raster::rounded_rect(fb, origin, w, h, 0, color, fill));
            return;
        }
        let rect = Rectangle::new(origin, Size::new(extent(width), extent(height)));
        self.paint(&rect.into_styled(style(color, fill)));
    }

    pub fn rounded_rect(
        &mut self,
        origin: Point,
        width: i32,
        height: i32,
        radius: i32,
        color: BinaryColor,
        fill: bool,
    ) {
        let (w, h) = (i64::from(width), i64::from(height));
        if Bounds::from_corner(origin, w, h).oversized() {
            let r = i64::from(radius.max(0));
            self.rasterize(|fb| raster::rounded_rect(fb, origin, w, h, r, color, fill));
            return;
        }
        let rect = Rectangle::new(origin, Size::new(extent(width), extent(height)));
        let corner = Size::new(extent(radius), extent(radius));
        self.paint(&RoundedRectangle::with_equal_corners(rect, corner).into_styled(style(color, fill)));
    }

    pub fn circle(&mut self, center: Point, radius: i32, color: BinaryColor, fill: bool) {
        if radius < 0 {
            return;
        }
        let r = i64::from(radius);
        if Bounds::around(center, r, r).oversized() {
            self.rasterize(|fb| raster::ellipse(fb, center, r, r, color, fill));
            return;
        }
        let diameter = 2 * radius as u32 + 1;
        self.paint(&Circle::with_center(center, diameter).into_styled(style(color, fill)));
    }

    pub fn ellipse(&mut self, center: Point, a: i32, b: i32, color: BinaryColor, fill: bool) {
        if a < 0 || b < 0 {
            return;
        }
        let (ra, rb) = (i64::from(a), i64::from(b));
        if Bounds::around(center, ra, rb).oversized() {
            self.rasterize(|fb| raster::ellipse(fb, center, ra, rb, color, fill));
            return;
        }
        let size = Size::new(2 * a as u32 + 1, 2 * b as u32 + 1);
        self.paint(&Ellipse::with_center(center, size).into_styled(style(color, fill)));
    }

    /// Arc from `start` to `end` degrees, counter-clockwise.
    pub fn arc(
        &mut self,
        center: Point,
        radius: i32,
        start: i32,
        end: i32,
        color: BinaryColor,
        fill: bool,
    ) {
        if radius < 0 {
            return;
        }
        let Some((angle_start, angle_sweep)) = sweep(start, end) else {
            return;
        };
        let r = i64::from(radius);
        if Bounds::around(center, r, r).oversized() {
            let heading = Heading::new(angle_start, angle_sweep);
            self.rasterize(|fb| raster::sector(fb, center, r, &heading, color, fill));
            return;
        }
        let diameter = 2 * radius as u32 + 1;
        if fill {
            let sector = Sector::with_center(center, diameter, angle_start, angle_sweep);
            self.paint(&sector.into_styled(PrimitiveStyle::with_fill(color)));
        } else {
            let arc = Arc::with_center(center, diameter, angle_start, angle_sweep);
            self.paint(&arc.into_styled(PrimitiveStyle::with_stroke(color, 1)));
        }
    }

    /// Closed outline through `points`, each relative to `origin`.
    pub fn polygon(&mut self, origin: Point, points: &[Point], color: BinaryColor) {
        match points {
            [] => {}
            [only] => self.pixel(shift(origin, *only), color),
            _ => {
                for (idx, from) in points.iter().enumerate() {
                    let to = points[(idx + 1) % points.len()];
                    self.line(shift(origin, *from), shift(origin, to), color);
                }
            }
        }
    }

    /// Filled convex polygon through `points`, each relative to `origin`.
    pub fn fill_polygon(&mut self, origin: Point, points: &[Point], color: BinaryColor) {
        if points.len() < 3 {
            self.polygon(origin, points, color);
            return;
        }
        let anchor = shift(origin, points[0]);
        for pair in points[1..].windows(2) {
            let corners = [anchor, shift(origin, pair[0]), shift(origin, pair[1])];
            if Bounds::spanning(&corners, 0).oversized() {
                self.rasterize(|fb| raster::triangle(fb, corners, color));
                continue;
            }
            let tri = Triangle::new(corners[0], corners[1], corners[2]);
            self.paint(&tri.into_styled(PrimitiveStyle::with_fill(color)));
        }
    }

    /// Advance width of one glyph.
    pub fn char_width(&self, font: &MonoFont<'_>) -> u32 {
        font.character_size.width + font.character_spacing
    }

    pub fn string_width(&self, text: &str, font: &MonoFont<'_>) -> u32 {
        if text.is_empty() {
            return 0;
        }
        MonoTextStyle::new(font, BinaryColor::On)
            .measure_string(text, Point::zero(), Baseline::Top)
            .bounding_box
            .size
            .width
    }

    /// Draw `text` with its top-left corner at `at`.
    pub fn string(&mut self, at: Point, text: &str, font: &MonoFont<'_>, color: BinaryColor) {
        let style = MonoTextStyle::new(font, color);
        self.paint(&Text::with_baseline(text, at, style, Baseline::Top));
    }

    pub fn glyph(&mut self, at: Point, ch: char, font: &MonoFont<'_>, color: BinaryColor) {
        let mut buf = [0u8; 4];
        self.string(at, ch.encode_utf8(&mut buf), font, color);
    }

    /// Word-wrapped text, vertically centred in the box.
    pub fn string_box(
        &mut self,
        bounds: Rectangle,
        text: &str,
        font: &MonoFont<'_>,
        color: BinaryColor,
        justify: Justify,
    ) {
        let character_style = MonoTextStyle::new(font, color);
        let textbox_style = TextBoxStyleBuilder::new()
            .alignment(justify.alignment())
            .vertical_alignment(VerticalAlignment::Middle)
            .build();
        let text_box = TextBox::with_textbox_style(text, bounds, character_style, textbox_style);
        self.paint(&text_box);
    }

    /// The "STILL <text> Anyway" screen with concentric circles.
    pub fn demo(&mut self, hacking: &str) {
        let heading = fonts::open("Roboto_BlackItalic24");
        let marker = fonts::open("PermanentMarker22");
        let black = BinaryColor::On;
        let white = BinaryColor::Off;

        self.clear(white);
        self.string(Point::new(150, 25), "STILL", heading, black);
        self.string(Point::new(130, 50), hacking, marker, black);

        let width = self.string_width(hacking, marker) as i32;
        let left = 127 + 3;
        self.line(Point::new(left, 72), Point::new(left + width + 14, 72), black);
        let cursor = left + width + 10;
        self.line(Point::new(cursor, 52), Point::new(cursor, 70), black);

        self.string(Point::new(140, 75), "Anyway", heading, black);
        for (idx, radius) in [50, 40, 30, 20, 10].into_iter().enumerate() {
            let color = if idx % 2 == 0 { black } else { white };
            self.circle(Point::new(60, 60), radius, color, true);
        }
    }
}

impl Default for Ugfx {
    fn default() -> Self {
        Self::new()
    }
}

fn style(color: BinaryColor, fill: bool) -> PrimitiveStyle<BinaryColor> {
    if fill {
        PrimitiveStyle::with_fill(color)
    } else {
        PrimitiveStyle::with_stroke(color, 1)
    }
}

/// Convert a counter-clockwise span to embedded-graphics start/sweep, whose
/// angles grow clockwise on screen.
fn sweep(start: i32, end: i32) -> Option<(Angle, Angle)> {
    let span = i64::from(end) - i64::from(start);
    if span == 0 {
        return None;
    }
    let degrees = match span.rem_euclid(360) {
        0 => 360,
        d => d,
    };
    Some((
        Angle::from_degrees(-(end as f32)),
        Angle::from_degrees(degrees as f32),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Ugfx {
        let mut gfx = Ugfx::new();
        gfx.init();
        gfx
    }

    #[test]
    fn colour_zero_is_black() {
        assert_eq!(ink(0), BinaryColor::On);
        assert_eq!(ink(1), BinaryColor::Off);
        assert_eq!(ink(0xFFFFFF), BinaryColor::Off);
    }

    #[test]
    fn drawing_needs_an_initialized_surface() {
        let mut gfx = Ugfx::new();
        gfx.rect(Point::new(0, 0), 4, 4, BinaryColor::On, true);
        gfx.circle(Point::new(10, 10), 500_000, BinaryColor::On, true);
        assert_eq!(gfx.framebuffer().black_pixels(), 0);

        gfx.init();
        gfx.clear(BinaryColor::On);
        gfx.deinit();
        assert!(!gfx.is_initialized());
        gfx.string(Point::new(0, 0), "H", fonts::open("Roboto_Regular18"), BinaryColor::Off);
        gfx.clear(BinaryColor::Off);
        assert_eq!(gfx.framebuffer().black_pixels(), 296 * 128);

        gfx.init();
        assert_eq!(gfx.framebuffer().black_pixels(), 0);
    }

    #[test]
    fn area_fills_exactly_its_rectangle() {
        let mut gfx = surface();
        gfx.rect(Point::new(10, 10), 4, 3, BinaryColor::On, true);
        assert_eq!(gfx.framebuffer().black_pixels(), 12);
        assert_eq!(gfx.framebuffer().pixel(13, 12), Some(BinaryColor::On));
        assert_eq!(gfx.framebuffer().pixel(14, 12), Some(BinaryColor::Off));
    }

    #[test]
    fn clear_black_covers_whole_surface() {
        let mut gfx = surface();
        gfx.clear(BinaryColor::On);
        assert_eq!(gfx.framebuffer().black_pixels(), 296 * 128);
    }

    #[test]
    fn circle_is_centred() {
        let mut gfx = surface();
        gfx.circle(Point::new(50, 50), 5, BinaryColor::On, true);
        let fb = gfx.framebuffer();
        assert_eq!(fb.pixel(50, 50), Some(BinaryColor::On));
        assert_eq!(fb.pixel(50, 45), Some(BinaryColor::On));
        assert_eq!(fb.pixel(50, 44), Some(BinaryColor::Off));
    }

    #[test]
    fn negative_radius_draws_nothing() {
        let mut gfx = surface();
        gfx.circle(Point::new(50, 50), -1, BinaryColor::On, true);
        gfx.ellipse(Point::new(50, 50), -1, 3, BinaryColor::On, true);
        assert_eq!(gfx.framebuffer().black_pixels(), 0);
    }

    #[test]
    fn polygon_points_are_relative() {
        let mut gfx = surface();
        gfx.polygon(Point::new(100, 100), &[Point::new(1, 1)], BinaryColor::On);
        assert_eq!(gfx.framebuffer().pixel(101, 101), Some(BinaryColor::On));
        assert_eq!(gfx.framebuffer().black_pixels(), 1);
    }

    #[test]
    fn fill_polygon_covers_interior() {
        let mut gfx = surface();
        let square = [
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ];
        gfx.fill_polygon(Point::new(20, 20), &square, BinaryColor::On);
        assert_eq!(gfx.framebuffer().pixel(25, 25), Some(BinaryColor::On));
        assert_eq!(gfx.framebuffer().pixel(35, 35), Some(BinaryColor::Off));
    }

    #[test]
    fn zero_span_arc_draws_nothing() {
        let mut gfx = surface();
        gfx.arc(Point::new(60, 60), 20, 45, 45, BinaryColor::On, true);
        assert_eq!(gfx.framebuffer().black_pixels(), 0);
        gfx.arc(Point::new(60, 60), 20, 0, 360, BinaryColor::On, true);
        assert_eq!(gfx.framebuffer().pixel(60, 60), Some(BinaryColor::On));
    }

    #[test]
    fn huge_shapes_only_touch_visible_pixels() {
        let mut gfx = surface();
        gfx.circle(Point::new(10, 10), 200_000, BinaryColor::On, true);
        assert_eq!(gfx.framebuffer().black_pixels(), 296 * 128);

        gfx.ellipse(Point::new(10, 10), 300_000, i32::MAX, BinaryColor::Off, true);
        assert_eq!(gfx.framebuffer().black_pixels(), 0);

        gfx.arc(Point::new(148, 64), i32::MAX, 0, 90, BinaryColor::On, true);
        assert_eq!(gfx.framebuffer().pixel(200, 10), Some(BinaryColor::On));
        assert_eq!(gfx.framebuffer().pixel(100, 10), Some(BinaryColor::Off));
        assert_eq!(gfx.framebuffer().pixel(200, 100), Some(BinaryColor::Off));
    }

    #[test]
    fn huge_lines_are_clipped() {
        let mut gfx = surface();
        gfx.thickline(
            Point::new(i32::MIN, 40),
            Point::new(i32::MAX, 40),
            BinaryColor::On,
            3,
            true,
        );
        assert_eq!(gfx.framebuffer().black_pixels(), 296 * 3);

        let mut gfx = surface();
        gfx.thickline(Point::new(0, 0), Point::new(0, 0), BinaryColor::On, i32::MAX, true);
        assert_eq!(gfx.framebuffer().black_pixels(), 296 * 128);

        let mut gfx = surface();
        gfx.line(Point::new(5, -5_000_000), Point::new(5, 5_000_000), BinaryColor::On);
        assert_eq!(gfx.framebuffer().black_pixels(), 128);
    }

    #[test]
    fn huge_boxes_and_polygons_are_clipped() {
        let mut gfx = surface();
        gfx.rect(Point::new(-1, -1), i32::MAX, i32::MAX, BinaryColor::On, false);
        assert_eq!(gfx.framebuffer().black_pixels(), 0);
        gfx.rounded_rect(Point::new(-1, -1), i32::MAX, i32::MAX, 1, BinaryColor::On, true);
        assert_eq!(gfx.framebuffer().black_pixels(), 296 * 128);

        let mut gfx = surface();
        let wedge = [Point::new(0, 0), Point::new(i32::MAX, 0), Point::new(0, i32::MAX)];
        gfx.fill_polygon(Point::new(i32::MAX, 0), &wedge, BinaryColor::On);
        assert_eq!(gfx.framebuffer().black_pixels(), 0);
        gfx.fill_polygon(Point::new(0, 0), &wedge, BinaryColor::On);
        assert_eq!(gfx.framebuffer().black_pixels(), 296 * 128);
    }

    #[test]
    fn sweep_wraps_full_turns() {
        let (_, sweep_deg) = sweep(0, 720).unwrap();
        assert_eq!(sweep_deg, Angle::from_degrees(360.0));
        let (_, sweep_deg) = sweep(350, 10).unwrap();
        assert_eq!(sweep_deg, Angle::from_degrees(20.0));
    }

    #[test]
    fn string_width_grows_with_text() {
        let gfx = surface();
        let font = fonts::open("Roboto_Regular12");
        assert_eq!(gfx.string_width("", font), 0);
        assert_eq!(gfx.string_width("abc", font), 3 * gfx.char_width(font));
    }

    #[test]
    fn text_origin_is_top_left() {
        let mut gfx = surface();
        gfx.string(Point::new(0, 0), "H", fonts::open("Roboto_Regular18"), BinaryColor::On);
        let fb = gfx.framebuffer();
        assert!(fb.black_pixels() > 0);
        assert!((0..18).any(|y| (0..9).any(|x| fb.pixel(x, y) == Some(BinaryColor::On))));
        assert!((18..128).all(|y| (0..296).all(|x| fb.pixel(x, y) == Some(BinaryColor::Off))));
    }

    #[test]
    fn string_box_stays_inside_bounds() {
        let mut gfx = surface();
        let bounds = Rectangle::new(Point::new(100, 40), Size::new(80, 50));
        gfx.string_box(
            bounds,
            "wrap these words please",
            fonts::open("Roboto_Regular12"),
            BinaryColor::On,
            Justify::Center,
        );
        let fb = gfx.framebuffer();
        assert!(fb.black_pixels() > 0);
        for y in 0..128 {
            for x in 0..296 {
                if fb.pixel(x, y) == Some(BinaryColor::On) {
                    assert!(bounds.contains(Point::new(x, y)), "ink at {},{}", x, y);
                }
            }
        }
    }

    #[test]
    fn demo_draws_bullseye() {
        let mut gfx = surface();
        gfx.demo("HACKING");
        let fb = gfx.framebuffer();
        assert_eq!(fb.pixel(60, 60), Some(BinaryColor::On));
        assert_eq!(fb.pixel(60, 45), Some(BinaryColor::Off));
    }
}
