//! The `badge` module: bring-up, drawing and power telemetry

extern crate alloc;

use alloc::format;

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;

use crate::args::Args;
use crate::error::BadgeError;
use crate::fonts;
use crate::hal::DisplayFlags;
use crate::pictures::{self, PICTURE_COUNT};
use crate::table::{Entry, Module, Session};
use crate::ugfx::{ink, Justify, BLACK, WHITE};
use crate::value::Value;

pub static BADGE_MODULE: Module = Module {
    name: "badge",
    entries: &[
        Entry::str("__name__", "badge"),
        Entry::function("init", badge_init, 0, 0),
        Entry::function("eink_init", eink_init, 0, 0),
        Entry::function("power_init", power_init, 0, 0),
        Entry::function("leds_init", leds_init, 0, 0),
        Entry::function("display_picture", display_picture, 2, 2),
        Entry::function("ugfx_init", ugfx_init, 0, 0),
        Entry::function("ugfx_deinit", ugfx_deinit, 0, 0),
        Entry::int("BLACK", BLACK),
        Entry::int("WHITE", WHITE),
        Entry::int("justifyLeft", Justify::Left as i64),
        Entry::int("justifyCenter", Justify::Center as i64),
        Entry::int("justifyRight", Justify::Right as i64),
        Entry::function("clear", clear, 0, 1),
        Entry::function("flush", flush, 0, 0),
        Entry::function("get_string_width", get_string_width, 2, 2),
        Entry::function("get_char_width", get_char_width, 2, 2),
        Entry::function("schar", schar, 5, 5),
        Entry::function("string", string, 5, 5),
        Entry::function("string_box", string_box, 8, 8),
        Entry::function("pixel", pixel, 3, 3),
        Entry::function("line", line, 5, 5),
        Entry::function("box", outline_box, 5, 5),
        Entry::function("rounded_box", rounded_box, 6, 6),
        Entry::function("fill_rounded_box", fill_rounded_box, 6, 6),
        Entry::function("area", area, 5, 5),
        Entry::function("thickline", thickline, 7, 7),
        Entry::function("circle", circle, 4, 4),
        Entry::function("fill_circle", fill_circle, 4, 4),
        Entry::function("ellipse", ellipse, 5, 5),
        Entry::function("fill_ellipse", fill_ellipse, 5, 5),
        Entry::function("arc", arc, 6, 6),
        Entry::function("fill_arc", fill_arc, 6, 6),
        Entry::function("polygon", polygon, 4, 4),
        Entry::function("fill_polygon", fill_polygon, 4, 4),
        Entry::function("ugfx_demo", ugfx_demo, 1, 1),
        Entry::function("battery_charge_status", battery_charge_status, 0, 0),
        Entry::function("battery_volt_sense", battery_volt_sense, 0, 0),
        Entry::function("usb_volt_sense", usb_volt_sense, 0, 0),
    ],
};

type CallResult = Result<Value, BadgeError>;

fn point(args: &Args<'_>, first: usize) -> Result<Point, BadgeError> {
    Ok(Point::new(args.coord(first)?, args.coord(first + 1)?))
}

fn color(args: &Args<'_>, idx: usize) -> Result<embedded_graphics::pixelcolor::BinaryColor, BadgeError> {
    Ok(ink(args.int(idx)?))
}

// Bring-up

fn badge_init(session: &mut Session<'_>, _: &Args<'_>) -> CallResult {
    session.board.init()?;
    log::info!("badge initialized");
    Ok(Value::None)
}

fn eink_init(session: &mut Session<'_>, _: &Args<'_>) -> CallResult {
    session.board.panel().init()?;
    Ok(Value::None)
}

fn power_init(session: &mut Session<'_>, _: &Args<'_>) -> CallResult {
    session.board.power().init()?;
    Ok(Value::None)
}

fn leds_init(session: &mut Session<'_>, _: &Args<'_>) -> CallResult {
    session.board.leds().init()?;
    Ok(Value::None)
}

fn display_picture(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    let id = args.int(0)?;
    let lut = args.int(1)?;
    let image = pictures::picture(id).ok_or_else(|| {
        BadgeError::Value(format!(
            "picture id {} out of range 0..{}",
            id, PICTURE_COUNT
        ))
    })?;
    session.board.panel().display(image, DisplayFlags::from_lut(lut))?;
    Ok(Value::None)
}

// Graphics state

fn ugfx_init(session: &mut Session<'_>, _: &Args<'_>) -> CallResult {
    session.gfx.init();
    Ok(Value::None)
}

fn ugfx_deinit(session: &mut Session<'_>, _: &Args<'_>) -> CallResult {
    session.gfx.deinit();
    Ok(Value::None)
}

fn clear(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    let c = ink(args.int_or(0, WHITE)?);
    session.gfx.clear(c);
    Ok(Value::None)
}

fn flush(session: &mut Session<'_>, _: &Args<'_>) -> CallResult {
    push_surface(session, "flush")
}

/// Send the drawing surface to the panel, unless graphics are down.
fn push_surface(session: &mut Session<'_>, call: &str) -> CallResult {
    if !session.gfx.is_initialized() {
        log::warn!("{}(): graphics not initialized, nothing sent", call);
        return Ok(Value::None);
    }
    let image = session.gfx.framebuffer().buffer();
    session.board.panel().display(image, DisplayFlags::DEFAULT)?;
    Ok(Value::None)
}

// Text

fn get_string_width(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    let text = args.str(0)?;
    let font = fonts::open(args.str(1)?);
    Ok(Value::Int(i64::from(session.gfx.string_width(text, font))))
}

fn get_char_width(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    args.int(0)?;
    let font = fonts::open(args.str(1)?);
    Ok(Value::Int(i64::from(session.gfx.char_width(font))))
}

fn glyph_arg(args: &Args<'_>, idx: usize) -> Result<char, BadgeError> {
    if let Some(Value::Str(s)) = args.get(idx) {
        let mut chars = s.chars();
        return match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => Err(BadgeError::Type(format!(
                "expected a character, got a string of length {}",
                s.chars().count()
            ))),
        };
    }
    let code = args.int(idx)?;
    Ok(u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER))
}

fn schar(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    let at = point(args, 0)?;
    let ch = glyph_arg(args, 2)?;
    let font = fonts::open(args.str(3)?);
    let c = color(args, 4)?;
    session.gfx.glyph(at, ch, font, c);
    Ok(Value::None)
}

fn string(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    let at = point(args, 0)?;
    let text = args.str(2)?;
    let font = fonts::open(args.str(3)?);
    let c = color(args, 4)?;
    session.gfx.string(at, text, font, c);
    Ok(Value::None)
}

fn string_box(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    let at = point(args, 0)?;
    let size = Size::new(args.coord(2)?.max(0) as u32, args.coord(3)?.max(0) as u32);
    let text = args.str(4)?;
    let font = fonts::open(args.str(5)?);
    let c = color(args, 6)?;
    let justify = Justify::from_value(args.int(7)?);
    session
        .gfx
        .string_box(Rectangle::new(at, size), text, font, c, justify);
    Ok(Value::None)
}

// Primitives

fn pixel(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    let at = point(args, 0)?;
    session.gfx.pixel(at, color(args, 2)?);
    Ok(Value::None)
}

fn line(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    let from = point(args, 0)?;
    let to = point(args, 2)?;
    session.gfx.line(from, to, color(args, 4)?);
    Ok(Value::None)
}

fn thickline(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    let from = point(args, 0)?;
    let to = point(args, 2)?;
    let c = color(args, 4)?;
    let width = args.coord(5)?;
    let round = args.int(6)? != 0;
    session.gfx.thickline(from, to, c, width, round);
    Ok(Value::None)
}

fn rect(session: &mut Session<'_>, args: &Args<'_>, fill: bool) -> CallResult {
    let origin = point(args, 0)?;
    let (w, h) = (args.coord(2)?, args.coord(3)?);
    session.gfx.rect(origin, w, h, color(args, 4)?, fill);
    Ok(Value::None)
}

fn outline_box(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    rect(session, args, false)
}

fn area(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    rect(session, args, true)
}

fn rounded(session: &mut Session<'_>, args: &Args<'_>, fill: bool) -> CallResult {
    let origin = point(args, 0)?;
    let (w, h, r) = (args.coord(2)?, args.coord(3)?, args.coord(4)?);
    session.gfx.rounded_rect(origin, w, h, r, color(args, 5)?, fill);
    Ok(Value::None)
}

fn rounded_box(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    rounded(session, args, false)
}

fn fill_rounded_box(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    rounded(session, args, true)
}

fn round_shape(session: &mut Session<'_>, args: &Args<'_>, fill: bool) -> CallResult {
    let center = point(args, 0)?;
    let radius = args.coord(2)?;
    session.gfx.circle(center, radius, color(args, 3)?, fill);
    Ok(Value::None)
}

fn circle(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    round_shape(session, args, false)
}

fn fill_circle(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    round_shape(session, args, true)
}

fn oval(session: &mut Session<'_>, args: &Args<'_>, fill: bool) -> CallResult {
    let center = point(args, 0)?;
    let (a, b) = (args.coord(2)?, args.coord(3)?);
    session.gfx.ellipse(center, a, b, color(args, 4)?, fill);
    Ok(Value::None)
}

fn ellipse(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    oval(session, args, false)
}

fn fill_ellipse(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    oval(session, args, true)
}

fn arc_shape(session: &mut Session<'_>, args: &Args<'_>, fill: bool) -> CallResult {
    let center = point(args, 0)?;
    let radius = args.coord(2)?;
    let (start, end) = (args.coord(3)?, args.coord(4)?);
    session
        .gfx
        .arc(center, radius, start, end, color(args, 5)?, fill);
    Ok(Value::None)
}

fn arc(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    arc_shape(session, args, false)
}

fn fill_arc(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    arc_shape(session, args, true)
}

fn polygon(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    let origin = point(args, 0)?;
    let points = args.points(2)?;
    session.gfx.polygon(origin, &points, color(args, 3)?);
    Ok(Value::None)
}

fn fill_polygon(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    let origin = point(args, 0)?;
    let points = args.points(2)?;
    session.gfx.fill_polygon(origin, &points, color(args, 3)?);
    Ok(Value::None)
}

fn ugfx_demo(session: &mut Session<'_>, args: &Args<'_>) -> CallResult {
    let text = args.str(0)?;
    session.gfx.demo(text);
    push_surface(session, "ugfx_demo")
}

// Power

fn battery_charge_status(session: &mut Session<'_>, _: &Args<'_>) -> CallResult {
    Ok(Value::Bool(session.board.power().battery_charging()?))
}

fn battery_volt_sense(session: &mut Session<'_>, _: &Args<'_>) -> CallResult {
    Ok(Value::from(session.board.power().battery_millivolts()?))
}

fn usb_volt_sense(session: &mut Session<'_>, _: &Args<'_>) -> CallResult {
    Ok(Value::from(session.board.power().usb_millivolts()?))
}
