//! Built-in full-screen pictures for `display_picture`
//!
//! Each picture is a fixed pattern rendered at compile time into the
//! landscape frame layout.

use crate::framebuffer::{FRAME_SIZE, ROW_BYTES};
use crate::{PANEL_HEIGHT, PANEL_WIDTH};

/// Number of built-in pictures.
pub const PICTURE_COUNT: usize = 5;

/// Picture names, indexed by id.
pub const PICTURE_NAMES: [&str; PICTURE_COUNT] = ["sha", "menu", "nick", "weather", "test"];

const W: i32 = PANEL_WIDTH as i32;
const H: i32 = PANEL_HEIGHT as i32;

#[derive(Clone, Copy)]
enum Pattern {
    Rings,
    Menu,
    Nick,
    Weather,
    Checker,
}

const fn in_circle(x: i32, y: i32, cx: i32, cy: i32, r: i32) -> bool {
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy <= r * r
}

const fn is_black(pattern: Pattern, x: i32, y: i32) -> bool {
    match pattern {
        Pattern::Rings => {
            let mut r = 60;
            let mut black = true;
            while r > 0 {
                if !in_circle(x, y, W / 2, H / 2, r) {
                    return !black;
                }
                r -= 12;
                black = !black;
            }
            !black
        }
        Pattern::Menu => y < 20 || (y > 20 && (y - 20) % 27 == 0) || (x < 4 && y >= 20),
        Pattern::Nick => {
            let frame = x < 3 || y < 3 || x >= W - 3 || y >= H - 3;
            let underline = y >= 92 && y < 98 && x >= 40 && x < W - 40;
            frame || underline
        }
        Pattern::Weather => {
            let sun = in_circle(x, y, 70, 50, 28);
            let ray = (x == 70 || y == 50) && in_circle(x, y, 70, 50, 40);
            let horizon = y == 100;
            sun || ray || horizon
        }
        Pattern::Checker => ((x / 8) + (y / 8)) % 2 == 0,
    }
}

const fn render(pattern: Pattern) -> [u8; FRAME_SIZE] {
    let mut frame = [0xFFu8; FRAME_SIZE];
    let mut y = 0;
    while y < H {
        let mut x = 0;
        while x < W {
            if is_black(pattern, x, y) {
                let idx = y as usize * ROW_BYTES + x as usize / 8;
                frame[idx] &= !(0x80u8 >> (x % 8));
            }
            x += 1;
        }
        y += 1;
    }
    frame
}

// One static per picture keeps each evaluation small.
#[allow(long_running_const_eval)]
static SHA: [u8; FRAME_SIZE] = render(Pattern::Rings);
#[allow(long_running_const_eval)]
static MENU: [u8; FRAME_SIZE] = render(Pattern::Menu);
#[allow(long_running_const_eval)]
static NICK: [u8; FRAME_SIZE] = render(Pattern::Nick);
#[allow(long_running_const_eval)]
static WEATHER: [u8; FRAME_SIZE] = render(Pattern::Weather);
#[allow(long_running_const_eval)]
static TEST: [u8; FRAME_SIZE] = render(Pattern::Checker);

static PICTURES: [&[u8]; PICTURE_COUNT] = [&SHA, &MENU, &NICK, &WEATHER, &TEST];

/// Picture by id, `None` when the id is out of range.
pub fn picture(id: i64) -> Option<&'static [u8]> {
    let idx = usize::try_from(id).ok()?;
    PICTURES.get(idx).copied()
}
