//! Landscape 1bpp frame buffer backing the drawing calls
//!
//! Row-major, 37 bytes per row, MSB first, a set bit is white. This is the
//! layout [`crate::hal::Panel::display`] receives and the picture table stores.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*, primitives::Rectangle};

use crate::{PANEL_HEIGHT, PANEL_WIDTH};

/// Bytes per landscape row
pub const ROW_BYTES: usize = (PANEL_WIDTH as usize).div_ceil(8);
/// Size of one full frame
pub const FRAME_SIZE: usize = ROW_BYTES * PANEL_HEIGHT as usize;

pub struct Framebuffer {
    buffer: Vec<u8>,
}

impl Framebuffer {
    /// New frame, all white.
    pub fn new() -> Self {
        Self {
            buffer: vec![0xFF; FRAME_SIZE],
        }
    }

    pub fn fill(&mut self, color: BinaryColor) {
        self.buffer.fill(match color {
            BinaryColor::On => 0x00,
            BinaryColor::Off => 0xFF,
        });
    }

    /// Set one pixel; off-surface writes are dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor) {
        let Some((idx, bit)) = Self::locate(x, y) else {
            return;
        };
        if color.is_on() {
            self.buffer[idx] &= !(1 << bit);
        } else {
            self.buffer[idx] |= 1 << bit;
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<BinaryColor> {
        let (idx, bit) = Self::locate(x, y)?;
        Some(if self.buffer[idx] & (1 << bit) == 0 {
            BinaryColor::On
        } else {
            BinaryColor::Off
        })
    }

    /// Number of black pixels in the visible area.
    pub fn black_pixels(&self) -> usize {
        let mut count = 0;
        for y in 0..PANEL_HEIGHT as i32 {
            for x in 0..PANEL_WIDTH as i32 {
                if self.pixel(x, y) == Some(BinaryColor::On) {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    fn locate(x: i32, y: i32) -> Option<(usize, u32)> {
        if x < 0 || y < 0 || x >= PANEL_WIDTH as i32 || y >= PANEL_HEIGHT as i32 {
            return None;
        }
        let idx = y as usize * ROW_BYTES + x as usize / 8;
        Some((idx, 7 - (x as u32 % 8)))
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let bottom = PANEL_HEIGHT as i32;
        for (point, color) in area.points().zip(colors) {
            if point.y >= bottom {
                break;
            }
            self.set_pixel(point.x, point.y, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let (left, top) = (i64::from(area.top_left.x), i64::from(area.top_left.y));
        let x0 = left.max(0);
        let x1 = (left + i64::from(area.size.width)).min(i64::from(PANEL_WIDTH));
        let y0 = top.max(0);
        let y1 = (top + i64::from(area.size.height)).min(i64::from(PANEL_HEIGHT));
        for y in y0..y1 {
            for x in x0..x1 {
                self.set_pixel(x as i32, y as i32, color);
            }
        }
        Ok(())
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(PANEL_WIDTH, PANEL_HEIGHT)
    }
}
