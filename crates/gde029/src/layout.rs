//! Frame layout conversion
//!
//! Callers usually draw in landscape: `rows` pixels wide, `cols` pixels tall,
//! 1 bit per pixel, MSB first, `1` = white. The controller RAM is addressed per
//! gate row with `cols / 8` bytes each. Landscape pixel `(x, y)` lands on gate
//! `x`, source `cols - 1 - y`.

use crate::config::Dimensions;

/// Bytes per row of a landscape image for the given panel
pub fn landscape_stride(dims: &Dimensions) -> usize {
    (dims.rows as usize).div_ceil(8)
}

/// Size of a landscape image for the given panel
pub fn landscape_size(dims: &Dimensions) -> usize {
    landscape_stride(dims) * dims.cols as usize
}

/// Rewrite a landscape image into controller RAM order.
///
/// Both slices must already be validated against [`landscape_size`] and
/// [`Dimensions::buffer_size`].
pub(crate) fn landscape_to_native(dims: &Dimensions, landscape: &[u8], native: &mut [u8]) {
    let stride = landscape_stride(dims);
    let row_bytes = dims.row_bytes();
    let cols = dims.cols as usize;

    native.fill(0x00);
    for y in 0..cols {
        let src_row = &landscape[y * stride..(y + 1) * stride];
        let col = cols - 1 - y;
        let (dst_byte, dst_bit) = (col / 8, 7 - (col % 8));
        for x in 0..dims.rows as usize {
            if src_row[x / 8] & (0x80 >> (x % 8)) != 0 {
                native[x * row_bytes + dst_byte] |= 1 << dst_bit;
            }
        }
    }
}
