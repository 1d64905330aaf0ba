//! RGB555 color packing
//!
//! Bit layout of a packed color: red in bits 0..5, green in 5..10, blue in
//! 10..15. Bit 15 is unused.

/// Default vertex color when no color array is bound (all bits set).
pub const WHITE: u16 = u16::MAX;
pub const BLACK: u16 = 0;

/// Pack 8-bit channels into RGB555, keeping the top 5 bits of each.
#[inline]
pub const fn rgb888_to_555(r: u8, g: u8, b: u8) -> u16 {
    ((r >> 3) as u16) | (((g >> 3) as u16) << 5) | (((b >> 3) as u16) << 10)
}

/// Unpack RGB555 into `[r, g, b, a]` with alpha fixed at 255.
///
/// Lossy: the low 3 bits of every channel come back as zero.
#[inline]
pub const fn rgb555_to_888(color: u16) -> [u8; 4] {
    let red = ((color & 31) << 3) as u8;
    let green = (((color >> 5) & 31) << 3) as u8;
    let blue = (((color >> 10) & 31) << 3) as u8;
    [red, green, blue, 255]
}
