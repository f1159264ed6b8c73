//! Color conversion helpers
//!
//! Scene elements sample to 24-bit RGB; the panel speaks 16-bit RGB565.

/// Pack a 24-bit `0xRRGGBB` color into RGB565
pub const fn rgb888_to_rgb565(rgb: u32) -> u16 {
    let r = ((rgb >> 16) & 0xFF) as u16;
    let g = ((rgb >> 8) & 0xFF) as u16;
    let b = (rgb & 0xFF) as u16;
    ((r & 0xF8) << 8) | ((g & 0xFC) << 3) | (b >> 3)
}

/// Expand an RGB565 color to 24-bit `0xRRGGBB`
///
/// The low source bits are replicated into the low target bits so that
/// full-scale components stay full scale.
pub const fn rgb565_to_rgb888(color: u16) -> u32 {
    let r5 = (color >> 11) & 0x1F;
    let g6 = (color >> 5) & 0x3F;
    let b5 = color & 0x1F;
    let r = ((r5 << 3) | (r5 >> 2)) as u32;
    let g = ((g6 << 2) | (g6 >> 4)) as u32;
    let b = ((b5 << 3) | (b5 >> 2)) as u32;
    (r << 16) | (g << 8) | b
}
