use dotmatrix_common::Color;

/// DMG shades 0-3, lightest first.
pub const DMG_PALETTE: [Color; 4] = [
    Color::WHITE,
    Color::LIGHT_GRAY,
    Color::DARK_GRAY,
    Color::BLACK,
];

/// Expand 2-bit shades into packed RGB24. Stops at whichever runs out
/// first, the shades or the output buffer.
pub fn shades_to_rgb24(shades: &[u8], buffer: &mut [u8]) {
    for (&shade, out) in shades.iter().zip(buffer.chunks_exact_mut(3)) {
        DMG_PALETTE[(shade & 0x03) as usize].write_rgb24(out);
    }
}
