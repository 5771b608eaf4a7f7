use crate::{error::Result, image::{Frame, Image, PaletteSource}, palette::{Palette, Rgb}};

pub const GLYPH_SIZE: u32 = 8;
pub const SCALE: f32 = 3.0;
pub const BACKGROUND: Rgb = Rgb::new(0x21, 0x61, 0x25);
pub const FOREGROUND: Rgb = Rgb::WHITE;

/// Every 8 bytes are one glyph, one byte per row with the leftmost pixel in the top bit.
pub fn decode(data: &[u8]) -> Result<Image> {
	let palette = Palette::from_colors(&[BACKGROUND, FOREGROUND]);
	let glyphs = data.chunks_exact(GLYPH_SIZE as usize);
	let trailer = glyphs.remainder();
	let frames = glyphs.map(|glyph| {
		let pixels: Vec<u8> = glyph.iter().flat_map(|row| (0..8).rev().map(move |bit| row >> bit & 1)).collect();
		Frame::new(GLYPH_SIZE, GLYPH_SIZE, SCALE, &pixels, palette.clone(), PaletteSource::Builtin).map(Frame::materialized)
	}).collect::<Result<Vec<_>>>()?;
	Ok(Image {frames: frames.into(), ignored_trailer: trailer.into()})
}
