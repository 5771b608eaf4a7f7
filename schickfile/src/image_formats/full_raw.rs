use crate::{error::Result, image::{Frame, Image, PaletteSource}, palette::{parse_palette, Palette}};

pub const WIDTH: u32 = 320;
pub const HEIGHT: u32 = 200;
pub const PIXEL_COUNT: usize = (WIDTH * HEIGHT) as usize;
// the palette is preceded by two bytes of unknown purpose
pub const PALETTE_START: usize = PIXEL_COUNT + 2;

pub fn decode(data: &[u8]) -> Result<Image> {
	let palette = parse_palette(data.get(PALETTE_START..).unwrap_or_default());
	let frame = Frame::new(WIDTH, HEIGHT, 0.0, data, Palette::from_colors(&palette), PaletteSource::Embedded)?;
	Ok(vec![frame.materialized()].into())
}
