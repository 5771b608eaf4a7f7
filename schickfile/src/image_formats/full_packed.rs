use log::warn;
use crate::{error::Result, image::{Frame, Image, PaletteSource}, palette::{parse_palette, Palette}};
use super::{full_raw::{HEIGHT, PALETTE_START, PIXEL_COUNT, WIDTH}, DecodeContext};

/// The packed pictures store their palette much darker than the game shows it.
pub const BRIGHTNESS_FACTOR: u8 = 8;

pub fn decode(ctx: &DecodeContext, name: &str, data: &[u8]) -> Result<Image> {
	let unpacked = ctx.codecs.decompress(name, data)?;
	let (palette, source) = if unpacked.len() > PIXEL_COUNT {
		let colors: Vec<_> = parse_palette(unpacked.get(PALETTE_START..).unwrap_or_default())
			.into_iter()
			.map(|c| c.scaled(BRIGHTNESS_FACTOR))
			.collect();
		(Palette::from_colors(&colors), PaletteSource::Embedded)
	} else {
		warn!("{name} has no palette, trying the standard palette");
		(ctx.palettes.standard.clone(), PaletteSource::FallbackStandard)
	};
	let frame = Frame::new(WIDTH, HEIGHT, 0.0, &unpacked, palette, source)?;
	Ok(vec![frame.materialized()].into())
}
