use std::borrow::Cow;
use log::{debug, warn};
use crate::{error::Result, image::{Frame, Image, PaletteSource}};
use super::{DecodeContext, GridLayout};

pub const SCALE: f32 = 1.5;

pub fn decode(ctx: &DecodeContext, name: &str, data: &[u8], grid: GridLayout, selector: Option<usize>) -> Result<Image> {
	let bytes: Cow<[u8]> = if grid.packed {
		Cow::Owned(ctx.codecs.decompress(name, data)?.into_vec())
	} else {
		Cow::Borrowed(data)
	};
	warn!("{name} has no palette, trying the standard palette");
	let frame_size = (grid.width * grid.height) as usize;
	let mut frames = Vec::new();
	for i in 0..grid.count {
		if selector.is_none_or(|no| no == i) {
			let frame = Frame::new(
				grid.width, grid.height, SCALE,
				bytes.get(i * frame_size..).unwrap_or_default(),
				ctx.palettes.standard.clone(),
				PaletteSource::FallbackStandard
			)?;
			frames.push(frame.materialized());
		}
	}
	let trailer = bytes.get(grid.count * frame_size..).unwrap_or_default();
	if trailer.len() != grid.trailer {
		debug!("{name}: expected {} trailing bytes, found {}", grid.trailer, trailer.len());
	}
	Ok(Image {frames: frames.into(), ignored_trailer: trailer.into()})
}

#[cfg(test)]
mod tests {
	use crate::error::Error;
	use super::super::test_support::{self, CODECS};
	use super::*;

	const GRID: GridLayout = GridLayout {width: 2, height: 3, count: 4, packed: false, trailer: 2};

	fn data() -> Vec<u8> {
		let mut data: Vec<u8> = (0..4).flat_map(|i| [i; 6]).collect();
		data.extend([0xEE, 0xEF]);
		data
	}

	#[test]
	fn slices_equal_frames_and_keeps_the_trailer() {
		let palettes = test_support::palettes();
		let ctx = DecodeContext {palettes: &palettes, codecs: &CODECS};
		let image = decode(&ctx, "ICONS", &data(), GRID, None).unwrap();
		assert_eq!(image.frames.len(), 4);
		for (i, frame) in image.frames.iter().enumerate() {
			assert_eq!(&*frame.pixels, &[i as u8; 6]);
			assert_eq!(frame.scale, 1.5);
			assert_eq!(frame.palette, palettes.standard);
			assert_eq!(frame.rgb.as_ref().unwrap().len(), 18);
		}
		assert_eq!(&*image.ignored_trailer, &[0xEE, 0xEF]);
	}

	#[test]
	fn selector_picks_one_frame() {
		let palettes = test_support::palettes();
		let ctx = DecodeContext {palettes: &palettes, codecs: &CODECS};
		let image = decode(&ctx, "ICONS", &data(), GRID, Some(2)).unwrap();
		assert_eq!(image.frames.len(), 1);
		assert_eq!(image.frames[0].pixels[0], 2);
		assert!(decode(&ctx, "ICONS", &data(), GRID, Some(4)).unwrap().is_empty());
	}

	#[test]
	fn packed_grids_are_unpacked_first() {
		fn doubling(data: &[u8]) -> std::result::Result<Box<[u8]>, String> {
			Ok(data.iter().flat_map(|&b| [b, b]).collect())
		}
		let palettes = test_support::palettes();
		let codecs = super::super::Codecs {decompress: doubling, ..CODECS};
		let ctx = DecodeContext {palettes: &palettes, codecs: &codecs};
		let grid = GridLayout {width: 2, height: 1, count: 2, packed: true, trailer: 0};
		let image = decode(&ctx, "POPUP.DAT", &[5, 6], grid, None).unwrap();
		assert_eq!(&*image.frames[1].pixels, &[6, 6]);
	}

	#[test]
	fn short_file_is_an_error() {
		let palettes = test_support::palettes();
		let ctx = DecodeContext {palettes: &palettes, codecs: &CODECS};
		assert!(matches!(decode(&ctx, "BICONS", &[0; 20], GRID, None), Err(Error::Truncated {..})));
	}
}
