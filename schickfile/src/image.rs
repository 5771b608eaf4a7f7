use std::io::Write;
use crate::{error::{Error, Result}, palette::Palette};

/// Where a frame's palette came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaletteSource {
	/// Stored in the file itself.
	Embedded,
	/// Fixed colors of the format, fonts only.
	Builtin,
	/// The file had no palette, the standard composite was used instead.
	FallbackStandard,
	/// The file had no palette, the combat composite was used instead.
	FallbackCombat
}

impl PaletteSource {
	pub fn is_fallback(self) -> bool {
		matches!(self, Self::FallbackStandard | Self::FallbackCombat)
	}
}

/// One palette indexed picture, `pixels` holds one palette index per pixel.
#[derive(Clone, Debug)]
pub struct Frame {
	pub width: u32,
	pub height: u32,
	/// How much the game scales the picture up on screen, 0 for full screen images.
	pub scale: f32,
	pub pixels: Box<[u8]>,
	pub palette: Palette,
	pub palette_source: PaletteSource,
	/// Packed RGB, filled by `materialize`.
	pub rgb: Option<Box<[u8]>>
}

impl Frame {
	/// Takes the first `width * height` indices of `buf`.
	pub fn new(width: u32, height: u32, scale: f32, buf: &[u8], palette: Palette, palette_source: PaletteSource) -> Result<Self> {
		let truncated = |len| Error::Truncated {what: format!("{width}x{height} pixels"), offset: 0, len};
		let needed_size = width.checked_mul(height).ok_or_else(|| truncated(usize::MAX))? as usize;
		let pixels = buf.get(0..needed_size).ok_or_else(|| truncated(needed_size))?;
		Ok(Self {width, height, scale, pixels: pixels.into(), palette, palette_source, rgb: None})
	}

	pub fn materialize(&mut self) {
		let colors = self.palette.colors();
		self.rgb = Some(self.pixels.iter().flat_map(|&i| {
			let c = colors[i as usize];
			[c.r, c.g, c.b]
		}).collect());
	}

	pub fn materialized(mut self) -> Self {
		self.materialize();
		self
	}

	pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
		image::RgbImage::from_raw(self.width, self.height, self.rgb.as_ref()?.to_vec())
	}

	/// Encodes the frame as an 8 bit paletted PNG.
	pub fn write_indexed_png<W: Write>(&self, out: W) -> Result<()> {
		let mut encoder = png::Encoder::new(out, self.width, self.height);
		encoder.set_color(png::ColorType::Indexed);
		encoder.set_depth(png::BitDepth::Eight);
		encoder.set_palette(self.palette.as_bytes().to_vec());
		let mut writer = encoder.write_header()?;
		writer.write_image_data(&self.pixels)?;
		writer.finish()?;
		Ok(())
	}
}

/// Every frame decoded from one archive entry.
#[derive(Clone, Debug, Default)]
pub struct Image {
	pub frames: Box<[Frame]>,
	/// Bytes after the last frame that no known layout covers, kept as they were.
	pub ignored_trailer: Box<[u8]>
}

impl Image {
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}
}

impl From<Vec<Frame>> for Image {
	fn from(frames: Vec<Frame>) -> Self {
		Self {frames: frames.into(), ignored_trailer: Box::default()}
	}
}

#[cfg(test)]
mod tests {
	use crate::palette::Rgb;
	use super::*;

	fn frame() -> Frame {
		let palette = Palette::from_colors(&[Rgb::BLACK, Rgb::new(1, 2, 3), Rgb::WHITE]);
		Frame::new(3, 2, 1.5, &[0, 1, 2, 2, 1, 0, 9, 9], palette, PaletteSource::Embedded).unwrap().materialized()
	}

	#[test]
	fn materialized_rgb_matches_the_palette() {
		let frame = frame();
		assert_eq!(frame.pixels.len(), 6);
		let rgb = frame.rgb.as_deref().unwrap();
		assert_eq!(rgb.len(), 3 * 2 * 3);
		assert_eq!(&rgb[..9], &[0, 0, 0, 1, 2, 3, 255, 255, 255]);
	}

	#[test]
	fn short_pixel_buffer_is_rejected() {
		let err = Frame::new(4, 4, 1.0, &[0; 15], Palette::default(), PaletteSource::Embedded).unwrap_err();
		assert!(matches!(err, Error::Truncated {len: 16, ..}));
	}

	#[test]
	fn oversized_dimensions_are_rejected() {
		let err = Frame::new(0x10000, 0x10000, 1.5, &[0; 64], Palette::default(), PaletteSource::Embedded).unwrap_err();
		assert!(matches!(err, Error::Truncated {len: usize::MAX, ..}));
		assert!(Frame::new(0xffff, 0xffff, 1.5, &[0; 64], Palette::default(), PaletteSource::Embedded).is_err());
	}

	#[test]
	fn exports_to_rgb_and_png() {
		let frame = frame();
		let image = frame.to_rgb_image().unwrap();
		assert_eq!(image.get_pixel(1, 0).0, [1, 2, 3]);
		let mut png_bytes = Vec::new();
		frame.write_indexed_png(&mut png_bytes).unwrap();
		assert!(png_bytes.starts_with(b"\x89PNG\x0d\x0a\x1a\x0a"));
		assert!(Frame::new(1, 1, 0.0, &[0], Palette::default(), PaletteSource::Builtin).unwrap().to_rgb_image().is_none());
	}
}
