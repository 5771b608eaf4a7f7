use log::warn;
use phf::phf_set;
use crate::{error::Result, image::{Frame, Image, PaletteSource}, palette::{parse_palette, Palette, Rgb}};
use super::DecodeContext;

pub const SCALE: f32 = 1.5;

// these share palette indices 0-127 with another picture, their own palette starts at 128
static SHARED_LOW_HALF: phf::Set<&'static str> = phf_set! {
	"GUERTEL.NVF",
	"LTURM.NVF",
	"MARBLESL.NVF",
	"SHIPSL.NVF",
	"STONESL.NVF",
	"TDIVERSE.NVF"
};
const SHARED_LEN: usize = 0x80;

pub fn decode(ctx: &DecodeContext, name: &str, data: &[u8]) -> Result<Image> {
	let tiles = ctx.codecs.decode_tiles(name, data)?;
	let mut colors = parse_palette(&tiles.palette);
	let mut source = PaletteSource::Embedded;
	if SHARED_LOW_HALF.contains(name) {
		colors = [Rgb::BLACK; SHARED_LEN].into_iter().chain(colors).collect();
	} else if colors.is_empty() {
		warn!("{name} has no palette, trying the combat palette");
		colors = ctx.palettes.combat.colors().to_vec();
		source = PaletteSource::FallbackCombat;
	}
	let palette = Palette::from_colors(&colors);
	let frames = tiles.tiles.iter()
		.map(|tile| Frame::new(tile.width, tile.height, SCALE, &tile.pixels, palette.clone(), source).map(Frame::materialized))
		.collect::<Result<Vec<_>>>()?;
	Ok(frames.into())
}
