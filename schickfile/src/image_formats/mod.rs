use log::debug;
use phf::phf_map;
use crate::{error::{Error, Result}, image::Image, palette::Palettes};

mod full_raw;
mod full_packed;
mod fixed_grid;
mod font;
mod tile_container;

/// A single picture as returned by the tile container decoder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawTile {
	pub width: u32,
	pub height: u32,
	pub pixels: Box<[u8]>
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileSet {
	pub tiles: Vec<RawTile>,
	/// Raw RGB triples, empty if the container has no palette.
	pub palette: Box<[u8]>
}

/// Codecs this crate doesn't implement itself.
#[derive(Clone, Copy)]
pub struct Codecs {
	/// Unpacks the PowerPacker (`PP20`) compressed files.
	pub decompress: fn(&[u8]) -> std::result::Result<Box<[u8]>, String>,
	/// Splits an NVF tile container into its pictures and palette.
	pub decode_tiles: fn(&[u8]) -> std::result::Result<TileSet, String>
}

impl Codecs {
	pub(crate) fn decompress(&self, name: &str, data: &[u8]) -> Result<Box<[u8]>> {
		(self.decompress)(data).map_err(|msg| Error::Codec {name: name.into(), msg})
	}

	pub(crate) fn decode_tiles(&self, name: &str, data: &[u8]) -> Result<TileSet> {
		(self.decode_tiles)(data).map_err(|msg| Error::Codec {name: name.into(), msg})
	}
}

pub struct DecodeContext<'a> {
	pub palettes: &'a Palettes,
	pub codecs: &'a Codecs
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
	pub width: u32,
	pub height: u32,
	pub count: usize,
	/// The file has to be decompressed before it can be sliced.
	pub packed: bool,
	/// Bytes after the last frame with no known meaning.
	pub trailer: usize
}

impl GridLayout {
	const fn plain(width: u32, height: u32, count: usize) -> Self {
		Self {width, height, count, packed: false, trailer: 0}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeStrategy {
	FullRaw,
	FullPacked,
	FixedGrid(GridLayout),
	Font,
	TileContainer
}

impl DecodeStrategy {
	pub fn id(&self) -> &'static str {
		match self {
			Self::FullRaw => "full_raw",
			Self::FullPacked => "full_packed",
			Self::FixedGrid(_) => "fixed_grid",
			Self::Font => "font",
			Self::TileContainer => "nvf"
		}
	}

	pub fn desc(&self) -> &'static str {
		match self {
			Self::FullRaw => "320x200 picture followed by its palette",
			Self::FullPacked => "PowerPacker compressed 320x200 picture, palette optional",
			Self::FixedGrid(_) => "equally sized frames without palette",
			Self::Font => "1 bit 8x8 glyphs",
			Self::TileContainer => "NVF tile container"
		}
	}
}

// every name appears once, so the order of the groups is the dispatch priority
static STRATEGIES: phf::Map<&'static str, DecodeStrategy> = phf_map! {
	"KARTE.DAT" => DecodeStrategy::FullRaw,
	"SKULL.NVF" => DecodeStrategy::FullRaw,

	"PLAYM_UK" => DecodeStrategy::FullPacked,
	"PLAYM_US" => DecodeStrategy::FullPacked,
	"ZUSTA_UK" => DecodeStrategy::FullPacked,
	"ZUSTA_US" => DecodeStrategy::FullPacked,
	"BUCH.DAT" => DecodeStrategy::FullPacked,
	"KCBACK.DAT" => DecodeStrategy::FullPacked,
	"KCLBACK.DAT" => DecodeStrategy::FullPacked,
	"KDBACK.DAT" => DecodeStrategy::FullPacked,
	"KDLBACK.DAT" => DecodeStrategy::FullPacked,
	"KLBACK.DAT" => DecodeStrategy::FullPacked,
	"KLLBACK.DAT" => DecodeStrategy::FullPacked,
	"KSBACK.DAT" => DecodeStrategy::FullPacked,
	"KSLBACK.DAT" => DecodeStrategy::FullPacked,

	"ICONS" => DecodeStrategy::FixedGrid(GridLayout {width: 24, height: 24, count: 55, packed: false, trailer: 0x302}),
	"BICONS" => DecodeStrategy::FixedGrid(GridLayout::plain(24, 24, 9)),
	"IN_HEADS.NVF" => DecodeStrategy::FixedGrid(GridLayout::plain(32, 32, 71)),
	"SPSTAR.NVF" => DecodeStrategy::FixedGrid(GridLayout::plain(32, 32, 3)),
	"POPUP.DAT" => DecodeStrategy::FixedGrid(GridLayout {width: 8, height: 16, count: 13, packed: true, trailer: 0}),

	"FONT6" => DecodeStrategy::Font,
	"FONT8" => DecodeStrategy::Font,

	"COMPASS" => DecodeStrategy::TileContainer,
	"TEMPICON" => DecodeStrategy::TileContainer,
	"SPLASHES.DAT" => DecodeStrategy::TileContainer
};

/// Picks the layout of an archive file by its name, `None` if it isn't a known picture.
pub fn strategy_for(name: &str) -> Option<DecodeStrategy> {
	STRATEGIES.get(name).copied()
		.or_else(|| name.ends_with("NVF").then_some(DecodeStrategy::TileContainer))
}

/// Decodes an archive entry with the given strategy.
/// The selector picks a single frame of fixed grid files and is ignored otherwise.
pub fn decode(strategy: DecodeStrategy, ctx: &DecodeContext, name: &str, data: &[u8], selector: Option<usize>) -> Result<Image> {
	debug!("decoding {name} ({} bytes) as {}", data.len(), strategy.id());
	match strategy {
		DecodeStrategy::FullRaw => full_raw::decode(data),
		DecodeStrategy::FullPacked => full_packed::decode(ctx, name, data),
		DecodeStrategy::FixedGrid(grid) => fixed_grid::decode(ctx, name, data, grid, selector),
		DecodeStrategy::Font => font::decode(data),
		DecodeStrategy::TileContainer => tile_container::decode(ctx, name, data)
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn explicit_names_win_over_the_nvf_suffix() {
		assert_eq!(strategy_for("SKULL.NVF"), Some(DecodeStrategy::FullRaw));
		assert!(matches!(strategy_for("IN_HEADS.NVF"), Some(DecodeStrategy::FixedGrid(GridLayout {width: 32, height: 32, count: 71, ..}))));
		assert_eq!(strategy_for("GUERTEL.NVF"), Some(DecodeStrategy::TileContainer));
		assert_eq!(strategy_for("COMPASS"), Some(DecodeStrategy::TileContainer));
		assert_eq!(strategy_for("FONT8"), Some(DecodeStrategy::Font));
		assert_eq!(strategy_for("KDLBACK.DAT"), Some(DecodeStrategy::FullPacked));
	}

	#[test]
	fn unknown_names_have_no_strategy() {
		assert_eq!(strategy_for("TEXT.LTX"), None);
		assert_eq!(strategy_for("nvf"), None);
	}

	#[test]
	fn codec_errors_name_the_file() {
		let codecs = Codecs {decompress: test_support::failing, ..test_support::CODECS};
		match codecs.decompress("BUCH.DAT", b"x") {
			Err(Error::Codec {name, msg}) => assert_eq!((name.as_str(), msg.as_str()), ("BUCH.DAT", "bad magic")),
			other => panic!("unexpected {other:?}")
		}
	}
}
