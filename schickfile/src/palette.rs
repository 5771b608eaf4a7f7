use bytemuck::{Pod, Zeroable};
use log::warn;
use serde::Deserialize;
use crate::{error::Result, variables::{VarRef, VariableStore}};

pub const PALETTE_LEN: usize = 256;

#[repr(C)]
#[derive(Zeroable, Pod, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8
}

impl Rgb {
	pub const BLACK: Rgb = Rgb {r: 0, g: 0, b: 0};
	pub const WHITE: Rgb = Rgb {r: 255, g: 255, b: 255};

	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self {r, g, b}
	}

	pub fn scaled(self, factor: u8) -> Self {
		Self {r: self.r.saturating_mul(factor), g: self.g.saturating_mul(factor), b: self.b.saturating_mul(factor)}
	}
}

/// Splits raw palette bytes into RGB triples, a trailing partial triple is dropped.
pub fn parse_palette(bytes: &[u8]) -> Vec<Rgb> {
	bytes.chunks_exact(3).map(|x| Rgb {r: x[0], g: x[1], b: x[2]}).collect()
}

/// Always exactly 256 colors, anything never written stays black.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette(Box<[Rgb; PALETTE_LEN]>);

impl Default for Palette {
	fn default() -> Self {
		Self(Box::new([Rgb::BLACK; PALETTE_LEN]))
	}
}

impl Palette {
	/// Pads with black or truncates to 256 entries.
	pub fn from_colors(colors: &[Rgb]) -> Self {
		let mut palette = Self::default();
		let len = colors.len().min(PALETTE_LEN);
		palette.0[..len].copy_from_slice(&colors[..len]);
		palette
	}

	pub fn colors(&self) -> &[Rgb; PALETTE_LEN] {
		&self.0
	}

	pub fn get(&self, index: u8) -> Rgb {
		self.0[index as usize]
	}

	pub fn as_bytes(&self) -> &[u8] {
		bytemuck::cast_slice(&self.0[..])
	}

	/// Writes up to `width` colors starting at `start`, returns how many were written.
	pub fn fill(&mut self, start: usize, width: usize, colors: &[Rgb]) -> usize {
		let end = start.saturating_add(width).min(PALETTE_LEN);
		let count = end.saturating_sub(start).min(colors.len());
		if count > 0 {
			self.0[start..start + count].copy_from_slice(&colors[..count]);
		}
		count
	}
}

/// One palette fragment from the data segment and where it lands in the composite.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Fragment {
	pub start: usize,
	pub width: usize,
	pub source: VarRef
}

impl Fragment {
	pub fn named(start: usize, width: usize, name: &str) -> Self {
		Self {start, width, source: VarRef::Name(name.into())}
	}

	pub fn at(start: usize, width: usize, offset: u32) -> Self {
		Self {start, width, source: VarRef::Offset(offset)}
	}
}

/// Which data segment palettes make up the two composites.
///
/// It's still unclear which palette the game uses for graphics that don't come with one.
/// These are the palettes stored in the data segment, placed at the slots the game loads
/// them to. Several offsets have no confirmed purpose. The 0x80 block repeats the general
/// palette, and the combat composite only overrides 0x14 entries of it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PaletteLayout {
	pub standard: Vec<Fragment>,
	/// Applied on top of `standard`.
	pub combat: Vec<Fragment>
}

impl Default for PaletteLayout {
	fn default() -> Self {
		Self {
			standard: vec![
				Fragment::named(0x00, 0x20, "STATUSPAGE_PALETTE"),
				Fragment::at(0x20, 0x20, 0xb2b1),
				Fragment::at(0x40, 0x20, 0xb251),
				Fragment::at(0x60, 0x20, 0x2723),
				Fragment::at(0x80, 0x20, 0xb2b1),
				Fragment::at(0xa0, 0x20, 0x27e3),
				Fragment::at(0xc8, 0x03, 0xb248),
				Fragment::at(0xd8, 0x08, 0xb230),
				Fragment::at(0xe0, 0x20, 0x27e3)
			],
			combat: vec![
				Fragment::at(0x00, 0x20, 0x2783),
				Fragment::at(0x80, 0x14, 0x7d0e)
			]
		}
	}
}

/// The two composites used for images that carry no palette of their own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palettes {
	pub standard: Palette,
	pub combat: Palette
}

fn apply(palette: &mut Palette, fragments: &[Fragment], vars: &VariableStore) -> Result<()> {
	for fragment in fragments {
		let colors = parse_palette(&vars.bytes(&fragment.source)?);
		let written = palette.fill(fragment.start, fragment.width, &colors);
		if written < fragment.width {
			warn!("palette fragment {:?} filled only {written} of {} entries at {:#04x}", fragment.source, fragment.width, fragment.start);
		}
	}
	Ok(())
}

impl Palettes {
	pub fn assemble(vars: &VariableStore, layout: &PaletteLayout) -> Result<Self> {
		let mut standard = Palette::default();
		apply(&mut standard, &layout.standard, vars)?;
		let mut combat = standard.clone();
		apply(&mut combat, &layout.combat, vars)?;
		Ok(Self {standard, combat})
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use crate::symbols::{decl, VariableTable};
	use super::*;

	fn store() -> VariableStore {
		let lines = [
			decl(true, "BASE_PAL", 0x0000, "unsigned char[6]", ""),
			decl(false, "FIGHT_PAL", 0x0006, "unsigned char[3]", ""),
			decl(false, "SHORT_PAL", 0x0009, "unsigned char[3]", "")
		];
		let table = VariableTable::parse(lines.iter().map(String::as_str)).unwrap();
		let image = vec![10, 11, 12, 20, 21, 22, 30, 31, 32, 40, 41, 42];
		VariableStore::new(image.into(), 0, table)
	}

	#[test]
	fn fragments_land_in_their_sub_ranges() {
		let layout = PaletteLayout {
			standard: vec![Fragment::named(0x10, 2, "BASE_PAL"), Fragment::at(0xfe, 4, 9)],
			combat: vec![Fragment::at(0x11, 1, 6)]
		};
		let palettes = Palettes::assemble(&store(), &layout).unwrap();
		let standard = palettes.standard.colors();
		assert_eq!(standard.len(), PALETTE_LEN);
		assert_eq!(standard[0x0f], Rgb::BLACK);
		assert_eq!(&standard[0x10..0x12], &[Rgb::new(10, 11, 12), Rgb::new(20, 21, 22)]);
		assert_eq!(standard[0x12], Rgb::BLACK);
		assert_eq!(standard[0xfe], Rgb::new(40, 41, 42));
		assert_eq!(standard[0xff], Rgb::BLACK);

		let combat = palettes.combat.colors();
		assert_eq!(combat[0x10], Rgb::new(10, 11, 12));
		assert_eq!(combat[0x11], Rgb::new(30, 31, 32));
		assert_eq!(combat.iter().filter(|c| **c != Rgb::BLACK).count(), 3);
	}

	#[test]
	fn wide_fragments_are_clipped_to_their_width() {
		let layout = PaletteLayout {standard: vec![Fragment::named(0, 1, "BASE_PAL")], combat: Vec::new()};
		let palettes = Palettes::assemble(&store(), &layout).unwrap();
		assert_eq!(palettes.standard.get(1), Rgb::BLACK);
		assert_eq!(palettes.standard, palettes.combat);
	}

	#[test]
	fn missing_fragment_is_an_error() {
		let layout = PaletteLayout {standard: vec![Fragment::at(0, 1, 0x7d0e)], combat: Vec::new()};
		assert!(Palettes::assemble(&store(), &layout).is_err());
	}

	#[test]
	fn default_layout_reads_nine_sources() {
		let layout = PaletteLayout::default();
		let mut sources: Vec<_> = layout.standard.iter().chain(&layout.combat).map(|f| format!("{:?}", f.source)).collect();
		sources.sort();
		sources.dedup();
		assert_eq!(sources.len(), 9);
	}

	#[test]
	fn from_colors_pads_and_truncates() {
		let padded = Palette::from_colors(&[Rgb::WHITE]);
		assert_eq!(padded.get(0), Rgb::WHITE);
		assert_eq!(padded.get(255), Rgb::BLACK);
		let long = vec![Rgb::WHITE; 300];
		assert_eq!(Palette::from_colors(&long).as_bytes().len(), 768);
		assert_eq!(Rgb::new(7, 40, 0).scaled(8), Rgb::new(56, 255, 0));
	}
}
