use std::{fs, path::Path};
use log::debug;
use once_cell::sync::OnceCell;
use crate::{
	archive::{parse_name_list, ArchiveIndex},
	config::Config,
	dialogue::{self, DialogueFile},
	error::{Error, Result},
	file_data::FileData,
	image::{Frame, Image},
	image_formats::{self, strategy_for, Codecs, DecodeContext, DecodeStrategy},
	palette::Palettes,
	symbols::VariableTable,
	tables::{decode_routes, decode_travel_events, RouteRecord, TravelEventRecord},
	text::split_text_pool,
	variables::VariableStore
};

/// Everything that can be pulled out of `SCHICKM.EXE` and `SCHICK.DAT`.
///
/// The symbol table, the archive index and both palettes are built up front,
/// the record tables and the text table on first use.
pub struct Reader {
	vars: VariableStore,
	archive: ArchiveIndex,
	palettes: Palettes,
	codecs: Codecs,
	config: Config,
	routes: OnceCell<Box<[RouteRecord]>>,
	travel_events: OnceCell<Box<[TravelEventRecord]>>,
	texts: OnceCell<Vec<String>>
}

fn nth<'a, T>(items: &'a [T], index: usize, what: &'static str) -> Result<&'a T> {
	items.get(index).ok_or(Error::IndexOutOfRange {what, index, len: items.len()})
}

impl Reader {
	/// `exe` is the memory snapshot holding the data segment, `dat` the archive, `symbols` the listing.
	pub fn new(exe: FileData, dat: FileData, symbols: &str, codecs: Codecs, config: Config) -> Result<Self> {
		let table = VariableTable::parse_str(symbols)?;
		debug!("{} variables, data segment ends at {:#06x}", table.len(), table.end_cursor());
		let vars = VariableStore::new(exe, config.data_segment_base, table);
		let names = parse_name_list(&vars.bytes_by_name(&config.name_list_var)?);
		let archive = ArchiveIndex::new(dat, names)?;
		debug!("{} archive entries", archive.entries().len());
		let palettes = Palettes::assemble(&vars, &config.palettes)?;
		Ok(Self {
			vars,
			archive,
			palettes,
			codecs,
			config,
			routes: OnceCell::new(),
			travel_events: OnceCell::new(),
			texts: OnceCell::new()
		})
	}

	pub fn open(exe: impl AsRef<Path>, dat: impl AsRef<Path>, symbols: impl AsRef<Path>, codecs: Codecs, config: Config) -> Result<Self> {
		let listing = fs::read(symbols)?;
		let listing = String::from_utf8_lossy(&listing);
		Self::new(FileData::open(exe.as_ref())?, FileData::open(dat.as_ref())?, &listing, codecs, config)
	}

	pub fn variables(&self) -> &VariableStore {
		&self.vars
	}

	pub fn archive(&self) -> &ArchiveIndex {
		&self.archive
	}

	pub fn palettes(&self) -> &Palettes {
		&self.palettes
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn read_archive_file(&self, name: &str) -> Result<Box<[u8]>> {
		self.archive.read(name)
	}

	/// Decodes the pictures of an archive entry, names with no known layout give an empty image.
	/// `selector` picks a single frame of multi frame files.
	pub fn read_images(&self, name: &str, selector: Option<usize>) -> Result<Image> {
		let Some(strategy) = strategy_for(name) else {
			debug!("{name} is not a known picture");
			return Ok(Image::default());
		};
		let data = self.archive.read(name)?;
		let ctx = DecodeContext {palettes: &self.palettes, codecs: &self.codecs};
		image_formats::decode(strategy, &ctx, name, &data, selector)
	}

	/// Portrait `no` of the heads shown in dialogues.
	pub fn in_head(&self, no: usize) -> Result<Frame> {
		let image = self.read_images(&self.config.head_file, Some(no))?;
		image.frames.into_vec().into_iter().next().ok_or_else(|| {
			let len = match strategy_for(&self.config.head_file) {
				Some(DecodeStrategy::FixedGrid(grid)) => grid.count,
				_ => 0
			};
			Error::IndexOutOfRange {what: "head", index: no, len}
		})
	}

	pub fn read_dialogue(&self, name: &str) -> Result<DialogueFile> {
		dialogue::decode(name, &self.archive.read(name)?)
	}

	/// Decodes an archive entry as a NUL separated string table.
	pub fn read_text_table(&self, name: &str) -> Result<Vec<String>> {
		Ok(split_text_pool(&self.archive.read(name)?))
	}

	pub fn routes(&self) -> Result<&[RouteRecord]> {
		let routes = self.routes.get_or_try_init(|| {
			debug!("decoding {}", self.config.routes_var);
			decode_routes(&self.vars.bytes_by_name(&self.config.routes_var)?)
		})?;
		Ok(&routes[..])
	}

	pub fn route(&self, no: usize) -> Result<&RouteRecord> {
		nth(self.routes()?, no, "route")
	}

	pub fn travel_events(&self) -> Result<&[TravelEventRecord]> {
		let events = self.travel_events.get_or_try_init(|| {
			debug!("decoding {}", self.config.travel_events_var);
			decode_travel_events(&self.vars.bytes_by_name(&self.config.travel_events_var)?)
		})?;
		Ok(&events[..])
	}

	pub fn travel_event(&self, no: usize) -> Result<&TravelEventRecord> {
		nth(self.travel_events()?, no, "travel event")
	}

	pub fn texts(&self) -> Result<&[String]> {
		let texts = self.texts.get_or_try_init(|| self.read_text_table(&self.config.text_table))?;
		Ok(&texts[..])
	}

	pub fn text(&self, no: usize) -> Result<&str> {
		nth(self.texts()?, no, "text").map(String::as_str)
	}

	pub fn town_name(&self, no: usize) -> Result<&str> {
		self.text(self.config.town_text_base + no)
	}
}
