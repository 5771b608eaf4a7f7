use std::{fs::File, io::BufReader, path::Path};
use serde::Deserialize;
use crate::{error::Result, palette::PaletteLayout, variables::DEFAULT_DATA_SEGMENT_BASE};

/// Settings of a `Reader`, every field falls back to the values of the German 3.02 release.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Where the data segment starts inside the executable.
	pub data_segment_base: u32,
	pub name_list_var: String,
	pub routes_var: String,
	pub travel_events_var: String,
	pub palettes: PaletteLayout,
	pub text_table: String,
	/// Index of the first town name in the text table.
	pub town_text_base: usize,
	pub head_file: String
}

impl Default for Config {
	fn default() -> Self {
		Self {
			data_segment_base: DEFAULT_DATA_SEGMENT_BASE,
			name_list_var: "SCHICK_DAT_FNAMES".into(),
			routes_var: "ROUTES_TAB".into(),
			travel_events_var: "TEVENTS_TAB".into(),
			palettes: PaletteLayout::default(),
			text_table: "TEXT.LTX".into(),
			town_text_base: 235,
			head_file: "IN_HEADS.NVF".into()
		}
	}
}

impl Config {
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let file = File::open(path)?;
		Ok(serde_json::from_reader(BufReader::new(file))?)
	}
}
