//! `.TLK` dialogue files.
//!
//! Layout: `<u32 state table end><u16 speaker count>`, then the speakers (38 bytes each),
//! the dialogue states (8 bytes each) up to the state table end, and finally the text pool.
//! The state table end counts from the start of the speaker table.

use phf::phf_set;
use crate::{byte_slice::ByteSlice, error::{Error, Result}, text::{decode_cp850, split_text_pool}};

pub const HEADER_SIZE: usize = 6;
pub const SPEAKER_SIZE: usize = 38;
pub const STATE_SIZE: usize = 8;
pub const TITLE_SIZE: usize = 30;
pub const TEXT_POOL_SIZE: usize = 64000;
/// Option fields of randomized dialogues count in steps of 4 states.
pub const RANDOMIZED_OPTION_SCALE: u16 = 4;

// smiths, merchants and innkeepers pick their lines at random
static RANDOMIZED: phf::Set<&'static str> = phf_set! {
	"SCHMIED.TLK",
	"GHANDEL.TLK",
	"KHANDEL.TLK",
	"WHANDEL.TLK",
	"HERBERG.TLK"
};

pub fn is_randomized(name: &str) -> bool {
	RANDOMIZED.contains(name)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Speaker {
	/// Index of the speaker's first state.
	pub state_table_offset_units: u32,
	pub dialogue_entry_text_ref: u32,
	pub display_title: String,
	pub head_portrait_id: u16
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DialogueState {
	pub text_ref: i16,
	pub options: [u16; 3],
	pub answers: [u8; 3]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogueFile {
	pub is_randomized: bool,
	pub speakers: Vec<Speaker>,
	pub states: Vec<DialogueState>,
	pub text_pool: Vec<String>
}

fn decode_speaker(record: &[u8]) -> Result<Speaker> {
	let title = record.read_bytes_field(6, TITLE_SIZE, "speaker title")?;
	Ok(Speaker {
		state_table_offset_units: record.read_u32_field(0, "state offset")? / STATE_SIZE as u32,
		dialogue_entry_text_ref: record.read_u16_field(4, "text reference")? as u32,
		display_title: decode_cp850(title).trim_matches(|c: char| c == '\0' || c.is_whitespace()).to_string(),
		head_portrait_id: record.read_u16_field(6 + TITLE_SIZE, "head id")?
	})
}

fn decode_state(record: &[u8], randomized: bool) -> Result<DialogueState> {
	let scale = if randomized {RANDOMIZED_OPTION_SCALE} else {1};
	let option = |i: usize| record.read_u8_field(2 + i, "option").map(|x| x as u16 * scale);
	let answer = |i: usize| record.read_u8_field(5 + i, "answer");
	Ok(DialogueState {
		text_ref: record.read_i16_field(0, "state text")?,
		options: [option(0)?, option(1)?, option(2)?],
		answers: [answer(0)?, answer(1)?, answer(2)?]
	})
}

/// Decodes a dialogue file, `name` decides whether its options are randomized.
pub fn decode(name: &str, data: &[u8]) -> Result<DialogueFile> {
	let malformed = |reason: String| Error::MalformedDialogue {name: name.into(), reason};
	let state_end = data.read_u32_field(0, "dialogue header").map_err(|e| malformed(e.to_string()))? as usize;
	let speaker_count = data.read_u16_field(4, "dialogue header").map_err(|e| malformed(e.to_string()))? as usize;
	let speakers_len = speaker_count * SPEAKER_SIZE;
	let states_len = state_end.checked_sub(speakers_len)
		.ok_or_else(|| malformed(format!("state table ends at {state_end:#x}, inside the {speaker_count} speakers")))?;

	let speaker_bytes = data.read_bytes_field(HEADER_SIZE, speakers_len, "speaker table").map_err(|e| malformed(e.to_string()))?;
	let speakers = speaker_bytes.chunks_exact(SPEAKER_SIZE).map(decode_speaker).collect::<Result<Vec<_>>>()?;

	let states_start = HEADER_SIZE + speakers_len;
	let states_end = (states_start + states_len).min(data.len());
	let randomized = is_randomized(name);
	let states = data[states_start..states_end].chunks_exact(STATE_SIZE)
		.map(|record| decode_state(record, randomized))
		.collect::<Result<Vec<_>>>()?;

	let pool_end = (states_end + TEXT_POOL_SIZE).min(data.len());
	Ok(DialogueFile {
		is_randomized: randomized,
		speakers,
		states,
		text_pool: split_text_pool(&data[states_end..pool_end])
	})
}
