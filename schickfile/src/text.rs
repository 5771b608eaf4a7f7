use oem_cp::{code_table::DECODING_TABLE_CP850, decode_string_complete_table};

pub fn decode_cp850(bytes: &[u8]) -> String {
	decode_string_complete_table(bytes, &DECODING_TABLE_CP850)
}

/// Splits a NUL separated string pool the way the game's text files are laid out.
/// Carriage returns become newlines and every entry is trimmed.
pub fn split_text_pool(bytes: &[u8]) -> Vec<String> {
	bytes.split(|&b| b == 0)
		.map(|s| decode_cp850(s).replace('\r', "\n").trim().to_string())
		.collect()
}
