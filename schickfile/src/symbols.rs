//! Reconstructs the data segment layout from the `symbols.h` listing.
//!
//! A declaration looks like
//! `#define ROUTES_TAB (0x9dc6) /*   unsigned char[531]; route table */`.
//! The listing is machine generated, so the fields are cut out at fixed positions
//! relative to the opening parenthesis instead of being tokenized.
//! Unknown regions are written as `// ?<size>` and only move the cursor.

use log::warn;
use phf::phf_map;
use crate::error::{Error, Result};

const GUARD_TOKEN: &str = "SYMBOLS_H";
const GAP_PREFIX: &str = "// ?";
const HEX_START: usize = 3;
const HEX_END: usize = 7;
const DESCRIPTOR_START: usize = 14;
const COMMENT_CLOSER_LEN: usize = 2;

static KIND_SIZES: phf::Map<&'static str, u32> = phf_map! {
	"char" => 1,
	"signed char" => 1,
	"unsigned char" => 1,
	"Bit8s" => 1,
	"Bit8u" => 1,
	"short" => 2,
	"signed short" => 2,
	"unsigned short" => 2,
	"Bit16s" => 2,
	"Bit16u" => 2,
	"long" => 4,
	"signed long" => 4,
	"unsigned long" => 4,
	"Bit32s" => 4,
	"Bit32u" => 4,
	"RealPt" => 4
};

/// Size in bytes of a kind descriptor, `T[N]` arrays included.
pub fn kind_size(kind: &str) -> Option<u32> {
	if let Some((elem, count)) = kind.strip_suffix(']').and_then(|k| k.split_once('[')) {
		return kind_size(elem.trim())?.checked_mul(count.trim().parse().ok()?);
	}
	if kind.ends_with('*') {
		// far pointer
		return Some(4);
	}
	KIND_SIZES.get(kind).copied()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
	Confirmed,
	Unconfirmed
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolEntry {
	pub name: String,
	pub offset: u32,
	pub size_hint: u32,
	pub kind: String,
	pub comment: String,
	pub marker: Marker
}

/// A declared offset that disagrees with the running cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OffsetMismatch {
	pub name: String,
	pub declared: u32,
	pub computed: u32
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableTable {
	entries: Vec<SymbolEntry>,
	mismatches: Vec<OffsetMismatch>,
	end_cursor: u32
}

struct ListingParser {
	cursor: u32,
	mismatches: Vec<OffsetMismatch>
}

fn malformed(line_no: usize, line: &str, reason: &'static str) -> Error {
	Error::MalformedSymbolLine {line_no, line: line.into(), reason}
}

impl ListingParser {
	fn advance(&mut self, by: u32, line_no: usize, line: &str) -> Result<()> {
		self.cursor = self.cursor.checked_add(by).ok_or_else(|| malformed(line_no, line, "cursor overflow"))?;
		Ok(())
	}

	fn parse_line(&mut self, line_no: usize, line: &str) -> Result<Option<SymbolEntry>> {
		if !(line.starts_with("//") || line.starts_with("#d")) || line.contains(GUARD_TOKEN) {
			return Ok(None);
		}
		if let Some(gap) = line.strip_prefix(GAP_PREFIX) {
			let size: u32 = gap.trim().parse().map_err(|_| malformed(line_no, line, "gap size is not a number"))?;
			let entry = SymbolEntry {
				name: format!("{size} unknown bytes"),
				offset: self.cursor,
				size_hint: size,
				kind: String::new(),
				comment: String::new(),
				marker: Marker::Unconfirmed
			};
			self.advance(size, line_no, line)?;
			return Ok(Some(entry));
		}

		let marker = if line.starts_with('#') {Marker::Confirmed} else {Marker::Unconfirmed};
		let body = line.strip_prefix("#define ")
			.or_else(|| line.strip_prefix("//define "))
			.unwrap_or(line)
			.trim_end();
		let pos = body.find('(').ok_or_else(|| malformed(line_no, line, "no offset field"))?;
		let hex = body.get(pos + HEX_START..pos + HEX_END).ok_or_else(|| malformed(line_no, line, "offset field cut short"))?;
		let offset = u32::from_str_radix(hex, 16).map_err(|_| malformed(line_no, line, "offset is not hexadecimal"))?;
		let descriptor = body.len().checked_sub(COMMENT_CLOSER_LEN)
			.and_then(|end| body.get(pos + DESCRIPTOR_START..end))
			.unwrap_or("");
		let (kind, comment) = descriptor.split_once(';').unwrap_or((descriptor, ""));
		let entry = SymbolEntry {
			name: body[..pos].trim().into(),
			offset,
			size_hint: 0,
			kind: kind.trim().into(),
			comment: comment.trim().into(),
			marker
		};

		if entry.offset != self.cursor {
			warn!("{}: declared offset {:#06x} != computed {:#06x}", entry.name, entry.offset, self.cursor);
			self.mismatches.push(OffsetMismatch {name: entry.name.clone(), declared: entry.offset, computed: self.cursor});
		}
		let size_hint = kind_size(&entry.kind).ok_or_else(|| Error::UnknownTypeSize {name: entry.name.clone(), kind: entry.kind.clone()})?;
		self.advance(size_hint, line_no, line)?;
		Ok(Some(SymbolEntry {size_hint, ..entry}))
	}
}

impl VariableTable {
	pub fn parse<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self> {
		let mut parser = ListingParser {cursor: 0, mismatches: Vec::new()};
		let mut entries = Vec::new();
		for (i, line) in lines.into_iter().enumerate() {
			if let Some(entry) = parser.parse_line(i + 1, line)? {
				entries.push(entry);
			}
		}
		Ok(Self {entries, mismatches: parser.mismatches, end_cursor: parser.cursor})
	}

	pub fn parse_str(listing: &str) -> Result<Self> {
		Self::parse(listing.lines())
	}

	pub fn entries(&self) -> &[SymbolEntry] {
		&self.entries
	}

	pub fn mismatches(&self) -> &[OffsetMismatch] {
		&self.mismatches
	}

	/// The cursor after the last entry, i.e. the sum of every inferred size.
	pub fn end_cursor(&self) -> u32 {
		self.end_cursor
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn index_of_name(&self, name: &str) -> Option<usize> {
		self.entries.iter().position(|e| e.name == name)
	}

	pub fn index_of_offset(&self, offset: u32) -> Option<usize> {
		self.entries.iter().position(|e| e.offset == offset)
	}

	pub fn lookup_by_name(&self, name: &str) -> Result<&SymbolEntry> {
		self.index_of_name(name).map(|i| &self.entries[i]).ok_or_else(|| Error::VariableNotFound(name.into()))
	}

	pub fn lookup_by_offset(&self, offset: u32) -> Result<&SymbolEntry> {
		self.index_of_offset(offset).map(|i| &self.entries[i]).ok_or_else(|| Error::VariableNotFound(format!("{offset:#06x}")))
	}

	/// The distance to the next entry, or the declared size for the last one.
	pub fn byte_len(&self, idx: usize) -> Result<u32> {
		let entry = self.entries.get(idx).ok_or_else(|| Error::VariableNotFound(format!("#{idx}")))?;
		match self.entries.get(idx + 1) {
			Some(next) => next.offset.checked_sub(entry.offset).ok_or_else(|| Error::NonMonotonicOffsets {name: entry.name.clone()}),
			None => Ok(entry.size_hint)
		}
	}
}

#[cfg(test)]
pub(crate) fn decl(confirmed: bool, name: &str, offset: u32, kind: &str, comment: &str) -> String {
	let prefix = if confirmed {"#"} else {"//"};
	format!("{prefix}define {name} (0x{offset:04x}) /*   {kind}; {comment} */")
}
