use log::warn;
use crate::{byte_slice::ByteSlice, error::{Error, Result}, file_data::FileData, text::decode_cp850};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
	pub name: String,
	pub start: u32,
	pub end: u32
}

impl ArchiveEntry {
	pub fn len(&self) -> u32 {
		self.end.saturating_sub(self.start)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// `SCHICK.DAT` has no header of its own, the names live in the executable.
/// The archive starts with one u32 offset per name plus a final end offset.
pub struct ArchiveIndex {
	data: FileData,
	entries: Box<[ArchiveEntry]>
}

/// Decodes the NUL separated name list, the list starts and ends with a separator.
pub fn parse_name_list(bytes: &[u8]) -> Vec<String> {
	let parts: Vec<&[u8]> = bytes.split(|&b| b == 0).collect();
	if parts.len() < 2 {
		return Vec::new();
	}
	parts[1..parts.len() - 1].iter()
		.map(|name| decode_cp850(name.trim_ascii()))
		.collect()
}

impl ArchiveIndex {
	pub fn new(data: FileData, names: Vec<String>) -> Result<Self> {
		let directory = data.read_range(0, (names.len() + 1) * 4, "archive directory")?;
		let mut entries = Vec::with_capacity(names.len());
		for (i, name) in names.into_iter().enumerate() {
			let start = directory.read_u32_field(i * 4, "entry start")?;
			let end = directory.read_u32_field(i * 4 + 4, "entry end")?;
			if end < start {
				warn!("archive entry {name} ends before it starts ({start:#x}..{end:#x})");
			}
			entries.push(ArchiveEntry {name, start, end});
		}
		Ok(Self {data, entries: entries.into()})
	}

	pub fn entries(&self) -> &[ArchiveEntry] {
		&self.entries
	}

	pub fn find(&self, name: &str) -> Result<&ArchiveEntry> {
		self.entries.iter().find(|e| e.name == name).ok_or_else(|| Error::ArchiveFileNotFound(name.into()))
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.iter().any(|e| e.name == name)
	}

	pub fn open(&self, name: &str) -> Result<FileData> {
		let entry = self.find(name)?;
		let len = entry.end.checked_sub(entry.start)
			.ok_or_else(|| Error::Truncated {what: name.into(), offset: entry.start as usize, len: 0})?;
		self.data.subfile(entry.start as usize, len as usize).map_err(|_| Error::Truncated {
			what: name.into(),
			offset: entry.start as usize,
			len: len as usize
		})
	}

	pub fn read(&self, name: &str) -> Result<Box<[u8]>> {
		self.open(name)?.read_all()
	}
}

#[cfg(test)]
pub(crate) fn build_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
	let mut offset = (files.len() as u32 + 1) * 4;
	let mut out = Vec::new();
	for (_, content) in files {
		out.extend(offset.to_le_bytes());
		offset += content.len() as u32;
	}
	out.extend(offset.to_le_bytes());
	for (_, content) in files {
		out.extend_from_slice(content);
	}
	out
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use super::*;

	fn index() -> ArchiveIndex {
		let files: [(&str, &[u8]); 3] = [("KARTE.DAT", b"map"), ("EMPTY", b""), ("FONT6", b"glyphs!")];
		let names = files.iter().map(|(n, _)| n.to_string()).collect();
		ArchiveIndex::new(build_archive(&files).into(), names).unwrap()
	}

	#[test]
	fn name_list_drops_outer_separators() {
		let names = parse_name_list(b"\0KARTE.DAT\0 FONT6 \0B\x9aCHER\0");
		assert_eq!(names, vec!["KARTE.DAT", "FONT6", "BÜCHER"]);
		assert!(parse_name_list(b"").is_empty());
		assert!(parse_name_list(b"\0").is_empty());
	}

	#[test]
	fn ranges_are_ascending_and_contiguous() {
		let index = index();
		let entries = index.entries();
		assert_eq!(entries[0], ArchiveEntry {name: "KARTE.DAT".into(), start: 16, end: 19});
		for pair in entries.windows(2) {
			assert!(pair[0].start <= pair[1].start);
			assert_eq!(pair[0].end, pair[1].start);
		}
		assert!(entries[1].is_empty());
	}

	#[test]
	fn reads_entries_by_name() {
		let index = index();
		assert_eq!(&*index.read("FONT6").unwrap(), b"glyphs!");
		assert_eq!(&*index.read("KARTE.DAT").unwrap(), b"map");
		assert!(index.read("EMPTY").unwrap().is_empty());
		assert!(index.contains("FONT6"));
		assert!(matches!(index.read("font6"), Err(Error::ArchiveFileNotFound(n)) if n == "font6"));
	}

	#[test]
	fn short_directory_is_an_error() {
		let names = vec!["A".to_string(), "B".to_string()];
		assert!(matches!(ArchiveIndex::new(vec![0u8; 8].into(), names), Err(Error::Truncated {..})));
	}
}
