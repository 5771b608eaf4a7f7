use crate::{error::{Error, Result}, file_data::FileData, symbols::{SymbolEntry, VariableTable}};

/// Default load offset of the data segment inside `SCHICKM.EXE`.
pub const DEFAULT_DATA_SEGMENT_BASE: u32 = 0x173c0;

/// How a variable is addressed when it has no trustworthy name.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarRef {
	Name(String),
	Offset(u32)
}

impl From<&str> for VarRef {
	fn from(name: &str) -> Self {
		Self::Name(name.into())
	}
}

impl From<u32> for VarRef {
	fn from(offset: u32) -> Self {
		Self::Offset(offset)
	}
}

/// Resolves variables of the symbol table to bytes of a memory snapshot.
pub struct VariableStore {
	image: FileData,
	base: u32,
	table: VariableTable
}

impl VariableStore {
	pub fn new(image: FileData, base: u32, table: VariableTable) -> Self {
		Self {image, base, table}
	}

	pub fn table(&self) -> &VariableTable {
		&self.table
	}

	pub fn resolve(&self, var: &VarRef) -> Result<usize> {
		match var {
			VarRef::Name(name) => self.table.index_of_name(name).ok_or_else(|| Error::VariableNotFound(name.clone())),
			VarRef::Offset(offset) => self.table.index_of_offset(*offset).ok_or_else(|| Error::VariableNotFound(format!("{offset:#06x}")))
		}
	}

	pub fn entry(&self, var: &VarRef) -> Result<&SymbolEntry> {
		Ok(&self.table.entries()[self.resolve(var)?])
	}

	pub fn bytes_at(&self, idx: usize) -> Result<Box<[u8]>> {
		let entry = self.table.entries().get(idx).ok_or_else(|| Error::VariableNotFound(format!("#{idx}")))?;
		let len = self.table.byte_len(idx)?;
		self.image.read_range(self.base as usize + entry.offset as usize, len as usize, &entry.name)
	}

	pub fn bytes(&self, var: &VarRef) -> Result<Box<[u8]>> {
		self.bytes_at(self.resolve(var)?)
	}

	pub fn bytes_by_name(&self, name: &str) -> Result<Box<[u8]>> {
		self.bytes(&VarRef::Name(name.into()))
	}

	pub fn bytes_by_offset(&self, offset: u32) -> Result<Box<[u8]>> {
		self.bytes(&VarRef::Offset(offset))
	}
}
