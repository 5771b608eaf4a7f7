use crate::error::{Error, Result};

macro_rules! impl_byte_readers {
	($($t:ty),*) => {paste::paste! {$(
		fn [<read_ $t _field>](&self, offset: usize, name: &str) -> Result<$t> {
			self.[<get_ $t _at>](offset).ok_or_else(|| truncated(name, offset, size_of::<$t>()))
		}
		fn [<get_ $t _at>](&self, offset: usize) -> Option<$t> {
			let end = offset.checked_add(size_of::<$t>())?;
			Some(<$t>::from_le_bytes(self.get(offset..end)?.try_into().ok()?))
		}
	)*}}
}

#[cold]
fn truncated(name: &str, offset: usize, len: usize) -> Error {
	Error::Truncated {what: name.into(), offset, len}
}

/// Bounds-checked little endian field reads, the only byte order the DOS formats use.
pub trait ByteSlice {
	fn read_bytes_field(&self, offset: usize, len: usize, name: &str) -> Result<&[u8]>;
	fn read_u8_field(&self, offset: usize, name: &str) -> Result<u8>;
	fn read_u16_field(&self, offset: usize, name: &str) -> Result<u16>;
	fn read_u32_field(&self, offset: usize, name: &str) -> Result<u32>;
	fn read_i16_field(&self, offset: usize, name: &str) -> Result<i16>;
	fn get_u8_at(&self, offset: usize) -> Option<u8>;
	fn get_u16_at(&self, offset: usize) -> Option<u16>;
	fn get_u32_at(&self, offset: usize) -> Option<u32>;
	fn get_i16_at(&self, offset: usize) -> Option<i16>;
}

impl ByteSlice for [u8] {
	fn read_bytes_field(&self, offset: usize, len: usize, name: &str) -> Result<&[u8]> {
		offset.checked_add(len)
			.and_then(|end| self.get(offset..end))
			.ok_or_else(|| truncated(name, offset, len))
	}

	impl_byte_readers!(u8, u16, u32, i16);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reads_little_endian_fields() {
		let buf = [0x34u8, 0x12, 0xff, 0xff, 0x01, 0x00, 0x00, 0x80];
		assert_eq!(buf.read_u16_field(0, "word").unwrap(), 0x1234);
		assert_eq!(buf.read_i16_field(2, "signed").unwrap(), -1);
		assert_eq!(buf.read_u32_field(4, "dword").unwrap(), 0x8000_0001);
		assert_eq!(buf.get_u8_at(7), Some(0x80));
	}

	#[test]
	fn out_of_bounds_names_the_field() {
		let buf = [0u8; 3];
		match buf.read_u32_field(0, "entry offset") {
			Err(Error::Truncated {what, offset: 0, len: 4}) => assert_eq!(what, "entry offset"),
			other => panic!("unexpected {other:?}")
		}
		assert_eq!(buf.get_u16_at(2), None);
		assert!(buf.read_bytes_field(usize::MAX, 2, "overflow").is_err());
	}
}
