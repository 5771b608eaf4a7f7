use std::{fs::File, io::{BufReader, Read, Seek, SeekFrom}, path::PathBuf, sync::{Arc, Mutex}};
use crate::error::{Error, Result};

type SharedFile = Arc<Mutex<Option<BufReader<File>>>>;

/// A random access byte source: either fully loaded, or a window of a file that is read on demand.
/// Windows of the same file share one handle, opened on the first read.
pub enum FileData {
	Memory {
		buf: Box<[u8]>
	},
	Stream {
		path: PathBuf,
		file: SharedFile,
		start: usize,
		size: usize
	}
}

impl From<Box<[u8]>> for FileData {
	fn from(buf: Box<[u8]>) -> Self {
		Self::Memory {buf}
	}
}

impl From<Vec<u8>> for FileData {
	fn from(buf: Vec<u8>) -> Self {
		Self::Memory {buf: buf.into_boxed_slice()}
	}
}

impl FileData {
	/// Opens a file lazily, only its size is queried up front.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let size = std::fs::metadata(&path)?.len() as usize;
		Ok(Self::Stream {path, file: SharedFile::default(), start: 0, size})
	}

	pub fn len(&self) -> usize {
		match self {
			Self::Memory {buf} => buf.len(),
			Self::Stream {size, ..} => *size
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn subfile(&self, sub_start: usize, sub_size: usize) -> Result<FileData> {
		let in_bounds = sub_start.checked_add(sub_size).is_some_and(|end| end <= self.len());
		if !in_bounds {
			return Err(Error::Truncated {what: "subfile".into(), offset: sub_start, len: sub_size});
		}
		match self {
			Self::Memory {buf} => Ok(Self::Memory {buf: buf[sub_start..sub_start + sub_size].into()}),
			Self::Stream {path, file, start, ..} => Ok(Self::Stream {
				path: path.clone(),
				file: file.clone(),
				start: *start + sub_start,
				size: sub_size
			})
		}
	}

	pub fn read_chunk_exact(&self, out_buf: &mut [u8], chunk_start: usize) -> Result<()> {
		let in_bounds = chunk_start.checked_add(out_buf.len()).is_some_and(|end| end <= self.len());
		if !in_bounds {
			return Err(Error::Truncated {what: "chunk".into(), offset: chunk_start, len: out_buf.len()});
		}
		match self {
			Self::Memory {buf} => out_buf.copy_from_slice(&buf[chunk_start..chunk_start + out_buf.len()]),
			Self::Stream {path, file, start, ..} => {
				let mut file = file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
				if file.is_none() {
					*file = Some(BufReader::new(File::open(path)?));
				}
				if let Some(file) = file.as_mut() {
					file.seek(SeekFrom::Start((*start + chunk_start) as u64))?;
					file.read_exact(out_buf)?;
				}
			}
		}
		Ok(())
	}

	/// Reads `len` bytes at `offset`, naming the field in the error if the source is too short.
	pub fn read_range(&self, offset: usize, len: usize, what: &str) -> Result<Box<[u8]>> {
		let mut buf = vec![0u8; len].into_boxed_slice();
		self.read_chunk_exact(&mut buf, offset).map_err(|e| match e {
			Error::Truncated {offset, len, ..} => Error::Truncated {what: what.into(), offset, len},
			e => e
		})?;
		Ok(buf)
	}

	/// Reads up to `len` bytes at `offset`, stopping early at the end of the source.
	pub fn read_up_to(&self, offset: usize, len: usize) -> Result<Box<[u8]>> {
		let offset = offset.min(self.len());
		let available = (self.len() - offset).min(len);
		self.read_range(offset, available, "tail")
	}

	pub fn read_all(&self) -> Result<Box<[u8]>> {
		match self {
			Self::Memory {buf} => Ok(buf.clone()),
			Self::Stream {size, ..} => self.read_range(0, *size, "stream")
		}
	}
}

impl Clone for FileData {
	fn clone(&self) -> Self {
		match self {
			Self::Memory {buf} => Self::Memory {buf: buf.clone()},
			Self::Stream {path, file, start, size} => Self::Stream {
				path: path.clone(),
				file: file.clone(),
				start: *start,
				size: *size
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn subfile_reads_are_relative() {
		let data = FileData::from((0u8..32).collect::<Vec<_>>());
		let sub = data.subfile(8, 8).unwrap();
		assert_eq!(sub.len(), 8);
		assert_eq!(&*sub.read_range(2, 3, "bytes").unwrap(), &[10, 11, 12]);
		assert!(data.subfile(30, 8).is_err());
	}

	#[test]
	fn read_up_to_clamps_to_the_end() {
		let data = FileData::from(vec![1u8, 2, 3, 4]);
		assert_eq!(&*data.read_up_to(2, 100).unwrap(), &[3, 4]);
		assert!(data.read_up_to(9, 4).unwrap().is_empty());
	}

	#[test]
	fn stream_reads_seek_into_the_file() {
		let path = std::env::temp_dir().join(format!("schickfile-stream-{}.bin", std::process::id()));
		std::fs::write(&path, (0u8..64).collect::<Vec<_>>()).unwrap();
		let data = FileData::open(&path).unwrap();
		assert_eq!(data.len(), 64);
		let sub = data.subfile(16, 16).unwrap();
		assert_eq!(&*sub.read_range(4, 2, "pair").unwrap(), &[20, 21]);
		match sub.read_range(15, 2, "past end") {
			Err(Error::Truncated {what, ..}) => assert_eq!(what, "past end"),
			other => panic!("unexpected {other:?}")
		}
		std::fs::remove_file(&path).unwrap();
	}

	#[test]
	fn windows_share_the_file_handle() {
		let path = std::env::temp_dir().join(format!("schickfile-shared-{}.bin", std::process::id()));
		std::fs::write(&path, (0u8..32).collect::<Vec<_>>()).unwrap();
		let data = FileData::open(&path).unwrap();
		let first = data.subfile(4, 4).unwrap();
		let second = data.subfile(8, 8).unwrap().subfile(2, 2).unwrap();
		assert_eq!(&*first.read_all().unwrap(), &[4, 5, 6, 7]);
		std::fs::remove_file(&path).unwrap();
		// the handle opened by the first read is still usable after the file is gone
		assert_eq!(&*second.read_all().unwrap(), &[10, 11]);
		match (&data, &second) {
			(FileData::Stream {file: a, ..}, FileData::Stream {file: b, ..}) => {
				assert!(Arc::ptr_eq(a, b));
				assert!(a.lock().unwrap().is_some());
			}
			_ => panic!("expected streams")
		}
	}
}
