use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("malformed symbol line {line_no} ({reason}): {line:?}")]
	MalformedSymbolLine {line_no: usize, line: String, reason: &'static str},

	#[error("unknown size for type {kind:?} of variable {name}")]
	UnknownTypeSize {name: String, kind: String},

	#[error("variable not found: {0}")]
	VariableNotFound(String),

	#[error("offsets decrease after variable {name}")]
	NonMonotonicOffsets {name: String},

	#[error("archive file not found: {0}")]
	ArchiveFileNotFound(String),

	#[error("could not read {what}: {len} bytes at {offset:#x}")]
	Truncated {what: String, offset: usize, len: usize},

	#[error("{what} #{index} out of range, there are {len}")]
	IndexOutOfRange {what: &'static str, index: usize, len: usize},

	#[error("malformed dialogue file {name}: {reason}")]
	MalformedDialogue {name: String, reason: String},

	#[error("codec failed on {name}: {msg}")]
	Codec {name: String, msg: String},

	#[error("PNG encoding failed: {0}")]
	Encoding(#[from] png::EncodingError),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("invalid config: {0}")]
	Config(#[from] serde_json::Error)
}

pub type Result<T> = std::result::Result<T, Error>;
