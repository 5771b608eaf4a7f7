//! Reads the data files of Das Schwarze Auge: Die Schicksalsklinge.
//!
//! The game keeps its graphics, dialogues and texts in `SCHICK.DAT`, an archive without a
//! header of its own. The names of its entries, the palettes and the travel tables live in
//! the data segment of `SCHICKM.EXE`, which is navigated with a symbol listing.

pub mod byte_slice;
pub mod file_data;
pub mod error;
pub mod text;
pub mod symbols;
pub mod variables;
pub mod palette;
pub mod archive;
pub mod image;
pub mod image_formats;
pub mod tables;
pub mod dialogue;
pub mod config;
mod reader;

pub use error::{Error, Result};
pub use config::Config;
pub use file_data::FileData;
pub use crate::image::{Frame, Image, PaletteSource};
pub use image_formats::{strategy_for, Codecs, DecodeStrategy, RawTile, TileSet};
pub use reader::Reader;
