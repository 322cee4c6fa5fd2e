//! Container parser for Media Station data files
//!
//! Data files are *almost* RIFF: an optional `II\0\0` header is followed by
//! one or more subfiles, each a RIFF document whose `LIST` chunk holds the
//! data chunks. Metadata chunks (`igod`) hold sections of datums; asset
//! chunks (`aXXX`) hold sections followed by a raw bitmap or audio payload.
//!
//! # Walking a file
//!
//! ```
//! use mstation_formats::riff::{ChunkKind, DataFile};
//!
//! fn count_assets(bytes: &[u8]) -> mstation_formats::Result<usize> {
//!     let file = DataFile::parse(bytes, true)?;
//!     let mut assets = 0;
//!     for subfile in file.subfiles() {
//!         for chunk in subfile?.chunks() {
//!             if let ChunkKind::Asset(_) = chunk?.kind() {
//!                 assets += 1;
//!             }
//!         }
//!     }
//!     Ok(assets)
//! }
//! ```
//!
//! All parsing borrows from the caller's buffer; nothing is copied until a
//! datum value or decoded media buffer is produced.

mod chunk;
mod data_file;
pub mod datum;
mod fourcc;
pub mod header;
mod section;
mod subfile;

pub use chunk::{Chunk, ChunkKind};
pub use data_file::{DataFile, SubFiles};
pub use datum::{BoundingBox, Datum, DatumType, DatumValue, PALETTE_SIZE, Point};
pub use fourcc::FourCc;
pub use header::{ChunkHeader, DataFileHeader};
pub use section::SectionReader;
pub use subfile::{Chunks, SubFile};
