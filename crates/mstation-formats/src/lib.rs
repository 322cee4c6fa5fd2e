//! Decoders for Media Station multimedia titles
//!
#![allow(clippy::cast_possible_wrap)] // Intentional for binary operations
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
//! Media Station titles store their assets in RIFF-like data files: each file
//! holds one or more subfiles, each subfile a list of tagged chunks, and each
//! chunk a run of typed datums optionally followed by a media payload. This
//! crate walks that container and decodes the two media codecs found in it.
//!
//! # Components
//!
//! - **[`cursor`]**: bounds-checked reads over an in-memory buffer
//! - **[`riff`]**: data files, subfiles, chunks, datums and sections
//! - **[`bitmap`]**: RLE and raw 8-bit bitmaps, movie frames and keyframe
//!   compositing
//! - **[`audio`]**: 4-bit ADPCM and raw PCM sounds
//!
//! # Design
//!
//! - Everything operates on caller-owned byte slices; nothing touches the
//!   filesystem.
//! - No read or write ever leaves its buffer. Failures come back as
//!   [`Error`] values and never panic.
//! - Decode calls share no mutable state, so independent assets can be decoded
//!   on separate threads. A keyframe buffer may be shared read-only between
//!   them.
//! - Format variants that differ between engine generations are selected
//!   through [`DecoderConfig`].

#![warn(missing_docs)]

pub mod audio;
pub mod bitmap;
pub mod config;
pub mod cursor;
pub mod error;
pub mod riff;

pub use config::DecoderConfig;
pub use cursor::ByteCursor;
pub use error::{Error, Result};
