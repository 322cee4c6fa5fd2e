//! Indexed-color bitmap decoding
//!
//! Bitmaps are 8 bits per pixel, one palette index per byte. Most are RLE
//! compressed; a few are stored raw. Movie frames additionally carry a
//! placement on the movie canvas and may be composited onto a keyframe,
//! using the transparency runs recorded while decoding.
//!
//! The decoder never grows a buffer mid-decode: the canvas is allocated once
//! from validated dimensions and every write is bounds-checked against it.
//!
//! # Example
//!
//! ```
//! use mstation_formats::DecoderConfig;
//! use mstation_formats::bitmap::{BitmapFrame, decode_rle};
//!
//! let stream = [0x00, 0x00, 0x03, 0x2A, 0x00, 0x01];
//! let bitmap = decode_rle(&stream, &BitmapFrame::new(4, 1), None, &DecoderConfig::default())?;
//! assert_eq!(bitmap.pixels, [0x2A, 0x2A, 0x2A, 0x00]);
//! # Ok::<(), mstation_formats::Error>(())
//! ```

mod composite;
mod frame;
mod header;
mod movie;
mod rle;
mod variant;

pub use composite::{composite, transparency_mask};
pub use frame::{BitmapFrame, TransparencyRegion};
pub use header::{Bitmap, BitmapHeader, CompressionType, decode_uncompressed};
pub use movie::{FooterLayout, MovieFrame, MovieFrameFooter, MovieFrameHeader};
pub use rle::{DecodedBitmap, decode_rle};
pub use variant::BitmapVariant;
