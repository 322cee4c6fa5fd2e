//! Run-length decoding of 8-bit indexed bitmaps
//!
//! The stream is close to Microsoft RLE8 with a few changes:
//!
//! | Bytes              | Meaning                                       |
//! |--------------------|-----------------------------------------------|
//! | `00 00`            | end of line                                   |
//! | `00 01`            | end of image                                  |
//! | `00 02`            | open a transparency run                       |
//! | `00 03 dx dy`      | move right `dx` columns and down `dy` rows    |
//! | `00 n` (`n >= 4`)  | `n` literal pixels, then pad to an even offset |
//! | `n c` (`n >= 1`)   | `n` copies of color `c`                       |
//!
//! A transparency run is closed by the next repeated-color run, whose
//! length becomes the length of the region. Runs still open at the end of a
//! line are dropped.
//!
//! Runs never cross the right edge of the frame, and once the frame's last
//! row has ended only end-of-line and end-of-image codes may follow.

use tracing::{debug, warn};

use crate::config::DecoderConfig;
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};

use super::composite::{composite, transparency_mask};
use super::frame::{BitmapFrame, TransparencyRegion};
use super::variant::BitmapVariant;

/// A decoded bitmap canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBitmap {
    /// Canvas width in pixels
    pub width: usize,
    /// Canvas height in pixels
    pub height: usize,
    /// One palette index per pixel, row-major, `width * height` bytes
    pub pixels: Vec<u8>,
    /// Transparency runs in the order they were closed
    pub regions: Vec<TransparencyRegion>,
    /// Per-pixel transparency (1 = transparent), for [`BitmapVariant::Mask`]
    ///
    /// Built from the pixels as decoded, before any keyframe compositing.
    pub mask: Option<Vec<u8>>,
}

/// Pixels and regions from the raw RLE pass, before compositing
#[derive(Debug)]
struct RawFrame {
    pixels: Vec<u8>,
    regions: Vec<TransparencyRegion>,
    ignored_markers: usize,
}

/// Whether a stream holds nothing beyond its two-byte prefix
fn is_blank(data: &[u8]) -> bool {
    data.len() <= 2
}

struct RleDecoder<'a> {
    cursor: ByteCursor<'a>,
    frame: &'a BitmapFrame,
    pixels: Vec<u8>,
    regions: Vec<TransparencyRegion>,
    track_regions: bool,
    ignored_markers: usize,
}

impl<'a> RleDecoder<'a> {
    fn new(data: &'a [u8], frame: &'a BitmapFrame, canvas_len: usize, track_regions: bool) -> Self {
        Self {
            cursor: ByteCursor::new(data),
            frame,
            pixels: vec![0; canvas_len],
            regions: Vec::new(),
            track_regions,
            ignored_markers: 0,
        }
    }

    fn byte(&mut self, what: &str) -> Result<u8> {
        let offset = self.cursor.position();
        self.cursor
            .read_u8()
            .map_err(|_| Error::malformed(offset, format!("stream ends inside {what}")))
    }

    /// Output slice for a run of `len` pixels at canvas (`row`, `column`)
    fn target(&mut self, row: usize, column: usize, len: usize, at: usize) -> Result<&mut [u8]> {
        let last_row = self.frame.origin_y + self.frame.frame_height;
        if row >= last_row {
            return Err(Error::malformed(
                at,
                format!(
                    "row {} is past the frame's {} rows",
                    row - self.frame.origin_y,
                    self.frame.frame_height
                ),
            ));
        }
        let right_edge = self.frame.origin_x + self.frame.frame_width;
        if column.saturating_add(len) > right_edge {
            return Err(Error::malformed(
                at,
                format!(
                    "run of {len} pixels at column {} crosses the frame's right edge at {}",
                    column - self.frame.origin_x,
                    self.frame.frame_width
                ),
            ));
        }
        let range = TransparencyRegion {
            row,
            start_column: column,
            run_length: len,
        }
        .span(self.frame.full_width)
        .filter(|range| range.end <= self.pixels.len())
        .ok_or_else(|| {
            Error::malformed(
                at,
                format!("run of {len} pixels at row {row} column {column} leaves the canvas"),
            )
        })?;
        Ok(&mut self.pixels[range])
    }

    /// Check what follows the frame's last row
    ///
    /// Only end-of-line and end-of-image codes may follow; anything that
    /// would draw is a row the frame does not have.
    fn finish(&mut self) -> Result<()> {
        while !self.cursor.is_at_end() {
            let at = self.cursor.position();
            if self.byte("opcode")? == 0 {
                match self.byte("control code")? {
                    0x00 => continue,
                    0x01 => break,
                    _ => {}
                }
            }
            return Err(Error::malformed(
                at,
                format!("opcode after the last of {} rows", self.frame.frame_height),
            ));
        }
        Ok(())
    }

    fn run(mut self) -> Result<RawFrame> {
        if self.cursor.data().starts_with(&[0, 0]) {
            self.cursor.advance(2)?;
        }

        let last_row = self.frame.origin_y + self.frame.frame_height;
        let mut row = self.frame.origin_y;
        'rows: while row < last_row {
            let mut column = self.frame.origin_x;
            let mut open_run: Option<(usize, usize)> = None;

            loop {
                if self.cursor.is_at_end() {
                    debug!(row, "bitmap stream ended without an end-of-image marker");
                    break 'rows;
                }
                let at = self.cursor.position();
                let op = self.byte("opcode")?;

                if op != 0 {
                    let color = self.byte("pixel run")?;
                    let len = usize::from(op);
                    self.target(row, column, len, at)?.fill(color);
                    if let Some((start_row, start_column)) = open_run.take() {
                        self.regions.push(TransparencyRegion {
                            row: start_row,
                            start_column,
                            run_length: len,
                        });
                    }
                    column += len;
                    continue;
                }

                match self.byte("control code")? {
                    0x00 => break,
                    0x01 => break 'rows,
                    0x02 => {
                        if self.track_regions {
                            open_run = Some((row, column));
                        } else {
                            self.ignored_markers += 1;
                        }
                    }
                    0x03 => {
                        let dx = self.byte("reposition")?;
                        let dy = self.byte("reposition")?;
                        column += usize::from(dx);
                        row += usize::from(dy);
                    }
                    n => {
                        let len = usize::from(n);
                        let offset = self.cursor.position();
                        let literal = self.cursor.read_bytes(len).map_err(|_| {
                            Error::malformed(offset, format!("literal run of {len} pixels truncated"))
                        })?;
                        self.target(row, column, len, at)?.copy_from_slice(literal);
                        column += len;
                        if self.cursor.position() % 2 == 1 && !self.cursor.is_at_end() {
                            self.cursor.advance(1)?;
                        }
                    }
                }
            }

            row += 1;
        }

        if row >= last_row {
            self.finish()?;
        }

        Ok(RawFrame {
            pixels: self.pixels,
            regions: self.regions,
            ignored_markers: self.ignored_markers,
        })
    }
}

fn decompress(
    data: &[u8],
    frame: &BitmapFrame,
    canvas_len: usize,
    track_regions: bool,
) -> Result<RawFrame> {
    if is_blank(data) {
        return Ok(RawFrame {
            pixels: vec![0; canvas_len],
            regions: Vec::new(),
            ignored_markers: 0,
        });
    }
    RleDecoder::new(data, frame, canvas_len, track_regions).run()
}

/// Decode an RLE bitmap stream onto its canvas
///
/// `keyframe`, when given, must be a previously decoded canvas of exactly
/// `full_width * full_height` bytes. What happens to transparency markers
/// and to the keyframe depends on `config.bitmap_variant`.
///
/// The frame is validated before any byte of `data` is read.
///
/// # Errors
///
/// - [`Error::DimensionMismatch`] if the frame does not fit its canvas, the
///   canvas exceeds `config.max_canvas_bytes`, or the keyframe has the wrong
///   size
/// - [`Error::MalformedStream`] if an opcode would write outside the frame or
///   the stream ends in the middle of an opcode
pub fn decode_rle(
    data: &[u8],
    frame: &BitmapFrame,
    keyframe: Option<&[u8]>,
    config: &DecoderConfig,
) -> Result<DecodedBitmap> {
    let canvas_len = frame.validate(config.max_canvas_bytes)?;
    if let Some(keyframe) = keyframe
        && keyframe.len() != canvas_len
    {
        return Err(Error::DimensionMismatch(format!(
            "keyframe holds {} bytes but the canvas needs {canvas_len}",
            keyframe.len()
        )));
    }

    let variant = config.bitmap_variant;
    let keyframe = match keyframe {
        Some(_) if !variant.composites() => {
            warn!(?variant, "keyframe supplied to a non-compositing variant, ignoring it");
            None
        }
        keyframe => keyframe,
    };

    let raw = decompress(data, frame, canvas_len, variant.tracks_regions(keyframe.is_some()))?;
    if raw.ignored_markers > 0 && variant == BitmapVariant::KeyframeComposite {
        warn!(
            markers = raw.ignored_markers,
            "transparency markers ignored: no keyframe supplied"
        );
    }

    let mask = variant
        .produces_mask()
        .then(|| transparency_mask(&raw.pixels, &raw.regions, frame.full_width));

    let mut pixels = raw.pixels;
    if let Some(keyframe) = keyframe
        && !is_blank(data)
    {
        composite(&mut pixels, &raw.regions, keyframe, frame.full_width)?;
    }

    debug!(
        width = frame.full_width,
        height = frame.full_height,
        regions = raw.regions.len(),
        composited = keyframe.is_some(),
        "decoded RLE bitmap"
    );
    Ok(DecodedBitmap {
        width: frame.full_width,
        height: frame.full_height,
        pixels,
        regions: raw.regions,
        mask,
    })
}
