//! Movie frames
//!
//! A movie stores each frame as a bitmap with a slightly longer header and,
//! in a separate metadata chunk, a footer carrying the frame's timing and
//! its position inside the movie canvas. Frames are usually smaller than the
//! canvas and are decoded against the most recent keyframe.

use tracing::debug;

use crate::config::DecoderConfig;
use crate::error::{Error, Result};
use crate::riff::SectionReader;

use super::frame::BitmapFrame;
use super::header::{BitmapHeader, CompressionType, decode_uncompressed, to_size};
use super::rle::{DecodedBitmap, decode_rle};

/// Header in front of a movie frame's pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovieFrameHeader {
    /// Common bitmap header
    pub bitmap: BitmapHeader,
    /// Frame number
    pub index: i64,
    /// When the keyframe this frame belongs to stops applying, in ms
    pub keyframe_end: i64,
}

impl MovieFrameHeader {
    /// Read the bitmap header followed by the frame fields
    pub fn read(sections: &mut SectionReader<'_>) -> Result<Self> {
        let bitmap = BitmapHeader::read(sections)?;
        let index = sections.read_integer()?;
        let keyframe_end = sections.read_integer()?;
        Ok(Self {
            bitmap,
            index,
            keyframe_end,
        })
    }
}

/// Field order of a [`MovieFrameFooter`]
///
/// Titles built with first-generation engines and engines up to 3.2 use the
/// compact layout; later engines add several fields of unknown meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FooterLayout {
    /// Nine fields
    Compact,
    /// Thirteen fields
    #[default]
    Extended,
}

#[derive(Clone, Copy)]
enum Field {
    Unknown,
    Start,
    End,
    Left,
    Top,
    Index,
}

const COMPACT_FIELDS: [Field; 9] = [
    Field::Unknown,
    Field::Unknown,
    Field::Start,
    Field::End,
    Field::Left,
    Field::Top,
    Field::Unknown,
    Field::Unknown,
    Field::Index,
];

const EXTENDED_FIELDS: [Field; 13] = [
    Field::Unknown,
    Field::Unknown,
    Field::Unknown,
    Field::Start,
    Field::End,
    Field::Left,
    Field::Top,
    Field::Unknown,
    Field::Unknown,
    Field::Unknown,
    Field::Index,
    Field::Unknown,
    Field::Unknown,
];

impl FooterLayout {
    fn fields(self) -> &'static [Field] {
        match self {
            Self::Compact => &COMPACT_FIELDS,
            Self::Extended => &EXTENDED_FIELDS,
        }
    }
}

/// Timing and placement stored after a movie frame
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MovieFrameFooter {
    /// Layout the footer was read with
    pub layout: FooterLayout,
    /// Display start, in ms
    pub start: i64,
    /// Display end, in ms
    pub end: i64,
    /// Column of the frame's left edge in the movie canvas
    pub left: i64,
    /// Row of the frame's top edge in the movie canvas
    pub top: i64,
    /// Frame number, matching [`MovieFrameHeader::index`]
    pub index: i64,
    /// Fields of unknown meaning, in stored order
    pub unknown: Vec<i64>,
}

impl MovieFrameFooter {
    /// Read a footer laid out as `layout`
    pub fn read(sections: &mut SectionReader<'_>, layout: FooterLayout) -> Result<Self> {
        let mut footer = Self {
            layout,
            ..Self::default()
        };
        for field in layout.fields() {
            let value = sections.read_integer()?;
            match field {
                Field::Unknown => footer.unknown.push(value),
                Field::Start => footer.start = value,
                Field::End => footer.end = value,
                Field::Left => footer.left = value,
                Field::Top => footer.top = value,
                Field::Index => footer.index = value,
            }
        }
        Ok(footer)
    }
}

/// A movie frame: header plus pixel payload
#[derive(Debug, Clone, Copy)]
pub struct MovieFrame<'a> {
    /// Parsed header
    pub header: MovieFrameHeader,
    /// Compressed or raw pixel bytes
    pub payload: &'a [u8],
}

impl<'a> MovieFrame<'a> {
    /// Read the header and take the rest of the section as payload
    pub fn read(sections: &mut SectionReader<'a>) -> Result<Self> {
        let header = MovieFrameHeader::read(sections)?;
        Ok(Self {
            header,
            payload: sections.remaining_payload(),
        })
    }

    /// Placement of this frame on a `full_width` x `full_height` canvas
    ///
    /// Without a footer the frame sits at the top-left corner.
    pub fn placement(
        &self,
        footer: Option<&MovieFrameFooter>,
        full_width: usize,
        full_height: usize,
    ) -> Result<BitmapFrame> {
        let (left, top) = footer.map_or((0, 0), |f| (f.left, f.top));
        Ok(
            BitmapFrame::new(self.header.bitmap.width()?, self.header.bitmap.height()?)
                .with_canvas(full_width, full_height)
                .with_origin(to_size(left, "frame left")?, to_size(top, "frame top")?),
        )
    }

    /// Decode the frame onto the movie canvas
    ///
    /// `keyframe` is the decoded canvas of the keyframe currently in effect,
    /// if any.
    pub fn decode(
        &self,
        footer: Option<&MovieFrameFooter>,
        full_width: usize,
        full_height: usize,
        keyframe: Option<&[u8]>,
        config: &DecoderConfig,
    ) -> Result<DecodedBitmap> {
        let frame = self.placement(footer, full_width, full_height)?;
        debug!(index = self.header.index, ?frame, "decoding movie frame");
        match self.header.bitmap.compression {
            CompressionType::Rle => decode_rle(self.payload, &frame, keyframe, config),
            CompressionType::Uncompressed | CompressionType::UncompressedAlt => {
                frame.validate(config.max_canvas_bytes)?;
                let raw = decode_uncompressed(self.payload, &self.header.bitmap, config)?;
                // The stored stride may differ from the declared width.
                let frame = BitmapFrame::new(raw.width, raw.height)
                    .with_canvas(full_width, full_height)
                    .with_origin(frame.origin_x, frame.origin_y);
                let mut pixels = vec![0; frame.validate(config.max_canvas_bytes)?];
                if raw.width > 0 {
                    for (y, row) in raw.pixels.chunks_exact(raw.width).enumerate() {
                        let start = (frame.origin_y + y) * full_width + frame.origin_x;
                        pixels[start..start + raw.width].copy_from_slice(row);
                    }
                }
                Ok(DecodedBitmap {
                    width: full_width,
                    height: full_height,
                    pixels,
                    regions: Vec::new(),
                    mask: None,
                })
            }
            CompressionType::Type6 => Err(Error::UnsupportedCompression(
                i64::from(CompressionType::Type6.code()),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bitmap::frame::TransparencyRegion;
    use crate::bitmap::header::tests::header_datums;
    use crate::riff::datum::tests::u16_datum;
    use pretty_assertions::assert_eq;

    fn footer_datums(values: &[u16]) -> Vec<u8> {
        values.iter().flat_map(|&v| u16_datum(v)).collect()
    }

    #[test]
    fn test_compact_footer() {
        let data = footer_datums(&[1, 2, 100, 200, 5, 6, 7, 8, 3]);
        let footer =
            MovieFrameFooter::read(&mut SectionReader::new(&data), FooterLayout::Compact).unwrap();
        assert_eq!(footer.start, 100);
        assert_eq!(footer.end, 200);
        assert_eq!((footer.left, footer.top), (5, 6));
        assert_eq!(footer.index, 3);
        assert_eq!(footer.unknown, vec![1, 2, 7, 8]);
    }

    #[test]
    fn test_extended_footer() {
        let data = footer_datums(&[1, 2, 3, 100, 200, 5, 6, 7, 8, 9, 4, 10, 11]);
        let mut sections = SectionReader::new(&data);
        let footer = MovieFrameFooter::read(&mut sections, FooterLayout::Extended).unwrap();
        assert!(sections.is_at_end());
        assert_eq!(footer.start, 100);
        assert_eq!(footer.end, 200);
        assert_eq!((footer.left, footer.top), (5, 6));
        assert_eq!(footer.index, 4);
        assert_eq!(footer.unknown, vec![1, 2, 3, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_truncated_footer() {
        let data = footer_datums(&[1, 2, 3]);
        assert!(
            MovieFrameFooter::read(&mut SectionReader::new(&data), FooterLayout::Compact).is_err()
        );
    }

    fn frame_bytes(width: i16, height: i16, compression: u16, payload: &[u8]) -> Vec<u8> {
        let mut data = header_datums(width, height, compression, width as u16);
        data.extend(u16_datum(12));
        data.extend(u16_datum(1500));
        data.extend_from_slice(payload);
        data
    }

    #[test]
    fn test_frame_placed_by_footer() {
        let data = frame_bytes(2, 1, 1, &[0x00, 0x00, 0x00, 0x02, 0x02, 0x00, 0x00, 0x01]);
        let frame = MovieFrame::read(&mut SectionReader::new(&data)).unwrap();
        assert_eq!(frame.header.index, 12);
        assert_eq!(frame.header.keyframe_end, 1500);

        let footer = MovieFrameFooter {
            left: 1,
            top: 1,
            ..MovieFrameFooter::default()
        };
        let keyframe = vec![0x33; 12];
        let decoded = frame
            .decode(Some(&footer), 4, 3, Some(&keyframe), &DecoderConfig::default())
            .unwrap();
        assert_eq!(
            decoded.regions,
            vec![TransparencyRegion {
                row: 1,
                start_column: 1,
                run_length: 2
            }]
        );
        assert_eq!(decoded.pixels[5..7], [0x33, 0x33]);
        assert_eq!(decoded.pixels[0], 0);
    }

    #[test]
    fn test_frame_outside_canvas() {
        let data = frame_bytes(2, 2, 1, &[0x00, 0x00, 0x02, 0x01, 0x00, 0x01]);
        let frame = MovieFrame::read(&mut SectionReader::new(&data)).unwrap();
        let footer = MovieFrameFooter {
            left: 3,
            ..MovieFrameFooter::default()
        };
        assert!(matches!(
            frame.decode(Some(&footer), 4, 4, None, &DecoderConfig::default()),
            Err(Error::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_uncompressed_frame_placed_on_canvas() {
        let data = frame_bytes(2, 2, 0, &[0x00, 0x00, 1, 2, 3, 4]);
        let frame = MovieFrame::read(&mut SectionReader::new(&data)).unwrap();
        let footer = MovieFrameFooter {
            left: 1,
            top: 0,
            ..MovieFrameFooter::default()
        };
        let decoded = frame
            .decode(Some(&footer), 3, 2, None, &DecoderConfig::default())
            .unwrap();
        assert_eq!(decoded.pixels, vec![0, 1, 2, 0, 3, 4]);
    }
}
