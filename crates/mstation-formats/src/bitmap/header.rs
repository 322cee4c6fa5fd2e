//! Bitmap asset headers and still bitmaps

use tracing::{debug, warn};

use crate::config::DecoderConfig;
use crate::error::{Error, Result};
use crate::riff::{Point, SectionReader};

use super::frame::BitmapFrame;
use super::rle::{DecodedBitmap, decode_rle};

/// How a bitmap's pixels are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CompressionType {
    /// Raw pixels after a `00 00` prefix
    Uncompressed = 0,
    /// RLE stream
    Rle = 1,
    /// Unknown scheme seen in a few titles; not decodable
    Type6 = 6,
    /// Raw pixels, second code
    UncompressedAlt = 7,
}

impl CompressionType {
    /// Look up a compression code
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Self::Uncompressed),
            1 => Some(Self::Rle),
            6 => Some(Self::Type6),
            7 => Some(Self::UncompressedAlt),
            _ => None,
        }
    }

    /// Numeric code as stored in the header
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Whether the pixels are stored raw
    pub fn is_uncompressed(self) -> bool {
        matches!(self, Self::Uncompressed | Self::UncompressedAlt)
    }
}

/// Convert a datum value that must be a non-negative size
pub(crate) fn to_size(value: i64, what: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::DimensionMismatch(format!("{what} is negative: {value}")))
}

/// Header that precedes every bitmap payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    /// Size of the header in bytes, as stored
    pub header_size: i64,
    /// Width and height
    pub dimensions: Point,
    /// Storage scheme of the pixels
    pub compression: CompressionType,
    /// Width-like field that is usually a few pixels off the true width
    ///
    /// For some uncompressed bitmaps it is the real stride.
    pub secondary_width: i64,
}

impl BitmapHeader {
    /// Read the header datums
    pub fn read(sections: &mut SectionReader<'_>) -> Result<Self> {
        let header_size = sections.read_integer()?;
        let dimensions = sections.read_point()?;
        let code = sections.read_integer()?;
        let compression = u16::try_from(code)
            .ok()
            .and_then(CompressionType::from_code)
            .ok_or(Error::UnsupportedCompression(code))?;
        let secondary_width = sections.read_integer()?;

        debug!(
            width = dimensions.x,
            height = dimensions.y,
            ?compression,
            secondary_width,
            "bitmap header"
        );
        Ok(Self {
            header_size,
            dimensions,
            compression,
            secondary_width,
        })
    }

    /// Declared width
    pub fn width(&self) -> Result<usize> {
        to_size(self.dimensions.x.into(), "bitmap width")
    }

    /// Declared height
    pub fn height(&self) -> Result<usize> {
        to_size(self.dimensions.y.into(), "bitmap height")
    }
}

/// Decode raw pixels stored after a `00 00` prefix
///
/// When the pixel count disagrees with the declared width but matches the
/// header's secondary width, that width is used instead.
pub fn decode_uncompressed(
    payload: &[u8],
    header: &BitmapHeader,
    config: &DecoderConfig,
) -> Result<DecodedBitmap> {
    let Some(pixels) = payload.strip_prefix(&[0, 0]) else {
        return Err(Error::malformed(
            0,
            "uncompressed bitmap does not start with 00 00",
        ));
    };
    if pixels.len() > config.max_canvas_bytes {
        return Err(Error::DimensionMismatch(format!(
            "{} raw pixels exceed limit of {} bytes",
            pixels.len(),
            config.max_canvas_bytes
        )));
    }

    let height = header.height()?;
    let declared = header.width()?;
    let width = if declared.checked_mul(height) == Some(pixels.len()) {
        declared
    } else {
        match usize::try_from(header.secondary_width) {
            Ok(secondary) if secondary.checked_mul(height) == Some(pixels.len()) => {
                warn!(
                    declared,
                    secondary, "uncompressed bitmap width corrected from header"
                );
                secondary
            }
            _ => {
                return Err(Error::DimensionMismatch(format!(
                    "{} raw pixels do not fill a {declared}x{height} bitmap",
                    pixels.len()
                )));
            }
        }
    };

    Ok(DecodedBitmap {
        width,
        height,
        pixels: pixels.to_vec(),
        regions: Vec::new(),
        mask: None,
    })
}

/// A still bitmap: header plus the payload bytes that follow it
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a> {
    /// Parsed header
    pub header: BitmapHeader,
    /// Compressed or raw pixel bytes
    pub payload: &'a [u8],
}

impl<'a> Bitmap<'a> {
    /// Read the header and take the rest of the section as payload
    pub fn read(sections: &mut SectionReader<'a>) -> Result<Self> {
        let header = BitmapHeader::read(sections)?;
        Ok(Self {
            header,
            payload: sections.remaining_payload(),
        })
    }

    /// Decode the pixels
    pub fn decode(&self, config: &DecoderConfig) -> Result<DecodedBitmap> {
        match self.header.compression {
            CompressionType::Rle => {
                let frame = BitmapFrame::new(self.header.width()?, self.header.height()?);
                decode_rle(self.payload, &frame, None, config)
            }
            CompressionType::Uncompressed | CompressionType::UncompressedAlt => {
                decode_uncompressed(self.payload, &self.header, config)
            }
            CompressionType::Type6 => Err(Error::UnsupportedCompression(
                i64::from(CompressionType::Type6.code()),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::riff::datum::tests::{point_datum, u16_datum};
    use pretty_assertions::assert_eq;

    /// Encode bitmap header datums
    pub(crate) fn header_datums(width: i16, height: i16, compression: u16, secondary: u16) -> Vec<u8> {
        let mut out = u16_datum(0x24);
        out.extend(point_datum(width, height));
        out.extend(u16_datum(compression));
        out.extend(u16_datum(secondary));
        out
    }

    #[test]
    fn test_read_header() {
        let data = header_datums(320, 200, 1, 322);
        let header = BitmapHeader::read(&mut SectionReader::new(&data)).unwrap();
        assert_eq!(header.dimensions, Point { x: 320, y: 200 });
        assert_eq!(header.compression, CompressionType::Rle);
        assert_eq!(header.secondary_width, 322);
        assert_eq!(header.width().unwrap(), 320);
    }

    #[test]
    fn test_unknown_compression_code() {
        let data = header_datums(4, 4, 3, 4);
        assert!(matches!(
            BitmapHeader::read(&mut SectionReader::new(&data)),
            Err(Error::UnsupportedCompression(3))
        ));
    }

    #[test]
    fn test_wide_compression_code_reported_whole() {
        let mut data = u16_datum(0x24);
        data.extend(point_datum(4, 4));
        // u32 datum holding 0x0001_0001, which must not read back as RLE.
        data.extend_from_slice(&[0x04, 0x00, 0x01, 0x00, 0x01, 0x00]);
        data.extend(u16_datum(4));
        assert!(matches!(
            BitmapHeader::read(&mut SectionReader::new(&data)),
            Err(Error::UnsupportedCompression(65_537))
        ));
    }

    #[test]
    fn test_rle_bitmap() {
        let mut data = header_datums(4, 1, 1, 4);
        data.extend_from_slice(&[0x00, 0x00, 0x04, 0x2A, 0x00, 0x01]);
        let mut sections = SectionReader::new(&data);
        let bitmap = Bitmap::read(&mut sections).unwrap();
        assert!(sections.is_at_end());

        let decoded = bitmap.decode(&DecoderConfig::default()).unwrap();
        assert_eq!(decoded.pixels, vec![0x2A; 4]);
    }

    #[test]
    fn test_uncompressed_bitmap() {
        let mut data = header_datums(2, 2, 0, 2);
        data.extend_from_slice(&[0x00, 0x00, 1, 2, 3, 4]);
        let bitmap = Bitmap::read(&mut SectionReader::new(&data)).unwrap();
        let decoded = bitmap.decode(&DecoderConfig::default()).unwrap();
        assert_eq!(decoded.width, 2);
        assert_eq!(decoded.pixels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_uncompressed_width_correction() {
        let mut data = header_datums(2, 2, 7, 3);
        data.extend_from_slice(&[0x00, 0x00, 1, 2, 3, 4, 5, 6]);
        let bitmap = Bitmap::read(&mut SectionReader::new(&data)).unwrap();
        let decoded = bitmap.decode(&DecoderConfig::default()).unwrap();
        assert_eq!(decoded.width, 3);
        assert_eq!(decoded.height, 2);
    }

    #[test]
    fn test_uncompressed_size_mismatch() {
        let mut data = header_datums(2, 2, 0, 2);
        data.extend_from_slice(&[0x00, 0x00, 1, 2, 3]);
        let bitmap = Bitmap::read(&mut SectionReader::new(&data)).unwrap();
        assert!(matches!(
            bitmap.decode(&DecoderConfig::default()),
            Err(Error::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_uncompressed_needs_prefix() {
        let mut data = header_datums(1, 1, 0, 1);
        data.extend_from_slice(&[0x01, 0x00, 0x05]);
        let bitmap = Bitmap::read(&mut SectionReader::new(&data)).unwrap();
        assert!(matches!(
            bitmap.decode(&DecoderConfig::default()),
            Err(Error::MalformedStream { offset: 0, .. })
        ));
    }

    #[test]
    fn test_type6_not_decodable() {
        let mut data = header_datums(1, 1, 6, 1);
        data.extend_from_slice(&[0x00, 0x00, 0x05]);
        let bitmap = Bitmap::read(&mut SectionReader::new(&data)).unwrap();
        assert_eq!(bitmap.header.compression, CompressionType::Type6);
        assert!(matches!(
            bitmap.decode(&DecoderConfig::default()),
            Err(Error::UnsupportedCompression(6))
        ));
    }
}
