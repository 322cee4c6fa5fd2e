//! Typed reads over the metadata sections of a chunk

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};

use super::FourCc;
use super::datum::{BoundingBox, Datum, DatumValue, Point};

/// Reader over a run of datums
///
/// Sections carry no framing of their own beyond what the datums say: a
/// section is introduced by a section-type datum and ends either at a
/// sentinel datum or after a byte length given up front. Whatever follows
/// the metadata (compressed bitmap or audio bytes) is taken with
/// [`SectionReader::remaining_payload`].
#[derive(Debug, Clone)]
pub struct SectionReader<'a> {
    cursor: ByteCursor<'a>,
}

impl<'a> SectionReader<'a> {
    /// Read sections from the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(data),
        }
    }

    /// Offset of the next datum within the section bytes
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Whether every byte has been consumed
    pub fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Type code of the next datum, without consuming it
    pub fn peek_type_code(&self) -> Result<u16> {
        self.cursor.clone().read_u16()
    }

    /// Read the next datum whatever its type
    pub fn read_datum(&mut self) -> Result<Datum> {
        Datum::read(&mut self.cursor)
    }

    /// Read the next datum and extract a value of the expected family
    ///
    /// Nothing is consumed when the datum is of another family.
    fn read_as<T>(
        &mut self,
        expected: &'static str,
        extract: impl FnOnce(DatumValue) -> Option<T>,
    ) -> Result<T> {
        let mut lookahead = self.cursor.clone();
        let datum = Datum::read(&mut lookahead)?;
        let found = datum.kind.code();
        match extract(datum.value) {
            Some(value) => {
                self.cursor = lookahead;
                Ok(value)
            }
            None => Err(Error::UnexpectedDatumType {
                expected,
                found,
                offset: datum.offset,
            }),
        }
    }

    /// Read an unsigned 8-bit datum
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_as("u8", |v| match v {
            DatumValue::U8(v) => Some(v),
            _ => None,
        })
    }

    /// Read an unsigned 16-bit datum
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_as("u16", |v| match v {
            DatumValue::U16(v) => Some(v),
            _ => None,
        })
    }

    /// Read a signed 16-bit datum
    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_as("i16", |v| match v {
            DatumValue::I16(v) => Some(v),
            _ => None,
        })
    }

    /// Read an unsigned 32-bit datum
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_as("u32", |v| match v {
            DatumValue::U32(v) => Some(v),
            _ => None,
        })
    }

    /// Read an integer datum of any width
    ///
    /// Several header fields switch width between titles, so most callers
    /// want this rather than a fixed-width read.
    pub fn read_integer(&mut self) -> Result<i64> {
        self.read_as("integer", |v| v.as_integer())
    }

    /// Read a 64-bit float datum
    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_as("f64", |v| match v {
            DatumValue::F64(v) => Some(v),
            _ => None,
        })
    }

    /// Read a string or filename datum
    pub fn read_string(&mut self) -> Result<String> {
        self.read_as("string", |v| match v {
            DatumValue::String(v) => Some(v),
            _ => None,
        })
    }

    /// Read a point datum
    pub fn read_point(&mut self) -> Result<Point> {
        self.read_as("point", |v| match v {
            DatumValue::Point(v) => Some(v),
            _ => None,
        })
    }

    /// Read a bounding box datum
    pub fn read_bounding_box(&mut self) -> Result<BoundingBox> {
        self.read_as("bounding box", |v| match v {
            DatumValue::BoundingBox(v) => Some(v),
            _ => None,
        })
    }

    /// Read a polygon datum
    pub fn read_polygon(&mut self) -> Result<Vec<Point>> {
        self.read_as("polygon", |v| match v {
            DatumValue::Polygon(v) => Some(v),
            _ => None,
        })
    }

    /// Read a chunk reference datum
    pub fn read_reference(&mut self) -> Result<FourCc> {
        self.read_as("reference", |v| match v {
            DatumValue::Reference(v) => Some(v),
            _ => None,
        })
    }

    /// Read a palette datum
    pub fn read_palette(&mut self) -> Result<Vec<u8>> {
        self.read_as("palette", |v| match v {
            DatumValue::Palette(v) => Some(v),
            _ => None,
        })
    }

    /// Read the 16-bit section type that introduces a section
    pub fn read_section_type(&mut self) -> Result<u16> {
        self.read_u16()
    }

    /// Collect datums until an integer datum equal to `sentinel`
    ///
    /// The sentinel itself is consumed but not returned.
    pub fn read_until_sentinel(&mut self, sentinel: i64) -> Result<Vec<Datum>> {
        let mut datums = Vec::new();
        loop {
            let datum = self.read_datum()?;
            if datum.value.as_integer() == Some(sentinel) {
                return Ok(datums);
            }
            datums.push(datum);
        }
    }

    /// Split off a section whose byte length is given by a leading integer datum
    pub fn length_prefixed(&mut self) -> Result<SectionReader<'a>> {
        let offset = self.cursor.position();
        let length = self.read_integer()?;
        let length = usize::try_from(length)
            .map_err(|_| Error::malformed(offset, format!("negative section length {length}")))?;
        let bytes = self.cursor.read_bytes(length)?;
        Ok(SectionReader::new(bytes))
    }

    /// Consume and return everything after the metadata
    pub fn remaining_payload(&mut self) -> &'a [u8] {
        let data = self.cursor.data();
        let rest = &data[self.cursor.position()..];
        // Cannot fail: exactly the remaining byte count.
        let _ = self.cursor.advance(rest.len());
        rest
    }
}
