//! Datums: the typed primitive values inside metadata sections
//!
//! Nearly everything in a Media Station file apart from compressed image and
//! audio data is stored as datums. A datum is a 16-bit little-endian type
//! code followed by a value whose size is implied by the code:
//!
//! ```text
//! type code
//! |     value
//! |     |
//! xx xx xx xx .. xx
//! ```
//!
//! Several families have two codes that decode identically. Which one a
//! title uses has not been tied to anything observable, so both are kept.

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};

use super::FourCc;

/// Size of a palette datum's RGB payload (256 entries, 3 bytes each)
pub const PALETTE_SIZE: usize = 768;

/// Known datum type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum DatumType {
    /// Unsigned 8-bit integer
    Uint8 = 0x0002,
    /// Unsigned 16-bit integer
    Uint16 = 0x0003,
    /// Unsigned 16-bit integer, second code
    Uint16Alt = 0x0013,
    /// Signed 16-bit integer
    Int16 = 0x0006,
    /// Signed 16-bit integer, second code
    Int16Alt = 0x0010,
    /// Unsigned 32-bit integer
    Uint32 = 0x0004,
    /// Unsigned 32-bit integer, second code
    Uint32Alt = 0x0007,
    /// 64-bit float
    Float64 = 0x0011,
    /// 64-bit float, second code
    Float64Alt = 0x0009,
    /// Length-prefixed ASCII string
    String = 0x0012,
    /// Length-prefixed ASCII filename
    Filename = 0x000a,
    /// Two-dimensional point
    Point = 0x000f,
    /// Two-dimensional point, second code
    PointAlt = 0x000e,
    /// Origin point plus dimensions point
    BoundingBox = 0x000d,
    /// Counted list of points
    Polygon = 0x001d,
    /// 768-byte RGB palette
    Palette = 0x05aa,
    /// Reference to another chunk by tag
    Reference = 0x001b,
}

impl DatumType {
    /// Map a raw type code to a known type
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0x0002 => Some(Self::Uint8),
            0x0003 => Some(Self::Uint16),
            0x0013 => Some(Self::Uint16Alt),
            0x0006 => Some(Self::Int16),
            0x0010 => Some(Self::Int16Alt),
            0x0004 => Some(Self::Uint32),
            0x0007 => Some(Self::Uint32Alt),
            0x0011 => Some(Self::Float64),
            0x0009 => Some(Self::Float64Alt),
            0x0012 => Some(Self::String),
            0x000a => Some(Self::Filename),
            0x000f => Some(Self::Point),
            0x000e => Some(Self::PointAlt),
            0x000d => Some(Self::BoundingBox),
            0x001d => Some(Self::Polygon),
            0x05aa => Some(Self::Palette),
            0x001b => Some(Self::Reference),
            _ => None,
        }
    }

    /// Raw type code
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Whether the value is an integer of any width
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Uint8
                | Self::Uint16
                | Self::Uint16Alt
                | Self::Int16
                | Self::Int16Alt
                | Self::Uint32
                | Self::Uint32Alt
        )
    }
}

/// Two-dimensional point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    /// Horizontal coordinate
    pub x: i32,
    /// Vertical coordinate
    pub y: i32,
}

/// Rectangle given as origin plus dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    /// Left/top corner
    pub origin: Point,
    /// Width (`x`) and height (`y`)
    pub dimensions: Point,
}

/// Decoded datum value
#[derive(Debug, Clone, PartialEq)]
pub enum DatumValue {
    /// 8-bit unsigned integer
    U8(u8),
    /// 16-bit unsigned integer
    U16(u16),
    /// 16-bit signed integer
    I16(i16),
    /// 32-bit unsigned integer
    U32(u32),
    /// 64-bit float
    F64(f64),
    /// ASCII string or filename
    String(String),
    /// Point
    Point(Point),
    /// Bounding box
    BoundingBox(BoundingBox),
    /// Polygon vertices
    Polygon(Vec<Point>),
    /// Referenced chunk tag
    Reference(FourCc),
    /// Raw RGB palette bytes
    Palette(Vec<u8>),
}

impl DatumValue {
    /// Integer value widened to `i64`, if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Self::U8(v) => Some(i64::from(v)),
            Self::U16(v) => Some(i64::from(v)),
            Self::I16(v) => Some(i64::from(v)),
            Self::U32(v) => Some(i64::from(v)),
            _ => None,
        }
    }
}

/// A single parsed datum
#[derive(Debug, Clone, PartialEq)]
pub struct Datum {
    /// Type the value was stored as
    pub kind: DatumType,
    /// Offset of the type code within the buffer it was read from
    pub offset: usize,
    /// Decoded value
    pub value: DatumValue,
}

impl Datum {
    /// Read one datum at the cursor position
    pub fn read(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let offset = cursor.position();
        let code = cursor.read_u16()?;
        let kind =
            DatumType::from_code(code).ok_or(Error::UnknownDatumType { code, offset })?;

        let value = match kind {
            DatumType::Uint8
            | DatumType::Uint16
            | DatumType::Uint16Alt
            | DatumType::Int16
            | DatumType::Int16Alt
            | DatumType::Uint32
            | DatumType::Uint32Alt => integer_value(cursor, kind)?,
            DatumType::Float64 | DatumType::Float64Alt => DatumValue::F64(cursor.read_f64()?),
            DatumType::String | DatumType::Filename => DatumValue::String(read_string(cursor)?),
            DatumType::Point | DatumType::PointAlt => DatumValue::Point(read_coordinates(cursor)?),
            DatumType::BoundingBox => {
                let origin = read_point_datum(cursor)?;
                let dimensions = read_point_datum(cursor)?;
                DatumValue::BoundingBox(BoundingBox { origin, dimensions })
            }
            DatumType::Polygon => {
                let count = read_integer(cursor, "polygon point count")?;
                let count = usize::try_from(count).map_err(|_| {
                    Error::malformed(offset, format!("negative polygon point count {count}"))
                })?;
                // Each vertex needs at least a separator and two 3-byte datums.
                if count > cursor.remaining() / 8 {
                    return Err(Error::OutOfBounds {
                        offset: cursor.position(),
                        requested: count * 8,
                        len: cursor.len(),
                    });
                }
                let mut points = Vec::with_capacity(count);
                for _ in 0..count {
                    // Separator between vertices; always `10 00` in practice.
                    cursor.advance(2)?;
                    points.push(read_coordinates(cursor)?);
                }
                DatumValue::Polygon(points)
            }
            DatumType::Reference => DatumValue::Reference(cursor.read_fourcc()?),
            DatumType::Palette => DatumValue::Palette(cursor.read_bytes(PALETTE_SIZE)?.to_vec()),
        };

        Ok(Self {
            kind,
            offset,
            value,
        })
    }
}

fn integer_value(cursor: &mut ByteCursor<'_>, kind: DatumType) -> Result<DatumValue> {
    Ok(match kind {
        DatumType::Uint8 => DatumValue::U8(cursor.read_u8()?),
        DatumType::Int16 | DatumType::Int16Alt => DatumValue::I16(cursor.read_i16()?),
        DatumType::Uint32 | DatumType::Uint32Alt => DatumValue::U32(cursor.read_u32()?),
        _ => DatumValue::U16(cursor.read_u16()?),
    })
}

/// Read the type code of a nested datum, accepting only `accept`ed types
///
/// Nested datums are checked by code before their value is read, so a
/// chain of self-nesting datums cannot recurse.
fn nested_type(
    cursor: &mut ByteCursor<'_>,
    expected: &'static str,
    accept: fn(DatumType) -> bool,
) -> Result<DatumType> {
    let offset = cursor.position();
    let code = cursor.read_u16()?;
    match DatumType::from_code(code) {
        Some(kind) if accept(kind) => Ok(kind),
        Some(_) => Err(Error::UnexpectedDatumType {
            expected,
            found: code,
            offset,
        }),
        None => Err(Error::UnknownDatumType { code, offset }),
    }
}

/// Read a nested integer datum of any width
fn read_integer(cursor: &mut ByteCursor<'_>, what: &'static str) -> Result<i64> {
    let kind = nested_type(cursor, what, DatumType::is_integer)?;
    Ok(match kind {
        DatumType::Uint8 => i64::from(cursor.read_u8()?),
        DatumType::Int16 | DatumType::Int16Alt => i64::from(cursor.read_i16()?),
        DatumType::Uint32 | DatumType::Uint32Alt => i64::from(cursor.read_u32()?),
        _ => i64::from(cursor.read_u16()?),
    })
}

fn read_coordinate(cursor: &mut ByteCursor<'_>) -> Result<i32> {
    let offset = cursor.position();
    let value = read_integer(cursor, "coordinate")?;
    i32::try_from(value)
        .map_err(|_| Error::malformed(offset, format!("coordinate {value} out of range")))
}

/// Read the two bare coordinate datums of a point
fn read_coordinates(cursor: &mut ByteCursor<'_>) -> Result<Point> {
    let x = read_coordinate(cursor)?;
    let y = read_coordinate(cursor)?;
    Ok(Point { x, y })
}

/// Read a full point datum, type code included
fn read_point_datum(cursor: &mut ByteCursor<'_>) -> Result<Point> {
    nested_type(cursor, "point", |kind| {
        matches!(kind, DatumType::Point | DatumType::PointAlt)
    })?;
    read_coordinates(cursor)
}

fn read_string(cursor: &mut ByteCursor<'_>) -> Result<String> {
    let length_offset = cursor.position();
    let length = read_integer(cursor, "string length")?;
    let length = usize::try_from(length)
        .map_err(|_| Error::malformed(length_offset, format!("negative string length {length}")))?;
    let offset = cursor.position();
    let bytes = cursor.read_bytes(length)?;
    if !bytes.is_ascii() {
        return Err(Error::InvalidString { offset });
    }
    // ASCII is valid UTF-8.
    String::from_utf8(bytes.to_vec()).map_err(|_| Error::InvalidString { offset })
}
