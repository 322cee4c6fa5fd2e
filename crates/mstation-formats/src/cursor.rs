//! Bounds-checked read cursor over an in-memory byte buffer
//!
//! Every parser and codec in this crate reads through [`ByteCursor`]. Reads
//! never cross the end of the wrapped slice: a read that would do so returns
//! [`Error::OutOfBounds`] and leaves the position untouched.

use binrw::BinRead;

use crate::error::{Error, Result};
use crate::riff::FourCc;

/// Little-endian read cursor over a borrowed byte slice
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a cursor over `data` positioned at `pos`
    pub fn at(data: &'a [u8], pos: usize) -> Result<Self> {
        if pos > data.len() {
            return Err(Error::OutOfBounds {
                offset: pos,
                requested: 0,
                len: data.len(),
            });
        }
        Ok(Self { data, pos })
    }

    /// Current read position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Length of the wrapped buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the wrapped buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the position and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether every byte has been consumed
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// The wrapped buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(Error::OutOfBounds {
                offset: self.pos,
                requested: n,
                len: self.data.len(),
            });
        }
        Ok(())
    }

    /// Look at the next byte without consuming it
    pub fn peek(&self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.data[self.pos])
    }

    /// Skip `n` bytes
    pub fn advance(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.pos += n;
        Ok(())
    }

    /// Skip one padding byte if the position is odd
    ///
    /// Chunks, subfiles and literal pixel runs are all 16-bit aligned.
    pub fn align_even(&mut self) -> Result<()> {
        if self.pos % 2 == 1 {
            self.advance(1)?;
        }
        Ok(())
    }

    /// Borrow the next `n` bytes and consume them
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    /// Read an unsigned byte
    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self.peek()?;
        self.pos += 1;
        Ok(value)
    }

    /// Read a signed byte
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes([self.read_u8()?]))
    }

    /// Read a little-endian `u16`
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `i16`
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `u32`
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `f64`
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    /// Read a four-character code
    pub fn read_fourcc(&mut self) -> Result<FourCc> {
        Ok(FourCc(self.read_array()?))
    }

    /// Read a fixed-layout structure through its `binrw` definition
    ///
    /// The read is confined to the remaining bytes; running out of input is
    /// reported as [`Error::OutOfBounds`] like any other cursor read.
    pub fn read_struct<T>(&mut self) -> Result<T>
    where
        T: for<'b> BinRead<Args<'b> = ()>,
    {
        let mut reader = std::io::Cursor::new(&self.data[self.pos..]);
        match T::read_options(&mut reader, binrw::Endian::Little, ()) {
            Ok(value) => {
                // Bounded by the slice length, so the cast cannot truncate.
                self.pos += reader.position() as usize;
                Ok(value)
            }
            Err(e) if e.is_eof() => Err(Error::OutOfBounds {
                offset: self.pos,
                requested: std::mem::size_of::<T>(),
                len: self.data.len(),
            }),
            Err(e) => Err(Error::BinRw(e)),
        }
    }
}
