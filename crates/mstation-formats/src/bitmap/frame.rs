//! Frame placement and transparency regions

use crate::error::{Error, Result};

/// Placement of a decoded rectangle inside its canvas
///
/// Still bitmaps use a canvas the size of the frame. Movie frames are often
/// smaller than the movie and sit at an offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitmapFrame {
    /// Width of the encoded rectangle
    pub frame_width: usize,
    /// Height of the encoded rectangle
    pub frame_height: usize,
    /// Width of the output canvas
    pub full_width: usize,
    /// Height of the output canvas
    pub full_height: usize,
    /// Column of the rectangle's left edge in the canvas
    pub origin_x: usize,
    /// Row of the rectangle's top edge in the canvas
    pub origin_y: usize,
}

impl BitmapFrame {
    /// A frame that fills its own canvas
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            frame_width: width,
            frame_height: height,
            full_width: width,
            full_height: height,
            origin_x: 0,
            origin_y: 0,
        }
    }

    /// Place the frame on a larger canvas
    #[must_use]
    pub const fn with_canvas(mut self, full_width: usize, full_height: usize) -> Self {
        self.full_width = full_width;
        self.full_height = full_height;
        self
    }

    /// Move the frame's top-left corner
    #[must_use]
    pub const fn with_origin(mut self, x: usize, y: usize) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    /// Number of bytes in the output canvas
    ///
    /// `None` if the product does not fit in `usize`.
    pub fn canvas_len(&self) -> Option<usize> {
        self.full_width.checked_mul(self.full_height)
    }

    /// Check that the rectangle fits its canvas and the canvas fits `max_bytes`
    ///
    /// Returns the canvas length on success.
    pub fn validate(&self, max_bytes: usize) -> Result<usize> {
        let fits = |origin: usize, extent: usize, full: usize| {
            origin.checked_add(extent).is_some_and(|end| end <= full)
        };
        if !fits(self.origin_x, self.frame_width, self.full_width) {
            return Err(Error::DimensionMismatch(format!(
                "frame of width {} at column {} exceeds canvas width {}",
                self.frame_width, self.origin_x, self.full_width
            )));
        }
        if !fits(self.origin_y, self.frame_height, self.full_height) {
            return Err(Error::DimensionMismatch(format!(
                "frame of height {} at row {} exceeds canvas height {}",
                self.frame_height, self.origin_y, self.full_height
            )));
        }
        match self.canvas_len() {
            Some(len) if len <= max_bytes => Ok(len),
            _ => Err(Error::DimensionMismatch(format!(
                "canvas {}x{} exceeds limit of {max_bytes} bytes",
                self.full_width, self.full_height
            ))),
        }
    }
}

/// A horizontal run of pixels marked transparent, in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransparencyRegion {
    /// Canvas row
    pub row: usize,
    /// First canvas column of the run
    pub start_column: usize,
    /// Number of pixels in the run
    pub run_length: usize,
}

impl TransparencyRegion {
    /// Byte range the region covers in a canvas `full_width` pixels wide
    pub fn span(&self, full_width: usize) -> Option<std::ops::Range<usize>> {
        let start = self
            .row
            .checked_mul(full_width)?
            .checked_add(self.start_column)?;
        let end = start.checked_add(self.run_length)?;
        Some(start..end)
    }
}
