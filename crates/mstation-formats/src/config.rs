//! Decoder configuration

use serde::{Deserialize, Serialize};

use crate::audio::AdpcmVariant;
use crate::bitmap::BitmapVariant;
use crate::error::Result;

/// Largest canvas accepted by default (16 MiB of 8-bit pixels)
pub const DEFAULT_MAX_CANVAS_BYTES: usize = 16 * 1024 * 1024;

/// Codec variants and limits applied to every decode call
///
/// Titles were produced by several engine generations whose encoders
/// disagree on details, so the caller picks the variant that matches the
/// title being extracted. The same config can be shared by any number of
/// concurrent decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// How bitmap transparency markers are handled
    pub bitmap_variant: BitmapVariant,

    /// Nibble order and rounding used for ADPCM audio
    pub adpcm_variant: AdpcmVariant,

    /// Upper bound on `full_width * full_height` for a decoded canvas
    pub max_canvas_bytes: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            bitmap_variant: BitmapVariant::default(),
            adpcm_variant: AdpcmVariant::default(),
            max_canvas_bytes: DEFAULT_MAX_CANVAS_BYTES,
        }
    }
}

impl DecoderConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the bitmap variant
    #[must_use]
    pub const fn with_bitmap_variant(mut self, variant: BitmapVariant) -> Self {
        self.bitmap_variant = variant;
        self
    }

    /// Set the ADPCM variant
    #[must_use]
    pub const fn with_adpcm_variant(mut self, variant: AdpcmVariant) -> Self {
        self.adpcm_variant = variant;
        self
    }

    /// Set the canvas size limit
    #[must_use]
    pub const fn with_max_canvas_bytes(mut self, bytes: usize) -> Self {
        self.max_canvas_bytes = bytes;
        self
    }
}
