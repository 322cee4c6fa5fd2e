//! 4-bit ADPCM decoding
//!
//! Each input byte packs two 4-bit codes. A code is a 3-bit magnitude plus a
//! sign bit; the magnitude scales the current quantizer step and also moves
//! the step index through [`STEP_TABLE`].

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Quantizer step sizes, indexed by the step index
pub const STEP_TABLE: [i32; 89] = [
    7, 8, 9, 10, 11, 12, 13, 14, 16, 17, 19, 21, 23, 25, 28, 31, 34, 37, 41, 45, 50, 55, 60, 66,
    73, 80, 88, 97, 107, 118, 130, 143, 157, 173, 190, 209, 230, 253, 279, 307, 337, 371, 408,
    449, 494, 544, 598, 658, 724, 796, 876, 963, 1060, 1166, 1282, 1411, 1552, 1707, 1878, 2066,
    2272, 2499, 2749, 3024, 3327, 3660, 4026, 4428, 4871, 5358, 5894, 6484, 7132, 7845, 8630,
    9493, 10442, 11487, 12635, 13899, 15289, 16818, 18500, 20350, 22385, 24623, 27086, 29794,
    32767,
];

/// Step index adjustment per code magnitude
pub const STEP_CHANGES: [i8; 8] = [-1, -1, -1, -1, 2, 4, 6, 8];

/// Largest valid step index
pub const MAX_STEP_INDEX: usize = STEP_TABLE.len() - 1;

const SIGN_BIT: u8 = 0x8;
const MAGNITUDE_MASK: u8 = 0x7;

/// Nibble order and delta rounding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdpcmVariant {
    /// High nibble first, delta truncated: `((2m + 1) * step) >> 3`
    #[default]
    Ima,
    /// Low nibble first, delta rounded: `((2m + 1) * step + 4) >> 3`
    ///
    /// Found in older tooling for these titles. Kept selectable until it is
    /// checked against captured audio.
    Legacy,
}

impl AdpcmVariant {
    /// The two codes of `byte` in decode order
    pub const fn split(self, byte: u8) -> [u8; 2] {
        match self {
            Self::Ima => [byte >> 4, byte & 0xF],
            Self::Legacy => [byte & 0xF, byte >> 4],
        }
    }

    fn delta(self, magnitude: u8, step: i32) -> i32 {
        let scaled = ((i32::from(magnitude) << 1) | 1) * step;
        match self {
            Self::Ima => scaled >> 3,
            Self::Legacy => (scaled + 4) >> 3,
        }
    }
}

/// Predictor and step index carried from one code to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdpcmState {
    /// Last reconstructed sample
    pub predictor: i16,
    /// Position in [`STEP_TABLE`], always `<= MAX_STEP_INDEX`
    pub step_index: usize,
}

impl AdpcmState {
    /// Decode one 4-bit code and return the reconstructed sample
    pub fn decode_code(&mut self, code: u8, variant: AdpcmVariant) -> i16 {
        let magnitude = code & MAGNITUDE_MASK;
        let mut delta = variant.delta(magnitude, STEP_TABLE[self.step_index]);
        if code & SIGN_BIT != 0 {
            delta = -delta;
        }

        let sample = (i32::from(self.predictor) + delta)
            .clamp(i32::from(i16::MIN), i32::from(i16::MAX));
        self.predictor = sample as i16;

        let change = isize::from(STEP_CHANGES[usize::from(magnitude)]);
        self.step_index = self
            .step_index
            .saturating_add_signed(change)
            .min(MAX_STEP_INDEX);
        self.predictor
    }
}

/// Streaming ADPCM decoder
///
/// Starts from a zero predictor and step index. Sounds are stored as several
/// chunks that must each be decoded with a fresh decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdpcmDecoder {
    state: AdpcmState,
    variant: AdpcmVariant,
}

impl AdpcmDecoder {
    /// Create a decoder with fresh state
    pub fn new(variant: AdpcmVariant) -> Self {
        Self {
            state: AdpcmState::default(),
            variant,
        }
    }

    /// Current predictor state
    pub fn state(&self) -> AdpcmState {
        self.state
    }

    /// Decode one byte into two samples
    pub fn decode_byte(&mut self, byte: u8) -> [i16; 2] {
        let [first, second] = self.variant.split(byte);
        [
            self.state.decode_code(first, self.variant),
            self.state.decode_code(second, self.variant),
        ]
    }

    /// Decode every byte of `data`, appending samples to `out`
    pub fn decode_into(&mut self, data: &[u8], out: &mut Vec<i16>) {
        out.reserve(data.len() * 2);
        for &byte in data {
            out.extend(self.decode_byte(byte));
        }
    }
}

/// Decode one independently encoded ADPCM stream into samples
///
/// Produces two samples per input byte.
pub fn decode_adpcm(data: &[u8], variant: AdpcmVariant) -> Vec<i16> {
    let mut samples = Vec::new();
    AdpcmDecoder::new(variant).decode_into(data, &mut samples);
    debug!(bytes = data.len(), samples = samples.len(), ?variant, "decoded ADPCM stream");
    samples
}

/// Decode one ADPCM stream into 16-bit little-endian PCM bytes
///
/// Produces four output bytes per input byte.
pub fn decode_adpcm_to_pcm_bytes(data: &[u8], variant: AdpcmVariant) -> Vec<u8> {
    decode_adpcm(data, variant)
        .into_iter()
        .flat_map(i16::to_le_bytes)
        .collect()
}
