//! Audio decoding
//!
//! Sounds are mono 16-bit at 22 050 Hz, stored either as raw PCM or as 4-bit
//! ADPCM. A sound spans several chunks and every ADPCM chunk starts from a
//! fresh decoder state.

mod adpcm;
mod sound;

pub use adpcm::{
    AdpcmDecoder, AdpcmState, AdpcmVariant, MAX_STEP_INDEX, STEP_CHANGES, STEP_TABLE,
    decode_adpcm, decode_adpcm_to_pcm_bytes,
};
pub use sound::{SAMPLE_RATE, SoundEncoding, SoundFormat, decode_sound_chunks};
