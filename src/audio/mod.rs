//! Audio generation and output module.
//!
//! Provides the sine sample generator and the WAV writer that wraps it.

pub mod sine;
pub mod wav;

// Re-export commonly used items
pub use sine::{period_length, Quantization, SineGenerator, BYTES_PER_SAMPLE};
pub use wav::{
    read_wav_header, samples_for_duration, samples_to_duration, write_wav, write_wav_file,
    HeaderPolicy, WavHeader, HEADER_LEN,
};
