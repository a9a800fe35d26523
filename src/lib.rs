//! sine-wav: 16-bit PCM sine tone generator and WAV writer.
//!
//! # Modules
//!
//! - [`audio`]: Sample generator (SineGenerator) and WAV serialization
//! - [`config`]: Runtime configuration (SineConfig)
//! - [`error`]: Error types and codes (SineError, ErrorCode)
//! - [`cli`]: Command-line arguments for the `sine-wav` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use sine_wav::{write_wav, HeaderPolicy, SineGenerator};
//!
//! let mut generator = SineGenerator::new(440.0, 44000)?;
//! let mut out = Vec::new();
//! write_wav(&mut generator, 100, HeaderPolicy::Legacy, &mut out)?;
//! assert_eq!(out.len(), 44 + 200);
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;

// Re-export commonly used types at crate root for convenience
pub use audio::{
    read_wav_header, write_wav, write_wav_file, HeaderPolicy, Quantization, SineGenerator,
    WavHeader,
};
pub use config::SineConfig;
pub use error::{ErrorCode, Result, SineError};
