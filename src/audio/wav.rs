//! WAV file writer for generated sine audio.
//!
//! Writes a canonical 44-byte RIFF/WAVE header for mono 16-bit PCM and then
//! drains exactly the announced number of data bytes from a [`SineGenerator`].

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audio::sine::{SineGenerator, BYTES_PER_SAMPLE};
use crate::error::{Result, SineError};

/// Length of the canonical PCM WAV header in bytes.
pub const HEADER_LEN: usize = 44;

/// Sample rate written by the legacy header regardless of the generator.
pub const LEGACY_SAMPLE_RATE: u32 = 44000;

/// Byte rate written by the legacy header.
pub const LEGACY_BYTE_RATE: u32 = 2;

/// Number of audio channels (mono).
pub const CHANNELS: u16 = 1;

/// Bits per encoded sample.
pub const BITS_PER_SAMPLE: u16 = 16;

const PCM_FORMAT: u16 = 1;
// Even, so every chunk holds whole samples.
const DATA_CHUNK_LEN: usize = 4096;
const FMT_CHUNK_SIZE: u32 = 16;

/// Selects how the rate fields of the header are filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeaderPolicy {
    /// Fixed `SampleRate = 44000` and `ByteRate = 2`, byte-exact with
    /// previously generated files.
    #[default]
    Legacy,

    /// Sample rate taken from the generator, byte rate computed from it.
    Derived,
}

impl HeaderPolicy {
    /// Returns the string representation of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderPolicy::Legacy => "legacy",
            HeaderPolicy::Derived => "derived",
        }
    }

    /// Parses a header policy from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "legacy" => Some(HeaderPolicy::Legacy),
            "derived" => Some(HeaderPolicy::Derived),
            _ => None,
        }
    }
}

impl std::fmt::Display for HeaderPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Numeric fields of a mono PCM WAV header.
///
/// The four chunk tags ("RIFF", "WAVE", "fmt ", "data") are fixed and are
/// checked on parse rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavHeader {
    /// Size of everything after the first 8 bytes (36 + data size).
    pub chunk_size: u32,
    /// Size of the fmt chunk body (16 for PCM).
    pub subchunk1_size: u32,
    /// Audio format tag (1 for PCM).
    pub audio_format: u16,
    pub num_channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    /// Size of the data section in bytes.
    pub data_size: u32,
}

impl WavHeader {
    /// Builds the header for `samples` mono 16-bit samples.
    pub fn for_samples(samples: u32, sample_rate_hz: u32, policy: HeaderPolicy) -> Result<Self> {
        let data_size = samples as u64 * BYTES_PER_SAMPLE as u64;
        let chunk_size = 36 + data_size;
        if chunk_size > u32::MAX as u64 {
            return Err(SineError::too_many_samples(samples));
        }

        let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);
        let (sample_rate, byte_rate) = match policy {
            HeaderPolicy::Legacy => (LEGACY_SAMPLE_RATE, LEGACY_BYTE_RATE),
            HeaderPolicy::Derived => {
                let byte_rate = sample_rate_hz
                    .checked_mul(block_align as u32)
                    .ok_or_else(|| SineError::invalid_sample_rate(sample_rate_hz))?;
                (sample_rate_hz, byte_rate)
            }
        };

        Ok(Self {
            chunk_size: chunk_size as u32,
            subchunk1_size: FMT_CHUNK_SIZE,
            audio_format: PCM_FORMAT,
            num_channels: CHANNELS,
            sample_rate,
            byte_rate,
            block_align,
            bits_per_sample: BITS_PER_SAMPLE,
            data_size: data_size as u32,
        })
    }

    /// Number of samples announced by the data section.
    pub fn sample_count(&self) -> u32 {
        self.data_size / BYTES_PER_SAMPLE as u32
    }

    /// Serializes the header to its 44-byte on-disk layout.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(b"RIFF");
        out[4..8].copy_from_slice(&self.chunk_size.to_le_bytes());
        out[8..12].copy_from_slice(b"WAVE");
        out[12..16].copy_from_slice(b"fmt ");
        out[16..20].copy_from_slice(&self.subchunk1_size.to_le_bytes());
        out[20..22].copy_from_slice(&self.audio_format.to_le_bytes());
        out[22..24].copy_from_slice(&self.num_channels.to_le_bytes());
        out[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        out[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        out[32..34].copy_from_slice(&self.block_align.to_le_bytes());
        out[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        out[36..40].copy_from_slice(b"data");
        out[40..44].copy_from_slice(&self.data_size.to_le_bytes());
        out
    }

    /// Parses the first 44 bytes of a WAV file.
    ///
    /// Only the canonical layout is accepted: the fmt chunk must come first
    /// and the data chunk must follow it directly.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(SineError::invalid_header(format!(
                "expected at least {} bytes, got {}",
                HEADER_LEN,
                bytes.len()
            )));
        }

        expect_tag(bytes, 0, b"RIFF")?;
        expect_tag(bytes, 8, b"WAVE")?;
        expect_tag(bytes, 12, b"fmt ")?;
        expect_tag(bytes, 36, b"data")?;

        Ok(Self {
            chunk_size: read_u32(bytes, 4),
            subchunk1_size: read_u32(bytes, 16),
            audio_format: read_u16(bytes, 20),
            num_channels: read_u16(bytes, 22),
            sample_rate: read_u32(bytes, 24),
            byte_rate: read_u32(bytes, 28),
            block_align: read_u16(bytes, 32),
            bits_per_sample: read_u16(bytes, 34),
            data_size: read_u32(bytes, 40),
        })
    }
}

fn expect_tag(bytes: &[u8], offset: usize, tag: &[u8; 4]) -> Result<()> {
    let found = &bytes[offset..offset + 4];
    if found != tag {
        return Err(SineError::invalid_header(format!(
            "expected {:?} at offset {}, found {:?}",
            String::from_utf8_lossy(tag),
            offset,
            String::from_utf8_lossy(found)
        )));
    }
    Ok(())
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Writes a mono WAV stream of `samples` samples to `sink`.
///
/// The header is written first, then exactly `2 * samples` bytes drawn from
/// `generator`. On failure nothing already written is rolled back.
///
/// # Example
///
/// ```ignore
/// use sine_wav::{write_wav, HeaderPolicy, SineGenerator};
///
/// let mut generator = SineGenerator::new(440.0, 44000)?;
/// let mut out = Vec::new();
/// write_wav(&mut generator, 100, HeaderPolicy::Legacy, &mut out)?;
/// assert_eq!(out.len(), 244);
/// ```
pub fn write_wav<W: Write + ?Sized>(
    generator: &mut SineGenerator,
    samples: u32,
    policy: HeaderPolicy,
    sink: &mut W,
) -> Result<WavHeader> {
    let header = WavHeader::for_samples(samples, generator.sample_rate_hz(), policy)?;

    sink.write_all(&header.to_bytes())
        .map_err(|e| SineError::io("Failed to write WAV header", e))?;
    debug!(
        samples,
        policy = policy.as_str(),
        sample_rate = header.sample_rate,
        "wrote WAV header"
    );

    let mut chunk = [0u8; DATA_CHUNK_LEN];
    let mut remaining = header.data_size as usize;
    while remaining > 0 {
        let len = remaining.min(DATA_CHUNK_LEN);
        generator.fill(&mut chunk[..len]);
        sink.write_all(&chunk[..len])
            .map_err(|e| SineError::io("Failed to write WAV data", e))?;
        remaining -= len;
    }

    Ok(header)
}

/// Writes a mono WAV file at `path`, creating or truncating it.
pub fn write_wav_file(
    generator: &mut SineGenerator,
    samples: u32,
    policy: HeaderPolicy,
    path: &Path,
) -> Result<WavHeader> {
    let file = File::create(path).map_err(|e| {
        SineError::io(format!("Failed to create {}", path.display()), e)
    })?;
    debug!(path = %path.display(), "created WAV file");

    let mut writer = BufWriter::new(file);
    let header = write_wav(generator, samples, policy, &mut writer)?;
    writer
        .flush()
        .map_err(|e| SineError::io(format!("Failed to flush {}", path.display()), e))?;

    Ok(header)
}

/// Reads and parses the header of an existing WAV file.
pub fn read_wav_header(path: &Path) -> Result<WavHeader> {
    let mut file = File::open(path)
        .map_err(|e| SineError::io(format!("Failed to open {}", path.display()), e))?;

    let mut bytes = [0u8; HEADER_LEN];
    file.read_exact(&mut bytes).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            SineError::invalid_header(format!("{} is shorter than {} bytes", path.display(), HEADER_LEN))
        } else {
            SineError::io(format!("Failed to read {}", path.display()), e)
        }
    })?;

    WavHeader::parse(&bytes)
}

/// Converts a duration to a sample count at the given rate.
///
/// Fractional samples are dropped; negative durations give 0 and durations
/// beyond `u32::MAX` samples saturate.
pub fn samples_for_duration(seconds: f64, sample_rate: u32) -> u32 {
    (seconds * sample_rate as f64) as u32
}

/// Calculates the duration of audio in seconds from sample count.
pub fn samples_to_duration(sample_count: u32, sample_rate: u32) -> f64 {
    sample_count as f64 / sample_rate as f64
}
