//! Sine wave sample generator.
//!
//! Produces an unbounded stream of 16-bit little-endian PCM words for a
//! single-channel sine tone. The generator is also an infinite
//! [`std::io::Read`], so a bounded prefix can be taken with [`Read::take`].

use std::f64::consts::PI;
use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

use crate::audio::wav::{write_wav, HeaderPolicy, WavHeader};
use crate::error::{Result, SineError};

/// Size of one encoded sample in bytes (16-bit mono).
pub const BYTES_PER_SAMPLE: usize = 2;

/// How a sine value in [-1, 1] becomes a 16-bit word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Quantization {
    /// Truncate toward zero to an integer and keep its low 16 bits.
    ///
    /// Matches the reference output bit for bit: -1.0 becomes 0xFFFF,
    /// 1.0 becomes 1, everything in between becomes 0.
    #[default]
    Truncate,

    /// Scale to full-range signed 16-bit PCM.
    SignedPcm,
}

impl Quantization {
    /// Returns the string representation of the quantization mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Quantization::Truncate => "truncate",
            Quantization::SignedPcm => "signed_pcm",
        }
    }

    /// Parses a quantization mode from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "truncate" | "legacy" => Some(Quantization::Truncate),
            "signed_pcm" | "signed-pcm" | "pcm" => Some(Quantization::SignedPcm),
            _ => None,
        }
    }

    /// Converts one sine value into the 16-bit word written to the stream.
    pub fn quantize(&self, raw: f64) -> u16 {
        match self {
            // Two-step cast keeps the wraparound for negative values.
            Quantization::Truncate => raw as i64 as u16,
            Quantization::SignedPcm => {
                let scaled = (raw.clamp(-1.0, 1.0) * i16::MAX as f64).round();
                scaled as i16 as u16
            }
        }
    }
}

impl std::fmt::Display for Quantization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Computes the number of time steps after which the phase counter wraps.
///
/// This is the `(180 / 3π) · (rate / freq)` approximation, truncated.
/// It is not the true period of the tone but is kept for output compatibility.
pub fn period_length(frequency_hz: f64, sample_rate_hz: u32) -> u64 {
    ((180.0 / (3.0 * PI)) * (sample_rate_hz as f64 / frequency_hz)) as u64
}

/// Stateful single-channel sine generator.
#[derive(Debug, Clone)]
pub struct SineGenerator {
    time_index: u64,
    frequency_hz: f64,
    sample_rate_hz: u32,
    quantization: Quantization,
    /// High byte of a sample split across two `read` calls.
    pending: Option<u8>,
}

impl SineGenerator {
    /// Creates a generator for the given tone.
    ///
    /// Fails if the frequency is not a finite positive number, the sample
    /// rate is zero, or the two together give a zero period length.
    pub fn new(frequency_hz: f64, sample_rate_hz: u32) -> Result<Self> {
        validate(frequency_hz, sample_rate_hz)?;
        Ok(Self {
            time_index: 0,
            frequency_hz,
            sample_rate_hz,
            quantization: Quantization::default(),
            pending: None,
        })
    }

    /// Sets the quantization mode.
    pub fn with_quantization(mut self, quantization: Quantization) -> Self {
        self.quantization = quantization;
        self
    }

    /// Index of the next sample within the current period.
    pub fn time_index(&self) -> u64 {
        self.time_index
    }

    /// Tone frequency in Hz.
    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    /// Sample rate in Hz.
    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Quantization mode used for new samples.
    pub fn quantization(&self) -> Quantization {
        self.quantization
    }

    /// Current period length, recomputed from frequency and rate.
    pub fn period_length(&self) -> u64 {
        period_length(self.frequency_hz, self.sample_rate_hz)
    }

    /// Changes the frequency. The time index is kept, wrapped into the new
    /// period.
    pub fn set_frequency(&mut self, frequency_hz: f64) -> Result<()> {
        validate(frequency_hz, self.sample_rate_hz)?;
        self.frequency_hz = frequency_hz;
        self.time_index %= self.period_length();
        Ok(())
    }

    /// Changes the sample rate. The time index is kept, wrapped into the new
    /// period.
    pub fn set_sample_rate(&mut self, sample_rate_hz: u32) -> Result<()> {
        validate(self.frequency_hz, sample_rate_hz)?;
        self.sample_rate_hz = sample_rate_hz;
        self.time_index %= self.period_length();
        Ok(())
    }

    /// Rewinds the phase counter to the start of the wave.
    pub fn reset(&mut self) {
        self.time_index = 0;
        self.pending = None;
    }

    /// Fills `buf` with consecutive little-endian samples.
    ///
    /// The buffer is used in 2-byte units; a trailing odd byte is left
    /// untouched. Returns the number of bytes written.
    pub fn fill(&mut self, buf: &mut [u8]) -> usize {
        let period = self.period_length();
        let step = 2.0 * PI * (self.frequency_hz / self.sample_rate_hz as f64);

        let mut written = 0;
        for slot in buf.chunks_exact_mut(BYTES_PER_SAMPLE) {
            let raw = (step * self.time_index as f64).sin();
            let word = self.quantization.quantize(raw);
            slot.copy_from_slice(&word.to_le_bytes());

            self.time_index = (self.time_index + 1) % period;
            written += BYTES_PER_SAMPLE;
        }
        written
    }
}

/// Never fails and never reaches end of stream: every non-empty buffer is
/// filled completely. A sample cut by an odd-length buffer continues with its
/// high byte on the next read.
impl Read for SineGenerator {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut offset = 0;
        if let Some(high) = self.pending.take() {
            match buf.first_mut() {
                Some(slot) => *slot = high,
                None => {
                    self.pending = Some(high);
                    return Ok(0);
                }
            }
            offset = 1;
        }

        offset += self.fill(&mut buf[offset..]);

        if offset < buf.len() {
            let mut sample = [0u8; BYTES_PER_SAMPLE];
            self.fill(&mut sample);
            buf[offset] = sample[0];
            self.pending = Some(sample[1]);
            offset += 1;
        }

        Ok(offset)
    }
}

impl SineGenerator {
    /// Writes a mono WAV stream with the legacy header to `sink`.
    ///
    /// Shorthand for [`write_wav`] with [`HeaderPolicy::Legacy`].
    pub fn write_wav<W: Write + ?Sized>(
        &mut self,
        samples: u32,
        sink: &mut W,
    ) -> Result<WavHeader> {
        write_wav(self, samples, HeaderPolicy::Legacy, sink)
    }
}

fn validate(frequency_hz: f64, sample_rate_hz: u32) -> Result<()> {
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        return Err(SineError::invalid_frequency(
            frequency_hz,
            "must be a finite number greater than zero",
        ));
    }
    if sample_rate_hz == 0 {
        return Err(SineError::invalid_sample_rate(sample_rate_hz));
    }
    if period_length(frequency_hz, sample_rate_hz) == 0 {
        return Err(SineError::invalid_frequency(
            frequency_hz,
            format!("too high for a sample rate of {} Hz", sample_rate_hz),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn period_length_matches_reference_formula() {
        // 19.0986 * 100 = 1909.86
        assert_eq!(period_length(440.0, 44000), 1909);
        // 19.0986 * 44 = 840.34
        assert_eq!(period_length(1000.0, 44000), 840);
    }

    #[test]
    fn odd_buffer_drops_trailing_byte() {
        let mut generator = SineGenerator::new(440.0, 44000).unwrap();
        let mut buf = [0xAAu8; 5];
        assert_eq!(generator.fill(&mut buf), 4);
        assert_eq!(buf[4], 0xAA);
        assert_eq!(generator.time_index(), 2);
    }

    #[test]
    fn tiny_buffers_write_nothing() {
        let mut generator = SineGenerator::new(440.0, 44000).unwrap();
        assert_eq!(generator.fill(&mut []), 0);
        assert_eq!(generator.fill(&mut [0u8; 1]), 0);
        assert_eq!(generator.time_index(), 0);
    }

    #[test]
    fn split_fills_match_single_fill() {
        for quantization in [Quantization::Truncate, Quantization::SignedPcm] {
            let mut whole = SineGenerator::new(440.0, 44000)
                .unwrap()
                .with_quantization(quantization);
            let mut expected = vec![0u8; 4000];
            whole.fill(&mut expected);

            let mut split = SineGenerator::new(440.0, 44000)
                .unwrap()
                .with_quantization(quantization);
            let mut actual = vec![0u8; 4000];
            let (head, tail) = actual.split_at_mut(1234);
            split.fill(head);
            split.fill(tail);

            assert_eq!(actual, expected);
            assert_eq!(split.time_index(), whole.time_index());
        }
    }

    #[test]
    fn time_index_stays_below_period() {
        let mut generator = SineGenerator::new(1000.0, 44000).unwrap();
        let period = generator.period_length();
        let mut buf = vec![0u8; 333];
        for _ in 0..50 {
            generator.fill(&mut buf);
            assert!(generator.time_index() < period);
        }
    }

    #[test]
    fn time_index_wraps_at_period() {
        let mut generator = SineGenerator::new(1000.0, 44000).unwrap();
        let period = generator.period_length() as usize;
        let mut buf = vec![0u8; period * BYTES_PER_SAMPLE];
        generator.fill(&mut buf);
        assert_eq!(generator.time_index(), 0);
    }

    #[test]
    fn truncate_quantization_wraps_negative_values() {
        let q = Quantization::Truncate;
        assert_eq!(q.quantize(0.0), 0);
        assert_eq!(q.quantize(0.999), 0);
        assert_eq!(q.quantize(1.0), 1);
        assert_eq!(q.quantize(-0.5), 0);
        assert_eq!(q.quantize(-1.0), 0xFFFF);
    }

    #[test]
    fn signed_pcm_quantization_scales_full_range() {
        let q = Quantization::SignedPcm;
        assert_eq!(q.quantize(0.0), 0);
        assert_eq!(q.quantize(1.0), 32767);
        assert_eq!(q.quantize(-1.0) as i16, -32767);
        assert_eq!(q.quantize(0.5) as i16, 16384);
        assert_eq!(q.quantize(2.0), 32767);
    }

    #[test]
    fn truncate_output_only_holds_reference_words() {
        let mut generator = SineGenerator::new(440.0, 44000).unwrap();
        let mut buf = vec![0u8; 20000];
        generator.fill(&mut buf);
        for pair in buf.chunks_exact(2) {
            let word = u16::from_le_bytes([pair[0], pair[1]]);
            assert!(matches!(word, 0 | 1 | 0xFFFF), "unexpected word {word:#06x}");
        }
    }

    #[test]
    fn signed_pcm_output_is_little_endian() {
        // 11000 Hz at 44000 Hz: a quarter turn per sample.
        let mut generator = SineGenerator::new(11000.0, 44000)
            .unwrap()
            .with_quantization(Quantization::SignedPcm);
        let mut buf = [0u8; 4];
        generator.fill(&mut buf);
        assert_eq!(&buf[0..2], &[0x00, 0x00]);
        assert_eq!(&buf[2..4], &[0xFF, 0x7F]);
    }

    #[test]
    fn zero_frequency_is_rejected() {
        let err = SineGenerator::new(0.0, 44000).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFrequency);
    }

    #[test]
    fn non_finite_and_negative_frequency_are_rejected() {
        for frequency in [f64::NAN, f64::INFINITY, -440.0] {
            let err = SineGenerator::new(frequency, 44000).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidFrequency);
        }
    }

    #[test]
    fn zero_sample_rate_is_rejected() {
        let err = SineGenerator::new(440.0, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSampleRate);
    }

    #[test]
    fn frequency_with_zero_period_is_rejected() {
        // 19.0986 * (100 / 2000) < 1
        let err = SineGenerator::new(2000.0, 100).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFrequency);
    }

    #[test]
    fn setters_validate_and_keep_index_in_range() {
        let mut generator = SineGenerator::new(440.0, 44000).unwrap();
        let mut buf = vec![0u8; 3000];
        generator.fill(&mut buf);
        assert_eq!(generator.time_index(), 1500);

        assert!(generator.set_frequency(0.0).is_err());
        assert_eq!(generator.frequency_hz(), 440.0);

        generator.set_frequency(1000.0).unwrap();
        assert_eq!(generator.time_index(), 1500 % 840);
        assert!(generator.time_index() < generator.period_length());

        assert!(generator.set_sample_rate(0).is_err());
        generator.set_sample_rate(48000).unwrap();
        assert_eq!(generator.sample_rate_hz(), 48000);
    }

    #[test]
    fn reset_rewinds_the_wave() {
        let mut generator = SineGenerator::new(11000.0, 44000)
            .unwrap()
            .with_quantization(Quantization::SignedPcm);
        let mut first = [0u8; 8];
        generator.fill(&mut first);
        generator.reset();
        let mut second = [0u8; 8];
        generator.fill(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn read_is_infinite_and_bounded_by_take() {
        let mut generator = SineGenerator::new(440.0, 44000).unwrap();
        let mut out = Vec::new();
        let copied = io::copy(&mut (&mut generator).take(10_000), &mut out).unwrap();
        assert_eq!(copied, 10_000);
        assert_eq!(out.len(), 10_000);
        assert_eq!(generator.time_index(), 5000 % generator.period_length());
    }

    #[test]
    fn sample_rate_change_wraps_index_immediately() {
        let mut generator = SineGenerator::new(1000.0, 44000).unwrap();
        let mut buf = vec![0u8; 1600];
        generator.fill(&mut buf);
        assert_eq!(generator.time_index(), 800);

        // 19.0986 * 22 = 420.17
        generator.set_sample_rate(22000).unwrap();
        assert_eq!(generator.period_length(), 420);
        assert_eq!(generator.time_index(), 800 % 420);
    }

    #[test]
    fn odd_reads_reassemble_the_sample_stream() {
        let mut reference = SineGenerator::new(11000.0, 44000)
            .unwrap()
            .with_quantization(Quantization::SignedPcm);
        let mut expected = vec![0u8; 64];
        reference.fill(&mut expected);

        let mut generator = SineGenerator::new(11000.0, 44000)
            .unwrap()
            .with_quantization(Quantization::SignedPcm);
        let mut actual = Vec::new();
        for len in [1usize, 3, 1, 1, 5, 2, 7, 44] {
            let mut chunk = vec![0u8; len];
            assert_eq!(generator.read(&mut chunk).unwrap(), len);
            actual.extend_from_slice(&chunk);
        }
        assert_eq!(actual, expected);
    }

    #[test]
    fn empty_read_keeps_pending_byte() {
        let mut generator = SineGenerator::new(11000.0, 44000)
            .unwrap()
            .with_quantization(Quantization::SignedPcm);
        let mut byte = [0u8; 1];
        generator.read(&mut byte).unwrap();
        generator.read(&mut byte).unwrap();
        assert_eq!(byte, [0x00]);

        generator.read(&mut byte).unwrap();
        assert_eq!(byte, [0xFF]);
        assert_eq!(generator.read(&mut []).unwrap(), 0);
        generator.read(&mut byte).unwrap();
        assert_eq!(byte, [0x7F]);
    }

    #[test]
    fn read_to_end_with_odd_capacity_is_complete() {
        let mut generator = SineGenerator::new(440.0, 44000).unwrap();
        let mut out = Vec::with_capacity(77);
        let read = (&mut generator).take(200).read_to_end(&mut out).unwrap();
        assert_eq!(read, 200);
        assert_eq!(out.len(), 200);
        assert_eq!(generator.time_index(), 100);
    }

    #[test]
    fn write_wav_method_uses_legacy_header() {
        let mut generator = SineGenerator::new(440.0, 48000).unwrap();
        let mut out = Vec::new();
        let header = generator.write_wav(100, &mut out).unwrap();

        assert_eq!(out.len(), 44 + 200);
        assert_eq!(header.sample_rate, 44000);
        assert_eq!(header.byte_rate, 2);
        assert_eq!(WavHeader::parse(&out).unwrap(), header);
        assert_eq!(generator.time_index(), 100);
    }

    #[test]
    fn quantization_parsing() {
        assert_eq!(Quantization::parse("truncate"), Some(Quantization::Truncate));
        assert_eq!(Quantization::parse("Signed-PCM"), Some(Quantization::SignedPcm));
        assert_eq!(Quantization::parse("float"), None);
        assert_eq!(Quantization::SignedPcm.to_string(), "signed_pcm");
    }
}
