//! Generator configuration module.
//!
//! Contains the runtime configuration for sine-wav: tone parameters,
//! quantization mode and WAV header policy.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::audio::{HeaderPolicy, Quantization, SineGenerator};
use crate::error::Result;

/// Default tone frequency (concert A).
pub const DEFAULT_FREQUENCY_HZ: f64 = 440.0;

/// Default generator sample rate, matching the legacy header rate.
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 44000;

/// Runtime configuration for tone generation.
///
/// Typically loaded from environment variables and then overridden by
/// command-line arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SineConfig {
    /// Frequency of the generated tone in Hz.
    pub frequency_hz: f64,

    /// Generator sample rate in Hz.
    pub sample_rate_hz: u32,

    /// How sine values are quantized to 16-bit words.
    pub quantization: Quantization,

    /// How the rate fields of the WAV header are filled in.
    pub header: HeaderPolicy,
}

impl SineConfig {
    /// Creates a new SineConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a SineConfig from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `SINE_FREQUENCY_HZ` - Tone frequency in Hz
    /// - `SINE_SAMPLE_RATE_HZ` - Generator sample rate in Hz
    /// - `SINE_QUANTIZATION` - Quantization mode (truncate, signed_pcm)
    /// - `SINE_HEADER` - Header policy (legacy, derived)
    ///
    /// Falls back to defaults for unset or unparseable variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Applies overrides from a variable lookup.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("SINE_FREQUENCY_HZ") {
            match value.parse::<f64>() {
                Ok(frequency) if frequency.is_finite() && frequency > 0.0 => {
                    self.frequency_hz = frequency;
                }
                _ => warn!(value = %value, "ignoring invalid SINE_FREQUENCY_HZ"),
            }
        }

        if let Some(value) = lookup("SINE_SAMPLE_RATE_HZ") {
            match value.parse::<u32>() {
                Ok(rate) if rate > 0 => self.sample_rate_hz = rate,
                _ => warn!(value = %value, "ignoring invalid SINE_SAMPLE_RATE_HZ"),
            }
        }

        if let Some(value) = lookup("SINE_QUANTIZATION") {
            match Quantization::parse(&value) {
                Some(quantization) => self.quantization = quantization,
                None => warn!(value = %value, "ignoring invalid SINE_QUANTIZATION"),
            }
        }

        if let Some(value) = lookup("SINE_HEADER") {
            match HeaderPolicy::parse(&value) {
                Some(header) => self.header = header,
                None => warn!(value = %value, "ignoring invalid SINE_HEADER"),
            }
        }
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails, None otherwise.
    pub fn validate(&self) -> Option<String> {
        self.build_generator().err().map(|e| e.message)
    }

    /// Builds a generator from this configuration.
    pub fn build_generator(&self) -> Result<SineGenerator> {
        Ok(SineGenerator::new(self.frequency_hz, self.sample_rate_hz)?
            .with_quantization(self.quantization))
    }
}

impl Default for SineConfig {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            quantization: Quantization::default(),
            header: HeaderPolicy::default(),
        }
    }
}
