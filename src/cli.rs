//! CLI argument parser.
//!
//! Provides the command-line interface for writing sine tones to WAV files
//! and inspecting existing WAV headers.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::audio::{samples_for_duration, HeaderPolicy, Quantization};
use crate::config::SineConfig;

/// Sample quantization modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuantizationArg {
    /// Truncating conversion, identical to previously generated files
    Truncate,
    /// Full-range signed 16-bit PCM
    SignedPcm,
}

impl From<QuantizationArg> for Quantization {
    fn from(arg: QuantizationArg) -> Self {
        match arg {
            QuantizationArg::Truncate => Quantization::Truncate,
            QuantizationArg::SignedPcm => Quantization::SignedPcm,
        }
    }
}

/// WAV header policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeaderArg {
    /// Fixed 44000 Hz sample rate and byte rate of 2
    Legacy,
    /// Sample rate and byte rate derived from --sample-rate
    Derived,
}

impl From<HeaderArg> for HeaderPolicy {
    fn from(arg: HeaderArg) -> Self {
        match arg {
            HeaderArg::Legacy => HeaderPolicy::Legacy,
            HeaderArg::Derived => HeaderPolicy::Derived,
        }
    }
}

/// sine-wav: write a 16-bit mono sine tone to a WAV file
#[derive(Parser, Debug)]
#[command(name = "sine-wav")]
#[command(about = "Write a 16-bit mono PCM sine tone to a WAV file")]
#[command(version)]
pub struct Cli {
    /// Tone frequency in Hz [env: SINE_FREQUENCY_HZ, default: 440]
    #[arg(short, long)]
    pub frequency: Option<f64>,

    /// Generator sample rate in Hz [env: SINE_SAMPLE_RATE_HZ, default: 44000]
    #[arg(short = 'r', long)]
    pub sample_rate: Option<u32>,

    /// Number of samples to write
    #[arg(short = 'n', long, conflicts_with = "duration")]
    pub samples: Option<u32>,

    /// Duration to write in seconds (samples = duration * sample rate)
    #[arg(short, long)]
    pub duration: Option<f64>,

    /// Output WAV file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Sample quantization mode [env: SINE_QUANTIZATION]
    #[arg(long, value_enum)]
    pub quantization: Option<QuantizationArg>,

    /// Header rate fields policy [env: SINE_HEADER]
    #[arg(long, value_enum)]
    pub header: Option<HeaderArg>,

    /// Print the resulting header as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Print the header of an existing WAV file instead of writing one
    #[arg(long, value_name = "PATH")]
    pub inspect: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Returns true if an existing file should be inspected.
    pub fn is_inspect_mode(&self) -> bool {
        self.inspect.is_some()
    }

    /// Overrides config values with any flags given on the command line.
    pub fn apply_to(&self, config: &mut SineConfig) {
        if let Some(frequency) = self.frequency {
            config.frequency_hz = frequency;
        }
        if let Some(rate) = self.sample_rate {
            config.sample_rate_hz = rate;
        }
        if let Some(quantization) = self.quantization {
            config.quantization = quantization.into();
        }
        if let Some(header) = self.header {
            config.header = header.into();
        }
    }

    /// Returns the number of samples to write.
    ///
    /// Uses --samples, then --duration, then one second of audio.
    pub fn sample_count(&self, sample_rate_hz: u32) -> u32 {
        match (self.samples, self.duration) {
            (Some(samples), _) => samples,
            (None, Some(seconds)) => samples_for_duration(seconds, sample_rate_hz),
            (None, None) => sample_rate_hz,
        }
    }

    /// Returns the effective output path.
    ///
    /// Defaults to "sine.wav" in the current directory if not specified.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| PathBuf::from("sine.wav"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sine-wav").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = parse(&[]);
        let mut config = SineConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config, SineConfig::default());
        assert_eq!(cli.output_path(), PathBuf::from("sine.wav"));
        assert!(!cli.is_inspect_mode());
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&[
            "-f", "1000", "-r", "48000", "--quantization", "signed-pcm", "--header", "derived",
        ]);
        let mut config = SineConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config.frequency_hz, 1000.0);
        assert_eq!(config.sample_rate_hz, 48000);
        assert_eq!(config.quantization, Quantization::SignedPcm);
        assert_eq!(config.header, HeaderPolicy::Derived);
    }

    #[test]
    fn sample_count_sources() {
        assert_eq!(parse(&["-n", "100"]).sample_count(44000), 100);
        assert_eq!(parse(&["-d", "0.5"]).sample_count(44000), 22000);
        assert_eq!(parse(&[]).sample_count(48000), 48000);
    }

    #[test]
    fn samples_and_duration_conflict() {
        let result = Cli::try_parse_from(["sine-wav", "-n", "100", "-d", "1"]);
        assert!(result.is_err());
    }

    #[test]
    fn inspect_mode_detection() {
        let cli = parse(&["--inspect", "tone.wav", "--json"]);
        assert!(cli.is_inspect_mode());
        assert!(cli.json);
    }
}
