//! sine-wav: writes a 16-bit mono sine tone to a WAV file.
//!
//! Can also print the header of an existing WAV file with `--inspect`.

use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sine_wav::audio::{read_wav_header, samples_to_duration, write_wav_file, WavHeader};
use sine_wav::cli::Cli;
use sine_wav::config::SineConfig;
use sine_wav::error::{ErrorCode, Result, SineError};

/// JSON summary printed with `--json`.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<&'a SineConfig>,
    header: WavHeader,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok()))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Builds the log filter from `RUST_LOG`, falling back to `info` when it is
/// unset or invalid.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();

    match &cli.inspect {
        Some(path) => run_inspect(path, cli.json),
        None => run_generate(&cli),
    }
}

/// Generates a tone and writes it to the output file.
fn run_generate(cli: &Cli) -> Result<()> {
    let mut config = SineConfig::from_env();
    cli.apply_to(&mut config);

    let mut generator = config.build_generator()?;
    let samples = cli.sample_count(config.sample_rate_hz);
    let output_path = cli.output_path();

    eprintln!("=== sine-wav ===");
    eprintln!("Frequency: {} Hz", config.frequency_hz);
    eprintln!("Sample rate: {} Hz", config.sample_rate_hz);
    eprintln!(
        "Samples: {} ({:.3}s)",
        samples,
        samples_to_duration(samples, config.sample_rate_hz)
    );
    eprintln!("Quantization: {}", config.quantization);
    eprintln!("Header: {}", config.header);
    eprintln!("Output: {}", output_path.display());

    let header = write_wav_file(&mut generator, samples, config.header, &output_path)?;
    info!(
        path = %output_path.display(),
        bytes = header.chunk_size as u64 + 8,
        "wrote WAV file"
    );

    if cli.json {
        print_json(&Summary {
            path: output_path.display().to_string(),
            config: Some(&config),
            header,
        })?;
    }

    Ok(())
}

/// Prints the header of an existing WAV file.
fn run_inspect(path: &Path, json: bool) -> Result<()> {
    let header = read_wav_header(path)?;

    if json {
        return print_json(&Summary {
            path: path.display().to_string(),
            config: None,
            header,
        });
    }

    println!("File: {}", path.display());
    println!("  Chunk size: {}", header.chunk_size);
    println!("  Audio format: {}", header.audio_format);
    println!("  Channels: {}", header.num_channels);
    println!("  Sample rate: {} Hz", header.sample_rate);
    println!("  Byte rate: {}", header.byte_rate);
    println!("  Block align: {}", header.block_align);
    println!("  Bits per sample: {}", header.bits_per_sample);
    println!(
        "  Data: {} bytes ({} samples)",
        header.data_size,
        header.sample_count()
    );

    Ok(())
}

fn print_json(summary: &Summary<'_>) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, summary).map_err(|e| {
        SineError::with_source(ErrorCode::Io, "Failed to write JSON summary", e)
    })?;
    writeln!(stdout).map_err(|e| SineError::io("Failed to write JSON summary", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sine_wav::HeaderPolicy;

    use tracing::level_filters::LevelFilter;

    #[test]
    fn log_filter_honours_rust_log() {
        let filter = log_filter(Some("debug".to_string()));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = log_filter(Some("sine_wav=trace".to_string()));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("  ".to_string())).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }

    #[test]
    fn summary_serializes_header_fields() {
        let header = WavHeader::for_samples(100, 44000, HeaderPolicy::Legacy).unwrap();
        let summary = Summary {
            path: "tone.wav".to_string(),
            config: None,
            header,
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["path"], "tone.wav");
        assert_eq!(json["header"]["chunk_size"], 236);
        assert_eq!(json["header"]["data_size"], 200);
        assert!(json.get("config").is_none());
    }
}
