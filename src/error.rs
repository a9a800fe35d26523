//! Error types for sine-wav.
//!
//! Defines the error codes and the error type used throughout the crate for
//! consistent error handling and reporting.

use std::fmt;

/// Error codes identifying each failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Frequency is zero, negative, non-finite, or too high for the sample rate.
    /// Trigger: the computed period length would be undefined or zero.
    InvalidFrequency,

    /// Sample rate is zero.
    InvalidSampleRate,

    /// Requested sample count does not fit in a 32-bit RIFF chunk size.
    TooManySamples,

    /// Writing to the output sink failed.
    /// Trigger: I/O error on a header field or on the data copy.
    Io,

    /// Bytes do not form a canonical 44-byte PCM WAV header.
    InvalidHeader,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidFrequency => "INVALID_FREQUENCY",
            ErrorCode::InvalidSampleRate => "INVALID_SAMPLE_RATE",
            ErrorCode::TooManySamples => "TOO_MANY_SAMPLES",
            ErrorCode::Io => "IO_ERROR",
            ErrorCode::InvalidHeader => "INVALID_HEADER",
        }
    }

    /// Returns a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::InvalidFrequency => "Frequency must be finite, positive and below the sample rate limit",
            ErrorCode::InvalidSampleRate => "Sample rate must be greater than zero",
            ErrorCode::TooManySamples => "Sample count exceeds the WAV size limit",
            ErrorCode::Io => "Failed to write to the output sink",
            ErrorCode::InvalidHeader => "Input is not a canonical PCM WAV header",
        }
    }

    /// Returns a recovery hint suggesting how to resolve this error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::InvalidFrequency => {
                "Use a frequency greater than 0 Hz and well below the sample rate \
                 (e.g., --frequency 440)"
            }
            ErrorCode::InvalidSampleRate => "Use a positive sample rate (e.g., --sample-rate 44000)",
            ErrorCode::TooManySamples => {
                "Reduce the sample count or duration so the file stays under 4 GiB"
            }
            ErrorCode::Io => "Check that the output path is writable and the disk is not full",
            ErrorCode::InvalidHeader => {
                "Make sure the file is a mono 16-bit PCM WAV with a 44-byte header"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for sine-wav operations.
#[derive(Debug)]
pub struct SineError {
    /// The error code identifying the type of error.
    pub code: ErrorCode,
    /// Human-readable error message with context.
    pub message: String,
    /// Optional underlying cause of the error.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SineError {
    /// Creates a new SineError with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new SineError with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an INVALID_FREQUENCY error.
    pub fn invalid_frequency(frequency_hz: f64, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidFrequency,
            format!("Invalid frequency {} Hz: {}", frequency_hz, reason.into()),
        )
    }

    /// Creates an INVALID_SAMPLE_RATE error.
    pub fn invalid_sample_rate(sample_rate_hz: u32) -> Self {
        Self::new(
            ErrorCode::InvalidSampleRate,
            format!("Invalid sample rate: {} Hz", sample_rate_hz),
        )
    }

    /// Creates a TOO_MANY_SAMPLES error.
    pub fn too_many_samples(samples: u32) -> Self {
        Self::new(
            ErrorCode::TooManySamples,
            format!(
                "Too many samples: {} (RIFF chunk size would exceed {} bytes)",
                samples,
                u32::MAX
            ),
        )
    }

    /// Creates an IO_ERROR wrapping the underlying I/O failure.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        let context = context.into();
        Self::with_source(ErrorCode::Io, format!("{}: {}", context, source), source)
    }

    /// Creates an INVALID_HEADER error.
    pub fn invalid_header(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidHeader,
            format!("Invalid WAV header: {}", reason.into()),
        )
    }
}

impl fmt::Display for SineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}. Recovery: {}",
            self.code,
            self.message,
            self.code.recovery_hint()
        )
    }
}

impl std::error::Error for SineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias using SineError.
pub type Result<T> = std::result::Result<T, SineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn error_code_as_str() {
        assert_eq!(ErrorCode::InvalidFrequency.as_str(), "INVALID_FREQUENCY");
        assert_eq!(ErrorCode::InvalidSampleRate.as_str(), "INVALID_SAMPLE_RATE");
        assert_eq!(ErrorCode::TooManySamples.as_str(), "TOO_MANY_SAMPLES");
        assert_eq!(ErrorCode::Io.as_str(), "IO_ERROR");
        assert_eq!(ErrorCode::InvalidHeader.as_str(), "INVALID_HEADER");
    }

    #[test]
    fn error_code_hints_not_empty() {
        for code in [
            ErrorCode::InvalidFrequency,
            ErrorCode::InvalidSampleRate,
            ErrorCode::TooManySamples,
            ErrorCode::Io,
            ErrorCode::InvalidHeader,
        ] {
            assert!(!code.recovery_hint().is_empty());
            assert!(!code.description().is_empty());
        }
    }

    #[test]
    fn sine_error_display() {
        let err = SineError::invalid_sample_rate(0);
        let text = err.to_string();
        assert!(text.contains("INVALID_SAMPLE_RATE"));
        assert!(text.contains("0 Hz"));
        assert!(text.contains("Recovery:"));
    }

    #[test]
    fn io_error_keeps_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = SineError::io("Failed to write header", cause);
        assert_eq!(err.code, ErrorCode::Io);
        assert!(err.message.contains("pipe closed"));
        assert!(err.source().is_some());
    }
}
