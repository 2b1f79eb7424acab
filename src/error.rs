use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("at least one normal-speed range is required")]
    EmptyRanges,

    #[error("invalid normal-speed range {text:?}, expected \"start,stop\" in seconds")]
    InvalidRange { text: String },

    #[error("acceleration must be a finite positive number, got {value}")]
    InvalidAcceleration { value: f64 },

    #[error("minimum speed must be a finite positive number, got {value}")]
    InvalidMinSpeed { value: f64 },

    #[error("invalid speed range: min {min}, max {max}")]
    InvalidSpeedRange { min: f64, max: f64 },

    #[error("unsupported sample layout: {bits}-bit {format}")]
    UnsupportedFormat { bits: u16, format: &'static str },

    #[error("source has no channels")]
    NoChannels,

    #[error("source contains no frames")]
    EmptyInput,

    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
