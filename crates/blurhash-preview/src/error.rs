//! Error types for the BlurHash codec and the preview pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during BlurHash encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlurhashError {
    /// The BlurHash string has an invalid length.
    #[error("invalid BlurHash length: expected {expected}, got {actual}")]
    InvalidLength {
        /// The expected length.
        expected: usize,
        /// The actual length.
        actual: usize,
    },

    /// The component count is out of the valid range (1..=9).
    #[error("component count out of range: {axis} = {value} (must be 1..=9)")]
    InvalidComponentCount {
        /// Which axis ("x" or "y").
        axis: &'static str,
        /// The invalid value.
        value: u32,
    },

    /// An invalid character was encountered during base83 decoding.
    #[error("invalid base83 character: {0:?}")]
    InvalidBase83Character(char),

    /// A value does not fit the requested number of base83 digits.
    #[error("value {value} does not fit in {digits} base83 digits")]
    Base83Overflow { value: u64, digits: usize },

    /// The pixel buffer does not hold `width * height` RGBA pixels.
    #[error("pixel buffer length {actual} does not match {width}x{height}x4 = {expected}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// The image dimensions are invalid (zero or too large).
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// The width value.
        width: u32,
        /// The height value.
        height: u32,
        /// Why the dimensions are invalid.
        reason: &'static str,
    },
}

/// Result alias for the preview pipeline.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised while turning image files into a preview report.
///
/// Per-file variants are recovered by the batch driver; the ones reported
/// by [`Error::is_fatal`] end the run.
#[derive(Debug, Error)]
pub enum Error {
    /// The image file could not be opened or sniffed.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image file is corrupt or in an unsupported format.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The codec rejected the decoded samples.
    #[error("failed to compute BlurHash: {0}")]
    HashEncode(#[source] BlurhashError),

    /// The codec rejected the token or the preview size.
    #[error("failed to decode BlurHash: {0}")]
    HashDecode(#[source] BlurhashError),

    /// The placeholder pixels could not be compressed to JPEG.
    #[error("failed to encode preview: {0}")]
    PreviewEncode(#[source] image::ImageError),

    /// Zero width or height passed to the preview renderer.
    #[error("invalid preview dimensions: original {width}x{height}, target width {target_width}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        target_width: u32,
    },

    /// The working directory could not be listed.
    #[error("failed to list {}: {source}", path.display())]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report could not be persisted.
    #[error("failed to write report {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration error
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl Error {
    /// Whether this error aborts the whole batch rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ListDirectory { .. } | Error::ReportWrite { .. } | Error::Configuration(_)
        )
    }
}
