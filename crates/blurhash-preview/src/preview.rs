//! Preview rendering: BlurHash token to an inline JPEG data URI.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::codec::{self, BlurHash, CHANNELS};
use crate::config::{Config, DEFAULT_JPEG_QUALITY, DEFAULT_TARGET_WIDTH};
use crate::error::{Error, Result};

/// Prefix of every rendered preview.
pub const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// How previews are rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewOptions {
    pub target_width: u32,
    pub punch: f64,
    pub jpeg_quality: u8,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            punch: 1.0,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl From<&Config> for PreviewOptions {
    fn from(config: &Config) -> Self {
        Self {
            target_width: config.target_width,
            punch: config.punch,
            jpeg_quality: config.jpeg_quality,
        }
    }
}

/// Height keeping the original aspect ratio at `target_width`, at least 1.
///
/// ```
/// use blurhash_preview::preview::target_height;
/// assert_eq!(target_height(1600, 900, 32).unwrap(), 18);
/// assert_eq!(target_height(100_000, 1, 32).unwrap(), 1);
/// ```
pub fn target_height(width: u32, height: u32, target_width: u32) -> Result<u32> {
    if width == 0 || height == 0 || target_width == 0 {
        return Err(Error::InvalidDimensions {
            width,
            height,
            target_width,
        });
    }
    let aspect = width as f64 / height as f64;
    let scaled = (target_width as f64 / aspect).round();
    Ok((scaled.min(u32::MAX as f64) as u32).max(1))
}

/// Compress an RGBA buffer to baseline JPEG. Alpha is dropped.
fn encode_jpeg(rgba: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>> {
    let rgb: Vec<u8> = rgba
        .chunks_exact(CHANNELS)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(Error::PreviewEncode)?;
    Ok(jpeg)
}

/// Render `hash` as a `data:image/jpeg;base64,` URI.
///
/// The preview is `options.target_width` pixels wide, with the height derived
/// from `original_width / original_height`.
pub fn render(
    hash: &BlurHash,
    original_width: u32,
    original_height: u32,
    options: &PreviewOptions,
) -> Result<String> {
    let width = options.target_width;
    let height = target_height(original_width, original_height, width)?;

    let pixels =
        codec::decode(hash.as_str(), width, height, options.punch).map_err(Error::HashDecode)?;
    let jpeg = encode_jpeg(&pixels, width, height, options.jpeg_quality)?;

    let mut uri = String::with_capacity(DATA_URI_PREFIX.len() + jpeg.len().div_ceil(3) * 4);
    uri.push_str(DATA_URI_PREFIX);
    STANDARD.encode_string(&jpeg, &mut uri);
    Ok(uri)
}

/// [`render`] at the given width with default punch and quality.
pub fn render_default(
    hash: &BlurHash,
    original_width: u32,
    original_height: u32,
    target_width: u32,
) -> Result<String> {
    let options = PreviewOptions {
        target_width,
        ..PreviewOptions::default()
    };
    render(hash, original_width, original_height, &options)
}
