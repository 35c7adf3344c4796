//! Hash generation: image file to BlurHash token plus source dimensions.

use std::path::Path;

use image::{ImageReader, RgbaImage};
use log::debug;

use crate::codec::{self, BlurHash, Components};
use crate::error::{Error, Result};

/// Decoded RGBA samples of one source image.
#[derive(Debug, Clone)]
pub struct ImageSample {
    pixels: RgbaImage,
}

impl ImageSample {
    /// Decode `path`, sniffing the format from its content.
    ///
    /// The samples always carry four channels; sources without alpha get an
    /// opaque one.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let image = reader.decode().map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            pixels: image.to_rgba8(),
        })
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Hash these samples with the given grid.
    pub fn blurhash(&self, components: Components) -> Result<BlurHash> {
        codec::encode(self.as_raw(), self.width(), self.height(), components)
            .map_err(Error::HashEncode)
    }
}

/// Token and original dimensions for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHash {
    pub token: BlurHash,
    pub width: u32,
    pub height: u32,
}

/// Decode the image at `path` and compute its BlurHash.
///
/// The reported dimensions are those of the decoded raster.
pub fn generate(path: &Path, components: Components) -> Result<GeneratedHash> {
    let sample = ImageSample::load(path)?;
    let token = sample.blurhash(components)?;
    debug!(
        "{}: {}x{} -> {} ({components})",
        path.display(),
        sample.width(),
        sample.height(),
        token
    );
    Ok(GeneratedHash {
        token,
        width: sample.width(),
        height: sample.height(),
    })
}

/// [`generate`] with the default 4 x 4 grid.
pub fn generate_default(path: &Path) -> Result<GeneratedHash> {
    generate(path, Components::default())
}
