//! Pure-Rust BlurHash codec over RGBA buffers.
//!
//! Tokens follow the format published at <https://blurha.sh/>: one size
//! character, one quantized-maximum character, four DC characters and two
//! characters per AC component, all base83.

use std::fmt;
use std::str::FromStr;

use crate::error::BlurhashError;

pub mod base83;
pub mod color;

mod decode;
mod encode;

pub use decode::{components, decode};
pub use encode::encode;

/// Bytes per pixel in every buffer the codec reads or writes.
pub const CHANNELS: usize = 4;

/// Largest width or height [`decode`] will render. Encoding has no upper
/// bound; it keeps a single row of linear samples in memory.
pub const MAX_DIMENSION: u32 = 10_000;

/// Number of horizontal and vertical DCT components in a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Components {
    x: u32,
    y: u32,
}

impl Components {
    /// Create a grid, rejecting counts outside 1..=9.
    pub fn new(x: u32, y: u32) -> Result<Self, BlurhashError> {
        for (axis, value) in [("x", x), ("y", y)] {
            if !(1..=9).contains(&value) {
                return Err(BlurhashError::InvalidComponentCount { axis, value });
            }
        }
        Ok(Self { x, y })
    }

    pub fn x(self) -> u32 {
        self.x
    }

    pub fn y(self) -> u32 {
        self.y
    }

    /// Total number of components, DC included.
    pub fn count(self) -> usize {
        (self.x * self.y) as usize
    }

    /// Length of a token encoded with this grid.
    pub fn token_len(self) -> usize {
        4 + 2 * self.count()
    }

    pub(crate) fn size_flag(self) -> u64 {
        ((self.x - 1) + (self.y - 1) * 9) as u64
    }

    pub(crate) fn from_size_flag(flag: u64) -> Self {
        Self {
            x: (flag % 9) as u32 + 1,
            y: (flag / 9) as u32 + 1,
        }
    }
}

impl Default for Components {
    /// The 4 x 4 grid used for previews.
    fn default() -> Self {
        Self { x: 4, y: 4 }
    }
}

impl fmt::Display for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

/// A structurally valid BlurHash token.
///
/// Parsing checks the alphabet and that the length matches the size flag;
/// it does not decode the components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlurHash(String);

impl BlurHash {
    pub fn parse(token: &str) -> Result<Self, BlurhashError> {
        let grid = components(token)?;
        if token.len() != grid.token_len() {
            return Err(BlurhashError::InvalidLength {
                expected: grid.token_len(),
                actual: token.len(),
            });
        }
        base83::validate(token)?;
        Ok(Self(token.to_owned()))
    }

    /// Wrap a token produced by [`encode`].
    pub(crate) fn from_encoded(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn components(&self) -> Components {
        // The first character was validated on construction.
        Components::from_size_flag(base83::digit(self.0.as_bytes()[0]).unwrap_or(0) as u64)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for BlurHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BlurHash {
    type Err = BlurhashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for BlurHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub(crate) fn check_nonzero(width: u32, height: u32) -> Result<(), BlurhashError> {
    if width == 0 || height == 0 {
        return Err(BlurhashError::InvalidDimensions {
            width,
            height,
            reason: "width and height must be > 0",
        });
    }
    Ok(())
}

pub(crate) fn check_decode_target(width: u32, height: u32) -> Result<(), BlurhashError> {
    check_nonzero(width, height)?;
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(BlurhashError::InvalidDimensions {
            width,
            height,
            reason: "dimensions must be <= 10000",
        });
    }
    Ok(())
}
