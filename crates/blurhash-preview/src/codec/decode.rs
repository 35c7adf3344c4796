//! BlurHash decoding: token to RGBA pixels.

use super::color::{linear_to_srgb, sign_pow, srgb_to_linear};
use super::encode::cosine_table;
use super::{base83, check_decode_target, BlurHash, Components, CHANNELS};
use crate::error::BlurhashError;

/// Read the component grid from the first character of a token.
///
/// # Errors
///
/// Returns [`BlurhashError::InvalidLength`] if the token is shorter than six
/// characters.
///
/// ```
/// use blurhash_preview::codec::{components, Components};
/// let grid = components("LEHV6nWB2yk8pyo0adR*.7kCMdnj").unwrap();
/// assert_eq!(grid, Components::new(4, 3).unwrap());
/// ```
pub fn components(token: &str) -> Result<Components, BlurhashError> {
    if token.len() < 6 {
        return Err(BlurhashError::InvalidLength {
            expected: 6,
            actual: token.len(),
        });
    }
    let flag = base83::digit(token.as_bytes()[0])?;
    Ok(Components::from_size_flag(flag as u64))
}

/// Unpack the DC and AC factors of a validated token, in linear light.
fn factors(hash: &BlurHash, punch: f64) -> Result<Vec<[f64; 3]>, BlurhashError> {
    let token = hash.as_str();
    let grid = hash.components();

    let quant_max = base83::decode(&token[1..2])?;
    let max_value = (quant_max as f64 + 1.0) / 166.0 * punch;

    let dc = base83::decode(&token[2..6])?;
    let mut out = Vec::with_capacity(grid.count());
    out.push([
        srgb_to_linear((dc >> 16) as u8),
        srgb_to_linear((dc >> 8) as u8),
        srgb_to_linear(dc as u8),
    ]);

    let unquantize = |q: u64| sign_pow((q as f64 - 9.0) / 9.0, 2.0) * max_value;
    for k in 1..grid.count() {
        let start = 4 + 2 * k;
        let ac = base83::decode(&token[start..start + 2])?;
        out.push([
            unquantize(ac / (19 * 19)),
            unquantize((ac / 19) % 19),
            unquantize(ac % 19),
        ]);
    }
    Ok(out)
}

/// Decode a token into a `width * height` RGBA buffer with opaque alpha.
///
/// `punch` scales the AC factors; `1.0` reproduces the encoded contrast.
///
/// # Examples
///
/// ```
/// use blurhash_preview::codec::decode;
/// let pixels = decode("LEHV6nWB2yk8pyo0adR*.7kCMdnj", 32, 18, 1.0).unwrap();
/// assert_eq!(pixels.len(), 32 * 18 * 4);
/// assert!(pixels.chunks(4).all(|px| px[3] == 255));
/// ```
pub fn decode(token: &str, width: u32, height: u32, punch: f64) -> Result<Vec<u8>, BlurhashError> {
    check_decode_target(width, height)?;
    let hash = BlurHash::parse(token)?;
    let grid = hash.components();
    let colors = factors(&hash, punch)?;

    let w = width as usize;
    let h = height as usize;
    let cx = grid.x() as usize;
    let cy = grid.y() as usize;
    let cos_x = cosine_table(grid.x(), width);
    let cos_y = cosine_table(grid.y(), height);

    let mut pixels = vec![0u8; w * h * CHANNELS];
    // Colors folded over the vertical bases for the current row.
    let mut row_colors = vec![[0.0f64; 3]; cx];

    for (y, row) in pixels.chunks_exact_mut(w * CHANNELS).enumerate() {
        for (i, rc) in row_colors.iter_mut().enumerate() {
            *rc = [0.0; 3];
            for j in 0..cy {
                let c = cos_y[j * h + y];
                let color = &colors[j * cx + i];
                rc[0] += c * color[0];
                rc[1] += c * color[1];
                rc[2] += c * color[2];
            }
        }

        for (x, px) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let mut rgb = [0.0f64; 3];
            for (i, rc) in row_colors.iter().enumerate() {
                let c = cos_x[i * w + x];
                rgb[0] += c * rc[0];
                rgb[1] += c * rc[1];
                rgb[2] += c * rc[2];
            }
            px[0] = linear_to_srgb(rgb[0]);
            px[1] = linear_to_srgb(rgb[1]);
            px[2] = linear_to_srgb(rgb[2]);
            px[3] = u8::MAX;
        }
    }

    Ok(pixels)
}
