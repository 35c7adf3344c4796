//! BlurHash encoding: RGBA pixels to token.
//!
//! The DCT is evaluated separably. Each row is converted to linear light
//! once and projected onto the horizontal cosine bases; the per-row partial
//! sums are then folded into every vertical basis. Memory stays linear in
//! the image width.

use std::f64::consts::PI;

use super::color::{linear_to_srgb, sign_pow, srgb_to_linear};
use super::{base83, check_nonzero, BlurHash, Components, CHANNELS};
use crate::error::BlurhashError;

type Rgb = [f64; 3];

/// `table[k * len + n] = cos(PI * k * n / len)` for `k < count`.
pub(super) fn cosine_table(count: u32, len: u32) -> Vec<f64> {
    let mut table = Vec::with_capacity(count as usize * len as usize);
    for k in 0..count {
        for n in 0..len {
            table.push((PI * k as f64 * n as f64 / len as f64).cos());
        }
    }
    table
}

/// Encode an RGBA image into a BlurHash token.
///
/// `pixels` is row-major, four bytes per pixel; the alpha byte is ignored.
///
/// # Errors
///
/// Fails when a dimension is zero or when the buffer does not hold exactly
/// `width * height` pixels. There is no upper size limit.
///
/// # Examples
///
/// ```
/// use blurhash_preview::codec::{encode, Components};
/// let red = [255, 0, 0, 255].repeat(4);
/// let hash = encode(&red, 2, 2, Components::default()).unwrap();
/// assert_eq!(hash.as_str().len(), 36);
/// ```
pub fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    components: Components,
) -> Result<BlurHash, BlurhashError> {
    check_nonzero(width, height)?;

    let w = width as usize;
    let h = height as usize;
    let expected = w.checked_mul(h).and_then(|n| n.checked_mul(CHANNELS));
    if expected != Some(pixels.len()) {
        let expected = expected.unwrap_or(usize::MAX);
        return Err(BlurhashError::BufferSize {
            width,
            height,
            expected,
            actual: pixels.len(),
        });
    }

    let cx = components.x() as usize;
    let cy = components.y() as usize;
    let cos_x = cosine_table(components.x(), width);
    let cos_y = cosine_table(components.y(), height);

    let mut factors = vec![[0.0f64; 3]; cx * cy];
    let mut linear_row: Vec<Rgb> = vec![[0.0; 3]; w];
    let mut row_sums: Vec<Rgb> = vec![[0.0; 3]; cx];

    for (y, row) in pixels.chunks_exact(w * CHANNELS).enumerate() {
        for (dst, px) in linear_row.iter_mut().zip(row.chunks_exact(CHANNELS)) {
            *dst = [
                srgb_to_linear(px[0]),
                srgb_to_linear(px[1]),
                srgb_to_linear(px[2]),
            ];
        }

        for (i, sum) in row_sums.iter_mut().enumerate() {
            let basis = &cos_x[i * w..(i + 1) * w];
            *sum = linear_row
                .iter()
                .zip(basis)
                .fold([0.0; 3], |acc, (px, &c)| {
                    [acc[0] + c * px[0], acc[1] + c * px[1], acc[2] + c * px[2]]
                });
        }

        for j in 0..cy {
            let c = cos_y[j * h + y];
            for (i, sum) in row_sums.iter().enumerate() {
                let factor = &mut factors[j * cx + i];
                factor[0] += c * sum[0];
                factor[1] += c * sum[1];
                factor[2] += c * sum[2];
            }
        }
    }

    let scale = 1.0 / (w * h) as f64;
    for (k, factor) in factors.iter_mut().enumerate() {
        let norm = if k == 0 { scale } else { 2.0 * scale };
        factor.iter_mut().for_each(|v| *v *= norm);
    }

    Ok(BlurHash::from_encoded(pack(components, &factors)?))
}

/// Quantize DCT factors into the token string.
fn pack(components: Components, factors: &[Rgb]) -> Result<String, BlurhashError> {
    let (dc, ac) = factors.split_first().ok_or(BlurhashError::InvalidLength {
        expected: components.count(),
        actual: 0,
    })?;

    let mut token = String::with_capacity(components.token_len());
    base83::encode_into(components.size_flag(), 1, &mut token)?;

    let max_ac = ac
        .iter()
        .flatten()
        .fold(0.0f64, |max, v| max.max(v.abs()));
    let (quant_max, max_value) = if ac.is_empty() {
        (0, 1.0)
    } else {
        let q = (max_ac * 166.0 - 0.5).floor().clamp(0.0, 82.0) as u64;
        (q, (q as f64 + 1.0) / 166.0)
    };
    base83::encode_into(quant_max, 1, &mut token)?;

    let dc_value = ((linear_to_srgb(dc[0]) as u64) << 16)
        | ((linear_to_srgb(dc[1]) as u64) << 8)
        | linear_to_srgb(dc[2]) as u64;
    base83::encode_into(dc_value, 4, &mut token)?;

    let quantize = |v: f64| {
        (sign_pow(v / max_value, 0.5) * 9.0 + 9.5)
            .floor()
            .clamp(0.0, 18.0) as u64
    };
    for factor in ac {
        let value = quantize(factor[0]) * 19 * 19 + quantize(factor[1]) * 19 + quantize(factor[2]);
        base83::encode_into(value, 2, &mut token)?;
    }

    Ok(token)
}
