//! sRGB transfer function. Byte to linear goes through a compile-time
//! table; linear to byte is evaluated exactly so decoded pixels match the
//! reference BlurHash implementations.

/// `x^(1/n)` by Newton iteration; usable in const context.
const fn nth_root(x: f64, n: u32) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let mut guess = if x < 1.0 { 1.0 } else { x };
    let mut iter = 0;
    while iter < 100 {
        let mut pow = 1.0;
        let mut k = 1;
        while k < n {
            pow *= guess;
            k += 1;
        }
        let next = ((n - 1) as f64 * guess + x / pow) / n as f64;
        let delta = if next > guess { next - guess } else { guess - next };
        guess = next;
        if delta < 1e-15 {
            break;
        }
        iter += 1;
    }
    guess
}

static DECODE_TABLE: [f64; 256] = {
    let mut table = [0.0; 256];
    let mut i = 0;
    while i < 256 {
        let v = i as f64 / 255.0;
        table[i] = if v <= 0.04045 {
            v / 12.92
        } else {
            // v^2.4 == (v^2)^(6/5) == v^2 * (v^2)^(1/5)
            let b = (v + 0.055) / 1.055;
            let sq = b * b;
            sq * nth_root(sq, 5)
        };
        i += 1;
    }
    table
};

/// Convert an sRGB byte to linear light in `0.0..=1.0`.
///
/// ```
/// use blurhash_preview::codec::color::srgb_to_linear;
/// assert_eq!(srgb_to_linear(0), 0.0);
/// assert!((srgb_to_linear(255) - 1.0).abs() < 1e-9);
/// ```
#[inline]
pub fn srgb_to_linear(value: u8) -> f64 {
    DECODE_TABLE[value as usize]
}

/// Convert linear light to an sRGB byte. Out-of-range input is clamped.
///
/// ```
/// use blurhash_preview::codec::color::linear_to_srgb;
/// assert_eq!(linear_to_srgb(-0.2), 0);
/// assert_eq!(linear_to_srgb(1.7), 255);
/// ```
#[inline]
pub fn linear_to_srgb(value: f64) -> u8 {
    let v = value.clamp(0.0, 1.0);
    let srgb = if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (srgb * 255.0 + 0.5) as u8
}

/// `sign(value) * |value|^exp`.
#[inline]
pub fn sign_pow(value: f64, exp: f64) -> f64 {
    value.abs().powf(exp).copysign(value)
}
