//! Base83 digits used by BlurHash tokens.
//!
//! Numbers are written most-significant digit first with a fixed width,
//! using the 83-character alphabet below.

use crate::error::BlurhashError;

const ALPHABET: &[u8; 83] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz#$%*+,-.:;=?@[]^_{|}~";

const INVALID: u8 = u8::MAX;

/// ASCII byte to digit value, `INVALID` outside the alphabet.
static DIGITS: [u8; 128] = {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Value of a single base83 character.
pub fn digit(ch: u8) -> Result<u8, BlurhashError> {
    match DIGITS.get(ch as usize) {
        Some(&d) if d != INVALID => Ok(d),
        _ => Err(BlurhashError::InvalidBase83Character(ch as char)),
    }
}

/// Check every character of `s` against the alphabet.
pub fn validate(s: &str) -> Result<(), BlurhashError> {
    s.bytes().try_for_each(|ch| digit(ch).map(drop))
}

/// Decode a base83 string into an integer.
///
/// # Examples
///
/// ```
/// use blurhash_preview::codec::base83;
/// assert_eq!(base83::decode("10").unwrap(), 83);
/// assert_eq!(base83::decode("~").unwrap(), 82);
/// ```
pub fn decode(s: &str) -> Result<u64, BlurhashError> {
    s.bytes().try_fold(0u64, |acc, ch| {
        let d = digit(ch)?;
        acc.checked_mul(83)
            .and_then(|v| v.checked_add(d as u64))
            .ok_or(BlurhashError::Base83Overflow {
                value: u64::MAX,
                digits: s.len(),
            })
    })
}

/// Append `value` to `out` as exactly `digits` base83 characters.
pub fn encode_into(value: u64, digits: usize, out: &mut String) -> Result<(), BlurhashError> {
    let limit = 83u64.checked_pow(digits as u32).unwrap_or(u64::MAX);
    if value >= limit {
        return Err(BlurhashError::Base83Overflow { value, digits });
    }
    let mut divisor = limit / 83;
    for _ in 0..digits {
        out.push(ALPHABET[((value / divisor) % 83) as usize] as char);
        divisor = (divisor / 83).max(1);
    }
    Ok(())
}

/// Encode `value` as exactly `digits` base83 characters.
///
/// ```
/// use blurhash_preview::codec::base83;
/// assert_eq!(base83::encode(1, 4).unwrap(), "0001");
/// assert!(base83::encode(83, 1).is_err());
/// ```
pub fn encode(value: u64, digits: usize) -> Result<String, BlurhashError> {
    let mut out = String::with_capacity(digits);
    encode_into(value, digits, &mut out)?;
    Ok(out)
}
