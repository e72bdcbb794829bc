use hmac::{Hmac, Mac};
use sha1::Sha1;
use tracing::debug;

use crate::error::TotpError;

// HOTP https://datatracker.ietf.org/doc/html/rfc4226

type HmacSha1 = Hmac<Sha1>;

const DIGITS: u32 = 6;

/// Derives the 6-digit HOTP value for `counter` under the raw `key`.
///
/// The counter is hashed as its 8-byte big-endian two's-complement form,
/// so negative counters hash differently from their unsigned reinterpretation.
pub fn get_hotp(key: &[u8], counter: i64) -> Result<u32, TotpError> {
    let hmac = make_hmac(key, counter)?;
    Ok(truncate(&hmac))
}

// HMAC_SHA-1 -> 20 byte string
fn make_hmac(key: &[u8], counter: i64) -> Result<[u8; 20], TotpError> {
    let message = counter.to_be_bytes();
    debug!(counter, message = %data_encoding::HEXLOWER.encode(&message), "hashing counter");

    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| TotpError::InvalidKeyLength)?;
    mac.update(&message);

    let mut digest = [0u8; 20];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    Ok(digest)
}

// reduce to 4 byte string
// then s to num mod 10^Digit
fn truncate(hmac: &[u8; 20]) -> u32 {
    dynamic_truncation(hmac) % u32::pow(10, DIGITS)
}

// DT(String) // String = String[0]...String[19]
// Let OffsetBits be the low-order 4 bits of String[19]
// Offset = StToNum(OffsetBits) // 0 <= OffSet <= 15
// Let P = String[OffSet]...String[OffSet+3]
// Return the Last 31 bits of P
fn dynamic_truncation(hmac: &[u8; 20]) -> u32 {
    let offset = (hmac[19] & 0xf) as usize;
    debug!(
        digest = %data_encoding::HEXLOWER.encode(hmac),
        offset_byte = hmac[19],
        offset,
        "truncating digest"
    );

    u32::from_be_bytes([
        hmac[offset] & 0x7f,
        hmac[offset + 1],
        hmac[offset + 2],
        hmac[offset + 3],
    ])
}
