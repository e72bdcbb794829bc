use std::fmt::{self, Display};

use data_encoding::{Encoding, Specification};
use tracing::debug;

use crate::error::TotpError;
use crate::hotp::get_hotp;

// TOTP https://datatracker.ietf.org/doc/html/rfc6238

pub const TIME_STEP: i64 = 30;

const BASE32_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// A 6-digit one-time password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code(u32);

impl Code {
    /// The code split into two groups of three, e.g. `016 105`.
    pub fn grouped(&self) -> String {
        let digits = self.to_string();
        format!("{} {}", &digits[..3], &digits[3..])
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0>6}", self.0)
    }
}

/// Derives the code for the 30-second window containing `unix_seconds`.
pub fn compute_code(secret: &str, unix_seconds: i64) -> Result<Code, TotpError> {
    let key = decode_secret(secret)?;
    let counter = time_counter(unix_seconds);
    debug!(unix_seconds, counter, "computing code");

    get_hotp(&key, counter).map(Code)
}

/// Seconds until the window containing `unix_seconds` rolls over, in `1..=30`.
pub fn remaining_seconds(unix_seconds: i64) -> i64 {
    TIME_STEP - unix_seconds.rem_euclid(TIME_STEP)
}

pub fn time_counter(unix_seconds: i64) -> i64 {
    unix_seconds.div_euclid(TIME_STEP)
}

/// Uppercases the secret and strips every whitespace character.
pub fn normalize_secret(secret: &str) -> String {
    secret
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Decodes a base32 secret into raw key bytes.
///
/// Padding is optional and bits left over after the last whole byte are
/// ignored, matching what authenticator apps accept.
pub fn decode_secret(secret: &str) -> Result<Vec<u8>, TotpError> {
    let normalized = normalize_secret(secret);
    let unpadded = normalized.trim_end_matches('=');

    // A trailing symbol that cannot complete a byte carries no key material.
    let usable = match unpadded.len() % 8 {
        1 | 3 | 6 => unpadded.len() - 1,
        _ => unpadded.len(),
    };

    lenient_base32()?
        .decode(&unpadded.as_bytes()[..usable])
        .map_err(TotpError::SecretDecode)
}

fn lenient_base32() -> Result<Encoding, TotpError> {
    let mut spec = Specification::new();
    spec.symbols.push_str(BASE32_SYMBOLS);
    spec.check_trailing_bits = false;

    Ok(spec.encoding()?)
}
