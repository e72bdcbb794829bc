use data_encoding::BASE32;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::DriftParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretLength {
    // 160 bits
    Standard,
    // 80 bits
    Short,
}

impl SecretLength {
    pub fn bytes(&self) -> usize {
        match self {
            SecretLength::Standard => 20,
            SecretLength::Short => 10,
        }
    }
}

// Generate a random base32 secret of the given length
pub fn generate_secret(length: SecretLength) -> String {
    let mut dest = vec![0u8; length.bytes()];
    OsRng.fill_bytes(&mut dest);
    BASE32.encode(&dest)
}

/// Parses a drift in 30-second steps: `3`, `3+`, `3-` or a signed integer.
pub fn parse_drift(value: &str) -> Result<i64, DriftParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DriftParseError::Empty);
    }

    let (magnitude, negate) = if let Some(rest) = value.strip_suffix('-') {
        (rest, true)
    } else if let Some(rest) = value.strip_suffix('+') {
        (rest, false)
    } else {
        (value, false)
    };

    let steps = magnitude
        .parse::<i64>()
        .map_err(|_| DriftParseError::Invalid(value.to_string()))?;

    if negate {
        steps
            .checked_neg()
            .ok_or_else(|| DriftParseError::Invalid(value.to_string()))
    } else {
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::totp::decode_secret;

    #[rstest]
    #[case(SecretLength::Standard, 32)]
    #[case(SecretLength::Short, 16)]
    fn generates_decodable_secrets(#[case] length: SecretLength, #[case] encoded_len: usize) {
        let secret = generate_secret(length);

        assert_eq!(secret.len(), encoded_len);
        assert_eq!(decode_secret(&secret).unwrap().len(), length.bytes());
    }

    #[test]
    fn generated_secrets_differ() {
        assert_ne!(
            generate_secret(SecretLength::Standard),
            generate_secret(SecretLength::Standard)
        );
    }

    #[rstest]
    #[case("3", 3)]
    #[case("3+", 3)]
    #[case("3-", -3)]
    #[case("-3", -3)]
    #[case("0-", 0)]
    #[case(" 12- ", -12)]
    fn parses_drift(#[case] value: &str, #[case] expected: i64) {
        assert_eq!(parse_drift(value), Ok(expected));
    }

    #[rstest]
    #[case("abc")]
    #[case("3--")]
    #[case("-")]
    #[case("1.5")]
    #[case("99999999999999999999")]
    fn rejects_malformed_drift(#[case] value: &str) {
        assert!(matches!(parse_drift(value), Err(DriftParseError::Invalid(_))));
    }

    #[test]
    fn rejects_empty_drift() {
        assert_eq!(parse_drift(""), Err(DriftParseError::Empty));
    }
}
