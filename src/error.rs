use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TotpError {
    #[error("secret is not valid base32: {0}")]
    SecretDecode(#[source] data_encoding::DecodeError),
    #[error("secret alphabet could not be built: {0}")]
    Alphabet(#[from] data_encoding::SpecificationError),
    #[error("HMAC rejected the key length")]
    InvalidKeyLength,
}

/// Failure of a single network time exchange. Always recovered by falling
/// back to the computer clock.
#[derive(Debug, thiserror::Error)]
pub enum TimeQueryError {
    #[error("could not resolve time server {0}")]
    Resolve(String),
    #[error("time server exchange failed: {0}")]
    Io(#[from] io::Error),
    #[error("short response from time server: got {0} of 48 bytes")]
    ShortResponse(usize),
    #[error("time server sent no transmit timestamp")]
    MissingTransmitTimestamp,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {} could not be read: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no home directory to look for the config file in")]
    NoHomeDirectory,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DriftParseError {
    #[error("drift is empty")]
    Empty,
    #[error("drift {0:?} is not a whole number of steps")]
    Invalid(String),
}
