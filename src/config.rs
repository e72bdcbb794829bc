use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;

const FILE_NAME: &str = ".twofactor";

/// One `label:secret` line of the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub label: String,
    pub secret: String,
}

/// `$HOME/.twofactor`
pub fn default_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(home.join(FILE_NAME))
}

pub fn load_config(path: &Path) -> Result<Vec<ConfigEntry>, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = read_config(BufReader::new(file));
    debug!(path = %path.display(), entries = entries.len(), "loaded config");

    Ok(entries)
}

/// Reads entries in file order. Lines without a `:` are skipped; anything
/// after a second `:` is ignored.
pub fn read_config<R: BufRead>(reader: R) -> Vec<ConfigEntry> {
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| {
            let mut fields = line.split(':');
            match (fields.next(), fields.next()) {
                (Some(label), Some(secret)) => Some(ConfigEntry {
                    label: label.to_string(),
                    secret: secret.to_string(),
                }),
                _ => None,
            }
        })
        .collect()
}
