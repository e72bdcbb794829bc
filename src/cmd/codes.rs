use std::path::PathBuf;

use clap::ArgMatches;
use tracing::{error, warn};

use super::Flag;
use crate::config::{default_path, load_config, ConfigEntry};
use crate::time_source::ResolvedTime;
use crate::totp::{compute_code, remaining_seconds};
use crate::utils::parse_drift;
use crate::writer::OutErr;

/// Drift steps from the positional argument; malformed input counts as 0.
pub fn drift_steps(args: &ArgMatches) -> i64 {
    match args.value_of(Flag::Drift.as_str()) {
        None => 0,
        Some(value) => parse_drift(value).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring drift");
            0
        }),
    }
}

/// Reads the config file named on the command line, or the default one.
/// An unreadable file prints guidance and yields no entries.
pub fn load_entries<W>(args: &ArgMatches, writer: &mut W) -> Vec<ConfigEntry>
where
    W: OutErr,
{
    let path = match args.value_of(Flag::Config.as_str()) {
        Some(path) => PathBuf::from(path),
        None => match default_path() {
            Ok(path) => path,
            Err(err) => {
                error!(error = %err, "no config file location");
                writer.writeln(&format!("{}", err));
                return Vec::new();
            }
        },
    };

    match load_config(&path) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(error = %err, "config unavailable");
            writer.writeln(&format!("Config file {} not found.", path.display()));
            writer.writeln("The config file format is label:sharedsecret");
            Vec::new()
        }
    }
}

pub fn run_codes<W>(entries: &[ConfigEntry], now: &ResolvedTime, writer: &mut W)
where
    W: OutErr,
{
    let unix_seconds = now.unix_seconds();
    let shown = match now.local_time() {
        Some(local) => local.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
        None => format!("{}s since 1970", unix_seconds),
    };
    writer.writeln(&format!("Time: {} ({})", shown, now.origin));

    let remaining = remaining_seconds(unix_seconds);

    for entry in entries {
        match compute_code(&entry.secret, unix_seconds) {
            Ok(code) => writer.writeln(&format!(
                "{} : {} : {} : {}s",
                code.grouped(),
                code,
                entry.label,
                remaining
            )),
            Err(err) => writer.writeln_err(&format!("{} : invalid secret: {}", entry.label, err)),
        }
    }
}
