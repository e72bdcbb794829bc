use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cmd::codes::{drift_steps, load_entries, run_codes};
use cmd::generate::{requested_length, run_generate};
use cmd::Flag;
use ntp::{NtpClient, QUERY_TIMEOUT};
use time_source::{Clock, TimeSource};
use writer::OtpWriter;

mod cmd;
mod config;
mod error;
mod hotp;
mod ntp;
mod time_source;
mod totp;
mod utils;
mod writer;

#[cfg(test)]
mod tests;

fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "twofactor=debug"
    } else {
        "twofactor=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let matches = cmd::command()
        .get_matches_from(cmd::expand_legacy_flags(std::env::args_os()));
    init_tracing(matches.is_present(Flag::Debug.as_str()));

    let mut writer = OtpWriter::new();

    if let Some(length) = requested_length(&matches) {
        run_generate(length, &mut writer);
        return;
    }

    let entries = load_entries(&matches, &mut writer);

    let server = matches
        .value_of(Flag::Server.as_str())
        .unwrap_or(ntp::DEFAULT_SERVER);
    let client = NtpClient::new(server, QUERY_TIMEOUT);
    let use_network = !matches.is_present(Flag::NoNtp.as_str());
    debug!(server = client.server(), use_network, "resolving time");

    let time_source = TimeSource::new(Clock::new(), client);
    let now = time_source.now(use_network, drift_steps(&matches));

    run_codes(&entries, &now, &mut writer);
}
