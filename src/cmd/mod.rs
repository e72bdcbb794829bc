use std::ffi::OsString;

use clap::{arg, command, Arg, Command};

use crate::ntp::DEFAULT_SERVER;

pub mod codes;
pub mod generate;

pub enum Flag {
    Gen,
    GenShort,
    Debug,
    NoNtp,
    Config,
    Server,
    Drift,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Gen => "gen",
            Flag::GenShort => "genshort",
            Flag::Debug => "debug",
            Flag::NoNtp => "no-ntp",
            Flag::Config => "config",
            Flag::Server => "server",
            Flag::Drift => "drift",
        }
    }
}

/// Rewrites the single-dash `-gen` and `-genshort` into their long forms.
pub fn expand_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| match arg.to_str() {
            Some("-gen") => OsString::from("--gen"),
            Some("-genshort") => OsString::from("--genshort"),
            _ => arg,
        })
        .collect()
}

pub fn command() -> Command<'static> {
    command!()
        .about("Show the current one-time passwords for the secrets in $HOME/.twofactor")
        .allow_negative_numbers(true)
        .args(&[
            arg!(--gen "Generate a new 160-bit secret and exit (also -gen)").required(false),
            arg!(--genshort "Generate a new 80-bit secret and exit (also -genshort)")
                .required(false),
            arg!(-d --debug "Trace how each code is derived").required(false),
            Arg::new(Flag::NoNtp.as_str())
                .short('n')
                .long(Flag::NoNtp.as_str())
                .help("Use the computer clock instead of asking a time server"),
            arg!(-c --config <FILE> "Config file of label:secret lines").required(false),
            arg!(-s --server <ADDR> "Time server to query")
                .required(false)
                .default_value(DEFAULT_SERVER),
            Arg::new(Flag::Drift.as_str())
                .help("Clock correction in 30 second steps, e.g. 2, 2+ or 2-")
                .required(false),
        ])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::tests::utils::get_args;

    #[test]
    fn defaults() {
        let args = get_args(&["twofactor"]).unwrap();

        assert!(!args.is_present(Flag::Gen.as_str()));
        assert!(!args.is_present(Flag::NoNtp.as_str()));
        assert_eq!(args.value_of(Flag::Server.as_str()), Some(DEFAULT_SERVER));
        assert_eq!(args.value_of(Flag::Config.as_str()), None);
        assert_eq!(args.value_of(Flag::Drift.as_str()), None);
    }

    #[rstest]
    #[case("2")]
    #[case("2+")]
    #[case("2-")]
    #[case("-2")]
    fn accepts_drift(#[case] drift: &str) {
        let args = get_args(&["twofactor", "-n", drift]).unwrap();

        assert!(args.is_present(Flag::NoNtp.as_str()));
        assert_eq!(args.value_of(Flag::Drift.as_str()), Some(drift));
    }

    #[test]
    fn accepts_options() {
        let args = get_args(&[
            "twofactor",
            "-d",
            "--config",
            "/tmp/secrets",
            "--server",
            "time.example.com:123",
            "--genshort",
        ])
        .unwrap();

        assert!(args.is_present(Flag::Debug.as_str()));
        assert!(args.is_present(Flag::GenShort.as_str()));
        assert_eq!(args.value_of(Flag::Config.as_str()), Some("/tmp/secrets"));
        assert_eq!(
            args.value_of(Flag::Server.as_str()),
            Some("time.example.com:123")
        );
    }

    #[rstest]
    #[case("-gen", Flag::Gen)]
    #[case("-genshort", Flag::GenShort)]
    #[case("--gen", Flag::Gen)]
    #[case("--genshort", Flag::GenShort)]
    fn accepts_single_dash_generate_flags(#[case] spelling: &str, #[case] flag: Flag) {
        let args = get_args(&["twofactor", spelling]).unwrap();
        assert!(args.is_present(flag.as_str()));
    }

    #[test]
    fn leaves_other_arguments_alone() {
        let expanded = expand_legacy_flags(["twofactor", "-d", "-3", "generic"]);
        assert_eq!(expanded, vec!["twofactor", "-d", "-3", "generic"]);
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(get_args(&["twofactor", "--bogus"]).is_err());
    }
}
