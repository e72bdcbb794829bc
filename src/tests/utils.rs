use clap::{ArgMatches, Error};

use crate::cmd::{command, expand_legacy_flags};

pub fn get_args(arg_vec: &[&str]) -> Result<ArgMatches, Error> {
    command().try_get_matches_from(expand_legacy_flags(arg_vec.iter().copied()))
}
