use clap::ArgMatches;

use super::Flag;
use crate::utils::{generate_secret, SecretLength};
use crate::writer::OutErr;

/// The requested secret length, or `None` when no secret was asked for.
/// `--gen` wins when both flags are given.
pub fn requested_length(args: &ArgMatches) -> Option<SecretLength> {
    if args.is_present(Flag::Gen.as_str()) {
        Some(SecretLength::Standard)
    } else if args.is_present(Flag::GenShort.as_str()) {
        Some(SecretLength::Short)
    } else {
        None
    }
}

pub fn run_generate<W>(length: SecretLength, writer: &mut W)
where
    W: OutErr,
{
    let new_secret_key = generate_secret(length);
    writer.writeln(&new_secret_key);
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::tests::mocks::MockOtpWriter;
    use crate::tests::utils::get_args;

    #[rstest]
    #[case(&["twofactor", "--gen"], Some(SecretLength::Standard))]
    #[case(&["twofactor", "--genshort"], Some(SecretLength::Short))]
    #[case(&["twofactor", "--gen", "--genshort"], Some(SecretLength::Standard))]
    #[case(&["twofactor"], None)]
    fn picks_length_from_flags(#[case] arg_vec: &[&str], #[case] expected: Option<SecretLength>) {
        let args = get_args(arg_vec).unwrap();
        assert_eq!(requested_length(&args), expected);
    }

    #[test]
    fn generates_a_20_byte_secret() {
        let mut writer = MockOtpWriter::new();

        run_generate(SecretLength::Standard, &mut writer);

        let lines = writer.out_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 32);
        assert_eq!(writer.err, Vec::new());
    }

    #[test]
    fn generates_a_10_byte_secret() {
        let mut writer = MockOtpWriter::new();

        run_generate(SecretLength::Short, &mut writer);

        let lines = writer.out_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 16);
        assert_eq!(writer.err, Vec::new());
    }
}
