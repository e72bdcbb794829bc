use std::io::{self, Stderr, Stdout, Write};

/// Console sink for command output; codes go to `out`, diagnostics to `err`.
pub struct OtpWriter {
    pub out: Stdout,
    pub err: Stderr,
}

impl OtpWriter {
    pub fn new() -> Self {
        OtpWriter {
            out: io::stdout(),
            err: io::stderr(),
        }
    }
}

pub trait OutErr {
    fn write_err(&mut self, s: &str);
    fn write(&mut self, s: &str);

    fn writeln(&mut self, s: &str) {
        self.write(&format!("{}\n", s));
    }

    fn writeln_err(&mut self, s: &str) {
        self.write_err(&format!("{}\n", s));
    }
}

impl OutErr for OtpWriter {
    fn write_err(&mut self, s: &str) {
        if let Err(e) = self.err.write_all(s.as_bytes()) {
            tracing::error!(error = %e, "could not write to stderr");
        }
    }

    fn write(&mut self, s: &str) {
        if let Err(e) = self.out.write_all(s.as_bytes()) {
            tracing::error!(error = %e, "could not write to stdout");
        }
    }
}
