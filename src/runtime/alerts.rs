use std::io::{self, Write};

use tracing::warn;

use crate::player::AlertSink;

/// Prints alerts as a visible block between command output lines.
pub struct ConsoleAlerts<W: Write> {
    out: W,
}

impl ConsoleAlerts<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleAlerts<W> {
    #[cfg(test)]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AlertSink for ConsoleAlerts<W> {
    fn notify(&mut self, title: &str, message: &str) {
        let written = writeln!(self.out, "\n!! {title}\n!! {message}").and_then(|_| self.out.flush());
        if let Err(e) = written {
            warn!(error = %e, title, message, "could not display alert");
        }
    }
}
