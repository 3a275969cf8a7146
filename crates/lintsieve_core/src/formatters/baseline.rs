//! Baseline file generation.

use std::io::Write;

use lintsieve_plugin::Finding;

use super::Formatter;
use crate::LinterError;
use crate::baseline::finding_digest;

/// Writes one baseline digest per finding, in the format
/// [`Baseline::load`](crate::Baseline::load) reads.
pub struct BaselineFormatter<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> BaselineFormatter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of digests written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Formatter for BaselineFormatter<W> {
    fn handle(&mut self, path: &str, finding: &Finding) -> Result<(), LinterError> {
        writeln!(self.writer, "{}", finding_digest(path, finding))?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), LinterError> {
        self.writer.flush()?;
        Ok(())
    }
}
