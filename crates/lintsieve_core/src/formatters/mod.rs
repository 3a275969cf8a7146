//! Sinks for reported findings.

mod baseline;

pub use baseline::BaselineFormatter;

use lintsieve_plugin::Finding;

use crate::LinterError;

/// Receives every finding that survived filtering.
pub trait Formatter {
    /// Handles one finding reported for `path` (the display path).
    fn handle(&mut self, path: &str, finding: &Finding) -> Result<(), LinterError>;

    /// Called once after the last finding.
    fn finish(&mut self) -> Result<(), LinterError> {
        Ok(())
    }
}
