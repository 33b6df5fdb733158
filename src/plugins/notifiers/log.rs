use tracing::info;

use crate::plugins::traits::NotifierPlugin;
use crate::utils::error::Result;

/// Sends reports through the tracing subscriber. Log sinks have no cursor, so
/// the overwrite hint is only recorded as a field.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotifierPlugin for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn report(&mut self, message: &str, overwrite_previous: bool) -> Result<()> {
        info!(target: "uatu_pricewatch::report", repeated = overwrite_previous, "{}", message);
        Ok(())
    }
}
