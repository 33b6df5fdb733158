use crate::utils::error::Result;

/// Output target for price reports (terminal, log aggregator, ...).
pub trait NotifierPlugin: Send {
    fn name(&self) -> &str;

    /// Emit one report line. `overwrite_previous` asks the target to replace the
    /// previously emitted line; targets without cursor control ignore it.
    fn report(&mut self, message: &str, overwrite_previous: bool) -> Result<()>;
}
