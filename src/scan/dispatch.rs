use tracing::info;

use crate::payload::{PayloadType, ScanAction};

/// Performs the effect a scan asks for (navigate, dial, ...).
///
/// Fire-and-forget: failures are reported back but never stop scanning.
pub trait ActionDispatcher {
    /// Act on `payload`, already classified as `kind`
    fn dispatch(&mut self, payload: &str, kind: PayloadType) -> Result<(), DispatchError>;
}

/// Reasons a dispatch did not happen
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// Host refused the effect (popup blocker, missing handler)
    #[error("dispatch blocked: {0}")]
    Blocked(String),
    /// Host cannot handle this payload type
    #[error("no handler for {0} payloads")]
    Unsupported(PayloadType),
}

/// Resolves each payload into a [`ScanAction`] and logs it
#[derive(Debug, Default)]
pub struct LoggingDispatcher {
    history: Vec<ScanAction>,
}

impl LoggingDispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions dispatched so far
    pub fn history(&self) -> &[ScanAction] {
        &self.history
    }
}

impl ActionDispatcher for LoggingDispatcher {
    fn dispatch(&mut self, payload: &str, kind: PayloadType) -> Result<(), DispatchError> {
        let action = ScanAction::resolve(payload);
        info!(%kind, ?action, "dispatching scan action");
        self.history.push(action);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_dispatcher_records_resolved_action() {
        let mut d = LoggingDispatcher::new();
        d.dispatch("tel:123", PayloadType::Phone).unwrap();
        assert_eq!(d.history(), &[ScanAction::Dial("123".into())]);
    }
}
