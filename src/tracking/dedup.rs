use tracing::trace;

/// Default window during which the same payload is ignored
pub const DEFAULT_COOLDOWN_MS: u64 = 2000;

/// Decides whether a decoded payload is a new scan worth acting on.
///
/// A payload fires when nothing was accepted yet, when it differs from the
/// last accepted payload, or when more than `cooldown_ms` passed since the
/// last acceptance.
#[derive(Debug, Clone)]
pub struct ScanDeduplicator {
    cooldown_ms: u64,
    last_payload: Option<String>,
    last_accepted_at: Option<u64>,
}

impl ScanDeduplicator {
    /// Deduplicator with the given cooldown window
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            cooldown_ms,
            last_payload: None,
            last_accepted_at: None,
        }
    }

    /// Returns `true` and records the scan if `payload` should trigger an action
    pub fn should_act(&mut self, payload: &str, now_ms: u64) -> bool {
        let fire = match (&self.last_payload, self.last_accepted_at) {
            (Some(last), Some(at)) if last == payload => {
                // Clock going backwards counts as no time elapsed
                now_ms.saturating_sub(at) > self.cooldown_ms
            }
            _ => true,
        };
        if fire {
            self.last_payload = Some(payload.to_owned());
            self.last_accepted_at = Some(now_ms);
        } else {
            trace!(now_ms, "same payload within cooldown");
        }
        fire
    }

    /// Forget the last scan so the same code can fire immediately
    pub fn reset(&mut self) {
        self.last_payload = None;
        self.last_accepted_at = None;
    }

    /// Last accepted payload
    pub fn last_payload(&self) -> Option<&str> {
        self.last_payload.as_deref()
    }

    /// Timestamp of the last acceptance
    pub fn last_accepted_at(&self) -> Option<u64> {
        self.last_accepted_at
    }

    /// Configured cooldown
    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }
}

impl Default for ScanDeduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_MS)
    }
}
