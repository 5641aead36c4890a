//! Paces a scan loop at the display refresh rate on a tokio runtime.

use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

use super::scan_loop::ScanLoop;
use super::scheduler::FrameTicker;
use super::state::{RenderDirective, ScanEvent, TickOutcome, TickReport};

const MIN_PERIOD: Duration = Duration::from_micros(1);

/// Counters collected while driving a loop
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DriveSummary {
    /// Ticks that ran the full pipeline
    pub ticks: usize,
    /// Ticks that drew the code outline
    pub tracked_ticks: usize,
    /// Automatic dispatches
    pub dispatches: usize,
    /// Entries into the locked state
    pub confirmations: usize,
    /// Ticks dropped because of cancellation
    pub discarded: usize,
}

impl DriveSummary {
    fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        if matches!(report.render, RenderDirective::DrawTrackedCorners(_)) {
            self.tracked_ticks += 1;
        }
        match report.event {
            Some(ScanEvent::Dispatched { .. }) => self.dispatches += 1,
            Some(ScanEvent::AwaitingConfirmation(_)) => self.confirmations += 1,
            None => {}
        }
    }
}

/// Drive `scan` until no tick is pending.
///
/// Each iteration waits for the next refresh, takes the due token from
/// `ticker` and runs the tick with the time reported by `clock` (ms).
/// `on_tick` sees every completed report, e.g. to render it or to call
/// [`ScanLoop::accept`] in manual mode. A zero `period` is raised to 1µs.
pub async fn drive<C, F>(
    scan: &mut ScanLoop,
    ticker: &FrameTicker,
    period: Duration,
    mut clock: C,
    mut on_tick: F,
) -> DriveSummary
where
    C: FnMut() -> u64,
    F: FnMut(&mut ScanLoop, &TickReport),
{
    let mut summary = DriveSummary::default();
    let mut refresh = interval(period.max(MIN_PERIOD));
    refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        refresh.tick().await;
        let Some(token) = ticker.take_due() else {
            break;
        };
        match scan.tick(token, clock()).await {
            TickOutcome::Completed(report) => {
                summary.record(&report);
                on_tick(scan, &report);
            }
            TickOutcome::Discarded => summary.discarded += 1,
            TickOutcome::Stale => {}
        }
    }

    scan.apply_pending_teardown();
    debug!(ticks = summary.ticks, state = scan.state().name(), "scan driver stopped");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::DecoderChain;
    use crate::replay::ReplayScript;
    use std::rc::Rc;

    #[tokio::test(start_paused = true)]
    async fn test_zero_period_still_drives() {
        let script = ReplayScript::from_toml("[[tick]]\npayload = \"hello\"\nrepeat = 3").unwrap();
        let (source, decoder) = script.into_parts().unwrap();
        let ticker = Rc::new(FrameTicker::new());
        let mut scan = ScanLoop::new(
            source,
            DecoderChain::new().with_strategy(decoder),
            ticker.clone(),
        );
        scan.activate().unwrap();

        let mut seen = 0;
        let summary = drive(&mut scan, &ticker, Duration::ZERO, || 0, |scan, _| {
            seen += 1;
            if seen == 3 {
                scan.deactivate();
            }
        })
        .await;

        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.dispatches, 1);
    }
}
