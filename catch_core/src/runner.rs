//! Drive two boards in lockstep, one base tick at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use catch_traits::{Buzzer, Clock, DotMatrix, NavSwitch, SerialLink};
use eyre::WrapErr;

use crate::board::Board;
use crate::error::Result;
use crate::state::RoundState;

/// How long and how fast to run a pair.
#[derive(Clone, Default)]
pub struct RunOptions {
    /// Hard cap on base ticks.
    pub max_ticks: u64,
    /// Stop as soon as both boards have reached Over.
    pub stop_when_over: bool,
    /// Sleep to the base tick rate of board `a`; `None` runs flat out.
    pub pace: Option<Arc<dyn Clock + Send + Sync>>,
    /// Set from another thread (e.g. a Ctrl-C handler) to stop early.
    pub shutdown: Option<Arc<AtomicBool>>,
}

impl core::fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RunOptions")
            .field("max_ticks", &self.max_ticks)
            .field("stop_when_over", &self.stop_when_over)
            .field("paced", &self.pace.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub ticks: u64,
    /// Paced ticks that started after their deadline.
    pub late_ticks: u64,
    pub interrupted: bool,
}

/// Step `a` then `b` once per base tick. `before_tick` runs first on every
/// tick with the tick index; use it to feed scripted input.
pub fn run_pair<D, N, L, B, F>(
    a: &mut Board<D, N, L, B>,
    b: &mut Board<D, N, L, B>,
    opts: &RunOptions,
    mut before_tick: F,
) -> Result<RunReport>
where
    D: DotMatrix,
    N: NavSwitch,
    L: SerialLink,
    B: Buzzer,
    F: FnMut(u64, &mut Board<D, N, L, B>, &mut Board<D, N, L, B>),
{
    let mut report = RunReport::default();
    let tick_len = Duration::from_micros(a.scheduler().tick_us());
    let start = opts.pace.as_ref().map(|c| c.now());
    tracing::info!(
        max_ticks = opts.max_ticks,
        paced = opts.pace.is_some(),
        "run start"
    );

    while report.ticks < opts.max_ticks {
        if opts
            .shutdown
            .as_ref()
            .is_some_and(|s| s.load(Ordering::Relaxed))
        {
            report.interrupted = true;
            tracing::info!(tick = report.ticks, "run interrupted");
            break;
        }
        let t = report.ticks;
        before_tick(t, a, b);
        a.step().wrap_err_with(|| format!("board {} at tick {t}", a.id()))?;
        b.step().wrap_err_with(|| format!("board {} at tick {t}", b.id()))?;
        report.ticks += 1;

        if let (Some(clock), Some(start)) = (opts.pace.as_ref(), start) {
            let n = u32::try_from(report.ticks).unwrap_or(u32::MAX);
            let late = clock.sleep_until(start + tick_len.saturating_mul(n));
            if !late.is_zero() {
                report.late_ticks += 1;
            }
        }

        if opts.stop_when_over
            && a.session().state() == RoundState::Over
            && b.session().state() == RoundState::Over
        {
            break;
        }
    }

    tracing::info!(
        ticks = report.ticks,
        late_ticks = report.late_ticks,
        a_state = %a.session().state(),
        b_state = %b.session().state(),
        "run end"
    );
    Ok(report)
}
