// 📊 Partial-Reveal Sequencer
// Maps eased progress onto a series: revealed prefix, one growing value, hidden rest

use super::easing::{clamp_unit, Easing};
use super::scheduler::{FrameScheduler, Replay, RunOutcome};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

// ============================================================================
// SEQUENCER
// ============================================================================

/// How progress is spread over the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// `pos = p * n`: each element gets a full slot, the last one included
    #[default]
    WholeSeries,
    /// `pos = p * (n - 1)`: line-style reveal, the last point only lands on
    /// the completion snap
    TrailingEdge,
    /// Every element scaled by `p` at once
    Uniform,
}

/// Compute one frame of a reveal
///
/// - `i < idx`: `targets[i]`
/// - `i == idx`: `targets[i] * frac`
/// - `i > idx`: `0`
///
/// At `eased_progress >= 1` the result is exactly `targets`.
pub fn reveal(targets: &[f64], eased_progress: f64, mode: RevealMode) -> Vec<f64> {
    let mut out = Vec::with_capacity(targets.len());
    reveal_into(targets, eased_progress, mode, &mut out);
    out
}

/// Same as [`reveal`], writing into a caller-owned buffer
pub fn reveal_into(targets: &[f64], eased_progress: f64, mode: RevealMode, out: &mut Vec<f64>) {
    out.clear();
    let n = targets.len();
    if n == 0 {
        return;
    }

    let p = clamp_unit(eased_progress);
    if p >= 1.0 {
        out.extend_from_slice(targets);
        return;
    }

    if mode == RevealMode::Uniform {
        out.extend(targets.iter().map(|v| v * p));
        return;
    }

    // A single value has no slots to walk; it just grows
    let pos = match mode {
        _ if n == 1 => p,
        RevealMode::TrailingEdge => p * (n - 1) as f64,
        _ => p * n as f64,
    };
    let idx = (pos.floor() as usize).min(n - 1);
    let frac = (pos - idx as f64).clamp(0.0, 1.0);

    out.extend(targets.iter().enumerate().map(|(i, &v)| {
        if i < idx {
            v
        } else if i == idx {
            v * frac
        } else {
            0.0
        }
    }));
}

// ============================================================================
// REVEAL ANIMATION
// ============================================================================

/// Scheduler + sequencer bound to one target series
///
/// Each frame hands a partially revealed slice to `on_frame`; completion hands
/// over the exact targets so the final display is never a truncated value.
pub struct Reveal {
    scheduler: FrameScheduler,
    targets: Rc<[f64]>,
    mode: RevealMode,
    easing: Easing,
}

impl Reveal {
    /// Build and immediately start a one-shot reveal
    pub fn start<F>(
        targets: Vec<f64>,
        duration: Duration,
        mode: RevealMode,
        easing: Easing,
        on_frame: F,
    ) -> Self
    where
        F: FnMut(&[f64]) + 'static,
    {
        let mut reveal = Reveal::new(targets, duration, mode, easing, Replay::Once);
        reveal.play(on_frame);
        reveal
    }

    /// Build an idle reveal; call `play` to start it
    pub fn new(
        targets: Vec<f64>,
        duration: Duration,
        mode: RevealMode,
        easing: Easing,
        replay: Replay,
    ) -> Self {
        Reveal {
            scheduler: FrameScheduler::new(duration, replay),
            targets: targets.into(),
            mode,
            easing,
        }
    }

    pub fn play<F>(&mut self, on_frame: F) -> RunOutcome
    where
        F: FnMut(&[f64]) + 'static,
    {
        let sink = Rc::new(RefCell::new(on_frame));
        let frame_sink = Rc::clone(&sink);
        let targets = Rc::clone(&self.targets);
        let final_targets = Rc::clone(&self.targets);
        let (mode, easing) = (self.mode, self.easing);
        let mut buffer = Vec::with_capacity(targets.len());

        let outcome = self.scheduler.run(
            move |t| {
                // t = 1 is delivered by the completion snap below
                if t >= 1.0 {
                    return;
                }
                reveal_into(&targets, easing.apply(t), mode, &mut buffer);
                (&mut *frame_sink.borrow_mut())(buffer.as_slice());
            },
            move || {
                tracing::debug!(len = final_targets.len(), "reveal complete");
                (&mut *sink.borrow_mut())(&final_targets[..]);
            },
        );

        if outcome == RunOutcome::Started {
            tracing::debug!(
                len = self.targets.len(),
                mode = ?self.mode,
                duration_ms = self.scheduler.duration().as_millis() as u64,
                "reveal started"
            );
        }
        outcome
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.scheduler.tick(now)
    }

    pub fn cancel(&mut self) -> bool {
        self.scheduler.cancel()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn is_done(&self) -> bool {
        self.scheduler.is_done()
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    pub fn mode(&self) -> RevealMode {
        self.mode
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn duration(&self) -> Duration {
        self.scheduler.duration()
    }

    pub fn replay(&self) -> Replay {
        self.scheduler.replay()
    }
}

impl fmt::Debug for Reveal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reveal")
            .field("targets", &self.targets)
            .field("mode", &self.mode)
            .field("easing", &self.easing)
            .field("scheduler", &self.scheduler)
            .finish()
    }
}
