// ⏱️ Interpolation Frame Scheduler
// Drives a progress callback once per display frame until the duration elapses
//
// The host owns the frame loop and calls `tick(now)` once per refresh. The
// scheduler turns wall-clock time into a normalized fraction and stops itself
// at t = 1. Callbacks live inside the scheduler, so cancelling (or dropping)
// it guarantees nothing fires afterwards.

use std::fmt;
use std::time::{Duration, Instant};

/// What happens when `run` is called again after the animation finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Replay {
    /// Animate once; later runs are no-ops
    #[default]
    Once,
    /// Start over from t = 0
    Restart,
}

/// Result of a `run` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Started,
    /// A run is already in flight; the request was ignored
    InFlight,
    /// Finished before and `Replay::Once` forbids another run
    AlreadyDone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    /// `run` accepted, waiting for the first frame to record the start time
    Pending,
    Running { start: Instant },
    Done,
}

type ProgressFn = Box<dyn FnMut(f64)>;
type DoneFn = Box<dyn FnOnce()>;

pub struct FrameScheduler {
    duration: Duration,
    replay: Replay,
    phase: Phase,
    on_progress: Option<ProgressFn>,
    on_done: Option<DoneFn>,
}

impl FrameScheduler {
    /// Zero durations are bumped to 1 ms so progress never divides by zero
    pub fn new(duration: Duration, replay: Replay) -> Self {
        FrameScheduler {
            duration: duration.max(Duration::from_millis(1)),
            replay,
            phase: Phase::Idle,
            on_progress: None,
            on_done: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn replay(&self) -> Replay {
        self.replay
    }

    /// Start an animation run
    ///
    /// `on_progress(t)` is invoked every frame with `t ∈ [0,1]`; `on_done()`
    /// is invoked exactly once, right after the frame that reached `t = 1`.
    pub fn run<P, D>(&mut self, on_progress: P, on_done: D) -> RunOutcome
    where
        P: FnMut(f64) + 'static,
        D: FnOnce() + 'static,
    {
        match self.phase {
            Phase::Pending | Phase::Running { .. } => return RunOutcome::InFlight,
            Phase::Done if self.replay == Replay::Once => return RunOutcome::AlreadyDone,
            Phase::Idle | Phase::Done => {}
        }

        self.on_progress = Some(Box::new(on_progress));
        self.on_done = Some(Box::new(on_done));
        self.phase = Phase::Pending;
        RunOutcome::Started
    }

    /// Advance one frame
    ///
    /// Returns `true` while another frame is wanted.
    pub fn tick(&mut self, now: Instant) -> bool {
        let start = match self.phase {
            Phase::Pending => {
                self.phase = Phase::Running { start: now };
                now
            }
            Phase::Running { start } => start,
            Phase::Idle | Phase::Done => return false,
        };

        let elapsed = now.saturating_duration_since(start);
        let t = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);

        if let Some(on_progress) = self.on_progress.as_mut() {
            on_progress(t);
        }

        if t < 1.0 {
            return true;
        }

        self.phase = Phase::Done;
        self.on_progress = None;
        if let Some(on_done) = self.on_done.take() {
            on_done();
        }
        false
    }

    /// Stop an in-flight run and release its callbacks
    ///
    /// Returns `true` if a run was actually cancelled. A cancelled scheduler
    /// is idle again and may be `run` later.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_running();
        self.on_progress = None;
        self.on_done = None;
        if was_active {
            self.phase = Phase::Idle;
        }
        was_active
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Pending | Phase::Running { .. })
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("duration", &self.duration)
            .field("replay", &self.replay)
            .field("phase", &self.phase)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    struct Recorder {
        progress: Rc<RefCell<Vec<f64>>>,
        done: Rc<RefCell<u32>>,
    }

    impl Recorder {
        fn new() -> Self {
            Recorder {
                progress: Rc::new(RefCell::new(Vec::new())),
                done: Rc::new(RefCell::new(0)),
            }
        }

        fn start(&self, scheduler: &mut FrameScheduler) -> RunOutcome {
            let progress = Rc::clone(&self.progress);
            let done = Rc::clone(&self.done);
            scheduler.run(
                move |t| progress.borrow_mut().push(t),
                move || *done.borrow_mut() += 1,
            )
        }
    }

    #[test]
    fn test_progress_and_single_done() {
        let rec = Recorder::new();
        let mut scheduler = FrameScheduler::new(ms(1000), Replay::Once);
        assert_eq!(rec.start(&mut scheduler), RunOutcome::Started);

        let t0 = Instant::now();
        assert!(scheduler.tick(t0));
        assert!(scheduler.tick(t0 + ms(250)));
        assert!(scheduler.tick(t0 + ms(500)));
        assert!(!scheduler.tick(t0 + ms(1200)));

        assert_eq!(*rec.progress.borrow(), vec![0.0, 0.25, 0.5, 1.0]);
        assert_eq!(*rec.done.borrow(), 1);
        assert!(scheduler.is_done());
    }

    #[test]
    fn test_no_progress_after_done() {
        let rec = Recorder::new();
        let mut scheduler = FrameScheduler::new(ms(100), Replay::Once);
        rec.start(&mut scheduler);

        let t0 = Instant::now();
        scheduler.tick(t0);
        scheduler.tick(t0 + ms(100));
        let calls = rec.progress.borrow().len();

        for extra in 1..10 {
            assert!(!scheduler.tick(t0 + ms(100 + extra * 16)));
        }
        assert_eq!(rec.progress.borrow().len(), calls);
        assert_eq!(*rec.done.borrow(), 1);
    }

    #[test]
    fn test_in_flight_guard() {
        let first = Recorder::new();
        let second = Recorder::new();
        let mut scheduler = FrameScheduler::new(ms(100), Replay::Once);

        assert_eq!(first.start(&mut scheduler), RunOutcome::Started);
        assert_eq!(second.start(&mut scheduler), RunOutcome::InFlight);

        let t0 = Instant::now();
        scheduler.tick(t0);
        assert_eq!(second.start(&mut scheduler), RunOutcome::InFlight);
        scheduler.tick(t0 + ms(100));

        assert!(second.progress.borrow().is_empty());
        assert_eq!(*first.done.borrow(), 1);
    }

    #[test]
    fn test_replay_once_is_noop() {
        let rec = Recorder::new();
        let mut scheduler = FrameScheduler::new(ms(50), Replay::Once);
        rec.start(&mut scheduler);
        let t0 = Instant::now();
        scheduler.tick(t0);
        scheduler.tick(t0 + ms(50));

        assert_eq!(rec.start(&mut scheduler), RunOutcome::AlreadyDone);
        assert!(!scheduler.tick(t0 + ms(60)));
        assert_eq!(*rec.done.borrow(), 1);
    }

    #[test]
    fn test_replay_restart() {
        let rec = Recorder::new();
        let mut scheduler = FrameScheduler::new(ms(50), Replay::Restart);
        rec.start(&mut scheduler);
        let t0 = Instant::now();
        scheduler.tick(t0);
        scheduler.tick(t0 + ms(50));

        assert_eq!(rec.start(&mut scheduler), RunOutcome::Started);
        scheduler.tick(t0 + ms(100));
        scheduler.tick(t0 + ms(150));
        assert_eq!(*rec.done.borrow(), 2);
        assert_eq!(*rec.progress.borrow(), vec![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_cancel_mid_run_stops_callbacks() {
        let rec = Recorder::new();
        let mut scheduler = FrameScheduler::new(ms(1000), Replay::Once);
        rec.start(&mut scheduler);

        let t0 = Instant::now();
        scheduler.tick(t0);
        scheduler.tick(t0 + ms(300));
        assert!(scheduler.cancel());

        for frame in 1..100 {
            assert!(!scheduler.tick(t0 + ms(300 + frame * 16)));
        }
        assert_eq!(rec.progress.borrow().len(), 2);
        assert_eq!(*rec.done.borrow(), 0);
        assert!(!scheduler.cancel());
    }

    #[test]
    fn test_drop_releases_callbacks() {
        let rec = Recorder::new();
        let mut scheduler = FrameScheduler::new(ms(1000), Replay::Once);
        rec.start(&mut scheduler);
        scheduler.tick(Instant::now());
        assert_eq!(Rc::strong_count(&rec.progress), 2);

        drop(scheduler);
        assert_eq!(Rc::strong_count(&rec.progress), 1);
        assert_eq!(Rc::strong_count(&rec.done), 1);
    }

    #[test]
    fn test_zero_duration_finishes_on_second_frame() {
        let rec = Recorder::new();
        let mut scheduler = FrameScheduler::new(Duration::ZERO, Replay::Once);
        assert_eq!(scheduler.duration(), ms(1));
        rec.start(&mut scheduler);

        let t0 = Instant::now();
        assert!(scheduler.tick(t0));
        assert!(!scheduler.tick(t0 + ms(1)));
        assert_eq!(*rec.done.borrow(), 1);
    }
}
