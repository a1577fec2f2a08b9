// 👁️ Visibility Gate
// Fires a callback once a region scrolls into view
//
// The host measures how much of each region is inside the viewport and feeds
// the ratio in every frame. `None` means the host cannot measure visibility at
// all; the gate then fires straight away instead of never.

use std::fmt;
use std::time::{Duration, Instant};

/// Fire unconditionally after this long, in case visibility never reports in
pub const DEFAULT_FALLBACK: Duration = Duration::from_millis(1200);

// ============================================================================
// GEOMETRY
// ============================================================================

/// Vertical extent (rows, pixels, whatever unit the host lays out in)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f64,
    pub height: f64,
}

impl Span {
    pub fn new(top: f64, height: f64) -> Self {
        Span { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height.max(0.0)
    }
}

/// Fraction of `region` inside `viewport`, in `[0,1]`
///
/// Zero-height regions count as fully visible when their top edge lies
/// inside the viewport.
pub fn intersection_ratio(region: Span, viewport: Span) -> f64 {
    if region.height <= 0.0 {
        let inside = region.top >= viewport.top && region.top <= viewport.bottom();
        return if inside { 1.0 } else { 0.0 };
    }
    let overlap = region.bottom().min(viewport.bottom()) - region.top.max(viewport.top);
    (overlap.max(0.0) / region.height).clamp(0.0, 1.0)
}

// ============================================================================
// GATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateOptions {
    /// Fire once, then detach
    pub once: bool,
    /// Invoke the leave callback when the region drops below the threshold
    pub reset_on_leave: bool,
    /// Timed fallback trigger; `None` disables it
    pub fallback: Option<Duration>,
}

impl Default for GateOptions {
    fn default() -> Self {
        GateOptions {
            once: true,
            reset_on_leave: false,
            fallback: Some(DEFAULT_FALLBACK),
        }
    }
}

impl GateOptions {
    /// Re-fire on every re-entry and report leaves (timeline replay)
    pub fn replay() -> Self {
        GateOptions {
            once: false,
            reset_on_leave: true,
            ..GateOptions::default()
        }
    }
}

/// Why the gate fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireReason {
    Visible,
    Fallback,
    /// The host could not measure visibility
    Unavailable,
}

type VisibleFn = Box<dyn FnMut(FireReason)>;
type LeaveFn = Box<dyn FnMut()>;

pub struct VisibilityGate {
    threshold: f64,
    options: GateOptions,
    armed_at: Option<Instant>,
    fired: bool,
    inside: bool,
    // Set when firing without an entry: the next real entry must not start a second run
    absorb_entry: bool,
    on_visible: Option<VisibleFn>,
    on_leave: Option<LeaveFn>,
}

impl VisibilityGate {
    pub fn new<F>(threshold: f64, options: GateOptions, on_visible: F) -> Self
    where
        F: FnMut(FireReason) + 'static,
    {
        let threshold = if threshold.is_nan() { 0.0 } else { threshold.clamp(0.0, 1.0) };
        VisibilityGate {
            threshold,
            options,
            armed_at: None,
            fired: false,
            inside: false,
            absorb_entry: false,
            on_visible: Some(Box::new(on_visible)),
            on_leave: None,
        }
    }

    pub fn with_on_leave<F>(mut self, on_leave: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.on_leave = Some(Box::new(on_leave));
        self
    }

    /// Start the fallback timer (mount time)
    ///
    /// `update` arms the gate implicitly on its first call.
    pub fn arm(&mut self, now: Instant) {
        self.armed_at.get_or_insert(now);
    }

    /// Feed one visibility measurement
    pub fn update(&mut self, now: Instant, ratio: Option<f64>) -> Option<FireReason> {
        if self.is_detached() {
            return None;
        }
        let armed_at = *self.armed_at.get_or_insert(now);

        let Some(ratio) = ratio else {
            if self.fired {
                return None;
            }
            self.absorb_entry = !self.inside;
            return self.fire(FireReason::Unavailable);
        };

        let visible = ratio >= self.threshold && ratio > 0.0;
        if visible && !self.inside {
            self.inside = true;
            if self.absorb_entry {
                self.absorb_entry = false;
                return None;
            }
            return self.fire(FireReason::Visible);
        }
        if !visible && self.inside {
            self.inside = false;
            if self.options.reset_on_leave {
                if let Some(on_leave) = self.on_leave.as_mut() {
                    on_leave();
                }
            }
            return None;
        }

        match self.options.fallback {
            Some(delay) if !self.fired && now.saturating_duration_since(armed_at) >= delay => {
                self.absorb_entry = !self.inside;
                self.fire(FireReason::Fallback)
            }
            _ => None,
        }
    }

    fn fire(&mut self, reason: FireReason) -> Option<FireReason> {
        self.fired = true;
        tracing::debug!(reason = ?reason, threshold = self.threshold, "visibility gate fired");
        if let Some(on_visible) = self.on_visible.as_mut() {
            on_visible(reason);
        }
        if self.options.once {
            self.detach();
        }
        Some(reason)
    }

    /// Release callbacks and timers; the gate never fires again
    pub fn detach(&mut self) {
        self.on_visible = None;
        self.on_leave = None;
    }

    pub fn is_detached(&self) -> bool {
        self.on_visible.is_none()
    }
}

impl fmt::Debug for VisibilityGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityGate")
            .field("threshold", &self.threshold)
            .field("options", &self.options)
            .field("fired", &self.fired)
            .field("inside", &self.inside)
            .field("detached", &self.is_detached())
            .finish()
    }
}
