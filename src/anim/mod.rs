// 🎞️ Progressive Reveal Animator
// Easing → frame scheduling → partial reveal → visibility gating
//
// Every chart in the explainer animates the same way: wait until the section
// is on screen, then grow its values from zero to the real numbers over a
// fixed duration. These modules hold that pipeline once.

pub mod easing;
pub mod reveal;
pub mod scheduler;
pub mod typewriter;
pub mod visibility;

pub use easing::{ease_out_quad, Easing};
pub use reveal::{reveal, Reveal, RevealMode};
pub use scheduler::{FrameScheduler, Replay, RunOutcome};
pub use typewriter::Typewriter;
pub use visibility::{intersection_ratio, FireReason, GateOptions, Span, VisibilityGate, DEFAULT_FALLBACK};
