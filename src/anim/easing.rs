// Easing functions
// Map linear elapsed-time fraction t ∈ [0,1] to eased progress ∈ [0,1]

use serde::{Deserialize, Serialize};

/// Ease-out-quadratic: `1 - (1 - t)^2`
///
/// The curve every chart in the explainer uses. Input is clamped to `[0,1]`,
/// non-finite input counts as 0.
pub fn ease_out_quad(t: f64) -> f64 {
    let t = clamp_unit(t);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Ease-out-cubic: `1 - (1 - t)^3`
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = clamp_unit(t);
    1.0 - (1.0 - t).powi(3)
}

/// Selectable easing curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    EaseOutQuad,
    EaseOutCubic,
}

impl Easing {
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => clamp_unit(t),
            Easing::EaseOutQuad => ease_out_quad(t),
            Easing::EaseOutCubic => ease_out_cubic(t),
        }
    }
}

/// Clamp into [0,1]; NaN becomes 0
pub(crate) fn clamp_unit(t: f64) -> f64 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}
