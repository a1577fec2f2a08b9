// 🎨 Chart kit - colour palette and magnitude tiers for every chart
//
// The application builds one `ChartKit` at startup and hands it to whatever
// renders charts. Individual sections never register colours themselves.
// Dropping the kit is the teardown.

use crate::data::Dataset;
use serde::Serialize;
use std::collections::HashMap;

/// 24-bit colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#RRGGBB` (the leading `#` is optional)
    pub fn parse(token: &str) -> Option<Rgb> {
        let hex = token.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

const FALLBACK_COLOR: Rgb = Rgb(0x94, 0xA3, 0xB8);

/// Accent colours used by the built-in charts
pub const ACCENT_BLUE: &str = "#60A5FA";
pub const ACCENT_RED: &str = "#EF4444";
pub const ACCENT_AMBER: &str = "#F59E0B";
pub const ACCENT_GREEN: &str = "#10B981";
pub const ACCENT_CYAN: &str = "#22D3EE";

// ============================================================================
// MAGNITUDE TIERS
// ============================================================================

/// Colour band of an inflation rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RateTier {
    Deflation,
    Moderate,
    High,
    Severe,
    Hyper,
}

impl RateTier {
    pub fn of(rate: f64) -> Self {
        if rate < 0.0 {
            RateTier::Deflation
        } else if rate >= 1_000_000.0 {
            RateTier::Hyper
        } else if rate >= 1000.0 {
            RateTier::Severe
        } else if rate >= 100.0 {
            RateTier::High
        } else {
            RateTier::Moderate
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            RateTier::Deflation => Rgb(56, 189, 248),
            RateTier::Moderate => Rgb(96, 165, 250),
            RateTier::High => Rgb(234, 179, 8),
            RateTier::Severe => Rgb(249, 115, 22),
            RateTier::Hyper => Rgb(239, 68, 68),
        }
    }
}

/// How restrictive a policy rate is, with the explainer's one-line reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PolicyStance {
    Loose,
    Balanced,
    Tight,
}

impl PolicyStance {
    pub fn of(rate: f64) -> Self {
        if rate <= 1.0 {
            PolicyStance::Loose
        } else if rate <= 3.0 {
            PolicyStance::Balanced
        } else {
            PolicyStance::Tight
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PolicyStance::Loose => "Niedrige Zinsen fördern Wirtschaftswachstum",
            PolicyStance::Balanced => "Moderate Zinsen für ausgewogene Wirtschaft",
            PolicyStance::Tight => "Hohe Zinsen bremsen Inflation, aber auch Wachstum",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            PolicyStance::Loose => Rgb(74, 222, 128),
            PolicyStance::Balanced => Rgb(250, 204, 21),
            PolicyStance::Tight => Rgb(248, 113, 113),
        }
    }
}

// ============================================================================
// CHART KIT
// ============================================================================

#[derive(Debug)]
pub struct ChartKit {
    palette: HashMap<String, Rgb>,
}

impl ChartKit {
    /// One-time setup: register the accent colours and every colour token the
    /// dataset uses
    pub fn init(dataset: &Dataset) -> Self {
        let mut kit = ChartKit {
            palette: HashMap::new(),
        };
        for token in [ACCENT_BLUE, ACCENT_RED, ACCENT_AMBER, ACCENT_GREEN, ACCENT_CYAN] {
            kit.register(token);
        }
        for part in dataset.causes.iter().chain(&dataset.cpi_weights) {
            if kit.register(&part.color).is_none() {
                tracing::warn!(label = %part.label, color = %part.color, "unparsable colour token");
            }
        }
        tracing::debug!(colors = kit.palette.len(), "chart kit initialised");
        kit
    }

    pub fn register(&mut self, token: &str) -> Option<Rgb> {
        let rgb = Rgb::parse(token)?;
        self.palette.insert(normalize_token(token), rgb);
        Some(rgb)
    }

    /// Registered colour, or a neutral grey for unknown tokens
    pub fn color(&self, token: &str) -> Rgb {
        self.palette.get(&normalize_token(token)).copied().unwrap_or(FALLBACK_COLOR)
    }

    pub fn len(&self) -> usize {
        self.palette.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palette.is_empty()
    }
}

impl Drop for ChartKit {
    fn drop(&mut self) {
        tracing::debug!(colors = self.palette.len(), "chart kit torn down");
    }
}

fn normalize_token(token: &str) -> String {
    token.trim().trim_start_matches('#').to_ascii_uppercase()
}
