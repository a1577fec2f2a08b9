// Inflation Explainer - Core Library
// Exposes the animator, formatters, data tables and view models for the CLI,
// the terminal UI and tests

pub mod anim;           // Progressive Reveal Animator
pub mod calculators;
pub mod charts;
pub mod config;
pub mod data;
pub mod format;         // German number and magnitude formatting
pub mod logging;
pub mod page;           // Scrolling explainer page host
pub mod presentation;
pub mod selection;
pub mod sparkline;      // Seeded sparkline generator

// Re-export commonly used types
pub use anim::{
    ease_out_quad, reveal, Easing, FireReason, FrameScheduler, GateOptions, Replay, Reveal, RevealMode,
    RunOutcome, Span, Typewriter, VisibilityGate,
};
pub use calculators::{
    inflation_impact, parse_input, progression_effect, real_wage, Comparison, InflationImpact, ProgressionEffect,
    RealWageResult, Slider,
};
pub use charts::{ChartKit, PolicyStance, RateTier, Rgb};
pub use config::AppConfig;
pub use data::{
    CategoryBreakdown, CategoryInflation, CountryInflation, Dataset, EcbRatePoint, HistoricalEventRecord,
    PriceExample, RealWagePoint, TimeSeriesPoint,
};
pub use format::{format_eur, format_number, format_percent, format_rate, format_signed_percent};
pub use page::{CalculatorPanel, ExplainerPage, Section, SectionKind, SliderField};
pub use presentation::{Presentation, Slide, ROADMAP};
pub use selection::Selection;
pub use sparkline::{build_sparkline, generate, seed_from, sparkline_for, Mulberry32, SPARKLINE_POINTS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
