// 📜 Explainer page - the scrolling long-form view
//
// Sections are stacked vertically in terminal rows. Every frame the page
// measures how much of each section sits inside the viewport, feeds that to
// the section's visibility gate and advances the section's reveal. Each
// section owns the buffer its reveal writes into; the renderer only reads it.

use crate::anim::{
    intersection_ratio, Easing, FireReason, GateOptions, Replay, Reveal, RevealMode, Span, Typewriter,
    VisibilityGate,
};
use crate::calculators::{self, InflationImpact, ProgressionEffect, RealWageResult, Slider};
use crate::config::AppConfig;
use crate::data::Dataset;
use crate::selection::Selection;
use crate::sparkline;
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Hero,
    Definition,
    Statistics,
    Causes,
    Effects,
    Measurement,
    EcbPolicy,
    History,
    Calculator,
}

impl SectionKind {
    pub const ALL: [SectionKind; 9] = [
        SectionKind::Hero,
        SectionKind::Definition,
        SectionKind::Statistics,
        SectionKind::Causes,
        SectionKind::Effects,
        SectionKind::Measurement,
        SectionKind::EcbPolicy,
        SectionKind::History,
        SectionKind::Calculator,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::Definition => "definition",
            SectionKind::Statistics => "statistics",
            SectionKind::Causes => "causes",
            SectionKind::Effects => "effects",
            SectionKind::Measurement => "measurement",
            SectionKind::EcbPolicy => "ecb-policy",
            SectionKind::History => "history",
            SectionKind::Calculator => "calculator",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::Hero => "Inflation verstehen",
            SectionKind::Definition => "Was ist Inflation?",
            SectionKind::Statistics => "Inflation in Deutschland",
            SectionKind::Causes => "Ursachen der Inflation",
            SectionKind::Effects => "Auswirkungen auf den Alltag",
            SectionKind::Measurement => "Wie wird Inflation gemessen?",
            SectionKind::EcbPolicy => "Die Rolle der EZB",
            SectionKind::History => "Historische Hyperinflationen",
            SectionKind::Calculator => "Inflationsrechner",
        }
    }

    /// Height in terminal rows
    fn height(&self) -> f64 {
        match self {
            SectionKind::Hero => 12.0,
            SectionKind::Definition => 8.0,
            SectionKind::Statistics => 14.0,
            SectionKind::Causes => 12.0,
            SectionKind::Effects => 14.0,
            SectionKind::Measurement => 12.0,
            SectionKind::EcbPolicy => 14.0,
            SectionKind::History => 16.0,
            SectionKind::Calculator => 18.0,
        }
    }
}

/// Headline and core inflation grow side by side over this long
const MEASUREMENT_REVEAL: Duration = Duration::from_millis(1400);

const HERO_LINES: [&str; 2] = [
    "Inflation verstehen",
    "Warum dein Geld an Wert verliert und was die EZB dagegen tut",
];

// ============================================================================
// SECTION
// ============================================================================

/// Values a section reveals: the series, how long it grows and how it eases
type Series = (Vec<f64>, Duration, RevealMode, Easing);

/// Second series revealed in lockstep with the section's own
struct Overlay {
    reveal: Reveal,
    frame: Rc<RefCell<Vec<f64>>>,
}

pub struct Section {
    kind: SectionKind,
    span: Span,
    labels: Vec<String>,
    gate: VisibilityGate,
    reveal: Option<Reveal>,
    frame: Rc<RefCell<Vec<f64>>>,
    overlay: Option<Overlay>,
    left: Rc<Cell<bool>>,
    fired_by: Rc<Cell<Option<FireReason>>>,
}

/// Copy every frame the reveal emits into `frame`
fn play_into(reveal: &mut Reveal, frame: &Rc<RefCell<Vec<f64>>>) {
    let sink = Rc::clone(frame);
    reveal.play(move |values: &[f64]| {
        let mut out = sink.borrow_mut();
        out.clear();
        out.extend_from_slice(values);
    });
}

impl Section {
    fn new(
        kind: SectionKind,
        top: f64,
        labels: Vec<String>,
        targets: Option<Series>,
        threshold: f64,
        options: GateOptions,
    ) -> Self {
        let id = kind.id();
        let fired_by = Rc::new(Cell::new(None));
        let left = Rc::new(Cell::new(false));

        let fired = Rc::clone(&fired_by);
        let mut gate = VisibilityGate::new(threshold, options, move |reason| {
            tracing::info!(section = id, ?reason, "section revealed");
            fired.set(Some(reason));
        });
        if options.reset_on_leave {
            let left_flag = Rc::clone(&left);
            gate = gate.with_on_leave(move || left_flag.set(true));
        }

        let replay = if options.once { Replay::Once } else { Replay::Restart };
        let (frame, reveal) = match targets {
            Some((values, duration, mode, easing)) => {
                let zeros = vec![0.0; values.len()];
                let reveal = Reveal::new(values, duration, mode, easing, replay);
                (zeros, Some(reveal))
            }
            None => (Vec::new(), None),
        };

        Section {
            kind,
            span: Span::new(top, kind.height()),
            labels,
            gate,
            reveal,
            frame: Rc::new(RefCell::new(frame)),
            overlay: None,
            left,
            fired_by,
        }
    }

    /// Reveal `values` alongside the section's own series, same timing
    fn with_overlay(mut self, values: Vec<f64>) -> Self {
        let Some(primary) = self.reveal.as_ref() else {
            return self;
        };
        let frame = Rc::new(RefCell::new(vec![0.0; values.len()]));
        let reveal = Reveal::new(values, primary.duration(), primary.mode(), primary.easing(), primary.replay());
        self.overlay = Some(Overlay { reveal, frame });
        self
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Values currently on screen
    pub fn frame(&self) -> Ref<'_, Vec<f64>> {
        self.frame.borrow()
    }

    /// Final values the reveal grows towards
    pub fn targets(&self) -> &[f64] {
        self.reveal.as_ref().map(|r| r.targets()).unwrap_or(&[])
    }

    /// Values of the second series, if the section has one
    pub fn overlay_frame(&self) -> Option<Ref<'_, Vec<f64>>> {
        self.overlay.as_ref().map(|o| o.frame.borrow())
    }

    pub fn overlay_targets(&self) -> &[f64] {
        self.overlay.as_ref().map(|o| o.reveal.targets()).unwrap_or(&[])
    }

    pub fn fired_by(&self) -> Option<FireReason> {
        self.fired_by.get()
    }

    pub fn is_animating(&self) -> bool {
        self.reveal.as_ref().is_some_and(|r| r.is_running())
            || self.overlay.as_ref().is_some_and(|o| o.reveal.is_running())
    }

    pub fn is_revealed(&self) -> bool {
        self.reveal.as_ref().is_some_and(|r| r.is_done())
            && self.overlay.as_ref().map_or(true, |o| o.reveal.is_done())
    }

    fn start_reveal(&mut self) {
        let Some(reveal) = self.reveal.as_mut() else {
            return;
        };
        play_into(reveal, &self.frame);
        if let Some(overlay) = self.overlay.as_mut() {
            play_into(&mut overlay.reveal, &overlay.frame);
        }
    }

    fn reset_reveal(&mut self) {
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.cancel();
            self.frame.borrow_mut().iter_mut().for_each(|v| *v = 0.0);
            tracing::debug!(section = self.kind.id(), "section reset");
        }
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.reveal.cancel();
            overlay.frame.borrow_mut().iter_mut().for_each(|v| *v = 0.0);
        }
    }

    /// Advance every reveal; `true` while any is still running
    fn tick_reveals(&mut self, now: Instant) -> bool {
        let mut moving = false;
        if let Some(reveal) = self.reveal.as_mut() {
            moving |= reveal.tick(now);
        }
        if let Some(overlay) = self.overlay.as_mut() {
            moving |= overlay.reveal.tick(now);
        }
        moving
    }

    fn cancel_reveals(&mut self) {
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.cancel();
        }
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.reveal.cancel();
        }
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("kind", &self.kind)
            .field("span", &self.span)
            .field("frame", &self.frame.borrow())
            .field("overlay", &self.overlay.as_ref().map(|o| o.frame.borrow().len()))
            .field("gate", &self.gate)
            .finish()
    }
}

// ============================================================================
// CALCULATOR PANEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderField {
    Amount,
    Rate,
    Years,
    SalaryThen,
    SalaryNow,
    /// Price index a year ago (base-effect simulator)
    IndexPrevious,
    IndexCurrent,
}

impl SliderField {
    pub const ALL: [SliderField; 7] = [
        SliderField::Amount,
        SliderField::Rate,
        SliderField::Years,
        SliderField::SalaryThen,
        SliderField::SalaryNow,
        SliderField::IndexPrevious,
        SliderField::IndexCurrent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SliderField::Amount => "Betrag",
            SliderField::Rate => "Inflationsrate",
            SliderField::Years => "Jahre",
            SliderField::SalaryThen => "Gehalt 2020",
            SliderField::SalaryNow => "Gehalt heute",
            SliderField::IndexPrevious => "Index Vorjahr",
            SliderField::IndexCurrent => "Index heute",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CalculatorPanel {
    sliders: Vec<Slider>,
    focus: usize,
    inflation_rates: Vec<f64>,
    average_raises: Vec<f64>,
}

impl CalculatorPanel {
    fn new(dataset: &Dataset) -> Self {
        CalculatorPanel {
            sliders: vec![
                Slider::new(1000.0, 100_000.0, 1000.0, 10_000.0),
                Slider::new(0.0, 20.0, 0.5, 3.0),
                Slider::new(1.0, 30.0, 1.0, 10.0),
                Slider::new(20_000.0, 150_000.0, 1000.0, 45_000.0),
                Slider::new(20_000.0, 150_000.0, 1000.0, 50_000.0),
                Slider::new(80.0, 120.0, 1.0, 100.0),
                Slider::new(80.0, 130.0, 1.0, 102.0),
            ],
            focus: 0,
            inflation_rates: dataset.inflation_between(2020, 2024),
            average_raises: dataset.salary_growth_values(),
        }
    }

    pub fn focused(&self) -> SliderField {
        SliderField::ALL[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.sliders.len();
    }

    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + self.sliders.len() - 1) % self.sliders.len();
    }

    pub fn increment(&mut self) {
        self.sliders[self.focus].increment();
    }

    pub fn decrement(&mut self) {
        self.sliders[self.focus].decrement();
    }

    pub fn slider(&self, field: SliderField) -> &Slider {
        &self.sliders[field as usize]
    }

    /// Typed input; unparsable text counts as zero
    pub fn set_from_text(&mut self, field: SliderField, text: &str) {
        self.sliders[field as usize].set(calculators::parse_input(text));
    }

    pub fn value(&self, field: SliderField) -> f64 {
        self.slider(field).value()
    }

    pub fn impact(&self) -> InflationImpact {
        calculators::inflation_impact(
            self.value(SliderField::Amount),
            self.value(SliderField::Rate),
            self.value(SliderField::Years),
        )
    }

    pub fn real_wage(&self) -> RealWageResult {
        calculators::real_wage(
            self.value(SliderField::SalaryThen),
            self.value(SliderField::SalaryNow),
            &self.inflation_rates,
            &self.average_raises,
        )
    }

    /// Cold progression for a 5 % raise at the selected inflation rate
    pub fn progression(&self) -> ProgressionEffect {
        calculators::progression_effect(self.value(SliderField::SalaryNow), 5.0, self.value(SliderField::Rate))
    }

    /// Year-over-year rate the two index sliders imply
    pub fn base_effect(&self) -> f64 {
        calculators::base_effect(self.value(SliderField::IndexPrevious), self.value(SliderField::IndexCurrent))
    }
}

// ============================================================================
// PAGE
// ============================================================================

pub struct ExplainerPage {
    sections: Vec<Section>,
    scroll: f64,
    viewport_height: f64,
    measurable: bool,
    hero: Typewriter,
    hero_done: Rc<Cell<bool>>,
    sparklines: Vec<Vec<f64>>,
    cards: Selection,
    calculator: CalculatorPanel,
    show_core: bool,
}

impl ExplainerPage {
    pub fn new(dataset: &Dataset, config: &AppConfig, now: Instant) -> Self {
        let threshold = config.visibility_threshold;
        // Charts start only when actually seen; the intro must never stay blank
        let hero_gate = GateOptions {
            fallback: Some(config.fallback()),
            ..GateOptions::default()
        };
        let once = GateOptions {
            fallback: None,
            ..GateOptions::default()
        };
        let replay = GateOptions {
            fallback: None,
            ..GateOptions::replay()
        };
        let chart = config.chart_reveal();
        let whole = |values: Vec<f64>| Some((values, chart, RevealMode::WholeSeries, Easing::EaseOutQuad));

        let mut sections = Vec::with_capacity(SectionKind::ALL.len());
        let mut top = 0.0;
        for kind in SectionKind::ALL {
            let (labels, targets, options): (Vec<String>, _, _) = match kind {
                SectionKind::Hero => (Vec::new(), None, hero_gate),
                SectionKind::Definition | SectionKind::Calculator => (Vec::new(), None, once),
                SectionKind::Statistics => (
                    dataset.inflation_germany.iter().map(|p| p.period.clone()).collect(),
                    whole(dataset.inflation_values()),
                    once,
                ),
                SectionKind::Causes => (
                    dataset.causes.iter().map(|c| c.label.clone()).collect(),
                    // Shares of one whole grow together
                    Some((
                        dataset.causes.iter().map(|c| c.share).collect(),
                        chart,
                        RevealMode::Uniform,
                        Easing::EaseOutQuad,
                    )),
                    once,
                ),
                SectionKind::Effects => (
                    dataset.price_examples.iter().map(|p| p.item.clone()).collect(),
                    whole(dataset.price_examples.iter().map(|p| p.increase).collect()),
                    once,
                ),
                SectionKind::Measurement => (
                    dataset.inflation_germany.iter().map(|p| p.period.clone()).collect(),
                    Some((
                        dataset.inflation_values(),
                        MEASUREMENT_REVEAL,
                        RevealMode::WholeSeries,
                        Easing::EaseOutQuad,
                    )),
                    once,
                ),
                SectionKind::EcbPolicy => (
                    dataset.ecb_rates.iter().map(|p| p.period.clone()).collect(),
                    whole(dataset.ecb_rate_values()),
                    once,
                ),
                SectionKind::History => {
                    let events = dataset.events_by_period();
                    (
                        events.iter().map(|e| format!("{} {}", e.locale, e.period)).collect(),
                        // Log scale keeps 13,6 % and 13,6 Billiarden % on one axis
                        Some((
                            events.iter().map(|e| e.rate.max(1.0).log10()).collect(),
                            chart,
                            RevealMode::WholeSeries,
                            Easing::EaseOutCubic,
                        )),
                        replay,
                    )
                }
            };
            let mut section = Section::new(kind, top, labels, targets, threshold, options);
            if kind == SectionKind::Measurement {
                section = section.with_overlay(dataset.core_inflation_values());
            }
            top = section.span.bottom();
            sections.push(section);
        }
        for section in &mut sections {
            section.gate.arm(now);
        }

        let sparklines = dataset
            .events_by_period()
            .into_iter()
            .map(|event| sparkline::sparkline_for(event, config.sparkline_points))
            .collect();

        let hero_done = Rc::new(Cell::new(false));
        let done_flag = Rc::clone(&hero_done);
        let hero = Typewriter::new(HERO_LINES.iter().map(|s| s.to_string()).collect()).on_complete(move || {
            tracing::debug!("hero intro typed");
            done_flag.set(true);
        });

        tracing::info!(sections = sections.len(), height = top, "page laid out");

        ExplainerPage {
            sections,
            scroll: 0.0,
            viewport_height: 24.0,
            measurable: true,
            hero,
            hero_done,
            sparklines,
            cards: Selection::new(dataset.price_examples.len()),
            calculator: CalculatorPanel::new(dataset),
            show_core: true,
        }
    }

    /// Advance gates, reveals and the hero intro by one frame
    ///
    /// Returns `true` while anything is still moving.
    pub fn tick(&mut self, now: Instant) -> bool {
        let viewport = self.viewport();
        let mut moving = false;

        for section in &mut self.sections {
            let ratio = self.measurable.then(|| intersection_ratio(section.span, viewport));
            if section.gate.update(now, ratio).is_some() {
                if section.kind == SectionKind::Hero {
                    self.hero.start(now);
                } else {
                    section.start_reveal();
                }
            }
            if section.left.replace(false) {
                section.reset_reveal();
            }
            moving |= section.tick_reveals(now);
        }

        self.hero.tick(now);
        moving || (self.hero.is_started() && !self.hero.is_complete())
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn content_height(&self) -> f64 {
        self.sections.last().map(|s| s.span.bottom()).unwrap_or(0.0)
    }

    pub fn viewport(&self) -> Span {
        Span::new(self.scroll, self.viewport_height)
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(1.0);
        self.scroll_to(self.scroll);
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.scroll + delta);
    }

    pub fn scroll_to(&mut self, offset: f64) {
        let max = (self.content_height() - self.viewport_height).max(0.0);
        self.scroll = if offset.is_finite() { offset.clamp(0.0, max) } else { 0.0 };
    }

    /// Jump so that `kind` starts at the top of the viewport
    pub fn scroll_to_section(&mut self, kind: SectionKind) {
        if let Some(top) = self.section(kind).map(|s| s.span.top) {
            self.scroll_to(top);
        }
    }

    /// Sections overlapping the viewport, top to bottom
    pub fn visible_sections(&self) -> impl Iterator<Item = &Section> {
        let viewport = self.viewport();
        self.sections
            .iter()
            .filter(move |s| intersection_ratio(s.span, viewport) > 0.0)
    }

    /// Simulate a host that cannot measure visibility
    pub fn set_measurable(&mut self, measurable: bool) {
        self.measurable = measurable;
    }

    pub fn hero(&self) -> &Typewriter {
        &self.hero
    }

    pub fn hero_complete(&self) -> bool {
        self.hero_done.get()
    }

    /// One sparkline per historical event, ordered by period
    pub fn sparklines(&self) -> &[Vec<f64>] {
        &self.sparklines
    }

    pub fn cards(&self) -> &Selection {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut Selection {
        &mut self.cards
    }

    pub fn calculator(&self) -> &CalculatorPanel {
        &self.calculator
    }

    pub fn calculator_mut(&mut self) -> &mut CalculatorPanel {
        &mut self.calculator
    }

    /// Whether core inflation is drawn next to the headline rate
    pub fn show_core(&self) -> bool {
        self.show_core
    }

    pub fn toggle_core(&mut self) -> bool {
        self.show_core = !self.show_core;
        tracing::debug!(show_core = self.show_core, "core inflation toggled");
        self.show_core
    }
}

impl Drop for ExplainerPage {
    fn drop(&mut self) {
        self.hero.cancel();
        for section in &mut self.sections {
            section.gate.detach();
            section.cancel_reveals();
        }
    }
}

impl fmt::Debug for ExplainerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplainerPage")
            .field("scroll", &self.scroll)
            .field("viewport_height", &self.viewport_height)
            .field("sections", &self.sections.len())
            .finish()
    }
}
