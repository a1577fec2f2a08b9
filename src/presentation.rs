// 🎤 Presentation mode - fixed slide deck for talks
//
// Navigation only moves the index. Whatever a slide does on entry (start a
// reveal, schedule roadmap highlights) happens on the next `tick`, so every
// timer shares the frame clock. Leaving a slide cancels its pending work.

use crate::anim::{Easing, Replay, Reveal, RevealMode};
use crate::config::AppConfig;
use crate::data::Dataset;
use std::cell::{Ref, RefCell};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slide {
    Title,
    Roadmap,
    Definition,
    Statistics,
    CausesIntro,
    CausesChart,
    EffectsIntro,
    EffectsPrices,
    MeasurementIntro,
    MeasurementCategories,
    EcbPolicy,
    EcbInstruments,
    EcbMechanism,
    HistoryIntro,
    HistoryTimeline,
    KeyTakeaways,
    Thanks,
}

impl Slide {
    pub const ALL: [Slide; 17] = [
        Slide::Title,
        Slide::Roadmap,
        Slide::Definition,
        Slide::Statistics,
        Slide::CausesIntro,
        Slide::CausesChart,
        Slide::EffectsIntro,
        Slide::EffectsPrices,
        Slide::MeasurementIntro,
        Slide::MeasurementCategories,
        Slide::EcbPolicy,
        Slide::EcbInstruments,
        Slide::EcbMechanism,
        Slide::HistoryIntro,
        Slide::HistoryTimeline,
        Slide::KeyTakeaways,
        Slide::Thanks,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Slide::Title => "title",
            Slide::Roadmap => "roadmap",
            Slide::Definition => "definition",
            Slide::Statistics => "statistics",
            Slide::CausesIntro => "causes-intro",
            Slide::CausesChart => "causes-chart",
            Slide::EffectsIntro => "effects-intro",
            Slide::EffectsPrices => "effects-prices",
            Slide::MeasurementIntro => "measurement-intro",
            Slide::MeasurementCategories => "measurement-categories",
            Slide::EcbPolicy => "ecb-policy",
            Slide::EcbInstruments => "ecb-instruments",
            Slide::EcbMechanism => "ecb-mechanism",
            Slide::HistoryIntro => "history-intro",
            Slide::HistoryTimeline => "history-timeline",
            Slide::KeyTakeaways => "key-takeaways",
            Slide::Thanks => "thanks",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Slide::Title => "Inflation verstehen",
            Slide::Roadmap => "Roadmap",
            Slide::Definition => "Was ist Inflation?",
            Slide::Statistics => "Inflation in Deutschland 2019-2025",
            Slide::CausesIntro => "Ursachen der Inflation",
            Slide::CausesChart => "Anteile der Ursachen",
            Slide::EffectsIntro => "Auswirkungen",
            Slide::EffectsPrices => "Preisentwicklung im Alltag",
            Slide::MeasurementIntro => "Wie wird Inflation gemessen?",
            Slide::MeasurementCategories => "Der Warenkorb",
            Slide::EcbPolicy => "EZB-Leitzins",
            Slide::EcbInstruments => "Instrumente der EZB",
            Slide::EcbMechanism => "Transmissionsmechanismus",
            Slide::HistoryIntro => "Inflation in der Geschichte",
            Slide::HistoryTimeline => "Historische Hyperinflationen",
            Slide::KeyTakeaways => "Kernaussagen",
            Slide::Thanks => "Vielen Dank!",
        }
    }
}

/// Roadmap cards with their bullet points
pub const ROADMAP: [(&str, [&str; 2]); 3] = [
    ("1. Grundlagen", ["Was ist Inflation?", "Deutschland: Entwicklung"]),
    ("2. Ursachen & Auswirkungen", ["Nachfrage vs. Angebot", "Reallöhne & Preise"]),
    ("3. EZB & Geschichte", ["EZB-Tools & Leitzins", "Historische Episoden"]),
];

const HIGHLIGHT_STAGGER: Duration = Duration::from_millis(900);
const HIGHLIGHT_HOLD: Duration = Duration::from_millis(700);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HighlightTimer {
    at: Instant,
    card: usize,
    on: bool,
}

// ============================================================================
// ANIMATED CHART
// ============================================================================

/// One-shot reveal plus the buffer it fills
struct SlideChart {
    reveal: Reveal,
    frame: Rc<RefCell<Vec<f64>>>,
}

impl SlideChart {
    fn new(values: Vec<f64>, duration: Duration, mode: RevealMode) -> Self {
        let frame = Rc::new(RefCell::new(vec![0.0; values.len()]));
        SlideChart {
            reveal: Reveal::new(values, duration, mode, Easing::EaseOutQuad, Replay::Once),
            frame,
        }
    }

    fn play(&mut self) {
        let sink = Rc::clone(&self.frame);
        self.reveal.play(move |values: &[f64]| {
            let mut out = sink.borrow_mut();
            out.clear();
            out.extend_from_slice(values);
        });
    }
}

// ============================================================================
// DECK
// ============================================================================

pub struct Presentation {
    index: usize,
    entry_pending: bool,
    statistics: SlideChart,
    ecb: SlideChart,
    timers: Vec<HighlightTimer>,
    highlighted: BTreeSet<usize>,
}

impl Presentation {
    pub fn new(dataset: &Dataset, config: &AppConfig) -> Self {
        Presentation {
            index: 0,
            entry_pending: true,
            statistics: SlideChart::new(
                dataset.inflation_values(),
                config.statistics_reveal(),
                RevealMode::TrailingEdge,
            ),
            ecb: SlideChart::new(dataset.ecb_rate_values(), config.ecb_reveal(), RevealMode::WholeSeries),
            timers: Vec::new(),
            highlighted: BTreeSet::new(),
        }
    }

    pub fn current(&self) -> Slide {
        Slide::ALL[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        Slide::ALL.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns `false` on the last slide
    pub fn next(&mut self) -> bool {
        self.go_to(self.index + 1)
    }

    /// Returns `false` on the first slide
    pub fn previous(&mut self) -> bool {
        match self.index.checked_sub(1) {
            Some(i) => self.go_to(i),
            None => false,
        }
    }

    pub fn home(&mut self) -> bool {
        self.go_to(0)
    }

    pub fn end(&mut self) -> bool {
        self.go_to(Slide::ALL.len() - 1)
    }

    fn go_to(&mut self, index: usize) -> bool {
        if index >= Slide::ALL.len() || index == self.index {
            return false;
        }
        self.leave();
        self.index = index;
        self.entry_pending = true;
        tracing::info!(slide = self.current().id(), index, "slide changed");
        true
    }

    fn leave(&mut self) {
        self.timers.clear();
        self.highlighted.clear();
        // An unfinished reveal starts over on the next visit
        match self.current() {
            Slide::Statistics => {
                self.statistics.reveal.cancel();
            }
            Slide::EcbPolicy => {
                self.ecb.reveal.cancel();
            }
            _ => {}
        }
    }

    fn enter(&mut self, now: Instant) {
        match self.current() {
            Slide::Statistics => self.statistics.play(),
            Slide::EcbPolicy => self.ecb.play(),
            Slide::Roadmap => {
                for card in 0..ROADMAP.len() {
                    let at = now + HIGHLIGHT_STAGGER * card as u32;
                    self.timers.push(HighlightTimer { at, card, on: true });
                }
            }
            _ => {}
        }
    }

    /// Run entry work and due timers, advance reveals
    ///
    /// Returns `true` while something is still scheduled.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.entry_pending {
            self.entry_pending = false;
            self.enter(now);
        }

        // Timers can schedule follow-ups, so loop until nothing is due
        while let Some(pos) = self.timers.iter().position(|t| t.at <= now) {
            let timer = self.timers.remove(pos);
            if timer.on {
                self.highlighted.insert(timer.card);
                self.timers.push(HighlightTimer {
                    at: timer.at + HIGHLIGHT_HOLD,
                    card: timer.card,
                    on: false,
                });
            } else {
                self.highlighted.remove(&timer.card);
            }
        }

        let stats = self.statistics.reveal.tick(now);
        let ecb = self.ecb.reveal.tick(now);
        stats || ecb || !self.timers.is_empty()
    }

    pub fn is_highlighted(&self, card: usize) -> bool {
        self.highlighted.contains(&card)
    }

    pub fn statistics_frame(&self) -> Ref<'_, Vec<f64>> {
        self.statistics.frame.borrow()
    }

    pub fn ecb_frame(&self) -> Ref<'_, Vec<f64>> {
        self.ecb.frame.borrow()
    }

    pub fn statistics_done(&self) -> bool {
        self.statistics.reveal.is_done()
    }

    pub fn ecb_done(&self) -> bool {
        self.ecb.reveal.is_done()
    }
}

impl fmt::Debug for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Presentation")
            .field("slide", &self.current())
            .field("timers", &self.timers.len())
            .field("highlighted", &self.highlighted)
            .finish()
    }
}
