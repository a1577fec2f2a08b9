// ⌨️ Sequential typewriter
// Types several lines one after another: start delay, per-character interval,
// short pause between lines

use std::fmt;
use std::time::{Duration, Instant};

const DEFAULT_SPEED: Duration = Duration::from_millis(50);
const LINE_PAUSE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Waiting { index: usize, until: Instant },
    Typing { index: usize, shown: usize, next_at: Instant },
    Pausing { index: usize, until: Instant },
    Complete,
    Cancelled,
}

pub struct Typewriter {
    texts: Vec<String>,
    speeds: Vec<Duration>,
    delays: Vec<Duration>,
    displayed: Vec<String>,
    phase: Phase,
    on_complete: Option<Box<dyn FnOnce()>>,
}

impl Typewriter {
    /// Hero intro defaults: 80 ms/char after 500 ms, then 50 ms/char after 1 s
    pub fn new(texts: Vec<String>) -> Self {
        Self::with_timing(
            texts,
            vec![Duration::from_millis(80), Duration::from_millis(50)],
            vec![Duration::from_millis(500), Duration::from_millis(1000)],
        )
    }

    /// Missing speeds default to 50 ms, missing delays to zero
    pub fn with_timing(texts: Vec<String>, speeds: Vec<Duration>, delays: Vec<Duration>) -> Self {
        let displayed = vec![String::new(); texts.len()];
        Typewriter {
            texts,
            speeds,
            delays,
            displayed,
            phase: Phase::Idle,
            on_complete: None,
        }
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Begin typing; repeated calls are ignored
    pub fn start(&mut self, now: Instant) {
        if self.phase == Phase::Idle {
            self.begin_line(0, now);
        }
    }

    pub fn tick(&mut self, now: Instant) {
        loop {
            match self.phase {
                Phase::Waiting { index, until } if now >= until => {
                    self.phase = Phase::Typing {
                        index,
                        shown: 0,
                        next_at: until + self.speed(index),
                    };
                }
                Phase::Typing { index, shown, next_at } if now >= next_at => {
                    let len = self.texts[index].chars().count();
                    if shown < len {
                        let shown = shown + 1;
                        self.displayed[index] = self.texts[index].chars().take(shown).collect();
                        self.phase = Phase::Typing {
                            index,
                            shown,
                            next_at: next_at + self.speed(index),
                        };
                    } else {
                        self.phase = Phase::Pausing {
                            index,
                            until: next_at + LINE_PAUSE,
                        };
                    }
                }
                Phase::Pausing { index, until } if now >= until => self.begin_line(index + 1, until),
                _ => break,
            }
        }
    }

    fn begin_line(&mut self, index: usize, at: Instant) {
        if index >= self.texts.len() {
            self.phase = Phase::Complete;
            if let Some(on_complete) = self.on_complete.take() {
                on_complete();
            }
            return;
        }
        let delay = self.delays.get(index).copied().unwrap_or(Duration::ZERO);
        self.phase = Phase::Waiting { index, until: at + delay };
    }

    fn speed(&self, index: usize) -> Duration {
        match self.speeds.get(index) {
            Some(speed) if !speed.is_zero() => *speed,
            _ => DEFAULT_SPEED,
        }
    }

    /// Stop typing and release the completion callback
    pub fn cancel(&mut self) {
        if !self.is_complete() {
            self.phase = Phase::Cancelled;
        }
        self.on_complete = None;
    }

    pub fn lines(&self) -> &[String] {
        &self.displayed
    }

    /// Line that should show the cursor
    pub fn cursor_line(&self) -> Option<usize> {
        match self.phase {
            Phase::Waiting { index, .. } | Phase::Typing { index, .. } | Phase::Pausing { index, .. } => Some(index),
            Phase::Complete => self.texts.len().checked_sub(1),
            Phase::Idle | Phase::Cancelled => None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }
}

impl fmt::Debug for Typewriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Typewriter")
            .field("texts", &self.texts)
            .field("displayed", &self.displayed)
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

    fn writer(texts: &[&str]) -> Typewriter {
        Typewriter::with_timing(
            texts.iter().map(|t| t.to_string()).collect(),
            vec![ms(10), ms(10)],
            vec![ms(100), ms(0)],
        )
    }

    #[test]
    fn test_types_first_line_after_delay() {
        let mut tw = writer(&["Geld", "Wert"]);
        let t0 = Instant::now();
        tw.start(t0);

        tw.tick(t0 + ms(99));
        assert_eq!(tw.lines(), &["".to_string(), "".to_string()]);

        tw.tick(t0 + ms(110));
        assert_eq!(tw.lines()[0], "G");
        tw.tick(t0 + ms(130));
        assert_eq!(tw.lines()[0], "Gel");
        assert_eq!(tw.cursor_line(), Some(0));
    }

    #[test]
    fn test_sequential_lines_and_single_completion() {
        let done = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&done);
        let mut tw = writer(&["Preis", "Kaufkraft"]).on_complete(move || *sink.borrow_mut() += 1);
        let t0 = Instant::now();
        tw.start(t0);

        // line 1: 100 delay + 6 intervals + 100 pause; line 2: 10 intervals + pause
        tw.tick(t0 + ms(180));
        assert_eq!(tw.lines()[0], "Preis");
        assert_eq!(tw.lines()[1], "");

        tw.tick(t0 + ms(5_000));
        assert_eq!(tw.lines()[1], "Kaufkraft");
        assert!(tw.is_complete());
        tw.tick(t0 + ms(10_000));
        assert_eq!(*done.borrow(), 1);
        assert_eq!(tw.cursor_line(), Some(1));
    }

    #[test]
    fn test_multibyte_characters() {
        let mut tw = writer(&["Größe"]);
        let t0 = Instant::now();
        tw.start(t0);
        tw.tick(t0 + ms(130));
        assert_eq!(tw.lines()[0], "Grö");
    }

    #[test]
    fn test_cancel_stops_typing() {
        let done = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&done);
        let mut tw = writer(&["Inflation"]).on_complete(move || *sink.borrow_mut() += 1);
        let t0 = Instant::now();
        tw.start(t0);
        tw.tick(t0 + ms(120));
        tw.cancel();
        tw.tick(t0 + ms(10_000));

        assert_eq!(tw.lines()[0], "In");
        assert_eq!(*done.borrow(), 0);
        assert_eq!(tw.cursor_line(), None);
        assert_eq!(Rc::strong_count(&done), 1);
    }

    #[test]
    fn test_empty_texts_complete_on_start() {
        let mut tw = Typewriter::new(Vec::new());
        tw.start(Instant::now());
        assert!(tw.is_complete());
        assert_eq!(tw.cursor_line(), None);
    }
}
