// End-to-end: German inflation series through scheduler, sequencer and page host

use inflation_explainer::{
    AppConfig, Dataset, Easing, ExplainerPage, FireReason, Replay, Reveal, RevealMode, SectionKind,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

const SERIES: [f64; 7] = [1.4, 0.5, 3.1, 6.9, 5.9, 2.2, 2.2];

/// Fully revealed prefix length, asserting exactly one partial element follows
fn assert_prefix_plus_one_partial(frame: &[f64]) -> usize {
    let prefix = frame.iter().zip(SERIES).take_while(|(v, t)| *v == t).count();
    assert!(prefix < SERIES.len(), "frame already complete: {:?}", frame);

    let partial = frame[prefix];
    assert!(partial > 0.0 && partial < SERIES[prefix], "no partial element: {:?}", frame);
    assert!(frame[prefix + 1..].iter().all(|v| *v == 0.0), "values past the edge: {:?}", frame);
    prefix
}

#[test]
fn test_whole_series_scenario() {
    let frames: Rc<RefCell<Vec<Vec<f64>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&frames);

    let mut reveal = Reveal::new(
        SERIES.to_vec(),
        Duration::from_millis(1000),
        RevealMode::WholeSeries,
        Easing::EaseOutQuad,
        Replay::Once,
    );
    reveal.play(move |values: &[f64]| sink.borrow_mut().push(values.to_vec()));

    let t0 = Instant::now();
    let mut prefixes = Vec::new();
    for ms in [0, 300, 700, 1000] {
        let more = reveal.tick(t0 + Duration::from_millis(ms));
        let frame = frames.borrow().last().cloned().unwrap();
        match ms {
            0 => {
                assert!(more);
                assert!(frame.iter().all(|v| *v == 0.0));
            }
            1000 => {
                assert!(!more);
                assert_eq!(frame, SERIES);
            }
            _ => prefixes.push(assert_prefix_plus_one_partial(&frame)),
        }
    }

    assert!(prefixes[0] < prefixes[1]);
    assert!(reveal.is_done());
    assert_eq!(frames.borrow().len(), 4);
}

#[test]
fn test_page_reveals_statistics_on_scroll() {
    let data = Dataset::bundled().unwrap();
    let t0 = Instant::now();
    let mut page = ExplainerPage::new(&data, &AppConfig::default(), t0);
    page.set_viewport_height(20.0);

    page.tick(t0);
    let stats = page.section(SectionKind::Statistics).unwrap();
    assert!(stats.fired_by().is_none());

    page.scroll_to_section(SectionKind::Statistics);
    page.tick(t0 + Duration::from_millis(200));
    assert_eq!(
        page.section(SectionKind::Statistics).unwrap().fired_by(),
        Some(FireReason::Visible)
    );

    page.tick(t0 + Duration::from_millis(560));
    {
        let stats = page.section(SectionKind::Statistics).unwrap();
        assert_prefix_plus_one_partial(&stats.frame());
    }

    // Once the visible charts finish, nothing moves until the reader scrolls on
    page.tick(t0 + Duration::from_millis(1200));
    page.tick(t0 + Duration::from_millis(10_000));
    assert!(!page.tick(t0 + Duration::from_millis(20_000)));

    let stats = page.section(SectionKind::Statistics).unwrap();
    assert!(stats.is_revealed());
    assert_eq!(&stats.frame()[..], &SERIES[..]);

    for kind in [SectionKind::EcbPolicy, SectionKind::History] {
        let section = page.section(kind).unwrap();
        assert_eq!(section.fired_by(), None, "{:?}", kind);
        assert!(!section.is_revealed(), "{:?}", kind);
        assert!(section.frame().iter().all(|v| *v == 0.0), "{:?}", kind);
    }
}
