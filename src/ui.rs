use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use inflation_explainer::{
    calculators, format_eur, format_number, format_percent, format_rate, format_signed_percent, sparkline, AppConfig,
    ChartKit, Dataset, ExplainerPage, PolicyStance, Presentation, RateTier, Rgb, Section, SectionKind, Slide,
    SliderField, ROADMAP,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Sparkline, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Page,
    Presentation,
}

impl Mode {
    pub fn toggle(&self) -> Self {
        match self {
            Mode::Page => Mode::Presentation,
            Mode::Presentation => Mode::Page,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Mode::Page => "Erklärseite",
            Mode::Presentation => "Präsentation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub mode: Mode,
    pub page: ExplainerPage,
    pub deck: Presentation,
    pub kit: ChartKit,
    pub dataset: Dataset,
    frame_interval: Duration,
}

impl App {
    pub fn new(dataset: Dataset, config: &AppConfig, mode: Mode, now: Instant) -> Self {
        let kit = ChartKit::init(&dataset);
        App {
            mode,
            page: ExplainerPage::new(&dataset, config, now),
            deck: Presentation::new(&dataset, config),
            kit,
            dataset,
            frame_interval: config.frame_interval(),
        }
    }

    pub fn tick(&mut self, now: Instant) {
        match self.mode {
            Mode::Page => self.page.tick(now),
            Mode::Presentation => self.deck.tick(now),
        };
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Flow {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Tab => {
                self.mode = self.mode.toggle();
                tracing::info!(mode = self.mode.title(), "mode switched");
            }
            _ => match self.mode {
                Mode::Page => self.handle_page_key(code),
                Mode::Presentation => self.handle_deck_key(code),
            },
        }
        Flow::Continue
    }

    fn handle_page_key(&mut self, code: KeyCode) {
        let screen = self.page.viewport().height;
        match code {
            KeyCode::Down | KeyCode::Char('j') => self.page.scroll_by(1.0),
            KeyCode::Up | KeyCode::Char('k') => self.page.scroll_by(-1.0),
            KeyCode::PageDown | KeyCode::Char(' ') => self.page.scroll_by(screen),
            KeyCode::PageUp => self.page.scroll_by(-screen),
            KeyCode::Home => self.page.scroll_to(0.0),
            KeyCode::End => self.page.scroll_to(self.page.content_height()),
            KeyCode::Right => self.page.cards_mut().next(),
            KeyCode::Left => self.page.cards_mut().previous(),
            KeyCode::Enter => {
                self.page.cards_mut().toggle_selected();
            }
            KeyCode::Char('f') => self.page.calculator_mut().focus_next(),
            KeyCode::Char('F') => self.page.calculator_mut().focus_previous(),
            KeyCode::Char('+') => self.page.calculator_mut().increment(),
            KeyCode::Char('-') => self.page.calculator_mut().decrement(),
            KeyCode::Char('c') => {
                self.page.toggle_core();
            }
            _ => {}
        }
    }

    fn handle_deck_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Right | KeyCode::Char(' ') | KeyCode::PageDown => {
                self.deck.next();
            }
            KeyCode::Left | KeyCode::PageUp => {
                self.deck.previous();
            }
            KeyCode::Home => {
                self.deck.home();
            }
            KeyCode::End => {
                self.deck.end();
            }
            _ => {}
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui(f, app))?;

        // Poll instead of blocking so animations keep running without input
        if !event::poll(app.frame_interval)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key.code) == Flow::Quit {
                return Ok(());
            }
        }
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Key help
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    match app.mode {
        Mode::Page => {
            app.page.set_viewport_height(chunks[1].height as f64);
            render_page(f, chunks[1], app);
        }
        Mode::Presentation => render_slide(f, chunks[1], app),
    }
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];
    for (i, mode) in [Mode::Page, Mode::Presentation].iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if *mode == app.mode {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(mode.title().to_string(), style));
    }

    spans.push(Span::raw("  |  "));
    match app.mode {
        Mode::Page => {
            let progress = if app.page.content_height() > 0.0 {
                app.page.scroll_offset() / app.page.content_height() * 100.0
            } else {
                0.0
            };
            spans.push(Span::styled(
                format!("Gelesen: {}", format_percent(progress, 0)),
                Style::default().fg(Color::White),
            ));
        }
        Mode::Presentation => {
            spans.push(Span::styled(
                format!("Folie {}/{}", app.deck.index() + 1, app.deck.len()),
                Style::default().fg(Color::White),
            ));
        }
    }

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
    f.render_widget(header, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let keys: &[(&str, &str)] = match app.mode {
        Mode::Page => &[
            ("↑/↓", " Scrollen | "),
            ("←/→", " Karte | "),
            ("Enter", " Umdrehen | "),
            ("f", " Feld | "),
            ("+/-", " Wert | "),
            ("c", " Kerninflation | "),
            ("Tab", " Modus | "),
        ],
        Mode::Presentation => &[
            ("←/→", " Folie | "),
            ("Home/End", " Anfang/Ende | "),
            ("Tab", " Modus | "),
        ],
    };

    let mut spans = vec![Span::raw(" ")];
    for (key, label) in keys {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(*label));
    }
    spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    spans.push(Span::raw(" Beenden"));

    let status_bar = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::White)));
    f.render_widget(status_bar, area);
}

fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn section_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", title))
}

/// Bars for a revealed series; negative values sit on the axis but keep their label
fn bars<'a>(labels: &'a [String], frame: &[f64], color: Color) -> Vec<Bar<'a>> {
    labels
        .iter()
        .zip(frame)
        .map(|(label, value)| {
            Bar::default()
                .value((value.max(0.0) * 10.0).round() as u64)
                .text_value(format_percent(*value, 1))
                .label(Line::from(truncate(label, 9)))
                .style(Style::default().fg(color))
        })
        .collect()
}

fn bar_chart<'a>(title: &'a str, bars: Vec<Bar<'a>>, targets: &[f64]) -> BarChart<'a> {
    // Scale against the final values so bars grow instead of rescaling
    let max = targets.iter().fold(0.0_f64, |m, v| m.max(*v));
    BarChart::default()
        .block(section_block(title))
        .bar_width(9)
        .bar_gap(1)
        .max(((max * 10.0).round() as u64).max(1))
        .data(BarGroup::default().bars(&bars))
}

// ============================================================================
// PAGE
// ============================================================================

fn render_page(f: &mut Frame, area: Rect, app: &App) {
    let viewport = app.page.viewport();
    for section in app.page.visible_sections() {
        let span = section.span();
        let top = (span.top - viewport.top).max(0.0);
        let bottom = (span.bottom() - viewport.top).min(viewport.height);
        if bottom <= top {
            continue;
        }
        let rect = Rect {
            x: area.x,
            y: area.y + top as u16,
            width: area.width,
            height: (bottom - top) as u16,
        };
        render_section(f, rect, app, section.kind());
    }
}

fn render_section(f: &mut Frame, area: Rect, app: &App, kind: SectionKind) {
    let Some(section) = app.page.section(kind) else {
        return;
    };
    let frame = section.frame();

    match kind {
        SectionKind::Hero => {
            let typewriter = app.page.hero();
            let cursor = typewriter.cursor_line();
            let mut lines = vec![Line::raw("")];
            for (i, text) in typewriter.lines().iter().enumerate() {
                let style = if i == 0 {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Blue)
                };
                let mut spans = vec![Span::styled(text.clone(), style)];
                if cursor == Some(i) && !typewriter.is_complete() {
                    spans.push(Span::styled("▌", Style::default().fg(Color::White)));
                }
                lines.push(Line::from(spans));
            }
            f.render_widget(Paragraph::new(lines).block(section_block(kind.title())), area);
        }
        SectionKind::Definition => {
            let text = vec![
                Line::raw("Inflation ist der allgemeine Anstieg des Preisniveaus über einen längeren Zeitraum."),
                Line::raw("Steigen die Preise, kann man sich für denselben Geldbetrag weniger kaufen:"),
                Line::styled(
                    "Die Kaufkraft des Geldes sinkt.",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Line::raw("Die EZB strebt mittelfristig eine Inflationsrate von 2 % an."),
            ];
            f.render_widget(
                Paragraph::new(text).block(section_block(kind.title())).wrap(Wrap { trim: true }),
                area,
            );
        }
        SectionKind::Statistics => {
            let chart = bar_chart(kind.title(), bars(section.labels(), &frame, Color::LightRed), section.targets());
            f.render_widget(chart, area);
        }
        SectionKind::Measurement => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(area);
            render_headline_vs_core(f, columns[0], app, section);
            render_basket(f, columns[1], app);
        }
        SectionKind::Causes => {
            let bars: Vec<Bar> = app
                .dataset
                .causes
                .iter()
                .zip(frame.iter())
                .map(|(cause, value)| {
                    Bar::default()
                        .value((value * 10.0).round().max(0.0) as u64)
                        .text_value(format_percent(*value, 0))
                        .label(Line::from(truncate(&cause.label, 9)))
                        .style(Style::default().fg(rgb(app.kit.color(&cause.color))))
                })
                .collect();
            f.render_widget(bar_chart(kind.title(), bars, section.targets()), area);
        }
        SectionKind::Effects => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(area);
            let chart = bar_chart(kind.title(), bars(section.labels(), &frame, Color::LightYellow), section.targets());
            f.render_widget(chart, columns[0]);
            render_price_card(f, columns[1], app);
        }
        SectionKind::EcbPolicy => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(area);
            let chart = bar_chart(kind.title(), bars(section.labels(), &frame, Color::LightGreen), section.targets());
            f.render_widget(chart, rows[0]);

            if let (Some(rate), Some(inflation)) = (app.dataset.ecb_rates.last(), app.dataset.inflation_germany.last()) {
                let real = calculators::real_interest(rate.rate, inflation.value);
                let color = if real < 0.0 { Color::LightRed } else { Color::LightGreen };
                let line = Line::from(vec![
                    Span::raw(format!(" Realzins {}: ", inflation.period)),
                    Span::styled(format_signed_percent(real, 1), Style::default().fg(color)),
                ]);
                f.render_widget(Paragraph::new(line), rows[1]);
            }
        }
        SectionKind::History => {
            let events = app.dataset.events_by_period();
            let partial: Vec<f64> = section
                .targets()
                .iter()
                .zip(frame.iter())
                .map(|(target, value)| if *target > 0.0 { value / target } else { 1.0 })
                .collect();
            render_history(f, area, app, kind.title(), &events, &partial);
        }
        SectionKind::Calculator => render_calculator(f, area, app),
    }
}

/// Headline bars with core inflation next to them while the toggle is on
fn render_headline_vs_core(f: &mut Frame, area: Rect, app: &App, section: &Section) {
    let headline = section.frame();
    let core = section.overlay_frame();
    let show_core = app.page.show_core() && core.is_some();
    let scale = |v: f64| (v.max(0.0) * 10.0).round() as u64;
    let max = section
        .targets()
        .iter()
        .chain(section.overlay_targets())
        .fold(0.0_f64, |m, v| m.max(*v));

    let title = if show_core { " Gesamt vs. Kern (ohne Energie, Lebensmittel) " } else { " Gesamtinflation " };
    let mut chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .bar_width(4)
        .bar_gap(0)
        .group_gap(2)
        .max(scale(max).max(1));
    for (i, label) in section.labels().iter().enumerate() {
        let value = headline.get(i).copied().unwrap_or(0.0);
        let mut group = vec![Bar::default()
            .value(scale(value))
            .text_value(format_number(value, 1, 1))
            .style(Style::default().fg(Color::LightRed))];
        if let Some(core_value) = core.as_ref().filter(|_| show_core).and_then(|c| c.get(i).copied()) {
            group.push(
                Bar::default()
                    .value(scale(core_value))
                    .text_value(format_number(core_value, 1, 1))
                    .style(Style::default().fg(Color::LightBlue)),
            );
        }
        chart = chart.data(BarGroup::default().label(Line::from(truncate(label, 9))).bars(&group));
    }
    f.render_widget(chart, area);
}

/// Basket weights behind the consumer price index
fn render_basket(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .dataset
        .cpi_weights
        .iter()
        .map(|weight| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(rgb(app.kit.color(&weight.color)))),
                Span::raw(format!("{:<18}", truncate(&weight.label, 18))),
                Span::raw(format_percent(weight.share, 1)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(section_block("Warenkorb")), area);
}

fn render_price_card(f: &mut Frame, area: Rect, app: &App) {
    let cards = app.page.cards();
    let Some(index) = cards.selected() else {
        return;
    };
    let Some(example) = app.dataset.price_examples.get(index) else {
        return;
    };

    let lines = if cards.is_toggled(index) {
        vec![
            Line::styled(example.item.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Line::raw(format!("2020: {}", format_eur(example.price_2020, 2))),
            Line::raw(format!("2025: {}", format_eur(example.price_2025, 2))),
            Line::styled(
                format_signed_percent(example.increase, 1),
                Style::default().fg(Color::LightRed),
            ),
            Line::styled(
                format!(
                    "exakt {}",
                    format_signed_percent(calculators::percent_change(example.price_2020, example.price_2025), 1)
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]
    } else {
        vec![
            Line::styled(example.item.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Line::raw(""),
            Line::styled("Enter zum Umdrehen", Style::default().fg(Color::DarkGray)),
        ]
    };
    let title = format!("Karte {}/{}", index + 1, cards.len());
    f.render_widget(Paragraph::new(lines).block(section_block(&title)), area);
}

/// One row per episode: label, magnitude, sparkline cut to its reveal share
fn render_history(
    f: &mut Frame,
    area: Rect,
    app: &App,
    title: &str,
    events: &[&inflation_explainer::HistoricalEventRecord],
    revealed: &[f64],
) {
    let block = section_block(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    for (row, (event, spark)) in events.iter().zip(app.page.sparklines()).enumerate() {
        if row as u16 >= inner.height {
            break;
        }
        let line = Rect {
            x: inner.x,
            y: inner.y + row as u16,
            width: inner.width,
            height: 1,
        };
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(46), Constraint::Min(0)])
            .split(line);

        let color = rgb(RateTier::of(event.rate).color());
        // Filled marker: shape from recorded data, hollow: seeded stand-in
        let marker = if sparkline::has_curated_series(event) { "◆" } else { "◇" };
        let label = Line::from(vec![
            Span::raw(format!("{} {} {:<12}", marker, event.period, truncate(&event.locale, 12))),
            Span::styled(format_rate(event.rate), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ]);
        f.render_widget(Paragraph::new(label), columns[0]);

        let share = revealed.get(row).copied().unwrap_or(1.0).clamp(0.0, 1.0);
        let shown = (spark.len() as f64 * share).ceil() as usize;
        let data: Vec<u64> = spark.iter().take(shown).map(|v| (v * 100.0).round() as u64).collect();
        f.render_widget(
            Sparkline::default().data(&data).max(100).style(Style::default().fg(color)),
            columns[1],
        );
    }
}

fn render_calculator(f: &mut Frame, area: Rect, app: &App) {
    let calc = app.page.calculator();
    let mut lines = vec![];
    for field in SliderField::ALL {
        let focused = calc.focused() == field;
        let marker = if focused { "▶ " } else { "  " };
        let value = match field {
            SliderField::Rate => format_percent(calc.value(field), 1),
            SliderField::Years => format!("{}", calc.value(field)),
            SliderField::IndexPrevious | SliderField::IndexCurrent => format_number(calc.value(field), 0, 0),
            _ => format_eur(calc.value(field), 0),
        };
        let filled = (calc.slider(field).fraction() * 20.0).round() as usize;
        let style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<16}", marker, field.label()), style),
            Span::styled(format!("{}{} ", "█".repeat(filled), "░".repeat(20 - filled.min(20))), style),
            Span::styled(value, style),
        ]));
    }

    let impact = calc.impact();
    let wage = calc.real_wage();
    let progression = calc.progression();
    lines.push(Line::raw(""));
    lines.push(Line::raw(format!(
        "Kaufkraft nach {} Jahren: {} (−{})",
        calc.value(SliderField::Years),
        format_eur(impact.real_value, 0),
        format_percent(impact.purchasing_power_loss_pct, 1)
    )));
    lines.push(Line::raw(format!(
        "Reallohn seit 2020: {} ({} als der Durchschnitt)",
        format_signed_percent(wage.real_wage_change_pct, 1),
        wage.vs_average.label()
    )));
    lines.push(Line::raw(format!(
        "Kalte Progression bei +5 %: real {} netto",
        format_signed_percent(progression.real_change_pct, 1)
    )));
    lines.push(Line::raw(format!(
        "Basiseffekt: Index {} → {} = {} zum Vorjahr",
        format_number(calc.value(SliderField::IndexPrevious), 0, 0),
        format_number(calc.value(SliderField::IndexCurrent), 0, 0),
        format_signed_percent(calc.base_effect(), 1)
    )));

    f.render_widget(Paragraph::new(lines).block(section_block(SectionKind::Calculator.title())), area);
}

// ============================================================================
// PRESENTATION
// ============================================================================

fn slide_text(slide: Slide) -> &'static [&'static str] {
    match slide {
        Slide::Title => &["Ursachen, Auswirkungen und Geschichte"],
        Slide::Definition => &[
            "Inflation = anhaltender Anstieg des allgemeinen Preisniveaus",
            "Folge: Die Kaufkraft des Geldes sinkt",
            "Gemessen am Verbraucherpreisindex (VPI)",
        ],
        Slide::CausesIntro => &[
            "Nachfrageinflation: Nachfrage wächst schneller als das Angebot",
            "Angebotsinflation: Kosten für Energie und Rohstoffe steigen",
            "Geldmenge: Mehr Geld trifft auf gleich viele Güter",
        ],
        Slide::EffectsIntro => &[
            "Sparer verlieren real an Vermögen",
            "Schuldner profitieren, weil Schulden real schrumpfen",
            "Löhne hinken den Preisen oft hinterher",
        ],
        Slide::MeasurementIntro => &[
            "Das Statistische Bundesamt erfasst monatlich rund 300.000 Preise",
            "Gewichtet nach einem repräsentativen Warenkorb",
            "Kerninflation: ohne Energie und Lebensmittel",
        ],
        Slide::EcbInstruments => &[
            "Leitzinsen: Hauptrefinanzierungssatz und Einlagesatz",
            "Offenmarktgeschäfte und Anleihekäufe",
            "Mindestreserve und Forward Guidance",
        ],
        Slide::EcbMechanism => &[
            "Leitzins ↑ → Kredite teurer → weniger Investitionen und Konsum",
            "Weniger Nachfrage → geringerer Preisdruck",
            "Wirkung mit 12 bis 18 Monaten Verzögerung",
        ],
        Slide::HistoryIntro => &[
            "Hyperinflation: Preise steigen um mehr als 50 % pro Monat",
            "Meist ausgelöst durch Krieg, Staatsfinanzierung per Notenpresse",
        ],
        Slide::KeyTakeaways => &[
            "Moderate Inflation um 2 % gilt als gesund",
            "2022 erreichte Deutschland 6,9 %, den höchsten Wert seit Jahrzehnten",
            "Die EZB reagierte mit der schnellsten Zinswende ihrer Geschichte",
        ],
        Slide::Thanks => &["Fragen?"],
        _ => &[],
    }
}

fn render_slide(f: &mut Frame, area: Rect, app: &App) {
    let slide = app.deck.current();
    match slide {
        Slide::Roadmap => render_roadmap(f, area, app),
        Slide::Statistics => {
            let labels: Vec<String> = app.dataset.inflation_germany.iter().map(|p| p.period.clone()).collect();
            let frame = app.deck.statistics_frame();
            let targets = app.dataset.inflation_values();
            f.render_widget(bar_chart(slide.title(), bars(&labels, &frame, Color::LightRed), &targets), area);
        }
        Slide::EcbPolicy => {
            let labels: Vec<String> = app.dataset.ecb_rates.iter().map(|p| p.period.clone()).collect();
            let frame = app.deck.ecb_frame();
            let targets = app.dataset.ecb_rate_values();
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(3)])
                .split(area);
            f.render_widget(bar_chart(slide.title(), bars(&labels, &frame, Color::LightGreen), &targets), rows[0]);

            if let Some(latest) = app.dataset.ecb_rates.last() {
                let stance = PolicyStance::of(latest.rate);
                let line = Line::from(vec![
                    Span::raw(format!("Stand {}: ", latest.as_of.format("%d.%m.%Y"))),
                    Span::styled(format_percent(latest.rate, 2), Style::default().fg(rgb(stance.color()))),
                    Span::raw(format!("  {}", stance.description())),
                ]);
                f.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), rows[1]);
            }
        }
        Slide::CausesChart | Slide::MeasurementCategories => {
            let parts = if slide == Slide::CausesChart { &app.dataset.causes } else { &app.dataset.cpi_weights };
            let bars: Vec<Bar> = parts
                .iter()
                .map(|part| {
                    Bar::default()
                        .value((part.share * 10.0).round().max(0.0) as u64)
                        .text_value(format_percent(part.share, 1))
                        .label(Line::from(truncate(&part.label, 9)))
                        .style(Style::default().fg(rgb(app.kit.color(&part.color))))
                })
                .collect();
            let shares: Vec<f64> = parts.iter().map(|p| p.share).collect();
            f.render_widget(bar_chart(slide.title(), bars, &shares), area);
        }
        Slide::EffectsPrices => {
            let lines: Vec<Line> = app
                .dataset
                .price_examples
                .iter()
                .map(|p| {
                    Line::from(vec![
                        Span::raw(format!("{:<24}", truncate(&p.item, 24))),
                        Span::raw(format!("{:>12} → {:>12}  ", format_eur(p.price_2020, 2), format_eur(p.price_2025, 2))),
                        Span::styled(format_signed_percent(p.increase, 1), Style::default().fg(Color::LightRed)),
                    ])
                })
                .collect();
            f.render_widget(Paragraph::new(lines).block(section_block(slide.title())), area);
        }
        Slide::HistoryTimeline => {
            let events = app.dataset.events_by_period();
            let full = vec![1.0; events.len()];
            render_history(f, area, app, slide.title(), &events, &full);
        }
        _ => {
            let mut lines = vec![
                Line::styled(slide.title(), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Line::raw(""),
            ];
            lines.extend(slide_text(slide).iter().map(|t| Line::raw(format!("• {}", t))));
            f.render_widget(
                Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL))
                    .wrap(Wrap { trim: true }),
                area,
            );
        }
    }
}

fn render_roadmap(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
        .split(area);

    for (i, (title, items)) in ROADMAP.iter().enumerate() {
        let border = if app.deck.is_highlighted(i) {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let lines: Vec<Line> = items.iter().map(|item| Line::raw(format!("• {}", item))).collect();
        let card = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(format!(" {} ", title)),
        );
        f.render_widget(card, columns[i]);
    }
}
