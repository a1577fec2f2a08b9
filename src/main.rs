// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::cell::RefCell;
use std::env;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use inflation_explainer::logging::{self, LogTarget};
use inflation_explainer::{
    calculators, format_eur, format_percent, format_rate, format_signed_percent, generate, inflation_impact,
    progression_effect, real_wage, AppConfig, Dataset, Easing, Replay, Reveal, RevealMode, VERSION,
};

const USAGE: &str = "\
Usage: inflation-explainer [COMMAND] [--config <path>]

Commands:
  ui                               Scrolling explainer page (default)
  present                          Presentation mode
  format <rate>...                 Format inflation rates the German way
  sparkline <seed> [steps] [hint]  Print a seeded sparkline series
  reveal [whole|trailing|uniform]  Print reveal frames of German inflation as JSON
  calc                             Print calculator examples";

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let config_path = take_flag(&mut args, "--config")?;

    let command = args.first().map(String::as_str).unwrap_or("ui");
    let tui = matches!(command, "ui" | "present");

    let config = AppConfig::resolve(config_path.as_deref())?;
    if tui {
        logging::init(LogTarget::File(&config.log_file))?;
    } else {
        logging::init(LogTarget::Stderr)?;
    }
    tracing::info!(version = VERSION, command, "starting");

    match command {
        "ui" => run_ui_mode(&config, false)?,
        "present" => run_ui_mode(&config, true)?,
        "format" => run_format(&args[1..])?,
        "sparkline" => run_sparkline(&args[1..], &config)?,
        "reveal" => run_reveal(args.get(1).map(String::as_str), &config)?,
        "calc" => run_calc(&config)?,
        "-h" | "--help" | "help" => println!("{}", USAGE),
        other => {
            eprintln!("{}", USAGE);
            bail!("Unknown command: {}", other);
        }
    }

    Ok(())
}

/// Remove `flag <value>` from the argument list
fn take_flag(args: &mut Vec<String>, flag: &str) -> Result<Option<PathBuf>> {
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        bail!("{} needs a value", flag);
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(PathBuf::from(value)))
}

fn load_dataset(config: &AppConfig) -> Result<Dataset> {
    Dataset::load(config.data_dir.as_deref()).context("Failed to load inflation data")
}

fn run_format(rates: &[String]) -> Result<()> {
    if rates.is_empty() {
        bail!("format needs at least one rate");
    }
    for raw in rates {
        // Plain Rust floats first, then German notation
        let rate = raw.parse::<f64>().unwrap_or_else(|_| calculators::parse_input(raw));
        println!("{:>28}  →  {}", raw, format_rate(rate));
    }
    Ok(())
}

fn run_sparkline(args: &[String], config: &AppConfig) -> Result<()> {
    let seed: u32 = args
        .first()
        .context("sparkline needs a seed")?
        .parse()
        .context("Seed must be an unsigned 32-bit integer")?;
    let steps: usize = match args.get(1) {
        Some(s) => s.parse().context("Steps must be a positive integer")?,
        None => config.sparkline_points,
    };
    let hint = args.get(2).map(|h| calculators::parse_input(h)).unwrap_or(1.0);

    let series = generate(seed, steps, hint);
    let max = series.iter().fold(f64::MIN_POSITIVE, |m, v| m.max(*v));
    let blocks: String = series
        .iter()
        .map(|v| {
            const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
            let level = ((v / max) * 7.0).round().clamp(0.0, 7.0) as usize;
            LEVELS[level]
        })
        .collect();

    println!("📈 Sparkline seed={} steps={} hint={}", seed, steps, hint);
    println!("{}", blocks);
    println!("{}", serde_json::to_string(&series)?);
    Ok(())
}

#[derive(Debug, Serialize)]
struct FrameSample {
    elapsed_ms: u64,
    values: Vec<f64>,
}

fn run_reveal(mode: Option<&str>, config: &AppConfig) -> Result<()> {
    let mode = match mode.unwrap_or("whole") {
        "whole" => RevealMode::WholeSeries,
        "trailing" => RevealMode::TrailingEdge,
        "uniform" => RevealMode::Uniform,
        other => bail!("Unknown reveal mode: {} (whole|trailing|uniform)", other),
    };
    let dataset = load_dataset(config)?;

    let frames = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&frames);
    let mut reveal = Reveal::new(
        dataset.inflation_values(),
        config.chart_reveal(),
        mode,
        Easing::EaseOutQuad,
        Replay::Once,
    );
    reveal.play(move |values: &[f64]| sink.borrow_mut().push(values.to_vec()));

    // Virtual clock sampled every 100 ms
    let step = Duration::from_millis(100);
    let t0 = Instant::now();
    let mut elapsed = Duration::ZERO;
    let mut samples = Vec::new();
    loop {
        let more = reveal.tick(t0 + elapsed);
        if let Some(values) = frames.borrow_mut().pop() {
            samples.push(FrameSample {
                elapsed_ms: elapsed.as_millis() as u64,
                values,
            });
        }
        if !more {
            break;
        }
        elapsed += step;
    }

    println!("{}", serde_json::to_string_pretty(&samples)?);
    Ok(())
}

fn run_calc(config: &AppConfig) -> Result<()> {
    let dataset = load_dataset(config)?;
    print!("{}", calc_report(&dataset)?);
    Ok(())
}

/// Worked examples for every calculator, built from the loaded tables
fn calc_report(dataset: &Dataset) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "🧮 Inflationsrechner")?;
    writeln!(out, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;

    writeln!(out, "\n💶 Kaufkraft von 10.000 € nach 10 Jahren:")?;
    for rate in [2.0, 3.0, 5.0, 10.0] {
        let impact = inflation_impact(10_000.0, rate, 10.0);
        writeln!(
            out,
            "   bei {:>6}: {:>10} (Verlust {}, {})",
            format_percent(rate, 1),
            format_eur(impact.real_value, 0),
            format_eur(calculators::purchasing_power_loss(10_000.0, rate, 10.0), 0),
            format_percent(impact.purchasing_power_loss_pct, 1)
        )?;
    }

    let rates = dataset.inflation_between(2020, 2024);
    let wage = real_wage(45_000.0, 50_000.0, &rates, &dataset.salary_growth_values());
    writeln!(out, "\n📊 Reallohn 45.000 € (2020) → 50.000 € (2024):")?;
    writeln!(out, "   Kumulierte Inflation:  {}", format_percent(wage.cumulative_inflation_pct, 1))?;
    writeln!(out, "   Inflationsbereinigt:   {}", format_eur(wage.inflation_adjusted_salary, 0))?;
    writeln!(out, "   Reale Veränderung:     {}", format_signed_percent(wage.real_wage_change_pct, 1))?;
    writeln!(
        out,
        "   Im Vergleich:          {} als der Durchschnitt ({})",
        wage.vs_average.label(),
        format_eur(wage.average_salary_now, 0)
    )?;

    writeln!(out, "\n📈 Lohnentwicklung in Deutschland (nominal / real):")?;
    for point in &dataset.real_wages {
        writeln!(
            out,
            "   {}: {:>8} / {:>8}",
            point.period,
            format_signed_percent(point.nominal_growth, 1),
            format_signed_percent(point.real_growth, 1)
        )?;
    }

    let progression = progression_effect(50_000.0, 5.0, 6.9);
    writeln!(out, "\n🧾 Kalte Progression (50.000 €, +5 %, Inflation 6,9 %):")?;
    writeln!(
        out,
        "   Netto vorher/nachher:  {} → {}",
        format_eur(progression.net_before, 0),
        format_eur(progression.net_after, 0)
    )?;
    writeln!(out, "   Reale Veränderung:     {}", format_signed_percent(progression.real_change_pct, 1))?;

    writeln!(out, "\n🛒 Preisbeispiele 2020 → 2025:")?;
    for example in &dataset.price_examples {
        writeln!(
            out,
            "   {:<24} {:>10} → {:>10}  {}",
            example.item,
            format_eur(example.price_2020, 2),
            format_eur(example.price_2025, 2),
            format_signed_percent(calculators::percent_change(example.price_2020, example.price_2025), 1)
        )?;
    }

    writeln!(out, "\n🏷️  Teuerung nach Kategorie (2022 → 2025):")?;
    for category in &dataset.category_inflation {
        writeln!(
            out,
            "   {:<18} {:>8} → {:>8}  {}",
            category.category,
            format_percent(category.rate_2022, 1),
            format_percent(category.rate_2025, 1),
            category.description
        )?;
    }

    writeln!(out, "\n🏠 Indexmiete 950 € (an den Verbraucherpreisindex gekoppelt):")?;
    let mut rent = 950.0;
    for point in dataset.inflation_germany.iter().filter(|p| p.year().is_some_and(|y| y >= 2021)) {
        rent = calculators::indexed_rent(rent, point.value);
        writeln!(out, "   {}: {:>10} (+{})", point.period, format_eur(rent, 2), format_percent(point.value, 1))?;
    }

    if let (Some(ecb), Some(inflation)) = (dataset.ecb_rates.last(), dataset.inflation_germany.last()) {
        let real = calculators::real_interest(ecb.rate, inflation.value);
        writeln!(out, "\n🏦 Realzins {}:", inflation.period)?;
        writeln!(
            out,
            "   Leitzins {} − Inflation {} = {}",
            format_percent(ecb.rate, 2),
            format_percent(inflation.value, 1),
            format_signed_percent(real, 1)
        )?;
    }

    writeln!(out, "\n🌍 Internationaler Vergleich (2022 → 2025):")?;
    for country in &dataset.global_inflation {
        writeln!(
            out,
            "   {:<16} {:>10} → {}",
            country.country,
            format_rate(country.rate_2022),
            format_rate(country.rate_2025)
        )?;
    }

    Ok(out)
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig, presentation: bool) -> Result<()> {
    println!("🖥️  Loading Inflation Explainer...\n");

    let dataset = load_dataset(config)?;
    println!("✓ Loaded {} years of inflation data", dataset.inflation_germany.len());
    println!("Starting UI... (Press 'q' to quit)\n");

    let mode = if presentation { ui::Mode::Presentation } else { ui::Mode::Page };
    let mut app = ui::App::new(dataset, config, mode, Instant::now());
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig, _presentation: bool) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the plain commands: format, sparkline, reveal, calc");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_take_flag() {
        let mut list = args(&["reveal", "--config", "cfg.json", "trailing"]);
        let path = take_flag(&mut list, "--config").unwrap();
        assert_eq!(path, Some(PathBuf::from("cfg.json")));
        assert_eq!(list, args(&["reveal", "trailing"]));
    }

    #[test]
    fn test_calc_report_covers_every_table() {
        let dataset = Dataset::bundled().unwrap();
        let report = calc_report(&dataset).unwrap();

        assert!(report.contains("Realzins 2025"));
        assert!(report.contains("Indexmiete 950 €"));
        assert!(report.contains("Teuerung nach Kategorie"));
        assert!(report.contains("Energie"));
        assert!(report.contains("Argentinien"));
        assert!(report.contains("2022:"));
        // One indexed rent per year from 2021 to 2025
        let rent_lines = report
            .lines()
            .skip_while(|l| !l.contains("Indexmiete"))
            .skip(1)
            .take_while(|l| !l.is_empty())
            .count();
        assert_eq!(rent_lines, 5);
    }

    #[test]
    fn test_take_flag_missing_value() {
        let mut list = args(&["calc", "--config"]);
        assert!(take_flag(&mut list, "--config").is_err());

        let mut none = args(&["calc"]);
        assert_eq!(take_flag(&mut none, "--config").unwrap(), None);
    }
}
