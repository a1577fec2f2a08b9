// 🧮 Calculators - derived values behind the interactive sliders
// Compound growth, purchasing power, simplified income tax, real wages
//
// Everything here is a pure function of the current slider state and is
// recomputed on every render. Inputs are not validated beyond numeric
// parsing; divisions by a possibly-zero base use a minimum denominator of 1.

use crate::format::finite_or_zero;
use serde::{Deserialize, Serialize};

// ============================================================================
// INPUT
// ============================================================================

/// Parse a numeric text field; anything unparsable is 0
///
/// Accepts both "1234.5" and German "1.234,5".
pub fn parse_input(text: &str) -> f64 {
    let trimmed = text.trim().trim_end_matches(['€', '%']).trim();
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized.parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}

/// Range slider: value clamped to `[min, max]` and snapped to `step`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    value: f64,
}

impl Slider {
    pub fn new(min: f64, max: f64, step: f64, value: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        let mut slider = Slider { min, max, step: step.abs(), value: min };
        slider.set(value);
        slider
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set(&mut self, value: f64) {
        let value = finite_or_zero(value).clamp(self.min, self.max);
        self.value = if self.step > 0.0 {
            let steps = ((value - self.min) / self.step).round();
            (self.min + steps * self.step).clamp(self.min, self.max)
        } else {
            value
        };
    }

    pub fn increment(&mut self) {
        self.set(self.value + self.step);
    }

    pub fn decrement(&mut self) {
        self.set(self.value - self.step);
    }

    /// Position within the range, `[0,1]`
    pub fn fraction(&self) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        (self.value - self.min) / span
    }
}

// ============================================================================
// PRICES & PURCHASING POWER
// ============================================================================

/// `base * (1 + rate/100)^years`
pub fn price_after(base: f64, rate: f64, years: f64) -> f64 {
    base * (1.0 + rate / 100.0).powf(years)
}

/// What `amount` buys after `years` of inflation at `rate`, in today's money
pub fn purchasing_power(amount: f64, rate: f64, years: f64) -> f64 {
    let factor = (1.0 + rate / 100.0).powf(years);
    if factor <= 0.0 || !factor.is_finite() {
        return 0.0;
    }
    amount / factor
}

/// Lost purchasing power of `amount` after `years`, same unit as `amount`
pub fn purchasing_power_loss(amount: f64, rate: f64, years: f64) -> f64 {
    amount - purchasing_power(amount, rate, years)
}

/// Percentage change from `base` to `value`, e.g. a price increase
///
/// A zero base has no meaningful change and yields 0.
pub fn percent_change(base: f64, value: f64) -> f64 {
    if base == 0.0 {
        return 0.0;
    }
    (value - base) / base.abs() * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InflationImpact {
    /// Nominal amount needed later to buy what `amount` buys today
    pub future_value: f64,
    /// Today's value of `amount` held for `years`
    pub real_value: f64,
    pub purchasing_power_loss_pct: f64,
}

pub fn inflation_impact(amount: f64, rate: f64, years: f64) -> InflationImpact {
    let future_value = price_after(amount, rate, years);
    let real_value = purchasing_power(amount, rate, years);
    let purchasing_power_loss_pct = if amount == 0.0 {
        0.0
    } else {
        purchasing_power_loss(amount, rate, years) / amount * 100.0
    };
    InflationImpact {
        future_value,
        real_value,
        purchasing_power_loss_pct,
    }
}

/// Rent after an index adjustment
pub fn indexed_rent(base_rent: f64, index_pct: f64) -> f64 {
    base_rent * (1.0 + index_pct / 100.0)
}

/// Cumulative inflation factor over a sequence of annual rates
pub fn cumulative_factor(rates: &[f64]) -> f64 {
    rates.iter().fold(1.0, |acc, rate| acc * (1.0 + rate / 100.0))
}

// ============================================================================
// RATES
// ============================================================================

/// Year-over-year rate from two index levels; base floored at 1
pub fn base_effect(previous_index: f64, current_index: f64) -> f64 {
    (current_index / previous_index.max(1.0) - 1.0) * 100.0
}

/// Real interest rate (Fisher approximation)
pub fn real_interest(nominal: f64, inflation: f64) -> f64 {
    nominal - inflation
}

// ============================================================================
// INCOME TAX (simplified progression)
// ============================================================================

const BASIC_ALLOWANCE: f64 = 11_000.0;
const ENTRY_RATE: f64 = 0.18;
const MAX_PROGRESSION: f64 = 0.22;
const PROGRESSION_SPAN: f64 = 90_000.0;

/// Net income under a simplified progressive tax
///
/// Taxable income above the basic allowance is taxed at a flat rate growing
/// from 18 % to at most 40 % with income.
pub fn net_income(gross: f64) -> f64 {
    let taxable = (gross - BASIC_ALLOWANCE).max(0.0);
    let marginal = ENTRY_RATE + (taxable / PROGRESSION_SPAN).min(MAX_PROGRESSION);
    gross - taxable * marginal
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressionEffect {
    pub net_before: f64,
    pub net_after: f64,
    /// `net_after` in today's money
    pub real_net_after: f64,
    /// Real change of net income, percent (bracket creep shows as negative)
    pub real_change_pct: f64,
}

/// Effect of a nominal raise under inflation and progressive tax
pub fn progression_effect(gross: f64, raise_pct: f64, inflation: f64) -> ProgressionEffect {
    let net_before = net_income(gross);
    let net_after = net_income(gross * (1.0 + raise_pct / 100.0));
    let real_net_after = net_after / (1.0 + inflation / 100.0);
    let real_change_pct = (real_net_after - net_before) / net_before.abs().max(1.0) * 100.0;
    ProgressionEffect {
        net_before,
        net_after,
        real_net_after,
        real_change_pct,
    }
}

// ============================================================================
// REAL WAGES (salary tracker)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Better,
    Worse,
}

impl Comparison {
    pub fn label(&self) -> &'static str {
        match self {
            Comparison::Better => "besser",
            Comparison::Worse => "schlechter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RealWageResult {
    pub salary_then: f64,
    pub salary_now: f64,
    /// What the old salary must be today to keep its purchasing power
    pub inflation_adjusted_salary: f64,
    pub real_wage_change_pct: f64,
    pub cumulative_inflation_pct: f64,
    /// Old salary grown with the average raises
    pub average_salary_now: f64,
    pub vs_average_pct: f64,
    pub purchasing_power_change_pct: f64,
    pub monthly_difference: f64,
    pub inflation_loss: f64,
    pub is_winner: bool,
    pub vs_average: Comparison,
}

/// Compare a salary then and now against inflation and average raises
pub fn real_wage(salary_then: f64, salary_now: f64, inflation_rates: &[f64], average_raises: &[f64]) -> RealWageResult {
    let inflation = cumulative_factor(inflation_rates);
    let raises = cumulative_factor(average_raises);

    let inflation_adjusted_salary = salary_then * inflation;
    let real_wage_change_pct = (salary_now - inflation_adjusted_salary) / inflation_adjusted_salary.max(1.0) * 100.0;

    let average_salary_now = salary_then * raises;
    let vs_average_pct = (salary_now - average_salary_now) / average_salary_now.max(1.0) * 100.0;

    let purchasing_power_change_pct = (salary_now / salary_then.max(1.0) / inflation - 1.0) * 100.0;

    RealWageResult {
        salary_then,
        salary_now,
        inflation_adjusted_salary,
        real_wage_change_pct,
        cumulative_inflation_pct: (inflation - 1.0) * 100.0,
        average_salary_now,
        vs_average_pct,
        purchasing_power_change_pct,
        monthly_difference: (salary_now - inflation_adjusted_salary) / 12.0,
        inflation_loss: salary_then * (inflation - 1.0),
        is_winner: real_wage_change_pct > 0.0,
        vs_average: if vs_average_pct > 0.0 {
            Comparison::Better
        } else {
            Comparison::Worse
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_parse_input_zero_fallback() {
        assert_eq!(parse_input("45000"), 45000.0);
        assert_eq!(parse_input(" 3.5 "), 3.5);
        assert_eq!(parse_input("1.234,5"), 1234.5);
        assert_eq!(parse_input("2,2%"), 2.2);
        assert_eq!(parse_input("950 €"), 950.0);
        assert_eq!(parse_input(""), 0.0);
        assert_eq!(parse_input("abc"), 0.0);
        assert_eq!(parse_input("inf"), 0.0);
    }

    #[test]
    fn test_slider_clamps_and_steps() {
        let mut rate = Slider::new(0.0, 10.0, 0.5, 3.0);
        assert_eq!(rate.value(), 3.0);
        rate.increment();
        assert_eq!(rate.value(), 3.5);
        rate.set(42.0);
        assert_eq!(rate.value(), 10.0);
        rate.increment();
        assert_eq!(rate.value(), 10.0);
        rate.set(-3.0);
        assert_eq!(rate.value(), 0.0);
        rate.decrement();
        assert_eq!(rate.value(), 0.0);
        rate.set(2.26);
        assert_eq!(rate.value(), 2.5);
        assert_eq!(rate.fraction(), 0.25);

        let swapped = Slider::new(10.0, 0.0, 1.0, 5.0);
        assert_eq!((swapped.min, swapped.max), (0.0, 10.0));
    }

    #[test]
    fn test_price_after_and_purchasing_power() {
        assert!(close(price_after(100.0, 5.0, 1.0), 105.0, 1e-9));
        assert!(close(price_after(1.37, 5.0, 5.0), 1.37 * 1.05f64.powi(5), 1e-12));
        assert!(close(purchasing_power(1000.0, 2.0, 4.0), 1000.0 / 1.02f64.powi(4), 1e-9));
        assert!(close(purchasing_power_loss(1000.0, 0.0, 10.0), 0.0, 1e-12));
        assert_eq!(purchasing_power(1000.0, -100.0, 2.0), 0.0);
    }

    #[test]
    fn test_inflation_impact() {
        let impact = inflation_impact(10_000.0, 3.0, 10.0);
        assert!(close(impact.future_value, 13_439.16, 0.01));
        assert!(close(impact.real_value, 7_440.94, 0.01));
        assert!(close(impact.purchasing_power_loss_pct, 25.59, 0.01));

        assert_eq!(inflation_impact(0.0, 3.0, 10.0).purchasing_power_loss_pct, 0.0);
    }

    #[test]
    fn test_percent_change() {
        assert!(close(percent_change(1.37, 1.93), 40.876, 0.01));
        assert!(close(percent_change(100.0, 90.0), -10.0, 1e-9));
        assert_eq!(percent_change(0.0, 5.0), 0.0);
    }

    #[test]
    fn test_base_effect_min_denominator() {
        assert!(close(base_effect(100.0, 102.0), 2.0, 1e-9));
        assert!(close(base_effect(0.0, 2.0), 100.0, 1e-9));
        assert!(base_effect(0.0, 0.0).is_finite());
    }

    #[test]
    fn test_real_interest_and_rent() {
        assert_eq!(real_interest(3.0, 2.0), 1.0);
        assert!(close(indexed_rent(950.0, 6.0), 1007.0, 1e-9));
        assert!(close(cumulative_factor(&[10.0, 10.0]), 1.21, 1e-12));
        assert_eq!(cumulative_factor(&[]), 1.0);
    }

    #[test]
    fn test_net_income() {
        assert_eq!(net_income(10_000.0), 10_000.0);
        // taxable 9000 at 0.18 + 9000/90000
        assert!(close(net_income(20_000.0), 20_000.0 - 9_000.0 * 0.28, 1e-9));
        // Marginal rate capped at 40 %
        assert!(close(net_income(211_000.0), 211_000.0 - 200_000.0 * 0.40, 1e-9));
    }

    #[test]
    fn test_progression_effect_shows_bracket_creep() {
        let effect = progression_effect(45_000.0, 3.0, 3.0);
        assert!(effect.net_after > effect.net_before);
        assert!(effect.real_change_pct < 0.0);

        let zero = progression_effect(0.0, 3.0, 3.0);
        assert!(zero.real_change_pct.is_finite());
    }

    #[test]
    fn test_real_wage() {
        let inflation = [0.5, 3.1, 6.9, 5.9, 2.2];
        let raises = [2.1, 2.8, 4.1, 5.2, 3.5];
        let result = real_wage(45_000.0, 50_000.0, &inflation, &raises);

        let factor = cumulative_factor(&inflation);
        assert!(close(result.inflation_adjusted_salary, 45_000.0 * factor, 1e-6));
        assert!(close(result.cumulative_inflation_pct, (factor - 1.0) * 100.0, 1e-9));
        assert!(!result.is_winner);
        assert_eq!(result.vs_average, Comparison::Worse);
        assert!(result.monthly_difference < 0.0);
        assert!(close(result.inflation_loss, 45_000.0 * (factor - 1.0), 1e-6));

        let winner = real_wage(45_000.0, 60_000.0, &inflation, &raises);
        assert!(winner.is_winner);
        assert_eq!(winner.vs_average.label(), "besser");
    }

    #[test]
    fn test_real_wage_zero_salary_stays_finite() {
        let result = real_wage(0.0, 0.0, &[2.0], &[2.0]);
        assert!(result.real_wage_change_pct.is_finite());
        assert!(result.purchasing_power_change_pct.is_finite());
        assert!(result.vs_average_pct.is_finite());
    }
}
