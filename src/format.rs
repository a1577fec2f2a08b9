// 🔢 German number formatting
// Grouping "." and decimal "," (de-DE), magnitude-aware inflation rates
//
// Inflation rates in the explainer range from -0,7 % to 13,6 Billiarden %.
// Anything from one million upwards gets a scale word so the magnitude stays
// readable.

// ============================================================================
// SCALE TIERS
// ============================================================================

/// Scale words, largest first
const RATE_TIERS: [(f64, &str); 4] = [
    (1e15, "Billiarden"),
    (1e12, "Billionen"),
    (1e9, "Milliarden"),
    (1e6, "Millionen"),
];

/// Format an inflation rate for display
///
/// - `>= 10^6`: divided into the largest matching tier, at most one fraction
///   digit, e.g. `"325 Millionen %"`, `"13,6 Billiarden %"`
/// - below: the raw percentage with up to three fraction digits, e.g.
///   `"0,5%"`, `"130.060%"`, `"-0,7%"`
///
/// Non-finite input is shown as `"0%"`.
pub fn format_rate(rate: f64) -> String {
    let r = finite_or_zero(rate);
    for (scale, word) in RATE_TIERS {
        if r >= scale {
            return format!("{} {} %", format_number(r / scale, 0, 1), word);
        }
    }
    format!("{}%", format_number(r, 0, 3))
}

// ============================================================================
// PRIMITIVES
// ============================================================================

/// de-DE number with `min_frac..=max_frac` fraction digits
///
/// Rounds half away from zero. Trailing zeros beyond `min_frac` are dropped.
pub fn format_number(value: f64, min_frac: usize, max_frac: usize) -> String {
    let value = finite_or_zero(value);
    let max_frac = max_frac.max(min_frac);

    let factor = 10f64.powi(max_frac as i32);
    let mut rounded = (value * factor).round() / factor;
    if !rounded.is_finite() {
        rounded = value;
    }

    let text = format!("{:.*}", max_frac, rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_frac {
        frac.push('0');
    }

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    // -0 after rounding is shown as 0
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac.is_empty() {
        out.push(',');
        out.push_str(&frac);
    }
    out
}

/// Percentage with a fixed number of fraction digits, e.g. `"6,9%"`
pub fn format_percent(value: f64, digits: usize) -> String {
    format!("{}%", format_number(value, digits, digits))
}

/// Like `format_percent` with an explicit `+` for positive values
pub fn format_signed_percent(value: f64, digits: usize) -> String {
    let text = format_percent(value, digits);
    if value > 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("+{}", text)
    } else {
        text
    }
}

/// Euro amount, e.g. `"45.000 €"` or `"1,93 €"`
pub fn format_eur(amount: f64, decimals: usize) -> String {
    format!("{} €", format_number(amount, decimals, decimals))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Missing or broken numbers read as zero
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rate_small_values() {
        assert_eq!(format_rate(0.5), "0,5%");
        assert_eq!(format_rate(-0.7), "-0,7%");
        assert_eq!(format_rate(13.5), "13,5%");
        assert_eq!(format_rate(0.0), "0%");
    }

    #[test]
    fn test_format_rate_grouping_below_million() {
        assert_eq!(format_rate(3079.0), "3.079%");
        assert_eq!(format_rate(130060.0), "130.060%");
        assert_eq!(format_rate(999_999.0), "999.999%");
    }

    #[test]
    fn test_format_rate_tiers() {
        assert_eq!(format_rate(1_000_000.0), "1 Millionen %");
        assert_eq!(format_rate(325_000_000.0), "325 Millionen %");
        assert_eq!(format_rate(89_700_000_000.0), "89,7 Milliarden %");
        assert_eq!(format_rate(4_200_000_000_000.0), "4,2 Billionen %");
        assert_eq!(format_rate(13_600_000_000_000_000.0), "13,6 Billiarden %");
    }

    #[test]
    fn test_format_rate_tier_rounding() {
        assert_eq!(format_rate(1_250_000.0), "1,3 Millionen %");
        assert_eq!(format_rate(2_000_000_000_000_000_000.0), "2.000 Billiarden %");
    }

    #[test]
    fn test_format_rate_non_finite() {
        assert_eq!(format_rate(f64::NAN), "0%");
        assert_eq!(format_rate(f64::INFINITY), "0%");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.891, 0, 2), "1.234.567,89");
        assert_eq!(format_number(1.5, 2, 2), "1,50");
        assert_eq!(format_number(0.25, 0, 1), "0,3");
        assert_eq!(format_number(-0.04, 0, 1), "0");
        assert_eq!(format_number(-1234.0, 0, 0), "-1.234");
        assert_eq!(format_number(999.96, 0, 1), "1.000");
    }

    #[test]
    fn test_percent_and_currency() {
        assert_eq!(format_percent(6.9, 1), "6,9%");
        assert_eq!(format_percent(2.0, 1), "2,0%");
        assert_eq!(format_signed_percent(3.25, 1), "+3,3%");
        assert_eq!(format_signed_percent(-4.3, 1), "-4,3%");
        assert_eq!(format_signed_percent(0.01, 1), "0,0%");
        assert_eq!(format_eur(45000.0, 0), "45.000 €");
        assert_eq!(format_eur(1.93, 2), "1,93 €");
    }
}
