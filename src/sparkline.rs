// 📈 Sparklines for historical inflation episodes
// Curated monthly price-index paths, plus a seeded generator for episodes
// without one
//
// Every sparkline is rebuilt on each render, so the generator must be fully
// deterministic: the same (seed, steps, hint) always yields the same series.

use crate::data::HistoricalEventRecord;
use rand::{Error as RandError, RngCore, SeedableRng};

/// Points per sparkline
pub const SPARKLINE_POINTS: usize = 40;

/// Lowest normalized height so early points stay visible
const MIN_VISIBLE: f64 = 0.035;

/// Ratio between largest and smallest value above which the log10 scale is used
const LOG_SCALE_RATIO: f64 = 500.0;

// ============================================================================
// MULBERRY32
// ============================================================================

/// Mulberry32: tiny 32-bit mix generator with a single word of state
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Mulberry32 { state: seed }
    }

    /// Uniform float in `[0, 1)`
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RandError> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Mulberry32::new(u32::from_le_bytes(seed))
    }
}

/// Stable seed per episode: 31-multiplier hash over year and UTF-16 locale name
pub fn seed_from(year: i32, locale: &str) -> u32 {
    locale
        .encode_utf16()
        .fold(year as u32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as u32))
}

// ============================================================================
// GENERATOR
// ============================================================================

/// Decorative growth path for an episode without curated data
///
/// Compounding growth scaled by `log10(scale_hint)`, small seeded noise and a
/// 15 % kick over the last three steps. Every output is finite and >= 0.05.
pub fn generate(seed: u32, steps: usize, scale_hint: f64) -> Vec<f64> {
    let mut rng = Mulberry32::new(seed);
    let rate_scale = if scale_hint.is_finite() { scale_hint.max(1.0).log10() } else { 0.0 };
    let base = 1.0 + 0.06 * rate_scale;
    let noise = 0.04 * (1.0 + 0.2 * rate_scale);

    let mut v = 0.15;
    let mut vals = Vec::with_capacity(steps);
    for i in 0..steps {
        let kick = if i + 4 > steps { 1.15 } else { 1.0 };
        v *= base * kick;
        v += (rng.next_f64() - 0.5) * noise;
        vals.push(v.max(0.05).min(f64::MAX));
    }
    vals
}

// ============================================================================
// SHAPING
// ============================================================================

/// Linear resampling to `target_len` points
///
/// Series already at the target length, and targets of two points or fewer,
/// are returned unchanged.
pub fn resample(series: &[f64], target_len: usize) -> Vec<f64> {
    if series.is_empty() || target_len <= 2 || series.len() == target_len {
        return series.to_vec();
    }
    if series.len() == 1 {
        return vec![series[0]; target_len];
    }

    let step = (series.len() - 1) as f64 / (target_len - 1) as f64;
    (0..target_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = (pos.floor() as usize).min(series.len() - 1);
            let frac = pos - idx as f64;
            let next = (idx + 1).min(series.len() - 1);
            series[idx] + (series[next] - series[idx]) * frac
        })
        .collect()
}

/// Switch to log10 when the positive values span 500x or more
pub fn adjust_dynamic_range(series: &[f64]) -> Vec<f64> {
    let positive = series.iter().copied().filter(|v| *v > 0.0);
    let (min, max) = positive.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !max.is_finite() || max / min.max(1.0) < LOG_SCALE_RATIO {
        return series.to_vec();
    }
    series.iter().map(|v| v.max(1.0).log10()).collect()
}

/// Scale into `(0, 1]`: last point exactly 1, others in `[0.035, 0.999]`
pub fn normalize(series: &[f64]) -> Vec<f64> {
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max == 0.0 {
        return series.to_vec();
    }
    let last = series.len() - 1;
    series
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if i == last {
                1.0
            } else {
                (v / max * (1.0 - MIN_VISIBLE) + MIN_VISIBLE).min(0.999)
            }
        })
        .collect()
}

// ============================================================================
// CURATED SERIES
// ============================================================================

/// Simplified monthly price-index paths (relative, not percent)
fn curated_series(locale: &str, year: i32) -> Option<&'static [f64]> {
    let series: &'static [f64] = match (locale, year) {
        ("Deutschland", 1923) => &[
            1.0, 1.4, 2.1, 3.3, 5.0, 7.8, 12.5, 20.5, 44.0, 118.0, 340.0, 980.0, 5400.0, 24000.0, 118000.0,
            900000.0, 12000000.0, 210000000.0, 3800000000.0, 68000000000.0, 1200000000000.0,
        ],
        ("Ungarn", 1946) => &[
            1.0, 3.8, 16.0, 68.0, 260.0, 1180.0, 5770.0, 27000.0, 131000.0, 6300000.0, 305000000.0,
            14600000000.0, 690000000000.0, 32000000000000.0, 1.5e15, 7.1e16,
        ],
        ("USA", 1980) => &[0.68, 0.71, 0.74, 0.77, 0.8, 0.83, 0.86, 0.89, 0.92, 0.95, 0.98, 1.0, 1.03, 1.06],
        ("USA", 1983) => &[1.12, 1.08, 1.04, 1.01, 0.99, 0.98, 0.97, 0.96, 0.96],
        ("Argentinien", 1989) => &[
            1.0, 1.22, 1.48, 1.82, 2.38, 3.3, 4.6, 6.8, 10.1, 15.4, 24.6, 39.5, 63.8, 103.1, 165.2, 265.5, 430.8,
            699.0,
        ],
        ("Zimbabwe", 2008) => &[
            1.0, 1.8, 3.2, 6.3, 14.0, 48.0, 180.0, 720.0, 3200.0, 15000.0, 78000.0, 410000.0, 2300000.0, 1.4e7,
            9.8e7, 6.9e8, 4.9e9, 3.6e10,
        ],
        ("Venezuela", 2018) => &[
            1.0, 1.18, 1.44, 1.76, 2.2, 2.9, 3.9, 5.4, 7.7, 11.0, 15.8, 22.6, 32.5, 46.7, 67.2, 96.8, 139.5, 199.6,
            285.2, 407.5, 582.8, 833.6,
        ],
        ("Ukraine", 1993) => &[
            1.0, 1.12, 1.28, 1.49, 1.74, 2.05, 2.42, 2.89, 3.45, 4.15, 5.01, 6.05, 7.32, 8.87, 10.78, 13.1, 15.92,
            19.35, 23.5, 28.6, 34.8, 42.4, 51.6,
        ],
        ("Japan", 1998) => &[1.02, 1.01, 1.0, 0.995, 0.99, 0.985, 0.98, 0.978, 0.976],
        _ => return None,
    };
    Some(series)
}

/// Sparkline heights in `(0, 1]` for an episode
///
/// Curated data wins; otherwise the seeded generator fills in, seeded from
/// year and locale so the shape is stable across renders.
pub fn build_sparkline(locale: &str, year: i32, fallback_rate: f64, points: usize) -> Vec<f64> {
    match curated_series(locale, year) {
        Some(series) if series.len() > 1 => normalize(&resample(&adjust_dynamic_range(series), points)),
        _ => {
            let vals = generate(seed_from(year, locale), points, fallback_rate);
            normalize(&resample(&adjust_dynamic_range(&vals), points))
        }
    }
}

pub fn sparkline_for(event: &HistoricalEventRecord, points: usize) -> Vec<f64> {
    build_sparkline(&event.locale, event.period, event.rate, points)
}

/// Whether the sparkline shows recorded data rather than a generated stand-in
pub fn has_curated_series(event: &HistoricalEventRecord) -> bool {
    curated_series(&event.locale, event.period).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_mulberry_is_deterministic() {
        let mut a = Mulberry32::new(42);
        let mut b = Mulberry32::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
        let mut c = Mulberry32::new(43);
        let differs = (0..10).any(|_| a.next_u32() != c.next_u32());
        assert!(differs);
    }

    #[test]
    fn test_mulberry_float_range_and_rng_trait() {
        let mut rng = Mulberry32::from_seed(7u32.to_le_bytes());
        for _ in 0..1000 {
            let f = rng.next_f64();
            assert!((0.0..1.0).contains(&f));
            let n: u8 = rng.gen_range(1..=6);
            assert!((1..=6).contains(&n));
        }
        let mut bytes = [0u8; 7];
        rng.fill_bytes(&mut bytes);
    }

    #[test]
    fn test_seed_from_is_stable_and_distinct() {
        assert_eq!(seed_from(1923, "Deutschland"), seed_from(1923, "Deutschland"));
        assert_ne!(seed_from(1923, "Deutschland"), seed_from(1924, "Deutschland"));
        assert_ne!(seed_from(1946, "Ungarn"), seed_from(1946, "Ukraine"));
        // Empty name leaves the year as is
        assert_eq!(seed_from(2008, ""), 2008);
        assert_eq!(seed_from(0, "A"), 65);
    }

    #[test]
    fn test_generate_reproducible() {
        let a = generate(42, 40, 1.0);
        let b = generate(42, 40, 1.0);
        assert_eq!(a.len(), 40);
        let a_bits: Vec<u64> = a.iter().map(|v| v.to_bits()).collect();
        let b_bits: Vec<u64> = b.iter().map(|v| v.to_bits()).collect();
        assert_eq!(a_bits, b_bits);
    }

    #[test]
    fn test_generate_different_seeds_differ() {
        assert_ne!(generate(42, 40, 1.0), generate(43, 40, 1.0));
        assert_ne!(generate(1, 40, 1e6), generate(2, 40, 1e6));
    }

    #[test]
    fn test_generate_bounded() {
        for (seed, hint) in [(0, 0.0), (42, 1.0), (7, 3079.0), (99, 1.36e16), (5, f64::NAN), (3, -50.0)] {
            let series = generate(seed, 40, hint);
            assert!(series.iter().all(|v| v.is_finite() && *v >= 0.05), "seed {} hint {}", seed, hint);
        }
        assert!(generate(1, 0, 1.0).is_empty());
    }

    #[test]
    fn test_generate_late_kick_for_large_hint() {
        let series = generate(11, 40, 1e9);
        assert!(series[39] > series[30]);
    }

    #[test]
    fn test_resample_endpoints_and_length() {
        let out = resample(&[0.0, 10.0], 11);
        assert_eq!(out.len(), 11);
        assert_eq!(out[0], 0.0);
        assert!((out[5] - 5.0).abs() < 1e-9);
        assert_eq!(out[10], 10.0);

        assert_eq!(resample(&[3.0], 4), vec![3.0; 4]);
        assert_eq!(resample(&[1.0, 2.0, 3.0], 2), vec![1.0, 2.0, 3.0]);
        assert!(resample(&[], 10).is_empty());
    }

    #[test]
    fn test_adjust_dynamic_range() {
        let flat = [1.0, 2.0, 3.0];
        assert_eq!(adjust_dynamic_range(&flat), flat.to_vec());

        let steep = adjust_dynamic_range(&[1.0, 10.0, 1000.0]);
        for (got, want) in steep.iter().zip([0.0, 1.0, 3.0]) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_normalize() {
        let out = normalize(&[0.0, 5.0, 10.0]);
        assert_eq!(out[2], 1.0);
        assert!((out[0] - MIN_VISIBLE).abs() < 1e-12);
        assert!(out[1] > out[0] && out[1] <= 0.999);

        assert_eq!(normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_build_sparkline_curated_and_fallback() {
        let curated = build_sparkline("Deutschland", 1923, 325e6, SPARKLINE_POINTS);
        assert_eq!(curated.len(), SPARKLINE_POINTS);
        assert_eq!(curated[SPARKLINE_POINTS - 1], 1.0);
        assert!(curated.iter().all(|v| *v > 0.0 && *v <= 1.0));

        let generated = build_sparkline("Atlantis", 2030, 500.0, SPARKLINE_POINTS);
        assert_eq!(generated.len(), SPARKLINE_POINTS);
        assert_eq!(generated, build_sparkline("Atlantis", 2030, 500.0, SPARKLINE_POINTS));
        assert!(generated.iter().all(|v| v.is_finite() && *v > 0.0 && *v <= 1.0));
    }

    #[test]
    fn test_has_curated_series() {
        let data = crate::data::Dataset::bundled().unwrap();
        assert!(data.historical_events.iter().all(has_curated_series));

        let mut unknown = data.historical_events[0].clone();
        unknown.locale = "Atlantis".to_string();
        assert!(!has_curated_series(&unknown));
        assert_eq!(sparkline_for(&unknown, 12).len(), 12);
    }
}
