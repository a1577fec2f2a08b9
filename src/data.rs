// 🗂️ Data tables - bundled economic data
// Destatis, Bundesbank/EZB and historical series, read once at startup
//
// Tables ship inside the binary as CSV. A data directory can replace any
// single table file at runtime. All records are immutable after loading.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;
use std::path::Path;

// ============================================================================
// RECORDS
// ============================================================================

/// One point of a time series (year or labelled period)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub period: String,
    #[serde(deserialize_with = "number_or_zero")]
    pub value: f64,
}

impl TimeSeriesPoint {
    /// Leading year of the period ("2022 Q3" → 2022)
    pub fn year(&self) -> Option<i32> {
        period_year(&self.period)
    }
}

/// ECB deposit rate at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcbRatePoint {
    pub period: String,
    #[serde(deserialize_with = "number_or_zero")]
    pub rate: f64,
    pub as_of: NaiveDate,
    #[serde(default)]
    pub event: String,
}

/// Share of a whole (causes, CPI basket weights)
///
/// Shares are expected to sum to 100 but this is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub label: String,
    #[serde(deserialize_with = "number_or_zero")]
    pub share: f64,
    pub color: String,
    #[serde(default)]
    pub description: String,
}

/// A historical inflation episode; rates reach 10^16 %
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEventRecord {
    pub period: i32,
    pub locale: String,
    #[serde(deserialize_with = "number_or_zero")]
    pub rate: f64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceExample {
    pub item: String,
    #[serde(deserialize_with = "number_or_zero")]
    pub price_2020: f64,
    #[serde(deserialize_with = "number_or_zero")]
    pub price_2025: f64,
    /// Rounded increase in percent as published
    #[serde(deserialize_with = "number_or_zero")]
    pub increase: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInflation {
    pub category: String,
    #[serde(deserialize_with = "number_or_zero")]
    pub rate_2025: f64,
    #[serde(deserialize_with = "number_or_zero")]
    pub rate_2022: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealWagePoint {
    pub period: i32,
    #[serde(deserialize_with = "number_or_zero")]
    pub nominal_growth: f64,
    #[serde(deserialize_with = "number_or_zero")]
    pub real_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryInflation {
    pub country: String,
    #[serde(deserialize_with = "number_or_zero")]
    pub rate_2025: f64,
    #[serde(deserialize_with = "number_or_zero")]
    pub rate_2022: f64,
}

/// Empty or unparsable numbers read as 0
fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = csv::invalid_option(deserializer)?;
    Ok(value.filter(|v| v.is_finite()).unwrap_or(0.0))
}

fn period_year(period: &str) -> Option<i32> {
    let digits: String = period.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

// ============================================================================
// BUNDLED TABLES
// ============================================================================

struct Table {
    file: &'static str,
    bundled: &'static str,
}

const INFLATION_GERMANY: Table = Table {
    file: "inflation_germany.csv",
    bundled: include_str!("../data/inflation_germany.csv"),
};
const CORE_INFLATION_GERMANY: Table = Table {
    file: "core_inflation_germany.csv",
    bundled: include_str!("../data/core_inflation_germany.csv"),
};
const SALARY_GROWTH: Table = Table {
    file: "salary_growth.csv",
    bundled: include_str!("../data/salary_growth.csv"),
};
const ECB_RATES: Table = Table {
    file: "ecb_rates.csv",
    bundled: include_str!("../data/ecb_rates.csv"),
};
const INFLATION_CAUSES: Table = Table {
    file: "inflation_causes.csv",
    bundled: include_str!("../data/inflation_causes.csv"),
};
const CPI_WEIGHTS: Table = Table {
    file: "cpi_weights.csv",
    bundled: include_str!("../data/cpi_weights.csv"),
};
const HISTORICAL_EVENTS: Table = Table {
    file: "historical_events.csv",
    bundled: include_str!("../data/historical_events.csv"),
};
const PRICE_EXAMPLES: Table = Table {
    file: "price_examples.csv",
    bundled: include_str!("../data/price_examples.csv"),
};
const CATEGORY_INFLATION: Table = Table {
    file: "category_inflation.csv",
    bundled: include_str!("../data/category_inflation.csv"),
};
const REAL_WAGES: Table = Table {
    file: "real_wages.csv",
    bundled: include_str!("../data/real_wages.csv"),
};
const GLOBAL_INFLATION: Table = Table {
    file: "global_inflation.csv",
    bundled: include_str!("../data/global_inflation.csv"),
};

// ============================================================================
// DATASET
// ============================================================================

/// Every table the explainer displays
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub inflation_germany: Vec<TimeSeriesPoint>,
    pub core_inflation_germany: Vec<TimeSeriesPoint>,
    /// Average nominal salary increase per year (2020-2024)
    pub salary_growth: Vec<TimeSeriesPoint>,
    pub ecb_rates: Vec<EcbRatePoint>,
    pub causes: Vec<CategoryBreakdown>,
    pub cpi_weights: Vec<CategoryBreakdown>,
    pub historical_events: Vec<HistoricalEventRecord>,
    pub price_examples: Vec<PriceExample>,
    pub category_inflation: Vec<CategoryInflation>,
    pub real_wages: Vec<RealWagePoint>,
    pub global_inflation: Vec<CountryInflation>,
}

impl Dataset {
    /// Tables compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::load(None)
    }

    /// Bundled tables, with any file present in `data_dir` taking precedence
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        let mut dataset = Dataset {
            inflation_germany: read_table(&INFLATION_GERMANY, data_dir)?,
            core_inflation_germany: read_table(&CORE_INFLATION_GERMANY, data_dir)?,
            salary_growth: read_table(&SALARY_GROWTH, data_dir)?,
            ecb_rates: read_table(&ECB_RATES, data_dir)?,
            causes: read_table(&INFLATION_CAUSES, data_dir)?,
            cpi_weights: read_table(&CPI_WEIGHTS, data_dir)?,
            historical_events: read_table(&HISTORICAL_EVENTS, data_dir)?,
            price_examples: read_table(&PRICE_EXAMPLES, data_dir)?,
            category_inflation: read_table(&CATEGORY_INFLATION, data_dir)?,
            real_wages: read_table(&REAL_WAGES, data_dir)?,
            global_inflation: read_table(&GLOBAL_INFLATION, data_dir)?,
        };

        // Series are displayed left to right by period; don't trust file order
        sort_series(&mut dataset.inflation_germany);
        sort_series(&mut dataset.core_inflation_germany);
        sort_series(&mut dataset.salary_growth);
        dataset.ecb_rates.sort_by_key(|p| p.as_of);
        dataset.real_wages.sort_by_key(|p| p.period);

        let shares = share_total(&dataset.causes);
        if (shares - 100.0).abs() > 0.5 {
            tracing::warn!(total = shares, "inflation cause shares do not sum to 100");
        }
        tracing::info!(
            years = dataset.inflation_germany.len(),
            ecb_decisions = dataset.ecb_rates.len(),
            events = dataset.historical_events.len(),
            overrides = data_dir.is_some(),
            "dataset loaded"
        );

        Ok(dataset)
    }

    pub fn inflation_values(&self) -> Vec<f64> {
        values(&self.inflation_germany)
    }

    pub fn core_inflation_values(&self) -> Vec<f64> {
        values(&self.core_inflation_germany)
    }

    pub fn ecb_rate_values(&self) -> Vec<f64> {
        self.ecb_rates.iter().map(|p| p.rate).collect()
    }

    pub fn salary_growth_values(&self) -> Vec<f64> {
        values(&self.salary_growth)
    }

    /// Inflation rates for the given years, in series order; missing years are skipped
    pub fn inflation_between(&self, from: i32, to: i32) -> Vec<f64> {
        self.inflation_germany
            .iter()
            .filter(|p| p.year().is_some_and(|y| y >= from && y <= to))
            .map(|p| p.value)
            .collect()
    }

    /// Historical events, oldest first
    pub fn events_by_period(&self) -> Vec<&HistoricalEventRecord> {
        let mut events: Vec<_> = self.historical_events.iter().collect();
        events.sort_by_key(|e| e.period);
        events
    }
}

pub fn values(series: &[TimeSeriesPoint]) -> Vec<f64> {
    series.iter().map(|p| p.value).collect()
}

pub fn share_total(parts: &[CategoryBreakdown]) -> f64 {
    parts.iter().map(|p| p.share).sum()
}

fn sort_series(series: &mut [TimeSeriesPoint]) {
    series.sort_by(|a, b| {
        a.year()
            .unwrap_or(i32::MAX)
            .cmp(&b.year().unwrap_or(i32::MAX))
            .then_with(|| a.period.cmp(&b.period))
    });
}

fn read_table<T: DeserializeOwned>(table: &Table, data_dir: Option<&Path>) -> Result<Vec<T>> {
    if let Some(path) = data_dir.map(|dir| dir.join(table.file)).filter(|p| p.exists()) {
        let reader = csv::Reader::from_path(&path)
            .with_context(|| format!("Failed to open data file {}", path.display()))?;
        let rows = parse_rows(reader, table.file)?;
        tracing::info!(table = table.file, rows = rows.len(), source = %path.display(), "loaded data table");
        return Ok(rows);
    }

    let rows = parse_rows(csv::Reader::from_reader(table.bundled.as_bytes()), table.file)?;
    tracing::debug!(table = table.file, rows = rows.len(), source = "bundled", "loaded data table");
    Ok(rows)
}

fn parse_rows<R: Read, T: DeserializeOwned>(mut reader: csv::Reader<R>, name: &str) -> Result<Vec<T>> {
    let mut rows = Vec::new();
    for (line, result) in reader.deserialize().enumerate() {
        let row: T = result.with_context(|| format!("Failed to deserialize {} row {}", name, line + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_bundled_tables_load() {
        let data = Dataset::bundled().unwrap();
        assert_eq!(data.inflation_values(), vec![1.4, 0.5, 3.1, 6.9, 5.9, 2.2, 2.2]);
        assert_eq!(data.core_inflation_germany.len(), 7);
        assert_eq!(data.ecb_rates.len(), 9);
        assert_eq!(data.causes.len(), 5);
        assert_eq!(data.cpi_weights.len(), 8);
        assert_eq!(data.historical_events.len(), 7);
        assert_eq!(data.price_examples.len(), 6);
        assert_eq!(data.category_inflation.len(), 5);
        assert_eq!(data.real_wages.len(), 7);
        assert_eq!(data.global_inflation.len(), 8);
        assert_eq!(data.salary_growth_values(), vec![2.1, 2.8, 4.1, 5.2, 3.5]);
    }

    #[test]
    fn test_shares_sum_to_hundred() {
        let data = Dataset::bundled().unwrap();
        assert_eq!(share_total(&data.causes), 100.0);
        assert_eq!(share_total(&data.cpi_weights), 100.0);
    }

    #[test]
    fn test_quoted_fields_and_extreme_rates() {
        let data = Dataset::bundled().unwrap();
        let hungary = data.historical_events.iter().find(|e| e.locale == "Ungarn").unwrap();
        assert_eq!(hungary.rate, 13_600_000_000_000_000.0);
        assert_eq!(hungary.period, 1946);

        let supply = &data.causes[1];
        assert_eq!(supply.description, "Lieferkettenprobleme, Rohstoffknappheit, Energiekrise");
    }

    #[test]
    fn test_ecb_dates_and_order() {
        let data = Dataset::bundled().unwrap();
        let last = data.ecb_rates.last().unwrap();
        assert_eq!(last.as_of, NaiveDate::from_ymd_opt(2025, 9, 11).unwrap());
        assert_eq!(last.rate, 2.0);
        assert!(data.ecb_rates.windows(2).all(|w| w[0].as_of <= w[1].as_of));
    }

    #[test]
    fn test_period_year() {
        let point = TimeSeriesPoint { period: "2022 Q3".to_string(), value: 0.75 };
        assert_eq!(point.year(), Some(2022));
        let point = TimeSeriesPoint { period: "Q3".to_string(), value: 0.0 };
        assert_eq!(point.year(), None);
    }

    #[test]
    fn test_inflation_between() {
        let data = Dataset::bundled().unwrap();
        assert_eq!(data.inflation_between(2020, 2024), vec![0.5, 3.1, 6.9, 5.9, 2.2]);
        assert!(data.inflation_between(1990, 1995).is_empty());
    }

    #[test]
    fn test_events_by_period() {
        let data = Dataset::bundled().unwrap();
        let years: Vec<i32> = data.events_by_period().iter().map(|e| e.period).collect();
        assert_eq!(years, vec![1923, 1946, 1980, 1989, 1993, 2008, 2018]);
    }

    #[test]
    fn test_override_dir_resorts_and_falls_back_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("inflation_germany.csv"),
            "period,value\n2021,3.1\n2019,\n2020,n/a\n",
        )
        .unwrap();

        let data = Dataset::load(Some(dir.path())).unwrap();
        let periods: Vec<&str> = data.inflation_germany.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, vec!["2019", "2020", "2021"]);
        assert_eq!(data.inflation_values(), vec![0.0, 0.0, 3.1]);
        // Other tables still come from the bundle
        assert_eq!(data.causes.len(), 5);
    }

    #[test]
    fn test_broken_override_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ecb_rates.csv"), "period,rate,as_of,event\n2019,-0.5,not-a-date,x\n").unwrap();
        let err = Dataset::load(Some(dir.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("ecb_rates.csv"));
    }
}
