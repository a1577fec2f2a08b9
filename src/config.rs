// ⚙️ Runtime configuration
//
// Resolution order: built-in defaults, then an optional JSON file, then
// `INFLATION_*` environment variables. A broken file is an error; a broken
// environment value is logged and skipped.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_FRAME_MS: &str = "INFLATION_FRAME_MS";
pub const ENV_FALLBACK_MS: &str = "INFLATION_FALLBACK_MS";
pub const ENV_THRESHOLD: &str = "INFLATION_THRESHOLD";
pub const ENV_DATA_DIR: &str = "INFLATION_DATA_DIR";
pub const ENV_LOG_FILE: &str = "INFLATION_LOG_FILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Terminal redraw interval
    pub frame_ms: u64,
    /// Share of a section that must be on screen before it animates
    pub visibility_threshold: f64,
    /// Delay after which a gate fires even without visibility
    pub fallback_ms: u64,
    /// Duration of whole-series chart reveals
    pub chart_reveal_ms: u64,
    /// Duration of the presentation's inflation curve reveal
    pub statistics_reveal_ms: u64,
    /// Duration of the presentation's ECB rate reveal
    pub ecb_reveal_ms: u64,
    pub sparkline_points: usize,
    pub log_file: PathBuf,
    /// Directory whose CSV files replace the bundled tables
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            frame_ms: 16,
            visibility_threshold: 0.3,
            fallback_ms: 1200,
            chart_reveal_ms: 1200,
            statistics_reveal_ms: 1500,
            ecb_reveal_ms: 1800,
            sparkline_points: crate::sparkline::SPARKLINE_POINTS,
            log_file: PathBuf::from("inflation-explainer.log"),
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// Defaults, optional file, process environment
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        let config = base.with_env(|key| std::env::var(key).ok()).validated();
        tracing::debug!(?config, "configuration resolved");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ms) = parse_env(&lookup, ENV_FRAME_MS) {
            self.frame_ms = ms;
        }
        if let Some(ms) = parse_env(&lookup, ENV_FALLBACK_MS) {
            self.fallback_ms = ms;
        }
        if let Some(threshold) = parse_env(&lookup, ENV_THRESHOLD) {
            self.visibility_threshold = threshold;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(file) = lookup(ENV_LOG_FILE).filter(|v| !v.trim().is_empty()) {
            self.log_file = PathBuf::from(file);
        }
        self
    }

    /// Clamp everything into a usable range
    pub fn validated(mut self) -> Self {
        self.visibility_threshold = if self.visibility_threshold.is_finite() {
            self.visibility_threshold.clamp(0.0, 1.0)
        } else {
            AppConfig::default().visibility_threshold
        };
        self.frame_ms = self.frame_ms.max(1);
        self.chart_reveal_ms = self.chart_reveal_ms.max(1);
        self.statistics_reveal_ms = self.statistics_reveal_ms.max(1);
        self.ecb_reveal_ms = self.ecb_reveal_ms.max(1);
        self.sparkline_points = self.sparkline_points.max(2);
        self
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    pub fn fallback(&self) -> Duration {
        Duration::from_millis(self.fallback_ms)
    }

    pub fn chart_reveal(&self) -> Duration {
        Duration::from_millis(self.chart_reveal_ms)
    }

    pub fn statistics_reveal(&self) -> Duration {
        Duration::from_millis(self.statistics_reveal_ms)
    }

    pub fn ecb_reveal(&self) -> Duration {
        Duration::from_millis(self.ecb_reveal_ms)
    }
}

fn parse_env<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring invalid environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.fallback(), Duration::from_millis(1200));
        assert_eq!(config.statistics_reveal(), Duration::from_millis(1500));
        assert_eq!(config.ecb_reveal(), Duration::from_millis(1800));
        assert_eq!(config.sparkline_points, 40);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"frame_ms": 33, "visibility_threshold": 0.5}}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.frame_ms, 33);
        assert_eq!(config.visibility_threshold, 0.5);
        assert_eq!(config.fallback_ms, 1200);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));

        let missing = AppConfig::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(missing.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default().with_env(env(&[
            (ENV_FRAME_MS, "40"),
            (ENV_THRESHOLD, "0.6"),
            (ENV_DATA_DIR, "/tmp/tables"),
            (ENV_LOG_FILE, "ui.log"),
        ]));
        assert_eq!(config.frame_ms, 40);
        assert_eq!(config.visibility_threshold, 0.6);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/tables")));
        assert_eq!(config.log_file, PathBuf::from("ui.log"));
    }

    #[test]
    fn test_invalid_env_is_ignored() {
        let config = AppConfig::default().with_env(env(&[(ENV_FALLBACK_MS, "soon"), (ENV_DATA_DIR, "  ")]));
        assert_eq!(config.fallback_ms, 1200);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_validation_clamps() {
        let config = AppConfig {
            frame_ms: 0,
            visibility_threshold: 3.0,
            chart_reveal_ms: 0,
            sparkline_points: 0,
            ..AppConfig::default()
        }
        .validated();
        assert_eq!(config.frame_ms, 1);
        assert_eq!(config.visibility_threshold, 1.0);
        assert_eq!(config.chart_reveal_ms, 1);
        assert_eq!(config.sparkline_points, 2);

        let nan = AppConfig { visibility_threshold: f64::NAN, ..AppConfig::default() }.validated();
        assert_eq!(nan.visibility_threshold, 0.3);
    }
}
