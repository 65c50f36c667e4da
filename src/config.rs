//! Configuration Module
//!
//! Loads benchmark harness settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Output format for the benchmark report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{}', expected text or json", other)),
        }
    }
}

/// Benchmark harness configuration.
///
/// All values can be configured via environment variables with defaults that
/// reproduce the reference run: one million concurrent sets of `"some data"`
/// with a one minute TTL, followed by one million concurrent gets.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Number of concurrent operations per phase
    pub connections: usize,
    /// TTL applied to every entry written by the set phase
    pub ttl: Duration,
    /// Payload stored under each key
    pub payload: String,
    /// Keys are `{key_prefix}{index}`
    pub key_prefix: String,
    /// Background sweep interval, None disables the sweeper
    pub sweep_interval: Option<Duration>,
    /// How the final report is printed
    pub report_format: ReportFormat,
}

impl BenchConfig {
    /// Creates a new BenchConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `BENCH_CONNECTIONS` - Operations per phase, at least 1 (default: 1000000)
    /// - `BENCH_TTL_MS` - Entry TTL in milliseconds, negative values are rejected (default: 60000)
    /// - `BENCH_PAYLOAD` - Value stored under each key (default: "some data")
    /// - `BENCH_KEY_PREFIX` - Key prefix (default: "key")
    /// - `BENCH_SWEEP_INTERVAL_MS` - Sweeper interval in milliseconds, 0 disables it (default: 0)
    /// - `BENCH_REPORT` - `text` or `json` (default: text)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        let connections = match lookup("BENCH_CONNECTIONS") {
            Some(raw) => {
                let n: usize = parse_var("BENCH_CONNECTIONS", &raw)?;
                if n == 0 {
                    return Err(CacheError::invalid_config(
                        "BENCH_CONNECTIONS",
                        raw,
                        "must be at least 1",
                    ));
                }
                n
            }
            None => defaults.connections,
        };

        let ttl = match lookup("BENCH_TTL_MS") {
            Some(raw) => {
                let ms: i64 = parse_var("BENCH_TTL_MS", &raw)?;
                let ms = u64::try_from(ms).map_err(|_| {
                    CacheError::invalid_config("BENCH_TTL_MS", raw.as_str(), "TTL must not be negative")
                })?;
                Duration::from_millis(ms)
            }
            None => defaults.ttl,
        };

        let sweep_interval = match lookup("BENCH_SWEEP_INTERVAL_MS") {
            Some(raw) => match parse_var::<u64>("BENCH_SWEEP_INTERVAL_MS", &raw)? {
                0 => None,
                ms => Some(Duration::from_millis(ms)),
            },
            None => defaults.sweep_interval,
        };

        let report_format = match lookup("BENCH_REPORT") {
            Some(raw) => parse_var("BENCH_REPORT", &raw)?,
            None => defaults.report_format,
        };

        Ok(Self {
            connections,
            ttl,
            payload: lookup("BENCH_PAYLOAD").unwrap_or(defaults.payload),
            key_prefix: lookup("BENCH_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            sweep_interval,
            report_format,
        })
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            connections: 1_000_000,
            ttl: Duration::from_secs(60),
            payload: "some data".to_string(),
            key_prefix: "key".to_string(),
            sweep_interval: None,
            report_format: ReportFormat::Text,
        }
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| CacheError::invalid_config(var, raw, e.to_string()))
}
