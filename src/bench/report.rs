//! Benchmark Report
//!
//! Timing results for each harness phase, printable as text or JSON.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::cache::StatsSnapshot;
use crate::config::ReportFormat;
use crate::error::Result;

/// Kind of operation a phase performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Set,
    Get,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Set => write!(f, "set"),
            Phase::Get => write!(f, "get"),
        }
    }
}

// == Phase Report ==
/// Result of running one batch of concurrent operations.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    /// Which operation the phase ran
    pub phase: Phase,
    /// Number of operations launched
    pub operations: usize,
    /// Wall time from first spawn until the last operation finished
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
    /// Lookups that found a live value (get phase only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits: Option<usize>,
}

impl PhaseReport {
    pub fn new(phase: Phase, operations: usize, elapsed: Duration, hits: Option<usize>) -> Self {
        Self {
            phase,
            operations,
            elapsed,
            hits,
        }
    }

    /// Operations completed per second of wall time.
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.operations as f64 / secs
        }
    }
}

impl fmt::Display for PhaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} time for {} connections: {:?} ({:.0} ops/s)",
            self.phase,
            self.operations,
            self.elapsed,
            self.ops_per_sec()
        )?;
        if let Some(hits) = self.hits {
            write!(f, ", {} hits", hits)?;
        }
        Ok(())
    }
}

fn serialize_millis<S>(elapsed: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(elapsed.as_nanos() as f64 / 1_000_000.0)
}

// == Bench Report ==
/// Full result of a harness run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub started_at: DateTime<Utc>,
    pub connections: usize,
    pub phases: Vec<PhaseReport>,
    /// Cache counters after the last phase
    pub stats: StatsSnapshot,
}

impl BenchReport {
    /// Returns the report for `phase`, if it ran.
    pub fn phase(&self, phase: Phase) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Renders the report in the requested format.
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => self.to_json(),
        }
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Benchmark started at {}", self.started_at.to_rfc3339())?;
        for phase in &self.phases {
            writeln!(f, "  {}", phase)?;
        }
        write!(
            f,
            "  cache: {} entries, {} sets, {} hits, {} misses ({:.1}% hit rate), {} swept",
            self.stats.total_entries,
            self.stats.sets,
            self.stats.hits,
            self.stats.misses,
            self.stats.hit_rate() * 100.0,
            self.stats.swept
        )
    }
}
