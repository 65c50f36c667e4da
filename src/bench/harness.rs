//! Benchmark Harness
//!
//! Drives a cache with large batches of concurrent sets and gets and times
//! each batch. The harness owns its cache; nothing is shared process-wide.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use chrono::Utc;
use tokio::task::JoinSet;
use tracing::info;

use crate::bench::{BenchReport, Phase, PhaseReport};
use crate::cache::Cache;
use crate::config::BenchConfig;
use crate::error::Result;
use crate::tasks::spawn_sweeper;

/// Owns a cache instance and replays the configured workload against it.
#[derive(Debug)]
pub struct Harness {
    cache: Arc<Cache>,
    config: BenchConfig,
    payload: Bytes,
    key_prefix: Arc<str>,
}

impl Harness {
    /// Creates a harness with a fresh cache sized for the configured workload.
    pub fn new(config: BenchConfig) -> Self {
        let cache = Arc::new(Cache::with_capacity(config.connections));
        Self::with_cache(config, cache)
    }

    /// Creates a harness that drives an existing cache.
    pub fn with_cache(config: BenchConfig, cache: Arc<Cache>) -> Self {
        let payload = Bytes::from(config.payload.clone());
        let key_prefix = Arc::from(config.key_prefix.as_str());
        Self {
            cache,
            config,
            payload,
            key_prefix,
        }
    }

    pub fn cache(&self) -> &Arc<Cache> {
        &self.cache
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    // == Set Phase ==
    /// Spawns one task per connection, task `i` storing the payload under key `i`.
    pub async fn run_set_phase(&self) -> Result<PhaseReport> {
        let connections = self.config.connections;
        let ttl = self.config.ttl;
        info!(connections, ?ttl, "Starting set phase");

        let started = Instant::now();
        let mut tasks = JoinSet::new();
        for i in 0..connections {
            let cache = Arc::clone(&self.cache);
            let prefix = Arc::clone(&self.key_prefix);
            let payload = self.payload.clone();
            tasks.spawn(async move {
                cache.set(format!("{prefix}{i}"), payload, ttl);
            });
        }
        while let Some(joined) = tasks.join_next().await {
            joined?;
        }
        let elapsed = started.elapsed();

        info!(connections, ?elapsed, "Set phase finished");
        Ok(PhaseReport::new(Phase::Set, connections, elapsed, None))
    }

    // == Get Phase ==
    /// Spawns one task per connection, task `i` looking up key `i`.
    pub async fn run_get_phase(&self) -> Result<PhaseReport> {
        let connections = self.config.connections;
        info!(connections, "Starting get phase");

        let started = Instant::now();
        let mut tasks = JoinSet::new();
        for i in 0..connections {
            let cache = Arc::clone(&self.cache);
            let prefix = Arc::clone(&self.key_prefix);
            tasks.spawn(async move { cache.get(&format!("{prefix}{i}")).is_some() });
        }
        let mut hits: usize = 0;
        while let Some(joined) = tasks.join_next().await {
            if joined? {
                hits += 1;
            }
        }
        let elapsed = started.elapsed();

        info!(connections, hits, ?elapsed, "Get phase finished");
        Ok(PhaseReport::new(Phase::Get, connections, elapsed, Some(hits)))
    }

    // == Run ==
    /// Runs the set phase then the get phase, with the sweeper active for the
    /// whole run when a sweep interval is configured.
    pub async fn run(&self) -> Result<BenchReport> {
        let started_at = Utc::now();
        let sweeper = self
            .config
            .sweep_interval
            .map(|interval| spawn_sweeper(Arc::clone(&self.cache), interval));

        let phases = self.run_phases().await;

        if let Some(handle) = sweeper {
            handle.abort();
        }

        Ok(BenchReport {
            started_at,
            connections: self.config.connections,
            phases: phases?,
            stats: self.cache.stats(),
        })
    }

    async fn run_phases(&self) -> Result<Vec<PhaseReport>> {
        let set = self.run_set_phase().await?;
        let get = self.run_get_phase().await?;
        Ok(vec![set, get])
    }
}
