//! TTL Cache - An in-memory key-value cache with time-based expiration
//!
//! A single reader-writer lock guards the map; expired entries are hidden
//! from lookups immediately and reclaimed by explicit or periodic sweeps.
//! A concurrency benchmark harness drives the cache from many tasks at once.

pub mod bench;
pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use bench::Harness;
pub use cache::Cache;
pub use config::BenchConfig;
pub use error::{CacheError, Result};
pub use tasks::spawn_sweeper;
