//! Benchmark Module
//!
//! Concurrency benchmark that exercises a cache with batches of parallel
//! sets and gets and reports the wall time of each batch.

mod harness;
mod report;

pub use harness::Harness;
pub use report::{BenchReport, Phase, PhaseReport};
