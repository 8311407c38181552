//! Ranking engine: configuration, power-iteration driver, CPU backend

pub mod config;
pub mod cpu;
pub mod engine;

pub use config::{ConfigError, RankConfig};
pub use cpu::CpuExecutor;
pub use engine::{PowerIteration, RankExecutor, RankOutcome, RankSolution};

use crate::storage::AdjacencyTable;
use anyhow::Result;

/// Run PageRank on the CPU fork-join backend.
///
/// # Errors
///
/// Returns an error for invalid configuration.
pub async fn rank_cpu(table: &AdjacencyTable, config: &RankConfig) -> Result<RankSolution> {
    let engine = PowerIteration::new(table, config.clone(), CpuExecutor::new(table))?;
    engine.run().await
}
