//! GPU acceleration for the ranking engine
//!
//! The same per-node recurrence as the CPU backend, executed as one
//! data-parallel kernel launch per iteration over the flattened adjacency.
//!
//! # Architecture
//!
//! - `device`: wgpu context creation and shader builds
//! - `buffer`: device-side buffers for the flattened adjacency
//! - `executor`: per-iteration dispatch, upload and readback
//!
//! # Feature Flag
//!
//! This module is only available with the `gpu` feature flag:
//! ```bash
//! cargo build --features gpu
//! ```

mod buffer;
mod device;
mod executor;

pub use buffer::GpuRankBuffers;
pub use device::{GpuDevice, GpuDeviceError};
pub use executor::GpuExecutor;

use crate::rank::{PowerIteration, RankConfig, RankOutcome, RankSolution};
use crate::storage::{AdjacencyTable, FlatAdjacency};
use anyhow::Result;

/// Run PageRank on the GPU backend.
///
/// Flattens the frozen table, uploads it once, and drives the shared
/// iteration protocol with the kernel executor.
///
/// # Errors
///
/// Returns an error for invalid configuration, shader build failure, or
/// device loss during the run.
pub async fn rank_gpu(
    device: &GpuDevice,
    table: &AdjacencyTable,
    config: &RankConfig,
) -> Result<RankSolution> {
    config.validate()?;

    // Degenerate success; no device work for an empty graph.
    if table.row_count() == 0 {
        return Ok(RankSolution {
            ranks: Vec::new(),
            iterations: 0,
            outcome: RankOutcome::Converged,
        });
    }

    let flat = FlatAdjacency::from_table(table);
    let executor = GpuExecutor::new(device, &flat, table.out_degrees()).await?;
    let engine = PowerIteration::new(table, config.clone(), executor)?;
    engine.run().await
}
