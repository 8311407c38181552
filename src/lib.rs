//! rapidrank: PageRank for sparse directed graphs
//!
//! # Overview
//!
//! rapidrank computes the PageRank stationary distribution of a directed
//! graph built from an edge list, via power iteration with dangling-node
//! redistribution. The per-iteration rank update is delegated to one of two
//! interchangeable executors: a CPU fork-join backend (rayon) or a GPU
//! compute backend (wgpu, behind the `gpu` feature). Both converge to the
//! same vector within floating-point tolerance.
//!
//! # Quick Start
//!
//! ```
//! use rapidrank::{read_edge_list, rank_cpu, RankConfig};
//! use std::io::Cursor;
//!
//! # async fn example() -> rapidrank::Result<()> {
//! let config = RankConfig::default();
//!
//! let edges = "a b\nb c\nc a\n";
//! let (table, registry, _stats) = read_edge_list(Cursor::new(edges), &config)?;
//!
//! let solution = rank_cpu(&table, &config).await?;
//! assert_eq!(solution.ranks.len(), 3);
//!
//! // Report ranks under their original keys
//! for (i, rank) in solution.ranks.iter().enumerate() {
//!     println!("{} = {rank}", registry.name(i as u32).unwrap_or("?"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Storage**: sorted in-neighbor adjacency lists, frozen before iteration
//! - **Flattening**: offset-indexed contiguous form for device transfer
//! - **Engine**: executor-agnostic normalization/convergence loop
//! - **Executors**: rayon parallel map/reduce, or one WGSL kernel launch
//!   per iteration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod ingest;
pub mod rank;
pub mod report;
pub mod storage;

// GPU executor (optional)
#[cfg(feature = "gpu")]
pub mod gpu;

// Re-export core types
pub use ingest::{read_edge_list, IngestError, IngestStats, NodeRegistry};
pub use rank::{
    rank_cpu, ConfigError, CpuExecutor, PowerIteration, RankConfig, RankExecutor, RankOutcome,
    RankSolution,
};
pub use storage::{AdjacencyTable, FlatAdjacency, NodeId};

#[cfg(feature = "gpu")]
pub use gpu::{rank_gpu, GpuDevice, GpuDeviceError, GpuExecutor, GpuRankBuffers};

// Error type
pub use anyhow::{Error, Result};
