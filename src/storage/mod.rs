//! Graph storage layer
//!
//! Sorted in-neighbor adjacency lists plus the flattened, offset-indexed
//! form used for device transfer.

pub mod adjacency;
pub mod flat;

pub use adjacency::{AdjacencyTable, NodeId};
pub use flat::FlatAdjacency;
