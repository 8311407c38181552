//! Flattened adjacency for bulk device transfer
//!
//! Concatenates the per-destination in-neighbor lists into one contiguous
//! buffer plus per-destination offset/count arrays, the same three-array
//! shape the GPU kernel indexes.
//!
//! ```text
//! rows:      [[], [0], [0, 1]]
//!
//! neighbors: [0, 0, 1]
//! offsets:   [0, 0, 1]
//! counts:    [0, 1, 2]
//! ```

use super::{AdjacencyTable, NodeId};

/// Offset-indexed contiguous form of an [`AdjacencyTable`].
///
/// Built exactly once per run, after the table is frozen; read-only
/// thereafter. Invariant: `offsets[i] + counts[i] == offsets[i + 1]` for all
/// consecutive destinations, and the slice `neighbors[offsets[i]..][..counts[i]]`
/// equals the table's in-neighbor list for `i`.
#[derive(Debug, Clone)]
pub struct FlatAdjacency {
    /// All in-neighbor indices, concatenated in destination order
    neighbors: Vec<u32>,

    /// Start of each destination's slice in `neighbors`
    offsets: Vec<u32>,

    /// Length of each destination's slice
    counts: Vec<u32>,
}

impl FlatAdjacency {
    /// Flatten a frozen adjacency table.
    ///
    /// One counting pass sizes the neighbor buffer exactly, then a fill pass
    /// records each destination's offset and count. Deterministic: the
    /// stored adjacency order is ascending by construction, so re-running on
    /// an unchanged table yields bit-identical buffers.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Graphs >4B arcs not supported
    pub fn from_table(table: &AdjacencyTable) -> Self {
        let num_rows = table.row_count();

        let total: usize = table.iter_rows().map(|(_, row)| row.len()).sum();

        let mut neighbors = Vec::with_capacity(total);
        let mut offsets = Vec::with_capacity(num_rows);
        let mut counts = Vec::with_capacity(num_rows);

        for (_, row) in table.iter_rows() {
            offsets.push(neighbors.len() as u32);
            counts.push(row.len() as u32);
            neighbors.extend_from_slice(row);
        }

        Self {
            neighbors,
            offsets,
            counts,
        }
    }

    /// Number of destinations
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.offsets.len()
    }

    /// Total neighbor entries across all destinations
    #[must_use]
    pub fn num_entries(&self) -> usize {
        self.neighbors.len()
    }

    /// In-neighbors of `node`, ascending. Empty for out-of-range nodes,
    /// matching [`AdjacencyTable::incoming`].
    #[must_use]
    pub fn incoming(&self, node: NodeId) -> &[u32] {
        let i = node.0 as usize;
        match (self.offsets.get(i), self.counts.get(i)) {
            (Some(&start), Some(&len)) => &self.neighbors[start as usize..][..len as usize],
            _ => &[],
        }
    }

    /// The three parallel buffers `(neighbors, offsets, counts)`
    #[must_use]
    pub fn components(&self) -> (&[u32], &[u32], &[u32]) {
        (&self.neighbors, &self.offsets, &self.counts)
    }
}
