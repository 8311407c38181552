//! In-neighbor adjacency table for directed graphs
//!
//! The table is indexed by **destination**: `rows[v]` holds the sorted,
//! duplicate-free set of sources with an arc into `v`. This is the layout
//! PageRank wants, since the per-node update iterates over incoming
//! neighbors.
//!
//! ```text
//! Arcs: 0 → 1, 0 → 2, 1 → 2
//!
//! rows:       [[], [0], [0, 1]]   // in-neighbors per destination
//! out_degree: [2, 1, 0]           // distinct outgoing arcs per source
//! ```

/// Node identifier (zero-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Sorted in-neighbor lists plus per-node out-degrees.
///
/// Arcs are only ever added; the table grows monotonically until the engine
/// freezes it. The only shrink operation is [`AdjacencyTable::reset`].
///
/// # Example
///
/// ```
/// use rapidrank::{AdjacencyTable, NodeId};
///
/// let mut table = AdjacencyTable::new();
/// assert!(table.add_arc(NodeId(0), NodeId(1)));
/// assert!(!table.add_arc(NodeId(0), NodeId(1))); // duplicate
///
/// assert_eq!(table.incoming(NodeId(1)), &[0]);
/// assert_eq!(table.out_degree(NodeId(0)), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AdjacencyTable {
    /// In-neighbors per destination node, each list ascending and unique.
    rows: Vec<Vec<u32>>,

    /// Number of *distinct* destinations each node points to.
    /// A node with out-degree zero is dangling.
    out_degree: Vec<u32>,
}

impl AdjacencyTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate room for `nodes` nodes
    pub fn reserve(&mut self, nodes: usize) {
        self.rows.reserve(nodes);
        self.out_degree.reserve(nodes);
    }

    /// Register a directed arc `from → to`.
    ///
    /// Grows the table so both endpoints are valid indices, then inserts
    /// `from` into `to`'s in-neighbor list at its sorted position. Returns
    /// `true` if the arc was newly inserted, `false` for a duplicate.
    /// Out-degree is incremented only on fresh insertion.
    pub fn add_arc(&mut self, from: NodeId, to: NodeId) -> bool {
        let max_dim = from.0.max(to.0) as usize;
        if self.rows.len() <= max_dim {
            self.rows.resize_with(max_dim + 1, Vec::new);
            self.out_degree.resize(max_dim + 1, 0);
        }

        let inserted = Self::insert_sorted(&mut self.rows[to.0 as usize], from.0);
        if inserted {
            self.out_degree[from.0 as usize] += 1;
        }
        inserted
    }

    /// Ordered-insert-if-absent: O(log k) search + O(k) shift.
    fn insert_sorted(row: &mut Vec<u32>, value: u32) -> bool {
        match row.binary_search(&value) {
            Ok(_) => false,
            Err(pos) => {
                row.insert(pos, value);
                true
            }
        }
    }

    /// Highest-indexed node + 1
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of distinct arcs
    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// In-neighbors of `node`, ascending. Empty slice for out-of-range nodes.
    #[must_use]
    pub fn incoming(&self, node: NodeId) -> &[u32] {
        self.rows
            .get(node.0 as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Number of distinct destinations `node` points to
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> u32 {
        self.out_degree.get(node.0 as usize).copied().unwrap_or(0)
    }

    /// Out-degrees for all nodes, indexed by node
    #[must_use]
    pub fn out_degrees(&self) -> &[u32] {
        &self.out_degree
    }

    /// Whether `node` has no outgoing arcs
    #[must_use]
    pub fn is_dangling(&self, node: NodeId) -> bool {
        self.out_degree(node) == 0
    }

    /// Iterate over `(destination, in-neighbors)` pairs
    pub fn iter_rows(&self) -> impl Iterator<Item = (u32, &[u32])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| (i as u32, row.as_slice()))
    }

    /// Drop all arcs and nodes, returning to the empty state.
    ///
    /// The only shrink operation; intended for reuse between independent runs.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.out_degree.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_table() {
        let table = AdjacencyTable::new();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.arc_count(), 0);
        let empty: &[u32] = &[];
        assert_eq!(table.incoming(NodeId(7)), empty);
        assert_eq!(table.out_degree(NodeId(7)), 0);
    }

    #[test]
    fn test_add_arc_grows_to_max_index() {
        let mut table = AdjacencyTable::new();
        assert!(table.add_arc(NodeId(2), NodeId(5)));

        assert_eq!(table.row_count(), 6);
        assert_eq!(table.incoming(NodeId(5)), &[2]);
        assert_eq!(table.out_degree(NodeId(2)), 1);
    }

    #[test]
    fn test_duplicate_arc_not_counted() {
        let mut table = AdjacencyTable::new();
        assert!(table.add_arc(NodeId(0), NodeId(1)));
        assert!(!table.add_arc(NodeId(0), NodeId(1)));

        assert_eq!(table.incoming(NodeId(1)), &[0]);
        assert_eq!(table.out_degree(NodeId(0)), 1);
        assert_eq!(table.arc_count(), 1);
    }

    #[test]
    fn test_in_neighbors_stay_sorted() {
        let mut table = AdjacencyTable::new();
        table.add_arc(NodeId(3), NodeId(0));
        table.add_arc(NodeId(1), NodeId(0));
        table.add_arc(NodeId(2), NodeId(0));
        table.add_arc(NodeId(1), NodeId(0)); // duplicate

        assert_eq!(table.incoming(NodeId(0)), &[1, 2, 3]);
        assert_eq!(table.arc_count(), 3);
    }

    #[test]
    fn test_self_loop_allowed() {
        let mut table = AdjacencyTable::new();
        assert!(table.add_arc(NodeId(0), NodeId(0)));

        assert_eq!(table.incoming(NodeId(0)), &[0]);
        assert_eq!(table.out_degree(NodeId(0)), 1);
        assert!(!table.is_dangling(NodeId(0)));
    }

    #[test]
    fn test_dangling_detection() {
        let mut table = AdjacencyTable::new();
        table.add_arc(NodeId(0), NodeId(1));

        assert!(!table.is_dangling(NodeId(0)));
        assert!(table.is_dangling(NodeId(1)));
    }

    #[test]
    fn test_reset_returns_to_empty() {
        let mut table = AdjacencyTable::new();
        table.add_arc(NodeId(0), NodeId(1));
        table.reset();

        assert_eq!(table.row_count(), 0);
        assert_eq!(table.arc_count(), 0);
    }

    #[test]
    fn test_iter_rows() {
        let mut table = AdjacencyTable::new();
        table.add_arc(NodeId(0), NodeId(1));
        table.add_arc(NodeId(2), NodeId(1));

        let rows: Vec<(u32, Vec<u32>)> = table
            .iter_rows()
            .map(|(i, row)| (i, row.to_vec()))
            .collect();
        assert_eq!(rows, vec![(0, vec![]), (1, vec![0, 2]), (2, vec![])]);
    }
}
