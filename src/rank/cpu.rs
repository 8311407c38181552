//! CPU fork-join executor
//!
//! rayon parallel-for over the node index space for the rank update, and
//! parallel reductions for the mass and difference passes. Each node's
//! update reads only the frozen previous vector and adjacency and writes
//! only its own slot, so no locking is involved.
//!
//! Reduction trees combine partial sums in whatever order the scheduler
//! produces; results across thread counts agree only within floating-point
//! tolerance, not bit-for-bit.

use crate::rank::engine::RankExecutor;
use crate::storage::{AdjacencyTable, NodeId};
use anyhow::Result;
use rayon::prelude::*;

/// Fork-join backend borrowing the frozen adjacency table
pub struct CpuExecutor<'g> {
    table: &'g AdjacencyTable,
}

impl<'g> CpuExecutor<'g> {
    /// Borrow the table for the duration of the run
    #[must_use]
    pub fn new(table: &'g AdjacencyTable) -> Self {
        Self { table }
    }
}

impl RankExecutor for CpuExecutor<'_> {
    #[allow(clippy::cast_possible_truncation)] // node space is u32 by construction
    async fn update_ranks(
        &mut self,
        alpha: f64,
        base: f64,
        old_pr: &[f64],
        pr: &mut [f64],
    ) -> Result<()> {
        pr.par_iter_mut().enumerate().for_each(|(i, slot)| {
            let mut h = 0.0;
            for &j in self.table.incoming(NodeId(i as u32)) {
                // out_degree[j] > 0 for any j appearing in an in-neighbor
                // list: a source only gets listed for arcs it emitted.
                h += old_pr[j as usize] / f64::from(self.table.out_degree(NodeId(j)));
            }
            *slot = alpha * h + base;
        });
        Ok(())
    }

    fn mass_reduction(&self, pr: &[f64], out_degree: &[u32]) -> (f64, f64) {
        pr.par_iter()
            .zip(out_degree.par_iter())
            .map(|(&p, &d)| if d == 0 { (p, p) } else { (p, 0.0) })
            .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1))
    }

    fn l1_diff(&self, pr: &[f64], old_pr: &[f64]) -> f64 {
        pr.par_iter()
            .zip(old_pr.par_iter())
            .map(|(a, b)| (a - b).abs())
            .sum()
    }
}
