//! Power-iteration engine
//!
//! Based on Page et al. (1999) "The `PageRank` Citation Ranking: Bringing
//! Order to the Web". Each iteration normalizes the previous rank vector,
//! redistributes dangling mass uniformly, delegates the per-node update to a
//! [`RankExecutor`], and measures the L1 distance between consecutive
//! iterates.
//!
//! The engine is executor-agnostic: the per-iteration protocol is identical
//! for the CPU fork-join backend and the GPU compute backend, and both
//! converge to the same vector within floating-point tolerance.

use crate::rank::config::{ConfigError, RankConfig};
use crate::storage::AdjacencyTable;
use anyhow::Result;

/// Per-iteration computation backend.
///
/// The rank update (the expensive step) is always delegated; the two
/// reductions default to serial host-side passes, which the CPU backend
/// overrides with parallel reductions and the GPU backend inherits as-is.
#[allow(async_fn_in_trait)] // backends are selected statically, not boxed
pub trait RankExecutor {
    /// Compute `pr[i] = alpha * Σ(old_pr[j] / out_degree[j]) + base` for
    /// every node `i`, summing over `i`'s incoming neighbors `j`.
    ///
    /// `old_pr` is the frozen, normalized previous vector (mass exactly 1);
    /// `pr` is the distinct output buffer. Implementations must not read
    /// `pr` and must write every slot.
    ///
    /// # Errors
    ///
    /// Backend-specific failures (device loss, readback failure). The CPU
    /// backend is infallible.
    async fn update_ranks(
        &mut self,
        alpha: f64,
        base: f64,
        old_pr: &[f64],
        pr: &mut [f64],
    ) -> Result<()>;

    /// Combined reduction: `(Σ pr[i], Σ pr[i] where out_degree[i] == 0)`
    fn mass_reduction(&self, pr: &[f64], out_degree: &[u32]) -> (f64, f64) {
        let mut sum = 0.0;
        let mut dangling = 0.0;
        for (p, d) in pr.iter().zip(out_degree) {
            sum += p;
            if *d == 0 {
                dangling += p;
            }
        }
        (sum, dangling)
    }

    /// L1 distance between consecutive iterates
    fn l1_diff(&self, pr: &[f64], old_pr: &[f64]) -> f64 {
        pr.iter()
            .zip(old_pr)
            .map(|(a, b)| (a - b).abs())
            .sum()
    }
}

/// How a run terminated. Both variants are normal termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOutcome {
    /// L1 difference dropped to the convergence threshold or below
    Converged,

    /// Iteration cap reached first; the current vector is still usable
    IterationLimitReached,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RankSolution {
    /// One probability-mass estimate per node, indexed by node
    pub ranks: Vec<f64>,

    /// Iterations performed
    pub iterations: u32,

    /// Why the loop stopped
    pub outcome: RankOutcome,
}

impl RankSolution {
    /// Rank of a specific node
    #[must_use]
    pub fn rank(&self, node: usize) -> Option<f64> {
        self.ranks.get(node).copied()
    }
}

/// Power-iteration driver over a frozen adjacency table.
///
/// # Example
///
/// ```
/// use rapidrank::{AdjacencyTable, NodeId, PowerIteration, RankConfig, CpuExecutor};
///
/// # async fn example() -> rapidrank::Result<()> {
/// let mut table = AdjacencyTable::new();
/// table.add_arc(NodeId(0), NodeId(1));
/// table.add_arc(NodeId(1), NodeId(2));
/// table.add_arc(NodeId(2), NodeId(0));
///
/// let config = RankConfig::default();
/// let engine = PowerIteration::new(&table, config.clone(), CpuExecutor::new(&table))?;
/// let solution = engine.run().await?;
///
/// assert!((solution.ranks.iter().sum::<f64>() - 1.0).abs() < 1e-9);
/// # Ok(())
/// # }
/// ```
pub struct PowerIteration<'g, E> {
    table: &'g AdjacencyTable,
    config: RankConfig,
    executor: E,

    /// Current rank vector. Seeded with all mass on node 0, an arbitrary
    /// but valid start, since the recurrence is contractive.
    pr: Vec<f64>,
}

impl<'g, E: RankExecutor> PowerIteration<'g, E> {
    /// Build an engine over a frozen table.
    ///
    /// The table must not be mutated for the lifetime of the engine.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid.
    pub fn new(
        table: &'g AdjacencyTable,
        config: RankConfig,
        executor: E,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let num_rows = table.row_count();
        let mut pr = vec![0.0; num_rows];
        if num_rows > 0 {
            pr[0] = 1.0;
        }

        Ok(Self {
            table,
            config,
            executor,
            pr,
        })
    }

    /// Seed the rank vector, replacing the default single-node mass.
    ///
    /// This is the checkpoint/restart boundary: a caller that stopped a run
    /// between iterations can resume from the vector it read back. The seed
    /// is truncated or zero-padded to the table's row count, then normalized
    /// to mass 1, which the first iteration's verbatim copy relies on. A
    /// zero-mass seed falls back to the default single-node start.
    #[must_use]
    pub fn with_initial_ranks(mut self, mut ranks: Vec<f64>) -> Self {
        ranks.resize(self.table.row_count(), 0.0);

        let sum: f64 = ranks.iter().sum();
        if sum > 0.0 {
            for rank in &mut ranks {
                *rank /= sum;
            }
            self.pr = ranks;
        }
        self
    }

    /// Drive the iteration loop to convergence or the iteration cap.
    ///
    /// # Errors
    ///
    /// Propagates executor failures; configuration and degenerate-input
    /// cases never error here.
    #[allow(clippy::cast_precision_loss)] // Graphs >2^52 nodes not supported
    pub async fn run(mut self) -> Result<RankSolution> {
        let num_rows = self.table.row_count();

        // Degenerate success: no nodes, empty vector.
        if num_rows == 0 {
            return Ok(RankSolution {
                ranks: Vec::new(),
                iterations: 0,
                outcome: RankOutcome::Converged,
            });
        }

        let alpha = self.config.alpha;
        let out_degree = self.table.out_degrees();

        let alpha_factor = alpha / num_rows as f64;
        let oneminusalpha_factor = (1.0 - alpha) / num_rows as f64;

        let mut old_pr = vec![0.0; num_rows];
        let mut diff = f64::INFINITY;
        let mut iterations: u32 = 0;

        while diff > self.config.convergence && iterations < self.config.max_iterations {
            // Recomputed every iteration even though the mass is 1 after the
            // first normalization; keeps the loop robust against drift.
            let (sum_pr, dangling_pr) = self.executor.mass_reduction(&self.pr, out_degree);

            if iterations == 0 {
                // Already mass-1 by construction of the initial state.
                old_pr.copy_from_slice(&self.pr);
            } else {
                // Normalize so the previous vector enters the update with
                // mass exactly one.
                for (old, p) in old_pr.iter_mut().zip(&self.pr) {
                    *old = p / sum_pr;
                }
            }

            // Dangling mass redistributed uniformly, plus the uniform
            // restart term; identical additive constant for every node.
            let one_av = alpha_factor * dangling_pr;
            let one_iv = oneminusalpha_factor;
            let base = one_av + one_iv;

            self.executor
                .update_ranks(alpha, base, &old_pr, &mut self.pr)
                .await?;

            diff = self.executor.l1_diff(&self.pr, &old_pr);
            iterations += 1;

            if self.config.trace {
                tracing::debug!(
                    iteration = iterations,
                    diff,
                    sum_pr,
                    dangling_pr,
                    "rank update"
                );
            }
        }

        let outcome = if diff <= self.config.convergence {
            RankOutcome::Converged
        } else {
            RankOutcome::IterationLimitReached
        };

        Ok(RankSolution {
            ranks: self.pr,
            iterations,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::cpu::CpuExecutor;
    use crate::storage::NodeId;

    fn cycle3() -> AdjacencyTable {
        let mut table = AdjacencyTable::new();
        table.add_arc(NodeId(0), NodeId(1));
        table.add_arc(NodeId(1), NodeId(2));
        table.add_arc(NodeId(2), NodeId(0));
        table
    }

    #[tokio::test]
    async fn test_empty_graph_is_degenerate_success() {
        let table = AdjacencyTable::new();
        let engine =
            PowerIteration::new(&table, RankConfig::default(), CpuExecutor::new(&table)).unwrap();
        let solution = engine.run().await.unwrap();

        assert!(solution.ranks.is_empty());
        assert_eq!(solution.iterations, 0);
        assert_eq!(solution.outcome, RankOutcome::Converged);
    }

    #[tokio::test]
    async fn test_cycle_converges_to_uniform() {
        let table = cycle3();
        let config = RankConfig {
            convergence: 1e-10,
            max_iterations: 1000,
            ..RankConfig::default()
        };
        let engine = PowerIteration::new(&table, config, CpuExecutor::new(&table)).unwrap();
        let solution = engine.run().await.unwrap();

        assert_eq!(solution.outcome, RankOutcome::Converged);
        for rank in &solution.ranks {
            assert!((rank - 1.0 / 3.0).abs() < 1e-8, "rank = {rank}");
        }
    }

    #[tokio::test]
    async fn test_mass_conservation() {
        let mut table = AdjacencyTable::new();
        table.add_arc(NodeId(0), NodeId(1));
        table.add_arc(NodeId(0), NodeId(2));
        table.add_arc(NodeId(2), NodeId(1));
        table.add_arc(NodeId(3), NodeId(0)); // node 1 stays dangling

        let engine =
            PowerIteration::new(&table, RankConfig::default(), CpuExecutor::new(&table)).unwrap();
        let solution = engine.run().await.unwrap();

        let sum: f64 = solution.ranks.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum = {sum}");
    }

    #[tokio::test]
    async fn test_iteration_limit_is_normal_termination() {
        let table = cycle3();
        let config = RankConfig {
            convergence: 1e-15,
            max_iterations: 2,
            ..RankConfig::default()
        };
        let engine = PowerIteration::new(&table, config, CpuExecutor::new(&table)).unwrap();
        let solution = engine.run().await.unwrap();

        assert_eq!(solution.iterations, 2);
        assert_eq!(solution.outcome, RankOutcome::IterationLimitReached);
        assert_eq!(solution.ranks.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_config_fails_at_construction() {
        let table = cycle3();
        let config = RankConfig {
            alpha: 1.5,
            ..RankConfig::default()
        };
        let result = PowerIteration::new(&table, config, CpuExecutor::new(&table));
        assert!(matches!(result, Err(ConfigError::InvalidAlpha(_))));
    }

    #[tokio::test]
    async fn test_converged_vector_is_a_fixed_point() {
        let table = cycle3();
        let config = RankConfig {
            convergence: 1e-10,
            max_iterations: 1000,
            ..RankConfig::default()
        };
        let first = PowerIteration::new(&table, config.clone(), CpuExecutor::new(&table))
            .unwrap()
            .run()
            .await
            .unwrap();
        assert_eq!(first.outcome, RankOutcome::Converged);

        // One more iteration from the converged vector must move it by less
        // than the threshold.
        let resumed = PowerIteration::new(&table, config, CpuExecutor::new(&table))
            .unwrap()
            .with_initial_ranks(first.ranks.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(resumed.iterations, 1);
        assert_eq!(resumed.outcome, RankOutcome::Converged);
    }

    #[tokio::test]
    async fn test_unnormalized_seed_conserves_mass() {
        let table = cycle3();
        let config = RankConfig {
            max_iterations: 1,
            ..RankConfig::default()
        };
        let engine = PowerIteration::new(&table, config, CpuExecutor::new(&table))
            .unwrap()
            .with_initial_ranks(vec![2.0, 0.0, 0.0]);
        let solution = engine.run().await.unwrap();

        // The seed enters the first iteration with mass 1 regardless of the
        // mass it was supplied with.
        let sum: f64 = solution.ranks.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "sum = {sum}");
    }

    #[tokio::test]
    async fn test_zero_mass_seed_falls_back_to_default_start() {
        let table = cycle3();
        let config = RankConfig {
            convergence: 1e-10,
            max_iterations: 1000,
            ..RankConfig::default()
        };
        let engine = PowerIteration::new(&table, config, CpuExecutor::new(&table))
            .unwrap()
            .with_initial_ranks(vec![0.0, 0.0, 0.0]);
        let solution = engine.run().await.unwrap();

        assert_eq!(solution.outcome, RankOutcome::Converged);
        let sum: f64 = solution.ranks.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_rank_accessor() {
        let solution = RankSolution {
            ranks: vec![0.2, 0.8],
            iterations: 5,
            outcome: RankOutcome::Converged,
        };
        assert_eq!(solution.rank(1), Some(0.8));
        assert_eq!(solution.rank(2), None);
    }
}
