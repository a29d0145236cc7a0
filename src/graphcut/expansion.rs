//! Alpha-expansion driver for multi-label optimization.
//!
//! Each cycle visits every label once. Visiting label alpha builds a
//! binary sub-problem over {keep current label, switch to alpha}, solves
//! it with one min-cut, and relabels every voxel that landed on the sink
//! side. Cycles repeat until a full cycle fails to strictly decrease the
//! total energy, or the cycle cap is hit:
//!
//! ```text
//! loop {
//!     for alpha in label_order { expand(alpha) }
//!     energy = recompute from scratch
//!     stop when energy did not strictly decrease
//! }
//! ```

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::core::VolumeDims;
use crate::cost::{DataCost, SmoothCost};

use super::builder::GridGraphBuilder;
use super::capacity::GridDir;
use super::mincut::{MinCutSolver, SolverConfig};

/// Order in which each cycle visits the labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelOrder {
    /// Ascending label id.
    Sequential,
    /// Reshuffled every cycle from a fixed seed.
    Random { seed: u64 },
}

/// Driver parameters.
#[derive(Clone, Debug)]
pub struct ExpansionConfig {
    /// Upper bound on cycles before giving up on convergence.
    pub max_cycles: u32,
    /// Label visiting order.
    pub order: LabelOrder,
    /// Parameters handed to the min-cut solver.
    pub solver: SolverConfig,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_cycles: 10,
            order: LabelOrder::Sequential,
            solver: SolverConfig::default(),
        }
    }
}

/// Driver state, observable between cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpansionStatus {
    Idle,
    RunningCycle,
    Converged,
    CycleCapReached,
}

/// Why [`AlphaExpansion::run`] stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    /// A full cycle failed to strictly decrease the energy.
    Converged,
    /// The cycle cap was reached first.
    CycleCapReached,
}

/// Outcome of one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleStats {
    /// Voxels that switched label during the cycle.
    pub relabeled: usize,
    /// Total energy of the labeling after the cycle.
    pub energy: i64,
}

/// Outcome of a full [`AlphaExpansion::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpansionResult {
    pub cycles: u32,
    pub initial_energy: i64,
    pub final_energy: i64,
    pub converged: bool,
    pub termination: TerminationReason,
}

/// Multi-label optimizer over a voxel grid.
///
/// Generic over the min-cut solver; the solver is constructed once and
/// reloaded with fresh capacities for every expansion.
pub struct AlphaExpansion<'a, S: MinCutSolver> {
    config: ExpansionConfig,
    dims: VolumeDims,
    n_labels: u8,
    data: &'a DataCost,
    smooth: &'a SmoothCost,
    labeling: Vec<u8>,
    status: ExpansionStatus,
    solver: S,
    rng: Option<StdRng>,
}

impl<'a, S: MinCutSolver> AlphaExpansion<'a, S> {
    /// Create a driver with an all-zero initial labeling.
    pub fn new(
        dims: VolumeDims,
        n_labels: u8,
        data: &'a DataCost,
        smooth: &'a SmoothCost,
        config: ExpansionConfig,
    ) -> Self {
        let solver = S::new(dims, &config.solver);
        let rng = match config.order {
            LabelOrder::Random { seed } => Some(StdRng::seed_from_u64(seed)),
            LabelOrder::Sequential => None,
        };
        Self {
            config,
            dims,
            n_labels,
            data,
            smooth,
            labeling: vec![0; dims.n_voxels()],
            status: ExpansionStatus::Idle,
            solver,
            rng,
        }
    }

    /// Replace the initial labeling. Every entry must be below the label
    /// count.
    pub fn with_labeling(mut self, labeling: Vec<u8>) -> Self {
        debug_assert_eq!(labeling.len(), self.dims.n_voxels());
        debug_assert!(labeling.iter().all(|&l| l < self.n_labels));
        self.labeling = labeling;
        self
    }

    /// Current labeling.
    pub fn labeling(&self) -> &[u8] {
        &self.labeling
    }

    /// Consume the driver and hand back the labeling.
    pub fn into_labeling(self) -> Vec<u8> {
        self.labeling
    }

    pub fn status(&self) -> ExpansionStatus {
        self.status
    }

    /// Total energy of the current labeling, recomputed from scratch:
    /// data cost per voxel plus smoothness over each forward edge.
    pub fn total_energy(&self) -> i64 {
        let mut energy = 0i64;
        for z in 0..self.dims.depth {
            for y in 0..self.dims.height {
                for x in 0..self.dims.width {
                    let p = self.dims.index(x, y, z);
                    energy += self.data.cost(p, self.labeling[p]);
                    for dir in GridDir::FORWARD {
                        let (dx, dy, dz) = dir.offset();
                        let q = self.dims.coord_to_index(
                            x as i32 + dx,
                            y as i32 + dy,
                            z as i32 + dz,
                        );
                        if let Some(q) = q {
                            energy +=
                                self.smooth.cost(p, q, self.labeling[p], self.labeling[q]);
                        }
                    }
                }
            }
        }
        energy
    }

    /// Run one full cycle over all labels.
    pub fn perform_cycle(&mut self) -> CycleStats {
        self.status = ExpansionStatus::RunningCycle;
        let mut relabeled = 0usize;
        for alpha in self.label_order() {
            relabeled += self.expand_label(alpha);
        }
        CycleStats {
            relabeled,
            energy: self.total_energy(),
        }
    }

    /// Cycle until convergence or the cycle cap.
    pub fn run(&mut self) -> ExpansionResult {
        let initial_energy = self.total_energy();
        let mut energy = initial_energy;
        let mut cycles = 0u32;
        debug!(
            "[Expansion] start: {} labels over {}, energy {}",
            self.n_labels, self.dims, initial_energy
        );

        let termination = loop {
            if cycles >= self.config.max_cycles {
                break TerminationReason::CycleCapReached;
            }
            let stats = self.perform_cycle();
            cycles += 1;
            debug!(
                "[Expansion] cycle {}: {} relabeled, energy {} -> {}",
                cycles, stats.relabeled, energy, stats.energy
            );
            let previous = energy;
            energy = stats.energy;
            if energy >= previous {
                break TerminationReason::Converged;
            }
        };

        self.status = match termination {
            TerminationReason::Converged => ExpansionStatus::Converged,
            TerminationReason::CycleCapReached => ExpansionStatus::CycleCapReached,
        };
        debug!(
            "[Expansion] done after {} cycles: energy {} ({:?})",
            cycles, energy, termination
        );
        ExpansionResult {
            cycles,
            initial_energy,
            final_energy: energy,
            converged: termination == TerminationReason::Converged,
            termination,
        }
    }

    fn label_order(&mut self) -> Vec<u8> {
        let mut labels: Vec<u8> = (0..self.n_labels).collect();
        if let Some(rng) = self.rng.as_mut() {
            labels.shuffle(rng);
        }
        labels
    }

    /// Expand one label: solve the binary sub-problem and relabel every
    /// voxel the cut placed on the sink side.
    fn expand_label(&mut self, alpha: u8) -> usize {
        let caps =
            GridGraphBuilder::new(self.dims, alpha, &self.labeling, self.data, self.smooth)
                .build();
        self.solver.set_caps(caps);
        self.solver.compute_maxflow();

        let mut relabeled = 0usize;
        for p in 0..self.dims.n_voxels() {
            if self.labeling[p] != alpha && self.solver.is_sink_side(p) {
                self.labeling[p] = alpha;
                relabeled += 1;
            }
        }
        trace!("[Expansion] alpha {}: {} relabeled", alpha, relabeled);
        relabeled
    }
}

// ============================================================================
// Tests
// ============================================================================
