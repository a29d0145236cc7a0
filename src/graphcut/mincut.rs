//! Max-flow/min-cut capability.
//!
//! The expansion driver only talks to [`MinCutSolver`], so any max-flow
//! engine satisfying the contract can be dropped in — push-relabel,
//! augmenting-path, or block-parallel. The bundled [`DinicSolver`] is a
//! single-threaded level-graph implementation operating directly on the
//! capacity lanes as residuals; it exists so the engine runs standalone.
//!
//! Contract semantics: after `compute_maxflow()`, a node is sink-side when
//! it is unreachable from the source in the residual graph. The cut pays
//! `cap_source` for sink-side nodes, `cap_sink` for source-side nodes, and
//! every neighbor capacity leading from a source-side node to a sink-side
//! one.

use log::trace;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::core::VolumeDims;

use super::capacity::{CapacityGrid, GridDir};

/// Solver construction parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Worker threads for parallel implementations.
    pub workers: usize,
    /// Block edge length for block-parallel implementations.
    pub block_size: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            workers: 1,    // single-threaded orchestration
            block_size: 8, // grid block edge, parallel solvers only
        }
    }
}

/// Max-flow solver over one capacity grid.
pub trait MinCutSolver {
    /// Construct a solver for a volume.
    fn new(dims: VolumeDims, config: &SolverConfig) -> Self
    where
        Self: Sized;

    /// Load the capacities for one sub-problem, resetting solver state.
    fn set_caps(&mut self, caps: CapacityGrid);

    /// Run max-flow to completion and return the total flow.
    fn compute_maxflow(&mut self) -> i64;

    /// Whether a node landed on the sink side of the minimum cut.
    /// Valid after [`MinCutSolver::compute_maxflow`].
    fn is_sink_side(&self, node: usize) -> bool;
}

/// Bundled single-threaded Dinic solver.
///
/// Level BFS from the implicit source, then blocking-flow DFS with
/// current-arc pointers. The first arc of every node is its sink link,
/// followed by the six neighbor lanes. Worker/block parameters are
/// accepted for construction parity with block-parallel solvers and
/// recorded but unused here.
pub struct DinicSolver {
    dims: VolumeDims,
    caps: CapacityGrid,
    /// BFS level per node; −1 = unreachable. After the final (failed)
    /// BFS this doubles as residual reachability for the cut.
    level: Vec<i32>,
    /// Current-arc pointer per node: 0 = sink link, 1..=6 = neighbor
    /// lanes, 7 = exhausted.
    arc: Vec<u8>,
    source_cursor: usize,
    queue: VecDeque<usize>,
    path: Vec<usize>,
    path_dirs: Vec<GridDir>,
    flow: i64,
}

impl MinCutSolver for DinicSolver {
    fn new(dims: VolumeDims, config: &SolverConfig) -> Self {
        trace!(
            "[MinCut] dinic solver for {} (workers {}, block {})",
            dims, config.workers, config.block_size
        );
        let n = dims.n_voxels();
        Self {
            dims,
            caps: CapacityGrid::new(dims),
            level: vec![-1; n],
            arc: vec![0; n],
            source_cursor: 0,
            queue: VecDeque::new(),
            path: Vec::new(),
            path_dirs: Vec::new(),
            flow: 0,
        }
    }

    fn set_caps(&mut self, caps: CapacityGrid) {
        debug_assert_eq!(caps.dims(), self.dims);
        self.caps = caps;
        self.level.fill(-1);
        self.arc.fill(0);
        self.source_cursor = 0;
        self.flow = 0;
    }

    fn compute_maxflow(&mut self) -> i64 {
        self.flow = 0;
        while self.bfs_levels() {
            self.arc.fill(0);
            self.source_cursor = 0;
            loop {
                let pushed = self.augment_one();
                if pushed == 0 {
                    break;
                }
                self.flow += pushed;
            }
        }
        trace!("[MinCut] flow {} over {} nodes", self.flow, self.dims.n_voxels());
        self.flow
    }

    #[inline]
    fn is_sink_side(&self, node: usize) -> bool {
        self.level[node] < 0
    }
}

impl DinicSolver {
    /// Total flow of the last [`MinCutSolver::compute_maxflow`] run.
    pub fn flow(&self) -> i64 {
        self.flow
    }

    /// Rebuild BFS levels from the source. Returns whether the sink is
    /// still reachable; when it is not, `level` holds the residual
    /// reachability that defines the cut.
    fn bfs_levels(&mut self) -> bool {
        self.level.fill(-1);
        self.queue.clear();
        for p in 0..self.dims.n_voxels() {
            if self.caps.cap_source[p] > 0 {
                self.level[p] = 1;
                self.queue.push_back(p);
            }
        }

        let mut sink_reached = false;
        while let Some(p) = self.queue.pop_front() {
            if self.caps.cap_sink[p] > 0 {
                sink_reached = true;
            }
            let next_level = self.level[p] + 1;
            for dir in GridDir::ALL {
                if self.caps.nbr(dir)[p] > 0 {
                    if let Some(q) = self.caps.neighbor_of(p, dir) {
                        if self.level[q] < 0 {
                            self.level[q] = next_level;
                            self.queue.push_back(q);
                        }
                    }
                }
            }
        }
        sink_reached
    }

    /// Walk one augmenting path in the level graph and push flow along
    /// it. Returns 0 when the phase is exhausted. Arc pointers persist
    /// across calls within a phase.
    fn augment_one(&mut self) -> i64 {
        let n = self.dims.n_voxels();
        'restart: loop {
            while self.source_cursor < n {
                let s = self.source_cursor;
                if self.caps.cap_source[s] > 0 && self.level[s] == 1 {
                    break;
                }
                self.source_cursor += 1;
            }
            if self.source_cursor >= n {
                return 0;
            }

            self.path.clear();
            self.path_dirs.clear();
            let mut current = self.source_cursor;
            self.path.push(current);

            loop {
                let mut advanced = false;
                while self.arc[current] <= 6 {
                    let a = self.arc[current];
                    if a == 0 {
                        if self.caps.cap_sink[current] > 0 {
                            return self.push_path(current);
                        }
                        self.arc[current] = 1;
                        continue;
                    }
                    let dir = GridDir::ALL[(a - 1) as usize];
                    if self.caps.nbr(dir)[current] > 0 {
                        if let Some(q) = self.caps.neighbor_of(current, dir) {
                            if self.level[q] == self.level[current] + 1 {
                                self.path_dirs.push(dir);
                                self.path.push(q);
                                current = q;
                                advanced = true;
                                break;
                            }
                        }
                    }
                    self.arc[current] += 1;
                }

                if advanced {
                    continue;
                }

                // Dead end: retire the node for this phase and retreat.
                self.level[current] = -1;
                self.path.pop();
                self.path_dirs.pop();
                match self.path.last() {
                    Some(&parent) => current = parent,
                    None => continue 'restart,
                }
            }
        }
    }

    /// Apply the bottleneck along the current path. Neighbor pushes gain
    /// reverse residual on the opposite lane; terminal links need no
    /// reverse since no augmenting path re-enters the source or leaves
    /// the sink.
    fn push_path(&mut self, last: usize) -> i64 {
        let path = &self.path;
        let dirs = &self.path_dirs;
        let caps = &mut self.caps;

        let start = path[0];
        let mut bottleneck = caps.cap_source[start].min(caps.cap_sink[last]);
        for (i, dir) in dirs.iter().enumerate() {
            bottleneck = bottleneck.min(caps.nbr(*dir)[path[i]]);
        }
        debug_assert!(bottleneck > 0);

        caps.cap_source[start] -= bottleneck;
        caps.cap_sink[last] -= bottleneck;
        for (i, dir) in dirs.iter().enumerate() {
            caps.nbr_mut(*dir)[path[i]] -= bottleneck;
            caps.nbr_mut(dir.opposite())[path[i + 1]] += bottleneck;
        }
        bottleneck
    }
}

// ============================================================================
// Tests
// ============================================================================
