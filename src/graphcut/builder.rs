//! Capacity-grid construction for one expansion sub-problem.
//!
//! For a fixed candidate label alpha, every voxel is a binary variable:
//! keep the current label (source side) or switch to alpha (sink side).
//! Data costs load the terminal lanes; pairwise costs are decomposed into
//! terminal and neighbor capacities per quad. Non-submodular quads are
//! repaired first so the decomposition stays valid.
//!
//! ```text
//! quad for edge (p, q), p before q in scan order:
//!   A = cost(alpha, alpha)          both switch
//!   B = cost(alpha, label(q))       p switches, q keeps
//!   C = cost(label(p), alpha)       p keeps, q switches
//!   D = cost(label(p), label(q))    both keep
//! ```

use log::trace;

use crate::core::VolumeDims;
use crate::cost::{DataCost, SmoothCost};

use super::capacity::{CapacityGrid, GridDir};

/// One pairwise cost quad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CostQuad {
    /// Both voxels take alpha.
    pub a: i64,
    /// First switches, second keeps.
    pub b: i64,
    /// First keeps, second switches.
    pub c: i64,
    /// Both keep their labels.
    pub d: i64,
}

impl CostQuad {
    /// Submodularity condition for min-cut representability.
    #[inline]
    pub fn is_submodular(&self) -> bool {
        self.a + self.d <= self.c + self.b
    }

    /// Deterministic repair of a non-submodular quad. The excess is split
    /// with truncating division: a third is moved from A to C and the
    /// remainder (including the truncation leftovers) lands on B. Returns
    /// whether the repair fired. Afterwards `a + d == c + b` holds exactly.
    pub fn repair(&mut self) -> bool {
        if self.is_submodular() {
            return false;
        }
        let delta = self.a + self.d - self.c - self.b;
        let subtract_a = delta / 3;
        self.a -= subtract_a;
        self.c += subtract_a;
        self.b += delta - 2 * subtract_a;
        true
    }
}

/// Builds the capacity grid for one candidate label.
pub struct GridGraphBuilder<'a> {
    dims: VolumeDims,
    alpha: u8,
    labeling: &'a [u8],
    data: &'a DataCost,
    smooth: &'a SmoothCost,
}

impl<'a> GridGraphBuilder<'a> {
    /// Create a builder over the current labeling and cost capabilities.
    pub fn new(
        dims: VolumeDims,
        alpha: u8,
        labeling: &'a [u8],
        data: &'a DataCost,
        smooth: &'a SmoothCost,
    ) -> Self {
        debug_assert_eq!(labeling.len(), dims.n_voxels());
        Self {
            dims,
            alpha,
            labeling,
            data,
            smooth,
        }
    }

    /// Assemble the capacity grid. The result exactly encodes the binary
    /// sub-energy restricted to {current label, alpha} per voxel, up to a
    /// constant offset, with every capacity non-negative.
    pub fn build(&self) -> CapacityGrid {
        let mut caps = CapacityGrid::new(self.dims);
        let mut repaired = 0usize;

        for z in 0..self.dims.depth {
            for y in 0..self.dims.height {
                for x in 0..self.dims.width {
                    let p = self.dims.index(x, y, z);
                    let lp = self.labeling[p];

                    if lp != self.alpha {
                        // Terminal pair from the data term: switch cost on
                        // the source lane, keep cost on the sink lane.
                        caps.add_terminal(
                            p,
                            self.data.cost(p, self.alpha),
                            self.data.cost(p, lp),
                        );
                    }

                    for dir in GridDir::FORWARD {
                        let (dx, dy, dz) = dir.offset();
                        let Some(q) = self.dims.coord_to_index(
                            x as i32 + dx,
                            y as i32 + dy,
                            z as i32 + dz,
                        ) else {
                            continue;
                        };
                        let lq = self.labeling[q];

                        match (lp == self.alpha, lq == self.alpha) {
                            // Both fixed at alpha: a constant, no edges.
                            (true, true) => {}
                            // q is fixed at alpha: fold into terminals on p.
                            (false, true) => {
                                caps.add_terminal(
                                    p,
                                    self.smooth.cost(p, q, self.alpha, self.alpha),
                                    self.smooth.cost(p, q, lp, self.alpha),
                                );
                            }
                            // p is fixed at alpha: fold into terminals on q.
                            (true, false) => {
                                caps.add_terminal(
                                    q,
                                    self.smooth.cost(p, q, self.alpha, self.alpha),
                                    self.smooth.cost(p, q, self.alpha, lq),
                                );
                            }
                            (false, false) => {
                                if self.add_pairwise(&mut caps, p, q, dir, lp, lq) {
                                    repaired += 1;
                                }
                            }
                        }
                    }
                }
            }
        }

        caps.normalize_terminals();
        trace!(
            "[GraphBuild] alpha {}: {} repaired quads, dims {}",
            self.alpha, repaired, self.dims
        );
        caps
    }

    /// Decompose one quad into terminal and neighbor capacities.
    fn add_pairwise(
        &self,
        caps: &mut CapacityGrid,
        p: usize,
        q: usize,
        dir: GridDir,
        lp: u8,
        lq: u8,
    ) -> bool {
        let mut quad = CostQuad {
            a: self.smooth.cost(p, q, self.alpha, self.alpha),
            b: self.smooth.cost(p, q, self.alpha, lq),
            c: self.smooth.cost(p, q, lp, self.alpha),
            d: self.smooth.cost(p, q, lp, lq),
        };
        let repaired = quad.repair();

        // Constant rows: D charged while p keeps, A while p switches.
        caps.add_terminal(p, quad.a, quad.d);

        let b = quad.b - quad.a;
        let c = quad.c - quad.d;
        if b < 0 {
            caps.add_terminal(p, 0, -b);
            caps.add_terminal(q, -b, 0);
            caps.add_nbr(p, dir, b + c);
        } else if c < 0 {
            caps.add_terminal(p, -c, 0);
            caps.add_terminal(q, 0, -c);
            caps.add_nbr(q, dir.opposite(), b + c);
        } else {
            caps.add_nbr(p, dir, c);
            caps.add_nbr(q, dir.opposite(), b);
        }
        repaired
    }
}

// ============================================================================
// Tests
// ============================================================================
