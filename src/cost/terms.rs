//! Data and smoothness cost capabilities consumed by the expansion driver.
//!
//! Each capability is a tagged variant: either a precomputed table or an
//! arbitrary function, behind one `cost()` contract. The driver never
//! knows which it is talking to. Costs are integers; the orchestrator is
//! responsible for any scaling from floating-point weights.

/// Per-voxel, per-label assignment cost.
pub enum DataCost {
    /// Dense table indexed `voxel · n_labels + label`.
    Table(DataCostTable),
    /// Arbitrary cost function of `(voxel, label)`.
    Function(DataCostFn),
}

/// Boxed data-cost function.
pub type DataCostFn = Box<dyn Fn(usize, u8) -> i64 + Send + Sync>;

impl DataCost {
    /// Cost of assigning `label` to `voxel`.
    #[inline]
    pub fn cost(&self, voxel: usize, label: u8) -> i64 {
        match self {
            DataCost::Table(t) => t.get(voxel, label),
            DataCost::Function(f) => f(voxel, label),
        }
    }
}

/// Dense data-cost table.
#[derive(Clone, Debug)]
pub struct DataCostTable {
    n_labels: usize,
    costs: Vec<i64>,
}

impl DataCostTable {
    /// Allocate a zeroed table.
    pub fn new(n_voxels: usize, n_labels: usize) -> Self {
        Self {
            n_labels,
            costs: vec![0; n_voxels * n_labels],
        }
    }

    /// Number of labels per voxel.
    #[inline]
    pub fn n_labels(&self) -> usize {
        self.n_labels
    }

    /// Store one cost.
    #[inline]
    pub fn set(&mut self, voxel: usize, label: u8, cost: i64) {
        self.costs[voxel * self.n_labels + label as usize] = cost;
    }

    /// Read one cost.
    #[inline]
    pub fn get(&self, voxel: usize, label: u8) -> i64 {
        self.costs[voxel * self.n_labels + label as usize]
    }
}

/// Pairwise smoothness cost between two neighboring voxels. Need not be
/// symmetric in its label arguments.
pub enum SmoothCost {
    /// Label-pair table shared by every edge, indexed
    /// `labelA · n_labels + labelB`.
    Table(SmoothCostTable),
    /// Arbitrary cost function of `(voxelA, voxelB, labelA, labelB)`.
    /// Callers pass forward-ordered pairs (`voxelA < voxelB`).
    Function(SmoothCostFn),
}

/// Boxed smoothness-cost function.
pub type SmoothCostFn = Box<dyn Fn(usize, usize, u8, u8) -> i64 + Send + Sync>;

impl SmoothCost {
    /// Cost of voxels `p`, `q` taking labels `la`, `lb`.
    #[inline]
    pub fn cost(&self, p: usize, q: usize, la: u8, lb: u8) -> i64 {
        match self {
            SmoothCost::Table(t) => t.get(la, lb),
            SmoothCost::Function(f) => f(p, q, la, lb),
        }
    }
}

/// Label-pair smoothness table.
#[derive(Clone, Debug)]
pub struct SmoothCostTable {
    n_labels: usize,
    costs: Vec<i64>,
}

impl SmoothCostTable {
    /// Allocate a zeroed table.
    pub fn new(n_labels: usize) -> Self {
        Self {
            n_labels,
            costs: vec![0; n_labels * n_labels],
        }
    }

    /// Potts model: a flat penalty for any pair of unequal labels.
    pub fn potts(n_labels: usize, penalty: i64) -> Self {
        let mut table = Self::new(n_labels);
        for a in 0..n_labels {
            for b in 0..n_labels {
                if a != b {
                    table.costs[a * n_labels + b] = penalty;
                }
            }
        }
        table
    }

    /// Store one pair cost.
    #[inline]
    pub fn set(&mut self, la: u8, lb: u8, cost: i64) {
        self.costs[la as usize * self.n_labels + lb as usize] = cost;
    }

    /// Read one pair cost.
    #[inline]
    pub fn get(&self, la: u8, lb: u8) -> i64 {
        self.costs[la as usize * self.n_labels + lb as usize]
    }
}

// ============================================================================
// Tests
// ============================================================================
