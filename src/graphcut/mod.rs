//! Graph-cut layer: capacity grids, submodular graph construction,
//! max-flow, and the alpha-expansion driver.
//!
//! ```text
//! labeling + cost terms --> GridGraphBuilder --> CapacityGrid
//!                                                     |
//!                                               MinCutSolver
//!                                                     |
//!                                            sink-side relabeling
//! ```
//!
//! The capacity grid keeps one terminal pair per voxel and six directed
//! neighbor lanes, so an expansion step allocates no per-edge structures.

mod builder;
mod capacity;
mod expansion;
mod mincut;

pub use builder::{CostQuad, GridGraphBuilder};
pub use capacity::{CapacityGrid, GridDir};
pub use expansion::{
    AlphaExpansion, CycleStats, ExpansionConfig, ExpansionResult, ExpansionStatus, LabelOrder,
    TerminationReason,
};
pub use mincut::{DinicSolver, MinCutSolver, SolverConfig};
