//! KhandaSeg - Interactive volumetric segmentation engine
//!
//! Turns a sparse set of user-placed label seeds into a complete
//! per-voxel label volume, with two complementary paths: discrete energy
//! minimization via graph min-cut (generalized to multiple labels by
//! alpha-expansion) and continuous diffusion via red-black SOR on
//! per-label potential fields.
//!
//! # Architecture
//!
//! The crate is organized into 4 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                engine/ + config                     │  ← Orchestration
//! │        (validation, dispatch, write-back)           │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌──────────────────────────┬──────────────────────────┐
//! │        graphcut/         │        poisson/          │  ← Solvers
//! │  (capacities, builder,   │  (potential channels,    │
//! │   min-cut, expansion)    │   red-black SOR)         │
//! └──────────────────────────┴──────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                      cost/                          │  ← Cost terms
//! │   (edge weights, data/smooth terms, seed distance)  │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                      core/                          │  ← Foundation
//! │        (dims, neighborhoods, volume traits)         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Segmentation paths
//!
//! ## Graph cut (alpha-expansion)
//! - Data term: hard constraints at seeds, geodesic seed distance
//!   elsewhere
//! - Smoothness term: Gaussian weight over the normalized intensity step
//! - One min-cut per candidate label per cycle; cycles until the total
//!   energy stops decreasing
//! - Non-submodular pairwise quads are repaired deterministically before
//!   graph construction
//!
//! ## Poisson diffusion
//! - One potential channel per candidate label, seeds pinned as Dirichlet
//!   boundary values
//! - Chebyshev-accelerated red-black SOR for a fixed iteration budget
//! - Per-voxel arg-max over the relaxed channels
//!
//! Both paths read image and seed volumes and write the result through
//! the accessor traits in [`core`], so the host application keeps
//! ownership of all volume memory.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Cost terms (depends on core)
// ============================================================================
pub mod cost;

// ============================================================================
// Layer 3: Solvers (depend on core, cost)
// ============================================================================
pub mod graphcut;
pub mod poisson;

// ============================================================================
// Layer 4: Orchestration (depends on all layers)
// ============================================================================
pub mod config;
pub mod engine;

pub mod error;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use crate::core::{Connectivity, Neighborhood, NeighborOffset, Spacing, VolumeDims};
pub use crate::core::{ImageSource, LabelSink, SeedSource, VolumeBuffer};

// Cost terms
pub use cost::{
    DataCost, DataCostFn, DataCostTable, GaussianWeight, IntensityRange, SeedDistanceField,
    SmoothCost, SmoothCostFn, SmoothCostTable,
};

// Graph cut
pub use graphcut::{
    AlphaExpansion, CapacityGrid, CostQuad, CycleStats, DinicSolver, ExpansionConfig,
    ExpansionResult, ExpansionStatus, GridDir, GridGraphBuilder, LabelOrder, MinCutSolver,
    SolverConfig, TerminationReason,
};

// Poisson
pub use poisson::{DiffusionWeights, PoissonConfig, PoissonSolver, PotentialField, SorStats};

// Orchestration
pub use config::SegmentationConfig;
pub use engine::{
    GraphCutConfig, GraphCutSummary, LabelMode, PoissonSummary, SegmentationEngine,
};
pub use error::{Result, SegmentationError};
