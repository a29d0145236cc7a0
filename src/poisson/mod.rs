//! Poisson diffusion layer: potential channels seeded from label marks,
//! relaxed by red-black SOR, decided per voxel by arg-max.
//!
//! A cheap alternative to the graph-cut path for quick previews: fixed
//! cost, no optimality claim.

mod field;
mod solver;

pub use field::PotentialField;
pub use solver::{DiffusionWeights, PoissonConfig, PoissonSolver, SorStats};
