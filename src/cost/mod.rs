//! Cost construction: edge weighting, data/smoothness capabilities, and
//! seed distance fields.

mod seed_distance;
mod terms;
mod weight;

pub use seed_distance::SeedDistanceField;
pub use terms::{DataCost, DataCostFn, DataCostTable, SmoothCost, SmoothCostFn, SmoothCostTable};
pub use weight::{GaussianWeight, IntensityRange};
