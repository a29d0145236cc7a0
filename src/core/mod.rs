//! Foundation types: volume dimensions, spacing, neighborhoods, and the
//! accessor traits the engine consumes volumes through.

mod dims;
mod neighborhood;
mod volume;

pub use dims::{Spacing, VolumeDims};
pub use neighborhood::{Connectivity, Neighborhood, NeighborOffset};
pub use volume::{ImageSource, LabelSink, SeedSource, VolumeBuffer};
