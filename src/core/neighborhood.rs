//! Voxel neighborhoods and physical inter-voxel distances.
//!
//! The lattice is either 6-connected (face neighbors) or 26-connected
//! (face + edge + corner neighbors). Offsets carry their physical length
//! derived from the volume spacing, so distance computations stay correct
//! on anisotropic volumes.

use serde::{Deserialize, Serialize};

use super::dims::Spacing;

/// Lattice connectivity of the voxel grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Face neighbors only (±x, ±y, ±z).
    Six,
    /// Face, edge, and corner neighbors.
    TwentySix,
}

impl Connectivity {
    /// Number of neighbors per interior voxel.
    pub fn neighbor_count(&self) -> usize {
        match self {
            Connectivity::Six => 6,
            Connectivity::TwentySix => 26,
        }
    }
}

/// A single neighbor offset with its physical length.
#[derive(Clone, Copy, Debug)]
pub struct NeighborOffset {
    /// Step along x.
    pub dx: i32,
    /// Step along y.
    pub dy: i32,
    /// Step along z.
    pub dz: i32,
    /// Physical distance covered by the step.
    pub distance: f64,
}

/// The full neighbor stencil for a connectivity and spacing.
#[derive(Clone, Debug)]
pub struct Neighborhood {
    offsets: Vec<NeighborOffset>,
}

impl Neighborhood {
    /// Build the stencil for the given connectivity and spacing.
    pub fn new(connectivity: Connectivity, spacing: Spacing) -> Self {
        let mut offsets = Vec::with_capacity(connectivity.neighbor_count());
        match connectivity {
            Connectivity::Six => {
                for (dx, dy, dz) in [
                    (-1, 0, 0),
                    (1, 0, 0),
                    (0, -1, 0),
                    (0, 1, 0),
                    (0, 0, -1),
                    (0, 0, 1),
                ] {
                    offsets.push(make_offset(dx, dy, dz, spacing));
                }
            }
            Connectivity::TwentySix => {
                for dz in -1..=1 {
                    for dy in -1..=1 {
                        for dx in -1..=1 {
                            if dx == 0 && dy == 0 && dz == 0 {
                                continue;
                            }
                            offsets.push(make_offset(dx, dy, dz, spacing));
                        }
                    }
                }
            }
        }
        Self { offsets }
    }

    /// All neighbor offsets.
    #[inline]
    pub fn offsets(&self) -> &[NeighborOffset] {
        &self.offsets
    }
}

fn make_offset(dx: i32, dy: i32, dz: i32, spacing: Spacing) -> NeighborOffset {
    let ex = dx as f64 * spacing.x;
    let ey = dy as f64 * spacing.y;
    let ez = dz as f64 * spacing.z;
    NeighborOffset {
        dx,
        dy,
        dz,
        distance: (ex * ex + ey * ey + ez * ez).sqrt(),
    }
}

// ============================================================================
// Tests
// ============================================================================
