//! Volume dimensions, physical spacing, and flat voxel addressing.
//!
//! Volumes are stored row-major: `index = x + y·width + z·width·height`.
//! All components share this addressing so capacity lanes, potential
//! channels, and label arrays can be walked with the same strides.

use std::fmt;

/// Voxel dimensions of a volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VolumeDims {
    /// Extent along x.
    pub width: usize,
    /// Extent along y.
    pub height: usize,
    /// Extent along z.
    pub depth: usize,
}

impl VolumeDims {
    /// Create dimensions from extents.
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Total voxel count.
    #[inline]
    pub fn n_voxels(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// True if any extent is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.depth == 0
    }

    /// Stride between consecutive y rows.
    #[inline]
    pub fn stride_y(&self) -> usize {
        self.width
    }

    /// Stride between consecutive z slices.
    #[inline]
    pub fn stride_z(&self) -> usize {
        self.width * self.height
    }

    /// Flat index of an in-range coordinate.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.width + z * self.width * self.height
    }

    /// Flat index with bounds check, `None` when out of range.
    #[inline]
    pub fn coord_to_index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        if self.contains(x, y, z) {
            Some(self.index(x as usize, y as usize, z as usize))
        } else {
            None
        }
    }

    /// Coordinate of a flat index.
    #[inline]
    pub fn index_to_coord(&self, index: usize) -> (usize, usize, usize) {
        let z = index / self.stride_z();
        let rem = index % self.stride_z();
        (rem % self.width, rem / self.width, z)
    }

    /// Whether a signed coordinate lies inside the volume.
    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height
            && (z as usize) < self.depth
    }
}

impl fmt::Display for VolumeDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.width, self.height, self.depth)
    }
}

/// Physical voxel spacing along each axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spacing {
    /// Spacing along x.
    pub x: f64,
    /// Spacing along y.
    pub y: f64,
    /// Spacing along z.
    pub z: f64,
}

impl Spacing {
    /// Create a spacing vector.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Isotropic spacing.
    pub fn uniform(s: f64) -> Self {
        Self { x: s, y: s, z: s }
    }

    /// Spacing along an axis index (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn axis(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
