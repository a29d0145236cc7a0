//! Volume accessor traits and an in-memory buffer implementation.
//!
//! The engine never owns the application's volumes. It reads image
//! intensities and seed labels through accessor traits and writes the
//! result labeling through a sink trait; the host application adapts its
//! own data store to these seams. [`VolumeBuffer`] is the bundled
//! single-component implementation used by tests, benches, and demos.

use super::dims::{Spacing, VolumeDims};

/// Read access to scalar image intensities.
pub trait ImageSource: Send + Sync {
    /// Voxel dimensions of the image.
    fn dims(&self) -> VolumeDims;

    /// Physical voxel spacing.
    fn spacing(&self) -> Spacing;

    /// Intensity at a coordinate, `None` when the component or the
    /// coordinate is out of range.
    fn value(&self, component: usize, x: i32, y: i32, z: i32) -> Option<f32>;
}

/// Read access to seed labels.
pub trait SeedSource: Send + Sync {
    /// Voxel dimensions of the seed volume.
    fn dims(&self) -> VolumeDims;

    /// Seed label at a coordinate; 0 means unseeded and is also returned
    /// for out-of-range coordinates or components.
    fn label(&self, component: usize, x: i32, y: i32, z: i32) -> u16;
}

/// Write access to the result labeling. Invoking [`LabelSink::set_label`]
/// per voxel during write-back is the engine's only externally observable
/// side effect.
pub trait LabelSink: Send + Sync {
    /// Voxel dimensions of the result volume.
    fn dims(&self) -> VolumeDims;

    /// Store a label at a coordinate. Out-of-range coordinates and
    /// components other than 0 are ignored.
    fn set_label(&mut self, component: usize, x: i32, y: i32, z: i32, label: u8);
}

/// Flat in-memory volume with a single component.
#[derive(Clone, Debug)]
pub struct VolumeBuffer<T> {
    dims: VolumeDims,
    spacing: Spacing,
    data: Vec<T>,
}

impl<T: Clone> VolumeBuffer<T> {
    /// Allocate a volume filled with one value.
    pub fn filled(dims: VolumeDims, value: T) -> Self {
        Self {
            dims,
            spacing: Spacing::default(),
            data: vec![value; dims.n_voxels()],
        }
    }

    /// Wrap an existing flat vector. The vector length must equal the
    /// voxel count.
    pub fn from_vec(dims: VolumeDims, data: Vec<T>) -> Self {
        debug_assert_eq!(data.len(), dims.n_voxels());
        Self {
            dims,
            spacing: Spacing::default(),
            data,
        }
    }

    /// Replace the physical spacing.
    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Voxel dimensions.
    #[inline]
    pub fn dims(&self) -> VolumeDims {
        self.dims
    }

    /// Value at an unchecked coordinate.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> &T {
        &self.data[self.dims.index(x, y, z)]
    }

    /// Store a value at an unchecked coordinate.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, value: T) {
        let idx = self.dims.index(x, y, z);
        self.data[idx] = value;
    }

    /// Flat data slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable flat data slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl ImageSource for VolumeBuffer<f32> {
    fn dims(&self) -> VolumeDims {
        self.dims
    }

    fn spacing(&self) -> Spacing {
        self.spacing
    }

    fn value(&self, component: usize, x: i32, y: i32, z: i32) -> Option<f32> {
        if component != 0 {
            return None;
        }
        self.dims.coord_to_index(x, y, z).map(|i| self.data[i])
    }
}

impl SeedSource for VolumeBuffer<u16> {
    fn dims(&self) -> VolumeDims {
        self.dims
    }

    fn label(&self, component: usize, x: i32, y: i32, z: i32) -> u16 {
        if component != 0 {
            return 0;
        }
        self.dims
            .coord_to_index(x, y, z)
            .map_or(0, |i| self.data[i])
    }
}

impl LabelSink for VolumeBuffer<u8> {
    fn dims(&self) -> VolumeDims {
        self.dims
    }

    fn set_label(&mut self, component: usize, x: i32, y: i32, z: i32, label: u8) {
        if component != 0 {
            return;
        }
        if let Some(i) = self.dims.coord_to_index(x, y, z) {
            self.data[i] = label;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_access() {
        let dims = VolumeDims::new(2, 2, 1);
        let mut buf = VolumeBuffer::filled(dims, 0.0f32);
        buf.set(1, 0, 0, 3.5);

        assert_eq!(buf.value(0, 1, 0, 0), Some(3.5));
        assert_eq!(buf.value(0, 0, 1, 0), Some(0.0));
        assert_eq!(buf.value(0, 2, 0, 0), None);
        assert_eq!(buf.value(0, -1, 0, 0), None);
        assert_eq!(buf.value(1, 0, 0, 0), None);
    }

    #[test]
    fn seed_defaults_to_zero() {
        let dims = VolumeDims::new(2, 1, 1);
        let mut buf = VolumeBuffer::filled(dims, 0u16);
        buf.set(0, 0, 0, 7);

        assert_eq!(buf.label(0, 0, 0, 0), 7);
        assert_eq!(buf.label(0, 1, 0, 0), 0);
        assert_eq!(buf.label(0, 5, 0, 0), 0);
        assert_eq!(buf.label(3, 0, 0, 0), 0);
    }

    #[test]
    fn sink_ignores_out_of_range() {
        let dims = VolumeDims::new(2, 1, 1);
        let mut buf = VolumeBuffer::filled(dims, 0u8);
        buf.set_label(0, 0, 0, 0, 4);
        buf.set_label(0, 9, 0, 0, 4);
        buf.set_label(2, 1, 0, 0, 4);

        assert_eq!(*buf.get(0, 0, 0), 4);
        assert_eq!(*buf.get(1, 0, 0), 0);
    }
}
