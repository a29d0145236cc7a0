//! Test utilities for segmentation scenarios.
//!
//! Helpers for building phantom volumes, placing seeds, and inspecting
//! results.

#![allow(dead_code)]

use khanda_seg::{LabelSink, VolumeBuffer, VolumeDims};

/// Uniform-intensity image volume.
pub fn uniform_image(dims: VolumeDims, value: f32) -> VolumeBuffer<f32> {
    VolumeBuffer::filled(dims, value)
}

/// Image with a bright sphere on a dark background.
pub fn sphere_image(
    dims: VolumeDims,
    center: (usize, usize, usize),
    radius: f32,
    inside: f32,
    outside: f32,
) -> VolumeBuffer<f32> {
    let mut image = VolumeBuffer::filled(dims, outside);
    for z in 0..dims.depth {
        for y in 0..dims.height {
            for x in 0..dims.width {
                let dx = x as f32 - center.0 as f32;
                let dy = y as f32 - center.1 as f32;
                let dz = z as f32 - center.2 as f32;
                if (dx * dx + dy * dy + dz * dz).sqrt() <= radius {
                    image.set(x, y, z, inside);
                }
            }
        }
    }
    image
}

/// All-zero (unseeded) seed volume.
pub fn empty_seeds(dims: VolumeDims) -> VolumeBuffer<u16> {
    VolumeBuffer::filled(dims, 0u16)
}

/// Seed volume with two single-voxel seeds at opposite corners.
pub fn corner_seeds(dims: VolumeDims, label_a: u16, label_b: u16) -> VolumeBuffer<u16> {
    let mut seeds = empty_seeds(dims);
    seeds.set(0, 0, 0, label_a);
    seeds.set(dims.width - 1, dims.height - 1, dims.depth - 1, label_b);
    seeds
}

/// Count the voxels carrying one label in a result volume.
pub fn count_label(result: &VolumeBuffer<u8>, label: u8) -> usize {
    result.as_slice().iter().filter(|&&l| l == label).count()
}

/// Sink that only counts writes, for abort-before-write assertions.
pub struct CountingSink {
    dims: VolumeDims,
    pub writes: usize,
}

impl CountingSink {
    pub fn new(dims: VolumeDims) -> Self {
        Self { dims, writes: 0 }
    }
}

impl LabelSink for CountingSink {
    fn dims(&self) -> VolumeDims {
        self.dims
    }

    fn set_label(&mut self, _component: usize, _x: i32, _y: i32, _z: i32, _label: u8) {
        self.writes += 1;
    }
}
