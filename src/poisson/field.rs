//! Per-label potential channels with fixed boundary conditions at seeds.

use crate::core::VolumeDims;

/// One f64 potential channel per candidate label, plus a shared mask of
/// voxels whose potentials are pinned.
///
/// Seeding convention: a voxel carrying a candidate seed is pinned in
/// every channel — at 2.0 in its own label's channel and 1.0 in every
/// other channel. Unseeded voxels start at 0.0 and relax freely. The
/// 2.0/1.0 split keeps seeded voxels above the free interior in their
/// own channel, so the winning channel at a seed is always its own.
pub struct PotentialField {
    dims: VolumeDims,
    n_channels: usize,
    /// Channel-major: `values[channel * n_voxels + voxel]`.
    values: Vec<f64>,
    fixed: Vec<bool>,
}

impl PotentialField {
    /// Build the channels from a seed volume and the candidate label
    /// list. Seed ids absent from `candidates` are ignored.
    pub fn from_seeds(dims: VolumeDims, seeds: &[u16], candidates: &[u16]) -> Self {
        let n = dims.n_voxels();
        debug_assert_eq!(seeds.len(), n);

        let n_channels = candidates.len();
        let mut values = vec![0.0f64; n_channels * n];
        let mut fixed = vec![false; n];

        for (p, &seed) in seeds.iter().enumerate() {
            if seed == 0 {
                continue;
            }
            if let Some(own) = candidates.iter().position(|&c| c == seed) {
                fixed[p] = true;
                for channel in 0..n_channels {
                    values[channel * n + p] = if channel == own { 2.0 } else { 1.0 };
                }
            }
        }

        Self {
            dims,
            n_channels,
            values,
            fixed,
        }
    }

    pub fn dims(&self) -> VolumeDims {
        self.dims
    }

    pub fn n_channels(&self) -> usize {
        self.n_channels
    }

    /// Potentials of one channel.
    pub fn channel(&self, channel: usize) -> &[f64] {
        let n = self.dims.n_voxels();
        &self.values[channel * n..(channel + 1) * n]
    }

    /// Mutable potentials of one channel together with the pin mask, so
    /// a relaxation sweep can read the mask while writing the channel.
    pub fn channel_mut_with_fixed(&mut self, channel: usize) -> (&mut [f64], &[bool]) {
        let n = self.dims.n_voxels();
        (
            &mut self.values[channel * n..(channel + 1) * n],
            &self.fixed,
        )
    }

    /// Whether a voxel's potentials are pinned.
    #[inline]
    pub fn is_fixed(&self, voxel: usize) -> bool {
        self.fixed[voxel]
    }

    #[inline]
    pub fn value(&self, channel: usize, voxel: usize) -> f64 {
        self.values[channel * self.dims.n_voxels() + voxel]
    }

    /// Channel with the largest potential at a voxel. Ties keep the
    /// earliest channel, so candidate order breaks exact ties.
    pub fn argmax_channel(&self, voxel: usize) -> usize {
        debug_assert!(self.n_channels > 0);
        let mut best = 0usize;
        let mut best_value = self.value(0, voxel);
        for channel in 1..self.n_channels {
            let v = self.value(channel, voxel);
            if v > best_value {
                best_value = v;
                best = channel;
            }
        }
        best
    }
}

// ============================================================================
// Tests
// ============================================================================
