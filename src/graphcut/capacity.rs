//! Capacity storage for one expansion sub-problem.
//!
//! Lanes follow the min-cut solver contract: two terminal lanes plus six
//! neighbor lanes (one per face direction), each sized to the voxel count.
//! `cap_source[i]` is charged when node `i` lands on the sink side of the
//! cut (its source link is severed); `cap_sink[i]` when it stays on the
//! source side. A neighbor capacity `p→q` is charged when `p` lands
//! source-side and `q` sink-side.

use crate::core::VolumeDims;

/// Face direction on the voxel lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridDir {
    /// Toward x−1.
    Left,
    /// Toward x+1.
    Right,
    /// Toward y−1.
    Top,
    /// Toward y+1.
    Bottom,
    /// Toward z−1.
    Front,
    /// Toward z+1.
    Back,
}

impl GridDir {
    /// All six directions, lane order.
    pub const ALL: [GridDir; 6] = [
        GridDir::Left,
        GridDir::Right,
        GridDir::Top,
        GridDir::Bottom,
        GridDir::Front,
        GridDir::Back,
    ];

    /// The three forward directions (+x, +y, +z) used for edge enumeration.
    pub const FORWARD: [GridDir; 3] = [GridDir::Right, GridDir::Bottom, GridDir::Back];

    /// Coordinate step of the direction.
    #[inline]
    pub fn offset(&self) -> (i32, i32, i32) {
        match self {
            GridDir::Left => (-1, 0, 0),
            GridDir::Right => (1, 0, 0),
            GridDir::Top => (0, -1, 0),
            GridDir::Bottom => (0, 1, 0),
            GridDir::Front => (0, 0, -1),
            GridDir::Back => (0, 0, 1),
        }
    }

    /// The opposing direction.
    #[inline]
    pub fn opposite(&self) -> GridDir {
        match self {
            GridDir::Left => GridDir::Right,
            GridDir::Right => GridDir::Left,
            GridDir::Top => GridDir::Bottom,
            GridDir::Bottom => GridDir::Top,
            GridDir::Front => GridDir::Back,
            GridDir::Back => GridDir::Front,
        }
    }

    /// Lane index.
    #[inline]
    pub fn lane(&self) -> usize {
        *self as usize
    }
}

/// Terminal and neighbor capacities for every voxel node.
#[derive(Clone, Debug)]
pub struct CapacityGrid {
    dims: VolumeDims,
    /// Charged when the node lands sink-side.
    pub cap_source: Vec<i64>,
    /// Charged when the node stays source-side.
    pub cap_sink: Vec<i64>,
    nbr: [Vec<i64>; 6],
}

impl CapacityGrid {
    /// Allocate zeroed capacities for a volume.
    pub fn new(dims: VolumeDims) -> Self {
        let n = dims.n_voxels();
        Self {
            dims,
            cap_source: vec![0; n],
            cap_sink: vec![0; n],
            nbr: std::array::from_fn(|_| vec![0; n]),
        }
    }

    /// Volume dimensions the grid was allocated for.
    #[inline]
    pub fn dims(&self) -> VolumeDims {
        self.dims
    }

    /// Neighbor lane for a direction.
    #[inline]
    pub fn nbr(&self, dir: GridDir) -> &[i64] {
        &self.nbr[dir.lane()]
    }

    /// Mutable neighbor lane for a direction.
    #[inline]
    pub fn nbr_mut(&mut self, dir: GridDir) -> &mut [i64] {
        &mut self.nbr[dir.lane()]
    }

    /// Accumulate a neighbor capacity on `node` toward `dir`.
    #[inline]
    pub fn add_nbr(&mut self, node: usize, dir: GridDir, cap: i64) {
        self.nbr[dir.lane()][node] += cap;
    }

    /// Accumulate terminal charges: `source_add` applies if the node lands
    /// sink-side, `sink_add` if it stays source-side.
    #[inline]
    pub fn add_terminal(&mut self, node: usize, source_add: i64, sink_add: i64) {
        self.cap_source[node] += source_add;
        self.cap_sink[node] += sink_add;
    }

    /// Flat index of the neighbor of `node` toward `dir`, if in range.
    #[inline]
    pub fn neighbor_of(&self, node: usize, dir: GridDir) -> Option<usize> {
        let (x, y, z) = self.dims.index_to_coord(node);
        let (dx, dy, dz) = dir.offset();
        self.dims
            .coord_to_index(x as i32 + dx, y as i32 + dy, z as i32 + dz)
    }

    /// Shift each node's terminal pair down by its minimum so both lanes
    /// are non-negative. The cut is unchanged; only the flow value shifts
    /// by the returned constant.
    pub fn normalize_terminals(&mut self) -> i64 {
        let mut offset = 0;
        for i in 0..self.cap_source.len() {
            let m = self.cap_source[i].min(self.cap_sink[i]);
            if m != 0 {
                self.cap_source[i] -= m;
                self.cap_sink[i] -= m;
                offset += m;
            }
        }
        offset
    }

    /// Cost of a given sink-side assignment under these capacities.
    /// Used by the tests to compare cuts against brute force.
    #[cfg(test)]
    pub(crate) fn cut_cost(&self, sink_side: &[bool]) -> i64 {
        let mut total = 0;
        for node in 0..self.dims.n_voxels() {
            if sink_side[node] {
                total += self.cap_source[node];
            } else {
                total += self.cap_sink[node];
                for dir in GridDir::ALL {
                    if let Some(q) = self.neighbor_of(node, dir) {
                        if sink_side[q] {
                            total += self.nbr[dir.lane()][node];
                        }
                    }
                }
            }
        }
        total
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_offsets_and_opposites() {
        for dir in GridDir::ALL {
            let (dx, dy, dz) = dir.offset();
            let (ox, oy, oz) = dir.opposite().offset();
            assert_eq!((dx + ox, dy + oy, dz + oz), (0, 0, 0));
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn neighbor_indexing_respects_bounds() {
        let caps = CapacityGrid::new(VolumeDims::new(2, 2, 1));
        assert_eq!(caps.neighbor_of(0, GridDir::Right), Some(1));
        assert_eq!(caps.neighbor_of(0, GridDir::Bottom), Some(2));
        assert_eq!(caps.neighbor_of(0, GridDir::Left), None);
        assert_eq!(caps.neighbor_of(0, GridDir::Back), None);
        assert_eq!(caps.neighbor_of(3, GridDir::Left), Some(2));
    }

    #[test]
    fn terminal_normalization_keeps_difference() {
        let mut caps = CapacityGrid::new(VolumeDims::new(2, 1, 1));
        caps.add_terminal(0, 10, 4);
        caps.add_terminal(1, -3, 5);

        let offset = caps.normalize_terminals();
        assert_eq!(offset, 4 - 3);
        assert_eq!(caps.cap_source[0], 6);
        assert_eq!(caps.cap_sink[0], 0);
        assert_eq!(caps.cap_source[1], 0);
        assert_eq!(caps.cap_sink[1], 8);
        assert!(caps.cap_source.iter().all(|&c| c >= 0));
        assert!(caps.cap_sink.iter().all(|&c| c >= 0));
    }
}
