//! A packed, read-only view of a voxelised heightfield, already partitioned
//! into regions and area tags.
//!
//! Building a [`CompactHeightfield`] from raw geometry (rasterization,
//! filtering, the distance field, watershed region partitioning) is the job
//! of an upstream collaborator and is out of scope for this crate: it only
//! defines the shape contour extraction reads.

use crate::{
    Aabb3d,
    area::AreaType,
    compact_cell::CompactCell,
    compact_span::CompactSpan,
    math::{dir_offset_x, dir_offset_z},
    region::RegionId,
};

/// A packed representation of a heightfield: per-column spans with region
/// and area data, and precomputed per-direction neighbour connections.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct CompactHeightfield {
    /// The width of the field along the x-axis, in cell units.
    pub width: u16,
    /// The height of the field along the z-axis, in cell units.
    pub height: u16,
    /// The size of the non-navigable border around the field, in cell units.
    pub border_size: u16,
    /// The size of each cell on the xz-plane, in world units.
    pub cell_size: f32,
    /// The size of each cell along the y-axis, in world units.
    pub cell_height: f32,
    /// The AABB of the field, in world space.
    pub aabb: Aabb3d,
    /// The maximum region id assigned by the (external) region partitioning step.
    pub max_regions: RegionId,
    /// The cells of the field, in `width * height`, x-major, z-minor order.
    pub cells: Vec<CompactCell>,
    /// All walkable spans in the field.
    pub spans: Vec<CompactSpan>,
    /// The area type of each span. Parallel to [`Self::spans`].
    pub areas: Vec<AreaType>,
}

impl CompactHeightfield {
    #[inline]
    pub(crate) fn column_index(&self, x: u16, z: u16) -> usize {
        x as usize + z as usize * self.width as usize
    }

    /// Returns the cell at the given coordinates. `None` if out of bounds.
    #[inline]
    pub fn get_cell_at(&self, x: u16, z: u16) -> Option<&CompactCell> {
        self.cells.get(self.column_index(x, z))
    }

    /// Returns the cell at the given coordinates.
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn cell_at(&self, x: u16, z: u16) -> &CompactCell {
        &self.cells[self.column_index(x, z)]
    }

    /// Returns whether `(x, z)` lies within the field's voxel grid.
    #[inline]
    pub(crate) fn contains(&self, x: i32, z: i32) -> bool {
        x >= 0 && x < self.width as i32 && z >= 0 && z < self.height as i32
    }

    /// Resolves the `(x, z, span index)` of the neighbour reached by walking
    /// `direction` from `(x, z)` and following the span's precomputed
    /// connection `con` (as returned by [`CompactSpan::con`]).
    ///
    /// # Panics
    /// Panics if `(x, z)` plus `direction`'s offset falls outside the grid;
    /// callers must only invoke this after checking [`CompactSpan::con`]
    /// returned `Some`, which the upstream collaborator only ever sets for
    /// connections that land in bounds.
    #[inline]
    pub(crate) fn con_indices(&self, x: i32, z: i32, direction: u8, con: u8) -> (i32, i32, usize) {
        let neighbor_x = x + dir_offset_x(direction);
        let neighbor_z = z + dir_offset_z(direction);
        let cell = &self.cells[(neighbor_x as usize) + (neighbor_z as usize) * self.width as usize];
        (neighbor_x, neighbor_z, cell.index() as usize + con as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_field(width: u16, height: u16) -> CompactHeightfield {
        let cells = (0..width as u32 * height as u32)
            .map(|i| CompactCell::new(i, 1))
            .collect::<Vec<_>>();
        let spans = vec![CompactSpan::new(0, RegionId::from(1)); width as usize * height as usize];
        let areas = vec![AreaType::WALKABLE; spans.len()];
        CompactHeightfield {
            width,
            height,
            border_size: 0,
            cell_size: 1.0,
            cell_height: 1.0,
            aabb: Aabb3d::default(),
            max_regions: RegionId::from(1),
            cells,
            spans,
            areas,
        }
    }

    #[test]
    fn cell_at_matches_column_order() {
        let chf = flat_field(4, 3);
        assert_eq!(chf.cell_at(1, 2).index(), 1 + 2 * 4);
    }

    #[test]
    fn out_of_bounds_is_none() {
        let chf = flat_field(4, 3);
        assert!(chf.get_cell_at(4, 0).is_none());
        assert!(!chf.contains(4, 0));
        assert!(chf.contains(3, 2));
    }

    #[test]
    fn con_indices_follows_direction_offset() {
        let chf = flat_field(4, 3);
        // direction 2 is +x
        let (nx, nz, span_index) = chf.con_indices(1, 1, 2, 0);
        assert_eq!((nx, nz), (2, 1));
        assert_eq!(span_index, chf.cell_at(2, 1).index() as usize);
    }
}
