//! A polygonised region mesh: the vertex/polygon data the tile assembler
//! consumes.
//!
//! Building this from a [`ContourSet`](crate::contours::ContourSet) (convex
//! partitioning / triangulation of the simplified contours) is the job of an
//! upstream polygonisation step and is out of scope here; this module only
//! defines the shape the assembler reads.

use glam::U16Vec3;

use crate::{area::AreaType, constants::MESH_NULL_IDX};

/// One polygon edge's adjacency info, as produced by the upstream polygoniser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum PolygonEdge {
    /// An interior edge shared with another polygon in the same mesh.
    Neighbor(u16),
    /// A boundary edge: a cardinal direction (0..=3), or `15` if the edge has
    /// no corresponding external portal.
    Boundary(u8),
}

/// A single polygon in a [`PolygonMesh`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    /// Vertex indices into [`PolygonMesh::vertices`], padded with
    /// [`MESH_NULL_IDX`] up to the mesh's `max_vertices_per_polygon`.
    pub vertices: Vec<u16>,
    /// One [`PolygonEdge`] per used vertex slot.
    pub edges: Vec<PolygonEdge>,
}

impl Polygon {
    /// The number of used vertex slots: the index of the first
    /// [`MESH_NULL_IDX`] sentinel, or the full length if there is none.
    pub fn vertex_count(&self) -> usize {
        self.vertices
            .iter()
            .position(|&v| v == MESH_NULL_IDX)
            .unwrap_or(self.vertices.len())
    }
}

/// A polygonised region mesh: the input the tile assembler packs into a
/// [`NavMeshTile`](crate::tile::NavMeshTile).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PolygonMesh {
    /// Grid-space vertex positions.
    pub vertices: Vec<U16Vec3>,
    /// The mesh's polygons.
    pub polygons: Vec<Polygon>,
    /// Per-polygon user flags, parallel to [`Self::polygons`].
    pub flags: Vec<u16>,
    /// Per-polygon area tags, parallel to [`Self::polygons`].
    pub areas: Vec<AreaType>,
    /// The maximum number of vertices any polygon in the mesh may have.
    pub max_vertices_per_polygon: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_count_stops_at_null_sentinel() {
        let polygon = Polygon {
            vertices: vec![0, 1, 2, MESH_NULL_IDX, MESH_NULL_IDX, MESH_NULL_IDX],
            edges: vec![PolygonEdge::Boundary(15); 3],
        };
        assert_eq!(polygon.vertex_count(), 3);
    }

    #[test]
    fn vertex_count_handles_fully_used_polygon() {
        let polygon = Polygon {
            vertices: vec![0, 1, 2, 3, 4, 5],
            edges: vec![PolygonEdge::Boundary(15); 6],
        };
        assert_eq!(polygon.vertex_count(), 6);
    }
}
