//! Per-polygon height-detail data: the fine-grained triangle mesh the tile
//! assembler packs alongside each polygon when available.
//!
//! Sampling this from source geometry (the height-patch flood fill over a
//! polygon's footprint) is the job of an upstream collaborator and is out of
//! scope here: this module only defines the shape the assembler reads and
//! packs, plus the trivial fan-triangulation fallback used when no detail
//! data is supplied at all (see [`crate::tile`]).

use glam::Vec3A;

/// Points at one polygon's run of vertices/triangles in a [`DetailMeshInput`].
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailSubMesh {
    /// Index of the polygon's first vertex in [`DetailMeshInput::vertices`].
    pub vert_base: u32,
    /// Number of detail vertices belonging to the polygon, including the
    /// `vertex_count` vertices it shares with the polygon mesh itself.
    pub vert_count: u32,
    /// Index of the polygon's first triangle in [`DetailMeshInput::triangles`].
    pub tri_base: u32,
    /// Number of detail triangles belonging to the polygon.
    pub tri_count: u32,
}

/// A single detail-mesh triangle.
///
/// Indices are local to the owning [`DetailSubMesh`]: values below the
/// polygon's own vertex count refer back to the polygon's vertices; values at
/// or above it refer into [`DetailMeshInput::vertices`] starting at the
/// submesh's `vert_base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailTriangle {
    /// The triangle's three local vertex indices.
    pub indices: [u8; 3],
    /// Per-edge boundary flags: bit 0 for the `indices[0]`-`indices[1]` edge,
    /// bit 2 for `indices[1]`-`indices[2]`, bit 4 for `indices[2]`-`indices[0]`.
    pub flags: u8,
}

/// Fine-grained per-polygon height samples, supplied in addition to a
/// [`PolygonMesh`](crate::poly_mesh::PolygonMesh).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailMeshInput {
    /// One entry per polygon, parallel to `PolygonMesh::polygons`.
    pub sub_meshes: Vec<DetailSubMesh>,
    /// All detail vertices, world space, referenced by [`DetailSubMesh::vert_base`].
    pub vertices: Vec<Vec3A>,
    /// All detail triangles, referenced by [`DetailSubMesh::tri_base`].
    pub triangles: Vec<DetailTriangle>,
}
