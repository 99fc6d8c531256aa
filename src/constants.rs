//! Sentinel values and limits shared across the contour/tile pipeline.

/// Marks an unused vertex slot in a polygon's fixed-size vertex array.
pub const MESH_NULL_IDX: u16 = 0xFFFF;

/// High bit of a tile polygon's neighbour code; set for edges that portal to
/// another tile.
pub const EXT_LINK: u16 = 0x8000;

/// The maximum number of vertices a single output polygon may have.
///
/// Implementation-defined per the upstream format; six matches the common
/// convex-polygon cap used by comparable navmesh pipelines.
pub const MAX_VERTS_PER_POLYGON: u16 = 6;
