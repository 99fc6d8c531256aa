#![warn(missing_docs)]
#![doc = include_str!("../readme.md")]

pub mod area;
pub mod bv_tree;
pub mod compact_cell;
pub mod compact_heightfield;
pub mod compact_span;
pub mod config;
pub mod constants;
pub mod contours;
pub mod detail_mesh;
pub mod math;
pub mod off_mesh;
pub mod poly_mesh;
pub mod region;
pub mod tile;

pub use compact_cell::CompactCell;
pub use compact_heightfield::CompactHeightfield;
pub use compact_span::CompactSpan;
pub use math::{Aabb2d, Aabb3d};

/// Everything you need to assemble a navmesh tile from a compact heightfield.
pub mod prelude {
    pub use crate::{
        Aabb2d, Aabb3d, CompactCell, CompactHeightfield, CompactSpan,
        area::AreaType,
        bv_tree::BvNode,
        config::TileBuildConfig,
        constants::{EXT_LINK, MAX_VERTS_PER_POLYGON, MESH_NULL_IDX},
        contours::{BuildContoursFlags, Contour, ContourBuildConfig, ContourSet, ContourVertex},
        detail_mesh::{DetailMeshInput, DetailSubMesh, DetailTriangle},
        off_mesh::OffMeshConnection,
        poly_mesh::{Polygon, PolygonEdge, PolygonMesh},
        region::RegionId,
        tile::{NavMeshTile, PolygonKind, TileBuildError, build_tile},
    };
}
