//! Navmesh tile assembly (component F): packs a polygon mesh, optional detail
//! mesh, and off-mesh connections into a serialisable [`NavMeshTile`].

use glam::Vec3A;

use crate::{
    Aabb3d,
    area::AreaType,
    bv_tree::{self, BvNode},
    config::TileBuildConfig,
    constants::{EXT_LINK, MAX_VERTS_PER_POLYGON},
    detail_mesh::{DetailMeshInput, DetailTriangle},
    off_mesh::{self, OffMeshConnection},
    poly_mesh::{Polygon, PolygonEdge, PolygonMesh},
};

/// Failure modes for [`build_tile`], all checked up front; construction never
/// partially mutates its output.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TileBuildError {
    /// The polygon mesh declares more vertices per polygon than this crate supports.
    #[error("vertices per polygon ({actual}) exceeds the maximum of {max}")]
    TooManyVerticesPerPolygon {
        /// The mesh's declared `max_vertices_per_polygon`.
        actual: u16,
        /// The crate's hard ceiling, [`MAX_VERTS_PER_POLYGON`].
        max: u16,
    },
    /// The mesh has enough vertices that 16-bit indices (plus off-mesh pairs) would overflow.
    #[error("vertex count ({count}) reaches the 16-bit index limit")]
    TooManyVertices {
        /// The mesh's vertex count.
        count: usize,
    },
    /// The mesh has no polygons to assemble.
    #[error("polygon mesh has no polygons")]
    EmptyPolygons,
    /// The mesh has no vertices to assemble.
    #[error("polygon mesh has no vertices")]
    EmptyVertices,
}

/// A polygon's role in a [`NavMeshTile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum PolygonKind {
    /// A regular walkable ground polygon.
    Ground,
    /// A 2-vertex degenerate polygon representing an off-mesh connection.
    OffMeshConnection,
}

/// One assembled polygon in a [`NavMeshTile`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TilePolygon {
    /// Indices into [`NavMeshTile::vertices`].
    pub vertices: Vec<u16>,
    /// Per-edge neighbour codes, parallel to [`Self::vertices`]. See
    /// [`build_tile`]'s module docs for the encoding.
    pub neighbors: Vec<u16>,
    /// User-defined traversal flags.
    pub flags: u16,
    /// The polygon's area tag.
    pub area: AreaType,
    /// Whether this is a ground polygon or an off-mesh connection.
    pub kind: PolygonKind,
}

/// A reference into a [`NavMeshTile`]'s detail vertex/triangle arrays for one polygon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TileDetailMesh {
    /// Index of the polygon's first *extra* detail vertex.
    pub vert_base: u32,
    /// Number of extra detail vertices (excludes the polygon's own vertices).
    pub vert_count: u32,
    /// Index of the polygon's first detail triangle.
    pub tri_base: u32,
    /// Number of detail triangles.
    pub tri_count: u32,
}

/// An assembled off-mesh connection, referencing its two appended endpoint
/// vertices and the polygon that represents it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TileOffMeshConnection {
    /// Index into [`NavMeshTile::vertices`] of the start endpoint.
    pub start_vertex: u32,
    /// Index into [`NavMeshTile::vertices`] of the end endpoint.
    pub end_vertex: u32,
    /// The radius around each endpoint within which the connection may be used.
    pub radius: f32,
    /// Whether the connection can be traversed in both directions.
    pub bidirectional: bool,
    /// User-defined traversal flags.
    pub flags: u16,
    /// The connection's area tag.
    pub area: AreaType,
    /// An opaque identifier for the connection, for the caller's own bookkeeping.
    pub user_id: u32,
    /// Index of the representing polygon in [`NavMeshTile::polygons`].
    pub poly_index: u32,
}

/// Metadata describing an assembled tile, independent of its payload arrays.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NavMeshTileHeader {
    /// The tile's x coordinate in the owning tile grid.
    pub tile_x: i32,
    /// The tile's y coordinate in the owning tile grid.
    pub tile_y: i32,
    /// The tile's layer, for stacked tiles at the same (x, y).
    pub tile_layer: i32,
    /// An opaque identifier for the tile.
    pub user_id: u32,
    /// Total polygon count, including off-mesh connection polygons.
    pub poly_count: u32,
    /// Grid vertex count (excludes appended off-mesh endpoint pairs).
    pub vert_count: u32,
    /// Upper bound on the number of pathfinding links the tile may need.
    pub max_link_count: u32,
    /// The tile's world-space AABB.
    pub aabb: Aabb3d,
    /// Number of [`TileDetailMesh`] entries (one per ground polygon).
    pub detail_mesh_count: u32,
    /// Total extra detail vertex count.
    pub detail_vert_count: u32,
    /// Total detail triangle count.
    pub detail_tri_count: u32,
    /// `1 / cellSize`; rescales BV node coordinates back to world units.
    pub bv_quant_factor: f32,
    /// Index of the first off-mesh connection polygon.
    pub off_mesh_base: u32,
    /// Number of off-mesh connections actually stored (interior-start only).
    pub off_mesh_con_count: u32,
    /// Number of [`BvNode`] entries (`0` if no BV tree was built).
    pub bv_node_count: u32,
    /// Copied from [`TileBuildConfig::walkable_height`].
    pub walkable_height: u16,
    /// Copied from [`TileBuildConfig::walkable_radius`].
    pub walkable_radius: u16,
    /// Copied from [`TileBuildConfig::walkable_climb`].
    pub walkable_climb: u16,
}

/// A fully assembled navmesh tile: everything a pathfinder needs for one tile
/// of the navmesh, owned exclusively (no borrows back into the inputs).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NavMeshTile {
    /// The tile's metadata.
    pub header: NavMeshTileHeader,
    /// World-space vertex positions: grid vertices first, then off-mesh endpoint pairs.
    pub vertices: Vec<Vec3A>,
    /// All polygons, ground polygons first, then off-mesh connection polygons.
    pub polygons: Vec<TilePolygon>,
    /// One entry per ground polygon, parallel to the ground-polygon prefix of [`Self::polygons`].
    pub detail_meshes: Vec<TileDetailMesh>,
    /// Extra detail vertices referenced by [`Self::detail_meshes`].
    pub detail_vertices: Vec<Vec3A>,
    /// Detail triangles referenced by [`Self::detail_meshes`].
    pub detail_triangles: Vec<DetailTriangle>,
    /// The tile's bounding-volume hierarchy, empty if not built.
    pub bv_nodes: Vec<BvNode>,
    /// Off-mesh connections actually stored in the tile.
    pub off_mesh_connections: Vec<TileOffMeshConnection>,
}

/// Assembles a [`NavMeshTile`] from a polygon mesh, optional detail mesh, and
/// off-mesh connections.
///
/// Boundary polygon edges are re-encoded from the input's direction nibble to
/// a neighbour code: non-boundary edges become `neighbour_index + 1`; a
/// boundary edge with direction nibble `15` (no portal) becomes `0`; any
/// other direction `d` becomes `EXT_LINK | side(d)`, where `side` maps
/// `0 (x-) -> 4`, `1 (z+) -> 2`, `2 (x+) -> 0`, `3 (z-) -> 6`.
pub fn build_tile(
    mesh: &PolygonMesh,
    detail: Option<&DetailMeshInput>,
    off_mesh_connections: &[OffMeshConnection],
    aabb: Aabb3d,
    cell_size: f32,
    cell_height: f32,
    config: &TileBuildConfig,
) -> Result<NavMeshTile, TileBuildError> {
    if mesh.polygons.is_empty() {
        return Err(TileBuildError::EmptyPolygons);
    }
    if mesh.vertices.is_empty() {
        return Err(TileBuildError::EmptyVertices);
    }
    if mesh.max_vertices_per_polygon > MAX_VERTS_PER_POLYGON {
        return Err(TileBuildError::TooManyVerticesPerPolygon {
            actual: mesh.max_vertices_per_polygon,
            max: MAX_VERTS_PER_POLYGON,
        });
    }
    if mesh.vertices.len() >= 0xFFFF {
        return Err(TileBuildError::TooManyVertices {
            count: mesh.vertices.len(),
        });
    }

    let start_classes: Vec<u8> = off_mesh_connections
        .iter()
        .map(|c| off_mesh::classify_endpoint(c.start, &aabb))
        .collect();
    let end_classes: Vec<u8> = off_mesh_connections
        .iter()
        .map(|c| off_mesh::classify_endpoint(c.end, &aabb))
        .collect();

    let stored_off_mesh_con_count = start_classes.iter().filter(|&&c| c == off_mesh::INTERIOR).count() as u32;
    let off_mesh_con_link_count = start_classes.iter().filter(|&&c| c == off_mesh::INTERIOR).count() as u32
        + end_classes.iter().filter(|&&c| c == off_mesh::INTERIOR).count() as u32;

    let mut edge_count = 0u32;
    let mut portal_count = 0u32;
    for polygon in &mesh.polygons {
        edge_count += polygon.edges.len() as u32;
        portal_count += polygon
            .edges
            .iter()
            .filter(|e| matches!(e, PolygonEdge::Boundary(dir) if *dir != 15))
            .count() as u32;
    }
    let max_link_count = edge_count + 2 * portal_count + 2 * off_mesh_con_link_count;

    let mut vertices = pack_vertices(mesh, &aabb, cell_size, cell_height);
    let grid_vertex_count = vertices.len() as u32;

    let mut off_mesh_vertex_base = Vec::with_capacity(off_mesh_connections.len());
    for (connection, &start_class) in off_mesh_connections.iter().zip(&start_classes) {
        if start_class == off_mesh::INTERIOR {
            off_mesh_vertex_base.push(Some(vertices.len() as u32));
            vertices.push(connection.start);
            vertices.push(connection.end);
        } else {
            off_mesh_vertex_base.push(None);
        }
    }

    let mut polygons: Vec<TilePolygon> = mesh
        .polygons
        .iter()
        .enumerate()
        .map(|(idx, polygon)| {
            let count = polygon.vertex_count();
            TilePolygon {
                vertices: polygon.vertices[..count].to_vec(),
                neighbors: polygon.edges.iter().map(|&e| encode_neighbor(e)).collect(),
                flags: mesh.flags.get(idx).copied().unwrap_or_default(),
                area: mesh.areas.get(idx).copied().unwrap_or_default(),
                kind: PolygonKind::Ground,
            }
        })
        .collect();

    let off_mesh_base = polygons.len() as u32;
    let mut off_mesh_tile_connections = Vec::with_capacity(stored_off_mesh_con_count as usize);
    for (idx, connection) in off_mesh_connections.iter().enumerate() {
        let Some(vert_base) = off_mesh_vertex_base[idx] else {
            continue;
        };
        let poly_index = polygons.len() as u32;
        polygons.push(TilePolygon {
            vertices: vec![vert_base as u16, (vert_base + 1) as u16],
            neighbors: vec![0, 0],
            flags: connection.flags,
            area: connection.area,
            kind: PolygonKind::OffMeshConnection,
        });
        off_mesh_tile_connections.push(TileOffMeshConnection {
            start_vertex: vert_base,
            end_vertex: vert_base + 1,
            radius: connection.radius,
            bidirectional: connection.bidirectional,
            flags: connection.flags,
            area: connection.area,
            user_id: connection.user_id,
            poly_index,
        });
    }

    let (detail_meshes, detail_vertices, detail_triangles) = match detail {
        Some(detail) => pack_provided_detail(detail, &mesh.polygons),
        None => pack_fallback_detail(&mesh.polygons),
    };

    let bv_nodes = if config.build_bv_tree {
        bv_tree::build_bv_tree(&mesh.polygons, &mesh.vertices, cell_size, cell_height)
    } else {
        Vec::new()
    };

    let header = NavMeshTileHeader {
        tile_x: config.tile_x,
        tile_y: config.tile_y,
        tile_layer: config.tile_layer,
        user_id: config.user_id,
        poly_count: polygons.len() as u32,
        vert_count: grid_vertex_count,
        max_link_count,
        aabb,
        detail_mesh_count: detail_meshes.len() as u32,
        detail_vert_count: detail_vertices.len() as u32,
        detail_tri_count: detail_triangles.len() as u32,
        bv_quant_factor: 1.0 / cell_size,
        off_mesh_base,
        off_mesh_con_count: stored_off_mesh_con_count,
        bv_node_count: if config.build_bv_tree {
            mesh.polygons.len() as u32 * 2
        } else {
            0
        },
        walkable_height: config.walkable_height,
        walkable_radius: config.walkable_radius,
        walkable_climb: config.walkable_climb,
    };

    Ok(NavMeshTile {
        header,
        vertices,
        polygons,
        detail_meshes,
        detail_vertices,
        detail_triangles,
        bv_nodes,
        off_mesh_connections: off_mesh_tile_connections,
    })
}

fn pack_vertices(mesh: &PolygonMesh, aabb: &Aabb3d, cell_size: f32, cell_height: f32) -> Vec<Vec3A> {
    mesh.vertices
        .iter()
        .map(|v| {
            Vec3A::new(
                aabb.min.x + v.x as f32 * cell_size,
                aabb.min.y + v.y as f32 * cell_height,
                aabb.min.z + v.z as f32 * cell_size,
            )
        })
        .collect()
}

fn encode_neighbor(edge: PolygonEdge) -> u16 {
    match edge {
        PolygonEdge::Neighbor(n) => n + 1,
        PolygonEdge::Boundary(15) => 0,
        PolygonEdge::Boundary(0) => EXT_LINK | 4,
        PolygonEdge::Boundary(1) => EXT_LINK | 2,
        PolygonEdge::Boundary(2) => EXT_LINK | 0,
        PolygonEdge::Boundary(3) => EXT_LINK | 6,
        PolygonEdge::Boundary(other) => {
            tracing::warn!(direction = other, "boundary edge has no portal-side mapping; treating as non-portal");
            0
        }
    }
}

fn pack_provided_detail(
    detail: &DetailMeshInput,
    polygons: &[Polygon],
) -> (Vec<TileDetailMesh>, Vec<Vec3A>, Vec<DetailTriangle>) {
    let mut sub_meshes = Vec::with_capacity(polygons.len());
    let mut vertices = Vec::new();
    let mut triangles = Vec::new();

    for (poly_idx, polygon) in polygons.iter().enumerate() {
        let poly_vert_count = polygon.vertex_count() as u32;
        let Some(input_sub) = detail.sub_meshes.get(poly_idx) else {
            sub_meshes.push(TileDetailMesh::default());
            continue;
        };
        let extra_vert_count = input_sub.vert_count.saturating_sub(poly_vert_count);

        let vert_base = vertices.len() as u32;
        for k in 0..extra_vert_count {
            let src_index = (input_sub.vert_base + poly_vert_count + k) as usize;
            vertices.push(detail.vertices[src_index]);
        }

        let tri_base = triangles.len() as u32;
        for k in 0..input_sub.tri_count {
            triangles.push(detail.triangles[(input_sub.tri_base + k) as usize]);
        }

        sub_meshes.push(TileDetailMesh {
            vert_base,
            vert_count: extra_vert_count,
            tri_base,
            tri_count: input_sub.tri_count,
        });
    }

    (sub_meshes, vertices, triangles)
}

/// Trivial fan triangulation from vertex 0, used when no detail mesh is
/// supplied. Edge-boundary bits: the `(j-1, j)` edge is always a genuine
/// polygon edge (bit 2); the leading `(0, 1)` edge is one too, but only for
/// the first triangle (bit 0, `j == 2`); the closing `(n-1, 0)` edge is one
/// too, but only for the last triangle (bit 4, `j == vertex_count - 1`).
fn fan_triangulate(vertex_count: usize) -> Vec<DetailTriangle> {
    if vertex_count < 3 {
        return Vec::new();
    }
    let mut triangles = Vec::with_capacity(vertex_count - 2);
    for j in 2..vertex_count {
        let mut flags = 1u8 << 2;
        if j == 2 {
            flags |= 1 << 0;
        }
        if j == vertex_count - 1 {
            flags |= 1 << 4;
        }
        triangles.push(DetailTriangle {
            indices: [0, (j - 1) as u8, j as u8],
            flags,
        });
    }
    triangles
}

fn pack_fallback_detail(polygons: &[Polygon]) -> (Vec<TileDetailMesh>, Vec<Vec3A>, Vec<DetailTriangle>) {
    let mut sub_meshes = Vec::with_capacity(polygons.len());
    let mut triangles = Vec::new();
    for polygon in polygons {
        let tri_base = triangles.len() as u32;
        let tris = fan_triangulate(polygon.vertex_count());
        let tri_count = tris.len() as u32;
        triangles.extend(tris);
        sub_meshes.push(TileDetailMesh {
            vert_base: 0,
            vert_count: 0,
            tri_base,
            tri_count,
        });
    }
    (sub_meshes, Vec::new(), triangles)
}
