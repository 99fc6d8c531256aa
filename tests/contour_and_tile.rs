//! End-to-end coverage of contour extraction and tile assembly, built from
//! synthetic heightfields and polygon meshes rather than golden fixtures.

use glam::{U16Vec3, Vec3A};
use recast_navtile::prelude::*;

fn flat_region(width: u16, depth: u16, region: u16) -> CompactHeightfield {
    let mut spans = Vec::new();
    let mut cells = Vec::new();
    for z in 0..depth {
        for x in 0..width {
            let mut span = CompactSpan::new(0, RegionId::from(region));
            for dir in 0..4u8 {
                let (dx, dz) = match dir {
                    0 => (-1, 0),
                    1 => (0, 1),
                    2 => (1, 0),
                    _ => (0, -1),
                };
                let nx = x as i32 + dx;
                let nz = z as i32 + dz;
                if nx >= 0 && nx < width as i32 && nz >= 0 && nz < depth as i32 {
                    span.set_con(dir, Some(0));
                }
            }
            cells.push(CompactCell::new(spans.len() as u32, 1));
            spans.push(span);
        }
    }
    let areas = vec![AreaType::WALKABLE; spans.len()];
    CompactHeightfield {
        width,
        height: depth,
        border_size: 0,
        cell_size: 1.0,
        cell_height: 1.0,
        aabb: Aabb3d::new([0.0, 0.0, 0.0], [width as f32, 1.0, depth as f32]),
        max_regions: RegionId::from(region),
        cells,
        spans,
        areas,
    }
}

#[test]
fn build_contours_traces_a_single_rectangular_region() {
    let chf = flat_region(6, 3, 1);
    let set = chf.build_contours(&ContourBuildConfig::default());
    assert_eq!(set.contours.len(), 1);
    let contour = &set.contours[0];
    assert_eq!(contour.vertices.len(), 4);
    assert_eq!(contour.region, RegionId::from(1));
    assert!(contour.signed_area() > 0);
}

#[test]
fn build_contours_applies_border_offset() {
    let mut chf = flat_region(6, 6, 1);
    chf.border_size = 1;
    let set = chf.build_contours(&ContourBuildConfig::default());
    assert_eq!(set.width, 4);
    assert_eq!(set.height, 4);
    // Every traced vertex should land within the shrunk logical grid.
    for contour in &set.contours {
        for v in &contour.vertices {
            assert!(v.x >= 0 && v.x <= set.width as i32);
            assert!(v.z >= 0 && v.z <= set.height as i32);
        }
    }
}

#[test]
fn empty_heightfield_yields_no_contours() {
    let chf = CompactHeightfield {
        width: 0,
        height: 0,
        border_size: 0,
        cell_size: 1.0,
        cell_height: 1.0,
        aabb: Aabb3d::default(),
        max_regions: RegionId::NONE,
        cells: Vec::new(),
        spans: Vec::new(),
        areas: Vec::new(),
    };
    let set = chf.build_contours(&ContourBuildConfig::default());
    assert!(set.contours.is_empty());
}

/// A `size_x` by `size_z` grid of region `region`, with one cell optionally
/// carved out (given [`RegionId::NONE`]) to create a notch (if the carved
/// cell touches the grid edge) or an enclosed hole (if it doesn't).
fn region_with_hole(size_x: u16, size_z: u16, hole: Option<(u16, u16)>, region: u16) -> CompactHeightfield {
    let mut spans = Vec::new();
    let mut cells = Vec::new();
    for z in 0..size_z {
        for x in 0..size_x {
            let region_id = if hole == Some((x, z)) {
                RegionId::NONE
            } else {
                RegionId::from(region)
            };
            let mut span = CompactSpan::new(0, region_id);
            for dir in 0..4u8 {
                let (dx, dz) = match dir {
                    0 => (-1, 0),
                    1 => (0, 1),
                    2 => (1, 0),
                    _ => (0, -1),
                };
                let nx = x as i32 + dx;
                let nz = z as i32 + dz;
                if nx >= 0 && nx < size_x as i32 && nz >= 0 && nz < size_z as i32 {
                    span.set_con(dir, Some(0));
                }
            }
            cells.push(CompactCell::new(spans.len() as u32, 1));
            spans.push(span);
        }
    }
    let areas = vec![AreaType::WALKABLE; spans.len()];
    CompactHeightfield {
        width: size_x,
        height: size_z,
        border_size: 0,
        cell_size: 1.0,
        cell_height: 1.0,
        aabb: Aabb3d::new([0.0, 0.0, 0.0], [size_x as f32, 1.0, size_z as f32]),
        max_regions: RegionId::from(region),
        cells,
        spans,
        areas,
    }
}

#[test]
fn build_contours_traces_single_cell_notch_as_six_vertices() {
    // A 2x2 footprint missing its (1, 1) corner cell: an L-tromino whose
    // notch touches the grid edge, so it is one contour, not a hole.
    let chf = region_with_hole(2, 2, Some((1, 1)), 1);
    let set = chf.build_contours(&ContourBuildConfig::default());
    assert_eq!(set.contours.len(), 1);
    let contour = &set.contours[0];
    assert_eq!(contour.vertices.len(), 6);
    assert!(contour.signed_area() > 0);
}

#[test]
fn build_contours_merges_annulus_hole_into_outer() {
    // A 5x5 footprint missing only its centred (2, 2) cell: the missing cell
    // touches no grid edge, so it traces as a separate hole contour that
    // `build_contours` must merge back into the outer one.
    let chf = region_with_hole(5, 5, Some((2, 2)), 1);
    let set = chf.build_contours(&ContourBuildConfig::default());
    assert_eq!(set.contours.len(), 1);
    let contour = &set.contours[0];
    assert_eq!(contour.region, RegionId::from(1));
    assert!(contour.signed_area() > 0);
    // Outer square (4 vertices) + inner hole square (4 vertices) + the 2
    // duplicated seam vertices the bridge splice introduces.
    assert_eq!(contour.vertices.len(), 4 + 4 + 2);
}

#[test]
fn build_contours_splits_long_wall_edge_by_max_edge_len() {
    let chf = flat_region(32, 1, 1);

    let split = chf.build_contours(&ContourBuildConfig {
        max_error: 1.3,
        max_edge_len: 8,
        flags: BuildContoursFlags::TESS_WALL_EDGES,
    });
    assert_eq!(split.contours.len(), 1);
    // Each 32-cell wall (top and bottom of this 32x1 strip) splits into
    // 32 / 8 = 4 segments, adding 3 extra vertices per wall to the 4 corners.
    assert_eq!(split.contours[0].vertices.len(), 4 + 3 + 3);

    let unsplit = chf.build_contours(&ContourBuildConfig {
        max_error: 1.3,
        max_edge_len: 0,
        flags: BuildContoursFlags::TESS_WALL_EDGES,
    });
    assert_eq!(unsplit.contours[0].vertices.len(), 4);
}

fn unit_square_polygon_mesh() -> PolygonMesh {
    PolygonMesh {
        vertices: vec![
            U16Vec3::new(0, 0, 0),
            U16Vec3::new(0, 0, 4),
            U16Vec3::new(4, 0, 4),
            U16Vec3::new(4, 0, 0),
        ],
        polygons: vec![Polygon {
            vertices: vec![0, 1, 2, 3],
            edges: vec![
                PolygonEdge::Boundary(0),
                PolygonEdge::Boundary(1),
                PolygonEdge::Boundary(2),
                PolygonEdge::Boundary(3),
            ],
        }],
        flags: vec![1],
        areas: vec![AreaType::WALKABLE],
        max_vertices_per_polygon: 4,
    }
}

#[test]
fn build_tile_assembles_ground_polygon_with_fallback_detail() {
    let mesh = unit_square_polygon_mesh();
    let aabb = Aabb3d::new([0.0, 0.0, 0.0], [4.0, 1.0, 4.0]);
    let tile = build_tile(&mesh, None, &[], aabb, 1.0, 1.0, &TileBuildConfig::default()).unwrap();

    assert_eq!(tile.header.poly_count, 1);
    assert_eq!(tile.header.vert_count, 4);
    assert_eq!(tile.polygons[0].kind, PolygonKind::Ground);
    assert_eq!(tile.detail_meshes.len(), 1);
    assert_eq!(tile.detail_triangles.len(), 2);
    // A BV tree over a single polygon is a single leaf node.
    assert_eq!(tile.bv_nodes.len(), 1);
}

#[test]
fn build_tile_links_interior_off_mesh_connection_and_skips_exterior_one() {
    let mesh = unit_square_polygon_mesh();
    let aabb = Aabb3d::new([0.0, 0.0, 0.0], [4.0, 1.0, 4.0]);
    let connections = vec![
        OffMeshConnection {
            start: Vec3A::new(1.0, 0.0, 1.0),
            end: Vec3A::new(10.0, 0.0, 10.0),
            radius: 0.5,
            bidirectional: true,
            flags: 1,
            area: AreaType::WALKABLE,
            user_id: 42,
        },
        OffMeshConnection {
            start: Vec3A::new(10.0, 0.0, 1.0),
            end: Vec3A::new(1.0, 0.0, 1.0),
            radius: 0.5,
            bidirectional: false,
            flags: 1,
            area: AreaType::WALKABLE,
            user_id: 43,
        },
    ];

    let tile = build_tile(
        &mesh,
        None,
        &connections,
        aabb,
        1.0,
        1.0,
        &TileBuildConfig::default(),
    )
    .unwrap();

    // Only the connection starting inside the tile gets a stored polygon.
    assert_eq!(tile.header.off_mesh_con_count, 1);
    assert_eq!(tile.off_mesh_connections.len(), 1);
    assert_eq!(tile.off_mesh_connections[0].user_id, 42);
    assert_eq!(tile.polygons.len(), 2);
    assert_eq!(tile.polygons[1].kind, PolygonKind::OffMeshConnection);
    // Its endpoints were appended after the four grid vertices.
    assert_eq!(tile.off_mesh_connections[0].start_vertex, 4);
    assert_eq!(tile.off_mesh_connections[0].end_vertex, 5);
    assert_eq!(tile.vertices.len(), 6);
}

#[test]
fn build_tile_rejects_empty_polygon_mesh() {
    let mesh = PolygonMesh::default();
    let aabb = Aabb3d::default();
    let result = build_tile(&mesh, None, &[], aabb, 1.0, 1.0, &TileBuildConfig::default());
    assert_eq!(result, Err(TileBuildError::EmptyPolygons));
}
