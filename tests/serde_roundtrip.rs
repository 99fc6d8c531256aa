//! Serialization round-trips for the `serialize` feature, mirroring the
//! teacher's use of `serde_json` in its own comparison tests.
#![cfg(feature = "serialize")]

use glam::U16Vec3;
use recast_navtile::prelude::*;

fn unit_square_mesh() -> PolygonMesh {
    PolygonMesh {
        vertices: vec![
            U16Vec3::new(0, 0, 0),
            U16Vec3::new(0, 0, 1),
            U16Vec3::new(1, 0, 1),
            U16Vec3::new(1, 0, 0),
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
fn nav_mesh_tile_round_trips_through_json() {
    let mesh = unit_square_mesh();
    let aabb = Aabb3d::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let tile = build_tile(&mesh, None, &[], aabb, 1.0, 1.0, &TileBuildConfig::default()).unwrap();

    let json = serde_json::to_string(&tile).expect("tile should serialize");
    let round_tripped: NavMeshTile = serde_json::from_str(&json).expect("tile should deserialize");

    assert_eq!(tile, round_tripped);
}

#[test]
fn contour_vertex_round_trips_through_json() {
    let vertex = ContourVertex {
        x: 3,
        y: 7,
        z: -2,
        flags: ContourVertex::BORDER_VERTEX | ContourVertex::AREA_BORDER | 42,
    };

    let json = serde_json::to_string(&vertex).unwrap();
    let round_tripped: ContourVertex = serde_json::from_str(&json).unwrap();

    assert_eq!(vertex, round_tripped);
}
