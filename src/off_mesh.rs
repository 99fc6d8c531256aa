//! Off-mesh connections: explicit, non-grid links between two world points
//! (teleporters, jumps, ladders), and their classification against a tile's
//! bounds (component E).

use glam::Vec3A;

use crate::{Aabb3d, area::AreaType};

/// An explicit link between two world points, attached to a tile as a
/// 2-vertex degenerate polygon once assembled.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct OffMeshConnection {
    /// The connection's start point, in world space.
    pub start: Vec3A,
    /// The connection's end point, in world space.
    pub end: Vec3A,
    /// The radius around each endpoint within which the connection may be used.
    pub radius: f32,
    /// Whether the connection can be traversed start-to-end and end-to-start.
    pub bidirectional: bool,
    /// User-defined traversal flags, copied onto the resulting polygon.
    pub flags: u16,
    /// The area type, copied onto the resulting polygon.
    pub area: AreaType,
    /// An opaque identifier for the connection, for the caller's own bookkeeping.
    pub user_id: u32,
}

/// Interior classification: the endpoint lies strictly inside the tile on
/// both the x and z axes.
pub const INTERIOR: u8 = 255;

/// Classifies `point` against tile AABB `aabb`, returning a 9-region
/// outcode: one of the 8 side/corner codes in `0..=7`, or [`INTERIOR`].
///
/// A point whose height falls outside `[aabb.min.y, aabb.max.y]` is always
/// reclassified `0`, even if its x/z position would otherwise be interior.
pub fn classify_endpoint(point: Vec3A, aabb: &Aabb3d) -> u8 {
    let plus_x = point.x >= aabb.max.x;
    let plus_z = point.z >= aabb.max.z;
    let minus_x = point.x < aabb.min.x;
    let minus_z = point.z < aabb.min.z;

    let xz_code = match (plus_x, plus_z, minus_x, minus_z) {
        (true, false, false, false) => 0,
        (true, true, false, false) => 1,
        (false, true, false, false) => 2,
        (false, true, true, false) => 3,
        (false, false, true, false) => 4,
        (false, false, true, true) => 5,
        (false, false, false, true) => 6,
        (true, false, false, true) => 7,
        _ => INTERIOR,
    };

    if point.y < aabb.min.y || point.y > aabb.max.y {
        0
    } else {
        xz_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aabb() -> Aabb3d {
        Aabb3d::new([0.0, 0.0, 0.0], [10.0, 10.0, 10.0])
    }

    #[test]
    fn corners_and_sides_match_outcode_table() {
        assert_eq!(classify_endpoint(Vec3A::new(10.0, 5.0, 5.0), &aabb()), 0);
        assert_eq!(classify_endpoint(Vec3A::new(10.0, 5.0, 10.0), &aabb()), 1);
        assert_eq!(classify_endpoint(Vec3A::new(5.0, 5.0, 10.0), &aabb()), 2);
        assert_eq!(classify_endpoint(Vec3A::new(-1.0, 5.0, -1.0), &aabb()), 5);
    }

    #[test]
    fn strictly_interior_point_is_interior() {
        assert_eq!(classify_endpoint(Vec3A::new(5.0, 5.0, 5.0), &aabb()), INTERIOR);
    }

    #[test]
    fn out_of_height_range_is_rejected_even_if_interior() {
        assert_eq!(classify_endpoint(Vec3A::new(5.0, 11.0, 5.0), &aabb()), 0);
    }
}
