//! Small math primitives shared across contour extraction and tile assembly.
//!
//! Vectors come straight from `glam`; the bounding boxes are thin wrappers
//! this crate owns because it needs `from_verts` and voxel-space rescaling,
//! not a full computational geometry stack.

use glam::{Vec2, Vec3A};

/// Gets the standard width (x-axis) offset for the specified direction.
/// `[Limits: 0 <= value < 4]`
#[inline]
pub(crate) fn dir_offset_x(direction: u8) -> i32 {
    const OFFSET: [i32; 4] = [-1, 0, 1, 0];
    OFFSET[direction as usize & 0x03]
}

/// Gets the standard height (z-axis) offset for the specified direction.
/// `[Limits: 0 <= value < 4]`
#[inline]
pub(crate) fn dir_offset_z(direction: u8) -> i32 {
    const OFFSET: [i32; 4] = [0, 1, 0, -1];
    OFFSET[direction as usize & 0x03]
}

/// An axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb3d {
    /// The minimum corner of the box.
    pub min: Vec3A,
    /// The maximum corner of the box.
    pub max: Vec3A,
}

impl Aabb3d {
    /// Creates a new AABB from a min and max corner. Does not validate that
    /// `min <= max` component-wise.
    pub fn new(min: impl Into<Vec3A>, max: impl Into<Vec3A>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Computes the bounding box enclosing a slice of vertices.
    /// Returns `None` if `vertices` is empty.
    pub fn from_verts(vertices: &[Vec3A]) -> Option<Self> {
        let mut iter = vertices.iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), &v| (min.min(v), max.max(v)));
        Some(Self { min, max })
    }

    /// Returns whether `point` lies within the box on all three axes
    /// (inclusive of the boundary).
    pub fn contains_point(&self, point: Vec3A) -> bool {
        (self.min.cmple(point) & point.cmple(self.max)).all()
    }
}

/// An axis-aligned bounding box projected onto the xz-plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb2d {
    /// The minimum corner of the box.
    pub min: Vec2,
    /// The maximum corner of the box.
    pub max: Vec2,
}

impl Aabb2d {
    /// Creates a new 2D AABB from a min and max corner.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_verts_empty_is_none() {
        assert_eq!(Aabb3d::from_verts(&[]), None);
    }

    #[test]
    fn from_verts_computes_bounds() {
        let verts = [
            Vec3A::new(1.0, 5.0, -2.0),
            Vec3A::new(-1.0, 2.0, 4.0),
            Vec3A::new(0.0, 9.0, 0.0),
        ];
        let aabb = Aabb3d::from_verts(&verts).unwrap();
        assert_eq!(aabb.min, Vec3A::new(-1.0, 2.0, -2.0));
        assert_eq!(aabb.max, Vec3A::new(1.0, 9.0, 4.0));
    }

    #[test]
    fn dir_offsets_are_cardinal() {
        assert_eq!((dir_offset_x(0), dir_offset_z(0)), (-1, 0));
        assert_eq!((dir_offset_x(1), dir_offset_z(1)), (0, 1));
        assert_eq!((dir_offset_x(2), dir_offset_z(2)), (1, 0));
        assert_eq!((dir_offset_x(3), dir_offset_z(3)), (0, -1));
    }
}
