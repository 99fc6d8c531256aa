//! The area type tag attached to a [`CompactSpan`](crate::CompactSpan).

/// An identifier for the area type of a span.
///
/// The value 0 ([`AreaType::NOT_WALKABLE`]) is reserved. All other values,
/// including [`AreaType::WALKABLE`], are walkable; the remaining ids are
/// free for callers to assign their own per-area costs (grass, road, water, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct AreaType(pub u8);

impl From<u8> for AreaType {
    fn from(value: u8) -> Self {
        AreaType(value)
    }
}

impl AreaType {
    /// Triangles/spans with this area type are not walkable.
    pub const NOT_WALKABLE: Self = Self(0);
    /// The default area type for walkable geometry with no special meaning.
    pub const WALKABLE: Self = Self(63);

    /// Returns whether the area is walkable, i.e. not [`AreaType::NOT_WALKABLE`].
    #[inline]
    pub fn is_walkable(&self) -> bool {
        *self != Self::NOT_WALKABLE
    }
}
