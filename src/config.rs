//! Tile assembly configuration.
//!
//! [`crate::contours::ContourBuildConfig`] lives next to the contour
//! simplifier it configures; this module holds the tile assembler's
//! configuration, which has no field interdependencies worth a builder.

/// Configuration for [`crate::tile::build_tile`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct TileBuildConfig {
    /// The agent height used for pathfinding queries against this tile, in
    /// world units. Stored in the tile header; not enforced during assembly.
    pub walkable_height: u16,
    /// The agent radius used for pathfinding queries against this tile, in
    /// world units. Stored in the tile header; not enforced during assembly.
    pub walkable_radius: u16,
    /// The maximum ledge an agent can climb, in world units. Stored in the
    /// tile header; not enforced during assembly.
    pub walkable_climb: u16,
    /// Whether to build a [`crate::bv_tree::BvNode`] hierarchy over the
    /// tile's polygons.
    pub build_bv_tree: bool,
    /// The tile's x coordinate in the owning tile grid.
    pub tile_x: i32,
    /// The tile's y coordinate in the owning tile grid.
    pub tile_y: i32,
    /// The tile's layer, for stacked tiles at the same (x, y).
    pub tile_layer: i32,
    /// An opaque identifier for the tile, for the caller's own bookkeeping.
    pub user_id: u32,
}

impl Default for TileBuildConfig {
    fn default() -> Self {
        Self {
            walkable_height: 2,
            walkable_radius: 0,
            walkable_climb: 0,
            build_bv_tree: true,
            tile_x: 0,
            tile_y: 0,
            tile_layer: 0,
            user_id: 0,
        }
    }
}
