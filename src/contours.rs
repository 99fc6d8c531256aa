//! Contour extraction: tracing region boundaries on the voxel grid (component A),
//! simplifying them under a deviation bound (component B), merging holes into
//! their enclosing outer contour (component C), and driving A–C over every
//! region to build a [`ContourSet`] (component D).

use crate::{Aabb3d, CompactHeightfield, area::AreaType, region::RegionId};

/// The maximum number of steps the boundary walk in [`CompactHeightfield::build_contours`]
/// will take before abandoning a region's contour. Guards against malformed
/// input producing a trace that never revisits its start.
const MAX_WALK_STEPS: usize = 40_000;

bitflags::bitflags! {
    /// Controls which simplified contour edges get split further when they
    /// exceed [`ContourBuildConfig::max_edge_len`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
    pub struct BuildContoursFlags: u8 {
        /// Tessellate edges bordering unwalkable (wall) space.
        const TESS_WALL_EDGES = 0x1;
        /// Tessellate edges bordering a different area type.
        const TESS_AREA_EDGES = 0x2;
    }
}

impl Default for BuildContoursFlags {
    fn default() -> Self {
        Self::TESS_WALL_EDGES
    }
}

/// Configuration for [`CompactHeightfield::build_contours`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ContourBuildConfig {
    /// The maximum distance a simplified contour's edges may deviate from the
    /// raw traced boundary, in voxel units, squared internally.
    pub max_error: f32,
    /// The maximum length of a simplified contour edge before it gets split.
    /// Zero disables edge splitting.
    pub max_edge_len: u16,
    /// Which edges are eligible for edge-length splitting.
    pub flags: BuildContoursFlags,
}

impl Default for ContourBuildConfig {
    fn default() -> Self {
        Self {
            max_error: 1.3,
            max_edge_len: 0,
            flags: BuildContoursFlags::default(),
        }
    }
}

/// A single contour vertex: position in voxel space, plus a packed flag/region word.
///
/// The word packs three properties for density, matching the external wire
/// format: the low 16 bits hold the neighbouring region's id (including its
/// own [`RegionId::BORDER`] bit), bit 16 is [`ContourVertex::BORDER_VERTEX`],
/// bit 17 is [`ContourVertex::AREA_BORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ContourVertex {
    /// Voxel x coordinate.
    pub x: i32,
    /// Height, in cell-height units.
    pub y: i32,
    /// Voxel z coordinate.
    pub z: i32,
    /// Packed region/flag word. See the type docs for the bit layout.
    pub flags: u32,
}

impl ContourVertex {
    /// Mask over the neighbouring-region-id bits of [`Self::flags`].
    pub const REGION_MASK: u32 = 0xFFFF;
    /// Set when this vertex lies on a special edge that must survive
    /// simplification so tile boundaries continue to match up.
    pub const BORDER_VERTEX: u32 = 0x1_0000;
    /// Set when the vertex sits on a boundary between two different area types.
    pub const AREA_BORDER: u32 = 0x2_0000;

    /// The neighbouring region id encoded in this vertex's flag word.
    pub fn neighbor_region(&self) -> RegionId {
        RegionId::from((self.flags & Self::REGION_MASK) as u16)
    }

    /// Whether this vertex is flagged as a border vertex.
    pub fn is_border_vertex(&self) -> bool {
        self.flags & Self::BORDER_VERTEX != 0
    }

    /// Whether this vertex sits on an area-type transition.
    pub fn is_area_border(&self) -> bool {
        self.flags & Self::AREA_BORDER != 0
    }
}

/// A simple, non-overlapping contour delimiting one region in the xz-plane.
///
/// Invariant: a [`Contour`] appearing in a built [`ContourSet`] always has at
/// least three [`Self::vertices`]; shorter traces are discarded during the
/// build.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Contour {
    /// Simplified contour vertices.
    pub vertices: Vec<ContourVertex>,
    /// The raw, pre-simplification traced vertices.
    pub raw_vertices: Vec<ContourVertex>,
    /// The region this contour encloses.
    pub region: RegionId,
    /// The area type of the region this contour encloses.
    pub area: AreaType,
}

impl Contour {
    /// The contour's signed area in the xz-plane, using an integer-rounded
    /// shoelace formula. Positive for outer contours, negative for holes.
    pub fn signed_area(&self) -> i32 {
        signed_area(&self.vertices)
    }
}

fn signed_area(vertices: &[ContourVertex]) -> i32 {
    let n = vertices.len();
    if n < 3 {
        return 0;
    }
    let mut area: i64 = 0;
    for i in 0..n {
        let prev = if i == 0 { n - 1 } else { i - 1 };
        area +=
            vertices[i].x as i64 * vertices[prev].z as i64 - vertices[prev].x as i64 * vertices[i].z as i64;
    }
    ((area + 1) / 2) as i32
}

/// A group of related contours, one per region, produced by
/// [`CompactHeightfield::build_contours`].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ContourSet {
    /// The contours in the set.
    pub contours: Vec<Contour>,
    /// The AABB of the set, in world space, shrunk by `border_size * cell_size`
    /// on x/z if the source field had a border margin.
    pub aabb: Aabb3d,
    /// The size of each cell on the xz-plane.
    pub cell_size: f32,
    /// The size of each cell along the y-axis.
    pub cell_height: f32,
    /// The logical width of the set (source grid width minus `2 * border_size`).
    pub width: u16,
    /// The logical height of the set (source grid height minus `2 * border_size`).
    pub height: u16,
    /// The border size used to generate the source data.
    pub border_size: u16,
}

impl CompactHeightfield {
    /// Traces, simplifies, and merges region boundaries into a [`ContourSet`].
    ///
    /// Simplified contours are generated such that vertices for portals
    /// between regions or areas are mandatory, so adjacent polygons will
    /// share matching edges once polygonised.
    pub fn build_contours(&self, config: &ContourBuildConfig) -> ContourSet {
        let mut aabb = self.aabb;
        if self.border_size > 0 {
            let pad = self.border_size as f32 * self.cell_size;
            aabb.min.x += pad;
            aabb.min.z += pad;
            aabb.max.x -= pad;
            aabb.max.z -= pad;
        }

        let mut contour_set = ContourSet {
            contours: Vec::new(),
            aabb,
            cell_size: self.cell_size,
            cell_height: self.cell_height,
            width: self.width.saturating_sub(2 * self.border_size),
            height: self.height.saturating_sub(2 * self.border_size),
            border_size: self.border_size,
        };

        let mut flags = self.mark_boundary_edges();

        for z in 0..self.height {
            for x in 0..self.width {
                let cell = self.cell_at(x, z);
                for i in cell.index_range() {
                    if flags[i] == 0 || flags[i] == 0xF {
                        flags[i] = 0;
                        continue;
                    }
                    let region = self.spans[i].region;
                    if region == RegionId::NONE || region.contains(RegionId::BORDER) {
                        continue;
                    }
                    let area = self.areas[i];

                    let Some(raw_vertices) = self.walk_contour(x, z, i, &mut flags) else {
                        tracing::warn!(
                            x,
                            z,
                            region = region.bits(),
                            "contour walk exceeded the iteration cap; abandoning region"
                        );
                        continue;
                    };

                    let mut vertices = simplify_contour(
                        &raw_vertices,
                        config.max_error,
                        config.max_edge_len,
                        config.flags,
                    );
                    remove_degenerate_vertices(&mut vertices);

                    if vertices.len() < 3 {
                        tracing::debug!(
                            region = region.bits(),
                            "discarding contour with fewer than 3 simplified vertices"
                        );
                        continue;
                    }

                    contour_set.contours.push(Contour {
                        vertices,
                        raw_vertices,
                        region,
                        area,
                    });
                }
            }
        }

        merge_holes(&mut contour_set.contours);

        if self.border_size > 0 {
            let offset = self.border_size as i32;
            for contour in &mut contour_set.contours {
                for v in contour
                    .vertices
                    .iter_mut()
                    .chain(contour.raw_vertices.iter_mut())
                {
                    v.x -= offset;
                    v.z -= offset;
                }
            }
        }

        contour_set
    }

    /// Precomputes, per span, a 4-bit nibble whose set bits mark boundary
    /// (non-matching-region) edges. Spans with no region, border-region
    /// spans, and spans whose nibble ends up all-interior or all-boundary
    /// are left at `0` (interior/border-only, nothing to trace).
    fn mark_boundary_edges(&self) -> Vec<u8> {
        let mut flags = vec![0u8; self.spans.len()];
        for z in 0..self.height {
            for x in 0..self.width {
                let cell = self.cell_at(x, z);
                for i in cell.index_range() {
                    let span = &self.spans[i];
                    if span.region == RegionId::NONE || span.region.contains(RegionId::BORDER) {
                        continue;
                    }
                    let mut internal_edges = 0u8;
                    for dir in 0..4u8 {
                        let mut neighbor_region = RegionId::NONE;
                        if let Some(con) = span.con(dir) {
                            let (_, _, a_i) = self.con_indices(x as i32, z as i32, dir, con);
                            neighbor_region = self.spans[a_i].region;
                        }
                        if neighbor_region == span.region {
                            internal_edges |= 1 << dir;
                        }
                    }
                    flags[i] = internal_edges ^ 0xF;
                }
            }
        }
        flags
    }

    /// Traces the raw boundary polyline for the region containing span `i`
    /// at `(x, z)`, consuming boundary-edge bits out of `flags` as it goes.
    /// Returns `None` if the trace exceeds [`MAX_WALK_STEPS`] without
    /// revisiting its start, or follows a direction with no connection;
    /// both signs of a malformed region trace.
    fn walk_contour(
        &self,
        mut x: u16,
        mut z: u16,
        mut i: usize,
        flags: &mut [u8],
    ) -> Option<Vec<ContourVertex>> {
        let mut dir = 0u8;
        while flags[i] & (1 << dir) == 0 {
            dir += 1;
        }
        let start_i = i;
        let start_dir = dir;
        let area = self.areas[i];
        let mut points = Vec::new();

        for _ in 0..MAX_WALK_STEPS {
            if flags[i] & (1 << dir) != 0 {
                let (height, is_border_vertex) = self.corner_height_and_border(x, z, i, dir);

                let mut px = x as i32;
                let mut pz = z as i32;
                match dir {
                    0 => pz += 1,
                    1 => {
                        px += 1;
                        pz += 1;
                    }
                    2 => px += 1,
                    _ => {}
                }

                let span = &self.spans[i];
                let mut word = 0u32;
                if let Some(con) = span.con(dir) {
                    let (_, _, a_i) = self.con_indices(x as i32, z as i32, dir, con);
                    word = self.spans[a_i].region.bits() as u32;
                    if self.areas[a_i] != area {
                        word |= ContourVertex::AREA_BORDER;
                    }
                }
                if is_border_vertex {
                    word |= ContourVertex::BORDER_VERTEX;
                }

                points.push(ContourVertex {
                    x: px,
                    y: height as i32,
                    z: pz,
                    flags: word,
                });

                flags[i] &= !(1 << dir);
                dir = (dir + 1) & 0x3;
            } else {
                let span = &self.spans[i];
                let Some(con) = span.con(dir) else {
                    // A consistent boundary trace never follows an
                    // unconnected direction; treat it the same as exceeding
                    // the step cap and abandon the region.
                    return None;
                };
                let (nx, nz, n_i) = self.con_indices(x as i32, z as i32, dir, con);
                x = nx as u16;
                z = nz as u16;
                i = n_i;
                dir = (dir + 3) & 0x3;
            }

            if i == start_i && dir == start_dir {
                return Some(points);
            }
        }
        None
    }

    /// Computes the lifted corner height for the vertex emitted when walking
    /// edge `dir` of span `i` at `(x, z)`, and whether that corner satisfies
    /// the border-vertex predicate (a rotation-invariant check over the four
    /// spans meeting at the corner).
    fn corner_height_and_border(&self, x: u16, z: u16, i: usize, dir: u8) -> (u16, bool) {
        let span = &self.spans[i];
        let dir_next = (dir + 1) & 0x3;

        let code = |i: usize| -> u32 { self.spans[i].region.bits() as u32 | ((self.areas[i].0 as u32) << 16) };

        let mut height = span.y;
        let mut regs = [0u32; 4];
        regs[0] = code(i);

        if let Some(con) = span.con(dir) {
            let (ax, az, a_i) = self.con_indices(x as i32, z as i32, dir, con);
            height = height.max(self.spans[a_i].y);
            regs[1] = code(a_i);
            if let Some(con2) = self.spans[a_i].con(dir_next) {
                let (_, _, b_i) = self.con_indices(ax, az, dir_next, con2);
                height = height.max(self.spans[b_i].y);
                regs[2] = code(b_i);
            }
        }
        if let Some(con) = span.con(dir_next) {
            let (ax, az, a_i) = self.con_indices(x as i32, z as i32, dir_next, con);
            height = height.max(self.spans[a_i].y);
            regs[3] = code(a_i);
            if let Some(con2) = self.spans[a_i].con(dir) {
                let (_, _, b_i) = self.con_indices(ax, az, dir, con2);
                height = height.max(self.spans[b_i].y);
                regs[2] = code(b_i);
            }
        }

        let border_bit = RegionId::BORDER.bits() as u32;
        let mut is_border_vertex = false;
        for rot in 0..4u8 {
            let a = rot as usize;
            let b = ((rot + 1) & 0x3) as usize;
            let c = ((rot + 2) & 0x3) as usize;
            let d = ((rot + 3) & 0x3) as usize;

            let two_same_exterior = regs[a] == regs[b] && (regs[a] & border_bit) != 0;
            let two_interior = (regs[c] & border_bit) == 0 && (regs[d] & border_bit) == 0;
            let interior_same_area = (regs[c] >> 16) == (regs[d] >> 16);
            let no_zeros = regs[a] != 0 && regs[b] != 0 && regs[c] != 0 && regs[d] != 0;
            if two_same_exterior && two_interior && interior_same_area && no_zeros {
                is_border_vertex = true;
                break;
            }
        }
        (height, is_border_vertex)
    }
}

/// A simplified-contour-in-progress vertex: position plus the raw-trace
/// index it was seeded or inserted from. Kept separate from the final
/// [`ContourVertex`] flag word (which gets rewritten only once, at the end)
/// rather than overloading one field for two purposes across the pass.
#[derive(Debug, Clone, Copy)]
struct WorkingVertex {
    x: i32,
    y: i32,
    z: i32,
    raw_index: usize,
}

fn simplify_contour(
    raw: &[ContourVertex],
    max_error: f32,
    max_edge_len: u16,
    flags: BuildContoursFlags,
) -> Vec<ContourVertex> {
    if raw.is_empty() {
        return Vec::new();
    }
    let mut simplified = seed_vertices(raw);
    deviation_pass(raw, &mut simplified, max_error);
    length_split_pass(raw, &mut simplified, max_edge_len, flags);
    rewrite_flags(raw, &simplified)
}

fn seed_vertices(raw: &[ContourVertex]) -> Vec<WorkingVertex> {
    let n = raw.len();
    let has_connections = raw.iter().any(|v| v.flags & ContourVertex::REGION_MASK != 0);

    let mut seeds = Vec::new();
    if has_connections {
        for i in 0..n {
            let next = (i + 1) % n;
            let region_changed =
                (raw[i].flags & ContourVertex::REGION_MASK) != (raw[next].flags & ContourVertex::REGION_MASK);
            let area_changed =
                (raw[i].flags & ContourVertex::AREA_BORDER) != (raw[next].flags & ContourVertex::AREA_BORDER);
            if region_changed || area_changed {
                seeds.push(WorkingVertex {
                    x: raw[i].x,
                    y: raw[i].y,
                    z: raw[i].z,
                    raw_index: i,
                });
            }
        }
    }

    if seeds.is_empty() {
        // Isolated contour (or, defensively, a connected one where no
        // transition was detected): seed with the lexicographic extremes so
        // the deviation pass below has something to refine from.
        let mut least = 0;
        let mut greatest = 0;
        for i in 1..n {
            if (raw[i].x, raw[i].z) < (raw[least].x, raw[least].z) {
                least = i;
            }
            if (raw[i].x, raw[i].z) > (raw[greatest].x, raw[greatest].z) {
                greatest = i;
            }
        }
        seeds.push(WorkingVertex {
            x: raw[least].x,
            y: raw[least].y,
            z: raw[least].z,
            raw_index: least,
        });
        seeds.push(WorkingVertex {
            x: raw[greatest].x,
            y: raw[greatest].y,
            z: raw[greatest].z,
            raw_index: greatest,
        });
    }
    seeds
}

/// Squared perpendicular distance from `point` to segment `a`-`b`.
fn squared_distance_to_segment(point: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dz = b.1 - a.1;
    let denom = dx * dx + dz * dz;
    let mut t = if denom > 0.0 {
        ((point.0 - a.0) * dx + (point.1 - a.1) * dz) / denom
    } else {
        0.0
    };
    t = t.clamp(0.0, 1.0);
    let cx = a.0 + t * dx - point.0;
    let cz = a.1 + t * dz - point.1;
    cx * cx + cz * cz
}

fn deviation_pass(raw: &[ContourVertex], simplified: &mut Vec<WorkingVertex>, max_error: f32) {
    let n = raw.len();
    if n == 0 || simplified.len() < 2 {
        return;
    }
    let max_error_sq = max_error * max_error;
    let mut i = 0;
    while i < simplified.len() {
        let next = (i + 1) % simplified.len();
        let a = simplified[i];
        let b = simplified[next];

        let (p_lo, p_hi, cinc, start_c, end_c) = if (b.x, b.z) > (a.x, a.z) {
            (a, b, 1usize, (a.raw_index + 1) % n, b.raw_index)
        } else {
            (b, a, n - 1, (b.raw_index + n - 1) % n, a.raw_index)
        };

        let first_raw = &raw[start_c];
        let should_tessellate = (first_raw.flags & ContourVertex::REGION_MASK) == 0
            || (first_raw.flags & ContourVertex::AREA_BORDER) != 0;

        let mut max_dist_sq = 0.0f32;
        let mut max_c = None;
        if should_tessellate {
            let mut c = start_c;
            while c != end_c {
                let point = &raw[c];
                let dist_sq = squared_distance_to_segment(
                    (point.x as f32, point.z as f32),
                    (p_lo.x as f32, p_lo.z as f32),
                    (p_hi.x as f32, p_hi.z as f32),
                );
                if dist_sq > max_dist_sq {
                    max_dist_sq = dist_sq;
                    max_c = Some(c);
                }
                c = (c + cinc) % n;
            }
        }

        match max_c {
            Some(c) if max_dist_sq > max_error_sq => {
                simplified.insert(
                    i + 1,
                    WorkingVertex {
                        x: raw[c].x,
                        y: raw[c].y,
                        z: raw[c].z,
                        raw_index: c,
                    },
                );
                // Do not advance `i`: the newly inserted vertex may itself
                // need further refinement against the (now shorter) edge.
            }
            _ => i += 1,
        }
    }
}

fn length_split_pass(
    raw: &[ContourVertex],
    simplified: &mut Vec<WorkingVertex>,
    max_edge_len: u16,
    flags: BuildContoursFlags,
) {
    if max_edge_len == 0
        || !flags.intersects(BuildContoursFlags::TESS_WALL_EDGES | BuildContoursFlags::TESS_AREA_EDGES)
    {
        return;
    }
    let n = raw.len();
    if n == 0 {
        return;
    }
    let max_edge_len_sq = max_edge_len as i64 * max_edge_len as i64;

    let mut i = 0;
    while i < simplified.len() {
        let next = (i + 1) % simplified.len();
        let a = simplified[i];
        let b = simplified[next];
        let ai = a.raw_index;
        let bi = b.raw_index;

        let forward = (b.x, b.z) > (a.x, a.z);
        let first_index = (ai + 1) % n;
        let first_raw = &raw[first_index];
        let is_wall = (first_raw.flags & ContourVertex::REGION_MASK) == 0;
        let is_area_border = (first_raw.flags & ContourVertex::AREA_BORDER) != 0;
        let should_tessellate = (flags.contains(BuildContoursFlags::TESS_WALL_EDGES) && is_wall)
            || (flags.contains(BuildContoursFlags::TESS_AREA_EDGES) && is_area_border);

        let dx = (b.x - a.x) as i64;
        let dz = (b.z - a.z) as i64;
        let len_sq = dx * dx + dz * dz;
        let n_dist = (bi + n - ai) % n;

        if should_tessellate && len_sq > max_edge_len_sq && n_dist > 1 {
            let mid_index = if forward {
                (ai + n_dist / 2) % n
            } else {
                (ai + (n_dist + 1) / 2) % n
            };
            simplified.insert(
                i + 1,
                WorkingVertex {
                    x: raw[mid_index].x,
                    y: raw[mid_index].y,
                    z: raw[mid_index].z,
                    raw_index: mid_index,
                },
            );
        } else {
            i += 1;
        }
    }
}

fn rewrite_flags(raw: &[ContourVertex], simplified: &[WorkingVertex]) -> Vec<ContourVertex> {
    let len = simplified.len();
    simplified
        .iter()
        .enumerate()
        .map(|(idx, v)| {
            let next = &simplified[(idx + 1) % len];
            let next_raw = &raw[next.raw_index];
            let self_raw = &raw[v.raw_index];
            let word = (next_raw.flags & (ContourVertex::REGION_MASK | ContourVertex::AREA_BORDER))
                | (self_raw.flags & ContourVertex::BORDER_VERTEX);
            ContourVertex {
                x: v.x,
                y: v.y,
                z: v.z,
                flags: word,
            }
        })
        .collect()
}

/// Removes simplified vertices equal on `(x, z)` to their cyclic successor.
/// A single forward scan suffices.
fn remove_degenerate_vertices(vertices: &mut Vec<ContourVertex>) {
    let mut i = 0;
    while i < vertices.len() {
        let next = (i + 1) % vertices.len();
        if vertices[i].x == vertices[next].x && vertices[i].z == vertices[next].z {
            vertices.remove(i);
        }
        i += 1;
    }
}

/// Returns whether `c` lies on or to the left of the directed edge `a -> b`
/// in the xz-plane.
fn is_left_or_on(a: ContourVertex, b: ContourVertex, c: ContourVertex) -> bool {
    let cross = (b.x - a.x) as i64 * (c.z - a.z) as i64 - (c.x - a.x) as i64 * (b.z - a.z) as i64;
    cross <= 0
}

/// Finds the closest mutually visible (outer vertex, hole vertex) pair, using
/// a left-or-on admissibility test against both outer edges meeting at the
/// candidate vertex. Returns `None` if no admissible pair exists.
fn find_bridge(outer: &[ContourVertex], hole: &[ContourVertex]) -> Option<(usize, usize)> {
    let on = outer.len();
    if on == 0 || hole.is_empty() {
        return None;
    }
    let mut best: Option<(usize, usize, i64)> = None;
    for i in 0..on {
        let prev = outer[(i + on - 1) % on];
        let cur = outer[i];
        let next = outer[(i + 1) % on];
        for (j, &hole_vertex) in hole.iter().enumerate() {
            if !is_left_or_on(prev, cur, hole_vertex) || !is_left_or_on(cur, next, hole_vertex) {
                continue;
            }
            let dx = (cur.x - hole_vertex.x) as i64;
            let dz = (cur.z - hole_vertex.z) as i64;
            let dist_sq = dx * dx + dz * dz;
            let is_better = match best {
                None => true,
                Some((_, _, best_dist)) => dist_sq < best_dist,
            };
            if is_better {
                best = Some((i, j, dist_sq));
            }
        }
    }
    best.map(|(i, j, _)| (i, j))
}

/// Builds the merged vertex array for an outer contour absorbing a hole
/// across the bridge `(outer[i], hole[j])`. Both segments re-emit their
/// bridge endpoint (a full lap plus one repeat), producing the two
/// duplicate seam vertices that stitch the hole into the outer boundary.
fn splice_hole(outer: &[ContourVertex], hole: &[ContourVertex], i: usize, j: usize) -> Vec<ContourVertex> {
    let on = outer.len();
    let hn = hole.len();
    let mut result = Vec::with_capacity(on + hn + 2);
    for step in 0..=on {
        result.push(outer[(i + step) % on]);
    }
    for step in 0..=hn {
        result.push(hole[(j + step) % hn]);
    }
    result
}

/// Detects inner (negative-area) contours and splices each into an outer
/// contour sharing its region id, via the closest mutually visible vertex
/// pair. Holes with no admissible bridge are left untouched, and holes with
/// no matching outer are left in the set as-is.
fn merge_holes(contours: &mut Vec<Contour>) {
    let n = contours.len();
    let mut absorbed = Vec::new();

    for hole_idx in 0..n {
        if contours[hole_idx].signed_area() >= 0 {
            continue;
        }
        let region = contours[hole_idx].region;
        let Some(outer_idx) = (0..n).find(|&i| {
            i != hole_idx && contours[i].region == region && contours[i].signed_area() > 0
        }) else {
            tracing::debug!(region = region.bits(), "no outer contour found for hole");
            continue;
        };

        let Some((i, j)) = find_bridge(&contours[outer_idx].vertices, &contours[hole_idx].vertices) else {
            tracing::debug!(
                region = region.bits(),
                "no mutually visible vertex pair found; skipping hole merge"
            );
            continue;
        };

        let merged = splice_hole(&contours[outer_idx].vertices, &contours[hole_idx].vertices, i, j);
        contours[outer_idx].vertices = merged;
        absorbed.push(hole_idx);
    }

    absorbed.sort_unstable();
    for idx in absorbed.into_iter().rev() {
        contours.remove(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompactCell, CompactSpan};

    fn square_region(width: u16, depth: u16) -> CompactHeightfield {
        let mut spans = Vec::new();
        let mut cells = Vec::new();
        for z in 0..depth {
            for x in 0..width {
                let mut span = CompactSpan::new(0, RegionId::from(1));
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
            max_regions: RegionId::from(1),
            cells,
            spans,
            areas,
        }
    }

    #[test]
    fn single_square_region_yields_unit_square_contour() {
        let chf = square_region(4, 4);
        let config = ContourBuildConfig {
            max_error: 1.0,
            max_edge_len: 0,
            flags: BuildContoursFlags::default(),
        };
        let set = chf.build_contours(&config);
        assert_eq!(set.contours.len(), 1);
        let contour = &set.contours[0];
        assert_eq!(contour.vertices.len(), 4);
        assert!(contour.signed_area() > 0);
    }

    #[test]
    fn degenerate_vertex_removal_shrinks_array() {
        let mut verts = vec![
            ContourVertex { x: 0, y: 0, z: 0, flags: 0 },
            ContourVertex { x: 0, y: 0, z: 0, flags: 0 },
            ContourVertex { x: 1, y: 0, z: 0, flags: 0 },
            ContourVertex { x: 1, y: 0, z: 1, flags: 0 },
        ];
        remove_degenerate_vertices(&mut verts);
        assert_eq!(verts.len(), 3);
    }

    #[test]
    fn find_bridge_picks_closest_admissible_pair() {
        // A 4x4 outer square (CCW) with a single hole point straight in the
        // middle-ish, admissible against the bottom edge.
        let outer = vec![
            ContourVertex { x: 0, y: 0, z: 0, flags: 0 },
            ContourVertex { x: 0, y: 0, z: 4, flags: 0 },
            ContourVertex { x: 4, y: 0, z: 4, flags: 0 },
            ContourVertex { x: 4, y: 0, z: 0, flags: 0 },
        ];
        let hole = vec![
            ContourVertex { x: 1, y: 0, z: 1, flags: 0 },
            ContourVertex { x: 1, y: 0, z: 2, flags: 0 },
            ContourVertex { x: 2, y: 0, z: 2, flags: 0 },
            ContourVertex { x: 2, y: 0, z: 1, flags: 0 },
        ];
        let bridge = find_bridge(&outer, &hole);
        assert!(bridge.is_some());
    }

    #[test]
    fn splice_hole_produces_two_extra_seam_vertices() {
        let outer = vec![
            ContourVertex { x: 0, y: 0, z: 0, flags: 0 },
            ContourVertex { x: 0, y: 0, z: 4, flags: 0 },
            ContourVertex { x: 4, y: 0, z: 4, flags: 0 },
            ContourVertex { x: 4, y: 0, z: 0, flags: 0 },
        ];
        let hole = vec![
            ContourVertex { x: 1, y: 0, z: 1, flags: 0 },
            ContourVertex { x: 1, y: 0, z: 2, flags: 0 },
            ContourVertex { x: 2, y: 0, z: 2, flags: 0 },
            ContourVertex { x: 2, y: 0, z: 1, flags: 0 },
        ];
        let merged = splice_hole(&outer, &hole, 0, 0);
        assert_eq!(merged.len(), outer.len() + hole.len() + 2);
        assert_eq!(merged.first(), merged.get(outer.len()));
        assert_eq!(merged.get(outer.len() + 1), merged.last());
    }

    #[test]
    fn squared_distance_matches_known_point() {
        let dist = squared_distance_to_segment((0.0, 1.0), (0.0, 0.0), (2.0, 0.0));
        approx::assert_relative_eq!(dist, 1.0);
    }
}
