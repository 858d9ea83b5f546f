//! Uniform spatial hash lookup for radius queries over a moving point set.
//!
//! Uses sorted-entry + bucket-start arrays rather than a `HashMap`: the
//! structure is rebuilt wholesale every tick, so both flat buffers are reused
//! across rebuilds and the incremental-rehash machinery of a general map
//! would be wasted. Cell coordinates are signed and unbounded, so the grid
//! covers all of 2D space without a configured domain box.

use glam::{IVec2, Vec2};

/// Multipliers for the two cell-coordinate components. Distinct large odd
/// constants decorrelate the x/y contributions; arithmetic is `u32` with
/// deliberate wraparound.
const HASH_K1: u32 = 15823;
const HASH_K2: u32 = 9737333;

/// Sentinel for "no bucket starts at this key". Compares greater than any
/// real entry index, so a bucket walk started from it terminates at once.
const NO_BUCKET: u32 = u32::MAX;

/// Offsets of the 3x3 cell neighborhood scanned by every query.
const CELL_OFFSETS: [IVec2; 9] = [
    IVec2::new(-1, -1),
    IVec2::new(-1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, -1),
    IVec2::new(0, 0),
    IVec2::new(0, 1),
    IVec2::new(1, -1),
    IVec2::new(1, 0),
    IVec2::new(1, 1),
];

#[derive(Debug, Clone, Copy, Default)]
struct LookupEntry {
    particle: u32,
    cell_key: u32,
}

/// Rebuildable spatial hash over a snapshot of particle positions.
///
/// `rebuild` must be called with the current point set before querying;
/// queries run against the snapshot taken at that rebuild. The query radius
/// is the rebuild radius: cell size is derived from it, and the 9-cell scan
/// is only exhaustive for distances up to one cell size.
#[derive(Debug, Default)]
pub struct SpatialLookup {
    /// One entry per particle, sorted by `cell_key` ascending.
    entries: Vec<LookupEntry>,
    /// `start_indices[key]` = first position in `entries` holding `key`,
    /// or `NO_BUCKET` if no particle hashes to `key`.
    start_indices: Vec<u32>,
    /// Snapshot of the point set the current index was built from.
    points: Vec<Vec2>,
    radius: f32,
}

impl SpatialLookup {
    /// Create an empty lookup. Buffers are sized on first `rebuild`.
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)allocate both flat buffers to hold `n` entries. Idempotent.
    pub fn resize(&mut self, n: usize) {
        self.entries.resize(n, LookupEntry::default());
        self.start_indices.resize(n, NO_BUCKET);
    }

    /// The radius the current index was built with.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Rebuild the index from a snapshot of all particle positions.
    ///
    /// `radius` must be positive; it becomes both the grid cell size and the
    /// query radius. The slice is copied into an internal buffer so queries
    /// need no external position array.
    pub fn rebuild(&mut self, points: &[Vec2], radius: f32) {
        debug_assert!(radius > 0.0, "cell size derives from radius; must be positive");
        let n = points.len();
        self.resize(n);
        self.points.clear();
        self.points.extend_from_slice(points);
        self.radius = radius;
        if n == 0 {
            return;
        }

        let table_size = n as u32;
        for (i, &p) in points.iter().enumerate() {
            self.entries[i] = LookupEntry {
                particle: i as u32,
                cell_key: hash_cell(cell_coord(p, radius)) % table_size,
            };
        }

        // Unstable sort is fine: equal keys land in one bucket and the walk
        // below does not depend on order within a bucket.
        self.entries.sort_unstable_by_key(|e| e.cell_key);

        self.start_indices.fill(NO_BUCKET);
        for i in 0..n {
            let key = self.entries[i].cell_key;
            let prev = if i == 0 { NO_BUCKET } else { self.entries[i - 1].cell_key };
            if key != prev {
                self.start_indices[key as usize] = i as u32;
            }
        }
    }

    /// Invoke `f` with the index of every indexed point within the rebuild
    /// radius of `point`.
    ///
    /// The query point itself is included when it is one of the indexed
    /// points; callers that must exclude self do so by index comparison.
    /// Hash collisions can put points from distant cells into the same
    /// bucket, so every candidate is distance-checked before `f` runs.
    pub fn for_each_within<F: FnMut(usize)>(&self, point: Vec2, mut f: F) {
        if self.entries.is_empty() {
            return;
        }
        let center = cell_coord(point, self.radius);
        let sqr_radius = self.radius * self.radius;

        // Distinct neighbor cells can collide onto one key; each bucket must
        // be walked exactly once or its candidates would repeat.
        let mut seen_keys = [0u32; CELL_OFFSETS.len()];
        let mut seen = 0;

        for offset in CELL_OFFSETS {
            let key = self.key_from_hash(hash_cell(center + offset));
            if seen_keys[..seen].contains(&key) {
                continue;
            }
            seen_keys[seen] = key;
            seen += 1;

            let mut i = self.start_indices[key as usize] as usize;
            while let Some(entry) = self.entries.get(i) {
                if entry.cell_key != key {
                    break;
                }
                let particle = entry.particle as usize;
                if self.points[particle].distance_squared(point) < sqr_radius {
                    f(particle);
                }
                i += 1;
            }
        }
    }

    /// Collect the indices of all indexed points within the rebuild radius
    /// of `point`. Allocating convenience over [`Self::for_each_within`].
    pub fn points_within(&self, point: Vec2) -> Vec<usize> {
        let mut found = Vec::new();
        self.for_each_within(point, |i| found.push(i));
        found
    }

    fn key_from_hash(&self, hash: u32) -> u32 {
        hash % self.entries.len() as u32
    }
}

/// Map a position to its signed grid cell coordinate, `floor(p / radius)`
/// componentwise. Negative coordinates are valid.
#[inline]
fn cell_coord(position: Vec2, radius: f32) -> IVec2 {
    (position / radius).floor().as_ivec2()
}

/// Hash a cell coordinate into an unsigned value; reduced to a bucket key
/// modulo the table size by the caller.
#[inline]
fn hash_cell(cell: IVec2) -> u32 {
    let a = (cell.x as u32).wrapping_mul(HASH_K1);
    let b = (cell.y as u32).wrapping_mul(HASH_K2);
    a.wrapping_add(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(points: &[Vec2], query: Vec2, radius: f32) -> Vec<usize> {
        let mut found: Vec<usize> = (0..points.len())
            .filter(|&i| points[i].distance_squared(query) < radius * radius)
            .collect();
        found.sort_unstable();
        found
    }

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn cell_coord_floors_negative_positions() {
        assert_eq!(cell_coord(Vec2::new(0.5, 0.5), 1.0), IVec2::new(0, 0));
        assert_eq!(cell_coord(Vec2::new(-0.5, -1.5), 1.0), IVec2::new(-1, -2));
        assert_eq!(cell_coord(Vec2::new(2.0, -2.0), 1.0), IVec2::new(2, -2));
    }

    #[test]
    fn hash_differs_for_swapped_components() {
        assert_ne!(hash_cell(IVec2::new(1, 2)), hash_cell(IVec2::new(2, 1)));
    }

    #[test]
    fn empty_lookup_yields_nothing() {
        let mut lookup = SpatialLookup::new();
        lookup.rebuild(&[], 1.0);
        assert!(lookup.points_within(Vec2::ZERO).is_empty());
    }

    #[test]
    fn query_point_finds_itself() {
        let mut lookup = SpatialLookup::new();
        let points = [Vec2::new(3.0, -4.0)];
        lookup.rebuild(&points, 2.0);
        assert_eq!(lookup.points_within(points[0]), vec![0]);
    }

    #[test]
    fn duplicate_positions_share_a_bucket() {
        let mut lookup = SpatialLookup::new();
        let p = Vec2::new(-7.25, 11.5);
        let points = [p, p, p];
        lookup.rebuild(&points, 1.0);
        assert_eq!(sorted(lookup.points_within(p)), vec![0, 1, 2]);
    }

    #[test]
    fn neighbors_across_cell_boundaries() {
        let radius = 1.0;
        // Straddle a cell edge: both points closer than radius but in
        // different cells.
        let points = [Vec2::new(0.95, 0.5), Vec2::new(1.05, 0.5)];
        let mut lookup = SpatialLookup::new();
        lookup.rebuild(&points, radius);
        assert_eq!(sorted(lookup.points_within(points[0])), vec![0, 1]);
        assert_eq!(sorted(lookup.points_within(points[1])), vec![0, 1]);
    }

    #[test]
    fn negative_coordinates_hash_and_query_correctly() {
        let radius = 2.0;
        let points = [
            Vec2::new(-10.5, -10.5),
            Vec2::new(-11.0, -10.0),
            Vec2::new(10.5, 10.5),
        ];
        let mut lookup = SpatialLookup::new();
        lookup.rebuild(&points, radius);
        assert_eq!(sorted(lookup.points_within(points[0])), vec![0, 1]);
        assert_eq!(lookup.points_within(points[2]), vec![2]);
    }

    #[test]
    fn collisions_are_resolved_by_distance_check() {
        // A table of size 2 forces nearly every distinct cell onto the same
        // key; only the distance test keeps results correct.
        let radius = 1.0;
        let points = [Vec2::new(0.5, 0.5), Vec2::new(50.5, 50.5)];
        let mut lookup = SpatialLookup::new();
        lookup.rebuild(&points, radius);
        assert_eq!(lookup.points_within(points[0]), vec![0]);
        assert_eq!(lookup.points_within(points[1]), vec![1]);
    }

    #[test]
    fn matches_brute_force_on_a_grid_cluster() {
        let radius = 1.5;
        let mut points = Vec::new();
        for ix in -4..4 {
            for iy in -4..4 {
                points.push(Vec2::new(ix as f32 * 0.8, iy as f32 * 0.8));
            }
        }
        let mut lookup = SpatialLookup::new();
        lookup.rebuild(&points, radius);

        for &query in &points {
            assert_eq!(
                sorted(lookup.points_within(query)),
                brute_force(&points, query, radius),
            );
        }
    }

    #[test]
    fn resize_is_idempotent() {
        let mut lookup = SpatialLookup::new();
        lookup.resize(8);
        lookup.resize(8);
        let points = [Vec2::ZERO, Vec2::ONE];
        lookup.rebuild(&points, 1.0);
        assert_eq!(lookup.points_within(Vec2::ZERO), vec![0]);
    }
}
