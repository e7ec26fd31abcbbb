//! Hierarchical spherical cell identifiers.
//!
//! The sphere is tiled by projecting it onto the six faces of a cube; each
//! face is then subdivided as a quadtree down to 30 levels. A cell is
//! identified by a single `u64`:
//!
//! ```text
//! [face: 3 bits][child digit: 2 bits per level][1][0...]
//! ```
//!
//! The trailing marker bit encodes the cell's level, so ids at every level
//! share one integer space. This layout gives two properties the rest of the
//! system relies on:
//!
//! - Plain `u64` ordering is a total order compatible with the hierarchy:
//!   every descendant of a cell falls inside the id range
//!   `[id - (lsb - 1), id + (lsb - 1)]`.
//! - The canonical label (`"<face>/<digits>"`) of an ancestor is a prefix of
//!   every descendant's label, which the topic codec turns into a textual
//!   path-prefix guarantee.

use crate::error::{Result, SpatialError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A geographic position in degrees.
///
/// Construction is unchecked; the indexing entry points validate canonical
/// range and reject out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, canonical range [-90, 90].
    pub lat: f64,

    /// Longitude in degrees, canonical range [-180, 180].
    pub lng: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Check that both coordinates are finite and within canonical range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Unit vector on the sphere for this point.
    pub(crate) fn to_unit_vector(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lng = self.lng.to_radians();
        [lat.cos() * lng.cos(), lat.cos() * lng.sin(), lat.sin()]
    }
}

/// A cell in the hierarchical spherical subdivision.
///
/// Cells are freely copyable values; equality and ordering operate on the
/// underlying `u64` id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CellId(u64);

impl CellId {
    /// Deepest subdivision level. Point indexing always uses this level, so
    /// publish-side granularity matches the default subscribe-side bound.
    pub const MAX_LEVEL: u8 = 30;

    /// Number of cube faces.
    pub const NUM_FACES: u8 = 6;

    /// The level-0 cell for a cube face (0-5).
    pub fn face_cell(face: u8) -> CellId {
        debug_assert!(face < Self::NUM_FACES);
        CellId(((face as u64) << 61) | (1 << 60))
    }

    /// The unique deepest-level cell containing `p`.
    ///
    /// Returns `InvalidCoordinate` if `p` is outside canonical range.
    pub fn from_point(p: GeoPoint) -> Result<CellId> {
        if !p.is_valid() {
            return Err(SpatialError::InvalidCoordinate {
                lat: p.lat,
                lng: p.lng,
            });
        }
        Ok(Self::from_unit_vector(p.to_unit_vector()))
    }

    /// Deepest-level cell for a unit vector.
    pub(crate) fn from_unit_vector(v: [f64; 3]) -> CellId {
        let face = face_of(v);
        let (u, w) = face_uv(face, v);
        let i = st_to_index(uv_to_st(u));
        let j = st_to_index(uv_to_st(w));

        let mut id = (face as u64) << 61;
        for k in 1..=Self::MAX_LEVEL {
            let bit = Self::MAX_LEVEL - k;
            let i_bit = ((i >> bit) & 1) as u64;
            let j_bit = ((j >> bit) & 1) as u64;
            id |= ((j_bit << 1) | i_bit) << (61 - 2 * k as u32);
        }
        CellId(id | 1)
    }

    /// Raw id value.
    pub fn id(self) -> u64 {
        self.0
    }

    /// Cube face (0-5) this cell lies on.
    pub fn face(self) -> u8 {
        (self.0 >> 61) as u8
    }

    /// Lowest set bit; encodes the level.
    fn lsb(self) -> u64 {
        self.0 & self.0.wrapping_neg()
    }

    /// Subdivision level (0 = face cell).
    pub fn level(self) -> u8 {
        Self::MAX_LEVEL - (self.lsb().trailing_zeros() / 2) as u8
    }

    /// Child digit (0-3) at subdivision level `k` (1-based, `k <= level`).
    pub fn digit(self, k: u8) -> u8 {
        debug_assert!(k >= 1 && k <= self.level());
        ((self.0 >> (61 - 2 * k as u32)) & 3) as u8
    }

    /// The `pos`-th child (0-3) one level below this cell.
    pub fn child(self, pos: u8) -> CellId {
        debug_assert!(self.level() < Self::MAX_LEVEL && pos < 4);
        let new_lsb = self.lsb() >> 2;
        CellId(self.0 - self.lsb() + (2 * pos as u64 + 1) * new_lsb)
    }

    /// All four children of this cell.
    pub fn children(self) -> [CellId; 4] {
        [self.child(0), self.child(1), self.child(2), self.child(3)]
    }

    /// Ancestor of this cell at the given (shallower or equal) level.
    pub fn parent(self, level: u8) -> CellId {
        debug_assert!(level <= self.level());
        let new_lsb = 1u64 << (2 * (Self::MAX_LEVEL - level) as u32);
        CellId((self.0 & !(2 * new_lsb - 1)) | new_lsb)
    }

    /// True if `other` is this cell or nested anywhere beneath it.
    pub fn contains(self, other: CellId) -> bool {
        let lsb = self.lsb();
        other.0 >= self.0 - (lsb - 1) && other.0 <= self.0 + (lsb - 1)
    }

    /// Canonical hierarchical label: face digit, a `/` separator, then one
    /// child digit per level (e.g. `"2/031"`; a face cell is `"2/"`).
    pub fn label(self) -> String {
        let mut s = String::with_capacity(self.level() as usize + 2);
        s.push((b'0' + self.face()) as char);
        s.push('/');
        for k in 1..=self.level() {
            s.push((b'0' + self.digit(k)) as char);
        }
        s
    }

    /// The (s, t) square this cell occupies on its face, each range in [0, 1].
    pub(crate) fn st_bounds(self) -> ([f64; 2], [f64; 2]) {
        let mut s = [0.0, 1.0];
        let mut t = [0.0, 1.0];
        for k in 1..=self.level() {
            let d = self.digit(k);
            let s_mid = (s[0] + s[1]) / 2.0;
            let t_mid = (t[0] + t[1]) / 2.0;
            if d & 1 == 0 {
                s[1] = s_mid;
            } else {
                s[0] = s_mid;
            }
            if d >> 1 == 0 {
                t[1] = t_mid;
            } else {
                t[0] = t_mid;
            }
        }
        (s, t)
    }

    /// Unit vector at the cell's center.
    pub(crate) fn center_vector(self) -> [f64; 3] {
        let (s, t) = self.st_bounds();
        let u = st_to_uv((s[0] + s[1]) / 2.0);
        let w = st_to_uv((t[0] + t[1]) / 2.0);
        normalize(face_uv_to_xyz(self.face(), u, w))
    }

    /// Unit vectors at the cell's four corners.
    pub(crate) fn corner_vectors(self) -> [[f64; 3]; 4] {
        let (s, t) = self.st_bounds();
        let face = self.face();
        let corner = |si: usize, ti: usize| {
            normalize(face_uv_to_xyz(face, st_to_uv(s[si]), st_to_uv(t[ti])))
        };
        [corner(0, 0), corner(1, 0), corner(0, 1), corner(1, 1)]
    }

    /// Angular radius of a cap centered on the cell that contains the whole
    /// cell. Attained at a corner.
    pub(crate) fn bounding_angle(self) -> f64 {
        let center = self.center_vector();
        self.corner_vectors()
            .iter()
            .map(|c| angle(center, *c))
            .fold(0.0, f64::max)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Cube face (0-5) containing a unit vector: the axis with the largest
/// magnitude, faces 0-2 for +x/+y/+z and 3-5 for -x/-y/-z.
fn face_of(v: [f64; 3]) -> u8 {
    let abs = [v[0].abs(), v[1].abs(), v[2].abs()];
    let axis = if abs[0] >= abs[1] && abs[0] >= abs[2] {
        0
    } else if abs[1] >= abs[2] {
        1
    } else {
        2
    };
    if v[axis] >= 0.0 {
        axis as u8
    } else {
        axis as u8 + 3
    }
}

/// (u, v) face coordinates in [-1, 1] for a vector on the given face.
fn face_uv(face: u8, v: [f64; 3]) -> (f64, f64) {
    match face {
        0 => (v[1] / v[0], v[2] / v[0]),
        1 => (-v[0] / v[1], v[2] / v[1]),
        2 => (-v[0] / v[2], -v[1] / v[2]),
        3 => (v[2] / v[0], v[1] / v[0]),
        4 => (v[2] / v[1], -v[0] / v[1]),
        _ => (-v[1] / v[2], -v[0] / v[2]),
    }
}

/// Inverse of [`face_uv`]; the result is not normalized.
fn face_uv_to_xyz(face: u8, u: f64, v: f64) -> [f64; 3] {
    match face {
        0 => [1.0, u, v],
        1 => [-u, 1.0, v],
        2 => [-u, -v, 1.0],
        3 => [-1.0, -v, -u],
        4 => [v, -1.0, -u],
        _ => [v, u, -1.0],
    }
}

fn uv_to_st(u: f64) -> f64 {
    (u + 1.0) / 2.0
}

fn st_to_uv(s: f64) -> f64 {
    2.0 * s - 1.0
}

/// Discretize an s/t coordinate to a 30-bit cell index.
fn st_to_index(s: f64) -> u32 {
    const MAX: i64 = (1 << CellId::MAX_LEVEL as i64) - 1;
    let scaled = (s * (1u64 << CellId::MAX_LEVEL) as f64).floor() as i64;
    scaled.clamp(0, MAX) as u32
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let n = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / n, v[1] / n, v[2] / n]
}

/// Angle in radians between two unit vectors.
///
/// Computed from the chord length, which stays accurate for the tiny angles
/// deep-level cells produce (`acos` of a near-1 dot product does not).
pub(crate) fn angle(a: [f64; 3], b: [f64; 3]) -> f64 {
    let d = [a[0] - b[0], a[1] - b[1], a[2] - b[2]];
    let chord = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
    2.0 * (chord / 2.0).clamp(-1.0, 1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_point_is_leaf_level() {
        let cell = CellId::from_point(GeoPoint::new(48.8566, 2.3522)).unwrap();
        assert_eq!(cell.level(), CellId::MAX_LEVEL);
    }

    #[test]
    fn test_from_point_is_deterministic() {
        let p = GeoPoint::new(35.6812, 139.7671);
        let a = CellId::from_point(p).unwrap();
        let b = CellId::from_point(p).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_point_rejects_out_of_range() {
        assert!(matches!(
            CellId::from_point(GeoPoint::new(91.0, 0.0)),
            Err(SpatialError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            CellId::from_point(GeoPoint::new(0.0, 180.5)),
            Err(SpatialError::InvalidCoordinate { .. })
        ));
        assert!(CellId::from_point(GeoPoint::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn test_face_selection() {
        // (0, 0) is the center of the +x face; the poles sit on +z / -z.
        let equator = CellId::from_point(GeoPoint::new(0.0, 0.0)).unwrap();
        assert_eq!(equator.face(), 0);
        let north = CellId::from_point(GeoPoint::new(90.0, 0.0)).unwrap();
        assert_eq!(north.face(), 2);
        let south = CellId::from_point(GeoPoint::new(-90.0, 0.0)).unwrap();
        assert_eq!(south.face(), 5);
        let antimeridian = CellId::from_point(GeoPoint::new(0.0, 180.0)).unwrap();
        assert_eq!(antimeridian.face(), 3);
    }

    #[test]
    fn test_face_cell_level_and_label() {
        let face = CellId::face_cell(2);
        assert_eq!(face.level(), 0);
        assert_eq!(face.label(), "2/");
    }

    #[test]
    fn test_child_parent_roundtrip() {
        let face = CellId::face_cell(1);
        for pos in 0..4 {
            let child = face.child(pos);
            assert_eq!(child.level(), 1);
            assert_eq!(child.digit(1), pos);
            assert_eq!(child.parent(0), face);
        }
    }

    #[test]
    fn test_parent_contains_descendants() {
        let leaf = CellId::from_point(GeoPoint::new(-33.8688, 151.2093)).unwrap();
        for level in 0..=CellId::MAX_LEVEL {
            let ancestor = leaf.parent(level);
            assert_eq!(ancestor.level(), level);
            assert!(ancestor.contains(leaf));
            assert!(leaf.contains(ancestor) == (level == CellId::MAX_LEVEL));
        }
    }

    #[test]
    fn test_siblings_do_not_contain_each_other() {
        let cell = CellId::face_cell(0).child(1).child(2);
        let sibling = CellId::face_cell(0).child(1).child(3);
        assert!(!cell.contains(sibling));
        assert!(!sibling.contains(cell));
    }

    #[test]
    fn test_ordering_is_hierarchy_compatible() {
        // All descendants of child(1) sort between child(0)'s and child(2)'s.
        let face = CellId::face_cell(3);
        let mid = face.child(1);
        let deep = mid.child(3).child(3);
        assert!(face.child(0) < deep && deep < face.child(2));
        assert!(mid.contains(deep));
    }

    #[test]
    fn test_label_tracks_level() {
        let leaf = CellId::from_point(GeoPoint::new(51.5074, -0.1278)).unwrap();
        let label = leaf.label();
        // face digit + '/' + one digit per level
        assert_eq!(label.len(), 2 + CellId::MAX_LEVEL as usize);
        assert_eq!(&label[1..2], "/");

        let coarse = leaf.parent(5);
        assert_eq!(coarse.label().len(), 7);
        assert!(label.starts_with(&coarse.label()));
    }

    #[test]
    fn test_point_cell_matches_digit_walk() {
        // The cell containing a point must be a descendant of the child its
        // st square selects at every level.
        let p = GeoPoint::new(10.0, 20.0);
        let leaf = CellId::from_point(p).unwrap();
        let mut cell = CellId::face_cell(leaf.face());
        for k in 1..=CellId::MAX_LEVEL {
            cell = cell.child(leaf.digit(k));
            assert!(cell.contains(leaf));
        }
        assert_eq!(cell, leaf);
    }

    #[test]
    fn test_center_vector_stays_inside_cell() {
        let leaf = CellId::from_point(GeoPoint::new(40.7128, -74.0060)).unwrap();
        let cell = leaf.parent(8);
        let recovered = CellId::from_unit_vector(cell.center_vector());
        assert!(cell.contains(recovered));
    }

    #[test]
    fn test_bounding_angle_covers_corners() {
        let cell = CellId::face_cell(4).child(2).child(0).child(1);
        let r = cell.bounding_angle();
        let center = cell.center_vector();
        for corner in cell.corner_vectors() {
            assert!(angle(center, corner) <= r + 1e-12);
        }
        // A child fits inside its parent's bound.
        assert!(cell.child(0).bounding_angle() < r);
    }
}
