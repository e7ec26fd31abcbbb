//! Disc covering generation.
//!
//! Converts a geographic disc (center + radius in km) into a bounded set of
//! cells that jointly contain it. The covering is a greedy subdivision
//! search: seed with the face cells touching the disc's spherical cap, then
//! repeatedly subdivide the coarsest cell that straddles the cap boundary,
//! keeping only children that can still intersect, until either every cell is
//! interior-or-finest or subdividing would blow the cell budget.
//!
//! Intersection tests are conservative (per-cell bounding caps), so a cell
//! that truly intersects the cap is never discarded; the price is an
//! occasional extra cell that only nearly touches the disc. That is the right
//! trade for subscriptions: coverage must never be lost.

use crate::cell::{angle, CellId, GeoPoint};
use crate::config::CoveringConfig;
use crate::error::{Result, SpatialError};

/// Mean Earth radius used to convert kilometers to an angle.
pub const EARTH_RADIUS_KM: f64 = 6371.01;

/// Slack added to conservative intersection tests to absorb rounding.
const ANGLE_SLACK: f64 = 1e-12;

/// A spherical cap: all points within an angular radius of a center point.
#[derive(Debug, Clone, Copy)]
pub struct Cap {
    center: [f64; 3],
    radius: f64,
}

impl Cap {
    /// Cap for a disc of `radius_km` around `center`.
    ///
    /// A non-positive radius degrades to a point cap. Returns
    /// `InvalidCoordinate` if the center is outside canonical range.
    pub fn from_disc(center: GeoPoint, radius_km: f64) -> Result<Cap> {
        if !center.is_valid() {
            return Err(SpatialError::InvalidCoordinate {
                lat: center.lat,
                lng: center.lng,
            });
        }
        Ok(Cap {
            center: center.to_unit_vector(),
            radius: (radius_km / EARTH_RADIUS_KM).max(0.0),
        })
    }

    /// Angular radius in radians.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Conservative: false only if the cell definitely misses the cap.
    fn may_intersect(&self, cell: CellId) -> bool {
        angle(self.center, cell.center_vector()) <= self.radius + cell.bounding_angle() + ANGLE_SLACK
    }

    /// Conservative: true only if the cell definitely lies inside the cap.
    fn contains_cell(&self, cell: CellId) -> bool {
        angle(self.center, cell.center_vector()) + cell.bounding_angle() <= self.radius
    }
}

/// Compute a covering of the disc, bounded by the config's cell budget and
/// maximum level.
///
/// The result is sorted by cell id; callers should treat it as a set. For
/// discs small enough to sit below face scale the covering holds between 1
/// and `max_cells` cells; a cap wide enough to touch more faces than the
/// budget allows returns all intersecting face cells, since nothing coarser
/// than a face exists.
pub fn covering_for_disc(
    center: GeoPoint,
    radius_km: f64,
    config: &CoveringConfig,
) -> Result<Vec<CellId>> {
    config.validate()?;
    let cap = Cap::from_disc(center, radius_km)?;

    let mut cells: Vec<CellId> = (0..CellId::NUM_FACES)
        .map(CellId::face_cell)
        .filter(|c| cap.may_intersect(*c))
        .collect();

    loop {
        // Coarsest cell that straddles the cap boundary and can still split.
        let candidate = cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.level() < config.max_level && !cap.contains_cell(**c))
            .min_by_key(|(_, c)| c.level())
            .map(|(i, _)| i);
        let Some(idx) = candidate else { break };

        let survivors: Vec<CellId> = cells[idx]
            .children()
            .into_iter()
            .filter(|child| cap.may_intersect(*child))
            .collect();
        if cells.len() - 1 + survivors.len() > config.max_cells {
            // Budget is tight: keep the coarser cell rather than split.
            break;
        }
        cells.swap_remove(idx);
        cells.extend(survivors);
    }

    cells.sort_unstable();
    Ok(cells)
}
