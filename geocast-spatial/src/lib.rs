//! Hierarchical spherical cell indexing for geocast.
//!
//! This crate is the pure-geometry half of geocast: it maps geography onto a
//! hierarchical subdivision of the sphere so that the client crate can map
//! cells onto broker topics.
//!
//! - A **point** maps to the unique deepest-level cell containing it
//!   ([`CellId::from_point`]) — used for publish-side addressing.
//! - A **disc** (center + radius in km) maps to a small covering of cells
//!   ([`covering_for_disc`]), bounded by a cell budget and a maximum
//!   subdivision level ([`CoveringConfig`]) — used for subscribe-side
//!   fan-out.
//!
//! ```text
//!   GeoPoint ──────────────► CellId (level 30)          publish side
//!
//!   GeoPoint + radius_km ──► Cap ──► [CellId; 1..=max]  subscribe side
//!                                    (greedy subdivision under
//!                                     max_cells / max_level budget)
//! ```
//!
//! Cell identifiers are plain `u64` values whose ordering and label structure
//! encode the hierarchy; see [`cell`] for the encoding.
//!
//! # Modules
//!
//! - [`cell`]: cell identifiers, point indexing, hierarchy operations
//! - [`covering`]: spherical caps and disc covering generation
//! - [`config`]: covering bounds configuration
//! - [`error`]: error types

pub mod cell;
pub mod config;
pub mod covering;
pub mod error;

pub use cell::{CellId, GeoPoint};
pub use config::CoveringConfig;
pub use covering::{covering_for_disc, Cap, EARTH_RADIUS_KM};
pub use error::{Result, SpatialError};
