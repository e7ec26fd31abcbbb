//! Covering configuration.

use crate::cell::CellId;
use crate::error::{Result, SpatialError};
use serde::{Deserialize, Serialize};

/// Bounds for disc covering generation.
///
/// Controls the precision / fan-out trade: more and finer cells hug the disc
/// tighter but cost one broker subscription each.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoveringConfig {
    /// Maximum cell level (0-30). Higher = finer cells.
    /// Default: 30 (the deepest level, matching point indexing).
    pub max_level: u8,

    /// Maximum number of cells in a covering.
    /// Default: 4
    pub max_cells: usize,
}

impl Default for CoveringConfig {
    fn default() -> Self {
        Self {
            max_level: CellId::MAX_LEVEL,
            max_cells: 4,
        }
    }
}

impl CoveringConfig {
    /// Create a config with explicit bounds.
    pub fn new(max_level: u8, max_cells: usize) -> Self {
        Self {
            max_level,
            max_cells,
        }
    }

    /// Check the bounds are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_level > CellId::MAX_LEVEL {
            return Err(SpatialError::config(format!(
                "max_level {} exceeds deepest level {}",
                self.max_level,
                CellId::MAX_LEVEL
            )));
        }
        if self.max_cells == 0 {
            return Err(SpatialError::config("max_cells must be at least 1"));
        }
        Ok(())
    }
}
